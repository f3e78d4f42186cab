//! [`Command`] for checking guests of a [`Booking`] out.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, room, Booking, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for checking guests of a fully paid
/// [`booking::Status::CheckedIn`] [`Booking`] out, sending the [`Room`] to
/// cleaning.
#[derive(Clone, Copy, Debug)]
pub struct CheckOutBooking {
    /// ID of the [`Booking`] whose guests leave.
    pub booking_id: booking::Id,
}

impl<Db> Command<CheckOutBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Lock<By<Room, room::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Update<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CheckOutBooking { booking_id }: CheckOutBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Booking`.
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .check_out(DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Room, _>::new(booking.room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(booking.room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(booking.room_id))
            .map_err(tracerr::wrap!())?;
        room.vacate();

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Update(room))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {booking_id})` checked out of `Room(id: {})`",
            booking.room_id,
        );

        Ok(booking)
    }
}

/// Error of [`CheckOutBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] rejected the check-out.
    #[display("`Booking` rejected the check-out: {_0}")]
    #[from]
    Rejected(booking::Rejection),

    /// [`Room`] of the [`Booking`] does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{fixture, AddServiceCharge, RecordBookingPayment},
        domain::{
            booking::{
                charge, payment, PaymentStatus, Rejection, Status,
                UnsettledBalance,
            },
            fixture::{booking_of, room, usd},
            room::Status as RoomStatus,
            Booking,
        },
        infra::Memory,
        Command as _, Service,
    };

    use super::{CheckOutBooking, ExecutionError};

    /// Stores a [`Status::CheckedIn`] [`Booking`] of a $200 room for 2
    /// nights, charged with a $15 minibar.
    async fn staying() -> (Service<Memory>, Booking) {
        let mut room = room("200");
        room.status = RoomStatus::Occupied;
        let svc = fixture::service(&[&room]).await;
        let mut booking = booking_of(&room, fixture::day(-1), fixture::day(1));
        booking.status = Status::CheckedIn;
        fixture::store(&svc, &booking).await;
        let booking = svc
            .execute(AddServiceCharge {
                booking_id: booking.id,
                kind: charge::Kind::Minibar,
                quantity: 1,
                unit_price: usd("15"),
                description: None,
            })
            .await
            .unwrap();
        (svc, booking)
    }

    async fn pay(
        svc: &Service<Memory>,
        booking: &Booking,
        amount: &str,
    ) {
        _ = svc
            .execute(RecordBookingPayment {
                booking_id: booking.id,
                method: payment::Method::Cash,
                amount: usd(amount),
                transaction: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn blocks_unsettled_balance() {
        let (svc, booking) = staying().await;
        pay(&svc, &booking, "100").await;

        let err = svc
            .execute(CheckOutBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err()
            .into_inner();

        let ExecutionError::Rejected(Rejection::UnsettledBalance(
            UnsettledBalance { due, paid, .. },
        )) = err
        else {
            panic!("expected `UnsettledBalance`, got: {err}");
        };
        assert_eq!(due, usd("475"));
        assert_eq!(paid, usd("100"));
        let stored = fixture::load(&svc, booking.id).await;
        assert_eq!(stored.status, Status::CheckedIn);
        assert_eq!(
            fixture::load_room(&svc, booking.room_id).await.status,
            RoomStatus::Occupied,
        );
    }

    #[tokio::test]
    async fn checks_out_paid_booking() {
        let (svc, booking) = staying().await;
        pay(&svc, &booking, "475").await;

        let checked_out = svc
            .execute(CheckOutBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(checked_out.status, Status::CheckedOut);
        assert_eq!(checked_out.payment_status, PaymentStatus::Paid);
        assert!(checked_out.checked_out_at.is_some());
        assert_eq!(checked_out.hold(), None);
        assert_eq!(
            fixture::load_room(&svc, booking.room_id).await.status,
            RoomStatus::Cleaning,
        );
    }
}
