//! [`Command`] for checking guests of a [`Booking`] in.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, payment},
        guest, room, Booking, Room,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for checking guests of a [`booking::Status::Confirmed`]
/// [`Booking`] in, recording their deposit and marking the [`Room`] as
/// occupied.
#[derive(Clone, Debug)]
pub struct CheckInBooking {
    /// ID of the [`Booking`] whose guests arrived.
    pub booking_id: booking::Id,

    /// [`payment::Method`] the deposit is paid with.
    pub method: payment::Method,

    /// Reference of the deposit transaction in an external payment system,
    /// if any.
    pub transaction: Option<payment::TransactionRef>,

    /// Identity of the primary guest, verified on arrival.
    pub verification: guest::Verification,
}

impl<Db> Command<CheckInBooking> for Service<Db>
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
        cmd: CheckInBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckInBooking {
            booking_id,
            method,
            transaction,
            verification,
        } = cmd;

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
            .check_in(method, transaction, verification, DateTime::now())
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
        room.occupy();

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
            "`Booking(id: {booking_id})` checked in `Room(id: {})` with \
             {} deposit",
            booking.room_id,
            booking.deposit,
        );

        Ok(booking)
    }
}

/// Error of [`CheckInBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] rejected the check-in.
    #[display("`Booking` rejected the check-in: {_0}")]
    #[from]
    Rejected(booking::Rejection),

    /// [`Room`] of the [`Booking`] does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{
                self, payment, PaymentStatus, Rejection, Status,
                ValidationError,
            },
            fixture::{booking_of, room, usd, verification},
            guest,
            room::Status as RoomStatus,
        },
        Command as _,
    };

    use super::{CheckInBooking, ExecutionError};

    fn check_in(
        booking_id: booking::Id,
        verification: guest::Verification,
    ) -> CheckInBooking {
        CheckInBooking {
            booking_id,
            method: payment::Method::Cash,
            transaction: None,
            verification,
        }
    }

    #[tokio::test]
    async fn records_deposit_and_occupies_room() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let mut booking = booking_of(&room, fixture::day(0), fixture::day(2));
        booking.status = Status::Confirmed;
        fixture::store(&svc, &booking).await;

        let checked_in = svc
            .execute(check_in(booking.id, verification()))
            .await
            .unwrap();

        assert_eq!(checked_in.status, Status::CheckedIn);
        assert_eq!(checked_in.payment_status, PaymentStatus::PartiallyPaid);
        // 30% of 460.
        assert_eq!(checked_in.paid(), usd("138"));
        assert_eq!(checked_in.verification, Some(verification()));
        assert_eq!(
            fixture::load_room(&svc, room.id).await.status,
            RoomStatus::Occupied,
        );
    }

    #[tokio::test]
    async fn rejects_unconfirmed_booking() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let booking = booking_of(&room, fixture::day(0), fixture::day(2));
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(check_in(booking.id, verification()))
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::InvalidTransition(_)),
        ));
        assert_eq!(
            fixture::load_room(&svc, room.id).await.status,
            RoomStatus::Available,
        );
    }

    #[tokio::test]
    async fn rejects_early_arrival() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let mut booking = booking_of(&room, fixture::day(1), fixture::day(2));
        booking.status = Status::Confirmed;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(check_in(booking.id, verification()))
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::CheckInTooEarly { .. },
            )),
        ));
    }

    #[tokio::test]
    async fn rejects_mismatching_guest() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let mut booking = booking_of(&room, fixture::day(0), fixture::day(2));
        booking.status = Status::Confirmed;
        booking.guest.national_id =
            Some(guest::NationalId::new("079000000000").unwrap());
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(check_in(booking.id, verification()))
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::GuestMismatch,
            )),
        ));
        assert_eq!(
            fixture::load(&svc, booking.id).await.status,
            Status::Confirmed,
        );
    }
}
