//! [`Command`] for cancelling a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for cancelling a [`Booking`] before the guests arrive.
///
/// Releases the reserved `Room` for the stay dates. A late cancellation is
/// charged according to the configured [`booking::Policy`].
#[derive(Clone, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to be cancelled.
    pub booking_id: booking::Id,

    /// Reason of the cancellation.
    pub reason: booking::Note,
}

impl<Db> Command<CancelBooking> for Service<Db>
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
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let CancelBooking { booking_id, reason } = cmd;

        let policy = self.config().booking;
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.cancel(reason, &policy, now))
            .await
            .map_err(tracerr::wrap!())?;

        match booking.cancellation_fee {
            Some(fee) => log::info!(
                "`Booking(id: {booking_id})` cancelled with {fee} fee",
            ),
            None => log::info!("`Booking(id: {booking_id})` cancelled"),
        }

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::{fixture, ConfirmBooking, CreateBooking},
        domain::{
            booking::{Note, Rejection, Status},
            fixture::{booking_in, booking_of, reservation, room, usd},
        },
        Command as _,
    };

    use super::{CancelBooking, ExecutionError};

    fn reason() -> Note {
        Note::new("Plans changed").unwrap()
    }

    #[tokio::test]
    async fn charges_late_cancellation_and_releases_room() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let (check_in, check_out) = (fixture::day(1), fixture::day(3));
        let booking = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(check_in, check_out),
            })
            .await
            .unwrap();
        _ = svc
            .execute(ConfirmBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        // Less than 48 hours are left before the check-in hour of tomorrow.
        let cancelled = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                reason: reason(),
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, Status::Cancelled);
        assert_eq!(cancelled.cancellation_fee, Some(usd("200")));
        assert_eq!(cancelled.cancellation_reason, Some(reason()));
        assert!(cancelled.cancelled_at.is_some());

        let rebooked = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(check_in, check_out),
            })
            .await
            .unwrap();
        assert_eq!(rebooked.status, Status::Pending);
    }

    #[tokio::test]
    async fn cancels_early_for_free() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let booking = booking_of(&room, fixture::day(10), fixture::day(12));
        fixture::store(&svc, &booking).await;

        let cancelled = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                reason: reason(),
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, Status::Cancelled);
        assert_eq!(cancelled.cancellation_fee, None);
    }

    #[tokio::test]
    async fn rejects_cancelling_arrived_guests() {
        let booking =
            booking_in(Status::CheckedIn, fixture::day(0), fixture::day(2));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                reason: reason(),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::InvalidTransition(_)),
        ));
        assert_eq!(
            fixture::load(&svc, booking.id).await.status,
            Status::CheckedIn,
        );
    }
}
