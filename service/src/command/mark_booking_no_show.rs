//! [`Command`] for marking a [`Booking`] as a no-show.

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

/// [`Command`] for marking a [`booking::Status::Confirmed`] [`Booking`] as
/// a no-show once its check-in date has passed without the guests arriving.
#[derive(Clone, Copy, Debug)]
pub struct MarkBookingNoShow {
    /// ID of the [`Booking`] whose guests haven't arrived.
    pub booking_id: booking::Id,
}

impl<Db> Command<MarkBookingNoShow> for Service<Db>
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
        MarkBookingNoShow { booking_id }: MarkBookingNoShow,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.mark_no_show(now))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` marked as no-show");

        Ok(booking)
    }
}

/// Error of [`MarkBookingNoShow`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::booking::{Rejection, Status, ValidationError},
        domain::fixture::booking_in,
        Command as _,
    };

    use super::{ExecutionError, MarkBookingNoShow};

    #[tokio::test]
    async fn marks_overdue_booking() {
        let booking =
            booking_in(Status::Confirmed, fixture::day(-1), fixture::day(1));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let marked = svc
            .execute(MarkBookingNoShow {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(marked.status, Status::NoShow);
        assert_eq!(marked.hold(), None);
    }

    #[tokio::test]
    async fn waits_for_check_in_date_to_pass() {
        let booking =
            booking_in(Status::Confirmed, fixture::day(0), fixture::day(2));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(MarkBookingNoShow {
                booking_id: booking.id,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::NoShowTooEarly { .. },
            )),
        ));
    }

    #[tokio::test]
    async fn rejects_pending_booking() {
        let booking =
            booking_in(Status::Pending, fixture::day(-2), fixture::day(1));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(MarkBookingNoShow {
                booking_id: booking.id,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::InvalidTransition(_)),
        ));
    }
}
