//! [`Command`] for marking a [`Booking`] as failed.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for marking a [`Booking`] still holding its `Room` as failed,
/// releasing the `Room`.
#[derive(Clone, Debug)]
pub struct MarkBookingFailed {
    /// ID of the failed [`Booking`].
    pub booking_id: booking::Id,

    /// Reason of the failure.
    pub reason: booking::Note,
}

impl<Db> Command<MarkBookingFailed> for Service<Db>
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
        cmd: MarkBookingFailed,
    ) -> Result<Self::Ok, Self::Err> {
        let MarkBookingFailed { booking_id, reason } = cmd;

        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.mark_failed(reason))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` marked as failed");

        Ok(booking)
    }
}

/// Error of [`MarkBookingFailed`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{Note, Status},
            fixture::booking_in,
        },
        Command as _,
    };

    use super::{ExecutionError, MarkBookingFailed};

    #[tokio::test]
    async fn fails_holding_booking() {
        let booking =
            booking_in(Status::Confirmed, fixture::day(2), fixture::day(4));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;
        let reason = Note::new("Payment gateway declined").unwrap();

        let failed = svc
            .execute(MarkBookingFailed {
                booking_id: booking.id,
                reason: reason.clone(),
            })
            .await
            .unwrap();

        assert_eq!(failed.status, Status::Failed);
        assert_eq!(failed.failure_reason, Some(reason));
    }

    #[tokio::test]
    async fn rejects_terminal_booking() {
        let booking =
            booking_in(Status::Cancelled, fixture::day(2), fixture::day(4));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(MarkBookingFailed {
                booking_id: booking.id,
                reason: Note::new("Duplicate").unwrap(),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::Rejected(_)));
    }
}
