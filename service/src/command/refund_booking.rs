//! [`Command`] for refunding a [`Booking`].

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

/// [`Command`] for refunding the money paid for a cancelled or completed
/// [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct RefundBooking {
    /// ID of the [`Booking`] to be refunded.
    pub booking_id: booking::Id,
}

impl<Db> Command<RefundBooking> for Service<Db>
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
        RefundBooking { booking_id }: RefundBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.refund(now))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` refunded");

        Ok(booking)
    }
}

/// Error of [`RefundBooking`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{PaymentStatus, Rejection, Status, ValidationError},
            fixture::booking_in,
        },
        Command as _,
    };

    use super::{ExecutionError, RefundBooking};

    #[tokio::test]
    async fn refunds_completed_booking() {
        let mut booking =
            booking_in(Status::Completed, fixture::day(-5), fixture::day(-3));
        booking.payment_status = PaymentStatus::Paid;
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let refunded = svc
            .execute(RefundBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(refunded.status, Status::Completed);
        assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
        assert!(refunded.refunded_at.is_some());
    }

    #[tokio::test]
    async fn rejects_unpaid_booking() {
        let booking =
            booking_in(Status::Cancelled, fixture::day(5), fixture::day(7));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(RefundBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::NothingToRefund {
                    status: PaymentStatus::Unpaid,
                },
            )),
        ));
    }
}
