//! [`Command`] for recording a settlement `Payment` of a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, payment},
        Booking,
    },
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for recording a settlement `Payment` towards the balance of a
/// [`Booking`].
#[derive(Clone, Debug)]
pub struct RecordBookingPayment {
    /// ID of the paid [`Booking`].
    pub booking_id: booking::Id,

    /// [`payment::Method`] of the `Payment`.
    pub method: payment::Method,

    /// Paid amount, in the [`Booking`]'s currency.
    pub amount: Money,

    /// Reference of the transaction in an external payment system, if any.
    pub transaction: Option<payment::TransactionRef>,
}

impl<Db> Command<RecordBookingPayment> for Service<Db>
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
        cmd: RecordBookingPayment,
    ) -> Result<Self::Ok, Self::Err> {
        let RecordBookingPayment {
            booking_id,
            method,
            amount,
            transaction,
        } = cmd;

        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| {
                b.record_payment(method, amount, transaction, now)
            })
            .await
            .map_err(tracerr::wrap!())?;

        log::info!(
            "`Booking(id: {booking_id})` paid {amount} by `{method}`, now \
             `{}`",
            booking.payment_status,
        );

        Ok(booking)
    }
}

/// Error of [`RecordBookingPayment`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{
                payment, PaymentStatus, Rejection, Status, ValidationError,
            },
            fixture::{booking_in, usd},
        },
        Command as _,
    };

    use super::{ExecutionError, RecordBookingPayment};

    #[tokio::test]
    async fn settles_balance_in_parts() {
        let booking =
            booking_in(Status::CheckedIn, fixture::day(-1), fixture::day(1));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;
        let pay = |amount| RecordBookingPayment {
            booking_id: booking.id,
            method: payment::Method::CreditCard,
            amount: usd(amount),
            transaction: payment::TransactionRef::new("TX-1"),
        };

        // 2 nights at $200 with 10% tax and 5% service charge.
        let partial = svc.execute(pay("160")).await.unwrap();
        assert_eq!(partial.payment_status, PaymentStatus::PartiallyPaid);
        assert_eq!(partial.balance(), usd("300"));

        let paid = svc.execute(pay("300")).await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payments.len(), 2);

        let err = svc.execute(pay("1")).await.unwrap_err().into_inner();
        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::AlreadyPaid {
                    status: PaymentStatus::Paid,
                },
            )),
        ));
    }

    #[tokio::test]
    async fn rejects_zero_amount() {
        let booking =
            booking_in(Status::Confirmed, fixture::day(1), fixture::day(3));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(RecordBookingPayment {
                booking_id: booking.id,
                method: payment::Method::Cash,
                amount: usd("0"),
                transaction: None,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::NonPositiveAmount,
            )),
        ));
    }
}
