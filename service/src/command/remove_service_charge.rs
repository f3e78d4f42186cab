//! [`Command`] for removing a service `Charge` from a [`Booking`].

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

/// [`Command`] for removing a service `Charge` from the ledger of a
/// [`Booking`] as an administrative correction.
///
/// The `Charge` stays in the ledger, marked as removed.
#[derive(Clone, Copy, Debug)]
pub struct RemoveServiceCharge {
    /// ID of the [`Booking`] to remove the `Charge` from.
    pub booking_id: booking::Id,

    /// Index of the `Charge` in the ledger.
    pub index: usize,
}

impl<Db> Command<RemoveServiceCharge> for Service<Db>
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
        RemoveServiceCharge { booking_id, index }: RemoveServiceCharge,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.remove_charge(index, now))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!(
            "`Booking(id: {booking_id})` service charge #{index} removed",
        );

        Ok(booking)
    }
}

/// Error of [`RemoveServiceCharge`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        command::fixture,
        domain::{
            booking::{charge, Rejection, Status, ValidationError},
            fixture::{booking_in, usd},
            Booking,
        },
        Command as _,
    };

    use super::{ExecutionError, RemoveServiceCharge};

    /// Creates a [`Booking`] in the provided [`Status`] with two service
    /// charges of $15 and $30.
    fn charged(status: Status) -> Booking {
        let mut booking =
            booking_in(Status::CheckedIn, fixture::day(-1), fixture::day(1));
        for (kind, price) in
            [(charge::Kind::Minibar, "15"), (charge::Kind::Spa, "30")]
        {
            _ = booking
                .add_charge(kind, 1, usd(price), None, DateTime::now())
                .unwrap();
        }
        booking.status = status;
        booking
    }

    #[tokio::test]
    async fn soft_removes_charge() {
        let booking = charged(Status::CheckedOut);
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let corrected = svc
            .execute(RemoveServiceCharge {
                booking_id: booking.id,
                index: 0,
            })
            .await
            .unwrap();

        assert_eq!(corrected.charges.len(), 2);
        assert!(!corrected.charges[0].is_active());
        assert!(corrected.charges[1].is_active());
        assert_eq!(corrected.totals.additional_charges, usd("30"));
        assert_eq!(
            corrected.totals.total.amount,
            booking.totals.total.amount - usd("15").amount,
        );
    }

    #[tokio::test]
    async fn rejects_removing_twice() {
        let booking = charged(Status::CheckedIn);
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;
        let cmd = RemoveServiceCharge {
            booking_id: booking.id,
            index: 1,
        };
        _ = svc.execute(cmd).await.unwrap();

        let err = svc.execute(cmd).await.unwrap_err().into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::ChargeAlreadyRemoved { index: 1 },
            )),
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_index() {
        let booking = charged(Status::CheckedIn);
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(RemoveServiceCharge {
                booking_id: booking.id,
                index: 2,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::Validation(
                ValidationError::ChargeNotExists { index: 2 },
            )),
        ));
    }
}
