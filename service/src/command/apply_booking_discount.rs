//! [`Command`] for applying a discount to a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for replacing the discount of a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct ApplyBookingDiscount {
    /// ID of the [`Booking`] to be discounted.
    pub booking_id: booking::Id,

    /// Discount amount, in the [`Booking`]'s currency.
    ///
    /// Replaces any previously applied discount.
    pub amount: Money,
}

impl<Db> Command<ApplyBookingDiscount> for Service<Db>
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
        ApplyBookingDiscount { booking_id, amount }: ApplyBookingDiscount,
    ) -> Result<Self::Ok, Self::Err> {
        let policy = &self.config().booking;
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.apply_discount(amount, policy))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` discounted by {amount}");

        Ok(booking)
    }
}

/// Error of [`ApplyBookingDiscount`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;
