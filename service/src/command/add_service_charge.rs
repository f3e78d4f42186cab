//! [`Command`] for adding a service [`Charge`] to a [`Booking`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::booking::Charge;
use crate::{
    domain::{
        booking::{self, charge},
        Booking,
    },
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for appending a service [`Charge`] to the ledger of a
/// [`booking::Status::CheckedIn`] [`Booking`].
#[derive(Clone, Debug)]
pub struct AddServiceCharge {
    /// ID of the [`Booking`] to be charged.
    pub booking_id: booking::Id,

    /// [`charge::Kind`] of the [`Charge`].
    pub kind: charge::Kind,

    /// Number of charged units.
    pub quantity: u16,

    /// Price of a single unit, in the [`Booking`]'s currency.
    pub unit_price: Money,

    /// Description of the [`Charge`].
    pub description: Option<booking::Note>,
}

impl<Db> Command<AddServiceCharge> for Service<Db>
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
        cmd: AddServiceCharge,
    ) -> Result<Self::Ok, Self::Err> {
        let AddServiceCharge {
            booking_id,
            kind,
            quantity,
            unit_price,
            description,
        } = cmd;

        let now = DateTime::now();
        let (booking, index) = self
            .transit_booking(booking_id, |b| {
                b.add_charge(kind, quantity, unit_price, description, now)
            })
            .await
            .map_err(tracerr::wrap!())?;

        log::info!(
            "`Booking(id: {booking_id})` charged with #{index} service \
             charge of {quantity} x {unit_price}",
        );

        Ok(booking)
    }
}

/// Error of [`AddServiceCharge`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;
