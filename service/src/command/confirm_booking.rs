//! [`Command`] for confirming a [`Booking`].

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

/// [`Command`] for confirming a [`booking::Status::Pending`] [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct ConfirmBooking {
    /// ID of the [`Booking`] to be confirmed.
    pub booking_id: booking::Id,
}

impl<Db> Command<ConfirmBooking> for Service<Db>
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
        ConfirmBooking { booking_id }: ConfirmBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.confirm(now))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` confirmed");

        Ok(booking)
    }
}

/// Error of [`ConfirmBooking`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;
