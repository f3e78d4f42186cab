//! [`Command`] for completing a [`Booking`].

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

/// [`Command`] for closing a [`booking::Status::CheckedOut`] [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct CompleteBooking {
    /// ID of the [`Booking`] to be completed.
    pub booking_id: booking::Id,
}

impl<Db> Command<CompleteBooking> for Service<Db>
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
        CompleteBooking { booking_id }: CompleteBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let (booking, ()) = self
            .transit_booking(booking_id, |b| b.complete(now))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("`Booking(id: {booking_id})` completed");

        Ok(booking)
    }
}

/// Error of [`CompleteBooking`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;
