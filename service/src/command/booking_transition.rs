//! Transactional transition of a single [`Booking`].
//!
//! Shared by the [`Command`]s changing nothing but the [`Booking`] itself.
//!
//! [`Command`]: super::Command

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

impl<Db> Service<Db> {
    /// Applies the provided `transition` to the [`Booking`] with the provided
    /// ID inside a single transaction, storing the result.
    ///
    /// Nothing is stored if the `transition` fails.
    pub(crate) async fn transit_booking<T>(
        &self,
        booking_id: booking::Id,
        transition: impl FnOnce(&mut Booking) -> Result<T, booking::Rejection>,
    ) -> Result<(Booking, T), Traced<ExecutionError>>
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
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Booking`.
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let output =
            transition(&mut booking).map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok((booking, output))
    }
}

/// Error of a [`Booking`] transition.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] rejected the transition.
    #[display("`Booking` rejected the operation: {_0}")]
    #[from]
    Rejected(booking::Rejection),
}
