//! In-memory [`Database`] implementation.
//!
//! [`Database`]: crate::infra::Database

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{booking, room, Booking, Room},
    infra::database,
};

/// In-memory [`Database`] holding all the data in a single [`State`].
///
/// Transactions are serialized: a [`Memory<Tx>`] holds the whole [`State`]
/// locked until it's committed or dropped.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Debug, Default)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Non-transactional access to a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct NonTx(Arc<Mutex<State>>);

/// Transactional access to a [`Memory`] database.
///
/// Works on a staged copy of the [`State`], published on commit.
#[derive(Clone, Debug)]
pub struct Tx(Arc<Mutex<Option<Staged>>>);

/// Staged changes of a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Lock of the published [`State`].
    published: OwnedMutexGuard<State>,

    /// Copy of the published [`State`] with the changes applied.
    state: State,
}

/// Data stored in a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Room`]s.
    rooms: HashMap<room::Id, Room>,

    /// Stored [`Booking`]s.
    bookings: HashMap<booking::Id, Booking>,
}

impl State {
    /// Stores the provided [`Booking`], replacing its previous version.
    ///
    /// # Errors
    ///
    /// If the [`Booking`] holds its [`Room`] for nights already held by
    /// another [`Booking`].
    fn store_booking(&mut self, booking: Booking) -> Result<(), Error> {
        if booking.status.is_holding() {
            let overlapping = self.bookings.values().find(|b| {
                b.id != booking.id
                    && b.room_id == booking.room_id
                    && b.status.is_holding()
                    && b.stay.overlaps(&booking.stay)
            });
            if let Some(other) = overlapping {
                return Err(Error::Overlap {
                    room_id: booking.room_id,
                    booking_id: booking.id,
                    other_id: other.id,
                });
            }
        }
        _ = self.bookings.insert(booking.id, booking);
        Ok(())
    }
}

/// Access to the [`State`] of a [`Memory`] database.
pub trait Access {
    /// Reads the [`State`] with the provided function.
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`State`] with the provided function.
    ///
    /// The function must leave the [`State`] untouched if it fails.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

impl Access for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.0.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        f(&mut *self.0.lock().await)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Access for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let staged = self.0.lock().await;
        let staged = staged
            .as_ref()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&staged.state))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut staged = self.0.lock().await;
        let staged = staged
            .as_mut()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        f(&mut staged.state)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<T: Access> Access for Memory<T> {
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>> {
        self.0.read(f)
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>> {
        self.0.write(f)
    }
}

impl Memory<NonTx> {
    /// Starts a new transaction, waiting for the running one to finish.
    async fn begin(&self) -> Memory<Tx> {
        let published = Arc::clone(&self.0 .0).lock_owned().await;
        let state = published.clone();
        Memory(Tx(Arc::new(Mutex::new(Some(Staged { published, state })))))
    }
}

impl Memory<Tx> {
    /// Publishes the staged changes of this transaction.
    ///
    /// # Errors
    ///
    /// If this transaction has been committed already.
    async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Staged {
            mut published,
            state,
        } = self
            .0
             .0
            .lock()
            .await
            .take()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *published = state;
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Holding [`Booking`]s of the same [`Room`] overlap in their stays.
    #[display(
        "`Booking(id: {booking_id})` overlaps `Booking(id: {other_id})` \
         in `Room(id: {room_id})`"
    )]
    Overlap {
        /// ID of the [`Room`].
        #[error(not(source))]
        room_id: room::Id,

        /// ID of the [`Booking`] being stored.
        #[error(not(source))]
        booking_id: booking::Id,

        /// ID of the already stored [`Booking`].
        #[error(not(source))]
        other_id: booking::Id,
    },

    /// Transaction is committed already.
    #[display("transaction is finished")]
    Finished,
}
