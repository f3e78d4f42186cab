//! [`Database`]-related implementations.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    Memory(memory::Error),

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by two holding `Booking`s
    /// of the same `Room` overlapping in their stays.
    #[must_use]
    pub fn is_overlap(&self) -> bool {
        match self {
            Self::Memory(e) => matches!(e, memory::Error::Overlap { .. }),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => {
                e.is_exclusion_violation(postgres::BOOKINGS_STAY_EXCLUSION)
            }
        }
    }
}
