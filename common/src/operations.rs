//! Abstract operations and the [`Handler`] executing them.

use std::{future::Future, marker::PhantomData};

/// Executable handler of some `Args`.
///
/// Commands, queries, database operations and background tasks are all
/// [`Handler`]s of the corresponding operation types.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// Operation to insert a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to update a value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to select a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to lock a value until the end of the current transaction.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Operation to start a long-running value.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation to perform a single iteration of a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Operation to open a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Transact`]ed value.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Operation to commit a transaction.
///
/// A transaction dropped without being committed is rolled back.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W` by `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns a reference to the inner value.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
