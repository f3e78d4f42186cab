//! [`Connection`] definitions.

use std::{fmt, future::Future};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client as NonTx, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Pooled connection with an open transaction.
#[self_referencing]
pub struct Tx {
    /// Pooled connection the transaction runs in.
    pooled: NonTx,

    /// Open transaction, taken out on commit.
    #[borrows(mut pooled)]
    #[not_covariant]
    tx: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tx")
            .field("tx", self.tx())
            .finish_non_exhaustive()
    }
}

impl Tx {
    /// Returns the open transaction of this [`Tx`].
    fn tx(&self) -> &deadpool_postgres::Transaction<'_> {
        self.with_tx(|tx| tx.as_ref().expect("taken out on commit only"))
    }

    /// Opens a new transaction in the provided pooled connection.
    ///
    /// # Errors
    ///
    /// If the `BEGIN` statement fails.
    pub async fn begin(pooled: NonTx) -> Result<Self, Traced<database::Error>> {
        Self::try_new_async_send(pooled, |c| {
            c.transaction().map_ok(Some).boxed()
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
    }

    /// Commits the transaction of this [`Tx`], returning its connection back
    /// to the pool.
    ///
    /// # Errors
    ///
    /// If the `COMMIT` statement fails.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub async fn commit(mut self) -> Result<(), Traced<database::Error>> {
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "different variance, see \
                      https://doc.rust-lang.org/nomicon/subtyping.html#variance"
        )]
        self.with_tx_mut(|tx| tx.take())
            .expect("committed once")
            .commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Generic database connection.
pub trait Connection {
    /// Runs the provided statement and returns all the resulting rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Runs the provided statement and returns at most one resulting row.
    ///
    /// # Errors
    ///
    /// If the statement fails or returns more than one row.
    fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Runs the provided statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>
    where
        T: ToStatement + ?Sized;

    /// Runs the provided semicolon-separated statements without parameters.
    ///
    /// # Errors
    ///
    /// If any of the statements fails.
    fn batch_exec(
        &self,
        stmt: &str,
    ) -> impl Future<Output = Result<(), Traced<database::Error>>>;
}

/// Implements [`Connection`] for a raw connection by running statements upon
/// the `tokio_postgres` client the `$client` expression returns.
macro_rules! impl_raw_connection {
    ($ty:ty, |$this:ident| $client:expr) => {
        impl Connection for $ty {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                let $this = self;
                $client
                    .execute(stmt, params)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }

            async fn batch_exec(
                &self,
                stmt: &str,
            ) -> Result<(), Traced<database::Error>> {
                let $this = self;
                $client
                    .batch_execute(stmt)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)
            }
        }
    };
}

// `Connection` methods shadow the inherent ones, so the pooled client is
// dereferenced explicitly.
impl_raw_connection!(NonTx, |c| (**c));
impl_raw_connection!(Tx, |c| c.tx());
