//! Postgres database clients.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Every statement runs in its own pooled connection.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to take connections from.
    pub(crate) pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client upon the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Takes a [`Connection`] from the pool.
    async fn connection(
        &self,
    ) -> Result<connection::NonTx, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

/// Transactional Postgres database client.
///
/// The transaction is opened lazily, by the first executed statement, so
/// clones of a [`Tx`] client share a single transaction.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to take the connection from.
    pool: connection::Pool,

    /// Transaction opened by this client, if any.
    tx: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client sharing the pool of the provided [`NonTx`]
    /// one.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the transaction of this [`Tx`] client, opening it if needed.
    async fn connection(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut tx = self.tx.lock().await;
        if tx.is_none() {
            let pooled = self
                .pool
                .get()
                .await
                .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                .map_err(tracerr::map_from)?;
            *tx = Some(
                connection::Tx::begin(pooled)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(MutexGuard::map(tx, |tx| {
            tx.as_mut().expect("opened above")
        }))
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if no statement was executed.
    ///
    /// # Errors
    ///
    /// If the `COMMIT` statement fails.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

/// Implements [`Connection`] for a client by running statements upon its
/// `connection()`.
macro_rules! impl_client_connection {
    ($ty:ty) => {
        impl Connection for $ty {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn batch_exec(
                &self,
                stmt: &str,
            ) -> Result<(), Traced<database::Error>> {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .batch_exec(stmt)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

impl_client_connection!(NonTx);
impl_client_connection!(Tx);
