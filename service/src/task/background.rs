//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Type-erased error of a [`Task`] stopped in the [`Background`].
pub type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Resolves once any of the spawned [`Task`]s fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set driving the spawned [`Task`]s.
    set: task::LocalSet,

    /// Named handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new [`Task`] with the provided `name` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let handle = self
            .set
            .spawn_local(future.map_err(|e| BoxError::from(Box::new(e))));
        self.handles.push((name, handle));
    }

    /// Returns the number of [`Task`]s spawned in this [`Background`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Indicates whether no [`Task`] has been spawned in this [`Background`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(name, handle)| {
            handle
                .map(move |res| {
                    let res = res
                        .map_err(|e| BoxError::from(Box::new(e)))
                        .and_then(|r| r);
                    if let Err(e) = &res {
                        log::error!("`{name}` background task stopped: {e}");
                    }
                    res
                })
                .boxed_local()
        });
        future::try_join_all(tasks.chain([set.map(Ok).boxed_local()]))
            .map_ok(drop)
            .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use derive_more::{Display, Error};

    use super::Background;

    #[derive(Debug, Display, Error)]
    #[display("broken")]
    struct Broken;

    #[tokio::test]
    async fn fails_once_any_task_fails() {
        let mut bg = Background::default();
        bg.spawn("ok", async { Ok::<_, Broken>(()) });
        bg.spawn("broken", async { Err(Broken) });
        assert_eq!(bg.len(), 2);

        let err = bg.await.unwrap_err();

        assert_eq!(err.to_string(), "broken");
    }

    #[tokio::test]
    async fn completes_once_all_tasks_complete() {
        let mut bg = Background::default();
        assert!(bg.is_empty());
        bg.spawn("first", async { Ok::<_, Broken>(()) });
        bg.spawn("second", async { Ok::<_, Broken>(()) });

        bg.await.unwrap();
    }
}
