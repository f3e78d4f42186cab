//! [`MarkNoShows`] [`Task`].

use std::{convert::Infallible, error::Error, fmt, time};

use common::{
    operations::{By, Perform, Select, Start},
    Date,
};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::MarkBookingNoShow,
    domain::booking,
    infra::{database, Database},
    read::booking::Overdue,
    Command, Service,
};

use super::Task;

/// Configuration for [`MarkNoShows`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between sweeps of overdue `Booking`s.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,
}

/// [`Task`] marking [`booking::Status::Confirmed`] `Booking`s, whose guests
/// haven't arrived by the end of their check-in date, as no-shows.
#[derive(Clone, Copy, Debug)]
pub struct MarkNoShows<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<MarkNoShows<Self>, Config>>> for Service<Db>
where
    MarkNoShows<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<MarkNoShows<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = MarkNoShows {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::MarkNoShows` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for MarkNoShows<Service<Db>>
where
    Db: Database<
        Select<By<Vec<booking::Id>, Overdue>>,
        Ok = Vec<booking::Id>,
        Err = Traced<database::Error>,
    >,
    Service<Db>: Command<MarkBookingNoShow, Err: fmt::Display>,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let overdue = self
            .service
            .database()
            .execute(Select(By::<Vec<booking::Id>, _>::new(Overdue(
                Date::today(),
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        let mut marked = 0_usize;
        for booking_id in overdue {
            // A single failure must not stop the sweep.
            match self.service.execute(MarkBookingNoShow { booking_id }).await
            {
                Ok(_) => marked += 1,
                Err(e) => log::error!(
                    "`task::MarkNoShows` failed to mark \
                     `Booking(id: {booking_id})`: {e}",
                ),
            }
        }
        if marked > 0 {
            log::info!("`task::MarkNoShows` marked {marked} no-show(s)");
        }

        Ok(())
    }
}

/// Error of [`MarkNoShows`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use common::operations::Perform;

    use crate::{
        command::fixture,
        domain::{booking::Status, fixture::booking_in},
        Task as _,
    };

    use super::{Config, MarkNoShows};

    #[tokio::test]
    async fn marks_only_overdue_confirmed_bookings() {
        let svc = fixture::service(&[]).await;
        let overdue =
            booking_in(Status::Confirmed, fixture::day(-2), fixture::day(1));
        let today =
            booking_in(Status::Confirmed, fixture::day(0), fixture::day(1));
        let pending =
            booking_in(Status::Pending, fixture::day(-2), fixture::day(1));
        let arrived =
            booking_in(Status::CheckedIn, fixture::day(-2), fixture::day(1));
        for b in [&overdue, &today, &pending, &arrived] {
            fixture::store(&svc, b).await;
        }

        let task = MarkNoShows {
            config: Config::default(),
            service: svc.clone(),
        };
        task.execute(Perform(())).await.unwrap();

        assert_eq!(fixture::load(&svc, overdue.id).await.status, Status::NoShow);
        assert_eq!(fixture::load(&svc, today.id).await.status, Status::Confirmed);
        assert_eq!(fixture::load(&svc, pending.id).await.status, Status::Pending);
        assert_eq!(
            fixture::load(&svc, arrived.id).await.status,
            Status::CheckedIn,
        );
    }
}
