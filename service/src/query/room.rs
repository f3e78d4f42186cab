//! [`Query`] collection related to a single [`Room`].

use common::{
    operations::{By, Select},
    DateRange,
};
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{database, Database},
    read::{self, booking::Hold},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Room`] by its [`room::Id`].
pub type ById = DatabaseQuery<By<Option<Room>, room::Id>>;

/// [`Query`] checking whether a [`Room`] is not held by any `Booking` for
/// any of the nights of a stay.
///
/// Existence of the [`Room`] is not checked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Availability {
    /// ID of the [`Room`] to check.
    pub room_id: room::Id,

    /// Nights of the stay.
    pub stay: DateRange,
}

impl<Db> Query<Availability> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Hold>, read::booking::Holds>>,
        Ok = Vec<Hold>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Availability { room_id, stay }: Availability,
    ) -> Result<Self::Ok, Self::Err> {
        let holds = self
            .database()
            .execute(Select(By::<Vec<Hold>, _>::new(read::booking::Holds {
                room_id,
                window: stay,
            })))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(holds.is_empty())
    }
}

/// [`Query`] of the nights a [`Room`] is held for within a window, as
/// sorted disjoint [`DateRange`]s.
///
/// Touching ranges are merged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnavailableDates {
    /// ID of the [`Room`].
    pub room_id: room::Id,

    /// Dates to look within.
    pub window: DateRange,
}

impl<Db> Query<UnavailableDates> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Hold>, read::booking::Holds>>,
        Ok = Vec<Hold>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<DateRange>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        UnavailableDates { room_id, window }: UnavailableDates,
    ) -> Result<Self::Ok, Self::Err> {
        let holds = self
            .database()
            .execute(Select(By::<Vec<Hold>, _>::new(read::booking::Holds {
                room_id,
                window,
            })))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(DateRange::union(
            holds
                .into_iter()
                .filter_map(|h| h.stay.intersection(&window)),
        ))
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{Insert, Update},
        Date, DateRange,
    };

    use crate::{
        domain::{booking::Status, fixture},
        infra::{Database as _, Memory},
        Service,
    };

    use super::{Availability, UnavailableDates};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    #[tokio::test]
    async fn checks_half_open_availability() {
        let db = Memory::new();
        let room = fixture::room("100");
        db.execute(Insert(room.clone())).await.unwrap();
        db.execute(Insert(fixture::booking_of(
            &room,
            date("2024-06-10"),
            date("2024-06-12"),
        )))
        .await
        .unwrap();
        let svc = Service::mock(db);

        let available = |stay| {
            svc.execute(Availability {
                room_id: room.id,
                stay,
            })
        };
        assert!(!available(range("2024-06-11", "2024-06-13")).await.unwrap());
        assert!(!available(range("2024-06-01", "2024-06-30")).await.unwrap());
        assert!(available(range("2024-06-12", "2024-06-14")).await.unwrap());
        assert!(available(range("2024-06-08", "2024-06-10")).await.unwrap());
    }

    #[tokio::test]
    async fn merges_unavailable_dates() {
        let db = Memory::new();
        let room = fixture::room("100");
        db.execute(Insert(room.clone())).await.unwrap();
        for (from, to) in [
            ("2024-06-01", "2024-06-03"),
            ("2024-06-03", "2024-06-05"),
            ("2024-06-10", "2024-06-12"),
            ("2024-06-20", "2024-06-25"),
        ] {
            db.execute(Insert(fixture::booking_of(&room, date(from), date(to))))
                .await
                .unwrap();
        }
        let mut released =
            fixture::booking_of(&room, date("2024-06-15"), date("2024-06-17"));
        released.status = Status::Cancelled;
        db.execute(Update(released)).await.unwrap();
        let svc = Service::mock(db);

        let dates = svc
            .execute(UnavailableDates {
                room_id: room.id,
                window: range("2024-06-02", "2024-06-22"),
            })
            .await
            .unwrap();

        assert_eq!(
            dates,
            [
                range("2024-06-02", "2024-06-05"),
                range("2024-06-10", "2024-06-12"),
                range("2024-06-20", "2024-06-22"),
            ],
        );
    }
}
