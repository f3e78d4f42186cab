//! [`Database`] implementations for [`Memory`].

use common::operations::{By, Commit, Insert, Lock, Select, Transact, Update};
use tracerr::Traced;

use crate::{
    domain::{booking, room, Booking, Room},
    infra::{database, Database},
    read,
};

use super::{Access, Memory, NonTx, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.begin().await)
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

// A `Memory<Tx>` owns the whole `State` exclusively, so there is nothing left
// to lock.
impl Database<Lock<By<Room, room::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Booking, booking::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<T: Access> Database<Select<By<Option<Room>, room::Id>>> for Memory<T> {
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.rooms.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Insert<Room>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            _ = s.rooms.insert(room.id, room);
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Update<Room>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(room)).await.map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Select<By<Option<Booking>, booking::Id>>>
    for Memory<T>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.bookings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Select<By<Option<Booking>, booking::Number>>>
    for Memory<T>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        self.read(|s| {
            s.bookings.values().find(|b| b.number == number).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Select<By<Vec<Booking>, booking::GroupId>>>
    for Memory<T>
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, booking::GroupId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let group_id = by.into_inner();
        self.read(|s| {
            let mut group = s
                .bookings
                .values()
                .filter(|b| b.group_id == Some(group_id))
                .cloned()
                .collect::<Vec<_>>();
            group.sort_by(|a, b| {
                a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
            });
            group
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Select<By<Vec<read::booking::Hold>, read::booking::Holds>>>
    for Memory<T>
{
    type Ok = Vec<read::booking::Hold>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::Hold>, read::booking::Holds>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Holds { room_id, window } = by.into_inner();
        self.read(|s| {
            let mut holds = s
                .bookings
                .values()
                .filter(|b| b.room_id == room_id)
                .filter_map(Booking::hold)
                .filter(|h| h.stay.overlaps(&window))
                .collect::<Vec<_>>();
            holds.sort_by_key(|h| (h.stay.start(), h.booking_id));
            holds
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Select<By<Vec<booking::Id>, read::booking::Overdue>>>
    for Memory<T>
{
    type Ok = Vec<booking::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<booking::Id>, read::booking::Overdue>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Overdue(today) = by.into_inner();
        self.read(|s| {
            let mut ids = s
                .bookings
                .values()
                .filter(|b| {
                    b.status == booking::Status::Confirmed
                        && b.stay.start() < today
                })
                .map(|b| b.id)
                .collect::<Vec<_>>();
            ids.sort();
            ids
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access>
    Database<
        Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    > for Memory<T>
{
    type Ok = read::booking::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Selector {
            arguments,
            filter,
            sort,
        } = by.into_inner();
        self.read(|s| {
            let mut found = s
                .bookings
                .values()
                .filter(|b| filter.matches(b))
                .collect::<Vec<_>>();
            found.sort_by(|a, b| sort.order.apply(sort.by.compare(a, b)));
            read::booking::list::Page {
                total: found.len(),
                items: found
                    .into_iter()
                    .skip(arguments.offset())
                    .take(arguments.size())
                    .cloned()
                    .collect(),
                arguments,
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Insert<Booking>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| s.store_booking(booking))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Access> Database<Update<Booking>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Insert(booking)).await.map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        Date, DateRange,
    };

    use crate::{
        domain::{booking, fixture, Booking, Room},
        infra::{Database, Memory},
        read,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    async fn stored(db: &Memory, id: booking::Id) -> Option<Booking> {
        db.execute(Select(By::<Option<Booking>, _>::new(id)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn publishes_only_committed_changes() {
        let db = Memory::new();
        let room = fixture::room("100");
        let booking =
            fixture::booking_of(&room, date("2024-06-01"), date("2024-06-03"));

        {
            let tx = db.execute(Transact).await.unwrap();
            tx.execute(Insert(booking.clone())).await.unwrap();
        }
        assert_eq!(stored(&db, booking.id).await, None);

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(booking.clone())).await.unwrap();
        tx.execute(Commit).await.unwrap();
        assert_eq!(stored(&db, booking.id).await, Some(booking));

        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn rejects_overlapping_holds() {
        let db = Memory::new();
        let room = fixture::room("100");
        db.execute(Insert(room.clone())).await.unwrap();
        let first =
            fixture::booking_of(&room, date("2024-06-01"), date("2024-06-03"));
        let second =
            fixture::booking_of(&room, date("2024-06-02"), date("2024-06-03"));
        let adjacent =
            fixture::booking_of(&room, date("2024-06-03"), date("2024-06-05"));

        db.execute(Insert(first.clone())).await.unwrap();
        let err = db.execute(Insert(second.clone())).await.unwrap_err();
        assert!(err.into_inner().is_overlap());
        db.execute(Insert(adjacent)).await.unwrap();

        let mut cancelled = first;
        cancelled.status = booking::Status::Cancelled;
        db.execute(Insert(cancelled)).await.unwrap();
        db.execute(Insert(second)).await.unwrap();
    }

    #[tokio::test]
    async fn selects_holds_within_window() {
        let db = Memory::new();
        let room = fixture::room("100");
        let other: Room = fixture::room("100");
        for (r, from, to) in [
            (&room, "2024-06-01", "2024-06-03"),
            (&room, "2024-06-10", "2024-06-12"),
            (&other, "2024-06-01", "2024-06-03"),
        ] {
            db.execute(Insert(fixture::booking_of(r, date(from), date(to))))
                .await
                .unwrap();
        }

        let holds = db
            .execute(Select(By::<Vec<read::booking::Hold>, _>::new(
                read::booking::Holds {
                    room_id: room.id,
                    window: DateRange::new(
                        date("2024-06-02"),
                        date("2024-06-11"),
                    )
                    .unwrap(),
                },
            )))
            .await
            .unwrap();

        assert_eq!(holds.len(), 2);
        assert_eq!(holds[0].stay.start(), date("2024-06-01"));
        assert_eq!(holds[1].stay.start(), date("2024-06-10"));
    }

    #[tokio::test]
    async fn pages_search_results() {
        let db = Memory::new();
        let room = fixture::room("100");
        let mut start = date("2024-06-01");
        for _ in 0..5 {
            let end = start.add_days(1).unwrap();
            db.execute(Insert(fixture::booking_of(&room, start, end)))
                .await
                .unwrap();
            start = end;
        }

        let page = db
            .execute(Select(By::<read::booking::list::Page, _>::new(
                read::booking::list::Selector {
                    arguments: read::booking::list::Arguments::new(
                        Some(1),
                        Some(2),
                    )
                    .unwrap(),
                    filter: read::booking::list::Filter {
                        room_id: Some(room.id),
                        ..read::booking::list::Filter::default()
                    },
                    sort: read::booking::list::Sort {
                        by: read::booking::list::SortField::CheckIn,
                        order: common::pagination::Order::Ascending,
                    },
                },
            )))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        let starts =
            page.items.iter().map(|b| b.stay.start()).collect::<Vec<_>>();
        assert_eq!(starts, [date("2024-06-03"), date("2024-06-04")]);
    }
}
