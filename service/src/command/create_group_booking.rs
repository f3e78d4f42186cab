//! [`Command`] for creating a group of [`Booking`]s atomically.

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, Occupancy, Reservation, ValidationError},
        guest, room, Booking, Room,
    },
    infra::{database, Database},
    read::booking::{Hold, Holds},
    Service,
};

use super::{create_booking::reserve, Command};

pub use super::create_booking::Failure;

/// [`Command`] for reserving several [`Room`]s for the same guest as
/// [`Booking`]s sharing one [`booking::GroupId`].
///
/// Either all the [`Room`]s are reserved, or none of them.
#[derive(Clone, Debug)]
pub struct CreateGroupBooking {
    /// ID of the guest making the reservation.
    pub guest_id: guest::Id,

    /// Contact data of the primary guest.
    pub guest: guest::Info,

    /// Requested [`Room`]s with their stays.
    pub rooms: Vec<RoomRequest>,

    /// Special requests of the guests, shared by all the [`Booking`]s.
    pub special_requests: Option<booking::Note>,
}

/// Request of a single [`Room`] within a [`CreateGroupBooking`].
#[derive(Clone, Copy, Debug)]
pub struct RoomRequest {
    /// ID of the [`Room`] to be reserved.
    pub room_id: room::Id,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,

    /// [`Occupancy`] of the [`Room`].
    pub occupancy: Occupancy,
}

impl<Db> Command<CreateGroupBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Hold>, Holds>>,
            Ok = Vec<Hold>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    /// Reserved [`Booking`]s in the order of the requested [`Room`]s.
    type Ok = Vec<Booking>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateGroupBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateGroupBooking {
            guest_id,
            guest,
            rooms,
            special_requests,
        } = cmd;

        if rooms.is_empty() {
            return Err(tracerr::new!(E::Invalid(ValidationError::EmptyGroup)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let group_id = booking::GroupId::new();
        let policy = self.config().booking;
        let now = DateTime::now();

        let mut reserved = Vec::with_capacity(rooms.len());
        let mut failures = vec![];
        // `Room`s are locked in ascending ID order to avoid deadlocks with
        // concurrent groups.
        let mut requests = rooms.into_iter().enumerate().collect::<Vec<_>>();
        requests.sort_by_key(|(_, r)| r.room_id);
        for (order, request) in requests {
            let reservation = Reservation {
                guest_id,
                guest: guest.clone(),
                check_in: request.check_in,
                check_out: request.check_out,
                occupancy: request.occupancy,
                special_requests: special_requests.clone(),
            };
            match reserve(
                &tx,
                request.room_id,
                reservation,
                Some(group_id),
                &policy,
                now,
            )
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            {
                Ok(booking) => reserved.push((order, booking)),
                Err(failure) => failures.push((request.room_id, failure)),
            }
        }
        if !failures.is_empty() {
            // Dropping the transaction discards the reserved `Booking`s.
            return Err(tracerr::new!(E::GroupPartialFailure(GroupFailure {
                failures,
            })));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`BookingGroup(id: {group_id})` reserved {} `Room`s",
            reserved.len(),
        );

        reserved.sort_by_key(|(order, _)| *order);
        Ok(reserved.into_iter().map(|(_, booking)| booking).collect())
    }
}

/// Failed [`Room`] reservations of a [`CreateGroupBooking`].
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("{} of the requested rooms cannot be reserved", failures.len())]
pub struct GroupFailure {
    /// [`Failure`] of every failed [`Room`], in ascending [`room::Id`]
    /// order.
    #[error(not(source))]
    pub failures: Vec<(room::Id, Failure)>,
}

/// Error of [`CreateGroupBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Some of the [`Room`]s cannot be reserved, so none is.
    #[display("{_0}")]
    GroupPartialFailure(GroupFailure),

    /// Group request is not valid.
    #[display("Invalid group reservation: {_0}")]
    Invalid(ValidationError),
}

#[cfg(test)]
mod spec {
    use common::DateRange;

    use crate::{
        command::{fixture, CreateBooking},
        domain::{
            booking::{Occupancy, Status, ValidationError},
            fixture::{guest, reservation, room},
            guest,
            room::Room,
        },
        infra::Memory,
        query::room::Availability,
        Command as _, Service,
    };

    use super::{CreateGroupBooking, ExecutionError, Failure, RoomRequest};

    fn group(requests: &[(&Room, i64, i64)]) -> CreateGroupBooking {
        CreateGroupBooking {
            guest_id: guest::Id::new(),
            guest: guest(),
            rooms: requests
                .iter()
                .map(|(room, from, to)| RoomRequest {
                    room_id: room.id,
                    check_in: fixture::day(*from),
                    check_out: fixture::day(*to),
                    occupancy: Occupancy {
                        adults: 2,
                        children: 0,
                    },
                })
                .collect(),
            special_requests: None,
        }
    }

    async fn is_available(svc: &Service<Memory>, room: &Room) -> bool {
        svc.execute(Availability {
            room_id: room.id,
            stay: DateRange::new(fixture::day(10), fixture::day(12)).unwrap(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn reserves_all_rooms_in_one_group() {
        let rooms = [room("100"), room("150"), room("200")];
        let svc = fixture::service(&[&rooms[0], &rooms[1], &rooms[2]]).await;

        let bookings = svc
            .execute(group(&[
                (&rooms[2], 10, 12),
                (&rooms[0], 10, 12),
                (&rooms[1], 10, 12),
            ]))
            .await
            .unwrap();

        assert_eq!(bookings.len(), 3);
        assert_eq!(bookings[0].room_id, rooms[2].id);
        assert_eq!(bookings[1].room_id, rooms[0].id);
        assert_eq!(bookings[2].room_id, rooms[1].id);
        let group_id = bookings[0].group_id.unwrap();
        for booking in &bookings {
            assert_eq!(booking.group_id, Some(group_id));
            assert_eq!(booking.status, Status::Pending);
            assert_eq!(fixture::load(&svc, booking.id).await, *booking);
        }
    }

    #[tokio::test]
    async fn reserves_nothing_if_any_room_is_held() {
        let rooms = [room("100"), room("150"), room("200")];
        let svc = fixture::service(&[&rooms[0], &rooms[1], &rooms[2]]).await;
        let held = svc
            .execute(CreateBooking {
                room_id: rooms[1].id,
                reservation: reservation(fixture::day(11), fixture::day(13)),
            })
            .await
            .unwrap();

        let err = svc
            .execute(group(&[
                (&rooms[0], 10, 12),
                (&rooms[1], 10, 12),
                (&rooms[2], 10, 12),
            ]))
            .await
            .unwrap_err()
            .into_inner();

        let ExecutionError::GroupPartialFailure(failure) = err else {
            panic!("expected `GroupPartialFailure`, got: {err}");
        };
        assert_eq!(failure.failures.len(), 1);
        let (room_id, Failure::Conflict(conflict)) = &failure.failures[0]
        else {
            panic!("expected `Conflict`, got: {failure}");
        };
        assert_eq!(*room_id, rooms[1].id);
        assert_eq!(conflict.bookings, [held.hold().unwrap()]);

        assert!(is_available(&svc, &rooms[0]).await);
        assert!(!is_available(&svc, &rooms[1]).await);
        assert!(is_available(&svc, &rooms[2]).await);
    }

    #[tokio::test]
    async fn collects_every_failure() {
        let rooms = [room("100"), room("150")];
        let mut inactive = room("200");
        inactive.is_active = false;
        let svc = fixture::service(&[&rooms[0], &rooms[1], &inactive]).await;

        // Same `Room` twice with overlapping stays conflicts with itself.
        let err = svc
            .execute(group(&[
                (&rooms[0], 10, 12),
                (&rooms[1], 10, 12),
                (&rooms[1], 11, 13),
                (&inactive, 10, 12),
            ]))
            .await
            .unwrap_err()
            .into_inner();

        let ExecutionError::GroupPartialFailure(failure) = err else {
            panic!("expected `GroupPartialFailure`, got: {err}");
        };
        assert_eq!(failure.failures.len(), 2);
        assert!(failure.failures.iter().any(|(id, f)| *id == rooms[1].id
            && matches!(f, Failure::Conflict(_))));
        assert!(failure.failures.iter().any(|(id, f)| *id == inactive.id
            && matches!(
                f,
                Failure::Invalid(ValidationError::RoomInactive { .. }),
            )));
        assert!(is_available(&svc, &rooms[0]).await);
        assert!(is_available(&svc, &rooms[1]).await);
    }

    #[tokio::test]
    async fn rejects_empty_group() {
        let svc = fixture::service(&[]).await;

        let err = svc.execute(group(&[])).await.unwrap_err().into_inner();

        assert!(matches!(
            err,
            ExecutionError::Invalid(ValidationError::EmptyGroup),
        ));
    }
}
