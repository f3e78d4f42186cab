//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, Conflict, Reservation, ValidationError},
        room, Booking, Room,
    },
    infra::{database, Database},
    read::booking::{Hold, Holds},
    Service,
};

use super::Command;

/// [`Command`] for reserving a [`Room`] as a new
/// [`booking::Status::Pending`] [`Booking`].
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`Room`] to be reserved.
    pub room_id: room::Id,

    /// [`Reservation`] details.
    pub reservation: Reservation,
}

impl<Db> Command<CreateBooking> for Service<Db>
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
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            room_id,
            reservation,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let booking = reserve(
            &tx,
            room_id,
            reservation,
            None,
            &self.config().booking,
            DateTime::now(),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?
        .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {}, number: {})` reserved `Room(id: {room_id})` \
             for {}",
            booking.id,
            booking.number,
            booking.stay,
        );

        Ok(booking)
    }
}

/// Reserves the [`Room`] with the provided ID inside the provided
/// transaction, storing the reserved [`Booking`].
///
/// The transaction is neither committed nor rolled back here.
///
/// # Errors
///
/// Outer error is a [`Database`] failure, aborting the whole transaction.
/// Inner [`Failure`] rejects this reservation only.
pub(crate) async fn reserve<Tx>(
    tx: &Tx,
    room_id: room::Id,
    reservation: Reservation,
    group_id: Option<booking::GroupId>,
    policy: &booking::Policy,
    now: DateTime,
) -> Result<Result<Booking, Failure>, Traced<database::Error>>
where
    Tx: Database<Lock<By<Room, room::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Hold>, Holds>>,
            Ok = Vec<Hold>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>,
{
    // Avoid concurrent reservations of the same `Room`.
    tx.execute(Lock(By::<Room, _>::new(room_id)))
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

    let Some(room) = tx
        .execute(Select(By::<Option<Room>, _>::new(room_id)))
        .await
        .map_err(tracerr::wrap!())?
    else {
        return Ok(Err(Failure::RoomNotExists(room_id)));
    };

    let booking =
        match Booking::reserve(&room, reservation, group_id, policy, now) {
            Ok(b) => b,
            Err(e) => return Ok(Err(Failure::Invalid(e))),
        };

    let holds = tx
        .execute(Select(By::<Vec<Hold>, _>::new(Holds {
            room_id,
            window: booking.stay,
        })))
        .await
        .map_err(tracerr::wrap!())?;
    if !holds.is_empty() {
        return Ok(Err(Failure::Conflict(Conflict {
            room_id,
            bookings: holds,
        })));
    }

    match tx.execute(Insert(booking.clone())).await {
        Ok(_) => Ok(Ok(booking)),
        // Lost the race to a concurrent reservation the lock didn't see.
        Err(e) if e.as_ref().is_overlap() => Ok(Err(Failure::Conflict(
            Conflict {
                room_id,
                bookings: vec![],
            },
        ))),
        Err(e) => Err(e).map_err(tracerr::wrap!()),
    }
}

/// Reason of a single [`Room`] reservation failure.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum Failure {
    /// [`Room`] is already held for the requested dates.
    #[display("{_0}")]
    Conflict(Conflict),

    /// [`Reservation`] is not valid for the [`Room`].
    #[display("{_0}")]
    Invalid(ValidationError),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Room`] is already held for the requested dates.
    #[display("{_0}")]
    Conflict(Conflict),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Reservation`] is not valid.
    #[display("Invalid reservation: {_0}")]
    Invalid(ValidationError),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

impl From<Failure> for ExecutionError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Conflict(c) => Self::Conflict(c),
            Failure::Invalid(e) => Self::Invalid(e),
            Failure::RoomNotExists(id) => Self::RoomNotExists(id),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateRange;
    use futures::future;

    use crate::{
        command::fixture,
        domain::{
            booking::{Status, ValidationError},
            fixture::{reservation, room, usd},
            room,
        },
        query::room::Availability,
        Command as _,
    };

    use super::{CreateBooking, ExecutionError};

    #[tokio::test]
    async fn reserves_free_room() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;

        let booking = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(30), fixture::day(32)),
            })
            .await
            .unwrap();

        assert_eq!(booking.status, Status::Pending);
        assert_eq!(booking.nights(), 2);
        assert_eq!(booking.totals.subtotal, usd("400"));
        assert_eq!(booking.group_id, None);
        assert_eq!(fixture::load(&svc, booking.id).await, booking);
    }

    #[tokio::test]
    async fn rejects_overlapping_stay() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let first = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(30), fixture::day(32)),
            })
            .await
            .unwrap();

        let err = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(31), fixture::day(33)),
            })
            .await
            .unwrap_err()
            .into_inner();

        let ExecutionError::Conflict(conflict) = err else {
            panic!("expected `Conflict`, got: {err}");
        };
        assert_eq!(conflict.room_id, room.id);
        assert_eq!(conflict.bookings, [first.hold().unwrap()]);

        // Check-out day is free for the next check-in.
        _ = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(32), fixture::day(33)),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lets_single_racer_win() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let reserve = |from, to| {
            svc.execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(from), fixture::day(to)),
            })
        };

        let (a, b) = future::join(reserve(10, 13), reserve(12, 14)).await;

        assert!(a.is_ok() != b.is_ok(), "exactly one must win");
        let err = a.and(b).unwrap_err().into_inner();
        assert!(matches!(err, ExecutionError::Conflict(_)), "{err}");
    }

    #[tokio::test]
    async fn keeps_room_available_on_failure() {
        let mut room = room("200");
        room.is_active = false;
        let svc = fixture::service(&[&room]).await;
        let (check_in, check_out) = (fixture::day(5), fixture::day(7));

        let err = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(check_in, check_out),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Invalid(ValidationError::RoomInactive { .. }),
        ));
        assert!(svc
            .execute(Availability {
                room_id: room.id,
                stay: DateRange::new(check_in, check_out).unwrap(),
            })
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn validates_reservation() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let create = |check_in, check_out| CreateBooking {
            room_id: room.id,
            reservation: reservation(check_in, check_out),
        };

        let svc = &svc;
        let err = |cmd: CreateBooking| async move {
            svc.execute(cmd).await.unwrap_err().into_inner()
        };

        assert!(matches!(
            err(create(fixture::day(3), fixture::day(3))).await,
            ExecutionError::Invalid(ValidationError::EmptyStay),
        ));
        assert!(matches!(
            err(create(fixture::day(-1), fixture::day(1))).await,
            ExecutionError::Invalid(ValidationError::CheckInInPast { .. }),
        ));
        assert!(matches!(
            err(create(fixture::day(1), fixture::day(32))).await,
            ExecutionError::Invalid(ValidationError::StayTooLong {
                nights: 31,
            }),
        ));

        let missing = room::Id::new();
        assert!(matches!(
            err(CreateBooking {
                room_id: missing,
                ..create(fixture::day(1), fixture::day(2))
            })
            .await,
            ExecutionError::RoomNotExists(id) if id == missing,
        ));
    }
}
