//! [`Command`] for moving a [`Booking`] to other dates.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, Conflict},
        room, Booking, Room,
    },
    infra::{database, Database},
    read::booking::{Hold, Holds},
    Service,
};

use super::Command;

/// [`Command`] for moving the stay of a [`Booking`] not yet checked in to
/// other dates of the same [`Room`].
#[derive(Clone, Copy, Debug)]
pub struct RescheduleBooking {
    /// ID of the [`Booking`] to be rescheduled.
    pub booking_id: booking::Id,

    /// New check-in date.
    pub check_in: Date,

    /// New check-out date.
    pub check_out: Date,
}

impl<Db> Command<RescheduleBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Room, room::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Hold>, Holds>>,
            Ok = Vec<Hold>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RescheduleBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RescheduleBooking {
            booking_id,
            check_in,
            check_out,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Booking`.
        tx.execute(Lock(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        let previous = booking.stay;
        booking
            .reschedule(
                check_in,
                check_out,
                &self.config().booking,
                DateTime::now(),
            )
            .map_err(tracerr::from_and_wrap!(=> E))?;

        // Avoid concurrent reservations of the same `Room`.
        tx.execute(Lock(By::<Room, _>::new(booking.room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let holds = tx
            .execute(Select(By::<Vec<Hold>, _>::new(Holds {
                room_id: booking.room_id,
                window: booking.stay,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|h| h.booking_id != booking_id)
            .collect::<Vec<_>>();
        if !holds.is_empty() {
            return Err(tracerr::new!(E::Conflict(Conflict {
                room_id: booking.room_id,
                bookings: holds,
            })));
        }

        match tx.execute(Update(booking.clone())).await {
            Ok(_) => {}
            Err(e) if e.as_ref().is_overlap() => {
                return Err(tracerr::new!(E::Conflict(Conflict {
                    room_id: booking.room_id,
                    bookings: vec![],
                })));
            }
            Err(e) => {
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {booking_id})` rescheduled from {previous} to {}",
            booking.stay,
        );

        Ok(booking)
    }
}

/// Error of [`RescheduleBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Room`] is held by other [`Booking`]s for the new dates.
    #[display("{_0}")]
    Conflict(Conflict),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] rejected the rescheduling.
    #[display("`Booking` rejected the rescheduling: {_0}")]
    #[from]
    Rejected(booking::Rejection),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{fixture, CreateBooking},
        domain::{
            booking::{Rejection, Status},
            fixture::{booking_in, reservation, room, usd},
        },
        Command as _,
    };

    use super::{ExecutionError, RescheduleBooking};

    #[tokio::test]
    async fn moves_overlapping_itself() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let booking = svc
            .execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(10), fixture::day(12)),
            })
            .await
            .unwrap();

        let moved = svc
            .execute(RescheduleBooking {
                booking_id: booking.id,
                check_in: fixture::day(11),
                check_out: fixture::day(14),
            })
            .await
            .unwrap();

        assert_eq!(moved.stay.start(), fixture::day(11));
        assert_eq!(moved.nights(), 3);
        // 600 + 60 tax + 30 service.
        assert_eq!(moved.totals.total, usd("690"));
        assert_eq!(moved.deposit, usd("207"));
        assert_eq!(fixture::load(&svc, booking.id).await, moved);
    }

    #[tokio::test]
    async fn rejects_dates_held_by_others() {
        let room = room("200");
        let svc = fixture::service(&[&room]).await;
        let reserve = |from, to| {
            svc.execute(CreateBooking {
                room_id: room.id,
                reservation: reservation(fixture::day(from), fixture::day(to)),
            })
        };
        let booking = reserve(10, 12).await.unwrap();
        let other = reserve(14, 16).await.unwrap();

        let err = svc
            .execute(RescheduleBooking {
                booking_id: booking.id,
                check_in: fixture::day(13),
                check_out: fixture::day(15),
            })
            .await
            .unwrap_err()
            .into_inner();

        let ExecutionError::Conflict(conflict) = err else {
            panic!("expected `Conflict`, got: {err}");
        };
        assert_eq!(conflict.bookings, [other.hold().unwrap()]);
        assert_eq!(fixture::load(&svc, booking.id).await, booking);
    }

    #[tokio::test]
    async fn rejects_arrived_guests() {
        let booking =
            booking_in(Status::CheckedIn, fixture::day(0), fixture::day(2));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;

        let err = svc
            .execute(RescheduleBooking {
                booking_id: booking.id,
                check_in: fixture::day(1),
                check_out: fixture::day(3),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(
            err,
            ExecutionError::Rejected(Rejection::InvalidTransition(_)),
        ));
    }
}
