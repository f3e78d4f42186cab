//! [`Command`] for annotating a [`Booking`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::{booking_transition, Command};

/// [`Command`] for replacing admin notes of a [`Booking`] in any state.
#[derive(Clone, Debug)]
pub struct AnnotateBooking {
    /// ID of the [`Booking`] to be annotated.
    pub booking_id: booking::Id,

    /// New admin notes, if any.
    pub notes: Option<booking::Note>,
}

impl<Db> Command<AnnotateBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        AnnotateBooking { booking_id, notes }: AnnotateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        let (booking, ()) = self
            .transit_booking(booking_id, |b| {
                b.annotate(notes);
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())?;

        log::debug!("`Booking(id: {booking_id})` annotated");

        Ok(booking)
    }
}

/// Error of [`AnnotateBooking`] [`Command`] execution.
pub type ExecutionError = booking_transition::ExecutionError;

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{Note, Status},
            fixture::booking_in,
        },
        Command as _,
    };

    use super::AnnotateBooking;

    #[tokio::test]
    async fn annotates_terminal_booking() {
        let booking =
            booking_in(Status::NoShow, fixture::day(-3), fixture::day(-1));
        let svc = fixture::service(&[]).await;
        fixture::store(&svc, &booking).await;
        let notes = Note::new("Called, no answer").unwrap();

        let annotated = svc
            .execute(AnnotateBooking {
                booking_id: booking.id,
                notes: Some(notes.clone()),
            })
            .await
            .unwrap();
        assert_eq!(annotated.admin_notes, Some(notes));
        assert_eq!(annotated.status, Status::NoShow);

        let cleared = svc
            .execute(AnnotateBooking {
                booking_id: booking.id,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(cleared.admin_notes, None);
    }
}
