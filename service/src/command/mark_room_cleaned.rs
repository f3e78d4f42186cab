//! [`Command`] for marking a [`Room`] as cleaned.

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{room, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for returning a [`room::Status::Cleaning`] [`Room`] back to
/// [`room::Status::Available`].
#[derive(Clone, Copy, Debug)]
pub struct MarkRoomCleaned {
    /// ID of the cleaned [`Room`].
    pub room_id: room::Id,
}

impl<Db> Command<MarkRoomCleaned> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Update<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        MarkRoomCleaned { room_id }: MarkRoomCleaned,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Room`.
        tx.execute(Lock(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        room.mark_cleaned().map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`Room(id: {room_id})` cleaned");

        Ok(room)
    }
}

/// Error of [`MarkRoomCleaned`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] is not being cleaned.
    #[display("{_0}")]
    #[from]
    NotCleaning(room::NotCleaning),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::fixture,
        domain::{fixture::room, room::Status},
        Command as _,
    };

    use super::{ExecutionError, MarkRoomCleaned};

    #[tokio::test]
    async fn makes_room_available() {
        let mut room = room("100");
        room.status = Status::Cleaning;
        let svc = fixture::service(&[&room]).await;

        let cleaned = svc
            .execute(MarkRoomCleaned { room_id: room.id })
            .await
            .unwrap();

        assert_eq!(cleaned.status, Status::Available);
        assert_eq!(fixture::load_room(&svc, room.id).await, cleaned);
    }

    #[tokio::test]
    async fn rejects_occupied_room() {
        let mut room = room("100");
        room.status = Status::Occupied;
        let svc = fixture::service(&[&room]).await;

        let err = svc
            .execute(MarkRoomCleaned { room_id: room.id })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::NotCleaning(_)));
        assert_eq!(
            fixture::load_room(&svc, room.id).await.status,
            Status::Occupied,
        );
    }
}
