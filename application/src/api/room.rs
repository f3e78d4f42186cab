//! [`Room`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, error, AsError, Context, Error};

/// A hotel room.
#[derive(Clone, Debug)]
pub struct Room {
    /// ID of this [`Room`].
    id: Id,

    /// Underlying [`domain::Room`].
    room: OnceCell<domain::Room>,
}

impl From<domain::Room> for Room {
    fn from(room: domain::Room) -> Self {
        Self {
            id: room.id.into(),
            room: OnceCell::new_with(Some(room)),
        }
    }
}

impl Room {
    /// Creates a new [`Room`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Room`] with the provided ID exists,
    /// otherwise accessing this [`Room`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            room: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Room`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Room`] doesn't exist.
    async fn room(&self, ctx: &Context) -> Result<&domain::Room, Error> {
        let id = self.id.into();
        self.room
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::room::ById::by(id))
                    .map_err(AsError::into_error)
                    .and_then(|r| {
                        future::ready(
                            r.ok_or_else(|| error::not_exists_room(id)),
                        )
                    })
                    .map_err(ctx.error())
            })
            .await
    }
}

/// A hotel room.
#[graphql_object(context = Context)]
impl Room {
    /// Unique identifier of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Number of this `Room` on the doors.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<Number, Error> {
        Ok(self.room(ctx).await?.number.clone().into())
    }

    /// Name of this `Room`.
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.room(ctx).await?.name.clone().into())
    }

    /// Kind of this `Room`.
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.room(ctx).await?.kind.into())
    }

    /// Price of a single night in this `Room`.
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.room(ctx).await?.price)
    }

    /// Maximum number of guests staying in this `Room`.
    pub async fn capacity(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(u8::from(self.room(ctx).await?.capacity).into())
    }

    /// Housekeeping status of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.room(ctx).await?.status.into())
    }

    /// Indicator whether this `Room` accepts new reservations.
    pub async fn is_active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.room(ctx).await?.is_active)
    }

    /// `DateTime` when this `Room` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.room(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Room`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::room::Id)]
#[into(domain::room::Id)]
#[graphql(name = "RoomId", transparent)]
pub struct Id(Uuid);

/// Number of a `Room` on the doors.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RoomNumber", with = scalar::Via::<domain::room::Number>)]
pub struct Number(domain::room::Number);

/// Name of a `Room`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RoomName", with = scalar::Via::<domain::room::Name>)]
pub struct Name(domain::room::Name);

/// Kind of a `Room`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RoomKind")]
pub enum Kind {
    /// Standard room.
    Standard,

    /// Superior room.
    Superior,

    /// Deluxe room.
    Deluxe,

    /// Suite.
    Suite,

    /// Executive room.
    Executive,

    /// Presidential suite.
    Presidential,

    /// Family room.
    Family,

    /// Honeymoon room.
    Honeymoon,
}

impl From<domain::room::Kind> for Kind {
    fn from(kind: domain::room::Kind) -> Self {
        use domain::room::Kind as K;
        match kind {
            K::Standard => Self::Standard,
            K::Superior => Self::Superior,
            K::Deluxe => Self::Deluxe,
            K::Suite => Self::Suite,
            K::Executive => Self::Executive,
            K::Presidential => Self::Presidential,
            K::Family => Self::Family,
            K::Honeymoon => Self::Honeymoon,
        }
    }
}

/// Housekeeping status of a `Room`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RoomStatus")]
pub enum Status {
    /// Ready for guests.
    Available,

    /// Guests are staying.
    Occupied,

    /// Under maintenance.
    Maintenance,

    /// Awaiting cleaning after guests departure.
    Cleaning,
}

impl From<domain::room::Status> for Status {
    fn from(status: domain::room::Status) -> Self {
        use domain::room::Status as S;
        match status {
            S::Available => Self::Available,
            S::Occupied => Self::Occupied,
            S::Maintenance => Self::Maintenance,
            S::Cleaning => Self::Cleaning,
        }
    }
}
