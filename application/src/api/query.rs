//! GraphQL [`Query`]s definitions.

use common::{pagination, Date, DateRange};
use juniper::{graphql_object, GraphQLInputObject, GraphQLObject};
use service::{query, read, Query as _};

use crate::{api, error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "booking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| error::not_exists_booking(id.into()))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Booking` with the specified `BookingNumber`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - no `Booking` has the specified number.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookingByNumber",
            number = %number,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking_by_number(
        number: api::booking::Number,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let message = format!("`Booking(number: {number})` does not exist");
        ctx.service()
            .execute(query::booking::ByNumber::by(number.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| {
                Error::new(
                    "BOOKING_NOT_EXISTS",
                    http::StatusCode::NOT_FOUND,
                    &message,
                )
            })
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all the `Booking`s reserved within the specified group, in
    /// order of creation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "groupBookings",
            group_id = %group_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn group_bookings(
        group_id: api::booking::GroupId,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::ByGroup::by(group_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }

    /// Searches for a page of `Booking`s matching all the provided criteria.
    ///
    /// `keyword` matches any of its words in a `BookingNumber`, guest name,
    /// phone or email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - `page` is negative, or `size` is not within
    ///                         `1..=100`.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            check_in_from = ?check_in_from,
            check_in_to = ?check_in_to,
            gql.name = "bookings",
            keyword = ?keyword,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            payment_status = ?payment_status,
            size = ?size,
            sort = ?sort,
            status = ?status,
        ),
    )]
    pub async fn bookings(
        status: Option<api::booking::Status>,
        payment_status: Option<api::booking::PaymentStatus>,
        check_in_from: Option<Date>,
        check_in_to: Option<Date>,
        keyword: Option<String>,
        national_id: Option<api::guest::NationalId>,
        room_id: Option<api::room::Id>,
        group_id: Option<api::booking::GroupId>,
        page: Option<i32>,
        size: Option<i32>,
        sort: Option<api::booking::list::SortField>,
        order: Option<api::booking::list::SortOrder>,
        ctx: &Context,
    ) -> Result<api::booking::list::Page, Error> {
        let arguments = read::booking::list::Arguments::new(page, size)
            .ok_or_else(|| api::InputError::Pagination.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::bookings::Search::by(
                read::booking::list::Selector {
                    arguments,
                    filter: read::booking::list::Filter {
                        status: status.map(Into::into),
                        payment_status: payment_status.map(Into::into),
                        check_in_from,
                        check_in_to,
                        keyword,
                        national_id: national_id.map(Into::into),
                        room_id: room_id.map(Into::into),
                        group_id: group_id.map(Into::into),
                    },
                    sort: pagination::Sort {
                        by: sort.unwrap_or_default().into(),
                        order: order.unwrap_or_default().into(),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(api::booking::list::Page)
    }

    /// Returns the `Room` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "room",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room(
        id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        ctx.service()
            .execute(query::room::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| error::not_exists_room(id.into()))
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks whether the `Room` is free for every night from `checkIn` up
    /// to `checkOut`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - `checkOut` is not after `checkIn`.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "isAvailable",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn is_available(
        room_id: api::room::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let stay = DateRange::new(check_in, check_out)
            .ok_or_else(|| api::InputError::EmptyDateRange.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::room::Availability {
                room_id: room_id.into(),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Checks the availability of every requested `Room` for its own stay.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - some `checkOut` is not after its `checkIn`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomsAvailability",
            otel.name = Self::SPAN_NAME,
            requests = requests.len(),
        ),
    )]
    pub async fn rooms_availability(
        requests: Vec<AvailabilityInput>,
        ctx: &Context,
    ) -> Result<Vec<RoomAvailability>, Error> {
        let mut availability = Vec::with_capacity(requests.len());
        for AvailabilityInput {
            room_id,
            check_in,
            check_out,
        } in requests
        {
            let stay = DateRange::new(check_in, check_out)
                .ok_or_else(|| api::InputError::EmptyDateRange.into())
                .map_err(ctx.error())?;
            let available = ctx
                .service()
                .execute(query::room::Availability {
                    room_id: room_id.into(),
                    stay,
                })
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?;
            availability.push(RoomAvailability {
                room_id,
                check_in,
                check_out,
                available,
            });
        }
        Ok(availability)
    }

    /// Returns the nights the `Room` is held for between `from` and `to`, as
    /// sorted non-overlapping `Stay`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - `to` is not after `from`.
    #[tracing::instrument(
        skip_all,
        fields(
            from = %from,
            gql.name = "unavailableDates",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
            to = %to,
        ),
    )]
    pub async fn unavailable_dates(
        room_id: api::room::Id,
        from: Date,
        to: Date,
        ctx: &Context,
    ) -> Result<Vec<api::booking::Stay>, Error> {
        let window = DateRange::new(from, to)
            .ok_or_else(|| api::InputError::EmptyDateRange.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::room::UnavailableDates {
                room_id: room_id.into(),
                window,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ranges| ranges.into_iter().map(Into::into).collect())
    }
}

/// Stay of a `Room` to check the availability for.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "RoomAvailabilityInput")]
pub struct AvailabilityInput {
    /// ID of the `Room`.
    pub room_id: api::room::Id,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,
}

/// Availability of a `Room` for a stay.
#[derive(Clone, Copy, Debug, GraphQLObject)]
pub struct RoomAvailability {
    /// ID of the `Room`.
    pub room_id: api::room::Id,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,

    /// Indicator whether the `Room` is free for every night of the stay.
    pub available: bool,
}
