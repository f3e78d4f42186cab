//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use itertools::Itertools as _;
use juniper::{graphql_object, GraphQLInputObject};
use service::{
    command,
    domain::{booking, guest},
    Command as _,
};

use crate::{api, error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Reserves the `Room` for the stay from `checkIn` up to `checkOut` as a
    /// new `PENDING` `Booking`.
    ///
    /// A new `GuestId` is generated if none is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_CONFLICT` - the `Room` is held by another `Booking` for
    ///                        some of the nights;
    /// - `VALIDATION_FAILED` - the stay or occupancy is not acceptable, or
    ///                         the `Room` is inactive;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "createBooking",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn create_booking(
        room_id: api::room::Id,
        check_in: Date,
        check_out: Date,
        guest_id: Option<api::guest::Id>,
        guest: api::guest::Input,
        occupancy: api::booking::OccupancyInput,
        special_requests: Option<api::booking::Note>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let occupancy: booking::Occupancy = occupancy
            .try_into()
            .map_err(|_| api::InputError::NegativeNumber.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateBooking {
                room_id: room_id.into(),
                reservation: booking::Reservation {
                    guest_id: guest_id.map_or_else(guest::Id::new, Into::into),
                    guest: guest.into(),
                    check_in,
                    check_out,
                    occupancy,
                    special_requests: special_requests.map(Into::into),
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reserves several `Room`s for the same guest atomically: either all of
    /// them are reserved within one group, or none.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `GROUP_PARTIAL_FAILURE` - some of the `Room`s cannot be reserved, so
    ///                             none is;
    /// - `VALIDATION_FAILED` - no `Room`s are requested.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createGroupBooking",
            otel.name = Self::SPAN_NAME,
            rooms = rooms.len(),
        ),
    )]
    pub async fn create_group_booking(
        guest_id: Option<api::guest::Id>,
        guest: api::guest::Input,
        rooms: Vec<RoomRequestInput>,
        special_requests: Option<api::booking::Note>,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        let rooms = rooms
            .into_iter()
            .map(|r| {
                Ok(command::create_group_booking::RoomRequest {
                    room_id: r.room_id.into(),
                    check_in: r.check_in,
                    check_out: r.check_out,
                    occupancy: r.occupancy.try_into()?,
                })
            })
            .collect::<Result<Vec<_>, std::num::TryFromIntError>>()
            .map_err(|_| api::InputError::NegativeNumber.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateGroupBooking {
                guest_id: guest_id.map_or_else(guest::Id::new, Into::into),
                guest: guest.into(),
                rooms,
                special_requests: special_requests.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }

    /// Confirms the `PENDING` `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `PENDING`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "confirmBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn confirm_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::ConfirmBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks the guests of the `CONFIRMED` `Booking` in, recording the
    /// deposit `Payment` and occupying the `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CONFIRMED`;
    /// - `VALIDATION_FAILED` - the verified identity doesn't match the
    ///                         guest, or it's too early to check in;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "checkIn",
            id = %id,
            method = ?method,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn check_in(
        id: api::booking::Id,
        method: api::booking::PaymentMethod,
        transaction: Option<api::booking::TransactionRef>,
        verification: api::guest::VerificationInput,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CheckInBooking {
                booking_id: id.into(),
                method: method.into(),
                transaction: transaction.map(Into::into),
                verification: verification.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks the guests of the `CHECKED_IN` `Booking` out, leaving the
    /// `Room` for cleaning.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CHECKED_IN`;
    /// - `UNSETTLED_BALANCE` - the `Booking` is not fully paid;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "checkOut",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn check_out(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CheckOutBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Booking` before arrival, charging a fee for a late
    /// cancellation.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is neither `PENDING` nor
    ///                          `CONFIRMED`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        id: api::booking::Id,
        reason: api::booking::Note,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CancelBooking {
                booking_id: id.into(),
                reason: reason.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the guests of the `CONFIRMED` `Booking` as not arrived.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CONFIRMED`;
    /// - `VALIDATION_FAILED` - the check-in date hasn't passed yet;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markNoShow",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_no_show(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::MarkBookingNoShow {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Closes the `CHECKED_OUT` `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CHECKED_OUT`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CompleteBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `PENDING` `Booking` as failed, releasing its `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `PENDING`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markBookingFailed",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_booking_failed(
        id: api::booking::Id,
        reason: api::booking::Note,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::MarkBookingFailed {
                booking_id: id.into(),
                reason: reason.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the stay of the `Booking`, not checked in yet, to other dates of
    /// the same `Room`, repricing it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_CONFLICT` - the `Room` is held by another `Booking` for
    ///                        some of the new nights;
    /// - `INVALID_TRANSITION` - the `Booking` is neither `PENDING` nor
    ///                          `CONFIRMED`;
    /// - `VALIDATION_FAILED` - the new stay is not acceptable;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "rescheduleBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reschedule_booking(
        id: api::booking::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::RescheduleBooking {
                booking_id: id.into(),
                check_in,
                check_out,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Applies the discount to the `Booking`, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is already closed;
    /// - `VALIDATION_FAILED` - the discount is negative, exceeds the total,
    ///                         or is in a foreign currency;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "applyDiscount",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn apply_discount(
        id: api::booking::Id,
        amount: Money,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::ApplyBookingDiscount {
                booking_id: id.into(),
                amount,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds the `ServiceCharge` to the `CHECKED_IN` `Booking`.
    ///
    /// `OTHER` category requires a `description`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CHECKED_IN`;
    /// - `VALIDATION_FAILED` - the quantity is zero, or the unit price is not
    ///                         positive or is in a foreign currency;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "addServiceCharge",
            id = %id,
            otel.name = Self::SPAN_NAME,
            quantity = quantity,
            unit_price = %unit_price,
        ),
    )]
    pub async fn add_service_charge(
        id: api::booking::Id,
        category: api::booking::ChargeCategory,
        description: Option<api::booking::Note>,
        quantity: i32,
        unit_price: Money,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let quantity = u16::try_from(quantity)
            .map_err(|_| api::InputError::NegativeNumber.into())
            .map_err(ctx.error())?;
        let description = description.map(booking::Note::from);
        let kind = booking::charge::Kind::from_parts(
            category.into(),
            description.clone(),
        )
        .ok_or_else(|| api::InputError::UndescribedCharge.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(command::AddServiceCharge {
                booking_id: id.into(),
                kind,
                quantity,
                unit_price,
                description,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `ServiceCharge` at the `index` from the `CHECKED_IN`
    /// `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not `CHECKED_IN`;
    /// - `VALIDATION_FAILED` - there is no active `ServiceCharge` at the
    ///                         `index`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeServiceCharge",
            id = %id,
            index = index,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_service_charge(
        id: api::booking::Id,
        index: i32,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let index = usize::try_from(index)
            .map_err(|_| api::InputError::NegativeNumber.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::RemoveServiceCharge {
                booking_id: id.into(),
                index,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records the `Payment` towards the balance of the `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not accepting payments;
    /// - `VALIDATION_FAILED` - the amount is not positive, or is in a foreign
    ///                         currency, or the `Booking` is already paid;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "recordPayment",
            id = %id,
            method = ?method,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn record_payment(
        id: api::booking::Id,
        method: api::booking::PaymentMethod,
        amount: Money,
        transaction: Option<api::booking::TransactionRef>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::RecordBookingPayment {
                booking_id: id.into(),
                method: method.into(),
                amount,
                transaction: transaction.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Refunds the money paid for the closed `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Booking` is not closed, or nothing is
    ///                          paid for it;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "refundBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn refund_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::RefundBooking {
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the staff notes of the `Booking`, removing them if none are
    /// provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "annotateBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn annotate_booking(
        id: api::booking::Id,
        notes: Option<api::booking::Note>,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::AnnotateBooking {
                booking_id: id.into(),
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `Room` left by the guests as cleaned and available again.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_CLEANING` - the `Room` is not awaiting cleaning;
    /// - `ROOM_NOT_EXISTS` - the `Room` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markRoomCleaned",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn mark_room_cleaned(
        room_id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        ctx.service()
            .execute(command::MarkRoomCleaned {
                room_id: room_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Request of a single `Room` within a group reservation.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct RoomRequestInput {
    /// ID of the `Room` to be reserved.
    pub room_id: api::room::Id,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,

    /// Number of guests staying in the `Room`.
    pub occupancy: api::booking::OccupancyInput,
}

impl AsError for command::booking_transition::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(id) => Some(error::not_exists_booking(*id)),
            Self::Db(e) => e.try_as_error(),
            Self::Rejected(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::check_in_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(id) => Some(error::not_exists_booking(*id)),
            Self::Db(e) => e.try_as_error(),
            Self::Rejected(e) => e.try_as_error(),
            Self::RoomNotExists(_) => None,
        }
    }
}

impl AsError for command::check_out_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(id) => Some(error::not_exists_booking(*id)),
            Self::Db(e) => e.try_as_error(),
            Self::Rejected(e) => e.try_as_error(),
            Self::RoomNotExists(_) => None,
        }
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Conflict(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(e) => e.try_as_error(),
            Self::RoomNotExists(id) => Some(error::not_exists_room(*id)),
        }
    }
}

impl AsError for command::create_group_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::GroupPartialFailure(e) => {
                let failures = e
                    .failures
                    .iter()
                    .map(|(room_id, f)| {
                        let reason = f
                            .try_as_error()
                            .map_or_else(|| f.to_string(), |e| e.message);
                        format!("`Room(id: {room_id})`: {reason}")
                    })
                    .join("; ");
                Some(Error::new(
                    "GROUP_PARTIAL_FAILURE",
                    http::StatusCode::CONFLICT,
                    &format!("{e}: {failures}"),
                ))
            }
            Self::Invalid(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::mark_room_cleaned::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotCleaning(e) => Some(Error::new(
                "ROOM_NOT_CLEANING",
                http::StatusCode::CONFLICT,
                e,
            )),
            Self::RoomNotExists(id) => Some(error::not_exists_room(*id)),
        }
    }
}

impl AsError for command::reschedule_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::BookingNotExists(id) => Some(error::not_exists_booking(*id)),
            Self::Conflict(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
            Self::Rejected(e) => e.try_as_error(),
        }
    }
}
