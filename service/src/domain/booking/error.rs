//! Errors of [`Booking`] operations.

use common::{money::Currency, Date, Money};
use derive_more::{Display, Error, From};

use crate::domain::room;

#[cfg(doc)]
use super::Booking;
use super::{Action, Hold, Id, PaymentStatus, Status, MAX_NIGHTS};

/// Reason of rejecting an operation upon a [`Booking`].
#[derive(Clone, Debug, Display, Error, From, PartialEq)]
pub enum Rejection {
    /// [`Booking`] is not in a [`Status`] permitting the operation.
    InvalidTransition(InvalidTransition),

    /// Provided input is not acceptable.
    Validation(ValidationError),

    /// [`Booking`] is not fully paid.
    UnsettledBalance(UnsettledBalance),
}

/// Error of an [`Action`] attempted upon a [`Booking`] in a [`Status`] not
/// permitting it.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
#[display("cannot {action} `Booking(id: {booking_id})` being `{status}`")]
pub struct InvalidTransition {
    /// ID of the [`Booking`].
    #[error(not(source))]
    pub booking_id: Id,

    /// Current [`Status`] of the [`Booking`].
    #[error(not(source))]
    pub status: Status,

    /// Attempted [`Action`].
    #[error(not(source))]
    pub action: Action,
}

/// Error of checking out a [`Booking`] which is not fully paid.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
#[display("`Booking(id: {booking_id})` has unsettled balance: {paid} of {due} paid")]
pub struct UnsettledBalance {
    /// ID of the [`Booking`].
    #[error(not(source))]
    pub booking_id: Id,

    /// Amount due for the [`Booking`].
    #[error(not(source))]
    pub due: Money,

    /// Amount already paid for the [`Booking`].
    #[error(not(source))]
    pub paid: Money,
}

/// Error of reserving a [`Room`] which is already held for the requested
/// dates.
///
/// [`Room`]: room::Room
#[derive(Clone, Debug, Display, Error, PartialEq)]
#[display("`Room(id: {room_id})` is held by {} booking(s) for the requested dates", bookings.len())]
pub struct Conflict {
    /// ID of the requested [`Room`].
    ///
    /// [`Room`]: room::Room
    #[error(not(source))]
    pub room_id: room::Id,

    /// [`Hold`]s overlapping the requested dates.
    ///
    /// Empty if the overlap was detected by the storage itself.
    #[error(not(source))]
    pub bookings: Vec<Hold>,
}

/// Error of validating input of a [`Booking`] operation.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq)]
pub enum ValidationError {
    /// Check-out date is not after the check-in date.
    #[display("check-out date must be after the check-in date")]
    EmptyStay,

    /// Stay has too many nights.
    #[display("stay of {nights} nights is longer than {MAX_NIGHTS} nights")]
    StayTooLong {
        /// Requested number of nights.
        #[error(not(source))]
        nights: u32,
    },

    /// Check-in date is in the past.
    #[display("check-in date `{check_in}` is in the past")]
    CheckInInPast {
        /// Requested check-in date.
        #[error(not(source))]
        check_in: Date,
    },

    /// Check-in date is too far in the future.
    #[display("check-in date `{check_in}` is too far in the future")]
    CheckInTooFar {
        /// Requested check-in date.
        #[error(not(source))]
        check_in: Date,
    },

    /// No adult guests.
    #[display("at least one adult guest is required")]
    NoAdults,

    /// More guests than the [`Room`] fits.
    ///
    /// [`Room`]: room::Room
    #[display("{occupants} guests exceed the room capacity of {capacity}")]
    OverCapacity {
        /// Requested number of guests.
        #[error(not(source))]
        occupants: u16,

        /// Capacity of the [`Room`].
        ///
        /// [`Room`]: room::Room
        #[error(not(source))]
        capacity: u8,
    },

    /// [`Currency`] of the provided amount differs from the [`Booking`]'s.
    #[display("expected amount in `{expected}`, but got `{actual}`")]
    CurrencyMismatch {
        /// [`Currency`] of the [`Booking`].
        #[error(not(source))]
        expected: Currency,

        /// [`Currency`] of the provided amount.
        #[error(not(source))]
        actual: Currency,
    },

    /// Provided amount has more than two fractional digits.
    #[display("amount `{amount}` must be in whole cents")]
    AmountTooPrecise {
        /// Provided amount.
        #[error(not(source))]
        amount: Money,
    },

    /// Provided amount exceeds the storable range.
    #[display("amount `{amount}` is too large")]
    AmountTooLarge {
        /// Provided amount.
        #[error(not(source))]
        amount: Money,
    },

    /// Provided amount is negative.
    #[display("amount must not be negative")]
    NegativeAmount,

    /// Provided amount is not positive.
    #[display("amount must be positive")]
    NonPositiveAmount,

    /// Discount is greater than the total before discount.
    #[display("discount of {discount} exceeds the total of {gross}")]
    DiscountExceedsTotal {
        /// Requested discount.
        #[error(not(source))]
        discount: Money,

        /// Total before discount.
        #[error(not(source))]
        gross: Money,
    },

    /// Quantity of a service charge is zero.
    #[display("quantity must be at least 1")]
    ZeroQuantity,

    /// No service charge at the provided index.
    #[display("no service charge at index {index}")]
    ChargeNotExists {
        /// Requested index.
        #[error(not(source))]
        index: usize,
    },

    /// Service charge at the provided index is already removed.
    #[display("service charge at index {index} is already removed")]
    ChargeAlreadyRemoved {
        /// Requested index.
        #[error(not(source))]
        index: usize,
    },

    /// Verified guest identity doesn't match the one provided on reservation.
    #[display("verified national ID doesn't match the reserved one")]
    GuestMismatch,

    /// Check-in is attempted before the check-in date.
    #[display("check-in is not possible before `{check_in}`")]
    CheckInTooEarly {
        /// Check-in date of the [`Booking`].
        #[error(not(source))]
        check_in: Date,
    },

    /// [`Booking`] is already paid in full, or refunded.
    #[display("booking is already `{status}`")]
    AlreadyPaid {
        /// Current [`PaymentStatus`] of the [`Booking`].
        #[error(not(source))]
        status: PaymentStatus,
    },

    /// Nothing has been paid, so there is nothing to refund.
    #[display("nothing to refund from `{status}` booking")]
    NothingToRefund {
        /// Current [`PaymentStatus`] of the [`Booking`].
        #[error(not(source))]
        status: PaymentStatus,
    },

    /// No-show is marked before the check-in date has passed.
    #[display("no-show cannot be marked until `{check_in}` has passed")]
    NoShowTooEarly {
        /// Check-in date of the [`Booking`].
        #[error(not(source))]
        check_in: Date,
    },

    /// Group reservation requests no rooms.
    #[display("at least one room is required")]
    EmptyGroup,

    /// [`Room`] doesn't accept reservations.
    ///
    /// [`Room`]: room::Room
    #[display("`Room(id: {room_id})` is not active")]
    RoomInactive {
        /// ID of the [`Room`].
        ///
        /// [`Room`]: room::Room
        #[error(not(source))]
        room_id: room::Id,
    },
}

impl ValidationError {
    /// Checks whether the provided `amount` is in the `expected` [`Currency`],
    /// in whole cents, and within the storable range.
    ///
    /// # Errors
    ///
    /// If the [`Currency`]s differ, or the `amount` is too precise or too
    /// large.
    pub fn check_amount(expected: Currency, amount: Money) -> Result<(), Self> {
        if amount.currency != expected {
            return Err(Self::CurrencyMismatch {
                expected,
                actual: amount.currency,
            });
        }
        if !amount.is_in_minor_units() {
            return Err(Self::AmountTooPrecise { amount });
        }
        if !amount.is_within_bounds() {
            return Err(Self::AmountTooLarge { amount });
        }
        Ok(())
    }
}
