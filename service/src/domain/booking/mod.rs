//! [`Booking`] definitions.

pub mod charge;
mod error;
mod lifecycle;
pub mod payment;
mod policy;
mod reconciliation;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateRange, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{guest, room};

pub use self::{
    charge::Charge,
    error::{
        Conflict, InvalidTransition, Rejection, UnsettledBalance,
        ValidationError,
    },
    lifecycle::{validate_stay, Action, Reservation},
    payment::Payment,
    policy::{Policy, CHECK_IN_HOUR, MAX_ADVANCE_DAYS, MAX_NIGHTS},
    reconciliation::{reconcile, Rates, Totals},
};

/// Reservation of a [`Room`] for a stay of guests.
///
/// [`Room`]: room::Room
#[derive(Clone, Debug, PartialEq)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Booking`].
    pub number: Number,

    /// ID of the group this [`Booking`] was reserved within, if any.
    pub group_id: Option<GroupId>,

    /// ID of the guest owning this [`Booking`].
    pub guest_id: guest::Id,

    /// Contact data of the primary guest.
    pub guest: guest::Info,

    /// Identity of the primary guest verified on check-in.
    pub verification: Option<guest::Verification>,

    /// ID of the reserved [`Room`].
    ///
    /// [`Room`]: room::Room
    pub room_id: room::Id,

    /// Nights of the stay: check-in date is included, check-out date is not.
    pub stay: DateRange,

    /// [`Occupancy`] of the reserved [`Room`].
    ///
    /// [`Room`]: room::Room
    pub occupancy: Occupancy,

    /// Price of a single night, fixed at reservation.
    pub price: Money,

    /// [`Rates`] fixed at reservation.
    pub rates: Rates,

    /// Ledger of service [`Charge`]s, in order of accrual.
    ///
    /// Removed [`Charge`]s stay in the ledger, so indices are stable.
    pub charges: Vec<Charge>,

    /// Reconciled [`Totals`] of this [`Booking`].
    pub totals: Totals,

    /// Amount to be paid as a deposit on check-in.
    pub deposit: Money,

    /// Fee charged for a late cancellation of this [`Booking`].
    pub cancellation_fee: Option<Money>,

    /// Recorded [`Payment`]s, in order of recording.
    pub payments: Vec<Payment>,

    /// [`PaymentStatus`] of this [`Booking`].
    pub payment_status: PaymentStatus,

    /// Lifecycle [`Status`] of this [`Booking`].
    pub status: Status,

    /// Special requests of the guests.
    pub special_requests: Option<Note>,

    /// Notes left by administrators.
    pub admin_notes: Option<Note>,

    /// Reason of this [`Booking`] cancellation.
    pub cancellation_reason: Option<Note>,

    /// Reason of this [`Booking`] failure.
    pub failure_reason: Option<Note>,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was confirmed.
    pub confirmed_at: Option<ConfirmationDateTime>,

    /// [`DateTime`] when the guests checked in.
    pub checked_in_at: Option<CheckInDateTime>,

    /// [`DateTime`] when the guests checked out.
    pub checked_out_at: Option<CheckOutDateTime>,

    /// [`DateTime`] when this [`Booking`] was cancelled.
    pub cancelled_at: Option<CancellationDateTime>,

    /// [`DateTime`] when this [`Booking`] was completed.
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when the paid money was refunded.
    pub refunded_at: Option<RefundDateTime>,
}

impl Booking {
    /// Returns the number of nights of this [`Booking`].
    #[must_use]
    pub fn nights(&self) -> u32 {
        self.stay.days()
    }

    /// Returns the [`Hold`] this [`Booking`] places on its [`Room`], if it
    /// still holds it.
    ///
    /// [`Room`]: room::Room
    #[must_use]
    pub fn hold(&self) -> Option<Hold> {
        self.status.is_holding().then(|| Hold {
            booking_id: self.id,
            number: self.number.clone(),
            stay: self.stay,
        })
    }

    /// Returns the total of all the recorded [`Payment`]s.
    #[must_use]
    pub fn paid(&self) -> Money {
        Money {
            amount: self.payments.iter().map(|p| p.amount.amount).sum(),
            currency: self.price.currency,
        }
    }

    /// Returns the amount the guests owe for this [`Booking`] in total.
    ///
    /// Once cancelled, only the cancellation fee is due.
    #[must_use]
    pub fn amount_due(&self) -> Money {
        if self.status == Status::Cancelled {
            self.cancellation_fee
                .unwrap_or_else(|| Money::zero(self.price.currency))
        } else {
            self.totals.total
        }
    }

    /// Returns the still unpaid part of the [`Booking::amount_due()`].
    #[must_use]
    pub fn balance(&self) -> Money {
        let amount = self.amount_due().amount - self.paid().amount;
        Money {
            amount: amount.max(Decimal::ZERO),
            currency: self.price.currency,
        }
    }

    /// Indicates whether this [`Booking`] can be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        Action::Cancel.is_permitted_from(self.status)
    }

    /// Indicates whether the guests can check in.
    #[must_use]
    pub fn can_check_in(&self) -> bool {
        Action::CheckIn.is_permitted_from(self.status)
    }

    /// Indicates whether the guests can check out.
    #[must_use]
    pub fn can_check_out(&self) -> bool {
        Action::CheckOut.is_permitted_from(self.status)
    }

    /// Indicates whether the guests can review their stay.
    #[must_use]
    pub fn can_review(&self) -> bool {
        matches!(self.status, Status::CheckedOut | Status::Completed)
    }

    /// Re-evaluates the [`PaymentStatus`] of this [`Booking`] against its
    /// [`Booking::amount_due()`].
    ///
    /// [`PaymentStatus::Refunded`] is final and never re-evaluated.
    pub(crate) fn settle(&mut self) {
        if self.payment_status == PaymentStatus::Refunded {
            return;
        }

        let paid = self.paid().amount;
        self.payment_status = if paid.is_zero() {
            PaymentStatus::Unpaid
        } else if paid >= self.amount_due().amount {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        };
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// ID of a group of [`Booking`]s reserved together for one party.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct GroupId(Uuid);

impl GroupId {
    /// Creates a new random [`GroupId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-readable number of a [`Booking`].
///
/// Format is `BK{YYYYMMDD}{8 digits}`, where the date is the creation date.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Generates a new [`Number`] for the [`Booking`] with the provided [`Id`]
    /// created on the provided [`Date`].
    #[must_use]
    pub fn generate(id: Id, created: Date) -> Self {
        let (year, month, day) = created.ymd();
        let digits = Uuid::from(id).as_u128() % 100_000_000;
        Self(format!("BK{year:04}{month:02}{day:02}{digits:08}"))
    }

    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Number`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^BK\d{16}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Free-form text note attached to a [`Booking`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` is non-empty, trimmed, and
    /// has no more than 2000 characters.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Note`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Note`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.chars().count() <= 2000
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

/// Number of guests staying in a [`Room`].
///
/// [`Room`]: room::Room
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Occupancy {
    /// Number of adult guests.
    pub adults: u8,

    /// Number of child guests.
    pub children: u8,
}

impl Occupancy {
    /// Returns the total number of guests.
    #[must_use]
    pub fn total(&self) -> u16 {
        u16::from(self.adults) + u16::from(self.children)
    }

    /// Checks whether this [`Occupancy`] fits the provided `capacity`.
    ///
    /// # Errors
    ///
    /// If there are no adults, or there are more guests than the `capacity`.
    pub fn check(&self, capacity: room::Capacity) -> Result<(), ValidationError> {
        if self.adults == 0 {
            return Err(ValidationError::NoAdults);
        }
        let capacity = u8::from(capacity);
        if self.total() > u16::from(capacity) {
            return Err(ValidationError::OverCapacity {
                occupants: self.total(),
                capacity,
            });
        }
        Ok(())
    }
}

/// Range of dates a [`Room`] is held by a [`Booking`] for.
///
/// [`Room`]: room::Room
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hold {
    /// ID of the holding [`Booking`].
    pub booking_id: Id,

    /// [`Number`] of the holding [`Booking`].
    pub number: Number,

    /// Held nights.
    pub stay: DateRange,
}

define_kind! {
    #[doc = "Lifecycle status of a [`Booking`]."]
    enum Status {
        #[doc = "Reserved, awaiting confirmation."]
        Pending = 1,

        #[doc = "Confirmed by the hotel."]
        Confirmed = 2,

        #[doc = "Guests are staying."]
        CheckedIn = 3,

        #[doc = "Guests have left."]
        CheckedOut = 4,

        #[doc = "Settled and closed."]
        Completed = 5,

        #[doc = "Cancelled before arrival."]
        Cancelled = 6,

        #[doc = "Guests haven't arrived."]
        NoShow = 7,

        #[doc = "Reservation has failed."]
        Failed = 8,
    }
}

impl Status {
    /// [`Status`]es holding the reserved [`Room`] for the stay.
    ///
    /// [`Room`]: room::Room
    pub const HOLDING: [Self; 3] =
        [Self::Pending, Self::Confirmed, Self::CheckedIn];

    /// Indicates whether a [`Booking`] in this [`Status`] holds its [`Room`].
    ///
    /// [`Room`]: room::Room
    #[must_use]
    pub fn is_holding(self) -> bool {
        Self::HOLDING.contains(&self)
    }

    /// Indicates whether no transition is possible out of this [`Status`].
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::NoShow | Self::Failed,
        )
    }
}

define_kind! {
    #[doc = "Payment status of a [`Booking`]."]
    enum PaymentStatus {
        #[doc = "Nothing is paid."]
        Unpaid = 1,

        #[doc = "Some of the due amount is paid."]
        PartiallyPaid = 2,

        #[doc = "The whole due amount is paid."]
        Paid = 3,

        #[doc = "The paid money is returned to the guests."]
        Refunded = 4,
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was confirmed.
pub type ConfirmationDateTime = DateTimeOf<(Booking, unit::Confirmation)>;

/// [`DateTime`] when guests of a [`Booking`] checked in.
pub type CheckInDateTime = DateTimeOf<(Booking, unit::CheckIn)>;

/// [`DateTime`] when guests of a [`Booking`] checked out.
pub type CheckOutDateTime = DateTimeOf<(Booking, unit::CheckOut)>;

/// [`DateTime`] when a [`Booking`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Booking, unit::Cancellation)>;

/// [`DateTime`] when a [`Booking`] was completed.
pub type CompletionDateTime = DateTimeOf<(Booking, unit::Completion)>;

/// [`DateTime`] when money of a [`Booking`] was refunded.
pub type RefundDateTime = DateTimeOf<(Booking, unit::Refund)>;

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{Id, Number, Status};

    #[test]
    fn generates_number() {
        let created = Date::from_calendar(2024, 6, 1).unwrap();
        let number = Number::generate(Id::new(), created);

        let s = AsRef::<str>::as_ref(&number);
        assert!(s.starts_with("BK20240601"));
        assert_eq!(s.len(), 18);
        assert_eq!(Number::new(s), Some(number.clone()));
        assert!(Number::new("BK2024060112").is_none());
    }

    #[test]
    fn holding_statuses() {
        for status in Status::ALL {
            let holding = matches!(
                status,
                Status::Pending | Status::Confirmed | Status::CheckedIn,
            );
            assert_eq!(status.is_holding(), holding, "{status}");
            if holding {
                assert!(!status.is_terminal(), "{status}");
            }
        }
    }
}
