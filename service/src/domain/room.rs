//! [`Room`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookable unit of a hotel.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    /// ID of this [`Room`].
    pub id: Id,

    /// Unique [`Number`] of this [`Room`].
    pub number: Number,

    /// [`Name`] of this [`Room`].
    pub name: Name,

    /// [`Kind`] of this [`Room`].
    pub kind: Kind,

    /// Price of a single night in this [`Room`].
    pub price: Money,

    /// Maximum number of occupants of this [`Room`].
    pub capacity: Capacity,

    /// Housekeeping [`Status`] of this [`Room`].
    ///
    /// Never participates in reservation conflict checks.
    pub status: Status,

    /// Indicator whether this [`Room`] accepts new reservations.
    pub is_active: bool,

    /// [`DateTime`] when this [`Room`] was created.
    pub created_at: CreationDateTime,
}

impl Room {
    /// Marks this [`Room`] as occupied by arrived guests.
    pub fn occupy(&mut self) {
        self.status = Status::Occupied;
    }

    /// Marks this [`Room`] as awaiting cleaning after guests departure.
    pub fn vacate(&mut self) {
        self.status = Status::Cleaning;
    }

    /// Marks this [`Room`] as cleaned and available again.
    ///
    /// # Errors
    ///
    /// If this [`Room`] is not being cleaned.
    pub fn mark_cleaned(&mut self) -> Result<(), NotCleaning> {
        if self.status != Status::Cleaning {
            return Err(NotCleaning {
                room_id: self.id,
                status: self.status,
            });
        }
        self.status = Status::Available;
        Ok(())
    }
}

/// Error of cleaning a [`Room`] which is not [`Status::Cleaning`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Room(id: {room_id})` is not being cleaned, but is `{status}`")]
pub struct NotCleaning {
    /// ID of the [`Room`].
    #[error(not(source))]
    pub room_id: Id,

    /// Current [`Status`] of the [`Room`].
    #[error(not(source))]
    pub status: Status,
}

/// ID of a [`Room`].
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

/// Number of a [`Room`], as shown on its door.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` is non-empty, has no
    /// more than 16 characters, and consists of ASCII alphanumerics and
    /// dashes only.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        (1..=16).contains(&number.len())
            && number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Name of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` is non-empty, trimmed, and
    /// has no more than 128 characters.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty() && name.trim() == name && name.chars().count() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Maximum number of occupants of a [`Room`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Capacity(u8);

impl Capacity {
    /// Creates a new [`Capacity`] if the given `value` is not zero.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }
}

define_kind! {
    #[doc = "Kind of a [`Room`]."]
    enum Kind {
        #[doc = "Standard room."]
        Standard = 1,

        #[doc = "Superior room."]
        Superior = 2,

        #[doc = "Deluxe room."]
        Deluxe = 3,

        #[doc = "Suite."]
        Suite = 4,

        #[doc = "Executive room."]
        Executive = 5,

        #[doc = "Presidential suite."]
        Presidential = 6,

        #[doc = "Family room."]
        Family = 7,

        #[doc = "Honeymoon room."]
        Honeymoon = 8,
    }
}

define_kind! {
    #[doc = "Housekeeping status of a [`Room`]."]
    enum Status {
        #[doc = "Ready for guests."]
        Available = 1,

        #[doc = "Guests are staying."]
        Occupied = 2,

        #[doc = "Under maintenance."]
        Maintenance = 3,

        #[doc = "Awaiting cleaning after guests departure."]
        Cleaning = 4,
    }
}

/// [`DateTime`] when a [`Room`] was created.
pub type CreationDateTime = DateTimeOf<(Room, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Capacity, Name, Number, Status};

    #[test]
    fn validates_number() {
        assert!(Number::new("101").is_some());
        assert!(Number::new("A-12").is_some());
        assert!(Number::new("").is_none());
        assert!(Number::new("1 01").is_none());
        assert!(Number::new("12345678901234567").is_none());
    }

    #[test]
    fn validates_name() {
        assert!(Name::new("Sea view").is_some());
        assert!(Name::new(" Sea view").is_none());
        assert!(Name::new("").is_none());
        assert!(Capacity::new(0).is_none());
    }

    #[test]
    fn parses_status() {
        assert_eq!("CLEANING".parse::<Status>().unwrap(), Status::Cleaning);
        assert_eq!(Status::Maintenance.to_string(), "MAINTENANCE");
    }
}
