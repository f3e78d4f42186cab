//! Guest definitions.
//!
//! Guest accounts are managed outside of this service, so a [`Booking`] only
//! references a guest by its [`Id`] and snapshots the contact data of its
//! primary guest.
//!
//! [`Booking`]: crate::domain::Booking

use std::sync::LazyLock;

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact data of a primary guest, provided at reservation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Info {
    /// Full [`Name`] of the guest.
    pub full_name: Name,

    /// [`NationalId`] of the guest, if known in advance.
    pub national_id: Option<NationalId>,

    /// [`Phone`] of the guest.
    pub phone: Phone,

    /// [`Email`] of the guest, if any.
    pub email: Option<Email>,
}

/// Identity of a primary guest, verified at the front desk on arrival.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verification {
    /// Full [`Name`] from the presented document.
    pub full_name: Name,

    /// [`NationalId`] from the presented document.
    pub national_id: NationalId,

    /// [`Phone`] of the guest.
    pub phone: Phone,
}

impl Verification {
    /// Indicates whether this [`Verification`] matches the provided [`Info`].
    ///
    /// Only a [`NationalId`] known in advance is compared.
    #[must_use]
    pub fn matches(&self, info: &Info) -> bool {
        info.national_id
            .as_ref()
            .map_or(true, |id| *id == self.national_id)
    }
}

/// ID of a guest.
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
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Full name of a guest.
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
    /// has no more than 256 characters.
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
        name.trim() == name && !name.is_empty() && name.chars().count() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// National identity document number of a guest (ID card or passport).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct NationalId(String);

impl NationalId {
    /// Creates a new [`NationalId`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `id` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new [`NationalId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`NationalId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`NationalId`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9A-Z]{6,20}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for NationalId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `NationalId`")
    }
}

/// Phone number of a guest.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: an optional
        /// international prefix followed by 9 to 11 digits, possibly grouped
        /// with dashes or spaces.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\+\d{1,3}[-\s]?)?\d([-\s]?\d){8,10}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Email address of a guest.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format loosely: a local
        /// part and a dotted domain without whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]{1,64}@[^@\s.]+(\.[^@\s.]+)+$")
                .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Info, NationalId, Name, Phone, Verification};

    #[test]
    fn validates_contacts() {
        assert!(Phone::new("0901234567").is_some());
        assert!(Phone::new("+84 901 234 567").is_some());
        assert!(Phone::new("12-34").is_none());
        assert!(Email::new("guest@example.com").is_some());
        assert!(Email::new("guest@localhost").is_none());
        assert!(Email::new("guest example@mail.com").is_none());
        assert!(NationalId::new("079123456789").is_some());
        assert!(NationalId::new("B1234567").is_some());
        assert!(NationalId::new("12 34").is_none());
        assert!(Name::new("  ").is_none());
    }

    #[test]
    fn matches_known_national_id_only() {
        let info = |national_id: Option<&str>| Info {
            full_name: Name::new("Nguyen Van A").unwrap(),
            national_id: national_id.map(|id| NationalId::new(id).unwrap()),
            phone: Phone::new("0901234567").unwrap(),
            email: None,
        };
        let verification = Verification {
            full_name: Name::new("Nguyen Van A").unwrap(),
            national_id: NationalId::new("079123456789").unwrap(),
            phone: Phone::new("0901234567").unwrap(),
        };

        assert!(verification.matches(&info(None)));
        assert!(verification.matches(&info(Some("079123456789"))));
        assert!(!verification.matches(&info(Some("079000000000"))));
    }
}
