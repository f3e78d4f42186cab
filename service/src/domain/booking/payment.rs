//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Recorded outcome of a money payment for a [`Booking`].
///
/// [`Booking`]: super::Booking
#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    /// [`Kind`] of this [`Payment`].
    pub kind: Kind,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// Paid amount.
    pub amount: Money,

    /// Reference of the transaction in an external payment system, if any.
    pub transaction: Option<TransactionRef>,

    /// [`DateTime`] when this [`Payment`] was made.
    pub paid_at: PaymentDateTime,
}

define_kind! {
    #[doc = "Kind of a [`Payment`]."]
    enum Kind {
        #[doc = "Partial payment made on check-in."]
        Deposit = 1,

        #[doc = "Payment settling the balance."]
        Settlement = 2,
    }
}

define_kind! {
    #[doc = "Method of a [`Payment`]."]
    enum Method {
        #[doc = "Cash at the front desk."]
        Cash = 1,

        #[doc = "Credit card."]
        CreditCard = 2,

        #[doc = "Debit card."]
        DebitCard = 3,

        #[doc = "Bank transfer."]
        BankTransfer = 4,

        #[doc = "Electronic wallet."]
        EWallet = 5,

        #[doc = "PayPal."]
        Paypal = 6,
    }
}

/// Reference of a transaction in an external payment system.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct TransactionRef(String);

impl TransactionRef {
    /// Creates a new [`TransactionRef`] if the given `reference` is
    /// non-empty, has no whitespace, and has no more than 128 characters.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        Self::check(&reference).then_some(Self(reference))
    }

    /// Checks whether the given `reference` is a valid [`TransactionRef`].
    fn check(reference: impl AsRef<str>) -> bool {
        let reference = reference.as_ref();
        !reference.is_empty()
            && reference.len() <= 128
            && !reference.chars().any(char::is_whitespace)
    }
}

impl FromStr for TransactionRef {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `TransactionRef`")
    }
}

/// [`DateTime`] when a [`Payment`] was made.
pub type PaymentDateTime = DateTimeOf<(Payment, unit::Payment)>;
