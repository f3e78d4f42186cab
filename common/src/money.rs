//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{
    prelude::ToPrimitive as _, Decimal, RoundingStrategy,
};

use crate::define_kind;

/// Number of fractional digits [`Money`] amounts are rounded to.
const MINOR_DIGITS: u32 = 2;

/// Greatest absolute amount a [`Money`] may be stored with, fitting into
/// `NUMERIC(14,2)`.
///
/// `999_999_999_999.99`
const MAX_AMOUNT: Decimal =
    Decimal::from_parts(276_447_231, 23_283, 0, false, MINOR_DIGITS);

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Indicates whether this [`Money`] amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Indicates whether this [`Money`] amount has no more than two
    /// fractional digits.
    #[must_use]
    pub fn is_in_minor_units(&self) -> bool {
        self.amount.normalize().scale() <= MINOR_DIGITS
    }

    /// Indicates whether this [`Money`] amount is within the storable range.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.amount.abs() <= MAX_AMOUNT
    }

    /// Returns this [`Money`] multiplied by the provided `factor`.
    ///
    /// # Panics
    ///
    /// On [`Decimal`] overflow, which [`Money::is_within_bounds`] amounts
    /// can't reach with `u32` factors.
    #[must_use]
    pub fn times(self, factor: impl Into<Decimal>) -> Self {
        Self {
            amount: self.amount * factor.into(),
            currency: self.currency,
        }
    }

    /// Returns this [`Money`] rounded to minor currency units, with midpoints
    /// rounded away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                MINOR_DIGITS,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Sums this [`Money`] with the `other` one.
    ///
    /// [`None`] is returned if their [`Currency`]s differ.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then(|| Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Subtracts the `other` [`Money`] from this one.
    ///
    /// [`None`] is returned if their [`Currency`]s differ.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(Self {
            amount: -other.amount,
            currency: other.currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        let money = Self { amount, currency };
        if !money.is_in_minor_units() {
            return Err("more than two fractional digits");
        }
        if !money.is_within_bounds() {
            return Err("amount is too large");
        }
        Ok(money)
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,

        #[doc = "Vietnamese Dong."]
        Vnd = 4,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            },
        );

        assert_eq!(
            Money::from_str("123.45RUB").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Rub,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());

        assert!(Money::from_str("123.00USD").is_ok());
        assert!(Money::from_str("123.0USD").is_ok());
        assert!(Money::from_str("123USD").is_ok());
        assert!(Money::from_str("1.010USD").is_ok());

        assert!(Money::from_str("1.005USD").is_err());
        assert!(Money::from_str("999999999999.99USD").is_ok());
        assert!(Money::from_str("1000000000000USD").is_err());
        assert!(Money::from_str("79228162514264337593543950335USD").is_err());
        assert!(Money::from_str("1€EUR").is_err());
    }

    #[test]
    fn bounds() {
        let usd = |s| Money {
            amount: decimal(s),
            currency: Currency::Usd,
        };

        assert!(usd("10.01").is_in_minor_units());
        assert!(usd("10.010").is_in_minor_units());
        assert!(!usd("10.015").is_in_minor_units());

        assert!(usd("999999999999.99").is_within_bounds());
        assert!(usd("-999999999999.99").is_within_bounds());
        assert!(!usd("1000000000000").is_within_bounds());
    }

    #[test]
    fn arithmetic() {
        let usd = |s| Money {
            amount: decimal(s),
            currency: Currency::Usd,
        };

        assert_eq!(usd("200").times(2), usd("400"));
        assert_eq!(usd("400").checked_add(usd("15")), Some(usd("415")));
        assert_eq!(usd("400").checked_sub(usd("415")), Some(usd("-15")));
        assert!(usd("-15").is_negative());
        assert!(!usd("0").is_negative());
        assert!(!Money::zero(Currency::Usd).is_negative());
        assert_eq!(
            usd("1").checked_add(Money::zero(Currency::Eur)),
            None,
        );
        assert_eq!(usd("10.005").round(), usd("10.01"));
        assert_eq!(usd("-10.005").round(), usd("-10.01"));
        assert_eq!(usd("10.004").round(), usd("10.00"));
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123.45USD",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            }
            .to_string(),
            "123.45EUR",
        );

        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Rub,
            }
            .to_string(),
            "123.45RUB",
        );

        assert_eq!(
            Money {
                amount: decimal("123.00"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
        assert_eq!(
            Money {
                amount: decimal("123.0"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
        assert_eq!(
            Money {
                amount: decimal("123"),
                currency: Currency::Usd,
            }
            .to_string(),
            "123USD",
        );
    }
}
