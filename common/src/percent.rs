//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::Money;

/// Decimal percentage in `0..=100` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] if the provided value is in `0..=100` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Returns the inner value of this [`Percent`].
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Returns this [`Percent`] of the provided [`Money`], not rounded.
    #[must_use]
    pub fn of(self, money: Money) -> Money {
        money.times(self.0 / Decimal::ONE_HUNDRED)
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim_end_matches('%'))
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::fmt;

    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Percent;

    impl Serialize for Percent {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Percent {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            /// [`de::Visitor`] accepting both numbers and strings.
            struct Visitor;

            impl de::Visitor<'_> for Visitor {
                type Value = Percent;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a percent value in 0..=100 range")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Percent, E> {
                    v.parse().map_err(E::custom)
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Percent, E> {
                    Percent::new(Decimal::from(v))
                        .ok_or_else(|| E::custom("percent out of range"))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Percent, E> {
                    Percent::new(Decimal::from(v))
                        .ok_or_else(|| E::custom("percent out of range"))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Percent, E> {
                    Decimal::try_from(v)
                        .ok()
                        .and_then(Percent::new)
                        .ok_or_else(|| E::custom("percent out of range"))
                }
            }

            d.deserialize_any(Visitor)
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal percentage in `0..=100` range.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}
