//! Hotel [`Policy`] applied to [`Booking`]s.
//!
//! [`Booking`]: super::Booking

use std::time::Duration;

use common::{Date, DateTime, Money, Percent};
use rust_decimal::Decimal;

use super::Rates;

/// Hour (UTC) from which guests may check in on their check-in date.
pub const CHECK_IN_HOUR: u8 = 14;

/// Maximum number of nights in a single stay.
pub const MAX_NIGHTS: u32 = 30;

/// Maximum number of days a stay may be reserved in advance.
pub const MAX_ADVANCE_DAYS: i64 = 365;

/// Money policy of a hotel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Policy {
    /// [`Rates`] applied to new reservations.
    pub rates: Rates,

    /// Share of the total to be paid as a deposit on check-in.
    pub deposit_rate: Percent,

    /// Minimal time before the check-in for a cancellation to be free of
    /// charge.
    pub free_cancellation: Duration,
}

impl Default for Policy {
    fn default() -> Self {
        let percent = |v: u8| {
            Percent::new(Decimal::from(v)).unwrap_or_else(|| {
                unreachable!("{v} is within `Percent` range")
            })
        };
        Self {
            rates: Rates {
                tax: percent(10),
                service: percent(5),
            },
            deposit_rate: percent(30),
            free_cancellation: Duration::from_secs(48 * 60 * 60),
        }
    }
}

impl Policy {
    /// Returns the deposit to be paid for the provided `total`.
    #[must_use]
    pub fn deposit(&self, total: Money) -> Money {
        self.deposit_rate.of(total).round()
    }

    /// Returns the fee for cancelling a stay starting on the provided
    /// `check_in` date at the provided moment.
    ///
    /// Cancellation is free if made no later than [`Policy::free_cancellation`]
    /// before the check-in hour, otherwise a single night `price` is charged.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn cancellation_fee(
        &self,
        check_in: Date,
        price: Money,
        now: DateTime,
    ) -> Option<Money> {
        let check_in_at: DateTime = check_in
            .at_hour(CHECK_IN_HOUR)
            .expect("`CHECK_IN_HOUR` is a valid hour");
        (now + self.free_cancellation > check_in_at).then_some(price)
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, Date, DateTime, Money};

    use super::Policy;

    #[test]
    fn free_cancellation_boundary() {
        let policy = Policy::default();
        let price = Money {
            amount: 200.into(),
            currency: Currency::Usd,
        };
        let check_in = Date::from_calendar(2024, 6, 3).unwrap();
        let at = |s| DateTime::from_rfc3339(s).unwrap();

        // Exactly 48 hours before 14:00 UTC of the check-in date.
        assert_eq!(
            policy.cancellation_fee(check_in, price, at("2024-06-01T14:00:00Z")),
            None,
        );
        assert_eq!(
            policy.cancellation_fee(check_in, price, at("2024-06-01T14:01:00Z")),
            Some(price),
        );
        assert_eq!(
            policy.cancellation_fee(check_in, price, at("2024-05-20T00:00:00Z")),
            None,
        );
        assert_eq!(
            policy.cancellation_fee(check_in, price, at("2024-06-03T04:00:00Z")),
            Some(price),
        );
        assert_eq!(
            policy.cancellation_fee(check_in, price, at("2024-06-04T00:00:00Z")),
            Some(price),
        );
    }

    #[test]
    fn configurable_window() {
        let policy = Policy {
            free_cancellation: Duration::from_secs(0),
            ..Policy::default()
        };
        let price = Money {
            amount: 200.into(),
            currency: Currency::Usd,
        };
        let check_in = Date::from_calendar(2024, 6, 3).unwrap();

        assert_eq!(
            policy.cancellation_fee(
                check_in,
                price,
                DateTime::from_rfc3339("2024-06-03T13:59:00Z").unwrap(),
            ),
            None,
        );
    }

    #[test]
    fn rounds_deposit() {
        let total = Money {
            amount: "463.33".parse().unwrap(),
            currency: Currency::Usd,
        };

        assert_eq!(
            Policy::default().deposit(total).amount,
            "139.00".parse().unwrap(),
        );
    }
}
