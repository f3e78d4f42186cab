//! Financial reconciliation of a [`Booking`].
//!
//! [`Booking`]: super::Booking

use common::{Money, Percent};
use rust_decimal::Decimal;

use super::Charge;

/// Rates applied to the room subtotal of a [`Booking`].
///
/// [`Booking`]: super::Booking
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rates {
    /// Tax rate.
    pub tax: Percent,

    /// Service charge rate.
    pub service: Percent,
}

/// Reconciled money totals of a [`Booking`].
///
/// [`Booking`]: super::Booking
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Room price multiplied by the number of nights.
    pub subtotal: Money,

    /// Tax on the [`Totals::subtotal`].
    pub tax: Money,

    /// Service charge on the [`Totals::subtotal`].
    pub service_charge: Money,

    /// Sum of all the active [`Charge`]s.
    pub additional_charges: Money,

    /// Applied discount.
    pub discount: Money,

    /// Total amount to be paid.
    pub total: Money,
}

impl Totals {
    /// Returns the total before the [`Totals::discount`].
    #[must_use]
    pub fn gross(&self) -> Money {
        Money {
            amount: self.total.amount + self.discount.amount,
            currency: self.total.currency,
        }
    }
}

/// Reconciles [`Totals`] of a stay out of its inputs.
///
/// All the amounts are expected in the `price` currency. Removed [`Charge`]s
/// are not counted.
///
/// # Panics
///
/// If the resulting total is negative, which means the `discount` was not
/// validated against the gross total.
#[must_use]
pub fn reconcile(
    price: Money,
    nights: u32,
    rates: Rates,
    charges: &[Charge],
    discount: Money,
) -> Totals {
    let currency = price.currency;
    let subtotal = price.times(nights);
    let tax = rates.tax.of(subtotal).round();
    let service_charge = rates.service.of(subtotal).round();
    let additional_charges = Money {
        amount: charges
            .iter()
            .filter(|c| c.is_active())
            .map(|c| c.amount().amount)
            .sum::<Decimal>(),
        currency,
    };
    let total = Money {
        amount: subtotal.amount
            + tax.amount
            + service_charge.amount
            + additional_charges.amount
            - discount.amount,
        currency,
    };
    assert!(
        !total.is_negative(),
        "total must not be negative: {total} with discount {discount}",
    );

    Totals {
        subtotal,
        tax,
        service_charge,
        additional_charges,
        discount,
        total,
    }
}
