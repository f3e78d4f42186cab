//! Domain fixtures for tests.

use common::{money::Currency, Date, DateTime, Money};

use super::{
    booking::{self, Booking, Occupancy, Policy, Reservation},
    guest,
    room::{self, Room},
};

/// Parses the provided `amount` as US dollars.
pub(crate) fn usd(amount: &str) -> Money {
    Money {
        amount: amount.parse().expect("valid amount"),
        currency: Currency::Usd,
    }
}

/// Creates a new active [`Room`] for two guests with the provided nightly
/// `price` in US dollars.
pub(crate) fn room(price: &str) -> Room {
    let id = room::Id::new();
    Room {
        id,
        number: room::Number::new(format!("R-{}", &id.to_string()[..8]))
            .expect("valid number"),
        name: room::Name::new("Garden view").expect("valid name"),
        kind: room::Kind::Deluxe,
        price: usd(price),
        capacity: room::Capacity::new(2).expect("valid capacity"),
        status: room::Status::Available,
        is_active: true,
        created_at: DateTime::now().coerce(),
    }
}

/// Creates [`guest::Info`] of a primary guest with no national ID known in
/// advance.
pub(crate) fn guest() -> guest::Info {
    guest::Info {
        full_name: guest::Name::new("Nguyen Van A").expect("valid name"),
        national_id: None,
        phone: guest::Phone::new("0901234567").expect("valid phone"),
        email: Some(
            guest::Email::new("guest@example.com").expect("valid email"),
        ),
    }
}

/// Creates a [`guest::Verification`] matching the [`guest()`] fixture.
pub(crate) fn verification() -> guest::Verification {
    guest::Verification {
        full_name: guest::Name::new("Nguyen Van A").expect("valid name"),
        national_id: guest::NationalId::new("079123456789")
            .expect("valid national ID"),
        phone: guest::Phone::new("0901234567").expect("valid phone"),
    }
}

/// Creates a [`Reservation`] of a single adult for the provided dates.
pub(crate) fn reservation(check_in: Date, check_out: Date) -> Reservation {
    Reservation {
        guest_id: guest::Id::new(),
        guest: guest(),
        check_in,
        check_out,
        occupancy: Occupancy {
            adults: 1,
            children: 0,
        },
        special_requests: None,
    }
}

/// Creates a [`Booking`] of the provided [`Room`] for the provided dates,
/// reserved on the check-in date.
///
/// Allows check-in dates in the past.
pub(crate) fn booking_of(room: &Room, check_in: Date, check_out: Date) -> Booking {
    let reserved_at = check_in.at_hour(0).expect("valid hour");
    Booking::reserve(
        room,
        reservation(check_in, check_out),
        None,
        &Policy::default(),
        reserved_at,
    )
    .expect("valid reservation")
}

/// Creates a [`Booking`] of a $200 [`Room`] in the provided
/// [`booking::Status`], bypassing the lifecycle.
pub(crate) fn booking_in(
    status: booking::Status,
    check_in: Date,
    check_out: Date,
) -> Booking {
    let mut booking = booking_of(&room("200"), check_in, check_out);
    booking.status = status;
    booking
}
