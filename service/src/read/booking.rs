//! [`Booking`] read models definitions.

use common::{Date, DateRange};

use crate::domain::room;
#[cfg(doc)]
use crate::domain::{booking::Status, Booking};

pub use crate::domain::booking::Hold;

/// [`Hold`]s of a [`Room`] overlapping the provided `window`.
///
/// [`Room`]: crate::domain::Room
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Holds {
    /// ID of the [`Room`].
    ///
    /// [`Room`]: crate::domain::Room
    pub room_id: room::Id,

    /// Dates to look for [`Hold`]s within.
    pub window: DateRange,
}

/// [`Status::Confirmed`] [`Booking`]s with a check-in date before the
/// provided [`Date`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overdue(pub Date);

pub mod list {
    //! [`Booking`]s list definitions.

    use std::cmp::Ordering;

    use common::{define_pagination, Date};

    use crate::domain::{
        booking::{GroupId, PaymentStatus, Status},
        guest, room, Booking,
    };

    define_pagination!(Booking, Filter, SortField);

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Status`] to match exactly.
        pub status: Option<Status>,

        /// [`PaymentStatus`] to match exactly.
        pub payment_status: Option<PaymentStatus>,

        /// Earliest check-in date, inclusive.
        pub check_in_from: Option<Date>,

        /// Latest check-in date, inclusive.
        pub check_in_to: Option<Date>,

        /// Words to fuzzy search for in a [`Booking`] number, guest name,
        /// phone or email.
        pub keyword: Option<String>,

        /// [`guest::NationalId`] of the primary guest.
        pub national_id: Option<guest::NationalId>,

        /// ID of the reserved [`Room`].
        ///
        /// [`Room`]: crate::domain::Room
        pub room_id: Option<room::Id>,

        /// ID of the group the [`Booking`] was reserved within.
        pub group_id: Option<GroupId>,
    }

    impl Filter {
        /// Returns the lowercase words of the [`Filter::keyword`].
        #[must_use]
        pub fn keywords(&self) -> Vec<String> {
            self.keyword
                .iter()
                .flat_map(|k| k.split_whitespace())
                .map(str::to_lowercase)
                .collect()
        }

        /// Indicates whether the provided [`Booking`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, booking: &Booking) -> bool {
            let start = booking.stay.start();
            let national_id = booking
                .verification
                .as_ref()
                .map(|v| &v.national_id)
                .or(booking.guest.national_id.as_ref());

            self.status.map_or(true, |s| s == booking.status)
                && self
                    .payment_status
                    .map_or(true, |s| s == booking.payment_status)
                && self.check_in_from.map_or(true, |d| d <= start)
                && self.check_in_to.map_or(true, |d| start <= d)
                && self.room_id.map_or(true, |id| id == booking.room_id)
                && self
                    .group_id
                    .map_or(true, |id| Some(id) == booking.group_id)
                && self
                    .national_id
                    .as_ref()
                    .map_or(true, |id| Some(id) == national_id)
                && self.matches_keywords(booking)
        }

        /// Indicates whether any of the [`Filter::keywords()`] occurs in the
        /// searchable fields of the provided [`Booking`].
        fn matches_keywords(&self, booking: &Booking) -> bool {
            let words = self.keywords();
            if words.is_empty() {
                return true;
            }
            let haystack = [
                Some(booking.number.to_string()),
                Some(booking.guest.full_name.to_string()),
                Some(booking.guest.phone.to_string()),
                booking.guest.email.as_ref().map(ToString::to_string),
            ]
            .into_iter()
            .flatten()
            .map(|f| f.to_lowercase())
            .collect::<Vec<_>>();

            words
                .iter()
                .any(|w| haystack.iter().any(|field| field.contains(w.as_str())))
        }
    }

    /// Field to sort [`Booking`]s by.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub enum SortField {
        /// Creation moment.
        #[default]
        CreatedAt,

        /// Check-in date.
        CheckIn,

        /// Total amount.
        Total,
    }

    impl SortField {
        /// Compares the provided [`Booking`]s by this [`SortField`] in
        /// ascending order.
        #[must_use]
        pub fn compare(self, a: &Booking, b: &Booking) -> Ordering {
            match self {
                Self::CreatedAt => a.created_at.cmp(&b.created_at),
                Self::CheckIn => a.stay.start().cmp(&b.stay.start()),
                Self::Total => a.totals.total.amount.cmp(&b.totals.total.amount),
            }
            .then_with(|| a.id.cmp(&b.id))
        }
    }
}
