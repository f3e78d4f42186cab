//! Calendar [`Date`] and [`DateRange`] definitions.

use std::{cmp, fmt, str::FromStr};

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use time::{format_description::well_known::Iso8601, Duration, Time};

use crate::{DateTime, DateTimeOf};

/// Calendar date in UTC, without a time of day.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] out of the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the year, month and day of this [`Date`].
    #[must_use]
    pub fn ymd(self) -> (i32, u8, u8) {
        (self.0.year(), u8::from(self.0.month()), self.0.day())
    }

    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        DateTime::now().date()
    }

    /// Returns the [`Date`] shifted by the provided number of `days`.
    ///
    /// [`None`] is returned on calendar overflow.
    #[must_use]
    pub fn add_days(self, days: i64) -> Option<Self> {
        self.0.checked_add(Duration::days(days)).map(Self)
    }

    /// Returns the number of whole days from this [`Date`] until the `other`
    /// one (negative if `other` is earlier).
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }

    /// Returns the UTC instant of this [`Date`] at the provided `hour`.
    ///
    /// [`None`] is returned if the `hour` is out of range.
    #[must_use]
    pub fn at_hour<Of: ?Sized>(self, hour: u8) -> Option<DateTimeOf<Of>> {
        let time = Time::from_hms(hour, 0, 0).ok()?;
        self.0.with_time(time).assume_utc().try_into().ok()
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl FromStr for Date {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, &Iso8601::DATE)
            .map(Self)
            .map_err(|_| "invalid `Date`, expected `YYYY-MM-DD`")
    }
}

/// Half-open range of [`Date`]s: its `start` is included, while its `end`
/// is not.
///
/// A [`DateRange`] is never empty.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    /// First [`Date`] of this [`DateRange`].
    start: Date,

    /// First [`Date`] after this [`DateRange`].
    end: Date,
}

impl DateRange {
    /// Creates a new [`DateRange`] covering `[start, end)`.
    ///
    /// [`None`] is returned if `end` is not after `start`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Returns the first [`Date`] of this [`DateRange`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the first [`Date`] after this [`DateRange`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns the number of days (nights) covered by this [`DateRange`].
    ///
    /// Always `1` or more.
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from(self.start.days_until(self.end)).unwrap_or(u32::MAX)
    }

    /// Indicates whether this [`DateRange`] shares at least one day with the
    /// `other` one.
    ///
    /// `[a, b)` and `[c, d)` overlap iff `a < d` and `c < b`, so adjacent
    /// ranges don't overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Indicates whether the provided [`Date`] is covered by this
    /// [`DateRange`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Returns the days covered by both this and the `other` [`DateRange`].
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        Self::new(
            cmp::max(self.start, other.start),
            cmp::min(self.end, other.end),
        )
    }

    /// Merges the provided [`DateRange`]s into the minimal sorted list of
    /// disjoint ones covering the same days.
    ///
    /// Touching ranges (`[a, b)` and `[b, c)`) are merged too.
    #[must_use]
    pub fn union(ranges: impl IntoIterator<Item = Self>) -> Vec<Self> {
        let mut ranges = ranges.into_iter().collect::<Vec<_>>();
        ranges.sort_unstable_by_key(|r| (r.start, r.end));

        let mut merged: Vec<Self> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => {
                    last.end = cmp::max(last.end, range.end);
                }
                _ => merged.push(range),
            }
        }
        merged
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, DateRange};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(date("2024-06-01"), Date::from_calendar(2024, 6, 1).unwrap());
        assert_eq!(date("2024-06-01").to_string(), "2024-06-01");
        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("01.06.2024".parse::<Date>().is_err());
    }

    #[test]
    fn rejects_empty_ranges() {
        assert!(DateRange::new(date("2024-06-01"), date("2024-06-01")).is_none());
        assert!(DateRange::new(date("2024-06-02"), date("2024-06-01")).is_none());
        assert_eq!(range("2024-06-01", "2024-06-03").days(), 2);
    }

    #[test]
    fn overlap_is_half_open() {
        let first = range("2024-06-01", "2024-06-03");

        assert!(first.overlaps(&range("2024-06-02", "2024-06-04")));
        assert!(first.overlaps(&range("2024-05-01", "2024-07-01")));
        assert!(first.overlaps(&first));
        assert!(!first.overlaps(&range("2024-06-03", "2024-06-05")));
        assert!(!range("2024-06-03", "2024-06-05").overlaps(&first));
        assert!(!first.overlaps(&range("2024-05-30", "2024-06-01")));
    }

    #[test]
    fn intersects() {
        let first = range("2024-06-01", "2024-06-10");

        assert_eq!(
            first.intersection(&range("2024-06-05", "2024-06-20")),
            Some(range("2024-06-05", "2024-06-10")),
        );
        assert_eq!(first.intersection(&range("2024-06-10", "2024-06-20")), None);
    }

    #[test]
    fn merges_union() {
        let merged = DateRange::union([
            range("2024-06-10", "2024-06-12"),
            range("2024-06-01", "2024-06-03"),
            range("2024-06-03", "2024-06-05"),
            range("2024-06-11", "2024-06-15"),
            range("2024-06-20", "2024-06-21"),
        ]);

        assert_eq!(
            merged,
            [
                range("2024-06-01", "2024-06-05"),
                range("2024-06-10", "2024-06-15"),
                range("2024-06-20", "2024-06-21"),
            ],
        );
        assert!(DateRange::union([]).is_empty());
    }
}
