//! Weekly time windows and the overlap predicate.
//!
//! A [`TimeWindow`] is a recurring weekly commitment: a set of active days
//! plus a half-open clock interval. Two windows conflict when they share a
//! day and their intervals overlap as open intervals, so back-to-back
//! windows (one ending exactly when the other starts) never conflict.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// A weekday, ordered Sunday-first.
///
/// The order matters only for display; conflict logic treats days as an
/// unordered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in display order.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Day {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sunday" => Ok(Self::Sunday),
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            "saturday" => Ok(Self::Saturday),
            _ => Err(ValidationError::UnknownDay {
                value: s.to_string(),
            }),
        }
    }
}

/// A set of weekdays, backed by a bitmask.
///
/// An empty set is permitted: a window with no active days occupies no day
/// and conflicts with nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Day>", into = "Vec<Day>")]
pub struct DaySet(u8);

impl DaySet {
    /// The empty day set.
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn contains(self, day: Day) -> bool {
        self.0 & day.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the two sets share at least one day.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the contained days in display order.
    pub fn iter(self) -> impl Iterator<Item = Day> {
        Day::ALL.into_iter().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<Day> for DaySet {
    fn from_iter<I: IntoIterator<Item = Day>>(iter: I) -> Self {
        let mut bits = 0;
        for day in iter {
            bits |= day.bit();
        }
        Self(bits)
    }
}

impl From<Vec<Day>> for DaySet {
    fn from(days: Vec<Day>) -> Self {
        days.into_iter().collect()
    }
}

impl From<DaySet> for Vec<Day> {
    fn from(set: DaySet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Parses a 24-hour clock time at minute resolution ("HH:MM").
///
/// Accepts an optional seconds component for leniency with external data;
/// anything below the minute is truncated by comparison (windows are defined
/// at minute-of-day resolution).
pub fn parse_clock(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidClockTime {
            value: s.to_string(),
        })
}

/// Serde adapter for "HH:MM" clock times.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_clock(&s).map_err(serde::de::Error::custom)
    }
}

/// Raw shape of a window in serialized data, before validation.
#[derive(Serialize, Deserialize)]
struct WindowRepr {
    days: Vec<Day>,
    #[serde(with = "clock")]
    start: NaiveTime,
    #[serde(with = "clock")]
    end: NaiveTime,
}

/// A recurring weekly time window: active days plus a half-open interval.
///
/// Invariant: `start < end`, enforced at construction. The conflict
/// predicate assumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowRepr", into = "WindowRepr")]
pub struct TimeWindow {
    days: DaySet,
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window, rejecting `start >= end`.
    pub fn new(days: DaySet, start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::WindowOrder {
                start: start.format("%H:%M").to_string(),
                end: end.format("%H:%M").to_string(),
            });
        }
        Ok(Self { days, start, end })
    }

    #[must_use]
    pub const fn days(&self) -> DaySet {
        self.days
    }

    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if the two windows share a day and overlap in time.
    ///
    /// Open-interval comparison: a window ending at T does not conflict with
    /// a window starting at T on the same day.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if !self.days.intersects(other.days) {
            return false;
        }
        let (a_start, a_end) = self.minutes();
        let (b_start, b_end) = other.minutes();
        a_start < b_end && b_start < a_end
    }

    /// Minutes from midnight, truncating below the minute.
    fn minutes(&self) -> (u32, u32) {
        (
            self.start.num_seconds_from_midnight() / 60,
            self.end.num_seconds_from_midnight() / 60,
        )
    }
}

impl TryFrom<WindowRepr> for TimeWindow {
    type Error = ValidationError;

    fn try_from(repr: WindowRepr) -> Result<Self, Self::Error> {
        Self::new(repr.days.into_iter().collect(), repr.start, repr.end)
    }
}

impl From<TimeWindow> for WindowRepr {
    fn from(window: TimeWindow) -> Self {
        Self {
            days: window.days.into(),
            start: window.start,
            end: window.end,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.days.iter() {
            write!(f, "{day} ")?;
        }
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
