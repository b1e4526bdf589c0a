//! Time and interval primitives.
//!
//! Everything here works in one fixed civil timezone — the business's local
//! zone, carried explicitly as a [`chrono_tz::Tz`]. The executing host's
//! local timezone is never consulted: an earlier revision of this system
//! derived query times from the process locale and produced off-by-an-hour
//! availability, so business-time math goes through [`BusinessHours::anchor`]
//! instead.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;

/// A half-open interval `[start, end)` in the business timezone.
///
/// The interval includes its start instant and excludes its end instant, so
/// back-to-back appointments do not count as overlapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeInterval {
    /// Create an interval from explicit endpoints.
    ///
    /// Fails with [`ScheduleError::InvalidInterval`] unless `start < end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Create an interval from a start instant and a positive duration.
    pub fn with_duration(start: DateTime<Tz>, duration: Duration) -> Result<Self, ScheduleError> {
        Self::new(start, start + duration)
    }

    /// Interval start (inclusive).
    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    /// Interval end (exclusive).
    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    /// Strict half-open overlap test.
    ///
    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True iff this interval overlaps none of `others`.
    pub fn clear_of<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a TimeInterval>,
    {
        others.into_iter().all(|busy| !self.overlaps(busy))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} .. {})",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%H:%M %Z")
        )
    }
}

/// Daily opening hours as a civil `(start, end)` pair.
///
/// Constant across all days; there is no per-weekday variation and no
/// holiday handling. `start < end` is enforced at config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// Opening time, e.g. 09:00.
    #[serde(with = "civil_time")]
    pub start: NaiveTime,

    /// Closing time, e.g. 17:00.
    #[serde(with = "civil_time")]
    pub end: NaiveTime,
}

impl BusinessHours {
    /// Anchor a civil time on `date` into the given timezone.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier
    /// instant; nonexistent local times (spring-forward gap) are an error.
    pub fn anchor(
        date: NaiveDate,
        time: NaiveTime,
        tz: Tz,
    ) -> Result<DateTime<Tz>, ScheduleError> {
        date.and_time(time)
            .and_local_timezone(tz)
            .earliest()
            .ok_or(ScheduleError::NonexistentLocalTime {
                date,
                time,
                timezone: tz.name().to_string(),
            })
    }

    /// The business day on `date` as a pair of anchored instants.
    ///
    /// Returns `None` for degenerate hours (`start >= end`); callers treat
    /// that as a day with no bookable time, not an error.
    pub fn day_bounds(
        &self,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Option<(DateTime<Tz>, DateTime<Tz>)>, ScheduleError> {
        if self.start >= self.end {
            return Ok(None);
        }
        let open = Self::anchor(date, self.start, tz)?;
        let close = Self::anchor(date, self.end, tz)?;
        Ok(Some((open, close)))
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }
}

/// Serde helper for civil times in `HH:MM` form, matching the on-disk
/// config format (`"09:00"`).
mod civil_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.format("%H:%M").to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
