//! Calendar provider adapters.
//!
//! The scheduling core treats the calendar as two abstract capabilities: a
//! *busy-interval source* (what time is already committed) and an *event
//! sink* (persist a new appointment). Both sit behind the
//! [`CalendarProvider`] trait so the core stays testable against an
//! in-memory fake while production wires in the Google adapter.
//!
//! Adapters own the error boundary: transport and auth failures are
//! converted to [`CalendarError`] here and never escape as raw payloads.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::error::CalendarError;
use crate::schedule::interval::TimeInterval;
use crate::types::{CalendarEvent, EventId};

pub mod google;

#[cfg(test)]
pub mod fake;

pub use google::GoogleCalendar;

/// Abstract busy-interval source and event sink.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Committed intervals for a single civil date, fetched fresh per call.
    ///
    /// `tz` is always the fixed business timezone; implementations must not
    /// substitute the host-local zone.
    async fn query_busy(
        &self,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Vec<TimeInterval>, CalendarError>;

    /// Events between `time_min` and `time_max` whose text matches
    /// `text_filter`. Used by the emergency gate.
    async fn query_events(
        &self,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
        text_filter: &str,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Persist a new event; returns the provider-assigned identifier.
    async fn create_event(
        &self,
        summary: &str,
        description: &str,
        interval: &TimeInterval,
    ) -> Result<EventId, CalendarError>;
}
