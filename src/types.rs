//! Core types for flowfix.
//!
//! This module defines the domain types shared across the scheduling core:
//! calendar events, appointment requests, and the structured outcomes of
//! booking and emergency checks.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted calendar event, assigned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event as reported by the calendar provider.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Provider-assigned identifier.
    pub id: EventId,

    /// Event summary line.
    pub summary: String,

    /// Event start in the business timezone.
    pub start: DateTime<Tz>,

    /// Event end in the business timezone.
    pub end: DateTime<Tz>,
}

/// A fully specified, user-confirmed request to book an appointment.
///
/// Constructed by the external intent router from natural-language-derived
/// fields. `start_time` is left as the raw string the user supplied; the
/// appointment writer owns parsing it (12-hour or 24-hour, see
/// [`crate::schedule::booking::parse_start_time`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    /// Appointment date.
    pub date: NaiveDate,

    /// Raw start time string, e.g. `"2:30 PM"` or `"14:30"`.
    pub start_time: String,

    /// Appointment length in minutes. `None` means the default (60).
    pub duration_minutes: Option<i64>,

    /// What the customer needs done, e.g. "leaking radiator valve".
    pub service_needed: String,

    /// Customer's full name.
    pub customer_name: String,

    /// Customer's contact phone number.
    pub customer_phone: String,
}

impl AppointmentRequest {
    /// Create a request with the default duration.
    pub fn new(
        date: NaiveDate,
        start_time: &str,
        service_needed: &str,
        customer_name: &str,
        customer_phone: &str,
    ) -> Self {
        Self {
            date,
            start_time: start_time.to_string(),
            duration_minutes: None,
            service_needed: service_needed.to_string(),
            customer_name: customer_name.to_string(),
            customer_phone: customer_phone.to_string(),
        }
    }

    /// Override the default 60-minute duration.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Event summary line for the calendar entry.
    pub fn summary(&self) -> String {
        format!("Plumbing: {} for {}", self.service_needed, self.customer_name)
    }

    /// Event description body for the calendar entry.
    pub fn description(&self) -> String {
        format!(
            "Service: {} for {} ({}).",
            self.service_needed, self.customer_name, self.customer_phone
        )
    }
}

/// Why a booking was turned down.
///
/// These are normal negative outcomes, distinguished from dependency
/// failures so the conversational layer can word each one appropriately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The requested interval overlaps an existing commitment.
    SlotTaken,

    /// The event sink refused or never received the create request.
    SinkFailed,
}

/// Outcome of an appointment-booking attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingResult {
    /// The event was written to the calendar.
    Confirmed(EventId),

    /// No event was written; the reason says why.
    Rejected(RejectReason),
}

impl BookingResult {
    /// Check whether the booking went through.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingResult::Confirmed(_))
    }
}

/// Outcome of an emergency-availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmergencyStatus {
    /// The postcode is outside the configured service area.
    /// The calendar is never consulted for these.
    OutOfArea,

    /// An emergency block is present in the lookahead window, or the
    /// calendar source could not be read (the gate fails closed).
    Blocked,

    /// The plumber appears free for an immediate call-out.
    Available,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AppointmentRequest {
        AppointmentRequest::new(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "2:30 PM",
            "burst pipe repair",
            "Ada Lovelace",
            "07700 900123",
        )
    }

    #[test]
    fn test_summary_and_description() {
        let req = request();
        assert_eq!(req.summary(), "Plumbing: burst pipe repair for Ada Lovelace");
        assert_eq!(
            req.description(),
            "Service: burst pipe repair for Ada Lovelace (07700 900123)."
        );
    }

    #[test]
    fn test_duration_defaults_to_none() {
        assert_eq!(request().duration_minutes, None);
        assert_eq!(request().with_duration(90).duration_minutes, Some(90));
    }

    #[test]
    fn test_booking_result_confirmed() {
        let ok = BookingResult::Confirmed(EventId("abc123".to_string()));
        assert!(ok.is_confirmed());
        assert!(!BookingResult::Rejected(RejectReason::SlotTaken).is_confirmed());
    }
}
