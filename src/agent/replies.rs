//! Natural-language reply rendering.
//!
//! The scheduling core traffics in structured outcomes; this module is the
//! only place they become sentences. Nothing here exposes error payloads or
//! stack traces — a dependency failure renders as a generic apology and the
//! detail stays in the logs.

use chrono::NaiveDate;

use crate::config::BusinessConfig;
use crate::error::{Error, ScheduleError};
use crate::schedule::availability::SlotCandidate;
use crate::types::{BookingResult, EmergencyStatus, RejectReason};

/// Render an availability result for the given date.
pub fn slots_reply(date: NaiveDate, slots: &[SlotCandidate]) -> String {
    if slots.is_empty() {
        return format!(
            "Sorry, there are no available slots on {date}. Please try another day."
        );
    }
    let times: Vec<String> = slots.iter().map(SlotCandidate::label).collect();
    format!("Available slots on {date}: {}", times.join(", "))
}

/// Render a booking outcome.
pub fn booking_reply(result: &BookingResult) -> String {
    match result {
        BookingResult::Confirmed(event_id) => format!(
            "Booking confirmed! I've added the appointment to the calendar for you. \
             Event ID: {event_id}"
        ),
        BookingResult::Rejected(RejectReason::SlotTaken) => {
            "I'm sorry, that slot is no longer available. Would you like me to check \
             for other times?"
                .to_string()
        }
        BookingResult::Rejected(RejectReason::SinkFailed) => {
            "Sorry, I was unable to create the appointment. Please try again.".to_string()
        }
    }
}

/// Render an emergency-availability outcome.
pub fn emergency_reply(status: &EmergencyStatus, config: &BusinessConfig) -> String {
    match status {
        EmergencyStatus::OutOfArea => format!(
            "I'm sorry, you appear to be outside our primary service area of {}. \
             We are unable to attend this emergency.",
            config.service_area_display()
        ),
        EmergencyStatus::Blocked => {
            "I'm very sorry, but the plumber is currently on another emergency job \
             and is not immediately available. Please try another service."
                .to_string()
        }
        EmergencyStatus::Available => format!(
            "The plumber appears to be available for an emergency call-out. The fee \
             is {}, which includes the first hour of labour. Please call {} \
             immediately to confirm and provide your full address. This line is for \
             emergencies only.",
            config.emergency_info.fee, config.business_phone_number
        ),
    }
}

/// Render an error for the end user.
///
/// Input mistakes get a precise re-prompt; everything else collapses to an
/// apology so no internal detail crosses the boundary.
pub fn error_reply(error: &Error) -> String {
    match error {
        Error::Schedule(e @ ScheduleError::UnparseableTime(_))
        | Error::Schedule(e @ ScheduleError::UnparseableDate(_)) => e.to_string(),
        _ => "Sorry, I couldn't reach the calendar just now. Please try again in a \
              few minutes."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalendarError;
    use crate::types::EventId;

    #[test]
    fn test_empty_slots_reply_reprompts() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let reply = slots_reply(date, &[]);
        assert!(reply.contains("no available slots on 2024-06-10"));
        assert!(reply.contains("another day"));
    }

    #[test]
    fn test_confirmed_reply_carries_event_id() {
        let reply = booking_reply(&BookingResult::Confirmed(EventId("evt-42".to_string())));
        assert!(reply.contains("Booking confirmed"));
        assert!(reply.contains("evt-42"));
    }

    #[test]
    fn test_emergency_available_quotes_fee_and_phone() {
        let config = BusinessConfig::for_testing();
        let reply = emergency_reply(&EmergencyStatus::Available, &config);
        assert!(reply.contains(&config.emergency_info.fee));
        assert!(reply.contains(&config.business_phone_number));
    }

    #[test]
    fn test_out_of_area_lists_service_area() {
        let config = BusinessConfig::for_testing();
        let reply = emergency_reply(&EmergencyStatus::OutOfArea, &config);
        assert!(reply.contains("SW1, SW2"));
    }

    #[test]
    fn test_dependency_failure_renders_generic_apology() {
        let err = Error::Calendar(CalendarError::SourceUnavailable(
            "HTTP 503 backend oom".to_string(),
        ));
        let reply = error_reply(&err);
        assert!(!reply.contains("503"));
        assert!(reply.contains("try again"));
    }

    #[test]
    fn test_bad_time_renders_reprompt() {
        let err = Error::Schedule(ScheduleError::UnparseableTime("noonish".to_string()));
        assert!(error_reply(&err).contains("HH:MM AM/PM"));
    }
}
