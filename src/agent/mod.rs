//! Tool boundary for the external intent router.
//!
//! The language-model agent, its prompts, and the knowledge-base path live
//! outside this crate. What it needs from us is three tools it can invoke
//! with natural-language-derived arguments, each returning a sentence ready
//! to show the end user:
//!
//! - `find_available_appointment_slots(date)` — date in `YYYY-MM-DD`
//! - `book_appointment(date, time, service, name, phone)` — invoked only
//!   after the router has collected every field and the user has confirmed
//! - `check_emergency_availability(postcode)`
//!
//! Field-collection and confirmation policy are the router's job, not ours;
//! this layer validates what arrives and renders structured outcomes via
//! [`replies`].

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::calendar::CalendarProvider;
use crate::config::BusinessConfig;
use crate::error::ScheduleError;
use crate::schedule::{AppointmentWriter, AvailabilityCalculator, EmergencyGate};
use crate::types::AppointmentRequest;

pub mod replies;

/// The scheduling tools exposed to the intent router.
pub struct AssistantTools {
    config: BusinessConfig,
    calculator: AvailabilityCalculator,
    writer: AppointmentWriter,
    gate: EmergencyGate,
}

impl AssistantTools {
    /// Wire up all three tools over one calendar provider.
    pub fn new(config: &BusinessConfig, provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            calculator: AvailabilityCalculator::new(config, provider.clone()),
            writer: AppointmentWriter::new(config, provider.clone()),
            gate: EmergencyGate::new(config, provider),
            config: config.clone(),
        }
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| ScheduleError::UnparseableDate(raw.to_string()))
    }

    /// Find open slots on a date for non-emergency jobs.
    pub async fn find_available_appointment_slots(&self, date: &str) -> String {
        let parsed = match Self::parse_date(date) {
            Ok(d) => d,
            Err(e) => return replies::error_reply(&e.into()),
        };

        match self.calculator.available_slots(parsed).await {
            Ok(slots) => replies::slots_reply(parsed, &slots),
            Err(e) => replies::error_reply(&e),
        }
    }

    /// Book a non-emergency appointment. All fields are required; the
    /// router must have obtained explicit user confirmation first.
    pub async fn book_appointment(
        &self,
        date: &str,
        time: &str,
        service_needed: &str,
        customer_name: &str,
        customer_phone: &str,
    ) -> String {
        let parsed = match Self::parse_date(date) {
            Ok(d) => d,
            Err(e) => return replies::error_reply(&e.into()),
        };

        let request = AppointmentRequest::new(
            parsed,
            time,
            service_needed,
            customer_name,
            customer_phone,
        );

        match self.writer.book(&request).await {
            Ok(result) => replies::booking_reply(&result),
            Err(e) => replies::error_reply(&e),
        }
    }

    /// Check whether an immediate emergency call-out is possible for a
    /// postcode.
    pub async fn check_emergency_availability(&self, postcode: &str) -> String {
        info!(postcode, "emergency availability requested");
        let status = self.gate.check(postcode, None).await;
        replies::emergency_reply(&status, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::fake::FakeCalendar;

    fn tools() -> (AssistantTools, Arc<FakeCalendar>) {
        let provider = Arc::new(FakeCalendar::new());
        let tools = AssistantTools::new(&BusinessConfig::for_testing(), provider.clone());
        (tools, provider)
    }

    #[tokio::test]
    async fn test_slots_tool_happy_path() {
        let (tools, _) = tools();
        let reply = tools.find_available_appointment_slots("2024-06-10").await;
        assert!(reply.starts_with("Available slots on 2024-06-10:"));
        assert!(reply.contains("09:00 AM"));
        assert!(reply.contains("04:00 PM"));
    }

    #[tokio::test]
    async fn test_slots_tool_bad_date_reprompts() {
        let (tools, _) = tools();
        let reply = tools.find_available_appointment_slots("next tuesday").await;
        assert!(reply.contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_slots_tool_source_down_apologises() {
        let (tools, provider) = tools();
        provider.set_source_down(true);
        let reply = tools.find_available_appointment_slots("2024-06-10").await;
        assert!(reply.contains("try again"));
        assert!(!reply.contains("fake outage"));
    }

    #[tokio::test]
    async fn test_book_tool_round_trip() {
        let (tools, provider) = tools();
        let reply = tools
            .book_appointment(
                "2024-06-10",
                "2:30 PM",
                "leaking radiator valve",
                "Ada Lovelace",
                "07700 900123",
            )
            .await;
        assert!(reply.contains("Booking confirmed"));
        assert_eq!(provider.create_call_count(), 1);

        // Same slot again: the write-time re-check refuses it.
        let reply = tools
            .book_appointment(
                "2024-06-10",
                "14:30",
                "boiler check",
                "Joan Clarke",
                "07700 900456",
            )
            .await;
        assert!(reply.contains("no longer available"));
        assert_eq!(provider.create_call_count(), 1);
    }

    #[tokio::test]
    async fn test_book_tool_bad_time_reprompts() {
        let (tools, provider) = tools();
        let reply = tools
            .book_appointment("2024-06-10", "noonish", "tap", "A", "1")
            .await;
        assert!(reply.contains("HH:MM AM/PM"));
        assert_eq!(provider.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_emergency_tool_out_of_area() {
        let (tools, _) = tools();
        let reply = tools.check_emergency_availability("N1 7AA").await;
        assert!(reply.contains("outside our primary service area"));
    }
}
