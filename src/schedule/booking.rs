//! Appointment booking with a write-time conflict re-check.
//!
//! The writer never trusts an earlier availability query. It re-fetches the
//! busy schedule immediately before writing and applies the same strict
//! half-open overlap rule the calculator uses. That narrows — but does not
//! close — the window in which two conversations can race for the same
//! slot: the provider offers no conditional write, so at-most-once booking
//! here is an explicit best-effort guarantee, not a hard invariant.

use std::sync::Arc;

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::calendar::CalendarProvider;
use crate::config::BusinessConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::interval::{BusinessHours, TimeInterval};
use crate::types::{AppointmentRequest, BookingResult, RejectReason};

/// Parse a user-supplied start time.
///
/// Tries the 12-hour form with AM/PM marker first (`"2:30 PM"`), then the
/// 24-hour form (`"14:30"`). Anything else is [`ScheduleError::UnparseableTime`],
/// whose message asks the conversational caller to re-confirm the format.
pub fn parse_start_time(raw: &str) -> std::result::Result<NaiveTime, ScheduleError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ScheduleError::UnparseableTime(raw.to_string()))
}

/// Appointment writer bound to a calendar provider and business config.
pub struct AppointmentWriter {
    provider: Arc<dyn CalendarProvider>,
    timezone: Tz,
    default_duration: Duration,
}

impl AppointmentWriter {
    /// Create a writer from the loaded business config.
    pub fn new(config: &BusinessConfig, provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            timezone: config.timezone,
            default_duration: Duration::minutes(config.scheduling.slot_duration_minutes),
        }
    }

    /// Attempt to book `request`.
    ///
    /// Exactly one create call reaches the event sink on success; zero on
    /// every rejection path. A sink failure is reported as
    /// [`RejectReason::SinkFailed`] and is *not* retried here — retry policy
    /// belongs to the caller.
    pub async fn book(&self, request: &AppointmentRequest) -> Result<BookingResult> {
        let start_time = parse_start_time(&request.start_time)?;
        let start = BusinessHours::anchor(request.date, start_time, self.timezone)?;
        let duration = request
            .duration_minutes
            .map(Duration::minutes)
            .unwrap_or(self.default_duration);
        let interval = TimeInterval::with_duration(start, duration)?;

        // Fresh read at write time, never a cached availability result.
        let busy = self.provider.query_busy(request.date, self.timezone).await?;
        if !interval.clear_of(&busy) {
            info!(%interval, customer = %request.customer_name, "slot taken, rejecting");
            return Ok(BookingResult::Rejected(RejectReason::SlotTaken));
        }

        match self
            .provider
            .create_event(&request.summary(), &request.description(), &interval)
            .await
        {
            Ok(event_id) => {
                info!(%interval, %event_id, "appointment booked");
                Ok(BookingResult::Confirmed(event_id))
            }
            Err(e) => {
                warn!(error = %e, "event sink refused create");
                Ok(BookingResult::Rejected(RejectReason::SinkFailed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::fake::FakeCalendar;
    use crate::error::{CalendarError, Error};
    use chrono::NaiveDate;
    use chrono_tz::Europe::London;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn busy(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeInterval {
        let start =
            BusinessHours::anchor(date(), NaiveTime::from_hms_opt(h1, m1, 0).unwrap(), London)
                .unwrap();
        let end =
            BusinessHours::anchor(date(), NaiveTime::from_hms_opt(h2, m2, 0).unwrap(), London)
                .unwrap();
        TimeInterval::new(start, end).unwrap()
    }

    fn request(time: &str) -> AppointmentRequest {
        AppointmentRequest::new(date(), time, "dripping tap", "Joan Clarke", "07700 900456")
    }

    fn writer(provider: Arc<FakeCalendar>) -> AppointmentWriter {
        AppointmentWriter::new(&crate::config::BusinessConfig::for_testing(), provider)
    }

    #[test]
    fn test_parse_both_accepted_formats() {
        // Twelve-hour and 24-hour forms of the same instant agree.
        assert_eq!(
            parse_start_time("2:30 PM").unwrap(),
            parse_start_time("14:30").unwrap()
        );
        assert_eq!(
            parse_start_time("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_start_time("12:15 AM").unwrap(),
            NaiveTime::from_hms_opt(0, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_unrecognised_forms() {
        for bad in ["half past two", "25:00", "2pm", ""] {
            assert!(
                matches!(parse_start_time(bad), Err(ScheduleError::UnparseableTime(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_overlapping_request_rejected_without_sink_call() {
        let provider = Arc::new(FakeCalendar::with_busy(vec![busy(14, 0, 15, 0)]));
        let result = writer(provider.clone())
            .book(&request("2:30 PM"))
            .await
            .unwrap();

        assert_eq!(result, BookingResult::Rejected(RejectReason::SlotTaken));
        assert_eq!(provider.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_request_creates_exactly_one_event() {
        let provider = Arc::new(FakeCalendar::with_busy(vec![busy(9, 0, 10, 0)]));
        let result = writer(provider.clone())
            .book(&request("2:30 PM"))
            .await
            .unwrap();

        match result {
            BookingResult::Confirmed(id) => assert!(!id.0.is_empty()),
            other => panic!("expected confirmation, got {other:?}"),
        }
        assert_eq!(provider.create_call_count(), 1);
    }

    #[tokio::test]
    async fn test_back_to_back_booking_allowed() {
        // Busy 14:00-15:00; a 15:00 start touches but does not overlap.
        let provider = Arc::new(FakeCalendar::with_busy(vec![busy(14, 0, 15, 0)]));
        let result = writer(provider.clone())
            .book(&request("3:00 PM"))
            .await
            .unwrap();
        assert!(result.is_confirmed());
    }

    #[tokio::test]
    async fn test_second_booking_of_same_slot_rejected() {
        // The re-check sees the first booking because the fake's ledger is
        // shared, mirroring the provider being the single source of truth.
        let provider = Arc::new(FakeCalendar::new());
        let w = writer(provider.clone());
        assert!(w.book(&request("14:30")).await.unwrap().is_confirmed());

        let second = w.book(&request("2:30 PM")).await.unwrap();
        assert_eq!(second, BookingResult::Rejected(RejectReason::SlotTaken));
        assert_eq!(provider.create_call_count(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_is_rejection_not_error() {
        let provider = Arc::new(FakeCalendar::new());
        provider.set_sink_down(true);
        let result = writer(provider).book(&request("14:30")).await.unwrap();
        assert_eq!(result, BookingResult::Rejected(RejectReason::SinkFailed));
    }

    #[tokio::test]
    async fn test_source_failure_propagates_as_error() {
        let provider = Arc::new(FakeCalendar::new());
        provider.set_source_down(true);
        let result = writer(provider.clone()).book(&request("14:30")).await;
        assert!(matches!(
            result,
            Err(Error::Calendar(CalendarError::SourceUnavailable(_)))
        ));
        assert_eq!(provider.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_time_is_schedule_error() {
        let provider = Arc::new(FakeCalendar::new());
        let result = writer(provider).book(&request("sometime soon")).await;
        assert!(matches!(
            result,
            Err(Error::Schedule(ScheduleError::UnparseableTime(_)))
        ));
    }

    #[tokio::test]
    async fn test_explicit_duration_respected() {
        // 90 minutes from 13:00 collides with busy 14:00-15:00.
        let provider = Arc::new(FakeCalendar::with_busy(vec![busy(14, 0, 15, 0)]));
        let req = request("13:00").with_duration(90);
        let result = writer(provider).book(&req).await.unwrap();
        assert_eq!(result, BookingResult::Rejected(RejectReason::SlotTaken));
    }
}
