//! Emergency call-out gating.
//!
//! Two checks run in order. The service-area predicate is free and runs
//! first: an out-of-area postcode is refused without ever touching the
//! calendar. In-area requests then look for emergency-block events in the
//! next few hours.
//!
//! The calendar check fails **closed**: if the source cannot be read, the
//! gate reports blocked rather than risk dispatching a plumber who is
//! actually on another job. Any change here must preserve that bias.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::calendar::CalendarProvider;
use crate::config::BusinessConfig;
use crate::types::EmergencyStatus;

/// Emergency gate bound to a calendar provider and business config.
pub struct EmergencyGate {
    provider: Arc<dyn CalendarProvider>,
    timezone: Tz,
    area_tokens: Vec<String>,
    block_marker: String,
    default_window: Duration,
}

impl EmergencyGate {
    /// Create a gate from the loaded business config.
    pub fn new(config: &BusinessConfig, provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            timezone: config.timezone,
            area_tokens: config.service_area_postcodes.clone(),
            block_marker: config.emergency_info.block_event_summary.clone(),
            default_window: Duration::hours(config.scheduling.emergency_window_hours),
        }
    }

    /// Case-insensitive substring match of any configured area token.
    ///
    /// `"SW1A 1AA"` is in-area for tokens `["SW1", "SW2"]`.
    pub fn is_in_service_area(&self, postcode: &str) -> bool {
        let needle = postcode.to_uppercase();
        self.area_tokens
            .iter()
            .any(|token| needle.contains(&token.to_uppercase()))
    }

    /// Check emergency availability for `postcode`, looking ahead
    /// `within_hours` (config default when `None`) from the current instant.
    pub async fn check(&self, postcode: &str, within_hours: Option<i64>) -> EmergencyStatus {
        let now = Utc::now().with_timezone(&self.timezone);
        self.check_at(now, postcode, within_hours).await
    }

    /// Deterministic variant of [`check`](Self::check) with an explicit
    /// "now", in the business timezone.
    pub async fn check_at(
        &self,
        now: DateTime<Tz>,
        postcode: &str,
        within_hours: Option<i64>,
    ) -> EmergencyStatus {
        if !self.is_in_service_area(postcode) {
            info!(postcode, "emergency request outside service area");
            return EmergencyStatus::OutOfArea;
        }

        let window = within_hours.map(Duration::hours).unwrap_or(self.default_window);
        let until = now + window;
        debug!(postcode, %now, %until, "checking for emergency blocks");

        match self
            .provider
            .query_events(now, until, &self.block_marker)
            .await
        {
            Ok(events) if events.is_empty() => EmergencyStatus::Available,
            Ok(events) => {
                info!(blocks = events.len(), "emergency window blocked");
                EmergencyStatus::Blocked
            }
            Err(e) => {
                // Fail closed: an unreadable calendar counts as blocked.
                warn!(error = %e, "calendar unreadable, failing closed");
                EmergencyStatus::Blocked
            }
        }
    }
}
