//! Availability slot computation.
//!
//! Candidate slots are generated at a fixed stride from the business-day
//! start. Stride and slot duration are independent: with the defaults, a
//! 60-minute slot is offered every 30 minutes, so adjacent candidates
//! overlap *each other*. That is intentional — the caller gets maximal
//! choice, and the booking path re-checks conflicts anyway.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::calendar::CalendarProvider;
use crate::config::BusinessConfig;
use crate::error::{Result, ScheduleError};
use crate::schedule::interval::{BusinessHours, TimeInterval};

/// A bookable slot offered to the caller.
///
/// Ephemeral: produced per query, never persisted, and possibly stale the
/// moment it is shown (see the booking re-check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    interval: TimeInterval,
}

impl SlotCandidate {
    /// The slot's interval.
    pub fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    /// Slot start instant.
    pub fn start(&self) -> chrono::DateTime<Tz> {
        self.interval.start()
    }

    /// Start time formatted for conversation, e.g. `"09:30 AM"`.
    pub fn label(&self) -> String {
        self.start().format("%I:%M %p").to_string()
    }
}

/// Compute the ordered open slots for one civil date.
///
/// Pure with respect to its arguments: the same `busy` snapshot always
/// yields the same slots. Degenerate business hours, or a slot duration
/// longer than the business day, yield an empty list rather than an error.
pub fn compute_available_slots(
    date: NaiveDate,
    busy: &[TimeInterval],
    hours: &BusinessHours,
    tz: Tz,
    slot_duration: Duration,
    stride: Duration,
) -> std::result::Result<Vec<SlotCandidate>, ScheduleError> {
    let Some((open, close)) = hours.day_bounds(date, tz)? else {
        return Ok(Vec::new());
    };

    let mut slots = Vec::new();
    let mut t = open;
    // Ascending by construction; no sort needed.
    while t + slot_duration <= close {
        let candidate = TimeInterval::with_duration(t, slot_duration)?;
        if candidate.clear_of(busy) {
            slots.push(SlotCandidate {
                interval: candidate,
            });
        }
        t = t + stride;
    }
    Ok(slots)
}

/// Availability calculator bound to a calendar provider and business config.
pub struct AvailabilityCalculator {
    provider: Arc<dyn CalendarProvider>,
    hours: BusinessHours,
    timezone: Tz,
    slot_duration: Duration,
    stride: Duration,
}

impl AvailabilityCalculator {
    /// Create a calculator from the loaded business config.
    pub fn new(config: &BusinessConfig, provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            hours: config.business_hours,
            timezone: config.timezone,
            slot_duration: Duration::minutes(config.scheduling.slot_duration_minutes),
            stride: Duration::minutes(config.scheduling.slot_stride_minutes),
        }
    }

    /// Fetch a fresh busy schedule for `date` and compute the open slots.
    ///
    /// A failing busy-interval source surfaces as an error; a full day is
    /// never silently reported as free.
    pub async fn available_slots(&self, date: NaiveDate) -> Result<Vec<SlotCandidate>> {
        let busy = self.provider.query_busy(date, self.timezone).await?;
        debug!(%date, busy_intervals = busy.len(), "computing availability");

        let slots = compute_available_slots(
            date,
            &busy,
            &self.hours,
            self.timezone,
            self.slot_duration,
            self.stride,
        )?;
        info!(%date, open_slots = slots.len(), "availability computed");
        Ok(slots)
    }
}
