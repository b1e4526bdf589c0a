//! In-memory calendar fake for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::error::CalendarError;
use crate::schedule::interval::TimeInterval;
use crate::types::{CalendarEvent, EventId};

use super::CalendarProvider;

/// Calendar fake backed by plain vectors.
///
/// `source_down` / `sink_down` force the corresponding failure on the next
/// calls; `create_calls` counts sink invocations so tests can assert the
/// exactly-once and never-on-rejection properties.
#[derive(Default)]
pub struct FakeCalendar {
    busy: Mutex<Vec<TimeInterval>>,
    events: Mutex<Vec<CalendarEvent>>,
    pub source_down: AtomicBool,
    pub sink_down: AtomicBool,
    pub create_calls: AtomicUsize,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_busy(intervals: Vec<TimeInterval>) -> Self {
        Self {
            busy: Mutex::new(intervals),
            ..Self::default()
        }
    }

    pub fn add_event(&self, event: CalendarEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn set_source_down(&self, down: bool) {
        self.source_down.store(down, Ordering::SeqCst);
    }

    pub fn set_sink_down(&self, down: bool) {
        self.sink_down.store(down, Ordering::SeqCst);
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn query_busy(
        &self,
        _date: NaiveDate,
        _tz: Tz,
    ) -> Result<Vec<TimeInterval>, CalendarError> {
        if self.source_down.load(Ordering::SeqCst) {
            return Err(CalendarError::SourceUnavailable("fake outage".to_string()));
        }
        Ok(self.busy.lock().unwrap().clone())
    }

    async fn query_events(
        &self,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
        text_filter: &str,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        if self.source_down.load(Ordering::SeqCst) {
            return Err(CalendarError::SourceUnavailable("fake outage".to_string()));
        }
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.summary.contains(text_filter))
            .filter(|e| e.start < time_max && time_min < e.end)
            .cloned()
            .collect())
    }

    async fn create_event(
        &self,
        summary: &str,
        _description: &str,
        interval: &TimeInterval,
    ) -> Result<EventId, CalendarError> {
        if self.sink_down.load(Ordering::SeqCst) {
            return Err(CalendarError::SinkUnavailable("fake outage".to_string()));
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let id = EventId(format!("evt-{}", self.events.lock().unwrap().len() + 1));
        self.events.lock().unwrap().push(CalendarEvent {
            id: id.clone(),
            summary: summary.to_string(),
            start: interval.start(),
            end: interval.end(),
        });
        self.busy.lock().unwrap().push(interval.clone());
        Ok(id)
    }
}
