//! Google Calendar v3 adapter.
//!
//! Thin REST client over the primary calendar: `freeBusy.query` backs the
//! busy-interval source, `events.list` backs the emergency gate's filtered
//! lookup, and `events.insert` is the event sink. Authentication is a
//! caller-supplied OAuth bearer token; the token-refresh dance lives
//! outside this crate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CalendarError;
use crate::schedule::interval::{BusinessHours, TimeInterval};
use crate::types::{CalendarEvent, EventId};

use super::CalendarProvider;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar client for the primary calendar.
pub struct GoogleCalendar {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GoogleCalendar {
    /// Create a client with an OAuth bearer token.
    pub fn new(token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.to_string(),
        }
    }

    /// Override the API base URL (used to point at a local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn source_err(e: impl std::fmt::Display) -> CalendarError {
        CalendarError::SourceUnavailable(e.to_string())
    }

    fn sink_err(e: impl std::fmt::Display) -> CalendarError {
        CalendarError::SinkUnavailable(e.to_string())
    }
}

// Wire types, limited to the fields this crate reads.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest {
    time_min: String,
    time_max: String,
    time_zone: String,
    items: Vec<FreeBusyItem>,
}

#[derive(Serialize)]
struct FreeBusyItem {
    id: String,
}

#[derive(Deserialize)]
struct FreeBusyResponse {
    calendars: FreeBusyCalendars,
}

#[derive(Deserialize)]
struct FreeBusyCalendars {
    primary: FreeBusyCalendar,
}

#[derive(Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<BusyPeriod>,
}

#[derive(Deserialize)]
struct BusyPeriod {
    start: String,
    end: String,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<EventResource>,
}

#[derive(Deserialize)]
struct EventResource {
    id: String,
    #[serde(default)]
    summary: String,
    start: EventTime,
    end: EventTime,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    /// Absent on all-day events, which carry a `date` field instead.
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Serialize)]
struct InsertEvent<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventTime,
    end: EventTime,
}

#[derive(Deserialize)]
struct InsertedEvent {
    id: String,
}

fn parse_instant(raw: &str, tz: Tz) -> Result<chrono::DateTime<Tz>, CalendarError> {
    DateTime::<FixedOffset>::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&tz))
        .map_err(|e| CalendarError::SourceUnavailable(format!("bad timestamp '{raw}': {e}")))
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn query_busy(
        &self,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Vec<TimeInterval>, CalendarError> {
        let day_start = BusinessHours::anchor(date, NaiveTime::MIN, tz)
            .map_err(Self::source_err)?;
        let day_end = BusinessHours::anchor(date + Duration::days(1), NaiveTime::MIN, tz)
            .map_err(Self::source_err)?;

        let body = FreeBusyRequest {
            time_min: day_start.to_rfc3339(),
            time_max: day_end.to_rfc3339(),
            time_zone: tz.name().to_string(),
            items: vec![FreeBusyItem {
                id: "primary".to_string(),
            }],
        };

        debug!(%date, timezone = tz.name(), "querying free/busy");
        let response = self
            .client
            .post(format!("{}/freeBusy", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(Self::source_err)?
            .error_for_status()
            .map_err(Self::source_err)?;

        let parsed: FreeBusyResponse = response.json().await.map_err(Self::source_err)?;

        let mut intervals = Vec::with_capacity(parsed.calendars.primary.busy.len());
        for period in parsed.calendars.primary.busy {
            let start = parse_instant(&period.start, tz)?;
            let end = parse_instant(&period.end, tz)?;
            match TimeInterval::new(start, end) {
                Ok(interval) => intervals.push(interval),
                // Zero-length busy periods occasionally appear for declined
                // invites; they cannot block anything, so skip them.
                Err(e) => warn!(error = %e, "skipping degenerate busy period"),
            }
        }
        Ok(intervals)
    }

    async fn query_events(
        &self,
        time_min: chrono::DateTime<Tz>,
        time_max: chrono::DateTime<Tz>,
        text_filter: &str,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let tz = time_min.timezone();
        debug!(filter = text_filter, "listing events");
        let response = self
            .client
            .get(format!("{}/calendars/primary/events", self.base_url))
            .bearer_auth(&self.token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("q", text_filter.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(Self::source_err)?
            .error_for_status()
            .map_err(Self::source_err)?;

        let parsed: EventList = response.json().await.map_err(Self::source_err)?;

        let mut events = Vec::with_capacity(parsed.items.len());
        for item in parsed.items {
            let (Some(start), Some(end)) = (item.start.date_time, item.end.date_time) else {
                debug!(id = %item.id, "skipping all-day event");
                continue;
            };
            events.push(CalendarEvent {
                id: EventId(item.id),
                summary: item.summary,
                start: parse_instant(&start, tz)?,
                end: parse_instant(&end, tz)?,
            });
        }
        Ok(events)
    }

    async fn create_event(
        &self,
        summary: &str,
        description: &str,
        interval: &TimeInterval,
    ) -> Result<EventId, CalendarError> {
        let tz_name = interval.start().timezone().name().to_string();
        let body = InsertEvent {
            summary,
            description,
            start: EventTime {
                date_time: Some(interval.start().to_rfc3339()),
                time_zone: Some(tz_name.clone()),
            },
            end: EventTime {
                date_time: Some(interval.end().to_rfc3339()),
                time_zone: Some(tz_name),
            },
        };

        debug!(summary, %interval, "inserting calendar event");
        let response = self
            .client
            .post(format!("{}/calendars/primary/events", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(Self::sink_err)?
            .error_for_status()
            .map_err(Self::sink_err)?;

        let created: InsertedEvent = response.json().await.map_err(Self::sink_err)?;
        Ok(EventId(created.id))
    }
}
