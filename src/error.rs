//! Error types for flowfix.
//!
//! This module defines all error types used throughout the system.
//!
//! Business-rule negatives (an already-taken slot, an out-of-area postcode,
//! an emergency block) are *not* errors — they are ordinary values carried
//! by [`crate::types::BookingResult`] and [`crate::types::EmergencyStatus`].
//! Everything here represents a genuine failure: bad input, bad config, or
//! an unreachable external dependency.

use thiserror::Error;

/// Main error type for flowfix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Scheduling errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Calendar provider errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for flowfix.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors in interval arithmetic and request validation.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Interval construction with `end <= start`. Programmer error: validated
    /// input should never produce this.
    #[error("invalid interval: end ({end}) is not after start ({start})")]
    InvalidInterval { start: String, end: String },

    /// A civil time that does not exist in the business timezone on the
    /// requested date (inside a DST spring-forward gap).
    #[error("time {time} does not exist on {date} in timezone {timezone}")]
    NonexistentLocalTime {
        date: chrono::NaiveDate,
        time: chrono::NaiveTime,
        timezone: String,
    },

    /// A user-supplied time string matched neither accepted format.
    /// The message is written for a conversational caller: it should
    /// re-confirm the format with the end user rather than crash.
    #[error(
        "could not parse time '{0}'; please confirm the time with the user \
         and provide it in 'HH:MM AM/PM' or 'HH:MM' (24-hour) format"
    )]
    UnparseableTime(String),

    /// A user-supplied date string was not `YYYY-MM-DD`.
    #[error("could not parse date '{0}'; expected YYYY-MM-DD format")]
    UnparseableDate(String),
}

/// Errors from the external calendar provider.
///
/// Raw transport/auth errors are converted to these at the adapter boundary;
/// the inner string is for logs only and never shown to end users.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The busy-interval source could not be read.
    #[error("calendar source unavailable: {0}")]
    SourceUnavailable(String),

    /// The event sink rejected or never received a create request.
    #[error("calendar sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Errors related to configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid config value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required config: {0}")]
    MissingRequired(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_time_message_prompts_reconfirmation() {
        let err = ScheduleError::UnparseableTime("half past two".to_string());
        let msg = err.to_string();
        assert!(msg.contains("half past two"));
        assert!(msg.contains("HH:MM AM/PM"));
        assert!(msg.contains("24-hour"));
    }

    #[test]
    fn test_calendar_error_wraps_into_main_error() {
        let err: Error = CalendarError::SourceUnavailable("503".to_string()).into();
        assert!(matches!(
            err,
            Error::Calendar(CalendarError::SourceUnavailable(_))
        ));
    }
}
