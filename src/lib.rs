//! # flowfix
//!
//! Scheduling core for a conversational booking assistant.
//!
//! ## Overview
//!
//! flowfix answers one question and performs one action for a plumbing
//! business: *when is the plumber free*, and *book this appointment*. An
//! external language-model agent decides when to call which tool; this
//! crate owns the part with real invariants — availability computation,
//! double-booking prevention, and the fail-closed emergency gate — over an
//! external calendar provider.
//!
//! ## Core Concepts
//!
//! - **Half-open intervals**: `[start, end)` in one fixed business
//!   timezone; back-to-back appointments never conflict.
//! - **Fresh reads**: booking re-fetches the busy schedule at write time
//!   rather than trusting an earlier availability answer.
//! - **Structured outcomes**: rejections and emergency blocks are values,
//!   not errors; sentences are produced only at the agent boundary.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowfix::{AssistantTools, BusinessConfig, GoogleCalendar};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BusinessConfig::load("config.json")?;
//!     let calendar = Arc::new(GoogleCalendar::new(&std::env::var("CALENDAR_TOKEN")?));
//!     let tools = AssistantTools::new(&config, calendar);
//!     println!("{}", tools.find_available_appointment_slots("2024-06-10").await);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod calendar;
pub mod config;
pub mod error;
pub mod schedule;
pub mod types;

// Re-export commonly used types
pub use agent::AssistantTools;
pub use calendar::{CalendarProvider, GoogleCalendar};
pub use config::BusinessConfig;
pub use error::{Error, Result};
pub use schedule::{
    compute_available_slots, AppointmentWriter, AvailabilityCalculator, BusinessHours,
    EmergencyGate, SlotCandidate, TimeInterval,
};
pub use types::{AppointmentRequest, BookingResult, EmergencyStatus, EventId, RejectReason};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
