//! Business configuration.
//!
//! This module provides the static configuration consumed by the scheduling
//! core: business hours, the fixed business timezone, service-area postcode
//! tokens, emergency call-out info, and scheduling knobs.
//!
//! The config is loaded once at startup into an immutable struct and passed
//! by reference into the calculator, writer, and gate constructors — none of
//! the algorithms reads ambient/global state.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::schedule::interval::BusinessHours;

/// Top-level business configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Daily opening hours, constant across all days.
    #[serde(default)]
    pub business_hours: BusinessHours,

    /// Fixed business timezone. All interval math happens in this zone;
    /// the host-local timezone is never used.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Postcode prefixes that define the service area, e.g. `["SW1", "SW2"]`.
    pub service_area_postcodes: Vec<String>,

    /// Emergency call-out settings.
    pub emergency_info: EmergencyInfo,

    /// Display-only phone number quoted in emergency replies.
    pub business_phone_number: String,

    /// Slot generation and lookahead knobs.
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

/// Emergency call-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyInfo {
    /// Quoted fee, e.g. `"£150"`; includes the first hour of labour.
    pub fee: String,

    /// Summary text that marks a calendar event as an emergency block.
    pub block_event_summary: String,
}

/// Scheduling knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Appointment slot length in minutes.
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i64,

    /// Gap between candidate slot starts in minutes. Independent of the
    /// duration: 60-minute slots offered every 30 minutes overlap each
    /// other, which gives the caller maximal choice.
    #[serde(default = "default_slot_stride")]
    pub slot_stride_minutes: i64,

    /// How far ahead the emergency gate looks for blocks, in hours.
    #[serde(default = "default_emergency_window")]
    pub emergency_window_hours: i64,
}

// Default value functions
fn default_timezone() -> Tz {
    chrono_tz::Europe::London
}

fn default_slot_duration() -> i64 {
    60
}

fn default_slot_stride() -> i64 {
    30
}

fn default_emergency_window() -> i64 {
    2
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slot_duration_minutes: default_slot_duration(),
            slot_stride_minutes: default_slot_stride(),
            emergency_window_hours: default_emergency_window(),
        }
    }
}

impl BusinessConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business_hours.start >= self.business_hours.end {
            return Err(ConfigError::InvalidValue {
                key: "business_hours".to_string(),
                reason: "start must be before end".to_string(),
            });
        }

        if self.service_area_postcodes.is_empty() {
            return Err(ConfigError::MissingRequired(
                "service_area_postcodes".to_string(),
            ));
        }

        if self.emergency_info.block_event_summary.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "emergency_info.block_event_summary".to_string(),
            ));
        }

        if self.scheduling.slot_duration_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.slot_duration_minutes".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.scheduling.slot_stride_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.slot_stride_minutes".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.scheduling.emergency_window_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduling.emergency_window_hours".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Comma-joined service-area tokens, for user-facing replies.
    pub fn service_area_display(&self) -> String {
        self.service_area_postcodes.join(", ")
    }

    /// Create a configuration for testing.
    pub fn for_testing() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            timezone: default_timezone(),
            service_area_postcodes: vec!["SW1".to_string(), "SW2".to_string()],
            emergency_info: EmergencyInfo {
                fee: "£150".to_string(),
                block_event_summary: "EMERGENCY BLOCK".to_string(),
            },
            business_phone_number: "020 7946 0001".to_string(),
            scheduling: SchedulingConfig::default(),
        }
    }
}
