//! Appointment scheduling core.
//!
//! This is the part of the system with real invariants: no double-booking,
//! every offered slot inside business hours, all interval math in the fixed
//! business timezone.
//!
//! Dependency order, leaves first: [`interval`] primitives, the calendar
//! adapter (in [`crate::calendar`]), the [`availability`] calculator, the
//! [`booking`] writer, and the [`emergency`] gate alongside it.
//!
//! The ledger of truth is entirely external — the calendar provider — so
//! there is no in-process shared scheduling state and no locking. The one
//! hazard that leaves is a time-of-check/time-of-use race between showing
//! availability and booking; see [`booking`] for how it is narrowed (not
//! eliminated).

pub mod availability;
pub mod booking;
pub mod emergency;
pub mod interval;

pub use availability::{compute_available_slots, AvailabilityCalculator, SlotCandidate};
pub use booking::{parse_start_time, AppointmentWriter};
pub use emergency::EmergencyGate;
pub use interval::{BusinessHours, TimeInterval};
