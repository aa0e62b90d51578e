//! Errors surfaced by the planner.
//!
//! Bookings that cannot be seated are not errors; they are reported as
//! unassigned next to the partial plan.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid booking {id}: {reason}")]
    InvalidBooking { id: String, reason: String },
    #[error("invalid vehicle {id}: {reason}")]
    InvalidVehicle { id: String, reason: String },
    #[error("invalid time \"{value}\": {reason}")]
    InvalidTime { value: String, reason: String },
    #[error("invalid date \"{value}\": {reason}")]
    InvalidDate { value: String, reason: String },
    #[error("optimization timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u128 },
    #[error("internal planner error: {0}")]
    Internal(String),
}
