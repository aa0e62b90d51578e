//! Request and response shapes exchanged with dispatch tools.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::config::PlannerOptions;
use crate::error::PlannerError;
use crate::model::{Booking, Vehicle};
use crate::plan::{UnassignedBooking, VehiclePlan};

/// Service date format used on the wire, e.g. `10/16/2026`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Service date (`MM/DD/YYYY`), echoed back in the response.
    pub date: String,
    pub bookings: Vec<Booking>,
    pub vehicles: Vec<Vehicle>,
    #[serde(default, alias = "config")]
    pub options: PlannerOptions,
}

impl PlanRequest {
    pub fn new(date: impl Into<String>, bookings: Vec<Booking>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            date: date.into(),
            bookings,
            vehicles,
            options: PlannerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn service_date(&self) -> Result<Date, PlannerError> {
        parse_service_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub date: String,
    /// One entry per request vehicle, in request order.
    pub plan: Vec<VehiclePlan>,
    #[serde(default)]
    pub unassigned: Vec<UnassignedBooking>,
}

impl PlanResponse {
    pub fn empty(date: impl Into<String>, vehicles: &[Vehicle]) -> Self {
        Self {
            date: date.into(),
            plan: vehicles
                .iter()
                .map(|vehicle| VehiclePlan {
                    vehicle: vehicle.clone(),
                    trips: Vec::new(),
                })
                .collect(),
            unassigned: Vec::new(),
        }
    }

    pub fn trip_count(&self) -> usize {
        self.plan.iter().map(|entry| entry.trips.len()).sum()
    }
}

pub fn parse_service_date(value: &str) -> Result<Date, PlannerError> {
    Date::strptime(DATE_FORMAT, value.trim()).map_err(|err| PlannerError::InvalidDate {
        value: value.to_string(),
        reason: err.to_string(),
    })
}
