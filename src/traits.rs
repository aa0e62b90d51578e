//! Strategy seams for the trip planner.
//!
//! The planner ships a K-means clusterer and a first-fit assigner. Either can
//! be swapped for another strategy without touching grouping or plan output.

use serde::{Deserialize, Serialize};

use crate::config::Deadline;
use crate::error::PlannerError;
use crate::grouping::RideGroup;
use crate::model::Vehicle;

/// Cluster labels for a set of pickup points.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster id per input point, in input order.
    pub labels: Vec<usize>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// False when the iteration cap was hit before assignments settled.
    pub converged: bool,
}

/// Partitions pickup points (lat, lng) into at most `k` clusters.
pub trait PickupClusterer {
    fn cluster(
        &self,
        points: &[(f64, f64)],
        k: usize,
        deadline: &Deadline,
    ) -> Result<Clustering, PlannerError>;
}

/// Trip lifecycle on a vehicle. An idle vehicle has no loading trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripState {
    Loading,
    Dispatched,
}

/// Why a booking could not be placed on any trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Its ride group needs more seats than any vehicle has.
    ExceedsVehicleCapacity,
    /// The request carried no vehicles.
    NoVehicles,
}

/// Trips formed for one vehicle, in formation order.
#[derive(Debug, Clone)]
pub struct VehicleTrips<'a> {
    pub vehicle: &'a Vehicle,
    pub trips: Vec<Vec<RideGroup<'a>>>,
}

#[derive(Debug, Clone)]
pub struct Assignment<'a> {
    /// One entry per input vehicle, in input order.
    pub vehicles: Vec<VehicleTrips<'a>>,
    pub unassigned: Vec<(RideGroup<'a>, UnassignedReason)>,
}

/// Assigns ride groups to vehicle trips under seat and pickup-window limits.
pub trait TripAssigner {
    fn assign<'a>(
        &self,
        groups: Vec<RideGroup<'a>>,
        vehicles: &'a [Vehicle],
        max_wait_minutes: i64,
    ) -> Result<Assignment<'a>, PlannerError>;
}
