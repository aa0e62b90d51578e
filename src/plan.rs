//! Turns assigned ride groups into the per-vehicle plan.

use serde::{Deserialize, Serialize};

use crate::haversine::HaversineEstimator;
use crate::model::{Booking, BookingId, TimeOfDay, Vehicle};
use crate::traits::{Assignment, UnassignedReason};

/// One vehicle run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Members in boarding order, unmodified.
    pub bookings: Vec<Booking>,
    /// Earliest member pickup; `None` when every member has an open pickup.
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    /// Straight-line estimate: all pickups, then all dropoffs.
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl Trip {
    pub fn passenger_count(&self) -> u64 {
        self.bookings
            .iter()
            .map(|booking| u64::from(booking.passenger_count()))
            .sum()
    }

    /// Minutes between the earliest and latest fixed pickup.
    pub fn pickup_spread_minutes(&self) -> i64 {
        let times = || self.bookings.iter().filter_map(Booking::pickup_time);
        match (times().min(), times().max()) {
            (Some(earliest), Some(latest)) => earliest.minutes_until(latest),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePlan {
    pub vehicle: Vehicle,
    pub trips: Vec<Trip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedBooking {
    pub booking_id: BookingId,
    pub reason: UnassignedReason,
}

/// Builds one plan entry per vehicle (empty ones included, input order kept)
/// and flattens unassigned groups into their bookings.
pub fn build_plan(
    assignment: Assignment<'_>,
    estimator: &HaversineEstimator,
) -> (Vec<VehiclePlan>, Vec<UnassignedBooking>) {
    let plan = assignment
        .vehicles
        .into_iter()
        .map(|vehicle_trips| VehiclePlan {
            vehicle: vehicle_trips.vehicle.clone(),
            trips: vehicle_trips
                .trips
                .into_iter()
                .map(|groups| {
                    let bookings: Vec<&Booking> = groups
                        .iter()
                        .flat_map(|group| group.bookings().iter().copied())
                        .collect();
                    build_trip(&bookings, estimator)
                })
                .collect(),
        })
        .collect();

    let unassigned = assignment
        .unassigned
        .into_iter()
        .flat_map(|(group, reason)| {
            group
                .bookings()
                .iter()
                .map(|booking| UnassignedBooking {
                    booking_id: booking.id().clone(),
                    reason,
                })
                .collect::<Vec<_>>()
        })
        .collect();

    (plan, unassigned)
}

fn build_trip(bookings: &[&Booking], estimator: &HaversineEstimator) -> Trip {
    let start_time = bookings.iter().filter_map(|booking| booking.pickup_time()).min();

    let stops: Vec<(f64, f64)> = bookings
        .iter()
        .map(|booking| booking.pickup_location())
        .chain(bookings.iter().map(|booking| booking.dropoff_location()))
        .collect();
    let estimate = estimator.estimate(&stops);
    let end_time = start_time
        .map(|start| start.saturating_add_minutes(estimate.duration_minutes.ceil() as i64));

    Trip {
        bookings: bookings.iter().map(|booking| (*booking).clone()).collect(),
        start_time,
        end_time,
        distance_km: round_to(estimate.distance_km, 100.0),
        duration_minutes: round_to(estimate.duration_minutes, 10.0),
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
