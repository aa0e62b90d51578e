//! Test fixtures for carpool-planner.
//!
//! Provides realistic Las Vegas / Henderson addresses and builders for
//! bookings and vehicles.

#![allow(dead_code)]

pub mod las_vegas_locations;

pub use las_vegas_locations::*;

use carpool_planner::grouping::normalize_address;
use carpool_planner::model::{Booking, BookingInput, Vehicle, VehicleInput};
use carpool_planner::plan::Trip;
use carpool_planner::request::PlanResponse;

pub const SERVICE_DATE: &str = "10/16/2026";

/// Builder for test bookings with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestBooking {
    input: BookingInput,
}

impl TestBooking {
    pub fn new(id: &str) -> Self {
        let pickup = &STRIP_PICKUPS[0];
        let dropoff = &CLINICS[0];
        Self {
            input: BookingInput {
                id: id.to_string(),
                client_name: format!("Client {id}"),
                pickup_time: Some("9:00 AM".to_string()),
                pickup_address: pickup.name.to_string(),
                pickup_latitude: pickup.lat,
                pickup_longitude: pickup.lng,
                appointment_time: Some("10:00 AM".to_string()),
                dropoff_address: dropoff.name.to_string(),
                dropoff_latitude: dropoff.lat,
                dropoff_longitude: dropoff.lng,
                ..BookingInput::default()
            },
        }
    }

    pub fn pickup_at(mut self, time: &str) -> Self {
        self.input.pickup_time = Some(time.to_string());
        self
    }

    pub fn open_pickup(mut self) -> Self {
        self.input.pickup_time = Some("OPEN".to_string());
        self
    }

    pub fn appointment_at(mut self, time: &str) -> Self {
        self.input.appointment_time = Some(time.to_string());
        self
    }

    pub fn from(mut self, location: &Location) -> Self {
        self.input.pickup_address = location.name.to_string();
        self.input.pickup_latitude = location.lat;
        self.input.pickup_longitude = location.lng;
        self
    }

    pub fn to(mut self, location: &Location) -> Self {
        self.input.dropoff_address = location.name.to_string();
        self.input.dropoff_latitude = location.lat;
        self.input.dropoff_longitude = location.lng;
        self
    }

    pub fn pickup_address(mut self, address: &str) -> Self {
        self.input.pickup_address = address.to_string();
        self
    }

    pub fn passengers(mut self, count: i64) -> Self {
        self.input.passenger_count = count;
        self
    }

    pub fn build(self) -> Booking {
        Booking::try_from(self.input).expect("valid test booking")
    }
}

pub fn vehicle(id: &str, capacity: i64) -> Vehicle {
    Vehicle::try_from(VehicleInput {
        id: id.to_string(),
        driver_name: Some(format!("Driver {id}")),
        capacity,
    })
    .expect("valid test vehicle")
}

/// Booking ids per trip for the given vehicle.
pub fn vehicle_trips(response: &PlanResponse, vehicle_id: &str) -> Vec<Vec<String>> {
    response
        .plan
        .iter()
        .find(|entry| entry.vehicle.id().0 == vehicle_id)
        .map(|entry| entry.trips.iter().map(trip_ids).collect())
        .unwrap_or_default()
}

pub fn trip_ids(trip: &Trip) -> Vec<String> {
    trip.bookings.iter().map(|booking| booking.id().0.clone()).collect()
}

pub fn all_trips(response: &PlanResponse) -> Vec<(&Vehicle, &Trip)> {
    response
        .plan
        .iter()
        .flat_map(|entry| entry.trips.iter().map(move |trip| (&entry.vehicle, trip)))
        .collect()
}

/// Normalized (pickup, dropoff) pair; bookings sharing it form one address group.
pub fn route(booking: &Booking) -> (String, String) {
    (
        normalize_address(booking.pickup_address()),
        normalize_address(booking.dropoff_address()),
    )
}

/// Checks the capacity and pickup-window invariants on every trip.
///
/// A trip whose bookings all share one route may exceed the window: address
/// groups are never split, so they ride alone instead.
pub fn assert_plan_invariants(response: &PlanResponse, max_wait_minutes: i64) {
    for (vehicle, trip) in all_trips(response) {
        assert!(
            trip.passenger_count() <= u64::from(vehicle.capacity()),
            "trip {:?} on {} carries {} passengers, capacity {}",
            trip_ids(trip),
            vehicle.id(),
            trip.passenger_count(),
            vehicle.capacity()
        );
        let single_route = trip.bookings.windows(2).all(|pair| route(&pair[0]) == route(&pair[1]));
        assert!(
            single_route || trip.pickup_spread_minutes() <= max_wait_minutes,
            "trip {:?} spreads pickups over {} minutes, limit {}",
            trip_ids(trip),
            trip.pickup_spread_minutes(),
            max_wait_minutes
        );
    }
}
