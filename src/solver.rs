//! First-fit trip assigner.
//!
//! Each vehicle cycles `IDLE -> LOADING -> DISPATCHED -> IDLE`. Ride groups are
//! visited in pickup order; a group joins the first loading trip that has the
//! seats and keeps the pickup spread within `max_wait_minutes`, otherwise it
//! opens a new trip.

use tracing::{debug, warn};

use crate::error::PlannerError;
use crate::grouping::{PickupWindow, RideGroup};
use crate::groups::assignment_order;
use crate::model::{TimeOfDay, Vehicle};
use crate::traits::{Assignment, TripAssigner, TripState, UnassignedReason, VehicleTrips};

#[derive(Debug, Clone)]
struct TripDraft<'a> {
    groups: Vec<RideGroup<'a>>,
    occupancy: u64,
    window: PickupWindow,
    state: TripState,
}

impl<'a> TripDraft<'a> {
    fn open(group: RideGroup<'a>) -> Self {
        Self {
            occupancy: group.passenger_count(),
            window: group.window(),
            groups: vec![group],
            state: TripState::Loading,
        }
    }

    fn load(&mut self, group: RideGroup<'a>) {
        self.occupancy = self.occupancy.saturating_add(group.passenger_count());
        self.window = self.window.merged(&group.window());
        self.groups.push(group);
    }

    /// Pickup of the earliest member; the window is measured from here.
    fn anchor(&self) -> Option<TimeOfDay> {
        self.window.earliest
    }
}

#[derive(Debug, Clone)]
struct VehicleState<'a> {
    vehicle: &'a Vehicle,
    trips: Vec<TripDraft<'a>>,
}

impl<'a> VehicleState<'a> {
    fn new(vehicle: &'a Vehicle) -> Self {
        Self {
            vehicle,
            trips: Vec::new(),
        }
    }

    fn capacity(&self) -> u64 {
        u64::from(self.vehicle.capacity())
    }

    fn loading_trip(&self) -> Option<&TripDraft<'a>> {
        self.trips.last().filter(|trip| trip.state == TripState::Loading)
    }

    fn is_idle(&self) -> bool {
        self.loading_trip().is_none()
    }

    fn accepts(&self, group: &RideGroup<'_>, max_wait_minutes: i64) -> bool {
        self.loading_trip().is_some_and(|trip| {
            trip.occupancy
                .checked_add(group.passenger_count())
                .is_some_and(|total| total <= self.capacity())
                && trip.window.merged(&group.window()).spread_minutes() <= max_wait_minutes
        })
    }

    fn dispatch(&mut self) {
        if let Some(trip) = self.trips.last_mut() {
            trip.state = TripState::Dispatched;
        }
    }

    /// Dispatches the loading trip once `pickup` falls outside its window.
    /// Groups arrive in pickup order, so nothing later can join either.
    fn dispatch_if_expired(&mut self, pickup: TimeOfDay, max_wait_minutes: i64) {
        let expired = self
            .loading_trip()
            .and_then(TripDraft::anchor)
            .is_some_and(|anchor| anchor.minutes_until(pickup) > max_wait_minutes);
        if expired {
            self.dispatch();
        }
    }

    fn load(&mut self, group: RideGroup<'a>) {
        let capacity = self.capacity();
        if let Some(trip) = self.trips.last_mut() {
            trip.load(group);
            if trip.occupancy >= capacity {
                trip.state = TripState::Dispatched;
            }
        }
    }

    fn open_trip(&mut self, group: RideGroup<'a>) {
        self.dispatch();
        let mut trip = TripDraft::open(group);
        if trip.occupancy >= self.capacity() {
            trip.state = TripState::Dispatched;
        }
        self.trips.push(trip);
    }

    fn into_trips(self) -> VehicleTrips<'a> {
        VehicleTrips {
            vehicle: self.vehicle,
            trips: self.trips.into_iter().map(|trip| trip.groups).collect(),
        }
    }
}

/// Greedy first-fit assignment. Not optimal bin packing, but fast and
/// reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitAssigner;

impl TripAssigner for FirstFitAssigner {
    fn assign<'a>(
        &self,
        mut groups: Vec<RideGroup<'a>>,
        vehicles: &'a [Vehicle],
        max_wait_minutes: i64,
    ) -> Result<Assignment<'a>, PlannerError> {
        groups.sort_by(assignment_order);

        let mut states: Vec<VehicleState<'a>> = vehicles.iter().map(VehicleState::new).collect();
        let mut unassigned = Vec::new();
        let max_capacity = vehicles
            .iter()
            .map(|vehicle| u64::from(vehicle.capacity()))
            .max()
            .unwrap_or(0);

        for group in groups {
            if states.is_empty() {
                unassigned.push((group, UnassignedReason::NoVehicles));
                continue;
            }
            if group.passenger_count() > max_capacity {
                warn!(
                    group = group.id().0,
                    passengers = group.passenger_count(),
                    max_capacity,
                    "ride group exceeds every vehicle"
                );
                unassigned.push((group, UnassignedReason::ExceedsVehicleCapacity));
                continue;
            }

            if let Some(pickup) = group.earliest_pickup() {
                for state in states.iter_mut() {
                    state.dispatch_if_expired(pickup, max_wait_minutes);
                }
            }

            if let Some(state) = states
                .iter_mut()
                .find(|state| state.accepts(&group, max_wait_minutes))
            {
                state.load(group);
                continue;
            }

            let target = idle_vehicle(&states, &group).or_else(|| earliest_loading_capable(&states, &group));
            match target {
                Some(index) => states[index].open_trip(group),
                None => {
                    return Err(PlannerError::Internal(format!(
                        "no vehicle can take ride group {} with {} passengers",
                        group.id().0,
                        group.passenger_count()
                    )));
                }
            }
        }

        for state in states.iter_mut() {
            state.dispatch();
        }

        let vehicles: Vec<VehicleTrips<'a>> =
            states.into_iter().map(VehicleState::into_trips).collect();
        debug!(
            trips = vehicles.iter().map(|v| v.trips.len()).sum::<usize>(),
            unassigned = unassigned.len(),
            "first-fit assignment done"
        );

        Ok(Assignment {
            vehicles,
            unassigned,
        })
    }
}

/// First idle vehicle with enough seats for the group alone.
fn idle_vehicle(states: &[VehicleState<'_>], group: &RideGroup<'_>) -> Option<usize> {
    states
        .iter()
        .position(|state| state.is_idle() && state.capacity() >= group.passenger_count())
}

/// Every capable vehicle is still loading: pick the one whose trip started
/// earliest (open trips last, then vehicle order) to dispatch early.
fn earliest_loading_capable(states: &[VehicleState<'_>], group: &RideGroup<'_>) -> Option<usize> {
    states
        .iter()
        .enumerate()
        .filter(|(_, state)| state.capacity() >= group.passenger_count())
        .min_by_key(|(index, state)| {
            let anchor = state.loading_trip().and_then(TripDraft::anchor);
            (anchor.is_none(), anchor, *index)
        })
        .map(|(index, _)| index)
}
