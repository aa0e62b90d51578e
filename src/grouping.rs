//! Ride groups and exact-address grouping.
//!
//! Bookings sharing the same pickup and dropoff address always ride together.
//! Addresses are compared after trimming, collapsing whitespace and
//! lowercasing.

use std::collections::HashMap;

use crate::model::{Booking, TimeOfDay};

/// Stable identity of a ride group: its first-seen position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

/// Earliest and latest fixed pickup times of a set of bookings.
///
/// Open pickups do not widen the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickupWindow {
    pub earliest: Option<TimeOfDay>,
    pub latest: Option<TimeOfDay>,
}

impl PickupWindow {
    pub fn of(time: Option<TimeOfDay>) -> Self {
        Self {
            earliest: time,
            latest: time,
        }
    }

    pub fn merged(&self, other: &PickupWindow) -> PickupWindow {
        PickupWindow {
            earliest: min_time(self.earliest, other.earliest),
            latest: max_time(self.latest, other.latest),
        }
    }

    /// Minutes between the earliest and latest pickup (0 when open).
    pub fn spread_minutes(&self) -> i64 {
        match (self.earliest, self.latest) {
            (Some(earliest), Some(latest)) => earliest.minutes_until(latest),
            _ => 0,
        }
    }
}

fn min_time(a: Option<TimeOfDay>, b: Option<TimeOfDay>) -> Option<TimeOfDay> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_time(a: Option<TimeOfDay>, b: Option<TimeOfDay>) -> Option<TimeOfDay> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Bookings that must share one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RideGroup<'a> {
    id: GroupId,
    bookings: Vec<&'a Booking>,
    /// Summed in `u64` so any number of `u32` bookings adds up exactly.
    passengers: u64,
    window: PickupWindow,
}

impl<'a> RideGroup<'a> {
    pub fn new(id: GroupId, booking: &'a Booking) -> Self {
        Self {
            id,
            bookings: vec![booking],
            passengers: u64::from(booking.passenger_count()),
            window: PickupWindow::of(booking.pickup_time()),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn bookings(&self) -> &[&'a Booking] {
        &self.bookings
    }

    pub fn passenger_count(&self) -> u64 {
        self.passengers
    }

    pub fn window(&self) -> PickupWindow {
        self.window
    }

    pub fn earliest_pickup(&self) -> Option<TimeOfDay> {
        self.window.earliest
    }

    /// Mean pickup coordinate of the members.
    pub fn pickup_centroid(&self) -> (f64, f64) {
        let count = self.bookings.len() as f64;
        let (lat, lng) = self
            .bookings
            .iter()
            .map(|booking| booking.pickup_location())
            .fold((0.0, 0.0), |acc, (lat, lng)| (acc.0 + lat, acc.1 + lng));
        (lat / count, lng / count)
    }

    /// Normalized (pickup, dropoff) route of the first member.
    pub fn route_key(&self) -> (String, String) {
        route_key(self.bookings[0])
    }

    /// Whether absorbing `other` keeps seats and pickup spread within bounds.
    pub fn can_absorb(&self, other: &RideGroup<'_>, max_seats: u32, max_wait_minutes: i64) -> bool {
        self.passengers
            .checked_add(other.passengers)
            .is_some_and(|total| total <= u64::from(max_seats))
            && self.window.merged(&other.window).spread_minutes() <= max_wait_minutes
    }

    /// Takes over `other`'s members, keeping the smaller identity.
    pub fn absorb(&mut self, other: RideGroup<'a>) {
        self.id = self.id.min(other.id);
        self.passengers = self.passengers.saturating_add(other.passengers);
        self.window = self.window.merged(&other.window);
        self.bookings.extend(other.bookings);
    }

    fn push(&mut self, booking: &'a Booking) {
        self.passengers = self
            .passengers
            .saturating_add(u64::from(booking.passenger_count()));
        self.window = self.window.merged(&PickupWindow::of(booking.pickup_time()));
        self.bookings.push(booking);
    }
}

pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn route_key(booking: &Booking) -> (String, String) {
    (
        normalize_address(booking.pickup_address()),
        normalize_address(booking.dropoff_address()),
    )
}

/// Partitions items into classes sharing a key, in first-seen order.
pub fn partition_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<Vec<T>>
where
    K: Eq + std::hash::Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashMap<K, usize> = HashMap::new();
    let mut classes: Vec<Vec<T>> = Vec::new();
    for item in items {
        let k = key(&item);
        match seen.get(&k) {
            Some(&index) => classes[index].push(item),
            None => {
                seen.insert(k, classes.len());
                classes.push(vec![item]);
            }
        }
    }
    classes
}

/// Groups bookings by exact (pickup, dropoff) address pair.
pub fn group_by_address(bookings: &[Booking]) -> Vec<RideGroup<'_>> {
    partition_by_key(bookings, |booking| route_key(booking))
        .into_iter()
        .enumerate()
        .filter_map(|(index, members)| {
            let (first, rest) = members.split_first()?;
            let mut group = RideGroup::new(GroupId(index), *first);
            for &booking in rest {
                group.push(booking);
            }
            Some(group)
        })
        .collect()
}
