//! Real Las Vegas / Henderson places used as pickup and dropoff points.
//!
//! Coordinates sourced from OpenStreetMap.

/// A named place with coordinates. The name doubles as the street address.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Dropoffs: clinics and day programs
// ============================================================================

pub const CLINICS: &[Location] = &[
    Location::new("1800 W Charleston Blvd, Las Vegas, NV 89102", 36.1585, -115.1683),
    Location::new("2040 W Charleston Blvd, Las Vegas, NV 89102", 36.1590, -115.1721),
    Location::new("2880 N Tenaya Way, Las Vegas, NV 89128", 36.2035, -115.2459),
];

// ============================================================================
// Pickups: Strip area
// ============================================================================

pub const STRIP_PICKUPS: &[Location] = &[
    Location::new("3131 S Las Vegas Blvd, Las Vegas, NV 89109", 36.1263781, -115.1658180),
    Location::new("3600 S Las Vegas Blvd, Las Vegas, NV 89109", 36.1126, -115.1767),
    Location::new("3570 S Las Vegas Blvd, Las Vegas, NV 89109", 36.1162, -115.1745),
    Location::new("3799 S Las Vegas Blvd, Las Vegas, NV 89109", 36.1023654, -115.1688720),
    Location::new("3355 S Las Vegas Blvd, Las Vegas, NV 89109", 36.1219193, -115.1689317),
];

// ============================================================================
// Pickups: Henderson
// ============================================================================

pub const HENDERSON_PICKUPS: &[Location] = &[
    Location::new("2300 Paseo Verde Pkwy, Henderson, NV 89052", 36.0308, -115.0825),
    Location::new("1301 W Sunset Rd, Henderson, NV 89014", 36.0614, -115.0631),
    Location::new("2520 St Rose Pkwy, Henderson, NV 89074", 36.0335058, -114.9856162),
    Location::new("1500 N Green Valley Pkwy, Henderson, NV 89074", 36.0137634, -114.9928676),
];

// ============================================================================
// Pickups: North Las Vegas
// ============================================================================

pub const NORTH_PICKUPS: &[Location] = &[
    Location::new("5025 E Lake Mead Blvd, Las Vegas, NV 89156", 36.1450055, -115.0482587),
    Location::new("5035 E Lake Mead Blvd, Las Vegas, NV 89156", 36.1452953, -115.0478347),
    Location::new("4500 E Lake Mead Blvd, Las Vegas, NV 89115", 36.1440711, -115.0634197),
];

/// Every pickup location across the three neighborhoods.
pub fn all_pickups() -> Vec<Location> {
    let mut all = Vec::new();
    all.extend_from_slice(STRIP_PICKUPS);
    all.extend_from_slice(HENDERSON_PICKUPS);
    all.extend_from_slice(NORTH_PICKUPS);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_vegas_area() {
        for loc in all_pickups().iter().chain(CLINICS) {
            assert!(loc.lat > 35.9 && loc.lat < 36.3, "{} lat out of range: {}", loc.name, loc.lat);
            assert!(loc.lng > -115.4 && loc.lng < -114.8, "{} lng out of range: {}", loc.name, loc.lng);
        }
    }
}
