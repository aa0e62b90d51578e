//! Straight-line trip estimates.
//!
//! Uses great-circle distance and an assumed speed. There is no road
//! network here, so the figures are informational only and never constrain
//! assignment.

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TripEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

/// Haversine-based trip estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_minutes(&self, km: f64) -> f64 {
        if self.speed_kmh <= 0.0 {
            return 0.0;
        }
        km / self.speed_kmh * 60.0
    }

    /// Estimate for visiting `stops` in order.
    pub fn estimate(&self, stops: &[(f64, f64)]) -> TripEstimate {
        let distance_km: f64 = stops
            .windows(2)
            .map(|leg| Self::haversine_km(leg[0], leg[1]))
            .sum();

        TripEstimate {
            distance_km,
            duration_minutes: self.km_to_minutes(distance_km),
        }
    }
}
