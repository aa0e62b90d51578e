//! Planner configuration.
//!
//! `PlannerOptions` is the user-facing part sent with each request.
//! `SolveLimits` holds internal tuning that callers normally leave alone.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::haversine::DEFAULT_SPEED_KMH;

/// Default spread allowed between the first and last pickup of one trip.
pub const DEFAULT_MAX_WAIT_MINUTES: i64 = 15;

/// Default number of pickup clusters when neighbor pooling is enabled.
pub const DEFAULT_GEO_CLUSTERS: i64 = 3;

/// Lloyd iteration cap for K-means.
pub const DEFAULT_KMEANS_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Maximum minutes between the earliest and latest pickup sharing a trip.
    pub max_wait_minutes: i64,
    /// Enables geographic pooling of neighboring pickups.
    pub pool_neighbors: bool,
    /// Target cluster count; ignored unless `pool_neighbors` is set.
    pub geo_clusters: i64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            max_wait_minutes: DEFAULT_MAX_WAIT_MINUTES,
            pool_neighbors: false,
            geo_clusters: DEFAULT_GEO_CLUSTERS,
        }
    }
}

impl PlannerOptions {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.max_wait_minutes < 0 {
            return Err(PlannerError::InvalidConfig(format!(
                "max_wait_minutes must be non-negative, got {}",
                self.max_wait_minutes
            )));
        }
        if self.pool_neighbors && self.geo_clusters <= 0 {
            return Err(PlannerError::InvalidConfig(format!(
                "geo_clusters must be positive when pool_neighbors is enabled, got {}",
                self.geo_clusters
            )));
        }
        Ok(())
    }

    /// Cluster count to use, or `None` when pooling is disabled.
    pub fn cluster_count(&self) -> Option<usize> {
        if self.pool_neighbors && self.geo_clusters > 0 {
            usize::try_from(self.geo_clusters).ok()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveLimits {
    /// Lloyd iterations before K-means gives up on stabilizing.
    pub kmeans_max_iterations: usize,
    /// Wall-clock budget for a whole request.
    pub timeout: Option<Duration>,
    /// Assumed average driving speed for straight-line trip estimates.
    pub speed_kmh: f64,
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            kmeans_max_iterations: DEFAULT_KMEANS_MAX_ITERATIONS,
            timeout: None,
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Wall-clock guard checked between stages.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    timeout: Option<Duration>,
}

impl Deadline {
    pub fn start(timeout: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    pub fn unlimited() -> Self {
        Self::start(None)
    }

    pub fn check(&self) -> Result<(), PlannerError> {
        match self.timeout {
            Some(limit) if self.started.elapsed() > limit => Err(PlannerError::Timeout {
                elapsed_ms: self.started.elapsed().as_millis(),
            }),
            _ => Ok(()),
        }
    }
}
