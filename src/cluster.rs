//! K-means clustering of pickup points.
//!
//! Distances are plain Euclidean on (lat, lng), which is close enough for
//! same-city pooling. Seeding is k-means++ driven by an RNG seeded from the
//! input coordinates, so identical input always yields identical clusters.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use tracing::{debug, warn};

use crate::config::{DEFAULT_KMEANS_MAX_ITERATIONS, Deadline};
use crate::error::PlannerError;
use crate::traits::{Clustering, PickupClusterer};

/// Mixed into the input hash to seed k-means++.
pub(crate) const KMEANS_SEED: u64 = 0x6361_7270_6f6f_6c21;

#[derive(Debug, Clone)]
pub struct KMeansClusterer {
    pub max_iterations: usize,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_KMEANS_MAX_ITERATIONS,
        }
    }
}

impl KMeansClusterer {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl PickupClusterer for KMeansClusterer {
    fn cluster(
        &self,
        points: &[(f64, f64)],
        k: usize,
        deadline: &Deadline,
    ) -> Result<Clustering, PlannerError> {
        if k == 0 {
            return Err(PlannerError::InvalidConfig(
                "cluster count must be positive".to_string(),
            ));
        }
        if k >= points.len() {
            return Ok(Clustering {
                labels: (0..points.len()).collect(),
                iterations: 0,
                converged: true,
            });
        }

        let mut rng = StdRng::seed_from_u64(input_seed(points));
        let mut centers = seed_centers(points, k, &mut rng);
        let mut labels = vec![usize::MAX; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        // at least one pass so every point gets a label
        while iterations < self.max_iterations.max(1) {
            deadline.check()?;
            iterations += 1;

            let mut changed = false;
            for (label, point) in labels.iter_mut().zip(points) {
                let nearest = nearest_center(*point, &centers);
                if *label != nearest {
                    *label = nearest;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }

            update_centers(points, &labels, &mut centers);
        }

        if converged {
            debug!(points = points.len(), k, iterations, "k-means converged");
        } else {
            warn!(
                points = points.len(),
                k, iterations, "k-means hit iteration cap, using last assignment"
            );
        }

        Ok(Clustering {
            labels,
            iterations,
            converged,
        })
    }
}

fn input_seed(points: &[(f64, f64)]) -> u64 {
    let mut hasher = FxHasher::default();
    for (lat, lng) in points {
        hasher.write_u64(lat.to_bits());
        hasher.write_u64(lng.to_bits());
    }
    hasher.finish() ^ KMEANS_SEED
}

fn squared_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

/// Index of the closest center; ties go to the lowest index.
fn nearest_center(point: (f64, f64), centers: &[(f64, f64)]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, *center);
        if dist < best_dist {
            best_dist = dist;
            best = index;
        }
    }
    best
}

/// k-means++: each next center is drawn proportionally to its squared
/// distance from the closest center already chosen.
fn seed_centers(points: &[(f64, f64)], k: usize, rng: &mut StdRng) -> Vec<(f64, f64)> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[rng.gen_range(0..points.len())]);

    while centers.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|point| {
                centers
                    .iter()
                    .map(|center| squared_distance(*point, *center))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        // every remaining point coincides with a center
        if total <= 0.0 {
            centers.push(centers[centers.len() - 1]);
            continue;
        }

        let mut target = rng.gen_range(0.0..total);
        let mut chosen = points.len() - 1;
        for (index, weight) in weights.iter().enumerate() {
            if target < *weight {
                chosen = index;
                break;
            }
            target -= weight;
        }
        centers.push(points[chosen]);
    }

    centers
}

/// Moves each center to the mean of its members. Empty clusters keep their
/// previous center.
fn update_centers(points: &[(f64, f64)], labels: &[usize], centers: &mut [(f64, f64)]) {
    let mut sums = vec![(0.0, 0.0, 0usize); centers.len()];
    for (point, label) in points.iter().zip(labels) {
        let entry = &mut sums[*label];
        entry.0 += point.0;
        entry.1 += point.1;
        entry.2 += 1;
    }
    for (center, (lat, lng, count)) in centers.iter_mut().zip(sums) {
        if count > 0 {
            *center = (lat / count as f64, lng / count as f64);
        }
    }
}
