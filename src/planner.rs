//! Planner entry points.
//!
//! Each call is a pure function of its request: bookings are grouped by
//! address, optionally pooled by pickup cluster, assigned to vehicle trips and
//! assembled into the plan. Nothing is shared between calls, so independent
//! requests can run in parallel.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::cluster::KMeansClusterer;
use crate::config::{Deadline, SolveLimits};
use crate::error::PlannerError;
use crate::grouping::{RideGroup, group_by_address};
use crate::groups::build_ride_groups;
use crate::haversine::HaversineEstimator;
use crate::model::Vehicle;
use crate::plan::build_plan;
use crate::request::{PlanRequest, PlanResponse};
use crate::solver::FirstFitAssigner;
use crate::traits::{PickupClusterer, TripAssigner};

/// Plans one request with default limits and strategies.
pub fn optimize(request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
    optimize_with(request, &SolveLimits::default())
}

/// Plans one request with explicit limits.
pub fn optimize_with(request: &PlanRequest, limits: &SolveLimits) -> Result<PlanResponse, PlannerError> {
    let clusterer = KMeansClusterer::new(limits.kmeans_max_iterations);
    optimize_with_strategies(request, limits, &clusterer, &FirstFitAssigner)
}

/// Plans independent requests in parallel; results keep input order.
pub fn optimize_batch(requests: &[PlanRequest]) -> Vec<Result<PlanResponse, PlannerError>> {
    requests.par_iter().map(optimize).collect()
}

#[instrument(skip_all, fields(date = %request.date))]
pub fn optimize_with_strategies<C, A>(
    request: &PlanRequest,
    limits: &SolveLimits,
    clusterer: &C,
    assigner: &A,
) -> Result<PlanResponse, PlannerError>
where
    C: PickupClusterer,
    A: TripAssigner,
{
    let deadline = Deadline::start(limits.timeout);
    let options = &request.options;
    options.validate()?;
    request.service_date()?;

    if request.bookings.is_empty() {
        debug!("no bookings to plan");
        return Ok(PlanResponse::empty(request.date.clone(), &request.vehicles));
    }

    let address_groups = group_by_address(&request.bookings);
    debug!(
        bookings = request.bookings.len(),
        groups = address_groups.len(),
        "grouped bookings by address"
    );
    deadline.check()?;

    let groups = pool_groups(address_groups, request, clusterer, &deadline)?;
    deadline.check()?;

    let assignment = assigner.assign(groups, &request.vehicles, options.max_wait_minutes)?;
    deadline.check()?;

    let estimator = HaversineEstimator::new(limits.speed_kmh);
    let (plan, unassigned) = build_plan(assignment, &estimator);

    if !unassigned.is_empty() {
        warn!(count = unassigned.len(), "bookings left unassigned");
    }

    let response = PlanResponse {
        date: request.date.clone(),
        plan,
        unassigned,
    };
    info!(
        vehicles = response.plan.len(),
        trips = response.trip_count(),
        unassigned = response.unassigned.len(),
        "plan built"
    );
    Ok(response)
}

fn pool_groups<'a, C: PickupClusterer>(
    address_groups: Vec<RideGroup<'a>>,
    request: &PlanRequest,
    clusterer: &C,
    deadline: &Deadline,
) -> Result<Vec<RideGroup<'a>>, PlannerError> {
    let options = &request.options;
    let max_seats = request.vehicles.iter().map(Vehicle::capacity).max().unwrap_or(0);

    let Some(k) = options.cluster_count() else {
        return build_ride_groups(address_groups, None, max_seats, options.max_wait_minutes);
    };

    let centroids: Vec<(f64, f64)> = address_groups.iter().map(RideGroup::pickup_centroid).collect();
    let clustering = clusterer.cluster(&centroids, k, deadline)?;
    debug!(
        k,
        iterations = clustering.iterations,
        converged = clustering.converged,
        "clustered pickups"
    );

    build_ride_groups(
        address_groups,
        Some(clustering.labels.as_slice()),
        max_seats,
        options.max_wait_minutes,
    )
}
