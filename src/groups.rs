//! Final ride groups: address groups, optionally pooled within geo clusters.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::PlannerError;
use crate::grouping::{RideGroup, partition_by_key};

/// Assignment order: timed groups by earliest pickup, then open groups, ties
/// broken by group id.
pub fn assignment_order(a: &RideGroup<'_>, b: &RideGroup<'_>) -> Ordering {
    match (a.earliest_pickup(), b.earliest_pickup()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id().cmp(&b.id()))
}

/// Builds the ordered ride groups the assigner consumes.
///
/// Without `labels` the address groups pass through unchanged. With labels
/// (one cluster id per address group) each cluster is walked in assignment
/// order and consecutive groups are merged while the result still fits
/// `max_seats` and spans at most `max_wait_minutes` of pickups.
pub fn build_ride_groups<'a>(
    address_groups: Vec<RideGroup<'a>>,
    labels: Option<&[usize]>,
    max_seats: u32,
    max_wait_minutes: i64,
) -> Result<Vec<RideGroup<'a>>, PlannerError> {
    let mut groups = match labels {
        None => address_groups,
        Some(labels) => {
            if labels.len() != address_groups.len() {
                return Err(PlannerError::Internal(format!(
                    "{} cluster labels for {} address groups",
                    labels.len(),
                    address_groups.len()
                )));
            }
            let before = address_groups.len();
            let clusters = partition_by_key(address_groups.into_iter().zip(labels), |(_, label)| **label);
            let mut pooled = Vec::with_capacity(before);
            for cluster in clusters {
                let mut members: Vec<RideGroup<'a>> =
                    cluster.into_iter().map(|(group, _)| group).collect();
                members.sort_by(assignment_order);
                pooled.extend(merge_cluster(members, max_seats, max_wait_minutes));
            }
            debug!(before, after = pooled.len(), "pooled address groups by cluster");
            pooled
        }
    };

    groups.sort_by(assignment_order);
    Ok(groups)
}

fn merge_cluster<'a>(
    members: Vec<RideGroup<'a>>,
    max_seats: u32,
    max_wait_minutes: i64,
) -> Vec<RideGroup<'a>> {
    let mut merged = Vec::new();
    let mut current: Option<RideGroup<'a>> = None;

    for candidate in members {
        current = Some(match current.take() {
            None => candidate,
            Some(mut group) if group.can_absorb(&candidate, max_seats, max_wait_minutes) => {
                group.absorb(candidate);
                group
            }
            Some(group) => {
                merged.push(group);
                candidate
            }
        });
    }

    merged.extend(current);
    merged
}
