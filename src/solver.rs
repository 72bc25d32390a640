//! Tour builder: slots one zone's movable visits around its fixed ones.
//!
//! Two greedy heuristics, picked by whether the zone has anchors:
//! - no fixed visits: nearest-neighbor chain seeded at the point closest to
//!   the reference center, consuming slots in order;
//! - fixed visits present: for each open slot, the movable visit with the
//!   smallest detour between the anchors on either side of it.
//!
//! Fixed visits are never moved. Movable visits that do not fit into the
//! remaining slots are reported as unassigned.

use chrono::NaiveTime;
use serde::Serialize;

use crate::haversine::{TravelModel, distance_km};
use crate::point::{ServicePoint, sort_chronologically};
use crate::slots::TimeSlot;
use crate::zone::Zone;

/// Why a movable visit was left out of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnassignedReason {
    /// More candidates than open slots in the zone.
    NoSlotAvailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedPoint {
    pub id: String,
    pub zone: Zone,
    pub reason: UnassignedReason,
}

/// One zone's time-ordered route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub zone: Zone,
    /// Fixed and placed movable visits, ascending by scheduled time.
    pub sequence: Vec<ServicePoint>,
    pub total_distance_km: f64,
    pub total_time_minutes: u32,
    pub unassigned: Vec<UnassignedPoint>,
}

/// Build a zone's route.
///
/// `fixed` points keep their times. `movable` points lose any provisional
/// time and are placed into `slots`, which must be chronological and must
/// not collide with the fixed times.
pub fn build_tour(
    zone: Zone,
    fixed: Vec<ServicePoint>,
    movable: Vec<ServicePoint>,
    slots: &[TimeSlot],
    model: &TravelModel,
) -> RouteResult {
    let (placed, leftover) = if fixed.is_empty() {
        nearest_neighbor(movable, slots, model)
    } else {
        anchored_insertion(&fixed, movable, slots, model)
    };

    let unassigned = leftover
        .into_iter()
        .map(|point| {
            tracing::warn!(
                point_id = point.id(),
                zone = %zone,
                open_slots = slots.len(),
                "no slot left for movable point"
            );
            UnassignedPoint {
                id: point.id().to_string(),
                zone: zone.clone(),
                reason: UnassignedReason::NoSlotAvailable,
            }
        })
        .collect();

    let mut sequence = fixed;
    sequence.extend(placed);
    sort_chronologically(&mut sequence);

    RouteResult {
        total_distance_km: model.route_distance_km(&sequence),
        total_time_minutes: model.route_minutes(&sequence),
        zone,
        sequence,
        unassigned,
    }
}

/// Returns the placed points and the ones that ran out of slots.
fn nearest_neighbor(
    mut pool: Vec<ServicePoint>,
    slots: &[TimeSlot],
    model: &TravelModel,
) -> (Vec<ServicePoint>, Vec<ServicePoint>) {
    let mut placed = Vec::with_capacity(pool.len().min(slots.len()));
    let mut current = model.reference_center;

    for slot in slots {
        let Some(index) = closest_to(&pool, |point| {
            distance_km(current, model.location_of(point))
        }) else {
            break;
        };
        let point = pool.remove(index);
        current = model.location_of(&point);
        if let Some(slotted) = point.slotted(slot.start) {
            placed.push(slotted);
        }
    }

    (placed, pool)
}

fn anchored_insertion(
    fixed: &[ServicePoint],
    mut pool: Vec<ServicePoint>,
    slots: &[TimeSlot],
    model: &TravelModel,
) -> (Vec<ServicePoint>, Vec<ServicePoint>) {
    let mut placed = Vec::with_capacity(pool.len().min(slots.len()));

    for slot in slots {
        if pool.is_empty() {
            break;
        }
        let before = anchor_before(fixed, slot.start);
        let after = anchor_after(fixed, slot.start);

        let detour = |candidate: &ServicePoint| {
            let to_candidate =
                before.map_or(0.0, |anchor| model.point_distance_km(anchor, candidate));
            let from_candidate =
                after.map_or(0.0, |anchor| model.point_distance_km(candidate, anchor));
            to_candidate + from_candidate
        };
        let Some(index) = closest_to(&pool, &detour) else {
            break;
        };
        let point = pool.remove(index);

        tracing::debug!(
            slot = %slot.start.format("%H:%M"),
            before = before.map(ServicePoint::id),
            after = after.map(ServicePoint::id),
            chosen = point.id(),
            detour_km = detour(&point),
            "anchored slot filled"
        );

        if let Some(slotted) = point.slotted(slot.start) {
            placed.push(slotted);
        }
    }

    (placed, pool)
}

/// Index of the lowest-cost point; the first one wins ties.
fn closest_to<F>(pool: &[ServicePoint], cost: F) -> Option<usize>
where
    F: Fn(&ServicePoint) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in pool.iter().enumerate() {
        let value = cost(point);
        if best.is_none_or(|(_, lowest)| value < lowest) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

/// Latest fixed visit strictly before `time`.
fn anchor_before(fixed: &[ServicePoint], time: NaiveTime) -> Option<&ServicePoint> {
    let mut best: Option<(&ServicePoint, NaiveTime)> = None;
    for point in fixed {
        let Some(at) = point.scheduled_time() else {
            continue;
        };
        if at < time && best.is_none_or(|(_, latest)| at > latest) {
            best = Some((point, at));
        }
    }
    best.map(|(point, _)| point)
}

/// Earliest fixed visit strictly after `time`.
fn anchor_after(fixed: &[ServicePoint], time: NaiveTime) -> Option<&ServicePoint> {
    let mut best: Option<(&ServicePoint, NaiveTime)> = None;
    for point in fixed {
        let Some(at) = point.scheduled_time() else {
            continue;
        };
        if at > time && best.is_none_or(|(_, earliest)| at < earliest) {
            best = Some((point, at));
        }
    }
    best.map(|(point, _)| point)
}
