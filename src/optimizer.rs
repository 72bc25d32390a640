//! Daily route optimizer.
//!
//! Turns the day's committed orders and pending requests into service points,
//! resolves missing coordinates, splits the day into zones, builds each zone's
//! tour and reports what changed against the naive chronological baseline.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rayon::prelude::*;
use serde::Serialize;

use crate::clock;
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::geocode::resolve_all;
use crate::haversine::TravelModel;
use crate::point::{PointKind, ServicePoint, sort_chronologically};
use crate::slots::SlotCalendar;
use crate::solver::{RouteResult, UnassignedPoint, build_tour};
use crate::traits::{GeoResolver, PendingRequest, ServiceOrder};
use crate::zone::{Zone, ZoneClassifier};

/// A point's slot before and after optimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotChange {
    pub id: String,
    pub kind: PointKind,
    pub zone: Zone,
    #[serde(with = "clock::hhmm::option")]
    pub before: Option<NaiveTime>,
    #[serde(with = "clock::hhmm")]
    pub after: NaiveTime,
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDiagnostics {
    pub fixed_points: usize,
    pub movable_points: usize,
    /// Points whose coordinates came with the input.
    pub pre_resolved: usize,
    /// Points resolved by the geocoder during this run.
    pub resolved: usize,
    /// Points planned from the reference center for lack of coordinates.
    pub degraded: usize,
    pub zones_processed: usize,
    pub unassigned: usize,
    /// Fixed points committed inside the lunch break.
    pub fixed_over_lunch: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub date: NaiveDate,
    /// One route per zone that had at least one point, ordered by zone.
    pub routes: Vec<RouteResult>,
    /// Movable points whose slot changed.
    pub moved_points: Vec<SlotChange>,
    /// Fixed points and movable points that kept their slot.
    pub kept_points: Vec<SlotChange>,
    /// Movable points left out for lack of slots. In neither list above.
    pub unassigned: Vec<UnassignedPoint>,
    pub baseline_distance_km: f64,
    pub baseline_time_minutes: u32,
    pub optimized_distance_km: f64,
    pub optimized_time_minutes: u32,
    /// Baseline minus optimized. Negative when the optimizer made it worse.
    pub distance_reduction_km: f64,
    pub time_reduction_minutes: i64,
    pub diagnostics: RunDiagnostics,
}

pub struct DailyRouteOptimizer {
    config: PlannerConfig,
    resolver: Arc<dyn GeoResolver>,
    model: TravelModel,
    classifier: ZoneClassifier,
    calendar: SlotCalendar,
}

impl DailyRouteOptimizer {
    pub fn new(
        config: PlannerConfig,
        resolver: Arc<dyn GeoResolver>,
    ) -> Result<Self, PlannerError> {
        config.validate()?;
        Ok(Self {
            model: TravelModel::new(config.speed_kmh, config.reference_center),
            classifier: ZoneClassifier::new(config.reference_center, config.zones.clone()),
            calendar: SlotCalendar::new(&config.calendar),
            resolver,
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan one day.
    ///
    /// Fails only on malformed input, before any lookup is made. Addresses
    /// that cannot be resolved are planned from the reference center.
    pub async fn optimize_day<F, M>(
        &self,
        date: NaiveDate,
        fixed: &[F],
        movable: &[M],
    ) -> Result<OptimizationReport, PlannerError>
    where
        F: ServiceOrder,
        M: PendingRequest,
    {
        let points = self.collect_points(fixed, movable)?;
        let (points, mut diagnostics) = self.resolve_points(points).await;
        diagnostics.fixed_points = fixed.len();
        diagnostics.movable_points = movable.len();
        Ok(self.plan(date, points, diagnostics))
    }

    fn collect_points<F, M>(
        &self,
        fixed: &[F],
        movable: &[M],
    ) -> Result<Vec<ServicePoint>, PlannerError>
    where
        F: ServiceOrder,
        M: PendingRequest,
    {
        let default_duration = self.config.service_duration_minutes;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut points = Vec::with_capacity(fixed.len() + movable.len());

        for (index, order) in fixed.iter().enumerate() {
            check_id("fixed", index, order.id(), &mut seen)?;
            let point = ServicePoint::fixed(
                order.id().trim(),
                order.client_name(),
                order.address(),
                order.scheduled_time(),
                order.service_duration_minutes().unwrap_or(default_duration),
            )
            .with_coordinates(order.coordinates())
            .with_zone_tag(order.zone_tag());
            points.push(point);
        }

        for (index, request) in movable.iter().enumerate() {
            check_id("movable", index, request.id(), &mut seen)?;
            let point = ServicePoint::movable(
                request.id().trim(),
                request.client_name(),
                request.address(),
                request.provisional_time(),
                request.service_duration_minutes().unwrap_or(default_duration),
            )
            .with_coordinates(request.coordinates())
            .with_zone_tag(request.zone_tag());
            points.push(point);
        }

        Ok(points)
    }

    async fn resolve_points(
        &self,
        points: Vec<ServicePoint>,
    ) -> (Vec<ServicePoint>, RunDiagnostics) {
        let pending = points
            .iter()
            .filter(|point| point.coordinates().is_none())
            .map(ServicePoint::address);
        let lookups = resolve_all(
            self.resolver.as_ref(),
            pending,
            self.config.resolution.max_concurrent_lookups,
            self.config.resolution.timeout(),
        )
        .await;

        let mut diagnostics = RunDiagnostics::default();
        let points = points
            .into_iter()
            .map(|point| {
                if point.coordinates().is_some() {
                    diagnostics.pre_resolved += 1;
                    return point;
                }
                match lookups.coordinates.get(point.address()) {
                    Some(coordinates) => {
                        diagnostics.resolved += 1;
                        point.with_coordinates(Some(*coordinates))
                    }
                    None => {
                        diagnostics.degraded += 1;
                        point
                    }
                }
            })
            .collect();

        (points, diagnostics)
    }

    fn plan(
        &self,
        date: NaiveDate,
        points: Vec<ServicePoint>,
        mut diagnostics: RunDiagnostics,
    ) -> OptimizationReport {
        let mut baseline = points.clone();
        sort_chronologically(&mut baseline);
        let baseline_distance_km = self.model.route_distance_km(&baseline);
        let baseline_time_minutes = self.model.route_minutes(&baseline);

        let mut zones: BTreeMap<Zone, (Vec<ServicePoint>, Vec<ServicePoint>)> = BTreeMap::new();
        for point in &points {
            let (fixed, movable) = zones.entry(self.classifier.classify(point)).or_default();
            match point.kind() {
                PointKind::Fixed => {
                    if point.scheduled_time().is_some_and(|time| self.calendar.is_lunch(time)) {
                        tracing::debug!(point_id = point.id(), "fixed visit committed over lunch");
                        diagnostics.fixed_over_lunch += 1;
                    }
                    fixed.push(point.clone());
                }
                PointKind::Movable => movable.push(point.clone()),
            }
        }

        let routes: Vec<RouteResult> = zones
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(zone, (fixed, movable))| {
                let occupied: Vec<NaiveTime> =
                    fixed.iter().filter_map(ServicePoint::scheduled_time).collect();
                let slots = self.calendar.available_slots(&occupied);
                build_tour(zone, fixed, movable, &slots, &self.model)
            })
            .collect();

        let optimized_distance_km = routes
            .iter()
            .fold(0.0, |total, route| total + route.total_distance_km);
        let optimized_time_minutes: u32 =
            routes.iter().map(|route| route.total_time_minutes).sum();
        let unassigned: Vec<UnassignedPoint> = routes
            .iter()
            .flat_map(|route| route.unassigned.iter().cloned())
            .collect();

        let (moved_points, kept_points) = diff_slots(&points, &routes);

        diagnostics.zones_processed = routes.len();
        diagnostics.unassigned = unassigned.len();

        let report = OptimizationReport {
            date,
            routes,
            moved_points,
            kept_points,
            unassigned,
            baseline_distance_km,
            baseline_time_minutes,
            optimized_distance_km,
            optimized_time_minutes,
            distance_reduction_km: baseline_distance_km - optimized_distance_km,
            time_reduction_minutes: i64::from(baseline_time_minutes)
                - i64::from(optimized_time_minutes),
            diagnostics,
        };

        tracing::info!(
            %date,
            zones = report.diagnostics.zones_processed,
            moved = report.moved_points.len(),
            kept = report.kept_points.len(),
            unassigned = report.diagnostics.unassigned,
            degraded = report.diagnostics.degraded,
            distance_reduction_km = report.distance_reduction_km,
            time_reduction_minutes = report.time_reduction_minutes,
            "day optimized"
        );

        report
    }
}

fn check_id<'a>(
    kind: &'static str,
    index: usize,
    id: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), PlannerError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(PlannerError::InvalidInput {
            kind,
            index,
            reason: "missing id".to_string(),
        });
    }
    if !seen.insert(id) {
        return Err(PlannerError::InvalidInput {
            kind,
            index,
            reason: format!("duplicate id {id:?}"),
        });
    }
    Ok(())
}

/// Split input points into moved and kept, in input order.
///
/// Movable points absent from every route were dropped and appear in neither.
fn diff_slots(
    points: &[ServicePoint],
    routes: &[RouteResult],
) -> (Vec<SlotChange>, Vec<SlotChange>) {
    let placed: HashMap<&str, (&Zone, NaiveTime)> = routes
        .iter()
        .flat_map(|route| {
            route.sequence.iter().filter_map(move |point| {
                let time = point.scheduled_time()?;
                Some((point.id(), (&route.zone, time)))
            })
        })
        .collect();

    let mut moved = Vec::new();
    let mut kept = Vec::new();
    for point in points {
        let Some((zone, after)) = placed.get(point.id()).copied() else {
            continue;
        };
        let change = SlotChange {
            id: point.id().to_string(),
            kind: point.kind(),
            zone: zone.clone(),
            before: point.scheduled_time(),
            after,
        };
        if point.is_fixed() || change.before == Some(after) {
            kept.push(change);
        } else {
            moved.push(change);
        }
    }
    (moved, kept)
}
