//! Per-tick vehicle movement along planned paths

use log::{debug, trace, warn};
use rstar::{AABB, RTree};

use super::heading::heading_station;
use crate::loading::SimulationConfig;
use crate::model::{HaltReason, Point, PointRegistry, TransitNetwork, Vehicle, VehicleStatus};
use crate::routing::{RoutePlan, RoutingGraph, plan_route};

/// Spatial index over every known grid point, synthetic midpoints included
pub(crate) type PointIndex = RTree<[i32; 2]>;

pub(crate) fn build_point_index(points: &PointRegistry) -> PointIndex {
    RTree::bulk_load(points.iter().map(<[i32; 2]>::from).collect())
}

/// Upper bound for the proximity half-width, far above any street hop
const MAX_PROXIMITY: f64 = 4096.0;

/// Half-width of the square searched around a vehicle for its next point
pub(crate) fn proximity_tolerance(step: f64) -> i32 {
    if step > 1.0 {
        (step / 2.0 + 1.0).min(MAX_PROXIMITY) as i32
    } else {
        2
    }
}

/// Replaces the remaining path of a vehicle and aims it at the first point
pub(crate) fn apply_plan(vehicle: &mut Vehicle, plan: RoutePlan) {
    vehicle.target = plan.points.first().copied();
    vehicle.path = plan.segments().into();
    if let Some(reason) = &plan.halt {
        warn!(
            "Vehicle {} on line {} halted: {reason}",
            vehicle.number, vehicle.line
        );
    }
    vehicle.status = VehicleStatus::from_halt(plan.halt);
}

/// Read-only view of the session that vehicles move through
pub(crate) struct Movement<'a> {
    network: &'a TransitNetwork,
    graph: &'a RoutingGraph,
    points: &'a PointIndex,
    config: &'a SimulationConfig,
}

impl<'a> Movement<'a> {
    pub(crate) fn new(
        network: &'a TransitNetwork,
        graph: &'a RoutingGraph,
        points: &'a PointIndex,
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            network,
            graph,
            points,
            config,
        }
    }

    /// Puts the vehicle back at the start of its line's current route
    pub(crate) fn reset(&self, vehicle: &mut Vehicle) {
        vehicle.wait = vehicle.initial_wait;
        vehicle.reversed = false;
        vehicle.heading = 0.0;
        vehicle.speed_divisor = 1;
        vehicle.current_street = None;
        vehicle.visited.clear();

        let Some(line) = self.network.line(vehicle.line) else {
            vehicle.path.clear();
            vehicle.target = None;
            vehicle.status = VehicleStatus::Halted(HaltReason::UnknownLine(vehicle.line));
            warn!(
                "Vehicle {} belongs to unknown line {}",
                vehicle.number, vehicle.line
            );
            return;
        };

        let route = &line.route;
        vehicle.start_station.clone_from(&route.start);
        vehicle.last_station.clone_from(&route.start);
        vehicle.end_station.clone_from(&route.end);
        if let Some(coord) = self.network.stop_coord(&route.start) {
            vehicle.position = coord.to_coord();
        }

        apply_plan(vehicle, plan_route(self.graph, self.network, route, false));
        vehicle.heading_station = heading_station(
            route,
            false,
            &vehicle.last_station,
            &vehicle.end_station,
        );
    }

    /// One tick of a single vehicle
    pub(crate) fn advance(&self, vehicle: &mut Vehicle, step: f64) {
        if vehicle.is_waiting() {
            let elapsed = self.config.tick_interval_ms as f64 * step;
            vehicle.wait = (vehicle.wait - elapsed).max(0.0);
            return;
        }

        if vehicle.has_arrived() {
            self.turn_around(vehicle);
            return;
        }

        if let Some(point) = self.reached_target(vehicle, step) {
            self.pass(vehicle, point);
        }

        if vehicle.has_arrived() || vehicle.is_halted() || vehicle.target.is_none() {
            return;
        }

        self.drive(vehicle, step);
        self.update_street(vehicle);
    }

    /// Moves along the heading, stopping on the target instead of driving
    /// past it
    fn drive(&self, vehicle: &mut Vehicle, step: f64) {
        let Some(target) = vehicle.target else {
            return;
        };
        let distance = step / f64::from(vehicle.speed_divisor.max(1));
        let goal = target.to_coord();
        let remaining = (goal.x - vehicle.position.x).hypot(goal.y - vehicle.position.y);

        if distance >= remaining {
            vehicle.position = goal;
        } else {
            vehicle.position.x += distance * vehicle.heading.cos();
            vehicle.position.y += distance * vehicle.heading.sin();
        }
    }

    fn reached_target(&self, vehicle: &Vehicle, step: f64) -> Option<Point> {
        let target = vehicle.target?;
        // only the point just passed is skipped; a path may come back
        // through older ones, e.g. out of a dead end
        if vehicle.visited.back() == Some(&target) {
            return None;
        }

        let r = proximity_tolerance(step);
        let x = vehicle.position.x.round() as i32;
        let y = vehicle.position.y.round() as i32;
        let envelope = AABB::from_corners(
            [x.saturating_sub(r), y.saturating_sub(r)],
            [x.saturating_add(r), y.saturating_add(r)],
        );

        self.points
            .locate_in_envelope(&envelope)
            .map(|&coords| Point::from(coords))
            .find(|point| *point == target)
    }

    /// Snaps onto a reached point and aims at the next one
    fn pass(&self, vehicle: &mut Vehicle, point: Point) {
        vehicle.position = point.to_coord();
        vehicle.remember(point, self.config.visited_window);

        if let Some(line) = self.network.line(vehicle.line) {
            if let Some(stop) = self.network.stop_at(&point)
                && stop.lines.contains(&line.id)
            {
                vehicle.last_station.clone_from(&stop.name);
            }
            vehicle.heading_station = heading_station(
                &line.route,
                vehicle.reversed,
                &vehicle.last_station,
                &vehicle.end_station,
            );
        }

        vehicle.target = vehicle.path.pop_front().map(|segment| segment.to);
        if let Some(next) = vehicle.target {
            let dx = f64::from(next.x) - vehicle.position.x;
            let dy = f64::from(next.y) - vehicle.position.y;
            vehicle.heading = dy.atan2(dx);
        }

        trace!(
            "Vehicle {} passed {point}, heading to {}",
            vehicle.id, vehicle.heading_station
        );
    }

    fn turn_around(&self, vehicle: &mut Vehicle) {
        let Some(line) = self.network.line(vehicle.line) else {
            vehicle.status = VehicleStatus::Halted(HaltReason::UnknownLine(vehicle.line));
            return;
        };

        vehicle.reversed = !vehicle.reversed;
        let directed = line.route.directed(vehicle.reversed);
        vehicle.start_station = directed.start.to_string();
        vehicle.end_station = directed.end.to_string();

        vehicle.visited.clear();
        apply_plan(
            vehicle,
            plan_route(self.graph, self.network, &line.route, vehicle.reversed),
        );
        vehicle.wait = self.config.terminus_wait_ms as f64;
        vehicle.heading_station = heading_station(
            &line.route,
            vehicle.reversed,
            &vehicle.last_station,
            &vehicle.end_station,
        );

        debug!(
            "Vehicle {} (line {}) turned around at {}",
            vehicle.number, vehicle.line, vehicle.start_station
        );
    }

    /// Attributes the vehicle to the last street, in name order, running
    /// through its position and takes that street's traffic as divisor
    fn update_street(&self, vehicle: &mut Vehicle) {
        let tolerance = self.config.street_tolerance;
        if let Some(street) = self
            .network
            .streets()
            .rev()
            .find(|street| street.passes_near(vehicle.position, tolerance))
            && vehicle.current_street.as_deref() != Some(street.name.as_str())
        {
            vehicle.current_street = Some(street.name.clone());
        }

        if let Some(street) = vehicle
            .current_street
            .as_deref()
            .and_then(|name| self.network.street(name))
        {
            vehicle.speed_divisor = street.traffic.max(1);
        }
    }
}
