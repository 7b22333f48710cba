//! Path of a line through all of its stops

use itertools::Itertools;
use log::trace;

use super::astar::PathSolver;
use super::graph::RoutingGraph;
use crate::model::{HaltReason, Point, RouteStops, Segment, TransitNetwork, segments_from_points};

/// Result of planning one direction of a route
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePlan {
    /// Concatenated legs, joint stops appear once
    pub points: Vec<Point>,
    /// Set when some leg could not be connected; `points` then holds
    /// whatever the legs produced
    pub halt: Option<HaltReason>,
}

impl RoutePlan {
    pub fn segments(&self) -> Vec<Segment> {
        segments_from_points(&self.points)
    }

    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

/// Plans start → via… → end, or the reverse when `reversed` is set.
///
/// Planning never fails hard: unknown stops and disconnected legs are
/// reported through [`RoutePlan::halt`].
pub fn plan_route(
    graph: &RoutingGraph,
    network: &TransitNetwork,
    route: &RouteStops,
    reversed: bool,
) -> RoutePlan {
    let directed = route.directed(reversed);

    let mut coords = Vec::with_capacity(directed.via.len() + 2);
    for name in directed.stops() {
        match network.stop_coord(name) {
            Some(coord) => coords.push(coord),
            None => {
                return RoutePlan {
                    points: Vec::new(),
                    halt: Some(HaltReason::UnknownStop(name.to_string())),
                };
            }
        }
    }

    let mut solver = PathSolver::new();
    let mut points: Vec<Point> = Vec::new();
    let mut halt = None;

    for (&from, &to) in coords.iter().tuple_windows() {
        let leg = solver.solve(graph, from, to);
        if leg.first() != Some(&from) || leg.last() != Some(&to) {
            trace!("Leg {from} -> {to} is not connected");
            halt.get_or_insert(HaltReason::Unreachable { from, to });
        }

        let skip = usize::from(points.last().is_some() && points.last() == leg.first());
        points.extend(leg.into_iter().skip(skip));
    }

    // A route whose start and end coincide has no legs
    if points.is_empty()
        && let Some(&only) = coords.first()
    {
        points.push(only);
    }

    RoutePlan { points, halt }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Stop, Street};

    fn network() -> TransitNetwork {
        let mut network = TransitNetwork::new();
        network.add_stop(Stop::new("A", Point::new(0, 0))).unwrap();
        network.add_stop(Stop::new("B", Point::new(20, 0))).unwrap();
        network.add_stop(Stop::new("C", Point::new(20, 20))).unwrap();
        network
            .add_street(Street::new("First", &[Point::new(0, 0), Point::new(20, 0)]).unwrap())
            .unwrap();
        network
            .add_street(Street::new("Second", &[Point::new(20, 0), Point::new(20, 20)]).unwrap())
            .unwrap();
        network
    }

    fn build(network: &mut TransitNetwork) -> RoutingGraph {
        let (points, streets) = network.build_parts();
        RoutingGraph::build(points, streets)
    }

    #[test]
    fn test_plan_through_via_stop() {
        let mut network = network();
        let graph = build(&mut network);
        let route = RouteStops::new("A", "C", vec!["B".to_string()]);

        let plan = plan_route(&graph, &network, &route, false);
        assert!(plan.is_complete());
        assert_eq!(
            plan.points,
            vec![
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(20, 0),
                Point::new(20, 10),
                Point::new(20, 20),
            ]
        );
        assert_eq!(plan.segments().len(), 4);
    }

    #[test]
    fn test_reversed_plan_is_exact_reverse() {
        let mut network = network();
        let graph = build(&mut network);
        let route = RouteStops::new("A", "C", vec!["B".to_string()]);

        let forward = plan_route(&graph, &network, &route, false);
        let mut backward = plan_route(&graph, &network, &route, true);
        backward.points.reverse();
        assert_eq!(forward.points, backward.points);
    }

    #[test]
    fn test_blocked_leg_halts() {
        let mut network = network();
        let mut graph = build(&mut network);
        for &mid in &network.street("Second").unwrap().synthetic {
            graph.set_obstacle(mid, true);
        }
        let route = RouteStops::new("A", "C", vec![]);

        let plan = plan_route(&graph, &network, &route, false);
        assert_eq!(
            plan.halt,
            Some(HaltReason::Unreachable {
                from: Point::new(0, 0),
                to: Point::new(20, 20),
            })
        );
        assert_ne!(plan.points.first(), Some(&Point::new(0, 0)));
    }

    #[test]
    fn test_unknown_stop_halts() {
        let mut network = network();
        let graph = build(&mut network);
        let route = RouteStops::new("A", "Nowhere", vec![]);

        let plan = plan_route(&graph, &network, &route, false);
        assert_eq!(plan.halt, Some(HaltReason::UnknownStop("Nowhere".to_string())));
        assert!(plan.points.is_empty());
    }
}
