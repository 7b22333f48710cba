//! Graph construction, A* search and per-line route planning

pub mod astar;
pub mod graph;
pub mod route_plan;
pub mod to_geojson;

pub use astar::{PathSolver, solve};
pub use graph::{GraphNode, RoutingGraph};
pub use route_plan::{RoutePlan, plan_route};
pub use to_geojson::vehicles_to_geojson;
