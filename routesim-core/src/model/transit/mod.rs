//! Stops, lines and the network that owns them

pub mod data;
pub mod types;

pub use data::{PointRegistry, TransitNetwork};
pub use types::{DirectedRoute, Line, LinePaths, RouteStops, Stop};
