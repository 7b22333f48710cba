//! Data model for the simulated map
//!
//! Contains the static geometry (stops, streets, lines) and the vehicles
//! moving over it.

pub mod geometry;
pub mod streets;
pub mod transit;
pub mod vehicle;

// Re-export of basic types for convenience
pub use geometry::{Point, Segment, segments_from_points};
pub use streets::Street;
pub use transit::{
    DirectedRoute, Line, LinePaths, PointRegistry, RouteStops, Stop, TransitNetwork,
};
pub use vehicle::{HaltReason, Vehicle, VehicleStatus};
