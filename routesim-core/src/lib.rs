//! Routing and simulation engine for scheduled vehicles on a street graph.
//!
//! The crate turns street polylines into a navigable point graph, finds
//! shortest paths over it with A*, and moves vehicles along the planned
//! paths in discrete ticks. Streets can be blocked and lines re-routed
//! while the simulation runs.

pub mod editing;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod simulation;

pub use error::Error;

/// Numeric key of a line
pub type LineId = i32;

/// Registry key of a single vehicle instance
pub type VehicleId = u32;

/// Simulated milliseconds
pub type Millis = u64;

/// Returned by heading lookups that cannot place the vehicle on its route
pub const UNKNOWN_STATION: &str = "unknown";

/// Returned by descriptive queries for unknown keys
pub const NO_INFO: &str = "No info";
