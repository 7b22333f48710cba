pub use crate::{Error, LineId, Millis, NO_INFO, UNKNOWN_STATION, VehicleId};

// Re-export key components
pub use crate::editing::RouteEditor;
pub use crate::loading::{
    LineRecord, Scenario, SimulationConfig, StopRecord, StreetRecord, VehicleRecord,
    create_simulation, load_simulation, read_scenario,
};
pub use crate::model::{
    HaltReason, Line, Point, RouteStops, Segment, Stop, Street, TransitNetwork, Vehicle,
    VehicleStatus,
};
pub use crate::routing::{PathSolver, RoutePlan, RoutingGraph, plan_route, solve};
pub use crate::simulation::{SimClock, Simulation};
