//! Scenario input: plain records, the JSON reader and the builder that
//! turns a scenario into a running simulation.

mod builder;
mod config;
mod parser;
mod records;

pub use builder::{create_simulation, load_simulation};
pub use config::SimulationConfig;
pub use parser::read_scenario;
pub use records::{LineRecord, Scenario, StopRecord, StreetRecord, VehicleRecord};
