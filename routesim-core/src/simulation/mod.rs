//! Time-stepped vehicle movement and the session that owns all state

mod clock;
mod heading;
mod movement;
mod session;

pub use clock::SimClock;
pub use heading::heading_station;
pub use session::Simulation;
