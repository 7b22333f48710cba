use serde::{Deserialize, Serialize};

use crate::Millis;

/// Tunables of the simulation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated milliseconds per tick
    pub tick_interval_ms: Millis,
    /// Pause at a terminus before turning around
    pub terminus_wait_ms: Millis,
    /// Gap between consecutive departures of one vehicle record
    pub departure_spacing_ms: Millis,
    /// Instances created per vehicle record
    pub departures_per_vehicle: u32,
    /// Detour threshold for attributing a vehicle to a street segment
    pub street_tolerance: f64,
    /// Crossed points remembered to avoid triggering twice on one point
    pub visited_window: usize,
    /// Step multiplier used when skipping forward one second
    pub fast_forward_step: f64,
    /// Step multiplier used when replaying after a rewind
    pub replay_step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            terminus_wait_ms: 3000,
            departure_spacing_ms: 10_000,
            departures_per_vehicle: 10,
            street_tolerance: 0.1,
            visited_window: 1,
            fast_forward_step: 3.0,
            replay_step: 4.0,
        }
    }
}
