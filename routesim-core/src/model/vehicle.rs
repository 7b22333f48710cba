//! Vehicle state

use std::collections::VecDeque;
use std::fmt;

use geo::Coord;

use crate::model::geometry::{Point, Segment};
use crate::{LineId, VehicleId};

/// Why a vehicle or line stopped moving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// A* could not connect two consecutive stops
    Unreachable { from: Point, to: Point },
    /// The route names a stop that does not exist
    UnknownStop(String),
    /// The vehicle belongs to a line that does not exist
    UnknownLine(LineId),
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Unreachable { from, to } => write!(f, "no path from {from} to {to}"),
            HaltReason::UnknownStop(name) => write!(f, "unknown stop '{name}'"),
            HaltReason::UnknownLine(id) => write!(f, "unknown line {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VehicleStatus {
    #[default]
    Ok,
    Halted(HaltReason),
}

impl VehicleStatus {
    pub fn from_halt(halt: Option<HaltReason>) -> Self {
        halt.map_or(VehicleStatus::Ok, VehicleStatus::Halted)
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, VehicleStatus::Halted(_))
    }
}

/// One scheduled departure of a line
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Registry key, unique per instance
    pub id: VehicleId,
    /// Number shown to riders, shared by all departures of one record
    pub number: i32,
    pub line: LineId,
    pub position: Coord<f64>,
    /// Radians, measured like `atan2(dy, dx)`
    pub heading: f64,
    /// Movement per tick is divided by this; taken from the current street
    pub speed_divisor: u32,
    /// Remaining wait in simulated milliseconds
    pub wait: f64,
    /// Wait before the first departure
    pub initial_wait: f64,
    pub start_station: String,
    pub end_station: String,
    pub last_station: String,
    pub heading_station: String,
    /// True while travelling from the line's end back to its start
    pub reversed: bool,
    pub status: VehicleStatus,
    pub current_street: Option<String>,
    pub(crate) visited: VecDeque<Point>,
    pub(crate) path: VecDeque<Segment>,
    pub(crate) target: Option<Point>,
}

impl Vehicle {
    pub fn new(id: VehicleId, number: i32, line: LineId, initial_wait: f64) -> Self {
        Self {
            id,
            number,
            line,
            position: Coord { x: 0.0, y: 0.0 },
            heading: 0.0,
            speed_divisor: 1,
            wait: initial_wait,
            initial_wait,
            start_station: String::new(),
            end_station: String::new(),
            last_station: String::new(),
            heading_station: String::new(),
            reversed: false,
            status: VehicleStatus::Ok,
            current_street: None,
            visited: VecDeque::new(),
            path: VecDeque::new(),
            target: None,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.status.is_halted()
    }

    pub fn is_waiting(&self) -> bool {
        self.wait > 0.0
    }

    /// Reached the terminus of the current direction and consumed the path
    pub fn has_arrived(&self) -> bool {
        self.last_station == self.end_station && self.path.is_empty() && self.target.is_none()
    }

    /// Segments still to traverse
    pub fn path(&self) -> &VecDeque<Segment> {
        &self.path
    }

    /// Grid point the vehicle is driving towards
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn visited(&self) -> &VecDeque<Point> {
        &self.visited
    }

    /// Records a crossed point, keeping at most `window` entries
    pub(crate) fn remember(&mut self, point: Point, window: usize) {
        if window == 0 {
            return;
        }
        while self.visited.len() >= window {
            self.visited.pop_front();
        }
        self.visited.push_back(point);
    }
}
