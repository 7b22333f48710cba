use std::fmt;

use crate::model::geometry::{Point, Segment};
use crate::model::vehicle::HaltReason;
use crate::{Error, LineId};

/// Named stop at a grid coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub coord: Point,
    /// Lines whose current route serves this stop
    pub lines: Vec<LineId>,
}

impl Stop {
    pub fn new(name: impl Into<String>, coord: Point) -> Self {
        Self {
            name: name.into(),
            coord,
            lines: Vec::new(),
        }
    }
}

/// Start, end and intermediate stops of a line, by stop name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteStops {
    pub start: String,
    pub end: String,
    pub via: Vec<String>,
}

impl RouteStops {
    pub fn new(start: impl Into<String>, end: impl Into<String>, via: Vec<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            via,
        }
    }

    /// Splits an ordered stop list into start, via and end
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoute`] for fewer than two stops
    pub fn from_sequence(stops: &[String]) -> Result<Self, Error> {
        match stops {
            [start, via @ .., end] => Ok(Self::new(start.clone(), end.clone(), via.to_vec())),
            _ => Err(Error::InvalidRoute(stops.len())),
        }
    }

    /// View of the route in travel order
    pub fn directed(&self, reversed: bool) -> DirectedRoute<'_> {
        let mut via: Vec<&str> = self.via.iter().map(String::as_str).collect();
        if reversed {
            via.reverse();
            DirectedRoute {
                start: &self.end,
                end: &self.start,
                via,
            }
        } else {
            DirectedRoute {
                start: &self.start,
                end: &self.end,
                via,
            }
        }
    }

    /// All stop names in authored order
    pub fn stop_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.start.as_str())
            .chain(self.via.iter().map(String::as_str))
            .chain(std::iter::once(self.end.as_str()))
    }
}

impl fmt::Display for RouteStops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        for stop in &self.via {
            write!(f, " - {stop}")?;
        }
        write!(f, " - {}", self.end)
    }
}

/// A route as seen by a vehicle travelling in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedRoute<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub via: Vec<&'a str>,
}

impl<'a> DirectedRoute<'a> {
    /// Stop names in travel order
    pub fn stops(&self) -> impl Iterator<Item = &'a str> + '_ {
        std::iter::once(self.start)
            .chain(self.via.iter().copied())
            .chain(std::iter::once(self.end))
    }
}

/// Planned geometry of a line in both directions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinePaths {
    pub forward: Vec<Segment>,
    pub reverse: Vec<Segment>,
    /// First planning failure in either direction
    pub halt: Option<HaltReason>,
}

/// Scheduled line with its authored and current route
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    pub color: String,
    /// Route as loaded, used to undo edits
    pub authored: RouteStops,
    /// Route vehicles currently follow
    pub route: RouteStops,
    pub(crate) paths: Option<LinePaths>,
}

impl Line {
    pub fn new(id: LineId, color: impl Into<String>, route: RouteStops) -> Self {
        Self {
            id,
            color: color.into(),
            authored: route.clone(),
            route,
            paths: None,
        }
    }

    /// Cached geometry for one direction, if planned
    pub fn path(&self, reversed: bool) -> Option<&[Segment]> {
        self.paths.as_ref().map(|paths| {
            if reversed {
                paths.reverse.as_slice()
            } else {
                paths.forward.as_slice()
            }
        })
    }

    pub fn paths(&self) -> Option<&LinePaths> {
        self.paths.as_ref()
    }

    pub fn invalidate_paths(&mut self) {
        self.paths = None;
    }

    pub fn is_halted(&self) -> bool {
        self.paths.as_ref().is_some_and(|paths| paths.halt.is_some())
    }

    /// Restores the authored route; returns whether anything changed
    pub fn reset_route(&mut self) -> bool {
        let changed = self.route != self.authored;
        self.route = self.authored.clone();
        self.invalidate_paths();
        changed
    }
}
