//! Static entity graph: stops, streets, lines and the known point universe

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use log::warn;

use super::types::{Line, Stop};
use crate::model::geometry::Point;
use crate::model::streets::Street;
use crate::{Error, LineId};

/// Every grid point the simulation knows about, in insertion order.
/// Synthetic midpoints are tracked apart so a graph rebuild can drop them.
#[derive(Debug, Clone, Default)]
pub struct PointRegistry {
    points: Vec<Point>,
    known: HashSet<Point>,
    synthetic: HashSet<Point>,
}

impl PointRegistry {
    /// Adds an authored point; returns false if it was already known
    pub fn insert(&mut self, point: Point) -> bool {
        if self.known.insert(point) {
            self.points.push(point);
            true
        } else {
            false
        }
    }

    pub(crate) fn insert_synthetic(&mut self, point: Point) -> bool {
        let inserted = self.insert(point);
        if inserted {
            self.synthetic.insert(point);
        }
        inserted
    }

    pub(crate) fn clear_synthetic(&mut self) {
        if self.synthetic.is_empty() {
            return;
        }
        self.points.retain(|point| !self.synthetic.contains(point));
        for point in self.synthetic.drain() {
            self.known.remove(&point);
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.known.contains(point)
    }

    pub fn is_synthetic(&self, point: &Point) -> bool {
        self.synthetic.contains(point)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Stops, streets and lines of one map
#[derive(Debug, Clone, Default)]
pub struct TransitNetwork {
    stops: HashMap<String, Stop>,
    stops_by_coord: HashMap<Point, String>,
    /// Ordered by name so street attribution is deterministic
    streets: BTreeMap<String, Street>,
    lines: BTreeMap<LineId, Line>,
    points: PointRegistry,
}

impl TransitNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stop and its coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the name or the coordinate is already taken
    pub fn add_stop(&mut self, stop: Stop) -> Result<(), Error> {
        if self.stops.contains_key(&stop.name) {
            return Err(Error::InvalidData(format!("Duplicate stop '{}'", stop.name)));
        }
        if let Some(existing) = self.stops_by_coord.get(&stop.coord) {
            return Err(Error::InvalidData(format!(
                "Stop '{}' shares coordinate {} with '{existing}'",
                stop.name, stop.coord
            )));
        }

        self.points.insert(stop.coord);
        self.stops_by_coord.insert(stop.coord, stop.name.clone());
        self.stops.insert(stop.name.clone(), stop);
        Ok(())
    }

    /// Registers a street and all of its vertices
    ///
    /// # Errors
    ///
    /// Returns an error if a street with the same name exists
    pub fn add_street(&mut self, street: Street) -> Result<(), Error> {
        if self.streets.contains_key(&street.name) {
            return Err(Error::InvalidData(format!(
                "Duplicate street '{}'",
                street.name
            )));
        }

        for vertex in street.vertices() {
            self.points.insert(vertex);
        }
        self.streets.insert(street.name.clone(), street);
        Ok(())
    }

    /// Registers a line and links it to the stops it serves.
    /// Stop names that do not resolve are kept; vehicles on such a line halt.
    ///
    /// # Errors
    ///
    /// Returns an error if a line with the same id exists
    pub fn add_line(&mut self, line: Line) -> Result<(), Error> {
        if self.lines.contains_key(&line.id) {
            return Err(Error::InvalidData(format!("Duplicate line {}", line.id)));
        }

        for name in line.authored.stop_names() {
            if !self.stops.contains_key(name) {
                warn!("Line {} references unknown stop '{name}'", line.id);
            }
        }

        self.lines.insert(line.id, line);
        self.index_stop_lines();
        Ok(())
    }

    /// Recomputes which lines serve each stop from the current routes
    pub(crate) fn index_stop_lines(&mut self) {
        for stop in self.stops.values_mut() {
            stop.lines.clear();
        }
        for line in self.lines.values() {
            for name in line.route.stop_names() {
                if let Some(stop) = self.stops.get_mut(name)
                    && !stop.lines.contains(&line.id)
                {
                    stop.lines.push(line.id);
                }
            }
        }
    }

    pub fn stop(&self, name: &str) -> Option<&Stop> {
        self.stops.get(name)
    }

    /// Stop located exactly at the point
    pub fn stop_at(&self, point: &Point) -> Option<&Stop> {
        self.stops_by_coord
            .get(point)
            .and_then(|name| self.stops.get(name))
    }

    pub fn stop_coord(&self, name: &str) -> Option<Point> {
        self.stops.get(name).map(|stop| stop.coord)
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn street(&self, name: &str) -> Option<&Street> {
        self.streets.get(name)
    }

    pub fn street_mut(&mut self, name: &str) -> Option<&mut Street> {
        self.streets.get_mut(name)
    }

    /// Streets in name order
    pub fn streets(&self) -> impl DoubleEndedIterator<Item = &Street> {
        self.streets.values()
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.get_mut(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub(crate) fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.lines.values_mut()
    }

    pub fn points(&self) -> &PointRegistry {
        &self.points
    }

    /// Split borrow used by the graph builder
    pub(crate) fn build_parts(&mut self) -> (&mut PointRegistry, &mut BTreeMap<String, Street>) {
        (&mut self.points, &mut self.streets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteStops;

    #[test]
    fn test_point_registry_dedup() {
        let mut points = PointRegistry::default();
        assert!(points.insert(Point::new(1, 1)));
        assert!(!points.insert(Point::new(1, 1)));
        assert!(points.insert_synthetic(Point::new(2, 2)));
        assert_eq!(points.len(), 2);

        points.clear_synthetic();
        assert_eq!(points.as_slice(), &[Point::new(1, 1)]);
        assert!(!points.contains(&Point::new(2, 2)));
    }

    #[test]
    fn test_stop_reverse_lookup() {
        let mut network = TransitNetwork::new();
        network.add_stop(Stop::new("A", Point::new(0, 0))).unwrap();
        assert_eq!(network.stop_at(&Point::new(0, 0)).unwrap().name, "A");
        assert!(network.stop_at(&Point::new(1, 0)).is_none());
        assert!(network.add_stop(Stop::new("A", Point::new(5, 5))).is_err());
        assert!(network.add_stop(Stop::new("B", Point::new(0, 0))).is_err());
    }

    #[test]
    fn test_line_links_stops() {
        let mut network = TransitNetwork::new();
        network.add_stop(Stop::new("A", Point::new(0, 0))).unwrap();
        network.add_stop(Stop::new("B", Point::new(10, 0))).unwrap();
        network
            .add_line(Line::new(7, "red", RouteStops::new("A", "B", vec![])))
            .unwrap();
        assert_eq!(network.stop("A").unwrap().lines, vec![7]);
        assert_eq!(network.stop("B").unwrap().lines, vec![7]);
    }
}
