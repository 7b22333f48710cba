//! Street polylines with traffic and blocking state

use geo::Coord;

use crate::Error;
use crate::model::geometry::{Point, Segment, segments_from_points};

/// Named street made of one or more segments
#[derive(Debug, Clone, PartialEq)]
pub struct Street {
    /// Unique street name
    pub name: String,
    /// Polyline in authored order
    pub segments: Vec<Segment>,
    /// Higher is slower, never below 1
    pub traffic: u32,
    pub blocked: bool,
    /// Midpoint nodes this street owns, filled by the graph builder
    pub synthetic: Vec<Point>,
}

impl Street {
    /// Creates a street from its ordered vertices
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two vertices are given
    pub fn new(name: impl Into<String>, points: &[Point]) -> Result<Self, Error> {
        let name = name.into();
        if points.len() < 2 {
            return Err(Error::InvalidData(format!(
                "Street '{name}' needs at least two points, got {}",
                points.len()
            )));
        }

        Ok(Self {
            name,
            segments: segments_from_points(points),
            traffic: 1,
            blocked: false,
            synthetic: Vec::new(),
        })
    }

    /// Street vertices in polyline order
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments
            .first()
            .map(|segment| segment.from)
            .into_iter()
            .chain(self.segments.iter().map(|segment| segment.to))
    }

    pub fn passes_near(&self, position: Coord<f64>, tolerance: f64) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.passes_near(position, tolerance))
    }

    /// Sets the traffic multiplier
    ///
    /// # Errors
    ///
    /// Returns an error for a level below 1
    pub fn set_traffic(&mut self, level: u32) -> Result<(), Error> {
        if level == 0 {
            return Err(Error::InvalidTraffic(level));
        }
        self.traffic = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_needs_two_points() {
        assert!(Street::new("Short", &[Point::new(0, 0)]).is_err());
        let street = Street::new("Main", &[Point::new(0, 0), Point::new(10, 0)]).unwrap();
        assert_eq!(street.segments.len(), 1);
        assert_eq!(street.traffic, 1);
        assert!(!street.blocked);
    }

    #[test]
    fn test_vertices_round_trip_polyline() {
        let points = [Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)];
        let street = Street::new("Bend", &points).unwrap();
        assert_eq!(street.vertices().collect::<Vec<_>>(), points.to_vec());
    }

    #[test]
    fn test_zero_traffic_rejected() {
        let mut street = Street::new("Main", &[Point::new(0, 0), Point::new(10, 0)]).unwrap();
        assert!(matches!(street.set_traffic(0), Err(Error::InvalidTraffic(0))));
        street.set_traffic(4).unwrap();
        assert_eq!(street.traffic, 4);
    }
}
