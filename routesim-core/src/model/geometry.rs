//! Integer grid points and directed segments between them

use std::fmt;

use geo::Coord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Grid coordinate, the identity key of graph nodes and stop locations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Integer midpoint, rounded towards the smaller coordinate on each axis.
    /// The result does not depend on argument order.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(axis_midpoint(self.x, other.x), axis_midpoint(self.y, other.y))
    }

    /// Euclidean distance
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }

    pub fn to_coord(self) -> Coord<f64> {
        Coord {
            x: f64::from(self.x),
            y: f64::from(self.y),
        }
    }
}

fn axis_midpoint(a: i32, b: i32) -> i32 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    low + (high - low) / 2
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directed hop between two grid points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }

    /// Near-degenerate triangle test: `position` lies on the segment when the
    /// detour through it is shorter than `tolerance`.
    pub fn passes_near(&self, position: Coord<f64>, tolerance: f64) -> bool {
        let from = self.from.to_coord();
        let to = self.to.to_coord();
        let a = (from.x - position.x).hypot(from.y - position.y);
        let b = (to.x - position.x).hypot(to.y - position.y);
        (a + b - self.length()).abs() < tolerance
    }
}

/// Consecutive point pairs of a polyline
pub fn segments_from_points(points: &[Point]) -> Vec<Segment> {
    points
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| Segment::new(from, to))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_is_symmetric() {
        let a = Point::new(10, 3);
        let b = Point::new(1, 8);
        assert_eq!(a.midpoint(b), b.midpoint(a));
        assert_eq!(a.midpoint(b), Point::new(5, 5));
    }

    #[test]
    fn test_midpoint_of_adjacent_points_is_an_endpoint() {
        let a = Point::new(4, 4);
        let b = Point::new(5, 4);
        assert_eq!(a.midpoint(b), a);
    }

    #[test]
    fn test_passes_near() {
        let segment = Segment::new(Point::new(0, 0), Point::new(10, 0));
        assert!(segment.passes_near(Coord { x: 4.0, y: 0.0 }, 0.1));
        assert!(segment.passes_near(Coord { x: 10.0, y: 0.0 }, 0.1));
        assert!(!segment.passes_near(Coord { x: 4.0, y: 2.0 }, 0.1));
        assert!(!segment.passes_near(Coord { x: 12.0, y: 0.0 }, 0.1));
    }

    #[test]
    fn test_segments_from_points() {
        let points = [Point::new(0, 0), Point::new(5, 0), Point::new(5, 5)];
        let segments = segments_from_points(&points);
        assert_eq!(
            segments,
            vec![
                Segment::new(Point::new(0, 0), Point::new(5, 0)),
                Segment::new(Point::new(5, 0), Point::new(5, 5)),
            ]
        );
        assert!(segments_from_points(&points[..1]).is_empty());
    }
}
