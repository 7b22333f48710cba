//! `GeoJSON` export of planned lines and vehicle positions for display

use geo::{Coord, LineString, Point as GeoPoint};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::model::{Line, Segment, Vehicle};

impl Line {
    /// Planned geometry of one direction as a `LineString` feature.
    /// An unplanned line yields a feature without geometry.
    pub fn to_feature(&self, reversed: bool) -> Result<Feature, Error> {
        let geometry = self
            .path(reversed)
            .filter(|segments| !segments.is_empty())
            .map(|segments| Geometry::new(GeoJsonValue::from(&path_line_string(segments))));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "line": self.id,
                "color": self.color,
                "direction": if reversed { "reverse" } else { "forward" },
                "route": self.route.to_string(),
                "halted": self.is_halted(),
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    /// Both directions of the line
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        Ok(FeatureCollection {
            features: vec![self.to_feature(false)?, self.to_feature(true)?],
            bbox: None,
            foreign_members: None,
        })
    }
}

impl Vehicle {
    pub fn to_feature(&self) -> Result<Feature, Error> {
        let position = GeoPoint::new(self.position.x, self.position.y);
        let geometry = Geometry::new(GeoJsonValue::from(&position));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "id": self.id,
                "number": self.number,
                "line": self.line,
                "heading": self.heading,
                "street": self.current_street,
                "last_station": self.last_station,
                "heading_station": self.heading_station,
                "halted": self.is_halted(),
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// Vehicle positions as a point collection
pub fn vehicles_to_geojson<'a>(
    vehicles: impl IntoIterator<Item = &'a Vehicle>,
) -> Result<FeatureCollection, Error> {
    let features = vehicles
        .into_iter()
        .map(Vehicle::to_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn path_line_string(segments: &[Segment]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(segments.len() + 1);
    if let Some(first) = segments.first() {
        coords.push(first.from.to_coord());
    }
    coords.extend(segments.iter().map(|segment| segment.to.to_coord()));
    LineString::new(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, RouteStops};

    #[test]
    fn test_path_line_string() {
        let segments = [
            Segment::new(Point::new(0, 0), Point::new(5, 0)),
            Segment::new(Point::new(5, 0), Point::new(10, 0)),
        ];
        let line = path_line_string(&segments);
        assert_eq!(line.0.len(), 3);
        assert_eq!(line.0[2], Coord { x: 10.0, y: 0.0 });
        assert!(path_line_string(&[]).0.is_empty());
    }

    #[test]
    fn test_vehicle_feature_properties() {
        let mut vehicle = Vehicle::new(3, 12, 1, 0.0);
        vehicle.position = Coord { x: 4.0, y: 2.0 };
        let feature = vehicle.to_feature().unwrap();
        let properties = feature.properties.unwrap();
        assert_eq!(properties["number"], 12);
        assert_eq!(properties["halted"], false);
    }

    #[test]
    fn test_unplanned_line_exports() {
        let line = Line::new(1, "blue", RouteStops::new("A", "B", vec![]));
        let collection = line.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 2);
    }
}
