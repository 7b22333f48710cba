//! Plain input records, deserializable from the scenario JSON format

use serde::{Deserialize, Serialize};

use crate::model::Point;
use crate::{Error, LineId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl StopRecord {
    pub fn coord(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    pub name: String,
    pub start: [i32; 2],
    /// Inner vertices between start and end
    #[serde(default)]
    pub mid: Vec<[i32; 2]>,
    pub end: [i32; 2],
}

impl StreetRecord {
    /// All vertices in order
    pub fn points(&self) -> Vec<Point> {
        std::iter::once(self.start)
            .chain(self.mid.iter().copied())
            .chain(std::iter::once(self.end))
            .map(Point::from)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    #[serde(rename = "no")]
    pub id: LineId,
    #[serde(default)]
    pub color: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "goes", default)]
    pub via: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "no")]
    pub number: i32,
    #[serde(rename = "lineno")]
    pub line: LineId,
    /// First departure, in simulated seconds
    #[serde(rename = "startat", default)]
    pub departure_offset_s: u32,
}

/// Complete map and schedule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub stops: Vec<StopRecord>,
    pub streets: Vec<StreetRecord>,
    pub lines: Vec<LineRecord>,
    #[serde(rename = "buses")]
    pub vehicles: Vec<VehicleRecord>,
}

impl Scenario {
    /// Checks references between records without building anything
    ///
    /// # Errors
    ///
    /// Returns an error for vehicles on undefined lines
    pub fn validate(&self) -> Result<(), Error> {
        for vehicle in &self.vehicles {
            if !self.lines.iter().any(|line| line.id == vehicle.line) {
                return Err(Error::InvalidData(format!(
                    "Vehicle {} runs on undefined line {}",
                    vehicle.number, vehicle.line
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scenario_keys() {
        let json = r#"{
            "stops": [{"name": "A", "x": 0, "y": 0}],
            "streets": [{"name": "Main", "start": [0, 0], "mid": [[5, 0]], "end": [10, 0]}],
            "lines": [{"no": 1, "color": "red", "start": "A", "end": "B", "goes": ["C"]}],
            "buses": [{"no": 101, "lineno": 1, "startat": 2}]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();

        assert_eq!(scenario.stops[0].coord(), Point::new(0, 0));
        assert_eq!(
            scenario.streets[0].points(),
            vec![Point::new(0, 0), Point::new(5, 0), Point::new(10, 0)]
        );
        assert_eq!(scenario.lines[0].via, vec!["C".to_string()]);
        assert_eq!(scenario.vehicles[0].departure_offset_s, 2);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_street_without_mid() {
        let record: StreetRecord =
            serde_json::from_str(r#"{"name": "S", "start": [0, 0], "end": [0, 9]}"#).unwrap();
        assert_eq!(record.points().len(), 2);
    }

    #[test]
    fn test_vehicle_on_undefined_line() {
        let scenario = Scenario {
            vehicles: vec![VehicleRecord {
                number: 1,
                line: 9,
                departure_offset_s: 0,
            }],
            ..Scenario::default()
        };
        assert!(matches!(scenario.validate(), Err(Error::InvalidData(_))));
    }
}
