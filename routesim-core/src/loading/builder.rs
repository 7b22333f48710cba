use std::path::Path;

use log::{info, warn};

use super::config::SimulationConfig;
use super::parser::read_scenario;
use super::records::Scenario;
use crate::Error;
use crate::model::{Line, RouteStops, Stop, Street, TransitNetwork};
use crate::simulation::Simulation;

/// Builds the network, routing graph and all scheduled vehicles of a scenario
///
/// # Errors
///
/// Returns an error if the configuration is unusable or the scenario
/// contains duplicate or malformed entities
pub fn create_simulation(
    config: &SimulationConfig,
    scenario: Scenario,
) -> Result<Simulation, Error> {
    validate_config(config)?;
    scenario.validate()?;

    info!(
        "Loading {} stops, {} streets, {} lines",
        scenario.stops.len(),
        scenario.streets.len(),
        scenario.lines.len()
    );

    let mut network = TransitNetwork::new();
    for record in scenario.stops {
        let coord = record.coord();
        network.add_stop(Stop::new(record.name, coord))?;
    }
    for record in scenario.streets {
        let points = record.points();
        network.add_street(Street::new(record.name, &points)?)?;
    }
    for record in scenario.lines {
        let route = RouteStops::new(record.start, record.end, record.via);
        network.add_line(Line::new(record.id, record.color, route))?;
    }

    let mut simulation = Simulation::new(network, config.clone());

    for record in &scenario.vehicles {
        let first_departure = u64::from(record.departure_offset_s) * 1000;
        for i in 0..config.departures_per_vehicle {
            let wait = first_departure + config.departure_spacing_ms * u64::from(i);
            simulation.add_vehicle(record.number, record.line, wait as f64);
        }
    }

    let halted = simulation.vehicles().filter(|v| v.is_halted()).count();
    if halted > 0 {
        warn!("{halted} vehicles cannot follow their line and are halted");
    }

    info!(
        "Simulation ready: {} graph nodes, {} vehicles",
        simulation.graph().node_count(),
        simulation.vehicles().count()
    );
    Ok(simulation)
}

/// Reads a scenario file and builds the simulation from it
///
/// # Errors
///
/// Returns an error if the file cannot be read or the scenario is invalid
pub fn load_simulation(config: &SimulationConfig, path: &Path) -> Result<Simulation, Error> {
    info!("Reading scenario: {}", path.display());
    let scenario = read_scenario(path)?;
    create_simulation(config, scenario)
}

fn validate_config(config: &SimulationConfig) -> Result<(), Error> {
    if config.tick_interval_ms == 0 {
        return Err(Error::InvalidData(
            "Tick interval must be positive".to_string(),
        ));
    }

    if config.street_tolerance <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Street tolerance must be positive, got {}",
            config.street_tolerance
        )));
    }

    if config.fast_forward_step <= 0.0 || config.replay_step <= 0.0 {
        return Err(Error::InvalidData(
            "Fast-forward and replay steps must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{LineRecord, StopRecord, StreetRecord, VehicleRecord};

    fn scenario() -> Scenario {
        Scenario {
            stops: vec![
                StopRecord {
                    name: "A".to_string(),
                    x: 0,
                    y: 0,
                },
                StopRecord {
                    name: "B".to_string(),
                    x: 40,
                    y: 0,
                },
            ],
            streets: vec![StreetRecord {
                name: "Main".to_string(),
                start: [0, 0],
                mid: vec![[20, 0]],
                end: [40, 0],
            }],
            lines: vec![LineRecord {
                id: 5,
                color: "green".to_string(),
                start: "A".to_string(),
                end: "B".to_string(),
                via: vec![],
            }],
            vehicles: vec![VehicleRecord {
                number: 51,
                line: 5,
                departure_offset_s: 2,
            }],
        }
    }

    #[test]
    fn test_staggered_departures() {
        let simulation = create_simulation(&SimulationConfig::default(), scenario()).unwrap();
        let waits: Vec<f64> = simulation.vehicles().map(|v| v.initial_wait).collect();
        assert_eq!(waits.len(), 10);
        assert_eq!(waits[0], 2000.0);
        assert_eq!(waits[1], 12_000.0);
        assert_eq!(waits[9], 92_000.0);
        assert!(simulation.vehicles().all(|v| v.number == 51 && !v.is_halted()));
    }

    #[test]
    fn test_custom_departure_count() {
        let config = SimulationConfig {
            departures_per_vehicle: 3,
            departure_spacing_ms: 500,
            ..SimulationConfig::default()
        };
        let simulation = create_simulation(&config, scenario()).unwrap();
        let waits: Vec<f64> = simulation.vehicles().map(|v| v.initial_wait).collect();
        assert_eq!(waits, vec![2000.0, 2500.0, 3000.0]);
    }

    #[test]
    fn test_duplicate_stop_rejected() {
        let mut scenario = scenario();
        scenario.stops.push(StopRecord {
            name: "A".to_string(),
            x: 7,
            y: 7,
        });
        assert!(matches!(
            create_simulation(&SimulationConfig::default(), scenario),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let config = SimulationConfig {
            tick_interval_ms: 0,
            ..SimulationConfig::default()
        };
        assert!(create_simulation(&config, scenario()).is_err());
    }
}
