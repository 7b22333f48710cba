//! Headless driver: loads a scenario, applies blocks, traffic and route
//! edits, runs the simulation and prints what happened.

mod config;
mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use routesim_core::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON with stops, streets, lines and buses
    scenario: PathBuf,

    /// TOML file with [simulation] and [run] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long)]
    seconds: Option<u32>,

    /// Step multiplier per tick
    #[arg(long)]
    step: Option<f64>,

    /// Block a street before running (repeatable)
    #[arg(long = "block", value_name = "STREET")]
    blocks: Vec<String>,

    /// Street traffic level (repeatable)
    #[arg(long = "traffic", value_name = "STREET=LEVEL", value_parser = parse_traffic)]
    traffic: Vec<(String, u32)>,

    /// Re-route a line through the given stops (repeatable)
    #[arg(long = "route", value_name = "LINE:STOP,STOP,...", value_parser = parse_route)]
    routes: Vec<(LineId, Vec<String>)>,

    /// Write planned lines and final vehicle positions as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn parse_traffic(value: &str) -> Result<(String, u32), String> {
    let (street, level) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected STREET=LEVEL, got '{value}'"))?;
    let level = level
        .trim()
        .parse()
        .map_err(|e| format!("invalid traffic level '{level}': {e}"))?;
    Ok((street.trim().to_string(), level))
}

fn parse_route(value: &str) -> Result<(LineId, Vec<String>), String> {
    let (line, stops) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:STOP,STOP,..., got '{value}'"))?;
    let line = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line number '{line}': {e}"))?;
    let stops = stops
        .split(',')
        .map(str::trim)
        .filter(|stop| !stop.is_empty())
        .map(str::to_string)
        .collect();
    Ok((line, stops))
}

fn reroute(simulation: &mut Simulation, line: LineId, stops: &[String]) -> Result<()> {
    simulation.begin_edit(line)?;
    for stop in stops {
        if let Err(e) = simulation.add_stop(stop) {
            simulation.cancel_edit();
            return Err(e).with_context(|| format!("Cannot re-route line {line}"));
        }
    }
    simulation
        .commit_edit()
        .with_context(|| format!("Cannot re-route line {line}"))?;
    info!("{}", simulation.line_info(line));
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(seconds) = args.seconds {
        config.run.seconds = seconds;
    }
    if let Some(step) = args.step {
        config.run.step = step;
    }
    config.run.block.extend(args.blocks);
    config.run.traffic.extend(args.traffic);

    if !(config.run.step.is_finite() && config.run.step > 0.0) {
        bail!("Step must be a positive number, got {}", config.run.step);
    }

    let mut simulation = load_simulation(&config.simulation, &args.scenario)
        .with_context(|| format!("Failed to load scenario '{}'", args.scenario.display()))?;

    for (street, level) in &config.run.traffic {
        simulation.set_traffic(street, *level)?;
    }
    for street in &config.run.block {
        if !simulation.block_street(street) {
            warn!("Unknown street '{street}' not blocked");
        }
    }
    for (line, stops) in &args.routes {
        reroute(&mut simulation, *line, stops)?;
    }
    simulation.restart();

    let ticks = u64::from(config.run.seconds) * 1000 / config.simulation.tick_interval_ms;
    info!(
        "Running {} simulated seconds ({ticks} ticks, step {})",
        config.run.seconds, config.run.step
    );
    for _ in 0..ticks {
        simulation.tick(config.run.step);
    }

    print!("{}", report::summary(&simulation));

    if let Some(path) = &args.geojson {
        let mut collection = simulation.vehicles_geojson()?;
        for line in simulation.network().lines() {
            collection.features.extend(line.to_geojson()?.features);
        }
        fs::write(path, serde_json::to_string_pretty(&collection)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        info!("GeoJSON written to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SCENARIO: &str = r#"{
        "stops": [
            {"name": "North", "x": 0, "y": 0},
            {"name": "South", "x": 0, "y": 30}
        ],
        "streets": [
            {"name": "Long Road", "start": [0, 0], "mid": [[0, 15]], "end": [0, 30]}
        ],
        "lines": [{"no": 4, "color": "blue", "start": "North", "end": "South", "goes": []}],
        "buses": [{"no": 40, "lineno": 4, "startat": 0}]
    }"#;

    fn scenario_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_traffic() {
        assert_eq!(
            parse_traffic("Park Lane=3").unwrap(),
            ("Park Lane".to_string(), 3)
        );
        assert!(parse_traffic("Park Lane").is_err());
        assert!(parse_traffic("Park Lane=fast").is_err());
    }

    #[test]
    fn test_parse_route() {
        let (line, stops) = parse_route("12:Depot, Market,Park").unwrap();
        assert_eq!(line, 12);
        assert_eq!(stops, vec!["Depot", "Market", "Park"]);
        assert!(parse_route("Depot,Market").is_err());
        assert!(parse_route("x:Depot").is_err());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "routesim",
            "city.json",
            "--block",
            "Hill Street",
            "--traffic",
            "Park Lane=2",
            "--route",
            "1:A,B",
        ])
        .unwrap();
        assert_eq!(args.blocks, vec!["Hill Street"]);
        assert_eq!(args.traffic, vec![("Park Lane".to_string(), 2)]);
        assert_eq!(args.routes[0].0, 1);
    }

    #[test]
    fn test_run_writes_geojson() {
        let scenario = scenario_file();
        let out = tempfile::NamedTempFile::new().unwrap();
        let args = Args {
            scenario: scenario.path().to_path_buf(),
            config: None,
            seconds: Some(1),
            step: None,
            blocks: vec!["Long Road".to_string()],
            traffic: vec![("Long Road".to_string(), 2)],
            routes: vec![],
            geojson: Some(out.path().to_path_buf()),
        };
        run(args).unwrap();

        let text = fs::read_to_string(out.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        // ten departures plus both directions of the line
        assert_eq!(value["features"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_run_rejects_bad_step() {
        let scenario = scenario_file();
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let args = Args {
                scenario: scenario.path().to_path_buf(),
                config: None,
                seconds: Some(1),
                step: Some(step),
                blocks: vec![],
                traffic: vec![],
                routes: vec![],
                geojson: None,
            };
            let err = run(args).unwrap_err();
            assert!(err.to_string().starts_with("Step must be"), "step {step}");
        }
    }

    #[test]
    fn test_summary_lists_moving_vehicles() {
        let scenario = scenario_file();
        let mut simulation =
            load_simulation(&SimulationConfig::default(), scenario.path()).unwrap();
        for _ in 0..10 {
            simulation.tick(1.0);
        }
        let text = report::summary(&simulation);
        assert!(text.starts_with("Time: 00:00:00"));
        assert!(text.contains("Line no. 4 -- Goes through: North - South"));
        assert!(text.contains("Bus no. 40 -- Line no. 4 -- On street: Long Road"));
        assert!(text.ends_with("\nVehicles waiting: 9\n"));

        simulation.block_street("Long Road");
        assert!(report::summary(&simulation).contains("Blocked streets: Long Road"));
    }

    #[test]
    fn test_bad_route_is_reported() {
        let scenario = scenario_file();
        let mut simulation =
            load_simulation(&SimulationConfig::default(), scenario.path()).unwrap();
        assert!(reroute(&mut simulation, 4, &["North".to_string()]).is_err());
        assert!(reroute(&mut simulation, 4, &["Nowhere".to_string()]).is_err());
        assert!(!simulation.is_editing());
        reroute(&mut simulation, 4, &["South".to_string(), "North".to_string()]).unwrap();
        assert_eq!(
            simulation.line_info(4),
            "Line no. 4 -- Goes through: South - North"
        );
    }
}
