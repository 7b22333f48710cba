use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use geojson::FeatureCollection;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::clock::SimClock;
use super::movement::{Movement, PointIndex, build_point_index};
use crate::editing::RouteEditor;
use crate::loading::SimulationConfig;
use crate::model::{LinePaths, Segment, TransitNetwork, Vehicle};
use crate::routing::{RoutingGraph, plan_route, vehicles_to_geojson};
use crate::{Error, LineId, NO_INFO, VehicleId};

/// A running simulation: the network, its routing graph, every vehicle and
/// the interactive state around them.
///
/// All mutation goes through `&mut self`, so callers serialize ticks and
/// edits by construction.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    network: TransitNetwork,
    graph: RoutingGraph,
    point_index: PointIndex,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    next_vehicle_id: VehicleId,
    clock: SimClock,
    editor: RouteEditor,
    speed: u32,
    selected_line: Option<LineId>,
    selected_street: Option<String>,
}

impl Simulation {
    /// Builds the routing graph for `network`. No vehicles are added.
    pub fn new(network: TransitNetwork, config: SimulationConfig) -> Self {
        let mut simulation = Self {
            config,
            network,
            graph: RoutingGraph::default(),
            point_index: PointIndex::new(),
            vehicles: BTreeMap::new(),
            next_vehicle_id: 0,
            clock: SimClock::new(),
            editor: RouteEditor::new(),
            speed: 1,
            selected_line: None,
            selected_street: None,
        };
        simulation.rebuild_graph();
        simulation
    }

    /// Rebuilds nodes and midpoints from the current streets, restores
    /// obstacles of blocked streets and replans every line.
    /// Vehicles keep their paths until the next [`Simulation::restart`].
    pub fn rebuild_graph(&mut self) {
        let (points, streets) = self.network.build_parts();
        self.graph = RoutingGraph::build(points, streets);

        for street in self.network.streets().filter(|street| street.blocked) {
            for &point in &street.synthetic {
                self.graph.set_obstacle(point, true);
            }
        }

        self.point_index = build_point_index(self.network.points());
        self.replan_lines();
    }

    /// Adds one departure of line `line` and returns its registry key
    pub fn add_vehicle(&mut self, number: i32, line: LineId, initial_wait_ms: f64) -> VehicleId {
        let id = self.next_vehicle_id;
        self.next_vehicle_id += 1;

        let mut vehicle = Vehicle::new(id, number, line, initial_wait_ms);
        Movement::new(&self.network, &self.graph, &self.point_index, &self.config)
            .reset(&mut vehicle);
        self.vehicles.insert(id, vehicle);
        id
    }

    /// Advances the clock by one tick interval and moves every vehicle.
    /// Does nothing while paused or editing.
    pub fn tick(&mut self, step: f64) {
        if !self.is_running() {
            return;
        }
        self.clock.advance(self.config.tick_interval_ms);
        self.step_vehicles(step);
    }

    fn step_vehicles(&mut self, step: f64) {
        let movement = Movement::new(&self.network, &self.graph, &self.point_index, &self.config);
        for vehicle in self.vehicles.values_mut() {
            movement.advance(vehicle, step);
        }
    }

    /// Not paused and not editing
    pub fn is_running(&self) -> bool {
        self.speed > 0 && !self.editor.is_active()
    }

    /// Speed 0 pauses the simulation
    pub fn set_speed(&mut self, speed: u32) {
        if self.speed != speed {
            debug!("Simulation speed {} -> {speed}", self.speed);
            self.speed = speed;
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Real time between ticks at the current speed, `None` when paused
    pub fn wall_interval(&self) -> Option<Duration> {
        (self.speed > 0)
            .then(|| Duration::from_millis(self.config.tick_interval_ms / u64::from(self.speed)))
    }

    /// Clock back to midnight, every line replanned and every vehicle back
    /// at the start of its line
    pub fn restart(&mut self) {
        self.clock.reset();
        self.replan_lines();

        let movement = Movement::new(&self.network, &self.graph, &self.point_index, &self.config);
        self.vehicles
            .par_iter_mut()
            .for_each(|(_, vehicle)| movement.reset(vehicle));

        let halted = self.vehicles.values().filter(|v| v.is_halted()).count();
        if halted > 0 {
            warn!("{halted} of {} vehicles halted", self.vehicles.len());
        }
        debug!("Simulation restarted with {} vehicles", self.vehicles.len());
    }

    /// Skips one simulated second using the larger fast-forward step.
    /// Returns false when paused or editing.
    pub fn fast_forward(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.replay(1000, self.config.fast_forward_step);
        true
    }

    /// Restarts and replays up to `seconds` before the current clock time.
    /// Returns false when paused or editing.
    pub fn rewind(&mut self, seconds: u32) -> bool {
        if !self.is_running() {
            return false;
        }
        let target = self.clock.seconds().saturating_sub(seconds);
        self.restart();
        self.replay(u64::from(target) * 1000, self.config.replay_step);
        true
    }

    /// Runs `elapsed_ms` of simulated time with vehicles moving `step` per
    /// tick, so fewer vehicle ticks are needed than clock ticks
    fn replay(&mut self, elapsed_ms: u64, step: f64) {
        let interval = self.config.tick_interval_ms.max(1);
        let clock_ticks = elapsed_ms / interval;
        for _ in 0..clock_ticks {
            self.clock.advance(interval);
        }

        let vehicle_ticks = (clock_ticks as f64 / step.max(1.0)) as u64;
        for _ in 0..vehicle_ticks {
            self.step_vehicles(step);
        }
    }

    /// Marks every midpoint owned by the street as obstacle and replans
    /// line geometry. Returns false only for unknown streets.
    pub fn block_street(&mut self, name: &str) -> bool {
        self.set_street_blocked(name, true)
    }

    /// Reverse of [`Simulation::block_street`]
    pub fn unblock_street(&mut self, name: &str) -> bool {
        self.set_street_blocked(name, false)
    }

    fn set_street_blocked(&mut self, name: &str, blocked: bool) -> bool {
        let Some(street) = self.network.street_mut(name) else {
            warn!("Cannot change blocking of unknown street '{name}'");
            return false;
        };
        if street.blocked == blocked {
            return true;
        }

        street.blocked = blocked;
        for &point in &street.synthetic {
            self.graph.set_obstacle(point, blocked);
        }
        info!(
            "Street '{name}' {}",
            if blocked { "blocked" } else { "unblocked" }
        );

        self.replan_lines();
        true
    }

    /// # Errors
    ///
    /// Unknown street, or a level of zero
    pub fn set_traffic(&mut self, name: &str, level: u32) -> Result<(), Error> {
        self.network
            .street_mut(name)
            .ok_or_else(|| Error::UnknownStreet(name.to_string()))?
            .set_traffic(level)
    }

    pub fn select_street(&mut self, name: &str) -> bool {
        if self.network.street(name).is_none() {
            return false;
        }
        self.selected_street = Some(name.to_string());
        true
    }

    pub fn deselect_street(&mut self) {
        self.selected_street = None;
    }

    pub fn selected_street(&self) -> Option<&str> {
        self.selected_street.as_deref()
    }

    /// Sets traffic on the selected street; false when nothing is selected
    /// or the level is rejected
    pub fn set_selected_traffic(&mut self, level: u32) -> bool {
        let Some(name) = self.selected_street.clone() else {
            return false;
        };
        match self.set_traffic(&name, level) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    pub fn select_line(&mut self, id: LineId) -> bool {
        if self.network.line(id).is_none() {
            return false;
        }
        self.selected_line = Some(id);
        true
    }

    /// Selects the line the vehicle runs on
    pub fn select_line_via_vehicle(&mut self, id: VehicleId) -> bool {
        match self.vehicles.get(&id) {
            Some(vehicle) => {
                let line = vehicle.line;
                self.select_line(line)
            }
            None => false,
        }
    }

    pub fn deselect_line(&mut self) {
        self.selected_line = None;
    }

    pub fn selected_line(&self) -> Option<LineId> {
        self.selected_line
    }

    /// Restarts the simulation and freezes it until the edit is committed
    /// or cancelled
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist
    pub fn begin_edit(&mut self, line: LineId) -> Result<(), Error> {
        if self.network.line(line).is_none() {
            return Err(Error::UnknownLine(line));
        }
        self.restart();
        self.selected_line = Some(line);
        self.editor.begin(line);
        Ok(())
    }

    /// Returns whether the stop was appended to the provisional route
    ///
    /// # Errors
    ///
    /// Not editing, or the stop does not exist
    pub fn add_stop(&mut self, name: &str) -> Result<bool, Error> {
        if !self.editor.is_active() {
            return Err(Error::NotEditing);
        }
        if self.network.stop(name).is_none() {
            return Err(Error::UnknownStop(name.to_string()));
        }
        Ok(self.editor.add_stop(name))
    }

    /// Applies the provisional route to the edited line and restarts
    ///
    /// # Errors
    ///
    /// Not editing, or fewer than two stops collected. The line is left
    /// unchanged and edit mode is left either way.
    pub fn commit_edit(&mut self) -> Result<(), Error> {
        self.selected_line = None;
        let (id, route) = self.editor.commit().inspect_err(|e| {
            warn!("Route edit rejected: {e}");
        })?;

        let line = self.network.line_mut(id).ok_or(Error::UnknownLine(id))?;
        info!("Line {id} now runs {route}");
        line.route = route;
        line.invalidate_paths();

        self.restart();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
        self.selected_line = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_active()
    }

    pub fn editor(&self) -> &RouteEditor {
        &self.editor
    }

    /// Restores the authored route of one line and resets its vehicles.
    /// Returns whether the route had been edited.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist
    pub fn reset_line(&mut self, id: LineId) -> Result<bool, Error> {
        let line = self.network.line_mut(id).ok_or(Error::UnknownLine(id))?;
        let changed = line.reset_route();
        self.replan_lines();

        let movement = Movement::new(&self.network, &self.graph, &self.point_index, &self.config);
        self.vehicles
            .par_iter_mut()
            .filter(|(_, vehicle)| vehicle.line == id)
            .for_each(|(_, vehicle)| movement.reset(vehicle));

        Ok(changed)
    }

    /// Restores every authored route and restarts
    pub fn reset_all_lines(&mut self) {
        let changed = self
            .network
            .lines_mut()
            .map(|line| line.reset_route())
            .filter(|changed| *changed)
            .count();
        info!("Reset {changed} edited lines");
        self.restart();
    }

    fn replan_lines(&mut self) {
        self.network.index_stop_lines();
        let plans: Vec<(LineId, LinePaths)> = self
            .network
            .lines()
            .map(|line| {
                let forward = plan_route(&self.graph, &self.network, &line.route, false);
                let reverse = plan_route(&self.graph, &self.network, &line.route, true);
                let paths = LinePaths {
                    forward: forward.segments(),
                    reverse: reverse.segments(),
                    halt: forward.halt.or(reverse.halt),
                };
                (line.id, paths)
            })
            .collect();

        for (id, paths) in plans {
            if let Some(reason) = &paths.halt {
                warn!("Line {id} cannot be planned: {reason}");
            }
            if let Some(line) = self.network.line_mut(id) {
                line.paths = Some(paths);
            }
        }
    }

    /// Planned geometry of a line in one direction
    pub fn line_path(&self, id: LineId, reversed: bool) -> Option<&[Segment]> {
        self.network.line(id)?.path(reversed)
    }

    /// Segments the vehicle still has to traverse
    pub fn vehicle_path(&self, id: VehicleId) -> Option<&VecDeque<Segment>> {
        self.vehicles.get(&id).map(Vehicle::path)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Vehicles in registry order
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn network(&self) -> &TransitNetwork {
        &self.network
    }

    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn line_info(&self, id: LineId) -> String {
        match self.network.line(id) {
            Some(line) => format!("Line no. {} -- Goes through: {}", line.id, line.route),
            None => NO_INFO.to_string(),
        }
    }

    pub fn vehicle_info(&self, id: VehicleId) -> String {
        let Some(vehicle) = self.vehicles.get(&id) else {
            return NO_INFO.to_string();
        };
        format!(
            "Bus no. {} -- Line no. {} -- On street: {} -- Start station: {} -- \
             End station: {} -- Last station: {} -- Heading to: {}",
            vehicle.number,
            vehicle.line,
            vehicle.current_street.as_deref().unwrap_or_default(),
            vehicle.start_station,
            vehicle.end_station,
            vehicle.last_station,
            vehicle.heading_station,
        )
    }

    pub fn street_info(&self, name: &str) -> String {
        self.network
            .street(name)
            .map_or_else(|| NO_INFO.to_string(), |street| street.name.clone())
    }

    /// Both planned directions of a line
    ///
    /// # Errors
    ///
    /// Unknown line, or a feature that cannot be serialized
    pub fn line_geojson(&self, id: LineId) -> Result<FeatureCollection, Error> {
        self.network
            .line(id)
            .ok_or(Error::UnknownLine(id))?
            .to_geojson()
    }

    /// Current vehicle positions
    ///
    /// # Errors
    ///
    /// Returns an error if a feature cannot be serialized
    pub fn vehicles_geojson(&self) -> Result<FeatureCollection, Error> {
        vehicles_to_geojson(self.vehicles.values())
    }
}
