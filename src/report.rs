use routesim_core::prelude::{Simulation, VehicleStatus};

/// Plain-text state of the simulation: clock, lines, vehicles on the road
/// and blocked streets
pub fn summary(simulation: &Simulation) -> String {
    let mut lines = vec![format!("Time: {}", simulation.clock())];

    for line in simulation.network().lines() {
        let status = if line.is_halted() { " [halted]" } else { "" };
        lines.push(format!("{}{status}", simulation.line_info(line.id)));
    }

    let mut waiting = 0;
    for vehicle in simulation.vehicles() {
        if vehicle.is_waiting() && !vehicle.is_halted() {
            waiting += 1;
            continue;
        }
        let status = match &vehicle.status {
            VehicleStatus::Ok => String::new(),
            VehicleStatus::Halted(reason) => format!(" [halted: {reason}]"),
        };
        lines.push(format!("{}{status}", simulation.vehicle_info(vehicle.id)));
    }
    lines.push(format!("Vehicles waiting: {waiting}"));

    let blocked: Vec<&str> = simulation
        .network()
        .streets()
        .filter(|street| street.blocked)
        .map(|street| street.name.as_str())
        .collect();
    if !blocked.is_empty() {
        lines.push(format!("Blocked streets: {}", blocked.join(", ")));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
