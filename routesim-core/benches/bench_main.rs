//! A* and tick throughput on a square street grid.
//!
//! Run with: cargo bench -p routesim_core --bench bench_main

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use routesim_core::prelude::*;

const SPACING: i32 = 20;

/// `size` x `size` blocks, one street per grid row and column, a stop at
/// every corner of the grid
fn grid_network(size: i32) -> TransitNetwork {
    let mut network = TransitNetwork::new();
    let extent = size * SPACING;

    for i in 0..=size {
        let offset = i * SPACING;
        let row: Vec<Point> = (0..=size).map(|j| Point::new(j * SPACING, offset)).collect();
        let column: Vec<Point> = (0..=size).map(|j| Point::new(offset, j * SPACING)).collect();
        network
            .add_street(Street::new(format!("row-{i}"), &row).unwrap())
            .unwrap();
        network
            .add_street(Street::new(format!("column-{i}"), &column).unwrap())
            .unwrap();
    }

    let corners = [
        ("SW", 0, 0),
        ("SE", extent, 0),
        ("NE", extent, extent),
        ("NW", 0, extent),
    ];
    for (name, x, y) in corners {
        network.add_stop(Stop::new(name, Point::new(x, y))).unwrap();
    }
    network
        .add_line(Line::new(
            1,
            "black",
            RouteStops::new("SW", "NW", vec!["SE".to_string(), "NE".to_string()]),
        ))
        .unwrap();
    network
}

fn bench_astar(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar");

    for size in [10, 40] {
        let simulation = Simulation::new(grid_network(size), SimulationConfig::default());
        let graph = simulation.graph();
        let start = Point::new(0, 0);
        let end = Point::new(size * SPACING, size * SPACING);

        group.bench_with_input(BenchmarkId::new("fresh_overlay", size), &size, |b, _| {
            b.iter(|| black_box(solve(graph, black_box(start), black_box(end))));
        });

        let mut solver = PathSolver::new();
        group.bench_with_input(BenchmarkId::new("reused_overlay", size), &size, |b, _| {
            b.iter(|| black_box(solver.solve(graph, black_box(start), black_box(end))));
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut simulation = Simulation::new(grid_network(20), SimulationConfig::default());
    for i in 0..100 {
        simulation.add_vehicle(i, 1, f64::from(i) * 500.0);
    }

    c.bench_function("tick_100_vehicles", |b| {
        b.iter(|| simulation.tick(black_box(1.0)));
    });

    c.bench_function("restart_100_vehicles", |b| {
        b.iter(|| simulation.restart());
    });
}

criterion_group!(benches, bench_astar, bench_tick);
criterion_main!(benches);
