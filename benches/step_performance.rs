//! Performance benchmarks for the time-stepping core.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use breakthrough_rs::config::SimulationConfig;
use breakthrough_rs::physics::{Component, Isotherm};
use breakthrough_rs::simulation::Breakthrough;

/// CO2-on-helium column, sized by grid resolution.
///
/// The time step shrinks with the grid spacing: the Ergun-coupled pressure
/// relaxation behaves diffusively, so the explicit scheme's stable step
/// scales with dx².
fn configuration(grid_points: usize) -> SimulationConfig {
    let time_step = match grid_points {
        0..=25 => 2.0e-3,
        26..=50 => 1.0e-3,
        _ => 2.5e-4,
    };
    SimulationConfig {
        components: vec![
            Component::carrier("He", 0.9, 1.0e-6),
            Component::new("CO2", 0.1, 0.5, 1.0e-6, Isotherm::Langmuir {
                qsat: 5.0e-4,
                b: 1.0e-5,
            }),
        ],
        grid_points,
        print_every: usize::MAX,
        write_every: usize::MAX,
        entrance_velocity: 0.1,
        column_length: 1.0,
        time_step,
        time_steps: 1_000_000,
        ..SimulationConfig::default_column("bench")
    }
}

/// One full SSP-RK3 step (three RHS evaluations, three equilibrium sweeps,
/// three velocity solves) at several grid resolutions.
fn benchmark_compute_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_step");

    for grid_points in [25, 50, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(grid_points),
            &grid_points,
            |b, &grid_points| {
                let mut sim = Breakthrough::new(configuration(grid_points)).unwrap();
                let mut step = 0;
                b.iter(|| {
                    sim.compute_step(black_box(step)).unwrap();
                    step += 1;
                });
            },
        );
    }

    group.finish();
}

/// Initialization cost: Ergun backward integration plus the initial
/// equilibrium sweep.
fn benchmark_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialization");

    for grid_points in [50, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(grid_points),
            &grid_points,
            |b, &grid_points| {
                let config = configuration(grid_points);
                b.iter(|| Breakthrough::new(black_box(config.clone())).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_compute_step, benchmark_initialization);
criterion_main!(benches);
