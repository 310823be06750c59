//! Physics-level integration tests for the breakthrough solver.
//!
//! These drive the full pipeline (initialization → SSP-RK3 stepping with
//! per-stage equilibrium and velocity closure) and check the invariants the
//! scheme is supposed to preserve: positive pressures, mole-fraction
//! closure, front propagation, monotone breakthrough, auto-termination and
//! the fatal-geometry guard.
//!
//! With `v_in = 0.1` m/s and `L = 1` m the residence time is 10 s; front
//! arrival at the outlet lands around τ ≈ 1.15 because the interior
//! velocity runs below the entrance value on the Ergun pressure profile.

mod common;

use breakthrough_rs::error::SimulationError;
use breakthrough_rs::simulation::Breakthrough;

// ── Positivity and steady state (carrier only) ──────────────────────────

#[test]
fn test_carrier_only_pressures_stay_positive() {
    let mut sim = Breakthrough::new(common::carrier_only(20, 0.005, 1000)).unwrap();
    for step in 0..500 {
        sim.compute_step(step).unwrap();
        let state = sim.state();
        for i in 0..state.n_nodes() {
            assert!(state.pt[i] > 0.0, "step {step}: Pt[{i}] = {}", state.pt[i]);
            assert!(state.v[i].is_finite(), "step {step}: V[{i}] = {}", state.v[i]);
        }
    }
}

#[test]
fn test_carrier_only_inlet_velocity_pinned() {
    let mut sim = Breakthrough::new(common::carrier_only(20, 0.005, 100)).unwrap();
    assert_eq!(sim.state().v[0], 0.1);
    for step in 0..100 {
        sim.compute_step(step).unwrap();
        assert_eq!(sim.state().v[0], 0.1, "V[0] must stay Dirichlet");
    }
}

#[test]
fn test_carrier_only_relaxes_to_steady_state() {
    // after many residence times the startup transient has left the column
    // and successive steps change nothing measurable
    let mut sim = Breakthrough::new(common::carrier_only(20, 0.005, 60_000)).unwrap();
    for step in 0..50_000 {
        sim.compute_step(step).unwrap();
    }
    let pt_before = sim.state().pt.clone();
    let v_before = sim.state().v.clone();
    for step in 50_000..55_000 {
        sim.compute_step(step).unwrap();
    }
    let state = sim.state();
    for i in 0..state.n_nodes() {
        let dp = (state.pt[i] - pt_before[i]).abs() / 1.0e5;
        let dv = (state.v[i] - v_before[i]).abs() / 0.1;
        assert!(dp < 1.0e-4, "node {i}: relative pressure drift {dp}");
        assert!(dv < 1.0e-4, "node {i}: relative velocity drift {dv}");
    }
}

// ── Mole-fraction closure ───────────────────────────────────────────────

#[test]
fn test_mole_fractions_close_to_machine_precision_without_adsorption() {
    // equal dispersion coefficients and no adsorption: Σ_j ∂y/∂t = 0
    // analytically, so the closure survives to round-off
    let mut sim = Breakthrough::new(common::inert_tracer(20, 0.005, 400)).unwrap();
    for step in 0..400 {
        sim.compute_step(step).unwrap();
        let worst = common::worst_mole_fraction_closure(sim.state());
        assert!(worst < 1.0e-9, "step {step}: |Σy − 1| = {worst}");
    }
}

#[test]
fn test_mole_fractions_close_with_adsorption() {
    // run through the whole front passage with a real adsorption sink
    let mut sim =
        Breakthrough::new(common::weak_sorbate(20, 0.005, 3000, 5.0e-4, 0.5)).unwrap();
    for step in 0..3000 {
        sim.compute_step(step).unwrap();
    }
    let worst = common::worst_mole_fraction_closure(sim.state());
    assert!(worst < 1.0e-3, "|Σy − 1| = {worst}");
}

// ── Traveling front (no adsorption) ─────────────────────────────────────

#[test]
fn test_inert_front_reaches_outlet() {
    // with zero adsorption the composition front crosses the column in
    // roughly one residence time; after three, the outlet sees the feed
    let mut sim = Breakthrough::new(common::inert_tracer(50, 0.001, 40_000)).unwrap();

    let mut outlet = Vec::new();
    for step in 0..34_000 {
        sim.compute_step(step).unwrap();
        outlet.push(sim.state().outlet_mole_fraction(1));
    }

    let last = *outlet.last().unwrap();
    assert!(last > 0.09, "outlet tracer fraction {last} after 3+ residence times");

    // the outlet history must be a rising front
    for w in outlet.windows(2) {
        assert!(w[1] >= w[0] - 1.0e-9, "outlet trace must be nondecreasing");
    }

    // half a residence time in, the front is still mid-column
    assert!(outlet[5_000] < 0.01);
}

#[test]
fn test_front_arrival_is_grid_converged() {
    // halving dx moves the half-height crossing by no more than O(dx)
    let crossing_tau = |grid_points: usize, dt: f64| -> f64 {
        let mut sim =
            Breakthrough::new(common::inert_tracer(grid_points, dt, 40_000)).unwrap();
        for step in 0..40_000 {
            sim.compute_step(step).unwrap();
            if sim.state().outlet_mole_fraction(1) >= 0.05 {
                return step as f64 * dt * 0.1 / 1.0;
            }
        }
        panic!("front never crossed half height");
    };

    let coarse = crossing_tau(25, 0.002);
    let fine = crossing_tau(50, 0.001);
    assert!(
        (coarse - fine).abs() < 0.2,
        "half-height crossing moved from τ = {coarse} to τ = {fine}"
    );
}

// ── Breakthrough with adsorption ────────────────────────────────────────

#[test]
fn test_langmuir_breakthrough_is_monotone_and_complete() {
    let config = common::weak_sorbate(30, 0.0025, 12_000, 5.0e-3, 0.5);
    let reference = 1.0e5 * 0.1;
    let mut sim = Breakthrough::new(config).unwrap();

    let mut outlet = Vec::new();
    for step in 0..12_000 {
        sim.compute_step(step).unwrap();
        outlet.push(sim.state().outlet_partial_pressure(1) / reference);
    }

    for w in outlet.windows(2) {
        assert!(w[1] >= w[0] - 5.0e-4, "breakthrough curve must be nondecreasing");
    }
    let last = *outlet.last().unwrap();
    assert!(
        (0.9..=1.05).contains(&last),
        "normalized outlet concentration settled at {last}"
    );
}

#[test]
fn test_adsorption_delays_the_front() {
    // the retained sorbate must cross half height later than an inert tracer
    let crossing_step = |mut sim: Breakthrough| -> usize {
        for step in 0..20_000 {
            sim.compute_step(step).unwrap();
            if sim.state().outlet_mole_fraction(1) >= 0.05 {
                return step;
            }
        }
        panic!("front never arrived");
    };

    let inert =
        crossing_step(Breakthrough::new(common::inert_tracer(30, 0.0025, 20_000)).unwrap());
    let retained = crossing_step(
        Breakthrough::new(common::weak_sorbate(30, 0.0025, 20_000, 5.0e-3, 0.5)).unwrap(),
    );
    assert!(
        retained > inert,
        "retained front (step {retained}) must lag the inert front (step {inert})"
    );
}

// ── Auto-termination ────────────────────────────────────────────────────

#[test]
fn test_auto_steps_terminates_with_breakthrough_tail() {
    let mut config = common::weak_sorbate(20, 0.005, 10, 5.0e-4, 0.5);
    config.auto_steps = true;
    let mut sim = Breakthrough::new(config).unwrap();

    let summary = sim.run(None).unwrap();

    // the run extended past the configured 10 steps, converged, and stopped
    assert!(summary.steps > 10, "auto-steps must extend the horizon");
    assert!(summary.steps < 50_000, "auto-steps must terminate");
    assert_eq!(summary.steps, sim.n_steps());
    assert!(
        sim.outlet_tolerance() < 0.02,
        "outlet tolerance {} after the 10% tail",
        sim.outlet_tolerance()
    );
}

// ── Pulse mode ──────────────────────────────────────────────────────────

#[test]
fn test_pulse_rises_then_decays() {
    let mut config = common::inert_tracer(20, 0.005, 9_000);
    config.pulse = true;
    config.pulse_time = 15.0;
    let mut sim = Breakthrough::new(config).unwrap();

    let mut outlet = Vec::new();
    for step in 0..9_000 {
        sim.compute_step(step).unwrap();
        outlet.push(sim.state().outlet_mole_fraction(1));
    }

    let peak = outlet.iter().cloned().fold(0.0_f64, f64::max);
    let last = *outlet.last().unwrap();
    assert!(peak > 0.05, "pulse must break through (peak {peak})");
    assert!(last < 0.2 * peak, "outlet must decay after the pulse (last {last}, peak {peak})");
}

#[test]
fn test_pulse_pins_the_inlet_to_carrier() {
    let mut config = common::inert_tracer(10, 0.01, 100);
    config.pulse = true;
    config.pulse_time = 0.1;
    let mut sim = Breakthrough::new(config).unwrap();
    for step in 0..50 {
        sim.compute_step(step).unwrap();
    }
    let state = sim.state();
    assert_eq!(state.y[0], 1.0, "carrier mole fraction at the inlet");
    assert_eq!(state.y[1], 0.0, "tracer mole fraction at the inlet");
    assert_eq!(state.p[1], 0.0, "tracer partial pressure at the inlet");
}

// ── Fatal geometry ──────────────────────────────────────────────────────

#[test]
fn test_inverted_pressure_gradient_is_fatal_at_initialization() {
    let mut config = common::weak_sorbate(20, 0.005, 100, 5.0e-4, 0.5);
    config.pressure_gradient = -2.0e5; // implied outlet: 1e5 − 2e5·1 < 0
    match Breakthrough::new(config) {
        Err(SimulationError::Geometry { outlet_pressure }) => {
            assert!(outlet_pressure < 0.0);
        }
        Err(other) => panic!("expected Geometry, got {other}"),
        Ok(_) => panic!("initialization must fail on a negative implied outlet pressure"),
    }
}

// ── Loadings ────────────────────────────────────────────────────────────

#[test]
fn test_loadings_track_equilibrium() {
    // with fast LDF kinetics the loading approaches the equilibrium value
    // once the front has passed
    let mut sim =
        Breakthrough::new(common::weak_sorbate(20, 0.005, 6_000, 5.0e-3, 1.0)).unwrap();
    for step in 0..6_000 {
        sim.compute_step(step).unwrap();
    }
    let state = sim.state();
    let nc = state.n_comp;
    for i in 0..state.n_nodes() {
        let q = state.q[i * nc + 1];
        let qeq = state.qeq[i * nc + 1];
        assert!(q >= 0.0, "loadings stay non-negative");
        assert!(
            (q - qeq).abs() < 0.05 * qeq.max(1.0e-12) + 1.0e-9,
            "node {i}: q = {q}, qeq = {qeq}"
        );
    }
}
