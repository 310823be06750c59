//! Strong-stability-preserving third-order Runge-Kutta time integration.
//!
//! # Scheme
//!
//! One step advances the state tuple `U = (Pt, P, Q, y)` through the three
//! Shu–Osher stages
//!
//! ```text
//! U₁ = U₀ + dt·F(U₀)
//! U₂ = 3/4·U₀ + 1/4·U₁ + 1/4·dt·F(U₁)
//! U₃ = 1/3·U₀ + 2/3·U₂ + 2/3·dt·F(U₂)
//! ```
//!
//! where `F` is the spatial right-hand side ([`RhsEvaluator`]). After every
//! provisional state the two algebraic closures are re-evaluated **at that
//! provisional state** before the next derivative evaluation:
//!
//! 1. the partial pressures are reconstructed as `P = y · Pt`,
//! 2. the mixture predictor refreshes the equilibrium loadings `Qeq`,
//! 3. the Ergun solve refreshes the velocity field `V`.
//!
//! The order {RHS → provisional state → mixture predictor → velocity solve}
//! is load-bearing; rearranging it changes the numerical results.
//!
//! # Pulse rule
//!
//! In pulse mode, once `t > t_pulse` the inlet reverts to pure carrier: the
//! inlet mole fractions are pinned (carrier 1, others 0) and the inlet
//! partial pressures follow. Pinning `y` rather than only `P` is what makes
//! the pulse survive the per-stage `P = y·Pt` reconstruction.

use crate::error::SimulationError;
use crate::mixture::{MixturePredictor, PredictorStats};
use crate::solver::rhs::RhsEvaluator;
use crate::solver::velocity::ErgunSolver;
use crate::state::ColumnState;

/// Work size below which the parallel prediction sweep is not worth the
/// thread fan-out.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

/// Three-stage SSP-RK3 time integrator (component C6).
#[derive(Debug, Clone)]
pub struct SspRk3 {
    rhs: RhsEvaluator,
    ergun: ErgunSolver,
    dt: f64,
    temperature: f64,
    total_pressure: f64,
    pressure_gradient: f64,
    column_length: f64,
    carrier_gas_component: usize,
    pulse: bool,
    pulse_time: f64,
}

impl SspRk3 {
    /// Assembles the integrator from its collaborators and the column
    /// scalars it needs for the pulse rule and the geometry pre-check.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rhs: RhsEvaluator,
        ergun: ErgunSolver,
        dt: f64,
        temperature: f64,
        total_pressure: f64,
        pressure_gradient: f64,
        column_length: f64,
        carrier_gas_component: usize,
        pulse: bool,
        pulse_time: f64,
    ) -> Self {
        Self {
            rhs,
            ergun,
            dt,
            temperature,
            total_pressure,
            pressure_gradient,
            column_length,
            carrier_gas_component,
            pulse,
            pulse_time,
        }
    }

    /// Borrow of the right-hand-side evaluator.
    pub fn rhs(&self) -> &RhsEvaluator {
        &self.rhs
    }

    /// Borrow of the Ergun solver (the driver reuses it for the initial
    /// pressure profile).
    pub fn ergun(&self) -> &ErgunSolver {
        &self.ergun
    }

    /// Advances the committed state by one time step.
    ///
    /// On error the state may be mid-stage; no rollback is attempted.
    pub fn step(
        &self,
        state: &mut ColumnState,
        predictor: &MixturePredictor,
        stats: &mut PredictorStats,
        step: usize,
    ) -> Result<(), SimulationError> {
        let dt = self.dt;
        let nodes = state.n_nodes();
        let nc = state.n_comp;

        // Stage 1: forward-Euler predictor from the committed state
        self.rhs.evaluate(
            &state.qeq,
            &state.q,
            &state.v,
            &state.pt,
            &state.y,
            &mut state.dqdt,
            &mut state.dptdt,
            &mut state.dydt,
        );
        for i in 0..nodes {
            state.pt_new[i] = state.pt[i] + dt * state.dptdt[i];
            for j in 0..nc {
                let k = i * nc + j;
                state.q_new[k] = state.q[k] + dt * state.dqdt[k];
                state.y_new[k] = state.y[k] + dt * state.dydt[k];
                state.p_new[k] = state.y_new[k] * state.pt_new[i];
            }
        }
        self.equilibrium_loadings(state, predictor, stats, step)?;
        self.ergun.solve(&state.pt_new, self.temperature, &mut state.v_new)?;

        // Stage 2: blend back towards the committed state
        self.rhs.evaluate(
            &state.qeq_new,
            &state.q_new,
            &state.v_new,
            &state.pt_new,
            &state.y_new,
            &mut state.dqdt_new,
            &mut state.dptdt_new,
            &mut state.dydt_new,
        );
        for i in 0..nodes {
            state.pt_new[i] =
                0.75 * state.pt[i] + 0.25 * state.pt_new[i] + 0.25 * dt * state.dptdt_new[i];
            for j in 0..nc {
                let k = i * nc + j;
                state.q_new[k] =
                    0.75 * state.q[k] + 0.25 * state.q_new[k] + 0.25 * dt * state.dqdt_new[k];
                state.y_new[k] =
                    0.75 * state.y[k] + 0.25 * state.y_new[k] + 0.25 * dt * state.dydt_new[k];
                state.p_new[k] = state.y_new[k] * state.pt_new[i];
            }
        }
        self.equilibrium_loadings(state, predictor, stats, step)?;
        self.ergun.solve(&state.pt_new, self.temperature, &mut state.v_new)?;

        // Stage 3: final Shu–Osher combination
        self.rhs.evaluate(
            &state.qeq_new,
            &state.q_new,
            &state.v_new,
            &state.pt_new,
            &state.y_new,
            &mut state.dqdt_new,
            &mut state.dptdt_new,
            &mut state.dydt_new,
        );
        let third = 1.0 / 3.0;
        let two_thirds = 2.0 / 3.0;
        for i in 0..nodes {
            state.pt_new[i] = third * state.pt[i]
                + two_thirds * state.pt_new[i]
                + two_thirds * dt * state.dptdt_new[i];
            for j in 0..nc {
                let k = i * nc + j;
                state.q_new[k] = third * state.q[k]
                    + two_thirds * state.q_new[k]
                    + two_thirds * dt * state.dqdt_new[k];
                state.y_new[k] = third * state.y[k]
                    + two_thirds * state.y_new[k]
                    + two_thirds * dt * state.dydt_new[k];
                state.p_new[k] = state.y_new[k] * state.pt_new[i];
            }
        }
        self.equilibrium_loadings(state, predictor, stats, step)?;
        self.ergun.solve(&state.pt_new, self.temperature, &mut state.v_new)?;

        state.commit();

        // pulse boundary condition: revert the inlet to pure carrier
        let t = step as f64 * dt;
        if self.pulse && t > self.pulse_time {
            for j in 0..nc {
                if j == self.carrier_gas_component {
                    state.y[j] = 1.0;
                    state.p[j] = self.total_pressure;
                } else {
                    state.y[j] = 0.0;
                    state.p[j] = 0.0;
                }
            }
        }

        Ok(())
    }

    /// Refreshes `Qeq` from the provisional `(y, Pt)` via the mixture
    /// predictor, one call per node on that node's own cache slice.
    ///
    /// The implied outlet pressure is sanity-checked first; a non-physical
    /// pressure-gradient configuration fails here rather than producing
    /// negative hypothetical pressures inside the predictor.
    fn equilibrium_loadings(
        &self,
        state: &mut ColumnState,
        predictor: &MixturePredictor,
        stats: &mut PredictorStats,
        step: usize,
    ) -> Result<(), SimulationError> {
        let outlet_pressure = state.pt_new[0] + self.pressure_gradient * self.column_length;
        if outlet_pressure < 0.0 {
            return Err(SimulationError::Geometry { outlet_pressure });
        }

        let nodes = state.n_nodes();
        let nc = state.n_comp;
        let mt = state.max_terms;

        let ColumnState {
            ref y_new,
            ref pt_new,
            ref mut qeq_new,
            ref mut cache_p0,
            ref mut cache_psi,
            ref mut x_scratch,
            ..
        } = *state;

        #[cfg(feature = "parallel")]
        if nodes * nc >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;

            let y = y_new.as_slice();
            let pt = pt_new.as_slice();
            // disjoint per-node chunks of the outputs and caches; rayon can
            // run the nodes concurrently without aliasing (each prediction
            // touches exactly one chunk of each buffer)
            let iterations = qeq_new
                .as_mut_slice()
                .par_chunks_mut(nc)
                .zip(cache_p0.par_chunks_mut(nc * mt))
                .zip(cache_psi.par_chunks_mut(mt))
                .enumerate()
                .map(|(node, ((qeq_node, p0_node), psi_node))| {
                    let mut x = vec![0.0; nc];
                    predictor
                        .predict(&y[node * nc..(node + 1) * nc], pt[node], &mut x, qeq_node, p0_node, psi_node)
                        .map_err(|failure| SimulationError::PredictorDiverged {
                            step,
                            node,
                            iterations: failure.iterations,
                        })
                })
                .try_reduce(|| 0usize, |a, b| Ok(a + b))?;
            stats.iterations += iterations;
            stats.calls += nodes;
            return Ok(());
        }

        let y = y_new.as_slice();
        let pt = pt_new.as_slice();
        let qeq = qeq_new.as_mut_slice();
        for node in 0..nodes {
            let row = node * nc;
            let iterations = predictor
                .predict(
                    &y[row..row + nc],
                    pt[node],
                    x_scratch,
                    &mut qeq[row..row + nc],
                    &mut cache_p0[row * mt..(row + nc) * mt],
                    &mut cache_psi[node * mt..(node + 1) * mt],
                )
                .map_err(|failure| SimulationError::PredictorDiverged {
                    step,
                    node,
                    iterations: failure.iterations,
                })?;
            stats.record(iterations);
        }
        Ok(())
    }
}
