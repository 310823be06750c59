//! Dynamic column state.
//!
//! # Storage layout
//!
//! With `Nc` components and `Ng + 1` grid nodes (node 0 = inlet, node `Ng` =
//! outlet), the per-node per-component fields are single contiguous buffers
//! of length `(Ng + 1) · Nc`, indexed `i · Nc + j`. Each node's
//! per-component block is therefore contiguous, which is the natural layout
//! for both the LDF update and the mixture-predictor input vector:
//!
//! ```text
//! index:   0 .. Nc-1   Nc .. 2Nc-1   ...
//! node:    [ node 0 ]  [ node 1 ]    ...
//! ```
//!
//! Node-indexed scalars (total pressure, velocity) are buffers of length
//! `Ng + 1`.
//!
//! Every field has a `_new` stage twin used by the three Runge-Kutta stages;
//! the stage buffers live for the lifetime of the state so the hot path
//! allocates nothing. The predictor caches (`cache_p0`, `cache_psi`) are
//! sliced per node and handed to the mixture predictor by the integrator;
//! no two nodes share a slice.

use nalgebra::DVector;

/// All mutable fields of the column, plus the predictor caches.
///
/// Created once by the driver, mutated only by the time integrator, read by
/// the output sink.
#[derive(Debug, Clone)]
pub struct ColumnState {
    /// Number of interior grid cells `Ng`.
    pub n_grid: usize,
    /// Number of components `Nc`.
    pub n_comp: usize,
    /// Cache width per component (widest isotherm term count).
    pub max_terms: usize,

    /// Total pressure per node [Pa].
    pub pt: DVector<f64>,
    /// Stage buffer for `pt`.
    pub pt_new: DVector<f64>,

    /// Interstitial velocity per node [m/s].
    pub v: DVector<f64>,
    /// Stage buffer for `v`.
    pub v_new: DVector<f64>,

    /// Partial pressures, `(Ng+1)·Nc` [Pa].
    pub p: DVector<f64>,
    /// Stage buffer for `p`.
    pub p_new: DVector<f64>,

    /// Adsorbed loadings, `(Ng+1)·Nc` [mol/kg].
    pub q: DVector<f64>,
    /// Stage buffer for `q`.
    pub q_new: DVector<f64>,

    /// Equilibrium loadings, `(Ng+1)·Nc` [mol/kg].
    pub qeq: DVector<f64>,
    /// Stage buffer for `qeq`.
    pub qeq_new: DVector<f64>,

    /// Gas-phase mole fractions, `(Ng+1)·Nc` [-].
    pub y: DVector<f64>,
    /// Stage buffer for `y`.
    pub y_new: DVector<f64>,

    /// LDF rate `∂q/∂t`, `(Ng+1)·Nc`.
    pub dqdt: DVector<f64>,
    /// Stage buffer for `dqdt`.
    pub dqdt_new: DVector<f64>,

    /// Total-pressure rate `∂Pt/∂t` per node.
    pub dptdt: DVector<f64>,
    /// Stage buffer for `dptdt`.
    pub dptdt_new: DVector<f64>,

    /// Mole-fraction rate `∂y/∂t`, `(Ng+1)·Nc`.
    pub dydt: DVector<f64>,
    /// Stage buffer for `dydt`.
    pub dydt_new: DVector<f64>,

    /// Hypothetical-pressure cache, `(Ng+1) · Nc · max_terms`.
    pub cache_p0: Vec<f64>,
    /// Grand-potential cache, `(Ng+1) · max_terms`.
    pub cache_psi: Vec<f64>,

    /// Adsorbed-phase mole-fraction scratch for the sequential
    /// prediction sweep, length `Nc`.
    pub x_scratch: Vec<f64>,
}

impl ColumnState {
    /// Allocates a zeroed state for `n_grid` cells, `n_comp` components and
    /// predictor caches `max_terms` wide.
    pub fn new(n_grid: usize, n_comp: usize, max_terms: usize) -> Self {
        let nodes = n_grid + 1;
        let grid = nodes * n_comp;
        Self {
            n_grid,
            n_comp,
            max_terms,
            pt: DVector::zeros(nodes),
            pt_new: DVector::zeros(nodes),
            v: DVector::zeros(nodes),
            v_new: DVector::zeros(nodes),
            p: DVector::zeros(grid),
            p_new: DVector::zeros(grid),
            q: DVector::zeros(grid),
            q_new: DVector::zeros(grid),
            qeq: DVector::zeros(grid),
            qeq_new: DVector::zeros(grid),
            y: DVector::zeros(grid),
            y_new: DVector::zeros(grid),
            dqdt: DVector::zeros(grid),
            dqdt_new: DVector::zeros(grid),
            dptdt: DVector::zeros(nodes),
            dptdt_new: DVector::zeros(nodes),
            dydt: DVector::zeros(grid),
            dydt_new: DVector::zeros(grid),
            cache_p0: vec![0.0; grid * max_terms],
            cache_psi: vec![0.0; nodes * max_terms],
            x_scratch: vec![0.0; n_comp],
        }
    }

    /// Number of grid nodes `Ng + 1`.
    pub fn n_nodes(&self) -> usize {
        self.n_grid + 1
    }

    /// Flat index of `(node, component)`.
    #[inline]
    pub fn idx(&self, node: usize, comp: usize) -> usize {
        node * self.n_comp + comp
    }

    /// Commits the stage buffers as the new committed state.
    pub fn commit(&mut self) {
        self.q.copy_from(&self.q_new);
        self.pt.copy_from(&self.pt_new);
        self.p.copy_from(&self.p_new);
        self.qeq.copy_from(&self.qeq_new);
        self.v.copy_from(&self.v_new);
        self.y.copy_from(&self.y_new);
    }

    /// Partial pressure of `comp` at the outlet node [Pa].
    pub fn outlet_partial_pressure(&self, comp: usize) -> f64 {
        self.p[self.idx(self.n_grid, comp)]
    }

    /// Gas-phase mole fraction of `comp` at the outlet node.
    pub fn outlet_mole_fraction(&self, comp: usize) -> f64 {
        self.y[self.idx(self.n_grid, comp)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_shapes() {
        let s = ColumnState::new(20, 3, 2);
        assert_eq!(s.n_nodes(), 21);
        assert_eq!(s.pt.len(), 21);
        assert_eq!(s.p.len(), 63);
        assert_eq!(s.cache_p0.len(), 63 * 2);
        assert_eq!(s.cache_psi.len(), 21 * 2);
        assert_eq!(s.x_scratch.len(), 3);
    }

    #[test]
    fn test_flat_index_inner_stride_is_component() {
        let s = ColumnState::new(10, 4, 1);
        assert_eq!(s.idx(0, 0), 0);
        assert_eq!(s.idx(0, 3), 3);
        assert_eq!(s.idx(1, 0), 4);
        assert_eq!(s.idx(2, 1), 9);
    }

    #[test]
    fn test_commit_copies_stage_buffers() {
        let mut s = ColumnState::new(2, 1, 1);
        s.pt_new.fill(5.0);
        s.q_new.fill(1.5);
        s.y_new.fill(0.25);
        s.commit();
        assert!(s.pt.iter().all(|&v| v == 5.0));
        assert!(s.q.iter().all(|&v| v == 1.5));
        assert!(s.y.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_outlet_accessors() {
        let mut s = ColumnState::new(3, 2, 1);
        let k = s.idx(3, 1);
        s.p[k] = 123.0;
        s.y[k] = 0.4;
        assert_eq!(s.outlet_partial_pressure(1), 123.0);
        assert_eq!(s.outlet_mole_fraction(1), 0.4);
    }
}
