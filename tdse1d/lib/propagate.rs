//! Crank-Nicolson propagation of a wavefunction through a sampled field.
//!
//! Each step from `t[k]` to `t[k + 1]` solves
//! ```text
//! (M + i dt/2 G) ψ(t[k + 1]) = (M - i dt/2 G) ψ(t[k])
//! ```
//! with *G* built from the static potential plus the dipole coupling *x E*
//! evaluated at the midpoint of the step; see [`scheme`][crate::scheme].
//! Observables are recorded for the initial state and after every step.
//!
//! ```
//! use ndarray as nd;
//! use num_complex::Complex64 as C64;
//! use tdse1d::prelude::*;
//!
//! let grid = Grid::linspace(-20.0, 20.0, 512).unwrap();
//! let psi0: nd::Array1<C64>
//!     = grid.get_x().mapv(|x| C64::from((-x * x / 4.0).exp()));
//! let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 101);
//! let field = Field::zero(t).unwrap();
//! let inputs = Inputs::new(grid, psi0, Target::Free, field)
//!     .with_print(PrintFlags { pop_tot: true, ..PrintFlags::none() });
//! let out = propagate(&inputs).unwrap();
//! assert_eq!(out.pop_tot.len(), 101);
//! assert!((out.pop_tot[100] - out.pop_tot[0]).abs() < 1e-10);
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use crate::{
    error::{ DriftKind, LengthError, StabilityWarning, TdseError },
    field::Field,
    grid::Grid,
    observables::{
        acceleration,
        energy_scheme,
        expectation,
        population,
        population_interior,
    },
    output::{ Outputs, PrintFlags },
    scheme::{ Boundary, Scheme, build_step, local_potential },
    spectrum::{ Recorded, assemble },
    target::Target,
    tridiag::Tridiag,
};

pub type TResult<T> = Result<T, TdseError>;

/// Default half-width of the interior region used for
/// [`PrintFlags::pop_int`] (a.u.).
pub const DEF_X_INT: f64 = 5.0;

/// Tolerances on the drift of conserved quantities before a
/// [`StabilityWarning`] is raised.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Absolute tolerance on the total population.
    pub norm: f64,
    /// Tolerance on the field-free energy, relative to `max(|E₀|, 1)`.
    pub energy: f64,
}

impl Default for Tolerance {
    fn default() -> Self { Self { norm: 1e-6, energy: 1e-6 } }
}

/// Complete description of a single propagation run.
#[derive(Clone, Debug)]
pub struct Inputs {
    /// Spatial grid.
    pub grid: Grid,
    /// Initial wavefunction.
    pub psi0: nd::Array1<C64>,
    /// Static potential.
    pub target: Target,
    /// Driving field; its time grid sets the time steps.
    pub field: Field,
    /// Spatial discretization.
    pub scheme: Scheme,
    /// Treatment of the grid edges.
    pub boundary: Boundary,
    /// Half-width of the interior region for [`PrintFlags::pop_int`].
    pub x_int: f64,
    /// Number of steps to take; all available steps if `None`.
    pub steps: Option<usize>,
    /// Output selection.
    pub print: PrintFlags,
    /// Drift tolerances.
    pub tolerance: Tolerance,
}

impl Inputs {
    /// Create a new set of inputs with the standard scheme, Dirichlet
    /// boundaries, and nothing selected for output.
    pub fn new(grid: Grid, psi0: nd::Array1<C64>, target: Target, field: Field)
        -> Self
    {
        Self {
            grid,
            psi0,
            target,
            field,
            scheme: Scheme::default(),
            boundary: Boundary::default(),
            x_int: DEF_X_INT,
            steps: None,
            print: PrintFlags::default(),
            tolerance: Tolerance::default(),
        }
    }

    /// Set the spatial discretization.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the boundary treatment.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the half-width of the interior region.
    pub fn with_x_int(mut self, x_int: f64) -> Self {
        self.x_int = x_int;
        self
    }

    /// Limit the number of steps.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the output selection.
    pub fn with_print(mut self, print: PrintFlags) -> Self {
        self.print = print;
        self
    }

    /// Set the drift tolerances.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Release all owned buffers ahead of `self` being dropped.
    ///
    /// All arrays are left empty, and repeated calls are no-ops. A released
    /// set of inputs fails validation if passed to [`Propagator::new`].
    pub fn release(&mut self) {
        self.grid.release();
        self.psi0 = nd::Array1::zeros(0);
        self.field.release();
        if let Target::Sampled { v, dv } = &mut self.target {
            *v = nd::Array1::zeros(0);
            *dv = nd::Array1::zeros(0);
        }
    }

    // number of steps implied by `steps` and the field
    fn num_steps(&self) -> TResult<usize> {
        let avail = self.field.len().saturating_sub(1);
        let steps = self.steps.unwrap_or(avail);
        TdseError::check_config(
            avail >= 1 && steps <= avail,
            || format!(
                "requested {steps} steps but the field only supports {avail}"
            ),
        )?;
        Ok(steps)
    }

    // check everything that can be checked before allocating
    fn validate(&self) -> TResult<()> {
        TdseError::check_config(
            self.grid.len() >= 3,
            || "spatial grid must have at least 3 points".into(),
        )?;
        LengthError::check(&self.psi0, self.grid.get_x())?;
        TdseError::check_config(
            self.psi0.iter().all(|qk| qk.is_finite()),
            || "initial wavefunction must be finite".into(),
        )?;
        TdseError::check_config(
            population(&self.psi0, self.grid.get_dx()) > 0.0,
            || "initial wavefunction must have non-zero norm".into(),
        )?;
        TdseError::check_config(
            self.x_int > 0.0,
            || format!("interior cutoff must be positive; got {}", self.x_int),
        )?;
        if let Boundary::Mask { width, exponent } = self.boundary {
            let (x0, x1)
                = self.grid.bounds()
                .ok_or_else(|| TdseError::Config("spatial grid is empty".into()))?;
            TdseError::check_config(
                width > 0.0 && 2.0 * width < x1 - x0,
                || format!(
                    "absorbing layer width must lie in (0, {}); got {width}",
                    (x1 - x0) / 2.0,
                ),
            )?;
            TdseError::check_config(
                exponent > 0.0,
                || format!("mask exponent must be positive; got {exponent}"),
            )?;
        }
        Ok(())
    }
}

/// Stage of a [`Propagator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Initial state recorded; no steps taken.
    Initialized,
    /// At least one step taken, more remaining.
    Propagating,
    /// All steps taken.
    Finalized,
}

// reserve exactly `n` elements up front so that allocation failure surfaces
// before any stepping
fn reserve(flag: bool, n: usize) -> TResult<Vec<f64>> {
    let mut v: Vec<f64> = Vec::new();
    if flag { v.try_reserve_exact(n)?; }
    Ok(v)
}

/// Step-by-step driver for a single run.
///
/// A `Propagator` borrows its [`Inputs`] for its whole lifetime and exclusively
/// owns the evolving state. Call [`step`][Self::step] or [`run`][Self::run] to
/// advance, then [`finalize`][Self::finalize] to obtain [`Outputs`]; stopping
/// early (e.g. via [`run_while`][Self::run_while]) leaves valid, shorter
/// sequences.
#[derive(Clone, Debug)]
pub struct Propagator<'a> {
    inputs: &'a Inputs,
    // static potential and its gradient
    v: nd::Array1<f64>,
    dv: nd::Array1<f64>,
    // absorbing mask, if any
    mask: Option<nd::Array1<f64>>,
    // current wavefunction
    psi: nd::Array1<C64>,
    // per-step scratch: local potential, system matrix, right-hand side
    w: nd::Array1<f64>,
    lhs: Tridiag,
    rhs: nd::Array1<C64>,
    // index of the current time sample and total number of steps
    k: usize,
    nsteps: usize,
    stage: Stage,
    rec: Recorded,
    // reference values for drift monitoring
    pop0: f64,
    energy0: Option<f64>,
    warnings: Vec<StabilityWarning>,
}

impl<'a> Propagator<'a> {
    /// Validate `inputs`, allocate all buffers, and record the initial state.
    pub fn new(inputs: &'a Inputs) -> TResult<Self> {
        inputs.validate()?;
        let nsteps = inputs.num_steps()?;
        let (v, dv) = inputs.target.sample(&inputs.grid)?;
        let n = inputs.grid.len();
        let print = &inputs.print;
        let nt = nsteps + 1;
        let rec = Recorded {
            tgrid: reserve(print.tgrid, nt)?,
            efield: reserve(print.needs_efield(), nt)?,
            source: reserve(print.needs_source(), nt)?,
            pop_tot: reserve(print.pop_tot, nt)?,
            pop_int: reserve(print.pop_int, nt)?,
            expval_x: reserve(print.expval_x, nt)?,
            energy: reserve(print.energy, nt)?,
        };
        let psi = inputs.psi0.clone();
        let pop0 = population(&psi, inputs.grid.get_dx());
        // a mask removes energy along with population
        let energy0
            = if inputs.field.is_zero() && !inputs.boundary.is_absorbing() {
                let e0
                    = energy_scheme(inputs.scheme, inputs.grid.get_dx(), &v, &psi)
                    .map_err(|source| {
                        TdseError::Instability { step: 0, source }
                    })?;
                Some(e0)
            } else {
                None
            };
        log::debug!(
            "propagator: {} points, {} steps, {:?} scheme, {:?} boundary",
            n, nsteps, inputs.scheme, inputs.boundary,
        );
        let mut prop = Self {
            inputs,
            v,
            dv,
            mask: inputs.boundary.mask(&inputs.grid),
            psi,
            w: nd::Array1::zeros(n),
            lhs: Tridiag::zeros(n),
            rhs: nd::Array1::zeros(n),
            k: 0,
            nsteps,
            stage: Stage::Initialized,
            rec,
            pop0,
            energy0,
            warnings: Vec::new(),
        };
        prop.record()?;
        if nsteps == 0 { prop.stage = Stage::Finalized; }
        Ok(prop)
    }

    /// Get the current stage.
    pub fn stage(&self) -> Stage { self.stage }

    /// Get the number of steps taken so far.
    pub fn step_index(&self) -> usize { self.k }

    /// Get the total number of steps in the run.
    pub fn num_steps(&self) -> usize { self.nsteps }

    /// Get the time of the current state.
    pub fn time(&self) -> f64 { self.inputs.field.get_t()[self.k] }

    /// Get a reference to the current wavefunction.
    pub fn psi(&self) -> &nd::Array1<C64> { &self.psi }

    /// Get the drift warnings raised so far.
    pub fn warnings(&self) -> &[StabilityWarning] { &self.warnings }

    /// Take a single step, returning `false` without doing anything if all
    /// steps have already been taken.
    ///
    /// A singular linear system or a non-finite wavefunction aborts the run
    /// with an error, leaving the wavefunction at the last good state.
    pub fn step(&mut self) -> TResult<bool> {
        if self.k >= self.nsteps {
            self.stage = Stage::Finalized;
            return Ok(false);
        }
        let inputs = self.inputs;
        let dx = inputs.grid.get_dx();
        let t = inputs.field.get_t();
        let dt = t[self.k + 1] - t[self.k];
        let e_mid = inputs.field.midpoint(self.k);
        local_potential(inputs.grid.get_x(), &self.v, e_mid, &mut self.w);
        build_step(
            inputs.scheme,
            dx,
            &self.w,
            C64::new(0.0, dt / 2.0),
            &self.psi,
            &mut self.lhs,
            &mut self.rhs,
        );
        self.lhs.solve_mut(&mut self.rhs)
            .map_err(|source| {
                TdseError::Instability { step: self.k, source }
            })?;
        if !self.rhs.iter().all(|qk| qk.is_finite()) {
            return Err(TdseError::NonFinite(self.k));
        }
        std::mem::swap(&mut self.psi, &mut self.rhs);
        if let Some(mask) = self.mask.as_ref() {
            self.psi.iter_mut().zip(mask)
                .for_each(|(qk, mk)| { *qk *= *mk; });
        }
        self.k += 1;
        self.stage
            = if self.k == self.nsteps {
                Stage::Finalized
            } else {
                Stage::Propagating
            };
        self.record()?;
        Ok(true)
    }

    /// Take all remaining steps.
    pub fn run(&mut self) -> TResult<()> {
        while self.step()? { }
        Ok(())
    }

    /// Take steps while `pred`, called with the number of steps taken so far,
    /// returns `true`.
    pub fn run_while<F>(&mut self, mut pred: F) -> TResult<()>
    where F: FnMut(usize) -> bool
    {
        while pred(self.k) && self.step()? { }
        Ok(())
    }

    // append requested observables for the current state and check for drift
    fn record(&mut self) -> TResult<()> {
        let inputs = self.inputs;
        let print = &inputs.print;
        let dx = inputs.grid.get_dx();
        let x = inputs.grid.get_x();
        let t = inputs.field.get_t()[self.k];
        let e = inputs.field.get_e()[self.k];
        let pop = population(&self.psi, dx);

        if print.tgrid { self.rec.tgrid.push(t); }
        if print.needs_efield() { self.rec.efield.push(e); }
        if print.needs_source() {
            self.rec.source.push(acceleration(&self.dv, &self.psi, dx, e));
        }
        if print.pop_tot { self.rec.pop_tot.push(pop); }
        if print.pop_int {
            self.rec.pop_int.push(
                population_interior(x, &self.psi, dx, inputs.x_int));
        }
        if print.expval_x {
            self.rec.expval_x.push(expectation(&self.psi, x, dx));
        }

        let energy
            = if print.energy || self.energy0.is_some() {
                let en = energy_scheme(inputs.scheme, dx, &self.v, &self.psi)
                    .map_err(|source| {
                        TdseError::Instability { step: self.k, source }
                    })?;
                Some(en)
            } else {
                None
            };
        if let (true, Some(en)) = (print.energy, energy) {
            self.rec.energy.push(en);
        }

        let tol = inputs.tolerance;
        let drift = pop - self.pop0;
        let lossy = inputs.boundary.is_absorbing();
        if drift > tol.norm || (!lossy && -drift > tol.norm) {
            self.warn(DriftKind::Norm, drift.abs());
        }
        if let (Some(e0), Some(en)) = (self.energy0, energy) {
            let de = (en - e0).abs();
            if de > tol.energy * e0.abs().max(1.0) {
                self.warn(DriftKind::Energy, de);
            }
        }
        Ok(())
    }

    fn warn(&mut self, kind: DriftKind, drift: f64) {
        let step = self.k;
        match self.warnings.iter_mut().find(|w| w.kind == kind) {
            Some(w) => { w.update(step, drift); },
            None => {
                log::warn!(
                    "{:?} drift of {:.3e} exceeds tolerance at step {}",
                    kind, drift, step,
                );
                self.warnings.push(StabilityWarning::new(kind, step, drift));
            },
        }
    }

    /// Finish the run, transforming recorded sequences and assembling the
    /// final results.
    ///
    /// Consumes `self`, so no further stepping is possible.
    pub fn finalize(self) -> Outputs {
        let inputs = self.inputs;
        log::debug!(
            "propagator: finalizing after {} of {} steps ({} warnings)",
            self.k, self.nsteps, self.warnings.len(),
        );
        let mut out = assemble(
            self.rec,
            inputs.field.dt(),
            &inputs.print,
            self.psi,
            self.k,
        );
        out.warnings = self.warnings;
        out
    }
}

/// Propagate `inputs.psi0` through every step of `inputs.field` and return
/// the selected results.
pub fn propagate(inputs: &Inputs) -> TResult<Outputs> {
    let mut prop = Propagator::new(inputs)?;
    prop.run()?;
    Ok(prop.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(grid: &Grid, x0: f64) -> nd::Array1<C64> {
        grid.get_x().mapv(|x| C64::from((-(x - x0).powi(2) / 2.0).exp()))
    }

    fn free_inputs(nt: usize) -> Inputs {
        let grid = Grid::linspace(-20.0, 20.0, 401).unwrap();
        let psi0 = gaussian(&grid, 0.0);
        let t: nd::Array1<f64>
            = nd::Array1::linspace(0.0, 0.1 * (nt - 1) as f64, nt);
        let field = Field::zero(t).unwrap();
        Inputs::new(grid, psi0, Target::Free, field)
    }

    #[test]
    fn stages() {
        let inputs = free_inputs(4);
        let mut prop = Propagator::new(&inputs).unwrap();
        assert_eq!(prop.stage(), Stage::Initialized);
        assert_eq!(prop.num_steps(), 3);
        assert!(prop.step().unwrap());
        assert_eq!(prop.stage(), Stage::Propagating);
        assert!((prop.time() - 0.1).abs() < 1e-14);
        prop.run().unwrap();
        assert_eq!(prop.stage(), Stage::Finalized);
        assert_eq!(prop.step_index(), 3);
        assert!(!prop.step().unwrap());
        let out = prop.finalize();
        assert_eq!(out.steps, 3);
        assert_eq!(out.psi_final.len(), 401);
    }

    #[test]
    fn early_stop_keeps_partial_sequences() {
        let inputs = free_inputs(11).with_print(PrintFlags::all());
        let mut prop = Propagator::new(&inputs).unwrap();
        prop.run_while(|k| k < 4).unwrap();
        let out = prop.finalize();
        assert_eq!(out.steps, 4);
        assert_eq!(out.tgrid.len(), 5);
        assert_eq!(out.pop_tot.len(), 5);
        assert_eq!(out.f_source.len(), 5);
        assert_eq!(out.freq.len(), 5);
    }

    #[test]
    fn configuration_errors() {
        let inputs = free_inputs(5);

        let mut bad = inputs.clone();
        bad.psi0 = nd::Array1::zeros(400);
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Length(_))));

        let bad = inputs.clone().with_steps(10);
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Config(_))));

        let mut bad = inputs.clone();
        bad.psi0 = nd::Array1::zeros(401);
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Config(_))));

        let bad = inputs.clone().with_x_int(0.0);
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Config(_))));

        let bad = inputs.clone()
            .with_boundary(Boundary::Mask { width: 25.0, exponent: 0.125 });
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Config(_))));

        let bad = Inputs {
            target: Target::Sampled {
                v: nd::Array1::zeros(401),
                dv: nd::Array1::zeros(3),
            },
            ..inputs
        };
        assert!(matches!(Propagator::new(&bad), Err(TdseError::Length(_))));
    }

    #[test]
    fn zero_steps() {
        let inputs = free_inputs(5).with_steps(0).with_print(PrintFlags::all());
        let prop = Propagator::new(&inputs).unwrap();
        assert_eq!(prop.stage(), Stage::Finalized);
        let out = prop.finalize();
        assert_eq!(out.tgrid.len(), 1);
        assert_eq!(out.freq.len(), 1);
        assert_eq!(out.psi_final, inputs.psi0);
    }

    #[test]
    fn released_inputs_are_rejected() {
        let mut inputs = free_inputs(5);
        inputs.release();
        inputs.release();
        assert!(inputs.psi0.is_empty());
        assert!(Propagator::new(&inputs).is_err());
    }

    #[test]
    fn norm_tolerance_violation_is_reported() {
        // an absurdly tight tolerance turns rounding noise into a warning
        let inputs = free_inputs(21)
            .with_tolerance(Tolerance { norm: -1.0, energy: 1e-6 });
        let out = propagate(&inputs).unwrap();
        assert!(out.has_warning(DriftKind::Norm));
        let w = &out.warnings[0];
        assert_eq!(w.first_step, 0);
        assert_eq!(w.last_step, 20);
        assert_eq!(w.count, 21);
        assert!(!out.has_warning(DriftKind::Energy));
    }

    #[test]
    fn energy_is_not_monitored_under_a_mask() {
        // the packet is halfway into the mask by the end
        let grid = Grid::linspace(-10.0, 10.0, 201).unwrap();
        let psi0: nd::Array1<C64>
            = grid.get_x().mapv(|x| {
                C64::from_polar((-x * x / 4.0).exp(), 3.0 * x)
            });
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 2.5, 251);
        let field = Field::zero(t).unwrap();
        let inputs = Inputs::new(grid, psi0, Target::Free, field)
            .with_boundary(Boundary::Mask { width: 5.0, exponent: 0.125 })
            .with_print(PrintFlags { energy: true, ..PrintFlags::none() })
            .with_tolerance(Tolerance { norm: 1e-6, energy: 1e-12 });
        let out = propagate(&inputs).unwrap();
        assert!((out.energy[250] - out.energy[0]).abs() > 1e-3);
        assert!(out.warnings.is_empty());
    }
}
