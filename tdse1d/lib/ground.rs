//! Preparation of initial states by relaxation in imaginary time.
//!
//! Substituting *t* → -*i* *τ* turns each Crank-Nicolson step into a damped
//! diffusion step that suppresses excited components by e^(-(*E*ₙ - *E*₀) δτ)
//! relative to the ground state. The state is renormalized after every step,
//! and iteration stops once the energy of the active scheme settles.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use crate::{
    Arr1,
    error::{ LengthError, SingularError, TdseError },
    grid::Grid,
    observables::{ energy_scheme, population },
    scheme::{ Scheme, build_step },
    target::Target,
    tridiag::Tridiag,
    utils::wf_renormalize,
};

pub type GroundResult<T> = Result<T, TdseError>;

/// Parameters for [`ground_state`].
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundParams {
    /// Imaginary time step.
    pub dt: f64,
    /// Convergence threshold on the change in energy between iterations.
    pub epsilon: f64,
    /// Maximum number of iterations.
    pub maxiters: usize,
}

impl Default for GroundParams {
    fn default() -> Self {
        Self { dt: 0.1, epsilon: 1e-10, maxiters: 100_000 }
    }
}

/// Result of [`ground_state`].
#[derive(Clone, Debug)]
pub struct GroundState {
    /// Normalized ground state wavefunction.
    pub psi: nd::Array1<C64>,
    /// Energy of `psi` under the scheme used to compute it.
    pub energy: f64,
    /// Number of iterations performed.
    pub iterations: usize,
}

fn instability(step: usize) -> impl Fn(SingularError) -> TdseError {
    move |source| TdseError::Instability { step, source }
}

/// Relax `guess` to the lowest-energy state of `target` on `grid`.
///
/// The guess must overlap the ground state; any even, node-free function
/// centered on a symmetric potential's minimum will do. Fails with
/// [`TdseError::NoConvergence`] if the energy has not settled to within
/// `params.epsilon` after `params.maxiters` iterations.
pub fn ground_state<S>(
    grid: &Grid,
    target: &Target,
    scheme: Scheme,
    guess: &Arr1<S>,
    params: GroundParams,
) -> GroundResult<GroundState>
where S: nd::Data<Elem = C64>
{
    TdseError::check_epsilon(params.epsilon)?;
    TdseError::check_config(
        params.dt > 0.0 && params.dt.is_finite(),
        || format!("imaginary time step must be positive; got {}", params.dt),
    )?;
    TdseError::check_config(
        params.maxiters > 0,
        || "maxiters must be at least 1".into(),
    )?;
    LengthError::check(guess, grid.get_x())?;
    let dx = grid.get_dx();
    TdseError::check_config(
        guess.iter().all(|qk| qk.is_finite()) && population(guess, dx) > 0.0,
        || "initial guess must be finite with non-zero norm".into(),
    )?;

    let (v, _) = target.sample(grid)?;
    let n = grid.len();
    let tau = C64::from(params.dt / 2.0);
    let mut psi: nd::Array1<C64> = guess.to_owned();
    wf_renormalize(&mut psi, dx);
    let mut next: nd::Array1<C64> = nd::Array1::zeros(n);
    let mut lhs = Tridiag::zeros(n);

    let mut energy
        = energy_scheme(scheme, dx, &v, &psi).map_err(instability(0))?;
    log::debug!(
        "ground_state: {} points, dt = {}, initial energy {:.8}",
        n, params.dt, energy,
    );
    for iter in 1..=params.maxiters {
        build_step(scheme, dx, &v, tau, &psi, &mut lhs, &mut next);
        lhs.solve_mut(&mut next).map_err(instability(iter - 1))?;
        if !next.iter().all(|qk| qk.is_finite()) {
            return Err(TdseError::NonFinite(iter - 1));
        }
        std::mem::swap(&mut psi, &mut next);
        wf_renormalize(&mut psi, dx);
        let last = energy;
        energy
            = energy_scheme(scheme, dx, &v, &psi)
            .map_err(instability(iter))?;
        log::trace!("ground_state: iteration {}: energy {:.12}", iter, energy);
        if (energy - last).abs() < params.epsilon {
            log::debug!(
                "ground_state: converged to {:.10} after {} iterations",
                energy, iter,
            );
            return Ok(GroundState { psi, energy, iterations: iter });
        }
    }
    Err(TdseError::NoConvergence(params.maxiters))
}
