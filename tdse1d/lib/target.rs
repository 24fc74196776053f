//! Descriptions of the static confining potential acting on the particle.
//!
//! All potentials are expressed in atomic units. Each model provides both the
//! potential *V*(*x*) and its gradient *V*'(*x*), the latter being needed for
//! the [dipole acceleration][crate::observables::acceleration].

use ndarray as nd;
use serde::Deserialize;
use crate::{
    error::{ LengthError, TdseError },
    grid::Grid,
};

pub type TargetResult<T> = Result<T, TdseError>;

/// Static potential model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// No potential.
    Free,
    /// Soft-core Coulomb potential `-Z / √(x² + a)`.
    ///
    /// `a = 2` with `Z = 1` gives a ground-state energy of -0.5, matching the
    /// ionization potential of hydrogen.
    SoftCoulomb {
        /// Softening parameter (a.u.²).
        a: f64,
        /// Nuclear charge (default: `1`).
        #[serde(default = "default_charge")]
        charge: f64,
    },
    /// Harmonic trap `ω² x² / 2`.
    Harmonic {
        /// Trap angular frequency (a.u.).
        omega: f64,
    },
    /// Potential and gradient supplied directly on the grid.
    #[serde(skip_deserializing)]
    Sampled {
        /// Potential.
        v: nd::Array1<f64>,
        /// Gradient of the potential.
        dv: nd::Array1<f64>,
    },
}

fn default_charge() -> f64 { 1.0 }

impl Default for Target {
    fn default() -> Self { Self::Free }
}

impl Target {
    /// Create a soft-core Coulomb potential for unit charge.
    pub fn soft_coulomb(a: f64) -> Self {
        Self::SoftCoulomb { a, charge: 1.0 }
    }

    /// Evaluate the potential at a single point.
    ///
    /// Returns `None` for [`Self::Sampled`].
    pub fn potential(&self, x: f64) -> Option<f64> {
        match self {
            Self::Free => Some(0.0),
            Self::SoftCoulomb { a, charge } => {
                Some(-charge / (x.powi(2) + a).sqrt())
            },
            Self::Harmonic { omega } => Some(0.5 * (omega * x).powi(2)),
            Self::Sampled { .. } => None,
        }
    }

    /// Evaluate the gradient of the potential at a single point.
    ///
    /// Returns `None` for [`Self::Sampled`].
    pub fn gradient(&self, x: f64) -> Option<f64> {
        match self {
            Self::Free => Some(0.0),
            Self::SoftCoulomb { a, charge } => {
                Some(charge * x / (x.powi(2) + a).powf(1.5))
            },
            Self::Harmonic { omega } => Some(omega.powi(2) * x),
            Self::Sampled { .. } => None,
        }
    }

    /// Sample the potential and its gradient over a grid.
    ///
    /// Fails if sampled arrays do not match the grid or if any value is not
    /// finite.
    pub fn sample(&self, grid: &Grid)
        -> TargetResult<(nd::Array1<f64>, nd::Array1<f64>)>
    {
        let x = grid.get_x();
        let (v, dv)
            = match self {
                Self::Sampled { v, dv } => {
                    LengthError::check(v, x)?;
                    LengthError::check(dv, x)?;
                    (v.clone(), dv.clone())
                },
                _ => {
                    let v = x.mapv(|xk| self.potential(xk).unwrap_or(0.0));
                    let dv = x.mapv(|xk| self.gradient(xk).unwrap_or(0.0));
                    (v, dv)
                },
            };
        TdseError::check_config(
            v.iter().chain(dv.iter()).all(|vk| vk.is_finite()),
            || "potential must be finite everywhere on the grid".into(),
        )?;
        Ok((v, dv))
    }
}
