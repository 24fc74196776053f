//! Selection and storage of propagation results.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use crate::error::{ DriftKind, StabilityWarning };

/// Switches selecting which result sequences are materialized in
/// [`Outputs`].
///
/// Every flag defaults to `false`; requesting nothing is allowed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrintFlags {
    /// Field amplitude over time.
    pub efield: bool,
    /// Fourier transform of the field.
    pub f_efield: bool,
    /// Squared magnitude of the Fourier-transformed field.
    pub f_efield_m2: bool,
    /// Dipole acceleration (source term) over time.
    pub source: bool,
    /// Fourier transform of the source term.
    pub f_source: bool,
    /// Squared magnitude of the Fourier-transformed source term.
    pub f_source_m2: bool,
    /// Total population over time.
    pub pop_tot: bool,
    /// Interior population over time.
    pub pop_int: bool,
    /// Position expectation value over time.
    pub expval_x: bool,
    /// Field-free energy over time.
    pub energy: bool,
    /// Time grid.
    pub tgrid: bool,
    /// Frequency grid.
    pub freq: bool,
}

impl PrintFlags {
    /// Select every output.
    pub fn all() -> Self {
        Self {
            efield: true,
            f_efield: true,
            f_efield_m2: true,
            source: true,
            f_source: true,
            f_source_m2: true,
            pop_tot: true,
            pop_int: true,
            expval_x: true,
            energy: true,
            tgrid: true,
            freq: true,
        }
    }

    /// Select nothing.
    pub fn none() -> Self { Self::default() }

    /// Return `true` if the field must be recorded during propagation.
    pub(crate) fn needs_efield(&self) -> bool {
        self.efield || self.f_efield || self.f_efield_m2
    }

    /// Return `true` if the source term must be recorded during propagation.
    pub(crate) fn needs_source(&self) -> bool {
        self.source || self.f_source || self.f_source_m2
    }
}

/// Final results of a propagation run.
///
/// Sequences not selected by the run's [`PrintFlags`] are left empty. Time
/// sequences hold one sample for the initial state followed by one sample per
/// completed step; frequency sequences have the same length and follow the
/// ordering of [`fft_freq`][crate::utils::fft_freq].
#[derive(Clone, Debug, Default)]
pub struct Outputs {
    /// Time grid.
    pub tgrid: nd::Array1<f64>,
    /// Frequency grid.
    pub freq: nd::Array1<f64>,
    /// Field amplitude.
    pub efield: nd::Array1<f64>,
    /// Fourier transform of the field.
    pub f_efield: nd::Array1<C64>,
    /// Squared magnitude of `f_efield`.
    pub f_efield_m2: nd::Array1<f64>,
    /// Dipole acceleration.
    pub source: nd::Array1<f64>,
    /// Fourier transform of the dipole acceleration.
    pub f_source: nd::Array1<C64>,
    /// Squared magnitude of `f_source`.
    pub f_source_m2: nd::Array1<f64>,
    /// Total population.
    pub pop_tot: nd::Array1<f64>,
    /// Population within the interior cutoff.
    pub pop_int: nd::Array1<f64>,
    /// Position expectation value.
    pub expval_x: nd::Array1<f64>,
    /// Field-free energy of the active scheme.
    pub energy: nd::Array1<f64>,
    /// Wavefunction after the last completed step.
    pub psi_final: nd::Array1<C64>,
    /// Number of completed steps.
    pub steps: usize,
    /// Drift diagnostics collected during the run.
    pub warnings: Vec<StabilityWarning>,
}

impl Outputs {
    /// Return `true` if any drift of the given kind was recorded.
    pub fn has_warning(&self, kind: DriftKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Release all owned buffers ahead of `self` being dropped.
    ///
    /// All sequences are left empty, and repeated calls are no-ops.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    /// Return `true` if every sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.tgrid.is_empty()
            && self.freq.is_empty()
            && self.efield.is_empty()
            && self.f_efield.is_empty()
            && self.f_efield_m2.is_empty()
            && self.source.is_empty()
            && self.f_source.is_empty()
            && self.f_source_m2.is_empty()
            && self.pop_tot.is_empty()
            && self.pop_int.is_empty()
            && self.expval_x.is_empty()
            && self.energy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_sets() {
        let none = PrintFlags::none();
        assert!(!none.needs_efield() && !none.needs_source());
        let all = PrintFlags::all();
        assert!(all.needs_efield() && all.needs_source());
        let only_m2 = PrintFlags { f_source_m2: true, ..PrintFlags::none() };
        assert!(only_m2.needs_source() && !only_m2.needs_efield());
    }

    #[test]
    fn release_is_idempotent() {
        let mut out = Outputs {
            tgrid: nd::array![0.0, 1.0],
            psi_final: nd::array![C64::from(1.0)],
            steps: 1,
            ..Outputs::default()
        };
        assert!(!out.is_empty());
        out.release();
        assert!(out.is_empty());
        assert!(out.psi_final.is_empty());
        assert_eq!(out.steps, 0);
        out.release();
        assert!(out.is_empty());
    }
}
