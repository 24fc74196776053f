//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! Drift in the norm or energy of a propagated state is *not* an error; see
//! [`StabilityWarning`].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::collections::TryReserveError;
use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned by the [tridiagonal solver][crate::tridiag::Tridiag::solve_mut]
/// when elimination encounters a zero, near-zero, or non-finite pivot.
#[derive(Copy, Clone, Debug, Error)]
#[error("singular tridiagonal system: pivot {pivot:.3e} at row {index}")]
pub struct SingularError {
    /// Row at which elimination failed.
    pub index: usize,
    /// Magnitude of the offending pivot.
    pub pivot: f64,
}

/// Returned from the propagation driver and its supporting routines.
#[derive(Debug, Error)]
pub enum TdseError {
    /// Inputs are inconsistent with each other; raised before any stepping.
    #[error("configuration error: {0}")]
    Config(String),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// A time step produced a singular linear system; the run cannot
    /// continue.
    #[error("numerical instability at step {step}: {source}")]
    Instability {
        step: usize,
        #[source]
        source: SingularError,
    },

    /// The wavefunction acquired non-finite values during a time step.
    #[error("numerical instability at step {0}: wavefunction is no longer finite")]
    NonFinite(usize),

    /// Output buffers could not be allocated.
    #[error("failed to allocate output buffers: {0}")]
    Resource(#[from] TryReserveError),

    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when an iterative procedure fails to converge within the
    /// allowed number of iterations.
    #[error("failed to converge within {0} iterations")]
    NoConvergence(usize),
}

impl TdseError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_config<F>(cond: bool, msg: F) -> Result<(), Self>
    where F: FnOnce() -> String
    {
        cond.then_some(()).ok_or_else(|| Self::Config(msg()))
    }
}

/// Quantity whose drift triggered a [`StabilityWarning`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriftKind {
    /// Total population left its tolerance band around the initial value.
    Norm,
    /// Energy of a field-free run changed by more than its tolerance.
    Energy,
}

/// Record of a drift in a conserved quantity during propagation.
///
/// Repeated violations of the same kind are folded into a single record.
#[derive(Clone, Debug, PartialEq)]
pub struct StabilityWarning {
    /// Drifting quantity.
    pub kind: DriftKind,
    /// First step at which the tolerance was exceeded.
    pub first_step: usize,
    /// Last step at which the tolerance was exceeded.
    pub last_step: usize,
    /// Number of steps at which the tolerance was exceeded.
    pub count: usize,
    /// Largest absolute drift encountered.
    pub worst: f64,
}

impl StabilityWarning {
    pub(crate) fn new(kind: DriftKind, step: usize, drift: f64) -> Self {
        Self { kind, first_step: step, last_step: step, count: 1, worst: drift }
    }

    pub(crate) fn update(&mut self, step: usize, drift: f64) {
        self.last_step = step;
        self.count += 1;
        self.worst = self.worst.max(drift);
    }
}
