#![allow(dead_code, non_snake_case)]

//! Provides functions and higher-level constructs for the solution of the
//! one-dimensional time-dependent Schrödinger equation for a single electron
//! driven by an external electric field, with an eye toward high-harmonic
//! generation.
//!
//! Provides implementations for the following numerical routines:
//! - Time-dependent:
//!     - Crank-Nicolson propagation with a three-point Laplacian
//!     - Crank-Nicolson propagation with the Numerov[^1] fourth-order
//!       Laplacian
//!     - Dirichlet or absorbing-mask boundaries
//! - Time-independent:
//!     - Imaginary-time relaxation to the ground state
//! - Post-processing:
//!     - Population, position, energy, and dipole acceleration sequences
//!     - Fourier spectra of the field and dipole acceleration
//!
//! See [`docs`] for theoretical background.
//!
//! [^1]: B. Numerov, "Note on the numerical integration of d2x/dt2 = f(x,t)."
//! Astronomische Nachrichten **230** 19 (1927).

pub mod error;
pub mod grid;
pub mod target;
pub mod field;
pub mod tridiag;
pub mod scheme;
pub mod observables;
pub mod output;
pub mod spectrum;
pub mod propagate;
pub mod ground;
pub mod units;
pub mod utils;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        error::{ DriftKind, StabilityWarning, TdseError },
        field::Field,
        grid::Grid,
        ground::{ GroundParams, GroundState, ground_state },
        output::{ Outputs, PrintFlags },
        propagate::{ Inputs, Propagator, Stage, Tolerance, propagate },
        scheme::{ Boundary, Scheme },
        target::Target,
    };
}
