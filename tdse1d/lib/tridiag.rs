//! Complex-valued tridiagonal matrices and their direct solution via the
//! Thomas algorithm.
//!
//! A matrix of size *N* is stored as three length-*N* arrays:
//! ```text
//! | d[0] u[0]                     |
//! | l[1] d[1] u[1]                |
//! |      l[2] d[2] u[2]           |
//! |           ...  ...  ...       |
//! |                l[N-1] d[N-1]  |
//! ```
//! where `l[0]` and `u[N - 1]` are unused and kept at zero.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    Arr1,
    error::{ LengthError, SingularError },
};

/// A square tridiagonal matrix with complex entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Tridiag {
    lower: nd::Array1<C64>,
    diag: nd::Array1<C64>,
    upper: nd::Array1<C64>,
}

impl Tridiag {
    /// Create a new `n × n` matrix with all entries zero.
    pub fn zeros(n: usize) -> Self {
        Self {
            lower: nd::Array1::zeros(n),
            diag: nd::Array1::zeros(n),
            upper: nd::Array1::zeros(n),
        }
    }

    /// Create a new matrix from its three diagonals, each of length `n`.
    ///
    /// The first element of `lower` and the last element of `upper` are
    /// discarded.
    pub fn from_diagonals(
        mut lower: nd::Array1<C64>,
        diag: nd::Array1<C64>,
        mut upper: nd::Array1<C64>,
    ) -> Result<Self, LengthError>
    {
        LengthError::check(&lower, &diag)?;
        LengthError::check(&upper, &diag)?;
        let n = diag.len();
        if n > 0 {
            lower[0] = C64::zero();
            upper[n - 1] = C64::zero();
        }
        Ok(Self { lower, diag, upper })
    }

    /// Return the dimension of the matrix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.diag.len() }

    /// Get a reference to the sub-diagonal.
    pub fn lower(&self) -> &nd::Array1<C64> { &self.lower }

    /// Get a reference to the main diagonal.
    pub fn diag(&self) -> &nd::Array1<C64> { &self.diag }

    /// Get a reference to the super-diagonal.
    pub fn upper(&self) -> &nd::Array1<C64> { &self.upper }

    /// Return the `(lower, diag, upper)` entries of the `j`-th row.
    ///
    /// *Panics if `j` is out of bounds*.
    pub fn row(&self, j: usize) -> (C64, C64, C64) {
        (self.lower[j], self.diag[j], self.upper[j])
    }

    /// Overwrite the `j`-th row.
    ///
    /// Entries falling outside the matrix are ignored.
    ///
    /// *Panics if `j` is out of bounds*.
    pub fn set_row(&mut self, j: usize, row: (C64, C64, C64)) {
        let n = self.len();
        self.lower[j] = if j == 0 { C64::zero() } else { row.0 };
        self.diag[j] = row.1;
        self.upper[j] = if j + 1 == n { C64::zero() } else { row.2 };
    }

    /// Compute the matrix-vector product `self · v`.
    ///
    /// *Panics if `v` does not have length equal to the dimension of the
    /// matrix*.
    pub fn apply<S>(&self, v: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        let mut out: nd::Array1<C64> = nd::Array1::zeros(self.len());
        self.apply_into(v, &mut out);
        out
    }

    /// Like [`Self::apply`], but write the result into a pre-allocated buffer.
    ///
    /// *Panics if `v` or `out` does not have length equal to the dimension of
    /// the matrix*.
    pub fn apply_into<S, T>(&self, v: &Arr1<S>, out: &mut Arr1<T>)
    where
        S: nd::Data<Elem = C64>,
        T: nd::DataMut<Elem = C64>,
    {
        let n = self.len();
        assert_eq!(v.len(), n);
        assert_eq!(out.len(), n);
        for j in 0..n {
            let mut acc = self.diag[j] * v[j];
            if j > 0 { acc += self.lower[j] * v[j - 1]; }
            if j + 1 < n { acc += self.upper[j] * v[j + 1]; }
            out[j] = acc;
        }
    }

    /// Solve `self · x = rhs` in place via forward elimination and back
    /// substitution.
    ///
    /// On success, `rhs` holds the solution and the super-diagonal of `self`
    /// holds the modified coefficients of the elimination, so the matrix must
    /// be rebuilt before being used again. No pivoting is performed; a
    /// pivot that is non-finite, zero, or cancelled down to rounding level
    /// (|m| ≤ ε (|m| + |l u′|)) aborts the solve with a [`SingularError`].
    ///
    /// *Panics if `rhs` does not have length equal to the dimension of the
    /// matrix*.
    pub fn solve_mut<S>(&mut self, rhs: &mut Arr1<S>)
        -> Result<(), SingularError>
    where S: nd::DataMut<Elem = C64>
    {
        let n = self.len();
        assert_eq!(rhs.len(), n);
        if n == 0 { return Ok(()); }

        let mut m = check_pivot(0, self.diag[0], 0.0)?;
        self.upper[0] /= m;
        rhs[0] /= m;
        for i in 1..n {
            let elim = self.lower[i] * self.upper[i - 1];
            m = check_pivot(i, self.diag[i] - elim, elim.norm())?;
            let r = rhs[i] - self.lower[i] * rhs[i - 1];
            if i + 1 < n { self.upper[i] /= m; }
            rhs[i] = r / m;
        }
        for i in (0..n - 1).rev() {
            let next = rhs[i + 1];
            rhs[i] -= self.upper[i] * next;
        }
        Ok(())
    }

    /// Solve `self · x = rhs`, returning `x` and leaving `self` untouched.
    ///
    /// *Panics if `rhs` does not have length equal to the dimension of the
    /// matrix*.
    pub fn solve<S>(&self, rhs: &Arr1<S>) -> Result<nd::Array1<C64>, SingularError>
    where S: nd::Data<Elem = C64>
    {
        let mut work = self.clone();
        let mut x = rhs.to_owned();
        work.solve_mut(&mut x)?;
        Ok(x)
    }
}

// accept a pivot only if it is finite and not lost in rounding relative to the
// quantities it was computed from
fn check_pivot(index: usize, m: C64, elim: f64)
    -> Result<C64, SingularError>
{
    let mag = m.norm();
    let scale = (m.norm() + elim) * f64::EPSILON;
    if !mag.is_finite() || mag == 0.0 || mag <= scale {
        Err(SingularError { index, pivot: mag })
    } else {
        Ok(m)
    }
}
