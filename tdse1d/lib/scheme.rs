//! Construction of the tridiagonal systems solved at each time step.
//!
//! Both spatial discretizations are written as a generalized Cayley step
//! ```text
//! (M + τ G) ψ(t + dt) = (M - τ G) ψ(t)
//! ```
//! with *τ* = *i* *dt*/2 for real-time and *τ* = *dt*/2 for imaginary-time
//! propagation, where *G* = -Δ/2 + *M* *W* for a local potential *W*. The
//! standard scheme takes *M* = *I*; the Numerov scheme takes the three-point
//! weighting *M* = (1, 10, 1)/12, which makes *M*⁻¹ Δ a fourth-order accurate
//! approximation to the second derivative. See [`docs`][crate::docs#numerov]
//! for details.
//!
//! Points outside the grid are taken to have zero amplitude, so stencil entries
//! reaching past either end of the grid are dropped.

use std::f64::consts::FRAC_PI_2;
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use crate::{
    Arr1,
    grid::Grid,
    tridiag::Tridiag,
};

/// Spatial discretization scheme, fixed for the duration of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Second-order central differences.
    #[default]
    Standard,
    /// Fourth-order Numerov stencil.
    Numerov,
}

impl Scheme {
    /// Return `true` if `self` is `Standard`.
    pub fn is_standard(&self) -> bool { matches!(self, Self::Standard) }

    /// Return `true` if `self` is `Numerov`.
    pub fn is_numerov(&self) -> bool { matches!(self, Self::Numerov) }

    /// Return the `(lower, diag, upper)` entries of the `j`-th row of the
    /// weighting matrix *M* for a grid of `n` points.
    pub fn mass_row(self, j: usize, n: usize) -> (f64, f64, f64) {
        let (l, d, u)
            = match self {
                Self::Standard => (0.0, 1.0, 0.0),
                Self::Numerov => (1.0 / 12.0, 10.0 / 12.0, 1.0 / 12.0),
            };
        truncate(j, n, (l, d, u))
    }

    /// Return the `(lower, diag, upper)` entries of the `j`-th row of the
    /// operator *G* = -Δ/2 + *M* *W*.
    ///
    /// *Panics if `j` is out of bounds*.
    pub fn hamiltonian_row<S>(self, dx: f64, w: &Arr1<S>, j: usize)
        -> (f64, f64, f64)
    where S: nd::Data<Elem = f64>
    {
        let n = w.len();
        let kin = 0.5 * dx.powi(2).recip();
        let (ml, md, mu) = self.mass_row(j, n);
        let wl = if j > 0 { w[j - 1] } else { 0.0 };
        let wu = if j + 1 < n { w[j + 1] } else { 0.0 };
        let row = (
            -kin + ml * wl,
            2.0 * kin + md * w[j],
            -kin + mu * wu,
        );
        truncate(j, n, row)
    }

    /// Construct the full weighting matrix *M* for a grid of `n` points.
    pub fn mass(self, n: usize) -> Tridiag {
        let mut m = Tridiag::zeros(n);
        for j in 0..n {
            m.set_row(j, to_complex(self.mass_row(j, n)));
        }
        m
    }

    /// Construct the full operator *G* = -Δ/2 + *M* *W*.
    pub fn hamiltonian<S>(self, dx: f64, w: &Arr1<S>) -> Tridiag
    where S: nd::Data<Elem = f64>
    {
        let n = w.len();
        let mut g = Tridiag::zeros(n);
        for j in 0..n {
            g.set_row(j, to_complex(self.hamiltonian_row(dx, w, j)));
        }
        g
    }
}

fn truncate(j: usize, n: usize, row: (f64, f64, f64)) -> (f64, f64, f64) {
    (
        if j == 0 { 0.0 } else { row.0 },
        row.1,
        if j + 1 >= n { 0.0 } else { row.2 },
    )
}

fn to_complex(row: (f64, f64, f64)) -> (C64, C64, C64) {
    (row.0.into(), row.1.into(), row.2.into())
}

/// Fill `lhs` with *M* + *τ* *G* and `rhs` with (*M* - *τ* *G*) `psi` for a
/// single step under the local potential `w`.
///
/// *Panics if `w`, `psi`, `lhs`, and `rhs` do not all have the same length*.
pub fn build_step<S, T, U>(
    scheme: Scheme,
    dx: f64,
    w: &Arr1<S>,
    tau: C64,
    psi: &Arr1<T>,
    lhs: &mut Tridiag,
    rhs: &mut Arr1<U>,
)
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
    U: nd::DataMut<Elem = C64>,
{
    let n = w.len();
    assert_eq!(psi.len(), n);
    assert_eq!(lhs.len(), n);
    assert_eq!(rhs.len(), n);
    for j in 0..n {
        let (ml, md, mu) = scheme.mass_row(j, n);
        let (gl, gd, gu) = scheme.hamiltonian_row(dx, w, j);
        lhs.set_row(j, (ml + tau * gl, md + tau * gd, mu + tau * gu));
        let mut r = (md - tau * gd) * psi[j];
        if j > 0 { r += (ml - tau * gl) * psi[j - 1]; }
        if j + 1 < n { r += (mu - tau * gu) * psi[j + 1]; }
        rhs[j] = r;
    }
}

/// Write the local potential `v + x e` into `w`.
pub(crate) fn local_potential<S, T, U>(
    x: &Arr1<S>,
    v: &Arr1<T>,
    e: f64,
    w: &mut Arr1<U>,
)
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
    U: nd::DataMut<Elem = f64>,
{
    nd::Zip::from(w).and(x).and(v)
        .for_each(|wj, xj, vj| { *wj = vj + xj * e; });
}

fn default_mask_exponent() -> f64 { 0.125 }

/// Treatment of the wavefunction near the edges of the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boundary {
    /// Amplitude vanishes outside the grid; outgoing flux is reflected.
    #[default]
    Dirichlet,
    /// Dirichlet truncation plus a `cos^exponent` mask applied after each
    /// real-time step over a layer of thickness `width` at each edge, absorbing
    /// outgoing flux.
    Mask {
        /// Thickness of each absorbing layer (a.u.).
        width: f64,
        /// Mask exponent (default: `1/8`).
        #[serde(default = "default_mask_exponent")]
        exponent: f64,
    },
}

impl Boundary {
    /// Return `true` if `self` removes population at the grid edges.
    pub fn is_absorbing(&self) -> bool { matches!(self, Self::Mask { .. }) }

    /// Return the pointwise mask for this boundary over a grid, or `None` for
    /// `Dirichlet` or an empty grid.
    pub fn mask(&self, grid: &Grid) -> Option<nd::Array1<f64>> {
        match *self {
            Self::Dirichlet => None,
            Self::Mask { width, exponent } => {
                let (x0, x1) = grid.bounds()?;
                let mask
                    = grid.get_x().mapv(|xj| {
                        let depth
                            = (xj - (x1 - width))
                            .max((x0 + width) - xj)
                            .max(0.0);
                        (FRAC_PI_2 * depth / width).cos().abs().powf(exponent)
                    });
                Some(mask)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> C64 { C64::new(re, 0.0) }

    #[test]
    fn standard_rows() {
        let dx = 0.5;
        let w = nd::array![1.0, 2.0, 3.0, 4.0];
        let g = Scheme::Standard.hamiltonian(dx, &w);
        assert_eq!(g.row(0), (c(0.0), c(4.0 + 1.0), c(-2.0)));
        assert_eq!(g.row(2), (c(-2.0), c(4.0 + 3.0), c(-2.0)));
        assert_eq!(g.row(3), (c(-2.0), c(4.0 + 4.0), c(0.0)));
        let m = Scheme::Standard.mass(4);
        assert_eq!(m.row(1), (c(0.0), c(1.0), c(0.0)));
    }

    #[test]
    fn numerov_rows() {
        let dx = 1.0;
        let w = nd::array![12.0, 24.0, 36.0];
        let g = Scheme::Numerov.hamiltonian(dx, &w);
        let (l, d, u) = g.row(1);
        assert!((l - c(-0.5 + 1.0)).norm() < 1e-14);
        assert!((d - c(1.0 + 20.0)).norm() < 1e-14);
        assert!((u - c(-0.5 + 3.0)).norm() < 1e-14);
        assert_eq!(g.row(0).0, c(0.0));
        assert_eq!(g.row(2).2, c(0.0));
    }

    // the Numerov operator M⁻¹ Δ / 2 must reproduce the second derivative of
    // a smooth function to fourth order
    #[test]
    fn numerov_kinetic_order() {
        let err = |n: usize| {
            let x: nd::Array1<f64> = nd::Array1::linspace(-8.0, 8.0, n);
            let dx = x[1] - x[0];
            let f: nd::Array1<C64> = x.mapv(|xk| c((-xk * xk).exp()));
            let d2: nd::Array1<f64>
                = x.mapv(|xk| (4.0 * xk * xk - 2.0) * (-xk * xk).exp());
            let w: nd::Array1<f64> = nd::Array1::zeros(n);
            let g = Scheme::Numerov.hamiltonian(dx, &w);
            let m = Scheme::Numerov.mass(n);
            let lap = m.solve(&g.apply(&f)).unwrap();
            lap.iter().zip(&d2)
                .map(|(lk, dk)| (-2.0 * lk.re - dk).abs())
                .fold(0.0, f64::max)
        };
        let ratio = err(201) / err(401);
        assert!(ratio > 14.0, "convergence ratio {ratio}");
    }

    #[test]
    fn cayley_step_identity_at_zero_tau() {
        let w = nd::array![0.3, -0.2, 0.1, 0.0, 0.5];
        let psi: nd::Array1<C64>
            = nd::array![c(0.1), c(0.5), c(1.0), c(0.5), c(0.1)];
        let mut lhs = Tridiag::zeros(5);
        let mut rhs: nd::Array1<C64> = nd::Array1::zeros(5);
        for scheme in [Scheme::Standard, Scheme::Numerov] {
            build_step(scheme, 0.1, &w, C64::new(0.0, 0.0), &psi,
                &mut lhs, &mut rhs);
            lhs.solve_mut(&mut rhs).unwrap();
            let err = rhs.iter().zip(&psi)
                .map(|(a, b)| (a - b).norm())
                .fold(0.0, f64::max);
            assert!(err < 1e-14);
        }
    }

    #[test]
    fn mask_profile() {
        let grid = Grid::linspace(-10.0, 10.0, 201).unwrap();
        assert!(Boundary::Dirichlet.mask(&grid).is_none());
        let mask
            = Boundary::Mask { width: 2.0, exponent: 0.125 }
            .mask(&grid)
            .unwrap();
        assert_eq!(mask[100], 1.0);
        assert_eq!(mask[20], 1.0);
        assert!(mask[0] < 0.01);
        assert!(mask[200] < 0.01);
        assert!(mask[5] > mask[0] && mask[5] < 1.0);
    }
}
