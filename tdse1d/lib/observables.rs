//! Read-only extraction of physical observables from a wavefunction.
//!
//! Integrals over the grid are evaluated as plain Riemann sums, which is exact
//! for the discrete norm conserved by the propagation schemes.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::SingularError,
    scheme::Scheme,
};

/// Compute the total population Σ |ψ|² δx.
pub fn population<S>(psi: &Arr1<S>, dx: f64) -> f64
where S: nd::Data<Elem = C64>
{
    psi.iter().map(|qk| qk.norm_sqr()).sum::<f64>() * dx
}

/// Compute the population within `|x| ≤ x_int`.
pub fn population_interior<S, T>(
    x: &Arr1<S>,
    psi: &Arr1<T>,
    dx: f64,
    x_int: f64,
) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    x.iter().zip(psi)
        .filter(|(xk, _)| xk.abs() <= x_int)
        .map(|(_, qk)| qk.norm_sqr())
        .sum::<f64>() * dx
}

/// Compute the expectation value Σ `obs` |ψ|² δx of a local one-body
/// observable.
///
/// The wavefunction is not renormalized.
pub fn expectation<S, T>(psi: &Arr1<S>, obs: &Arr1<T>, dx: f64) -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = f64>,
{
    psi.iter().zip(obs)
        .map(|(qk, ok)| ok * qk.norm_sqr())
        .sum::<f64>() * dx
}

/// Compute the dipole acceleration, i.e. the expectation value of the force
/// -(*V*'(*x*) + *E*) acting on the particle in a field *E*.
pub fn acceleration<S, T>(dv: &Arr1<S>, psi: &Arr1<T>, dx: f64, e: f64) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    -psi.iter().zip(dv)
        .map(|(qk, dvk)| (dvk + e) * qk.norm_sqr())
        .sum::<f64>() * dx
}

// apply the three-point Laplacian with zero amplitude outside the grid
fn laplacian<S>(dx: f64, psi: &Arr1<S>) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let n = psi.len();
    let ondx2 = dx.powi(2).recip();
    (0..n).map(|j| {
        let l = if j > 0 { psi[j - 1] } else { C64::from(0.0) };
        let u = if j + 1 < n { psi[j + 1] } else { C64::from(0.0) };
        (l - 2.0 * psi[j] + u) * ondx2
    })
    .collect()
}

// ⟨ψ|K + V|ψ⟩ / ⟨ψ|ψ⟩ given the action K ψ of the kinetic operator
fn energy_from_kinetic<S, T, U>(v: &Arr1<S>, psi: &Arr1<T>, kpsi: &Arr1<U>)
    -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
    U: nd::Data<Elem = C64>,
{
    let (num, den)
        = psi.iter().zip(kpsi).zip(v)
        .fold((0.0, 0.0), |(num, den), ((qk, kqk), vk)| {
            (
                num + (qk.conj() * kqk).re + vk * qk.norm_sqr(),
                den + qk.norm_sqr(),
            )
        });
    num / den
}

/// Compute the energy of the field-free Hamiltonian -Δ/2 + *V* using the
/// standard three-point Laplacian.
///
/// *Panics if `v` and `psi` have unequal lengths*.
pub fn energy<S, T>(dx: f64, v: &Arr1<S>, psi: &Arr1<T>) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    assert_eq!(v.len(), psi.len());
    let kpsi = laplacian(dx, psi).mapv(|lk| -0.5 * lk);
    energy_from_kinetic(v, psi, &kpsi)
}

/// Compute the energy of the field-free Hamiltonian -Δ/2 + *V* using the
/// Numerov approximation *M*⁻¹ Δ to the second derivative.
///
/// *Panics if `v` and `psi` have unequal lengths*.
pub fn energy_numerov<S, T>(dx: f64, v: &Arr1<S>, psi: &Arr1<T>)
    -> Result<f64, SingularError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    assert_eq!(v.len(), psi.len());
    let mut mass = Scheme::Numerov.mass(psi.len());
    let mut kpsi = laplacian(dx, psi).mapv(|lk| -0.5 * lk);
    mass.solve_mut(&mut kpsi)?;
    Ok(energy_from_kinetic(v, psi, &kpsi))
}

/// Compute the field-free energy consistent with a given scheme.
pub fn energy_scheme<S, T>(scheme: Scheme, dx: f64, v: &Arr1<S>, psi: &Arr1<T>)
    -> Result<f64, SingularError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    match scheme {
        Scheme::Standard => Ok(energy(dx, v, psi)),
        Scheme::Numerov => energy_numerov(dx, v, psi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    // harmonic oscillator ground state for ω = 1
    fn ho_ground(x: &nd::Array1<f64>) -> nd::Array1<C64> {
        x.mapv(|xk| C64::from(PI.powf(-0.25) * (-xk * xk / 2.0).exp()))
    }

    #[test]
    fn gaussian_moments() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-15.0, 15.0, 1501);
        let dx = x[1] - x[0];
        let psi = x.mapv(|xk| {
            C64::from(PI.powf(-0.25) * (-(xk - 1.5).powi(2) / 2.0).exp())
        });
        assert_abs_diff_eq!(population(&psi, dx), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(expectation(&psi, &x, dx), 1.5, epsilon = 1e-10);
        let inner = population_interior(&x, &psi, dx, 1.5);
        assert!(inner > 0.4 && inner < 0.6);
        assert_eq!(population_interior(&x, &psi, dx, 100.0), population(&psi, dx));
    }

    #[test]
    fn harmonic_energies() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-10.0, 10.0, 801);
        let dx = x[1] - x[0];
        let v = x.mapv(|xk| 0.5 * xk * xk);
        let psi = ho_ground(&x);
        assert_abs_diff_eq!(energy(dx, &v, &psi), 0.5, epsilon = 1e-4);
        let en = energy_numerov(dx, &v, &psi).unwrap();
        assert_abs_diff_eq!(en, 0.5, epsilon = 1e-7);
        assert_eq!(
            energy_scheme(Scheme::Standard, dx, &v, &psi).unwrap(),
            energy(dx, &v, &psi),
        );
    }

    #[test]
    fn acceleration_is_force() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-10.0, 10.0, 801);
        let dx = x[1] - x[0];
        let psi = ho_ground(&x).mapv(|qk| qk * 2.0_f64.sqrt());
        // symmetric density in a symmetric potential: only the field remains
        let dv = x.clone();
        let a = acceleration(&dv, &psi, dx, 0.25);
        assert_abs_diff_eq!(a, -0.5, epsilon = 1e-10);
    }
}
