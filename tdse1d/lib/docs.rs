//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Time stepping](#time-stepping)
//! - [Numerov](#numerov)
//! - [Boundaries](#boundaries)
//! - [Observables](#observables)
//! - [Imaginary time](#imaginary-time)
//!
//! # Background
//! This crate solves the time-dependent Schrödinger equation (TDSE) for a
//! single electron moving in one dimension under a static potential *V*(*x*)
//! and a spatially uniform, time-dependent electric field *E*(*t*). In the
//! length gauge and within the dipole approximation,
//! ```text
//!   ∂ψ        1 ∂²ψ
//! i -- = -  - --- + V(x) ψ + x E(t) ψ ≡ H(t) ψ
//!   ∂t        2 ∂x²
//! ```
//! with the sign of the coupling term fixed by the electron's negative charge.
//! The typical application is high-harmonic generation (HHG): a bound electron
//! is driven by an intense optical pulse, and the spectrum of its dipole
//! acceleration shows a plateau of odd harmonics of the driving frequency
//! extending up to a cutoff near *I*ₚ + 3.17 *U*ₚ.
//!
//! The wavefunction is sampled on a uniform grid,
//! ```text
//! x[j] = x₀ + j δx, j ∊ {0, ..., N - 1}
//! ψ[j] = ψ(x[j])
//! ```
//! and the field on a uniform time grid `t[k] = t₀ + k δt`.
//!
//! # Units
//! Everything is expressed in atomic units, where *ħ* = *m*ₑ = *e* = 4π*ε*₀ =
//! 1. The unit of length is the Bohr radius *a*₀ ≈ 0.0529 nm, the unit of
//! energy is the Hartree *E*ₕ ≈ 27.2 eV, and the unit of time is *ħ* / *E*ₕ ≈
//! 24.2 as. The atomic unit of electric field, *E*ₕ / *e* *a*₀ ≈ 5.14 × 10¹¹
//! V/m, corresponds to a peak intensity of about 3.51 × 10¹⁶ W/cm² for a
//! linearly polarized plane wave, so that
//! ```text
//! E₀ [a.u.] = √(I [W/cm²] / 3.51e16)
//! ```
//! A vacuum wavelength *λ* maps to an angular frequency *ω* = 2π *c* / *λ* with
//! *c* = 1/*α* ≈ 137.
//!
//! Items in [`units`][crate::units] are provided to handle the minutiae
//! associated with conversion to and from atomic units.
//!
//! # Time stepping
//! Writing the discretized Hamiltonian as a tridiagonal matrix *G*, a single
//! step from `t[k]` to `t[k + 1]` is taken with the Crank-Nicolson (or Cayley)
//! form of the propagator,
//! ```text
//!                  1 - i δt G / 2
//! ψ(t + δt) = ---------------- ψ(t)
//!                  1 + i δt G / 2
//! ```
//! which is second-order accurate in *δt* and exactly unitary whenever *G* is
//! Hermitian. The field in *G* is taken at the midpoint of the step, i.e. the
//! average of its two neighboring samples. In practice the step amounts to a
//! single tridiagonal solve,
//! ```text
//! (M + τ G) ψ(t + δt) = (M - τ G) ψ(t),  τ = i δt / 2
//! ```
//! where *M* is the identity for the standard scheme. The tridiagonal system is
//! solved by Gaussian elimination without pivoting (the Thomas algorithm) in
//! *O*(*N*) operations. For the standard scheme,
//! ```text
//!                1
//! G = -(1/2) ---- (I{-1} - 2 I{0} + I{+1}) + W
//!              δx²
//! W[j, j] = V(x[j]) + x[j] E
//! ```
//! where *I*{*k*} is the *N*×*N* matrix with elements equal to 1 on the *k*-th
//! diagonal and 0 elsewhere. The three-point Laplacian carries an *O*(*δx*²)
//! error.
//!
//! # Numerov
//! Numerov's method[^1] replaces the three-point Laplacian with the implicit
//! relation
//! ```text
//! (I{-1} - 2 I{0} + I{+1}) ψ = δx² B ψ'' + O(δx⁶)
//! B = (I{-1} + 10 I{0} + I{+1}) / 12
//! ```
//! which, following the matrix formulation of Pillai *et al.*[^2], allows the
//! kinetic operator to be written as -(1/2) inv(*B*) *A* with *A* the plain
//! three-point difference matrix divided by *δx*². Multiplying the TDSE through
//! by *B* keeps every operator tridiagonal: the time step uses *M* = *B* and
//! ```text
//! G = -(1/2) A + B W
//! ```
//! so that the spatial truncation error drops to *O*(*δx*⁴) at no extra cost
//! per step. Both schemes share the same Cayley form, and because *B* commutes
//! with *A* on a truncated grid, the Numerov step is also exactly unitary in the
//! absence of a field.
//!
//! Energies are computed consistently with the scheme in use: the standard
//! scheme applies the three-point kinetic operator directly, while the Numerov
//! scheme first solves *B* *y* = -(1/2) *A* ψ for the kinetic term.
//!
//! # Boundaries
//! The grid is truncated with zero-Dirichlet conditions: matrix entries
//! coupling to points beyond the ends of the grid are dropped. This reflects
//! any flux reaching the edges back into the interior, which spoils spectra
//! once ionized population returns with unphysical momenta. An absorbing
//! layer can be placed at each edge instead, over which the wavefunction is
//! multiplied after every step by
//! ```text
//! m(x) = |cos(π d(x) / 2 w)|^(1/8)
//! ```
//! where *w* is the thickness of the layer and *d*(*x*) is the depth of *x*
//! into it. The small exponent makes the mask gentle enough that little of the
//! outgoing wave is reflected by the mask itself.
//!
//! # Observables
//! Integrals are evaluated as plain Riemann sums over the grid, which is
//! exactly the norm conserved by the time stepping. The HHG source term is the
//! dipole acceleration given by the Ehrenfest theorem,
//! ```text
//! d²⟨x⟩
//! ----- = -⟨V'(x)⟩ - E(t)
//!  dt²
//! ```
//! whose squared Fourier transform is proportional to the emitted harmonic
//! spectrum. Fourier transforms are approximated as
//! ```text
//! F[f](ν) ≈ δt Σₖ f(t[k]) e^(-2πi ν k δt)
//! ```
//! on the frequency grid *ν* = *n* / (*N* *δt*), computed by FFT.
//!
//! # Imaginary time
//! Replacing *δt* → -*i* *δτ* turns the Cayley step into a damped diffusion
//! step, *τ* = *δτ* / 2. Each component of ψ along an eigenstate of energy
//! *E*ₙ is scaled by (1 - *τ* *E*ₙ) / (1 + *τ* *E*ₙ), so after renormalization
//! the excited components decay relative to the ground state. Iterating until
//! the energy settles yields the ground state consistent with the chosen
//! spatial scheme, which makes it a good initial state for real-time runs on
//! the same grid.
//!
//! [^1]: B. Numerov, "Note on the numerical integration of d2x/dt2 = f(x,t)."
//! Astronomische Nachrichten **230** 19 (1927).
//!
//! [^2]: M. Pillai, J. Goglio, and T. Walker, "Matrix Numerov method for
//! solving Schrödinger's equation." American Journal of Physics **80** 11
//! 1017-1019 (2012).
