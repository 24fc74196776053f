use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tdse1d::{
    observables::{ expectation, population },
    prelude::*,
};

#[test]
fn soft_coulomb_ground_state() {
    let grid = Grid::linspace(-50.0, 50.0, 2001).unwrap();
    let target = Target::soft_coulomb(2.0);
    let guess: nd::Array1<C64>
        = grid.get_x().mapv(|x| C64::from((-x.abs()).exp()));
    for scheme in [Scheme::Standard, Scheme::Numerov] {
        let gs = ground_state(
            &grid, &target, scheme, &guess, GroundParams::default())
            .unwrap();
        assert_abs_diff_eq!(gs.energy, -0.5, epsilon = 1e-2);
        let dx = grid.get_dx();
        assert_abs_diff_eq!(population(&gs.psi, dx), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            expectation(&gs.psi, grid.get_x(), dx), 0.0, epsilon = 1e-8);
    }
}

#[test]
fn ground_state_is_stationary() {
    let grid = Grid::linspace(-30.0, 30.0, 601).unwrap();
    let target = Target::soft_coulomb(2.0);
    let guess: nd::Array1<C64>
        = grid.get_x().mapv(|x| C64::from((-x * x / 4.0).exp()));
    let params = GroundParams { epsilon: 1e-13, ..GroundParams::default() };
    let gs = ground_state(&grid, &target, Scheme::Numerov, &guess, params)
        .unwrap();
    let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 10.0, 201);
    let inputs = Inputs::new(grid, gs.psi.clone(), target, Field::zero(t).unwrap())
        .with_scheme(Scheme::Numerov)
        .with_print(PrintFlags { energy: true, pop_int: true, ..PrintFlags::none() });
    let out = propagate(&inputs).unwrap();
    assert!(out.warnings.is_empty());
    assert!(out.energy.iter().all(|e| (e - gs.energy).abs() < 1e-9));
    // only a global phase accumulates
    let overlap: C64
        = gs.psi.iter().zip(&out.psi_final)
        .map(|(a, b)| a.conj() * b)
        .sum::<C64>() * inputs.grid.get_dx();
    assert_abs_diff_eq!(overlap.norm(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out.pop_int[0], out.pop_int[200], epsilon = 1e-6);
}
