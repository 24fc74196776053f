use std::time::Instant;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tdse1d::{
    ground::ground_state,
    propagate::Propagator,
    units::AU,
    utils::fft_shift,
};
use lib::{ RunConfig, mkdir, write_npz };

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp_secs()
        .init();

    let config = RunConfig::from_args_or(RunConfig::default())?;
    let grid = config.grid.build()?;
    let x = grid.get_x().clone();
    let dx = grid.get_dx();

    let now = Instant::now();
    let guess: nd::Array1<C64> = x.mapv(|xk| C64::from((-xk.abs()).exp()));
    let gs
        = ground_state(
            &grid, &config.target, config.scheme, &guess, config.ground)?;
    log::info!(
        "ground state energy {:.8} Eh ({:.4} eV) after {} iterations",
        gs.energy, AU.from_au_energy::<f64, f64>(gs.energy), gs.iterations,
    );

    let field = config.field()?;
    let omega = config.pulse.omega();
    let up = config.pulse.amplitude().powi(2) / (4.0 * omega.powi(2));
    log::info!(
        "pulse: E0 = {:.4} a.u., ω = {:.4} a.u., {} steps of {:.4} a.u.; \
        expected cutoff at harmonic {:.1}",
        config.pulse.amplitude(), omega, field.len() - 1, field.dt(),
        (-gs.energy + 3.17 * up) / omega,
    );

    let inputs = config.inputs(grid, gs.psi.clone(), field);
    let mut prop = Propagator::new(&inputs)?;
    let report = (prop.num_steps() / 10).max(1);
    while prop.step()? {
        if prop.step_index() % report == 0 {
            log::debug!(
                "step {}/{} (t = {:.2} a.u.)",
                prop.step_index(), prop.num_steps(), prop.time(),
            );
        }
    }
    let out = prop.finalize();
    log::info!(
        "propagated {} steps in {:.2} s",
        out.steps, now.elapsed().as_secs_f64(),
    );
    for warning in out.warnings.iter() {
        log::warn!("{:?}", warning);
    }

    // harmonic order of each frequency
    let order: nd::Array1<f64>
        = out.freq.mapv(|nu| 2.0 * std::f64::consts::PI * nu / omega);
    // same, ordered from the most negative frequency for plotting
    let order_sh = fft_shift(&order);
    let f_source_m2_sh = fft_shift(&out.f_source_m2);

    mkdir(&config.outdir)?;
    write_npz!(
        config.outdir.join("hhg.npz"),
        arrays: {
            "x" => &x,
            "dx" => &nd::array![dx],
            "psi0" => &gs.psi,
            "e0" => &nd::array![gs.energy],
            "t" => &out.tgrid,
            "efield" => &out.efield,
            "source" => &out.source,
            "pop_tot" => &out.pop_tot,
            "pop_int" => &out.pop_int,
            "expval_x" => &out.expval_x,
            "energy" => &out.energy,
            "freq" => &out.freq,
            "order" => &order,
            "f_efield" => &out.f_efield,
            "f_efield_m2" => &out.f_efield_m2,
            "f_source" => &out.f_source,
            "f_source_m2" => &out.f_source_m2,
            "order_sh" => &order_sh,
            "f_source_m2_sh" => &f_source_m2_sh,
            "psi" => &out.psi_final,
        }
    )?;
    Ok(())
}
