use ndarray as nd;
use num_complex::Complex64 as C64;
use tdse1d::{
    output::PrintFlags,
    propagate::propagate,
    scheme::{ Boundary, Scheme },
    target::Target,
    utils::wf_normalized,
};
use lib::{ GridConfig, Pulse, RunConfig, mkdir, write_npz };

const X0: f64 = -10.0; // initial packet center; a.u.
const SIGMA: f64 = 1.0; // initial packet width; a.u.
const K0: f64 = 1.5; // initial packet momentum; a.u.

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let default = RunConfig {
        grid: GridConfig { half_width: 40.0, points: 1601 },
        target: Target::Free,
        scheme: Scheme::Standard,
        boundary: Boundary::Mask { width: 10.0, exponent: 0.125 },
        // no field; the pulse only sets the duration
        pulse: Pulse { intensity: 0.0, cycles: 1.0, ..Pulse::default() },
        per_cycle: 5000,
        print: PrintFlags {
            tgrid: true,
            pop_tot: true,
            pop_int: true,
            expval_x: true,
            energy: true,
            ..PrintFlags::none()
        },
        ..RunConfig::default()
    };
    let config = RunConfig::from_args_or(default)?;
    let grid = config.grid.build()?;
    let x = grid.get_x().clone();
    let psi0: nd::Array1<C64>
        = wf_normalized(
            &x.mapv(|xk| {
                C64::from_polar(
                    (-(xk - X0).powi(2) / (4.0 * SIGMA.powi(2))).exp(),
                    K0 * xk,
                )
            }),
            grid.get_dx(),
        );

    let field = config.field()?;
    let inputs = config.inputs(grid, psi0.clone(), field);
    let out = propagate(&inputs)?;
    let ends = |seq: &nd::Array1<f64>| {
        (seq.iter().next().copied(), seq.iter().next_back().copied())
    };
    if let ((Some(p0), Some(p1)), (Some(x0), Some(x1)))
        = (ends(&out.pop_tot), ends(&out.expval_x))
    {
        log::info!(
            "{} steps: population {:.6} -> {:.6}, <x> {:.3} -> {:.3}",
            out.steps, p0, p1, x0, x1,
        );
    }
    for warning in out.warnings.iter() {
        log::warn!("{:?}", warning);
    }

    mkdir(&config.outdir)?;
    write_npz!(
        config.outdir.join("wavepacket.npz"),
        arrays: {
            "x" => &x,
            "psi0" => &psi0,
            "t" => &out.tgrid,
            "pop_tot" => &out.pop_tot,
            "pop_int" => &out.pop_int,
            "expval_x" => &out.expval_x,
            "energy" => &out.energy,
            "psi" => &out.psi_final,
        }
    )?;
    Ok(())
}
