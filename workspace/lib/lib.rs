#![allow(dead_code, non_snake_case)]

//! Shared setup for the binaries in this package: run configuration, laser
//! pulses, and output files.

use std::{
    f64::consts::PI,
    fs,
    path::{ Path, PathBuf },
};
use anyhow::Context;
use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Deserialize;
use tdse1d::{
    field::Field,
    grid::Grid,
    ground::GroundParams,
    output::PrintFlags,
    propagate::{ DEF_X_INT, Inputs, Tolerance },
    scheme::{ Boundary, Scheme },
    target::Target,
    units::AU,
};

/// Create a directory and all of its parents if it doesn't already exist.
pub fn mkdir<P>(path: P) -> anyhow::Result<()>
where P: AsRef<Path>
{
    let path = path.as_ref();
    fs::create_dir_all(path)
        .with_context(|| format!("couldn't create {}", path.display()))
}

/// Write a series of named arrays to a `.npz` file.
///
/// ```ignore
/// write_npz!(
///     outdir.join("run.npz"),
///     arrays: {
///         "t" => &t,
///         "psi" => &psi,
///     }
/// )?;
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),* $(,)? } $(,)?
    ) => {
        {
            let path = ::std::path::PathBuf::from($path);
            (|| -> ::anyhow::Result<()> {
                let file = ::std::fs::File::create(&path)?;
                let mut npz = ::ndarray_npy::NpzWriter::new(file);
                $( npz.add_array($name, $arr)?; )*
                npz.finish()?;
                Ok(())
            })()
            .map_err(|err| {
                err.context(format!("couldn't write {}", path.display()))
            })
        }
    }
}

/// Spatial grid parameters.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Half-width of the box (a.u.).
    pub half_width: f64,
    /// Number of points.
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self { Self { half_width: 100.0, points: 2001 } }
}

impl GridConfig {
    pub fn build(&self) -> anyhow::Result<Grid> {
        Ok(Grid::linspace(-self.half_width, self.half_width, self.points)?)
    }
}

/// A linearly polarized pulse with a sin² envelope.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Pulse {
    /// Peak intensity (W/cm²).
    pub intensity: f64,
    /// Central wavelength (nm).
    pub wavelength: f64,
    /// Total duration in optical cycles.
    pub cycles: f64,
    /// Carrier-envelope phase (rad).
    pub cep: f64,
}

impl Default for Pulse {
    fn default() -> Self {
        Self { intensity: 1e14, wavelength: 800.0, cycles: 4.0, cep: 0.0 }
    }
}

impl Pulse {
    /// Carrier angular frequency (a.u.).
    pub fn omega(&self) -> f64 { AU.wavelength_to_omega(self.wavelength) }

    /// Peak field amplitude (a.u.).
    pub fn amplitude(&self) -> f64 { AU.intensity_to_field(self.intensity) }

    /// Total duration (a.u.).
    pub fn duration(&self) -> f64 { 2.0 * PI * self.cycles / self.omega() }

    /// Evaluate the field at time `t` (a.u.); zero outside the pulse.
    pub fn at(&self, t: f64) -> f64 {
        let T = self.duration();
        if !(0.0..=T).contains(&t) { return 0.0; }
        self.amplitude()
            * (PI * t / T).sin().powi(2)
            * (self.omega() * (t - T / 2.0) + self.cep).cos()
    }

    /// Sample the pulse over its whole duration with at least `per_cycle`
    /// steps per optical cycle.
    pub fn sample(&self, per_cycle: usize) -> anyhow::Result<Field> {
        let steps = (self.cycles * per_cycle as f64).ceil() as usize;
        anyhow::ensure!(steps >= 1, "pulse must last at least one time step");
        let t: nd::Array1<f64>
            = nd::Array1::linspace(0.0, self.duration(), steps + 1);
        Ok(Field::from_fn(t, |tk| self.at(tk))?)
    }
}

/// Complete configuration of a run, read from a TOML file.
///
/// Every table and key is optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub grid: GridConfig,
    pub target: Target,
    pub scheme: Scheme,
    pub boundary: Boundary,
    pub pulse: Pulse,
    /// Time steps per optical cycle.
    pub per_cycle: usize,
    /// Sub-steps inserted between field samples.
    pub refine: usize,
    pub x_int: f64,
    pub ground: GroundParams,
    pub print: PrintFlags,
    pub tolerance: Tolerance,
    /// Output directory.
    pub outdir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            target: Target::soft_coulomb(2.0),
            scheme: Scheme::Numerov,
            boundary: Boundary::Mask { width: 20.0, exponent: 0.125 },
            pulse: Pulse::default(),
            per_cycle: 2000,
            refine: 1,
            x_int: DEF_X_INT,
            ground: GroundParams::default(),
            print: PrintFlags::all(),
            tolerance: Tolerance::default(),
            outdir: PathBuf::from("output"),
        }
    }
}

impl RunConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a configuration from a TOML file.
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("couldn't read {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("couldn't parse {}", path.display()))
    }

    /// Read a configuration from the file named by the first command-line
    /// argument, or fall back to `default` if none was given.
    pub fn from_args_or(default: Self) -> anyhow::Result<Self> {
        match std::env::args().nth(1) {
            Some(path) => {
                log::info!("reading configuration from {path}");
                Self::load(path)
            },
            None => Ok(default),
        }
    }

    /// Sample the configured pulse.
    pub fn field(&self) -> anyhow::Result<Field> {
        let field = self.pulse.sample(self.per_cycle)?;
        if self.refine > 1 {
            Ok(field.refined(self.refine)?)
        } else {
            Ok(field)
        }
    }

    /// Assemble propagation inputs for a given grid, initial state, and field.
    pub fn inputs(&self, grid: Grid, psi0: nd::Array1<C64>, field: Field)
        -> Inputs
    {
        Inputs::new(grid, psi0, self.target.clone(), field)
            .with_scheme(self.scheme)
            .with_boundary(self.boundary)
            .with_x_int(self.x_int)
            .with_print(self.print)
            .with_tolerance(self.tolerance)
    }
}
