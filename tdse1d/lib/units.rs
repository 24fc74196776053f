#![allow(non_upper_case_globals)]

//! Convenience functions and constructs to handle minutiae associated with
//! conversion to and from atomic units.
//!
//! Concrete physical constants are taken from NIST.
//!
//! ```
//! use tdse1d::units::AU;
//!
//! // 800 nm light at 10¹⁴ W/cm²
//! let omega = AU.wavelength_to_omega(800.0);
//! let e0 = AU.intensity_to_field(1e14);
//! assert!((omega - 0.05695).abs() < 1e-4);
//! assert!((e0 - 0.05338).abs() < 1e-4);
//! ```

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// electric permittivity in vacuum (F m^-1)
pub const e0: f64 = 8.8541878128e-12;
//              +/- 0.0000000013e-12

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// electron mass (kg)
pub const me: f64 = 9.1093837015e-31;
//              +/- 0.0000000028e-31

/// Rydberg constant for an infinite-mass nucleus (m^-1)
pub const Rinf: f64 = 10973731.568160;
//                       +/- 0.000021

/// fine structure constant
pub const alpha: f64 = 7.2973525693e-3;
//                 +/- 0.0000000011e-3

/// Bohr radius (m)
pub const a0: f64 = 5.29177210903e-11;
//              +/- 0.00000000080e-11

/// Hartree energy (J) = 2\*Rinf\*h\*c
pub const Eh: f64 = 4.3597447222071e-18;
//              +/- 0.0000000000085e-18

/// Atomic unit of time (s) = ħ/Eh
pub const t_au: f64 = hbar / Eh;

/// Atomic unit of electric field (V m^-1) = Eh/(e a0)
pub const E_au: f64 = Eh / e / a0;

/// Intensity of a linearly polarized plane wave with peak field equal to one
/// atomic unit (W cm^-2) = ε0 c E_au^2 / 2
pub const I_au: f64 = 0.5 * e0 * c * E_au * E_au * 1e-4;

/// Hartree energy (eV)
pub const Eh_eV: f64 = Eh / e;

/// Scaling factors between atomic units and a set of laboratory units.
///
/// Conversion methods take and return quantities in the laboratory units named
/// in their documentation, and are generic over anything that can be scaled by
/// an `f64`, such as arrays.
///
/// See [`docs/units`][crate::docs#units] for more information.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtomicUnits {
    /// Length unit (nm).
    pub a: f64,
    /// Energy unit (eV).
    pub e: f64,
    /// Time unit (fs).
    pub t: f64,
    /// Field unit (V m^-1).
    pub f: f64,
    /// Intensity unit (W cm^-2).
    pub i: f64,
}

/// Atomic units in nanometers, electronvolts, femtoseconds, V/m, and W/cm².
pub const AU: AtomicUnits = AtomicUnits {
    a: a0 * 1e9,
    e: Eh_eV,
    t: t_au * 1e15,
    f: E_au,
    i: I_au,
};

impl Default for AtomicUnits {
    fn default() -> Self { AU }
}

impl AtomicUnits {
    /// Convert a length in nanometers to atomic units.
    pub fn to_au_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a.recip()
    }

    /// Convert a length in atomic units to nanometers.
    pub fn from_au_length<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.a
    }

    /// Convert an energy in electronvolts to Hartree.
    pub fn to_au_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e.recip()
    }

    /// Convert an energy in Hartree to electronvolts.
    pub fn from_au_energy<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.e
    }

    /// Convert a time in femtoseconds to atomic units.
    pub fn to_au_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t.recip()
    }

    /// Convert a time in atomic units to femtoseconds.
    pub fn from_au_time<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.t
    }

    /// Convert a field amplitude in V/m to atomic units.
    pub fn to_au_field<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.f.recip()
    }

    /// Convert a field amplitude in atomic units to V/m.
    pub fn from_au_field<T, U>(&self, x: T) -> U
    where T: std::ops::Mul<f64, Output = U>
    {
        x * self.f
    }

    /// Convert a peak intensity in W/cm² to the peak field amplitude of a
    /// linearly polarized plane wave in atomic units.
    pub fn intensity_to_field(&self, intensity: f64) -> f64 {
        (intensity / self.i).sqrt()
    }

    /// Convert a peak field amplitude in atomic units to the peak intensity of
    /// a linearly polarized plane wave in W/cm².
    pub fn field_to_intensity(&self, field: f64) -> f64 {
        field * field * self.i
    }

    /// Convert a vacuum wavelength in nanometers to an angular frequency in
    /// atomic units.
    pub fn wavelength_to_omega(&self, wavelength: f64) -> f64 {
        // 2π c / λ with c = 1/α in atomic units
        2.0 * PI / alpha / self.to_au_length::<f64, f64>(wavelength)
    }

    /// Convert an angular frequency in atomic units to a vacuum wavelength in
    /// nanometers.
    pub fn omega_to_wavelength(&self, omega: f64) -> f64 {
        self.from_au_length(2.0 * PI / alpha / omega)
    }

    /// Convert a photon energy in electronvolts to an angular frequency in
    /// atomic units.
    pub fn photon_to_omega(&self, energy: f64) -> f64 {
        self.to_au_energy(energy)
    }
}
