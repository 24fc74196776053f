//! Time-dependent driving fields sampled over a uniform time grid.

use ndarray as nd;
use crate::{
    error::{ LengthError, TdseError },
    grid::UNIFORM_RTOL,
};

pub type FieldResult<T> = Result<T, TdseError>;

/// Electric field amplitude sampled at a series of uniformly spaced times.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    // time coordinates
    t: nd::Array1<f64>,
    // field amplitude at each time
    e: nd::Array1<f64>,
    // time step
    dt: f64,
}

impl Field {
    /// Create a new `Field` from bare time and amplitude arrays.
    ///
    /// The time array must be strictly increasing, uniformly spaced, and
    /// contain at least two points.
    pub fn new(t: nd::Array1<f64>, e: nd::Array1<f64>) -> FieldResult<Self> {
        LengthError::check(&t, &e)?;
        let n = t.len();
        TdseError::check_config(
            n >= 2,
            || format!("field must have at least 2 samples; got {n}"),
        )?;
        let dt = (t[n - 1] - t[0]) / (n - 1) as f64;
        TdseError::check_config(
            dt.is_finite() && dt > 0.0,
            || format!("time grid must be increasing; got step {dt}"),
        )?;
        let uniform
            = t.iter().zip(t.iter().skip(1))
            .all(|(tk, tkp1)| ((tkp1 - tk) - dt).abs() <= UNIFORM_RTOL * dt);
        TdseError::check_config(
            uniform,
            || "time grid must be uniformly spaced".into(),
        )?;
        TdseError::check_config(
            e.iter().all(|ek| ek.is_finite()),
            || "field amplitude must be finite".into(),
        )?;
        Ok(Self { t, e, dt })
    }

    /// Create a new `Field` by evaluating a function over a time array.
    pub fn from_fn<F>(t: nd::Array1<f64>, f: F) -> FieldResult<Self>
    where F: FnMut(f64) -> f64
    {
        let e = t.mapv(f);
        Self::new(t, e)
    }

    /// Create a field that is identically zero over a time array.
    pub fn zero(t: nd::Array1<f64>) -> FieldResult<Self> {
        let e = nd::Array1::zeros(t.len());
        Self::new(t, e)
    }

    /// Get a reference to the time array.
    pub fn get_t(&self) -> &nd::Array1<f64> { &self.t }

    /// Get a reference to the amplitude array.
    pub fn get_e(&self) -> &nd::Array1<f64> { &self.e }

    /// Get the time step.
    pub fn dt(&self) -> f64 { self.dt }

    /// Get the number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.t.len() }

    /// Return `true` if the field vanishes at every sample.
    pub fn is_zero(&self) -> bool { self.e.iter().all(|ek| *ek == 0.0) }

    /// Linearly interpolate the field at an arbitrary time.
    ///
    /// The field is taken to be zero outside the sampled range.
    pub fn at(&self, t: f64) -> f64 {
        let n = self.len();
        if n < 2 || t < self.t[0] || t > self.t[n - 1] { return 0.0; }
        let s = (t - self.t[0]) / self.dt;
        let k = (s.floor() as usize).min(n - 2);
        let r = s - k as f64;
        (1.0 - r) * self.e[k] + r * self.e[k + 1]
    }

    /// Return the field at the temporal midpoint of the `k`-th step, i.e.
    /// halfway between samples `k` and `k + 1`.
    ///
    /// *Panics if `k + 1` is out of bounds*.
    pub fn midpoint(&self, k: usize) -> f64 {
        0.5 * (self.e[k] + self.e[k + 1])
    }

    /// Return a copy of `self` with `factor` evenly spaced, linearly
    /// interpolated samples per existing time step.
    ///
    /// The returned field has `(len - 1) * factor + 1` samples and shares its
    /// first and last sample times with `self`.
    pub fn refined(&self, factor: usize) -> FieldResult<Self> {
        TdseError::check_config(
            factor >= 1,
            || "refinement factor must be at least 1".into(),
        )?;
        let n = self.len();
        TdseError::check_config(
            n >= 2,
            || format!("cannot refine a field of {} samples", n),
        )?;
        let m = (n - 1) * factor + 1;
        let dt = self.dt / factor as f64;
        let t: nd::Array1<f64>
            = (0..m).map(|j| {
                if j == m - 1 { self.t[n - 1] } else { self.t[0] + j as f64 * dt }
            })
            .collect();
        let e: nd::Array1<f64>
            = (0..m).map(|j| {
                let k = (j / factor).min(n - 2);
                let r = (j - k * factor) as f64 / factor as f64;
                (1.0 - r) * self.e[k] + r * self.e[k + 1]
            })
            .collect();
        Self::new(t, e)
    }

    /// Drop the sample arrays, leaving an empty field behind.
    pub(crate) fn release(&mut self) {
        self.t = nd::Array1::zeros(0);
        self.e = nd::Array1::zeros(0);
        self.dt = 0.0;
    }
}
