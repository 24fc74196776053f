//! Frequency-domain post-processing of recorded time sequences.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    output::{ Outputs, PrintFlags },
    utils::{ fft_freq, fft_inplace },
};

/// Approximate the continuous Fourier transform ∫ f(t) e^{-2πiνt} dt of a
/// real sequence sampled with step `dt` by `dt` times its FFT.
pub fn transform<S>(seq: &Arr1<S>, dt: f64) -> nd::Array1<C64>
where S: nd::Data<Elem = f64>
{
    let mut f: nd::Array1<C64> = seq.mapv(C64::from);
    fft_inplace(&mut f);
    f.map_inplace(|fk| { *fk *= dt; });
    f
}

/// Compute the element-wise squared magnitude of a transformed sequence.
pub fn power<S>(f: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    f.mapv(|fk| fk.norm_sqr())
}

/// Time sequences recorded by the propagation driver, prior to selection and
/// transformation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recorded {
    pub tgrid: Vec<f64>,
    pub efield: Vec<f64>,
    pub source: Vec<f64>,
    pub pop_tot: Vec<f64>,
    pub pop_int: Vec<f64>,
    pub expval_x: Vec<f64>,
    pub energy: Vec<f64>,
}

fn keep<A>(flag: bool, seq: Vec<A>) -> nd::Array1<A> {
    if flag { nd::Array1::from_vec(seq) } else { nd::Array1::from(Vec::new()) }
}

// transform a sequence only if either the transform or its power is requested
fn spectra(want_f: bool, want_m2: bool, seq: &[f64], dt: f64)
    -> (nd::Array1<C64>, nd::Array1<f64>)
{
    if !(want_f || want_m2) {
        return (nd::Array1::zeros(0), nd::Array1::zeros(0));
    }
    let f = transform(&nd::ArrayView1::from(seq), dt);
    let m2 = if want_m2 { power(&f) } else { nd::Array1::zeros(0) };
    (if want_f { f } else { nd::Array1::zeros(0) }, m2)
}

/// Assemble the final result aggregate from recorded sequences, computing the
/// requested frequency-domain quantities.
///
/// Recorded sequences are expected to hold `steps + 1` samples.
pub(crate) fn assemble(
    rec: Recorded,
    dt: f64,
    print: &PrintFlags,
    psi_final: nd::Array1<C64>,
    steps: usize,
) -> Outputs
{
    let n = steps + 1;
    let freq = if print.freq { fft_freq(n, dt) } else { nd::Array1::zeros(0) };

    let (f_efield, f_efield_m2)
        = spectra(print.f_efield, print.f_efield_m2, &rec.efield, dt);
    let (f_source, f_source_m2)
        = spectra(print.f_source, print.f_source_m2, &rec.source, dt);

    Outputs {
        tgrid: keep(print.tgrid, rec.tgrid),
        freq,
        efield: keep(print.efield, rec.efield),
        f_efield,
        f_efield_m2,
        source: keep(print.source, rec.source),
        f_source,
        f_source_m2,
        pop_tot: keep(print.pop_tot, rec.pop_tot),
        pop_int: keep(print.pop_int, rec.pop_int),
        expval_x: keep(print.expval_x, rec.expval_x),
        energy: keep(print.energy, rec.energy),
        psi_final,
        steps,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn cosine_peak() {
        let n = 200;
        let dt = 0.05;
        let nu = 2.0; // 20 full periods over n dt = 10
        let seq: nd::Array1<f64>
            = (0..n).map(|k| (TAU * nu * k as f64 * dt).cos()).collect();
        let f = transform(&seq, dt);
        let p = power(&f);
        let freq = fft_freq(n, dt);
        let kmax
            = p.iter().enumerate().take(n / 2)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(k, _)| k)
            .unwrap();
        assert!((freq[kmax] - nu).abs() < 1e-12);
        // a cosine splits evenly into ±ν, each with weight n dt / 2
        assert!((f[kmax].re - n as f64 * dt / 2.0).abs() < 1e-9);
        assert!((p[n - kmax] - p[kmax]).abs() < 1e-9);
    }

    #[test]
    fn assemble_respects_flags() {
        let rec = Recorded {
            tgrid: vec![0.0, 1.0, 2.0, 3.0],
            efield: vec![0.0, 1.0, 0.0, -1.0],
            source: vec![1.0, 0.0, -1.0, 0.0],
            pop_tot: vec![1.0; 4],
            pop_int: vec![1.0; 4],
            expval_x: vec![0.0; 4],
            energy: vec![-0.5; 4],
        };
        let print = PrintFlags {
            f_source_m2: true,
            pop_tot: true,
            ..PrintFlags::none()
        };
        let out
            = assemble(rec.clone(), 1.0, &print, nd::Array1::zeros(3), 3);
        assert_eq!(out.f_source_m2.len(), 4);
        assert_eq!(out.pop_tot.len(), 4);
        assert!(out.f_source.is_empty());
        assert!(out.source.is_empty());
        assert!(out.f_efield.is_empty() && out.freq.is_empty());
        assert!(out.tgrid.is_empty() && out.energy.is_empty());

        let out
            = assemble(rec, 1.0, &PrintFlags::all(), nd::Array1::zeros(3), 3);
        assert_eq!(out.freq, nd::array![0.0, 0.25, -0.5, -0.25]);
        assert!(out.f_efield_m2.iter().zip(&out.f_efield)
            .all(|(m2, f)| (m2 - f.norm_sqr()).abs() < 1e-14));
    }
}
