//! Miscellaneous tools.

use ndarray::{ self as nd, Ix1, concatenate };
use num_complex::Complex64 as C64;
use rustfft as fft;
use crate::observables::population;

/// Renormalize a wavefunction in place so that Σ |ψ|² δx = 1.
///
/// Wavefunctions of zero norm are left untouched.
pub fn wf_renormalize<S>(q: &mut nd::ArrayBase<S, Ix1>, dx: f64)
where S: nd::DataMut<Elem = C64>
{
    let norm = population(q, dx).sqrt();
    if norm > 0.0 {
        q.iter_mut().for_each(|qk| { *qk /= norm; });
    }
}

/// Return a normalized copy of a wavefunction.
pub fn wf_normalized<S>(q: &nd::ArrayBase<S, Ix1>, dx: f64) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let mut new = q.to_owned();
    wf_renormalize(&mut new, dx);
    new
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling time `dt`.
///
/// Frequencies are spaced by `1 / (n dt)` and ordered as in the output of
/// [`fft_inplace`], with non-negative frequencies first.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let fp: nd::Array1<f64>
        = (0..m)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - m + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Perform the one-dimensional, complex-valued FFT in place.
pub fn fft_inplace(f: &mut nd::Array1<C64>) {
    let n: usize = f.len();
    if n == 0 { return; }
    let mut plan = fft::FftPlanner::new();
    let fft_plan = plan.plan_fft_forward(n);
    match f.as_slice_mut() {
        Some(buf) => fft_plan.process(buf),
        None => {
            let mut buf: Vec<C64> = f.to_vec();
            fft_plan.process(&mut buf);
            f.iter_mut().zip(buf).for_each(|(fk, bk)| { *fk = bk; });
        },
    }
}

/// Return a copy of `x` with indices shifted to map super-Nyquist frequency
/// components to negative frequencies.
pub fn fft_shift<S, A>(x: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let n = x.len();
    let (p, m)
        = if n % 2 == 0 {
            x.view().split_at(nd::Axis(0), n / 2)
        } else {
            x.view().split_at(nd::Axis(0), n / 2 + 1)
        };
    concatenate!(nd::Axis(0), m.into_owned(), p.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_grid() {
        let f = fft_freq(4, 0.5);
        assert_eq!(f, nd::array![0.0, 0.5, -1.0, -0.5]);
        let f = fft_freq(5, 1.0);
        assert_eq!(f, nd::array![0.0, 0.2, 0.4, -0.4, -0.2]);
        assert_eq!(fft_shift(&f), nd::array![-0.4, -0.2, 0.0, 0.2, 0.4]);
    }

    #[test]
    fn shift_even_length() {
        let f = fft_freq(8, 0.125);
        assert_eq!(f, nd::array![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
        assert_eq!(
            fft_shift(&f),
            nd::array![-4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0],
        );
        let p = nd::array![10, 11, 12, 13, 14, 15];
        assert_eq!(fft_shift(&p), nd::array![13, 14, 15, 10, 11, 12]);
    }

    #[test]
    fn fft_single_mode() {
        let n = 16;
        let mut f: nd::Array1<C64>
            = (0..n)
            .map(|k| C64::cis(std::f64::consts::TAU * 3.0 * k as f64 / n as f64))
            .collect();
        fft_inplace(&mut f);
        assert!((f[3] - C64::from(n as f64)).norm() < 1e-10);
        assert!(f.iter().enumerate().filter(|(k, _)| *k != 3)
            .all(|(_, fk)| fk.norm() < 1e-10));
    }

    #[test]
    fn renormalize() {
        let mut q: nd::Array1<C64> = nd::array![1.0, 2.0, 2.0].mapv(C64::from);
        wf_renormalize(&mut q, 0.5);
        assert!((population(&q, 0.5) - 1.0).abs() < 1e-14);
        let mut z: nd::Array1<C64> = nd::Array1::zeros(3);
        wf_renormalize(&mut z, 0.5);
        assert!(z.iter().all(|zk| *zk == C64::from(0.0)));
    }
}
