//! Discrete Fourier transform of a real signal and its inverse.
//!
//! The forward transform keeps the full `N`-bin complex spectrum so a mask can
//! treat positive and negative frequencies independently.

use crate::{
    error::{ensure_positive, Result, SignalError},
    signal::TimeSeries,
};
use log::debug;
use realfft::RealFftPlanner;
use rustfft::{num_complex::Complex64, FftPlanner};

/// Full complex spectrum with the signed frequency of every bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Sampling frequency of the originating signal in Hz
    pub fs: f64,
    pub bins: Vec<Complex64>,
    /// Frequency in Hz of each bin, in folded layout.
    pub frequencies: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// `[frequency, |X|]` for every non-negative frequency bin.
    pub fn magnitude_points(&self) -> Vec<[f64; 2]> {
        self.frequencies
            .iter()
            .zip(&self.bins)
            .filter(|(f, _)| **f >= 0.0)
            .map(|(f, c)| [*f, c.norm()])
            .collect()
    }
}

/// Frequency of bin `k` in an `n`-point transform at `fs`.
///
/// Bins with `k < n/2` map to `k * fs / n`, the rest fold to `(k - n) * fs / n`.
pub fn bin_frequency(k: usize, n: usize, fs: f64) -> f64 {
    let n_f = n as f64;
    if 2 * k < n {
        k as f64 * fs / n_f
    } else {
        (k as f64 - n_f) * fs / n_f
    }
}

pub fn fft_frequencies(n: usize, fs: f64) -> Vec<f64> {
    (0..n).map(|k| bin_frequency(k, n, fs)).collect()
}

/// Forward transform without windowing.
pub fn forward(ts: &TimeSeries) -> Result<Spectrum> {
    ensure_positive("fs", ts.fs)?;
    let n = ts.len();
    if n == 0 {
        return Err(SignalError::invalid("signal", "cannot transform an empty signal"));
    }
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(n);
    let mut buffer = ts.data.clone();
    let mut half = r2c.make_output_vec();
    r2c.process(&mut buffer, &mut half)
        .map_err(|e| SignalError::Transform(e.to_string()))?;

    // Real input: the upper half is the conjugate mirror of the lower half.
    let mut bins = Vec::with_capacity(n);
    bins.extend_from_slice(&half);
    for k in half.len()..n {
        bins.push(half[n - k].conj());
    }
    debug!("forward transform of {} samples at {} Hz", n, ts.fs);
    Ok(Spectrum {
        fs: ts.fs,
        bins,
        frequencies: fft_frequencies(n, ts.fs),
    })
}

/// Inverse transform, keeping only the real part of the reconstruction.
pub fn inverse(spectrum: &Spectrum) -> Result<TimeSeries> {
    ensure_positive("fs", spectrum.fs)?;
    let n = spectrum.len();
    if n == 0 {
        return Err(SignalError::invalid("spectrum", "cannot invert an empty spectrum"));
    }
    let mut planner = FftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(n);
    let mut buffer = spectrum.bins.clone();
    ifft.process(&mut buffer);
    let scale = 1.0 / n as f64;
    let data = buffer.iter().map(|c| c.re * scale).collect();
    Ok(TimeSeries {
        fs: spectrum.fs,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synthesize_with_noise, NoiseProfile, SilentNoise};

    #[test]
    fn bin_mapping_folds_at_half_length() {
        assert_eq!(bin_frequency(0, 250, 250.0), 0.0);
        assert_eq!(bin_frequency(1, 250, 250.0), 1.0);
        assert_eq!(bin_frequency(124, 250, 250.0), 124.0);
        assert_eq!(bin_frequency(125, 250, 250.0), -125.0);
        assert_eq!(bin_frequency(249, 250, 250.0), -1.0);
    }

    #[test]
    fn odd_length_keeps_middle_bin_positive() {
        let freqs = fft_frequencies(5, 5.0);
        assert_eq!(freqs, vec![0.0, 1.0, 2.0, -2.0, -1.0]);
    }

    #[test]
    fn spectrum_length_matches_signal() {
        let ts = TimeSeries::new(100.0, (0..37).map(|i| (i as f64 * 0.3).sin()).collect());
        let spec = forward(&ts).unwrap();
        assert_eq!(spec.len(), 37);
        assert_eq!(spec.frequencies.len(), 37);
    }

    #[test]
    fn pure_tone_lands_in_its_bin() {
        let fs = 100.0;
        let n = 200;
        let ts = TimeSeries::new(
            fs,
            (0..n)
                .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / fs).cos())
                .collect(),
        );
        let spec = forward(&ts).unwrap();
        let (peak_bin, _) = spec
            .bins
            .iter()
            .enumerate()
            .take(n / 2)
            .fold((0, 0.0), |acc, (k, c)| if c.norm() > acc.1 { (k, c.norm()) } else { acc });
        assert_eq!(spec.frequencies[peak_bin], 10.0);
        // Conjugate mirror in the negative half.
        let mirror = spec.frequencies.iter().position(|&f| f == -10.0).unwrap();
        assert!((spec.bins[mirror] - spec.bins[peak_bin].conj()).norm() < 1e-9);
    }

    #[test]
    fn round_trip_restores_signal() {
        let ts = synthesize_with_noise(10.0, 250.0, &NoiseProfile::clean(), &mut SilentNoise)
            .unwrap();
        let back = inverse(&forward(&ts).unwrap()).unwrap();
        assert_eq!(back.len(), ts.len());
        for (a, b) in ts.data.iter().zip(&back.data) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn magnitude_points_cover_non_negative_bins() {
        let ts = TimeSeries::new(8.0, vec![1.0; 8]);
        let points = forward(&ts).unwrap().magnitude_points();
        assert_eq!(points.len(), 4);
        assert!((points[0][1] - 8.0).abs() < 1e-12);
        assert!(points[1..].iter().all(|p| p[1].abs() < 1e-12));
    }

    #[test]
    fn empty_input_is_rejected() {
        let ts = TimeSeries::new(250.0, Vec::new());
        assert!(matches!(
            forward(&ts),
            Err(SignalError::InvalidParameter { .. })
        ));
    }
}
