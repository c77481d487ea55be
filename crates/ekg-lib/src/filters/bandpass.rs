//! Brick-wall band selection in the frequency domain.

use crate::{
    error::{Result, SignalError},
    signal::TimeSeries,
    spectral::{forward, inverse, Spectrum},
};
use log::{debug, warn};
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Which frequency axis the cutoffs are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSymmetry {
    /// Compare the signed bin frequency. Negative bins only pass if they fall in
    /// `(low, high)` themselves, so a positive band drops the mirror half and the
    /// reconstruction comes out at half amplitude.
    #[default]
    Signed,
    /// Compare `|f|`, passing the band and its negative mirror.
    Mirrored,
}

fn validate_cutoffs(low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() {
        return Err(SignalError::invalid(
            "cutoff",
            format!("cutoffs must be finite, got {low}..{high}"),
        ));
    }
    if low >= high {
        return Err(SignalError::invalid(
            "cutoff",
            format!("low cutoff {low} Hz must be below high cutoff {high} Hz"),
        ));
    }
    Ok(())
}

/// `true` where `low < f < high`, both bounds exclusive.
pub fn build_mask(
    frequencies: &[f64],
    low: f64,
    high: f64,
    symmetry: FilterSymmetry,
) -> Result<Vec<bool>> {
    validate_cutoffs(low, high)?;
    let mask = frequencies
        .iter()
        .map(|&f| {
            let f = match symmetry {
                FilterSymmetry::Signed => f,
                FilterSymmetry::Mirrored => f.abs(),
            };
            f > low && f < high
        })
        .collect();
    Ok(mask)
}

/// Zero every bin whose mask entry is `false`.
pub fn apply_mask(spectrum: &Spectrum, mask: &[bool]) -> Result<Spectrum> {
    if mask.len() != spectrum.len() {
        return Err(SignalError::LengthMismatch {
            expected: spectrum.len(),
            found: mask.len(),
        });
    }
    let zero = Complex64::new(0.0, 0.0);
    let bins = spectrum
        .bins
        .iter()
        .zip(mask)
        .map(|(&c, &keep)| if keep { c } else { zero })
        .collect();
    Ok(Spectrum {
        fs: spectrum.fs,
        bins,
        frequencies: spectrum.frequencies.clone(),
    })
}

/// Build the mask from the spectrum's own frequency axis and apply it.
pub fn apply(
    spectrum: &Spectrum,
    low: f64,
    high: f64,
    symmetry: FilterSymmetry,
) -> Result<Spectrum> {
    if spectrum.frequencies.len() != spectrum.bins.len() {
        return Err(SignalError::LengthMismatch {
            expected: spectrum.bins.len(),
            found: spectrum.frequencies.len(),
        });
    }
    let mask = build_mask(&spectrum.frequencies, low, high, symmetry)?;
    let passed = mask.iter().filter(|&&keep| keep).count();
    if passed == 0 {
        warn!("no bins fall inside {low}..{high} Hz, output will be silent");
    }
    debug!(
        "bandpass {low}..{high} Hz ({symmetry:?}) keeps {passed}/{} bins",
        mask.len()
    );
    apply_mask(spectrum, &mask)
}

/// Forward transform, mask and inverse transform in one step.
pub fn bandpass(
    ts: &TimeSeries,
    low: f64,
    high: f64,
    symmetry: FilterSymmetry,
) -> Result<TimeSeries> {
    validate_cutoffs(low, high)?;
    let spectrum = forward(ts)?;
    inverse(&apply(&spectrum, low, high, symmetry)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tones(fs: f64, n: usize, freqs: &[f64]) -> TimeSeries {
        let data = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum()
            })
            .collect();
        TimeSeries { fs, data }
    }

    #[test]
    fn mask_bounds_are_exclusive() {
        let freqs = [0.0, 0.5, 0.6, 39.9, 40.0, -10.0];
        let mask = build_mask(&freqs, 0.5, 40.0, FilterSymmetry::Signed).unwrap();
        assert_eq!(mask, vec![false, false, true, true, false, false]);
    }

    #[test]
    fn signed_mask_drops_every_negative_bin_for_positive_band() {
        let freqs = crate::spectral::fft_frequencies(2500, 250.0);
        let mask = build_mask(&freqs, 0.5, 40.0, FilterSymmetry::Signed).unwrap();
        for (f, keep) in freqs.iter().zip(&mask) {
            if *f < 0.0 {
                assert!(!keep);
            }
        }
        // 0.6 ..= 39.9 Hz in 0.1 Hz steps
        assert_eq!(mask.iter().filter(|&&k| k).count(), 394);
    }

    #[test]
    fn mirrored_mask_passes_both_halves() {
        let freqs = [10.0, -10.0, 50.0, -50.0];
        let mask = build_mask(&freqs, 0.5, 40.0, FilterSymmetry::Mirrored).unwrap();
        assert_eq!(mask, vec![true, true, false, false]);
    }

    #[test]
    fn inverted_cutoffs_are_rejected() {
        let freqs = [0.0, 1.0];
        assert!(matches!(
            build_mask(&freqs, 40.0, 0.5, FilterSymmetry::Signed),
            Err(SignalError::InvalidParameter { name: "cutoff", .. })
        ));
        assert!(matches!(
            build_mask(&freqs, 5.0, 5.0, FilterSymmetry::Signed),
            Err(SignalError::InvalidParameter { .. })
        ));
        let ts = tones(250.0, 250, &[5.0]);
        assert!(matches!(
            bandpass(&ts, 40.0, 0.5, FilterSymmetry::Signed),
            Err(SignalError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn applying_mask_twice_is_idempotent() {
        let ts = tones(250.0, 500, &[3.0, 60.0]);
        let spectrum = forward(&ts).unwrap();
        let once = apply(&spectrum, 0.5, 40.0, FilterSymmetry::Signed).unwrap();
        let twice = apply(&once, 0.5, 40.0, FilterSymmetry::Signed).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn mirrored_bandpass_removes_out_of_band_tone() {
        let fs = 250.0;
        let n = 1000;
        let ts = tones(fs, n, &[5.0, 60.0]);
        let filtered = bandpass(&ts, 0.5, 40.0, FilterSymmetry::Mirrored).unwrap();
        let expected = tones(fs, n, &[5.0]);
        for (a, b) in filtered.data.iter().zip(&expected.data) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn signed_bandpass_halves_in_band_tone() {
        let fs = 250.0;
        let n = 1000;
        let ts = tones(fs, n, &[5.0, 60.0]);
        let filtered = bandpass(&ts, 0.5, 40.0, FilterSymmetry::Signed).unwrap();
        let expected = tones(fs, n, &[5.0]);
        for (a, b) in filtered.data.iter().zip(&expected.data) {
            assert!((a - 0.5 * b).abs() < 1e-9);
        }
    }

    #[test]
    fn mask_length_must_match_spectrum() {
        let spectrum = forward(&tones(100.0, 16, &[5.0])).unwrap();
        assert!(matches!(
            apply_mask(&spectrum, &[true; 4]),
            Err(SignalError::LengthMismatch { expected: 16, found: 4 })
        ));
    }
}
