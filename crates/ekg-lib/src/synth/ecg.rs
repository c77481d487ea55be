//! Stylised ECG synthesis: one P-QRS-T pulse, tiled, with artefacts on top.

use super::noise::{GaussianNoise, NoiseProfile, NoiseSource};
use crate::{
    error::{ensure_positive, Result, SignalError},
    signal::TimeSeries,
};
use log::debug;
use std::f64::consts::PI;

/// Length of one synthesized heartbeat (seconds).
pub const PULSE_PERIOD_S: f64 = 0.8;

fn p_wave(t: f64) -> f64 {
    0.15 * (2.0 * PI * 1.5 * t).sin() * (-(t - 0.1).powi(2) / 0.005).exp()
}

fn qrs_complex(t: f64) -> f64 {
    if t > 0.2 && t < 0.25 {
        -0.3
    } else if t > 0.25 && t < 0.3 {
        1.0
    } else if t > 0.3 && t < 0.35 {
        -0.2
    } else {
        0.0
    }
}

fn t_wave(t: f64) -> f64 {
    0.3 * (2.0 * PI * 0.75 * (t - 0.45)).sin() * (-(t - 0.45).powi(2) / 0.015).exp()
}

/// Number of samples in one pulse at `fs`.
pub fn pulse_len(fs: f64) -> usize {
    (PULSE_PERIOD_S * fs).floor() as usize
}

/// One pulse sampled on `floor(0.8 * fs)` evenly spaced points over `[0, 0.8)`.
pub fn pulse_template(fs: f64, profile: &NoiseProfile) -> Result<TimeSeries> {
    ensure_positive("fs", fs)?;
    let n = pulse_len(fs);
    if n == 0 {
        return Err(SignalError::invalid(
            "fs",
            format!("{fs} Hz is too low to sample a {PULSE_PERIOD_S} s pulse"),
        ));
    }
    let step = PULSE_PERIOD_S / n as f64;
    let data = (0..n)
        .map(|i| {
            let t = i as f64 * step;
            p_wave(t)
                + qrs_complex(t)
                + t_wave(t)
                + profile.ripple_amp * (2.0 * PI * profile.ripple_hz * t).sin()
        })
        .collect();
    Ok(TimeSeries { fs, data })
}

/// Synthesize `duration_s` seconds with the default artefacts and entropy-seeded noise.
pub fn synthesize(duration_s: f64, fs: f64) -> Result<TimeSeries> {
    let mut noise = GaussianNoise::from_entropy();
    synthesize_with_noise(duration_s, fs, &NoiseProfile::default(), &mut noise)
}

/// Synthesize exactly `floor(duration_s * fs)` samples.
///
/// Whole pulses are tiled until they cover the requested length and the tail is
/// truncated, so the final beat may be partial. This means more beats than
/// `floor(duration_s / 0.8)` can appear: 10 s at 250 Hz holds 12.5 pulses and
/// 13 R waves. Gaussian noise is drawn once per
/// sample in order, which keeps a seeded source reproducible.
pub fn synthesize_with_noise(
    duration_s: f64,
    fs: f64,
    profile: &NoiseProfile,
    noise: &mut dyn NoiseSource,
) -> Result<TimeSeries> {
    ensure_positive("duration_s", duration_s)?;
    let pulse = pulse_template(fs, profile)?;
    let n = (duration_s * fs).floor() as usize;
    let data: Vec<f64> = pulse
        .data
        .iter()
        .copied()
        .cycle()
        .take(n)
        .enumerate()
        .map(|(i, beat)| {
            let t = i as f64 / fs;
            beat + noise.gaussian(profile.gaussian_std)
                + profile.wander_amp * (2.0 * PI * profile.wander_hz * t).sin()
                + profile.line_amp * (2.0 * PI * profile.line_hz * t).sin()
        })
        .collect();
    debug!(
        "synthesized {} samples at {} Hz ({} samples per pulse)",
        data.len(),
        fs,
        pulse.len()
    );
    Ok(TimeSeries { fs, data })
}
