use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Source of zero-mean gaussian draws used by the synthesizer.
pub trait NoiseSource {
    /// Draw one sample with the given standard deviation.
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

/// Gaussian noise backed by a `StdRng`.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        if std_dev == 0.0 {
            return 0.0;
        }
        let z: f64 = self.rng.sample(StandardNormal);
        z * std_dev
    }
}

/// Always returns zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNoise;

impl NoiseSource for SilentNoise {
    fn gaussian(&mut self, _std_dev: f64) -> f64 {
        0.0
    }
}

/// Amplitudes and frequencies of the artefacts layered on the clean pulse train.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseProfile {
    /// Standard deviation of white gaussian noise.
    pub gaussian_std: f64,
    /// High-frequency ripple baked into every pulse.
    pub ripple_amp: f64,
    pub ripple_hz: f64,
    /// Slow baseline drift.
    pub wander_amp: f64,
    pub wander_hz: f64,
    /// Mains interference.
    pub line_amp: f64,
    pub line_hz: f64,
}

impl Default for NoiseProfile {
    fn default() -> Self {
        Self {
            gaussian_std: 0.05,
            ripple_amp: 0.05,
            ripple_hz: 50.0,
            wander_amp: 0.1,
            wander_hz: 0.1,
            line_amp: 0.05,
            line_hz: 60.0,
        }
    }
}

impl NoiseProfile {
    /// No artefacts at all; the output is the bare tiled pulse.
    pub fn clean() -> Self {
        Self {
            gaussian_std: 0.0,
            ripple_amp: 0.0,
            wander_amp: 0.0,
            line_amp: 0.0,
            ..Self::default()
        }
    }
}
