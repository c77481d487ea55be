use crate::{
    detectors::peaks::{find_peaks, separation_samples},
    error::{ensure_positive, Result, SignalError},
    filters::bandpass::{apply, FilterSymmetry},
    metrics::rate::{estimate_rate, interval_stats, IntervalStats, RateEstimate},
    signal::{PeakSet, TimeSeries},
    spectral::{forward, inverse, Spectrum},
    synth::{synthesize_with_noise, GaussianNoise, NoiseProfile, NoiseSource},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Parameters for synthesis, filtering and rate estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Length of the synthesized recording (seconds).
    pub duration_s: f64,
    /// Sampling frequency (Hz).
    pub fs: f64,
    /// Exclusive lower edge of the pass band (Hz).
    pub lowcut_hz: f64,
    /// Exclusive upper edge of the pass band (Hz).
    pub highcut_hz: f64,
    /// Refractory period between accepted peaks (seconds).
    pub min_peak_separation_s: f64,
    /// Minimum filtered amplitude for a peak.
    pub min_peak_height: f64,
    /// Noise seed; `None` draws from entropy.
    pub seed: Option<u64>,
    pub symmetry: FilterSymmetry,
    pub noise: NoiseProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            duration_s: 10.0,
            fs: 250.0,
            lowcut_hz: 0.5,
            highcut_hz: 40.0,
            min_peak_separation_s: 0.6,
            min_peak_height: 0.5,
            seed: None,
            symmetry: FilterSymmetry::Signed,
            noise: NoiseProfile::default(),
        }
    }
}

impl PipelineConfig {
    /// Check the analysis parameters (everything except `duration_s`).
    pub fn validate_analysis(&self) -> Result<()> {
        ensure_positive("fs", self.fs)?;
        ensure_positive("min_peak_separation_s", self.min_peak_separation_s)?;
        if !self.lowcut_hz.is_finite() || !self.highcut_hz.is_finite() {
            return Err(SignalError::invalid("cutoff", "cutoffs must be finite"));
        }
        if self.lowcut_hz >= self.highcut_hz {
            return Err(SignalError::invalid(
                "cutoff",
                format!(
                    "low cutoff {} Hz must be below high cutoff {} Hz",
                    self.lowcut_hz, self.highcut_hz
                ),
            ));
        }
        if !self.min_peak_height.is_finite() {
            return Err(SignalError::invalid(
                "min_peak_height",
                format!("must be finite, got {}", self.min_peak_height),
            ));
        }
        Ok(())
    }

    /// Check every parameter before any computation runs.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("duration_s", self.duration_s)?;
        self.validate_analysis()
    }

    pub fn min_separation_samples(&self) -> Result<usize> {
        separation_samples(self.min_peak_separation_s, self.fs)
    }
}

/// Filter, peak and rate stages applied to one signal.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub spectrum: Spectrum,
    pub filtered: TimeSeries,
    pub peaks: PeakSet,
    pub rate: RateEstimate,
    pub intervals: IntervalStats,
}

/// Every intermediate value of a synthesized run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw: TimeSeries,
    pub analysis: Analysis,
}

/// Serializable digest of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub fs: f64,
    pub sample_count: usize,
    pub peaks: PeakSet,
    pub peak_times_s: Vec<f64>,
    pub rate: RateEstimate,
    pub intervals: IntervalStats,
}

impl Analysis {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            fs: self.filtered.fs,
            sample_count: self.filtered.len(),
            peak_times_s: self.peaks.times(self.filtered.fs),
            peaks: self.peaks.clone(),
            rate: self.rate,
            intervals: self.intervals,
        }
    }
}

impl PipelineOutput {
    pub fn summary(&self) -> PipelineSummary {
        self.analysis.summary()
    }
}

/// Band-limit `ts`, detect peaks and estimate the rate.
///
/// Uses `ts.fs` as the sample rate; `cfg.fs` and `cfg.duration_s` are ignored.
pub fn analyze(ts: &TimeSeries, cfg: &PipelineConfig) -> Result<Analysis> {
    let cfg = PipelineConfig { fs: ts.fs, ..*cfg };
    cfg.validate_analysis()?;
    let separation = cfg.min_separation_samples()?;

    let spectrum = forward(ts)?;
    let masked = apply(&spectrum, cfg.lowcut_hz, cfg.highcut_hz, cfg.symmetry)?;
    let filtered = inverse(&masked)?;
    let peaks = find_peaks(&filtered.data, separation, cfg.min_peak_height);
    debug!(
        "{} peaks above {} with separation {} samples",
        peaks.len(),
        cfg.min_peak_height,
        separation
    );
    let rate = estimate_rate(&peaks, filtered.fs)?;
    let intervals = interval_stats(&peaks, filtered.fs)?;
    Ok(Analysis {
        spectrum,
        filtered,
        peaks,
        rate,
        intervals,
    })
}

/// Synthesize with an injected noise source, then analyze.
pub fn run_pipeline_with_noise(
    cfg: &PipelineConfig,
    noise: &mut dyn NoiseSource,
) -> Result<PipelineOutput> {
    cfg.validate()?;
    let raw = synthesize_with_noise(cfg.duration_s, cfg.fs, &cfg.noise, noise)?;
    let analysis = analyze(&raw, cfg)?;
    info!(
        "{:.1} BPM from {} peaks over {:.2} s",
        analysis.rate.bpm,
        analysis.peaks.len(),
        raw.duration()
    );
    Ok(PipelineOutput { raw, analysis })
}

/// Run the whole pipeline with gaussian noise seeded from `cfg.seed`.
pub fn run_pipeline(cfg: &PipelineConfig) -> Result<PipelineOutput> {
    let mut noise = GaussianNoise::new(cfg.seed);
    run_pipeline_with_noise(cfg, &mut noise)
}
