use crate::{
    error::{ensure_positive, Result, SignalError},
    signal::{PeakSet, RRSeries},
};
use serde::{Deserialize, Serialize};

/// Average cyclic rate derived from a peak train.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// Beats per minute
    pub bpm: f64,
    /// Mean inter-peak interval in seconds
    pub mean_interval_s: f64,
    /// Number of intervals averaged
    pub intervals: usize,
}

/// Beat-to-beat interval summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub n: usize,
    pub mean_s: f64,
    pub sdnn: f64,
    pub rmssd: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
}

fn intervals(peaks: &PeakSet, fs: f64) -> Result<RRSeries> {
    ensure_positive("fs", fs)?;
    if peaks.len() < 2 {
        return Err(SignalError::InsufficientPeaks { found: peaks.len() });
    }
    if let Some(w) = peaks.indices.windows(2).find(|w| w[0] >= w[1]) {
        return Err(SignalError::invalid(
            "peaks",
            format!("indices must be strictly increasing, got {} then {}", w[0], w[1]),
        ));
    }
    Ok(RRSeries::from_peaks(peaks, fs))
}

/// `60 / mean interval`, failing instead of dividing by an empty mean.
pub fn estimate_rate(peaks: &PeakSet, fs: f64) -> Result<RateEstimate> {
    let rr = intervals(peaks, fs)?;
    let n = rr.rr.len();
    let mean = rr.rr.iter().sum::<f64>() / n as f64;
    Ok(RateEstimate {
        bpm: 60.0 / mean,
        mean_interval_s: mean,
        intervals: n,
    })
}

pub fn interval_stats(peaks: &PeakSet, fs: f64) -> Result<IntervalStats> {
    let rr = intervals(peaks, fs)?;
    let n = rr.rr.len();
    let mean_s = rr.rr.iter().sum::<f64>() / n as f64;
    let sdnn = if n > 1 {
        (rr.rr.iter().map(|x| (x - mean_s).powi(2)).sum::<f64>() / (n as f64 - 1.0)).sqrt()
    } else {
        0.0
    };
    let rmssd = if n > 1 {
        let diffs = rr.rr.windows(2).map(|w| (w[1] - w[0]).powi(2));
        (diffs.sum::<f64>() / (n as f64 - 1.0)).sqrt()
    } else {
        0.0
    };
    let longest = rr.rr.iter().copied().fold(f64::MIN, f64::max);
    let shortest = rr.rr.iter().copied().fold(f64::MAX, f64::min);
    Ok(IntervalStats {
        n,
        mean_s,
        sdnn,
        rmssd,
        min_bpm: 60.0 / longest,
        max_bpm: 60.0 / shortest,
    })
}
