use serde::{Deserialize, Serialize};

/// Uniformly sampled real-valued signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Uniform sampling frequency in Hz
    pub fs: f64,
    /// Samples
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn new(fs: f64, data: Vec<f64>) -> Self {
        Self { fs, data }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs
    }
    /// Time in seconds of each sample.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        let fs = self.fs;
        (0..self.data.len()).map(move |i| i as f64 / fs)
    }
}

/// Accepted peak locations as strictly increasing sample indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSet {
    pub indices: Vec<usize>,
}

impl PeakSet {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    /// Peak positions in seconds.
    pub fn times(&self, fs: f64) -> Vec<f64> {
        self.indices.iter().map(|&i| i as f64 / fs).collect()
    }
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Inter-peak intervals (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RRSeries {
    pub rr: Vec<f64>,
}

impl RRSeries {
    pub fn from_peaks(peaks: &PeakSet, fs: f64) -> Self {
        let rr = peaks
            .indices
            .windows(2)
            .map(|w| (w[1] as f64 - w[0] as f64) / fs)
            .collect();
        Self { rr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rr_series_converts_gaps_to_seconds() {
        let peaks = PeakSet::from_indices(vec![10, 210, 400]);
        let rr = RRSeries::from_peaks(&peaks, 250.0);
        assert_eq!(rr.rr, vec![0.8, 0.76]);
    }

    #[test]
    fn rr_series_tolerates_descending_indices() {
        let peaks = PeakSet::from_indices(vec![250, 0]);
        let rr = RRSeries::from_peaks(&peaks, 250.0);
        assert_eq!(rr.rr, vec![-1.0]);
    }

    #[test]
    fn peak_times_follow_sample_rate() {
        let peaks = PeakSet::from_indices(vec![0, 125, 500]);
        assert_eq!(peaks.times(250.0), vec![0.0, 0.5, 2.0]);
        assert!(peaks.contains(125));
        assert!(!peaks.contains(126));
    }
}
