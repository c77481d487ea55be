use crate::{
    error::{ensure_positive, Result},
    signal::PeakSet,
};
use log::debug;
use std::cmp::Ordering;

/// Convert a refractory period in seconds to a whole number of samples (at least 1).
pub fn separation_samples(min_separation_s: f64, fs: f64) -> Result<usize> {
    ensure_positive("min_peak_separation_s", min_separation_s)?;
    ensure_positive("fs", fs)?;
    Ok(((min_separation_s * fs).round() as usize).max(1))
}

/// Strict local maxima at or above `min_height`, endpoints excluded.
fn candidates(data: &[f64], min_height: f64) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }
    (1..data.len() - 1)
        .filter(|&i| data[i] > data[i - 1] && data[i] > data[i + 1] && data[i] >= min_height)
        .collect()
}

/// Find peaks that are at least `min_separation` samples apart.
///
/// Candidates are visited from tallest to shortest (equal heights: earliest
/// first); each surviving candidate discards every other candidate closer than
/// `min_separation` samples. The survivors are returned in index order, so
/// adjacent peaks always differ by at least `min_separation`.
pub fn find_peaks(data: &[f64], min_separation: usize, min_height: f64) -> PeakSet {
    let positions = candidates(data, min_height);
    if min_separation <= 1 || positions.len() < 2 {
        debug!("{} peaks, no separation pass needed", positions.len());
        return PeakSet::from_indices(positions);
    }

    let m = positions.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        data[positions[b]]
            .partial_cmp(&data[positions[a]])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut keep = vec![true; m];
    for &j in &order {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && positions[j] - positions[k - 1] < min_separation {
            k -= 1;
            keep[k] = false;
        }
        let mut k = j + 1;
        while k < m && positions[k] - positions[j] < min_separation {
            keep[k] = false;
            k += 1;
        }
    }

    let peaks: Vec<usize> = positions
        .into_iter()
        .zip(keep)
        .filter_map(|(pos, kept)| kept.then_some(pos))
        .collect();
    debug!(
        "{} of {} candidates kept with separation {} samples",
        peaks.len(),
        m,
        min_separation
    );
    PeakSet::from_indices(peaks)
}
