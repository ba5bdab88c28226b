//! Deflection-onset detection on trial-averaged ERPs.
//!
//! Scans each channel of a baselined ERP for the first sample where the
//! signal drops below a per-channel cutoff and *stays* below it for a
//! full baseline window. A momentary dip does not count; only a sustained
//! crossing marks the deflection onset.
use ndarray::Array2;

use crate::error::{Error, Result};

/// Locate the first sustained sub-cutoff deflection per channel.
///
/// `erp` is (sample × channel), typically the output of
/// [`crate::baseline::trial_average`] on baselined, re-epoched data.
/// `cutoff` holds one threshold per channel and `window_labels` maps each
/// sample index to the value to report (e.g. milliseconds relative to the
/// time-lock event).
///
/// Channel `j`'s onset is the smallest sample index `i` with
/// `i < n_samples - baseline_len` such that all of
/// `erp[i..i + baseline_len, j]` lie below `cutoff[j]`; the reported value
/// is `window_labels[i]`. Channels with no such run report `NaN`. Runs
/// that begin at or after `n_samples - baseline_len` are never reported,
/// even when they would fit exactly at the end of the recording.
///
/// # Errors
///
/// `InvalidParameter` when `cutoff` does not match the channel count,
/// `window_labels` does not match the sample count, or `baseline_len` is
/// zero or exceeds the sample count.
pub fn find_deflection(
    erp: &Array2<f64>,
    cutoff: &[f64],
    baseline_len: usize,
    window_labels: &[f64],
) -> Result<Vec<f64>> {
    let (n_samp, n_chan) = erp.dim();
    if cutoff.len() != n_chan {
        return Err(Error::InvalidParameter(format!(
            "cutoff count {} != channel count {n_chan}",
            cutoff.len()
        )));
    }
    if window_labels.len() != n_samp {
        return Err(Error::InvalidParameter(format!(
            "label count {} != sample count {n_samp}",
            window_labels.len()
        )));
    }
    if baseline_len == 0 || baseline_len > n_samp {
        return Err(Error::InvalidParameter(format!(
            "baseline window length {baseline_len} outside 1..={n_samp}"
        )));
    }

    let max_time = n_samp - baseline_len;
    let mut onsets = vec![f64::NAN; n_chan];
    for (j, onset) in onsets.iter_mut().enumerate() {
        let below: Vec<bool> = (0..n_samp).map(|i| erp[(i, j)] < cutoff[j]).collect();
        for i in 0..max_time {
            if below[i] && below[i..i + baseline_len].iter().all(|&b| b) {
                *onset = window_labels[i];
                break;
            }
        }
    }
    Ok(onsets)
}
