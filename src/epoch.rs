//! Re-epoching over jittered time-lock offsets.
//!
//! Trials recorded with condition-dependent onset times (a variable
//! response latency, a jittered stimulus) are realigned so that each
//! trial's event of interest lands on a common reference sample. The
//! window is the largest one available to every usable trial, so no
//! padding is ever fabricated.
use ndarray::{Array3, s};

use crate::error::{Error, Result};

/// Result of [`epoch_subset`].
#[derive(Debug, Clone)]
pub struct Reepoched {
    /// Realigned data, shape (window × channel × trial). Trials listed in
    /// `bad_trials` are all-zero.
    pub data: Array3<f64>,
    /// Sample index within the new window where each trial's time-lock
    /// event sits.
    pub lock_index: i64,
    /// Trials whose offset was non-finite, ascending.
    pub bad_trials: Vec<usize>,
}

/// Re-epoch (sample × channel × trial) data around per-trial offsets.
///
/// `offsets` holds, per trial, the sample index in that trial's original
/// recording to treat as time zero; `NaN` marks a trial to exclude.
/// Offsets are floored to whole samples. `lock_index` defaults to the
/// floor of the smallest finite offset, which maximises the shared
/// window:
///
/// `window = n_samples - floor(max finite offset) + lock_index`
///
/// Each usable trial contributes `data[begin..begin + window, :, t]` with
/// `begin = floor(offsets[t]) - lock_index`; excluded trials stay zero in
/// the output and are reported in [`Reepoched::bad_trials`].
///
/// # Errors
///
/// - `InvalidParameter` when `offsets` does not match the trial count,
///   when every offset is non-finite, or when the derived window is empty.
/// - `OutOfBounds` when an explicit `lock_index` pushes any trial's slice
///   outside the recording. No data is copied in that case.
pub fn epoch_subset(
    data: &Array3<f64>,
    offsets: &[f64],
    lock_index: Option<i64>,
) -> Result<Reepoched> {
    let (n_samp, n_chan, n_trial) = data.dim();
    if offsets.len() != n_trial {
        return Err(Error::InvalidParameter(format!(
            "offset count {} != trial count {n_trial}",
            offsets.len()
        )));
    }

    let mut min_off = f64::INFINITY;
    let mut max_off = f64::NEG_INFINITY;
    for &off in offsets.iter().filter(|o| o.is_finite()) {
        min_off = min_off.min(off);
        max_off = max_off.max(off);
    }
    if !min_off.is_finite() {
        return Err(Error::InvalidParameter(
            "every time-lock offset is non-finite".into(),
        ));
    }

    let lock = lock_index.unwrap_or(min_off.floor() as i64);
    let window = n_samp as i64 - max_off.floor() as i64 + lock;
    if window <= 0 {
        return Err(Error::InvalidParameter(format!(
            "derived window length {window} <= 0 (offsets span the whole recording?)"
        )));
    }

    // Validate every slice before touching the output buffer.
    for (t, &off) in offsets.iter().enumerate() {
        if !off.is_finite() {
            continue;
        }
        let begin = off.floor() as i64 - lock;
        let end = begin + window;
        if begin < 0 || end > n_samp as i64 {
            return Err(Error::OutOfBounds(format!(
                "trial {t}: slice {begin}..{end} outside 0..{n_samp} (lock index {lock})"
            )));
        }
    }

    let window = window as usize;
    let mut out = Array3::<f64>::zeros((window, n_chan, n_trial));
    let mut bad_trials = Vec::new();
    for (t, &off) in offsets.iter().enumerate() {
        if off.is_finite() {
            let begin = (off.floor() as i64 - lock) as usize;
            out.slice_mut(s![.., .., t])
                .assign(&data.slice(s![begin..begin + window, .., t]));
        } else {
            bad_trials.push(t);
        }
    }

    Ok(Reepoched {
        data: out,
        lock_index: lock,
        bad_trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_data(n_samp: usize, n_chan: usize, n_trial: usize) -> Array3<f64> {
        Array3::from_shape_fn((n_samp, n_chan, n_trial), |(i, c, t)| {
            i as f64 + 1000.0 * c as f64 + 1_000_000.0 * t as f64
        })
    }

    #[test]
    fn uniform_offsets_return_truncated_original() {
        let data = ramp_data(20, 2, 3);
        let r = epoch_subset(&data, &[4.0, 4.0, 4.0], None).unwrap();
        assert_eq!(r.lock_index, 4);
        assert_eq!(r.data.dim(), (20, 2, 3));
        assert!(r.bad_trials.is_empty());
        assert_eq!(r.data, data);
    }

    #[test]
    fn shifted_trials_are_realigned() {
        let data = ramp_data(20, 1, 2);
        // trial 0 locked at 3, trial 1 at 7 → lock = 3, window = 20 - 7 + 3 = 16
        let r = epoch_subset(&data, &[3.0, 7.0], None).unwrap();
        assert_eq!(r.data.dim().0, 16);
        // trial 0 starts at sample 0, trial 1 at sample 4
        approx::assert_abs_diff_eq!(r.data[(0, 0, 0)], 0.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(r.data[(0, 0, 1)], 1_000_004.0, epsilon = 1e-12);
        // lock sample (index lock_index within window) aligns both events
        approx::assert_abs_diff_eq!(r.data[(3, 0, 0)], 3.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(r.data[(3, 0, 1)], 1_000_007.0, epsilon = 1e-12);
    }

    #[test]
    fn fractional_offsets_are_floored() {
        let data = ramp_data(20, 1, 2);
        let r = epoch_subset(&data, &[3.9, 7.2], None).unwrap();
        assert_eq!(r.lock_index, 3);
        assert_eq!(r.data.dim().0, 16);
        approx::assert_abs_diff_eq!(r.data[(0, 0, 1)], 1_000_004.0, epsilon = 1e-12);
    }

    #[test]
    fn nan_trial_left_zero_and_reported() {
        let data = ramp_data(20, 2, 3);
        let r = epoch_subset(&data, &[4.0, f64::NAN, 6.0], None).unwrap();
        assert_eq!(r.bad_trials, vec![1]);
        assert!(r.data.slice(s![.., .., 1]).iter().all(|&v| v == 0.0));
        // usable trials still populated
        assert!(r.data.slice(s![.., .., 0]).iter().any(|&v| v != 0.0));
    }

    #[test]
    fn all_nan_offsets_rejected() {
        let data = ramp_data(20, 1, 2);
        assert!(epoch_subset(&data, &[f64::NAN, f64::NAN], None).is_err());
    }

    #[test]
    fn offset_count_mismatch_rejected() {
        let data = ramp_data(20, 1, 2);
        assert!(epoch_subset(&data, &[4.0], None).is_err());
    }

    #[test]
    fn explicit_lock_index_out_of_range_is_bounds_error() {
        let data = ramp_data(20, 1, 2);
        // lock = 10 with offsets {3, 7}: trial 0 begin = -7
        let err = epoch_subset(&data, &[3.0, 7.0], Some(10)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)), "got {err:?}");
    }

    #[test]
    fn negative_lock_index_shrinks_window() {
        let data = ramp_data(20, 1, 2);
        // lock = 1 < floor(min) = 3: window = 20 - 7 + 1 = 14, begins 2 and 6
        let r = epoch_subset(&data, &[3.0, 7.0], Some(1)).unwrap();
        assert_eq!(r.data.dim().0, 14);
        approx::assert_abs_diff_eq!(r.data[(0, 0, 0)], 2.0, epsilon = 1e-12);
    }
}
