//! Epoch baselining and trial averaging.
//!
//! `baseline` re-centers each (channel, trial) series on the mean of a
//! reference window, the standard preparation before computing an ERP.
//! `trial_average` collapses the trial axis to produce that ERP.
use ndarray::{Array2, Array3, Axis, s};

use crate::error::{Error, Result};

/// Default reference window: the first 50 samples of each epoch.
const DEFAULT_WINDOW_LEN: usize = 50;

/// Re-center EEG data on a reference window.
///
/// For every (channel, trial) pair, the mean of `data[w, c, t]` over the
/// window indices `w` is subtracted from the whole series. `window`
/// defaults to the first [`DEFAULT_WINDOW_LEN`] samples; indices need not
/// be contiguous or sorted.
///
/// # Errors
///
/// `OutOfBounds` if a window index reaches past the sample axis,
/// `InvalidParameter` if the window is empty.
pub fn baseline(data: &Array3<f64>, window: Option<&[usize]>) -> Result<Array3<f64>> {
    let (n_samp, n_chan, n_trial) = data.dim();

    let default_window: Vec<usize>;
    let window = match window {
        Some(w) => w,
        None => {
            default_window = (0..DEFAULT_WINDOW_LEN).collect();
            &default_window
        }
    };

    if window.is_empty() {
        return Err(Error::InvalidParameter("baseline window is empty".into()));
    }
    if let Some(&bad) = window.iter().find(|&&w| w >= n_samp) {
        return Err(Error::OutOfBounds(format!(
            "baseline window index {bad} >= sample count {n_samp}"
        )));
    }

    let mut recentered = data.clone();
    let inv_len = 1.0 / window.len() as f64;
    for c in 0..n_chan {
        for t in 0..n_trial {
            let mean: f64 = window.iter().map(|&w| data[(w, c, t)]).sum::<f64>() * inv_len;
            recentered
                .slice_mut(s![.., c, t])
                .mapv_inplace(|v| v - mean);
        }
    }
    Ok(recentered)
}

/// Average over the trial axis, turning (sample × channel × trial) data
/// into a (sample × channel) ERP.
///
/// # Errors
///
/// `InvalidParameter` when there are no trials to average.
pub fn trial_average(data: &Array3<f64>) -> Result<Array2<f64>> {
    data.mean_axis(Axis(2))
        .ok_or_else(|| Error::InvalidParameter("cannot average zero trials".into()))
}
