//! Power-spectrum estimation of (sample × channel × trial) EEG data.
//!
//! DFT along the sample axis, normalised by sample count; power per
//! frequency bin and channel is the trial-averaged squared magnitude
//! scaled to power per Hz. The requested frequency range is clamped to
//! what the recording can actually resolve, with a warning rather than a
//! failure.
use log::warn;
use ndarray::{Array1, Array2, Array3, s};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{Error, Result};
use crate::plot::PlotSink;

/// Result of [`power_spectrum`].
#[derive(Debug, Clone)]
pub struct PowerSpectrum {
    /// Frequency bins, Hz.
    pub freqs: Array1<f64>,
    /// Power per (bin, channel): trial-mean of `|F|²` scaled by
    /// `2 / frequency resolution` (muV²/Hz for muV input), or its
    /// `10·log10` when dB output was requested.
    pub power: Array2<f64>,
    /// Fourier coefficients per (bin, channel, trial), normalised by the
    /// sample count. All trials are retained.
    pub fourier: Array3<Complex<f64>>,
}

/// Compute the power spectrum of raw EEG data.
///
/// `freq_range` selects the band of interest; `(0.0, 50.0)` covers the
/// conventional EEG bands. The upper edge is clamped to the Nyquist
/// frequency and a nonzero lower edge is clamped up to the frequency
/// resolution `sample_rate / n_samples`, each with a logged warning.
///
/// With `db` set, power is converted to `10·log10(power)`.
///
/// `sink`, when given, receives the frequency/power curves with axis
/// labels matching the unit choice; it never influences the returned
/// values.
///
/// # Errors
///
/// `InvalidParameter` on empty data, a non-positive sample rate, or a
/// frequency range that is empty or negative before clamping.
pub fn power_spectrum(
    data: &Array3<f64>,
    sample_rate: f64,
    freq_range: (f64, f64),
    db: bool,
    mut sink: Option<&mut dyn PlotSink>,
) -> Result<PowerSpectrum> {
    let (n_samp, n_chan, n_trial) = data.dim();
    if n_samp == 0 || n_chan == 0 || n_trial == 0 {
        return Err(Error::InvalidParameter(format!(
            "empty data: shape ({n_samp}, {n_chan}, {n_trial})"
        )));
    }
    if !(sample_rate > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }
    let (mut f_low, mut f_high) = freq_range;
    if !(f_high > f_low) || f_low < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "frequency range ({f_low}, {f_high}) must satisfy 0 <= low < high"
        )));
    }

    let nyquist = sample_rate / 2.0;
    if f_high > nyquist {
        warn!("maximum frequency {f_high} exceeds Nyquist {nyquist}; clamping to Nyquist");
        f_high = nyquist;
    }
    // One DFT bin per `fres` Hz; a lower edge inside the first bin cannot
    // be resolved.
    let fres = sample_rate / n_samp as f64;
    if f_low != 0.0 && f_low < fres {
        warn!("minimum frequency {f_low} below frequency resolution {fres}; clamping up");
        f_low = fres;
    }

    let fourier = fft_axis0(data);

    // Bin grid 0, fres, 2·fres, … strictly below f_high; the epsilon keeps
    // an exactly-representable f_high/fres from rounding up an extra bin.
    let n_bins = (((f_high / fres) - 1e-12).ceil().max(1.0) as usize).min(n_samp);
    let min_index = (0..n_bins)
        .min_by(|&a, &b| {
            let d1 = (f_low - a as f64 * fres).abs();
            let d2 = (f_low - b as f64 * fres).abs();
            d1.partial_cmp(&d2).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0);

    let freqs = Array1::from_iter((min_index..n_bins).map(|k| k as f64 * fres));

    let scale = 2.0 / fres;
    let inv_trials = 1.0 / n_trial as f64;
    let mut power = Array2::<f64>::zeros((n_bins - min_index, n_chan));
    for (row, k) in (min_index..n_bins).enumerate() {
        for c in 0..n_chan {
            let mut acc = 0.0;
            for t in 0..n_trial {
                acc += fourier[(k, c, t)].norm_sqr();
            }
            let p = acc * inv_trials * scale;
            power[(row, c)] = if db { 10.0 * p.log10() } else { p };
        }
    }

    if let Some(plot) = sink.as_mut() {
        let ylabel = if db {
            "Standardized log power (10*log10(muV^2/Hz); dB)"
        } else {
            "Standardized power (muV^2/Hz)"
        };
        plot.spectrum(
            freqs.view(),
            power.view(),
            "Frequency (Hz)",
            ylabel,
            "EEG power spectrum",
        );
    }

    Ok(PowerSpectrum {
        freqs,
        power,
        fourier: fourier.slice(s![min_index..n_bins, .., ..]).to_owned(),
    })
}

/// DFT along the sample axis of each (channel, trial) series, divided by
/// the sample count.
fn fft_axis0(data: &Array3<f64>) -> Array3<Complex<f64>> {
    let (n_samp, n_chan, n_trial) = data.dim();
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_samp);

    let inv_n = 1.0 / n_samp as f64;
    let mut out = Array3::<Complex<f64>>::zeros((n_samp, n_chan, n_trial));
    let mut buf = vec![Complex::default(); n_samp];
    for c in 0..n_chan {
        for t in 0..n_trial {
            for (b, &v) in buf.iter_mut().zip(data.slice(s![.., c, t]).iter()) {
                *b = Complex::new(v, 0.0);
            }
            fft.process(&mut buf);
            for (i, &v) in buf.iter().enumerate() {
                out[(i, c, t)] = v * inv_n;
            }
        }
    }
    out
}
