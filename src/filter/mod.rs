//! Butterworth filtering of (sample × channel × trial) EEG arrays.
//!
//! - [`design`]: Butterworth band-pass / band-stop coefficient design as
//!   cascaded second-order sections, matching
//!   `scipy.signal.butter(order, edges / nyquist, output='sos')`.
//! - [`apply`]: zero-phase forward-backward application, matching
//!   `scipy.signal.sosfiltfilt` along the sample axis.
//! - [`bandpass_filter`]: the combined operation — band-pass the raw
//!   signal and optionally notch out powerline interference.

pub mod apply;
pub mod design;

pub use apply::{filtfilt_1d, filtfilt_axis0};
pub use design::{butter_bandpass, butter_bandstop, sos_frequency_response, Sos};

use ndarray::Array3;

use crate::error::Result;
use crate::plot::PlotSink;

/// Number of points used when reporting a frequency response to a sink.
const FREQZ_POINTS: usize = 512;

/// Band-pass (and optionally notch) filter raw EEG data.
///
/// Designs a Butterworth band-pass filter of order `order.0` at the
/// `passband` edges and applies it zero-phase along the sample axis of
/// `data` (shape sample × channel × trial). When `stopband` is present, a
/// band-stop filter of order `order.1` is designed at its edges and
/// applied to the band-passed output — use `(59.0, 61.0)` against 60 Hz
/// powerline interference, `(49.0, 51.0)` against 50 Hz.
///
/// `sink`, when given, receives the magnitude response of each designed
/// stage before it is applied; the sink never influences the returned
/// data.
///
/// # Errors
///
/// `InvalidParameter` when either band is not strictly increasing inside
/// `(0, sample_rate / 2)`, when an order is zero, or when the sample axis
/// is shorter than two samples.
pub fn bandpass_filter(
    data: &Array3<f64>,
    sample_rate: f64,
    passband: (f64, f64),
    stopband: Option<(f64, f64)>,
    order: (usize, usize),
    mut sink: Option<&mut dyn PlotSink>,
) -> Result<Array3<f64>> {
    let sos_pass = design::butter_bandpass(order.0, passband.0, passband.1, sample_rate)?;
    if let Some(s) = sink.as_mut() {
        let (freqs, mags) = design::sos_frequency_response(&sos_pass, FREQZ_POINTS, sample_rate);
        s.frequency_response(
            &freqs,
            &mags,
            &format!("Butterworth passband frequency response, order = {}", order.0),
        );
    }
    let mut filtered = apply::filtfilt_axis0(data, &sos_pass)?;

    if let Some((low, high)) = stopband {
        let sos_stop = design::butter_bandstop(order.1, low, high, sample_rate)?;
        if let Some(s) = sink.as_mut() {
            let (freqs, mags) = design::sos_frequency_response(&sos_stop, FREQZ_POINTS, sample_rate);
            s.frequency_response(
                &freqs,
                &mags,
                &format!("Butterworth stopband frequency response, order = {}", order.1),
            );
        }
        filtered = apply::filtfilt_axis0(&filtered, &sos_stop)?;
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::RecordingSink;

    fn sine_data(freq_hz: f64, sample_rate: f64, n: usize) -> Array3<f64> {
        Array3::from_shape_fn((n, 1, 1), |(i, _, _)| {
            (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate).sin()
        })
    }

    #[test]
    fn shape_preserved() {
        let data = Array3::<f64>::zeros((300, 3, 2));
        let out = bandpass_filter(&data, 256.0, (1.0, 50.0), None, (5, 5), None).unwrap();
        assert_eq!(out.dim(), (300, 3, 2));
    }

    #[test]
    fn stopband_stage_skipped_when_absent() {
        // Without a stopband only one response reaches the sink.
        let data = sine_data(10.0, 500.0, 1000);
        let mut sink = RecordingSink::default();
        bandpass_filter(&data, 500.0, (1.0, 100.0), None, (5, 5), Some(&mut sink)).unwrap();
        assert_eq!(sink.responses.len(), 1);
        assert!(sink.responses[0].0.contains("passband"));
    }

    #[test]
    fn stopband_stage_reported_when_present() {
        let data = sine_data(10.0, 500.0, 1000);
        let mut sink = RecordingSink::default();
        bandpass_filter(
            &data,
            500.0,
            (1.0, 100.0),
            Some((59.0, 61.0)),
            (5, 3),
            Some(&mut sink),
        )
        .unwrap();
        assert_eq!(sink.responses.len(), 2);
        assert!(sink.responses[1].0.contains("order = 3"));
    }

    #[test]
    fn sink_does_not_change_output() {
        let data = sine_data(10.0, 500.0, 1000);
        let mut sink = RecordingSink::default();
        let with_sink = bandpass_filter(
            &data,
            500.0,
            (1.0, 100.0),
            Some((59.0, 61.0)),
            (5, 5),
            Some(&mut sink),
        )
        .unwrap();
        let without =
            bandpass_filter(&data, 500.0, (1.0, 100.0), Some((59.0, 61.0)), (5, 5), None).unwrap();
        assert_eq!(with_sink, without);
    }

    #[test]
    fn invalid_stopband_is_rejected() {
        let data = Array3::<f64>::zeros((100, 1, 1));
        let res = bandpass_filter(&data, 256.0, (1.0, 50.0), Some((61.0, 59.0)), (5, 5), None);
        assert!(res.is_err());
    }

    #[test]
    fn default_sink_methods_are_noops() {
        struct Quiet;
        impl crate::plot::PlotSink for Quiet {}
        let mut q = Quiet;
        q.frequency_response(&[0.0], &[1.0], "t");
    }
}
