//! Injected plotting seam.
//!
//! The numeric core never draws anything itself. Callers that want the
//! diagnostic plots the original analysis scripts produced (filter
//! frequency responses, power-spectrum curves) pass a [`PlotSink`]; the
//! core pushes data into it and reads nothing back. Passing `None`
//! everywhere keeps the library fully headless.

use ndarray::{ArrayView1, ArrayView2};

/// Receiver for diagnostic plot data.
///
/// Both methods have no-op default bodies so a sink only implements the
/// plots it cares about. Implementations must not assume they are called:
/// every call site is gated on an optional flag or parameter.
pub trait PlotSink {
    /// Magnitude response of a designed filter stage, sampled on
    /// `[0, Nyquist]`. `freqs` is in Hz, `magnitude` is linear gain.
    fn frequency_response(&mut self, freqs: &[f64], magnitude: &[f64], title: &str) {
        let _ = (freqs, magnitude, title);
    }

    /// Power-spectrum curve: one power column per channel over `freqs`.
    /// Axis labels are pre-formatted (they differ between dB and linear
    /// units).
    fn spectrum(
        &mut self,
        freqs: ArrayView1<f64>,
        power: ArrayView2<f64>,
        xlabel: &str,
        ylabel: &str,
        title: &str,
    ) {
        let _ = (freqs, power, xlabel, ylabel, title);
    }
}

/// Sink that records what it was shown. Intended for tests and for
/// callers that forward plot data to an external renderer later.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// `(title, freqs, magnitude)` per frequency-response call.
    pub responses: Vec<(String, Vec<f64>, Vec<f64>)>,
    /// `(title, ylabel, n_freqs)` per spectrum call.
    pub spectra: Vec<(String, String, usize)>,
}

impl PlotSink for RecordingSink {
    fn frequency_response(&mut self, freqs: &[f64], magnitude: &[f64], title: &str) {
        self.responses
            .push((title.to_string(), freqs.to_vec(), magnitude.to_vec()));
    }

    fn spectrum(
        &mut self,
        freqs: ArrayView1<f64>,
        _power: ArrayView2<f64>,
        _xlabel: &str,
        ylabel: &str,
        title: &str,
    ) {
        self.spectra
            .push((title.to_string(), ylabel.to_string(), freqs.len()));
    }
}
