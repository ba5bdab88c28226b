//! # eegproc — offline EEG signal processing
//!
//! `eegproc` implements the numeric core of an offline ERP analysis
//! pipeline over dense `ndarray` arrays shaped (sample × channel × trial):
//!
//! ```text
//! raw (sample × channel × trial)
//!   │
//!   ├─ bandpass_filter()     Butterworth passband + optional notch,
//!   │                        zero-phase (forward-backward) along samples
//!   ├─ baseline()            subtract per-(channel, trial) window mean
//!   ├─ epoch_subset()        realign trials to per-trial time-lock
//!   │                        offsets; NaN offsets → bad_trials
//!   ├─ trial_average()       collapse trials → ERP (sample × channel)
//!   ├─ find_deflection()     first sustained sub-cutoff run per channel
//!   └─ power_spectrum()      trial-averaged power per Hz, per channel
//! ```
//!
//! Every function is a pure array transform: no shared state, no I/O.
//! Diagnostic plots (filter frequency responses, spectrum curves) go
//! through an injected [`PlotSink`] and never feed back into the
//! numerics.
//!
//! ## Quick start
//!
//! ```
//! use eegproc::{bandpass_filter, baseline, epoch_subset, power_spectrum};
//! use ndarray::Array3;
//!
//! // 2 s of 4-channel data across 8 trials at 256 Hz
//! let data = Array3::<f64>::zeros((512, 4, 8));
//!
//! // 1-50 Hz passband plus a 60 Hz notch, both zero-phase
//! let filtered =
//!     bandpass_filter(&data, 256.0, (1.0, 50.0), Some((59.0, 61.0)), (5, 5), None).unwrap();
//!
//! // re-center on the first 50 samples
//! let centered = baseline(&filtered, None).unwrap();
//!
//! // realign trials on per-trial response latencies (NaN = discard)
//! let offsets = vec![100.0; 8];
//! let reepoched = epoch_subset(&centered, &offsets, None).unwrap();
//! assert!(reepoched.bad_trials.is_empty());
//!
//! // spectrum of the conventional EEG bands
//! let ps = power_spectrum(&centered, 256.0, (0.0, 50.0), false, None).unwrap();
//! assert_eq!(ps.power.ncols(), 4);
//! ```

pub mod baseline;
pub mod epoch;
pub mod error;
pub mod filter;
pub mod onset;
pub mod plot;
pub mod spectrum;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// The full public surface is reachable as `eegproc::foo` without knowing
// the module layout.

pub use error::{Error, Result};

pub use filter::{
    bandpass_filter,
    butter_bandpass, butter_bandstop, sos_frequency_response, Sos,
    filtfilt_1d, filtfilt_axis0,
};

pub use baseline::{baseline, trial_average};

pub use epoch::{epoch_subset, Reepoched};

pub use onset::find_deflection;

pub use spectrum::{power_spectrum, PowerSpectrum};

pub use plot::{PlotSink, RecordingSink};
