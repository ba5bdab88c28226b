//! Library error type.
//!
//! Every fallible operation in the crate returns [`enum@Error`]. The two
//! variants mirror the two ways a call can go wrong: the caller handed us
//! parameters that make no sense ([`Error::InvalidParameter`]), or a
//! computed index would have left the array ([`Error::OutOfBounds`]).
//! Recoverable conditions (clamped frequency ranges, absent onsets) are
//! not errors and are handled in-band by the functions concerned.

/// Errors produced by `eegproc` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter violates a documented precondition (non-increasing
    /// filter bands, all-NaN offset vector, zero-length window, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A computed slice or index falls outside the array bounds.
    #[error("index out of bounds: {0}")]
    OutOfBounds(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
