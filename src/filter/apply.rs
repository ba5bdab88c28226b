//! Zero-phase (forward-backward) application of SOS cascades.
//!
//! The scipy `sosfiltfilt` scheme: extend the signal by odd reflection
//! about its endpoints, run the cascade forward and then backward with
//! steady-state initial conditions, and strip the extension. Running the
//! filter in both directions cancels the phase response, so every feature
//! of the output stays aligned with the input.
use ndarray::{Array3, ArrayViewMut1, s};

use crate::error::{Error, Result};
use crate::filter::design::Sos;

/// Zero-phase filter a single series.
///
/// Returns a vector of the same length as `x`. The effective magnitude
/// response is the square of the cascade's, and the net phase shift is
/// zero.
pub fn filtfilt_1d(x: &[f64], sos: &[Sos]) -> Result<Vec<f64>> {
    if sos.is_empty() {
        return Err(Error::InvalidParameter("empty filter cascade".into()));
    }
    let n = x.len();
    if n < 2 {
        return Err(Error::InvalidParameter(format!(
            "signal too short to filter ({n} samples)"
        )));
    }

    // scipy's sosfiltfilt default, clamped for short signals.
    let padlen = (3 * (2 * sos.len() + 1)).min(n - 1);

    let mut ext = odd_reflect_extend(x, padlen);
    let zi = steady_state_zi(sos);

    let x0 = ext[0];
    sosfilt_in_place(sos, &mut ext, &zi, x0);
    ext.reverse();
    let x0 = ext[0];
    sosfilt_in_place(sos, &mut ext, &zi, x0);
    ext.reverse();

    Ok(ext[padlen..padlen + n].to_vec())
}

/// Zero-phase filter every (channel, trial) series of a
/// (sample × channel × trial) array along the sample axis.
pub fn filtfilt_axis0(data: &Array3<f64>, sos: &[Sos]) -> Result<Array3<f64>> {
    let (_, n_chan, n_trial) = data.dim();
    let mut out = data.clone();
    for c in 0..n_chan {
        for t in 0..n_trial {
            let series: Vec<f64> = data.slice(s![.., c, t]).to_vec();
            let filtered = filtfilt_1d(&series, sos)?;
            assign_lane(out.slice_mut(s![.., c, t]), &filtered);
        }
    }
    Ok(out)
}

fn assign_lane(mut lane: ArrayViewMut1<f64>, values: &[f64]) {
    for (dst, &src) in lane.iter_mut().zip(values) {
        *dst = src;
    }
}

// ── Filtering primitives ─────────────────────────────────────────────────

/// Run the cascade over `x` in place (direct form II transposed), with
/// each section's state seeded as `zi[k] * x0`.
fn sosfilt_in_place(sos: &[Sos], x: &mut [f64], zi: &[[f64; 2]], x0: f64) {
    let mut state: Vec<[f64; 2]> = zi.iter().map(|z| [z[0] * x0, z[1] * x0]).collect();
    for v in x.iter_mut() {
        let mut acc = *v;
        for (sec, st) in sos.iter().zip(state.iter_mut()) {
            let y = sec.b0 * acc + st[0];
            st[0] = sec.b1 * acc - sec.a1 * y + st[1];
            st[1] = sec.b2 * acc - sec.a2 * y;
            acc = y;
        }
        *v = acc;
    }
}

/// Per-section steady-state response to a unit step, with the cumulative
/// DC gain of preceding sections folded in (scipy `sosfilt_zi`). Seeding
/// the delay lines with these values suppresses the startup transient
/// that zero initial conditions would inject into the padded region.
fn steady_state_zi(sos: &[Sos]) -> Vec<[f64; 2]> {
    let mut scale = 1.0;
    let mut zi = Vec::with_capacity(sos.len());
    for s in sos {
        let den = 1.0 + s.a1 + s.a2;
        let h1 = if den.abs() > f64::EPSILON {
            (s.b0 + s.b1 + s.b2) / den
        } else {
            0.0
        };
        zi.push([scale * (h1 - s.b0), scale * (s.b2 - s.a2 * h1)]);
        scale *= h1;
    }
    zi
}

/// Extend `x` by `padlen` samples on each side, odd-reflected about the
/// endpoint values so the signal and its slope stay continuous.
fn odd_reflect_extend(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    let mut ext = Vec::with_capacity(n + 2 * padlen);
    let first = x[0];
    for i in (1..=padlen).rev() {
        ext.push(2.0 * first - x[i]);
    }
    ext.extend_from_slice(x);
    let last = x[n - 1];
    for i in 1..=padlen {
        ext.push(2.0 * last - x[n - 1 - i]);
    }
    ext
}
