//! Butterworth IIR design producing second-order sections.
//!
//! Follows the classical scipy `butter(..., output='sos')` pipeline:
//! analog lowpass prototype poles, frequency prewarp, lowpass→bandpass or
//! lowpass→bandstop transform, bilinear transform, conjugate-pair grouping
//! into biquads. The cascade gain is normalised empirically: unit
//! magnitude at the geometric band centre (bandpass) or at DC (bandstop),
//! which for Butterworth filters is the exact analytic gain.
use std::f64::consts::PI;

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

/// One second-order section of a cascaded IIR filter.
///
/// Transfer function with `a0` normalised to 1:
/// `H(z) = (b0 + b1 z⁻¹ + b2 z⁻²) / (1 + a1 z⁻¹ + a2 z⁻²)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Design a Butterworth band-pass filter as `order` biquad sections.
///
/// `low_hz` / `high_hz` are the -3 dB edges. The resulting cascade has
/// `2 * order` poles (scipy's `btype='bandpass'` convention: the prototype
/// order doubles under the band transform).
pub fn butter_bandpass(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> Result<Vec<Sos>> {
    check_band(order, low_hz, high_hz, sample_rate)?;
    let (w1, w2) = prewarp(low_hz, high_hz, sample_rate);
    let wo = (w1 * w2).sqrt();
    let bw = w2 - w1;

    // Lowpass prototype poles → bandpass analog poles: each prototype pole
    // p maps to the two roots of s² - (p·bw)·s + wo² = 0.
    let mut poles = Vec::with_capacity(2 * order);
    for p in prototype_poles(order) {
        let half = p * (bw / 2.0);
        let disc = (half * half - Complex::new(wo * wo, 0.0)).sqrt();
        poles.push(half + disc);
        poles.push(half - disc);
    }
    let poles_z: Vec<Complex<f64>> = poles.into_iter().map(bilinear).collect();

    // Zeros: `order` at z = +1 (from s = 0) and `order` at z = -1 (from
    // s = ∞), so every section shares the numerator z² - 1.
    let mut sections = sections_from_poles(&poles_z, 1.0, 0.0, -1.0)?;

    // Normalise at the digital band centre.
    let w_center = 2.0 * (wo / BILINEAR_FS2).atan();
    normalize_gain(&mut sections, w_center);
    Ok(sections)
}

/// Design a Butterworth band-stop (notch) filter as `order` biquad sections.
///
/// Rejects `low_hz..high_hz`; for powerline interference use `(59, 61)` in
/// 60 Hz countries and `(49, 51)` elsewhere.
pub fn butter_bandstop(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> Result<Vec<Sos>> {
    check_band(order, low_hz, high_hz, sample_rate)?;
    let (w1, w2) = prewarp(low_hz, high_hz, sample_rate);
    let wo = (w1 * w2).sqrt();
    let bw = w2 - w1;

    // Lowpass prototype poles → bandstop analog poles: invert the pole
    // first (s → bw/(2s)), then the same quadratic split as bandpass.
    let mut poles = Vec::with_capacity(2 * order);
    for p in prototype_poles(order) {
        let half = (bw / 2.0) / p;
        let disc = (half * half - Complex::new(wo * wo, 0.0)).sqrt();
        poles.push(half + disc);
        poles.push(half - disc);
    }
    let poles_z: Vec<Complex<f64>> = poles.into_iter().map(bilinear).collect();

    // Zeros: all on the unit circle at the rejected centre frequency,
    // ±j·wo in the s-plane. Each section gets one conjugate pair:
    // z² - 2·Re(zd)·z + 1.
    let zd = bilinear(Complex::new(0.0, wo));
    let mut sections = sections_from_poles(&poles_z, 1.0, -2.0 * zd.re, 1.0)?;

    // Notch passes DC; normalise there.
    normalize_gain(&mut sections, 0.0);
    Ok(sections)
}

/// Magnitude response of an SOS cascade on `n_points` frequencies spanning
/// `[0, Nyquist]`. Returns `(frequencies_hz, magnitude)`.
pub fn sos_frequency_response(sos: &[Sos], n_points: usize, sample_rate: f64) -> (Vec<f64>, Vec<f64>) {
    let n = n_points.max(2);
    let mut freqs = Vec::with_capacity(n);
    let mut mags = Vec::with_capacity(n);
    for k in 0..n {
        let w = PI * k as f64 / (n - 1) as f64;
        freqs.push(w / PI * sample_rate / 2.0);
        mags.push(cascade_response(sos, w).norm());
    }
    (freqs, mags)
}

/// Evaluate the cascade transfer function at digital frequency `w`
/// (radians/sample).
fn cascade_response(sos: &[Sos], w: f64) -> Complex<f64> {
    let z = Complex::from_polar(1.0, w);
    let z2 = z * z;
    let mut h = Complex::new(1.0, 0.0);
    for s in sos {
        let num = z2 * s.b0 + z * s.b1 + s.b2;
        let den = z2 + z * s.a1 + s.a2;
        h *= num / den;
    }
    h
}

// ── Design helpers ───────────────────────────────────────────────────────

/// Bilinear-transform sampling constant. The design runs at a normalised
/// rate of 2 Hz (band edges expressed as fractions of Nyquist), so the
/// doubled rate used by the transform is 4.
const BILINEAR_FS2: f64 = 4.0;

/// Left-half-plane poles of the analog Butterworth lowpass prototype,
/// evenly spaced on the unit circle.
fn prototype_poles(order: usize) -> Vec<Complex<f64>> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex::from_polar(1.0, theta)
        })
        .collect()
}

/// Prewarp the band edges for the bilinear transform. Input in Hz,
/// output in the normalised analog domain.
fn prewarp(low_hz: f64, high_hz: f64, sample_rate: f64) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    let w1 = BILINEAR_FS2 * (PI * (low_hz / nyquist) / 2.0).tan();
    let w2 = BILINEAR_FS2 * (PI * (high_hz / nyquist) / 2.0).tan();
    (w1, w2)
}

/// Map one analog root to the z-plane: z = (fs2 + s) / (fs2 - s).
fn bilinear(s: Complex<f64>) -> Complex<f64> {
    (Complex::new(BILINEAR_FS2, 0.0) + s) / (Complex::new(BILINEAR_FS2, 0.0) - s)
}

/// Group z-plane poles into conjugate pairs and emit one biquad per pair,
/// all sharing the numerator `(b0, b1, b2)`.
fn sections_from_poles(poles: &[Complex<f64>], b0: f64, b1: f64, b2: f64) -> Result<Vec<Sos>> {
    const TOL: f64 = 1e-8;
    let mut upper: Vec<Complex<f64>> = poles.iter().copied().filter(|p| p.im > TOL).collect();
    let mut reals: Vec<f64> = poles
        .iter()
        .filter(|p| p.im.abs() <= TOL)
        .map(|p| p.re)
        .collect();

    // A real filter has conjugate-symmetric poles, so the leftover real
    // count is even; if rounding broke the symmetry, demote the most
    // nearly-real complex pole.
    if reals.len() % 2 == 1 {
        upper.sort_by(|a, b| {
            b.im.abs()
                .partial_cmp(&a.im.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        match upper.pop() {
            Some(p) => reals.push(p.re),
            None => {
                return Err(Error::InvalidParameter(
                    "filter design produced an unpairable pole set".into(),
                ))
            }
        }
    }
    reals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut sections = Vec::with_capacity(upper.len() + reals.len() / 2);
    for p in upper {
        // (z - p)(z - p̄) = z² - 2·Re(p)·z + |p|²
        sections.push(Sos {
            b0,
            b1,
            b2,
            a1: -2.0 * p.re,
            a2: p.norm_sqr(),
        });
    }
    for pair in reals.chunks_exact(2) {
        sections.push(Sos {
            b0,
            b1,
            b2,
            a1: -(pair[0] + pair[1]),
            a2: pair[0] * pair[1],
        });
    }
    Ok(sections)
}

/// Scale the cascade so its magnitude is 1 at digital frequency `w_ref`,
/// distributing the correction evenly to keep per-section coefficients
/// balanced.
fn normalize_gain(sections: &mut [Sos], w_ref: f64) {
    let mag = cascade_response(sections, w_ref).norm();
    if mag <= 0.0 || !mag.is_finite() {
        return;
    }
    let per_section = (1.0 / mag).powf(1.0 / sections.len() as f64);
    for s in sections.iter_mut() {
        s.b0 *= per_section;
        s.b1 *= per_section;
        s.b2 *= per_section;
    }
}

/// Validate band edges against the Nyquist frequency.
fn check_band(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> Result<()> {
    if order == 0 {
        return Err(Error::InvalidParameter("filter order must be at least 1".into()));
    }
    if !(sample_rate > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }
    let nyquist = sample_rate / 2.0;
    if !(0.0 < low_hz && low_hz < high_hz && high_hz < nyquist) {
        return Err(Error::InvalidParameter(format!(
            "band edges must satisfy 0 < {low_hz} < {high_hz} < Nyquist ({nyquist})"
        )));
    }
    Ok(())
}
