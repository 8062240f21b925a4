//! Windowed-sinc FIR coefficient design.
//!
//! Produces the low-pass tap sequences consumed by the filter engines
//! and the interpolator's anti-alias stage. Hamming-windowed sinc,
//! normalized so the DC gain equals the requested gain.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::error::{DspError, Result};

/// Low-pass design parameters, serializable so tap designs can live in
/// configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LowPassSpec {
    /// DC gain of the designed filter.
    pub gain: f32,
    /// Sample rate the cutoff is expressed against, in Hz.
    pub sample_rate: f32,
    /// Cutoff frequency in Hz, in `(0, sample_rate / 2]`.
    pub cutoff: f32,
    /// Number of taps; more taps give a sharper transition.
    pub num_taps: usize,
}

impl LowPassSpec {
    /// Design the tap sequence described by this spec.
    pub fn design(&self) -> Result<Vec<f32>> {
        low_pass(self.gain, self.sample_rate, self.cutoff, self.num_taps)
    }
}

impl Default for LowPassSpec {
    fn default() -> Self {
        Self {
            gain: 1.0,
            sample_rate: 1.0,
            cutoff: 0.25,
            num_taps: 63,
        }
    }
}

/// Designs a Hamming-windowed sinc low-pass filter.
///
/// `cutoff` is in the same unit as `sample_rate` and must lie in
/// `(0, sample_rate / 2]`; passing the Nyquist frequency itself yields a
/// (near-)allpass design. Taps are normalized so their sum equals
/// `gain`.
pub fn low_pass(gain: f32, sample_rate: f32, cutoff: f32, num_taps: usize) -> Result<Vec<f32>> {
    if num_taps == 0 {
        return Err(DspError::FilterDesign("num_taps must be > 0".to_string()));
    }
    if !(cutoff > 0.0 && cutoff <= sample_rate / 2.0) {
        return Err(DspError::FilterDesign(format!(
            "cutoff {} outside (0, {}]",
            cutoff,
            sample_rate / 2.0
        )));
    }

    let omega_c = 2.0 * PI * cutoff / sample_rate;
    let alpha = (num_taps - 1) as f32 / 2.0;

    let mut taps = Vec::with_capacity(num_taps);
    for n in 0..num_taps {
        let x = n as f32 - alpha;
        let sinc = if x == 0.0 {
            omega_c / PI
        } else {
            (omega_c * x).sin() / (PI * x)
        };
        taps.push(sinc * hamming(n, num_taps));
    }

    // Normalize so the DC response is exactly `gain`.
    let sum: f32 = taps.iter().sum();
    let scale = gain / sum;
    for tap in taps.iter_mut() {
        *tap *= scale;
    }

    Ok(taps)
}

fn hamming(n: usize, num_taps: usize) -> f32 {
    if num_taps == 1 {
        return 1.0;
    }
    0.54 - 0.46 * (2.0 * PI * n as f32 / (num_taps - 1) as f32).cos()
}
