//! Integer-ratio upsampling with anti-alias filtering.
//!
//! Two expansion strategies feed the same low-pass stage: linear
//! interpolation between consecutive samples (lower image energy,
//! slight distortion) and classic zero-stuffing (exact spectrum scaled
//! by the ratio, stronger images for the filter to remove). Callers
//! pick the variant matching their noise/distortion tradeoff.

use num_complex::Complex32;

use crate::error::{DspError, Result};
use crate::filter::fir::{Fir, FloatFir};
use crate::firdes;

/// Tap count of the anti-alias low-pass stage.
const ANTI_ALIAS_TAPS: usize = 63;

/// Upsamples a complex stream by an integer ratio.
///
/// [`work`](Self::work) inserts `ratio - 1` linearly interpolated
/// samples between each pair of consecutive inputs and low-pass filters
/// the expanded stream at `1 / (2 * ratio)` to suppress the spectral
/// images. A one-sample carry makes the interpolation seamless across
/// block boundaries: the first segment of a block interpolates from the
/// previous block's final sample, placing a fixed one-sample latency on
/// the stream.
pub struct Interpolator {
    fir: Fir,
    ratio: usize,
    carry: Complex32,
}

impl Interpolator {
    pub fn new(ratio: usize) -> Result<Self> {
        if ratio < 1 {
            return Err(DspError::FilterDesign(
                "interpolation ratio must be >= 1".to_string(),
            ));
        }
        let taps = firdes::low_pass(1.0, 1.0, 1.0 / (2 * ratio) as f32, ANTI_ALIAS_TAPS)?;
        Ok(Self {
            fir: Fir::new(taps),
            ratio,
            carry: Complex32::default(),
        })
    }

    /// Expands `data` by the interpolation ratio with linear fill, then
    /// anti-alias filters the result. Output length is always
    /// `data.len() * ratio`.
    pub fn work(&mut self, data: &[Complex32]) -> Vec<Complex32> {
        let mut samples = Vec::with_capacity(data.len() + 1);
        samples.push(self.carry);
        samples.extend_from_slice(data);

        let mut output = vec![Complex32::default(); data.len() * self.ratio];
        expand_linear(&samples, self.ratio, &mut output);

        self.fir.filter(&mut output);
        if let Some(&last) = data.last() {
            self.carry = last;
        }
        output
    }

    /// Zero-stuffing variant into a caller-supplied buffer: input
    /// samples land at stride `ratio` with zeros between, then the same
    /// anti-alias filter runs over the expanded block. No carry is
    /// involved. Returns the number of samples produced.
    ///
    /// Fails with [`DspError::InsufficientOutput`] when `output` is
    /// shorter than `input.len() * ratio`; nothing is written in that
    /// case.
    pub fn work_buffer(&mut self, input: &[Complex32], output: &mut [Complex32]) -> Result<usize> {
        let length = input.len() * self.ratio;
        if output.len() < length {
            return Err(DspError::InsufficientOutput {
                needed: length,
                available: output.len(),
            });
        }
        expand_zero_stuffed(input, self.ratio, output);
        self.fir.filter(&mut output[..length]);
        Ok(length)
    }

    /// Output length for a given input length: exactly
    /// `input_length * ratio`.
    pub fn predict_output_size(&self, input_length: usize) -> usize {
        input_length * self.ratio
    }

    pub fn ratio(&self) -> usize {
        self.ratio
    }
}

/// Upsamples a real stream by an integer ratio using zero-stuffing and
/// the same anti-alias low-pass design as [`Interpolator`].
pub struct FloatInterpolator {
    fir: FloatFir,
    ratio: usize,
}

impl FloatInterpolator {
    pub fn new(ratio: usize) -> Result<Self> {
        if ratio < 1 {
            return Err(DspError::FilterDesign(
                "interpolation ratio must be >= 1".to_string(),
            ));
        }
        let taps = firdes::low_pass(1.0, 1.0, 1.0 / (2 * ratio) as f32, ANTI_ALIAS_TAPS)?;
        Ok(Self {
            fir: FloatFir::new(taps),
            ratio,
        })
    }

    /// Zero-stuffs `data` by the interpolation ratio and anti-alias
    /// filters the result into a new buffer of `data.len() * ratio`.
    pub fn work(&mut self, data: &[f32]) -> Vec<f32> {
        let mut output = vec![0.0; data.len() * self.ratio];
        expand_zero_stuffed(data, self.ratio, &mut output);
        self.fir.filter(&mut output);
        output
    }

    /// Caller-buffer variant of [`work`](Self::work).
    ///
    /// Fails with [`DspError::InsufficientOutput`] when `output` is
    /// shorter than `input.len() * ratio`; nothing is written in that
    /// case.
    pub fn work_buffer(&mut self, input: &[f32], output: &mut [f32]) -> Result<usize> {
        let length = input.len() * self.ratio;
        if output.len() < length {
            return Err(DspError::InsufficientOutput {
                needed: length,
                available: output.len(),
            });
        }
        expand_zero_stuffed(input, self.ratio, output);
        self.fir.filter(&mut output[..length]);
        Ok(length)
    }

    pub fn predict_output_size(&self, input_length: usize) -> usize {
        input_length * self.ratio
    }

    pub fn ratio(&self) -> usize {
        self.ratio
    }
}

/// Linear expansion of `samples` (carry plus block, `n + 1` elements)
/// into `n * ratio` output slots: `samples[i]` lands at `i * ratio`,
/// followed by `ratio - 1` points interpolated towards `samples[i + 1]`.
fn expand_linear(samples: &[Complex32], ratio: usize, output: &mut [Complex32]) {
    let n = samples.len() - 1;
    for i in 0..n {
        let idx = i * ratio;
        let current = samples[i];
        let delta = samples[i + 1] - current;

        output[idx] = current;
        for j in 1..ratio {
            let t = j as f32 / ratio as f32;
            output[idx + j] = current + delta * t;
        }
    }
}

/// Zero-stuffing expansion: `input[i]` lands at `i * ratio`, the slots
/// between are zeroed.
fn expand_zero_stuffed<S: Copy + Default>(input: &[S], ratio: usize, output: &mut [S]) {
    for (i, &sample) in input.iter().enumerate() {
        let idx = i * ratio;
        output[idx] = sample;
        for slot in output[idx + 1..idx + ratio].iter_mut() {
            *slot = S::default();
        }
    }
}
