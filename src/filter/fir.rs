//! Streaming FIR convolution with optional integer decimation.
//!
//! A filter owns its tap sequence and a rolling history of the most
//! recent input samples, so consecutive calls behave exactly like one
//! continuous convolution over the whole stream no matter how the
//! caller splits it into blocks.

use num_complex::Complex32;

use crate::error::{DspError, Result};
use crate::kernels;

/// Binds a (sample, tap) type pair to its registry dot-product
/// primitive.
pub trait Dot<T>: Copy + Default {
    fn dot(input: &[Self], taps: &[T]) -> Self;
}

impl Dot<Complex32> for Complex32 {
    fn dot(input: &[Self], taps: &[Complex32]) -> Self {
        kernels::complex_dot_product(input, taps)
    }
}

impl Dot<f32> for Complex32 {
    fn dot(input: &[Self], taps: &[f32]) -> Self {
        kernels::dot_product(input, taps)
    }
}

impl Dot<f32> for f32 {
    fn dot(input: &[Self], taps: &[f32]) -> Self {
        kernels::float_dot_product(input, taps)
    }
}

/// Complex samples filtered against complex taps.
pub type ComplexFir = FirFilter<Complex32, Complex32>;
/// Complex samples filtered against real taps.
pub type Fir = FirFilter<Complex32, f32>;
/// Real samples filtered against real taps.
pub type FloatFir = FirFilter<f32, f32>;

/// Streaming FIR filter over sample type `S` with taps of type `T`.
///
/// The non-decimating paths keep a full tap-length history tail (one
/// sample more than the minimal N-1), trading a little memory for
/// simpler bookkeeping. The decimating paths instead retain exactly the
/// samples from the first output position that could not be computed
/// yet, so no sample is ever dropped or convolved twice across calls.
pub struct FirFilter<S, T> {
    taps: Vec<T>,
    history: Vec<S>,
    decimation: usize,
}

impl<S: Dot<T>, T: Copy> FirFilter<S, T> {
    /// Create a non-decimating filter with the given taps.
    pub fn new(taps: Vec<T>) -> Self {
        debug_assert!(!taps.is_empty(), "taps must not be empty");
        Self {
            history: vec![S::default(); taps.len()],
            taps,
            decimation: 1,
        }
    }

    /// Create a filter that emits one output per `decimation` inputs
    /// when driven through [`work`](Self::work) /
    /// [`work_buffer`](Self::work_buffer).
    pub fn decimating(decimation: usize, taps: Vec<T>) -> Self {
        debug_assert!(decimation >= 1, "decimation must be >= 1");
        let mut filter = Self::new(taps);
        filter.decimation = decimation;
        filter
    }

    /// In-place convolution: every element of `data` is replaced by the
    /// convolved stream value at its position. History advances by
    /// `data.len()` samples.
    pub fn filter(&mut self, data: &mut [S]) {
        let samples = self.concat(data);
        let n = self.taps.len();
        for (i, slot) in data.iter_mut().enumerate() {
            *slot = S::dot(&samples[i..i + n], &self.taps);
        }
        let start = samples.len().saturating_sub(n);
        self.retain_history(&samples, start);
    }

    /// Convolves `data` into a freshly allocated output of the same
    /// length.
    pub fn filter_out(&mut self, data: &[S]) -> Vec<S> {
        let samples = self.concat(data);
        let length = samples.len().saturating_sub(self.taps.len());
        let mut output = Vec::with_capacity(length);
        for i in 0..length {
            output.push(S::dot(&samples[i..], &self.taps));
        }
        self.retain_history(&samples, length);
        output
    }

    /// Convolves `data` into a caller-supplied buffer, returning the
    /// number of samples produced.
    ///
    /// Fails with [`DspError::InsufficientOutput`] when `output` cannot
    /// hold every produced sample; nothing is written and no history
    /// advances in that case.
    pub fn filter_buffer(&mut self, input: &[S], output: &mut [S]) -> Result<usize> {
        let samples = self.concat(input);
        let length = samples.len().saturating_sub(self.taps.len());
        if output.len() < length {
            return Err(DspError::InsufficientOutput {
                needed: length,
                available: output.len(),
            });
        }
        for (i, slot) in output.iter_mut().take(length).enumerate() {
            *slot = S::dot(&samples[i..], &self.taps);
        }
        self.retain_history(&samples, length);
        Ok(length)
    }

    /// One dot product of `data` against the taps, without touching
    /// history.
    pub fn filter_single(&self, data: &[S]) -> S {
        S::dot(data, &self.taps)
    }

    /// In-place decimating convolution writing `length` outputs into
    /// the head of `data`, reading windows at stride `decimate`.
    /// `length * decimate` should equal `data.len()` for the history to
    /// stay stream-aligned. Requires `length <= data.len()`.
    pub fn filter_decimate(&mut self, data: &mut [S], decimate: usize, length: usize) {
        debug_assert!(length <= data.len());
        let samples = self.concat(data);
        let mut src = 0;
        for slot in data.iter_mut().take(length) {
            *slot = S::dot(&samples[src..], &self.taps);
            src += decimate;
        }
        let start = samples.len().saturating_sub(self.taps.len());
        self.retain_history(&samples, start);
    }

    /// Decimating convolution into a freshly allocated output: output
    /// index `i` is the dot product of the taps against the window
    /// starting at stream offset `i * decimate`.
    ///
    /// Output indices whose window lacks a full tap-length of lookahead
    /// are not produced; their samples stay in history and are emitted
    /// by a later call, so the decimated stream never drops or repeats
    /// a sample across block boundaries.
    pub fn filter_decimate_out(&mut self, data: &[S], decimate: usize) -> Vec<S> {
        let samples = self.concat(data);
        let produced = self.decimated_output_len(samples.len(), decimate);
        let mut output = Vec::with_capacity(produced);
        for i in 0..produced {
            output.push(S::dot(&samples[decimate * i..], &self.taps));
        }
        self.retain_history(&samples, decimate * produced);
        output
    }

    /// Caller-buffer variant of
    /// [`filter_decimate_out`](Self::filter_decimate_out).
    ///
    /// Fails with [`DspError::InsufficientOutput`] when `output` cannot
    /// hold every produced sample; nothing is written and no history
    /// advances in that case.
    pub fn filter_decimate_buffer(
        &mut self,
        input: &[S],
        output: &mut [S],
        decimate: usize,
    ) -> Result<usize> {
        let samples = self.concat(input);
        let produced = self.decimated_output_len(samples.len(), decimate);
        if output.len() < produced {
            return Err(DspError::InsufficientOutput {
                needed: produced,
                available: output.len(),
            });
        }
        for (i, slot) in output.iter_mut().take(produced).enumerate() {
            *slot = S::dot(&samples[decimate * i..], &self.taps);
        }
        self.retain_history(&samples, decimate * produced);
        Ok(produced)
    }

    /// Routes to the decimating path when a decimation factor > 1 is
    /// configured, otherwise to the plain filter.
    pub fn work(&mut self, data: &[S]) -> Vec<S> {
        if self.decimation > 1 {
            self.filter_decimate_out(data, self.decimation)
        } else {
            self.filter_out(data)
        }
    }

    /// Caller-buffer variant of [`work`](Self::work).
    pub fn work_buffer(&mut self, input: &[S], output: &mut [S]) -> Result<usize> {
        if self.decimation > 1 {
            self.filter_decimate_buffer(input, output, self.decimation)
        } else {
            self.filter_buffer(input, output)
        }
    }

    /// Replaces the tap sequence for subsequent calls.
    ///
    /// History is resized to the new tap count immediately: the most
    /// recent samples are kept and the front is zero-padded, so the
    /// next call never reads out of bounds.
    pub fn set_taps(&mut self, taps: Vec<T>) {
        debug_assert!(!taps.is_empty(), "taps must not be empty");
        let n = taps.len();
        let keep = self.history.len().min(n);
        let mut history = vec![S::default(); n];
        history[n - keep..].copy_from_slice(&self.history[self.history.len() - keep..]);
        self.history = history;
        self.taps = taps;
    }

    /// Upper bound on the number of samples a call with `input_length`
    /// input samples can produce, with one slot of headroom. Never
    /// under-predicts.
    pub fn predict_output_size(&self, input_length: usize) -> usize {
        input_length / self.decimation + 1
    }

    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn taps(&self) -> &[T] {
        &self.taps
    }

    pub fn decimation(&self) -> usize {
        self.decimation
    }

    /// The retained sample tail that will prefix the next call's input.
    pub fn history(&self) -> &[S] {
        &self.history
    }

    fn concat(&self, data: &[S]) -> Vec<S> {
        let mut samples = Vec::with_capacity(self.history.len() + data.len());
        samples.extend_from_slice(&self.history);
        samples.extend_from_slice(data);
        samples
    }

    fn retain_history(&mut self, samples: &[S], start: usize) {
        self.history.clear();
        self.history.extend_from_slice(&samples[start..]);
    }

    /// Number of decimated outputs computable from `total` buffered
    /// samples: at most one per `decimate` samples, and only where a
    /// full tap-length window of lookahead exists.
    fn decimated_output_len(&self, total: usize, decimate: usize) -> usize {
        let n = self.taps.len();
        if total < n {
            return 0;
        }
        (total / decimate).min((total - n) / decimate + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f32) -> Complex32 {
        Complex32::new(re, 0.0)
    }

    #[test]
    fn test_identity_filter() {
        let mut fir = ComplexFir::new(vec![c(1.0)]);
        let output = fir.filter_out(&[c(1.0), c(2.0), c(3.0)]);
        assert_eq!(output, vec![c(1.0), c(2.0), c(3.0)]);
        assert_eq!(fir.history(), &[c(3.0)]);
    }

    #[test]
    fn test_moving_average_with_history() {
        let mut fir = FloatFir::new(vec![0.5, 0.5]);
        // History starts zeroed: first output averages [0, 0].
        let output = fir.filter_out(&[1.0, 3.0]);
        assert_eq!(output.len(), 2);
        assert_relative_eq!(output[0], 0.0);
        assert_relative_eq!(output[1], 0.5); // (0 + 1) / 2
        assert_eq!(fir.history(), &[1.0, 3.0]);

        // Next block continues from the retained tail.
        let output = fir.filter_out(&[5.0]);
        assert_relative_eq!(output[0], 2.0); // (1 + 3) / 2
    }

    #[test]
    fn test_filter_in_place_matches_filter_out() {
        let taps = vec![0.2f32, 0.3, 0.5];
        let input: Vec<f32> = (0..32).map(|i| (i as f32 * 0.4).sin()).collect();

        let mut a = FloatFir::new(taps.clone());
        let expected = a.filter_out(&input);

        let mut b = FloatFir::new(taps);
        let mut data = input.clone();
        b.filter(&mut data);

        assert_eq!(data, expected);
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_filter_buffer_matches_filter_out() {
        let taps = vec![c(0.5), c(0.25)];
        let input: Vec<Complex32> = (0..16).map(|i| c(i as f32)).collect();

        let mut a = ComplexFir::new(taps.clone());
        let expected = a.filter_out(&input);

        let mut b = ComplexFir::new(taps);
        let mut output = vec![c(0.0); b.predict_output_size(input.len())];
        let produced = b.filter_buffer(&input, &mut output).unwrap();

        assert_eq!(produced, expected.len());
        assert_eq!(&output[..produced], &expected[..]);
    }

    #[test]
    fn test_filter_buffer_capacity_fault_leaves_state_untouched() {
        let mut fir = ComplexFir::new(vec![c(1.0), c(1.0)]);
        let history_before = fir.history().to_vec();

        let input = [c(1.0), c(2.0), c(3.0), c(4.0)];
        let sentinel = c(-99.0);
        let mut output = vec![sentinel; 2];

        let err = fir.filter_buffer(&input, &mut output);
        assert!(matches!(
            err,
            Err(DspError::InsufficientOutput {
                needed: 4,
                available: 2
            })
        ));
        assert!(output.iter().all(|&s| s == sentinel), "Partial write");
        assert_eq!(fir.history(), &history_before[..]);
    }

    #[test]
    fn test_decimate_by_two_windowed_sums() {
        let mut fir = ComplexFir::decimating(2, vec![c(0.5), c(0.5)]);
        let output = fir.work(&[c(1.0), c(2.0), c(3.0), c(4.0)]);

        // Stream is [0, 0, 1, 2, 3, 4] (zeroed initial history), with
        // windows at stride 2.
        assert_eq!(output.len(), 3);
        assert_relative_eq!(output[0].re, 0.0);
        assert_relative_eq!(output[1].re, 1.5);
        assert_relative_eq!(output[2].re, 3.5);
    }

    #[test]
    fn test_decimate_carries_unconsumed_tail() {
        // 5 taps, decimation 3: windows overlap, so the lookahead not
        // yet consumable must survive into the next call.
        let taps = vec![1.0f32; 5];
        let mut one_shot = FloatFir::decimating(3, taps.clone());
        let mut split = FloatFir::decimating(3, taps);

        let input: Vec<f32> = (0..31).map(|i| i as f32).collect();
        let expected = one_shot.work(&input);

        let mut outputs = Vec::new();
        for chunk in input.chunks(4) {
            outputs.extend(split.work(chunk));
        }
        assert_eq!(outputs, expected);
    }

    #[test]
    fn test_decimate_buffer_capacity_fault() {
        let mut fir = FloatFir::decimating(2, vec![0.5, 0.5]);
        let input = [1.0, 2.0, 3.0, 4.0];
        let mut output = [0.0; 1];

        let err = fir.filter_decimate_buffer(&input, &mut output, 2);
        assert!(matches!(err, Err(DspError::InsufficientOutput { .. })));
    }

    #[test]
    fn test_work_routes_on_decimation_factor() {
        let input = [c(1.0), c(2.0), c(3.0), c(4.0)];

        let mut plain = ComplexFir::new(vec![c(1.0)]);
        assert_eq!(plain.work(&input).len(), 4);

        let mut decimating = ComplexFir::decimating(2, vec![c(1.0)]);
        assert_eq!(decimating.work(&input).len(), 2);
    }

    #[test]
    fn test_predict_output_size_never_under_predicts() {
        let mut fir = FloatFir::decimating(3, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
        for block in [1usize, 2, 3, 5, 7, 16, 33] {
            let input = vec![1.0f32; block];
            let predicted = fir.predict_output_size(block);
            let produced = fir.work(&input).len();
            assert!(
                produced <= predicted,
                "Block {block}: produced {produced} > predicted {predicted}"
            );
        }
    }

    #[test]
    fn test_set_taps_resizes_history() {
        let mut fir = FloatFir::new(vec![1.0, 1.0]);
        fir.filter_out(&[1.0, 2.0]);
        assert_eq!(fir.history(), &[1.0, 2.0]);

        // Growing zero-pads at the front, keeping the newest samples.
        fir.set_taps(vec![0.25; 4]);
        assert_eq!(fir.history(), &[0.0, 0.0, 1.0, 2.0]);
        assert_eq!(fir.num_taps(), 4);

        // Shrinking keeps only the newest samples.
        fir.set_taps(vec![1.0]);
        assert_eq!(fir.history(), &[2.0]);
    }

    #[test]
    fn test_filter_single() {
        let fir = ComplexFir::new(vec![c(1.0), c(2.0)]);
        let result = fir.filter_single(&[c(3.0), c(4.0)]);
        assert_relative_eq!(result.re, 11.0);
        assert_relative_eq!(result.im, 0.0);
    }

    #[test]
    fn test_complex_taps_use_complex_product() {
        // (0+1i) * (0+1i) = -1
        let mut fir = ComplexFir::new(vec![Complex32::new(0.0, 1.0)]);
        let output = fir.filter_out(&[Complex32::new(0.0, 1.0)]);
        assert_relative_eq!(output[0].re, -1.0);
        assert_relative_eq!(output[0].im, 0.0);
    }

    #[test]
    fn test_filter_decimate_in_place() {
        let mut fir = FloatFir::new(vec![1.0, 1.0]);
        let mut data = [1.0, 2.0, 3.0, 4.0];
        // Stream [0, 0, 1, 2, 3, 4], windows at stride 2.
        fir.filter_decimate(&mut data, 2, 2);
        assert_relative_eq!(data[0], 0.0);
        assert_relative_eq!(data[1], 3.0);
    }
}
