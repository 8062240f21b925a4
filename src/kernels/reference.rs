//! Portable reference kernels.
//!
//! These are the fallback implementations the registry resolves to when
//! no accelerated provider supplies a given primitive. Any accelerated
//! implementation must agree with these within normal floating-point
//! rounding tolerance.

use num_complex::Complex32;

use crate::math;

/// Phase is renormalized to unit magnitude after this many rotation
/// steps to bound accumulated floating-point drift.
pub(crate) const ROTATE_RENORM_INTERVAL: usize = 512;

/// Dot product of two complex vectors over the shorter of the two lengths.
pub fn dot_cc(input: &[Complex32], taps: &[Complex32]) -> Complex32 {
    let length = input.len().min(taps.len());

    let mut res = Complex32::new(0.0, 0.0);
    for i in 0..length {
        let re = input[i].re * taps[i].re - input[i].im * taps[i].im;
        let im = input[i].re * taps[i].im + input[i].im * taps[i].re;
        res += Complex32::new(re, im);
    }
    res
}

/// Dot product of a complex vector against real taps.
pub fn dot_cf(input: &[Complex32], taps: &[f32]) -> Complex32 {
    let length = input.len().min(taps.len());

    let mut re = 0.0f32;
    let mut im = 0.0f32;
    for i in 0..length {
        re += input[i].re * taps[i];
        im += input[i].im * taps[i];
    }
    Complex32::new(re, im)
}

/// Dot product of two real vectors over the shorter of the two lengths.
pub fn dot_ff(input: &[f32], taps: &[f32]) -> f32 {
    let length = input.len().min(taps.len());

    let mut res = 0.0f32;
    for i in 0..length {
        res += input[i] * taps[i];
    }
    res
}

pub fn add_ff(a: &mut [f32], b: &[f32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x += v;
    }
}

pub fn sub_ff(a: &mut [f32], b: &[f32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x -= v;
    }
}

pub fn mul_ff(a: &mut [f32], b: &[f32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x *= v;
    }
}

/// Division by a zero element propagates Inf/NaN, never masked.
pub fn div_ff(a: &mut [f32], b: &[f32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x /= v;
    }
}

pub fn add_cc(a: &mut [Complex32], b: &[Complex32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x += v;
    }
}

pub fn sub_cc(a: &mut [Complex32], b: &[Complex32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x -= v;
    }
}

pub fn mul_cc(a: &mut [Complex32], b: &[Complex32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x *= v;
    }
}

/// Division by a zero element propagates Inf/NaN, never masked.
pub fn div_cc(a: &mut [Complex32], b: &[Complex32]) {
    for (x, &v) in a.iter_mut().zip(b) {
        *x /= v;
    }
}

/// `output[i] = a[i] * conj(b[i])`
pub fn multiply_conjugate(a: &[Complex32], b: &[Complex32], length: usize) -> Vec<Complex32> {
    let mut output = Vec::with_capacity(length);
    for i in 0..length {
        output.push(a[i] * b[i].conj());
    }
    output
}

/// `a[i] = a[i] * conj(b[i])`
pub fn multiply_conjugate_inline(a: &mut [Complex32], b: &[Complex32], length: usize) {
    for i in 0..length {
        a[i] *= b[i].conj();
    }
}

/// Rotates each input sample by a running phase:
/// `out[i] = input[i] * phase; phase *= increment`.
pub fn rotate(input: &[Complex32], phase: &mut Complex32, increment: Complex32) -> Vec<Complex32> {
    let mut output = Vec::with_capacity(input.len());
    for (i, &sample) in input.iter().enumerate() {
        output.push(sample * *phase);
        *phase *= increment;
        if (i + 1) % ROTATE_RENORM_INTERVAL == 0 {
            *phase = math::normalize(*phase);
        }
    }
    output
}

/// Caller-buffer variant of [`rotate`]. Capacity is checked by the
/// public wrapper before this runs.
pub fn rotate_buffer(
    input: &[Complex32],
    output: &mut [Complex32],
    phase: &mut Complex32,
    increment: Complex32,
) -> usize {
    for (i, &sample) in input.iter().enumerate() {
        output[i] = sample * *phase;
        *phase *= increment;
        if (i + 1) % ROTATE_RENORM_INTERVAL == 0 {
            *phase = math::normalize(*phase);
        }
    }
    input.len()
}
