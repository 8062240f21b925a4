//! Vector-math kernels with once-per-process dispatch.
//!
//! Each primitive (dot products, element-wise arithmetic, conjugate
//! multiply, phase rotation) is resolved exactly once: an installed
//! [`AccelProvider`] is probed per primitive, and anything it does not
//! supply falls back to the portable kernels in [`reference`]. The
//! resolved [`KernelRegistry`] is immutable for the life of the process
//! and is read concurrently by any number of filter instances.
//!
//! Install a provider with [`install_provider`] during process startup,
//! before the first filtering call. Once any caller has touched the
//! registry the resolution is frozen; there is no hot swap.

pub mod accel;
pub mod reference;

use std::sync::OnceLock;

use log::debug;
use num_complex::Complex32;

use crate::error::{DspError, Result};
pub use accel::AccelProvider;

pub type DotCcFn = fn(&[Complex32], &[Complex32]) -> Complex32;
pub type DotCfFn = fn(&[Complex32], &[f32]) -> Complex32;
pub type DotFfFn = fn(&[f32], &[f32]) -> f32;
pub type MapFfFn = fn(&mut [f32], &[f32]);
pub type MapCcFn = fn(&mut [Complex32], &[Complex32]);
pub type MulConjFn = fn(&[Complex32], &[Complex32], usize) -> Vec<Complex32>;
pub type MulConjInlineFn = fn(&mut [Complex32], &[Complex32], usize);
pub type RotateFn = fn(&[Complex32], &mut Complex32, Complex32) -> Vec<Complex32>;
pub type RotateBufferFn = fn(&[Complex32], &mut [Complex32], &mut Complex32, Complex32) -> usize;

/// One resolved implementation per vector-math primitive.
///
/// Obtained through [`registry`]; constructing one directly via
/// [`KernelRegistry::resolve`] is intended for equivalence testing of
/// providers, not for filtering (the filter engines always go through
/// the process-wide instance).
#[derive(Clone, Copy)]
pub struct KernelRegistry {
    pub dot_cc: DotCcFn,
    pub dot_cf: DotCfFn,
    pub dot_ff: DotFfFn,
    pub add_ff: MapFfFn,
    pub sub_ff: MapFfFn,
    pub mul_ff: MapFfFn,
    pub div_ff: MapFfFn,
    pub add_cc: MapCcFn,
    pub sub_cc: MapCcFn,
    pub mul_cc: MapCcFn,
    pub div_cc: MapCcFn,
    pub multiply_conjugate: MulConjFn,
    pub multiply_conjugate_inline: MulConjInlineFn,
    pub rotate: RotateFn,
    pub rotate_buffer: RotateBufferFn,
    mode: &'static str,
}

fn pick<F>(
    name: &str,
    accelerated: Option<F>,
    fallback: F,
    mode: &'static str,
    any_accelerated: &mut bool,
) -> F {
    match accelerated {
        Some(f) => {
            *any_accelerated = true;
            debug!("kernel {name}: {mode}");
            f
        }
        None => {
            debug!("kernel {name}: generic");
            fallback
        }
    }
}

impl KernelRegistry {
    /// Resolve every primitive against the given provider, falling back
    /// to the reference kernels where the provider returns `None`.
    pub fn resolve(provider: &dyn AccelProvider) -> Self {
        let mode = provider.mode();
        let mut any = false;

        let mut registry = Self {
            dot_cc: pick("dot_cc", provider.dot_cc(), reference::dot_cc, mode, &mut any),
            dot_cf: pick("dot_cf", provider.dot_cf(), reference::dot_cf, mode, &mut any),
            dot_ff: pick("dot_ff", provider.dot_ff(), reference::dot_ff, mode, &mut any),
            add_ff: pick("add_ff", provider.add_ff(), reference::add_ff, mode, &mut any),
            sub_ff: pick("sub_ff", provider.sub_ff(), reference::sub_ff, mode, &mut any),
            mul_ff: pick("mul_ff", provider.mul_ff(), reference::mul_ff, mode, &mut any),
            div_ff: pick("div_ff", provider.div_ff(), reference::div_ff, mode, &mut any),
            add_cc: pick("add_cc", provider.add_cc(), reference::add_cc, mode, &mut any),
            sub_cc: pick("sub_cc", provider.sub_cc(), reference::sub_cc, mode, &mut any),
            mul_cc: pick("mul_cc", provider.mul_cc(), reference::mul_cc, mode, &mut any),
            div_cc: pick("div_cc", provider.div_cc(), reference::div_cc, mode, &mut any),
            multiply_conjugate: pick(
                "multiply_conjugate",
                provider.multiply_conjugate(),
                reference::multiply_conjugate,
                mode,
                &mut any,
            ),
            multiply_conjugate_inline: pick(
                "multiply_conjugate_inline",
                provider.multiply_conjugate_inline(),
                reference::multiply_conjugate_inline,
                mode,
                &mut any,
            ),
            rotate: pick("rotate", provider.rotate(), reference::rotate, mode, &mut any),
            rotate_buffer: pick(
                "rotate_buffer",
                provider.rotate_buffer(),
                reference::rotate_buffer,
                mode,
                &mut any,
            ),
            mode: "generic",
        };

        if any {
            registry.mode = mode;
        }
        registry
    }

    /// Name of the acceleration mode this registry resolved to, or
    /// `"generic"` when every primitive runs the reference kernel.
    pub fn mode(&self) -> &'static str {
        self.mode
    }
}

static REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();

/// Install an accelerated provider and resolve the process-wide
/// registry against it.
///
/// Must happen during process initialization, before any filter
/// instance performs work. Returns `false` if the registry already
/// resolved (the installation is ignored in that case — there is no
/// re-resolution).
pub fn install_provider(provider: &dyn AccelProvider) -> bool {
    REGISTRY.set(KernelRegistry::resolve(provider)).is_ok()
}

/// The process-wide kernel registry, resolving against the reference
/// kernels on first use if no provider was installed.
pub fn registry() -> &'static KernelRegistry {
    REGISTRY.get_or_init(|| KernelRegistry::resolve(&accel::NoAccel))
}

/// Name of the acceleration mode in use process-wide.
pub fn simd_mode() -> &'static str {
    registry().mode()
}

/// Dot product of two complex vectors.
pub fn complex_dot_product(input: &[Complex32], taps: &[Complex32]) -> Complex32 {
    (registry().dot_cc)(input, taps)
}

/// Dot product of a complex vector against real taps.
pub fn dot_product(input: &[Complex32], taps: &[f32]) -> Complex32 {
    (registry().dot_cf)(input, taps)
}

/// Dot product of two real vectors.
pub fn float_dot_product(input: &[f32], taps: &[f32]) -> f32 {
    (registry().dot_ff)(input, taps)
}

/// `a[i] += b[i]`
pub fn add_float_vectors(a: &mut [f32], b: &[f32]) {
    (registry().add_ff)(a, b)
}

/// `a[i] -= b[i]`
pub fn subtract_float_vectors(a: &mut [f32], b: &[f32]) {
    (registry().sub_ff)(a, b)
}

/// `a[i] *= b[i]`
pub fn multiply_float_vectors(a: &mut [f32], b: &[f32]) {
    (registry().mul_ff)(a, b)
}

/// `a[i] /= b[i]`; zero divisors propagate Inf/NaN.
pub fn divide_float_vectors(a: &mut [f32], b: &[f32]) {
    (registry().div_ff)(a, b)
}

/// `a[i] += b[i]`
pub fn add_complex_vectors(a: &mut [Complex32], b: &[Complex32]) {
    (registry().add_cc)(a, b)
}

/// `a[i] -= b[i]`
pub fn subtract_complex_vectors(a: &mut [Complex32], b: &[Complex32]) {
    (registry().sub_cc)(a, b)
}

/// `a[i] *= b[i]`
pub fn multiply_complex_vectors(a: &mut [Complex32], b: &[Complex32]) {
    (registry().mul_cc)(a, b)
}

/// `a[i] /= b[i]`; zero divisors propagate Inf/NaN.
pub fn divide_complex_vectors(a: &mut [Complex32], b: &[Complex32]) {
    (registry().div_cc)(a, b)
}

/// `output[i] = a[i] * conj(b[i])` for the first `length` elements.
pub fn multiply_conjugate(a: &[Complex32], b: &[Complex32], length: usize) -> Vec<Complex32> {
    (registry().multiply_conjugate)(a, b, length)
}

/// `a[i] = a[i] * conj(b[i])` for the first `length` elements.
pub fn multiply_conjugate_inline(a: &mut [Complex32], b: &[Complex32], length: usize) {
    (registry().multiply_conjugate_inline)(a, b, length)
}

/// Rotates each sample by a running phase, renormalizing the phase
/// periodically to bound drift.
pub fn rotate(input: &[Complex32], phase: &mut Complex32, increment: Complex32) -> Vec<Complex32> {
    (registry().rotate)(input, phase, increment)
}

/// Caller-buffer variant of [`rotate`]. Fails with a capacity fault if
/// `output` is shorter than `input`; nothing is written in that case.
pub fn rotate_buffer(
    input: &[Complex32],
    output: &mut [Complex32],
    phase: &mut Complex32,
    increment: Complex32,
) -> Result<usize> {
    if output.len() < input.len() {
        return Err(DspError::InsufficientOutput {
            needed: input.len(),
            available: output.len(),
        });
    }
    Ok((registry().rotate_buffer)(input, output, phase, increment))
}
