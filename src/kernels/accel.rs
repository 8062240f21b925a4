//! Seam for platform-supplied accelerated kernels.
//!
//! The crate ships no accelerated implementations of its own; a platform
//! that has them (SIMD, DSP offload) implements [`AccelProvider`] and
//! installs it with [`super::install_provider`] before any filtering
//! work starts. Every method defaults to `None`, which resolves that
//! primitive to the portable reference kernel — a provider can also use
//! this to keep a primitive on the generic path where acceleration does
//! not pay off.
//!
//! Accelerated kernels must be numerically equivalent to the reference
//! kernels within normal floating-point rounding tolerance. Callers are
//! promised identical results no matter which side resolved.

use super::{
    DotCcFn, DotCfFn, DotFfFn, MapCcFn, MapFfFn, MulConjFn, MulConjInlineFn, RotateBufferFn,
    RotateFn,
};

/// A source of accelerated kernel implementations, probed once per
/// primitive when the registry resolves.
pub trait AccelProvider: Sync {
    /// Short human-readable name of the acceleration in use, reported
    /// by [`super::simd_mode`] when at least one primitive resolves to
    /// this provider.
    fn mode(&self) -> &'static str;

    fn dot_cc(&self) -> Option<DotCcFn> {
        None
    }

    fn dot_cf(&self) -> Option<DotCfFn> {
        None
    }

    fn dot_ff(&self) -> Option<DotFfFn> {
        None
    }

    fn add_ff(&self) -> Option<MapFfFn> {
        None
    }

    fn sub_ff(&self) -> Option<MapFfFn> {
        None
    }

    fn mul_ff(&self) -> Option<MapFfFn> {
        None
    }

    fn div_ff(&self) -> Option<MapFfFn> {
        None
    }

    fn add_cc(&self) -> Option<MapCcFn> {
        None
    }

    fn sub_cc(&self) -> Option<MapCcFn> {
        None
    }

    fn mul_cc(&self) -> Option<MapCcFn> {
        None
    }

    fn div_cc(&self) -> Option<MapCcFn> {
        None
    }

    fn multiply_conjugate(&self) -> Option<MulConjFn> {
        None
    }

    fn multiply_conjugate_inline(&self) -> Option<MulConjInlineFn> {
        None
    }

    fn rotate(&self) -> Option<RotateFn> {
        None
    }

    fn rotate_buffer(&self) -> Option<RotateBufferFn> {
        None
    }
}

/// Placeholder provider used when nothing was installed: every
/// primitive falls through to the reference kernels.
pub(crate) struct NoAccel;

impl AccelProvider for NoAccel {
    fn mode(&self) -> &'static str {
        "generic"
    }
}
