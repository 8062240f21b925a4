//! Streaming FIR filtering, decimation, and interpolation primitives.
//!
//! Filter instances carry their own sample history, so feeding a long
//! stream in arbitrarily sized blocks produces exactly the same output
//! as filtering it in one call. All per-sample arithmetic goes through
//! the vector kernels in [`kernels`], which resolve once per process to
//! either an installed accelerated provider or the portable reference
//! implementations.

pub mod error;
pub mod filter;
pub mod firdes;
pub mod kernels;
pub mod math;

pub use error::{DspError, Result};
pub use filter::{ComplexFir, Fir, FirFilter, FloatFir, FloatInterpolator, Interpolator};
pub use kernels::{KernelRegistry, simd_mode};
