pub mod fir;
pub mod interpolator;

pub use fir::{ComplexFir, Dot, Fir, FirFilter, FloatFir};
pub use interpolator::{FloatInterpolator, Interpolator};
