//! Numeric element types the kernels are generic over
//!
//! Every kernel in this crate is written once against [`Element`] and
//! instantiated for `f32` and `f64`. The trait only exposes what the kernels
//! need: ordered comparison (through `PartialOrd`), the arithmetic used by
//! axpy, and a zero constant for sentinel returns.

use std::fmt::Debug;
use std::ops::{Add, Mul};

/// Scalar element of a vector
///
/// Comparisons follow IEEE 754 ordered-quiet semantics: `<` and `>` are
/// `false` whenever either operand is NaN.
pub trait Element:
    Copy
    + Debug
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Additive identity, returned by value reductions on empty input
    const ZERO: Self;

    /// Short precision tag used in diagnostics ("s" or "d", BLAS style)
    const PREFIX: &'static str;

    /// Raw bit pattern, for bit-exact comparisons in tests and diagnostics
    fn to_bits_u64(self) -> u64;
}

impl Element for f32 {
    const ZERO: Self = 0.0;
    const PREFIX: &'static str = "s";

    #[inline]
    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }
}

impl Element for f64 {
    const ZERO: Self = 0.0;
    const PREFIX: &'static str = "d";

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }
}
