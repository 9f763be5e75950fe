//! Rayo: Architecture-Tuned Level-1 Vector Kernels
//!
//! **Rayo** (Spanish: "lightning bolt") provides the BLAS Level-1 operations
//! that sit at the bottom of every linear-algebra stack:
//!
//! 1. **Location reductions** - `imin`, `imax` (1-based index of the first extreme)
//! 2. **Value reductions** - `min`, `max`
//! 3. **Data movement** - `copy`, `axpy` (`y += alpha * x`)
//!
//! # Design Principles
//!
//! - **Write once, optimize everywhere**: One block algorithm, instantiated per ISA
//! - **Build-time dispatch**: The SIMD backend is fixed by the compilation target
//! - **Zero unsafe in public API**: Safety via slicing, `unsafe` isolated in backends
//! - **Path-independent results**: Block and strided paths agree bit for bit,
//!   including which of several equal extremes is reported
//!
//! # Quick Start
//!
//! ```rust
//! let x = [3.0f64, 1.0, 1.0, 2.0];
//!
//! assert_eq!(rayo::imin(4, &x, 1), 2); // first minimum, 1-based
//! assert_eq!(rayo::max(4, &x, 1), 3.0);
//!
//! let mut y = [0.0f64; 4];
//! rayo::copy(4, &x, 1, &mut y, 1);
//! assert_eq!(y, x);
//! ```
//!
//! # Backends
//!
//! | Backend  | Compiled when                                      |
//! |----------|----------------------------------------------------|
//! | `Scalar` | always                                             |
//! | `SSE2`   | `target_arch = "x86_64"`                           |
//! | `AVX2`   | `target_arch = "x86_64"` and `target_feature = "avx2"` |
//! | `NEON`   | `target_arch = "aarch64"` and `target_feature = "neon"` |
//!
//! The `portable` feature makes `Scalar` the default even when a SIMD backend
//! is compiled in.

pub mod backends;
pub mod combine;
pub mod dispatch;
pub mod element;
pub mod error;
mod remainder;
pub mod view;

pub use backends::Accelerated;
pub use combine::{Candidate, MaxIndex, MaxValue, MinIndex, MinValue, Reduction};
pub use dispatch::Kernels;
pub use element::Element;
pub use error::{Level1Error, Result};
pub use view::{StridedView, StridedViewMut};

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Scalar fallback (no SIMD)
    Scalar,
    /// SSE2 (x86_64 baseline)
    SSE2,
    /// AVX2 (256-bit)
    AVX2,
    /// ARM NEON
    NEON,
    /// Whatever this build selected
    Auto,
}

impl Backend {
    /// Backend selected when the crate was built
    ///
    /// Priority: `portable` feature (Scalar), AVX2, SSE2, NEON, Scalar.
    ///
    /// # Examples
    ///
    /// ```
    /// use rayo::Backend;
    ///
    /// let backend = Backend::compiled();
    /// assert!(backend.is_compiled());
    /// assert_ne!(backend, Backend::Auto);
    /// ```
    pub const fn compiled() -> Self {
        if cfg!(feature = "portable") {
            Backend::Scalar
        } else if cfg!(all(target_arch = "x86_64", target_feature = "avx2")) {
            Backend::AVX2
        } else if cfg!(target_arch = "x86_64") {
            Backend::SSE2
        } else if cfg!(all(target_arch = "aarch64", target_feature = "neon")) {
            Backend::NEON
        } else {
            Backend::Scalar
        }
    }

    /// Whether this backend's kernels exist in the current build
    pub const fn is_compiled(self) -> bool {
        match self {
            Backend::Scalar | Backend::Auto => true,
            Backend::SSE2 => cfg!(target_arch = "x86_64"),
            Backend::AVX2 => cfg!(all(target_arch = "x86_64", target_feature = "avx2")),
            Backend::NEON => cfg!(all(target_arch = "aarch64", target_feature = "neon")),
        }
    }

    /// Replace `Auto` with the compiled backend
    pub const fn resolve(self) -> Self {
        match self {
            Backend::Auto => Self::compiled(),
            other => other,
        }
    }

    /// Every concrete backend in this build, Scalar first
    pub fn all_compiled() -> Vec<Backend> {
        [Backend::Scalar, Backend::SSE2, Backend::AVX2, Backend::NEON]
            .into_iter()
            .filter(|b| b.is_compiled())
            .collect()
    }
}

/// 1-based index of the first minimum of `n` elements of `x` spaced `incx`
/// apart; `0` if `n <= 0` or `incx <= 0`
///
/// # Panics
///
/// If `x` cannot hold `n` elements at stride `incx`.
pub fn imin<T: Accelerated>(n: isize, x: &[T], incx: isize) -> usize {
    Kernels::new().imin(n, x, incx)
}

/// 1-based index of the first maximum; `0` if `n <= 0` or `incx <= 0`
///
/// # Panics
///
/// If `x` cannot hold `n` elements at stride `incx`.
pub fn imax<T: Accelerated>(n: isize, x: &[T], incx: isize) -> usize {
    Kernels::new().imax(n, x, incx)
}

/// Largest of `n` elements; `0.0` if `n <= 0` or `incx <= 0`
///
/// # Panics
///
/// If `x` cannot hold `n` elements at stride `incx`.
pub fn max<T: Accelerated>(n: isize, x: &[T], incx: isize) -> T {
    Kernels::new().max(n, x, incx)
}

/// Smallest of `n` elements; `0.0` if `n <= 0` or `incx <= 0`
///
/// # Panics
///
/// If `x` cannot hold `n` elements at stride `incx`.
pub fn min<T: Accelerated>(n: isize, x: &[T], incx: isize) -> T {
    Kernels::new().min(n, x, incx)
}

/// Copy `n` elements from `x` (stride `incx`) to `y` (stride `incy`)
///
/// # Panics
///
/// If either buffer cannot hold `n` elements at its stride.
pub fn copy<T: Accelerated>(n: isize, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    Kernels::new().copy(n, x, incx, y, incy);
}

/// `y += alpha * x` over `n` strided elements
///
/// # Panics
///
/// If either buffer cannot hold `n` elements at its stride.
pub fn axpy<T: Accelerated>(n: isize, alpha: T, x: &[T], incx: isize, y: &mut [T], incy: isize) {
    Kernels::new().axpy(n, alpha, x, incx, y, incy);
}
