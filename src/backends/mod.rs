//! Block kernel implementations for different SIMD instruction sets
//!
//! Every backend implements [`BlockKernel`] for `f32` and `f64`. A block
//! kernel only ever sees the block-aligned, unit-stride part of a vector;
//! validation, strided access and the tail are handled by the dispatcher and
//! the remainder loops, so all backends share the exact same edge behavior.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The public
//! API remains 100% safe: the dispatcher slices its inputs to block-aligned
//! lengths before calling into a backend.
//!
//! # Backends
//!
//! - `scalar`: Portable block-tree implementation (all targets)
//! - `sse2`: x86_64 baseline SIMD (128-bit)
//! - `avx2`: x86_64 256-bit SIMD, compiled when the build enables `avx2`
//! - `neon`: AArch64 SIMD (128-bit)
//!
//! Backends are chosen when the crate is built, never by probing the CPU at
//! runtime.

use crate::combine::{Candidate, Reduction};
use crate::element::Element;
use crate::Backend;

#[cfg(any(target_arch = "x86_64", all(target_arch = "aarch64", target_feature = "neon")))]
pub(crate) mod lanes;
pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub mod avx2;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;

/// Elements per block for `copy`
pub const COPY_BLOCK_WIDTH: usize = 64;

/// Elements per block for `axpy`
pub const AXPY_BLOCK_WIDTH: usize = 32;

/// Widest block any operation uses
pub const MAX_BLOCK_WIDTH: usize = 64;

/// Block-aligned elements reduced per kernel call
///
/// Keeps 32-bit lane indices from overflowing on very long vectors.
pub const SPAN_ELEMENTS: usize = 1 << 30;

/// Software prefetch distance ahead of the current block
pub const PREFETCH_BYTES: usize = 1024;

/// Block kernel interface shared by all backends
///
/// # Safety
///
/// Implementations may use unsafe SIMD intrinsics and raw pointer
/// arithmetic. Callers must ensure:
/// - `x` is non-empty and its length is a multiple of the operation's block
///   width
/// - `x` and `y` have the same length where both are taken
pub trait BlockKernel<T: Element> {
    /// Best candidate of `x` under `R`, index relative to `x[0]`
    ///
    /// # Safety
    ///
    /// `x.len()` must be a non-zero multiple of `R::BLOCK_WIDTH`.
    unsafe fn reduce<R: Reduction>(x: &[T]) -> Candidate<T>;

    /// Block copy: `y[i] = x[i]`
    ///
    /// # Safety
    ///
    /// `x.len() == y.len()` and the length is a multiple of [`COPY_BLOCK_WIDTH`].
    unsafe fn copy(x: &[T], y: &mut [T]);

    /// Block axpy: `y[i] = y[i] + alpha * x[i]`
    ///
    /// # Safety
    ///
    /// `x.len() == y.len()` and the length is a multiple of [`AXPY_BLOCK_WIDTH`].
    unsafe fn axpy(alpha: T, x: &[T], y: &mut [T]);
}

/// Element types with block kernels in every compiled backend
///
/// This is the bound on all public kernel entry points. It routes a
/// [`Backend`] value to the matching [`BlockKernel`] implementation.
pub trait Accelerated: Element {
    /// Reduce whole blocks on `backend`
    ///
    /// # Safety
    ///
    /// Same contract as [`BlockKernel::reduce`].
    unsafe fn reduce_blocks<R: Reduction>(backend: Backend, x: &[Self]) -> Candidate<Self>;

    /// Copy whole blocks on `backend`
    ///
    /// # Safety
    ///
    /// Same contract as [`BlockKernel::copy`].
    unsafe fn copy_blocks(backend: Backend, x: &[Self], y: &mut [Self]);

    /// Axpy over whole blocks on `backend`
    ///
    /// # Safety
    ///
    /// Same contract as [`BlockKernel::axpy`].
    unsafe fn axpy_blocks(backend: Backend, alpha: Self, x: &[Self], y: &mut [Self]);
}

/// Route a backend value to its kernel; backends absent from this build
/// fall back to the portable kernel.
macro_rules! route {
    ($backend:expr, $kernel:ident, $call:ident $(::<$r:ident>)? ($($arg:expr),*)) => {
        match $backend {
            #[cfg(target_arch = "x86_64")]
            Backend::SSE2 => <sse2::Sse2Backend as BlockKernel<$kernel>>::$call$(::<$r>)?($($arg),*),
            #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
            Backend::AVX2 => <avx2::Avx2Backend as BlockKernel<$kernel>>::$call$(::<$r>)?($($arg),*),
            #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
            Backend::NEON => <neon::NeonBackend as BlockKernel<$kernel>>::$call$(::<$r>)?($($arg),*),
            _ => <scalar::ScalarBackend as BlockKernel<$kernel>>::$call$(::<$r>)?($($arg),*),
        }
    };
}

macro_rules! impl_accelerated {
    ($($t:ident),*) => {$(
        impl Accelerated for $t {
            #[inline]
            unsafe fn reduce_blocks<R: Reduction>(backend: Backend, x: &[Self]) -> Candidate<Self> {
                route!(backend, $t, reduce::<R>(x))
            }

            #[inline]
            unsafe fn copy_blocks(backend: Backend, x: &[Self], y: &mut [Self]) {
                route!(backend, $t, copy(x, y))
            }

            #[inline]
            unsafe fn axpy_blocks(backend: Backend, alpha: Self, x: &[Self], y: &mut [Self]) {
                route!(backend, $t, axpy(alpha, x, y))
            }
        }
    )*};
}

impl_accelerated!(f32, f64);
