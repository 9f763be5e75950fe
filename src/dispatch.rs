//! Public entry points: validation, path selection and result assembly
//!
//! Every operation follows the same shape:
//!
//! 1. Degenerate input (`n <= 0`, a non-positive reduction stride) returns
//!    the sentinel without touching the buffers.
//! 2. Unit stride: the block-aligned prefix goes to the backend's block
//!    kernel, the tail to the scalar remainder loop.
//! 3. Any other stride: the whole call runs in the strided remainder loop.
//!
//! Both paths visit elements with the same strict-improvement rule, so the
//! answer never depends on which one ran.

use crate::backends::{Accelerated, AXPY_BLOCK_WIDTH, COPY_BLOCK_WIDTH};
use crate::combine::{Candidate, MaxIndex, MaxValue, MinIndex, MinValue, Reduction};
use crate::error::{Level1Error, Result};
use crate::remainder;
use crate::view::{required_len, StridedView, StridedViewMut};
use crate::Backend;

#[cfg(feature = "tracing")]
use tracing::{instrument, trace};

/// Kernel handle bound to one backend
///
/// # Examples
///
/// ```
/// use rayo::Kernels;
///
/// let k = Kernels::new();
/// let x = [3.0f32, 1.0, 1.0, 2.0];
/// assert_eq!(k.imin(4, &x, 1), 2);
/// assert_eq!(k.max(4, &x, 1), 3.0);
///
/// let mut y = [0.0f32; 4];
/// k.copy(4, &x, 1, &mut y, 1);
/// assert_eq!(y, x);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernels {
    backend: Backend,
}

impl Default for Kernels {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernels {
    /// Handle using the backend selected when the crate was built
    pub const fn new() -> Self {
        Self {
            backend: Backend::compiled(),
        }
    }

    /// Handle pinned to `backend`
    ///
    /// `Backend::Auto` resolves to [`Backend::compiled`].
    ///
    /// # Errors
    ///
    /// [`Level1Error::UnsupportedBackend`] if `backend` is not part of this
    /// build.
    pub fn with_backend(backend: Backend) -> Result<Self> {
        let backend = backend.resolve();
        if !backend.is_compiled() {
            return Err(Level1Error::UnsupportedBackend(backend));
        }
        Ok(Self { backend })
    }

    /// Backend this handle dispatches to
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    // ------------------------------------------------------------------
    // BLAS-style entry points
    // ------------------------------------------------------------------

    /// 1-based position of the first minimum, `0` if `n <= 0` or `incx <= 0`
    ///
    /// # Panics
    ///
    /// If `x` is shorter than `(n - 1) * incx + 1`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x), fields(backend = ?self.backend)))]
    pub fn imin<T: Accelerated>(&self, n: isize, x: &[T], incx: isize) -> usize {
        self.locate::<MinIndex, T>(n, x, incx).map_or(0, |c| c.index + 1)
    }

    /// 1-based position of the first maximum, `0` if `n <= 0` or `incx <= 0`
    ///
    /// # Panics
    ///
    /// If `x` is shorter than `(n - 1) * incx + 1`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x), fields(backend = ?self.backend)))]
    pub fn imax<T: Accelerated>(&self, n: isize, x: &[T], incx: isize) -> usize {
        self.locate::<MaxIndex, T>(n, x, incx).map_or(0, |c| c.index + 1)
    }

    /// Largest value, `0.0` if `n <= 0` or `incx <= 0`
    ///
    /// Among equal-comparing values (`-0.0` and `0.0`) the earliest is
    /// returned bit for bit.
    ///
    /// # Panics
    ///
    /// If `x` is shorter than `(n - 1) * incx + 1`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x), fields(backend = ?self.backend)))]
    pub fn max<T: Accelerated>(&self, n: isize, x: &[T], incx: isize) -> T {
        self.locate::<MaxValue, T>(n, x, incx).map_or(T::ZERO, |c| c.value)
    }

    /// Smallest value, `0.0` if `n <= 0` or `incx <= 0`
    ///
    /// # Panics
    ///
    /// If `x` is shorter than `(n - 1) * incx + 1`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x), fields(backend = ?self.backend)))]
    pub fn min<T: Accelerated>(&self, n: isize, x: &[T], incx: isize) -> T {
        self.locate::<MinValue, T>(n, x, incx).map_or(T::ZERO, |c| c.value)
    }

    /// `y[k * incy] = x[k * incx]` for `k < n`
    ///
    /// No-op if `n <= 0` or either increment is negative. A zero increment is
    /// taken literally: `incx == 0` broadcasts `x[0]`, `incy == 0` writes
    /// every element to `y[0]` in turn.
    ///
    /// # Panics
    ///
    /// If either buffer is too short for its `(n, inc)` pair.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x, y), fields(backend = ?self.backend)))]
    pub fn copy<T: Accelerated>(&self, n: isize, x: &[T], incx: isize, y: &mut [T], incy: isize) {
        if n <= 0 || incx < 0 || incy < 0 {
            return;
        }
        let n = n as usize;

        if incx == 1 && incy == 1 {
            self.copy_contiguous(&x[..n], &mut y[..n]);
        } else {
            let (incx, incy) = (incx as usize, incy as usize);
            check_reach("x", x.len(), n, incx);
            check_reach("y", y.len(), n, incy);
            #[cfg(feature = "tracing")]
            trace!(n, incx, incy, "strided copy");
            remainder::copy_strided(n, x, incx, y, incy);
        }
    }

    /// `y[k * incy] += alpha * x[k * incx]` for `k < n`
    ///
    /// No-op if `n <= 0`, `alpha == 0` or either increment is negative.
    /// Multiply and add are rounded separately on every path.
    ///
    /// # Panics
    ///
    /// If either buffer is too short for its `(n, inc)` pair.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, x, y), fields(backend = ?self.backend)))]
    pub fn axpy<T: Accelerated>(&self, n: isize, alpha: T, x: &[T], incx: isize, y: &mut [T], incy: isize) {
        if n <= 0 || alpha == T::ZERO || incx < 0 || incy < 0 {
            return;
        }
        let n = n as usize;

        if incx == 1 && incy == 1 {
            self.axpy_contiguous(alpha, &x[..n], &mut y[..n]);
        } else {
            let (incx, incy) = (incx as usize, incy as usize);
            check_reach("x", x.len(), n, incx);
            check_reach("y", y.len(), n, incy);
            #[cfg(feature = "tracing")]
            trace!(n, incx, incy, "strided axpy");
            remainder::axpy_strided(n, alpha, x, incx, y, incy);
        }
    }

    // ------------------------------------------------------------------
    // Descriptor entry points
    // ------------------------------------------------------------------

    /// 0-based position of the first minimum, `None` for an empty view
    pub fn imin_view<T: Accelerated>(&self, x: &StridedView<'_, T>) -> Option<usize> {
        self.locate_view::<MinIndex, T>(x).map(|c| c.index)
    }

    /// 0-based position of the first maximum, `None` for an empty view
    pub fn imax_view<T: Accelerated>(&self, x: &StridedView<'_, T>) -> Option<usize> {
        self.locate_view::<MaxIndex, T>(x).map(|c| c.index)
    }

    /// Largest value, `None` for an empty view
    pub fn max_view<T: Accelerated>(&self, x: &StridedView<'_, T>) -> Option<T> {
        self.locate_view::<MaxValue, T>(x).map(|c| c.value)
    }

    /// Smallest value, `None` for an empty view
    pub fn min_view<T: Accelerated>(&self, x: &StridedView<'_, T>) -> Option<T> {
        self.locate_view::<MinValue, T>(x).map(|c| c.value)
    }

    /// Copy `x` into `y` element by element
    ///
    /// # Errors
    ///
    /// [`Level1Error::LengthMismatch`] if the views differ in length; `y` is
    /// left untouched.
    pub fn copy_view<T: Accelerated>(&self, x: &StridedView<'_, T>, y: &mut StridedViewMut<'_, T>) -> Result<()> {
        let n = matched_len(x, y)?;
        if n == 0 {
            return Ok(());
        }

        if x.is_contiguous() && y.is_contiguous() {
            self.copy_contiguous(&x.data()[..n], &mut y.data_mut()[..n]);
        } else {
            let (incx, incy) = (x.stride(), y.stride());
            remainder::copy_strided(n, x.data(), incx, y.data_mut(), incy);
        }
        Ok(())
    }

    /// `y += alpha * x` element by element
    ///
    /// # Errors
    ///
    /// [`Level1Error::LengthMismatch`] if the views differ in length; `y` is
    /// left untouched.
    pub fn axpy_view<T: Accelerated>(
        &self,
        alpha: T,
        x: &StridedView<'_, T>,
        y: &mut StridedViewMut<'_, T>,
    ) -> Result<()> {
        let n = matched_len(x, y)?;
        if n == 0 || alpha == T::ZERO {
            return Ok(());
        }

        if x.is_contiguous() && y.is_contiguous() {
            self.axpy_contiguous(alpha, &x.data()[..n], &mut y.data_mut()[..n]);
        } else {
            let (incx, incy) = (x.stride(), y.stride());
            remainder::axpy_strided(n, alpha, x.data(), incx, y.data_mut(), incy);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Path selection
    // ------------------------------------------------------------------

    fn locate<R: Reduction, T: Accelerated>(&self, n: isize, x: &[T], incx: isize) -> Option<Candidate<T>> {
        if n <= 0 || incx <= 0 {
            return None;
        }
        let n = n as usize;

        if incx == 1 {
            Some(self.locate_contiguous::<R, T>(&x[..n]))
        } else {
            let inc = incx as usize;
            check_reach("x", x.len(), n, inc);
            #[cfg(feature = "tracing")]
            trace!(op = R::NAME, n, inc, "strided scan");
            Some(remainder::scan_strided::<R, T>(n, x, inc))
        }
    }

    fn locate_view<R: Reduction, T: Accelerated>(&self, x: &StridedView<'_, T>) -> Option<Candidate<T>> {
        let n = x.len();
        if n == 0 {
            return None;
        }

        if x.is_contiguous() {
            Some(self.locate_contiguous::<R, T>(&x.data()[..n]))
        } else {
            Some(remainder::scan_strided::<R, T>(n, x.data(), x.stride()))
        }
    }

    /// Blocks then tail over a non-empty unit-stride slice
    fn locate_contiguous<R: Reduction, T: Accelerated>(&self, x: &[T]) -> Candidate<T> {
        let aligned = x.len() - x.len() % R::BLOCK_WIDTH;

        #[cfg(feature = "tracing")]
        trace!(op = R::NAME, aligned, tail = x.len() - aligned, "block path");

        if aligned == 0 {
            // No whole block: seed from element 0 and scan the rest
            let seed = Candidate::new(x[0], 0);
            return remainder::scan_tail::<R, T>(x, 1, seed);
        }

        // SAFETY: `aligned` is a non-zero multiple of R::BLOCK_WIDTH
        let seed = unsafe { T::reduce_blocks::<R>(self.backend, &x[..aligned]) };
        remainder::scan_tail::<R, T>(x, aligned, seed)
    }

    fn copy_contiguous<T: Accelerated>(&self, x: &[T], y: &mut [T]) {
        let aligned = x.len() - x.len() % COPY_BLOCK_WIDTH;
        if aligned > 0 {
            // SAFETY: equal lengths, a multiple of COPY_BLOCK_WIDTH
            unsafe { T::copy_blocks(self.backend, &x[..aligned], &mut y[..aligned]) };
        }
        remainder::copy_tail(x, y, aligned);
    }

    fn axpy_contiguous<T: Accelerated>(&self, alpha: T, x: &[T], y: &mut [T]) {
        let aligned = x.len() - x.len() % AXPY_BLOCK_WIDTH;
        if aligned > 0 {
            // SAFETY: equal lengths, a multiple of AXPY_BLOCK_WIDTH
            unsafe { T::axpy_blocks(self.backend, alpha, &x[..aligned], &mut y[..aligned]) };
        }
        remainder::axpy_tail(alpha, x, y, aligned);
    }
}

/// Panic before any work if a strided access would run off the buffer
#[inline]
fn check_reach(name: &str, available: usize, n: usize, inc: usize) {
    match required_len(n, inc) {
        Some(required) => assert!(
            available >= required,
            "{name} holds {available} elements, {n} at stride {inc} need {required}"
        ),
        None => panic!("{name} holds {available} elements, {n} at stride {inc} need more than usize::MAX"),
    }
}

fn matched_len<T: Accelerated>(x: &StridedView<'_, T>, y: &StridedViewMut<'_, T>) -> Result<usize> {
    if x.len() != y.len() {
        return Err(Level1Error::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok(x.len())
}
