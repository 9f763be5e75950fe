//! Scalar remainder loops
//!
//! Two jobs: finish the tail of a unit-stride vector after the block kernel
//! has consumed the block-aligned prefix, and run the whole operation when a
//! stride is not 1. Both use the same strict-improvement rule as the
//! combiner, visiting elements in increasing index order.

use crate::combine::{Candidate, Reduction};
use crate::element::Element;

/// Continue a unit-stride scan at `start`
pub(crate) fn scan_tail<R: Reduction, T: Element>(x: &[T], start: usize, mut best: Candidate<T>) -> Candidate<T> {
    for (k, &value) in x[start..].iter().enumerate() {
        best.offer::<R>(value, start + k);
    }
    best
}

/// Reduce `n >= 1` elements spaced `inc >= 1` apart, unrolled by 4
pub(crate) fn scan_strided<R: Reduction, T: Element>(n: usize, x: &[T], inc: usize) -> Candidate<T> {
    let mut best = Candidate::new(x[0], 0);
    let mut i = 0;
    let mut j = 0;

    let unrolled = n & !3;
    while j < unrolled {
        best.offer::<R>(x[i], j);
        best.offer::<R>(x[i + inc], j + 1);
        best.offer::<R>(x[i + 2 * inc], j + 2);
        best.offer::<R>(x[i + 3 * inc], j + 3);
        i += 4 * inc;
        j += 4;
    }

    while j < n {
        best.offer::<R>(x[i], j);
        i += inc;
        j += 1;
    }

    best
}

/// `y[start..] = x[start..]` for equal-length unit-stride slices
pub(crate) fn copy_tail<T: Element>(x: &[T], y: &mut [T], start: usize) {
    y[start..].copy_from_slice(&x[start..]);
}

/// Copy with independent non-negative strides
pub(crate) fn copy_strided<T: Element>(n: usize, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        y[iy] = x[ix];
        ix += incx;
        iy += incy;
    }
}

/// `y[start..] += alpha * x[start..]` for equal-length unit-stride slices
pub(crate) fn axpy_tail<T: Element>(alpha: T, x: &[T], y: &mut [T], start: usize) {
    for (&xv, yv) in x[start..].iter().zip(&mut y[start..]) {
        *yv = *yv + alpha * xv;
    }
}

/// Axpy with independent non-negative strides
pub(crate) fn axpy_strided<T: Element>(n: usize, alpha: T, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        y[iy] = y[iy] + alpha * x[ix];
        ix += incx;
        iy += incy;
    }
}
