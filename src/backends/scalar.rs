//! Scalar (non-SIMD) backend implementation
//!
//! This is the portable baseline that works on all platforms. It follows the
//! same block structure as the SIMD backends, but each block is reduced by
//! merging adjacent elements pairwise in plain Rust. It doubles as the
//! correctness reference every SIMD backend is tested against.
//!
//! # Performance
//!
//! No SIMD acceleration; the compiler may still auto-vectorize copy and axpy.

use super::{BlockKernel, AXPY_BLOCK_WIDTH, COPY_BLOCK_WIDTH, MAX_BLOCK_WIDTH};
use crate::combine::{tree_reduce, Candidate, Reduction};
use crate::element::Element;

/// Scalar backend (portable, no SIMD)
pub struct ScalarBackend;

/// Best candidate of one block via a pairwise tree
#[inline]
fn block_best<R: Reduction, T: Element>(
    block: &[T],
    base: usize,
    scratch: &mut [Candidate<T>; MAX_BLOCK_WIDTH],
) -> Candidate<T> {
    for (k, &value) in block.iter().enumerate() {
        scratch[k] = Candidate::new(value, base + k);
    }
    let fallback = scratch[0];
    tree_reduce::<R, T>(&mut scratch[..block.len()]).unwrap_or(fallback)
}

impl<T: Element> BlockKernel<T> for ScalarBackend {
    // SAFETY: This function is safe because:
    // 1. All slice accesses are bounds-checked by Rust slicing/iteration
    // 2. Caller must ensure the slice is non-empty (first block seeds the state)
    // 3. Marked unsafe only to match BlockKernel trait interface
    unsafe fn reduce<R: Reduction>(x: &[T]) -> Candidate<T> {
        let width = R::BLOCK_WIDTH;
        let mut scratch = [Candidate::new(T::ZERO, 0); MAX_BLOCK_WIDTH];
        let mut blocks = x.chunks_exact(width);

        let mut best = match blocks.next() {
            Some(first) => block_best::<R, T>(first, 0, &mut scratch),
            None => return Candidate::new(T::ZERO, 0),
        };

        for (b, block) in blocks.enumerate() {
            let found = block_best::<R, T>(block, (b + 1) * width, &mut scratch);
            best.offer::<R>(found.value, found.index);
        }

        best
    }

    // SAFETY: This function is safe because:
    // 1. All slice accesses are bounds-checked by Rust slicing
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match BlockKernel trait interface
    unsafe fn copy(x: &[T], y: &mut [T]) {
        for (src, dst) in x
            .chunks_exact(COPY_BLOCK_WIDTH)
            .zip(y.chunks_exact_mut(COPY_BLOCK_WIDTH))
        {
            dst.copy_from_slice(src);
        }
    }

    // SAFETY: This function is safe because:
    // 1. All slice accesses are bounds-checked by Rust iteration
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match BlockKernel trait interface
    unsafe fn axpy(alpha: T, x: &[T], y: &mut [T]) {
        for (src, dst) in x
            .chunks_exact(AXPY_BLOCK_WIDTH)
            .zip(y.chunks_exact_mut(AXPY_BLOCK_WIDTH))
        {
            for (&xv, yv) in src.iter().zip(dst.iter_mut()) {
                *yv = *yv + alpha * xv;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{MaxIndex, MaxValue, MinIndex, MinValue};

    fn naive<R: Reduction>(x: &[f32]) -> Candidate<f32> {
        let mut best = Candidate::new(x[0], 0);
        for (i, &v) in x.iter().enumerate().skip(1) {
            best.offer::<R>(v, i);
        }
        best
    }

    #[test]
    fn test_scalar_reduce_single_block() {
        let x: Vec<f32> = (0..32).map(|i| ((i * 7) % 32) as f32).collect();
        let got = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        assert_eq!(got, naive::<MinIndex>(&x));
        assert_eq!(got.value, 0.0);
    }

    #[test]
    fn test_scalar_reduce_tie_across_blocks() {
        // Minimum 1.0 appears in block 0 (index 5) and block 2 (index 70)
        let mut x = vec![5.0f32; 96];
        x[5] = 1.0;
        x[70] = 1.0;
        let got = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        assert_eq!(got, Candidate::new(1.0, 5));
    }

    #[test]
    fn test_scalar_reduce_tie_within_block_odd_positions() {
        let mut x = vec![0.0f32; 64];
        x[3] = 9.0;
        x[2] = 9.0;
        x[63] = 9.0;
        let got = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MaxIndex>(&x) };
        assert_eq!(got.index, 2);
    }

    #[test]
    fn test_scalar_reduce_value_signed_zero() {
        let mut x = vec![-1.0f32; 128];
        x[10] = -0.0;
        x[90] = 0.0;
        let got = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MaxValue>(&x) };
        assert_eq!(got.index, 10);
        assert!(got.value.is_sign_negative());
    }

    #[test]
    fn test_scalar_reduce_matches_naive_many_blocks() {
        let x: Vec<f32> = (0..640).map(|i| ((i * 7919) % 613) as f32 - 300.0).collect();
        let min = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MinValue>(&x) };
        let max = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MaxValue>(&x) };
        assert_eq!(min, naive::<MinValue>(&x));
        assert_eq!(max, naive::<MaxValue>(&x));
    }

    #[test]
    fn test_scalar_copy_blocks() {
        let x: Vec<f64> = (0..128).map(|i| i as f64 * 0.25).collect();
        let mut y = vec![0.0f64; 128];
        unsafe { <ScalarBackend as BlockKernel<f64>>::copy(&x, &mut y) };
        assert_eq!(x, y);
    }

    #[test]
    fn test_scalar_axpy_blocks() {
        let x = vec![1.0f32; 64];
        let mut y: Vec<f32> = (0..64).map(|i| i as f32).collect();
        unsafe { <ScalarBackend as BlockKernel<f32>>::axpy(2.0, &x, &mut y) };
        for (i, v) in y.iter().enumerate() {
            assert_eq!(*v, i as f32 + 2.0);
        }
    }
}
