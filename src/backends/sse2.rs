//! SSE2 backend implementation (x86_64 baseline SIMD)
//!
//! This backend uses SSE2 intrinsics for 128-bit SIMD operations.
//! SSE2 is available on all x86_64 CPUs as a baseline requirement, so this
//! backend is always compiled on x86_64.
//!
//! # Performance
//!
//! 4 lanes for f32, 2 lanes for f64. SSE2 has no blend instruction, so lane
//! selection is done with and/andnot/or.
//!
//! # Safety
//!
//! All SSE2 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::lanes::{self, VectorLanes};
use super::BlockKernel;
use crate::combine::{Candidate, Reduction};

/// SSE2 backend (128-bit SIMD for x86_64)
pub struct Sse2Backend;

/// Four f32 lanes with 32-bit indices
pub(crate) struct Sse2F32;

/// Two f64 lanes with 64-bit indices
pub(crate) struct Sse2F64;

impl VectorLanes for Sse2F32 {
    type Elem = f32;
    type Values = __m128;
    type Indices = __m128i;
    type Mask = __m128;

    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(src: *const f32) -> __m128 {
        _mm_loadu_ps(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f32, v: __m128) {
        _mm_storeu_ps(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f32) -> __m128 {
        _mm_set1_ps(value)
    }

    #[inline(always)]
    unsafe fn add(a: __m128, b: __m128) -> __m128 {
        _mm_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m128, b: __m128) -> __m128 {
        _mm_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: __m128, b: __m128) -> __m128 {
        _mm_cmplt_ps(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: __m128, held: __m128, candidate: __m128) -> __m128 {
        _mm_or_ps(_mm_and_ps(mask, candidate), _mm_andnot_ps(mask, held))
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> __m128i {
        let first = first as i32;
        _mm_setr_epi32(first, first + 1, first + 2, first + 3)
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> __m128i {
        _mm_set1_epi32(value as i32)
    }

    #[inline(always)]
    unsafe fn add_indices(a: __m128i, b: __m128i) -> __m128i {
        _mm_add_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: __m128, held: __m128i, candidate: __m128i) -> __m128i {
        let mask = _mm_castps_si128(mask);
        _mm_or_si128(_mm_and_si128(mask, candidate), _mm_andnot_si128(mask, held))
    }

    #[inline(always)]
    unsafe fn spill(values: __m128, indices: __m128i, out: &mut [Candidate<f32>]) {
        let mut v = [0.0f32; 4];
        let mut i = [0i32; 4];
        _mm_storeu_ps(v.as_mut_ptr(), values);
        _mm_storeu_si128(i.as_mut_ptr() as *mut __m128i, indices);
        for lane in 0..4 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }

    #[inline(always)]
    unsafe fn prefetch(addr: *const f32) {
        _mm_prefetch::<_MM_HINT_T0>(addr as *const i8);
    }
}

impl VectorLanes for Sse2F64 {
    type Elem = f64;
    type Values = __m128d;
    type Indices = __m128i;
    type Mask = __m128d;

    const LANES: usize = 2;

    #[inline(always)]
    unsafe fn load(src: *const f64) -> __m128d {
        _mm_loadu_pd(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f64, v: __m128d) {
        _mm_storeu_pd(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> __m128d {
        _mm_set1_pd(value)
    }

    #[inline(always)]
    unsafe fn add(a: __m128d, b: __m128d) -> __m128d {
        _mm_add_pd(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m128d, b: __m128d) -> __m128d {
        _mm_mul_pd(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: __m128d, b: __m128d) -> __m128d {
        _mm_cmplt_pd(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: __m128d, held: __m128d, candidate: __m128d) -> __m128d {
        _mm_or_pd(_mm_and_pd(mask, candidate), _mm_andnot_pd(mask, held))
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> __m128i {
        let first = first as i64;
        // _mm_set_epi64x takes the high lane first
        _mm_set_epi64x(first + 1, first)
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> __m128i {
        _mm_set1_epi64x(value as i64)
    }

    #[inline(always)]
    unsafe fn add_indices(a: __m128i, b: __m128i) -> __m128i {
        _mm_add_epi64(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: __m128d, held: __m128i, candidate: __m128i) -> __m128i {
        let mask = _mm_castpd_si128(mask);
        _mm_or_si128(_mm_and_si128(mask, candidate), _mm_andnot_si128(mask, held))
    }

    #[inline(always)]
    unsafe fn spill(values: __m128d, indices: __m128i, out: &mut [Candidate<f64>]) {
        let mut v = [0.0f64; 2];
        let mut i = [0i64; 2];
        _mm_storeu_pd(v.as_mut_ptr(), values);
        _mm_storeu_si128(i.as_mut_ptr() as *mut __m128i, indices);
        for lane in 0..2 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }

    #[inline(always)]
    unsafe fn prefetch(addr: *const f64) {
        _mm_prefetch::<_MM_HINT_T0>(addr as *const i8);
    }
}

impl BlockKernel<f32> for Sse2Backend {
    unsafe fn reduce<R: Reduction>(x: &[f32]) -> Candidate<f32> {
        lanes::reduce_blocks::<Sse2F32, R>(x)
    }

    unsafe fn copy(x: &[f32], y: &mut [f32]) {
        lanes::copy_blocks::<Sse2F32>(x, y);
    }

    unsafe fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
        lanes::axpy_blocks::<Sse2F32>(alpha, x, y);
    }
}

impl BlockKernel<f64> for Sse2Backend {
    unsafe fn reduce<R: Reduction>(x: &[f64]) -> Candidate<f64> {
        lanes::reduce_blocks::<Sse2F64, R>(x)
    }

    unsafe fn copy(x: &[f64], y: &mut [f64]) {
        lanes::copy_blocks::<Sse2F64>(x, y);
    }

    unsafe fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
        lanes::axpy_blocks::<Sse2F64>(alpha, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarBackend;
    use crate::combine::{MaxIndex, MaxValue, MinIndex, MinValue};

    fn wave_f32(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i * 7919) % 1021) as f32 * 0.5 - 200.0).collect()
    }

    fn wave_f64(len: usize) -> Vec<f64> {
        (0..len).map(|i| ((i * 104_729) % 4099) as f64 * 0.25 - 500.0).collect()
    }

    #[test]
    fn test_sse2_imin_matches_scalar() {
        let x = wave_f32(32 * 9);
        let sse2 = unsafe { <Sse2Backend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        let scalar = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        assert_eq!(sse2, scalar);
    }

    #[test]
    fn test_sse2_max_matches_scalar_f64() {
        let x = wave_f64(64 * 5);
        let sse2 = unsafe { <Sse2Backend as BlockKernel<f64>>::reduce::<MaxValue>(&x) };
        let scalar = unsafe { <ScalarBackend as BlockKernel<f64>>::reduce::<MaxValue>(&x) };
        assert_eq!(sse2, scalar);
    }

    #[test]
    fn test_sse2_tie_prefers_lower_index_across_lanes() {
        // Same minimum in lane 3 of block 0 and lane 0 of block 1
        let mut x = vec![10.0f32; 64];
        x[3] = -1.0;
        x[32] = -1.0;
        let got = unsafe { <Sse2Backend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        assert_eq!(got, Candidate::new(-1.0, 3));

        // Later block lane 0 vs earlier block lane 1
        let mut x = vec![0.0f64; 64];
        x[33] = 4.0;
        x[1] = 4.0;
        let got = unsafe { <Sse2Backend as BlockKernel<f64>>::reduce::<MaxIndex>(&x) };
        assert_eq!(got, Candidate::new(4.0, 1));
    }

    #[test]
    fn test_sse2_signed_zero_max_is_earliest() {
        let mut x = vec![-3.0f32; 128];
        x[65] = 0.0;
        x[66] = -0.0;
        x[7] = -0.0;
        let got = unsafe { <Sse2Backend as BlockKernel<f32>>::reduce::<MaxValue>(&x) };
        assert_eq!(got.index, 7);
        assert!(got.value.is_sign_negative());
    }

    #[test]
    fn test_sse2_min_value_f64() {
        let x = wave_f64(128);
        let sse2 = unsafe { <Sse2Backend as BlockKernel<f64>>::reduce::<MinValue>(&x) };
        let want = x.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(sse2.value, want);
    }

    #[test]
    fn test_sse2_copy_matches_source() {
        let x = wave_f32(192);
        let mut y = vec![0.0f32; 192];
        unsafe { <Sse2Backend as BlockKernel<f32>>::copy(&x, &mut y) };
        assert_eq!(x, y);
    }

    #[test]
    fn test_sse2_axpy_matches_scalar() {
        let x = wave_f64(96);
        let mut y_sse2: Vec<f64> = (0..96).map(|i| i as f64 / 3.0).collect();
        let mut y_scalar = y_sse2.clone();
        unsafe {
            <Sse2Backend as BlockKernel<f64>>::axpy(1.5, &x, &mut y_sse2);
            <ScalarBackend as BlockKernel<f64>>::axpy(1.5, &x, &mut y_scalar);
        }
        for (a, b) in y_sse2.iter().zip(&y_scalar) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
