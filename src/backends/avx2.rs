//! AVX2 backend implementation (x86_64 advanced SIMD)
//!
//! This backend uses AVX2 intrinsics for 256-bit SIMD operations. It is only
//! compiled when the build itself targets AVX2 (for example with
//! `RUSTFLAGS="-C target-cpu=native"` on a Haswell or newer CPU), so every
//! helper inlines into code generated for that target.
//!
//! # Performance
//!
//! 8 lanes for f32, 4 lanes for f64. Lane selection uses `blendv`.
//! No FMA is used: axpy must round exactly like the scalar tail.
//!
//! # Safety
//!
//! All AVX2 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::lanes::{self, VectorLanes};
use super::BlockKernel;
use crate::combine::{Candidate, Reduction};

/// AVX2 backend (256-bit SIMD for x86_64)
pub struct Avx2Backend;

/// Eight f32 lanes with 32-bit indices
pub(crate) struct Avx2F32;

/// Four f64 lanes with 64-bit indices
pub(crate) struct Avx2F64;

impl VectorLanes for Avx2F32 {
    type Elem = f32;
    type Values = __m256;
    type Indices = __m256i;
    type Mask = __m256;

    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn load(src: *const f32) -> __m256 {
        _mm256_loadu_ps(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f32, v: __m256) {
        _mm256_storeu_ps(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f32) -> __m256 {
        _mm256_set1_ps(value)
    }

    #[inline(always)]
    unsafe fn add(a: __m256, b: __m256) -> __m256 {
        _mm256_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        _mm256_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: __m256, b: __m256) -> __m256 {
        // Ordered, quiet: false for NaN lanes
        _mm256_cmp_ps::<_CMP_LT_OQ>(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: __m256, held: __m256, candidate: __m256) -> __m256 {
        _mm256_blendv_ps(held, candidate, mask)
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> __m256i {
        let f = first as i32;
        _mm256_setr_epi32(f, f + 1, f + 2, f + 3, f + 4, f + 5, f + 6, f + 7)
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> __m256i {
        _mm256_set1_epi32(value as i32)
    }

    #[inline(always)]
    unsafe fn add_indices(a: __m256i, b: __m256i) -> __m256i {
        _mm256_add_epi32(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: __m256, held: __m256i, candidate: __m256i) -> __m256i {
        _mm256_blendv_epi8(held, candidate, _mm256_castps_si256(mask))
    }

    #[inline(always)]
    unsafe fn spill(values: __m256, indices: __m256i, out: &mut [Candidate<f32>]) {
        let mut v = [0.0f32; 8];
        let mut i = [0i32; 8];
        _mm256_storeu_ps(v.as_mut_ptr(), values);
        _mm256_storeu_si256(i.as_mut_ptr() as *mut __m256i, indices);
        for lane in 0..8 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }

    #[inline(always)]
    unsafe fn prefetch(addr: *const f32) {
        _mm_prefetch::<_MM_HINT_T0>(addr as *const i8);
    }
}

impl VectorLanes for Avx2F64 {
    type Elem = f64;
    type Values = __m256d;
    type Indices = __m256i;
    type Mask = __m256d;

    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(src: *const f64) -> __m256d {
        _mm256_loadu_pd(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f64, v: __m256d) {
        _mm256_storeu_pd(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> __m256d {
        _mm256_set1_pd(value)
    }

    #[inline(always)]
    unsafe fn add(a: __m256d, b: __m256d) -> __m256d {
        _mm256_add_pd(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256d, b: __m256d) -> __m256d {
        _mm256_mul_pd(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: __m256d, b: __m256d) -> __m256d {
        _mm256_cmp_pd::<_CMP_LT_OQ>(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: __m256d, held: __m256d, candidate: __m256d) -> __m256d {
        _mm256_blendv_pd(held, candidate, mask)
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> __m256i {
        let f = first as i64;
        _mm256_setr_epi64x(f, f + 1, f + 2, f + 3)
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> __m256i {
        _mm256_set1_epi64x(value as i64)
    }

    #[inline(always)]
    unsafe fn add_indices(a: __m256i, b: __m256i) -> __m256i {
        _mm256_add_epi64(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: __m256d, held: __m256i, candidate: __m256i) -> __m256i {
        _mm256_blendv_epi8(held, candidate, _mm256_castpd_si256(mask))
    }

    #[inline(always)]
    unsafe fn spill(values: __m256d, indices: __m256i, out: &mut [Candidate<f64>]) {
        let mut v = [0.0f64; 4];
        let mut i = [0i64; 4];
        _mm256_storeu_pd(v.as_mut_ptr(), values);
        _mm256_storeu_si256(i.as_mut_ptr() as *mut __m256i, indices);
        for lane in 0..4 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }

    #[inline(always)]
    unsafe fn prefetch(addr: *const f64) {
        _mm_prefetch::<_MM_HINT_T0>(addr as *const i8);
    }
}

impl BlockKernel<f32> for Avx2Backend {
    unsafe fn reduce<R: Reduction>(x: &[f32]) -> Candidate<f32> {
        lanes::reduce_blocks::<Avx2F32, R>(x)
    }

    unsafe fn copy(x: &[f32], y: &mut [f32]) {
        lanes::copy_blocks::<Avx2F32>(x, y);
    }

    unsafe fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
        lanes::axpy_blocks::<Avx2F32>(alpha, x, y);
    }
}

impl BlockKernel<f64> for Avx2Backend {
    unsafe fn reduce<R: Reduction>(x: &[f64]) -> Candidate<f64> {
        lanes::reduce_blocks::<Avx2F64, R>(x)
    }

    unsafe fn copy(x: &[f64], y: &mut [f64]) {
        lanes::copy_blocks::<Avx2F64>(x, y);
    }

    unsafe fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
        lanes::axpy_blocks::<Avx2F64>(alpha, x, y);
    }
}
