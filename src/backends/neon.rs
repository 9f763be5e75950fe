//! ARM NEON backend implementation (AArch64 128-bit SIMD)
//!
//! This backend uses NEON intrinsics for 128-bit SIMD operations. NEON is
//! part of the AArch64 baseline, so the backend is compiled on every
//! AArch64 target that keeps the `neon` target feature enabled.
//!
//! # Performance
//!
//! 4 lanes for f32, 2 lanes for f64, same shape as SSE2. `vbsl` does the lane
//! selection in one instruction. Software prefetch is not exposed on stable
//! for AArch64, so the prefetch hook stays a no-op.
//!
//! # Safety
//!
//! All NEON intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use super::lanes::{self, VectorLanes};
use super::BlockKernel;
use crate::combine::{Candidate, Reduction};

/// ARM NEON backend (128-bit SIMD)
pub struct NeonBackend;

pub(crate) struct NeonF32;

pub(crate) struct NeonF64;

impl VectorLanes for NeonF32 {
    type Elem = f32;
    type Values = float32x4_t;
    type Indices = uint32x4_t;
    type Mask = uint32x4_t;

    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(src: *const f32) -> float32x4_t {
        vld1q_f32(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f32, v: float32x4_t) {
        vst1q_f32(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f32) -> float32x4_t {
        vdupq_n_f32(value)
    }

    #[inline(always)]
    unsafe fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vaddq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        vmulq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        vcltq_f32(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: uint32x4_t, held: float32x4_t, candidate: float32x4_t) -> float32x4_t {
        vbslq_f32(mask, candidate, held)
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> uint32x4_t {
        let f = first as u32;
        let lanes = [f, f + 1, f + 2, f + 3];
        vld1q_u32(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> uint32x4_t {
        vdupq_n_u32(value as u32)
    }

    #[inline(always)]
    unsafe fn add_indices(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        vaddq_u32(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: uint32x4_t, held: uint32x4_t, candidate: uint32x4_t) -> uint32x4_t {
        vbslq_u32(mask, candidate, held)
    }

    #[inline(always)]
    unsafe fn spill(values: float32x4_t, indices: uint32x4_t, out: &mut [Candidate<f32>]) {
        let mut v = [0.0f32; 4];
        let mut i = [0u32; 4];
        vst1q_f32(v.as_mut_ptr(), values);
        vst1q_u32(i.as_mut_ptr(), indices);
        for lane in 0..4 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }
}

impl VectorLanes for NeonF64 {
    type Elem = f64;
    type Values = float64x2_t;
    type Indices = uint64x2_t;
    type Mask = uint64x2_t;

    const LANES: usize = 2;

    #[inline(always)]
    unsafe fn load(src: *const f64) -> float64x2_t {
        vld1q_f64(src)
    }

    #[inline(always)]
    unsafe fn store(dst: *mut f64, v: float64x2_t) {
        vst1q_f64(dst, v);
    }

    #[inline(always)]
    unsafe fn splat(value: f64) -> float64x2_t {
        vdupq_n_f64(value)
    }

    #[inline(always)]
    unsafe fn add(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vaddq_f64(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        vmulq_f64(a, b)
    }

    #[inline(always)]
    unsafe fn less_than(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        vcltq_f64(a, b)
    }

    #[inline(always)]
    unsafe fn select(mask: uint64x2_t, held: float64x2_t, candidate: float64x2_t) -> float64x2_t {
        vbslq_f64(mask, candidate, held)
    }

    #[inline(always)]
    unsafe fn lane_indices(first: usize) -> uint64x2_t {
        let f = first as u64;
        let lanes = [f, f + 1];
        vld1q_u64(lanes.as_ptr())
    }

    #[inline(always)]
    unsafe fn splat_index(value: usize) -> uint64x2_t {
        vdupq_n_u64(value as u64)
    }

    #[inline(always)]
    unsafe fn add_indices(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
        vaddq_u64(a, b)
    }

    #[inline(always)]
    unsafe fn select_indices(mask: uint64x2_t, held: uint64x2_t, candidate: uint64x2_t) -> uint64x2_t {
        vbslq_u64(mask, candidate, held)
    }

    #[inline(always)]
    unsafe fn spill(values: float64x2_t, indices: uint64x2_t, out: &mut [Candidate<f64>]) {
        let mut v = [0.0f64; 2];
        let mut i = [0u64; 2];
        vst1q_f64(v.as_mut_ptr(), values);
        vst1q_u64(i.as_mut_ptr(), indices);
        for lane in 0..2 {
            out[lane] = Candidate::new(v[lane], i[lane] as usize);
        }
    }
}

impl BlockKernel<f32> for NeonBackend {
    unsafe fn reduce<R: Reduction>(x: &[f32]) -> Candidate<f32> {
        lanes::reduce_blocks::<NeonF32, R>(x)
    }

    unsafe fn copy(x: &[f32], y: &mut [f32]) {
        lanes::copy_blocks::<NeonF32>(x, y);
    }

    unsafe fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
        lanes::axpy_blocks::<NeonF32>(alpha, x, y);
    }
}

impl BlockKernel<f64> for NeonBackend {
    unsafe fn reduce<R: Reduction>(x: &[f64]) -> Candidate<f64> {
        lanes::reduce_blocks::<NeonF64, R>(x)
    }

    unsafe fn copy(x: &[f64], y: &mut [f64]) {
        lanes::copy_blocks::<NeonF64>(x, y);
    }

    unsafe fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
        lanes::axpy_blocks::<NeonF64>(alpha, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarBackend;
    use crate::combine::{MaxValue, MinIndex};

    #[test]
    fn test_neon_imin_matches_scalar() {
        let x: Vec<f32> = (0..32 * 6).map(|i| ((i * 13) % 41) as f32).collect();
        let neon = unsafe { <NeonBackend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        let scalar = unsafe { <ScalarBackend as BlockKernel<f32>>::reduce::<MinIndex>(&x) };
        assert_eq!(neon, scalar);
    }

    #[test]
    fn test_neon_max_matches_scalar_f64() {
        let x: Vec<f64> = (0..64 * 3).map(|i| ((i * 17) % 53) as f64 - 20.0).collect();
        let neon = unsafe { <NeonBackend as BlockKernel<f64>>::reduce::<MaxValue>(&x) };
        let scalar = unsafe { <ScalarBackend as BlockKernel<f64>>::reduce::<MaxValue>(&x) };
        assert_eq!(neon, scalar);
    }

    #[test]
    fn test_neon_copy() {
        let x: Vec<f32> = (0..128).map(|i| i as f32 - 64.0).collect();
        let mut y = vec![0.0f32; 128];
        unsafe { <NeonBackend as BlockKernel<f32>>::copy(&x, &mut y) };
        assert_eq!(x, y);
    }
}
