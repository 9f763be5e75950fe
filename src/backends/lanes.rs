//! Register-level lane primitives and the generic SIMD block algorithm
//!
//! Each SIMD backend describes one register shape per element type through
//! [`VectorLanes`]. The block algorithms below are written once against that
//! trait, so SSE2, AVX2 and NEON run the same reduction tree and only differ
//! in lane count and instruction encoding.
//!
//! Reduction layout for one block of `W` elements and `L` lanes:
//!
//! ```text
//! registers  r0 = x[0..L]   r1 = x[L..2L]  ...  r(W/L-1)
//! level 1    m0 = r0 ⊕ r1   m1 = r2 ⊕ r3   ...
//! level k    ... until one register remains (block best, per lane)
//! carry      acc = acc ⊕ block              (acc holds earlier blocks)
//! final      spill L lanes, tree_reduce with the lower-index tie rule
//! ```
//!
//! `⊕` keeps the left operand unless the right one is strictly better. At
//! every level the left operand's lane holds lower indices than the right
//! one's, so "keep left on tie" is the same as "lower index wins".

use super::PREFETCH_BYTES;
use super::{AXPY_BLOCK_WIDTH, COPY_BLOCK_WIDTH, MAX_BLOCK_WIDTH, SPAN_ELEMENTS};
use crate::combine::{tree_reduce, Candidate, Direction, Reduction};
use crate::element::Element;

/// Most registers a block can span (widest block over the narrowest register)
const MAX_REGS: usize = MAX_BLOCK_WIDTH / 2;

/// Most lanes a register can hold
const MAX_LANES: usize = 8;

/// One SIMD register shape for one element type
///
/// # Safety
///
/// Every method is a thin wrapper over intrinsics; pointers passed to
/// `load`/`store` must be valid for `LANES` elements.
pub(crate) trait VectorLanes {
    /// Element held by each lane
    type Elem: Element;
    /// Register of values
    type Values: Copy;
    /// Register of lane indices
    type Indices: Copy;
    /// Lane-wise comparison result
    type Mask: Copy;

    /// Lanes per register
    const LANES: usize;

    unsafe fn load(src: *const Self::Elem) -> Self::Values;
    unsafe fn store(dst: *mut Self::Elem, v: Self::Values);
    unsafe fn splat(value: Self::Elem) -> Self::Values;
    unsafe fn add(a: Self::Values, b: Self::Values) -> Self::Values;
    unsafe fn mul(a: Self::Values, b: Self::Values) -> Self::Values;

    /// Ordered `a < b` per lane (false when either lane is NaN)
    unsafe fn less_than(a: Self::Values, b: Self::Values) -> Self::Mask;

    /// `candidate` where `mask` is set, `held` elsewhere
    unsafe fn select(mask: Self::Mask, held: Self::Values, candidate: Self::Values) -> Self::Values;

    /// `[first, first + 1, ..., first + LANES - 1]`
    unsafe fn lane_indices(first: usize) -> Self::Indices;
    unsafe fn splat_index(value: usize) -> Self::Indices;
    unsafe fn add_indices(a: Self::Indices, b: Self::Indices) -> Self::Indices;
    unsafe fn select_indices(mask: Self::Mask, held: Self::Indices, candidate: Self::Indices) -> Self::Indices;

    /// Write the `LANES` (value, index) pairs to `out[..LANES]`
    unsafe fn spill(values: Self::Values, indices: Self::Indices, out: &mut [Candidate<Self::Elem>]);

    /// Cache hint; no-op where the ISA exposes none on stable
    #[inline(always)]
    unsafe fn prefetch(_addr: *const Self::Elem) {}
}

/// Lanes where `candidate` is strictly better than `held`
#[inline(always)]
unsafe fn better<V: VectorLanes, R: Reduction>(candidate: V::Values, held: V::Values) -> V::Mask {
    match R::DIRECTION {
        Direction::Minimum => V::less_than(candidate, held),
        Direction::Maximum => V::less_than(held, candidate),
    }
}

#[inline(always)]
fn prefetch_elements<T>() -> usize {
    PREFETCH_BYTES / std::mem::size_of::<T>()
}

/// Reduce a block-aligned slice, span by span
///
/// # Safety
///
/// `x.len()` must be a non-zero multiple of `R::BLOCK_WIDTH`, and
/// `R::BLOCK_WIDTH / V::LANES` must be a power of two no larger than
/// `MAX_REGS`.
pub(crate) unsafe fn reduce_blocks<V: VectorLanes, R: Reduction>(x: &[V::Elem]) -> Candidate<V::Elem> {
    debug_assert!(!x.is_empty() && x.len() % R::BLOCK_WIDTH == 0);

    let first_end = x.len().min(SPAN_ELEMENTS);
    let mut best = reduce_span::<V, R>(&x[..first_end]);

    let mut start = first_end;
    while start < x.len() {
        let end = (start + SPAN_ELEMENTS).min(x.len());
        let span = reduce_span::<V, R>(&x[start..end]).shifted(start);
        best = best.merge::<R>(span);
        start = end;
    }

    best
}

unsafe fn reduce_span<V: VectorLanes, R: Reduction>(x: &[V::Elem]) -> Candidate<V::Elem> {
    let width = R::BLOCK_WIDTH;
    let regs = width / V::LANES;
    debug_assert!(regs.is_power_of_two() && regs <= MAX_REGS);
    debug_assert!(V::LANES <= MAX_LANES);

    let src = x.as_ptr();
    let blocks = x.len() / width;
    let ahead = prefetch_elements::<V::Elem>();

    let zero_index = V::splat_index(0);
    let mut offsets = [zero_index; MAX_REGS];
    for (r, offset) in offsets.iter_mut().enumerate().take(regs) {
        *offset = V::lane_indices(r * V::LANES);
    }

    let mut values = [V::splat(<V::Elem as Element>::ZERO); MAX_REGS];
    let mut indices = [zero_index; MAX_REGS];

    // SEEDED: the first block initializes every lane
    let (mut acc, mut acc_index) = reduce_block::<V, R>(src, 0, regs, &offsets, &mut values, &mut indices);

    // SCANNING: later blocks only replace lanes they strictly beat
    for b in 1..blocks {
        let base = b * width;
        V::prefetch(src.wrapping_add(base + ahead));

        let (block, block_index) =
            reduce_block::<V, R>(src.add(base), base, regs, &offsets, &mut values, &mut indices);
        let mask = better::<V, R>(block, acc);
        acc = V::select(mask, acc, block);
        acc_index = V::select_indices(mask, acc_index, block_index);
    }

    let mut spilled = [Candidate::new(<V::Elem as Element>::ZERO, 0); MAX_LANES];
    V::spill(acc, acc_index, &mut spilled);
    let lanes = &mut spilled[..V::LANES];
    let fallback = lanes[0];
    tree_reduce::<R, V::Elem>(lanes).unwrap_or(fallback)
}

/// Collapse one block to a single register of per-lane winners
#[inline(always)]
unsafe fn reduce_block<V: VectorLanes, R: Reduction>(
    block: *const V::Elem,
    base: usize,
    regs: usize,
    offsets: &[V::Indices; MAX_REGS],
    values: &mut [V::Values; MAX_REGS],
    indices: &mut [V::Indices; MAX_REGS],
) -> (V::Values, V::Indices) {
    let base_index = V::splat_index(base);
    for r in 0..regs {
        values[r] = V::load(block.add(r * V::LANES));
        indices[r] = V::add_indices(offsets[r], base_index);
    }

    let mut live = regs;
    while live > 1 {
        let half = live / 2;
        for k in 0..half {
            let (held, held_index) = (values[2 * k], indices[2 * k]);
            let (candidate, candidate_index) = (values[2 * k + 1], indices[2 * k + 1]);
            let mask = better::<V, R>(candidate, held);
            values[k] = V::select(mask, held, candidate);
            indices[k] = V::select_indices(mask, held_index, candidate_index);
        }
        live = half;
    }

    (values[0], indices[0])
}

/// Copy a block-aligned slice register by register
///
/// # Safety
///
/// `x.len() == y.len()`, a multiple of [`COPY_BLOCK_WIDTH`].
pub(crate) unsafe fn copy_blocks<V: VectorLanes>(x: &[V::Elem], y: &mut [V::Elem]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len() % COPY_BLOCK_WIDTH, 0);

    let src = x.as_ptr();
    let dst = y.as_mut_ptr();
    let ahead = prefetch_elements::<V::Elem>();

    let mut base = 0;
    while base < x.len() {
        V::prefetch(src.wrapping_add(base + ahead));
        V::prefetch(dst.wrapping_add(base + ahead));

        let mut lane = 0;
        while lane < COPY_BLOCK_WIDTH {
            V::store(dst.add(base + lane), V::load(src.add(base + lane)));
            lane += V::LANES;
        }
        base += COPY_BLOCK_WIDTH;
    }
}

/// `y += alpha * x` over a block-aligned slice
///
/// Multiply and add stay separate instructions so the rounding matches the
/// scalar remainder loop exactly.
///
/// # Safety
///
/// `x.len() == y.len()`, a multiple of [`AXPY_BLOCK_WIDTH`].
pub(crate) unsafe fn axpy_blocks<V: VectorLanes>(alpha: V::Elem, x: &[V::Elem], y: &mut [V::Elem]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(x.len() % AXPY_BLOCK_WIDTH, 0);

    let src = x.as_ptr();
    let dst = y.as_mut_ptr();
    let ahead = prefetch_elements::<V::Elem>();
    let scale = V::splat(alpha);

    let mut base = 0;
    while base < x.len() {
        V::prefetch(src.wrapping_add(base + ahead));
        V::prefetch(dst.wrapping_add(base + ahead));

        let mut lane = 0;
        while lane < AXPY_BLOCK_WIDTH {
            let at = base + lane;
            let product = V::mul(scale, V::load(src.add(at)));
            V::store(dst.add(at), V::add(V::load(dst.add(at)), product));
            lane += V::LANES;
        }
        base += AXPY_BLOCK_WIDTH;
    }
}
