//! Reduction state and the pairwise combiner
//!
//! A reduction walks the vector keeping one [`Candidate`] (value and 0-based
//! index). Partial candidates produced by SIMD lanes, blocks and spans are
//! folded together with [`Candidate::merge`], whose tie rule is explicit:
//! when neither value is better, the lower index survives. That makes every
//! merge order produce the answer of a plain left-to-right scan.

use crate::element::Element;

/// Which extreme a reduction is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest value wins
    Minimum,
    /// Largest value wins
    Maximum,
}

/// Capability set of one reduction operation
///
/// Implemented by zero-sized marker types. The block width is a fixed
/// property of the operation, not of the backend.
pub trait Reduction {
    /// Extreme being searched for
    const DIRECTION: Direction;

    /// Elements per block fed to the block kernel
    const BLOCK_WIDTH: usize;

    /// Operation name for diagnostics
    const NAME: &'static str;

    /// Strict "better-of-two": `true` only if `candidate` beats `held`
    ///
    /// Equal values are never better, so the earlier element is kept.
    #[inline(always)]
    fn better<T: Element>(candidate: T, held: T) -> bool {
        match Self::DIRECTION {
            Direction::Minimum => candidate < held,
            Direction::Maximum => candidate > held,
        }
    }
}

/// Index of the first minimum (`imin`)
#[derive(Debug, Clone, Copy)]
pub struct MinIndex;

/// Index of the first maximum (`imax`)
#[derive(Debug, Clone, Copy)]
pub struct MaxIndex;

/// Minimum value (`min`)
#[derive(Debug, Clone, Copy)]
pub struct MinValue;

/// Maximum value (`max`)
#[derive(Debug, Clone, Copy)]
pub struct MaxValue;

impl Reduction for MinIndex {
    const DIRECTION: Direction = Direction::Minimum;
    const BLOCK_WIDTH: usize = 32;
    const NAME: &'static str = "imin";
}

impl Reduction for MaxIndex {
    const DIRECTION: Direction = Direction::Maximum;
    const BLOCK_WIDTH: usize = 32;
    const NAME: &'static str = "imax";
}

impl Reduction for MinValue {
    const DIRECTION: Direction = Direction::Minimum;
    const BLOCK_WIDTH: usize = 64;
    const NAME: &'static str = "min";
}

impl Reduction for MaxValue {
    const DIRECTION: Direction = Direction::Maximum;
    const BLOCK_WIDTH: usize = 64;
    const NAME: &'static str = "max";
}

/// Best value seen so far and where it was seen (0-based)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<T> {
    /// Winning value
    pub value: T,
    /// 0-based position of `value`
    pub index: usize,
}

impl<T: Element> Candidate<T> {
    /// Seed a reduction from one element
    #[inline(always)]
    pub fn new(value: T, index: usize) -> Self {
        Self { value, index }
    }

    /// Offer a later element to the scan
    ///
    /// `index` must be greater than every index already folded in; the
    /// candidate is replaced only on strict improvement.
    #[inline(always)]
    pub fn offer<R: Reduction>(&mut self, value: T, index: usize) {
        if R::better(value, self.value) {
            self.value = value;
            self.index = index;
        }
    }

    /// Merge two candidates from arbitrary positions
    ///
    /// The better value wins; if neither is better the lower index wins.
    #[inline(always)]
    pub fn merge<R: Reduction>(self, other: Self) -> Self {
        if R::better(other.value, self.value) {
            other
        } else if R::better(self.value, other.value) {
            self
        } else if other.index < self.index {
            other
        } else {
            self
        }
    }

    /// Move the index by `offset` (rebasing a span-local result)
    #[inline(always)]
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            value: self.value,
            index: self.index + offset,
        }
    }
}

/// Collapse candidates by repeatedly merging adjacent pairs
///
/// Returns `None` for an empty slice. The slice is used as scratch space.
pub fn tree_reduce<R: Reduction, T: Element>(candidates: &mut [Candidate<T>]) -> Option<Candidate<T>> {
    let mut live = candidates.len();
    if live == 0 {
        return None;
    }

    while live > 1 {
        let pairs = live / 2;
        for k in 0..pairs {
            candidates[k] = candidates[2 * k].merge::<R>(candidates[2 * k + 1]);
        }
        // Odd element rides up to the next level untouched
        if live % 2 == 1 {
            candidates[pairs] = candidates[live - 1];
            live = pairs + 1;
        } else {
            live = pairs;
        }
    }

    Some(candidates[0])
}
