//! Vector sizes visited by a benchmark run

/// Geometric size ladder, about 10% apart, from ~10K up to 10M elements
pub const GEOMETRIC_SIZES: [usize; 73] = [
    10488, 11536, 12689, 13957, 15352, 16887, 18575, 20432, 22475, 24722, 27194, 29913, 32904, 36194,
    39813, 43794, 48173, 52990, 58289, 64117, 70528, 77580, 85338, 93871, 103258, 113583, 124941,
    137435, 151178, 166295, 182924, 201216, 221337, 243470, 267817, 294598, 324057, 356462, 392108,
    431318, 474449, 521893, 574082, 631490, 694639, 764102, 840512, 924563, 1017019, 1118720,
    1230592, 1353651, 1489016, 1637917, 1801708, 1981878, 2180065, 2398071, 2637878, 2901665,
    3191831, 3511014, 3862115, 4248326, 4673158, 5140474, 5654521, 6219973, 6841970, 7526167,
    8278784, 9106663, 10000000,
];

/// Ladder entries skipped between measurements
pub const GEOMETRIC_STRIDE: usize = 3;

/// Which sizes a run measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// `from..=to` in steps of `step`
    Linear { from: usize, to: usize, step: usize },
    /// Every [`GEOMETRIC_STRIDE`]th entry of [`GEOMETRIC_SIZES`]
    Geometric,
}

impl Sweep {
    /// Build a linear sweep; `to` is raised to `from` if smaller
    pub fn linear(from: usize, to: usize, step: usize) -> Self {
        Sweep::Linear {
            from,
            to: to.max(from),
            step,
        }
    }

    /// Sizes in visiting order
    pub fn sizes(&self) -> Vec<usize> {
        match *self {
            Sweep::Linear { from, to, step } => (from..=to).step_by(step.max(1)).collect(),
            Sweep::Geometric => GEOMETRIC_SIZES.iter().step_by(GEOMETRIC_STRIDE).copied().collect(),
        }
    }

    /// `(from, to, step)` as shown in the run header
    pub fn bounds(&self) -> (usize, usize, usize) {
        match *self {
            Sweep::Linear { from, to, step } => (from, to, step),
            Sweep::Geometric => (
                GEOMETRIC_SIZES[0],
                GEOMETRIC_SIZES[GEOMETRIC_SIZES.len() - 1],
                GEOMETRIC_STRIDE,
            ),
        }
    }

    /// Largest size visited
    pub fn largest(&self) -> usize {
        self.sizes().into_iter().max().unwrap_or(0)
    }
}
