//! Timed axpy runs

use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use rayo::{Accelerated, Kernels};
use tracing::debug;

const MIN_SECONDS: f64 = 1e-9;

/// Element types the harness can time
pub trait Sample: Accelerated {
    /// Narrow a generated `f64` to this precision
    fn from_f64(value: f64) -> Self;
}

impl Sample for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Fixed parameters of every timed call
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub kernels: Kernels,
    pub alpha: f64,
    pub incx: usize,
    pub incy: usize,
    pub loops: u32,
}

/// Averaged timing for one size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub size: usize,
    /// Mean seconds per counted call
    pub seconds: f64,
    /// Calls that went into the mean
    pub calls: u32,
}

impl Measurement {
    /// Floating-point operations of one call: a multiply and an add per element
    pub fn flops(&self) -> f64 {
        2.0 * self.size as f64
    }

    /// Millions of floating-point operations per second
    ///
    /// Calls faster than the clock resolution are counted as one nanosecond.
    pub fn mflops(&self) -> f64 {
        self.flops() / self.seconds.max(MIN_SECONDS) * 1e-6
    }
}

/// Reusable `x` and `y` buffers sized for the largest vector of a sweep
///
/// The buffers carry the strides they were sized for, so every refill and
/// timed call walks them with the same layout.
pub struct Buffers<T> {
    x: Vec<T>,
    y: Vec<T>,
    incx: usize,
    incy: usize,
}

impl<T: Sample> Buffers<T> {
    pub fn new(largest: usize, config: &RunConfig) -> Self {
        Self {
            x: vec![T::ZERO; largest * config.incx],
            y: vec![T::ZERO; largest * config.incy],
            incx: config.incx,
            incy: config.incy,
        }
    }

    fn refill(&mut self, rng: &mut StdRng, size: usize) {
        for v in &mut self.x[..size * self.incx] {
            *v = T::from_f64(rng.random_range(-0.5..0.5));
        }
        for v in &mut self.y[..size * self.incy] {
            *v = T::from_f64(rng.random_range(-0.5..0.5));
        }
    }
}

/// Mean of the counted timings and how many were counted
///
/// A lone call is always counted. Otherwise the first call is a warm-up.
fn average(timings: &[f64]) -> (f64, u32) {
    let counted: &[f64] = match timings {
        [only] => std::slice::from_ref(only),
        [_warmup, rest @ ..] => rest,
        [] => &[],
    };
    let calls = counted.len() as u32;
    (counted.iter().sum::<f64>() / f64::from(calls.max(1)), calls)
}

/// Time axpy at one size
///
/// Data is regenerated before each call. With more than one loop the first
/// call only warms caches and is left out of the mean.
pub fn time_axpy<T: Sample>(
    config: &RunConfig,
    buffers: &mut Buffers<T>,
    rng: &mut StdRng,
    size: usize,
) -> Measurement {
    let alpha = T::from_f64(config.alpha);
    let mut timings = Vec::with_capacity(config.loops as usize);

    for _ in 0..config.loops {
        buffers.refill(rng, size);

        let start = Instant::now();
        config.kernels.axpy(
            size as isize,
            alpha,
            &buffers.x,
            buffers.incx as isize,
            &mut buffers.y,
            buffers.incy as isize,
        );
        timings.push(start.elapsed().as_secs_f64());
    }

    let (seconds, calls) = average(&timings);
    debug!(size, seconds, calls, "timed axpy");
    Measurement { size, seconds, calls }
}
