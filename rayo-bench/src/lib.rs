//! rayo-bench: Axpy throughput harness
//!
//! Drives `rayo::Kernels::axpy` across a sweep of vector lengths and reports
//! achieved MFLOP/s, one CSV row per length.
//!
//! # Example
//!
//! ```rust
//! use rayo_bench::sweep::Sweep;
//!
//! let sizes = Sweep::linear(100, 300, 100).sizes();
//! assert_eq!(sizes, vec![100, 200, 300]);
//! ```

pub mod cli;
pub mod error;
pub mod measure;
pub mod report;
pub mod sweep;

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub use error::{BenchError, Result};
use measure::{Buffers, RunConfig, Sample};
use sweep::Sweep;

/// Run a sweep, writing CSV rows to `out` and progress to `progress`
///
/// `threads` is the configured thread count, echoed as the first CSV column
/// when present.
pub fn run<T: Sample>(
    sweep: &Sweep,
    config: &RunConfig,
    seed: u64,
    threads: Option<&str>,
    out: &mut impl Write,
    progress: &mut impl Write,
) -> std::io::Result<()> {
    let (from, to, step) = sweep.bounds();
    writeln!(
        progress,
        "{}",
        report::header(from, to, step, config.incx, config.incy, config.loops)
    )?;
    writeln!(progress, "{}", report::COLUMNS)?;

    info!(
        backend = ?config.kernels.backend(),
        precision = T::PREFIX,
        seed,
        "starting sweep"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut buffers = Buffers::<T>::new(sweep.largest(), config);

    for size in sweep.sizes() {
        let m = measure::time_axpy(config, &mut buffers, &mut rng, size);
        writeln!(out, "{}", report::csv_row(threads, &m))?;
        writeln!(progress, "{}", report::progress_line(&m))?;
    }

    out.flush()
}
