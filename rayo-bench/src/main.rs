//! rayo-bench CLI
//!
//! Axpy throughput sweep over the rayo Level-1 kernels

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use rayo_bench::cli::{Cli, Precision};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let sweep = cli.sweep().context("invalid size sweep")?;
    let config = cli.run_config().context("invalid run configuration")?;
    let threads = std::env::var("OMP_NUM_THREADS").ok();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let (mut out, mut progress) = (stdout.lock(), stderr.lock());

    let written = match cli.precision {
        Precision::Single => {
            rayo_bench::run::<f32>(&sweep, &config, cli.seed(), threads.as_deref(), &mut out, &mut progress)
        }
        Precision::Double => {
            rayo_bench::run::<f64>(&sweep, &config, cli.seed(), threads.as_deref(), &mut out, &mut progress)
        }
    };
    written.context("failed to write results")
}
