//! Command-line and environment configuration

use clap::{Parser, ValueEnum};
use rayo::{Backend, Kernels};

use crate::error::{BenchError, Result};
use crate::measure::RunConfig;
use crate::sweep::Sweep;

#[derive(Parser, Debug)]
#[command(name = "rayo-bench")]
#[command(author, version, about = "Axpy throughput harness for the rayo Level-1 kernels")]
#[command(long_about = "
Times y += alpha * x over a sweep of vector lengths and reports MFLOP/s.

With FROM TO STEP the sweep is FROM..=TO by STEP. Without them a fixed
geometric ladder from 10488 to 10000000 elements is sampled.

One CSV row (size,mflops) per length goes to stdout; progress goes to stderr.
")]
pub struct Cli {
    /// First vector length
    pub from: Option<usize>,

    /// Last vector length (raised to FROM if smaller)
    pub to: Option<usize>,

    /// Length increment
    pub step: Option<usize>,

    /// Timed calls per length; the first is a warm-up when more than one
    #[arg(long, env = "RAYO_LOOPS", default_value_t = 1)]
    pub loops: u32,

    /// Stride of x
    #[arg(long, env = "RAYO_INCX", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub incx: u32,

    /// Stride of y
    #[arg(long, env = "RAYO_INCY", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub incy: u32,

    /// Scale factor applied to x
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Element precision
    #[arg(long, value_enum, default_value_t = Precision::Double)]
    pub precision: Precision,

    /// Kernel backend (must be compiled into this build)
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    pub backend: BackendChoice,

    /// RNG seed for the input data (defaults to the process id)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Precision {
    /// f32
    Single,
    /// f64
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    Auto,
    Scalar,
    Sse2,
    Avx2,
    Neon,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto => Backend::Auto,
            BackendChoice::Scalar => Backend::Scalar,
            BackendChoice::Sse2 => Backend::SSE2,
            BackendChoice::Avx2 => Backend::AVX2,
            BackendChoice::Neon => Backend::NEON,
        }
    }
}

impl Cli {
    /// Size sweep implied by the positional arguments
    pub fn sweep(&self) -> Result<Sweep> {
        if self.from.is_none() && self.to.is_none() && self.step.is_none() {
            return Ok(Sweep::Geometric);
        }

        let from = self.from.unwrap_or(1);
        let to = self.to.unwrap_or(200);
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(BenchError::ZeroStep);
        }
        Ok(Sweep::linear(from, to, step))
    }

    /// Fixed per-call parameters
    pub fn run_config(&self) -> Result<RunConfig> {
        if self.loops == 0 {
            return Err(BenchError::ZeroLoops);
        }
        Ok(RunConfig {
            kernels: Kernels::with_backend(self.backend.into())?,
            alpha: self.alpha,
            incx: self.incx as usize,
            incy: self.incy as usize,
            loops: self.loops,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| u64::from(std::process::id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rayo-bench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_positionals_is_geometric() {
        assert_eq!(parse(&[]).sweep().unwrap(), Sweep::Geometric);
    }

    #[test]
    fn test_positionals_fill_defaults() {
        assert_eq!(parse(&["5"]).sweep().unwrap(), Sweep::linear(5, 200, 1));
        assert_eq!(parse(&["5", "50", "5"]).sweep().unwrap(), Sweep::linear(5, 50, 5));
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(matches!(parse(&["1", "10", "0"]).sweep(), Err(BenchError::ZeroStep)));
    }

    #[test]
    fn test_zero_loops_rejected() {
        assert!(matches!(parse(&["--loops", "0"]).run_config(), Err(BenchError::ZeroLoops)));
    }

    #[test]
    fn test_zero_stride_rejected_by_parser() {
        let args = ["rayo-bench", "--incx", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_scalar_backend_config() {
        let cli = parse(&["--backend", "scalar", "--incy", "3", "--alpha", "0.5"]);
        let config = cli.run_config().unwrap();
        assert_eq!(config.kernels.backend(), Backend::Scalar);
        assert_eq!(config.incy, 3);
        assert_eq!(config.alpha, 0.5);
    }

    #[test]
    fn test_seed_override() {
        assert_eq!(parse(&["--seed", "42"]).seed(), 42);
    }
}
