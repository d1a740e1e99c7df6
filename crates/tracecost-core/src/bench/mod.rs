//! Standalone timing loop for the registered benchmarks.
//!
//! A quick, self-contained alternative to the Criterion suite in
//! `tracecost-bench`: warmup samples, measured samples, simple statistics.
//!
//! ## Design Principles
//! - Each sample times a batch of invocations and reports ns/op
//! - CPU time is taken from `getrusage(2)` around each benchmark
//! - Every constructed value goes through one shared [`Blackhole`](crate::Blackhole)

use crate::error::Error;
use crate::harness::Benchmark;
use serde::{Deserialize, Serialize};

pub mod runner;
pub mod rusage;
pub mod stats;

pub use runner::run_benchmarks;
pub use stats::compute_stats;

/// Bench report schema version. Bump when changing JSON structure.
pub const BENCH_SCHEMA_VERSION: u32 = 1;

/// Default number of measured samples.
pub const DEFAULT_ITERS: u32 = 50;

/// Default number of warmup samples.
pub const DEFAULT_WARMUP: u32 = 10;

/// Default invocations per sample.
pub const DEFAULT_BATCH: u32 = 1000;

/// Default worker thread count.
pub const DEFAULT_THREADS: u32 = 1;

/// Upper bound on worker threads.
pub const MAX_THREADS: u32 = 256;

/// Severity levels for bench warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

/// A benchmark warning with a stable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchWarning {
    /// Stable warning code (e.g., `LOW_ITERS`).
    pub code: String,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl BenchWarning {
    #[must_use]
    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warn(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warn,
            message: message.into(),
        }
    }
}

/// Warning codes for bench.
pub mod codes {
    pub const LOW_ITERS: &str = "LOW_ITERS";
    pub const LOW_BATCH: &str = "LOW_BATCH";
}

/// Runtime information for the benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRuntimeInfo {
    pub tracecost_version: String,
    pub os: String,
    pub arch: String,
}

/// Benchmark parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchParams {
    /// Measured samples per worker.
    pub iters: u32,
    /// Unmeasured samples per worker.
    pub warmup: u32,
    /// Invocations timed together in one sample.
    pub batch: u32,
    /// Worker threads running the operation concurrently.
    pub threads: u32,
}

impl Default for BenchParams {
    fn default() -> Self {
        Self {
            iters: DEFAULT_ITERS,
            warmup: DEFAULT_WARMUP,
            batch: DEFAULT_BATCH,
            threads: DEFAULT_THREADS,
        }
    }
}

impl BenchParams {
    /// Reject parameters the timing loop cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.iters == 0 {
            return Err(Error::invalid_param("iters", "must be at least 1"));
        }
        if self.batch == 0 {
            return Err(Error::invalid_param("batch", "must be at least 1"));
        }
        if self.threads == 0 || self.threads > MAX_THREADS {
            return Err(Error::invalid_param(
                "threads",
                format!("must be between 1 and {MAX_THREADS}"),
            ));
        }
        if u64::from(self.iters) * u64::from(self.threads) > u64::from(u32::MAX) {
            return Err(Error::invalid_param(
                "iters",
                format!("iters * threads must not exceed {}", u32::MAX),
            ));
        }
        Ok(())
    }
}

/// Statistics for a single benchmark.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BenchStats {
    pub min_ns: u64,
    pub median_ns: u64,
    pub p95_ns: u64,
    pub max_ns: u64,
}

/// Result of a single benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Stable identifier (e.g., `runtime_exception`).
    pub name: String,
    /// Unit of measurement.
    pub unit: String,
    /// Whether the measured construction walks the stack.
    pub captures_stack: bool,
    /// Number of samples taken across all workers.
    pub samples: u32,
    /// Minimum time in nanoseconds.
    pub min_ns: u64,
    /// Median time in nanoseconds.
    pub median_ns: u64,
    /// 95th percentile time in nanoseconds.
    pub p95_ns: u64,
    /// Maximum time in nanoseconds.
    pub max_ns: u64,
    /// Process CPU time (user + system) spent on this benchmark, if known.
    pub cpu_us: Option<u64>,
    /// Median relative to `exception_without_stack_trace`.
    pub ratio_vs_baseline: Option<f64>,
}

impl BenchResult {
    /// Create a new bench result from stats.
    #[must_use]
    pub fn new(bench: &Benchmark, samples: u32, stats: BenchStats, cpu_us: Option<u64>) -> Self {
        Self {
            name: bench.name.to_string(),
            unit: "ns/op".to_string(),
            captures_stack: bench.captures_stack(),
            samples,
            min_ns: stats.min_ns,
            median_ns: stats.median_ns,
            p95_ns: stats.p95_ns,
            max_ns: stats.max_ns,
            cpu_us,
            ratio_vs_baseline: None,
        }
    }
}

/// Complete benchmark report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Schema version for this report format.
    pub bench_schema_version: u32,
    /// Runtime information.
    pub runtime: BenchRuntimeInfo,
    /// Benchmark parameters.
    pub params: BenchParams,
    /// Benchmark results.
    pub results: Vec<BenchResult>,
    /// Warnings encountered during benchmarking.
    pub warnings: Vec<BenchWarning>,
    /// Values handed to the sink, warmup included.
    pub consumed: u64,
}

impl BenchReport {
    /// Create a new benchmark report.
    #[must_use]
    pub fn new(
        params: BenchParams,
        results: Vec<BenchResult>,
        warnings: Vec<BenchWarning>,
        consumed: u64,
    ) -> Self {
        Self {
            bench_schema_version: BENCH_SCHEMA_VERSION,
            runtime: BenchRuntimeInfo {
                tracecost_version: crate::version::VERSION.to_string(),
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
            },
            params,
            results,
            warnings,
            consumed,
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
