use crate::bench::BenchParams;
use serde::{Deserialize, Serialize};

/// Runtime configuration for the tracecost CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Whether to emit JSON output and JSON logs.
    pub json: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Parameters for the timing loop.
    pub bench: BenchParams,
}

impl Config {
    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Replace the benchmark parameters.
    #[must_use]
    pub fn with_bench(mut self, bench: BenchParams) -> Self {
        self.bench = bench;
        self
    }
}
