use thiserror::Error;

/// Core error type for tracecost operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No benchmark matches '{filter}' (available: {})", .available.join(", "))]
    UnknownBenchmark {
        filter: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker thread panicked while running {benchmark}")]
    WorkerPanicked { benchmark: &'static str },
}

impl Error {
    #[must_use]
    pub fn invalid_param(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name,
            reason: reason.into(),
        }
    }
}
