//! The measured operations and the registry that names them.
//!
//! Each operation builds one [`Exception`] and hands it to a [`Sink`].
//! They share no state and can run on any number of threads at once.

use crate::error::Error;
use crate::exception::{Exception, ExceptionKind, MESSAGE};
use crate::sink::{Blackhole, Sink};

/// Build a runtime exception (stack captured by default) and consume it.
#[inline]
pub fn measure_default_exception<S: Sink>(sink: &S) {
    sink.consume(Exception::runtime(MESSAGE));
}

/// Build an exception that skips stack capture and consume it.
#[inline]
pub fn measure_exception_without_stack_trace<S: Sink>(sink: &S) {
    sink.consume(Exception::without_stack_trace(MESSAGE));
}

/// Build an exception that forces stack capture and consume it.
#[inline]
pub fn measure_exception_with_stack_trace<S: Sink>(sink: &S) {
    sink.consume(Exception::with_stack_trace(MESSAGE));
}

/// A registered benchmark.
#[derive(Debug, Clone, Copy)]
pub struct Benchmark {
    /// Stable identifier (e.g., `runtime_exception`).
    pub name: &'static str,
    /// Which exception variant the operation builds.
    pub kind: ExceptionKind,
    /// One-line description for listings.
    pub description: &'static str,
    /// The measured operation.
    pub op: fn(&Blackhole),
}

impl Benchmark {
    #[must_use]
    pub fn captures_stack(&self) -> bool {
        self.kind.captures_stack()
    }
}

static REGISTRY: [Benchmark; 3] = [
    Benchmark {
        name: ExceptionKind::Runtime.as_str(),
        kind: ExceptionKind::Runtime,
        description: "Runtime exception with the default stack capture",
        op: measure_default_exception::<Blackhole>,
    },
    Benchmark {
        name: ExceptionKind::WithoutStackTrace.as_str(),
        kind: ExceptionKind::WithoutStackTrace,
        description: "Exception that skips stack capture",
        op: measure_exception_without_stack_trace::<Blackhole>,
    },
    Benchmark {
        name: ExceptionKind::WithStackTrace.as_str(),
        kind: ExceptionKind::WithStackTrace,
        description: "Exception that forces stack capture",
        op: measure_exception_with_stack_trace::<Blackhole>,
    },
];

/// All benchmarks in stable order.
#[must_use]
pub fn registry() -> &'static [Benchmark] {
    &REGISTRY
}

/// Look up a benchmark by exact name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Benchmark> {
    REGISTRY.iter().find(|b| b.name == name)
}

/// Benchmarks whose name contains `filter`, or all of them for `None`.
pub fn select(filter: Option<&str>) -> Result<Vec<&'static Benchmark>, Error> {
    let Some(filter) = filter else {
        return Ok(REGISTRY.iter().collect());
    };

    let selected: Vec<&'static Benchmark> =
        REGISTRY.iter().filter(|b| b.name.contains(filter)).collect();

    if selected.is_empty() {
        return Err(Error::UnknownBenchmark {
            filter: filter.to_string(),
            available: REGISTRY.iter().map(|b| b.name).collect(),
        });
    }

    Ok(selected)
}
