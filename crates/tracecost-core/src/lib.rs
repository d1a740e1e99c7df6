#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]

pub mod bench;
pub mod config;
pub mod error;
pub mod exception;
pub mod harness;
pub mod sink;
pub mod version;

pub use config::Config;
pub use error::Error;
pub use exception::{Exception, ExceptionKind, StackSnapshot, MESSAGE};
pub use harness::{
    find, measure_default_exception, measure_exception_with_stack_trace,
    measure_exception_without_stack_trace, registry, select, Benchmark,
};
pub use sink::{Blackhole, Sink};
pub use version::VERSION;
