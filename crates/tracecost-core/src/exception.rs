//! Error values that differ only in whether they capture a stack trace.
//!
//! One concrete [`Exception`] type covers every variant. The
//! [`ExceptionKind`] decides at construction whether the call stack is
//! walked; nothing else about the value changes.

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Message every measured construction uses.
pub const MESSAGE: &str = "aaa";

/// Which construction path an [`Exception`] takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExceptionKind {
    /// Plain runtime error; captures a stack trace like the platform default.
    #[serde(rename = "runtime_exception")]
    Runtime,
    /// Skips stack capture entirely.
    #[serde(rename = "exception_without_stack_trace")]
    WithoutStackTrace,
    /// Forces stack capture explicitly.
    #[serde(rename = "exception_with_stack_trace")]
    WithStackTrace,
}

impl ExceptionKind {
    /// All kinds in registry order.
    pub const ALL: [Self; 3] = [Self::Runtime, Self::WithoutStackTrace, Self::WithStackTrace];

    /// Whether constructing this kind walks the call stack.
    #[must_use]
    pub const fn captures_stack(self) -> bool {
        match self {
            Self::Runtime | Self::WithStackTrace => true,
            Self::WithoutStackTrace => false,
        }
    }

    /// Stable identifier, also used as the benchmark name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime_exception",
            Self::WithoutStackTrace => "exception_without_stack_trace",
            Self::WithStackTrace => "exception_with_stack_trace",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call stack recorded when an [`Exception`] was built.
///
/// The top frame is the construction call site; the rest comes from a
/// forced backtrace capture, so it is populated regardless of
/// `RUST_BACKTRACE`.
#[derive(Debug)]
pub struct StackSnapshot {
    origin: &'static Location<'static>,
    backtrace: Backtrace,
}

impl StackSnapshot {
    #[track_caller]
    fn capture() -> Self {
        Self {
            origin: Location::caller(),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// The construction call site.
    #[must_use]
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    /// Frames below the call site.
    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Whether the platform actually produced frames for the backtrace.
    #[must_use]
    pub fn frames_captured(&self) -> bool {
        self.backtrace.status() == BacktraceStatus::Captured
    }
}

impl fmt::Display for StackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "at {}", self.origin)?;
        write!(f, "{}", self.backtrace)
    }
}

/// A message-only error value.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Exception {
    kind: ExceptionKind,
    message: String,
    stack: Option<StackSnapshot>,
}

impl Exception {
    /// Build an exception of the given kind.
    ///
    /// Kinds that capture record the caller of this function as the top
    /// frame.
    #[must_use]
    #[track_caller]
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        let stack = if kind.captures_stack() {
            Some(StackSnapshot::capture())
        } else {
            None
        };

        Self {
            kind,
            message: message.into(),
            stack,
        }
    }

    #[must_use]
    #[track_caller]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::Runtime, message)
    }

    #[must_use]
    #[track_caller]
    pub fn without_stack_trace(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::WithoutStackTrace, message)
    }

    #[must_use]
    #[track_caller]
    pub fn with_stack_trace(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::WithStackTrace, message)
    }

    #[must_use]
    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The captured stack, absent for kinds that skip capture.
    #[must_use]
    pub fn stack_trace(&self) -> Option<&StackSnapshot> {
        self.stack.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stack_flag() {
        assert!(ExceptionKind::Runtime.captures_stack());
        assert!(ExceptionKind::WithStackTrace.captures_stack());
        assert!(!ExceptionKind::WithoutStackTrace.captures_stack());
    }

    #[test]
    fn test_kind_names_are_unique_snake_case() {
        let names: Vec<&str> = ExceptionKind::ALL.iter().map(|k| k.as_str()).collect();
        for name in &names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "Kind name '{name}' should be snake_case"
            );
        }
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_kind_serializes_as_name() {
        for kind in ExceptionKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));

            let back: ExceptionKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_without_stack_trace_has_no_snapshot() {
        for _ in 0..16 {
            let e = Exception::without_stack_trace(MESSAGE);
            assert!(e.stack_trace().is_none());
            assert_eq!(e.message(), MESSAGE);
        }
    }

    #[test]
    fn test_capturing_kinds_record_call_site() {
        for kind in [ExceptionKind::Runtime, ExceptionKind::WithStackTrace] {
            let line = line!() + 1;
            let e = Exception::new(kind, MESSAGE);

            let stack = e.stack_trace().expect("stack should be captured");
            assert_eq!(stack.origin().file(), file!());
            assert_eq!(stack.origin().line(), line);
        }
    }

    #[test]
    fn test_convenience_constructors_record_their_caller() {
        let line = line!() + 1;
        let e = Exception::runtime(MESSAGE);
        assert_eq!(e.kind(), ExceptionKind::Runtime);
        assert_eq!(e.stack_trace().unwrap().origin().line(), line);

        let line = line!() + 1;
        let e = Exception::with_stack_trace(MESSAGE);
        assert_eq!(e.kind(), ExceptionKind::WithStackTrace);
        assert_eq!(e.stack_trace().unwrap().origin().line(), line);
    }

    #[test]
    fn test_backtrace_is_forced() {
        let e = Exception::runtime(MESSAGE);
        let stack = e.stack_trace().unwrap();
        assert_ne!(stack.backtrace().status(), BacktraceStatus::Disabled);
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    fn test_frames_captured_on_supported_platforms() {
        let e = Exception::with_stack_trace(MESSAGE);
        assert!(e.stack_trace().unwrap().frames_captured());
    }

    #[test]
    fn test_display_is_message() {
        let e = Exception::with_stack_trace(MESSAGE);
        assert_eq!(e.to_string(), "aaa");

        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(Exception::without_stack_trace("boom"));
        assert_eq!(boxed.to_string(), "boom");
    }

    #[test]
    fn test_snapshot_display_starts_with_origin() {
        let e = Exception::runtime(MESSAGE);
        let rendered = e.stack_trace().unwrap().to_string();
        assert!(rendered.starts_with("at "));
        assert!(rendered.lines().next().unwrap().contains(file!()));
    }

    #[test]
    fn test_repeated_construction_is_independent() {
        let a = Exception::runtime(MESSAGE);
        let b = Exception::runtime(MESSAGE);
        assert_eq!(a.message(), b.message());
        assert!(!std::ptr::eq(a.message().as_ptr(), b.message().as_ptr()));
    }
}
