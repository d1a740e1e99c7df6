#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Criterion benchmarks for tracecost.
//!
//! Run benchmarks with: `cargo bench -p tracecost-bench`
//!
//! The bench target drives the same registered operations as
//! `tracecost bench`, under Criterion's statistics.
