//! Benchmark runner.
//!
//! Runs each selected benchmark through warmup and measured samples,
//! optionally on several worker threads sharing one [`Blackhole`].

use super::stats::{compute_stats, ratio};
use super::{codes, rusage, BenchParams, BenchReport, BenchResult, BenchWarning};
use crate::error::Error;
use crate::exception::ExceptionKind;
use crate::harness::{select, Benchmark};
use crate::sink::Blackhole;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Run every benchmark whose name contains `filter` (all for `None`).
///
/// Returns a complete report, or an error for invalid parameters, a filter
/// that matches nothing, or a worker thread that panicked.
pub fn run_benchmarks(params: &BenchParams, filter: Option<&str>) -> Result<BenchReport, Error> {
    params.validate()?;
    let selected = select(filter)?;

    let mut warnings = Vec::new();
    if params.iters < 10 {
        warnings.push(BenchWarning::info(
            codes::LOW_ITERS,
            format!(
                "Low iteration count ({}); results may have high variance",
                params.iters
            ),
        ));
    }
    if params.batch < 100 {
        warnings.push(BenchWarning::warn(
            codes::LOW_BATCH,
            format!(
                "Small batch ({}); timer resolution may dominate per-op figures",
                params.batch
            ),
        ));
    }

    let sink = Blackhole::new();
    let mut results = Vec::with_capacity(selected.len());
    for bench in selected {
        results.push(run_one(bench, params, &sink)?);
    }
    apply_baseline(&mut results);

    debug!(consumed = sink.consumed(), "benchmarks finished");
    Ok(BenchReport::new(
        params.clone(),
        results,
        warnings,
        sink.consumed(),
    ))
}

fn run_one(bench: &Benchmark, params: &BenchParams, sink: &Blackhole) -> Result<BenchResult, Error> {
    let span = tracing::debug_span!("bench", name = bench.name, threads = params.threads);
    let _guard = span.enter();

    let before = rusage::snapshot_self();
    let samples = if params.threads == 1 {
        collect_samples(bench.op, params, sink)
    } else {
        collect_samples_parallel(bench.name, bench.op, params, sink)?
    };
    let after = rusage::snapshot_self();

    let cpu_us = before.zip(after).map(|(b, a)| b.cpu_us_until(&a));
    let stats = compute_stats(&samples);
    debug!(
        median_ns = stats.median_ns,
        p95_ns = stats.p95_ns,
        cpu_us,
        "benchmark complete"
    );

    // validate() keeps iters * threads within u32
    Ok(BenchResult::new(bench, samples.len() as u32, stats, cpu_us))
}

fn collect_samples_parallel(
    name: &'static str,
    op: fn(&Blackhole),
    params: &BenchParams,
    sink: &Blackhole,
) -> Result<Vec<u64>, Error> {
    let joined: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..params.threads)
            .map(|_| s.spawn(move || collect_samples(op, params, sink)))
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    let mut samples = Vec::with_capacity(params.iters as usize * params.threads as usize);
    for worker in joined {
        let mut part = worker.map_err(|_| Error::WorkerPanicked { benchmark: name })?;
        samples.append(&mut part);
    }
    Ok(samples)
}

/// Warmup, then one ns/op sample per measured batch.
fn collect_samples(op: fn(&Blackhole), params: &BenchParams, sink: &Blackhole) -> Vec<u64> {
    for _ in 0..params.warmup {
        run_batch(op, params.batch, sink);
    }

    let mut samples = Vec::with_capacity(params.iters as usize);
    for _ in 0..params.iters {
        let start = Instant::now();
        run_batch(op, params.batch, sink);
        let elapsed = start.elapsed();
        samples.push(duration_to_nanos(elapsed) / u64::from(params.batch));
    }

    trace!(samples = samples.len(), "worker done");
    samples
}

#[inline]
fn run_batch(op: fn(&Blackhole), batch: u32, sink: &Blackhole) {
    for _ in 0..batch {
        op(sink);
    }
}

/// Truncation is intentional: durations over ~585 years would overflow.
#[allow(clippy::cast_possible_truncation)]
fn duration_to_nanos(d: Duration) -> u64 {
    d.as_nanos() as u64
}

/// Fill `ratio_vs_baseline` against the non-capturing variant, if it ran.
fn apply_baseline(results: &mut [BenchResult]) {
    let Some(baseline_ns) = results
        .iter()
        .find(|r| r.name == ExceptionKind::WithoutStackTrace.as_str())
        .map(|r| r.median_ns)
    else {
        return;
    };

    for result in results.iter_mut() {
        result.ratio_vs_baseline = ratio(result.median_ns, baseline_ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_params() -> BenchParams {
        BenchParams {
            iters: 10,
            warmup: 1,
            batch: 100,
            threads: 1,
        }
    }

    #[test]
    fn test_run_benchmarks_returns_three_results() {
        let report = run_benchmarks(&quick_params(), None).unwrap();

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "runtime_exception",
                "exception_without_stack_trace",
                "exception_with_stack_trace"
            ]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_results_are_ordered() {
        let report = run_benchmarks(&quick_params(), None).unwrap();

        for result in &report.results {
            assert_eq!(result.samples, 10);
            assert_eq!(result.unit, "ns/op");
            assert!(
                result.median_ns >= result.min_ns,
                "{} median should be >= min",
                result.name
            );
            assert!(
                result.p95_ns >= result.median_ns,
                "{} p95 should be >= median",
                result.name
            );
            assert!(
                result.max_ns >= result.p95_ns,
                "{} max should be >= p95",
                result.name
            );
        }
    }

    #[test]
    fn test_captures_stack_flag_in_results() {
        let report = run_benchmarks(&quick_params(), None).unwrap();
        let flags: Vec<bool> = report.results.iter().map(|r| r.captures_stack).collect();
        assert_eq!(flags, [true, false, true]);
    }

    #[test]
    fn test_consumed_counts_every_invocation() {
        let params = quick_params();
        let report = run_benchmarks(&params, Some("without")).unwrap();

        let per_bench = u64::from((params.iters + params.warmup) * params.batch);
        assert_eq!(report.consumed, per_bench);
    }

    #[test]
    fn test_threads_multiply_samples() {
        let params = BenchParams {
            threads: 3,
            ..quick_params()
        };
        let report = run_benchmarks(&params, Some("runtime")).unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].samples, 30);
        assert_eq!(
            report.consumed,
            u64::from(3 * (params.iters + params.warmup) * params.batch)
        );
    }

    #[test]
    fn test_baseline_ratio() {
        let report = run_benchmarks(&quick_params(), None).unwrap();
        let baseline = report
            .results
            .iter()
            .find(|r| r.name == "exception_without_stack_trace")
            .unwrap();

        if baseline.median_ns > 0 {
            assert_eq!(baseline.ratio_vs_baseline, Some(1.0));
        }
    }

    #[test]
    fn test_no_ratio_without_baseline() {
        let report = run_benchmarks(&quick_params(), Some("with_stack_trace")).unwrap();
        assert!(report.results.iter().all(|r| r.ratio_vs_baseline.is_none()));
    }

    #[test]
    fn test_low_iters_and_batch_warnings() {
        let params = BenchParams {
            iters: 5,
            warmup: 0,
            batch: 10,
            threads: 1,
        };
        let report = run_benchmarks(&params, Some("without")).unwrap();

        let codes: Vec<&str> = report.warnings.iter().map(|w| w.code.as_str()).collect();
        assert!(codes.contains(&codes::LOW_ITERS));
        assert!(codes.contains(&codes::LOW_BATCH));
    }

    #[test]
    fn test_unknown_filter_is_error() {
        let err = run_benchmarks(&quick_params(), Some("nope")).unwrap_err();
        assert!(matches!(err, Error::UnknownBenchmark { .. }));
    }

    #[test]
    fn test_invalid_params_are_error() {
        let params = BenchParams {
            iters: 0,
            ..quick_params()
        };
        let err = run_benchmarks(&params, None).unwrap_err();
        assert!(matches!(err, Error::InvalidParam { name: "iters", .. }));
    }

    fn panicking_op(_: &Blackhole) {
        panic!("construction failed");
    }

    #[test]
    fn test_parallel_worker_panic_is_error() {
        let params = BenchParams {
            threads: 2,
            ..quick_params()
        };
        let sink = Blackhole::new();

        let err = collect_samples_parallel("exploding", panicking_op, &params, &sink).unwrap_err();
        assert!(matches!(
            err,
            Error::WorkerPanicked {
                benchmark: "exploding"
            }
        ));
    }

    #[test]
    fn test_parallel_samples_merge_all_workers() {
        let params = BenchParams {
            threads: 4,
            ..quick_params()
        };
        let sink = Blackhole::new();
        let bench = crate::harness::find("exception_without_stack_trace").unwrap();

        let samples = collect_samples_parallel(bench.name, bench.op, &params, &sink).unwrap();
        assert_eq!(samples.len(), 40);
    }

    #[test]
    fn test_apply_baseline_computes_ratios() {
        let bench = crate::harness::find("exception_without_stack_trace").unwrap();
        let stats = |median_ns| super::super::BenchStats {
            min_ns: median_ns,
            median_ns,
            p95_ns: median_ns,
            max_ns: median_ns,
        };
        let mut results = vec![
            BenchResult::new(bench, 1, stats(400), None),
            BenchResult::new(bench, 1, stats(100), None),
        ];
        results[0].name = "runtime_exception".to_string();

        apply_baseline(&mut results);

        assert_eq!(results[0].ratio_vs_baseline, Some(4.0));
        assert_eq!(results[1].ratio_vs_baseline, Some(1.0));
    }
}
