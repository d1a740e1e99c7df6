use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};
use tracecost_core::bench::{run_benchmarks, BenchReport, Severity};
use tracecost_core::Config;

/// Run the bench command.
///
/// When `config.json` is true, outputs a single JSON object to stdout.
/// Otherwise, outputs a human-readable table to stdout.
pub fn run(config: &Config, filter: Option<&str>) -> Result<()> {
    let report = run_benchmarks(&config.bench, filter).into_diagnostic()?;

    if config.json {
        print_json(&report)
    } else {
        print_human(&report)
    }
}

fn print_json(report: &BenchReport) -> Result<()> {
    let json = report.to_json().into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &BenchReport) -> Result<()> {
    let mut out = io::stdout().lock();

    writeln!(out, "\x1b[1mtracecost bench\x1b[0m").into_diagnostic()?;
    writeln!(
        out,
        "Params: iters={} warmup={} batch={} threads={}",
        report.params.iters, report.params.warmup, report.params.batch, report.params.threads
    )
    .into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    for result in &report.results {
        let stack = if result.captures_stack {
            "stack"
        } else {
            "no-stack"
        };
        let ratio = result
            .ratio_vs_baseline
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}x"));
        let cpu = result
            .cpu_us
            .map_or_else(|| "-".to_string(), |us| format_duration(us * 1_000));

        writeln!(
            out,
            "\x1b[32m{:<32}\x1b[0m {:<9} median={:<10} p95={:<10} ratio={:<7} \x1b[90mmin={:<10} max={:<10} cpu={}\x1b[0m",
            result.name,
            stack,
            format_duration(result.median_ns),
            format_duration(result.p95_ns),
            ratio,
            format_duration(result.min_ns),
            format_duration(result.max_ns),
            cpu
        )
        .into_diagnostic()?;
    }

    if !report.warnings.is_empty() {
        writeln!(out).into_diagnostic()?;
        writeln!(
            out,
            "\x1b[1mWarnings\x1b[0m ({} total)",
            report.warnings.len()
        )
        .into_diagnostic()?;
        for warning in &report.warnings {
            let prefix = match warning.severity {
                Severity::Info => "\x1b[34minfo\x1b[0m",
                Severity::Warn => "\x1b[33mwarn\x1b[0m",
            };
            writeln!(out, "  [{prefix}] {}: {}", warning.code, warning.message)
                .into_diagnostic()?;
        }
    }

    out.flush().into_diagnostic()?;
    Ok(())
}

/// Format a duration in nanoseconds to a human-readable string.
fn format_duration(ns: u64) -> String {
    if ns >= 1_000_000_000 {
        format!("{:.2}s", ns as f64 / 1_000_000_000.0)
    } else if ns >= 1_000_000 {
        format!("{:.2}ms", ns as f64 / 1_000_000.0)
    } else if ns >= 1_000 {
        format!("{:.2}us", ns as f64 / 1_000.0)
    } else {
        format!("{ns}ns")
    }
}
