#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use tracecost_core::bench::{
    BenchParams, DEFAULT_BATCH, DEFAULT_ITERS, DEFAULT_THREADS, DEFAULT_WARMUP,
};
use tracecost_core::Config;

#[derive(Parser, Debug)]
#[command(name = "tracecost")]
#[command(author, version, about = "Measure the cost of capturing stack traces in error values", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// List the registered benchmarks
    List,

    /// Run the exception construction benchmarks
    Bench {
        /// Number of measured samples per worker
        #[arg(long, default_value_t = DEFAULT_ITERS)]
        iters: u32,

        /// Number of warmup samples per worker (not measured)
        #[arg(long, default_value_t = DEFAULT_WARMUP)]
        warmup: u32,

        /// Invocations timed together in one sample
        #[arg(long, default_value_t = DEFAULT_BATCH)]
        batch: u32,

        /// Worker threads running each benchmark concurrently
        #[arg(long, default_value_t = DEFAULT_THREADS, env = "TRACECOST_THREADS")]
        threads: u32,

        /// Only run benchmarks whose name contains this string
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::default()
        .with_verbosity(cli.verbose)
        .with_json(cli.json);

    logging::init(config.verbosity, config.json);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::List) => commands::list::run(config.json),
        Some(Commands::Bench {
            iters,
            warmup,
            batch,
            threads,
            filter,
        }) => {
            config = config.with_bench(BenchParams {
                iters,
                warmup,
                batch,
                threads,
            });
            let span = tracing::info_span!("bench", cmd = "bench");
            let _guard = span.enter();
            commands::bench::run(&config, filter.as_deref())
        }
    }
}
