use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use snap_report::mode::{
    SignalRegistry, apply_to_test, effective_flags, is_active, sink_for_backend,
};
use snap_report::report::{RenderOptions, finalize_run};
use snap_report::workspace::RunPaths;

/// snap-report - Snapshot test result aggregation and report generation
#[derive(Parser, Debug)]
#[command(
    name = "snap-report",
    about = "Aggregate snapshot test capture records into a summary and a static report",
    after_help = "ENVIRONMENT VARIABLES:\n\
        SNAPREPORT_BUILD_DIR     Build directory artifacts live under\n\
        SNAPREPORT_OUTPUT_DIR    Snapshot output directory\n\
        SNAPREPORT_PROJECT_DIR   Project root passed to test invocations"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate capture records and write the summary and report files
    Report {
        /// Build directory the run wrote its records under
        #[arg(short, long, env = "SNAPREPORT_BUILD_DIR", default_value = "build")]
        build_dir: PathBuf,

        /// Embed images into the report as data URIs (single-file report)
        #[arg(long)]
        inline_images: bool,

        /// Print the aggregated summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete and recreate the results directory (pre-run clean slate)
    Clean {
        /// Build directory the results directory lives under
        #[arg(short, long, env = "SNAPREPORT_BUILD_DIR", default_value = "build")]
        build_dir: PathBuf,
    },

    /// Show the effective mode flags for a combination of scheduled
    /// tasks and property overrides
    Resolve {
        /// A record task is scheduled
        #[arg(long)]
        record: bool,

        /// A verify task is scheduled
        #[arg(long)]
        verify: bool,

        /// A compare task is scheduled
        #[arg(long)]
        compare: bool,

        /// A verify-and-record task is scheduled
        #[arg(long)]
        verify_and_record: bool,

        /// Property overrides as key=value (repeatable)
        #[arg(short = 'P', long = "property")]
        properties: Vec<String>,

        /// Test backend receiving the properties: process or child-env
        #[arg(long, default_value = "process")]
        backend: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Report {
            build_dir,
            inline_images,
            json,
        }) => {
            let paths = RunPaths::from_build_dir(&build_dir);
            let options = RenderOptions { inline_images };
            let results = finalize_run(&paths, &options)?;

            if json {
                println!("{}", results.to_json()?);
            } else {
                let summary = &results.summary;
                println!("Aggregated {} capture results", summary.total);
                println!(
                    "  added: {}  changed: {}  unchanged: {}  recorded: {}  failed: {}",
                    summary.added,
                    summary.changed,
                    summary.unchanged,
                    summary.recorded,
                    summary.failed
                );
                println!("Summary: {}", paths.summary_file.display());
                println!("Report:  {}", paths.report_file.display());
            }
        }

        Some(Commands::Clean { build_dir }) => {
            let paths = RunPaths::from_build_dir(&build_dir);
            paths.clear_results_dir()?;
            println!("Cleared {}", paths.results_dir.display());
        }

        Some(Commands::Resolve {
            record,
            verify,
            compare,
            verify_and_record,
            properties,
            backend,
        }) => {
            // The command-line flags stand in for the host task graph
            let signals = SignalRegistry::new()
                .watch_record(move || record)
                .watch_verify(move || verify)
                .watch_compare(move || compare)
                .watch_verify_and_record(move || verify_and_record)
                .resolve();
            let overrides = parse_properties(&properties)?;

            let flags = effective_flags(&signals, &overrides);
            println!("active:  {}", is_active(&signals, &overrides));
            println!("record:  {}", flags.record);
            println!("verify:  {}", flags.verify);
            println!("compare: {}", flags.compare);

            let paths = RunPaths::from_config(snap_report::config::get());
            let mut sink = sink_for_backend(&backend)?;
            if apply_to_test(&signals, &overrides, &paths, sink.as_mut()) {
                println!("properties:");
                for (key, value) in sink.properties() {
                    println!("  {} = {}", key, value);
                }
            }
        }

        None => {
            println!("snap-report - Snapshot test result aggregation and report generation");
            println!();
            println!("Usage: snap-report <COMMAND>");
            println!();
            println!("Commands:");
            println!("  report   Aggregate capture records and write the summary and report");
            println!("  clean    Delete and recreate the results directory");
            println!("  resolve  Show the effective mode flags for a task/override combination");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}

fn parse_properties(pairs: &[String]) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let mut overrides = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Property must be key=value, got '{}'", pair))?;
        overrides.insert(key.to_string(), value.to_string());
    }
    Ok(overrides)
}
