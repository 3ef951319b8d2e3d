//! CLI entry point for the cell-site vendor map tool.
//!
//! Provides subcommands for classifying a cell database workbook into vendor
//! counts and map markers, and for listing the active rule set.

use anyhow::{Context, Result};
use cellmap::classify::aggregate;
use cellmap::output::{Report, append_markers, print_legend, print_pretty, write_report};
use cellmap::parser::load_workbook_dir;
use cellmap::rules::{Matcher, RuleRegistry, Vendor};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cellmap")]
#[command(about = "Classify cell sites by vendor and count them per technology", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every technology sheet of a workbook directory
    Classify {
        /// Directory holding one CSV per technology sheet (2G.csv, 3G.csv, ...)
        #[arg(short, long, value_name = "DIR")]
        workbook: String,

        /// JSON rule file; falls back to CELLMAP_RULES, then the built-in rules
        #[arg(long)]
        rules: Option<String>,

        /// JSON report to write
        #[arg(short, long, default_value = "report.json")]
        output: String,

        /// Optional: CSV file to append map markers to
        #[arg(short, long)]
        markers: Option<String>,

        /// Gzip compress the JSON report
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List the active rule set
    Rules {
        /// JSON rule file; falls back to CELLMAP_RULES, then the built-in rules
        #[arg(long)]
        rules: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cellmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cellmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            workbook,
            rules,
            output,
            markers,
            gzip,
        } => {
            let registry = load_registry(rules)?;
            classify_workbook(&registry, &workbook, &output, markers.as_deref(), gzip)?;
        }
        Commands::Rules { rules } => {
            let registry = load_registry(rules)?;
            for rule in registry.iter() {
                for vendor in [Vendor::A, Vendor::B] {
                    info!(
                        technology = rule.technology_id(),
                        column = rule.discriminator_column(),
                        vendor = registry.label(vendor),
                        color = %rule.color(vendor),
                        matcher = %describe(rule.matcher(vendor)),
                        "Rule"
                    );
                }
            }
        }
    }

    Ok(())
}

/// Resolves the rule set from the CLI flag, then `CELLMAP_RULES`, then the built-in rules.
fn load_registry(flag: Option<String>) -> Result<RuleRegistry> {
    match flag.or_else(|| std::env::var("CELLMAP_RULES").ok()) {
        Some(path) => {
            let registry = RuleRegistry::load(&path)?;
            info!(path = %path, technologies = registry.len(), "Rule file loaded");
            Ok(registry)
        }
        None => Ok(RuleRegistry::reference()),
    }
}

#[tracing::instrument(skip(registry, workbook_dir, markers, gzip), fields(workbook = %workbook_dir))]
fn classify_workbook(
    registry: &RuleRegistry,
    workbook_dir: &str,
    output: &str,
    markers: Option<&str>,
    gzip: bool,
) -> Result<()> {
    let workbook = load_workbook_dir(workbook_dir)?;
    if workbook.is_empty() {
        warn!("No CSV sheets found in workbook directory");
    }

    let aggregation = aggregate(registry, &workbook);
    print_pretty(&aggregation);
    print_legend(&aggregation, registry);

    write_report(output, &Report::new(&aggregation, registry), gzip)
        .with_context(|| format!("writing report {output}"))?;
    info!(output, gzip, "Report written");

    if let Some(path) = markers {
        let written = append_markers(path, &aggregation, registry)
            .with_context(|| format!("writing markers {path}"))?;
        info!(path, written, "Markers appended");
    }

    Ok(())
}

fn describe(matcher: &Matcher) -> String {
    match matcher {
        Matcher::ExactSet { values } => {
            let values: Vec<_> = values.iter().map(String::as_str).collect();
            format!("one of [{}]", values.join(", "))
        }
        Matcher::Prefix { prefix } => format!("starts with {prefix:?}"),
    }
}
