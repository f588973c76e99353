//! CLI entry point for the grade rater.
//!
//! Rates a delimited table of student scores, appending each student's average
//! and pass/fail label, or checks a table without writing anything.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use grade_rater::config::{Dialect, LineTerminator, RaterConfig, RowPolicy};
use grade_rater::{
    output::{print_json, print_pretty},
    pipeline,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_rater")]
#[command(about = "Average student scores and classify them as passing or failing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate every student in a table and write the augmented table
    Rate {
        #[command(flatten)]
        table: TableArgs,

        /// File to write the rated table to (created or overwritten)
        #[arg(short, long, default_value = "aprovacao_alunos.csv")]
        output: PathBuf,

        /// Abort the run when a row has no scores instead of skipping it
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Log the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Validate a table and report corrections without writing output
    Check {
        #[command(flatten)]
        table: TableArgs,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Delimited file with one student per line
    #[arg(value_name = "INPUT", default_value = "notas_alunos.csv")]
    input: PathBuf,

    /// Minimum average to pass (falls back to PASSING_THRESHOLD, then 7)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Field delimiter
    #[arg(short, long, default_value = ";")]
    delimiter: String,

    /// Line terminator
    #[arg(long, value_enum, default_value_t = LineTerminator::Lf)]
    terminator: LineTerminator,
}

impl TableArgs {
    fn config(&self, row_policy: RowPolicy) -> Result<RaterConfig> {
        let threshold = RaterConfig::resolve_threshold(self.threshold)?;
        let dialect = Dialect::new(&self.delimiter, self.terminator)?;
        Ok(RaterConfig::new(threshold, dialect, row_policy)?)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_rater.log"));

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
        Commands::Rate {
            table,
            output,
            strict,
            json,
        } => {
            let row_policy = if strict {
                RowPolicy::Abort
            } else {
                RowPolicy::Skip
            };
            let config = table.config(row_policy)?;

            let stats = pipeline::run(&config, &table.input, &output).with_context(|| {
                format!(
                    "rating {} into {} failed",
                    table.input.display(),
                    output.display()
                )
            })?;

            if json {
                print_json(&stats)?;
            } else {
                print_pretty(&stats);
            }
            info!(
                pass_pct = stats.pass_pct(),
                diagnostics = stats.diagnostics(),
                "Summary"
            );
        }
        Commands::Check { table } => {
            let config = table.config(RowPolicy::Skip)?;
            let stats = pipeline::check(&config, &table.input)
                .with_context(|| format!("checking {} failed", table.input.display()))?;
            print_pretty(&stats);
        }
    }

    Ok(())
}
