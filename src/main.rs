mod analyze;
mod config;
mod metric;
mod report;
mod source;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Summarize METRIC lines from build, test, release and policy logs,
/// then suggest a next step for the test suite.
#[derive(Parser, Debug)]
#[command(name = "bri-analyze", version, about)]
pub struct Cli {
    /// Directory containing the log files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Config file path (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = report::OutputFormat::Text)]
    format: report::OutputFormat,

    /// Debug logging on stderr (per-file parsing, overwritten keys)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let stdout = std::io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run<W: std::io::Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::AnalyzerConfig::resolve(cli.config.as_deref())?;
    tracing::debug!(files = ?cfg.inputs.files, dir = %cli.dir.display(), "resolved inputs");

    let aggregator = analyze::RunAggregator::new(cli.dir.clone(), cfg.inputs.files);
    let metrics = aggregator.aggregate()?;
    let summary = report::Report::new(metrics, &cfg.report.tests_total_key);

    summary.write(cli.format, out)?;
    Ok(())
}
