//! pdfsweep CLI — argument parsing, logging setup and process exit codes.

use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, ValueEnum};
use pdfsweep::cancel::{install_interrupt_handler, CancelToken};
use pdfsweep::config::{ConfigOverlay, RunConfig};
use pdfsweep::BatchDriver;
use tracing::error;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

#[tokio::main]
async fn main() {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                process::exit(0);
            }
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    };

    let quiet = matches.get_flag("quiet");
    let level = matches.get_one::<LogLevel>("verbose").unwrap_or(&LogLevel::Info);
    init_logging(if quiet { &LogLevel::Error } else { level });

    // validate paths up front: nonexistent ones are reported and skipped,
    // an empty remainder is a usage error
    let raw_paths: Vec<&String> = matches
        .get_many::<String>("paths")
        .map(|values| values.collect())
        .unwrap_or_default();
    let targets = match collect_targets(&raw_paths) {
        Ok(targets) => targets,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let mut config = RunConfig {
        dry_run: matches.get_flag("dry-run"),
        links_only: matches.get_flag("links-only"),
        no_rename: matches.get_flag("no-rename"),
        no_progress: matches.get_flag("no-progress"),
        log_dir: matches.get_one::<String>("log").map(PathBuf::from),
        ocr: matches.get_flag("ocrmypdf"),
        staging_notebook: matches.get_one::<String>("notebooklm").cloned(),
        ..RunConfig::default()
    };

    if let Some(config_path) = matches.get_one::<String>("config") {
        match ConfigOverlay::load(Path::new(config_path)) {
            Ok(overlay) => config.apply_overlay(overlay),
            Err(err) => {
                eprintln!("Error: {}", err);
                process::exit(1);
            }
        }
    }

    let cancel = CancelToken::new();
    install_interrupt_handler(cancel.clone());

    let mut driver = match BatchDriver::new(config, cancel) {
        Ok(driver) => driver,
        Err(err) => {
            error!("could not start: {}", err);
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let code = driver.run(&targets).await;
    process::exit(code);
}

/// Keeps the paths that exist, reporting the rest. Nothing valid left is a
/// usage error.
fn collect_targets(raw_paths: &[&String]) -> pdfsweep::Result<Vec<PathBuf>> {
    let mut targets = Vec::new();
    for raw in raw_paths {
        let path = PathBuf::from(raw);
        if path.exists() {
            targets.push(path);
        } else {
            eprintln!("Error: path not found: {}", path.display());
        }
    }
    if targets.is_empty() {
        return Err(pdfsweep::Error::Usage("no valid paths provided".into()));
    }
    Ok(targets)
}

fn build_cli() -> Command {
    Command::new("pdfsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scrub OceanofPDFs watermarks from PDFs and normalize their filenames")
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(1..)
                .required(true)
                .help("Files or directories to sweep"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Preview changes without modifying files"),
        )
        .arg(
            Arg::new("links-only")
                .long("links-only")
                .action(ArgAction::SetTrue)
                .help("Remove only hyperlinks, skip text redaction (fastest)"),
        )
        .arg(
            Arg::new("no-rename")
                .long("no-rename")
                .action(ArgAction::SetTrue)
                .help("Skip filename normalization"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .help("Streaming mode: process files as found, no progress bar"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("DIR")
                .help("Enable the event log and resume set in this directory"),
        )
        .arg(
            Arg::new("ocrmypdf")
                .long("ocrmypdf")
                .action(ArgAction::SetTrue)
                .help("Run ocrmypdf on documents without extractable text"),
        )
        .arg(
            Arg::new("notebooklm")
                .long("notebooklm")
                .value_name("NAME")
                .help("Stage finished files for upload to this notebook"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Overlay file (JSON/YAML) for cloud patterns and retries"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_parser(clap::value_parser!(LogLevel))
                .default_value("info")
                .help("Set logging verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Suppress all output except errors"),
        )
}

fn init_logging(level: &LogLevel) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let filter_level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(format!("pdfsweep={}", filter_level)))
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
