use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use filecheck::output::{write_human, write_invalid_listing, write_json, write_ledger_summary};
use filecheck::{
    ConfigError, DEFAULT_TRACKING_FILE, LedgerSummary, ScanConfig, ScanError, ScanReport, Scanner,
    read_ledger,
};
use filecheck_formats::builtin_registry;
use tracing::{info, warn};

use crate::logging;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INTERNAL: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser, Debug)]
#[command(
    name = "filecheck",
    version,
    about = "Find corrupt files in large directory trees",
    long_about = "filecheck walks directory trees, validates spreadsheets, Word documents, PDFs, \
                  images and zip archives with a structural parse, and lists every file that \
                  fails to open."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan files and directories for corrupt files
    Scan(ScanArgs),
    /// Summarize a tracking ledger written by `scan --track`
    Ledger {
        /// Ledger file (JSON Lines)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// File with one glob pattern per line; matching paths are skipped
    #[arg(long, value_name = "FILE")]
    pub exclude_file: Option<PathBuf>,

    /// Write the invalid-file listing here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log one line per file
    #[arg(short, long)]
    pub verbose: bool,

    /// Append one record per visited file to the tracking ledger
    #[arg(long)]
    pub track: bool,

    /// Tracking ledger location
    #[arg(long, value_name = "FILE", default_value = DEFAULT_TRACKING_FILE)]
    pub tracking_file: PathBuf,

    /// Record a content digest of each file's first 4 MiB in the ledger
    #[arg(long)]
    pub digest: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum directory depth below each root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Print the report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default();
        config.roots.clone_from(&self.paths);
        config.exclude_file.clone_from(&self.exclude_file);
        config.output_file.clone_from(&self.output);
        config.tracking.enabled = self.track;
        config.tracking.path.clone_from(&self.tracking_file);
        config.digest = self.digest;
        config.verbose = self.verbose;
        config.follow_links = self.follow_links;
        config.max_depth = self.max_depth;
        config
    }
}

/// How a command that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
}

impl RunStatus {
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Completed => EXIT_SUCCESS,
            Self::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// Configuration problems exit with `EXIT_CONFIG`, everything else with
/// `EXIT_INTERNAL`.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    let is_config = err.downcast_ref::<ConfigError>().is_some()
        || err
            .downcast_ref::<ScanError>()
            .is_some_and(ScanError::is_config);
    if is_config { EXIT_CONFIG } else { EXIT_INTERNAL }
}

/// Parse arguments, set up logging and dispatch.
///
/// # Errors
///
/// Returns an error if the command fails; see [`exit_code_for`].
pub async fn run() -> Result<RunStatus> {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Commands::Scan(args) => run_scan(&args).await,
        Commands::Ledger { file } => {
            run_ledger(&file)?;
            Ok(RunStatus::Completed)
        }
    }
}

async fn run_scan(args: &ScanArgs) -> Result<RunStatus> {
    let config = args.to_config();
    let registry = builtin_registry().context("Failed to build the format registry")?;

    let cancel = Arc::new(AtomicBool::new(false));
    let listener = tokio::spawn(watch_interrupt(Arc::clone(&cancel)));

    let flag = Arc::clone(&cancel);
    let config_for_scan = config.clone();
    let result = tokio::task::spawn_blocking(move || {
        Scanner::new(&registry, &config_for_scan)
            .with_cancel_flag(flag)
            .run()
    })
    .await
    .context("Scan task failed")?;
    listener.abort();

    let report = result?;
    write_results(&report, &config, args.json)?;

    if report.interrupted {
        Ok(RunStatus::Interrupted)
    } else {
        Ok(RunStatus::Completed)
    }
}

/// First Ctrl-C asks the scan to stop after the current file; a second one
/// exits at once.
async fn watch_interrupt(cancel: Arc<AtomicBool>) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    warn!("Interrupt received, stopping after the current file (press Ctrl-C again to abort)");
    cancel.store(true, Ordering::Relaxed);

    if tokio::signal::ctrl_c().await.is_ok() {
        eprintln!("Aborted");
        std::process::exit(EXIT_INTERRUPTED);
    }
}

fn write_results(report: &ScanReport, config: &ScanConfig, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        write_json(report, &mut out)?;
    } else {
        write_human(report, &mut out)?;
    }

    match &config.output_file {
        Some(path) => {
            write_listing_file(report, path)?;
            info!(
                path = %path.display(),
                invalid = report.invalid_files.len(),
                "invalid-file listing written"
            );
        }
        None if !json => {
            writeln!(out)?;
            write_invalid_listing(report, &mut out)?;
        }
        None => {}
    }
    out.flush()?;
    Ok(())
}

fn write_listing_file(report: &ScanReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_invalid_listing(report, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output file {}", path.display()))?;
    Ok(())
}

fn run_ledger(file: &Path) -> Result<()> {
    let records = read_ledger(file)?;
    let summary = LedgerSummary::from_records(&records);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Ledger: {}", file.display())?;
    write_ledger_summary(&summary, &mut out)?;
    Ok(())
}
