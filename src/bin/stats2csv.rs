//! CLI binary for house-stats2csv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use house_stats2csv::{
    extract_file, inspect, write_csv_atomic, ExtractionConfig, ExtractionOutput,
    ExtractionProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across all jurisdictions plus a log
/// line per completed jurisdiction.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; `on_extraction_start` gives it a length
    /// once segmentation knows how many jurisdictions were found.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Reading");
        bar.set_message("Scanning report…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} jurisdictions  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Parsing");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_jurisdictions: usize) {
        self.activate_bar(total_jurisdictions);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_jurisdictions} jurisdictions"))
        ));
    }

    fn on_jurisdiction_start(&self, name: &str, _index: usize, _total: usize) {
        self.bar.set_message(name.to_string());
    }

    fn on_jurisdiction_complete(&self, name: &str, districts: usize, records: usize) {
        self.bar.println(format!(
            "  {} {:<26}  {}  {}",
            green("✓"),
            name,
            dim(&format!("{districts:>2} districts")),
            dim(&format!("{records:>4} rows")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_records: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} rows extracted",
            green("✔"),
            bold(&total_records.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the text rendering of the report, CSV to stdout
  stats2csv statistics2016.txt

  # Write the table to a file (atomic write)
  stats2csv statistics2016.txt -o house2016.csv

  # Read from a pipe
  pdftotext -layout statistics2016.pdf - | stats2csv -

  # Full output with per-jurisdiction summary, warnings and stats
  stats2csv --json statistics2016.txt > house2016.json

  # Check the report structure without parsing records
  stats2csv --inspect-only statistics2016.txt

  # Fail if any jurisdiction is missing
  stats2csv --strict statistics2016.txt -o house2016.csv

  # Different report year: override tables from JSON
  stats2csv --config tables2018.json statistics2018.txt

CONFIG FILE (all fields optional):
  {
    "jurisdictions": ["ALABAMA", "ALASKA", "..."],
    "office_headers": ["FOR UNITED STATES REPRESENTATIVE", "..."],
    "ballot_categories": ["Scattering", "Write-in", "..."],
    "party_affiliates": {"Democrat": ["Democrat", "Democratic-Farmer-Labor"]},
    "require_all_jurisdictions": false
  }

ENVIRONMENT VARIABLES:
  RUST_LOG                Override the log filter (e.g. house_stats2csv=debug)
  STATS2CSV_OUTPUT        Same as --output
  STATS2CSV_CONFIG        Same as --config
"#;

/// Convert the Clerk's election statistics report text to a CSV table.
#[derive(Parser, Debug)]
#[command(
    name = "stats2csv",
    version,
    about = "Convert House election statistics report text to CSV",
    long_about = "Extract per-candidate vote counts for the U.S. House of Representatives \
from the text rendering of the Clerk's biennial election statistics report. Emits \
StateTerritory,District,Name,Party,Vote rows in report order.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Report text file, or `-` for stdin.
    input: String,

    /// Write CSV to this file instead of stdout.
    #[arg(short, long, env = "STATS2CSV_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (ExtractionOutput) instead of CSV.
    #[arg(long, env = "STATS2CSV_JSON")]
    json: bool,

    /// JSON file overriding the default lookup tables.
    #[arg(long, env = "STATS2CSV_CONFIG")]
    config: Option<PathBuf>,

    /// Treat a jurisdiction missing from the report, or one without an office
    /// section, as an error.
    #[arg(long, env = "STATS2CSV_STRICT")]
    strict: bool,

    /// Print per-jurisdiction structure only, no record parsing.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "STATS2CSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "STATS2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "STATS2CSV_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let report = inspect(&cli.input, &config).context("Failed to inspect report")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?
            );
        } else {
            println!("File:           {}", cli.input);
            println!("Lines:          {}", report.total_lines);
            println!(
                "Jurisdictions:  {} found, {} missing",
                report.jurisdictions.len(),
                report.missing.len()
            );
            println!();
            println!("{:<26} {:<14} {:>9} {:>8}", "JURISDICTION", "STATUS", "DISTRICTS", "RECORDS");
            for j in &report.jurisdictions {
                println!(
                    "{:<26} {:<14} {:>9} {:>8}",
                    j.name,
                    format!("{:?}", j.status),
                    j.districts,
                    j.records
                );
            }
            if !report.missing.is_empty() {
                println!();
                println!("Missing: {}", report.missing.join(", "));
            }
            for w in &report.warnings {
                eprintln!("{} {}", yellow("⚠"), w);
            }
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract_file(&cli.input, &config).context("Extraction failed")?;

    match (&cli.output, cli.json) {
        (Some(path), false) => {
            write_csv_atomic(&output, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (Some(path), true) => {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (None, true) => {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        }
        (None, false) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            output
                .write_csv(&mut handle)
                .context("Failed to write to stdout")?;
            handle.flush().context("Failed to write to stdout")?;
        }
    }

    if !cli.quiet {
        print_summary(&cli, &output, show_progress);
    }

    Ok(())
}

/// Warnings and a one-line summary on stderr.
fn print_summary(cli: &Cli, output: &ExtractionOutput, show_progress: bool) {
    for w in &output.warnings {
        eprintln!("{} {}", yellow("⚠"), w);
    }

    let stats = &output.stats;
    let target = cli
        .output
        .as_ref()
        .map(|p| bold(&p.display().to_string()))
        .unwrap_or_else(|| "stdout".to_string());

    // The progress callback already printed the row count.
    if show_progress {
        eprintln!(
            "   {} jurisdictions  {} districts  {}ms  →  {}",
            stats.jurisdictions_found, stats.districts, stats.duration_ms, target
        );
    } else if !cli.json {
        eprintln!(
            "Extracted {} rows ({} jurisdictions, {} districts) in {}ms",
            stats.records, stats.jurisdictions_found, stats.districts, stats.duration_ms
        );
    }
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut config = match cli.config {
        Some(ref path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => ExtractionConfig::builder()
            .build()
            .context("Invalid configuration")?,
    };

    if cli.strict {
        config.require_all_jurisdictions = true;
    }
    config.progress_callback = progress;

    Ok(config)
}
