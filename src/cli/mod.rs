//! # CLI Module
//!
//! Command-line interface for the photo sorter.
//!
//! ## Usage
//! ```bash
//! # Sort a memory card into the library
//! photo-sort sort -i /media/card/DCIM -d ~/Pictures/Library
//!
//! # Several sources, see what would happen first
//! photo-sort sort -i ~/Camera -i ~/Phone -d ~/Pictures/Library --dry-run
//!
//! # No destination: just report duplicates across the sources
//! photo-sort sort -i ~/Camera -i ~/Backup --output minimal
//!
//! # Settings from a file, flags still win
//! photo-sort sort --config sort.json --verbose
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_sorter::core::organize::NamingScheme;
use photo_sorter::core::pipeline::{SortConfig, SortReport, Sorter};
use photo_sorter::error::{ConfigError, Result};
use photo_sorter::events::{Event, EventChannel, FileEvent, PhaseEvent, RunEvent};
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Photo Sorter - File photos and videos by the date they were taken
#[derive(Parser, Debug)]
#[command(name = "photo-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy media from source directories into a year/month library
    Sort(SortArgs),
}

#[derive(clap::Args, Debug)]
struct SortArgs {
    /// Source directories (repeatable)
    #[arg(short, long = "input", value_name = "DIR")]
    inputs: Vec<PathBuf>,

    /// Library root. Without it nothing is copied and duplicates are only reported.
    #[arg(short, long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Ignore files smaller than this many bytes [default: 102400]
    #[arg(long, value_name = "BYTES")]
    min_size: Option<u64>,

    /// Plan and report without copying anything
    #[arg(long)]
    dry_run: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// How copied files are named
    #[arg(long)]
    naming: Option<Naming>,

    /// Only look at the top level of each directory
    #[arg(long)]
    no_recursive: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// JSON config file; command-line flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Naming {
    /// image-20240115-143000.jpg (default)
    Timestamp,
    /// Keep the source file name
    Original,
}

impl From<Naming> for NamingScheme {
    fn from(naming: Naming) -> Self {
        match naming {
            Naming::Timestamp => NamingScheme::Timestamp,
            Naming::Original => NamingScheme::Original,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (duplicate paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sort(args) => run_sort(args),
    }
}

impl SortArgs {
    /// Config file (if any) with flags layered on top
    fn into_config(self) -> std::result::Result<SortConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SortConfig::from_json_file(path)?,
            None => SortConfig::default(),
        };

        if !self.inputs.is_empty() {
            config.sources = self.inputs;
        }
        if let Some(destination) = self.destination {
            config.destination = Some(destination);
        }
        if let Some(min_size) = self.min_size {
            config.min_size = min_size;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(naming) = self.naming {
            config.naming = naming.into();
        }
        config.dry_run |= self.dry_run;
        config.walk.recursive &= !self.no_recursive;
        config.walk.follow_symlinks |= self.follow_symlinks;
        config.walk.include_hidden |= self.include_hidden;

        Ok(config)
    }
}

fn run_sort(args: SortArgs) -> Result<()> {
    photo_sorter::init_tracing(args.verbose);

    let output = args.output;
    let verbose = args.verbose;
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Photo Sorter").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let config = args.into_config()?;
    let sorter = Sorter::builder().config(config).build();

    let (sender, receiver) = EventChannel::new();

    // Total file count is unknown until the walk ends, so a spinner
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{pos} files, {elapsed}]")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Phase(PhaseEvent::Started { phase, root }) => {
                    pb.set_message(format!("{} {}", phase, root.display()));
                }
                Event::File(FileEvent::Failed { path, message }) if verbose => {
                    pb.println(format!(
                        "{} {}: {}",
                        style("✗").red(),
                        path.display(),
                        message
                    ));
                    pb.inc(1);
                }
                Event::File(_) => pb.inc(1),
                Event::Run(RunEvent::Completed { .. }) => pb.finish_and_clear(),
                _ => {}
            }
        }
    });

    let result = sorter.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, verbose),
        OutputFormat::Json => print_json_results(&report)?,
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, report: &SortReport, verbose: bool) {
    let summary = report.summary();

    term.write_line(&format!(
        "{} Sort Complete{}",
        style("✓").green().bold(),
        if report.dry_run {
            style(" (dry run)").yellow().to_string()
        } else {
            String::new()
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} media files examined in {:.1}s",
        style(summary.files_seen).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    if summary.registered > 0 {
        term.write_line(&format!(
            "  {} already in the library",
            style(summary.registered).dim()
        ))
        .ok();
    }

    let copied = report.placed.iter().filter(|p| p.copied).count();
    term.write_line(&format!(
        "  {} new files placed ({} copied)",
        style(summary.placed).cyan(),
        copied
    ))
    .ok();

    term.write_line(&format!(
        "  {} duplicates skipped",
        style(summary.duplicates).yellow()
    ))
    .ok();

    if summary.failures > 0 {
        term.write_line(&format!(
            "  {} files failed",
            style(summary.failures).red()
        ))
        .ok();
    }

    if verbose {
        term.write_line("").ok();
        for phase in &report.phases {
            term.write_line(&format!(
                "  {} {}: {} files, {} placed, {} duplicates, {} failed",
                style(phase.phase).bold(),
                phase.root.display(),
                phase.files_seen,
                phase.placed,
                phase.duplicates,
                phase.failures
            ))
            .ok();
        }

        if !report.placed.is_empty() {
            term.write_line("").ok();
            term.write_line(&format!("{}", style("Placed:").bold().underlined()))
                .ok();
            for placed in &report.placed {
                term.write_line(&format!(
                    "    {} -> {} {}",
                    placed.source.display(),
                    placed.record.destination_path.display(),
                    style(format!("({})", placed.record.date_source)).dim()
                ))
                .ok();
            }
        }
    }

    if !report.duplicates.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
            .ok();
        for conflict in &report.duplicates {
            term.write_line(&format!(
                "    {} {}",
                style("○").dim(),
                conflict.duplicate.display()
            ))
            .ok();
            term.write_line(&format!(
                "      {} {}",
                style("same as").dim(),
                conflict.original.destination_path.display()
            ))
            .ok();
        }
    }

    if !report.failures.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Failures:").bold().red()))
            .ok();
        for failure in &report.failures {
            term.write_line(&format!(
                "    {} {}: {}",
                style("✗").red(),
                failure.path.display(),
                failure.message
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Sources are never modified. Duplicates were left where they are.").dim()
    ))
    .ok();
}

fn print_json_results(report: &SortReport) -> Result<()> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), report).map_err(io::Error::from)?;
    println!();
    Ok(())
}

fn print_minimal_results(report: &SortReport) {
    for conflict in &report.duplicates {
        println!("{}", conflict.duplicate.display());
    }
}
