//! # CLI Module
//!
//! Command-line interface for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory for duplicate images
//! image-doubles scan ~/Photos
//!
//! # Skip directories by base name
//! image-doubles scan ~/Photos --skip .thumbnails --skip cache
//!
//! # Write the duplicate map to the configured dump file
//! image-doubles scan ~/Photos --dump
//!
//! # Delete every duplicate except the first copy found
//! image-doubles scan ~/Photos --delete
//! ```

use clap::{Parser, Subcommand};
use console::{style, Term};
use image_doubles::config::Config;
use image_doubles::core::pipeline::{Pipeline, PipelineResult};
use image_doubles::core::{remover, reporter};
use image_doubles::error::Result;
use image_doubles::events::{self, Event, HashEvent, PipelineEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Image Doubles - find duplicate images by content
#[derive(Parser, Debug)]
#[command(name = "image-doubles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory tree for duplicate images
    Scan {
        /// Directory to scan
        directory: PathBuf,

        /// Directory base names to skip (repeatable)
        #[arg(long = "skip", value_name = "NAME")]
        skip: Vec<String>,

        /// Write the duplicate map to the configured dump file
        #[arg(long)]
        dump: bool,

        /// Delete every duplicate except the first copy found
        #[arg(long)]
        delete: bool,

        /// Config file path (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of hash workers
        #[arg(short, long, default_value_t = image_doubles::core::hasher::DEFAULT_WORKERS)]
        workers: usize,

        /// Show every duplicate group, not just the summary
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            directory,
            skip,
            dump,
            delete,
            config,
            workers,
            verbose,
        } => run_scan(directory, skip, dump, delete, config, workers, verbose),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scan(
    directory: PathBuf,
    skip: Vec<String>,
    dump: bool,
    delete: bool,
    config_path: Option<PathBuf>,
    workers: usize,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let config = Config::load_or_default(config_path.as_deref())?;

    term.write_line(&format!(
        "{} {}",
        style("Image Doubles").bold().cyan(),
        style(env!("CARGO_PKG_VERSION")).dim()
    ))
    .ok();
    term.write_line("").ok();

    let pipeline = Pipeline::builder(directory)
        .skip(skip)
        .accepted_types(config.image_types.iter().cloned())
        .workers(workers)
        .build();

    let (sender, receiver) = events::channel();

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    progress_clone.set_message(format!("{phase}"));
                }
                Event::Scan(ScanEvent::Completed { total_images }) => {
                    progress_clone.set_length(total_images as u64);
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    progress_clone.set_position(p.completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    progress_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal the event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = outcome?;
    print_results(&term, &result, verbose);

    if dump {
        reporter::dump_to_file(&result.report, &config.dump_file)?;
        term.write_line(&format!(
            "  {} duplicate map written to {}",
            style("✓").green(),
            style(config.dump_file.display()).cyan()
        ))
        .ok();
    }

    if delete {
        let outcome = remover::delete_except_first(&result.report);
        term.write_line(&format!(
            "  {} {} duplicates deleted",
            style("✓").green(),
            style(outcome.deleted).cyan()
        ))
        .ok();

        if !outcome.is_clean() {
            for error in &outcome.errors {
                term.write_line(&format!("  {} {}", style("✗").red(), error))
                    .ok();
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images scanned in {:.1}s",
        style(result.total_images).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups found",
        style(result.report.len()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate images",
        style(result.report.duplicate_file_count()).cyan()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} files skipped due to errors",
            style(result.errors.len()).yellow()
        ))
        .ok();
        if verbose {
            for error in &result.errors {
                term.write_line(&format!("    {} {}", style("!").yellow(), error))
                    .ok();
            }
        }
    }

    term.write_line("").ok();

    if result.report.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
        return;
    }

    term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (i, group) in result.report.iter().enumerate() {
        term.write_line(&format!(
            "  {} {} ({} files)",
            style(format!("Group {}:", i + 1)).bold(),
            style(&group.digest[..12.min(group.digest.len())]).yellow(),
            group.len()
        ))
        .ok();

        if verbose {
            for path in &group.paths {
                let marker = if path.as_path() == group.keeper() {
                    style("★").green().to_string()
                } else {
                    style("○").dim().to_string()
                };
                term.write_line(&format!("    {} {}", marker, path.display()))
                    .ok();
            }
        } else {
            term.write_line(&format!(
                "    {} {}",
                style("★").green(),
                group.keeper().display()
            ))
            .ok();
            term.write_line(&format!(
                "    {} {} more cop{}",
                style("○").dim(),
                group.extras().len(),
                if group.extras().len() == 1 { "y" } else { "ies" }
            ))
            .ok();
        }
    }
}
