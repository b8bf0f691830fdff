//! pdfstitch - Pick, order and stitch PDF files into a single document.
//!
//! Batch mode merges the inputs in the order given; `--interactive` opens a
//! prompt for building and reordering the list first.

mod cli;
mod interactive;

use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use crate::cli::Cli;
use pdfstitch::config::{Config, OverwriteMode};
use pdfstitch::error::{Result, StitchError};
use pdfstitch::io::{PdfWriter, SourceReader};
use pdfstitch::merge::Merger;
use pdfstitch::output::{
    MergeReport, Notification, OutputFormatter, ProgressBar, ProgressStyle,
    display_merge_summary,
};
use pdfstitch::session::MergeSession;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        OutputFormatter::default().notify(&Notification::from(&err));
        process::exit(err.exit_code());
    }
}

/// Route `log` records to stderr. `RUST_LOG` overrides the default level.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;

    let all_inputs = cli.get_all_inputs().await?;
    let mut config = cli.to_config()?;
    config.inputs = all_inputs;

    let formatter = OutputFormatter::from_config(&config);

    if config.interactive {
        let mut shell = interactive::Shell::stdin(config, formatter);
        return shell.run().await;
    }

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfstitch::NAME, pdfstitch::VERSION));
    }

    formatter.info("Collecting input files...");
    let candidates = SourceReader::new().open_all(&config.inputs).await?;
    let offered = candidates.len();

    let mut session = MergeSession::new();
    let added = session.add(candidates)?;
    formatter.notify(&Notification::added(added, offered));
    formatter.entry_list(session.entries());

    let merger = Merger::from_config(&config);
    let mut progress = if formatter.should_print() {
        ProgressBar::new(session.entries().len(), ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };

    if let Err(err) = session.merge(&merger, |event| progress.observe(event)).await {
        progress.clear();
        return Err(err);
    }
    progress.finish_with_message("Merge complete");
    formatter.notify(&Notification::merged());

    let download = session.download(config.output_name.as_deref().unwrap_or_default())?;
    let output_path = config.output_path(download.file_name());

    let writer = PdfWriter::new();
    writer.can_write(&output_path).await?;
    if needs_confirmation(&config, &formatter, &output_path).await? && !confirm_overwrite()? {
        return Err(StitchError::Cancelled);
    }

    let write_stats = writer.save(download.shared_bytes(), &output_path).await?;
    formatter.notify(&Notification::downloaded(download.file_name()));

    if config.json {
        let inputs = session.entries().iter().map(|e| e.name.clone()).collect();
        let report = MergeReport::new(inputs, download.statistics(), &write_stats, &config);
        let json = report
            .to_json()
            .map_err(|e| StitchError::other(format!("Failed to render report: {e}")))?;
        println!("{json}");
    } else {
        display_merge_summary(&formatter, download.statistics(), &write_stats);
    }

    Ok(())
}

/// Decide how an existing output file is handled.
///
/// Returns `true` when the user has to confirm the overwrite.
///
/// # Errors
///
/// Returns [`StitchError::OutputExists`] when the overwrite mode refuses
/// to replace the file. Quiet mode cannot prompt, so it refuses too.
async fn needs_confirmation(
    config: &Config,
    formatter: &OutputFormatter,
    path: &Path,
) -> Result<bool> {
    if !PdfWriter::new().exists(path).await {
        return Ok(false);
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(false),
        OverwriteMode::NoClobber => Err(StitchError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            if formatter.is_quiet() {
                return Err(StitchError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));
            Ok(true)
        }
    }
}

/// Ask on stdin whether an existing file may be replaced.
fn confirm_overwrite() -> Result<bool> {
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))?;

    Ok(is_affirmative(&response))
}

fn is_affirmative(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}
