mod cli;
mod confirm;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use gopro_rename_core::{Decision, Mode, RunOptions, RunState, RunSummary};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting gopro-rename");

    match cli.command {
        Commands::Rename {
            target,
            no_recursive,
            dry_run,
            interactive,
        } => {
            handle_run_command(Mode::Rename, target, no_recursive, dry_run, interactive, cli.verbose)?;
        }
        Commands::Revert {
            target,
            no_recursive,
            dry_run,
            interactive,
        } => {
            handle_run_command(Mode::Revert, target, no_recursive, dry_run, interactive, cli.verbose)?;
        }
    }

    info!("gopro-rename completed successfully");
    Ok(())
}

fn handle_run_command(
    mode: Mode,
    target: Option<PathBuf>,
    no_recursive: bool,
    dry_run: bool,
    interactive: bool,
    verbose: bool,
) -> Result<()> {
    let target_dir = match target {
        Some(target) => target,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    info!("Target directory: {:?}", target_dir);
    info!("Recursive: {}", !no_recursive);
    info!("Interactive mode: {}", interactive);

    let options = RunOptions::new(target_dir, mode)
        .recursive(!no_recursive)
        .verbose(verbose)
        .dry_run(dry_run);

    let summary = if interactive {
        gopro_rename_core::process_interactive(&options, |plan| {
            confirm::show_rename_and_confirm(plan).unwrap_or_else(|error| {
                warn!("Prompt failed, stopping: {}", error);
                Decision::Stop
            })
        })?
    } else {
        gopro_rename_core::process(&options)?
    };

    print_summary(&options, &summary, interactive);

    Ok(())
}

fn print_summary(options: &RunOptions, summary: &RunSummary, interactive: bool) {
    for line in summary_lines(options, summary, interactive) {
        println!("{}", line);
    }
}

/// The run log followed by the counters, independent of the tracing filter.
fn summary_lines(options: &RunOptions, summary: &RunSummary, interactive: bool) -> Vec<String> {
    let mut lines: Vec<String> = summary.log.iter().map(|line| format!("  {}", line)).collect();

    let heading = match (options.mode, summary.state) {
        (_, RunState::Stopped) => "Stopped before the end of the tree.",
        (Mode::Rename, _) => "Renaming complete!",
        (Mode::Revert, _) => "Reverting complete!",
    };
    lines.push(heading.to_string());

    if options.dry_run {
        lines.push("  (dry run - no files were changed)".to_string());
    }
    lines.push(format!("  Files checked: {}", summary.checked));
    lines.push(format!("  Files matched: {}", summary.matched));
    lines.push(format!("  Files renamed: {}", summary.renamed));
    lines.push(format!("  Errors: {}", summary.errors));
    if interactive {
        lines.push(format!("  Skipped: {}", summary.skipped));
    }

    lines
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
