use std::path::{Path, PathBuf};

use tracing::info;

pub mod engine;
pub mod grammar;
pub mod mapper;
pub mod walker;

pub use engine::{Decision, RenameEngine, RenamePlan, RunOptions, RunState, RunSummary};
pub use grammar::{stem, Classification, NameGrammar};
pub use mapper::{Mode, NameMapper};
pub use walker::{walk, WalkStats, WalkVisitor};

#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("Invalid root directory {path:?}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },
    #[error("Cannot read directory {path:?}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Could not move {from:?} to {to:?}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Prefixes every native GoPro file below `root` with its session and chapter number.
pub fn rename(
    root: &Path,
    recursive: bool,
    verbose: bool,
    dry_run: bool,
) -> Result<RunSummary, RenameError> {
    let options = RunOptions::rename(root)
        .recursive(recursive)
        .verbose(verbose)
        .dry_run(dry_run);
    process(&options)
}

/// Restores the native names of files previously renamed by [`rename`].
pub fn revert(
    root: &Path,
    recursive: bool,
    verbose: bool,
    dry_run: bool,
) -> Result<RunSummary, RenameError> {
    let options = RunOptions::revert(root)
        .recursive(recursive)
        .verbose(verbose)
        .dry_run(dry_run);
    process(&options)
}

pub fn process(options: &RunOptions) -> Result<RunSummary, RenameError> {
    process_interactive(options, |_plan: &RenamePlan| Decision::Apply)
}

/// Like [`process`], but asks `confirm` before every rename.
pub fn process_interactive<F>(options: &RunOptions, confirm: F) -> Result<RunSummary, RenameError>
where
    F: FnMut(&RenamePlan) -> Decision,
{
    let engine = RenameEngine::new()?;

    info!("Starting {} run: {:?}", options.mode, options.root);

    let summary = engine.process_with(options, confirm)?;

    info!(
        "Run {:?}: {} files checked, {} matched, {} renamed, {} errors",
        summary.state, summary.checked, summary.matched, summary.renamed, summary.errors
    );

    Ok(summary)
}
