use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::mapper::{Mode, NameMapper};
use crate::walker::{walk, WalkVisitor};
use crate::RenameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub root: PathBuf,
    pub mode: Mode,
    pub recursive: bool,
    pub verbose: bool,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            root: root.into(),
            mode,
            recursive: true,
            verbose: false,
            dry_run: false,
        }
    }

    pub fn rename(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref(), Mode::Rename)
    }

    pub fn revert(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref(), Mode::Revert)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A single move, computed before anything on disk is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub target_name: String,
}

impl RenamePlan {
    pub fn new(source: PathBuf, target_name: String) -> Self {
        Self {
            source,
            target_name,
        }
    }

    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Sibling of `source` carrying the new name.
    pub fn target(&self) -> PathBuf {
        self.source.with_file_name(&self.target_name)
    }
}

/// Answer of an interactive caller for one [`RenamePlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Apply,
    Skip,
    /// Abandon the run; files already renamed stay renamed.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub matched: usize,
    pub renamed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub log: Vec<String>,
    pub state: RunState,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            checked: 0,
            matched: 0,
            renamed: 0,
            errors: 0,
            skipped: 0,
            log: Vec::new(),
            state: RunState::Idle,
        }
    }
}

pub struct RenameEngine {
    mapper: NameMapper,
}

impl RenameEngine {
    pub fn new() -> Result<Self, RenameError> {
        Ok(Self {
            mapper: NameMapper::new()?,
        })
    }

    pub fn mapper(&self) -> &NameMapper {
        &self.mapper
    }

    pub fn process(&self, options: &RunOptions) -> Result<RunSummary, RenameError> {
        self.process_with(options, |_plan: &RenamePlan| Decision::Apply)
    }

    /// Runs one pass over `options.root`, consulting `confirm` before each move.
    ///
    /// Only an invalid root fails the run. Move failures and unreadable
    /// subdirectories are logged and the walk carries on.
    pub fn process_with<F>(&self, options: &RunOptions, confirm: F) -> Result<RunSummary, RenameError>
    where
        F: FnMut(&RenamePlan) -> Decision,
    {
        validate_root(&options.root)?;

        if options.dry_run {
            warn!("Dry run mode - no files will be renamed");
        }

        let mut run = Run {
            mapper: &self.mapper,
            options,
            confirm,
            summary: RunSummary::new(),
        };
        run.summary.state = RunState::Running;

        let stats = walk(&options.root, options.recursive, &mut run);
        debug!(
            "Walk finished: {} files, {} directories, {} unreadable",
            stats.files, stats.directories, stats.unreadable
        );

        let mut summary = run.summary;
        if stats.stopped {
            summary.state = RunState::Stopped;
        } else {
            summary.state = RunState::Completed;
            if summary.matched == 0 {
                summary.log.push(format!("found no files to {}", options.mode));
            }
        }

        Ok(summary)
    }
}

struct Run<'a, F> {
    mapper: &'a NameMapper,
    options: &'a RunOptions,
    confirm: F,
    summary: RunSummary,
}

impl<F> Run<'_, F>
where
    F: FnMut(&RenamePlan) -> Decision,
{
    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.options.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    fn ignore(&mut self, path: &Path) {
        debug!("Ignoring file: {:?}", path);
        if self.options.verbose {
            let line = format!("ignored: {}", self.display_path(path));
            self.summary.log.push(line);
        }
    }

    fn apply(&mut self, plan: &RenamePlan) {
        let line = format!(
            "{} {} -> {}",
            self.options.mode.verb(),
            self.display_path(&plan.source),
            plan.target_name
        );

        if self.options.dry_run {
            info!("Would rename file: {:?} -> {:?}", plan.source, plan.target_name);
            self.summary.log.push(line);
            return;
        }

        match move_file(&plan.source, &plan.target()) {
            Ok(()) => {
                info!("Renamed file: {:?} -> {:?}", plan.source, plan.target_name);
                self.summary.renamed += 1;
                self.summary.log.push(line);
            }
            Err(error) => {
                warn!("{}", error);
                self.summary.errors += 1;
                let line = format!(
                    "error: could not rename {}: {}",
                    self.display_path(&plan.source),
                    move_failure_reason(&error)
                );
                self.summary.log.push(line);
            }
        }
    }
}

impl<F> WalkVisitor for Run<'_, F>
where
    F: FnMut(&RenamePlan) -> Decision,
{
    fn visit_file(&mut self, path: &Path) -> ControlFlow<()> {
        self.summary.checked += 1;

        let target_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.mapper.map(self.options.mode, name));

        let Some(target_name) = target_name else {
            self.ignore(path);
            return ControlFlow::Continue(());
        };

        self.summary.matched += 1;
        let plan = RenamePlan::new(path.to_path_buf(), target_name);

        match (self.confirm)(&plan) {
            Decision::Apply => self.apply(&plan),
            Decision::Skip => {
                debug!("Skipped by user: {:?}", plan.source);
                self.summary.skipped += 1;
                let line = format!("skipped: {}", self.display_path(&plan.source));
                self.summary.log.push(line);
            }
            Decision::Stop => {
                info!("Run stopped by user at {:?}", plan.source);
                self.summary.log.push("stopped by user".to_string());
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn visit_dir(&mut self, path: &Path) {
        debug!("Entering directory: {:?}", path);
        if self.options.verbose {
            let line = format!("directory: {}", self.display_path(path));
            self.summary.log.push(line);
        }
    }

    fn unreadable(&mut self, error: RenameError) {
        warn!("{}", error);
        if let RenameError::DirectoryUnreadable { path, source } = &error {
            let line = format!("error: cannot read directory {}: {}", self.display_path(path), source);
            self.summary.log.push(line);
        }
    }
}

fn validate_root(root: &Path) -> Result<(), RenameError> {
    let invalid = |reason: String| RenameError::InvalidRoot {
        path: root.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(root).map_err(|e| invalid(format!("does not exist: {}", e)))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    fs::read_dir(root).map_err(|e| invalid(format!("cannot be read: {}", e)))?;

    Ok(())
}

/// Renames `source` to `target` without ever replacing an existing entry.
fn move_file(source: &Path, target: &Path) -> Result<(), RenameError> {
    let failed = |source_error: io::Error| RenameError::MoveFailed {
        from: source.to_path_buf(),
        to: target.to_path_buf(),
        source: source_error,
    };

    if fs::symlink_metadata(target).is_ok() {
        return Err(failed(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "target already exists",
        )));
    }

    fs::rename(source, target).map_err(failed)
}

fn move_failure_reason(error: &RenameError) -> String {
    match error {
        RenameError::MoveFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_plan_target_is_sibling() {
        let plan = RenamePlan::new(
            PathBuf::from("/videos/day1/GH010527.MP4"),
            "052701-GH010527.MP4".to_string(),
        );

        assert_eq!(plan.source_name(), "GH010527.MP4");
        assert_eq!(plan.target(), PathBuf::from("/videos/day1/052701-GH010527.MP4"));
    }

    #[test]
    fn test_options_defaults() {
        let options = RunOptions::rename("/videos");

        assert_eq!(options.mode, Mode::Rename);
        assert!(options.recursive);
        assert!(!options.verbose);
        assert!(!options.dry_run);

        let options = RunOptions::revert("/videos").recursive(false).dry_run(true);
        assert_eq!(options.mode, Mode::Revert);
        assert!(!options.recursive);
        assert!(options.dry_run);
    }

    #[test]
    fn test_validate_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("GH010527.MP4");
        File::create(&file).unwrap();

        assert!(validate_root(temp_dir.path()).is_ok());
        assert!(matches!(validate_root(&file), Err(RenameError::InvalidRoot { .. })));
        assert!(matches!(
            validate_root(&temp_dir.path().join("missing")),
            Err(RenameError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_move_file_refuses_to_replace() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("GH010527.MP4");
        let target = temp_dir.path().join("052701-GH010527.MP4");
        fs::write(&source, "clip").unwrap();
        fs::write(&target, "other").unwrap();

        let result = move_file(&source, &target);

        match result {
            Err(RenameError::MoveFailed { source: error, .. }) => {
                assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("Expected MoveFailed, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&source).unwrap(), "clip");
        assert_eq!(fs::read_to_string(&target).unwrap(), "other");
    }

    #[test]
    fn test_move_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("GH010527.MP4");
        let target = temp_dir.path().join("052701-GH010527.MP4");
        fs::write(&source, "clip").unwrap();

        move_file(&source, &target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "clip");
    }
}
