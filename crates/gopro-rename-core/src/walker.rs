use std::ops::ControlFlow;
use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::RenameError;

/// Receives the entries found by [`walk`].
pub trait WalkVisitor {
    /// Called once per regular file. Returning `Break` ends the walk.
    fn visit_file(&mut self, path: &Path) -> ControlFlow<()>;

    /// Called for each directory before it is descended into (if at all).
    fn visit_dir(&mut self, _path: &Path) {}

    /// Called with a `DirectoryUnreadable` error for a subtree that could not be listed.
    fn unreadable(&mut self, error: RenameError);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub directories: usize,
    pub unreadable: usize,
    pub stopped: bool,
}

/// Visits every non-hidden file below `root`, descending into subdirectories
/// only when `recursive` is set.
///
/// Each directory is read completely and sorted by name before its entries are
/// visited, so a file renamed by the visitor is never seen twice. Symlinks are
/// not followed.
pub fn walk<V: WalkVisitor>(root: &Path, recursive: bool, visitor: &mut V) -> WalkStats {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let entries = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut stats = WalkStats::default();

    for entry in entries {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_file() {
                    stats.files += 1;
                    if visitor.visit_file(entry.path()).is_break() {
                        stats.stopped = true;
                        break;
                    }
                } else if file_type.is_dir() {
                    stats.directories += 1;
                    visitor.visit_dir(entry.path());
                } else {
                    debug!("Skipping non-regular entry: {:?}", entry.path());
                }
            }
            Err(error) => {
                let path = error
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                stats.unreadable += 1;
                visitor.unreadable(RenameError::DirectoryUnreadable { path, source: error });
            }
        }
    }

    stats
}

/// Dot files everywhere, plus entries carrying the hidden attribute on Windows.
pub fn is_hidden(entry: &DirEntry) -> bool {
    let dot_file = entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false);
    dot_file || has_hidden_attribute(entry)
}

#[cfg(windows)]
fn has_hidden_attribute(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    entry
        .metadata()
        .map(|metadata| metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_entry: &DirEntry) -> bool {
    false
}
