//! Paths touched between two tree snapshots.

use std::collections::BTreeSet;
use std::path::Path;

use git2::{Delta, DiffFindOptions, DiffOptions, Oid, Repository};

use crate::error::DiffError;

/// Kind of change a diff entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    TypeChanged,
}

/// One entry of a structural tree diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
}

impl FileChange {
    pub fn added(path: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Added,
            old_path: None,
            new_path: Some(path.into()),
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            old_path: Some(path.into()),
            new_path: None,
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: ChangeKind::Modified,
            old_path: Some(path.clone()),
            new_path: Some(path),
        }
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Renamed,
            old_path: Some(from.into()),
            new_path: Some(to.into()),
        }
    }

    /// Paths whose ownership is affected by this change. Both ends of a
    /// rename count; the source of a copy does not, since it is unchanged.
    pub fn touched_paths(&self) -> impl Iterator<Item = &str> {
        let old_path = match self.kind {
            ChangeKind::Added | ChangeKind::Copied => None,
            _ => self.old_path.as_deref(),
        };
        let new_path = match self.kind {
            ChangeKind::Deleted => None,
            _ => self.new_path.as_deref(),
        };
        old_path.into_iter().chain(new_path)
    }
}

/// Computes the structural diff between two trees.
pub trait TreeDiffer {
    fn diff_trees(&self, base: Oid, current: Oid) -> Result<Vec<FileChange>, DiffError>;
}

/// [`TreeDiffer`] backed by a git repository, with rename detection.
pub struct GitTreeDiffer<'r> {
    repo: &'r Repository,
}

impl<'r> GitTreeDiffer<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self { repo }
    }
}

impl TreeDiffer for GitTreeDiffer<'_> {
    fn diff_trees(&self, base: Oid, current: Oid) -> Result<Vec<FileChange>, DiffError> {
        let base_tree = self
            .repo
            .find_tree(base)
            .map_err(|e| DiffError::new(format!("failed to find base tree {}", base), e))?;
        let current_tree = self
            .repo
            .find_tree(current)
            .map_err(|e| DiffError::new(format!("failed to find current tree {}", current), e))?;

        let mut diff_opts = DiffOptions::new();
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&current_tree), Some(&mut diff_opts))
            .map_err(|e| DiffError::new("failed to compute diff", e))?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))
            .map_err(|e| DiffError::new("failed to find renames", e))?;

        let changes = diff
            .deltas()
            .filter_map(|delta| {
                let kind = match delta.status() {
                    Delta::Added => ChangeKind::Added,
                    Delta::Deleted => ChangeKind::Deleted,
                    Delta::Modified => ChangeKind::Modified,
                    Delta::Renamed => ChangeKind::Renamed,
                    Delta::Copied => ChangeKind::Copied,
                    Delta::Typechange => ChangeKind::TypeChanged,
                    // Only produced by workdir or index diffs.
                    _ => return None,
                };
                Some(FileChange {
                    kind,
                    old_path: delta.old_file().path().map(path_to_string),
                    new_path: delta.new_file().path().map(path_to_string),
                })
            })
            .collect();

        Ok(changes)
    }
}

// Git stores paths with `/` separators regardless of platform.
fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The distinct paths touched between `base` and `current`, sorted.
pub fn extract(
    differ: &dyn TreeDiffer,
    base: Oid,
    current: Oid,
) -> Result<BTreeSet<String>, DiffError> {
    let changes = differ.diff_trees(base, current)?;
    Ok(changed_paths(&changes))
}

/// Collapse diff entries into the set of paths they touch.
pub fn changed_paths(changes: &[FileChange]) -> BTreeSet<String> {
    changes
        .iter()
        .flat_map(FileChange::touched_paths)
        .map(str::to_owned)
        .collect()
}
