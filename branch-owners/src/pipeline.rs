//! The whole run: ruleset, divergence point, changed paths, owners.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::aggregate::{aggregate, OwnershipReport};
use crate::changeset::{extract, GitTreeDiffer};
use crate::divergence::{self, ResolveOptions};
use crate::error::{Error, Result};
use crate::reporter::Reporter;

/// Where GitHub looks for a CODEOWNERS file, in order.
pub const CODEOWNERS_LOCATIONS: &[&str] = &[".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"];

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Options {
    /// Any path inside the repository.
    pub repo_path: PathBuf,
    /// Explicit ruleset file. Relative paths are taken as given (relative
    /// to the process working directory).
    pub codeowners_path: Option<PathBuf>,
    /// Branch to report on instead of the one HEAD points at.
    pub branch: Option<String>,
    pub resolve: ResolveOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            codeowners_path: None,
            branch: None,
            resolve: ResolveOptions::default(),
        }
    }
}

/// Find the CODEOWNERS file under a work tree root.
pub fn find_codeowners_file(root: &Path) -> Option<PathBuf> {
    CODEOWNERS_LOCATIONS
        .iter()
        .map(|location| root.join(location))
        .find(|path| path.is_file())
}

/// Run the full pipeline and return the report. Every error returned is
/// fatal; per-path match failures are logged through `reporter` instead.
pub fn run(options: &Options, reporter: &dyn Reporter) -> Result<OwnershipReport> {
    let repo = Repository::discover(&options.repo_path).map_err(|source| Error::OpenRepository {
        path: options.repo_path.clone(),
        source,
    })?;
    let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
        path: repo.path().to_path_buf(),
    })?;

    let codeowners_path = match &options.codeowners_path {
        Some(path) => path.clone(),
        None => find_codeowners_file(workdir).ok_or_else(|| Error::RulesetNotFound {
            root: workdir.to_path_buf(),
        })?,
    };
    let ruleset = codeowners_rules::from_path(&codeowners_path).map_err(|source| {
        Error::Ruleset {
            path: codeowners_path.clone(),
            source,
        }
    })?;
    reporter.debug(
        "Loaded ruleset.",
        &[("path", &codeowners_path.display()), ("rules", &ruleset.len())],
    );

    let branch = match &options.branch {
        Some(branch) => branch.clone(),
        None => divergence::current_branch(&repo)?,
    };
    let divergence = divergence::resolve(&repo, &branch, &options.resolve, reporter)?;

    let differ = GitTreeDiffer::new(&repo);
    let changed = extract(&differ, divergence.base_tree, divergence.current_tree)?;
    reporter.debug("Collected changed files.", &[("count", &changed.len())]);

    Ok(aggregate(&ruleset, &changed, reporter))
}
