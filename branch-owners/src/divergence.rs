//! Finding where the current branch diverged from mainline.
//!
//! The resolver only picks commits and trees; diffing them is the job of
//! [`crate::changeset`].

use git2::{Branch, BranchType, Commit, ErrorCode, Oid, Reference, Repository};

use crate::error::ResolveError;
use crate::reporter::Reporter;

/// Mainline branch names, tried in order.
pub const MAINLINE_CANDIDATES: &[&str] = &["main", "master"];

/// Options for mainline selection.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Compare against this branch instead of trying [`MAINLINE_CANDIDATES`].
    pub mainline: Option<String>,
    /// Compare against the mainline's configured upstream rather than its
    /// local tip.
    pub upstream: bool,
}

/// The two snapshots to diff, plus the commits they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub current_branch: String,
    pub mainline_branch: String,
    pub current_commit: Oid,
    pub mainline_commit: Oid,
    pub merge_base: Oid,
    /// Tree of the merge-base commit.
    pub base_tree: Oid,
    /// Tree of the current branch tip.
    pub current_tree: Oid,
}

/// Short name of the branch HEAD points at.
///
/// # Errors
///
/// [`ResolveError::NotABranch`] if HEAD is detached or points at anything
/// other than a local branch, [`ResolveError::UnresolvableRef`] if HEAD
/// cannot be read (for example on an unborn branch).
pub fn current_branch(repo: &Repository) -> Result<String, ResolveError> {
    let head = repo.head().map_err(|source| ResolveError::UnresolvableRef {
        name: "HEAD".to_owned(),
        source,
    })?;

    if !head.is_branch() {
        return Err(ResolveError::NotABranch {
            reference: head.name().unwrap_or("HEAD").to_owned(),
        });
    }

    head.shorthand()
        .map(str::to_owned)
        .ok_or_else(|| ResolveError::NotABranch {
            reference: String::from_utf8_lossy(head.name_bytes()).into_owned(),
        })
}

/// Resolve `current_branch` and the mainline to commits and find the tree
/// snapshots to compare.
///
/// When the two branches have several merge-bases (criss-cross merges) the
/// one with the newest committer time is used; ties go to the smallest
/// commit id.
pub fn resolve(
    repo: &Repository,
    current_branch: &str,
    options: &ResolveOptions,
    reporter: &dyn Reporter,
) -> Result<Divergence, ResolveError> {
    let current = find_local_branch(repo, current_branch)?.ok_or_else(|| {
        ResolveError::NotABranch {
            reference: current_branch.to_owned(),
        }
    })?;
    let current_commit = peel_to_commit(current.get(), current_branch)?;
    reporter.info("Selected current branch.", &[("branch", &current_branch)]);

    let (mainline_branch, mainline_ref) = select_mainline(repo, options, reporter)?;
    let mainline_commit = peel_to_commit(&mainline_ref, &mainline_branch)?;
    reporter.info("Selected reference branch.", &[("branch", &mainline_branch)]);

    let merge_base = find_merge_base(
        repo,
        &current_commit,
        &mainline_commit,
        current_branch,
        &mainline_branch,
        reporter,
    )?;
    reporter.info("Identified base commit.", &[("commit", &merge_base)]);

    let base_tree = repo
        .find_commit(merge_base)
        .map(|commit| commit.tree_id())
        .map_err(|source| ResolveError::UnresolvableRef {
            name: merge_base.to_string(),
            source,
        })?;

    Ok(Divergence {
        current_branch: current_branch.to_owned(),
        mainline_branch,
        current_commit: current_commit.id(),
        mainline_commit: mainline_commit.id(),
        merge_base,
        base_tree,
        current_tree: current_commit.tree_id(),
    })
}

/// Pick one merge-base out of several `(id, commit time)` candidates: the
/// newest, then the smallest id.
pub fn select_merge_base(candidates: &[(Oid, i64)]) -> Option<Oid> {
    candidates
        .iter()
        .max_by(|(a_id, a_time), (b_id, b_time)| {
            a_time.cmp(b_time).then_with(|| b_id.cmp(a_id))
        })
        .map(|(id, _)| *id)
}

fn select_mainline<'r>(
    repo: &'r Repository,
    options: &ResolveOptions,
    reporter: &dyn Reporter,
) -> Result<(String, Reference<'r>), ResolveError> {
    let candidates = match &options.mainline {
        Some(name) => vec![name.as_str()],
        None => MAINLINE_CANDIDATES.to_vec(),
    };

    for &name in &candidates {
        let Some(branch) = find_local_branch(repo, name)? else {
            reporter.debug("Mainline candidate not found.", &[("branch", &name)]);
            continue;
        };

        if !options.upstream {
            return Ok((name.to_owned(), branch.into_reference()));
        }

        return match branch.upstream() {
            Ok(upstream) => {
                let upstream_name = upstream
                    .name()
                    .ok()
                    .flatten()
                    .unwrap_or(name)
                    .to_owned();
                Ok((upstream_name, upstream.into_reference()))
            }
            Err(err) if err.code() == ErrorCode::NotFound => {
                reporter.warn(
                    "Mainline branch has no upstream, using its local tip.",
                    &[("branch", &name)],
                );
                Ok((name.to_owned(), branch.into_reference()))
            }
            Err(source) => Err(ResolveError::UnresolvableRef {
                name: format!("upstream of {}", name),
                source,
            }),
        };
    }

    Err(ResolveError::NoMainlineBranch {
        tried: candidates.into_iter().map(str::to_owned).collect(),
    })
}

fn find_local_branch<'r>(
    repo: &'r Repository,
    name: &str,
) -> Result<Option<Branch<'r>>, ResolveError> {
    match repo.find_branch(name, BranchType::Local) {
        Ok(branch) => Ok(Some(branch)),
        Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
        Err(source) => Err(ResolveError::UnresolvableRef {
            name: name.to_owned(),
            source,
        }),
    }
}

fn peel_to_commit<'r>(reference: &Reference<'r>, name: &str) -> Result<Commit<'r>, ResolveError> {
    reference
        .peel_to_commit()
        .map_err(|source| ResolveError::UnresolvableRef {
            name: name.to_owned(),
            source,
        })
}

fn find_merge_base(
    repo: &Repository,
    current: &Commit<'_>,
    mainline: &Commit<'_>,
    current_name: &str,
    mainline_name: &str,
    reporter: &dyn Reporter,
) -> Result<Oid, ResolveError> {
    let no_common_ancestor = || ResolveError::NoCommonAncestor {
        current: current_name.to_owned(),
        mainline: mainline_name.to_owned(),
    };

    let bases = match repo.merge_bases(current.id(), mainline.id()) {
        Ok(bases) => bases,
        Err(err) if err.code() == ErrorCode::NotFound => return Err(no_common_ancestor()),
        Err(source) => {
            return Err(ResolveError::UnresolvableRef {
                name: format!("merge base of {} and {}", current_name, mainline_name),
                source,
            })
        }
    };

    let mut candidates = Vec::with_capacity(bases.len());
    for &id in bases.iter() {
        let commit = repo
            .find_commit(id)
            .map_err(|source| ResolveError::UnresolvableRef {
                name: id.to_string(),
                source,
            })?;
        candidates.push((id, commit.time().seconds()));
    }

    if candidates.len() > 1 {
        reporter.debug(
            "Found several merge bases, picking the newest.",
            &[("count", &candidates.len())],
        );
    }

    select_merge_base(&candidates).ok_or_else(no_common_ancestor)
}
