//! Error types for the branch-owners pipeline.
//!
//! Every variant of [`Error`] is fatal and maps to an exit code. Per-path
//! match failures are not errors at this level; see [`crate::aggregate`].

use std::path::PathBuf;

use crate::exit_codes;

/// Failure to find the branches to compare or their common ancestor.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("not on a branch: {reference}")]
    NotABranch { reference: String },

    #[error("no mainline branch found (tried {})", .tried.join(", "))]
    NoMainlineBranch { tried: Vec<String> },

    #[error("could not resolve {name}")]
    UnresolvableRef {
        name: String,
        #[source]
        source: git2::Error,
    },

    #[error("{current} and {mainline} have no common ancestor")]
    NoCommonAncestor { current: String, mainline: String },
}

/// Failure to compute the structural diff between two trees.
#[derive(Debug, thiserror::Error)]
#[error("{context}")]
pub struct DiffError {
    pub context: String,
    #[source]
    pub source: git2::Error,
}

impl DiffError {
    pub fn new(context: impl Into<String>, source: git2::Error) -> Self {
        Self {
            context: context.into(),
            source,
        }
    }
}

/// Main error type for a branch-owners run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error loading ruleset from {}", .path.display())]
    Ruleset {
        path: PathBuf,
        #[source]
        source: codeowners_rules::LoadError,
    },

    #[error("no CODEOWNERS file found under {}", .root.display())]
    RulesetNotFound { root: PathBuf },

    #[error("error opening repository at {}", .path.display())]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("repository at {} has no work tree", .path.display())]
    BareRepository { path: PathBuf },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("error determining diff between trees")]
    Diff(#[from] DiffError),
}

impl Error {
    /// Returns the exit code for this class of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Ruleset { .. }
            | Error::RulesetNotFound { .. }
            | Error::OpenRepository { .. }
            | Error::BareRepository { .. } => exit_codes::SETUP_FAILURE,
            Error::Resolve(_) => exit_codes::REF_FAILURE,
            Error::Diff(_) => exit_codes::DIFF_FAILURE,
        }
    }
}

/// Result type alias for branch-owners operations.
pub type Result<T> = std::result::Result<T, Error>;
