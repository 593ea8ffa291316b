//! Report who owns the files changed on a branch.
//!
//! The pipeline finds where the branch diverged from mainline
//! ([`divergence`]), collects the paths changed since ([`changeset`]) and
//! groups them by CODEOWNERS owner ([`aggregate`]). [`pipeline::run`] does
//! all of it.

pub mod aggregate;
pub mod changeset;
pub mod divergence;
pub mod error;
pub mod exit_codes;
pub mod pipeline;
pub mod report;
pub mod reporter;

pub use aggregate::{aggregate, OwnershipReport};
pub use changeset::{extract, ChangeKind, FileChange, GitTreeDiffer, TreeDiffer};
pub use divergence::{current_branch, resolve, Divergence, ResolveOptions};
pub use error::{DiffError, Error, ResolveError, Result};
pub use pipeline::{run, Options};
pub use reporter::{NullReporter, Reporter, StderrReporter};
