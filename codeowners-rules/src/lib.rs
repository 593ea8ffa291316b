//! Parsing and matching for CODEOWNERS files.
//!
//! Rules are evaluated gitignore-style: the last rule in the file whose
//! pattern matches a path decides who owns it.
//!
//! ```
//! let ruleset = codeowners_rules::load("* @everyone\n*.go @gophers\n").unwrap();
//! let owners = ruleset.owners("cmd/main.go").unwrap();
//! assert_eq!(owners[0].to_string(), "@gophers");
//! ```

pub mod parser;
pub mod patternset;
mod ruleset;

use std::{fs, io, path::Path};

pub use parser::{parse, ParseError, ParseResult, Span};
pub use ruleset::{InvalidOwnerError, MatchError, Owner, OwnerKind, Rule, RuleSet};

/// Failure to read a CODEOWNERS file from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read ruleset")]
    Io(#[from] io::Error),

    #[error("failed to parse ruleset")]
    Parse(#[from] ParseError),
}

/// Parse CODEOWNERS source into a [`RuleSet`], rejecting it on the first
/// syntax error.
pub fn load(source: &str) -> Result<RuleSet, ParseError> {
    parse(source).into_strict_ruleset()
}

/// Read and strictly parse the CODEOWNERS file at `path`.
pub fn from_path(path: impl AsRef<Path>) -> Result<RuleSet, LoadError> {
    let source = fs::read_to_string(path)?;
    Ok(load(&source)?)
}
