use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patternset;

/// A single CODEOWNERS rule: a pattern and the owners it assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub owners: Vec<Owner>,
}

/// An owner named in a CODEOWNERS rule. The value is kept exactly as
/// written, which is also how it is displayed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Owner {
    pub value: String,
    pub kind: OwnerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OwnerKind {
    User,
    Team,
    Email,
}

impl Owner {
    pub fn new(value: String, kind: OwnerKind) -> Self {
        Self { value, kind }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

static USER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9_-]+\z").unwrap());
static TEAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9_-]+/[A-Za-z0-9_.-]+\z").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[^@\s]+@[^@\s]+\.[^@\s]+\z").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid owner: {0}")]
pub struct InvalidOwnerError(pub String);

impl TryFrom<String> for Owner {
    type Error = InvalidOwnerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let kind = if USER_RE.is_match(&value) {
            OwnerKind::User
        } else if TEAM_RE.is_match(&value) {
            OwnerKind::Team
        } else if EMAIL_RE.is_match(&value) {
            OwnerKind::Email
        } else {
            return Err(InvalidOwnerError(value));
        };
        Ok(Owner { value, kind })
    }
}

impl TryFrom<&str> for Owner {
    type Error = InvalidOwnerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Owner::try_from(value.to_owned())
    }
}

/// Why a path has no owners.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("no rule matches {path}")]
    NoMatch { path: String },

    /// The last matching rule lists no owners, which explicitly unowns
    /// the path.
    #[error("{path} is unowned by rule `{pattern}`")]
    Unowned { path: String, pattern: String },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

impl MatchError {
    /// True for the outcomes that simply mean "nobody owns this", as
    /// opposed to a path that could not be looked up at all.
    pub fn is_unowned(&self) -> bool {
        matches!(self, MatchError::NoMatch { .. } | MatchError::Unowned { .. })
    }
}

/// An ordered, immutable set of rules compiled for matching. Later rules
/// take precedence over earlier ones.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
    matcher: patternset::Matcher,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut builder = patternset::Builder::new();
        for rule in &rules {
            builder.add(&rule.pattern);
        }
        Self {
            rules,
            matcher: builder.build(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule that decides ownership of `path`: the last one in the file
    /// whose pattern matches. Returned with its index.
    pub fn matching_rule(&self, path: &str) -> Result<(usize, &Rule), MatchError> {
        let path = normalize_path(path)?;
        self.matcher
            .matching_patterns(path)
            .last()
            .map(|&idx| (idx, &self.rules[idx]))
            .ok_or_else(|| MatchError::NoMatch {
                path: path.to_owned(),
            })
    }

    /// Every rule whose pattern matches `path`, in file order.
    pub fn all_matching_rules(&self, path: &str) -> Vec<(usize, &Rule)> {
        let Ok(path) = normalize_path(path) else {
            return Vec::new();
        };
        self.matcher
            .matching_patterns(path)
            .into_iter()
            .map(|idx| (idx, &self.rules[idx]))
            .collect()
    }

    /// Owners of `path` according to the last matching rule.
    pub fn owners(&self, path: &str) -> Result<&[Owner], MatchError> {
        let (_, rule) = self.matching_rule(path)?;
        if rule.owners.is_empty() {
            return Err(MatchError::Unowned {
                path: path.trim_start_matches('/').to_owned(),
                pattern: rule.pattern.clone(),
            });
        }
        Ok(&rule.owners)
    }
}

fn normalize_path(path: &str) -> Result<&str, MatchError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let invalid = |reason| MatchError::InvalidPath {
        path: path.to_owned(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(invalid("path contains an empty segment")),
            "." | ".." => return Err(invalid("path is not normalized")),
            _ => {}
        }
    }
    Ok(trimmed)
}
