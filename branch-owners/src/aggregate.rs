//! Grouping changed paths by owner.
//!
//! Each path is looked up on its own; lookups are independent and may run
//! in parallel (the `parallel` feature). The results are then folded into
//! the report sequentially, which is also where logging happens.

use std::collections::{BTreeMap, BTreeSet};

use codeowners_rules::{MatchError, Owner, RuleSet};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::reporter::Reporter;

/// Changed paths grouped by owner. Owners are sorted, each owner's paths
/// are sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipReport {
    owners: BTreeMap<String, BTreeSet<String>>,
    unowned: BTreeSet<String>,
}

impl OwnershipReport {
    /// Every owner with the changed paths they own.
    pub fn owners(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.owners.iter().map(|(owner, paths)| {
            (owner.as_str(), paths.iter().map(String::as_str).collect())
        })
    }

    /// Paths owned by `owner`, if it owns anything.
    pub fn paths_for(&self, owner: &str) -> Option<Vec<&str>> {
        self.owners
            .get(owner)
            .map(|paths| paths.iter().map(String::as_str).collect())
    }

    /// Changed paths no rule assigns to anyone. Never part of the owner
    /// buckets.
    pub fn unowned(&self) -> impl Iterator<Item = &str> {
        self.unowned.iter().map(String::as_str)
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.unowned.is_empty()
    }

    fn record(&mut self, path: &str, owners: &[Owner]) {
        for owner in owners {
            self.owners
                .entry(owner.to_string())
                .or_default()
                .insert(path.to_owned());
        }
    }
}

/// Look up the owners of every changed path and invert the result into an
/// [`OwnershipReport`]. A path that cannot be looked up is logged and
/// skipped; it never aborts the batch.
pub fn aggregate(
    ruleset: &RuleSet,
    paths: &BTreeSet<String>,
    reporter: &dyn Reporter,
) -> OwnershipReport {
    let lookups = lookup_all(ruleset, paths);

    let mut report = OwnershipReport::default();
    for (path, result) in lookups {
        match result {
            Ok(owners) => report.record(path, owners),
            Err(err) if err.is_unowned() => {
                reporter.debug("File has no owner.", &[("file", &path), ("reason", &err)]);
                report.unowned.insert(path.to_owned());
            }
            Err(err) => {
                reporter.warn("Failed to match rule for file.", &[("file", &path), ("error", &err)]);
            }
        }
    }
    report
}

#[cfg(feature = "parallel")]
fn lookup_all<'a>(
    ruleset: &'a RuleSet,
    paths: &'a BTreeSet<String>,
) -> Vec<(&'a str, Result<&'a [Owner], MatchError>)> {
    paths
        .par_iter()
        .map(|path| (path.as_str(), ruleset.owners(path)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn lookup_all<'a>(
    ruleset: &'a RuleSet,
    paths: &'a BTreeSet<String>,
) -> Vec<(&'a str, Result<&'a [Owner], MatchError>)> {
    paths
        .iter()
        .map(|path| (path.as_str(), ruleset.owners(path)))
        .collect()
}
