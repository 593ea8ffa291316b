//! Builds throwaway git repositories commit by commit.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub struct TestRepo {
    pub repo: Repository,
    pub dir: TempDir,
    clock: Cell<i64>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Self {
            repo,
            dir,
            clock: Cell::new(1_700_000_000),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Commit a full snapshot of `files` with the given parents and point
    /// `refs/heads/<branch>` at it. Each commit is one minute newer than
    /// the last.
    pub fn commit(&self, branch: &str, files: &[(&str, &str)], parents: &[Oid]) -> Oid {
        let tree = self
            .repo
            .find_tree(write_tree(&self.repo, files))
            .expect("find tree");
        let parents = parents
            .iter()
            .map(|id| self.repo.find_commit(*id).expect("find parent"))
            .collect::<Vec<_>>();
        let parent_refs = parents.iter().collect::<Vec<_>>();

        let time = self.clock.get() + 60;
        self.clock.set(time);
        let sig = Signature::new("Test", "test@example.com", &Time::new(time, 0))
            .expect("signature");

        let id = self
            .repo
            .commit(None, &sig, &sig, "commit", &tree, &parent_refs)
            .expect("commit");
        self.repo
            .reference(&format!("refs/heads/{}", branch), id, true, "test")
            .expect("update branch");
        id
    }

    /// Point HEAD at a branch without touching the work tree.
    pub fn checkout(&self, branch: &str) {
        self.repo
            .set_head(&format!("refs/heads/{}", branch))
            .expect("set HEAD");
    }

    pub fn detach(&self, id: Oid) {
        self.repo.set_head_detached(id).expect("detach HEAD");
    }

    /// Write a file into the work tree (not committed).
    pub fn write_file(&self, path: &str, contents: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(full, contents).expect("write file");
    }

    pub fn tree_of(&self, commit: Oid) -> Oid {
        self.repo.find_commit(commit).expect("find commit").tree_id()
    }
}

fn write_tree(repo: &Repository, files: &[(&str, &str)]) -> Oid {
    let mut blobs = Vec::new();
    let mut dirs: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for &(path, contents) in files {
        match path.split_once('/') {
            Some((dir, rest)) => dirs.entry(dir).or_default().push((rest, contents)),
            None => blobs.push((path, contents)),
        }
    }

    let mut builder = repo.treebuilder(None).expect("tree builder");
    for (name, contents) in blobs {
        let blob = repo.blob(contents.as_bytes()).expect("write blob");
        builder.insert(name, blob, 0o100644).expect("insert blob");
    }
    for (name, entries) in dirs {
        let subtree = write_tree(repo, &entries);
        builder.insert(name, subtree, 0o040000).expect("insert tree");
    }
    builder.write().expect("write tree")
}

/// Keeps the formatted records it receives.
#[derive(Default)]
pub struct CollectingReporter {
    records: std::sync::Mutex<Vec<(log::Level, String)>>,
}

impl CollectingReporter {
    pub fn lines_at(&self, level: log::Level) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl branch_owners::Reporter for CollectingReporter {
    fn log(&self, level: log::Level, message: &str, fields: &[(&str, &dyn std::fmt::Display)]) {
        let line = branch_owners::reporter::format_record(level, message, fields);
        self.records.lock().unwrap().push((level, line));
    }
}
