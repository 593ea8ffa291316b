mod common;

use std::process::{Command, Output};

use common::TestRepo;

fn branch_owners(t: &TestRepo, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_branch-owners"))
        .arg("-C")
        .arg(t.path())
        .args(args)
        .output()
        .expect("run branch-owners")
}

fn feature_repo() -> TestRepo {
    let t = TestRepo::new();
    t.write_file(".github/CODEOWNERS", "*.md @docs\n/src/ @core\n");
    let root = t.commit("main", &[("README.md", "a\n"), ("src/lib.rs", "a\n")], &[]);
    t.commit(
        "feature",
        &[
            ("README.md", "b\n"),
            ("src/lib.rs", "b\n"),
            ("build.sh", "make\n"),
        ],
        &[root],
    );
    t.checkout("feature");
    t
}

#[test]
fn prints_owner_blocks() {
    let t = feature_repo();
    let output = branch_owners(&t, &["-q"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "\n@core\n  src/lib.rs\n\n@docs\n  README.md\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn show_unowned_adds_a_block() {
    let t = feature_repo();
    let output = branch_owners(&t, &["-q", "--show-unowned"]);

    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .ends_with("\n(unowned)\n  build.sh\n"));
}

#[test]
fn logs_progress_to_stderr() {
    let t = feature_repo();
    let output = branch_owners(&t, &[]);

    assert!(output.status.success(), "{:?}", output);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Selected current branch. branch=feature"), "{}", stderr);
    assert!(stderr.contains("Selected reference branch. branch=main"), "{}", stderr);
    assert!(stderr.contains("Identified base commit."), "{}", stderr);
}

#[test]
fn unrelated_histories_exit_nonzero() {
    let t = TestRepo::new();
    t.write_file(".github/CODEOWNERS", "* @everyone\n");
    t.commit("main", &[("a.txt", "a\n")], &[]);
    t.commit("feature", &[("b.txt", "b\n")], &[]);
    t.checkout("feature");

    let output = branch_owners(&t, &[]);
    assert_eq!(
        output.status.code(),
        Some(branch_owners::exit_codes::REF_FAILURE as i32)
    );
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no common ancestor"), "{}", stderr);
}

#[test]
fn missing_codeowners_exits_with_setup_failure() {
    let t = TestRepo::new();
    let root = t.commit("main", &[("a.txt", "a\n")], &[]);
    t.commit("feature", &[("a.txt", "b\n")], &[root]);
    t.checkout("feature");

    let output = branch_owners(&t, &[]);
    assert_eq!(
        output.status.code(),
        Some(branch_owners::exit_codes::SETUP_FAILURE as i32)
    );
}

#[test]
fn unknown_flag_is_a_setup_failure() {
    let t = feature_repo();
    let output = branch_owners(&t, &["--no-such-flag"]);

    assert_eq!(
        output.status.code(),
        Some(branch_owners::exit_codes::SETUP_FAILURE as i32)
    );
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn help_exits_successfully() {
    let t = feature_repo();
    let output = branch_owners(&t, &["--help"]);

    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .contains("--show-unowned"));
}
