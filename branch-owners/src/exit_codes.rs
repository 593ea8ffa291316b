//! Process exit codes for the branch-owners CLI.
//!
//! - 0: Success
//! - 1: Setup failure (ruleset, repository, arguments)
//! - 2: Branch or merge-base resolution failure
//! - 3: Tree diff failure
//! - 4: The report could not be written

/// Successful execution.
pub const SUCCESS: u8 = 0;

/// The ruleset or repository could not be loaded.
pub const SETUP_FAILURE: u8 = 1;

/// A branch, commit or merge-base could not be resolved.
pub const REF_FAILURE: u8 = 2;

/// The two trees could not be diffed.
pub const DIFF_FAILURE: u8 = 3;

/// Writing the report to stdout failed.
pub const OUTPUT_FAILURE: u8 = 4;
