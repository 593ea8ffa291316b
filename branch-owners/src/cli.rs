//! Command-line flags.

use std::path::PathBuf;

use branch_owners::{Options, ResolveOptions};
use clap::{ArgAction, Parser};
use log::LevelFilter;

/// Show who owns the files changed on the current branch since it diverged
/// from main (or master), according to CODEOWNERS.
#[derive(Parser, Debug)]
#[command(name = "branch-owners", version, about, long_about = None)]
pub struct Cli {
    /// CODEOWNERS file to use. Defaults to the first of .github/CODEOWNERS,
    /// CODEOWNERS and docs/CODEOWNERS in the repository.
    #[arg(short = 'f', long = "file")]
    pub codeowners_file: Option<PathBuf>,

    /// Path inside the repository to inspect.
    #[arg(short = 'C', long = "repo", default_value = ".")]
    pub repo: PathBuf,

    /// Branch to report on instead of the checked-out one.
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Mainline branch to compare against instead of main/master.
    #[arg(long)]
    pub mainline: Option<String>,

    /// Compare against the upstream the mainline branch tracks.
    #[arg(long)]
    pub upstream: bool,

    /// Also list changed files that nobody owns.
    #[arg(long)]
    pub show_unowned: bool,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn options(&self) -> Options {
        Options {
            repo_path: self.repo.clone(),
            codeowners_path: self.codeowners_file.clone(),
            branch: self.branch.clone(),
            resolve: ResolveOptions {
                mainline: self.mainline.clone(),
                upstream: self.upstream,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["branch-owners"]).unwrap();
        assert_eq!(cli.level_filter(), LevelFilter::Info);

        let options = cli.options();
        assert_eq!(options.repo_path, PathBuf::from("."));
        assert_eq!(options.codeowners_path, None);
        assert_eq!(options.branch, None);
        assert_eq!(options.resolve.mainline, None);
        assert!(!options.resolve.upstream);
        assert!(!cli.show_unowned);
    }

    #[test]
    fn flags_fill_options() {
        let cli = Cli::try_parse_from([
            "branch-owners",
            "-f",
            "OWNERS",
            "-C",
            "/work/repo",
            "--branch",
            "feature/login",
            "--mainline",
            "develop",
            "--upstream",
            "--show-unowned",
            "-vv",
        ])
        .unwrap();

        let options = cli.options();
        assert_eq!(options.codeowners_path, Some(PathBuf::from("OWNERS")));
        assert_eq!(options.repo_path, PathBuf::from("/work/repo"));
        assert_eq!(options.branch.as_deref(), Some("feature/login"));
        assert_eq!(options.resolve.mainline.as_deref(), Some("develop"));
        assert!(options.resolve.upstream);
        assert!(cli.show_unowned);
        assert_eq!(cli.level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["branch-owners", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["branch-owners", "-q"]).unwrap();
        assert_eq!(cli.level_filter(), LevelFilter::Error);
    }
}
