mod cli;

use std::io;
use std::process::ExitCode;

use branch_owners::{exit_codes, report, Reporter, StderrReporter};
use clap::Parser;

use cli::Cli;

fn main() -> ExitCode {
    // clap's own exit status for usage errors collides with REF_FAILURE.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::from(exit_codes::SETUP_FAILURE);
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(exit_codes::SUCCESS);
        }
    };
    let reporter = StderrReporter::new(cli.level_filter());

    let ownership = match branch_owners::run(&cli.options(), &reporter) {
        Ok(ownership) => ownership,
        Err(err) => {
            let code = err.exit_code();
            log_error(&reporter, anyhow::Error::new(err));
            return ExitCode::from(code);
        }
    };

    if let Err(err) = report::write_report(&mut io::stdout().lock(), &ownership, cli.show_unowned) {
        log_error(&reporter, anyhow::Error::new(err).context("error writing report"));
        return ExitCode::from(exit_codes::OUTPUT_FAILURE);
    }

    ExitCode::from(exit_codes::SUCCESS)
}

// The top-level message goes first; underlying causes go in the `error`
// field.
fn log_error(reporter: &dyn Reporter, err: anyhow::Error) {
    let causes = err
        .chain()
        .skip(1)
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if causes.is_empty() {
        reporter.error(&err.to_string(), &[]);
    } else {
        reporter.error(&err.to_string(), &[("error", &causes.join(": "))]);
    }
}
