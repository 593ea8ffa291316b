//! Plain-text rendering of an [`OwnershipReport`].

use std::io::{self, Write};

use crate::aggregate::OwnershipReport;

/// Heading used for the unowned section.
pub const UNOWNED_HEADING: &str = "(unowned)";

/// Write one block per owner: a blank line, the owner, then each path
/// indented by two spaces. Unowned paths follow in the same shape when
/// `show_unowned` is set and there are any.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &OwnershipReport,
    show_unowned: bool,
) -> io::Result<()> {
    for (owner, paths) in report.owners() {
        write_block(out, owner, paths)?;
    }

    if show_unowned {
        let unowned = report.unowned().collect::<Vec<_>>();
        if !unowned.is_empty() {
            write_block(out, UNOWNED_HEADING, unowned)?;
        }
    }

    out.flush()
}

fn write_block<W: Write>(out: &mut W, heading: &str, paths: Vec<&str>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", heading)?;
    for path in paths {
        writeln!(out, "  {}", path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::aggregate::aggregate;
    use crate::reporter::NullReporter;

    fn render(show_unowned: bool) -> String {
        let ruleset = codeowners_rules::load("*.md @docs\n/src/ @core\n").unwrap();
        let paths = ["README.md", "docs/guide.md", "src/main.rs", "build.sh"]
            .iter()
            .map(|p| p.to_string())
            .collect::<BTreeSet<_>>();
        let report = aggregate(&ruleset, &paths, &NullReporter);

        let mut out = Vec::new();
        write_report(&mut out, &report, show_unowned).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_owner_blocks() {
        assert_eq!(
            render(false),
            "\n@core\n  src/main.rs\n\n@docs\n  README.md\n  docs/guide.md\n"
        );
    }

    #[test]
    fn renders_unowned_block_on_request() {
        assert_eq!(
            render(true),
            "\n@core\n  src/main.rs\n\n@docs\n  README.md\n  docs/guide.md\n\n(unowned)\n  build.sh\n"
        );
    }

    #[test]
    fn empty_report_renders_nothing() {
        let mut out = Vec::new();
        write_report(&mut out, &OwnershipReport::default(), true).unwrap();
        assert!(out.is_empty());
    }
}
