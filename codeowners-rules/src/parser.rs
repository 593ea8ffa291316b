use crate::ruleset::{Owner, Rule, RuleSet};

/// Parse CODEOWNERS source leniently: every rule that could be read is
/// returned alongside every error found.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}

/// The result of parsing a CODEOWNERS file. If `errors` is non-empty the
/// rules may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub rules: Vec<Rule>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Compile the rules into a [`RuleSet`], ignoring any errors.
    pub fn into_ruleset(self) -> RuleSet {
        RuleSet::new(self.rules)
    }

    /// Compile the rules into a [`RuleSet`], failing on the first error.
    pub fn into_strict_ruleset(self) -> Result<RuleSet, ParseError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(RuleSet::new(self.rules)),
        }
    }
}

/// A problem in CODEOWNERS source, located by 1-based line number and by
/// byte span.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub span: Span,
}

/// Start and end byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span(pub usize, pub usize);

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Span(start, end)
    }
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> ParseResult {
        let mut rules = Vec::new();

        self.skip_whitespace();
        while let Some(c) = self.peek() {
            match c {
                '\r' | '\n' => {
                    self.next();
                }
                '#' => self.skip_comment(),
                _ => {
                    rules.push(self.parse_rule());
                    self.skip_line();
                }
            }
            self.skip_whitespace();
        }

        ParseResult {
            rules,
            errors: self.errors,
        }
    }

    // Only called on a non-blank, non-comment character, so the pattern is
    // never empty. Bad owners are reported and dropped; the rule is kept.
    fn parse_rule(&mut self) -> Rule {
        let pattern = self.parse_pattern();

        let mut owners = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let token = self.parse_token();
            if token.is_empty() {
                break;
            }
            match Owner::try_from(token) {
                Ok(owner) => owners.push(owner),
                Err(err) => self.error(err.to_string(), (start, self.pos)),
            }
        }

        Rule { pattern, owners }
    }

    // Backslash escapes a space, tab or `#`; other escapes are left in place
    // for the glob matcher to interpret.
    fn parse_pattern(&mut self) -> String {
        let mut pattern = String::new();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.next();
                    match self.peek() {
                        Some(escaped @ (' ' | '\t' | '#')) => {
                            pattern.push(escaped);
                            self.next();
                        }
                        Some('\r' | '\n') | None => pattern.push('\\'),
                        Some(escaped) => {
                            pattern.push('\\');
                            pattern.push(escaped);
                            self.next();
                        }
                    }
                }
                ' ' | '\t' | '#' | '\r' | '\n' => break,
                '\0' => {
                    self.error("patterns cannot contain null bytes", (self.pos, self.pos + 1));
                    pattern.push(c);
                    self.next();
                }
                _ => {
                    pattern.push(c);
                    self.next();
                }
            }
        }
        pattern
    }

    fn parse_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '#' | '\r' | '\n') {
                break;
            }
            token.push(c);
            self.next();
        }
        token
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if matches!(c, '\r' | '\n') {
                break;
            }
            self.next();
        }
    }

    // After a rule only a trailing comment may remain on the line.
    fn skip_line(&mut self) {
        self.skip_whitespace();
        self.skip_comment();
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t') = self.peek() {
            self.next();
        }
    }

    fn error(&mut self, message: impl Into<String>, span: impl Into<Span>) {
        self.errors.push(ParseError {
            message: message.into(),
            line: self.line,
            span: span.into(),
        });
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }
}
