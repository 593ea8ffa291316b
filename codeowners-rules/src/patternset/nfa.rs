/// A non-deterministic automaton over path segments. Every transition
/// consumes exactly one segment; an epsilon edge lets a state fall through
/// to a "match any number of segments" state without consuming anything.
#[derive(Clone, Debug)]
pub(crate) struct Nfa {
    states: Vec<State>,
}

impl Nfa {
    pub(crate) const START_STATE: StateId = StateId(0);

    pub(crate) fn new() -> Self {
        Self {
            states: vec![State::new()],
        }
    }

    pub(crate) fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::new());
        StateId(id as u32)
    }

    #[inline]
    pub(crate) fn state(&self, id: StateId) -> &State {
        &self.states[usize::from(id)]
    }

    #[inline]
    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[usize::from(id)]
    }

    pub(crate) fn initial_states(&self) -> Vec<StateId> {
        let mut states = vec![Self::START_STATE];
        states.extend(self.state(Self::START_STATE).epsilon_transition);
        states
    }

    pub(crate) fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.state(id).transitions.iter()
    }

    pub(crate) fn epsilon_transition_from(&self, id: StateId) -> Option<StateId> {
        self.state(id).epsilon_transition
    }

    #[cfg(test)]
    pub(crate) fn states_iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct StateId(pub(crate) u32);

impl From<StateId> for usize {
    fn from(id: StateId) -> usize {
        id.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) accepts: Vec<usize>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) epsilon_transition: Option<StateId>,
}

impl State {
    fn new() -> Self {
        Self {
            accepts: Vec::new(),
            transitions: Vec::new(),
            epsilon_transition: None,
        }
    }

    pub(crate) fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub(crate) fn accept(&mut self, pattern_id: usize) {
        self.accepts.push(pattern_id);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub(crate) glob: String,
    pub(crate) target: StateId,
    condition: SegmentCondition,
}

impl Transition {
    pub(crate) fn new(glob: String, target: StateId) -> Transition {
        let condition = SegmentCondition::new(&glob);
        Self {
            glob,
            target,
            condition,
        }
    }

    pub(crate) fn is_match(&self, segment: &str) -> bool {
        self.condition.is_match(segment)
    }
}

/// How a single glob segment is tested against a path segment. Most globs
/// in real CODEOWNERS files are literals or a single leading/trailing star,
/// so those skip the regex engine entirely.
#[derive(Debug, Clone)]
enum SegmentCondition {
    Any,
    Literal(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Regex(regex::Regex),
}

impl SegmentCondition {
    fn new(glob: &str) -> Self {
        if glob == "*" {
            return Self::Any;
        }
        if glob.contains(['\\', '?']) {
            return Self::Regex(glob_to_regex(glob));
        }

        let (rest, leading_star) = match glob.strip_prefix('*') {
            Some(rest) => (rest, true),
            None => (glob, false),
        };
        let (inner, trailing_star) = match rest.strip_suffix('*') {
            Some(inner) => (inner, true),
            None => (rest, false),
        };
        if inner.contains('*') {
            return Self::Regex(glob_to_regex(glob));
        }

        match (leading_star, trailing_star) {
            (false, false) => Self::Literal(inner.to_owned()),
            (false, true) => Self::Prefix(inner.to_owned()),
            (true, false) => Self::Suffix(inner.to_owned()),
            (true, true) => Self::Contains(inner.to_owned()),
        }
    }

    fn is_match(&self, segment: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Literal(literal) => segment == literal,
            Self::Prefix(prefix) => segment.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => segment.ends_with(suffix.as_str()),
            Self::Contains(needle) => {
                memchr::memmem::find(segment.as_bytes(), needle.as_bytes()).is_some()
            }
            Self::Regex(re) => re.is_match(segment),
        }
    }
}

// Escaped metacharacters (`\*`, `\?`, `\\`) are matched literally.
fn glob_to_regex(glob: &str) -> regex::Regex {
    let mut regex = String::with_capacity(glob.len() + 8);
    regex.push_str(r"\A");
    let mut chars = glob.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(r"[^/]*"),
            '?' => regex.push_str(r"[^/]"),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut regex, escaped),
                None => push_literal(&mut regex, '\\'),
            },
            _ => push_literal(&mut regex, c),
        }
    }
    regex.push_str(r"\z");

    // Every character is either a class we emit ourselves or escaped, so the
    // expression is always valid.
    regex::Regex::new(&regex).unwrap_or_else(|_| panic!("invalid segment regex: {}", regex))
}

fn push_literal(regex: &mut String, c: char) {
    if regex_syntax::is_meta_character(c) {
        regex.push('\\');
    }
    regex.push(c);
}
