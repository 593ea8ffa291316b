use super::{
    nfa::{Nfa, StateId, Transition},
    Matcher,
};

/// Compiles CODEOWNERS patterns into a single shared [`Nfa`]. Pattern ids
/// are handed out in insertion order, so a higher id means a later rule.
#[derive(Clone, Debug)]
pub struct Builder {
    nfa: Nfa,
    next_pattern_id: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            nfa: Nfa::new(),
            next_pattern_id: 0,
        }
    }

    /// Consume the builder, producing a [`Matcher`] for every pattern added.
    pub fn build(self) -> Matcher {
        Matcher::new(self.nfa)
    }

    /// Add a pattern, returning its id.
    pub fn add(&mut self, pattern: &str) -> usize {
        let pattern_id = self.next_pattern_id;
        self.next_pattern_id += 1;

        let (pattern, leading_slash) = match pattern.strip_prefix('/') {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };
        let (pattern, trailing_slash) = match pattern.strip_suffix('/') {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };
        let segments = pattern.split('/').collect::<Vec<_>>();

        // A lone segment with no leading slash floats to any depth; any
        // other slash pins the pattern to the root.
        let root = if leading_slash || segments.len() > 1 {
            Nfa::START_STATE
        } else {
            self.any_depth(Nfa::START_STATE)
        };

        let last = segments.iter().fold(root, |state, segment| match *segment {
            "**" => self.any_depth(state),
            glob => self.step(state, glob),
        });

        let accepting = match Tail::of(&segments, trailing_slash) {
            Tail::Exact => last,
            Tail::Recursive => self.any_depth(last),
            Tail::Contents => {
                let child = self.step(last, "*");
                self.any_depth(child)
            }
        };
        self.nfa.state_mut(accepting).accept(pattern_id);

        pattern_id
    }

    // Reuses an outgoing edge with the same glob so that patterns with a
    // common prefix walk the same states. Self-loops are never reused.
    fn step(&mut self, from: StateId, glob: &str) -> StateId {
        let shared = self
            .nfa
            .transitions_from(from)
            .find(|t| t.glob == glob && t.target != from)
            .map(|t| t.target);

        shared.unwrap_or_else(|| {
            let to = self.nfa.add_state();
            self.nfa
                .state_mut(from)
                .add_transition(Transition::new(glob.to_owned(), to));
            to
        })
    }

    // A state reachable from `from` without consuming a segment that then
    // absorbs any number of segments. A state that already loops is its own
    // answer, which keeps `**/**` equivalent to `**`.
    fn any_depth(&mut self, from: StateId) -> StateId {
        if self.loops(from) {
            return from;
        }
        if let Some(existing) = self.nfa.epsilon_transition_from(from) {
            return existing;
        }

        let looping = self.nfa.add_state();
        self.nfa
            .state_mut(looping)
            .add_transition(Transition::new("*".to_owned(), looping));
        self.nfa.state_mut(from).epsilon_transition = Some(looping);
        looping
    }

    fn loops(&self, id: StateId) -> bool {
        self.nfa
            .transitions_from(id)
            .any(|t| t.glob == "*" && t.target == id)
    }
}

/// What may follow the last written segment of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// Nothing: `docs/*` only matches files directly inside `docs`.
    Exact,
    /// Nothing, or anything beneath: `docs` and `*.md` match at any depth
    /// below themselves.
    Recursive,
    /// At least one more segment: `docs/`, `docs/**` and `docs/*/` match
    /// what is inside, never the directory entry itself.
    Contents,
}

impl Tail {
    fn of(segments: &[&str], trailing_slash: bool) -> Tail {
        match segments.last().copied() {
            _ if trailing_slash => Tail::Contents,
            Some("**") => Tail::Contents,
            Some("*") => Tail::Exact,
            _ => Tail::Recursive,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_prefixes() {
        let mut builder = Builder::new();

        builder.add("/foo/*");
        assert_eq!(
            transitions_for(&builder.nfa),
            vec![(0, "foo".to_owned(), 1), (1, "*".to_owned(), 2)]
        );

        builder.add("/foo/bar");
        assert_eq!(
            transitions_for(&builder.nfa),
            vec![
                (0, "foo".to_owned(), 1),
                (1, "*".to_owned(), 2),
                (1, "bar".to_owned(), 3),
                (4, "*".to_owned(), 4)
            ]
        );
    }

    #[test]
    fn test_pattern_ids_follow_insertion_order() {
        let mut builder = Builder::new();
        assert_eq!(builder.add("*"), 0);
        assert_eq!(builder.add("/src/"), 1);
        assert_eq!(builder.add("*.go"), 2);
    }

    #[test]
    fn test_consecutive_double_stars_collapse() {
        let mut single = Builder::new();
        single.add("/a/**/b");
        let mut double = Builder::new();
        double.add("/a/**/**/b");
        assert_eq!(transitions_for(&single.nfa), transitions_for(&double.nfa));
    }

    #[test]
    fn test_tails() {
        let tail = |pattern: &str| {
            let (pattern, trailing_slash) = match pattern.strip_suffix('/') {
                Some(rest) => (rest, true),
                None => (pattern, false),
            };
            Tail::of(&pattern.split('/').collect::<Vec<_>>(), trailing_slash)
        };
        assert_eq!(tail("docs/*"), Tail::Exact);
        assert_eq!(tail("docs"), Tail::Recursive);
        assert_eq!(tail("*.md"), Tail::Recursive);
        assert_eq!(tail("docs/"), Tail::Contents);
        assert_eq!(tail("docs/**"), Tail::Contents);
        assert_eq!(tail("docs/*/"), Tail::Contents);
        assert_eq!(tail("docs/**/"), Tail::Contents);
    }

    #[test]
    fn test_trailing_slash_after_star_loops() {
        let mut builder = Builder::new();
        builder.add("/fish/*/");
        assert_eq!(
            transitions_for(&builder.nfa),
            vec![
                (0, "fish".to_owned(), 1),
                (1, "*".to_owned(), 2),
                (2, "*".to_owned(), 3),
                (4, "*".to_owned(), 4)
            ]
        );
        assert_eq!(builder.nfa.epsilon_transition_from(StateId(3)), Some(StateId(4)));
    }

    fn transitions_for(nfa: &Nfa) -> Vec<(usize, String, usize)> {
        nfa.states_iter()
            .enumerate()
            .flat_map(|(idx, s)| {
                s.transitions
                    .iter()
                    .map(|t| (idx, t.glob.clone(), t.target.0 as usize))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
