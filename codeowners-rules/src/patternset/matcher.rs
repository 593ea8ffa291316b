use super::nfa::{Nfa, StateId};

/// Matches paths against every pattern in the set at once. Holds no mutable
/// state, so a single matcher can be shared freely between threads.
/// Created using a [`super::Builder`].
#[derive(Clone, Debug)]
pub struct Matcher {
    nfa: Nfa,
}

impl Matcher {
    pub(crate) fn new(nfa: Nfa) -> Matcher {
        Self { nfa }
    }

    /// Ids of every pattern matching `path`, in ascending order. `path` is a
    /// `/`-separated path relative to the repository root.
    pub fn matching_patterns(&self, path: &str) -> Vec<usize> {
        let mut states = self.nfa.initial_states();
        for segment in path.split('/') {
            states = self.next_states(segment, &states);
            if states.is_empty() {
                return Vec::new();
            }
        }

        let mut matches = states
            .into_iter()
            .flat_map(|id| self.nfa.state(id).accepts.iter().copied())
            .collect::<Vec<_>>();
        matches.sort_unstable();
        matches.dedup();
        matches
    }

    /// Whether any pattern matches `path`.
    pub fn is_match(&self, path: &str) -> bool {
        !self.matching_patterns(path).is_empty()
    }

    // Step every current state over one path segment, then follow epsilon
    // edges from the states we land in.
    fn next_states(&self, segment: &str, from_states: &[StateId]) -> Vec<StateId> {
        let mut next_states = Vec::new();
        for &state_id in from_states {
            next_states.extend(
                self.nfa
                    .transitions_from(state_id)
                    .filter(|transition| transition.is_match(segment))
                    .map(|transition| transition.target),
            );
        }

        let epsilon_states = next_states
            .iter()
            .filter_map(|&state_id| self.nfa.epsilon_transition_from(state_id))
            .collect::<Vec<_>>();
        next_states.extend(epsilon_states);

        next_states.sort_unstable();
        next_states.dedup();
        next_states
    }
}
