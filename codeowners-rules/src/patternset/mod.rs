//! Compiles an ordered list of CODEOWNERS patterns into one automaton and
//! reports which of them match a given path.

mod builder;
mod matcher;
mod nfa;

pub use self::builder::Builder;
pub use self::matcher::Matcher;
