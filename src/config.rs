// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

/// The default bound on the number of DFA states.
pub const DFA_MAX: usize = 254;

/// The default width of the transition table (7-bit ASCII).
pub const MAX_CHARS: usize = 128;

/// The widest transition table that the 8-bit alphabet allows.
pub const ALPHABET_LIMIT: usize = 256;

/// The default bound on nested macro expansions.
pub const MACRO_DEPTH: usize = 32;

/// Configuration for compiling a specification into an automaton.
///
/// The configuration is passed explicitly to each phase of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of states that subset construction may create.
    pub dfa_max: usize,

    /// Number of character codes (starting at 0) in the transition table.
    pub alphabet_size: usize,

    /// Maximum nesting of macro expansions.
    pub macro_depth: usize,

    /// Maximum number of NFA nodes, if bounded.
    pub nfa_max: Option<usize>,
}

impl Config {
    /// Create a `Config` with the default bounds.
    pub fn new() -> Config {
        Default::default()
    }

    /// Set the DFA state bound.
    pub fn dfa_max(mut self, dfa_max: usize) -> Config {
        self.dfa_max = dfa_max;
        self
    }

    /// Set the alphabet size, clamped to `1..=ALPHABET_LIMIT`.
    pub fn alphabet_size(mut self, alphabet_size: usize) -> Config {
        self.alphabet_size = alphabet_size.max(1).min(ALPHABET_LIMIT);
        self
    }

    /// Set the macro nesting bound.
    pub fn macro_depth(mut self, macro_depth: usize) -> Config {
        self.macro_depth = macro_depth;
        self
    }

    /// Bound the number of NFA nodes that the parser may create.
    pub fn nfa_max(mut self, nfa_max: usize) -> Config {
        self.nfa_max = Some(nfa_max);
        self
    }

    /// The width of the transition table: `alphabet_size` clamped to
    /// `1..=ALPHABET_LIMIT`, even if the field was assigned directly.
    pub fn table_width(&self) -> usize {
        self.alphabet_size.max(1).min(ALPHABET_LIMIT)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dfa_max: DFA_MAX,
            alphabet_size: MAX_CHARS,
            macro_depth: MACRO_DEPTH,
            nfa_max: None,
        }
    }
}
