// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A library for compiling lexer specifications into minimized deterministic
//! finite automata.
//!
//! A specification is a list of rules, each a regular expression paired with
//! the action text a scanner runs when the expression matches. The pipeline
//! is:
//!
//! 1. the regex parser reads the rule patterns and builds a Thompson
//!    non-deterministic finite automaton (`nfa::Nfa`) for all of them,
//! 2. subset construction turns the NFA into a deterministic finite automaton
//!    with a dense transition table (`dfa::Dfa`),
//! 3. partition refinement merges the equivalent states of the DFA
//!    (`minimize::MinimizedDfa`).
//!
//! When more than one rule matches the same input the rule declared first
//! wins. The minimized transition table, together with the accept action and
//! anchor of each state, is everything a scanner generator needs.
//!
//! ```
//! use lexor::{compile, Config};
//!
//! let source = "D [0-9]\n%%\n{D}+ return NUMBER;\n";
//! let automaton = compile(source, &Config::default()).unwrap();
//!
//! assert_eq!(automaton.rules(), 1);
//! assert!(automaton.minimized().len() <= automaton.dfa().len());
//! ```

#![deny(missing_docs)]

#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
#[macro_use]
extern crate proptest;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

#[cfg(test)]
extern crate regex;

pub mod charset;
pub mod closure;
pub mod dfa;
pub mod minimize;
pub mod nfa;
pub mod parser;
pub mod reader;
pub mod table;
pub mod token;

mod config;
mod error;
mod macros;
mod span;

#[cfg(test)]
mod testutils;

pub use config::{Config, ALPHABET_LIMIT, DFA_MAX, MACRO_DEPTH, MAX_CHARS};
pub use error::{Error, ErrorKind, Result};
pub use macros::MacroTable;
pub use span::Location;

use dfa::Dfa;
use minimize::MinimizedDfa;
use nfa::Nfa;
use parser::RegexParser;
use reader::Specification;
use token::TokenSource;

/// The result of compiling a specification.
///
/// The automaton keeps every stage of the pipeline so that diagnostic
/// consumers can inspect the NFA and the unminimized DFA as well as the
/// minimized one.
#[derive(Debug, Clone)]
pub struct Automaton {
    header: String,
    trailer: String,
    rules: usize,
    nfa: Nfa,
    dfa: Dfa,
    minimized: MinimizedDfa,
}

impl Automaton {
    /// The header code of the specification.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The trailer code of the specification.
    pub fn trailer(&self) -> &str {
        &self.trailer
    }

    /// The number of rules.
    pub fn rules(&self) -> usize {
        self.rules
    }

    /// The NFA for all the rules. Its start node heads the rule chain.
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// The DFA before minimization.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The minimized DFA.
    pub fn minimized(&self) -> &MinimizedDfa {
        &self.minimized
    }
}

/// Compile the specification `source` into an `Automaton`.
///
/// Any error aborts the whole compilation; there is no partial automaton.
pub fn compile(source: &str, config: &Config) -> Result<Automaton> {
    let spec = Specification::parse(source)?;
    let mut reader = spec.reader(config.macro_depth);
    let mut automaton = build(&mut reader, config)?;

    automaton.header = spec.header().to_string();
    automaton.trailer = spec.trailer().to_string();
    Ok(automaton)
}

/// Build an `Automaton` from the rule patterns of any `TokenSource`.
///
/// The header and trailer of the result are empty.
pub fn build<S: TokenSource>(source: &mut S, config: &Config) -> Result<Automaton> {
    let nfa = RegexParser::new(source, config).parse()?;
    let rules = nfa.nodes().filter(|&(_, node)| node.is_terminal()).count();
    let dfa = Dfa::from_nfa(&nfa, config)?;
    let minimized = MinimizedDfa::new(&dfa);

    Ok(Automaton {
        header: String::new(),
        trailer: String::new(),
        rules,
        nfa,
        dfa,
        minimized,
    })
}
