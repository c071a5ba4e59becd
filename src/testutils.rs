// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

// The utility functions in this module are used to support tests in more
// than one other module.

use proptest::prelude::*;

use closure::{epsilon_closure, move_on};
use config::Config;
use dfa::Dfa;
use error::Result;
use minimize::MinimizedDfa;
use nfa::{Accept, Nfa};
use parser::RegexParser;
use reader::Specification;

/// A specification whose rules section holds `rules`, one per line
/// starting on line 2.
pub fn spec_source(rules: &[(&str, &str)]) -> String {
    let mut source = String::from("%%\n");
    for &(pattern, action) in rules {
        source.push_str(&format!("{} {}\n", pattern, action));
    }
    source
}

pub fn try_nfa_for(rules: &[(&str, &str)], config: &Config) -> Result<Nfa> {
    let spec = Specification::parse(&spec_source(rules))?;
    RegexParser::new(spec.reader(config.macro_depth), config).parse()
}

pub fn nfa_for(rules: &[(&str, &str)]) -> Nfa {
    try_nfa_for(rules, &Config::default()).expect("Unable to build NFA.")
}

pub fn try_dfa_for(rules: &[(&str, &str)], config: &Config) -> Result<Dfa> {
    let nfa = try_nfa_for(rules, config)?;
    Dfa::from_nfa(&nfa, config)
}

pub fn dfa_for(rules: &[(&str, &str)]) -> Dfa {
    try_dfa_for(rules, &Config::default()).expect("Unable to build DFA.")
}

/// Run `input` through `nfa` and report the accept decision at the end.
pub fn nfa_accepts(nfa: &Nfa, input: &[u8]) -> Option<Accept> {
    let mut current = epsilon_closure(nfa, Some(nfa.start()));
    for code in input {
        let moved = move_on(nfa, current.nodes(), *code);
        current = epsilon_closure(nfa, moved);
    }
    current.accept().cloned()
}

pub fn dfa_accepts(dfa: &Dfa, input: &[u8]) -> Option<Accept> {
    let mut state = 0;
    for code in input {
        state = dfa.next_state(state, *code)?;
    }
    dfa.states()[state].accept().cloned()
}

pub fn minimized_accepts(dfa: &MinimizedDfa, input: &[u8]) -> Option<Accept> {
    let mut group = dfa.start();
    for code in input {
        group = dfa.next_state(group, *code)?;
    }
    dfa.accepts()[group].clone()
}

/// Patterns over `a`, `b` and `c` that mean the same thing to this crate
/// and to the `regex` crate.
pub fn arb_pattern() -> BoxedStrategy<String> {
    let leaf = prop_oneof![
        Just("a"),
        Just("b"),
        Just("c"),
        Just("."),
        Just("[ab]"),
        Just("[^a]"),
        Just("[a-c]"),
    ].prop_map(|s| s.to_string());

    leaf.prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{}{}", l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({}|{})", l, r)),
            inner.clone().prop_map(|r| format!("({})*", r)),
            inner.clone().prop_map(|r| format!("({})+", r)),
            inner.prop_map(|r| format!("({})?", r)),
        ]
    }).boxed()
}
