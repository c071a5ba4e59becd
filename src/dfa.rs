// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Subset construction of a deterministic finite automaton from an `Nfa`.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use closure::{epsilon_closure, move_on, Closure};
use config::Config;
use error::{Error, ErrorKind, Result};
use nfa::{Accept, Nfa, NodeId};
use table::TransitionTable;

/// A state of a `Dfa`: the set of NFA nodes it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    nfa_set: BTreeSet<NodeId>,
    accept: Option<Accept>,
    marked: bool,
}

impl DfaState {
    /// The NFA nodes that make up the state.
    pub fn nfa_set(&self) -> &BTreeSet<NodeId> {
        &self.nfa_set
    }

    /// What the scanner does when it stops in this state, if it is accepting.
    pub fn accept(&self) -> Option<&Accept> {
        self.accept.as_ref()
    }

    /// Check if the state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accept.is_some()
    }

    /// Check if the transitions out of the state have been computed.
    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

/// A deterministic finite automaton with a dense transition table.
///
/// State 0 is the start state.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
    table: TransitionTable,
}

impl Dfa {
    /// Build a `Dfa` that accepts what `nfa` accepts.
    ///
    /// The table is `config.table_width()` codes wide. Fails with
    /// `TooManyDfaStates` if more than `config.dfa_max` states are needed.
    pub fn from_nfa(nfa: &Nfa, config: &Config) -> Result<Dfa> {
        let mut builder = SubsetBuilder {
            nfa,
            dfa_max: config.dfa_max,
            states: Vec::new(),
            index: HashMap::new(),
            table: TransitionTable::new(config.table_width()),
            next_unmarked: 0,
        };

        builder.run()?;
        let dfa = Dfa {
            states: builder.states,
            table: builder.table,
        };

        info!(
            "built DFA with {} states ({} accepting)",
            dfa.len(),
            dfa.states.iter().filter(|s| s.is_accepting()).count()
        );
        Ok(dfa)
    }

    /// The states in creation order.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// The transition table, indexed by state.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if the `Dfa` has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state that follows `state` on `code`.
    pub fn next_state(&self, state: usize, code: u8) -> Option<usize> {
        self.table.get(state, code as usize)
    }
}

struct SubsetBuilder<'a> {
    nfa: &'a Nfa,
    dfa_max: usize,
    states: Vec<DfaState>,
    index: HashMap<BTreeSet<NodeId>, usize>,
    table: TransitionTable,
    next_unmarked: usize,
}

impl<'a> SubsetBuilder<'a> {
    fn run(&mut self) -> Result<()> {
        let start = epsilon_closure(self.nfa, Some(self.nfa.start()));
        self.add_state(start)?;

        while let Some(current) = self.unmarked() {
            self.states[current].marked = true;

            for code in 0..self.table.width() {
                let moved = move_on(self.nfa, &self.states[current].nfa_set, code as u8);
                let target = if moved.is_empty() {
                    None
                } else {
                    let closure = epsilon_closure(self.nfa, moved);
                    Some(self.state_for(closure)?)
                };
                self.table.set(current, code, target);
            }
        }

        Ok(())
    }

    // The lowest numbered state whose transitions are not yet computed.
    fn unmarked(&mut self) -> Option<usize> {
        while self.next_unmarked < self.states.len() {
            if !self.states[self.next_unmarked].marked {
                return Some(self.next_unmarked);
            }
            self.next_unmarked += 1;
        }
        None
    }

    fn state_for(&mut self, closure: Closure) -> Result<usize> {
        match self.index.get(closure.nodes()) {
            Some(state) => Ok(*state),
            None => self.add_state(closure),
        }
    }

    fn add_state(&mut self, closure: Closure) -> Result<usize> {
        if self.states.len() >= self.dfa_max {
            return Err(Error::new(ErrorKind::TooManyDfaStates));
        }

        let (nfa_set, accept) = closure.into_parts();
        let state = self.table.add_row();
        debug!(
            "DFA state {}: {{{}}}{}",
            state,
            nfa_set.iter().join(","),
            accept
                .as_ref()
                .map_or(String::new(), |a| format!(" accepts {:?}", a.action()))
        );

        self.index.insert(nfa_set.clone(), state);
        self.states.push(DfaState {
            nfa_set,
            accept,
            marked: false,
        });
        Ok(state)
    }
}
