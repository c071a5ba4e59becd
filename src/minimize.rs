// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Minimization of a `Dfa` by partition refinement.
//!
//! The states of the `Dfa` start out partitioned by what they accept. Each
//! refinement pass takes the first member of every group as a pivot and
//! moves the members whose transitions lead to different groups than the
//! pivot's into one new group. Groups are only ever split, never merged, and
//! the refinement stops after a pass that splits nothing. At that point
//! every member of a group has transitions into the same groups, so any
//! member can stand in for the whole group in the minimized table.

use dfa::Dfa;
use nfa::{Accept, Anchor};
use table::TransitionTable;

/// A partition of the states of a `Dfa` into groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    group_of: Vec<usize>,
    groups: Vec<Vec<usize>>,
}

impl Partition {
    /// Create the initial partition of the states of `dfa`.
    ///
    /// Non-accepting states form the first group. Accepting states are
    /// grouped by their (action, anchor) pair in order of first appearance,
    /// so accepting states of different rules are never merged. Groups that
    /// would be empty are not created.
    pub fn new(dfa: &Dfa) -> Partition {
        let mut partition = Partition {
            group_of: vec![0; dfa.len()],
            groups: Vec::new(),
        };

        let rejecting: Vec<_> = (0..dfa.len())
            .filter(|s| !dfa.states()[*s].is_accepting())
            .collect();
        if !rejecting.is_empty() {
            partition.push_group(rejecting);
        }

        let mut signatures: Vec<(&str, Anchor)> = Vec::new();
        let mut accepting: Vec<Vec<usize>> = Vec::new();
        let accepts = dfa
            .states()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.accept().map(|a| (i, a)));
        for (state, accept) in accepts {
            let signature = (accept.action(), accept.anchor());
            match signatures.iter().position(|s| *s == signature) {
                Some(index) => accepting[index].push(state),
                None => {
                    signatures.push(signature);
                    accepting.push(vec![state]);
                }
            }
        }

        for group in accepting {
            partition.push_group(group);
        }

        partition
    }

    fn push_group(&mut self, members: Vec<usize>) {
        let group = self.groups.len();
        for state in &members {
            self.group_of[*state] = group;
        }
        self.groups.push(members);
    }

    /// Refine the partition until no group can be split.
    pub fn refine(&mut self, table: &TransitionTable) {
        let mut pass = 1;
        while self.refine_pass(table) {
            pass += 1;
        }
        debug!("partition stable after {} passes", pass);
    }

    // Split every group once. Returns true if any group was split.
    fn refine_pass(&mut self, table: &TransitionTable) -> bool {
        let mut split = false;

        for group in 0..self.groups.len() {
            if self.groups[group].len() < 2 {
                continue;
            }

            let pivot = self.groups[group][0];
            let (stay, moved): (Vec<usize>, Vec<usize>) = self.groups[group]
                .iter()
                .cloned()
                .partition(|state| self.same_targets(table, pivot, *state));

            if !moved.is_empty() {
                debug!(
                    "split {:?} from group {} into group {}",
                    moved,
                    group,
                    self.groups.len()
                );
                self.groups[group] = stay;
                self.push_group(moved);
                split = true;
            }
        }

        split
    }

    // Check if `left` and `right` lead into the same group on every code. An
    // absent transition only agrees with another absent transition.
    fn same_targets(&self, table: &TransitionTable, left: usize, right: usize) -> bool {
        (0..table.width()).rev().all(|code| {
            let l = table.get(left, code).map(|t| self.group_of[t]);
            let r = table.get(right, code).map(|t| self.group_of[t]);
            l == r
        })
    }

    /// The group that `state` belongs to.
    pub fn group_of(&self, state: usize) -> usize {
        self.group_of[state]
    }

    /// The members of each group.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the partition has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A minimized deterministic finite automaton.
///
/// States are the groups of the final partition; this table, the accept
/// information of each group and the start group are everything a scanner
/// generator needs.
#[derive(Debug, Clone)]
pub struct MinimizedDfa {
    table: TransitionTable,
    accepts: Vec<Option<Accept>>,
    start: usize,
}

impl MinimizedDfa {
    /// Minimize `dfa`.
    pub fn new(dfa: &Dfa) -> MinimizedDfa {
        let mut partition = Partition::new(dfa);
        partition.refine(dfa.table());
        let minimized = MinimizedDfa::from_partition(dfa, &partition);

        info!(
            "minimized {} DFA states into {} groups",
            dfa.len(),
            minimized.len()
        );
        minimized
    }

    /// Rewrite the table of `dfa` over the groups of a stable `partition`.
    ///
    /// Each group takes the transitions and accept information of its first
    /// member.
    pub fn from_partition(dfa: &Dfa, partition: &Partition) -> MinimizedDfa {
        let mut table = TransitionTable::new(dfa.table().width());
        let mut accepts = Vec::with_capacity(partition.len());

        for members in partition.groups() {
            let representative = members[0];
            let row = table.add_row();
            for (code, target) in dfa.table().transitions(representative) {
                table.set(row, code, Some(partition.group_of(target)));
            }
            accepts.push(dfa.states()[representative].accept().cloned());
        }

        MinimizedDfa {
            table,
            accepts,
            start: if dfa.is_empty() { 0 } else { partition.group_of(0) },
        }
    }

    /// The transition table, indexed by group.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The accept information of each group.
    pub fn accepts(&self) -> &[Option<Accept>] {
        &self.accepts
    }

    /// The group that contains the start state.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.accepts.len()
    }

    /// Check if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.accepts.is_empty()
    }

    /// The group that follows `group` on `code`.
    pub fn next_state(&self, group: usize, code: u8) -> Option<usize> {
        self.table.get(group, code as usize)
    }
}
