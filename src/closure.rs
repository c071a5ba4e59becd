// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Epsilon closures and character moves over an `Nfa`.
//!
//! These are pure functions of the graph. Node sets are `BTreeSet`s so that
//! two sets with the same members compare and hash equal regardless of the
//! order in which they were discovered.

use std::collections::BTreeSet;

use nfa::{Accept, Edge, Nfa, NodeId};

/// The result of an epsilon closure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    nodes: BTreeSet<NodeId>,
    accept: Option<Accept>,
}

impl Closure {
    /// The nodes in the closure.
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    /// The accept decision: the accept information of the terminal node with
    /// the smallest id, if the closure contains any terminal node.
    pub fn accept(&self) -> Option<&Accept> {
        self.accept.as_ref()
    }

    /// Check if the closure contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Split the closure into its node set and accept decision.
    pub fn into_parts(self) -> (BTreeSet<NodeId>, Option<Accept>) {
        (self.nodes, self.accept)
    }
}

/// Compute the set of nodes reachable from `seeds` by zero or more epsilon
/// edges.
///
/// When several terminal nodes are reachable the one with the smallest id
/// wins, so the earliest declared rule decides the accept action.
pub fn epsilon_closure<I>(nfa: &Nfa, seeds: I) -> Closure
where
    I: IntoIterator<Item = NodeId>,
{
    let mut nodes = BTreeSet::new();
    let mut stack = Vec::new();
    for seed in seeds {
        if nodes.insert(seed) {
            stack.push(seed);
        }
    }

    let mut winner: Option<NodeId> = None;
    while let Some(id) = stack.pop() {
        let node = nfa.node(id);

        if node.is_terminal() && winner.map_or(true, |w| id < w) {
            winner = Some(id);
        }

        if *node.edge() == Edge::Epsilon {
            for next in node.out_a().into_iter().chain(node.out_b()) {
                if nodes.insert(next) {
                    stack.push(next);
                }
            }
        }
    }

    Closure {
        nodes,
        accept: winner.and_then(|id| nfa.node(id).accept()),
    }
}

/// Compute the set of nodes reached by consuming `code` from any node in
/// `nodes`.
///
/// Only character and class edges are followed; epsilon edges are left to
/// `epsilon_closure`.
pub fn move_on<'a, I>(nfa: &Nfa, nodes: I, code: u8) -> BTreeSet<NodeId>
where
    I: IntoIterator<Item = &'a NodeId>,
{
    nodes
        .into_iter()
        .map(|id| nfa.node(*id))
        .filter(|node| node.edge().matches(code))
        .filter_map(|node| node.out_a())
        .collect()
}
