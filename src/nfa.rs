// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The non-deterministic finite automaton graph.
//!
//! The nodes of an `Nfa` live in an arena and refer to each other by
//! `NodeId`. A node has at most two outgoing transitions and many nodes may
//! share a successor, so the graph has both shared structure and back edges
//! (from closures). The arena hands out ids in creation order; because rules
//! are compiled in declaration order, every node of an earlier rule has a
//! smaller id than every node of a later rule.

use std::fmt;

use charset::CharSet;

/// The identity of a node within an `Nfa`.
///
/// Ids are dense, assigned in creation order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Gets the index of the node in its arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The label on the outgoing edge of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// A transition that consumes no input.
    Epsilon,

    /// A transition on any code in the set.
    Class(CharSet),

    /// A transition on exactly one code.
    Char(u8),
}

impl Edge {
    /// Check if the edge consumes `code`.
    ///
    /// Epsilon edges never match.
    pub fn matches(&self, code: u8) -> bool {
        match self {
            &Edge::Epsilon => false,
            &Edge::Class(ref set) => set.contains(code),
            &Edge::Char(c) => c == code,
        }
    }
}

/// The line context that a rule requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The rule may match anywhere.
    None,

    /// The rule began with `^`.
    Start,

    /// The rule ended with `$`.
    End,

    /// The rule began with `^` and ended with `$`.
    Both,
}

impl Anchor {
    /// Combine the beginning-of-line and end-of-line flags of a rule.
    pub fn new(at_start: bool, at_end: bool) -> Anchor {
        match (at_start, at_end) {
            (false, false) => Anchor::None,
            (true, false) => Anchor::Start,
            (false, true) => Anchor::End,
            (true, true) => Anchor::Both,
        }
    }

    /// Check if the rule required beginning-of-line context.
    pub fn at_start(&self) -> bool {
        *self == Anchor::Start || *self == Anchor::Both
    }

    /// Check if the rule required end-of-line context.
    pub fn at_end(&self) -> bool {
        *self == Anchor::End || *self == Anchor::Both
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::None
    }
}

/// What a scanner does when it stops in an accepting state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Accept {
    action: String,
    anchor: Anchor,
}

impl Accept {
    /// Create an `Accept` for the given action text and anchor.
    pub fn new<S: Into<String>>(action: S, anchor: Anchor) -> Accept {
        Accept {
            action: action.into(),
            anchor,
        }
    }

    /// Gets the action text of the rule.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Gets the anchor of the rule.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}

/// A node of the NFA graph.
#[derive(Clone, Debug)]
pub struct Node {
    edge: Edge,
    out_a: Option<NodeId>,
    out_b: Option<NodeId>,
    action: Option<String>,
    anchor: Anchor,
}

impl Node {
    fn new() -> Node {
        Node {
            edge: Edge::Epsilon,
            out_a: None,
            out_b: None,
            action: None,
            anchor: Anchor::None,
        }
    }

    /// Gets the label of the outgoing edge.
    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// Gets the primary successor.
    pub fn out_a(&self) -> Option<NodeId> {
        self.out_a
    }

    /// Gets the secondary successor.
    ///
    /// This is only present at epsilon branch points.
    pub fn out_b(&self) -> Option<NodeId> {
        self.out_b
    }

    /// Check if the node ends a rule.
    pub fn is_terminal(&self) -> bool {
        self.out_a.is_none()
    }

    /// Gets the accept information of a terminal node.
    pub fn accept(&self) -> Option<Accept> {
        if self.is_terminal() {
            Some(Accept::new(
                self.action.as_ref().map_or("", |a| a.as_str()),
                self.anchor,
            ))
        } else {
            None
        }
    }
}

/// A complete NFA: the node arena and the start of the rule chain.
#[derive(Clone, Debug)]
pub struct Nfa {
    nodes: Vec<Node>,
    start: NodeId,
}

impl Nfa {
    /// Gets the start node of the rule chain.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Gets the node for `id`.
    ///
    /// # Panics
    /// `node` will panic if `id` does not belong to this `Nfa`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node in creation order.
    pub fn nodes<'a>(&'a self) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Collect the nodes reachable from the start node by any edge.
    ///
    /// The nodes are returned in depth-first visiting order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![self.start];
        seen[self.start.0] = true;

        while let Some(id) = stack.pop() {
            order.push(id);
            let node = self.node(id);
            for next in node.out_a.iter().chain(node.out_b.iter()) {
                if !seen[next.0] {
                    seen[next.0] = true;
                    stack.push(*next);
                }
            }
        }

        order
    }
}

/// The arena that NFA fragments are built in.
///
/// Every node is created through `NfaBuilder::node`, which hands out
/// sequential ids.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    nodes: Vec<Node>,
}

impl NfaBuilder {
    /// Create an empty `NfaBuilder`.
    pub fn new() -> NfaBuilder {
        Default::default()
    }

    /// Allocate a new epsilon node with no successors.
    pub fn node(&mut self) -> NodeId {
        self.nodes.push(Node::new());
        NodeId(self.nodes.len() - 1)
    }

    /// Allocate a new node whose edge is labelled `edge`.
    pub fn edge_node(&mut self, edge: Edge) -> NodeId {
        let id = self.node();
        self.nodes[id.0].edge = edge;
        id
    }

    /// Relabel the outgoing edge of `id`.
    pub fn set_edge(&mut self, id: NodeId, edge: Edge) {
        self.nodes[id.0].edge = edge;
    }

    /// Set the primary successor of `id`.
    pub fn set_out_a(&mut self, id: NodeId, next: NodeId) {
        self.nodes[id.0].out_a = Some(next);
    }

    /// Set the secondary successor of `id`.
    pub fn set_out_b(&mut self, id: NodeId, next: NodeId) {
        self.nodes[id.0].out_b = Some(next);
    }

    /// Mark `id` as the end of a rule.
    pub fn set_accept<S: Into<String>>(&mut self, id: NodeId, action: S, anchor: Anchor) {
        let node = &mut self.nodes[id.0];
        node.action = Some(action.into());
        node.anchor = anchor;
    }

    /// The number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finish building, with `start` as the start of the rule chain.
    pub fn build(self, start: NodeId) -> Nfa {
        Nfa {
            nodes: self.nodes,
            start,
        }
    }
}
