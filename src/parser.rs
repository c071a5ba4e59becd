// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A recursive descent parser that builds an `Nfa` while it parses.
//!
//! The grammar is:
//!
//! ```text
//! machine  := rule+ END_OF_INPUT
//! rule     := '^'? expr '$'? EOS
//! expr     := cat_expr ('|' cat_expr)*
//! cat_expr := factor+
//! factor   := term ('*' | '+' | '?')?
//! term     := '(' expr ')' | '[' class ']' | '.' | LITERAL
//! class    := '^'? (LITERAL | LITERAL '-' LITERAL)*
//! ```
//!
//! Each production returns the `(start, end)` pair of the fragment it built.
//! The end of a fragment is always an epsilon node with no successors, so
//! the caller is free to wire it onwards.

use charset::CharSet;
use config::Config;
use error::{Error, ErrorKind, Result};
use nfa::{Anchor, Edge, Nfa, NfaBuilder, NodeId};
use token::{Token, TokenSource};

type Fragment = (NodeId, NodeId);

/// The parser for the rules section of a specification.
///
/// The parser owns the node arena, so every node it creates gets the next
/// sequential id. Because rules are parsed in declaration order the nodes of
/// an earlier rule always have smaller ids than those of a later rule.
pub struct RegexParser<'c, S> {
    source: S,
    builder: NfaBuilder,
    config: &'c Config,
    rules: usize,
}

impl<'c, S: TokenSource> RegexParser<'c, S> {
    /// Create a parser that reads tokens from `source`.
    pub fn new(source: S, config: &'c Config) -> RegexParser<'c, S> {
        RegexParser {
            source,
            builder: NfaBuilder::new(),
            config,
            rules: 0,
        }
    }

    /// Parse every rule and return the resulting `Nfa`.
    ///
    /// The start node of the `Nfa` is the head of the rule chain: each link
    /// of the chain has the start of one rule as its primary successor and
    /// the next link as its secondary successor.
    pub fn parse(mut self) -> Result<Nfa> {
        self.source.advance()?;
        let start = self.machine()?;

        info!(
            "built NFA with {} nodes for {} rules",
            self.builder.len(),
            self.rules
        );
        Ok(self.builder.build(start))
    }

    fn machine(&mut self) -> Result<NodeId> {
        trace!("enter machine");

        if self.source.matches(Token::EndOfInput) {
            return Err(self.error(ErrorKind::MalformedExpression));
        }

        let start = self.node()?;
        let rule = self.rule()?;
        self.builder.set_out_a(start, rule);

        let mut link = start;
        while !self.source.matches(Token::EndOfInput) {
            let next = self.node()?;
            self.builder.set_out_b(link, next);
            let rule = self.rule()?;
            self.builder.set_out_a(next, rule);
            link = next;
        }

        trace!("leave machine");
        Ok(start)
    }

    fn rule(&mut self) -> Result<NodeId> {
        trace!("enter rule");

        let at_start = self.source.matches(Token::AtBol);
        let bol = if at_start {
            let bol = self.edge_node(Edge::Char(b'\n'))?;
            self.source.advance()?;
            Some(bol)
        } else {
            None
        };

        let (mut start, mut end) = self.expr()?;
        if let Some(bol) = bol {
            self.builder.set_out_a(bol, start);
            start = bol;
        }

        let at_end = self.source.matches(Token::AtEol);
        if at_end {
            self.source.advance()?;
            let terminal = self.node()?;
            let eol: CharSet = vec![b'\r', b'\n'].into_iter().collect();
            self.builder.set_edge(end, Edge::Class(eol));
            self.builder.set_out_a(end, terminal);
            end = terminal;
        }

        if !self.source.matches(Token::Eos) {
            return Err(self.error(ErrorKind::MalformedExpression));
        }

        let action = self.source.action().trim().to_string();
        debug!("rule {} accepts with {:?}", self.rules + 1, action);
        self.builder.set_accept(end, action, Anchor::new(at_start, at_end));
        self.rules += 1;
        self.source.advance()?;

        trace!("leave rule");
        Ok(start)
    }

    fn expr(&mut self) -> Result<Fragment> {
        trace!("enter expr");

        let (mut start, mut end) = self.cat_expr()?;
        while self.source.matches(Token::Or) {
            self.source.advance()?;
            let (alt_start, alt_end) = self.cat_expr()?;

            let entry = self.node()?;
            self.builder.set_out_a(entry, start);
            self.builder.set_out_b(entry, alt_start);

            let exit = self.node()?;
            self.builder.set_out_a(end, exit);
            self.builder.set_out_a(alt_end, exit);

            start = entry;
            end = exit;
        }

        Ok((start, end))
    }

    fn cat_expr(&mut self) -> Result<Fragment> {
        trace!("enter cat_expr");

        if !self.first_in_cat()? {
            return Err(self.error(ErrorKind::MalformedExpression));
        }

        let (start, mut end) = self.factor()?;
        while self.first_in_cat()? {
            let (next_start, next_end) = self.factor()?;
            self.builder.set_out_a(end, next_start);
            end = next_end;
        }

        Ok((start, end))
    }

    // Check if the current token can begin a factor. Tokens that end a
    // concatenation give false; tokens that can never begin one are errors.
    fn first_in_cat(&self) -> Result<bool> {
        match self.source.current() {
            Token::CloseParen | Token::AtEol | Token::Or | Token::Eos | Token::EndOfInput => {
                Ok(false)
            }
            Token::Closure | Token::Plus | Token::Optional => {
                Err(self.error(ErrorKind::DanglingClosureOperator))
            }
            Token::CclEnd => Err(self.error(ErrorKind::MissingOpenBracket)),
            Token::AtBol => Err(self.error(ErrorKind::AnchorNotAtStart)),
            _ => Ok(true),
        }
    }

    fn factor(&mut self) -> Result<Fragment> {
        trace!("enter factor");

        let (start, end) = self.term()?;
        let op = self.source.current();
        match op {
            Token::Closure | Token::Plus | Token::Optional => {
                let entry = self.node()?;
                let exit = self.node()?;
                self.builder.set_out_a(entry, start);
                self.builder.set_out_a(end, exit);

                if op != Token::Plus {
                    self.builder.set_out_b(entry, exit);
                }
                if op != Token::Optional {
                    self.builder.set_out_b(end, start);
                }

                self.source.advance()?;
                Ok((entry, exit))
            }
            _ => Ok((start, end)),
        }
    }

    fn term(&mut self) -> Result<Fragment> {
        trace!("enter term");

        if self.source.matches(Token::OpenParen) {
            self.source.advance()?;
            let fragment = self.expr()?;
            if !self.source.matches(Token::CloseParen) {
                return Err(self.error(ErrorKind::MissingCloseParen));
            }
            self.source.advance()?;
            return Ok(fragment);
        }

        let edge = match self.source.current() {
            Token::Any => {
                self.source.advance()?;
                Edge::Class(self.any())
            }
            Token::CclStart => {
                self.source.advance()?;
                Edge::Class(self.class()?)
            }
            _ => {
                let code = self.source.lexeme();
                self.source.advance()?;
                Edge::Char(code)
            }
        };

        let start = self.edge_node(edge)?;
        let end = self.node()?;
        self.builder.set_out_a(start, end);
        Ok((start, end))
    }

    // Every code in the alphabet except the line terminators.
    fn any(&self) -> CharSet {
        (0..self.config.table_width())
            .map(|c| c as u8)
            .filter(|c| *c != b'\r' && *c != b'\n')
            .collect()
    }

    // Parses the body of a class, with the current token just after the `[`,
    // and consumes the closing `]`.
    fn class(&mut self) -> Result<CharSet> {
        let negate = self.source.matches(Token::AtBol);
        if negate {
            self.source.advance()?;
        }

        let mut set = CharSet::new();
        if self.source.matches(Token::CclEnd) {
            set.insert_range(0, b' ');
        } else {
            let mut previous = None;
            while !self.at_class_end() {
                match previous {
                    Some(first) if self.source.matches(Token::Dash) => {
                        self.source.advance()?;
                        if self.at_class_end() {
                            set.insert(b'-');
                            break;
                        }
                        set.insert_range(first, self.source.lexeme());
                        previous = None;
                    }
                    _ => {
                        let code = self.source.lexeme();
                        set.insert(code);
                        previous = Some(code);
                    }
                }
                self.source.advance()?;
            }
        }

        if !self.source.matches(Token::CclEnd) {
            return Err(self.error(ErrorKind::MalformedExpression));
        }
        self.source.advance()?;

        if negate {
            set = set.negate_ascii();
            set.remove(b'\r');
            set.remove(b'\n');
        }

        trace!("class {}", set);
        Ok(set)
    }

    fn at_class_end(&self) -> bool {
        match self.source.current() {
            Token::CclEnd | Token::Eos | Token::EndOfInput => true,
            _ => false,
        }
    }

    fn node(&mut self) -> Result<NodeId> {
        self.edge_node(Edge::Epsilon)
    }

    fn edge_node(&mut self, edge: Edge) -> Result<NodeId> {
        if let Some(max) = self.config.nfa_max {
            if self.builder.len() >= max {
                return Err(self.error(ErrorKind::TooManyOrTooLongExpressions));
            }
        }
        Ok(self.builder.edge_node(edge))
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.source.location())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use closure::epsilon_closure;
    use nfa::Accept;
    use proptest::prelude::*;
    use regex::Regex;
    use testutils::{arb_pattern, nfa_accepts, nfa_for, try_nfa_for};

    fn accepts(pattern: &str, input: &str) -> bool {
        nfa_accepts(&nfa_for(&[(pattern, "A")]), input.as_bytes()).is_some()
    }

    fn parse_error(pattern: &str) -> ErrorKind {
        match try_nfa_for(&[(pattern, "A")], &Config::default()) {
            Ok(_) => panic!("pattern {:?} parsed without error", pattern),
            Err(err) => err.kind(),
        }
    }

    #[test]
    fn single_literal_accepts_only_itself() {
        assert!(accepts("a", "a"));
        assert!(!accepts("a", "b"));
        assert!(!accepts("a", ""));
    }

    #[test]
    fn alternation_accepts_either_branch() {
        assert!(accepts("a|b", "a"));
        assert!(accepts("a|b", "b"));
        assert!(!accepts("a|b", "c"));
    }

    #[test]
    fn closure_accepts_repetitions() {
        assert!(accepts("ab*", "a"));
        assert!(accepts("ab*", "ab"));
        assert!(accepts("ab*", "abb"));
        assert!(!accepts("ab*", "b"));
    }

    #[test]
    fn plus_requires_one_repetition() {
        assert!(accepts("[0-9]+", "42"));
        assert!(!accepts("[0-9]+", "4a"));
        assert!(!accepts("[0-9]+", ""));
    }

    #[test]
    fn optional_accepts_zero_or_one() {
        assert!(accepts("ab?c", "ac"));
        assert!(accepts("ab?c", "abc"));
        assert!(!accepts("ab?c", "abbc"));
    }

    #[test]
    fn any_excludes_line_terminators() {
        assert!(accepts(".", "x"));
        assert!(!accepts(".", "\n"));
        assert!(!accepts(".", "\r"));
    }

    #[test]
    fn negated_class_excludes_members_and_line_terminators() {
        assert!(accepts("[^a-c]", "d"));
        assert!(!accepts("[^a-c]", "b"));
        assert!(!accepts("[^a-c]", "\n"));
        assert!(accepts("[^a-c]", "^"));
    }

    #[test]
    fn empty_class_matches_space_and_below() {
        assert!(accepts("[]", " "));
        assert!(accepts("[]", "\t"));
        assert!(!accepts("[]", "a"));
    }

    #[test]
    fn negated_empty_class_matches_above_space() {
        assert!(accepts("[^]", "a"));
        assert!(!accepts("[^]", " "));
        assert!(!accepts("[^]", "\n"));
    }

    #[test]
    fn leading_and_trailing_dash_are_literal() {
        assert!(accepts("[-a]", "-"));
        assert!(accepts("[a-]", "-"));
        assert!(accepts("[a-]", "a"));
        assert!(!accepts("[a-]", "b"));
    }

    #[test]
    fn end_anchor_requires_line_terminator() {
        let nfa = nfa_for(&[("ab$", "A")]);

        assert_eq!(nfa_accepts(&nfa, b"ab"), None);
        assert_eq!(
            nfa_accepts(&nfa, b"ab\n"),
            Some(Accept::new("A", Anchor::End))
        );
    }

    #[test]
    fn start_anchor_requires_preceding_newline() {
        let nfa = nfa_for(&[("^ab", "A")]);

        assert_eq!(nfa_accepts(&nfa, b"ab"), None);
        assert_eq!(
            nfa_accepts(&nfa, b"\nab"),
            Some(Accept::new("A", Anchor::Start))
        );
    }

    #[test]
    fn rule_chain_links_rules_through_out_b() {
        let nfa = nfa_for(&[("a", "A"), ("b", "B"), ("c", "C")]);

        let first = nfa.node(nfa.start());
        let second = nfa.node(first.out_b().expect("missing second link"));
        let third = nfa.node(second.out_b().expect("missing third link"));

        assert!(first.out_a().is_some());
        assert!(third.out_a().is_some());
        assert_eq!(third.out_b(), None);
    }

    #[test]
    fn earlier_rule_nodes_have_smaller_ids() {
        let nfa = nfa_for(&[("(a|b)*", "A"), ("c+", "C")]);

        let first = nfa.node(nfa.start()).out_a().expect("missing first rule");
        let second_link = nfa.node(nfa.start()).out_b().expect("missing link");
        let second = nfa.node(second_link).out_a().expect("missing second rule");

        let first_rule = epsilon_closure(&nfa, Some(first));
        assert!(first_rule.nodes().iter().all(|id| *id < second_link));
        assert!(second > second_link);
    }

    #[test]
    fn action_is_trimmed() {
        let nfa = nfa_for(&[("a", "   return 1;  ")]);

        assert_eq!(
            nfa_accepts(&nfa, b"a"),
            Some(Accept::new("return 1;", Anchor::None))
        );
    }

    #[test]
    fn unmatched_paren_is_missing_close_paren() {
        assert_eq!(parse_error("(ab"), ErrorKind::MissingCloseParen);
    }

    #[test]
    fn leading_closure_is_dangling() {
        assert_eq!(parse_error("*a"), ErrorKind::DanglingClosureOperator);
        assert_eq!(parse_error("a|+b"), ErrorKind::DanglingClosureOperator);
        assert_eq!(parse_error("a**"), ErrorKind::DanglingClosureOperator);
    }

    #[test]
    fn stray_close_bracket_is_missing_open_bracket() {
        assert_eq!(parse_error("a]"), ErrorKind::MissingOpenBracket);
    }

    #[test]
    fn inner_caret_is_anchor_not_at_start() {
        assert_eq!(parse_error("a^b"), ErrorKind::AnchorNotAtStart);
    }

    #[test]
    fn empty_alternative_is_malformed() {
        assert_eq!(parse_error("a|"), ErrorKind::MalformedExpression);
        assert_eq!(parse_error("()"), ErrorKind::MalformedExpression);
    }

    #[test]
    fn text_after_end_anchor_is_malformed() {
        assert_eq!(parse_error("a$b"), ErrorKind::MalformedExpression);
        assert_eq!(parse_error("a)"), ErrorKind::MalformedExpression);
    }

    #[test]
    fn unterminated_class_is_malformed() {
        assert_eq!(parse_error("[abc"), ErrorKind::MalformedExpression);
    }

    #[test]
    fn node_bound_is_enforced() {
        let config = Config::new().nfa_max(4);

        let result = try_nfa_for(&[("abcdef", "A")], &config);

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::TooManyOrTooLongExpressions);
    }

    #[test]
    fn errors_carry_rule_line() {
        let result = try_nfa_for(&[("a", "A"), ("(b", "B")], &Config::default());

        assert_matches!(result, Err(ref e) if e.location().map(|l| l.line()) == Some(3));
    }

    proptest! {
        #[test]
        fn prop_nfa_agrees_with_regex(pattern in arb_pattern(), input in "[abc]{0,6}") {
            let oracle = Regex::new(&format!("^(?:{})$", pattern)).unwrap();
            let nfa = nfa_for(&[(pattern.as_str(), "A")]);

            prop_assert_eq!(
                nfa_accepts(&nfa, input.as_bytes()).is_some(),
                oracle.is_match(&input)
            );
        }
    }
}
