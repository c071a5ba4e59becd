// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Reading a specification and tokenizing its rule patterns.
//!
//! A specification has a definitions section, a rules section and an
//! optional trailer, separated by `%%` lines:
//!
//! ```text
//! %{
//! header code
//! %}
//! DIGIT    [0-9]
//! %%
//! {DIGIT}+    return NUMBER;
//! "if"        return IF;
//! %%
//! trailer code
//! ```
//!
//! `Specification::parse` splits the source into sections and each rule
//! into its pattern and action. `LexReader` then tokenizes the patterns one
//! after another, expanding macros and decoding quotes and escapes, for the
//! regex parser.

use error::{Error, ErrorKind, Result};
use macros::MacroTable;
use span::Location;
use token::{Token, TokenSource};

/// One rule of the rules section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    location: Location,
    pattern: String,
    action: String,
}

impl RuleLine {
    fn new(location: Location, text: &str) -> RuleLine {
        let (pattern, action) = split_rule(text);
        RuleLine {
            location,
            pattern: pattern.to_string(),
            action: action.to_string(),
        }
    }

    // Continuation text extends the pattern until the rule has an action,
    // and the action after that.
    fn continue_with(&mut self, text: &str) {
        if self.action.trim().is_empty() {
            let joined = format!("{}{}", self.pattern, text);
            let (pattern, action) = split_rule(&joined);
            self.pattern = pattern.to_string();
            self.action = action.to_string();
        } else {
            self.action.push('\n');
            self.action.push_str(text);
        }
    }

    /// The line that the rule starts on.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The regular expression of the rule.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The action text of the rule, untrimmed.
    pub fn action(&self) -> &str {
        &self.action
    }
}

// The pattern ends at the first whitespace that is neither quoted nor escaped.
fn split_rule(text: &str) -> (&str, &str) {
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in text.bytes().enumerate() {
        if escaped {
            escaped = false;
        } else if c == b'\\' {
            escaped = true;
        } else if c == b'"' {
            quoted = !quoted;
        } else if !quoted && (c == b' ' || c == b'\t') {
            return (&text[..i], &text[i..]);
        }
    }

    (text, "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Definitions,
    Rules,
    Trailer,
}

/// A specification split into its sections.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    header: String,
    macros: MacroTable,
    rules: Vec<RuleLine>,
    trailer: String,
}

impl Specification {
    /// Split `source` into its sections.
    ///
    /// In the definitions section `%{` and `%}` lines bracket code that is
    /// copied to the header verbatim, lines that start with whitespace are
    /// also header code, and any other non-blank line defines a macro. In
    /// the rules section a line that starts with whitespace continues the
    /// previous rule. Blank lines are ignored outside of code blocks.
    pub fn parse(source: &str) -> Result<Specification> {
        let mut spec = Specification::default();
        let mut section = Section::Definitions;
        let mut in_block = false;

        for (index, line) in source.lines().enumerate() {
            let location = Location::default() + index;
            match section {
                Section::Definitions if in_block => {
                    if line.starts_with("%}") {
                        in_block = false;
                    } else {
                        push_line(&mut spec.header, line);
                    }
                }
                Section::Definitions => {
                    if line.starts_with('%') {
                        match line.as_bytes().get(1) {
                            Some(&b'%') => section = Section::Rules,
                            Some(&b'{') => in_block = true,
                            Some(&b'}') => in_block = false,
                            _ => {
                                return Err(Error::at(ErrorKind::IllegalDirective, Some(location)))
                            }
                        }
                    } else if line.trim().is_empty() {
                        continue;
                    } else if starts_with_whitespace(line) {
                        push_line(&mut spec.header, line);
                    } else {
                        spec.macros
                            .define(line)
                            .map_err(|e| e.or_at(Some(location)))?;
                    }
                }
                Section::Rules => {
                    if line.starts_with("%%") {
                        section = Section::Trailer;
                    } else if line.trim().is_empty() {
                        continue;
                    } else if starts_with_whitespace(line) {
                        match spec.rules.last_mut() {
                            Some(rule) => rule.continue_with(line.trim()),
                            None => {
                                return Err(Error::at(
                                    ErrorKind::MalformedExpression,
                                    Some(location),
                                ))
                            }
                        }
                    } else {
                        spec.rules.push(RuleLine::new(location, line));
                    }
                }
                Section::Trailer => push_line(&mut spec.trailer, line),
            }
        }

        debug!(
            "read {} macros and {} rules",
            spec.macros.len(),
            spec.rules.len()
        );
        Ok(spec)
    }

    /// The header code from the definitions section.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The macros from the definitions section.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[RuleLine] {
        &self.rules
    }

    /// The code after the second `%%`.
    pub fn trailer(&self) -> &str {
        &self.trailer
    }

    /// Create a token source over the rule patterns.
    ///
    /// `macro_depth` bounds how deeply macro references may nest.
    pub fn reader(&self, macro_depth: usize) -> LexReader {
        LexReader::new(self, macro_depth)
    }
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

fn starts_with_whitespace(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

// Pattern text still to be tokenized, with the macro nesting it came from.
#[derive(Debug)]
struct Frame<'s> {
    text: &'s [u8],
    depth: usize,
}

/// The tokenizer for the rule patterns of a `Specification`.
///
/// Each pattern yields its tokens followed by `Eos`; after the last pattern
/// the reader yields `EndOfInput`.
pub struct LexReader<'s> {
    spec: &'s Specification,
    macro_depth: usize,
    next_rule: usize,
    rule: Option<&'s RuleLine>,
    frames: Vec<Frame<'s>>,
    quoted: bool,
    current: Token,
    lexeme: u8,
}

impl<'s> LexReader<'s> {
    fn new(spec: &'s Specification, macro_depth: usize) -> LexReader<'s> {
        LexReader {
            spec,
            macro_depth,
            next_rule: 0,
            rule: None,
            frames: Vec::new(),
            quoted: false,
            current: Token::Eos,
            lexeme: 0,
        }
    }

    // Move to the next rule, or report that there are none left.
    fn next_pattern(&mut self) -> bool {
        match self.spec.rules.get(self.next_rule) {
            Some(rule) => {
                trace!("tokenizing {:?} from {}", rule.pattern, rule.location);
                self.next_rule += 1;
                self.rule = Some(rule);
                self.quoted = false;
                self.frames.push(Frame {
                    text: rule.pattern.as_bytes(),
                    depth: 0,
                });
                true
            }
            None => false,
        }
    }

    // Drop exhausted frames and expand any macro references and quotes in
    // front of the next character. Returns false at the end of the pattern.
    fn fill(&mut self) -> Result<bool> {
        let spec: &'s Specification = self.spec;
        let macros = &spec.macros;

        loop {
            let (first, depth) = match self.frames.last() {
                None => return Ok(false),
                Some(frame) if frame.text.is_empty() => {
                    self.frames.pop();
                    continue;
                }
                Some(frame) => (frame.text[0], frame.depth),
            };

            if first == b'"' {
                self.quoted = !self.quoted;
                self.consume(1);
            } else if first == b'{' && !self.quoted {
                if depth >= self.macro_depth {
                    return Err(self.error(ErrorKind::MacroNestingTooDeep));
                }

                let (text, used) = {
                    let frame = self.frames.len() - 1;
                    macros
                        .expand(&self.frames[frame].text[1..])
                        .map_err(|e| e.or_at(self.location()))?
                };
                self.consume(used + 1);
                self.frames.push(Frame {
                    text: text.as_bytes(),
                    depth: depth + 1,
                });
            } else {
                return Ok(true);
            }
        }
    }

    fn consume(&mut self, count: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.text = &frame.text[count..];
        }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.location())
    }
}

impl<'s> TokenSource for LexReader<'s> {
    fn advance(&mut self) -> Result<Token> {
        if self.current == Token::Eos || self.current == Token::EndOfInput {
            if !self.next_pattern() {
                self.current = Token::EndOfInput;
                self.lexeme = 0;
                return Ok(self.current);
            }
        }

        if !self.fill()? {
            if self.quoted {
                return Err(self.error(ErrorKind::NewlineInQuotedString));
            }
            self.current = Token::Eos;
            self.lexeme = 0;
            return Ok(self.current);
        }

        let (token, lexeme, used) = {
            let text = match self.frames.last() {
                Some(frame) => frame.text,
                None => return Err(self.error(ErrorKind::MalformedExpression)),
            };

            if self.quoted {
                if text.starts_with(b"\\\"") {
                    (Token::Literal, b'"', 2)
                } else {
                    (Token::Literal, text[0], 1)
                }
            } else if text[0] == b'\\' {
                let (code, used) = unescape(text);
                (Token::Literal, code, used)
            } else {
                (Token::classify(text[0]), text[0], 1)
            }
        };

        self.consume(used);
        self.current = token;
        self.lexeme = lexeme;
        Ok(token)
    }

    fn current(&self) -> Token {
        self.current
    }

    fn lexeme(&self) -> u8 {
        self.lexeme
    }

    fn action(&self) -> &str {
        self.rule.map_or("", |rule| rule.action())
    }

    fn location(&self) -> Option<Location> {
        self.rule.map(|rule| rule.location())
    }
}

/// Decode the escape sequence at the start of `text`.
///
/// `text` starts with the backslash. Returns the character code and the
/// number of bytes that the sequence takes up. The recognized sequences are
/// `\b \f \n \r \s \t \e`, `\^C` for a control character, `\xH` or `\xHH`
/// in hex, and one to three octal digits; any other escaped character
/// stands for itself.
pub fn unescape(text: &[u8]) -> (u8, usize) {
    let next = match text.get(1) {
        Some(c) => *c,
        None => return (b'\\', 1),
    };

    match next.to_ascii_uppercase() {
        b'B' => (0x08, 2),
        b'F' => (0x0c, 2),
        b'N' => (b'\n', 2),
        b'R' => (b'\r', 2),
        b'S' => (b' ', 2),
        b'T' => (b'\t', 2),
        b'E' => (0x1b, 2),
        b'^' => match text.get(2) {
            Some(c) => (c.to_ascii_uppercase().wrapping_sub(b'@'), 3),
            None => (b'^', 2),
        },
        b'X' => match digits(&text[2..], 2, 16) {
            (_, 0) => (next, 2),
            (code, count) => (code, 2 + count),
        },
        b'0'..=b'7' => {
            let (code, count) = digits(&text[1..], 3, 8);
            (code, 1 + count)
        }
        _ => (next, 2),
    }
}

// Read up to `max` digits in `radix`, returning the value and digit count.
fn digits(text: &[u8], max: usize, radix: u32) -> (u8, usize) {
    let mut value: u32 = 0;
    let mut count = 0;

    for digit in text
        .iter()
        .take(max)
        .map(|c| (*c as char).to_digit(radix))
        .take_while(|d| d.is_some())
    {
        value = value * radix + digit.unwrap_or(0);
        count += 1;
    }

    (value as u8, count)
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(source: &str) -> Result<Vec<(Token, u8)>> {
        let spec = Specification::parse(source)?;
        let mut reader = spec.reader(8);
        let mut result = Vec::new();

        loop {
            let token = reader.advance()?;
            if token == Token::EndOfInput {
                return Ok(result);
            }
            result.push((token, reader.lexeme()));
        }
    }

    fn pattern_tokens(pattern: &str) -> Result<Vec<(Token, u8)>> {
        tokens(&format!("%%\n{} A\n", pattern))
    }

    #[test]
    fn sections_are_split() {
        let source = "%{\n#include <x>\n\n%}\n  int y;\nD [0-9]\n%%\n{D}+ return 1;\n%%\ntail\n";

        let sut = Specification::parse(source).unwrap();

        assert_eq!(sut.header(), "#include <x>\n\n  int y;\n");
        assert_eq!(sut.macros().get("D"), Some("[0-9]"));
        assert_eq!(sut.rules().len(), 1);
        assert_eq!(sut.rules()[0].pattern(), "{D}+");
        assert_eq!(sut.rules()[0].action().trim(), "return 1;");
        assert_eq!(sut.rules()[0].location(), Location::new(8));
        assert_eq!(sut.trailer(), "tail\n");
    }

    #[test]
    fn unknown_directive_is_illegal() {
        let result = Specification::parse("%x\n%%\na A\n");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::IllegalDirective
            && e.location() == Some(Location::new(1)));
    }

    #[test]
    fn bad_macro_line_has_location() {
        let result = Specification::parse("\nD [0-9] more\n%%\na A\n");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::BadMacroDefinition
            && e.location() == Some(Location::new(2)));
    }

    #[test]
    fn quoted_and_escaped_whitespace_stay_in_pattern() {
        let sut = Specification::parse("%%\n\"a b\"\\ c\tACTION\n").unwrap();

        assert_eq!(sut.rules()[0].pattern(), "\"a b\"\\ c");
        assert_eq!(sut.rules()[0].action(), "\tACTION");
    }

    #[test]
    fn continuation_extends_action() {
        let sut = Specification::parse("%%\na { x = 1;\n    y = 2; }\nb B\n").unwrap();

        assert_eq!(sut.rules().len(), 2);
        assert_eq!(sut.rules()[0].action(), " { x = 1;\ny = 2; }");
    }

    #[test]
    fn continuation_extends_open_pattern() {
        let sut = Specification::parse("%%\n(a|b\n   |c) ACTION\n").unwrap();

        assert_eq!(sut.rules()[0].pattern(), "(a|b|c)");
        assert_eq!(sut.rules()[0].action().trim(), "ACTION");
    }

    #[test]
    fn continuation_without_rule_is_malformed() {
        let result = Specification::parse("%%\n   a A\n");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::MalformedExpression);
    }

    #[test]
    fn operators_are_classified() {
        let result = pattern_tokens("a*").unwrap();

        assert_eq!(
            result,
            vec![(Token::Literal, b'a'), (Token::Closure, b'*'), (Token::Eos, 0)]
        );
    }

    #[test]
    fn quoted_operators_are_literal() {
        let result = pattern_tokens("\"*|\\\"\"").unwrap();

        assert_eq!(
            result,
            vec![
                (Token::Literal, b'*'),
                (Token::Literal, b'|'),
                (Token::Literal, b'"'),
                (Token::Eos, 0),
            ]
        );
    }

    #[test]
    fn escapes_are_decoded_as_literals() {
        let result = pattern_tokens("\\n\\*\\x41\\101\\^A").unwrap();

        assert_eq!(
            result,
            vec![
                (Token::Literal, b'\n'),
                (Token::Literal, b'*'),
                (Token::Literal, b'A'),
                (Token::Literal, b'A'),
                (Token::Literal, 1),
                (Token::Eos, 0),
            ]
        );
    }

    #[test]
    fn macros_expand_recursively() {
        let result = tokens("L [a]\nW {L}+\n%%\n{W}x A\n").unwrap();

        assert_eq!(
            result,
            vec![
                (Token::CclStart, b'['),
                (Token::Literal, b'a'),
                (Token::CclEnd, b']'),
                (Token::Plus, b'+'),
                (Token::Literal, b'x'),
                (Token::Eos, 0),
            ]
        );
    }

    #[test]
    fn quoted_brace_is_not_a_macro() {
        let result = pattern_tokens("\"{\"").unwrap();

        assert_eq!(result, vec![(Token::Literal, b'{'), (Token::Eos, 0)]);
    }

    #[test]
    fn unterminated_macro_reference_is_reported() {
        let result = tokens("D [0-9]\n%%\n{D+ A\n");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::MacroBraceUnterminated
            && e.location() == Some(Location::new(3)));
    }

    #[test]
    fn undefined_macro_is_reported() {
        let result = pattern_tokens("{NOPE}");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::UndefinedMacro);
    }

    #[test]
    fn self_referencing_macro_is_too_deep() {
        let result = tokens("R a{R}\n%%\n{R} A\n");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::MacroNestingTooDeep);
    }

    #[test]
    fn unclosed_quote_is_reported() {
        let result = pattern_tokens("\"abc");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::NewlineInQuotedString);
    }

    #[test]
    fn reader_reports_action_and_location_of_rule() {
        let spec = Specification::parse("%%\na  ONE\nb  TWO\n").unwrap();
        let mut sut = spec.reader(8);

        sut.advance().unwrap();
        assert_eq!(sut.action().trim(), "ONE");
        assert_eq!(sut.location(), Some(Location::new(2)));

        sut.advance().unwrap();
        sut.advance().unwrap();
        assert_eq!(sut.action().trim(), "TWO");
        assert_eq!(sut.location(), Some(Location::new(3)));
    }

    #[test]
    fn end_of_input_repeats() {
        let spec = Specification::parse("%%\n").unwrap();
        let mut sut = spec.reader(8);

        assert_eq!(sut.advance().unwrap(), Token::EndOfInput);
        assert_eq!(sut.advance().unwrap(), Token::EndOfInput);
        assert!(sut.matches(Token::EndOfInput));
    }

    #[test]
    fn unescape_handles_short_forms() {
        assert_eq!(unescape(b"\\"), (b'\\', 1));
        assert_eq!(unescape(b"\\s"), (b' ', 2));
        assert_eq!(unescape(b"\\E"), (0x1b, 2));
        assert_eq!(unescape(b"\\xg"), (b'x', 2));
        assert_eq!(unescape(b"\\x7"), (7, 3));
        assert_eq!(unescape(b"\\0"), (0, 2));
        assert_eq!(unescape(b"\\q"), (b'q', 2));
    }
}
