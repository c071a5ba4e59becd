// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The token stream that the regex parser consumes.

use std::fmt::{self, Display};

use error::Result;
use span::Location;

/// The classified tokens of a rule pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// The end of the current rule's pattern.
    Eos,
    /// `.`
    Any,
    /// `^`
    AtBol,
    /// `$`
    AtEol,
    /// `[`
    CclStart,
    /// `]`
    CclEnd,
    /// `)`
    CloseParen,
    /// `*`
    Closure,
    /// `-`
    Dash,
    /// The end of the rules section.
    EndOfInput,
    /// Any character that is not an operator, including quoted and escaped
    /// characters.
    Literal,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `(`
    OpenParen,
    /// `?`
    Optional,
    /// `|`
    Or,
    /// `+`
    Plus,
}

impl Token {
    /// Classify an unquoted, unescaped pattern character.
    pub fn classify(code: u8) -> Token {
        match code {
            b'.' => Token::Any,
            b'^' => Token::AtBol,
            b'$' => Token::AtEol,
            b'[' => Token::CclStart,
            b']' => Token::CclEnd,
            b')' => Token::CloseParen,
            b'*' => Token::Closure,
            b'-' => Token::Dash,
            b'{' => Token::OpenCurly,
            b'}' => Token::CloseCurly,
            b'(' => Token::OpenParen,
            b'?' => Token::Optional,
            b'|' => Token::Or,
            b'+' => Token::Plus,
            _ => Token::Literal,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Token::Eos => "end of pattern",
            Token::Any => "'.'",
            Token::AtBol => "'^'",
            Token::AtEol => "'$'",
            Token::CclStart => "'['",
            Token::CclEnd => "']'",
            Token::CloseParen => "')'",
            Token::Closure => "'*'",
            Token::Dash => "'-'",
            Token::EndOfInput => "end of input",
            Token::Literal => "literal",
            Token::OpenCurly => "'{'",
            Token::CloseCurly => "'}'",
            Token::OpenParen => "'('",
            Token::Optional => "'?'",
            Token::Or => "'|'",
            Token::Plus => "'+'",
        };
        write!(f, "{}", name)
    }
}

/// A pull-based source of classified pattern tokens.
///
/// Implementations have already applied macro expansion, quoting and escape
/// decoding, so `lexeme()` is always the resolved character code of the
/// current token. After `Eos` the source reports the action text of the rule
/// that just ended; after the last rule it reports `EndOfInput` for as long
/// as it is advanced.
pub trait TokenSource {
    /// Move to the next token and return it.
    fn advance(&mut self) -> Result<Token>;

    /// The most recently advanced token.
    fn current(&self) -> Token;

    /// The character code of the most recently advanced token.
    fn lexeme(&self) -> u8;

    /// The action text of the rule whose pattern is being read.
    fn action(&self) -> &str;

    /// The source line of the rule whose pattern is being read, if known.
    fn location(&self) -> Option<Location>;

    /// Check the most recently advanced token against `token`.
    fn matches(&self, token: Token) -> bool {
        self.current() == token
    }
}

impl<'a, T: TokenSource + ?Sized> TokenSource for &'a mut T {
    fn advance(&mut self) -> Result<Token> {
        (**self).advance()
    }

    fn current(&self) -> Token {
        (**self).current()
    }

    fn lexeme(&self) -> u8 {
        (**self).lexeme()
    }

    fn action(&self) -> &str {
        (**self).action()
    }

    fn location(&self) -> Option<Location> {
        (**self).location()
    }
}
