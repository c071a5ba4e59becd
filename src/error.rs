// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::fmt::{self, Display};
use std::result;

use failure::Fail;
use span::Location;

/// The kinds of errors that abort a compilation.
///
/// Every kind is fatal: there is no partial automaton when any of them
/// occurs.
#[derive(Debug, Fail, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The regular expression does not conform to the grammar.
    #[fail(display = "Malformed regular expression")]
    MalformedExpression,

    /// A `(` without a matching `)`.
    #[fail(display = "Missing close parenthesis")]
    MissingCloseParen,

    /// An internal table-size bound was exceeded.
    #[fail(display = "Too many regular expressions or expression too long")]
    TooManyOrTooLongExpressions,

    /// Character class content (a stray `]`) without a leading `[`.
    #[fail(display = "Missing [ in character class")]
    MissingOpenBracket,

    /// A `^` that does not start the expression.
    #[fail(display = "^ must be at start of expression")]
    AnchorNotAtStart,

    /// A `*`, `+` or `?` with no preceding operand.
    #[fail(display = "+ ? or * must follow an expression or subexpression")]
    DanglingClosureOperator,

    /// A pattern ended while a quoted string was still open.
    #[fail(display = "Newline in quoted string, use \\n instead")]
    NewlineInQuotedString,

    /// A `{name` macro reference without the closing `}`.
    #[fail(display = "Missing }} in macro expansion")]
    MacroBraceUnterminated,

    /// A reference to a macro that was never defined.
    #[fail(display = "Macro doesn't exist")]
    UndefinedMacro,

    /// Macro expansion recursed beyond the configured depth.
    #[fail(display = "Macro expansions nested too deeply")]
    MacroNestingTooDeep,

    /// Subset construction produced more states than the configured bound.
    #[fail(display = "Too many DFA states")]
    TooManyDfaStates,

    /// An unknown `%` directive in the definitions section.
    #[fail(display = "Illegal directive")]
    IllegalDirective,

    /// A definitions line that is not of the form `NAME TEXT`.
    #[fail(display = "Bad macro definition")]
    BadMacroDefinition,
}

/// The error type for compiling a specification into an automaton.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    location: Option<Location>,
}

impl Error {
    /// Create an `Error` of the given kind with no source location.
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            kind,
            location: None,
        }
    }

    /// Create an `Error` of the given kind at the given source location.
    pub fn at(kind: ErrorKind, location: Option<Location>) -> Error {
        Error { kind, location }
    }

    /// Gets the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Gets the source location of the error, if it is known.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Attach `location` unless the error already has one.
    pub(crate) fn or_at(mut self, location: Option<Location>) -> Error {
        if self.location.is_none() {
            self.location = location;
        }
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{}: {}", location, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&Fail> {
        Some(&self.kind)
    }
}

/// A specialized Result type for compiling automata.
pub type Result<T> = result::Result<T, Error>;
