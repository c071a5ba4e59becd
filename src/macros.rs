// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::collections::HashMap;

use error::{Error, ErrorKind, Result};

/// The named macros of a specification.
///
/// A macro is defined by a `NAME TEXT` line in the definitions section and
/// referenced as `{NAME}` in a rule pattern. A later definition of the same
/// name replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<String, String>,
}

impl MacroTable {
    /// Create an empty `MacroTable`.
    pub fn new() -> MacroTable {
        Default::default()
    }

    /// Define a macro from a `NAME TEXT` definition line.
    ///
    /// The line must have exactly two whitespace separated fields.
    pub fn define(&mut self, line: &str) -> Result<()> {
        let fields: Vec<_> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(Error::new(ErrorKind::BadMacroDefinition));
        }

        debug!("macro {} = {}", fields[0], fields[1]);
        self.macros
            .insert(fields[0].to_string(), fields[1].to_string());
        Ok(())
    }

    /// Gets the text of the macro `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(|text| text.as_str())
    }

    /// The number of defined macros.
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Check if no macros are defined.
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Expand the macro reference at the start of `reference`.
    ///
    /// `reference` begins just after the opening `{`. On success this returns
    /// the text of the macro and the number of bytes of `reference` that the
    /// name and its closing `}` take up.
    pub fn expand(&self, reference: &[u8]) -> Result<(&str, usize)> {
        let close = reference
            .iter()
            .position(|c| *c == b'}')
            .ok_or_else(|| Error::new(ErrorKind::MacroBraceUnterminated))?;

        let name = String::from_utf8_lossy(&reference[..close]);
        self.get(&name)
            .map(|text| (text, close + 1))
            .ok_or_else(|| Error::new(ErrorKind::UndefinedMacro))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defined_macro_is_found() {
        let mut sut = MacroTable::new();

        sut.define("D   [0-9]").unwrap();

        assert_eq!(sut.get("D"), Some("[0-9]"));
        assert_eq!(sut.len(), 1);
    }

    #[test]
    fn redefinition_replaces_text() {
        let mut sut = MacroTable::new();

        sut.define("D [0-9]").unwrap();
        sut.define("D [a-z]").unwrap();

        assert_eq!(sut.get("D"), Some("[a-z]"));
    }

    #[test]
    fn definition_needs_two_fields() {
        let mut sut = MacroTable::new();

        let one = sut.define("D");
        let three = sut.define("D [0-9] extra");

        assert_matches!(one, Err(ref e) if e.kind() == ErrorKind::BadMacroDefinition);
        assert_matches!(three, Err(ref e) if e.kind() == ErrorKind::BadMacroDefinition);
        assert!(sut.is_empty());
    }

    #[test]
    fn expand_reports_consumed_bytes() {
        let mut sut = MacroTable::new();
        sut.define("DIGIT [0-9]").unwrap();

        let result = sut.expand(b"DIGIT}+").unwrap();

        assert_eq!(result, ("[0-9]", 6));
    }

    #[test]
    fn expand_without_close_brace_is_unterminated() {
        let mut sut = MacroTable::new();
        sut.define("D [0-9]").unwrap();

        let result = sut.expand(b"D+");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::MacroBraceUnterminated);
    }

    #[test]
    fn expand_unknown_name_is_undefined() {
        let sut = MacroTable::new();

        let result = sut.expand(b"NOPE}");

        assert_matches!(result, Err(ref e) if e.kind() == ErrorKind::UndefinedMacro);
    }
}
