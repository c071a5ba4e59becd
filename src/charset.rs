// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Character sets over the 8-bit alphabet.

use std::fmt::{self, Display};
use std::iter::FromIterator;

/// The largest code that a negated class can contain.
pub const ASCII_MAX: u8 = 127;

const WORDS: usize = 4;
const WORD_BITS: usize = 64;

/// A (possibly empty) set of character codes in `0..=255`.
///
/// `CharSet` labels the character-class edges of the NFA.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CharSet {
    bits: [u64; WORDS],
}

/// An iterator over the codes in a `CharSet` in increasing order.
///
/// This is the return type of the `CharSet::iter()` method.
pub struct Codes<'a> {
    set: &'a CharSet,
    next: usize,
}

/// An iterator over the closed ranges of codes in a `CharSet`.
///
/// This is the return type of the `CharSet::ranges()` method. Adjacent codes
/// are combined into a single range and the ranges are in increasing order.
pub struct Ranges<'a> {
    codes: ::std::iter::Peekable<Codes<'a>>,
}

impl CharSet {
    /// Create an empty `CharSet`.
    pub fn new() -> CharSet {
        Default::default()
    }

    /// Create a `CharSet` containing the codes `start..=end`.
    pub fn from_range(start: u8, end: u8) -> CharSet {
        let mut set = CharSet::new();
        set.insert_range(start, end);
        set
    }

    /// Add `code` to the set.
    pub fn insert(&mut self, code: u8) {
        let (word, bit) = position(code);
        self.bits[word] |= bit;
    }

    /// Add every code in `start..=end` to the set.
    ///
    /// Nothing is added if `start` is greater than `end`.
    pub fn insert_range(&mut self, start: u8, end: u8) {
        for code in start..=end {
            self.insert(code);
        }
    }

    /// Remove `code` from the set.
    pub fn remove(&mut self, code: u8) {
        let (word, bit) = position(code);
        self.bits[word] &= !bit;
    }

    /// Check if the set contains the character `code`.
    pub fn contains(&self, code: u8) -> bool {
        let (word, bit) = position(code);
        self.bits[word] & bit != 0
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// The number of codes in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Invert membership over `0..=ASCII_MAX`.
    ///
    /// Codes above `ASCII_MAX` are never members of the result.
    pub fn negate_ascii(&self) -> CharSet {
        (0..=ASCII_MAX).filter(|c| !self.contains(*c)).collect()
    }

    /// Iterate over the codes in the set.
    pub fn iter(&self) -> Codes {
        Codes { set: self, next: 0 }
    }

    /// Iterate over the closed ranges that make up the set.
    pub fn ranges(&self) -> Ranges {
        Ranges {
            codes: self.iter().peekable(),
        }
    }
}

fn position(code: u8) -> (usize, u64) {
    let code = code as usize;
    (code / WORD_BITS, 1u64 << (code % WORD_BITS))
}

impl FromIterator<u8> for CharSet {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = u8>,
    {
        let mut set = CharSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CharSet {
    type Item = u8;
    type IntoIter = Codes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Iterator for Codes<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next <= u8::max_value() as usize {
            let code = self.next as u8;
            self.next += 1;
            if self.set.contains(code) {
                return Some(code);
            }
        }
        None
    }
}

impl<'a> Iterator for Ranges<'a> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.codes.next()?;
        let mut end = start;
        while let Some(&next) = self.codes.peek() {
            if next as usize != end as usize + 1 {
                break;
            }
            end = next;
            self.codes.next();
        }
        Some((start, end))
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CharSet{}", self)
    }
}

impl Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (start, end) in self.ranges() {
            write_code(f, start)?;
            if end > start {
                write!(f, "-")?;
                write_code(f, end)?;
            }
        }
        write!(f, "]")
    }
}

// Control codes print as ^X, everything else as itself or as a hex escape.
fn write_code(f: &mut fmt::Formatter, code: u8) -> fmt::Result {
    match code {
        0..=0x1f => write!(f, "^{}", (code + b'@') as char),
        0x20..=0x7e => write!(f, "{}", code as char),
        _ => write!(f, "\\x{:02x}", code),
    }
}
