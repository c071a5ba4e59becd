// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::fmt;
use std::ops;

/// A line within a specification source.
///
/// Lines are counted from 1. A `Location` is attached to an `Error` whenever
/// the failing rule or definition can be traced back to its source line.
///
/// # Panics
///
/// Adding a usize to a `Location` will panic if the resulting line number is
/// greater than `usize::max_value()`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Location(usize);

impl Location {
    /// Create a new `Location` for a given line number.
    pub fn new(line: usize) -> Location {
        Location(line)
    }

    /// Gets the (1-based) line number of the `Location`.
    pub fn line(&self) -> usize {
        self.0
    }
}

impl Default for Location {
    fn default() -> Self {
        Location(1)
    }
}

impl ops::AddAssign<usize> for Location {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}

impl ops::Add<usize> for Location {
    type Output = Location;

    fn add(mut self, rhs: usize) -> Location {
        self += rhs;
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}
