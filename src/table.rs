// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Dense state-by-code transition tables.

use std::fmt;

/// A dense `state × character code → state` transition matrix.
///
/// Absent transitions are `None`. The table grows one row at a time; the
/// width (the alphabet size) is fixed when the table is created.
#[derive(Clone, PartialEq, Eq)]
pub struct TransitionTable {
    width: usize,
    cells: Vec<Option<usize>>,
}

impl TransitionTable {
    /// Create an empty table with rows `width` codes wide.
    pub fn new(width: usize) -> TransitionTable {
        TransitionTable {
            width,
            cells: Vec::new(),
        }
    }

    /// The number of codes in each row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.cells.len() / self.width
        }
    }

    /// Append a row with no transitions and return its index.
    pub fn add_row(&mut self) -> usize {
        let row = self.rows();
        let len = self.cells.len() + self.width;
        self.cells.resize(len, None);
        row
    }

    /// Set the transition out of `row` on `code`.
    ///
    /// # Panics
    /// `set` will panic if `row` or `code` is outside the table.
    pub fn set(&mut self, row: usize, code: usize, target: Option<usize>) {
        let index = self.index(row, code);
        self.cells[index] = target;
    }

    /// Get the transition out of `row` on `code`.
    ///
    /// Codes beyond the width of the table have no transition.
    pub fn get(&self, row: usize, code: usize) -> Option<usize> {
        if code >= self.width {
            None
        } else {
            self.cells[self.index(row, code)]
        }
    }

    /// The cells of `row`, indexed by code.
    pub fn row(&self, row: usize) -> &[Option<usize>] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate over the present transitions of `row` as `(code, target)`.
    pub fn transitions<'a>(&'a self, row: usize) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.row(row)
            .iter()
            .enumerate()
            .filter_map(|(code, target)| target.map(|t| (code, t)))
    }

    fn index(&self, row: usize, code: usize) -> usize {
        assert!(code < self.width, "code {} outside table width {}", code, self.width);
        row * self.width + code
    }
}

impl fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        for row in 0..self.rows() {
            let cells: Vec<_> = self.transitions(row).collect();
            map.entry(&row, &cells);
        }
        map.finish()
    }
}
