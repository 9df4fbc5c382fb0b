//! Sorted, duplicate-free line position sets and their merge operations.

use serde::Serialize;

use crate::store::LineNo;

/// An ascending set of line positions.
///
/// Every set operation is a linear merge over the sorted sequences; none of
/// them looks up individual positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostingList {
    lines: Vec<LineNo>,
}

impl PostingList {
    /// Create an empty posting list.
    pub fn new() -> Self {
        PostingList { lines: Vec::new() }
    }

    /// Record `line_no`, which must not be smaller than the last recorded
    /// position. Recording the last position again is a no-op, so a word
    /// repeated on one line is stored once.
    pub(crate) fn push(&mut self, line_no: LineNo) {
        match self.lines.last() {
            Some(&last) if last == line_no => {}
            Some(&last) => {
                debug_assert!(last < line_no, "positions must be pushed in order");
                self.lines.push(line_no);
            }
            None => self.lines.push(line_no),
        }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check whether `line_no` is in the set.
    pub fn contains(&self, line_no: LineNo) -> bool {
        self.lines.binary_search(&line_no).is_ok()
    }

    /// The positions in ascending order.
    pub fn as_slice(&self) -> &[LineNo] {
        &self.lines
    }

    /// Iterate positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = LineNo> + '_ {
        self.lines.iter().copied()
    }

    /// Positions present in both sets.
    pub fn intersect(&self, other: &PostingList) -> PostingList {
        let (a, b) = (&self.lines, &other.lines);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] == b[j] {
                out.push(a[i]);
                i += 1;
                j += 1;
            } else if a[i] < b[j] {
                i += 1;
            } else {
                j += 1;
            }
        }
        PostingList { lines: out }
    }

    /// Positions present in either set.
    pub fn union(&self, other: &PostingList) -> PostingList {
        let (a, b) = (&self.lines, &other.lines);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] == b[j] {
                out.push(a[i]);
                i += 1;
                j += 1;
            } else if a[i] < b[j] {
                out.push(a[i]);
                i += 1;
            } else {
                out.push(b[j]);
                j += 1;
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        PostingList { lines: out }
    }

    /// Positions of `[0, universe)` absent from this set.
    pub fn complement(&self, universe: usize) -> PostingList {
        let mut out = Vec::with_capacity(universe.saturating_sub(self.lines.len()));
        let mut present = self.lines.iter().copied().peekable();
        for line_no in 0..universe {
            while present.next_if(|&p| p < line_no).is_some() {}
            if present.next_if_eq(&line_no).is_none() {
                out.push(line_no);
            }
        }
        PostingList { lines: out }
    }
}

impl FromIterator<LineNo> for PostingList {
    fn from_iter<I: IntoIterator<Item = LineNo>>(iter: I) -> Self {
        let mut lines: Vec<LineNo> = iter.into_iter().collect();
        lines.sort_unstable();
        lines.dedup();
        PostingList { lines }
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a LineNo;
    type IntoIter = std::slice::Iter<'a, LineNo>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
