//! Query results and their printed form.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::index::PostingList;
use crate::store::{LineNo, LineStore};

/// The outcome of evaluating one query against one index.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Representation of the expression that produced this result.
    sought: String,
    /// Matching positions, ascending.
    lines: Arc<PostingList>,
    /// The lines the positions refer to.
    store: LineStore,
}

/// One matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineMatch<'a> {
    /// 0-based position.
    #[serde(skip)]
    pub line_no: LineNo,
    /// 1-based line number, as displayed.
    pub line: usize,
    /// Text of the line.
    pub text: &'a str,
}

impl QueryResult {
    /// Create a result for the query rendered as `sought`, matching `lines`
    /// of `store`.
    ///
    /// `lines` must be sorted, duplicate-free positions within `store`.
    pub fn new(sought: impl Into<String>, lines: Arc<PostingList>, store: LineStore) -> Self {
        QueryResult {
            sought: sought.into(),
            lines,
            store,
        }
    }

    /// Representation of the query that produced this result.
    pub fn sought(&self) -> &str {
        &self.sought
    }

    /// Matching positions.
    pub fn lines(&self) -> &PostingList {
        &self.lines
    }

    /// Number of matching lines.
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line store the positions refer to.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Iterate the matching lines in ascending order.
    pub fn matches(&self) -> impl Iterator<Item = LineMatch<'_>> {
        self.lines.iter().map(|line_no| LineMatch {
            line_no,
            line: line_no + 1,
            text: self.store.get(line_no).unwrap_or_default(),
        })
    }

    /// Printed form: a count header, then one tab-indented entry per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} occurs {} times", self.sought, self.count())?;
        for m in self.matches() {
            writeln!(f, "\t(line {}) {}", m.line, m.text)?;
        }
        Ok(())
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryResult", 3)?;
        state.serialize_field("sought", &self.sought)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("matches", &self.matches().collect::<Vec<_>>())?;
        state.end()
    }
}

/// Printed form of `result`.
pub fn render(result: &QueryResult) -> String {
    result.render()
}
