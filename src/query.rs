//! Boolean query expressions over a line index.
//!
//! # Module Structure
//!
//! - `expr`: the expression variants and the shared [`Query`] handle
//! - `eval`: evaluation rules producing a [`QueryResult`]
//! - `parser`: the textual query syntax

pub mod eval;
pub mod expr;
pub mod parser;

pub use eval::{Evaluator, EvaluatorConfig};
pub use expr::{Query, QueryNode};
pub use parser::QueryParser;

use crate::index::InvertedIndex;
use crate::result::QueryResult;

/// Build a query matching the lines that contain `term`.
pub fn word_query(term: impl Into<String>) -> Query {
    Query::word(term)
}

/// Build a query matching the lines `query` does not match.
pub fn negate(query: &Query) -> Query {
    query.negate()
}

/// Build a query matching the lines both `left` and `right` match.
pub fn conjoin(left: &Query, right: &Query) -> Query {
    left.and(right)
}

/// Build a query matching the lines either `left` or `right` matches.
pub fn disjoin(left: &Query, right: &Query) -> Query {
    left.or(right)
}

/// The textual form of `query`.
pub fn representation(query: &Query) -> String {
    query.representation()
}

/// Evaluate `query` against `index` (and the lines it was built from).
pub fn evaluate(query: &Query, index: &InvertedIndex) -> QueryResult {
    Evaluator::new().evaluate(query, index)
}
