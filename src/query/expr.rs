//! Query expressions and the handle used to compose them.
//!
//! A [`Query`] is a reference-counted pointer to an immutable [`QueryNode`].
//! Composing queries wraps the existing handles instead of copying the
//! sub-expressions, so one sub-expression can appear in several composite
//! expressions (the expressions form a DAG, not necessarily a tree).
//!
//! Rendering, sizing and dropping walk the expression with an explicit work
//! stack, so nesting depth is bounded by memory, not by the thread stack.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::{Arc, LazyLock};

use crate::index::InvertedIndex;
use crate::query::eval::Evaluator;
use crate::result::QueryResult;

/// The closed set of expression variants.
#[derive(Debug)]
pub enum QueryNode {
    /// Lines containing the term.
    Word(String),
    /// Lines not matched by the inner expression.
    Not(Query),
    /// Lines matched by both sides.
    And(Query, Query),
    /// Lines matched by either side.
    Or(Query, Query),
}

/// A cheap, clonable handle to an immutable query expression.
#[derive(Debug, Clone)]
pub struct Query {
    node: Arc<QueryNode>,
}

impl Query {
    fn from_node(node: QueryNode) -> Self {
        Query {
            node: Arc::new(node),
        }
    }

    /// Create a single-word query.
    pub fn word(term: impl Into<String>) -> Self {
        Query::from_node(QueryNode::Word(term.into()))
    }

    /// Create the negation of `self`.
    pub fn negate(&self) -> Self {
        Query::from_node(QueryNode::Not(self.clone()))
    }

    /// Create the conjunction of `self` and `other`.
    pub fn and(&self, other: &Query) -> Self {
        Query::from_node(QueryNode::And(self.clone(), other.clone()))
    }

    /// Create the disjunction of `self` and `other`.
    pub fn or(&self, other: &Query) -> Self {
        Query::from_node(QueryNode::Or(self.clone(), other.clone()))
    }

    /// The expression node behind this handle.
    pub fn node(&self) -> &QueryNode {
        &self.node
    }

    /// Check whether both handles point at the same expression node.
    pub fn ptr_eq(&self, other: &Query) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Identity of the node, stable while any handle to it is alive.
    pub(crate) fn node_id(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }

    /// The textual form of the expression, e.g. `((fox & dog) | ~(cat))`.
    ///
    /// Derived from the structure alone; no index is involved.
    pub fn representation(&self) -> String {
        self.to_string()
    }

    /// Evaluate against `index` with the default evaluator.
    pub fn eval(&self, index: &InvertedIndex) -> QueryResult {
        Evaluator::new().evaluate(self, index)
    }

    /// Number of node occurrences when the expression is unfolded as a tree.
    pub fn tree_size(&self) -> usize {
        let mut size = 0;
        let mut pending = vec![self];
        while let Some(query) = pending.pop() {
            size += 1;
            match query.node() {
                QueryNode::Word(_) => {}
                QueryNode::Not(inner) => pending.push(inner),
                QueryNode::And(left, right) | QueryNode::Or(left, right) => {
                    pending.push(right);
                    pending.push(left);
                }
            }
        }
        size
    }
}

/// Pending output while rendering a query.
enum Piece<'a> {
    Node(&'a Query),
    Text(&'static str),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let query = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(query) => query,
            };
            match query.node() {
                QueryNode::Word(term) => f.write_str(term)?,
                QueryNode::Not(inner) => {
                    f.write_str("~(")?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(inner));
                }
                QueryNode::And(left, right) | QueryNode::Or(left, right) => {
                    let op = if matches!(query.node(), QueryNode::And(..)) {
                        " & "
                    } else {
                        " | "
                    };
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(right));
                    pending.push(Piece::Text(op));
                    pending.push(Piece::Node(left));
                }
            }
        }
        Ok(())
    }
}

/// Stand-in left behind when a node's children are detached on drop.
static DETACHED: LazyLock<Query> = LazyLock::new(|| Query::word(String::new()));

impl QueryNode {
    fn detach_children(&mut self, out: &mut Vec<Query>) {
        match self {
            QueryNode::Word(_) => {}
            QueryNode::Not(inner) => out.push(std::mem::replace(inner, DETACHED.clone())),
            QueryNode::And(left, right) | QueryNode::Or(left, right) => {
                out.push(std::mem::replace(left, DETACHED.clone()));
                out.push(std::mem::replace(right, DETACHED.clone()));
            }
        }
    }
}

impl Drop for QueryNode {
    fn drop(&mut self) {
        // Unlink uniquely owned descendants one at a time; a shared child is
        // released by its last owner instead.
        let mut orphans = Vec::new();
        self.detach_children(&mut orphans);
        while let Some(query) = orphans.pop() {
            if let Ok(mut node) = Arc::try_unwrap(query.node) {
                node.detach_children(&mut orphans);
            }
        }
    }
}

impl From<&str> for Query {
    fn from(term: &str) -> Self {
        Query::word(term)
    }
}

impl From<String> for Query {
    fn from(term: String) -> Self {
        Query::word(term)
    }
}

impl Not for Query {
    type Output = Query;

    fn not(self) -> Query {
        Query::from_node(QueryNode::Not(self))
    }
}

impl Not for &Query {
    type Output = Query;

    fn not(self) -> Query {
        self.negate()
    }
}

impl BitAnd for Query {
    type Output = Query;

    fn bitand(self, rhs: Query) -> Query {
        Query::from_node(QueryNode::And(self, rhs))
    }
}

impl BitAnd for &Query {
    type Output = Query;

    fn bitand(self, rhs: &Query) -> Query {
        self.and(rhs)
    }
}

impl BitOr for Query {
    type Output = Query;

    fn bitor(self, rhs: Query) -> Query {
        Query::from_node(QueryNode::Or(self, rhs))
    }
}

impl BitOr for &Query {
    type Output = Query;

    fn bitor(self, rhs: &Query) -> Query {
        self.or(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation() {
        let a = Query::word("a");
        let b = Query::word("b");
        assert_eq!(a.representation(), "a");
        assert_eq!((&a & &b).representation(), "(a & b)");
        assert_eq!((&a | &b).representation(), "(a | b)");
        assert_eq!((!&a).representation(), "~(a)");
        assert_eq!(
            (!(&a & &b) | Query::word("c")).representation(),
            "(~((a & b)) | c)"
        );
    }

    #[test]
    fn test_composition_shares_operands() {
        let fox = Query::word("fox");
        let both = &fox & &fox;
        match both.node() {
            QueryNode::And(left, right) => {
                assert!(left.ptr_eq(&fox));
                assert!(right.ptr_eq(&fox));
            }
            other => panic!("Expected And node, got {other:?}"),
        }
    }

    #[test]
    fn test_operators_match_methods() {
        let a = Query::word("a");
        let b = Query::word("b");
        assert_eq!(a.and(&b).to_string(), (a.clone() & b.clone()).to_string());
        assert_eq!(a.or(&b).to_string(), (a.clone() | b.clone()).to_string());
        assert_eq!(a.negate().to_string(), (!a).to_string());
    }

    #[test]
    fn test_tree_size_counts_shared_nodes_per_occurrence() {
        let shared = Query::word("x") | Query::word("y");
        let q = &shared & &shared;
        assert_eq!(shared.tree_size(), 3);
        assert_eq!(q.tree_size(), 7);
    }

    #[test]
    fn test_very_deep_query_renders_and_drops() {
        let mut query = Query::word("a");
        for i in 0..100_000 {
            query = if i % 3 == 0 {
                query | Query::word("b")
            } else {
                !query
            };
        }
        let text = query.representation();
        assert!(text.starts_with("~(~(("));
        assert!(text.ends_with(" | b))) | b)"));
        assert_eq!(query.tree_size(), 100_000 + 1 + 100_000 / 3 + 1);
        drop(query);
    }

    #[test]
    fn test_drop_keeps_shared_children_alive() {
        let shared = Query::word("x") & Query::word("y");
        let parent = !shared.clone();
        drop(parent);
        assert_eq!(shared.representation(), "(x & y)");
    }

    #[test]
    fn test_word_keeps_term_verbatim() {
        let q = Query::from("(a & b)");
        assert!(matches!(q.node(), QueryNode::Word(t) if t == "(a & b)"));
        assert_eq!(q.representation(), "(a & b)");
    }
}
