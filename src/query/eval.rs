//! Evaluation of query expressions against an inverted index.
//!
//! Each variant has one rule:
//!
//! - `Word`: the term's postings, or the empty set when the term is unknown
//! - `Not`: complement over `[0, line_count)`
//! - `And`: merge intersection of both sides
//! - `Or`: merge union of both sides
//!
//! Evaluation is a pure function of the expression and the index.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::index::{InvertedIndex, PostingList};
use crate::query::expr::{Query, QueryNode};
use crate::result::QueryResult;

/// Evaluator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Reuse the result of a sub-expression that occurs several times in
    /// one expression instead of evaluating every occurrence.
    ///
    /// The cache lives for a single `evaluate` call and never changes the
    /// result.
    pub memoize_shared: bool,
}

/// Turns a [`Query`] into a [`QueryResult`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create an evaluator with default settings (no memoization).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with the given settings.
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Evaluator { config }
    }

    /// Enable or disable memoization of shared sub-expressions.
    pub fn with_memoize_shared(mut self, memoize: bool) -> Self {
        self.config.memoize_shared = memoize;
        self
    }

    /// The active settings.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `query` against `index`.
    pub fn evaluate(&self, query: &Query, index: &InvertedIndex) -> QueryResult {
        self.evaluate_counted(query, index).0
    }

    /// Evaluate and report how many nodes were actually evaluated.
    pub(crate) fn evaluate_counted(
        &self,
        query: &Query,
        index: &InvertedIndex,
    ) -> (QueryResult, usize) {
        let mut pass = EvalPass {
            index,
            cache: self.config.memoize_shared.then(AHashMap::new),
            visits: 0,
        };
        let lines = pass.postings(query);
        let result = QueryResult::new(query.representation(), lines, index.store().clone());

        log::debug!(
            "Evaluated {} -> {} lines ({} node visits)",
            result.sought(),
            result.count(),
            pass.visits
        );

        (result, pass.visits)
    }
}

/// State of one `evaluate` call.
struct EvalPass<'a> {
    index: &'a InvertedIndex,
    /// Results keyed by node identity; `None` when memoization is off.
    cache: Option<AHashMap<usize, Arc<PostingList>>>,
    visits: usize,
}

/// Work item of the post-order walk.
enum Step<'q> {
    /// Evaluate a node, scheduling its children first.
    Visit(&'q Query),
    /// Combine the operand results on top of the value stack.
    Complement(&'q Query),
    Intersect(&'q Query),
    Union(&'q Query),
}

impl EvalPass<'_> {
    /// Post-order walk with explicit stacks, so expression depth is not
    /// limited by the thread stack.
    fn postings(&mut self, root: &Query) -> Arc<PostingList> {
        let mut work = vec![Step::Visit(root)];
        let mut values: Vec<Arc<PostingList>> = Vec::new();

        while let Some(step) = work.pop() {
            let (query, lines) = match step {
                Step::Visit(query) => {
                    if let Some(hit) = self.cached(query) {
                        values.push(hit);
                        continue;
                    }
                    self.visits += 1;
                    match query.node() {
                        QueryNode::Word(term) => {
                            (query, self.index.postings(term).cloned().unwrap_or_default())
                        }
                        QueryNode::Not(inner) => {
                            work.push(Step::Complement(query));
                            work.push(Step::Visit(inner));
                            continue;
                        }
                        QueryNode::And(left, right) => {
                            work.push(Step::Intersect(query));
                            work.push(Step::Visit(right));
                            work.push(Step::Visit(left));
                            continue;
                        }
                        QueryNode::Or(left, right) => {
                            work.push(Step::Union(query));
                            work.push(Step::Visit(right));
                            work.push(Step::Visit(left));
                            continue;
                        }
                    }
                }
                Step::Complement(query) => {
                    let inner = values.pop().unwrap_or_default();
                    (query, Arc::new(inner.complement(self.index.line_count())))
                }
                Step::Intersect(query) => {
                    let right = values.pop().unwrap_or_default();
                    let left = values.pop().unwrap_or_default();
                    (query, Arc::new(left.intersect(&right)))
                }
                Step::Union(query) => {
                    let right = values.pop().unwrap_or_default();
                    let left = values.pop().unwrap_or_default();
                    (query, Arc::new(left.union(&right)))
                }
            };

            if let Some(cache) = self.cache.as_mut() {
                cache.insert(query.node_id(), Arc::clone(&lines));
            }
            values.push(lines);
        }

        values.pop().unwrap_or_default()
    }

    fn cached(&self, query: &Query) -> Option<Arc<PostingList>> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.get(&query.node_id()))
            .cloned()
    }
}
