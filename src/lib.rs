//! # linequery
//!
//! Index the lines of a text by the words they contain and answer boolean
//! queries over them.
//!
//! ## Features
//!
//! - Exact, whitespace-delimited inverted index over lines
//! - Composable `NOT` / `AND` / `OR` queries sharing sub-expressions
//! - Merge-based set evaluation, negation over the closed set of lines
//! - A textual query syntax matching the printed form of queries
//! - Session variables and a text reflow formatter for interactive use
//!
//! ## Example
//!
//! ```
//! use linequery::{Query, build_index, evaluate};
//!
//! let (_, index) = build_index(["the fox jumps", "the dog sleeps", "the fox sleeps"]);
//! let query = Query::word("fox") & Query::word("sleeps");
//! let result = evaluate(&query, &index);
//!
//! assert_eq!(result.sought(), "(fox & sleeps)");
//! assert_eq!(result.lines().as_slice(), &[2]);
//! assert_eq!(
//!     result.render(),
//!     "(fox & sleeps) occurs 1 times\n\t(line 3) the fox sleeps\n"
//! );
//! ```

pub mod config;
mod error;
pub mod format;
pub mod index;
pub mod query;
mod result;
pub mod session;
mod store;

// Re-exports for the public API
pub use config::Config;
pub use error::{LineQueryError, Result};
pub use format::{FormatterConfig, LineFormatter, ReflowStats};
pub use index::{IndexStats, InvertedIndex, PostingList, build_index};
pub use query::{
    Evaluator, EvaluatorConfig, Query, QueryNode, QueryParser, conjoin, disjoin, evaluate,
    negate, representation, word_query,
};
pub use result::{LineMatch, QueryResult, render};
pub use session::{BindingMode, Session, VariableStore};
pub use store::{LineNo, LineStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
