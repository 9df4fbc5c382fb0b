//! Inverted index over the lines of a [`LineStore`].
//!
//! Tokens are the whitespace-separated substrings of a line, compared
//! exactly: `Fox`, `fox` and `fox,` are three different terms.

pub mod posting;

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::Result;
use crate::store::{LineNo, LineStore};

pub use posting::PostingList;

/// Mapping from term to the ascending set of lines containing it.
///
/// Built once, immutable afterwards. The index keeps a handle to the lines
/// it was built from, so it is the whole evaluation context for a query.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    store: LineStore,
    terms: AHashMap<String, Arc<PostingList>>,
}

/// Summary figures for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of lines in the source.
    pub line_count: usize,
    /// Number of distinct terms.
    pub term_count: usize,
    /// Total number of (term, line) pairs.
    pub posting_count: usize,
}

impl InvertedIndex {
    /// Build the index for every line of `store`.
    pub fn build(store: LineStore) -> Self {
        let mut builder: AHashMap<String, PostingList> = AHashMap::new();
        for (line_no, text) in store.iter() {
            for token in text.split_whitespace() {
                // get_mut first so a known term costs no allocation
                match builder.get_mut(token) {
                    Some(postings) => postings.push(line_no),
                    None => {
                        let mut postings = PostingList::new();
                        postings.push(line_no);
                        builder.insert(token.to_string(), postings);
                    }
                }
            }
        }

        let terms: AHashMap<String, Arc<PostingList>> = builder
            .into_iter()
            .map(|(term, postings)| (term, Arc::new(postings)))
            .collect();

        log::debug!(
            "Built inverted index: {} lines, {} terms",
            store.len(),
            terms.len()
        );

        InvertedIndex { store, terms }
    }

    /// Load `path` and index its lines.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = LineStore::open(path)?;
        Ok(InvertedIndex::build(store))
    }

    /// The lines this index was built from.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Number of lines, i.e. the universe `[0, line_count)` used by negation.
    pub fn line_count(&self) -> usize {
        self.store.len()
    }

    /// Look up the postings of `term`. `None` means the term occurs on no line.
    pub fn postings(&self, term: &str) -> Option<&Arc<PostingList>> {
        self.terms.get(term)
    }

    /// Check if `term` occurs anywhere.
    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Lines containing `term`, in ascending order.
    pub fn lines_of(&self, term: &str) -> impl Iterator<Item = LineNo> + '_ {
        self.terms
            .get(term)
            .into_iter()
            .flat_map(|postings| postings.iter())
    }

    /// Iterate terms and their postings in unspecified order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.terms
            .iter()
            .map(|(term, postings)| (term.as_str(), postings.as_ref()))
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Summary figures.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            line_count: self.line_count(),
            term_count: self.term_count(),
            posting_count: self.terms.values().map(|p| p.len()).sum(),
        }
    }
}

/// Build a line store from `lines` and index it.
pub fn build_index<I, S>(lines: I) -> (LineStore, InvertedIndex)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let store = LineStore::new(lines);
    let index = InvertedIndex::build(store.clone());
    (store, index)
}
