//! Interactive session state: the open index and named query variables.
//!
//! A [`Session`] is an explicit context object owned by one interactive
//! session. Nothing here is process-global.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{LineQueryError, Result};
use crate::index::InvertedIndex;
use crate::query::{Evaluator, Query, QueryParser};
use crate::result::QueryResult;

/// What a variable binding stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    /// Store only the query's representation. Recalling the variable yields
    /// a single-word query whose term is that text, so a bound compound
    /// expression is *not* rebuilt: `(a & b)` comes back as the word
    /// `(a & b)`, which normally occurs on no line.
    #[default]
    Representation,
    /// Store the query itself; recalling it yields the original expression.
    Expression,
}

#[derive(Debug, Clone)]
enum Binding {
    Text(String),
    Expression(Query),
}

/// Named query variables.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    mode: BindingMode,
    bindings: BTreeMap<String, Binding>,
}

impl VariableStore {
    /// Create an empty store in [`BindingMode::Representation`] mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given binding mode.
    pub fn with_mode(mode: BindingMode) -> Self {
        VariableStore {
            mode,
            bindings: BTreeMap::new(),
        }
    }

    /// The binding mode.
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Bind `name` to `query`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, query: &Query) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        let binding = match self.mode {
            BindingMode::Representation => Binding::Text(query.representation()),
            BindingMode::Expression => Binding::Expression(query.clone()),
        };
        log::debug!("Bound variable {name} = {query}");
        self.bindings.insert(name, binding);
        Ok(())
    }

    /// Recall the query bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<Query> {
        self.bindings.get(name).map(|binding| match binding {
            Binding::Text(text) => Query::word(text.as_str()),
            Binding::Expression(query) => query.clone(),
        })
    }

    /// The query a typed word stands for: the bound query when `token`
    /// names a variable, otherwise a word query for `token` itself.
    pub fn resolve(&self, token: &str) -> Query {
        self.lookup(token).unwrap_or_else(|| Query::word(token))
    }

    /// Remove a binding. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.bindings.remove(name).is_some()
    }

    /// Check if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Iterate `(name, stored text)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.bindings.iter().map(|(name, binding)| {
            let text = match binding {
                Binding::Text(text) => text.clone(),
                Binding::Expression(query) => query.representation(),
            };
            (name.as_str(), text)
        })
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove all bindings.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LineQueryError::invalid_argument(
            "Variable name must not be empty",
        ));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '&' | '|' | '~' | '"'))
    {
        return Err(LineQueryError::invalid_argument(format!(
            "Invalid variable name '{name}'"
        )));
    }
    Ok(())
}

/// One interactive session: at most one open text source plus variables.
#[derive(Debug, Clone, Default)]
pub struct Session {
    index: Option<InvertedIndex>,
    variables: VariableStore,
    evaluator: Evaluator,
    parser: QueryParser,
}

impl Session {
    /// Create a session using the given settings.
    pub fn new(config: &Config) -> Self {
        Session {
            index: None,
            variables: VariableStore::with_mode(config.variables.binding),
            evaluator: Evaluator::with_config(config.evaluator),
            parser: QueryParser::new(),
        }
    }

    /// Load and index `path`, replacing the current source.
    ///
    /// On failure the previously open source stays open.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&InvertedIndex> {
        let index = InvertedIndex::open(path)?;
        Ok(&*self.index.insert(index))
    }

    /// Replace the current source with an already built index.
    pub fn set_index(&mut self, index: InvertedIndex) {
        self.index = Some(index);
    }

    /// The open index, if any.
    pub fn index(&self) -> Option<&InvertedIndex> {
        self.index.as_ref()
    }

    /// Session variables.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Session variables, mutably.
    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    /// Parse query text, substituting variables for bare words.
    pub fn parse(&self, text: &str) -> Result<Query> {
        self.parser
            .parse_with(text, |word| self.variables.resolve(word))
    }

    /// Evaluate `query` against the open source.
    pub fn evaluate(&self, query: &Query) -> Result<QueryResult> {
        let index = self.index.as_ref().ok_or_else(|| {
            LineQueryError::invalid_argument("No text source is open")
        })?;
        Ok(self.evaluator.evaluate(query, index))
    }

    /// Parse and evaluate query text.
    pub fn query(&self, text: &str) -> Result<QueryResult> {
        let query = self.parse(text)?;
        self.evaluate(&query)
    }

    /// Parse `text` and bind the result to `name`.
    pub fn bind(&mut self, name: &str, text: &str) -> Result<Query> {
        let query = self.parse(text)?;
        self.variables.bind(name, &query)?;
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;

    fn session(mode: BindingMode) -> Session {
        let mut config = Config::default();
        config.variables.binding = mode;
        let mut session = Session::new(&config);
        let (_, index) = build_index(["the fox jumps", "the dog sleeps", "the fox sleeps"]);
        session.set_index(index);
        session
    }

    #[test]
    fn test_word_binding_recalls_word() {
        let mut session = session(BindingMode::Representation);
        session.bind("animal", "fox").unwrap();
        let result = session.query("animal").unwrap();
        assert_eq!(result.sought(), "fox");
        assert_eq!(result.lines().as_slice(), &[0, 2]);
    }

    #[test]
    fn test_compound_binding_recalls_representation_as_word() {
        let mut session = session(BindingMode::Representation);
        session.bind("both", "fox & sleeps").unwrap();

        let recalled = session.variables().lookup("both").unwrap();
        assert!(matches!(
            recalled.node(),
            crate::query::QueryNode::Word(t) if t == "(fox & sleeps)"
        ));

        let result = session.query("both").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.sought(), "(fox & sleeps)");
    }

    #[test]
    fn test_expression_binding_recalls_expression() {
        let mut session = session(BindingMode::Expression);
        let bound = session.bind("both", "fox & sleeps").unwrap();

        let recalled = session.variables().lookup("both").unwrap();
        assert!(recalled.ptr_eq(&bound));

        let result = session.query("both | dog").unwrap();
        assert_eq!(result.sought(), "((fox & sleeps) | dog)");
        assert_eq!(result.lines().as_slice(), &[1, 2]);
    }

    #[test]
    fn test_unbound_words_pass_through() {
        let store = VariableStore::new();
        assert_eq!(store.resolve("fox").representation(), "fox");
    }

    #[test]
    fn test_rebinding_and_removal() {
        let mut store = VariableStore::new();
        store.bind("x", &Query::word("a")).unwrap();
        store.bind("x", &Query::word("b")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("x").unwrap().representation(), "b");
        assert!(store.remove("x"));
        assert!(!store.remove("x"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_names() {
        let mut store = VariableStore::new();
        let q = Query::word("a");
        assert!(store.bind("", &q).is_err());
        assert!(store.bind("two words", &q).is_err());
        assert!(store.bind("a&b", &q).is_err());
    }

    #[test]
    fn test_iter_sorted() {
        let mut store = VariableStore::with_mode(BindingMode::Expression);
        store.bind("zeta", &Query::word("z")).unwrap();
        store
            .bind("alpha", &(Query::word("a") | Query::word("b")))
            .unwrap();
        let listed: Vec<(&str, String)> = store.iter().collect();
        assert_eq!(
            listed,
            vec![("alpha", "(a | b)".to_string()), ("zeta", "z".to_string())]
        );
    }

    #[test]
    fn test_query_without_source() {
        let session = Session::new(&Config::default());
        assert!(matches!(
            session.query("fox"),
            Err(LineQueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_failed_open_keeps_previous_source() {
        let mut session = session(BindingMode::Representation);
        let dir = tempfile::TempDir::new().unwrap();
        assert!(session.open(dir.path().join("missing.txt")).is_err());
        assert_eq!(session.index().unwrap().line_count(), 3);
    }
}
