//! Parser for the textual query syntax.
//!
//! The syntax is the one [`Query::representation`] produces, so a printed
//! query can be typed back in:
//!
//! - `fox` — a word
//! - `~fox`, `~(fox)` — negation
//! - `fox & dog` — conjunction
//! - `fox | dog` — disjunction
//! - `"a|b"` — a quoted word, for terms containing operator characters;
//!   `\"` and `\\` stand for a literal quote and backslash
//!
//! `~` binds tighter than `&`, which binds tighter than `|`.
//!
//! Nesting is capped at [`DEFAULT_MAX_DEPTH`] levels unless configured
//! otherwise. Every `~` and every `(` opens one level.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::{LineQueryError, Result};
use crate::query::expr::Query;

/// Default nesting limit of [`QueryParser`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Pest grammar parser for query expressions.
#[derive(Parser)]
#[grammar = "query/parser.pest"]
struct QueryStringParser;

/// Parser for query expressions.
///
/// Bare words go through a resolver, which lets a caller substitute bound
/// variables (see [`crate::session::VariableStore`]). Quoted words are always
/// taken literally.
#[derive(Debug, Clone)]
pub struct QueryParser {
    max_depth: usize,
}

impl Default for QueryParser {
    fn default() -> Self {
        QueryParser {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl QueryParser {
    /// Create a new query parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest nesting of `~` and `(` accepted by this parser.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse `input`, turning every word into a word query.
    pub fn parse(&self, input: &str) -> Result<Query> {
        self.parse_with(input, |word| Query::word(word))
    }

    /// Parse `input`, turning every bare word into `resolve(word)`.
    pub fn parse_with<F>(&self, input: &str, resolve: F) -> Result<Query>
    where
        F: Fn(&str) -> Query,
    {
        let depth = nesting_depth(input);
        if depth > self.max_depth {
            return Err(LineQueryError::parse(format!(
                "Query nests {depth} levels deep; the limit is {}",
                self.max_depth
            )));
        }

        let mut pairs = QueryStringParser::parse(Rule::query, input)
            .map_err(|e| LineQueryError::parse(format!("Failed to parse query: {e}")))?;

        let query = pairs
            .next()
            .ok_or_else(|| LineQueryError::parse("Empty query"))?;
        let expr = query
            .into_inner()
            .next()
            .ok_or_else(|| LineQueryError::parse("Empty query"))?;

        build_or(expr, &resolve)
    }
}

/// Deepest chain of `~` and `(` levels in `input`, outside quoted words.
fn nesting_depth(input: &str) -> usize {
    let mut enclosing = Vec::new();
    let mut base = 0usize;
    let mut depth = 0usize;
    let mut deepest = 0usize;

    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '~' => depth += 1,
            '(' => {
                depth += 1;
                enclosing.push(base);
                base = depth;
            }
            ')' => {
                base = enclosing.pop().unwrap_or(0);
                depth = base;
            }
            '"' => {
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
                depth = base;
            }
            c if c.is_whitespace() => {}
            _ => depth = base,
        }
        deepest = deepest.max(depth);
    }

    deepest
}

/// Drop the backslash of every `\"` or `\\` escape.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn build_or<F: Fn(&str) -> Query>(pair: Pair<Rule>, resolve: &F) -> Result<Query> {
    let mut operands = pair.into_inner();
    let first = operands
        .next()
        .ok_or_else(|| LineQueryError::parse("Missing operand before '|'"))?;
    let mut query = build_and(first, resolve)?;
    for operand in operands {
        query = query | build_and(operand, resolve)?;
    }
    Ok(query)
}

fn build_and<F: Fn(&str) -> Query>(pair: Pair<Rule>, resolve: &F) -> Result<Query> {
    let mut operands = pair.into_inner();
    let first = operands
        .next()
        .ok_or_else(|| LineQueryError::parse("Missing operand before '&'"))?;
    let mut query = build_unary(first, resolve)?;
    for operand in operands {
        query = query & build_unary(operand, resolve)?;
    }
    Ok(query)
}

fn build_unary<F: Fn(&str) -> Query>(pair: Pair<Rule>, resolve: &F) -> Result<Query> {
    let mut negations = 0usize;
    let mut operand = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::not_op => negations += 1,
            Rule::group => {
                let expr = inner
                    .into_inner()
                    .next()
                    .ok_or_else(|| LineQueryError::parse("Empty parentheses"))?;
                operand = Some(build_or(expr, resolve)?);
            }
            Rule::quoted => {
                let text = inner
                    .into_inner()
                    .next()
                    .map(|t| unescape(t.as_str()))
                    .unwrap_or_default();
                operand = Some(Query::word(text));
            }
            Rule::word => operand = Some(resolve(inner.as_str())),
            _ => {}
        }
    }

    let mut query = operand.ok_or_else(|| LineQueryError::parse("Missing operand after '~'"))?;
    for _ in 0..negations {
        query = !query;
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expr::QueryNode;

    fn rep(input: &str) -> String {
        QueryParser::new().parse(input).unwrap().representation()
    }

    #[test]
    fn test_single_word() {
        let query = QueryParser::new().parse("fox").unwrap();
        assert!(matches!(query.node(), QueryNode::Word(t) if t == "fox"));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(rep("a | b & c"), "(a | (b & c))");
        assert_eq!(rep("~a & b"), "(~(a) & b)");
        assert_eq!(rep("~(a & b)"), "~((a & b))");
        assert_eq!(rep("(a | b) & c"), "((a | b) & c)");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(rep("a & b & c"), "((a & b) & c)");
        assert_eq!(rep("a | b | c"), "((a | b) | c)");
    }

    #[test]
    fn test_double_negation_kept() {
        assert_eq!(rep("~~a"), "~(~(a))");
    }

    #[test]
    fn test_representation_reparses() {
        let inputs = ["(fox & ~(dog))", "~((a | b))", "((a & b) | (c & ~(d)))"];
        for input in inputs {
            assert_eq!(rep(input), input);
        }
    }

    #[test]
    fn test_words_keep_punctuation_and_case() {
        assert_eq!(rep("Fox, & don't"), "(Fox, & don't)");
    }

    #[test]
    fn test_quoted_word_is_literal() {
        let query = QueryParser::new().parse(r#""(a & b)""#).unwrap();
        assert!(matches!(query.node(), QueryNode::Word(t) if t == "(a & b)"));
    }

    #[test]
    fn test_quoted_escapes() {
        let query = QueryParser::new().parse(r#""say \"hi\"""#).unwrap();
        assert!(matches!(query.node(), QueryNode::Word(t) if t == r#"say "hi""#));

        let query = QueryParser::new().parse(r#""a\\" & b"#).unwrap();
        assert_eq!(query.representation(), r"(a\ & b)");
    }

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth("a & b | c"), 0);
        assert_eq!(nesting_depth("~a & ~~b"), 2);
        assert_eq!(nesting_depth("~(~(a)) & ~b"), 4);
        assert_eq!(nesting_depth("((a) | (b))"), 2);
        assert_eq!(nesting_depth(r#""~~~(((" & ~a"#), 1);
        assert_eq!(nesting_depth(r#""\"~~~" & a"#), 0);
    }

    #[test]
    fn test_too_deep_is_rejected() {
        let parser = QueryParser::new();
        let deep_not = format!("{}a", "~".repeat(20_000));
        assert!(matches!(parser.parse(&deep_not), Err(LineQueryError::Parse(_))));

        let deep_group = format!("{}a{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(parser.parse(&deep_group), Err(LineQueryError::Parse(_))));

        let at_limit = format!("{}a", "~".repeat(DEFAULT_MAX_DEPTH));
        assert!(parser.parse(&at_limit).is_ok());
        assert!(parser.clone().with_max_depth(3).parse("~~~~a").is_err());
        assert!(parser.with_max_depth(3).parse("~~~a").is_ok());
    }

    #[test]
    fn test_resolver_applies_to_bare_words_only() {
        let query = QueryParser::new()
            .parse_with(r#"x & "x""#, |w| Query::word(format!("<{w}>")))
            .unwrap();
        assert_eq!(query.representation(), "(<x> & x)");
    }

    #[test]
    fn test_errors() {
        let parser = QueryParser::new();
        assert!(parser.parse("").is_err());
        assert!(parser.parse("   ").is_err());
        assert!(parser.parse("a &").is_err());
        assert!(parser.parse("| a").is_err());
        assert!(parser.parse("(a & b").is_err());
        assert!(parser.parse("~").is_err());
        assert!(matches!(
            parser.parse("a b"),
            Err(LineQueryError::Parse(_))
        ));
    }
}
