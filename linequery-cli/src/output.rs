use clap::ValueEnum;
use linequery::{IndexStats, QueryResult};
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text: a count line followed by one line per match.
    Text,
    /// Human-readable table.
    Table,
    /// JSON output.
    Json,
}

/// A word and the number of lines containing it.
#[derive(Tabled)]
pub struct TermCount {
    #[tabled(rename = "Word")]
    pub term: String,
    #[tabled(rename = "Lines")]
    pub lines: usize,
}

/// Print a query result.
pub fn print_result(result: &QueryResult, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{result}"),
        OutputFormat::Json => print_json(&json!(result)),
        OutputFormat::Table => {
            println!("{} occurs {} times", result.sought(), result.count());
            if result.is_empty() {
                return;
            }

            let rows: Vec<MatchRow> = result
                .matches()
                .map(|m| MatchRow {
                    line: m.line,
                    text: m.text.to_string(),
                })
                .collect();
            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

/// Print index statistics and a word list.
pub fn print_terms(stats: &IndexStats, terms: &[TermCount], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let words: Vec<serde_json::Value> = terms
                .iter()
                .map(|t| json!({ "word": t.term, "lines": t.lines }))
                .collect();
            print_json(&json!({
                "line_count": stats.line_count,
                "term_count": stats.term_count,
                "posting_count": stats.posting_count,
                "words": words,
            }));
        }
        OutputFormat::Text => {
            println!(
                "{} lines, {} distinct words",
                stats.line_count, stats.term_count
            );
            for t in terms {
                println!("\t{}\t{}", t.lines, t.term);
            }
        }
        OutputFormat::Table => {
            println!(
                "{} lines, {} distinct words",
                stats.line_count, stats.term_count
            );
            if !terms.is_empty() {
                let table = Table::new(terms).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
    }
}

/// Print session variables as `(name, stored text)` pairs.
pub fn print_variables<'a>(
    variables: impl Iterator<Item = (&'a str, String)>,
    format: OutputFormat,
) {
    let rows: Vec<VariableRow> = variables
        .map(|(name, value)| VariableRow {
            name: name.to_string(),
            value,
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = rows
                .into_iter()
                .map(|row| (row.name, json!(row.value)))
                .collect();
            print_json(&serde_json::Value::Object(map));
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No variables bound.");
            }
            for row in rows {
                println!("{} = {}", row.name, row.value);
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No variables bound.");
                return;
            }
            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Error: failed to serialize output: {e}"),
    }
}

// --- Helper types ---

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Text")]
    text: String,
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}
