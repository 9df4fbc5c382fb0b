use std::path::Path;

use anyhow::{Context, Result, bail};
use linequery::{Config, Query, Session};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::commands::format;
use crate::output::{self, OutputFormat};

/// Run the interactive REPL.
pub fn run(file: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let mut session = Session::new(config);
    if let Some(path) = file {
        open(&mut session, path)?;
    }

    let mut rl = DefaultEditor::new()?;

    println!("linequery REPL (type 'help' for commands, 'quit' to exit)");

    loop {
        let line = match rl.readline("linequery> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command {
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" | "q" => break,
            "open" => {
                if rest.is_empty() {
                    eprintln!("Usage: open <file>");
                    continue;
                }
                open(&mut session, Path::new(rest))
            }
            "word" | "not" | "and" | "or" => handle_operator(&session, command, rest, format),
            "query" => {
                if rest.is_empty() {
                    eprintln!("Usage: query <expression>");
                    continue;
                }
                session
                    .query(rest)
                    .map(|result| output::print_result(&result, format))
                    .map_err(Into::into)
            }
            "let" => handle_let(&mut session, rest),
            "unset" => {
                if rest.is_empty() {
                    eprintln!("Usage: unset <name>");
                    continue;
                }
                if session.variables_mut().remove(rest) {
                    println!("Variable '{rest}' removed.");
                } else {
                    eprintln!("No variable named '{rest}'.");
                }
                Ok(())
            }
            "vars" => {
                output::print_variables(session.variables().iter(), format);
                Ok(())
            }
            "stats" => handle_stats(&session),
            "format" => handle_format(rest, config),
            _ => {
                eprintln!("Unknown command: '{command}'. Type 'help' for available commands.");
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("Error: {e:#}");
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_help() {
    println!(
        "\
Available commands:
  open <file>                  Index a text file
  word <w>                     Lines containing w
  not <w>                      Lines not containing w
  and <a> <b>                  Lines containing both a and b
  or <a> <b>                   Lines containing a or b
  query <expression>           Evaluate an expression, e.g. fox & ~(dog | cat)
  let <name> <expression>      Bind a variable
  unset <name>                 Remove a variable
  vars                         List variables
  stats                        Show statistics of the open file
  format <in> [width] <out>    Reflow a file to a maximum line width
  help                         Show this help
  quit                         Exit the REPL"
    );
}

fn open(session: &mut Session, path: &Path) -> Result<()> {
    let index = session
        .open(path)
        .with_context(|| format!("Unable to open {}", path.display()))?;
    println!(
        "Indexed {} lines ({} distinct words) from {}.",
        index.line_count(),
        index.term_count(),
        path.display()
    );
    Ok(())
}

/// Word-level operators: every operand is one word or variable name.
fn handle_operator(
    session: &Session,
    operator: &str,
    rest: &str,
    format: OutputFormat,
) -> Result<()> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let variables = session.variables();

    let query = match (operator, words.as_slice()) {
        ("word", [w]) => variables.resolve(w),
        ("not", [w]) => !variables.resolve(w),
        ("and", [a, b]) => variables.resolve(a) & variables.resolve(b),
        ("or", [a, b]) => variables.resolve(a) | variables.resolve(b),
        ("word" | "not", _) => bail!("Usage: {operator} <word>"),
        _ => bail!("Usage: {operator} <word> <word>"),
    };

    let result = session.evaluate(&query)?;
    output::print_result(&result, format);
    Ok(())
}

fn handle_let(session: &mut Session, rest: &str) -> Result<()> {
    let (name, expr) = rest
        .split_once(char::is_whitespace)
        .context("Usage: let <name> <expression>")?;
    let expr = expr.trim();
    let expr = expr.strip_prefix('=').map(str::trim).unwrap_or(expr);
    if expr.is_empty() {
        bail!("Usage: let <name> <expression>");
    }

    let query: Query = session.bind(name, expr)?;
    println!("{name} = {query}");
    Ok(())
}

fn handle_stats(session: &Session) -> Result<()> {
    let index = session.index().context("No text source is open")?;
    let stats = index.stats();
    println!(
        "{} lines, {} distinct words, {} word/line pairs",
        stats.line_count, stats.term_count, stats.posting_count
    );
    Ok(())
}

fn handle_format(rest: &str, config: &Config) -> Result<()> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    let (input, width, output) = match args.as_slice() {
        [input, width, output] => (*input, width.parse::<usize>(), *output),
        [input, output] => (*input, Ok(config.formatter.max_width), *output),
        _ => bail!("Usage: format <in> [width] <out>"),
    };
    let width = width.context("Width must be a positive number")?;
    format::reflow(Path::new(input), Path::new(output), width, false)
}
