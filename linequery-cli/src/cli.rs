use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// linequery - boolean word queries over the lines of a text file
#[derive(Parser)]
#[command(name = "linequery", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "LINEQUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a query against a text file.
    Query(QueryCommand),
    /// List the distinct words of a text file.
    Terms(TermsCommand),
    /// Reflow a text file to a maximum line width.
    Format(FormatCommand),
    /// Start an interactive session.
    Repl {
        /// Text file to open at startup.
        file: Option<PathBuf>,
    },
}

#[derive(Parser)]
pub struct QueryCommand {
    /// Text file to index.
    pub file: PathBuf,

    /// Query expression, e.g. "fox & ~dog".
    pub query: String,
}

#[derive(Parser)]
pub struct TermsCommand {
    /// Text file to index.
    pub file: PathBuf,

    /// Show only the N most frequent words.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Parser)]
pub struct FormatCommand {
    /// Text file to reflow.
    pub input: PathBuf,

    /// Output file path.
    #[arg(long, short)]
    pub output: PathBuf,

    /// Maximum characters per line (defaults to the configured width).
    #[arg(long, short)]
    pub width: Option<usize>,

    /// Replace an existing output file without asking.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from(["linequery", "--format", "json", "query", "a.txt", "fox & ~dog"])
            .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        match cli.command {
            Command::Query(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("a.txt"));
                assert_eq!(cmd.query, "fox & ~dog");
            }
            _ => panic!("Expected query command"),
        }
    }

    #[test]
    fn test_parse_format_command() {
        let cli = Cli::try_parse_from(["linequery", "format", "in.txt", "-o", "out.txt", "-w", "40"])
            .unwrap();
        match cli.command {
            Command::Format(cmd) => {
                assert_eq!(cmd.width, Some(40));
                assert!(!cmd.force);
            }
            _ => panic!("Expected format command"),
        }
    }
}
