use anyhow::{Context, Result};
use linequery::{Config, Evaluator, QueryParser};

use crate::cli::QueryCommand;
use crate::context;
use crate::output::{self, OutputFormat};

/// Execute a one-shot query.
pub fn run(cmd: QueryCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let index = context::open_index(&cmd.file)?;

    let query = QueryParser::new()
        .parse(&cmd.query)
        .context("Failed to parse query")?;

    let result = Evaluator::with_config(config.evaluator).evaluate(&query, &index);
    output::print_result(&result, format);
    Ok(())
}
