use anyhow::Result;

use crate::cli::TermsCommand;
use crate::context;
use crate::output::{self, OutputFormat, TermCount};

/// List the words of a file with the number of lines containing each.
pub fn run(cmd: TermsCommand, format: OutputFormat) -> Result<()> {
    let index = context::open_index(&cmd.file)?;

    let mut terms: Vec<TermCount> = index
        .terms()
        .map(|(term, postings)| TermCount {
            term: term.to_string(),
            lines: postings.len(),
        })
        .collect();
    // most frequent first, ties alphabetical
    terms.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.term.cmp(&b.term)));
    if let Some(limit) = cmd.limit {
        terms.truncate(limit);
    }

    output::print_terms(&index.stats(), &terms, format);
    Ok(())
}
