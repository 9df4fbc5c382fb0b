use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::Confirm;
use linequery::{Config, LineFormatter};

use crate::cli::FormatCommand;

/// Reflow a file to a maximum line width.
pub fn run(cmd: FormatCommand, config: &Config) -> Result<()> {
    let width = cmd.width.unwrap_or(config.formatter.max_width);
    reflow(&cmd.input, &cmd.output, width, cmd.force)
}

/// Reflow `input` into `output`, asking before replacing an existing file
/// unless `force` is set.
pub fn reflow(input: &Path, output: &Path, width: usize, force: bool) -> Result<()> {
    let formatter = LineFormatter::new(width)?;

    if output.exists() && !force && !confirm_replace(output)? {
        println!("Formatting cancelled.");
        return Ok(());
    }

    let stats = formatter
        .reflow_file(input, output)
        .context("File formatting failed")?;
    println!(
        "File formatting completed: {} lines in, {} lines out.",
        stats.input_lines, stats.output_lines
    );
    Ok(())
}

fn confirm_replace(output: &Path) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(format!(
            "{} already exists. Do you want to replace it?",
            output.display()
        ))
        .default(false)
        .interact()?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_reflow_replaces_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "one two three four\n").unwrap();
        std::fs::write(&output, "stale\n").unwrap();

        reflow(&input, &output, 8, true).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "one two\nthree\nfour\n"
        );
    }

    #[test]
    fn test_zero_width_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "x\n").unwrap();
        assert!(reflow(&input, &dir.path().join("out.txt"), 0, true).is_err());
    }
}
