//! Reflowing text to a maximum line width.
//!
//! Words are whitespace-separated and never split. Every input line ends at
//! least one output line, so paragraph breaks survive.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LineQueryError, Result};
use crate::store::LossyLines;

/// Default maximum line width.
pub const DEFAULT_MAX_WIDTH: usize = 80;

/// Formatter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Maximum number of characters per output line.
    pub max_width: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

/// Counters reported by a reflow run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflowStats {
    pub input_lines: usize,
    pub output_lines: usize,
    pub words: usize,
}

/// Reflows lines so none is wider than `max_width` characters, except a
/// line holding a single word that is itself wider.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    max_width: usize,
}

impl LineFormatter {
    /// Create a formatter. `max_width` must be positive.
    pub fn new(max_width: usize) -> Result<Self> {
        if max_width == 0 {
            return Err(LineQueryError::invalid_argument(
                "Maximum line width must be greater than zero",
            ));
        }
        Ok(LineFormatter { max_width })
    }

    /// Create a formatter from settings.
    pub fn from_config(config: &FormatterConfig) -> Result<Self> {
        LineFormatter::new(config.max_width)
    }

    /// The configured width.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Reflow a single input line into one or more output lines.
    pub fn reflow_line(&self, line: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut width = 0;

        for word in line.split_whitespace() {
            let word_width = word.chars().count();
            if width > 0 && width + 1 + word_width > self.max_width {
                out.push(std::mem::take(&mut current));
                width = 0;
            }
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            current.push_str(word);
            width += word_width;
        }

        out.push(current);
        out
    }

    /// Reflow everything read from `reader` into `writer`.
    pub fn reflow<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<ReflowStats> {
        let mut stats = ReflowStats::default();
        for line in LossyLines::new(reader) {
            self.write_line(&line?, &mut writer, &mut stats)?;
        }
        writer.flush()?;
        Ok(stats)
    }

    /// Reflow the file at `input` into a new file at `output`.
    ///
    /// An existing `output` is replaced; callers that want confirmation
    /// must ask before calling. `input` and `output` must differ.
    pub fn reflow_file(&self, input: &Path, output: &Path) -> Result<ReflowStats> {
        if same_file(input, output) {
            return Err(LineQueryError::invalid_argument(format!(
                "Output {} would overwrite the input file",
                output.display()
            )));
        }

        let reader = BufReader::new(File::open(input).map_err(|e| LineQueryError::io(input, e))?);
        let mut writer =
            BufWriter::new(File::create(output).map_err(|e| LineQueryError::io(output, e))?);

        let mut stats = ReflowStats::default();
        for line in LossyLines::new(reader) {
            let line = line.map_err(|e| LineQueryError::io(input, e))?;
            self.write_line(&line, &mut writer, &mut stats)
                .map_err(|e| LineQueryError::io(output, e))?;
        }
        writer.flush().map_err(|e| LineQueryError::io(output, e))?;

        log::info!(
            "Reflowed {} ({} lines) into {} ({} lines) at width {}",
            input.display(),
            stats.input_lines,
            output.display(),
            stats.output_lines,
            self.max_width
        );
        Ok(stats)
    }

    fn write_line<W: Write>(
        &self,
        line: &str,
        writer: &mut W,
        stats: &mut ReflowStats,
    ) -> std::io::Result<()> {
        stats.input_lines += 1;
        stats.words += line.split_whitespace().count();
        for out in self.reflow_line(line) {
            writeln!(writer, "{out}")?;
            stats.output_lines += 1;
        }
        Ok(())
    }
}

/// Reflow `reader` into `writer` at `max_width`.
pub fn reflow<R: BufRead, W: Write>(reader: R, writer: W, max_width: usize) -> Result<ReflowStats> {
    LineFormatter::new(max_width)?.reflow(reader, writer)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
