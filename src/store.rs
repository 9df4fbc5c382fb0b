//! Immutable, shared storage for the lines of one text source.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::error::{LineQueryError, Result};

/// A 0-based position in a [`LineStore`].
pub type LineNo = usize;

/// The ordered lines of a text source.
///
/// Cloning a `LineStore` clones a reference, never the text: the inverted
/// index and every query result built from it point at the same lines.
#[derive(Debug, Clone)]
pub struct LineStore {
    lines: Arc<[String]>,
}

impl LineStore {
    /// Create a line store from an in-memory sequence of lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        LineStore {
            lines: lines.into(),
        }
    }

    /// Read every line of `reader`, stripping `\n` / `\r\n` terminators.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = read_lines(reader)?;
        Ok(LineStore::new(lines))
    }

    /// Load the lines of the file at `path`.
    ///
    /// Fails when the file cannot be opened or read; nothing is produced in
    /// that case.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LineQueryError::io(path, e))?;
        let lines = read_lines(BufReader::new(file)).map_err(|e| LineQueryError::io(path, e))?;
        log::debug!("Loaded {} lines from {}", lines.len(), path.display());
        Ok(LineStore::new(lines))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the store holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the text of the line at `line_no`.
    pub fn get(&self, line_no: LineNo) -> Option<&str> {
        self.lines.get(line_no).map(String::as_str)
    }

    /// All lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Iterate over `(position, text)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (LineNo, &str)> {
        self.lines.iter().map(String::as_str).enumerate()
    }

    /// Check whether two handles refer to the same underlying lines.
    pub fn ptr_eq(&self, other: &LineStore) -> bool {
        Arc::ptr_eq(&self.lines, &other.lines)
    }
}

impl Default for LineStore {
    fn default() -> Self {
        LineStore::new(Vec::<String>::new())
    }
}

fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    LossyLines::new(reader).collect()
}

/// Like [`BufRead::lines`], but decodes invalid UTF-8 lossily instead of
/// failing.
pub(crate) struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        LossyLines {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
