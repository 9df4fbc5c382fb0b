use std::path::Path;

use anyhow::{Context, Result};
use linequery::{Config, InvertedIndex};

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Read and index a text file.
pub fn open_index(path: &Path) -> Result<InvertedIndex> {
    InvertedIndex::open(path).with_context(|| format!("Unable to open {}", path.display()))
}
