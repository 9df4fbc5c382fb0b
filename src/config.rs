//! Configuration for sessions, evaluation and formatting.
//!
//! Every section is optional in TOML; missing keys take their defaults.
//!
//! ```toml
//! [evaluator]
//! memoize_shared = true
//!
//! [variables]
//! binding = "expression"
//!
//! [formatter]
//! max_width = 72
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LineQueryError, Result};
use crate::format::FormatterConfig;
use crate::query::EvaluatorConfig;
use crate::session::BindingMode;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Query evaluation settings.
    pub evaluator: EvaluatorConfig,
    /// Variable binding settings.
    pub variables: VariableConfig,
    /// Text reflow settings.
    pub formatter: FormatterConfig,
}

/// Variable binding settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableConfig {
    /// What a binding stores.
    pub binding: BindingMode,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)
            .map_err(|e| LineQueryError::invalid_config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LineQueryError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LineQueryError::invalid_config(format!("Failed to serialize config: {e}")))
    }

    /// Check values that the types alone do not constrain.
    pub fn validate(&self) -> Result<()> {
        if self.formatter.max_width == 0 {
            return Err(LineQueryError::invalid_config(
                "formatter.max_width must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.evaluator.memoize_shared);
        assert_eq!(config.variables.binding, BindingMode::Representation);
        assert_eq!(config.formatter.max_width, 80);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r#"
            [variables]
            binding = "expression"

            [formatter]
            max_width = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.variables.binding, BindingMode::Expression);
        assert_eq!(config.formatter.max_width, 40);
        assert!(!config.evaluator.memoize_shared);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml_str("[formatter]\nmax_width = 0\n").is_err());
        assert!(Config::from_toml_str("[variables]\nbinding = \"bogus\"\n").is_err());
        assert!(Config::from_toml_str("[nonsense]\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.evaluator.memoize_shared = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("linequery.toml");
        std::fs::write(&path, "[evaluator]\nmemoize_shared = true\n").unwrap();
        assert!(Config::load(&path).unwrap().evaluator.memoize_shared);
        assert!(matches!(
            Config::load(dir.path().join("missing.toml")),
            Err(LineQueryError::Io { .. })
        ));
    }
}
