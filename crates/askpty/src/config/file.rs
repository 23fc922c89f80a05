//! File-based configuration loading.

use std::path::Path;

use super::ConsoleConfig;
use crate::error::{ConsoleError, Result};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse `source` in this format.
    pub fn parse(self, source: &str) -> Result<ConsoleConfig> {
        match self {
            Self::Toml => ConsoleConfig::from_toml_str(source),
            Self::Json => {
                serde_json::from_str(source).map_err(|e| ConsoleError::config(e.to_string()))
            }
        }
    }
}

pub(super) fn load(path: &Path) -> Result<ConsoleConfig> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        ConsoleError::config(format!(
            "unsupported config file extension: {}",
            path.display()
        ))
    })?;
    let source = ConsoleError::with_io_context(
        std::fs::read_to_string(path),
        format!("reading {}", path.display()),
    )?;

    tracing::debug!(path = %path.display(), ?format, "loading console config");
    format.parse(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("askpty.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("askpty.JSON")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("askpty.yaml")), None);
    }

    #[test]
    fn json_source() {
        let config = ConfigFormat::Json
            .parse(r#"{ "rows": 40, "answer_queries": false }"#)
            .unwrap();
        assert_eq!(config.rows, 40);
        assert!(!config.answer_queries);
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("askpty-config-{}.toml", std::process::id()));
        std::fs::write(&path, "expect_timeout_ms = 250\n").unwrap();

        let config = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.expect_timeout_ms, 250);
    }

    #[test]
    fn missing_file_has_context() {
        let err = load(Path::new("/nonexistent/askpty.toml")).unwrap_err();
        assert!(err.to_string().contains("reading /nonexistent/askpty.toml"));
    }
}
