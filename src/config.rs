//! Compiler configuration.
//!
//! A small builder-style struct, loadable from a TOML file, that controls
//! cosmetic aspects of the emitted IR. Nothing here changes program
//! semantics -- only how the generated module is annotated.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Emit a `;` comment above each top-level statement and function,
    /// naming the construct being lowered. Off by default: the emitted
    /// IR is meant to be fed to `llc`/`opt`, not read.
    pub emit_comments: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            emit_comments: false,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(mut self, emit: bool) -> Self {
        self.emit_comments = emit;
        self
    }

    /// Load a config from a TOML file. Missing keys fall back to defaults,
    /// so an empty file is a valid (all-default) config.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        toml::from_str(&text).map_err(ConfigError::Parse)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String, std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "failed to read config '{}': {}", path, e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_comments_off() {
        let cfg = CompilerConfig::default();
        assert!(!cfg.emit_comments);
    }

    #[test]
    fn from_toml_file_reads_emit_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minilang.toml");
        std::fs::write(&path, "emit_comments = true\n").unwrap();
        let cfg = CompilerConfig::from_toml_file(&path).unwrap();
        assert!(cfg.emit_comments);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minilang.toml");
        std::fs::write(&path, "").unwrap();
        let cfg = CompilerConfig::from_toml_file(&path).unwrap();
        assert!(!cfg.emit_comments);
    }
}
