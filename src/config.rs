//! Configuration loaded from `cmdgen.toml`.
//!
//! ```toml
//! [generator]
//! placeholder = "colon"
//! quote_identifiers = true
//!
//! [database]
//! url = "postgres://localhost/app"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::PlaceholderStyle;
use crate::error::{CmdGenError, CmdGenResult};

/// Project-local config file name.
pub const CONFIG_FILE: &str = "cmdgen.toml";

/// How commands are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub placeholder: PlaceholderStyle,
    /// Quote table and column names that are reserved words or contain
    /// special characters.
    pub quote_identifiers: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::default(),
            quote_identifiers: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> CmdGenResult<Self> {
        toml::from_str(content).map_err(|e| CmdGenError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> CmdGenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CmdGenError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `cmdgen.toml` from the working directory, then
    /// `<config dir>/cmdgen/config.toml`, falling back to defaults.
    pub fn discover() -> CmdGenResult<Self> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("cmdgen").join("config.toml"));
        }
        paths
    }
}
