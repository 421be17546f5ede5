//! Runtime configuration.
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! absent) file is fine. The engine itself never reads configuration --
//! this is consumed by whatever front end drives a session.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Top-level husk configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HuskConfig {
    /// Session state file. `None` keeps the session in memory only.
    pub state_file: Option<PathBuf>,
    /// Command history capacity.
    pub history_size: usize,
    /// User name shown in the prompt.
    pub prompt_user: String,
    /// Host name shown in the prompt.
    pub prompt_host: String,
    /// Print the boot banner on startup.
    pub boot_banner: bool,
}

impl Default for HuskConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            history_size: 20,
            prompt_user: "guest".to_string(),
            prompt_host: "husk".to_string(),
            boot_banner: true,
        }
    }
}

impl HuskConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
