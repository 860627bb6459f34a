//! Optional TOML config file.
//!
//! ```toml
//! api_base_url = "http://localhost:8000"
//! timeout_secs = 10
//! view = "list"
//! filter = "pending"
//! ```
//!
//! The file is read from `--config PATH` or `$TODO_CONFIG`. Every key is
//! optional; unknown keys are rejected so typos surface early.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use todo_core::{FilterMode, ViewMode};

use crate::error::CliError;

pub const CONFIG_ENV: &str = "TODO_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub view: Option<String>,
    pub filter: Option<String>,
}

impl Settings {
    pub fn parse(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        debug!("reading config from {}", path.display());
        let text = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&text).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from the explicit path, else from `$TODO_CONFIG`, else defaults.
    pub fn discover(explicit: Option<&Path>, env_path: Option<PathBuf>) -> Result<Self, CliError> {
        match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn view_mode(&self) -> Result<Option<ViewMode>, CliError> {
        self.view
            .as_deref()
            .map(|v| v.parse().map_err(CliError::Config))
            .transpose()
    }

    pub fn filter_mode(&self) -> Result<Option<FilterMode>, CliError> {
        self.filter
            .as_deref()
            .map(|f| f.parse().map_err(CliError::Config))
            .transpose()
    }
}
