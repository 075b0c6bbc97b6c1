//! Configuration handling for the demo

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tui_form_state::FormValue;

/// User configuration for the demo
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DemoConfig {
    /// Initial values for the sign-up form
    pub initial_values: Option<FormValue>,
    /// Initial values for the nested address form
    pub address_values: Option<FormValue>,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: Option<String>,
}

impl DemoConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "tui-form-state", "tui-form-state")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: DemoConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("tui_form_state=info")
    }
}
