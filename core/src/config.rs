// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use workcal_erp::ErpConfig;

use crate::entry::DEFAULT_ERROR_SUMMARY_LEN;
use crate::recent::DEFAULT_RECENT_CAPACITY;

/// The name of the application.
pub const APP_NAME: &str = "workcal";

/// File name of the state database inside the state directory.
pub const STATE_DB_NAME: &str = "workcal.db";

/// Configuration of the calendar client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// ERP API settings.
    pub api: ErpConfig,

    /// Directory for storing application state.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Number of recent entries kept.
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,

    /// Length of the short form of error messages.
    #[serde(default = "default_error_summary_len")]
    pub error_summary_len: usize,
}

const fn default_recent_capacity() -> usize {
    DEFAULT_RECENT_CAPACITY
}

const fn default_error_summary_len() -> usize {
    DEFAULT_ERROR_SUMMARY_LEN
}

impl Config {
    /// Creates a configuration with defaults for everything but the API.
    #[must_use]
    pub fn new(api: ErpConfig) -> Self {
        Self {
            api,
            state_dir: None,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            error_summary_len: DEFAULT_ERROR_SUMMARY_LEN,
        }
    }

    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(
                    expand_path(a)
                        .map_err(|e| format!("Failed to expand state directory path: {e}"))?,
                );
            }

            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!(err = %e, "failed to get state directory"),
            },
        }

        if self.recent_capacity == 0 {
            tracing::warn!("recent_capacity must be positive, using the default");
            self.recent_capacity = DEFAULT_RECENT_CAPACITY;
        }

        Ok(())
    }

    /// Path of the state database, if a state directory is known.
    #[must_use]
    pub fn state_db_path(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|dir| dir.join(STATE_DB_NAME))
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(not(unix))]
    let state_dir = dirs::data_local_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}
