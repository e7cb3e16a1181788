//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `RESTCLIENT_*` environment variables or a config file;
//! command-line flags in the binaries override them.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Backend origin used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const SESSION_DIR_NAME: &str = "restclient";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `base_url` is not an absolute http(s) URL.
    #[error("invalid base URL `{value}`: {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings shared by the `expenses` and `blog` binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RESTCLIENT")]
pub struct ClientSettings {
    /// Backend origin.
    pub base_url: Option<String>,
    /// Session file override.
    pub session_file: Option<PathBuf>,
    /// Request timeout in seconds; `0` waits indefinitely.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Configured backend origin, falling back to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not
    /// parse or is not http(s).
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        let url = Url::parse(raw).map_err(|error| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason: error.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SettingsError::InvalidBaseUrl {
                value: raw.to_owned(),
                reason: format!("unsupported scheme `{other}`"),
            }),
        }
    }

    /// Session file for `app`, defaulting to the user's config directory.
    pub fn session_file(&self, app: &str) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| default_session_file(app))
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

fn default_session_file(app: &str) -> PathBuf {
    let file_name = format!("{app}-session.json");
    dirs::config_dir()
        .map(|dir| dir.join(SESSION_DIR_NAME).join(&file_name))
        .unwrap_or_else(|| PathBuf::from(format!(".{file_name}")))
}
