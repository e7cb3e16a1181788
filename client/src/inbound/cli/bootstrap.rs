//! Process setup shared by both binaries: tracing and client wiring.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ClientSettings;
use crate::domain::ApiClient;
use crate::outbound::http::{HttpApiTransport, HttpTransportSettings};
use crate::outbound::session::FileSessionStore;

use super::App;

/// Client used by the binaries.
pub type CliClient = ApiClient<HttpApiTransport, FileSessionStore>;

/// Values given on the command line that win over loaded settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOverrides {
    /// `--base-url`.
    pub base_url: Option<String>,
    /// `--session-file`.
    pub session_file: Option<PathBuf>,
}

impl ClientOverrides {
    fn apply(&self, mut settings: ClientSettings) -> ClientSettings {
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(session_file) = &self.session_file {
            settings.session_file = Some(session_file.clone());
        }
        settings
    }
}

/// Install a JSON subscriber on stderr filtered by `RUST_LOG`.
pub fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Load settings for `app` from the environment and config files.
///
/// # Errors
///
/// Returns an error when the configuration cannot be read.
pub fn load_settings(app: App) -> io::Result<ClientSettings> {
    ClientSettings::load_from_iter([OsString::from(app.name())])
        .map_err(|error| io::Error::other(error.to_string()))
}

/// Build the HTTP client for `app`.
///
/// # Errors
///
/// Returns an error when the base URL is invalid or the HTTP client cannot
/// be constructed.
pub fn build_client(
    app: App,
    settings: ClientSettings,
    overrides: &ClientOverrides,
) -> io::Result<CliClient> {
    let settings = overrides.apply(settings);
    let base_url = settings.base_url().map_err(io::Error::other)?;
    let session_file = settings.session_file(app.name());
    debug!(%base_url, session_file = %session_file.display(), "client configured");

    let transport = HttpApiTransport::new(
        HttpTransportSettings::new(base_url).with_timeout(settings.request_timeout()),
    )
    .map_err(io::Error::other)?;
    Ok(ApiClient::new(
        Arc::new(transport),
        Arc::new(FileSessionStore::new(session_file)),
    ))
}
