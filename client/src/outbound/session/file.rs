//! JSON file session store.
//!
//! The file holds `{"access": "...", "refresh": "..."}`. All access goes
//! through a `cap_std::fs::Dir` opened on the file's parent directory. On
//! unix the file is readable by its owner only.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{ACCESS_KEY, AccessToken, REFRESH_KEY, RefreshToken, Session};

#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o600;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

/// Session store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store writing to `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_and_file_name(&self) -> Result<(&Path, OsString), SessionStoreError> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = self.path.file_name().ok_or_else(|| {
            SessionStoreError::io(format!(
                "session path {} has no file name",
                self.path.display()
            ))
        })?;
        Ok((parent, file_name.to_os_string()))
    }

    fn io_error(&self, error: &io::Error) -> SessionStoreError {
        SessionStoreError::io(format!("{}: {error}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let (parent, file_name) = self.parent_and_file_name()?;
        let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(&error)),
        };
        let raw = match directory.read_to_string(Path::new(&file_name)) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(&error)),
        };
        let stored: StoredSession = serde_json::from_str(&raw)
            .map_err(|error| SessionStoreError::corrupt(error.to_string()))?;

        let Some(access) = stored.access.filter(|access| !access.trim().is_empty()) else {
            debug!(path = %self.path.display(), "session file has no access token");
            return Ok(None);
        };
        let access = AccessToken::new(access)
            .map_err(|error| SessionStoreError::corrupt(format!("{ACCESS_KEY}: {error}")))?;
        let refresh = stored
            .refresh
            .filter(|refresh| !refresh.trim().is_empty())
            .map(RefreshToken::new)
            .transpose()
            .map_err(|error| SessionStoreError::corrupt(format!("{REFRESH_KEY}: {error}")))?;
        Ok(Some(Session::new(access, refresh)))
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let (parent, file_name) = self.parent_and_file_name()?;
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|error| self.io_error(&error))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| self.io_error(&error))?;
        let stored = StoredSession {
            access: Some(session.access().expose().to_owned()),
            refresh: session.refresh().map(|refresh| refresh.expose().to_owned()),
        };
        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|error| SessionStoreError::io(error.to_string()))?;
        write_private(&directory, Path::new(&file_name), &json)
            .map_err(|error| self.io_error(&error))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let (parent, file_name) = self.parent_and_file_name()?;
        let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(self.io_error(&error)),
        };
        match directory.remove_file(Path::new(&file_name)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(&error)),
        }
    }
}

#[cfg(unix)]
fn write_private(directory: &Dir, file_name: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write as _;

    use cap_std::fs::{OpenOptions, OpenOptionsExt as _, Permissions, PermissionsExt as _};

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(PRIVATE_MODE);
    let mut file = directory.open_with(file_name, &options)?;
    // `mode` only applies when the file is created.
    directory.set_permissions(file_name, Permissions::from_mode(PRIVATE_MODE))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(directory: &Dir, file_name: &Path, contents: &[u8]) -> io::Result<()> {
    directory.write(file_name, contents)
}
