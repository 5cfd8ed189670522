//! Persistent backing for the session. The file store writes one JSON document
//! with owner-only permissions on Unix; the memory store backs tests and
//! one-shot runs. Both overwrite the whole record on every save.

use crate::app_lib::AppError;
use crate::features::auth::types::UserProfile;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// On-disk shape of the session. Token values are plain strings here and are
/// wrapped in `SecretString` as soon as they are loaded.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StoredSession")
            .field("access_token", &self.access_token.is_some())
            .field("refresh_token", &self.refresh_token.is_some())
            .field("csrf_token", &self.csrf_token.is_some())
            .field("user", &self.user.as_ref().map(|user| user.role))
            .finish()
    }
}

pub trait SessionStore: Send + Sync {
    /// # Errors
    /// Returns `AppError::Storage` if the backing store cannot be read or parsed.
    fn load(&self) -> Result<StoredSession, AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the backing store cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the backing store cannot be cleared.
    fn clear(&self) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<StoredSession, AppError> {
        if !self.file_path.exists() {
            return Ok(StoredSession::default());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|err| {
            AppError::Storage(format!(
                "Cannot read session file '{}': {err}",
                self.file_path.display()
            ))
        })?;

        if contents.trim().is_empty() {
            return Ok(StoredSession::default());
        }

        serde_json::from_str(&contents).map_err(|err| {
            AppError::Storage(format!(
                "Corrupted session file '{}': {err}. Delete it and log in again.",
                self.file_path.display()
            ))
        })
    }

    fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    AppError::Storage(format!(
                        "Failed to create session directory '{}': {err}",
                        parent.display()
                    ))
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(session)
            .map_err(|err| AppError::Storage(format!("Failed to serialize session: {err}")))?;

        let write_error = |err: io::Error| {
            AppError::Storage(format!(
                "Failed to write session file '{}': {err}",
                self.file_path.display()
            ))
        };
        let mut file = open_private(&self.file_path).map_err(write_error)?;
        file.write_all(contents.as_bytes()).map_err(write_error)?;

        debug!(path = %self.file_path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to remove session file '{}': {err}",
                self.file_path.display()
            ))),
        }
    }
}

/// Opens `path` for a full rewrite. On Unix a new file is created with mode
/// 0600 and an existing one is narrowed to 0600 before it is truncated.
fn open_private(path: &Path) -> io::Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.set_len(0)?;
        Ok(file)
    }

    #[cfg(not(unix))]
    {
        OpenOptions::new().write(true).create(true).truncate(true).open(path)
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<StoredSession, AppError> {
        self.inner
            .lock()
            .map(|session| session.clone())
            .map_err(|_| AppError::Storage("session lock poisoned".to_string()))
    }

    fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("session lock poisoned".to_string()))?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.save(&StoredSession::default())
    }
}
