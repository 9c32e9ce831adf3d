use crate::domain::session::{Navigator, SessionStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// What the login flow persists: the bearer token under `token` and the
/// logged-in identity under `user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

/// Session kept in a JSON file so it survives between runs.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.load()
            .and_then(|s| s.token)
            .filter(|t| !t.trim().is_empty())
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(path = %self.path.display(), "session cleared"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to clear session file")
            }
        }
    }
}

/// In-process session, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(StoredSession {
                token: Some(token.into()),
                user: None,
            }),
        }
    }

    pub fn set(&self, session: StoredSession) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub fn user(&self) -> Option<Value> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    fn clear(&self) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = StoredSession::default();
    }
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
