//! Scroll restoration across launches.
//!
//! The page offset is persisted to `session.json` in the Folio home directory
//! on exit and read back on the next interactive launch, so the view reopens
//! where the reader left it. The scroll observer then derives the header
//! phase from that restored offset before the first frame is drawn.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_types::ScrollOffset;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to create session directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to encode session state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write session state to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Persisted view state.
///
/// Files written by a newer Folio carry a higher `version` and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub version: u32,
    pub scroll_offset: ScrollOffset,
}

impl SessionState {
    pub const FILENAME: &'static str = "session.json";
    pub const CURRENT_VERSION: u32 = 1;

    #[must_use]
    pub fn new(scroll_offset: ScrollOffset) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            scroll_offset,
        }
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version <= Self::CURRENT_VERSION
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SessionState::FILENAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted state. Missing, unreadable or incompatible files
    /// all mean "start at the top".
    #[must_use]
    pub fn load(&self) -> Option<SessionState> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read session state: {e}");
                return None;
            }
        };

        match serde_json::from_str::<SessionState>(&data) {
            Ok(state) if state.is_compatible() => {
                tracing::debug!(
                    offset = state.scroll_offset.rows(),
                    "Loaded session state from {}",
                    self.path.display()
                );
                Some(state)
            }
            Ok(_) => {
                tracing::debug!("Session state version mismatch, starting fresh");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to parse session state: {e}");
                None
            }
        }
    }

    pub fn save(&self, state: SessionState) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SessionError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&state)?;
        folio_utils::atomic_write(&self.path, json.as_bytes()).map_err(|source| {
            SessionError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_types::ScrollOffset;

    use super::{SessionState, SessionStore};

    #[test]
    fn saved_offset_is_restored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::in_dir(&dir.path().join("nested"));

        store
            .save(SessionState::new(ScrollOffset::new(42)))
            .expect("save");
        let restored = store.load().expect("state present");
        assert_eq!(restored.scroll_offset, ScrollOffset::new(42));
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(SessionStore::in_dir(dir.path()).load().is_none());
    }

    #[test]
    fn newer_version_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"version": 99, "scroll_offset": 30}"#).expect("write");
        assert!(store.load().is_none());
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").expect("write");
        assert!(store.load().is_none());
    }
}
