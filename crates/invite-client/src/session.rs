use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use invite_engine::SessionIdentityProvider;

use crate::error::ClientError;

/// Browser-session id kept in a small file so the same device keeps its
/// reaction fingerprint across runs.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    session_id: String,
}

impl FileSessionStore {
    /// Reads the stored id, or generates and persists a fresh one when the
    /// file is missing or empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();

        let stored = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let session_id = match stored {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().simple().to_string();
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, &id)?;
                info!(path = %path.display(), "New browser session created");
                id
            }
        };

        Ok(Self { path, session_id })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionIdentityProvider for FileSessionStore {
    fn browser_session_id(&self) -> String {
        self.session_id.clone()
    }
}
