//! File-backed persistence of the client session between CLI invocations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::project_dirs;
use crate::session::Session;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store bound to the platform-specific data directory.
    pub fn new() -> io::Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self {
            path: dirs.data_dir().join("session.json"),
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session; a missing or unreadable file starts a fresh one.
    pub fn load(&self) -> Session {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Session::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            debug!("Discarding unreadable session file: {}", err);
            Session::default()
        })
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)
    }
}
