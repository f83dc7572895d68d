// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One JSON file per config key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::{ConfigError, ConfigStore};

/// Keeps each document in `<dir>/<key>.json`.
///
/// The directory is created on the first write; reading from a missing
/// directory finds no documents.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    dir: PathBuf,
}

impl FsConfigStore {
    /// The per-user config directory (e.g. `~/.config/flowtag` on Linux).
    pub fn platform() -> Result<Self, ConfigError> {
        let dirs =
            ProjectDirs::from("dev", "flyingrobots", "flowtag").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir()))
    }

    /// An explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        let path = self.document_path(key);
        match fs::read(&path) {
            Ok(document) => {
                debug!(path = %path.display(), "read config document");
                Ok(Some(document))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, document: &[u8]) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.dir).map_err(|source| ConfigError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.document_path(key);
        fs::write(&path, document).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = document.len(), "wrote config document");
        Ok(())
    }
}
