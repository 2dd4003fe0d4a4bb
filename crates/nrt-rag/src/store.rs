//! Atomic single-file index persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use nrt_core::{Error, Result};

use crate::index::VectorIndex;

/// Version stamp of the on-disk format.
pub const FORMAT_VERSION: u32 = 1;

/// Default persisted index path, next to the working directory.
pub const DEFAULT_INDEX_PATH: &str = "news_index.json";

/// On-disk envelope around a serialized index.
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    built_at: DateTime<Utc>,
    index: VectorIndex,
}

/// Storage for the persisted index: one JSON file, replaced atomically.
///
/// The file is either a complete previously-successful write or absent; a
/// failed save never leaves a partial file for the query stage to read.
/// The backing store is encapsulated here so ingestion and query logic
/// never touch the filesystem directly.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a persisted index exists. A precondition check for the
    /// query operation's user-facing surface.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted index.
    ///
    /// Returns `IndexNotFound` when the file is absent (user-correctable)
    /// and `Persistence` when it exists but cannot be read back.
    pub fn load(&self) -> Result<VectorIndex> {
        if !self.path.exists() {
            return Err(Error::IndexNotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let persisted: PersistedIndex = serde_json::from_str(&content)
            .map_err(|e| Error::Persistence(format!("corrupt index file: {}", e)))?;

        if persisted.version != FORMAT_VERSION {
            return Err(Error::Persistence(format!(
                "unsupported index format version {} (expected {})",
                persisted.version, FORMAT_VERSION
            )));
        }

        Ok(persisted.index)
    }

    /// Persist the index, atomically replacing any prior file.
    ///
    /// Serializes to a temporary file in the target directory, then renames
    /// it over the target path so a reader never observes a half-written
    /// file. On failure the previous file is left untouched.
    pub fn save(&self, index: &VectorIndex) -> Result<()> {
        let persisted = PersistedIndex {
            version: FORMAT_VERSION,
            built_at: Utc::now(),
            index: index.clone(),
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir)
            .map_err(|e| Error::Persistence(format!("cannot create temp file in {}: {}", dir.display(), e)))?;

        serde_json::to_writer(tmp.as_file(), &persisted)
            .map_err(|e| Error::Persistence(format!("cannot serialize index: {}", e)))?;

        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::Persistence(format!("cannot flush index file: {}", e)))?;

        tmp.persist(&self.path)
            .map_err(|e| Error::Persistence(format!("cannot replace {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}
