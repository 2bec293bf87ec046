//! Where the win progression lives between runs.
//!
//! The simulation never touches storage; a [`crate::Session`] reads the
//! record once at startup and writes it after each victory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::game::Progression;

/// Key-value style storage for a single progression record.
pub trait ProgressStore {
    /// Read the stored record, `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails or holds garbage.
    fn load(&self) -> Result<Option<Progression>, StoreError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record could not be written.
    fn save(&mut self, progression: &Progression) -> Result<(), StoreError>;
}

/// In-memory store, for tests and throwaway sessions.
// Stores are owned by one session.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<Progression>,
    saves: usize,
}

impl MemoryStore {
    /// A store that already holds a record.
    #[must_use]
    pub const fn with(progression: Progression) -> Self {
        Self {
            record: Some(progression),
            saves: 0,
        }
    }

    /// How many times `save` was called.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Option<Progression>, StoreError> {
        Ok(self.record)
    }

    fn save(&mut self, progression: &Progression) -> Result<(), StoreError> {
        self.record = Some(*progression);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store. Writes go through a sibling temp file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<Option<Progression>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&mut self, progression: &Progression) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(progression)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
