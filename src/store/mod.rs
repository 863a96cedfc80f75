//! Level storage.
//!
//! A `LevelStore` enumerates the levels in a save, hands out editable
//! `LevelDocument`s and writes edited documents back. Conversion never
//! talks to storage directly; the run pipeline loads one document, hands it
//! to the converter and saves it once the sweep has completed.

mod local;

use std::path::PathBuf;

use thiserror::Error;

use crate::level::{LevelDocument, LevelError};

pub use local::{LevelRecord, LocalLevels, GAME_MANAGER_FILE, LOCAL_LEVELS_FILE};

/// Error type for level storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No level with this name and revision
    #[error("Level \"{name}\" (revision {revision}) does not exist!")]
    LevelNotFound { name: String, revision: u32 },
    /// The save file itself is missing
    #[error("Save data not found at \"{}\"", .0.display())]
    SaveNotFound(PathBuf),
    /// File I/O error
    #[error("Failed to access save data: {0}")]
    Io(#[from] std::io::Error),
    /// Save file is not valid JSON
    #[error("Failed to parse save data: {0}")]
    Parse(#[from] serde_json::Error),
    /// A level's data string could not be decoded
    #[error("Level \"{name}\" has corrupt level data: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: LevelError,
    },
}

/// Metadata of one stored level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    pub name: String,
    pub revision: u32,
    pub author: String,
    pub song_id: u32,
    pub binary_version: u32,
}

/// Identifies one level in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelHandle {
    info: LevelInfo,
}

impl LevelHandle {
    pub fn new(info: LevelInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &LevelInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn revision(&self) -> u32 {
        self.info.revision
    }
}

/// Storage of levels by name and revision.
pub trait LevelStore {
    /// Whether any revision of `name` exists.
    fn level_exists(&self, name: &str) -> bool;

    /// Look up one level. Fails with `LevelNotFound` when absent.
    fn get_level(&self, name: &str, revision: u32) -> Result<LevelHandle, StoreError>;

    /// Decode a level into an editable document.
    fn load(&self, handle: &LevelHandle) -> Result<LevelDocument, StoreError>;

    /// Replace a level's content with `doc`. Not durable until `persist`.
    fn save(&mut self, handle: &LevelHandle, doc: &LevelDocument) -> Result<(), StoreError>;

    /// All levels in storage order.
    fn levels(&self) -> Vec<LevelInfo>;

    /// Write all saved changes to durable storage.
    fn persist(&mut self) -> Result<(), StoreError>;

    /// Files holding this store's data, for backups.
    fn data_files(&self) -> Vec<PathBuf>;
}
