//! File-backed level store.
//!
//! Levels live in `CCLocalLevels.json` inside the save directory. Each entry
//! carries the level's metadata and its level string. `CCGameManager.json`
//! is not read, but is included in backups when present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LevelHandle, LevelInfo, LevelStore, StoreError};
use crate::level::LevelDocument;

/// Name of the level save file.
pub const LOCAL_LEVELS_FILE: &str = "CCLocalLevels.json";

/// Name of the game manager save file.
pub const GAME_MANAGER_FILE: &str = "CCGameManager.json";

fn default_binary_version() -> u32 {
    35
}

/// One level as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub name: String,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub song_id: u32,
    #[serde(default = "default_binary_version")]
    pub binary_version: u32,
    /// Encoded level string
    #[serde(default)]
    pub data: String,
}

impl LevelRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: 0,
            author: String::new(),
            song_id: 0,
            binary_version: default_binary_version(),
            data: String::new(),
        }
    }

    fn info(&self) -> LevelInfo {
        LevelInfo {
            name: self.name.clone(),
            revision: self.revision,
            author: self.author.clone(),
            song_id: self.song_id,
            binary_version: self.binary_version,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default)]
    levels: Vec<LevelRecord>,
}

/// Levels stored in a save directory.
#[derive(Debug)]
pub struct LocalLevels {
    dir: PathBuf,
    save: SaveFile,
}

impl LocalLevels {
    /// Open the level save in `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(LOCAL_LEVELS_FILE);
        if !path.exists() {
            return Err(StoreError::SaveNotFound(path));
        }
        let contents = fs::read_to_string(&path)?;
        let save: SaveFile = serde_json::from_str(&contents)?;
        Ok(Self { dir: dir.to_path_buf(), save })
    }

    /// Create a save in `dir` holding `records` and write it out.
    pub fn create(dir: &Path, records: Vec<LevelRecord>) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let mut store = Self { dir: dir.to_path_buf(), save: SaveFile { levels: records } };
        store.persist()?;
        Ok(store)
    }

    /// Path of the level save file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(LOCAL_LEVELS_FILE)
    }

    fn find(&self, name: &str, revision: u32) -> Option<&LevelRecord> {
        self.save.levels.iter().find(|l| l.name == name && l.revision == revision)
    }
}

impl LevelStore for LocalLevels {
    fn level_exists(&self, name: &str) -> bool {
        self.save.levels.iter().any(|l| l.name == name)
    }

    fn get_level(&self, name: &str, revision: u32) -> Result<LevelHandle, StoreError> {
        self.find(name, revision)
            .map(|record| LevelHandle::new(record.info()))
            .ok_or_else(|| StoreError::LevelNotFound { name: name.to_string(), revision })
    }

    fn load(&self, handle: &LevelHandle) -> Result<LevelDocument, StoreError> {
        let record = self.find(handle.name(), handle.revision()).ok_or_else(|| {
            StoreError::LevelNotFound {
                name: handle.name().to_string(),
                revision: handle.revision(),
            }
        })?;
        LevelDocument::parse(&record.data)
            .map_err(|source| StoreError::Corrupt { name: record.name.clone(), source })
    }

    fn save(&mut self, handle: &LevelHandle, doc: &LevelDocument) -> Result<(), StoreError> {
        let record = self
            .save
            .levels
            .iter_mut()
            .find(|l| l.name == handle.name() && l.revision == handle.revision())
            .ok_or_else(|| StoreError::LevelNotFound {
                name: handle.name().to_string(),
                revision: handle.revision(),
            })?;
        record.data = doc.encode();
        Ok(())
    }

    fn levels(&self) -> Vec<LevelInfo> {
        self.save.levels.iter().map(LevelRecord::info).collect()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.save)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn data_files(&self) -> Vec<PathBuf> {
        [LOCAL_LEVELS_FILE, GAME_MANAGER_FILE]
            .iter()
            .map(|name| self.dir.join(name))
            .filter(|p| p.exists())
            .collect()
    }
}
