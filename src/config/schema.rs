//! Configuration schema types for `img2gd.toml`
//!
//! Defines the structure and validation rules for converter configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::convert::{Origin, DEFAULT_ALPHA_THRESHOLD, DEFAULT_EDITOR_LAYER};

/// Largest editor layer the level editor accepts.
pub const MAX_EDITOR_LAYER: u16 = i16::MAX as u16;

/// Conversion defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Editor layer placements are assigned to
    #[serde(default = "default_editor_layer")]
    pub editor_layer: u16,
    /// Alpha at or above which a pixel is placed
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
    /// Placement origin `[x, y]` in level units
    #[serde(default)]
    pub origin: [i32; 2],
    /// Level revision to convert into
    #[serde(default)]
    pub revision: u32,
}

impl ConvertConfig {
    pub fn origin(&self) -> Origin {
        Origin::from(self.origin)
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            editor_layer: default_editor_layer(),
            alpha_threshold: default_alpha_threshold(),
            origin: [0, 0],
            revision: 0,
        }
    }
}

fn default_editor_layer() -> u16 {
    DEFAULT_EDITOR_LAYER
}

fn default_alpha_threshold() -> u8 {
    DEFAULT_ALPHA_THRESHOLD
}

/// Save data locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the level save (platform default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
    /// Directory backups are written to
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    /// Back up save data before converting
    #[serde(default = "default_true")]
    pub backup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { save_dir: None, backup_dir: default_backup_dir(), backup: true }
    }
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_true() -> bool {
    true
}

/// Diagnostic output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory log files are written to
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    /// Mirror console output into a timestamped log file
    #[serde(default = "default_true")]
    pub file: bool,
    /// Emit debug lines
    #[serde(default)]
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { dir: default_log_dir(), file: true, verbose: false }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Root configuration structure for `img2gd.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Img2gdConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "storage.backup_dir")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "img2gd.toml: '{}' {}", self.field, self.message)
    }
}

impl Img2gdConfig {
    /// Validate the configuration and return all errors found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.convert.editor_layer > MAX_EDITOR_LAYER {
            errors.push(ConfigValidationError {
                field: "convert.editor_layer".to_string(),
                message: format!("must be at most {}", MAX_EDITOR_LAYER),
            });
        }

        if matches!(&self.storage.save_dir, Some(dir) if dir.as_os_str().is_empty()) {
            errors.push(ConfigValidationError {
                field: "storage.save_dir".to_string(),
                message: "must be a non-empty path when set".to_string(),
            });
        }

        if self.storage.backup && self.storage.backup_dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "storage.backup_dir".to_string(),
                message: "must be a non-empty path when backups are enabled".to_string(),
            });
        }

        if self.log.file && self.log.dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "log.dir".to_string(),
                message: "must be a non-empty path when log files are enabled".to_string(),
            });
        }

        errors
    }

    /// Check if the configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
