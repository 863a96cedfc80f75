//! Error types for image conversion runs

use std::path::PathBuf;

use thiserror::Error;

use crate::color::Rgb;
use crate::level::LevelError;
use crate::store::StoreError;

/// A fatal condition that aborts a conversion run.
///
/// Every variant except `DocumentMutation` is raised before the level
/// document is touched. Nothing is persisted on any of them.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source image path does not exist
    #[error("File \"{}\" does not exist!", .0.display())]
    SourceNotFound(PathBuf),
    /// The named level/revision is not in the store
    #[error("Level \"{name}\" (revision {revision}) does not exist!")]
    LevelNotFound { name: String, revision: u32 },
    /// The source image could not be decoded
    #[error("Failed to decode \"{}\": {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The level document rejected a color registration or placement
    #[error("Level document rejected {what}: {source}")]
    DocumentMutation {
        what: String,
        #[source]
        source: LevelError,
    },
    /// The reference channel seed is not fully saturated and fully bright
    #[error("Reference color channel {id} ({rgb}) must have full saturation and brightness")]
    InvalidReference { id: u16, rgb: Rgb },
    /// Any other level-store failure
    #[error(transparent)]
    Store(StoreError),
    /// File I/O error outside the store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ConvertError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::LevelNotFound { name, revision } => {
                ConvertError::LevelNotFound { name, revision }
            }
            other => ConvertError::Store(other),
        }
    }
}
