//! One complete conversion run against a level store.
//!
//! Order of operations:
//! 1. The source image must exist
//! 2. Save data is backed up (when enabled)
//! 3. The target level must exist
//! 4. The level is loaded and the image decoded
//! 5. The sweep runs against the in-memory document
//! 6. The document is saved and the store persisted
//!
//! Any error stops the run and nothing is persisted.

use std::path::PathBuf;

use crate::backup::backup_files;
use crate::convert::{convert_image, ConvertError, ConvertOptions, ConvertSummary};
use crate::grid::load_image;
use crate::report::Reporter;
use crate::store::LevelStore;

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Source image
    pub image: PathBuf,
    /// Target level name
    pub level: String,
    /// Target level revision
    pub revision: u32,
    /// Backup directory; `None` disables backups
    pub backup_dir: Option<PathBuf>,
    pub options: ConvertOptions,
}

/// Convert `params.image` into the named level and persist the result.
pub fn run(
    params: &RunParams,
    store: &mut dyn LevelStore,
    reporter: &dyn Reporter,
) -> Result<ConvertSummary, ConvertError> {
    if !params.image.exists() {
        return Err(ConvertError::SourceNotFound(params.image.clone()));
    }

    if let Some(ref dir) = params.backup_dir {
        backup_files(&store.data_files(), dir, reporter)?;
    }

    if !store.level_exists(&params.level) {
        return Err(ConvertError::LevelNotFound {
            name: params.level.clone(),
            revision: params.revision,
        });
    }
    let handle = store.get_level(&params.level, params.revision)?;
    let info = handle.info();
    reporter.info(&format!(
        "Loading level \"{} by {}\" [Song id: {}]",
        info.name, info.author, info.song_id
    ));

    let mut doc = store.load(&handle)?;
    reporter.debug(&format!(
        "bv:{},r:{},b:{},c:{}",
        info.binary_version,
        info.revision,
        doc.object_count(),
        doc.color_count()
    ));

    let summary = {
        let image = load_image(&params.image)?;
        convert_image(&image, &params.options, &mut doc, reporter)?
    };
    reporter.info(&format!("Drawn pixels: {}", summary.placed));
    if summary.skipped > 0 {
        reporter.debug(&format!(
            "Skipped {} pixels below alpha {}",
            summary.skipped, params.options.alpha_threshold
        ));
    }

    reporter.info("Saving data...");
    store.save(&handle, &doc)?;
    store.persist()?;

    Ok(summary)
}
