//! Placement construction and append.

use super::error::ConvertError;
use super::mapper::LevelPoint;
use crate::color::DeltaHsv;
use crate::level::{LevelDocument, Placement};

/// Object id of the block placed for every visible pixel.
pub const PIXEL_BLOCK_ID: u32 = 211;

/// Uniform scale of every placed block.
pub const PLACEMENT_SCALE: f32 = 5.0;

/// Builds placements that share one color channel and editor layer and
/// appends them to a level document.
#[derive(Debug, Clone)]
pub struct PlacementEmitter {
    color_channel: u16,
    editor_layer: u16,
    emitted: usize,
}

impl PlacementEmitter {
    pub fn new(color_channel: u16, editor_layer: u16) -> Self {
        Self { color_channel, editor_layer, emitted: 0 }
    }

    /// Build the placement for one pixel.
    pub fn placement(&self, point: LevelPoint, hsv: DeltaHsv) -> Placement {
        Placement {
            object_id: PIXEL_BLOCK_ID,
            x: point.x,
            y: point.y,
            scale: PLACEMENT_SCALE,
            color_channel: self.color_channel,
            hsv,
            editor_layer: self.editor_layer,
        }
    }

    /// Append one placement. A rejected append is fatal to the run.
    pub fn emit(
        &mut self,
        doc: &mut LevelDocument,
        point: LevelPoint,
        hsv: DeltaHsv,
    ) -> Result<(), ConvertError> {
        let placement = self.placement(point, hsv);
        doc.add_placement(placement).map_err(|source| ConvertError::DocumentMutation {
            what: format!("placement at ({}, {})", point.x, point.y),
            source,
        })?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of placements appended so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
