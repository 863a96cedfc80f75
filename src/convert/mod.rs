//! Pixel-to-placement conversion.
//!
//! This module provides functionality to:
//! - Gate each pixel on an alpha threshold
//! - Map pixel indices to level-space cell centers with the vertical axis flipped
//! - Encode pixel color as a delta-HSV offset from one shared reference channel
//! - Append one block placement per visible pixel to a level document
//!
//! Alpha never affects the placed color; it only decides visibility.

mod emitter;
mod error;
mod mapper;
mod visibility;

pub use emitter::{PlacementEmitter, PIXEL_BLOCK_ID, PLACEMENT_SCALE};
pub use error::ConvertError;
pub use mapper::{CoordinateMapper, LevelPoint, Origin, CELL_CENTER, CELL_SPACING};
pub use visibility::is_visible;

use crate::color::{DeltaHsv, Rgb};
use crate::grid::SampleGrid;
use crate::level::{ColorChannel, LevelDocument};
use crate::report::Reporter;

/// Color channel every placement references.
pub const REFERENCE_CHANNEL_ID: u16 = 999;

/// Seed RGB of the reference channel. Any fully saturated, fully bright
/// color works; placements override it through their HSV offsets.
pub const REFERENCE_SEED: Rgb = Rgb::new(255, 0, 0);

/// Alpha at or above which a pixel is placed.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Editor layer placements are assigned to.
pub const DEFAULT_EDITOR_LAYER: u16 = 0;

/// The shared color channel placements offset from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceChannel {
    pub id: u16,
    pub seed: Rgb,
}

impl ReferenceChannel {
    /// Build the color table entry, checking the seed is fully saturated and
    /// fully bright. Delta encoding is only correct against such a channel.
    pub fn to_color_channel(&self) -> Result<ColorChannel, ConvertError> {
        let hsv = self.seed.to_hsv();
        if hsv.saturation < 1.0 || hsv.value < 1.0 {
            return Err(ConvertError::InvalidReference { id: self.id, rgb: self.seed });
        }
        Ok(ColorChannel::new(self.id, self.seed).with_opacity(1.0))
    }
}

impl Default for ReferenceChannel {
    fn default() -> Self {
        Self { id: REFERENCE_CHANNEL_ID, seed: REFERENCE_SEED }
    }
}

/// Parameters of one conversion sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    pub alpha_threshold: u8,
    pub origin: Origin,
    pub editor_layer: u16,
    pub reference: ReferenceChannel,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            origin: Origin::default(),
            editor_layer: DEFAULT_EDITOR_LAYER,
            reference: ReferenceChannel::default(),
        }
    }
}

/// Outcome of a conversion sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub width: u32,
    pub height: u32,
    /// Placements appended
    pub placed: usize,
    /// Pixels below the alpha threshold
    pub skipped: usize,
}

/// Convert every visible pixel of `grid` into a placement in `doc`.
///
/// The reference channel is registered before any placement. Pixels are
/// visited column by column; placement order carries no meaning. On error
/// `doc` may hold a partial sweep and must not be persisted.
pub fn convert_image<G: SampleGrid + ?Sized>(
    grid: &G,
    options: &ConvertOptions,
    doc: &mut LevelDocument,
    reporter: &dyn Reporter,
) -> Result<ConvertSummary, ConvertError> {
    let channel = options.reference.to_color_channel()?;
    doc.add_color_channel(channel).map_err(|source| ConvertError::DocumentMutation {
        what: format!("color channel {}", options.reference.id),
        source,
    })?;
    reporter.debug(&format!(
        "Registered reference color channel {} ({})",
        options.reference.id, options.reference.seed
    ));

    let (width, height) = (grid.width(), grid.height());
    let mapper = CoordinateMapper::new(height, options.origin);
    let mut emitter = PlacementEmitter::new(options.reference.id, options.editor_layer);
    let mut skipped = 0;

    reporter.debug(&format!(
        "Sweeping {}x{} pixels (threshold {}, origin {}, layer {})",
        width, height, options.alpha_threshold, options.origin, options.editor_layer
    ));

    for x in 0..width {
        for y in 0..height {
            let [r, g, b, a] = grid.sample(x, y);
            if !is_visible(a, options.alpha_threshold) {
                skipped += 1;
                continue;
            }
            let point = mapper.map(x, y);
            let hsv = DeltaHsv::from_rgb(Rgb::new(r, g, b));
            emitter.emit(doc, point, hsv)?;
        }
    }

    Ok(ConvertSummary { width, height, placed: emitter.emitted(), skipped })
}
