//! In-memory level document.
//!
//! A `LevelDocument` is the editable form of one level: header properties,
//! the color table and the list of placed objects. Objects already in a
//! loaded level are kept as-is, including properties this tool does not
//! interpret, so that saving a converted level never loses content.

mod codec;

use thiserror::Error;

use crate::color::{DeltaHsv, Rgb};

/// Highest color channel id the color table accepts.
pub const MAX_COLOR_CHANNEL: u16 = 999;

/// Error type for level document parsing and mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// An object segment could not be parsed
    #[error("malformed object #{index}: {reason}")]
    MalformedObject { index: usize, reason: String },
    /// The header section could not be parsed
    #[error("malformed level header: {0}")]
    MalformedHeader(String),
    /// A color channel entry could not be parsed
    #[error("malformed color channel '{0}'")]
    MalformedColor(String),
    /// Color channel id outside 1..=999
    #[error("color channel {0} is out of range (1-999)")]
    InvalidColorChannel(u16),
    /// Opacity outside [0, 1]
    #[error("color channel {id} has invalid opacity {opacity}")]
    InvalidOpacity { id: u16, opacity: f32 },
    /// A placement was rejected
    #[error("placement rejected: {0}")]
    InvalidPlacement(String),
}

/// One entry of the level's color table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorChannel {
    pub id: u16,
    pub rgb: Rgb,
    pub opacity: f32,
    pub blending: bool,
    /// Properties kept verbatim from a loaded level
    pub extra: Vec<(String, String)>,
}

impl ColorChannel {
    pub fn new(id: u16, rgb: Rgb) -> Self {
        Self { id, rgb, opacity: 1.0, blending: false, extra: Vec::new() }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A placement produced by image conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub object_id: u32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub color_channel: u16,
    pub hsv: DeltaHsv,
    pub editor_layer: u16,
}

/// Any object in a level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelObject {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub editor_layer: Option<u16>,
    pub color_channel: Option<u16>,
    pub scale: Option<f32>,
    pub hsv: Option<DeltaHsv>,
    /// Properties kept verbatim from a loaded level, in original order
    pub extra: Vec<(u32, String)>,
}

impl From<Placement> for LevelObject {
    fn from(p: Placement) -> Self {
        Self {
            id: p.object_id,
            x: p.x,
            y: p.y,
            editor_layer: Some(p.editor_layer),
            color_channel: Some(p.color_channel),
            scale: Some(p.scale),
            hsv: Some(p.hsv),
            extra: Vec::new(),
        }
    }
}

/// The editable content of one level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelDocument {
    header: Vec<(String, String)>,
    colors: Vec<ColorChannel>,
    objects: Vec<LevelObject>,
}

impl LevelDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a level string.
    pub fn parse(data: &str) -> Result<Self, LevelError> {
        codec::decode(data)
    }

    /// Encode back into a level string.
    pub fn encode(&self) -> String {
        codec::encode(self)
    }

    /// Register a color channel. An existing entry with the same id is replaced.
    pub fn add_color_channel(&mut self, channel: ColorChannel) -> Result<(), LevelError> {
        if channel.id == 0 || channel.id > MAX_COLOR_CHANNEL {
            return Err(LevelError::InvalidColorChannel(channel.id));
        }
        if !(0.0..=1.0).contains(&channel.opacity) {
            return Err(LevelError::InvalidOpacity { id: channel.id, opacity: channel.opacity });
        }

        match self.colors.iter_mut().find(|c| c.id == channel.id) {
            Some(existing) => *existing = channel,
            None => self.colors.push(channel),
        }
        Ok(())
    }

    /// Append a placement to the object list.
    pub fn add_placement(&mut self, placement: Placement) -> Result<(), LevelError> {
        if placement.object_id == 0 {
            return Err(LevelError::InvalidPlacement("object id 0".to_string()));
        }
        if !placement.x.is_finite() || !placement.y.is_finite() {
            return Err(LevelError::InvalidPlacement(format!(
                "non-finite position ({}, {})",
                placement.x, placement.y
            )));
        }
        if !placement.scale.is_finite() || placement.scale <= 0.0 {
            return Err(LevelError::InvalidPlacement(format!("invalid scale {}", placement.scale)));
        }
        if placement.color_channel == 0 || placement.color_channel > MAX_COLOR_CHANNEL {
            return Err(LevelError::InvalidColorChannel(placement.color_channel));
        }
        if !placement.hsv.is_in_range() {
            return Err(LevelError::InvalidPlacement(format!("HSV {} out of range", placement.hsv)));
        }

        self.objects.push(placement.into());
        Ok(())
    }

    pub fn color_channel(&self, id: u16) -> Option<&ColorChannel> {
        self.colors.iter().find(|c| c.id == id)
    }

    pub fn colors(&self) -> &[ColorChannel] {
        &self.colors
    }

    pub fn objects(&self) -> &[LevelObject] {
        &self.objects
    }

    pub fn header(&self) -> &[(String, String)] {
        &self.header
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            object_id: 211,
            x: 2.5,
            y: 2.5,
            scale: 5.0,
            color_channel: 999,
            hsv: DeltaHsv::identity(),
            editor_layer: 0,
        }
    }

    #[test]
    fn test_add_color_channel_replaces_same_id() {
        let mut doc = LevelDocument::new();
        doc.add_color_channel(ColorChannel::new(999, Rgb::new(255, 0, 0))).unwrap();
        doc.add_color_channel(ColorChannel::new(999, Rgb::new(0, 0, 255))).unwrap();
        assert_eq!(doc.color_count(), 1);
        assert_eq!(doc.color_channel(999).unwrap().rgb, Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_add_color_channel_rejects_bad_entries() {
        let mut doc = LevelDocument::new();
        assert_eq!(
            doc.add_color_channel(ColorChannel::new(0, Rgb::default())),
            Err(LevelError::InvalidColorChannel(0))
        );
        assert_eq!(
            doc.add_color_channel(ColorChannel::new(1000, Rgb::default())),
            Err(LevelError::InvalidColorChannel(1000))
        );
        let translucent = ColorChannel::new(1, Rgb::default()).with_opacity(1.5);
        assert!(doc.add_color_channel(translucent).is_err());
        assert_eq!(doc.color_count(), 0);
    }

    #[test]
    fn test_add_placement() {
        let mut doc = LevelDocument::new();
        doc.add_placement(placement()).unwrap();
        doc.add_placement(placement()).unwrap();

        // No deduplication of overlapping placements
        assert_eq!(doc.object_count(), 2);
        let obj = &doc.objects()[0];
        assert_eq!(obj.id, 211);
        assert_eq!(obj.color_channel, Some(999));
        assert_eq!(obj.scale, Some(5.0));
        assert_eq!(obj.editor_layer, Some(0));
    }

    #[test]
    fn test_add_placement_rejects_invalid() {
        let mut doc = LevelDocument::new();
        assert!(doc.add_placement(Placement { x: f32::NAN, ..placement() }).is_err());
        assert!(doc.add_placement(Placement { y: f32::INFINITY, ..placement() }).is_err());
        assert!(doc.add_placement(Placement { object_id: 0, ..placement() }).is_err());
        assert!(doc.add_placement(Placement { scale: 0.0, ..placement() }).is_err());
        assert!(doc.add_placement(Placement { color_channel: 1000, ..placement() }).is_err());
        let hsv = DeltaHsv { brightness: 2.0, ..DeltaHsv::identity() };
        assert!(doc.add_placement(Placement { hsv, ..placement() }).is_err());
        assert_eq!(doc.object_count(), 0);
    }
}
