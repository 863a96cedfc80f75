//! Decoded image access.

use std::path::Path;

use image::io::Reader;
use image::{ImageError, RgbaImage};

use crate::convert::ConvertError;

/// A read-only 2-D grid of RGBA samples, origin top-left.
pub trait SampleGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// `[r, g, b, a]` at column `x`, row `y`.
    fn sample(&self, x: u32, y: u32) -> [u8; 4];
}

impl SampleGrid for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

/// Decode an image file into an RGBA grid.
///
/// The format is detected from the file content, not its extension. A
/// missing file is `SourceNotFound`; anything the decoder cannot read is
/// `Decode`.
pub fn load_image(path: &Path) -> Result<RgbaImage, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::SourceNotFound(path.to_path_buf()));
    }
    let decode_err = |source: ImageError| ConvertError::Decode { path: path.to_path_buf(), source };
    let img = Reader::open(path)
        .and_then(Reader::with_guessed_format)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    Ok(img.to_rgba8())
}
