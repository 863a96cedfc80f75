//! Img2GD - Draw raster images into Geometry Dash levels
//!
//! Every visible pixel of a source image becomes one block placed in an
//! existing level. Blocks share a single reference color channel and are
//! tinted per pixel with a delta HSV adjustment.
//!
//! The library provides:
//! - A level string codec and in-memory level document
//! - The pixel sweep (visibility filter, coordinate mapper, color transcoder, placement emitter)
//! - A file-backed level store with backups
//! - Leveled console logging and `img2gd.toml` configuration

pub mod backup;
pub mod cli;
pub mod color;
pub mod config;
pub mod convert;
pub mod grid;
pub mod level;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod timestamp;
