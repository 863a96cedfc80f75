//! Configuration module for img2gd
//!
//! Provides types and parsing for `img2gd.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
