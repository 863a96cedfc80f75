//! Alpha-threshold visibility test.

/// A sample is materialized iff its alpha is at least the threshold.
///
/// A threshold of 0 makes every sample visible, including fully
/// transparent ones; 255 requires full opacity.
#[inline]
pub fn is_visible(alpha: u8, threshold: u8) -> bool {
    alpha >= threshold
}
