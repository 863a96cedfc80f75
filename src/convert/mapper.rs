//! Pixel index to level-space coordinate mapping.
//!
//! Image rows grow downward from the top; level space grows upward from
//! the bottom-left. Each pixel owns one `CELL_SPACING`-wide cell and its
//! placement is anchored at the cell center.

use std::fmt;
use std::str::FromStr;

/// Width and height of one pixel cell in level units.
pub const CELL_SPACING: f32 = 5.0;

/// Offset from a cell corner to its center.
pub const CELL_CENTER: f32 = 2.5;

/// Integer offset applied to every placement, in level units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

impl Origin {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<[i32; 2]> for Origin {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl FromStr for Origin {
    type Err = String;

    /// Parse `"x,y"`, e.g. `"10,-20"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or_else(|| format!("expected 'x,y', got '{}'", s))?;
        let (x, y) = (x.trim(), y.trim());
        let x = x.parse::<i32>().map_err(|_| format!("invalid x coordinate '{}'", x))?;
        let y = y.parse::<i32>().map_err(|_| format!("invalid y coordinate '{}'", y))?;
        Ok(Self { x, y })
    }
}

/// A position in level space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPoint {
    pub x: f32,
    pub y: f32,
}

/// Maps `(column, row)` of an image of fixed height to level space.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    height: u32,
    origin: Origin,
}

impl CoordinateMapper {
    pub fn new(height: u32, origin: Origin) -> Self {
        Self { height, origin }
    }

    /// `x = column * 5 + 2.5 + ox`, `y = (height - row - 1) * 5 + 2.5 + oy`.
    ///
    /// `row` must be below the image height.
    pub fn map(&self, column: u32, row: u32) -> LevelPoint {
        debug_assert!(row < self.height, "row {} outside image of height {}", row, self.height);
        let flipped = self.height - row - 1;
        LevelPoint {
            x: column as f32 * CELL_SPACING + CELL_CENTER + self.origin.x as f32,
            y: flipped as f32 * CELL_SPACING + CELL_CENTER + self.origin.y as f32,
        }
    }
}
