use crate::foundation::error::{StampError, StampResult};

pub use kurbo::{Point, Vec2};

/// Straight-alpha RGBA color with components in `[0, 1]`.
pub type Rgbaf = [f32; 4];

/// Canvas or image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> StampResult<Self> {
        if width == 0 || height == 0 {
            return Err(StampError::validation("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Return `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size as a floating-point vector.
    pub fn size(self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// Geometric center in pixel units.
    pub fn center(self) -> Point {
        (self.size() * 0.5).to_point()
    }

    /// Length of the shorter side.
    pub fn min_side(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Length of the longer side.
    pub fn max_side(self) -> f64 {
        f64::from(self.width.max(self.height))
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> StampResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StampError::render("rgba8 buffer size overflow"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
