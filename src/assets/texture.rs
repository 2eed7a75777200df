use std::sync::Arc;

use crate::foundation::core::{Canvas, Point, Rgbaf};
use crate::foundation::error::{StampError, StampResult};

/// Immutable raster asset in straight-alpha RGBA8.
///
/// Used for all three roles (product color, depth, pattern). Depth maps are read through the red
/// channel. Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl Texture {
    /// Wrap a tightly packed, row-major (top row first) straight-alpha RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> StampResult<Self> {
        let size = Canvas::new(width, height)
            .map_err(|_| StampError::validation("texture width and height must be > 0"))?;
        if rgba8.len() != size.rgba8_len()? {
            return Err(StampError::validation(format!(
                "texture buffer has {} bytes, expected {}x{}x4",
                rgba8.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Single-color texture.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> StampResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        Self::from_rgba8(width, height, rgba.repeat(px))
    }

    /// 1x1 fully transparent texture bound in place of a missing pattern.
    pub fn transparent_placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba8: Arc::new(vec![0, 0, 0, 0]),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw straight-alpha RGBA8 bytes.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Texel at integer coordinates (top row first), as normalized floats.
    pub fn texel(&self, x: u32, y: u32) -> Rgbaf {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8[idx..idx + 4];
        [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        ]
    }

    /// Bilinear sample at a UV coordinate with clamp-to-edge addressing.
    ///
    /// UV space is bottom-up: `v = 0` addresses the last image row and `v = 1` the first. Texel
    /// centers sit at `(i + 0.5) / size`.
    pub fn sample(&self, uv: Point) -> Rgbaf {
        let fx = uv.x * f64::from(self.width) - 0.5;
        let fy = (1.0 - uv.y) * f64::from(self.height) - 0.5;

        let x0f = fx.floor();
        let y0f = fy.floor();
        let tx = (fx - x0f) as f32;
        let ty = (fy - y0f) as f32;

        let max_x = i64::from(self.width) - 1;
        let max_y = i64::from(self.height) - 1;
        let x0 = (x0f as i64).clamp(0, max_x) as u32;
        let x1 = (x0f as i64 + 1).clamp(0, max_x) as u32;
        let y0 = (y0f as i64).clamp(0, max_y) as u32;
        let y1 = (y0f as i64 + 1).clamp(0, max_y) as u32;

        let a = self.texel(x0, y0);
        let b = self.texel(x1, y0);
        let c = self.texel(x0, y1);
        let d = self.texel(x1, y1);

        let mut out = [0.0f32; 4];
        for i in 0..4 {
            let top = a[i] + (b[i] - a[i]) * tx;
            let bottom = c[i] + (d[i] - c[i]) * tx;
            out[i] = top + (bottom - top) * ty;
        }
        out
    }

    /// Red channel of [`Texture::sample`]; the depth convention.
    pub fn sample_red(&self, uv: Point) -> f32 {
        self.sample(uv)[0]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/texture.rs"]
mod tests;
