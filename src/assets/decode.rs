use std::path::Path;

use anyhow::Context;

use crate::assets::texture::Texture;
use crate::foundation::error::StampResult;

/// Decode an encoded image (PNG, JPEG, WebP) into a straight-alpha RGBA8 [`Texture`].
pub fn decode_image(bytes: &[u8]) -> StampResult<Texture> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn decode_image_file(path: &Path) -> StampResult<Texture> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
