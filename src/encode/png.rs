use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{StampError, StampResult};
use crate::render::frame::FrameRGBA;

fn check_frame(frame: &FrameRGBA) -> StampResult<()> {
    let expected = frame.size().rgba8_len()?;
    if frame.data.len() != expected {
        return Err(StampError::render(format!(
            "frame buffer has {} bytes, expected {}x{}x4",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    if frame.premultiplied {
        return Err(StampError::render("png export expects straight-alpha frames"));
    }
    Ok(())
}

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> StampResult<Vec<u8>> {
    check_frame(frame)?;
    let mut out = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out.into_inner())
}

/// Write a frame to `path` as PNG, creating parent directories as needed.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn write_png(frame: &FrameRGBA, path: &Path) -> StampResult<()> {
    check_frame(frame)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "png written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
