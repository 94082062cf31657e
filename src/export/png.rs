use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{RisoError, RisoResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::backend::FrameRGBA;

/// Default file name offered for downloads.
pub const EXPORT_FILE_NAME: &str = "color-mix.png";

/// Straight-alpha copy of the frame's pixels.
pub fn to_straight_rgba(frame: &FrameRGBA) -> RisoResult<image::RgbaImage> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| RisoError::render("frame buffer does not match its size"))
}

/// Encode the frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> RisoResult<Vec<u8>> {
    let img = to_straight_rgba(frame)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out.into_inner())
}

/// Write the frame as a PNG file, creating parent directories.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> RisoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let img = to_straight_rgba(frame)?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "png written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
