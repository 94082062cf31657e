use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{RisoError, RisoResult};

/// A decoded bitmap owned by an image layer.
///
/// Keeps the straight-alpha pixels (used by tinting and color sampling) next to a premultiplied
/// pixmap prepared once for drawing.
#[derive(Clone)]
pub struct LayerImage {
    rgba: Arc<image::RgbaImage>,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl LayerImage {
    pub fn from_rgba(rgba: image::RgbaImage) -> RisoResult<Self> {
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(RisoError::validation("image must be at least 1x1"));
        }
        let pixmap = crate::render::cpu::straight_rgba_to_pixmap(rgba.as_raw(), width, height)?;
        Ok(Self {
            rgba: Arc::new(rgba),
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Straight (non-premultiplied) RGBA8 pixels.
    pub fn rgba(&self) -> &image::RgbaImage {
        &self.rgba
    }

    pub(crate) fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }
}

impl std::fmt::Debug for LayerImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// A user-provided file: its declared MIME type plus raw bytes.
#[derive(Clone, Debug)]
pub struct Upload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file and derive its MIME type from the extension.
    pub fn from_path(path: &Path) -> RisoResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        let mime = image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        Ok(Self::new(mime, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.trim().to_ascii_lowercase().starts_with("image/")
    }

    fn format_hint(&self) -> Option<image::ImageFormat> {
        image::ImageFormat::from_mime_type(self.mime.trim())
    }

    /// Decode the upload. Non-image uploads yield `Ok(None)`.
    pub fn decode(&self) -> RisoResult<Option<LayerImage>> {
        if !self.is_image() {
            tracing::debug!(mime = %self.mime, "ignoring non-image upload");
            return Ok(None);
        }
        decode_image_with_hint(&self.bytes, self.format_hint()).map(Some)
    }
}

pub fn decode_image(bytes: &[u8]) -> RisoResult<LayerImage> {
    decode_image_with_hint(bytes, None)
}

/// Decode with the fast in-memory path, falling back to the reader path on failure.
///
/// The fallback uses `hint` when given and otherwise re-guesses the format. Only a failure of
/// both paths is reported.
pub fn decode_image_with_hint(
    bytes: &[u8],
    hint: Option<image::ImageFormat>,
) -> RisoResult<LayerImage> {
    let dyn_img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(fast_err) => {
            tracing::debug!(error = %fast_err, "fast decode failed, using reader fallback");
            let reader = match hint {
                Some(format) => image::ImageReader::with_format(Cursor::new(bytes), format),
                None => image::ImageReader::new(Cursor::new(bytes))
                    .with_guessed_format()
                    .context("guess image format")?,
            };
            reader.decode().context("decode image")?
        }
    };
    LayerImage::from_rgba(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
