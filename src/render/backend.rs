use crate::foundation::core::{Canvas, Rgb8};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Frame filled with an opaque color.
    pub fn filled(canvas: Canvas, rgb: Rgb8) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: rgb.to_premul_rgba8().repeat(canvas.pixel_count()),
            premultiplied: true,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Fixed colors and switches used by the compositor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background when paper texture is on.
    pub paper_rgb: Rgb8,
    /// Background when paper texture is off, and of separated mode.
    pub background_rgb: Rgb8,
    /// Opacity of the grain tile laid over the paper.
    pub paper_alpha: f32,
    /// Draw "Layer N" and ink captions in separated mode.
    pub labels: bool,
    pub label_rgb: Rgb8,
    pub divider_rgb: Rgb8,
    pub divider_width: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            paper_rgb: Rgb8::new(0xf8, 0xf5, 0xf0),
            background_rgb: Rgb8::WHITE,
            paper_alpha: 0.03,
            labels: true,
            label_rgb: Rgb8::new(0x33, 0x33, 0x33),
            divider_rgb: Rgb8::new(0xcc, 0xcc, 0xcc),
            divider_width: 2,
        }
    }
}

impl RenderSettings {
    /// Same settings with caption text disabled (no font lookup).
    pub fn without_labels(mut self) -> Self {
        self.labels = false;
        self
    }
}
