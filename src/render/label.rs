//! Caption text for separated mode, rendered through `usvg`/`resvg`.

use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{RisoError, RisoResult};

pub(crate) const CAPTION_FONT_PX: u32 = 16;
/// Captions sit on baselines 30 and 50, 10px in from the left of their half.
pub(crate) const CAPTION_X: f64 = 10.0;
pub(crate) const CAPTION_BASELINES: [f64; 2] = [30.0, 50.0];
pub(crate) const CAPTION_BAND_HEIGHT: u32 = 60;

pub(crate) struct Captions {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Captions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Captions")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Captions {
    pub(crate) fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let sans = usvg::fontdb::Query {
            families: &[usvg::fontdb::Family::SansSerif],
            ..Default::default()
        };
        if db.query(&sans).is_none() {
            let fallback = db
                .faces()
                .next()
                .and_then(|f| f.families.first())
                .map(|(name, _)| name.clone());
            if let Some(name) = fallback {
                db.set_sans_serif_family(name);
            }
        }
        tracing::debug!(faces = db.len(), "caption fonts loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterize up to two caption lines into a premultiplied `width x CAPTION_BAND_HEIGHT` patch.
    ///
    /// With no usable font the patch stays transparent.
    pub(crate) fn band(&self, lines: &[&str], width: u32, rgb: Rgb8) -> RisoResult<Vec<u8>> {
        let width = width.max(1);
        let height = CAPTION_BAND_HEIGHT;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for (line, y) in lines.iter().zip(CAPTION_BASELINES) {
            svg.push_str(&format!(
                r#"<text x="{CAPTION_X}" y="{y}" font-family="sans-serif" font-weight="bold" font-size="{CAPTION_FONT_PX}" fill="{}">{}</text>"#,
                rgb.to_hex(),
                escape_xml(line)
            ));
        }
        svg.push_str("</svg>");

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse caption svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| RisoError::render("failed to allocate caption pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.data().to_vec())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
