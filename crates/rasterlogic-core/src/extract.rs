use thiserror::Error;

use crate::color::{hsv_to_rgb, rgb_to_hsv, Color, Rgba};
use crate::config::ExportConfig;
use crate::geometry::Rect;
use crate::pixmap::Pixmap;

/// Errors from a rectangle extractor. These abort the whole export; the
/// pipeline performs no retries and suppresses no partial results.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("tile bitmap is empty")]
    EmptyTile,

    #[error("extractor failure: {0}")]
    Failed(String),
}

/// An ordered color → rectangles mapping.
///
/// Both the color order and the rectangle order within a color are chosen by
/// the extractor and are significant: the encoder must consume them exactly as
/// produced. Hence an association list, never a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRectangles {
    entries: Vec<(Color, Vec<Rect>)>,
}

impl ColorRectangles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a color with its complete rectangle list.
    pub fn push(&mut self, color: Color, rects: Vec<Rect>) {
        self.entries.push((color, rects));
    }

    /// Rectangle list for `color`, inserted at the back on first appearance.
    pub fn entry_mut(&mut self, color: Color) -> &mut Vec<Rect> {
        if let Some(pos) = self.entries.iter().position(|(c, _)| *c == color) {
            return &mut self.entries[pos].1;
        }
        self.entries.push((color, Vec::new()));
        &mut self.entries.last_mut().unwrap().1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Color, &[Rect])> {
        self.entries.iter().map(|(c, r)| (c, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_rects(&self) -> usize {
        self.entries.iter().map(|(_, r)| r.len()).sum()
    }
}

/// The extraction boundary: turns one tile's bitmap into an ordered
/// color → rectangles mapping. Implementations must be deterministic for a
/// given input and report non-overlapping rectangles fully covering all
/// pixels of each color.
pub trait RectExtractor {
    fn extract(&self, config: &ExportConfig, tile: &Pixmap) -> Result<ColorRectangles, ExtractError>;
}

/// Built-in extractor: greedy horizontal runs per row, merged vertically when
/// x and width line up. Colors are ordered by first appearance in a row-major
/// scan; fully transparent pixels are never reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowRunExtractor;

impl RowRunExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Map one pixel to its drawable color, or `None` for transparent pixels.
    fn resolve(&self, config: &ExportConfig, pixel: Rgba) -> Option<Color> {
        if pixel.a == 0 {
            return None;
        }

        let apply_alpha = |c: u8| -> u8 {
            if pixel.a == 255 {
                c
            } else if config.use_gray_transparency {
                let alpha = pixel.a as f32 / 255.0;
                (c as f32 * alpha + 128.0 * (1.0 - alpha)).round() as u8
            } else {
                ((c as u16 * pixel.a as u16) / 255) as u8
            }
        };
        let (r, g, b) = (
            apply_alpha(pixel.r),
            apply_alpha(pixel.g),
            apply_alpha(pixel.b),
        );

        if config.quality == 255 {
            return Some(Color::Rgba(Rgba::opaque(r, g, b)));
        }

        let q = config.quality.max(1) as f32;
        if config.use_hsv {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let h = (h / 360.0 * q).round() / q * 360.0;
            let s = (s * q).round() / q;
            let v = (v * q).round() / q;
            let (r, g, b) = hsv_to_rgb(h, s, v);
            Some(Color::Packed(Rgba::opaque(r, g, b).pack()))
        } else {
            let quantize = |c: u8| ((c as f32 / 255.0 * q).round() / q * 255.0).round() as u8;
            Some(Color::Rgba(Rgba::opaque(
                quantize(r),
                quantize(g),
                quantize(b),
            )))
        }
    }
}

impl RectExtractor for RowRunExtractor {
    fn extract(&self, config: &ExportConfig, tile: &Pixmap) -> Result<ColorRectangles, ExtractError> {
        if tile.width() == 0 || tile.height() == 0 {
            return Err(ExtractError::EmptyTile);
        }

        let mut out = ColorRectangles::new();
        for y in 0..tile.height() {
            let mut x = 0;
            while x < tile.width() {
                let color = match self.resolve(config, tile.get(x, y)) {
                    Some(c) => c,
                    None => {
                        x += 1;
                        continue;
                    }
                };
                let mut run = 1;
                while x + run < tile.width()
                    && self.resolve(config, tile.get(x + run, y)) == Some(color)
                {
                    run += 1;
                }
                push_run(&mut out, color, x, y, run);
                x += run;
            }
        }

        log::debug!(
            "extracted {} colors, {} rectangles from {}x{} tile",
            out.len(),
            out.total_rects(),
            tile.width(),
            tile.height()
        );
        Ok(out)
    }
}

/// Record one horizontal run, extending a rectangle from the previous row
/// when its x and width match.
fn push_run(out: &mut ColorRectangles, color: Color, x: u32, y: u32, width: u32) {
    let rects = out.entry_mut(color);
    for r in rects.iter_mut().rev() {
        if r.bottom() < y {
            break;
        }
        if r.bottom() == y && r.x == x && r.width == width {
            r.height += 1;
            return;
        }
    }
    rects.push(Rect::new(x, y, width, 1));
}
