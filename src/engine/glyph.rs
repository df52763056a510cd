//! Text burst targets. A blessing is rasterized off-screen and the inked
//! pixels, sampled on a coarse grid, become the points text particles settle
//! onto.

use crate::error::FontError;
use glam::Vec2;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Only every third pixel in each axis is considered.
pub const SAMPLE_STRIDE: usize = 3;
pub const ALPHA_THRESHOLD: u8 = 128;
pub const MAX_FONT_SIZE: f32 = 80.0;
const FONT_SCALE: f32 = 0.12;
const MARGIN: f32 = 40.0;

/// Single channel coverage raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0
        }
    }

    /// Keeps the stronger of the existing and new coverage. Out of bounds
    /// writes are clipped.
    pub fn blend_max(&mut self, x: isize, y: isize, value: u8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = self.data[idx].max(value);
    }
}

/// Off-screen text rendering backend.
pub trait GlyphRasterizer {
    /// Draws `text` bold, centered horizontally and vertically on a
    /// `width` x `height` mask. `None` means the backend could not draw it.
    fn rasterize(&self, text: &str, font_size: f32, width: usize, height: usize) -> Option<AlphaMask>;
}

/// Backend used when no font could be loaded; text bursts come out empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGlyphs;

impl GlyphRasterizer for NoGlyphs {
    fn rasterize(&self, _text: &str, _font_size: f32, _width: usize, _height: usize) -> Option<AlphaMask> {
        None
    }
}

pub fn font_size_for(reference_width: f32) -> f32 {
    MAX_FONT_SIZE.min(reference_width * FONT_SCALE)
}

/// Samples the inked pixels of `text` as absolute points around `center`.
///
/// The number of points depends on the glyphs; an unavailable backend
/// yields none.
pub fn sample_text(rasterizer: &dyn GlyphRasterizer, text: &str, center: Vec2, reference_width: f32) -> Vec<Vec2> {
    let font_size = font_size_for(reference_width);
    if text.is_empty() || !(font_size > 0.0) {
        return Vec::new();
    }

    let chars = text.chars().count() as f32;
    let width = (chars * font_size + MARGIN).floor() as usize;
    let height = (font_size + MARGIN).floor() as usize;

    let Some(mask) = rasterizer.rasterize(text, font_size, width, height) else {
        debug!(text, font_size, "glyph raster unavailable, text burst is empty");
        return Vec::new();
    };

    let half = Vec2::new(mask.width() as f32 / 2.0, mask.height() as f32 / 2.0);
    let mut points = Vec::new();
    for y in (0..mask.height()).step_by(SAMPLE_STRIDE) {
        for x in (0..mask.width()).step_by(SAMPLE_STRIDE) {
            if mask.get(x, y) > ALPHA_THRESHOLD {
                points.push(Vec2::new(x as f32, y as f32) - half + center);
            }
        }
    }
    points
}

/// Fonts tried in order when none is configured. CJK faces come first since
/// most blessings are Chinese.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-zenhei/wqy-zenhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
];

/// `fontdue` backed rasterizer.
pub struct FontRasterizer {
    name: String,
    font: fontdue::Font,
}

impl FontRasterizer {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontError> {
        let name = name.into();
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default()).map_err(|reason| {
            FontError::Parse {
                name: name.clone(),
                reason: reason.to_string(),
            }
        })?;
        Ok(Self { name, font })
    }

    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    /// Loads `explicit` if given, otherwise the first system font that parses.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, FontError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(font) => {
                    info!(font = %candidate.display(), "using system font");
                    return Ok(font);
                }
                Err(e) => debug!("skipping {}: {e}", candidate.display()),
            }
        }
        Err(FontError::NotFound)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, text: &str, font_size: f32, width: usize, height: usize) -> Option<AlphaMask> {
        if width == 0 || height == 0 || !(font_size > 0.0) {
            return None;
        }

        let missing = text
            .chars()
            .filter(|c| !c.is_whitespace() && self.font.lookup_glyph_index(*c) == 0)
            .count();
        if missing == text.chars().filter(|c| !c.is_whitespace()).count() {
            warn!(font = %self.name, text, "font has none of the glyphs");
            return None;
        }
        if missing > 0 {
            debug!(font = %self.name, text, missing, "drawing text with missing glyphs");
        }

        let line = self.font.horizontal_line_metrics(font_size)?;
        let glyphs: Vec<_> = text.chars().map(|c| (c, self.font.rasterize(c, font_size))).collect();

        // Synthetic bold: smear coverage a few pixels to the right.
        let bold = (font_size / 24.0).round().max(1.0) as isize;
        let advance: f32 = glyphs.iter().map(|(_, (m, _))| m.advance_width).sum::<f32>() + bold as f32;

        let baseline = height as f32 / 2.0 + (line.ascent + line.descent) / 2.0;
        let mut pen = width as f32 / 2.0 - advance / 2.0;
        let mut mask = AlphaMask::new(width, height);

        for (c, (metrics, coverage)) in &glyphs {
            if self.font.lookup_glyph_index(*c) != 0 {
                let left = (pen + metrics.xmin as f32).round() as isize;
                let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as isize;

                for gy in 0..metrics.height {
                    for gx in 0..metrics.width {
                        let value = coverage[gy * metrics.width + gx];
                        if value == 0 {
                            continue;
                        }
                        for dx in 0..=bold {
                            mask.blend_max(left + gx as isize + dx, top + gy as isize, value);
                        }
                    }
                }
            }
            pen += metrics.advance_width;
        }

        Some(mask)
    }
}
