//! Off-screen raster the draw pass paints into. Colors are kept as f32
//! channels in 0..=255 so repeated low-alpha overlays fade smoothly instead
//! of stalling on integer rounding.

use crate::engine::palette::{Color, Rgba};
use glam::Vec2;

pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
}

fn channels(color: Color) -> [f32; 3] {
    [color.r as f32, color.g as f32, color.b as f32]
}

impl Surface {
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![channels(fill); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates at the new size; previous content is discarded.
    pub fn resize(&mut self, width: usize, height: usize, fill: Color) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, channels(fill));
    }

    /// Raw channels at (x, y), or `None` outside the surface.
    pub fn channels(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.channels(x, y)
            .map(|[r, g, b]| Color::new(r.round() as u8, g.round() as u8, b.round() as u8))
    }

    #[inline]
    fn blend(&mut self, x: usize, y: usize, src: [f32; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let px = &mut self.pixels[y * self.width + x];
        for (dst, s) in px.iter_mut().zip(src) {
            *dst = s * alpha + *dst * (1.0 - alpha);
        }
    }

    /// Source-over fill of an axis aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, rgba: Rgba) {
        let src = channels(rgba.color);
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.blend(px, py, src, rgba.alpha);
            }
        }
    }

    /// Filled disc with a one pixel soft edge.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, rgba: Rgba) {
        self.fill_disc(center, radius, rgba.color, |_| rgba.alpha);
    }

    /// Disc whose alpha falls linearly from `inner.alpha` at the center to
    /// zero at `radius`.
    pub fn fill_radial(&mut self, center: Vec2, radius: f32, inner: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        self.fill_disc(center, radius, inner.color, |d| inner.alpha * (1.0 - d / radius).max(0.0));
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Color, alpha_at: impl Fn(f32) -> f32) {
        if !(radius > 0.0) || !center.is_finite() || self.width == 0 || self.height == 0 {
            return;
        }
        let src = channels(color);

        let x0 = (center.x - radius - 1.0).floor().max(0.0);
        let y0 = (center.y - radius - 1.0).floor().max(0.0);
        let x1 = (center.x + radius + 1.0).ceil().min(self.width as f32 - 1.0);
        let y1 = (center.y + radius + 1.0).ceil().min(self.height as f32 - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }

        // Small discs cover less than one pixel center; keep them visible
        // by scaling the coverage of their nearest pixel by area.
        let tiny = radius < 0.5;

        for py in y0 as usize..=y1 as usize {
            for px in x0 as usize..=x1 as usize {
                let d = (Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center).length();
                let coverage = if tiny {
                    if d <= 0.7072 { std::f32::consts::PI * radius * radius } else { 0.0 }
                } else {
                    (radius - d + 0.5).clamp(0.0, 1.0)
                };
                if coverage > 0.0 {
                    self.blend(px, py, src, alpha_at(d) * coverage);
                }
            }
        }
    }
}
