//! Presents a surface in the terminal with `▄` half blocks: the background
//! color paints the top half of a cell and the foreground the bottom half,
//! so each cell shows two pixels.

use super::surface::Surface;
use crate::engine::palette::Color;
use std::io::{self, Write};

pub struct TerminalPresenter {
    scale: usize,
    output_buf: Vec<u8>,
}

impl TerminalPresenter {
    /// `scale` surface pixels, in each axis, make one half-block pixel.
    pub fn new(scale: usize) -> Self {
        Self {
            scale: scale.max(1),
            output_buf: Vec::new(),
        }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Surface size for a terminal of `cols` x `rows` cells.
    pub fn surface_size(&self, cols: u16, rows: u16) -> (usize, usize) {
        (cols as usize * self.scale, rows as usize * 2 * self.scale)
    }

    /// Averages the `scale` x `scale` block behind half-block pixel (x, y).
    fn sample(&self, surface: &Surface, x: usize, y: usize) -> Color {
        let mut sum = [0.0f32; 3];
        let mut n = 0.0;
        for sy in y * self.scale..(y + 1) * self.scale {
            for sx in x * self.scale..(x + 1) * self.scale {
                if let Some(px) = surface.channels(sx, sy) {
                    for (acc, c) in sum.iter_mut().zip(px) {
                        *acc += c;
                    }
                    n += 1.0;
                }
            }
        }
        if n == 0.0 {
            return Color::new(0, 0, 0);
        }
        let [r, g, b] = sum.map(|c| (c / n).round().clamp(0.0, 255.0) as u8);
        Color::new(r, g, b)
    }

    /// Builds the escape sequence stream for one frame.
    pub fn compose(&mut self, surface: &Surface) -> io::Result<&[u8]> {
        let cols = surface.width() / self.scale;
        let pixel_rows = surface.height() / self.scale;

        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        // Reset per row so the first cell always emits both colors.
        let mut prev_top: Option<Color> = None;
        let mut prev_bot: Option<Color> = None;

        for y in (0..pixel_rows).step_by(2) {
            for x in 0..cols {
                let top = self.sample(surface, x, y);
                let bot = if y + 1 < pixel_rows { self.sample(surface, x, y + 1) } else { top };

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.r, top.g, top.b)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.r, bot.g, bot.b)?;
                    prev_bot = Some(bot);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < pixel_rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        Ok(&self.output_buf)
    }

    pub fn present<W: Write>(&mut self, surface: &Surface, out: &mut W) -> io::Result<()> {
        self.compose(surface)?;
        out.write_all(&self.output_buf)?;
        out.flush()
    }
}
