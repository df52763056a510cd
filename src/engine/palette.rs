//! Festival palette, blessing phrases and the color types shared by the
//! engine and the renderer.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self { r, g, b })
    }

    /// Color at a unit alpha, clamped to [0, 1].
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            color: self,
            alpha: if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) },
        }
    }

    /// Color with an alpha given in byte units, floored and clamped the
    /// same way a two digit hex suffix would be.
    pub fn with_alpha_byte(self, scaled: f32) -> Rgba {
        let byte = if scaled.is_nan() { 0.0 } else { scaled.floor().clamp(0.0, 255.0) };
        Rgba {
            color: self,
            alpha: byte / 255.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color plus straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: Color,
    pub alpha: f32,
}

impl Rgba {
    pub fn alpha_byte(&self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02x}", self.color, self.alpha_byte())
    }
}

pub const PALETTE: [Color; 10] = [
    Color::new(0xE8, 0x36, 0x3B), // China red
    Color::new(0xFF, 0xD7, 0x00), // gold
    Color::new(0xFF, 0x6B, 0x35), // tangerine
    Color::new(0xFF, 0x4D, 0x6A), // peach blossom
    Color::new(0xFF, 0xA5, 0x00), // orange
    Color::new(0xFF, 0x17, 0x44), // cinnabar
    Color::new(0xFF, 0xAB, 0x00), // amber
    Color::new(0xFF, 0x8A, 0x65), // coral
    Color::new(0xFF, 0xE0, 0x82), // pale gold
    Color::new(0xFF, 0xFF, 0xFF), // white
];

/// Rockets pick from the first six entries.
pub const ROCKET_COLORS: usize = 6;

/// Text particles pick from the first four entries.
pub const GLYPH_COLORS: usize = 4;

/// Night sky the fade overlay paints with.
pub const NIGHT_SKY: Color = Color::new(10, 5, 15);

pub const BLESSINGS: [&str; 12] = [
    "新年快乐",
    "恭喜发财",
    "万事如意",
    "心想事成",
    "吉祥如意",
    "大吉大利",
    "年年有余",
    "想你了",
    "月色真美",
    "你好特别",
    "遇见你真好",
    "一起跨年",
];

pub fn random_rocket_color(rng: &mut fastrand::Rng) -> Color {
    PALETTE[rng.usize(..ROCKET_COLORS)]
}

pub fn random_blessing(rng: &mut fastrand::Rng) -> &'static str {
    BLESSINGS[rng.usize(..BLESSINGS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("1a1b26"), Some(Color::new(0x1a, 0x1b, 0x26)));
        assert_eq!(Color::from_hex("#E8363B"), Some(PALETTE[0]));
        assert_eq!(Color::from_hex("12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
        assert_eq!(Color::from_hex("1a1b2é"), None);
    }

    #[test]
    fn test_alpha_byte_floors_and_clamps() {
        let c = PALETTE[1];
        assert_eq!(c.with_alpha_byte(79.9).alpha, 79.0 / 255.0);
        assert_eq!(c.with_alpha_byte(-3.0).alpha, 0.0);
        // Settling text particles can report alpha above one.
        assert_eq!(c.with_alpha_byte(2.3 * 255.0).alpha, 1.0);
        assert_eq!(c.with_alpha(f32::NAN).alpha, 0.0);
    }

    #[test]
    fn test_hex_suffix_display() {
        assert_eq!(PALETTE[0].with_alpha_byte(128.0).to_string(), "#e8363b80");
        assert_eq!(PALETTE[9].with_alpha(0.0).to_string(), "#ffffff00");
    }

    #[test]
    fn test_random_picks_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let c = random_rocket_color(&mut rng);
            assert!(PALETTE[..ROCKET_COLORS].contains(&c));
            assert!(BLESSINGS.contains(&random_blessing(&mut rng)));
        }
    }
}
