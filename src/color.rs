// RGBA color value
//
// Channels are floats in [0, 1]; constructors take the usual 8-bit values.

use ash::vk;
use serde::Deserialize;
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::splat(255);
    pub const BLACK: Color = Color::splat(0);
    pub const GRAY: Color = Color::splat(128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIME: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const SILVER: Color = Color::splat(192);
    pub const MAROON: Color = Color::rgb(128, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Every channel, alpha included, set to `level`.
    pub const fn splat(level: u8) -> Self {
        Self::rgba(level, level, level, level)
    }

    /// Opaque gray with every color channel set to `level`.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// From a packed `0xRRGGBB` value. Higher bits are ignored.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for vk::ClearColorValue {
    fn from(color: Color) -> Self {
        vk::ClearColorValue {
            float32: color.to_array(),
        }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a + other.a,
        }
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Color {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
            a: self.a - other.a,
        }
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0xFF0000), Color::RED);
        assert_eq!(Color::from_hex(0x008000), Color::GREEN);
        assert_eq!(Color::from_hex(0xFFFFFF), Color::WHITE);
        assert_eq!(Color::from_hex(0xAB_000000), Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_channels() {
        let c = Color::rgba(255, 0, 51, 0);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 0.0]);
        assert_eq!(Color::gray(0).a, 1.0);
    }

    #[test]
    fn test_splat_sets_alpha() {
        assert_eq!(Color::BLACK.to_array(), [0.0; 4]);
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::WHITE.a, 1.0);
        assert_eq!(Color::GRAY.a, Color::GRAY.r);
        assert_eq!(Color::SILVER, Color::rgba(192, 192, 192, 192));
        assert!(Color::SILVER.a < 1.0);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Color::RED + Color::LIME, Color::rgba(255, 255, 0, 255) + Color::rgba(0, 0, 0, 255));
        assert_eq!(Color::WHITE - Color::WHITE, Color::from([0.0; 4]));
        assert_eq!(Color::YELLOW * Color::MAGENTA, Color::RED);
    }

    #[test]
    fn test_clear_value() {
        let clear: vk::ClearColorValue = Color::BLUE.into();
        assert_eq!(unsafe { clear.float32 }, [0.0, 0.0, 1.0, 1.0]);
    }
}
