//! Linear RGB color values

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// RGB color with components in 0..1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `rrggbb`. Returns `None` for anything else.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self::from(self.to_vec3().lerp(other.to_vec3(), t))
    }

    /// Multiply brightness, clamped to the displayable range
    pub fn scaled(self, factor: f32) -> Self {
        Self::from((self.to_vec3() * factor).clamp(Vec3::ZERO, Vec3::ONE))
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn to_rgba8(self, alpha: u8) -> [u8; 4] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), alpha]
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self::rgb(v.x, v.y, v.z)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_of_known_value() {
        let c = Color::from_hex(0xd2a679);
        assert_eq!(c.to_hex(), 0xd2a679);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#ff0000"), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(Color::parse_hex("00ff00"), Some(Color::rgb(0.0, 1.0, 0.0)));
        assert_eq!(Color::parse_hex("not a color"), None);
        assert_eq!(Color::parse_hex("#fff"), None);
    }

    #[test]
    fn test_scaled_clamps() {
        let c = Color::rgb(0.8, 0.5, 0.1).scaled(2.0);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 1.0);
        assert!((c.b - 0.2).abs() < 1e-6);
    }
}
