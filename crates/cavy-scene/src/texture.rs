//! Procedural texture synthesis
//!
//! Small RGBA8 images generated from Perlin noise. The renderer uploads
//! them as-is; nothing here touches the GPU.

use noise::{NoiseFn, Perlin};

use crate::color::Color;

/// RGBA8 image, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    /// Build a texture by evaluating `f(u, v)` at each texel centre.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(f64, f64) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let u = (x as f64 + 0.5) / width as f64;
                let v = (y as f64 + 0.5) / height as f64;
                rgba.extend_from_slice(&f(u, v));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    /// Short directional strands over mottled base, for creature fur
    pub fn fur(base: Color, size: u32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        Self::from_fn(size, size, |u, v| {
            let mottle = perlin.get([u * 4.0, v * 4.0]) as f32;
            let strand = perlin.get([u * 48.0, v * 6.0]) as f32;
            let shade = 1.0 + mottle * 0.12 + strand * 0.08;
            base.scaled(shade).to_rgba8(255)
        })
    }

    /// Stretched noise rings, for wooden hideouts and hay racks
    pub fn wood(base: Color, size: u32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        Self::from_fn(size, size, |u, v| {
            let warp = perlin.get([u * 2.0, v * 16.0]) * 0.6;
            let rings = ((u * 14.0 + warp) * std::f64::consts::TAU).sin() as f32;
            let shade = 0.9 + rings * 0.08 + perlin.get([u * 30.0, v * 3.0]) as f32 * 0.05;
            base.scaled(shade).to_rgba8(255)
        })
    }

    /// Soft low-frequency variation for fleece bedding
    pub fn fleece(base: Color, size: u32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        Self::from_fn(size, size, |u, v| {
            let fluff = perlin.get([u * 10.0, v * 10.0]) as f32;
            base.scaled(1.0 + fluff * 0.06).to_rgba8(255)
        })
    }

    /// Yellow-green streaks for hay bedding and piles
    pub fn hay(size: u32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let dry = Color::from_hex(0xd8c07a);
        let green = Color::from_hex(0x9aa85a);
        Self::from_fn(size, size, |u, v| {
            let streak = perlin.get([u * 40.0, v * 4.0]) as f32 * 0.5 + 0.5;
            dry.lerp(green, streak.clamp(0.0, 1.0) * 0.6).to_rgba8(255)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let tex = Texture::from_fn(4, 2, |u, _| if u < 0.5 { [0, 0, 0, 255] } else { [255; 4] });
        assert_eq!(tex.rgba.len(), 4 * 2 * 4);
        assert_eq!(tex.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(tex.pixel(3, 1), Some([255; 4]));
        assert_eq!(tex.pixel(4, 0), None);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let base = Color::from_hex(0xc68642);
        assert_eq!(Texture::fur(base, 16, 3), Texture::fur(base, 16, 3));
        assert_eq!(Texture::wood(base, 16, 9), Texture::wood(base, 16, 9));
    }

    #[test]
    fn test_fur_stays_near_base_color() {
        let base = Color::rgb(0.5, 0.4, 0.3);
        let tex = Texture::fur(base, 8, 1);
        for px in tex.rgba.chunks_exact(4) {
            assert!((px[0] as i32 - 128).abs() < 40);
            assert_eq!(px[3], 255);
        }
    }
}
