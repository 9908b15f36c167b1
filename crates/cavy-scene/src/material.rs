//! Surface materials
//!
//! Materials are shared through `Arc` so one instance can back many meshes
//! (every pellet in a bowl uses the same material). A material is released
//! when its last reference is dropped.

use std::sync::Arc;

use crate::color::Color;
use crate::texture::Texture;

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub emissive: Color,
    pub map: Option<Arc<Texture>>,
}

impl Material {
    /// Matte material with default roughness
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            roughness: 0.8,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            emissive: Color::BLACK,
            map: None,
        }
    }

    pub fn metallic(color: Color, roughness: f32) -> Self {
        Self {
            roughness,
            metalness: 0.8,
            ..Self::standard(color)
        }
    }

    pub fn glass(color: Color, opacity: f32) -> Self {
        Self {
            roughness: 0.1,
            opacity,
            transparent: true,
            ..Self::standard(color)
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_map(mut self, map: Arc<Texture>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn shared(self) -> Arc<Material> {
        Arc::new(self)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE)
    }
}
