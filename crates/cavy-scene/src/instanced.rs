//! Fixed-capacity instanced batches
//!
//! One base shape drawn N times with per-instance transforms and optional
//! per-instance colors. Writes mark the batch dirty; `finalize` flags the
//! data as uploaded. Capacity never changes after construction.

use std::sync::Arc;

use glam::Mat4;

use crate::color::Color;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub struct InstancedBatch {
    pub geometry: Geometry,
    pub material: Arc<Material>,
    capacity: usize,
    matrices: Vec<Mat4>,
    colors: Option<Vec<Color>>,
    matrices_dirty: bool,
    colors_dirty: bool,
}

impl InstancedBatch {
    pub fn new(geometry: Geometry, material: Arc<Material>, capacity: usize) -> Self {
        Self {
            geometry,
            material,
            capacity,
            matrices: vec![Mat4::IDENTITY; capacity],
            colors: None,
            matrices_dirty: capacity > 0,
            colors_dirty: false,
        }
    }

    /// Enable per-instance colors, all initialised to white
    pub fn with_colors(mut self) -> Self {
        self.colors = Some(vec![Color::WHITE; self.capacity]);
        self.colors_dirty = self.capacity > 0;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn set_matrix_at(&mut self, index: usize, matrix: Mat4) -> Result<(), SceneError> {
        let slot = self
            .matrices
            .get_mut(index)
            .ok_or(SceneError::InstanceOutOfRange {
                index,
                capacity: self.capacity,
            })?;
        *slot = matrix;
        self.matrices_dirty = true;
        Ok(())
    }

    pub fn set_color_at(&mut self, index: usize, color: Color) -> Result<(), SceneError> {
        let capacity = self.capacity;
        let colors = self.colors.as_mut().ok_or(SceneError::NoInstanceColors)?;
        let slot = colors
            .get_mut(index)
            .ok_or(SceneError::InstanceOutOfRange { index, capacity })?;
        *slot = color;
        self.colors_dirty = true;
        Ok(())
    }

    pub fn matrix_at(&self, index: usize) -> Option<Mat4> {
        self.matrices.get(index).copied()
    }

    pub fn color_at(&self, index: usize) -> Option<Color> {
        self.colors.as_ref().and_then(|c| c.get(index).copied())
    }

    /// Flag pending writes as uploaded
    pub fn finalize(&mut self) {
        self.matrices_dirty = false;
        self.colors_dirty = false;
    }

    pub fn is_render_ready(&self) -> bool {
        !self.matrices_dirty && !self.colors_dirty
    }

    /// Column-major transform data, 16 floats per instance
    pub fn transform_array(&self) -> Vec<f32> {
        self.matrices.iter().flat_map(|m| m.to_cols_array()).collect()
    }

    /// RGB data, 3 floats per instance (empty without colors)
    pub fn color_array(&self) -> Vec<f32> {
        self.colors
            .iter()
            .flatten()
            .flat_map(|c| [c.r, c.g, c.b])
            .collect()
    }

    pub(crate) fn material_is_unique(&self) -> bool {
        Arc::strong_count(&self.material) == 1
    }
}
