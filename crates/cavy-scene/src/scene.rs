//! Scene mount point
//!
//! The host renderer owns the surface; the scene only tracks which models
//! are mounted under its root and hands out stable ids for them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::model::{DisposeReport, Model};

/// Unique identifier for a mounted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

impl ModelId {
    fn next() -> Self {
        ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model({})", self.0)
    }
}

/// Root transform node the core mounts models under
#[derive(Debug, Default)]
pub struct Scene {
    models: BTreeMap<ModelId, Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, model: Model) -> ModelId {
        let id = ModelId::next();
        log::debug!(
            "Mounted {} ({}, {} nodes)",
            id,
            model.name().unwrap_or("unnamed"),
            model.node_count()
        );
        self.models.insert(id, model);
        id
    }

    /// Remove a model and release its resources. Unknown ids are ignored.
    pub fn unmount(&mut self, id: ModelId) -> Option<DisposeReport> {
        let mut model = self.models.remove(&id)?;
        let report = model.dispose();
        log::debug!(
            "Unmounted {}: released {} nodes, {} geometries, {} materials",
            id,
            report.nodes,
            report.geometries,
            report.materials
        );
        Some(report)
    }

    /// Swap the model behind `id` for a new one, disposing the old tree.
    pub fn replace(&mut self, id: ModelId, model: Model) -> Option<DisposeReport> {
        let slot = self.models.get_mut(&id)?;
        let mut old = std::mem::replace(slot, model);
        Some(old.dispose())
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(&id)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(&id)
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// World position of a model's root
    pub fn world_position(&self, id: ModelId) -> Option<Vec3> {
        self.get(id).map(|m| m.root_transform().position)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.models.keys().copied()
    }

    /// Unmount everything
    pub fn clear(&mut self) -> DisposeReport {
        let ids: Vec<ModelId> = self.ids().collect();
        let mut total = DisposeReport::default();
        for id in ids {
            if let Some(r) = self.unmount(id) {
                total.nodes += r.nodes;
                total.geometries += r.geometries;
                total.materials += r.materials;
            }
        }
        total
    }
}
