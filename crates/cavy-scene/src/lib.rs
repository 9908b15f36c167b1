//! Scene graph and procedural geometry for cavy
//!
//! This crate implements:
//! - An arena-backed transform tree (`Model`) and the `Scene` mount point
//! - Indexed mesh primitives and vertex displacement
//! - Fixed-capacity instanced batches for scattered content
//! - Seeded randomness and procedural texture synthesis

pub mod color;
pub mod displace;
pub mod geometry;
pub mod instanced;
pub mod material;
pub mod model;
pub mod rng;
pub mod scene;
pub mod texture;

use thiserror::Error;

pub use color::Color;
pub use displace::displace;
pub use geometry::Geometry;
pub use instanced::InstancedBatch;
pub use material::Material;
pub use model::{DisposeReport, Mesh, Model, Node, NodeContent, NodeId, Transform};
pub use rng::{seed_from_identifier, seeded_rng, PileRng, SceneRng};
pub use scene::{ModelId, Scene};
pub use texture::Texture;

/// Errors raised by scene-level precondition checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("instance index {index} out of range for batch of capacity {capacity}")]
    InstanceOutOfRange { index: usize, capacity: usize },

    #[error("batch was built without per-instance colors")]
    NoInstanceColors,

    #[error("node {0:?} does not exist in this model")]
    MissingNode(NodeId),
}
