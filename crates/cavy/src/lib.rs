//! # Cavy - guinea pig habitat
//!
//! Hosts procedurally built guinea pigs and habitat items in a scene,
//! drives their animation every frame and runs the player's petting and
//! hand-feeding interactions.

pub mod animation;
pub mod config;
pub mod gameplay;
pub mod habitat;
pub mod interaction;
pub mod needs;
pub mod reactions;

pub use cavy_creature as creature;
pub use cavy_props as props;
pub use cavy_scene as scene;

pub use habitat::Habitat;

/// Common imports for hosts
pub mod prelude {
    pub use crate::gameplay::{GameplayMut, GameplayRead, MemoryGameplay};
    pub use crate::interaction::{HeldFoodRequest, InteractionKind, InteractionOutcome};
    pub use crate::needs::{Need, WellnessTier};
    pub use glam::Vec3;
}
