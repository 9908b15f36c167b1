//! Procedural habitat items for cavy
//!
//! Every builder is a pure function from a few parameters to a fresh
//! `Model`. Piles of loose material draw from a generator seeded by the
//! container's placement id, so a refill with the same serving count
//! always looks the same.

pub mod containers;
pub mod factory;
pub mod food;
pub mod furniture;
pub mod held_food;
pub mod kind;
pub mod piles;
pub mod placement;

pub use containers::{build_bowl, build_hay_rack, build_water_bottle};
pub use factory::build_item;
pub use food::{ContainerContents, FoodCategory, FoodPortion};
pub use furniture::{build_bedding, build_shelter, build_toy};
pub use held_food::{build_held_food, resolve_food_color};
pub use kind::{BeddingKind, ItemDefinition, ItemKind, ShelterKind, ToyKind};
pub use piles::{
    build_food_pile, build_hay_pile, build_hay_rack_hay, build_lettuce_pile, build_pellet_pile,
    disk_point, hay_rack_counts, HayRackCounts,
};
pub use placement::GridLayout;
