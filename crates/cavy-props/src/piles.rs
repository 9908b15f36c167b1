//! Loose-material piles
//!
//! Hay strands, pellets, lettuce and chopped food are scattered as
//! instanced batches. Positions are sampled uniformly over a disk by taking
//! the square root of the radius fraction; a plain uniform radius would
//! bunch pieces up in the middle. Every instance draws its random values in
//! the same fixed order, so a seed reproduces a layout piece for piece.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use cavy_scene::{
    seeded_rng, Color, Geometry, InstancedBatch, Material, Model, Node, SceneRng,
};

use crate::food::{FoodCategory, FoodPortion};

/// Hay strands drawn inside a full rack
const RACK_INTERIOR_MAX: f32 = 150.0;
/// Strands poking out between the bars of a full rack
const RACK_POKING_MAX: f32 = 40.0;
/// Servings a rack holds before spilling over the top
const RACK_CAPACITY: f32 = 5.0;
const RACK_OVERFLOW_PER_SERVING: usize = 20;
const RACK_OVERFLOW_MAX: usize = 40;
/// A bowl never shows more than this many servings of one portion
const BOWL_MAX_PORTION_SERVINGS: u32 = 4;

const HAY_PALETTE: [u32; 4] = [0xd8c07a, 0xc9b26b, 0xb5a55a, 0x9aa85a];
const LETTUCE_PALETTE: [u32; 3] = [0x6a994e, 0x8cb369, 0xa7c957];

/// Uniform-area point in a disk of `max_radius`
pub fn disk_point(rng: &mut impl SceneRng, max_radius: f32) -> Vec2 {
    let angle = rng.next_f32() * TAU;
    let radius = rng.next_f32().sqrt() * max_radius;
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

/// Region and per-instance variation for one scatter
#[derive(Debug, Clone)]
pub(crate) struct Scatter {
    pub(crate) count: usize,
    /// Disk radii along X and Z (equal for a circle)
    pub(crate) radius: Vec2,
    pub(crate) center: Vec3,
    pub(crate) height: (f32, f32),
    pub(crate) scale: (f32, f32),
    /// Base rotation before random jitter
    pub(crate) base_rotation: Vec3,
    /// Max absolute jitter on X/Z rotation; Y is a full turn
    pub(crate) tilt: f32,
    pub(crate) palette: Vec<Color>,
    /// Max relative brightness change per instance
    pub(crate) shade: f32,
}

impl Scatter {
    pub(crate) fn new(count: usize, radius: f32) -> Self {
        Self {
            count,
            radius: Vec2::splat(radius),
            center: Vec3::ZERO,
            height: (0.0, 0.0),
            scale: (1.0, 1.0),
            base_rotation: Vec3::ZERO,
            tilt: 0.0,
            palette: Vec::new(),
            shade: 0.0,
        }
    }

    /// Fill a new batch. Draw order per instance: angle, radius, height,
    /// tilt x, yaw, tilt z, scale, palette index, shade.
    pub(crate) fn build(&self, geometry: Geometry, material: Arc<Material>, rng: &mut impl SceneRng) -> InstancedBatch {
        let mut batch = InstancedBatch::new(geometry, material, self.count);
        if !self.palette.is_empty() {
            batch = batch.with_colors();
        }

        for i in 0..self.count {
            let disk = disk_point(rng, 1.0) * self.radius;
            let y = rng.range(self.height.0, self.height.1.max(self.height.0));
            let rx = self.base_rotation.x + rng.spread(self.tilt);
            let ry = self.base_rotation.y + rng.next_f32() * TAU;
            let rz = self.base_rotation.z + rng.spread(self.tilt);
            let scale = rng.range(self.scale.0, self.scale.1.max(self.scale.0));

            let position = self.center + Vec3::new(disk.x, y, disk.y);
            let rotation = Quat::from_euler(EulerRot::YXZ, ry, rx, rz);
            let matrix = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, position);
            if let Err(e) = batch.set_matrix_at(i, matrix) {
                log::warn!("Scatter write failed: {}", e);
            }

            if !self.palette.is_empty() {
                let pick = ((rng.next_f32() * self.palette.len() as f32) as usize)
                    .min(self.palette.len() - 1);
                let shade = 1.0 + rng.spread(self.shade);
                if let Err(e) = batch.set_color_at(i, self.palette[pick].scaled(shade)) {
                    log::warn!("Scatter color write failed: {}", e);
                }
            }
        }

        batch.finalize();
        batch
    }
}

pub(crate) fn palette(hexes: &[u32]) -> Vec<Color> {
    hexes.iter().map(|h| Color::from_hex(*h)).collect()
}

fn hay_strand() -> Geometry {
    Geometry::cylinder(0.008, 0.008, 0.35, 3, true)
}

fn hay_material() -> Arc<Material> {
    Material::standard(Color::WHITE).with_roughness(0.95).shared()
}

fn pile_model(name: &str, batch_name: &str, batch: InstancedBatch) -> Model {
    let mut model = Model::new(name);
    model.add(Node::instanced(batch).named(batch_name));
    model
}

/// Loose hay lying in a disk on the floor.
pub fn build_hay_pile(count: usize, seed: u32, radius: f32) -> Model {
    let mut rng = seeded_rng(seed);
    let scatter = Scatter {
        height: (0.0, 0.12),
        scale: (0.7, 1.3),
        base_rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        tilt: 0.35,
        palette: palette(&HAY_PALETTE),
        shade: 0.1,
        ..Scatter::new(count, radius)
    };
    let batch = scatter.build(hay_strand(), hay_material(), &mut rng);
    pile_model("hay_pile", "hay", batch)
}

/// Pellets heaped in a disk; one shared material for every pellet.
pub fn build_pellet_pile(count: usize, seed: u32, radius: f32, color: Color) -> Model {
    let mut rng = seeded_rng(seed);
    let scatter = Scatter {
        height: (0.0, 0.08),
        scale: (0.85, 1.15),
        tilt: 1.2,
        palette: vec![color],
        shade: 0.12,
        ..Scatter::new(count, radius)
    };
    let geometry = Geometry::cylinder(0.035, 0.035, 0.09, 6, false);
    let material = Material::standard(Color::WHITE).shared();
    let batch = scatter.build(geometry, material, &mut rng);
    pile_model("pellet_pile", "pellets", batch)
}

/// Torn lettuce leaves lying mostly flat.
pub fn build_lettuce_pile(count: usize, seed: u32, radius: f32) -> Model {
    let mut rng = seeded_rng(seed);
    let scatter = Scatter {
        height: (0.0, 0.1),
        scale: (0.8, 1.25),
        tilt: 0.5,
        palette: palette(&LETTUCE_PALETTE),
        shade: 0.08,
        ..Scatter::new(count, radius)
    };
    let geometry = Geometry::cuboid(0.22, 0.01, 0.16);
    let material = Material::standard(Color::WHITE).with_roughness(0.5).shared();
    let batch = scatter.build(geometry, material, &mut rng);
    pile_model("lettuce_pile", "lettuce", batch)
}

/// How a bowl pile is drawn at a container serving count
#[derive(Debug, Clone, Copy, PartialEq)]
struct ServingTier {
    height_scale: f32,
    lift: f32,
    /// Servings of any one portion the bowl shows at most
    max_portion_servings: u32,
}

fn serving_tier(servings: u32) -> Option<ServingTier> {
    match servings {
        0 => None,
        1 => Some(ServingTier {
            height_scale: 0.6,
            lift: 0.08,
            max_portion_servings: 1,
        }),
        _ => Some(ServingTier {
            height_scale: 1.0,
            lift: 0.14,
            max_portion_servings: BOWL_MAX_PORTION_SERVINGS,
        }),
    }
}

/// Food heaped in a bowl. Each portion becomes its own batch, scaled by
/// the container's serving tier, which also caps how many servings of a
/// portion get drawn. Zero servings gives an empty model.
pub fn build_food_pile(portions: &[FoodPortion], servings: u32, seed: u32) -> Model {
    let mut model = Model::new("food_pile");
    let Some(tier) = serving_tier(servings) else {
        return model;
    };
    let radius = 0.65;

    for (i, portion) in portions.iter().enumerate() {
        let shown = portion.servings.min(tier.max_portion_servings);
        let count = portion.category.pieces_per_serving() * shown as usize;
        if count == 0 {
            continue;
        }
        let portion_seed = seed.wrapping_add((i as u32).wrapping_mul(97));
        let mut pile = match portion.category {
            FoodCategory::Pellets => {
                build_pellet_pile(count, portion_seed, radius, portion.display_color())
            }
            FoodCategory::Greens => build_lettuce_pile(count, portion_seed, radius),
            FoodCategory::Hay => build_hay_pile(count, portion_seed, radius),
            FoodCategory::Vegetable | FoodCategory::Fruit | FoodCategory::Treat => {
                build_chunk_pile(count, portion_seed, radius, portion.display_color())
            }
        };
        let root = pile.root_transform_mut();
        root.position.y = tier.lift + i as f32 * 0.02;
        root.scale = Vec3::new(1.0, tier.height_scale, 1.0);

        let root = model.root();
        if let Err(e) = model.graft(root, pile) {
            log::warn!("Failed to attach food portion {}: {}", portion.item_id, e);
        }
    }

    model
}

fn build_chunk_pile(count: usize, seed: u32, radius: f32, color: Color) -> Model {
    let mut rng = seeded_rng(seed);
    let scatter = Scatter {
        height: (0.0, 0.1),
        scale: (0.8, 1.2),
        tilt: std::f32::consts::PI,
        palette: vec![color],
        shade: 0.1,
        ..Scatter::new(count, radius)
    };
    let geometry = Geometry::cuboid(0.09, 0.07, 0.09);
    let batch = scatter.build(geometry, Material::standard(Color::WHITE).shared(), &mut rng);
    pile_model("chunk_pile", "chunks", batch)
}

/// Strand counts for a hay rack at a serving count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HayRackCounts {
    pub interior: usize,
    pub poking: usize,
    pub overflow: usize,
}

pub fn hay_rack_counts(servings: u32) -> HayRackCounts {
    let fill = (servings as f32 / RACK_CAPACITY).min(1.0);
    let spill = servings.saturating_sub(3) as usize;
    HayRackCounts {
        interior: (RACK_INTERIOR_MAX * fill).floor() as usize,
        poking: (RACK_POKING_MAX * fill).floor() as usize,
        overflow: (spill * RACK_OVERFLOW_PER_SERVING).min(RACK_OVERFLOW_MAX),
    }
}

/// Hay for a rack: strands packed inside, strands poking out between the
/// bars, and an overflow tuft on top once the rack is nearly full.
pub fn build_hay_rack_hay(servings: u32, seed: u32) -> Model {
    let counts = hay_rack_counts(servings);
    let mut rng = seeded_rng(seed);
    let material = hay_material();
    let mut model = Model::new("rack_hay");

    let interior = Scatter {
        radius: Vec2::new(0.85, 0.22),
        center: Vec3::new(0.0, 0.0, -0.05),
        height: (0.15, 0.15 + 0.95 * (servings as f32 / RACK_CAPACITY).min(1.0)),
        scale: (0.8, 1.2),
        base_rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        tilt: 0.6,
        palette: palette(&HAY_PALETTE),
        shade: 0.1,
        ..Scatter::new(counts.interior, 1.0)
    };
    let batch = interior.build(hay_strand(), material.clone(), &mut rng);
    model.add(Node::instanced(batch).named("interior_hay"));

    let poking = Scatter {
        radius: Vec2::new(0.9, 0.05),
        center: Vec3::new(0.0, 0.0, 0.32),
        height: (0.2, 1.0),
        scale: (0.6, 1.0),
        base_rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        tilt: 0.25,
        palette: palette(&HAY_PALETTE),
        shade: 0.1,
        ..Scatter::new(counts.poking, 1.0)
    };
    let batch = poking.build(hay_strand(), material.clone(), &mut rng);
    model.add(Node::instanced(batch).named("poking_hay"));

    let overflow = Scatter {
        radius: Vec2::new(0.8, 0.3),
        center: Vec3::new(0.0, 1.15, 0.0),
        height: (0.0, 0.2),
        scale: (0.8, 1.3),
        base_rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        tilt: 0.8,
        palette: palette(&HAY_PALETTE),
        shade: 0.1,
        ..Scatter::new(counts.overflow, 1.0)
    };
    let batch = overflow.build(hay_strand(), material, &mut rng);
    model.add(Node::instanced(batch).named("overflow_hay"));

    model
}
