//! Guinea pig model builder
//!
//! The body plan is fixed: torso pivot (body + head group), two ears,
//! two eyes with highlights, nose, two mouth parts and four feet. Feet hang
//! off the root so tilting the torso never lifts them off the floor.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use cavy_scene::{seeded_rng, Color, Geometry, Material, Model, Node, NodeId, Texture};

use crate::animation::CreatureAnimState;

/// The four colors a guinea pig is parameterized by
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default = "default_fur")]
    pub fur: Color,
    #[serde(default = "default_ear")]
    pub ear: Color,
    #[serde(default = "default_skin")]
    pub skin: Color,
    #[serde(default = "default_eye")]
    pub eye: Color,
}

fn default_fur() -> Color {
    Color::from_hex(0xc68642)
}

fn default_ear() -> Color {
    Color::from_hex(0xd4a373)
}

fn default_skin() -> Color {
    Color::from_hex(0xf4b6a6)
}

fn default_eye() -> Color {
    Color::from_hex(0x1a1a1a)
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            fur: default_fur(),
            ear: default_ear(),
            skin: default_skin(),
            eye: default_eye(),
        }
    }
}

impl Appearance {
    /// Stable seed for the fur texture and blink schedule
    pub fn seed(&self) -> u32 {
        [self.fur, self.ear, self.skin, self.eye]
            .iter()
            .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c.to_hex()))
    }
}

/// Foot slots, in the order stored by the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Foot {
    FrontLeft = 0,
    FrontRight = 1,
    BackLeft = 2,
    BackRight = 3,
}

impl Foot {
    pub const ALL: [Foot; 4] = [
        Foot::FrontLeft,
        Foot::FrontRight,
        Foot::BackLeft,
        Foot::BackRight,
    ];

    /// Diagonal gait pairing: FL+BR move together, FR+BL opposite
    pub fn gait_phase_offset(self) -> f32 {
        match self {
            Foot::FrontLeft | Foot::BackRight => 0.0,
            Foot::FrontRight | Foot::BackLeft => std::f32::consts::PI,
        }
    }
}

/// Node handles and animation state for one guinea pig
#[derive(Debug, Clone, PartialEq)]
pub struct GuineaPigRig {
    pub torso: NodeId,
    pub body: NodeId,
    pub head: NodeId,
    pub ears: [NodeId; 2],
    pub eyes: [NodeId; 2],
    pub eye_shine: [NodeId; 2],
    pub nose: NodeId,
    pub mouth: [NodeId; 2],
    pub feet: [NodeId; 4],
    pub body_base_scale: Vec3,
    pub head_base_rotation: Vec3,
    pub eye_base_scale: Vec3,
    pub state: CreatureAnimState,
}

impl GuineaPigRig {
    pub fn foot(&self, foot: Foot) -> NodeId {
        self.feet[foot as usize]
    }
}

/// A freshly built guinea pig
#[derive(Debug, Clone, PartialEq)]
pub struct GuineaPig {
    pub model: Model,
    pub rig: GuineaPigRig,
}

const BODY_SCALE: Vec3 = Vec3::new(0.9, 0.75, 1.3);
const BODY_CENTER: Vec3 = Vec3::new(0.0, 0.75, 0.0);
const HEAD_CENTER: Vec3 = Vec3::new(0.0, 0.95, 1.15);
const EYE_SCALE: Vec3 = Vec3::ONE;

const FOOT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.45, 0.08, 0.7),
    Vec3::new(-0.45, 0.08, 0.7),
    Vec3::new(0.5, 0.08, -0.75),
    Vec3::new(-0.5, 0.08, -0.75),
];

/// Build a guinea pig model and its rig.
pub fn build_guinea_pig(appearance: &Appearance) -> GuineaPig {
    let seed = appearance.seed();
    let fur = Material::standard(appearance.fur)
        .with_map(Arc::new(Texture::fur(appearance.fur, 64, seed)))
        .shared();
    let ear = Material::standard(appearance.ear).shared();
    let skin = Material::standard(appearance.skin).shared();
    let eye = Material::standard(appearance.eye)
        .with_roughness(0.2)
        .shared();
    let shine = Material::standard(Color::WHITE)
        .with_emissive(Color::rgb(0.4, 0.4, 0.4))
        .shared();
    let mouth_color = Material::standard(appearance.skin.scaled(0.75)).shared();

    let mut model = Model::new("guinea_pig");
    let torso = model.add(Node::group().named("torso"));

    let body = child(
        &mut model,
        torso,
        Node::mesh(Geometry::sphere(1.0, 24, 16), fur.clone())
            .named("body")
            .at(BODY_CENTER)
            .scaled(BODY_SCALE),
    );

    let head = child(&mut model, torso, Node::group().named("head").at(HEAD_CENTER));
    child(
        &mut model,
        head,
        Node::mesh(Geometry::sphere(0.6, 20, 14), fur)
            .named("skull")
            .scaled(Vec3::new(0.9, 0.85, 1.0)),
    );

    let ears = [1.0f32, -1.0].map(|side| {
        child(
            &mut model,
            head,
            Node::mesh(Geometry::sphere(0.18, 10, 8), ear.clone())
                .named(if side > 0.0 { "ear_left" } else { "ear_right" })
                .at(Vec3::new(0.38 * side, 0.42, -0.1))
                .rotated(Vec3::new(0.0, 0.0, 0.4 * side))
                .scaled(Vec3::new(1.0, 0.4, 0.8)),
        )
    });

    let eyes = [1.0f32, -1.0].map(|side| {
        child(
            &mut model,
            head,
            Node::mesh(Geometry::sphere(0.09, 10, 8), eye.clone())
                .named(if side > 0.0 { "eye_left" } else { "eye_right" })
                .at(Vec3::new(0.33 * side, 0.15, 0.38))
                .scaled(EYE_SCALE),
        )
    });
    let eye_shine = eyes.map(|eye_id| {
        child(
            &mut model,
            eye_id,
            Node::mesh(Geometry::sphere(0.025, 6, 4), shine.clone())
                .named("eye_shine")
                .at(Vec3::new(0.0, 0.03, 0.07)),
        )
    });

    let nose = child(
        &mut model,
        head,
        Node::mesh(Geometry::sphere(0.07, 8, 6), skin.clone())
            .named("nose")
            .at(Vec3::new(0.0, -0.05, 0.58)),
    );

    let mouth = [1.0f32, -1.0].map(|side| {
        child(
            &mut model,
            head,
            Node::mesh(Geometry::cylinder(0.015, 0.015, 0.12, 6, false), mouth_color.clone())
                .named("mouth")
                .at(Vec3::new(0.04 * side, -0.2, 0.52))
                .rotated(Vec3::new(0.0, 0.0, 0.5 * side)),
        )
    });

    let feet = FOOT_POSITIONS.map(|pos| {
        model.add(
            Node::mesh(Geometry::sphere(0.15, 10, 6), skin.clone())
                .named("foot")
                .at(pos)
                .scaled(Vec3::new(1.0, 0.5, 1.4)),
        )
    });

    let foot_rest = feet.map(|id| {
        model
            .node(id)
            .map(|n| n.transform.position)
            .unwrap_or_default()
    });

    log::debug!(
        "Built guinea pig model ({} nodes, fur #{:06x})",
        model.node_count(),
        appearance.fur.to_hex()
    );

    let rig = GuineaPigRig {
        torso,
        body,
        head,
        ears,
        eyes,
        eye_shine,
        nose,
        mouth,
        feet,
        body_base_scale: BODY_SCALE,
        head_base_rotation: Vec3::ZERO,
        eye_base_scale: EYE_SCALE,
        state: CreatureAnimState::new(foot_rest, seeded_rng(seed)),
    };

    GuineaPig { model, rig }
}

fn child(model: &mut Model, parent: NodeId, node: Node) -> NodeId {
    // Parents are created just above, so this cannot miss
    model
        .add_child(parent, node)
        .unwrap_or_else(|_| model.root())
}
