//! Bedding, shelters and toys
//!
//! Loose bedding (paper, aspen) is scattered from the placement seed like
//! food piles. Static wooden props (the chew stick, hideout knobs) are
//! roughened with an unseeded generator and look slightly different on
//! every build.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use glam::{Vec2, Vec3};

use cavy_scene::{
    displace, seed_from_identifier, seeded_rng, Color, Geometry, Material, Model, Node, SceneRng,
    Texture,
};

use crate::kind::{BeddingKind, ShelterKind, ToyKind};
use crate::piles::{palette, Scatter};

/// Bedding covers one grid cell
const BEDDING_SIZE: f32 = 2.8;

const PAPER_PALETTE: [u32; 4] = [0xf1faee, 0xa8dadc, 0xffd6a5, 0xcdb4db];
const ASPEN_PALETTE: [u32; 3] = [0xe9d8a6, 0xdcc48e, 0xc8ad7f];

pub fn build_bedding(kind: BeddingKind, placement_id: &str, color: Option<Color>) -> Model {
    let seed = seed_from_identifier(placement_id);
    let mut model = Model::new("bedding");

    match kind {
        BeddingKind::Fleece => {
            let base = color.unwrap_or(Color::from_hex(0x9d8df1));
            let material = Material::standard(base)
                .with_roughness(1.0)
                .with_map(Arc::new(Texture::fleece(base, 64, seed)))
                .shared();
            model.add(
                Node::mesh(Geometry::cuboid(BEDDING_SIZE, 0.06, BEDDING_SIZE), material.clone())
                    .named("fleece")
                    .at(Vec3::new(0.0, 0.03, 0.0)),
            );
            // Rolled edge along the back
            model.add(
                Node::mesh(Geometry::cylinder(0.12, 0.12, BEDDING_SIZE, 12, false), material)
                    .named("fleece_roll")
                    .at(Vec3::new(0.0, 0.12, -BEDDING_SIZE * 0.5 + 0.12))
                    .rotated(Vec3::new(0.0, 0.0, FRAC_PI_2)),
            );
        }
        BeddingKind::Paper => {
            let scatter = Scatter {
                radius: Vec2::splat(BEDDING_SIZE * 0.5),
                height: (0.0, 0.08),
                scale: (0.7, 1.3),
                tilt: 0.4,
                palette: color.map(|c| vec![c]).unwrap_or_else(|| palette(&PAPER_PALETTE)),
                shade: 0.05,
                ..Scatter::new(220, BEDDING_SIZE * 0.5)
            };
            let batch = scatter.build(
                Geometry::cuboid(0.14, 0.02, 0.1),
                Material::standard(Color::WHITE).with_roughness(1.0).shared(),
                &mut seeded_rng(seed),
            );
            model.add(Node::instanced(batch).named("paper_pieces"));
        }
        BeddingKind::Aspen => {
            let scatter = Scatter {
                radius: Vec2::splat(BEDDING_SIZE * 0.5),
                height: (0.0, 0.1),
                scale: (0.6, 1.4),
                tilt: 0.5,
                palette: palette(&ASPEN_PALETTE),
                shade: 0.08,
                ..Scatter::new(260, BEDDING_SIZE * 0.5)
            };
            let batch = scatter.build(
                Geometry::sphere(0.08, 6, 4).scaled(Vec3::new(1.6, 0.2, 0.7)),
                Material::standard(Color::WHITE).with_roughness(0.9).shared(),
                &mut seeded_rng(seed),
            );
            model.add(Node::instanced(batch).named("aspen_shavings"));
        }
    }

    log::debug!("Built {:?} bedding for {}", kind, placement_id);
    model
}

pub fn build_shelter(kind: ShelterKind, color: Option<Color>) -> Model {
    let mut model = Model::new("shelter");

    match kind {
        ShelterKind::Hideout => {
            let wood_color = color.unwrap_or(Color::from_hex(0xa47148));
            let wood = Material::standard(wood_color)
                .with_map(Arc::new(Texture::wood(wood_color, 64, wood_color.to_hex())))
                .shared();
            let (w, h, d) = (2.4, 1.4, 1.8);
            model.add(
                Node::mesh(Geometry::cuboid(w, h, 0.1), wood.clone())
                    .named("hideout_back")
                    .at(Vec3::new(0.0, h * 0.5, -d * 0.5)),
            );
            for side in [-1.0f32, 1.0] {
                model.add(
                    Node::mesh(Geometry::cuboid(0.1, h, d), wood.clone())
                        .named("hideout_side")
                        .at(Vec3::new(side * w * 0.5, h * 0.5, 0.0)),
                );
                // Front posts either side of the doorway
                model.add(
                    Node::mesh(Geometry::cuboid(0.6, h, 0.1), wood.clone())
                        .named("hideout_front")
                        .at(Vec3::new(side * (w * 0.5 - 0.3), h * 0.5, d * 0.5)),
                );
            }
            model.add(
                Node::mesh(Geometry::cuboid(w + 0.3, 0.12, d + 0.3), wood.clone())
                    .named("hideout_roof")
                    .at(Vec3::new(0.0, h + 0.06, 0.0)),
            );

            let mut rng = rand::rng();
            for x in [-0.7f32, 0.1, 0.8] {
                let mut knob = Geometry::sphere(0.09, 8, 6);
                displace(&mut knob, 0.015, 0.0, &mut rng);
                model.add(
                    Node::mesh(knob, wood.clone())
                        .named("bark_knob")
                        .at(Vec3::new(x, h + 0.14, rng.spread(d * 0.3))),
                );
            }
        }
        ShelterKind::Tunnel => {
            let material = Material::standard(color.unwrap_or(Color::from_hex(0x8ecae6)))
                .with_roughness(0.7)
                .shared();
            let radius = 0.75;
            model.add(
                Node::mesh(Geometry::cylinder(radius, radius, 3.0, 20, true), material.clone())
                    .named("tunnel_tube")
                    .at(Vec3::new(0.0, radius, 0.0))
                    .rotated(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            );
            for z in [-1.5f32, 1.5] {
                model.add(
                    Node::mesh(Geometry::torus(radius, 0.05, 8, 24, TAU), material.clone())
                        .named("tunnel_rim")
                        .at(Vec3::new(0.0, radius, z)),
                );
            }
        }
        ShelterKind::Igloo => {
            // Default pink plastic is translucent; tinted igloos are opaque
            let material = match color {
                Some(c) => Material::standard(c),
                None => Material::glass(Color::from_hex(0xffafcc), 0.85),
            }
            .with_roughness(0.4)
            .shared();
            model.add(
                Node::mesh(
                    Geometry::sphere_section(1.2, 24, 12, 0.0, FRAC_PI_2),
                    material.clone(),
                )
                .named("igloo_dome"),
            );
            model.add(
                Node::mesh(Geometry::torus(0.5, 0.12, 8, 16, PI), material)
                    .named("igloo_entrance")
                    .at(Vec3::new(0.0, 0.0, 1.1)),
            );
        }
    }

    log::debug!("Built {:?} shelter", kind);
    model
}

pub fn build_toy(kind: ToyKind, color: Option<Color>) -> Model {
    let mut model = Model::new("toy");

    match kind {
        ToyKind::Ball => {
            let wicker = Material::standard(color.unwrap_or(Color::from_hex(0xd4a373)))
                .with_roughness(0.9)
                .shared();
            let radius = 0.4;
            model.add(
                Node::mesh(Geometry::sphere(radius * 0.85, 12, 8), wicker.clone())
                    .named("ball_core")
                    .at(Vec3::new(0.0, radius, 0.0)),
            );
            // Three woven rings on orthogonal axes
            let rings = [
                Vec3::ZERO,
                Vec3::new(FRAC_PI_2, 0.0, 0.0),
                Vec3::new(0.0, FRAC_PI_2, 0.0),
            ];
            for rotation in rings {
                model.add(
                    Node::mesh(Geometry::torus(radius, 0.04, 6, 24, TAU), wicker.clone())
                        .named("ball_ring")
                        .at(Vec3::new(0.0, radius, 0.0))
                        .rotated(rotation),
                );
            }
        }
        ToyKind::Stick => {
            let bark = Material::standard(color.unwrap_or(Color::from_hex(0x7f5539)))
                .with_roughness(0.95)
                .shared();
            let mut rng = rand::rng();
            let mut stick = Geometry::cylinder(0.07, 0.09, 1.6, 8, false);
            displace(&mut stick, 0.02, 0.03, &mut rng);
            model.add(
                Node::mesh(stick, bark.clone())
                    .named("stick")
                    .at(Vec3::new(0.0, 0.09, 0.0))
                    .rotated(Vec3::new(0.0, rng.range(0.0, PI), FRAC_PI_2)),
            );
            let stick_id = model.find_by_name("stick").unwrap_or(model.root());
            for y in [-0.4f32, 0.35] {
                let mut knob = Geometry::sphere(0.06, 6, 4);
                displace(&mut knob, 0.01, 0.0, &mut rng);
                let node = Node::mesh(knob, bark.clone())
                    .named("bark_knob")
                    .at(Vec3::new(0.08, y, 0.0));
                if let Err(e) = model.add_child(stick_id, node) {
                    log::warn!("Failed to attach knob: {}", e);
                }
            }
        }
        ToyKind::Fallback => {
            let base = color.unwrap_or(Color::from_hex(0xe9c46a));
            let wood = Material::standard(base)
                .with_map(Arc::new(Texture::wood(base, 32, base.to_hex())))
                .shared();
            model.add(
                Node::mesh(Geometry::cuboid(0.5, 0.5, 0.5), wood)
                    .named("chew_block")
                    .at(Vec3::new(0.0, 0.25, 0.0))
                    .rotated(Vec3::new(0.0, 0.4, 0.0)),
            );
        }
    }

    log::debug!("Built {:?} toy", kind);
    model
}
