//! Food and water containers
//!
//! Shells are built at a fixed size. Contents are delegated to the pile
//! builders with a seed derived from the placement id, never from the
//! serving count, so the same rack refilled to the same level looks
//! identical.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use glam::Vec3;

use cavy_scene::{seed_from_identifier, Color, Geometry, Material, Model, Node, NodeId, Texture};

use crate::food::ContainerContents;
use crate::piles::{build_food_pile, build_hay_rack_hay};

const BOWL_RADIUS: f32 = 1.0;
const BOWL_BASE_RADIUS: f32 = 0.8;
const BOWL_HEIGHT: f32 = 0.45;
const RACK_WIDTH: f32 = 2.2;
const RACK_HEIGHT: f32 = 1.6;
const RACK_BARS: usize = 7;
/// Servings that fill a bottle
const BOTTLE_CAPACITY: f32 = 4.0;
const BOTTLE_HEIGHT: f32 = 1.4;

fn graft_contents(model: &mut Model, parent: NodeId, contents: Model) {
    let name = contents.name().unwrap_or("contents").to_string();
    if let Err(e) = model.graft(parent, contents) {
        log::warn!("Failed to attach {}: {}", name, e);
    }
}

/// Ceramic bowl, with a food pile when `contents` has servings.
pub fn build_bowl(placement_id: &str, color: Color, contents: Option<&ContainerContents>) -> Model {
    let ceramic = Material::standard(color).with_roughness(0.35).shared();
    let mut model = Model::new("bowl");

    model.add(
        Node::mesh(
            Geometry::cylinder(BOWL_RADIUS, BOWL_BASE_RADIUS, BOWL_HEIGHT, 28, true),
            ceramic.clone(),
        )
        .named("bowl_wall")
        .at(Vec3::new(0.0, BOWL_HEIGHT * 0.5, 0.0)),
    );
    model.add(
        Node::mesh(
            Geometry::cylinder(BOWL_BASE_RADIUS, BOWL_BASE_RADIUS, 0.06, 28, false),
            ceramic.clone(),
        )
        .named("bowl_base")
        .at(Vec3::new(0.0, 0.03, 0.0)),
    );
    model.add(
        Node::mesh(Geometry::torus(BOWL_RADIUS, 0.06, 8, 32, TAU), ceramic)
            .named("bowl_rim")
            .at(Vec3::new(0.0, BOWL_HEIGHT, 0.0))
            .rotated(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
    );

    if let Some(contents) = contents.filter(|c| !c.is_empty()) {
        let seed = seed_from_identifier(placement_id);
        let pile = build_food_pile(&contents.portions, contents.servings, seed);
        let root = model.root();
        graft_contents(&mut model, root, pile);
    }

    log::debug!("Built bowl {} ({} nodes)", placement_id, model.node_count());
    model
}

/// Wooden hay rack with bars; hay scales with the serving count.
pub fn build_hay_rack(placement_id: &str, contents: Option<&ContainerContents>) -> Model {
    let seed = seed_from_identifier(placement_id);
    let wood_color = Color::from_hex(0xb08968);
    let wood = Material::standard(wood_color)
        .with_map(Arc::new(Texture::wood(wood_color, 64, seed)))
        .shared();
    let metal = Material::metallic(Color::from_hex(0xb0b0b0), 0.4).shared();
    let mut model = Model::new("hay_rack");

    model.add(
        Node::mesh(Geometry::cuboid(RACK_WIDTH, RACK_HEIGHT, 0.12), wood.clone())
            .named("rack_back")
            .at(Vec3::new(0.0, RACK_HEIGHT * 0.5, -0.35)),
    );
    for side in [-1.0f32, 1.0] {
        model.add(
            Node::mesh(Geometry::cuboid(0.12, RACK_HEIGHT, 0.8), wood.clone())
                .named("rack_side")
                .at(Vec3::new(side * (RACK_WIDTH * 0.5 - 0.06), RACK_HEIGHT * 0.5, 0.0)),
        );
    }
    model.add(
        Node::mesh(Geometry::cuboid(RACK_WIDTH, 0.1, 0.8), wood)
            .named("rack_floor")
            .at(Vec3::new(0.0, 0.05, 0.0)),
    );

    let bar_len = RACK_HEIGHT - 0.3;
    let span = RACK_WIDTH - 0.4;
    for i in 0..RACK_BARS {
        let x = -span * 0.5 + span * i as f32 / (RACK_BARS - 1) as f32;
        model.add(
            Node::mesh(Geometry::cylinder(0.03, 0.03, bar_len, 8, false), metal.clone())
                .named("rack_bar")
                .at(Vec3::new(x, 0.1 + bar_len * 0.5, 0.35)),
        );
    }

    let servings = contents.map(|c| c.servings).unwrap_or(0);
    if servings > 0 {
        let hay = build_hay_rack_hay(servings, seed);
        let root = model.root();
        graft_contents(&mut model, root, hay);
    }

    log::debug!(
        "Built hay rack {} with {} servings (seed {})",
        placement_id,
        servings,
        seed
    );
    model
}

/// Water bottle on a wall bracket. `contents.servings` sets the fill level.
pub fn build_water_bottle(placement_id: &str, contents: Option<&ContainerContents>) -> Model {
    let glass = Material::glass(Color::from_hex(0xe0f2fe), 0.35).shared();
    let water = Material::glass(Color::from_hex(0x4fa3e0), 0.6).shared();
    let metal = Material::metallic(Color::from_hex(0xc0c0c0), 0.3).shared();
    let cap = Material::standard(Color::from_hex(0x2a9d8f)).shared();
    let mut model = Model::new("water_bottle");

    let bottle = model.add(Node::group().named("bottle").at(Vec3::new(0.0, 1.4, 0.0)));
    add(
        &mut model,
        bottle,
        Node::mesh(Geometry::cylinder(0.3, 0.3, BOTTLE_HEIGHT, 16, false), glass)
            .named("bottle_body"),
    );

    let fill = contents
        .map(|c| (c.servings as f32 / BOTTLE_CAPACITY).clamp(0.0, 1.0))
        .unwrap_or(0.0);
    let water_height = (BOTTLE_HEIGHT - 0.1) * fill;
    let water_node = Node::mesh(Geometry::cylinder(0.27, 0.27, 1.0, 16, false), water)
        .named("water")
        .at(Vec3::new(0.0, -BOTTLE_HEIGHT * 0.5 + 0.05 + water_height * 0.5, 0.0))
        .scaled(Vec3::new(1.0, water_height.max(0.001), 1.0));
    let water_node = if fill > 0.0 {
        water_node
    } else {
        water_node.hidden()
    };
    add(&mut model, bottle, water_node);

    add(
        &mut model,
        bottle,
        Node::mesh(Geometry::cylinder(0.22, 0.26, 0.18, 16, false), cap)
            .named("cap")
            .at(Vec3::new(0.0, -BOTTLE_HEIGHT * 0.5 - 0.09, 0.0)),
    );
    let spout = add(
        &mut model,
        bottle,
        Node::mesh(Geometry::cylinder(0.03, 0.04, 0.5, 8, false), metal.clone())
            .named("spout")
            .at(Vec3::new(0.12, -BOTTLE_HEIGHT * 0.5 - 0.35, 0.0))
            .rotated(Vec3::new(0.0, 0.0, 0.5)),
    );
    add(
        &mut model,
        spout,
        Node::mesh(Geometry::sphere(0.04, 8, 6), metal.clone())
            .named("spout_ball")
            .at(Vec3::new(0.0, -0.25, 0.0)),
    );

    for y in [0.35f32, -0.35] {
        model.add(
            Node::mesh(Geometry::torus(0.32, 0.015, 6, 24, PI), metal.clone())
                .named("bracket")
                .at(Vec3::new(0.0, 1.4 + y, 0.0))
                .rotated(Vec3::new(FRAC_PI_2, 0.0, PI)),
        );
    }

    log::debug!("Built water bottle {} at {:.0}% fill", placement_id, fill * 100.0);
    model
}

fn add(model: &mut Model, parent: NodeId, node: Node) -> NodeId {
    model
        .add_child(parent, node)
        .unwrap_or_else(|_| model.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::{FoodCategory, FoodPortion};
    use cavy_scene::NodeContent;

    fn capacity(model: &Model, name: &str) -> usize {
        let id = model.find_by_name(name).unwrap();
        match &model.node(id).unwrap().content {
            NodeContent::Instanced(b) => b.capacity(),
            _ => 0,
        }
    }

    #[test]
    fn test_hay_rack_with_five_servings() {
        let rack = build_hay_rack("rack_7", Some(&ContainerContents::servings(5)));
        assert_eq!(capacity(&rack, "interior_hay"), 150);
        assert!(rack.find_by_name("rack_bar").is_some());
    }

    #[test]
    fn test_hay_rack_refill_looks_identical() {
        let a = build_hay_rack("rack_7", Some(&ContainerContents::servings(3)));
        let b = build_hay_rack("rack_7", Some(&ContainerContents::servings(3)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_rack_has_no_hay() {
        let rack = build_hay_rack("rack_1", None);
        assert!(rack.find_by_name("interior_hay").is_none());
        let rack = build_hay_rack("rack_1", Some(&ContainerContents::servings(0)));
        assert!(rack.find_by_name("interior_hay").is_none());
    }

    #[test]
    fn test_bowl_contents() {
        let contents = ContainerContents::servings(2)
            .with_portion(FoodPortion::new("pellets", FoodCategory::Pellets, 2));
        let bowl = build_bowl("bowl_3", Color::WHITE, Some(&contents));
        assert_eq!(capacity(&bowl, "pellets"), 28);

        let empty = build_bowl("bowl_3", Color::WHITE, None);
        assert!(empty.find_by_name("food_pile").is_none());
        assert!(empty.find_by_name("bowl_rim").is_some());
    }

    #[test]
    fn test_bowl_seed_follows_placement_not_servings() {
        let contents = ContainerContents::servings(2)
            .with_portion(FoodPortion::new("pellets", FoodCategory::Pellets, 2));
        let a = build_bowl("bowl_a", Color::WHITE, Some(&contents));
        let b = build_bowl("bowl_b", Color::WHITE, Some(&contents));
        assert_ne!(a, b);
        assert_eq!(a, build_bowl("bowl_a", Color::WHITE, Some(&contents)));
    }

    #[test]
    fn test_water_level_follows_servings() {
        let full = build_water_bottle("bottle_1", Some(&ContainerContents::servings(4)));
        let half = build_water_bottle("bottle_1", Some(&ContainerContents::servings(2)));
        let empty = build_water_bottle("bottle_1", None);

        let level = |m: &Model| {
            let id = m.find_by_name("water").unwrap();
            (m.node(id).unwrap().transform.scale.y, m.node(id).unwrap().visible)
        };
        assert!(level(&full).0 > level(&half).0);
        assert!(level(&full).1);
        assert!(!level(&empty).1);
    }
}
