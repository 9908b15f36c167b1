//! The food piece shown in the player's hand during hand-feeding

use glam::Vec3;

use cavy_scene::{Color, Geometry, Material, Model, Node};

use crate::food::FoodCategory;

/// Pick a display color for a held food. An explicit `#rrggbb` color wins,
/// then the category's table color, then the pellet color.
pub fn resolve_food_color(color: Option<&str>, category: Option<&str>) -> Color {
    color
        .and_then(Color::parse_hex)
        .or_else(|| {
            category
                .and_then(|c| c.parse::<FoodCategory>().ok())
                .map(|c| c.color())
        })
        .unwrap_or_else(|| FoodCategory::default().color())
}

/// Small food piece sized to sit at a hand's grip point. Shape follows the
/// category; unknown categories get a pellet.
pub fn build_held_food(item_id: &str, color: Option<&str>, category: Option<&str>) -> Model {
    let tint = resolve_food_color(color, category);
    let category = category
        .and_then(|c| c.parse::<FoodCategory>().ok())
        .unwrap_or_default();
    let material = Material::standard(tint).with_roughness(0.6).shared();
    let mut model = Model::new("held_food");

    match category {
        FoodCategory::Greens => {
            model.add(
                Node::mesh(Geometry::sphere(0.22, 10, 6), material)
                    .named("food_piece")
                    .scaled(Vec3::new(1.0, 0.15, 0.8)),
            );
        }
        FoodCategory::Hay => {
            for (i, yaw) in [-0.25f32, 0.0, 0.25].into_iter().enumerate() {
                model.add(
                    Node::mesh(Geometry::cylinder(0.012, 0.012, 0.5, 4, false), material.clone())
                        .named("food_piece")
                        .at(Vec3::new(0.0, 0.0, i as f32 * 0.02))
                        .rotated(Vec3::new(std::f32::consts::FRAC_PI_2, yaw, 0.0)),
                );
            }
        }
        FoodCategory::Pellets => {
            model.add(
                Node::mesh(Geometry::cylinder(0.05, 0.05, 0.14, 8, false), material)
                    .named("food_piece")
                    .rotated(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2)),
            );
        }
        FoodCategory::Vegetable | FoodCategory::Fruit | FoodCategory::Treat => {
            model.add(
                Node::mesh(Geometry::cuboid(0.16, 0.12, 0.16), material)
                    .named("food_piece")
                    .rotated(Vec3::new(0.3, 0.5, 0.0)),
            );
        }
    }

    log::debug!("Built held food {} ({})", item_id, category);
    model
}
