use glam::Vec3;

use cavy_scene::{Color, Geometry, Material, Model, Node};

use crate::containers::{build_bowl, build_hay_rack, build_water_bottle};
use crate::food::ContainerContents;
use crate::furniture::{build_bedding, build_shelter, build_toy};
use crate::kind::{ItemDefinition, ItemKind};

const DEFAULT_BOWL_COLOR: u32 = 0xf1faee;

/// Build the model for a placed item. Containers use `contents`; other
/// kinds ignore it. Unknown items get a neutral marker block.
pub fn build_item(
    def: &ItemDefinition,
    placement_id: &str,
    contents: Option<&ContainerContents>,
) -> Model {
    match def.kind {
        ItemKind::Bowl => build_bowl(
            placement_id,
            def.color.unwrap_or(Color::from_hex(DEFAULT_BOWL_COLOR)),
            contents,
        ),
        ItemKind::HayRack => build_hay_rack(placement_id, contents),
        ItemKind::WaterBottle => build_water_bottle(placement_id, contents),
        ItemKind::Bedding(kind) => build_bedding(kind, placement_id, def.color),
        ItemKind::Shelter(kind) => build_shelter(kind, def.color),
        ItemKind::Toy(kind) => build_toy(kind, def.color),
        ItemKind::Other => {
            log::debug!("No builder for {}, using marker", def.id);
            let mut model = Model::new("marker");
            let material = Material::standard(def.color.unwrap_or(Color::from_hex(0x9e9e9e)))
                .shared();
            model.add(
                Node::mesh(Geometry::cuboid(0.6, 0.6, 0.6), material)
                    .named("marker")
                    .at(Vec3::new(0.0, 0.3, 0.0)),
            );
            model
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_kind() {
        let rack = build_item(
            &ItemDefinition::from_id("timothy_hay_rack"),
            "rack_7",
            Some(&ContainerContents::servings(5)),
        );
        assert_eq!(rack.name(), Some("hay_rack"));
        assert!(rack.find_by_name("interior_hay").is_some());

        let bowl = build_item(&ItemDefinition::from_id("ceramic_bowl"), "bowl_1", None);
        assert_eq!(bowl.name(), Some("bowl"));

        let lamp = build_item(&ItemDefinition::from_id("heat_lamp"), "lamp_1", None);
        assert_eq!(lamp.name(), Some("marker"));
    }

    #[test]
    fn test_non_containers_ignore_contents() {
        let contents = ContainerContents::servings(3);
        let def = ItemDefinition::from_id("fleece_blanket");
        assert_eq!(
            build_item(&def, "bed_1", Some(&contents)),
            build_item(&def, "bed_1", None)
        );
    }
}
