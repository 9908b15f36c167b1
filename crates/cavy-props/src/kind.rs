//! Item classification
//!
//! Inventory ids are free-form strings such as `"ceramic_bowl_large"` or
//! `"timothy_hay_rack"`. They are mapped to a closed `ItemKind` once, here,
//! and everything downstream matches on the enum.

use serde::{Deserialize, Serialize};

use cavy_scene::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BeddingKind {
    #[default]
    Fleece,
    Paper,
    Aspen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShelterKind {
    #[default]
    Hideout,
    Tunnel,
    Igloo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToyKind {
    Ball,
    Stick,
    /// Anything else is drawn as a generic chew block
    #[default]
    Fallback,
}

impl ToyKind {
    /// Map a toy subtype tag, or an id containing one, to a kind. Unknown
    /// tags fall back.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag.contains("ball") {
            ToyKind::Ball
        } else if tag.contains("stick") {
            ToyKind::Stick
        } else {
            ToyKind::Fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Bowl,
    HayRack,
    WaterBottle,
    Bedding(BeddingKind),
    Shelter(ShelterKind),
    Toy(ToyKind),
    Other,
}

impl ItemKind {
    /// Classify an inventory id by keyword. Order matters: `"hay_rack"`
    /// is a rack, not bedding, and `"water_bowl"` is a bowl.
    pub fn from_item_id(id: &str) -> Self {
        let id = id.to_ascii_lowercase();
        let has = |needle: &str| id.contains(needle);

        if has("bowl") {
            ItemKind::Bowl
        } else if has("hay") && has("rack") {
            ItemKind::HayRack
        } else if has("water") || has("bottle") {
            ItemKind::WaterBottle
        } else if has("paper") {
            ItemKind::Bedding(BeddingKind::Paper)
        } else if has("aspen") || has("shaving") {
            ItemKind::Bedding(BeddingKind::Aspen)
        } else if has("fleece") || has("bed") {
            ItemKind::Bedding(BeddingKind::Fleece)
        } else if has("tunnel") {
            ItemKind::Shelter(ShelterKind::Tunnel)
        } else if has("igloo") {
            ItemKind::Shelter(ShelterKind::Igloo)
        } else if has("house") || has("hide") || has("hut") {
            ItemKind::Shelter(ShelterKind::Hideout)
        } else if has("ball") || has("stick") || has("toy") || has("chew") {
            ItemKind::Toy(ToyKind::from_tag(&id))
        } else {
            ItemKind::Other
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Bowl => "bowl",
            ItemKind::HayRack => "hay_rack",
            ItemKind::WaterBottle => "water_bottle",
            ItemKind::Bedding(_) => "bedding",
            ItemKind::Shelter(_) => "shelter",
            ItemKind::Toy(_) => "toy",
            ItemKind::Other => "other",
        }
    }

    /// Containers carry food or water contents.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ItemKind::Bowl | ItemKind::HayRack | ItemKind::WaterBottle
        )
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A placeable item as the inventory describes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ItemKind,
    /// Tint override, e.g. a blue bowl
    #[serde(default)]
    pub color: Option<Color>,
}

impl ItemDefinition {
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let kind = ItemKind::from_item_id(&id);
        Self {
            id,
            name: None,
            kind,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers() {
        assert_eq!(ItemKind::from_item_id("ceramic_bowl"), ItemKind::Bowl);
        assert_eq!(ItemKind::from_item_id("Water_Bowl"), ItemKind::Bowl);
        assert_eq!(ItemKind::from_item_id("timothy_hay_rack"), ItemKind::HayRack);
        assert_eq!(ItemKind::from_item_id("drip_bottle"), ItemKind::WaterBottle);
        assert!(ItemKind::from_item_id("water_bottle").is_container());
    }

    #[test]
    fn test_hay_without_rack_is_not_a_rack() {
        assert_eq!(ItemKind::from_item_id("hay_bale"), ItemKind::Other);
    }

    #[test]
    fn test_furniture() {
        assert_eq!(
            ItemKind::from_item_id("fleece_liner"),
            ItemKind::Bedding(BeddingKind::Fleece)
        );
        assert_eq!(
            ItemKind::from_item_id("paper_bedding"),
            ItemKind::Bedding(BeddingKind::Paper)
        );
        assert_eq!(
            ItemKind::from_item_id("aspen_shavings"),
            ItemKind::Bedding(BeddingKind::Aspen)
        );
        assert_eq!(
            ItemKind::from_item_id("wooden_hideout"),
            ItemKind::Shelter(ShelterKind::Hideout)
        );
        assert_eq!(
            ItemKind::from_item_id("cardboard_tunnel"),
            ItemKind::Shelter(ShelterKind::Tunnel)
        );
        assert_eq!(
            ItemKind::from_item_id("igloo"),
            ItemKind::Shelter(ShelterKind::Igloo)
        );
        assert_eq!(ItemKind::from_item_id("wicker_ball"), ItemKind::Toy(ToyKind::Ball));
        assert_eq!(ItemKind::from_item_id("apple_stick"), ItemKind::Toy(ToyKind::Stick));
        assert_eq!(
            ItemKind::from_item_id("chew_block"),
            ItemKind::Toy(ToyKind::Fallback)
        );
        assert_eq!(ItemKind::from_item_id("lamp"), ItemKind::Other);
    }

    #[test]
    fn test_toy_tags() {
        assert_eq!(ToyKind::from_tag("Ball"), ToyKind::Ball);
        assert_eq!(ToyKind::from_tag("stick"), ToyKind::Stick);
        assert_eq!(ToyKind::from_tag("tunnel"), ToyKind::Fallback);
        assert_eq!(ToyKind::from_tag("apple_stick"), ToyKind::Stick);
        assert_eq!(
            ItemKind::from_item_id("wicker_ball_stick"),
            ItemKind::Toy(ToyKind::Ball)
        );
    }

    #[test]
    fn test_definition_from_id() {
        let def = ItemDefinition::from_id("blue_bowl").with_color(Color::from_hex(0x0000ff));
        assert_eq!(def.kind, ItemKind::Bowl);
        assert_eq!(def.display_name(), "blue_bowl");
    }
}
