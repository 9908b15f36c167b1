//! Food categories and container contents

use serde::{Deserialize, Serialize};

use cavy_scene::Color;

/// Broad food category, used for piece shape and fallback color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    #[default]
    Pellets,
    Greens,
    Vegetable,
    Fruit,
    Hay,
    Treat,
}

impl FoodCategory {
    pub fn name(&self) -> &'static str {
        match self {
            FoodCategory::Pellets => "pellets",
            FoodCategory::Greens => "greens",
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Hay => "hay",
            FoodCategory::Treat => "treat",
        }
    }

    /// Display color when an item carries none of its own
    pub fn color(&self) -> Color {
        match self {
            FoodCategory::Pellets => Color::from_hex(0x8b6f47),
            FoodCategory::Greens => Color::from_hex(0x6a994e),
            FoodCategory::Vegetable => Color::from_hex(0xff8c42),
            FoodCategory::Fruit => Color::from_hex(0xe63946),
            FoodCategory::Hay => Color::from_hex(0xd8c07a),
            FoodCategory::Treat => Color::from_hex(0xf4a261),
        }
    }

    /// Pieces drawn in a bowl per serving
    pub fn pieces_per_serving(&self) -> usize {
        match self {
            FoodCategory::Pellets => 14,
            FoodCategory::Greens => 4,
            FoodCategory::Hay => 20,
            FoodCategory::Vegetable | FoodCategory::Fruit | FoodCategory::Treat => 5,
        }
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for FoodCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pellets" | "pellet" => Ok(FoodCategory::Pellets),
            "greens" | "lettuce" | "leafy" => Ok(FoodCategory::Greens),
            "vegetable" | "vegetables" | "veggie" => Ok(FoodCategory::Vegetable),
            "fruit" | "fruits" => Ok(FoodCategory::Fruit),
            "hay" => Ok(FoodCategory::Hay),
            "treat" | "treats" => Ok(FoodCategory::Treat),
            _ => Err(format!("Unknown food category: {}", s)),
        }
    }
}

/// One itemized entry in a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPortion {
    pub item_id: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "one")]
    pub servings: u32,
}

fn one() -> u32 {
    1
}

impl FoodPortion {
    pub fn new(item_id: impl Into<String>, category: FoodCategory, servings: u32) -> Self {
        Self {
            item_id: item_id.into(),
            category,
            color: None,
            servings,
        }
    }

    pub fn display_color(&self) -> Color {
        self.color.unwrap_or_else(|| self.category.color())
    }
}

/// Logical contents of a container, as supplied by gameplay state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerContents {
    pub servings: u32,
    #[serde(default)]
    pub portions: Vec<FoodPortion>,
}

impl ContainerContents {
    pub fn servings(servings: u32) -> Self {
        Self {
            servings,
            portions: Vec::new(),
        }
    }

    pub fn with_portion(mut self, portion: FoodPortion) -> Self {
        self.portions.push(portion);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.servings == 0 && self.portions.iter().all(|p| p.servings == 0)
    }

    /// Signature used to decide whether a rebuild is needed
    pub fn signature(&self) -> String {
        let mut sig = self.servings.to_string();
        for p in &self.portions {
            sig.push_str(&format!("|{}:{}", p.item_id, p.servings));
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Lettuce".parse::<FoodCategory>(), Ok(FoodCategory::Greens));
        assert!("rocks".parse::<FoodCategory>().is_err());
    }

    #[test]
    fn test_portion_color_fallback() {
        let mut portion = FoodPortion::new("carrot", FoodCategory::Vegetable, 1);
        assert_eq!(portion.display_color(), FoodCategory::Vegetable.color());
        portion.color = Some(Color::WHITE);
        assert_eq!(portion.display_color(), Color::WHITE);
    }

    #[test]
    fn test_signature_tracks_contents() {
        let a = ContainerContents::servings(2)
            .with_portion(FoodPortion::new("pellets", FoodCategory::Pellets, 2));
        let b = ContainerContents::servings(2)
            .with_portion(FoodPortion::new("pellets", FoodCategory::Pellets, 1));
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.signature(), a.clone().signature());
        assert!(ContainerContents::default().is_empty());
    }
}
