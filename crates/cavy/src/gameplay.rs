//! Gameplay capability interface
//!
//! The habitat reads creature, item and container state through
//! `GameplayRead` and reports finished interactions through
//! `GameplayMut`. It never stores gameplay state of its own.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use cavy_creature::{Appearance, ModeFlags};
use cavy_props::{ContainerContents, FoodCategory, FoodPortion, ItemDefinition};

use crate::needs::Need;

const NEED_MAX: f32 = 100.0;
const FRIENDSHIP_MAX: f32 = 100.0;
const DEFAULT_NEED: f32 = 75.0;

/// What the habitat needs to know about a creature each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSnapshot {
    pub id: String,
    pub name: String,
    pub appearance: Appearance,
    /// World position on the floor
    pub position: Vec3,
    /// Yaw in radians
    pub heading: f32,
    pub moving: bool,
    pub modes: ModeFlags,
}

/// An item placed on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub placement_id: String,
    pub item: ItemDefinition,
    pub col: u32,
    pub row: u32,
}

pub trait GameplayRead {
    fn creatures(&self) -> Vec<CreatureSnapshot>;

    fn creature(&self, id: &str) -> Option<CreatureSnapshot> {
        self.creatures().into_iter().find(|c| c.id == id)
    }

    fn placed_items(&self) -> Vec<PlacedItem>;

    fn container_contents(&self, placement_id: &str) -> Option<ContainerContents>;

    /// Overall wellness on a 0..100 scale
    fn wellness_score(&self, creature_id: &str) -> Option<f32>;
}

/// Mutators invoked once per completed interaction
pub trait GameplayMut: GameplayRead {
    fn satisfy_need(&mut self, creature_id: &str, need: Need, amount: f32);

    fn adjust_friendship(&mut self, creature_id: &str, delta: f32);

    /// Remove one unit of `item_id` from the inventory. Returns `false`
    /// when there was none.
    fn consume_inventory_item(&mut self, item_id: &str) -> bool;

    fn increment_interaction_count(&mut self, creature_id: &str);

    fn log_player_action(&mut self, action: &str);
}

/// Record of a mutator call, kept by `MemoryGameplay`
#[derive(Debug, Clone, PartialEq)]
pub enum GameplayEvent {
    NeedSatisfied {
        creature: String,
        need: Need,
        amount: f32,
    },
    FriendshipAdjusted {
        creature: String,
        delta: f32,
    },
    ItemConsumed {
        item_id: String,
    },
    InteractionCounted {
        creature: String,
    },
    ActionLogged(String),
}

#[derive(Debug, Clone, PartialEq)]
struct CreatureRecord {
    snapshot: CreatureSnapshot,
    needs: BTreeMap<Need, f32>,
    friendship: f32,
    interactions: u32,
    destination: Option<Vec3>,
}

/// In-memory gameplay state for tests and the demo binary
#[derive(Debug, Clone, Default)]
pub struct MemoryGameplay {
    creatures: BTreeMap<String, CreatureRecord>,
    items: Vec<PlacedItem>,
    contents: BTreeMap<String, ContainerContents>,
    inventory: BTreeMap<String, u32>,
    events: Vec<GameplayEvent>,
    walk_speed: f32,
}

impl MemoryGameplay {
    pub fn new() -> Self {
        Self {
            walk_speed: 2.0,
            ..Default::default()
        }
    }

    pub fn add_creature(&mut self, id: &str, name: &str, appearance: Appearance, position: Vec3) {
        let snapshot = CreatureSnapshot {
            id: id.to_string(),
            name: name.to_string(),
            appearance,
            position,
            heading: 0.0,
            moving: false,
            modes: ModeFlags::default(),
        };
        let needs = Need::all().iter().map(|n| (*n, DEFAULT_NEED)).collect();
        self.creatures.insert(
            id.to_string(),
            CreatureRecord {
                snapshot,
                needs,
                friendship: 0.0,
                interactions: 0,
                destination: None,
            },
        );
    }

    pub fn remove_creature(&mut self, id: &str) -> bool {
        self.creatures.remove(id).is_some()
    }

    pub fn place_item(&mut self, placement_id: &str, item: ItemDefinition, col: u32, row: u32) {
        self.items.retain(|p| p.placement_id != placement_id);
        self.items.push(PlacedItem {
            placement_id: placement_id.to_string(),
            item,
            col,
            row,
        });
    }

    pub fn set_contents(&mut self, placement_id: &str, contents: ContainerContents) {
        self.contents.insert(placement_id.to_string(), contents);
    }

    pub fn add_inventory(&mut self, item_id: &str, count: u32) {
        *self.inventory.entry(item_id.to_string()).or_insert(0) += count;
    }

    pub fn inventory_count(&self, item_id: &str) -> u32 {
        self.inventory.get(item_id).copied().unwrap_or(0)
    }

    pub fn set_need(&mut self, creature_id: &str, need: Need, value: f32) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            record.needs.insert(need, value.clamp(0.0, NEED_MAX));
        }
    }

    pub fn need(&self, creature_id: &str, need: Need) -> Option<f32> {
        self.creatures
            .get(creature_id)
            .and_then(|r| r.needs.get(&need).copied())
    }

    pub fn friendship(&self, creature_id: &str) -> Option<f32> {
        self.creatures.get(creature_id).map(|r| r.friendship)
    }

    pub fn interaction_count(&self, creature_id: &str) -> Option<u32> {
        self.creatures.get(creature_id).map(|r| r.interactions)
    }

    pub fn set_modes(&mut self, creature_id: &str, modes: ModeFlags) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            record.snapshot.modes = modes;
        }
    }

    /// Start walking toward `destination` at the configured speed.
    pub fn walk_to(&mut self, creature_id: &str, destination: Vec3) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            record.destination = Some(destination);
            record.snapshot.moving = true;
        }
    }

    /// Move walking creatures along by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let speed = self.walk_speed;
        for record in self.creatures.values_mut() {
            let Some(destination) = record.destination else {
                continue;
            };
            let to_go = destination - record.snapshot.position;
            let distance = to_go.length();
            let travel = speed * dt;
            if distance <= travel {
                record.snapshot.position = destination;
                record.snapshot.moving = false;
                record.destination = None;
            } else {
                let dir = to_go / distance;
                record.snapshot.position += dir * travel;
                record.snapshot.heading = dir.x.atan2(dir.z);
            }
        }
    }

    pub fn events(&self) -> &[GameplayEvent] {
        &self.events
    }

    /// A furnished habitat with two guinea pigs, used by the demo
    pub fn sample_habitat() -> Self {
        let mut gameplay = Self::new();
        gameplay.add_creature("pig_1", "Peanut", Appearance::default(), Vec3::new(-3.0, 0.0, 0.0));
        gameplay.add_creature(
            "pig_2",
            "Mochi",
            Appearance {
                fur: cavy_scene::Color::from_hex(0xf5f0e6),
                ear: cavy_scene::Color::from_hex(0x8d6e63),
                ..Appearance::default()
            },
            Vec3::new(4.0, 0.0, 3.0),
        );

        gameplay.place_item("rack_7", ItemDefinition::from_id("timothy_hay_rack"), 7, 0);
        gameplay.place_item("bowl_1", ItemDefinition::from_id("ceramic_bowl"), 3, 4);
        gameplay.place_item("bottle_1", ItemDefinition::from_id("water_bottle"), 0, 0);
        gameplay.place_item("bed_1", ItemDefinition::from_id("fleece_bed"), 11, 7);
        gameplay.place_item("hut_1", ItemDefinition::from_id("wooden_hideout"), 2, 8);
        gameplay.place_item("toy_1", ItemDefinition::from_id("willow_ball"), 9, 3);

        gameplay.set_contents("rack_7", ContainerContents::servings(5));
        gameplay.set_contents(
            "bowl_1",
            ContainerContents::servings(2)
                .with_portion(FoodPortion::new("pellets", FoodCategory::Pellets, 1))
                .with_portion(FoodPortion::new("carrot", FoodCategory::Vegetable, 1)),
        );
        gameplay.set_contents("bottle_1", ContainerContents::servings(3));

        gameplay.add_inventory("carrot", 5);
        gameplay.add_inventory("pellets", 20);
        gameplay
    }
}

impl GameplayRead for MemoryGameplay {
    fn creatures(&self) -> Vec<CreatureSnapshot> {
        self.creatures.values().map(|r| r.snapshot.clone()).collect()
    }

    fn creature(&self, id: &str) -> Option<CreatureSnapshot> {
        self.creatures.get(id).map(|r| r.snapshot.clone())
    }

    fn placed_items(&self) -> Vec<PlacedItem> {
        self.items.clone()
    }

    fn container_contents(&self, placement_id: &str) -> Option<ContainerContents> {
        self.contents.get(placement_id).cloned()
    }

    fn wellness_score(&self, creature_id: &str) -> Option<f32> {
        let record = self.creatures.get(creature_id)?;
        let total: f32 = record.needs.values().sum();
        Some(total / record.needs.len().max(1) as f32)
    }
}

impl GameplayMut for MemoryGameplay {
    fn satisfy_need(&mut self, creature_id: &str, need: Need, amount: f32) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            let value = record.needs.entry(need).or_insert(DEFAULT_NEED);
            *value = (*value + amount).clamp(0.0, NEED_MAX);
        }
        self.events.push(GameplayEvent::NeedSatisfied {
            creature: creature_id.to_string(),
            need,
            amount,
        });
    }

    fn adjust_friendship(&mut self, creature_id: &str, delta: f32) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            record.friendship = (record.friendship + delta).clamp(0.0, FRIENDSHIP_MAX);
        }
        self.events.push(GameplayEvent::FriendshipAdjusted {
            creature: creature_id.to_string(),
            delta,
        });
    }

    fn consume_inventory_item(&mut self, item_id: &str) -> bool {
        self.events.push(GameplayEvent::ItemConsumed {
            item_id: item_id.to_string(),
        });
        match self.inventory.get_mut(item_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => {
                log::warn!("Consumed {} with none in inventory", item_id);
                false
            }
        }
    }

    fn increment_interaction_count(&mut self, creature_id: &str) {
        if let Some(record) = self.creatures.get_mut(creature_id) {
            record.interactions += 1;
        }
        self.events.push(GameplayEvent::InteractionCounted {
            creature: creature_id.to_string(),
        });
    }

    fn log_player_action(&mut self, action: &str) {
        log::info!("Player action: {}", action);
        self.events.push(GameplayEvent::ActionLogged(action.to_string()));
    }
}
