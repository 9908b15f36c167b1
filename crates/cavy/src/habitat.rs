//! Habitat host
//!
//! Owns the scene and keeps it in step with gameplay state: item models are
//! rebuilt only when their build inputs change, creature models follow
//! their snapshots, and every frame drives the creature animators and the
//! interaction sequencer.

use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;

use glam::Vec3;

use cavy_creature::{
    animate_guinea_pig, build_guinea_pig, Appearance, CreatureFrame, GuineaPigRig, PoseBranch,
};
use cavy_props::{build_item, ContainerContents, ItemKind};
use cavy_scene::{DisposeReport, ModelId, Scene};

use crate::animation::OrbitCamera;
use crate::config::HabitatConfig;
use crate::gameplay::{GameplayMut, GameplayRead, PlacedItem};
use crate::interaction::{CompletionCallback, HeldFoodRequest, InteractionReport, InteractionSequencer};
use crate::reactions::{Reaction, ReactionDispatcher};

#[derive(Debug)]
struct MountedItem {
    model: ModelId,
    /// Build inputs the current model was made from
    signature: String,
}

#[derive(Debug)]
struct MountedCreature {
    model: ModelId,
    rig: GuineaPigRig,
    appearance: Appearance,
    branch: Option<PoseBranch>,
}

pub struct Habitat {
    config: HabitatConfig,
    scene: Scene,
    items: BTreeMap<String, MountedItem>,
    creatures: BTreeMap<String, MountedCreature>,
    sequencer: InteractionSequencer,
    reactions: ReactionDispatcher,
    camera: OrbitCamera,
    clock: f64,
    paused: bool,
}

fn item_signature(placed: &PlacedItem, contents: Option<&ContainerContents>) -> String {
    let contents = match (placed.item.kind.is_container(), contents) {
        (true, Some(c)) => c.signature(),
        _ => String::new(),
    };
    format!(
        "{:?}|{:?}|{}",
        placed.item.kind,
        placed.item.color.map(|c| c.to_hex()),
        contents
    )
}

impl Habitat {
    pub fn new(config: HabitatConfig) -> Self {
        let mut scene = Scene::new();
        let sequencer = InteractionSequencer::new(
            &mut scene,
            config.interaction.clone(),
            Appearance::default().skin,
        );

        let mut camera = OrbitCamera::new(Vec3::ZERO, config.camera.distance);
        camera.set_follow_smoothness(config.camera.follow_smoothness);
        camera.set_distance_limits(config.camera.min_distance, config.camera.max_distance);

        Self {
            config,
            scene,
            items: BTreeMap::new(),
            creatures: BTreeMap::new(),
            sequencer,
            reactions: ReactionDispatcher::new(),
            camera,
            clock: 0.0,
            paused: false,
        }
    }

    pub fn config(&self) -> &HabitatConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn sequencer(&self) -> &InteractionSequencer {
        &self.sequencer
    }

    /// Scene time in seconds; stops while paused
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Eased zoom by `factor` (below 1 zooms in) over the configured
    /// zoom duration
    pub fn zoom_camera(&mut self, factor: f32) {
        self.camera.zoom_by(factor, self.config.camera.zoom_duration);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn subscribe_reactions(&mut self) -> Receiver<Reaction> {
        self.reactions.subscribe()
    }

    pub fn item_model(&self, placement_id: &str) -> Option<ModelId> {
        self.items.get(placement_id).map(|i| i.model)
    }

    pub fn creature_model(&self, creature_id: &str) -> Option<ModelId> {
        self.creatures.get(creature_id).map(|c| c.model)
    }

    pub fn creature_rig(&self, creature_id: &str) -> Option<&GuineaPigRig> {
        self.creatures.get(creature_id).map(|c| &c.rig)
    }

    /// Branch the creature's animator ran last frame
    pub fn creature_branch(&self, creature_id: &str) -> Option<PoseBranch> {
        self.creatures.get(creature_id).and_then(|c| c.branch)
    }

    fn creature_position(&self, creature_id: &str) -> Option<Vec3> {
        let model = self.creature_model(creature_id)?;
        self.scene.world_position(model)
    }

    /// Build, rebuild or remove item models to match `gameplay`. Returns
    /// how many models were built.
    pub fn sync_items<G: GameplayRead + ?Sized>(&mut self, gameplay: &G) -> usize {
        let placed = gameplay.placed_items();
        let mut built = 0;

        let stale: Vec<String> = self
            .items
            .keys()
            .filter(|id| !placed.iter().any(|p| &p.placement_id == *id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(item) = self.items.remove(&id) {
                self.scene.unmount(item.model);
                log::debug!("Removed item {}", id);
            }
        }

        for item in &placed {
            let contents = gameplay.container_contents(&item.placement_id);
            let signature = item_signature(item, contents.as_ref());

            let current = self.items.get(&item.placement_id);
            let model_id = match current {
                Some(mounted) if mounted.signature == signature => mounted.model,
                Some(mounted) => {
                    let model = build_item(&item.item, &item.placement_id, contents.as_ref());
                    let id = mounted.model;
                    self.scene.replace(id, model);
                    built += 1;
                    log::debug!("Rebuilt {} ({})", item.placement_id, signature);
                    id
                }
                None => {
                    let model = build_item(&item.item, &item.placement_id, contents.as_ref());
                    built += 1;
                    self.scene.mount(model)
                }
            };
            self.items.insert(
                item.placement_id.clone(),
                MountedItem {
                    model: model_id,
                    signature,
                },
            );

            let grid = &self.config.grid;
            let position = grid.cell_to_world(item.col, item.row);
            let yaw = match item.item.kind {
                ItemKind::WaterBottle => grid.water_bottle_rotation(item.col, item.row),
                _ => 0.0,
            };
            if let Some(model) = self.scene.get_mut(model_id) {
                let root = model.root_transform_mut();
                root.position = position;
                root.rotation.y = yaw;
            }
        }

        built
    }

    /// Spawn models for new creatures, respawn ones whose appearance
    /// changed and remove ones that left.
    pub fn sync_creatures<G: GameplayRead + ?Sized>(&mut self, gameplay: &G) {
        let snapshots = gameplay.creatures();

        let gone: Vec<String> = self
            .creatures
            .keys()
            .filter(|id| !snapshots.iter().any(|s| &s.id == *id))
            .cloned()
            .collect();
        for id in gone {
            if let Some(creature) = self.creatures.remove(&id) {
                self.scene.unmount(creature.model);
                log::info!("Creature {} left the habitat", id);
            }
        }

        for snapshot in snapshots {
            let unchanged = self
                .creatures
                .get(&snapshot.id)
                .is_some_and(|c| c.appearance == snapshot.appearance);
            if unchanged {
                continue;
            }
            if let Some(old) = self.creatures.remove(&snapshot.id) {
                self.scene.unmount(old.model);
            }

            let mut pig = build_guinea_pig(&snapshot.appearance);
            let root = pig.model.root_transform_mut();
            root.position = snapshot.position;
            root.rotation.y = snapshot.heading;
            let model = self.scene.mount(pig.model);
            log::info!("Creature {} ({}) entered the habitat", snapshot.id, snapshot.name);

            self.creatures.insert(
                snapshot.id.clone(),
                MountedCreature {
                    model,
                    rig: pig.rig,
                    appearance: snapshot.appearance,
                    branch: None,
                },
            );
        }
    }

    /// Advance one frame. Returns the report of an interaction that ended
    /// during it.
    pub fn tick<G: GameplayMut + ?Sized>(
        &mut self,
        dt: f32,
        gameplay: &mut G,
    ) -> Option<InteractionReport> {
        if !self.paused {
            self.clock += dt.max(0.0) as f64;
        }

        for (id, creature) in self.creatures.iter_mut() {
            let Some(model) = self.scene.get_mut(creature.model) else {
                continue;
            };
            let Some(snapshot) = gameplay.creature(id) else {
                continue;
            };
            let frame = CreatureFrame {
                moving: snapshot.moving,
                now: self.clock,
                delta: dt,
                paused: self.paused,
                modes: snapshot.modes,
            };
            if !self.paused {
                let root = model.root_transform_mut();
                root.position = snapshot.position;
                root.rotation.y = snapshot.heading;
            }
            creature.branch =
                animate_guinea_pig(model, &mut creature.rig, &frame, &self.config.creature);
        }

        let focus = match self.sequencer.target() {
            Some(target) => self.creature_position(target),
            None => self.creature_centroid(),
        };
        if let Some(focus) = focus {
            self.camera.follow_target(focus, dt);
        }
        self.camera.update(dt);

        if self.paused {
            return None;
        }

        let target_position = self
            .sequencer
            .target()
            .and_then(|target| self.creature_position(target));
        self.sequencer.update(
            &mut self.scene,
            self.clock,
            target_position,
            gameplay,
            &mut self.reactions,
        )
    }

    fn creature_centroid(&self) -> Option<Vec3> {
        let positions: Vec<Vec3> = self
            .creatures
            .values()
            .filter_map(|c| self.scene.world_position(c.model))
            .collect();
        if positions.is_empty() {
            return None;
        }
        Some(positions.iter().sum::<Vec3>() / positions.len() as f32)
    }

    pub fn start_petting(&mut self, creature_id: &str, callback: Option<CompletionCallback>) -> bool {
        let position = self.creature_position(creature_id);
        self.sequencer
            .start_petting(&mut self.scene, creature_id, position, self.clock, callback)
    }

    pub fn start_hand_feed(
        &mut self,
        creature_id: &str,
        food: HeldFoodRequest,
        callback: Option<CompletionCallback>,
    ) -> bool {
        let position = self.creature_position(creature_id);
        self.sequencer.start_hand_feed(
            &mut self.scene,
            creature_id,
            position,
            food,
            self.clock,
            callback,
        )
    }

    pub fn cancel_interaction(&mut self) -> Option<InteractionReport> {
        self.sequencer.cancel(&mut self.scene)
    }

    /// Cancel any interaction and release every model, hand included.
    pub fn teardown(&mut self) -> DisposeReport {
        self.cancel_interaction();
        self.items.clear();
        self.creatures.clear();
        let report = self.scene.clear();
        log::info!(
            "Habitat torn down: {} nodes, {} geometries, {} materials released",
            report.nodes,
            report.geometries,
            report.materials
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::MemoryGameplay;
    use cavy_creature::ModeFlags;
    use cavy_props::{ContainerContents, ItemDefinition};

    fn habitat() -> (Habitat, MemoryGameplay) {
        let mut gameplay = MemoryGameplay::new();
        gameplay.add_creature("pig_1", "Peanut", Appearance::default(), Vec3::new(1.0, 0.0, 2.0));
        gameplay.place_item("rack_7", ItemDefinition::from_id("hay_rack"), 7, 0);
        gameplay.set_contents("rack_7", ContainerContents::servings(2));
        gameplay.place_item("bottle_1", ItemDefinition::from_id("water_bottle"), 7, 0);

        let mut habitat = Habitat::new(HabitatConfig::default());
        habitat.sync_items(&gameplay);
        habitat.sync_creatures(&gameplay);
        (habitat, gameplay)
    }

    #[test]
    fn test_items_rebuild_only_when_contents_change() {
        let (mut habitat, mut gameplay) = habitat();
        let rack = habitat.item_model("rack_7").unwrap();
        assert_eq!(habitat.sync_items(&gameplay), 0);

        gameplay.set_contents("rack_7", ContainerContents::servings(4));
        assert_eq!(habitat.sync_items(&gameplay), 1);
        assert_eq!(habitat.item_model("rack_7"), Some(rack));
    }

    #[test]
    fn test_items_are_placed_on_the_grid() {
        let (habitat, _) = habitat();
        let bottle = habitat.item_model("bottle_1").unwrap();
        let root = habitat.scene().get(bottle).unwrap().root_transform();
        assert_eq!(root.position, Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(root.rotation.y, -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_removed_items_and_creatures_are_unmounted() {
        let (mut habitat, mut gameplay) = habitat();
        let before = habitat.scene().len();

        gameplay.remove_creature("pig_1");
        habitat.sync_creatures(&gameplay);
        assert!(habitat.creature_model("pig_1").is_none());
        assert_eq!(habitat.scene().len(), before - 1);
    }

    #[test]
    fn test_tick_follows_snapshots_and_modes() {
        let (mut habitat, mut gameplay) = habitat();
        gameplay.set_modes(
            "pig_1",
            ModeFlags {
                sleeping: true,
                ..Default::default()
            },
        );
        gameplay.walk_to("pig_1", Vec3::new(1.0, 0.0, 10.0));
        gameplay.step(1.0);
        habitat.tick(1.0 / 60.0, &mut gameplay);

        let model = habitat.creature_model("pig_1").unwrap();
        let pos = habitat.scene().world_position(model).unwrap();
        assert!((pos.z - 4.0).abs() < 1e-5);
        assert_eq!(habitat.creature_branch("pig_1"), Some(PoseBranch::Sleeping));
    }

    #[test]
    fn test_camera_zoom_uses_configured_duration() {
        let (mut habitat, mut gameplay) = habitat();
        habitat.zoom_camera(0.5);
        habitat.tick(0.1, &mut gameplay);
        assert!(habitat.camera().is_zoom_animating());
        let partway = habitat.camera().distance();
        assert!(partway < 40.0 && partway > 20.0);
        for _ in 0..3 {
            habitat.tick(0.1, &mut gameplay);
        }
        assert!(!habitat.camera().is_zoom_animating());
        assert_eq!(habitat.camera().distance(), 20.0);

        let mut config = HabitatConfig::default();
        config.camera.zoom_duration = 1.0;
        let mut slow = Habitat::new(config);
        slow.zoom_camera(0.5);
        for _ in 0..4 {
            slow.tick(0.1, &mut gameplay);
        }
        assert!(slow.camera().is_zoom_animating());
    }

    #[test]
    fn test_paused_tick_freezes_everything() {
        let (mut habitat, mut gameplay) = habitat();
        habitat.tick(0.5, &mut gameplay);
        assert!(habitat.start_petting("pig_1", None));

        habitat.set_paused(true);
        let clock = habitat.clock();
        let model = habitat.creature_model("pig_1").unwrap();
        let before = habitat.scene().get(model).unwrap().clone();
        for _ in 0..10 {
            assert!(habitat.tick(1.0, &mut gameplay).is_none());
        }
        assert_eq!(habitat.clock(), clock);
        assert_eq!(habitat.scene().get(model).unwrap(), &before);
        assert!(habitat.sequencer().is_active());
    }

    #[test]
    fn test_teardown_cancels_and_releases() {
        let (mut habitat, mut gameplay) = habitat();
        assert!(habitat.start_hand_feed("pig_1", HeldFoodRequest::new("carrot"), None));
        let report = habitat.teardown();
        assert!(report.nodes > 0);
        assert!(habitat.scene().is_empty());
        assert!(!habitat.sequencer().is_active());
        assert!(gameplay.events().is_empty());
        assert!(!habitat.start_petting("pig_1", None));
        assert!(habitat.tick(0.1, &mut gameplay).is_none());
    }
}
