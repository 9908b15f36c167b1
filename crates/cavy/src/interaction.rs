//! Player-hand interaction sequencer
//!
//! A session runs a hand through descend, act and rise phases over a fixed
//! duration. Phases are windows on a continuous progress value, not
//! events. Every frame the hand is placed relative to the creature's live
//! position, so a walking creature is followed rather than left behind.
//!
//! Only one session exists at a time. Gameplay effects are applied once,
//! on normal completion. A session that loses its target, or is cancelled
//! from outside, ends with no effects and no reaction; its callback still
//! runs with the matching outcome.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::SeedableRng;

use cavy_creature::{build_hand, set_hand_pose, HandPose, HandRig};
use cavy_props::build_held_food;
use cavy_scene::{Color, ModelId, NodeId, PileRng, Scene};

use crate::animation::EaseType;
use crate::config::InteractionConfig;
use crate::gameplay::GameplayMut;
use crate::needs::{Need, WellnessTier};
use crate::reactions::{choose_reaction, Reaction, ReactionDispatcher};

/// Wellness assumed for a creature the gameplay layer cannot score
const UNKNOWN_WELLNESS: f32 = 50.0;
const PETTING_STROKES: f32 = 3.0;
const STROKE_LENGTH: f32 = 0.6;
const STROKE_PRESS: f32 = 0.12;
const FEED_BOBS: f32 = 2.0;
const FEED_BOB_HEIGHT: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Petting,
    HandFeed,
}

impl InteractionKind {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionKind::Petting => "petting",
            InteractionKind::HandFeed => "hand_feed",
        }
    }

    /// Progress at which descending ends and at which acting ends
    pub fn phase_windows(&self) -> (f32, f32) {
        match self {
            InteractionKind::Petting => (0.30, 0.80),
            InteractionKind::HandFeed => (0.35, 0.75),
        }
    }

    pub fn phase_at(&self, progress: f32) -> InteractionPhase {
        let (descend_end, act_end) = self.phase_windows();
        if progress >= 1.0 {
            InteractionPhase::Complete
        } else if progress >= act_end {
            InteractionPhase::Rising
        } else if progress >= descend_end {
            InteractionPhase::Acting
        } else {
            InteractionPhase::Descending
        }
    }

    fn hand_pose(&self) -> HandPose {
        match self {
            InteractionKind::Petting => HandPose::Petting,
            InteractionKind::HandFeed => HandPose::Gripping,
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Descending,
    Acting,
    Rising,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Completed,
    /// The creature could not be found during an update
    TargetLost,
    Cancelled,
}

/// Result of a finished session, passed to its callback
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionReport {
    pub kind: InteractionKind,
    pub creature_id: String,
    pub outcome: InteractionOutcome,
    /// Progress reached, 0..1
    pub progress: f32,
    /// Only set for completed sessions
    pub reaction: Option<Reaction>,
}

/// The food offered in a hand-feed session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeldFoodRequest {
    pub item_id: String,
    /// `#rrggbb`
    pub color: Option<String>,
    pub category: Option<String>,
}

impl HeldFoodRequest {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

pub type CompletionCallback = Box<dyn FnOnce(&InteractionReport)>;

struct HeldFood {
    item_id: String,
    node: NodeId,
}

struct Session {
    kind: InteractionKind,
    target: String,
    started_at: f64,
    /// Fixed at start
    duration: f32,
    held_food: Option<HeldFood>,
    callback: Option<CompletionCallback>,
    progress: f32,
}

impl Session {
    fn progress_at(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration as f64).clamp(0.0, 1.0) as f32
    }
}

/// Drives the player hand. Owns the hand rig; the hand model itself is
/// mounted in the scene.
pub struct InteractionSequencer {
    settings: InteractionConfig,
    hand_model: ModelId,
    hand: HandRig,
    session: Option<Session>,
    rng: PileRng,
}

impl InteractionSequencer {
    /// Build the hand, park it hidden at its home position and mount it.
    pub fn new(scene: &mut Scene, settings: InteractionConfig, skin: Color) -> Self {
        let mut hand = build_hand(skin);
        let home = settings.hand_home();
        let root = hand.model.root();
        if let Some(node) = hand.model.node_mut(root) {
            node.visible = false;
            node.transform.position = home;
        }
        let hand_model = scene.mount(hand.model);

        Self {
            rng: PileRng::seed_from_u64(settings.reaction_seed),
            settings,
            hand_model,
            hand: hand.rig,
            session: None,
        }
    }

    pub fn hand_model(&self) -> ModelId {
        self.hand_model
    }

    pub fn hand_pose(&self) -> HandPose {
        self.hand.pose
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.target.as_str())
    }

    pub fn kind(&self) -> Option<InteractionKind> {
        self.session.as_ref().map(|s| s.kind)
    }

    pub fn started_at(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.started_at)
    }

    /// Phase as of the last update
    pub fn phase(&self) -> InteractionPhase {
        match &self.session {
            Some(s) => s.kind.phase_at(s.progress),
            None => InteractionPhase::Idle,
        }
    }

    /// Node of the held food in the hand model, while there is one
    pub fn held_food_node(&self) -> Option<NodeId> {
        self.session
            .as_ref()
            .and_then(|s| s.held_food.as_ref())
            .map(|f| f.node)
    }

    pub fn start_petting(
        &mut self,
        scene: &mut Scene,
        target: &str,
        target_position: Option<Vec3>,
        now: f64,
        callback: Option<CompletionCallback>,
    ) -> bool {
        self.start(
            scene,
            InteractionKind::Petting,
            target,
            target_position,
            None,
            now,
            callback,
        )
    }

    pub fn start_hand_feed(
        &mut self,
        scene: &mut Scene,
        target: &str,
        target_position: Option<Vec3>,
        food: HeldFoodRequest,
        now: f64,
        callback: Option<CompletionCallback>,
    ) -> bool {
        self.start(
            scene,
            InteractionKind::HandFeed,
            target,
            target_position,
            Some(food),
            now,
            callback,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn start(
        &mut self,
        scene: &mut Scene,
        kind: InteractionKind,
        target: &str,
        target_position: Option<Vec3>,
        food: Option<HeldFoodRequest>,
        now: f64,
        callback: Option<CompletionCallback>,
    ) -> bool {
        if let Some(active) = &self.session {
            log::warn!(
                "Ignoring {} of {}: {} of {} already running",
                kind,
                target,
                active.kind,
                active.target
            );
            return false;
        }
        let Some(target_position) = target_position else {
            log::warn!("Ignoring {} of {}: creature not in scene", kind, target);
            return false;
        };
        let Some(model) = scene.get_mut(self.hand_model) else {
            log::warn!("Ignoring {} of {}: hand model is not mounted", kind, target);
            return false;
        };

        set_hand_pose(model, &mut self.hand, kind.hand_pose());

        let held_food = food.and_then(|food| {
            let piece = build_held_food(
                &food.item_id,
                food.color.as_deref(),
                food.category.as_deref(),
            );
            match model.graft(self.hand.grip, piece) {
                Ok(node) => Some(HeldFood {
                    item_id: food.item_id,
                    node,
                }),
                Err(e) => {
                    log::warn!("Failed to attach {} to hand: {}", food.item_id, e);
                    None
                }
            }
        });

        let hover = target_position + Vec3::Y * self.settings.hover_height;
        let root = model.root();
        if let Some(node) = model.node_mut(root) {
            node.visible = true;
            node.transform.position = hover;
            node.transform.rotation.y =
                facing(self.settings.hand_home(), target_position);
        }

        let duration = match kind {
            InteractionKind::Petting => self.settings.petting_duration,
            InteractionKind::HandFeed => self.settings.hand_feed_duration,
        };
        log::info!("Starting {} of {} ({:.1}s)", kind, target, duration);

        self.session = Some(Session {
            kind,
            target: target.to_string(),
            started_at: now,
            duration,
            held_food,
            callback,
            progress: 0.0,
        });
        true
    }

    /// Advance the active session. `target_position` is the creature's
    /// current world position, or `None` if it is gone. Returns the report
    /// when the session ends this frame.
    pub fn update<G: GameplayMut + ?Sized>(
        &mut self,
        scene: &mut Scene,
        now: f64,
        target_position: Option<Vec3>,
        gameplay: &mut G,
        reactions: &mut ReactionDispatcher,
    ) -> Option<InteractionReport> {
        let session = self.session.as_mut()?;
        let progress = session.progress_at(now);
        session.progress = progress;

        let Some(target) = target_position else {
            log::warn!("{} target {} disappeared", session.kind, session.target);
            let session = self.end_session(scene)?;
            return Some(conclude(session, InteractionOutcome::TargetLost, None));
        };

        let kind = session.kind;
        let (descend_end, act_end) = kind.phase_windows();
        let hover = target + Vec3::Y * self.settings.hover_height;
        let contact = target + Vec3::Y * self.settings.contact_height;

        let position = match kind.phase_at(progress) {
            InteractionPhase::Descending => {
                let t = EaseType::QuadOut.apply(progress / descend_end);
                hover.lerp(contact, t)
            }
            InteractionPhase::Acting => {
                let t = (progress - descend_end) / (act_end - descend_end);
                contact + act_offset(kind, t)
            }
            InteractionPhase::Rising | InteractionPhase::Complete => {
                let t = EaseType::QuadIn.apply((progress - act_end) / (1.0 - act_end));
                contact.lerp(hover, t)
            }
            InteractionPhase::Idle => hover,
        };

        let yaw = facing(self.settings.hand_home(), target);
        let food_node = session.held_food.as_ref().map(|f| f.node);
        let consumed = kind == InteractionKind::HandFeed && progress >= act_end;

        if let Some(model) = scene.get_mut(self.hand_model) {
            let root = model.root();
            if let Some(node) = model.node_mut(root) {
                node.transform.position = position;
                node.transform.rotation.y = yaw;
            }
            // The food is eaten at the end of the act phase; the hand lets go
            if consumed {
                let eaten = match food_node.and_then(|id| model.node_mut(id)) {
                    Some(node) if node.visible => {
                        node.visible = false;
                        true
                    }
                    _ => false,
                };
                if eaten {
                    set_hand_pose(model, &mut self.hand, HandPose::Open);
                }
            }
        }

        if progress < 1.0 {
            return None;
        }

        let session = self.end_session(scene)?;
        let reaction = self.apply_effects(&session, gameplay);
        reactions.publish(reaction.clone());
        Some(conclude(session, InteractionOutcome::Completed, Some(reaction)))
    }

    /// End the active session from outside. No gameplay effects.
    pub fn cancel(&mut self, scene: &mut Scene) -> Option<InteractionReport> {
        let session = self.end_session(scene)?;
        Some(conclude(session, InteractionOutcome::Cancelled, None))
    }

    /// Take the session and put the hand away: held food released, open
    /// pose, hidden at home.
    fn end_session(&mut self, scene: &mut Scene) -> Option<Session> {
        let session = self.session.take()?;

        if let Some(model) = scene.get_mut(self.hand_model) {
            if let Some(food) = &session.held_food {
                let released = model.remove_subtree(food.node);
                log::debug!("Released held {}: {:?}", food.item_id, released);
            }
            set_hand_pose(model, &mut self.hand, HandPose::Open);
            let root = model.root();
            if let Some(node) = model.node_mut(root) {
                node.visible = false;
                node.transform.position = self.settings.hand_home();
                node.transform.rotation = Vec3::ZERO;
            }
        }
        Some(session)
    }

    fn apply_effects<G: GameplayMut + ?Sized>(
        &mut self,
        session: &Session,
        gameplay: &mut G,
    ) -> Reaction {
        let id = session.target.as_str();
        match session.kind {
            InteractionKind::Petting => {
                gameplay.satisfy_need(id, Need::Happiness, 10.0);
                gameplay.satisfy_need(id, Need::Social, 10.0);
                gameplay.adjust_friendship(id, 2.0);
                gameplay.increment_interaction_count(id);
                gameplay.log_player_action(&format!("Petted {}", id));
            }
            InteractionKind::HandFeed => {
                let item = session
                    .held_food
                    .as_ref()
                    .map(|f| f.item_id.as_str())
                    .unwrap_or_default();
                gameplay.satisfy_need(id, Need::Hunger, 10.0);
                gameplay.satisfy_need(id, Need::Social, 15.0);
                gameplay.adjust_friendship(id, 3.0);
                gameplay.consume_inventory_item(item);
                gameplay.increment_interaction_count(id);
                gameplay.log_player_action(&format!("Hand-fed {} to {}", item, id));
            }
        }

        let score = gameplay.wellness_score(id).unwrap_or(UNKNOWN_WELLNESS);
        let tier = WellnessTier::from_score(score);
        let message = choose_reaction(session.kind, tier, &mut self.rng);
        Reaction {
            creature_id: id.to_string(),
            kind: session.kind,
            tier,
            message: message.to_string(),
        }
    }
}

/// Build the report, log it and hand it to the session's callback.
fn conclude(
    mut session: Session,
    outcome: InteractionOutcome,
    reaction: Option<Reaction>,
) -> InteractionReport {
    let report = InteractionReport {
        kind: session.kind,
        creature_id: std::mem::take(&mut session.target),
        outcome,
        progress: session.progress,
        reaction,
    };
    log::info!(
        "Finished {} of {}: {:?}",
        report.kind,
        report.creature_id,
        report.outcome
    );
    if let Some(callback) = session.callback.take() {
        callback(&report);
    }
    report
}

/// Yaw that points the fingers from the hand's home toward the target
fn facing(home: Vec3, target: Vec3) -> f32 {
    let dir = target - home;
    dir.x.atan2(dir.z)
}

/// Hand offset from the contact point during the act phase
fn act_offset(kind: InteractionKind, t: f32) -> Vec3 {
    match kind {
        InteractionKind::Petting => {
            let stroke = (t * TAU * PETTING_STROKES).sin();
            Vec3::new(0.0, -stroke.abs() * STROKE_PRESS, stroke * STROKE_LENGTH)
        }
        InteractionKind::HandFeed => {
            Vec3::new(0.0, (t * TAU * FEED_BOBS).sin() * FEED_BOB_HEIGHT, 0.0)
        }
    }
}
