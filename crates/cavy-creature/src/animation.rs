//! Per-frame guinea pig animation
//!
//! One driver call per frame reads the movement flag, time and discrete
//! mode flags, then mutates the rig's nodes in place. Exactly one pose
//! branch runs per frame, chosen by fixed precedence:
//! sleeping > grooming > playing/headbutting > normal.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use cavy_scene::{Model, NodeId, PileRng, SceneRng};

use crate::guinea_pig::{Foot, GuineaPigRig};

/// Tuning constants for the guinea pig driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Gait phase advance per second while walking
    pub walk_speed: f32,
    /// Forward/back foot travel at full swing
    pub stride: f32,
    /// Foot lift at the top of the swing
    pub lift: f32,
    /// Breathing phase advance per second
    pub breath_speed: f32,
    /// Relative body scale change while breathing
    pub breath_depth: f32,
    pub blink_interval_min: f32,
    pub blink_interval_max: f32,
    pub blink_duration: f32,
    /// Exponential rate for feet returning to rest
    pub foot_ease_rate: f32,
    /// Exponential rate for torso and head tilts
    pub tilt_ease_rate: f32,
    /// Torso pitch when sitting up to groom (radians, negative = backward)
    pub sit_up_angle: f32,
    pub groom_speed: f32,
    pub play_speed: f32,
    /// Nods per play cycle while headbutting
    pub headbutt_cadence: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            walk_speed: 8.0,
            stride: 0.12,
            lift: 0.08,
            breath_speed: 2.0,
            breath_depth: 0.02,
            blink_interval_min: 2.0,
            blink_interval_max: 6.0,
            blink_duration: 0.15,
            foot_ease_rate: 8.0,
            tilt_ease_rate: 4.0,
            sit_up_angle: -0.45,
            groom_speed: 6.0,
            play_speed: 5.0,
            headbutt_cadence: 1.5,
        }
    }
}

const SLEEP_EYE_SCALE: f32 = 0.1;
const BLINK_EYE_SCALE: f32 = 0.1;
const GROOM_EYE_SCALE: f32 = 0.5;
const PLAY_EYE_SCALE: f32 = 1.2;
const SLEEP_BODY_SQUASH: f32 = 0.85;
const SLEEP_BREATH_DEPTH: f32 = 0.03;
const FIRST_BLINK_AT: f64 = 2.0;

/// Blink sub-state: not blinking until `next_blink_at`, then blinking
/// until `blink_end_at`
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkState {
    pub blinking: bool,
    pub next_blink_at: f64,
    pub blink_end_at: f64,
}

/// Mutable animation record owned by a guinea pig rig
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureAnimState {
    pub blink: BlinkState,
    pub walk_phase: f32,
    pub breath_phase: f32,
    pub groom_phase: f32,
    pub play_phase: f32,
    /// Foot positions captured at build time
    pub foot_rest: [Vec3; 4],
    rng: PileRng,
}

impl CreatureAnimState {
    pub fn new(foot_rest: [Vec3; 4], rng: PileRng) -> Self {
        Self {
            blink: BlinkState {
                blinking: false,
                next_blink_at: FIRST_BLINK_AT,
                blink_end_at: 0.0,
            },
            walk_phase: 0.0,
            breath_phase: 0.0,
            groom_phase: 0.0,
            play_phase: 0.0,
            foot_rest,
            rng,
        }
    }
}

/// Discrete mode flags supplied by gameplay. More than one may be set;
/// `branch` resolves them by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeFlags {
    pub sleeping: bool,
    pub grooming: bool,
    pub playing: bool,
    pub headbutting: bool,
}

/// The single pose branch evaluated in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseBranch {
    Sleeping,
    Grooming,
    Playing { headbutt: bool },
    Normal,
}

impl ModeFlags {
    pub fn branch(&self) -> PoseBranch {
        if self.sleeping {
            PoseBranch::Sleeping
        } else if self.grooming {
            PoseBranch::Grooming
        } else if self.playing || self.headbutting {
            PoseBranch::Playing {
                headbutt: self.headbutting,
            }
        } else {
            PoseBranch::Normal
        }
    }
}

/// Inputs for one driver call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CreatureFrame {
    pub moving: bool,
    /// Scene time in seconds
    pub now: f64,
    /// Seconds since the previous frame
    pub delta: f32,
    pub paused: bool,
    pub modes: ModeFlags,
}

/// Frame-rate independent smoothing factor, `1 - e^(-rate*dt)`
fn smoothing(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Advance the guinea pig one frame. Returns the branch that ran, or
/// `None` when paused (nothing is touched at all).
pub fn animate_guinea_pig(
    model: &mut Model,
    rig: &mut GuineaPigRig,
    frame: &CreatureFrame,
    tuning: &AnimationTuning,
) -> Option<PoseBranch> {
    if frame.paused {
        return None;
    }

    let branch = frame.modes.branch();
    let dt = frame.delta.max(0.0);

    match branch {
        PoseBranch::Sleeping => animate_sleeping(model, rig, dt, tuning),
        PoseBranch::Grooming => animate_grooming(model, rig, dt, tuning),
        PoseBranch::Playing { headbutt } => animate_playing(model, rig, dt, headbutt, tuning),
        PoseBranch::Normal => animate_normal(model, rig, frame, dt, tuning),
    }

    Some(branch)
}

fn animate_sleeping(model: &mut Model, rig: &mut GuineaPigRig, dt: f32, tuning: &AnimationTuning) {
    let state = &mut rig.state;
    state.breath_phase += dt * tuning.breath_speed * 0.5;

    let base = rig.body_base_scale;
    let breath = 1.0 + state.breath_phase.sin() * SLEEP_BREATH_DEPTH;
    set_scale_y(model, rig.body, base.y * SLEEP_BODY_SQUASH * breath);

    set_eyes(model, rig, SLEEP_EYE_SCALE, false);
    ease_tilts(model, rig, 0.0, dt, tuning);
    ease_feet_to_rest(model, rig, &Foot::ALL, dt, tuning);
}

fn animate_grooming(model: &mut Model, rig: &mut GuineaPigRig, dt: f32, tuning: &AnimationTuning) {
    rig.state.groom_phase += dt * tuning.groom_speed;
    breathe(model, rig, dt, tuning);

    let k = smoothing(tuning.tilt_ease_rate, dt);
    if let Some(t) = model.transform_mut(rig.torso) {
        t.rotation.x += (tuning.sit_up_angle - t.rotation.x) * k;
    }

    // Front paws rub the face out of phase with each other
    let phase = rig.state.groom_phase;
    for (foot, offset) in [(Foot::FrontLeft, 0.0), (Foot::FrontRight, FRAC_PI_2)] {
        let p = phase + offset;
        let rest = rig.state.foot_rest[foot as usize];
        let target = rest + Vec3::new(0.0, 0.25 + p.sin() * 0.08, 0.1 + p.cos() * 0.06);
        if let Some(t) = model.transform_mut(rig.foot(foot)) {
            t.position = target;
        }
    }

    ease_feet_to_rest(model, rig, &[Foot::BackLeft, Foot::BackRight], dt, tuning);
    set_eyes(model, rig, GROOM_EYE_SCALE, true);
}

fn animate_playing(
    model: &mut Model,
    rig: &mut GuineaPigRig,
    dt: f32,
    headbutt: bool,
    tuning: &AnimationTuning,
) {
    rig.state.play_phase += dt * tuning.play_speed;
    breathe(model, rig, dt, tuning);

    let k = smoothing(tuning.tilt_ease_rate, dt);
    if let Some(t) = model.transform_mut(rig.torso) {
        t.rotation.x -= t.rotation.x * k;
    }

    let phase = rig.state.play_phase;
    let base = rig.head_base_rotation;
    if let Some(t) = model.transform_mut(rig.head) {
        if headbutt {
            let nod = (phase * tuning.headbutt_cadence).sin().max(0.0);
            t.rotation.x = base.x + nod * 0.35;
            t.rotation.y += (base.y - t.rotation.y) * k;
        } else {
            t.rotation.y = base.y + phase.sin() * 0.35;
            t.rotation.x = base.x + (phase * 2.0).sin() * 0.06;
        }
    }

    // Front paws lift slightly to grip the toy
    let kf = smoothing(tuning.foot_ease_rate, dt);
    for foot in [Foot::FrontLeft, Foot::FrontRight] {
        let target = rig.state.foot_rest[foot as usize] + Vec3::new(0.0, 0.06, 0.04);
        if let Some(t) = model.transform_mut(rig.foot(foot)) {
            t.position = t.position.lerp(target, kf);
        }
    }

    ease_feet_to_rest(model, rig, &[Foot::BackLeft, Foot::BackRight], dt, tuning);
    set_eyes(model, rig, PLAY_EYE_SCALE, true);
}

fn animate_normal(
    model: &mut Model,
    rig: &mut GuineaPigRig,
    frame: &CreatureFrame,
    dt: f32,
    tuning: &AnimationTuning,
) {
    breathe(model, rig, dt, tuning);
    ease_tilts(model, rig, 0.0, dt, tuning);

    let blinking = update_blink(&mut rig.state, frame.now, tuning);
    let eye = if blinking { BLINK_EYE_SCALE } else { 1.0 };
    set_eyes(model, rig, eye, true);

    if frame.moving {
        rig.state.walk_phase += dt * tuning.walk_speed;
        let phase = rig.state.walk_phase;
        for foot in Foot::ALL {
            let p = phase + foot.gait_phase_offset();
            let rest = rig.state.foot_rest[foot as usize];
            let lift = p.sin().max(0.0) * tuning.lift;
            let stride = p.sin() * tuning.stride;
            if let Some(t) = model.transform_mut(rig.foot(foot)) {
                t.position = rest + Vec3::new(0.0, lift, stride);
            }
        }
    } else {
        ease_feet_to_rest(model, rig, &Foot::ALL, dt, tuning);
    }
}

/// Run the blink state machine; returns whether the eyes are shut.
fn update_blink(state: &mut CreatureAnimState, now: f64, tuning: &AnimationTuning) -> bool {
    let blink = &mut state.blink;
    if blink.blinking {
        if now >= blink.blink_end_at {
            blink.blinking = false;
            let interval = state
                .rng
                .range(tuning.blink_interval_min, tuning.blink_interval_max);
            blink.next_blink_at = now + f64::from(interval);
        }
    } else if now >= blink.next_blink_at {
        blink.blinking = true;
        blink.blink_end_at = now + f64::from(tuning.blink_duration);
    }
    blink.blinking
}

fn breathe(model: &mut Model, rig: &mut GuineaPigRig, dt: f32, tuning: &AnimationTuning) {
    rig.state.breath_phase += dt * tuning.breath_speed;
    let scale = 1.0 + rig.state.breath_phase.sin() * tuning.breath_depth;
    set_scale_y(model, rig.body, rig.body_base_scale.y * scale);
}

fn set_scale_y(model: &mut Model, id: NodeId, y: f32) {
    if let Some(t) = model.transform_mut(id) {
        t.scale.y = y;
    }
}

fn set_eyes(model: &mut Model, rig: &GuineaPigRig, factor: f32, shine: bool) {
    for eye in rig.eyes {
        set_scale_y(model, eye, rig.eye_base_scale.y * factor);
    }
    for id in rig.eye_shine {
        if let Some(n) = model.node_mut(id) {
            n.visible = shine;
        }
    }
}

/// Ease torso pitch toward `torso_pitch` and the head back to neutral
fn ease_tilts(
    model: &mut Model,
    rig: &GuineaPigRig,
    torso_pitch: f32,
    dt: f32,
    tuning: &AnimationTuning,
) {
    let k = smoothing(tuning.tilt_ease_rate, dt);
    if let Some(t) = model.transform_mut(rig.torso) {
        t.rotation.x += (torso_pitch - t.rotation.x) * k;
    }
    if let Some(t) = model.transform_mut(rig.head) {
        t.rotation = t.rotation.lerp(rig.head_base_rotation, k);
    }
}

fn ease_feet_to_rest(
    model: &mut Model,
    rig: &GuineaPigRig,
    feet: &[Foot],
    dt: f32,
    tuning: &AnimationTuning,
) {
    let k = smoothing(tuning.foot_ease_rate, dt);
    for &foot in feet {
        let rest = rig.state.foot_rest[foot as usize];
        if let Some(t) = model.transform_mut(rig.foot(foot)) {
            t.position = t.position.lerp(rest, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guinea_pig::{build_guinea_pig, Appearance, GuineaPig};

    fn frame(now: f64, modes: ModeFlags) -> CreatureFrame {
        CreatureFrame {
            moving: false,
            now,
            delta: 1.0 / 60.0,
            paused: false,
            modes,
        }
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        // Advance a bit so state is non-trivial
        for i in 0..30 {
            let mut f = frame(i as f64 / 60.0, ModeFlags::default());
            f.moving = true;
            animate_guinea_pig(&mut pig.model, &mut pig.rig, &f, &tuning);
        }
        let before = pig.clone();

        let modes = [
            ModeFlags::default(),
            ModeFlags { sleeping: true, ..Default::default() },
            ModeFlags { grooming: true, ..Default::default() },
            ModeFlags { headbutting: true, ..Default::default() },
        ];
        for modes in modes {
            let f = CreatureFrame {
                moving: true,
                now: 100.0,
                delta: 0.5,
                paused: true,
                modes,
            };
            assert_eq!(animate_guinea_pig(&mut pig.model, &mut pig.rig, &f, &tuning), None);
        }
        assert_eq!(pig, before);
    }

    #[test]
    fn test_sleeping_wins_over_grooming() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let modes = ModeFlags {
            sleeping: true,
            grooming: true,
            ..Default::default()
        };

        for i in 0..60 {
            let branch =
                animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(i as f64 / 60.0, modes), &tuning);
            assert_eq!(branch, Some(PoseBranch::Sleeping));
        }

        let eye = pig.model.node(pig.rig.eyes[0]).unwrap();
        assert!((eye.transform.scale.y - SLEEP_EYE_SCALE).abs() < 1e-6);
        let torso = pig.model.node(pig.rig.torso).unwrap();
        assert_eq!(torso.transform.rotation.x, 0.0);
        assert_eq!(pig.rig.state.groom_phase, 0.0);
    }

    #[test]
    fn test_branch_precedence() {
        let all = ModeFlags {
            sleeping: true,
            grooming: true,
            playing: true,
            headbutting: true,
        };
        assert_eq!(all.branch(), PoseBranch::Sleeping);
        assert_eq!(
            ModeFlags { sleeping: false, ..all }.branch(),
            PoseBranch::Grooming
        );
        assert_eq!(
            ModeFlags { playing: true, ..Default::default() }.branch(),
            PoseBranch::Playing { headbutt: false }
        );
        assert_eq!(
            ModeFlags { headbutting: true, ..Default::default() }.branch(),
            PoseBranch::Playing { headbutt: true }
        );
        assert_eq!(ModeFlags::default().branch(), PoseBranch::Normal);
    }

    #[test]
    fn test_grooming_sits_up_gradually() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let modes = ModeFlags { grooming: true, ..Default::default() };

        animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(0.0, modes), &tuning);
        let first = pig.model.node(pig.rig.torso).unwrap().transform.rotation.x;
        assert!(first < 0.0);
        assert!(first > tuning.sit_up_angle);

        for i in 1..300 {
            animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(i as f64 / 60.0, modes), &tuning);
        }
        let settled = pig.model.node(pig.rig.torso).unwrap().transform.rotation.x;
        assert!((settled - tuning.sit_up_angle).abs() < 0.01);

        // Front paws are not in lockstep
        let fl = pig.model.node(pig.rig.foot(Foot::FrontLeft)).unwrap().transform.position;
        let fr = pig.model.node(pig.rig.foot(Foot::FrontRight)).unwrap().transform.position;
        assert!((fl.y - fr.y).abs() > 1e-4 || (fl.z - fr.z).abs() > 1e-4);
    }

    #[test]
    fn test_playing_yaws_head() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let modes = ModeFlags { playing: true, ..Default::default() };
        let base = pig.rig.head_base_rotation;

        let (mut min_yaw, mut max_yaw, mut max_bob) = (0.0f32, 0.0f32, 0.0f32);
        for i in 0..120 {
            let branch =
                animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(i as f64 / 60.0, modes), &tuning);
            assert_eq!(branch, Some(PoseBranch::Playing { headbutt: false }));
            let head = pig.model.node(pig.rig.head).unwrap().transform.rotation;
            min_yaw = min_yaw.min(head.y - base.y);
            max_yaw = max_yaw.max(head.y - base.y);
            max_bob = max_bob.max((head.x - base.x).abs());
        }

        // Side to side on both sides of neutral
        assert!(max_yaw > 0.3 && max_yaw <= 0.35 + 1e-5, "max yaw {}", max_yaw);
        assert!(min_yaw < -0.3 && min_yaw >= -0.35 - 1e-5, "min yaw {}", min_yaw);
        // Pitch bob is secondary to the swing
        assert!(max_bob > 0.03 && max_bob <= 0.06 + 1e-5, "bob {}", max_bob);
    }

    #[test]
    fn test_tilt_recovers_after_grooming() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let grooming = ModeFlags { grooming: true, ..Default::default() };
        let playing = ModeFlags { playing: true, ..Default::default() };
        let base = pig.rig.head_base_rotation;

        let mut now = 0.0;
        let mut run = |pig: &mut GuineaPig, modes: ModeFlags, frames: usize| {
            for _ in 0..frames {
                animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(now, modes), &tuning);
                now += 1.0 / 60.0;
            }
        };

        run(&mut pig, grooming, 300);
        let sat_up = pig.model.node(pig.rig.torso).unwrap().transform.rotation.x;
        assert!((sat_up - tuning.sit_up_angle).abs() < 0.01);

        // One frame back in the normal branch only starts the recovery
        run(&mut pig, ModeFlags::default(), 1);
        let easing = pig.model.node(pig.rig.torso).unwrap().transform.rotation.x;
        assert!(easing < 0.0 && easing > sat_up);

        run(&mut pig, ModeFlags::default(), 600);
        let torso = pig.model.node(pig.rig.torso).unwrap().transform.rotation.x;
        assert!(torso.abs() < 1e-3, "torso pitch {}", torso);

        // Same for the head swing left over from playing
        run(&mut pig, playing, 20);
        let swung = pig.model.node(pig.rig.head).unwrap().transform.rotation;
        assert!((swung - base).length() > 0.05);
        run(&mut pig, ModeFlags::default(), 600);
        let head = pig.model.node(pig.rig.head).unwrap().transform.rotation;
        assert!((head - base).length() < 1e-3, "head {:?}", head);
    }

    #[test]
    fn test_blink_cycle() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let modes = ModeFlags::default();

        animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(0.5, modes), &tuning);
        assert!(!pig.rig.state.blink.blinking);

        animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(FIRST_BLINK_AT, modes), &tuning);
        assert!(pig.rig.state.blink.blinking);
        let eye = pig.model.node(pig.rig.eyes[1]).unwrap().transform.scale.y;
        assert!((eye - BLINK_EYE_SCALE).abs() < 1e-6);

        let end = pig.rig.state.blink.blink_end_at;
        animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(end, modes), &tuning);
        assert!(!pig.rig.state.blink.blinking);
        let next = pig.rig.state.blink.next_blink_at - end;
        assert!(next >= f64::from(tuning.blink_interval_min) - 1e-9);
        assert!(next < f64::from(tuning.blink_interval_max));
        let eye = pig.model.node(pig.rig.eyes[1]).unwrap().transform.scale.y;
        assert_eq!(eye, 1.0);
    }

    #[test]
    fn test_walking_moves_diagonal_pairs_together() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let mut f = frame(0.0, ModeFlags::default());
        f.moving = true;
        f.delta = 0.05;
        animate_guinea_pig(&mut pig.model, &mut pig.rig, &f, &tuning);

        let rest = pig.rig.state.foot_rest;
        let offset = |foot: Foot| {
            pig.model.node(pig.rig.foot(foot)).unwrap().transform.position - rest[foot as usize]
        };
        let fl = offset(Foot::FrontLeft);
        let br = offset(Foot::BackRight);
        let fr = offset(Foot::FrontRight);
        assert!((fl - br).length() < 1e-6);
        // Opposite phase: one pair lifts, the other stays down and strides back
        assert!(fl.y > 0.0);
        assert_eq!(fr.y, 0.0);
        assert!((fr.z + fl.z).abs() < 1e-5);
        assert!((pig.rig.state.walk_phase - 0.05 * tuning.walk_speed).abs() < 1e-6);
    }

    #[test]
    fn test_feet_return_to_rest_when_stopping() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let mut f = frame(0.0, ModeFlags::default());
        f.moving = true;
        f.delta = 0.05;
        animate_guinea_pig(&mut pig.model, &mut pig.rig, &f, &tuning);

        f.moving = false;
        for _ in 0..200 {
            animate_guinea_pig(&mut pig.model, &mut pig.rig, &f, &tuning);
        }
        for foot in Foot::ALL {
            let pos = pig.model.node(pig.rig.foot(foot)).unwrap().transform.position;
            assert!((pos - pig.rig.state.foot_rest[foot as usize]).length() < 1e-4);
        }
    }

    #[test]
    fn test_headbutt_only_nods_forward() {
        let mut pig = build_guinea_pig(&Appearance::default());
        let tuning = AnimationTuning::default();
        let modes = ModeFlags { headbutting: true, ..Default::default() };
        for i in 0..240 {
            animate_guinea_pig(&mut pig.model, &mut pig.rig, &frame(i as f64 / 60.0, modes), &tuning);
            let head = pig.model.node(pig.rig.head).unwrap().transform.rotation;
            assert!(head.x >= 0.0);
        }
        let eye = pig.model.node(pig.rig.eyes[0]).unwrap().transform.scale.y;
        assert!((eye - PLAY_EYE_SCALE).abs() < 1e-6);
    }
}
