//! Player hand model and finger poses
//!
//! Palm, wrist, a two-joint thumb and four three-joint fingers. Each joint
//! is a nested group, so curling rotates every joint about its own X axis
//! with a taper further from the palm. A `HandState` holds the five curl
//! values and the spread; applying it writes joint rotations directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use cavy_scene::{Color, Geometry, Material, Model, Node, NodeId};

/// Maximum joint bend at curl = 1 (radians)
const MAX_CURL: f32 = 1.45;
const THUMB_MAX_CURL: f32 = 1.0;
/// Per-joint multiplier, palm outward
const CURL_TAPER: [f32; 3] = [1.0, 0.8, 0.6];
const THUMB_TAPER: [f32; 2] = [1.0, 0.7];
/// Finger yaw at spread = 1
const SPREAD_ANGLE: f32 = 0.35;
const THUMB_BASE_YAW: f32 = 0.6;
const THUMB_FOLD: f32 = 0.5;

/// Names, palm x position, length factor and spread direction per finger
const FINGERS: [(&str, f32, f32, f32); 4] = [
    ("index", 0.3, 1.0, 1.0),
    ("middle", 0.1, 1.1, 0.3),
    ("ring", -0.1, 1.0, -0.3),
    ("pinky", -0.3, 0.8, -1.0),
];
const SEGMENT_LENGTHS: [f32; 3] = [0.28, 0.22, 0.18];
const SEGMENT_RADII: [f32; 3] = [0.085, 0.075, 0.065];

/// Named hand poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HandPose {
    #[default]
    Open,
    Closed,
    Pointing,
    Petting,
    Holding,
    Wave,
    /// Fingers wrapped around a piece of food for hand-feeding
    Gripping,
}

impl HandPose {
    pub fn all() -> &'static [HandPose] {
        &[
            HandPose::Open,
            HandPose::Closed,
            HandPose::Pointing,
            HandPose::Petting,
            HandPose::Holding,
            HandPose::Wave,
            HandPose::Gripping,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HandPose::Open => "open",
            HandPose::Closed => "closed",
            HandPose::Pointing => "pointing",
            HandPose::Petting => "petting",
            HandPose::Holding => "holding",
            HandPose::Wave => "wave",
            HandPose::Gripping => "gripping",
        }
    }
}

impl std::fmt::Display for HandPose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for HandPose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(HandPose::Open),
            "closed" | "fist" => Ok(HandPose::Closed),
            "pointing" | "point" => Ok(HandPose::Pointing),
            "petting" | "pet" => Ok(HandPose::Petting),
            "holding" | "hold" => Ok(HandPose::Holding),
            "wave" | "waving" => Ok(HandPose::Wave),
            "gripping" | "grip" => Ok(HandPose::Gripping),
            _ => Err(format!(
                "Unknown hand pose: {}. Valid: open, closed, pointing, petting, holding, wave, gripping",
                s
            )),
        }
    }
}

/// Curl per digit (thumb, index, middle, ring, pinky) and finger spread,
/// all normalised to 0..1. Curl 0 is straight, 1 is fully curled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandState {
    pub curls: [f32; 5],
    pub spread: f32,
}

impl HandState {
    pub fn for_pose(pose: HandPose) -> Self {
        let (curls, spread) = match pose {
            HandPose::Open => ([0.0; 5], 0.5),
            HandPose::Closed => ([1.0; 5], 0.0),
            HandPose::Pointing => ([0.6, 0.0, 1.0, 1.0, 1.0], 0.0),
            HandPose::Petting => ([0.1, 0.2, 0.2, 0.2, 0.2], 0.3),
            HandPose::Holding => ([0.5, 0.6, 0.6, 0.6, 0.6], 0.1),
            HandPose::Wave => ([0.0; 5], 1.0),
            HandPose::Gripping => ([0.7, 0.75, 0.8, 0.85, 0.9], 0.0),
        };
        Self { curls, spread }
    }

    pub fn lerp(&self, other: &HandState, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut curls = self.curls;
        for (c, o) in curls.iter_mut().zip(other.curls) {
            *c += (o - *c) * t;
        }
        Self {
            curls,
            spread: self.spread + (other.spread - self.spread) * t,
        }
    }

    fn clamped(mut self) -> Self {
        for c in &mut self.curls {
            *c = c.clamp(0.0, 1.0);
        }
        self.spread = self.spread.clamp(0.0, 1.0);
        self
    }
}

impl Default for HandState {
    fn default() -> Self {
        Self::for_pose(HandPose::Open)
    }
}

/// Node handles for one finger: the yaw pivot plus nested joints
#[derive(Debug, Clone, PartialEq)]
pub struct FingerRig {
    pub base: NodeId,
    pub joints: Vec<NodeId>,
    pub spread_direction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandRig {
    pub palm: NodeId,
    pub wrist: NodeId,
    pub thumb: FingerRig,
    pub fingers: [FingerRig; 4],
    /// Attachment point for held food, just above the fingertips
    pub grip: NodeId,
    pub state: HandState,
    pub pose: HandPose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    pub model: Model,
    pub rig: HandRig,
}

/// Build the hand model in the open pose.
pub fn build_hand(skin: Color) -> Hand {
    let skin = Material::standard(skin).with_roughness(0.6).shared();
    let mut model = Model::new("hand");

    let palm = model.add(
        Node::mesh(Geometry::cuboid(0.8, 0.25, 0.9), skin.clone()).named("palm"),
    );
    let wrist = model.add(
        Node::mesh(Geometry::cylinder(0.28, 0.3, 0.5, 12, false), skin.clone())
            .named("wrist")
            .at(Vec3::new(0.0, 0.0, -0.65))
            .rotated(Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
    );

    let fingers = FINGERS.map(|(name, x, length, direction)| {
        let base = add_under(
            &mut model,
            palm,
            Node::group().named(name).at(Vec3::new(x, 0.0, 0.45)),
        );
        let joints = build_joints(&mut model, base, &skin, length, 3);
        FingerRig {
            base,
            joints,
            spread_direction: direction,
        }
    });

    let thumb_base = add_under(
        &mut model,
        palm,
        Node::group()
            .named("thumb")
            .at(Vec3::new(0.42, -0.02, -0.1))
            .rotated(Vec3::new(0.0, THUMB_BASE_YAW, 0.0)),
    );
    let thumb_joints = build_joints(&mut model, thumb_base, &skin, 1.1, 2);
    let thumb = FingerRig {
        base: thumb_base,
        joints: thumb_joints,
        spread_direction: 0.0,
    };

    let grip = add_under(
        &mut model,
        palm,
        Node::group().named("grip").at(Vec3::new(0.0, -0.3, 0.75)),
    );

    let mut hand = Hand {
        model,
        rig: HandRig {
            palm,
            wrist,
            thumb,
            fingers,
            grip,
            state: HandState::default(),
            pose: HandPose::Open,
        },
    };
    apply_hand_pose(&mut hand.model, &hand.rig);
    log::debug!("Built hand model ({} nodes)", hand.model.node_count());
    hand
}

fn add_under(model: &mut Model, parent: NodeId, node: Node) -> NodeId {
    model
        .add_child(parent, node)
        .unwrap_or_else(|_| model.root())
}

/// Chain `count` joints, each a group holding one rounded segment; the
/// next joint sits at the end of the previous segment.
fn build_joints(
    model: &mut Model,
    base: NodeId,
    material: &std::sync::Arc<Material>,
    length: f32,
    count: usize,
) -> Vec<NodeId> {
    let mut joints = Vec::with_capacity(count);
    let mut parent = base;
    let mut offset = 0.0;

    for i in 0..count.min(SEGMENT_LENGTHS.len()) {
        let seg = SEGMENT_LENGTHS[i] * length;
        let radius = SEGMENT_RADII[i];
        let joint = add_under(
            model,
            parent,
            Node::group()
                .named(format!("joint{}", i))
                .at(Vec3::new(0.0, 0.0, offset)),
        );
        add_under(
            model,
            joint,
            Node::mesh(Geometry::sphere(radius, 10, 8), material.clone())
                .at(Vec3::new(0.0, 0.0, seg * 0.5))
                .scaled(Vec3::new(1.0, 1.0, seg / (2.0 * radius))),
        );
        joints.push(joint);
        parent = joint;
        offset = seg;
    }
    joints
}

/// Set a named pose and write it to the joints immediately.
pub fn set_hand_pose(model: &mut Model, rig: &mut HandRig, pose: HandPose) {
    rig.pose = pose;
    rig.state = HandState::for_pose(pose);
    apply_hand_pose(model, rig);
}

/// Move the current state a fraction `t` toward `target` and apply it.
pub fn blend_hand_state(model: &mut Model, rig: &mut HandRig, target: &HandState, t: f32) {
    rig.state = rig.state.lerp(target, t);
    apply_hand_pose(model, rig);
}

/// Write `rig.state` to joint rotations and finger spread.
pub fn apply_hand_pose(model: &mut Model, rig: &HandRig) {
    let state = rig.state.clamped();

    for (finger, curl) in rig.fingers.iter().zip(&state.curls[1..]) {
        for (joint, taper) in finger.joints.iter().zip(CURL_TAPER) {
            if let Some(t) = model.transform_mut(*joint) {
                t.rotation.x = curl * MAX_CURL * taper;
            }
        }
        if let Some(t) = model.transform_mut(finger.base) {
            t.rotation.y = state.spread * SPREAD_ANGLE * finger.spread_direction;
        }
    }

    let thumb_curl = state.curls[0];
    for (joint, taper) in rig.thumb.joints.iter().zip(THUMB_TAPER) {
        if let Some(t) = model.transform_mut(*joint) {
            t.rotation.x = thumb_curl * THUMB_MAX_CURL * taper;
        }
    }
    if let Some(t) = model.transform_mut(rig.thumb.base) {
        t.rotation.y = THUMB_BASE_YAW - thumb_curl * THUMB_FOLD;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint_x(hand: &Hand, finger: usize, joint: usize) -> f32 {
        let id = hand.rig.fingers[finger].joints[joint];
        hand.model.node(id).unwrap().transform.rotation.x
    }

    #[test]
    fn test_topology() {
        let hand = build_hand(Color::from_hex(0xf1c27d));
        let model = &hand.model;
        assert!(model.find_by_name("palm").is_some());
        assert!(model.find_by_name("wrist").is_some());
        for (name, ..) in FINGERS {
            let finger = model.find_by_name(name).unwrap();
            for j in 0..3 {
                assert!(model.find_in_subtree(finger, &format!("joint{}", j)).is_some());
            }
        }
        for finger in &hand.rig.fingers {
            assert_eq!(finger.joints.len(), 3);
            // Joints are nested, not siblings
            assert_eq!(model.node(finger.joints[1]).unwrap().parent(), Some(finger.joints[0]));
            assert_eq!(model.node(finger.joints[2]).unwrap().parent(), Some(finger.joints[1]));
        }
        assert_eq!(hand.rig.thumb.joints.len(), 2);
    }

    #[test]
    fn test_open_pose_is_straight() {
        let hand = build_hand(Color::WHITE);
        for f in 0..4 {
            for j in 0..3 {
                assert_eq!(joint_x(&hand, f, j), 0.0);
            }
        }
    }

    #[test]
    fn test_closed_pose_tapers_per_joint() {
        let mut hand = build_hand(Color::WHITE);
        set_hand_pose(&mut hand.model, &mut hand.rig, HandPose::Closed);
        assert_eq!(hand.rig.state.curls, [1.0; 5]);
        let j0 = joint_x(&hand, 1, 0);
        let j1 = joint_x(&hand, 1, 1);
        let j2 = joint_x(&hand, 1, 2);
        assert!((j0 - MAX_CURL).abs() < 1e-6);
        assert!(j0 > j1 && j1 > j2);
        assert!((j2 - MAX_CURL * 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_pointing_keeps_index_straight() {
        let mut hand = build_hand(Color::WHITE);
        set_hand_pose(&mut hand.model, &mut hand.rig, HandPose::Pointing);
        assert_eq!(joint_x(&hand, 0, 0), 0.0);
        assert!(joint_x(&hand, 3, 0) > 1.0);
    }

    #[test]
    fn test_wave_spreads_fingers_apart() {
        let mut hand = build_hand(Color::WHITE);
        set_hand_pose(&mut hand.model, &mut hand.rig, HandPose::Wave);
        let yaw = |i: usize| {
            hand.model
                .node(hand.rig.fingers[i].base)
                .unwrap()
                .transform
                .rotation
                .y
        };
        assert!((yaw(0) - SPREAD_ANGLE).abs() < 1e-6);
        assert!((yaw(3) + SPREAD_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn test_pose_names_parse() {
        for pose in HandPose::all() {
            assert_eq!(pose.name().parse::<HandPose>(), Ok(*pose));
        }
        assert_eq!("fist".parse::<HandPose>(), Ok(HandPose::Closed));
        assert!("jazz hands".parse::<HandPose>().is_err());
    }

    #[test]
    fn test_blend_moves_partway() {
        let mut hand = build_hand(Color::WHITE);
        let target = HandState::for_pose(HandPose::Closed);
        blend_hand_state(&mut hand.model, &mut hand.rig, &target, 0.5);
        assert!((hand.rig.state.curls[2] - 0.5).abs() < 1e-6);
        assert!((joint_x(&hand, 1, 0) - 0.5 * MAX_CURL).abs() < 1e-6);
    }
}
