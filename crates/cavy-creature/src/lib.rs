//! Articulated models for cavy
//!
//! This crate implements:
//! - The guinea pig model builder and its per-frame animation driver
//!   (breathing, blinking, walking gait, sleeping, grooming, playing)
//! - The player hand model with named poses and per-joint finger curl

pub mod animation;
pub mod guinea_pig;
pub mod hand;

pub use animation::{
    animate_guinea_pig, AnimationTuning, BlinkState, CreatureAnimState, CreatureFrame, ModeFlags,
    PoseBranch,
};
pub use guinea_pig::{build_guinea_pig, Appearance, Foot, GuineaPig, GuineaPigRig};
pub use hand::{
    apply_hand_pose, blend_hand_state, build_hand, set_hand_pose, FingerRig, Hand, HandPose, HandRig,
    HandState,
};
