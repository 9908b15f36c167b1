//! Easing and camera motion.
//!
//! Provides `AnimatedValue<T>` for eased interpolation and `OrbitCamera`
//! for a smoothed follow camera orbiting the habitat.

mod camera;
mod tweens;

pub use camera::OrbitCamera;
pub use tweens::{AnimatedValue, EaseType, Tweenable};
