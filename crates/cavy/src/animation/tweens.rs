//! Generic tweening/interpolation types.

use glam::Vec3;
use keyframe::{ease, functions};

/// Easing curve applied to a normalized time value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EaseType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Quadratic ease in: slow start, accelerating
    QuadIn,
    /// Quadratic ease out: fast start, settling
    QuadOut,
    CubicOut,
}

impl EaseType {
    /// Map `t` in 0..1 (clamped) through the curve.
    pub fn apply(&self, t: f32) -> f32 {
        let t = (t as f64).clamp(0.0, 1.0);
        let result = match self {
            EaseType::Linear => ease(functions::Linear, 0.0, 1.0, t),
            EaseType::EaseIn => ease(functions::EaseIn, 0.0, 1.0, t),
            EaseType::EaseOut => ease(functions::EaseOut, 0.0, 1.0, t),
            EaseType::EaseInOut => ease(functions::EaseInOut, 0.0, 1.0, t),
            EaseType::QuadIn => ease(functions::EaseInQuad, 0.0, 1.0, t),
            EaseType::QuadOut => ease(functions::EaseOutQuad, 0.0, 1.0, t),
            EaseType::CubicOut => ease(functions::EaseOutCubic, 0.0, 1.0, t),
        };
        result as f32
    }
}

/// Values that can be interpolated
pub trait Tweenable: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Tweenable for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// A value that moves toward a target over a fixed duration with easing.
#[derive(Debug, Clone)]
pub struct AnimatedValue<T: Tweenable> {
    current: T,
    start: T,
    target: T,
    /// Seconds into the current animation
    elapsed: f32,
    duration: f32,
    easing: EaseType,
}

impl<T: Tweenable> AnimatedValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            start: initial,
            target: initial,
            elapsed: 0.0,
            duration: 0.0,
            easing: EaseType::Linear,
        }
    }

    /// Start animating from the current value toward `target`.
    pub fn animate_to(&mut self, target: T, duration: f32, easing: EaseType) {
        self.start = self.current;
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.easing = easing;
    }

    pub fn set_immediate(&mut self, value: T) {
        self.current = value;
        self.start = value;
        self.target = value;
        self.elapsed = 0.0;
        self.duration = 0.0;
    }

    /// Advance by `dt` seconds. Returns `true` while still animating.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.duration <= 0.0 {
            self.current = self.target;
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.current = self.target;
            self.elapsed = self.duration;
            return false;
        }

        let t = self.easing.apply(self.elapsed / self.duration);
        self.current = T::lerp(self.start, self.target, t);
        true
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration && self.duration > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animated_value_linear() {
        let mut val = AnimatedValue::new(0.0f32);
        val.animate_to(100.0, 1.0, EaseType::Linear);
        assert!((val.value() - 0.0).abs() < 0.01);

        val.update(0.5);
        assert!((val.value() - 50.0).abs() < 1.0);

        val.update(0.5);
        assert!((val.value() - 100.0).abs() < 0.01);
        assert!(!val.is_animating());
    }

    #[test]
    fn test_animated_value_vec3() {
        let mut val = AnimatedValue::new(Vec3::ZERO);
        val.animate_to(Vec3::new(10.0, 20.0, 30.0), 1.0, EaseType::Linear);
        val.update(0.5);
        let v = val.value();
        assert!((v.x - 5.0).abs() < 0.1);
        assert!((v.z - 15.0).abs() < 0.1);
    }

    #[test]
    fn test_quad_curves() {
        // Quadratic ease out covers 75% of the way at the midpoint, ease in 25%
        assert!((EaseType::QuadOut.apply(0.5) - 0.75).abs() < 1e-4);
        assert!((EaseType::QuadIn.apply(0.5) - 0.25).abs() < 1e-4);
        assert_eq!(EaseType::QuadIn.apply(0.0), 0.0);
        assert!((EaseType::QuadOut.apply(1.0) - 1.0).abs() < 1e-6);
        assert!((EaseType::QuadOut.apply(2.0) - 1.0).abs() < 1e-6);
    }
}
