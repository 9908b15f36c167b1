//! Orbit camera with smoothed follow and eased zoom.

use glam::Vec3;

use super::tweens::{AnimatedValue, EaseType};

const MIN_PITCH: f32 = 0.1;
const MAX_PITCH: f32 = 1.45;

/// Camera orbiting a focus point. The focus trails its target with
/// exponential smoothing; distance changes are eased.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    focus: Vec3,
    distance: AnimatedValue<f32>,
    /// Radians around Y, 0 looks down -Z
    yaw: f32,
    /// Radians above the floor plane
    pitch: f32,
    /// Time constant in seconds; ~63% of the way to the target after one
    follow_smoothness: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    pub fn new(focus: Vec3, distance: f32) -> Self {
        Self {
            focus,
            distance: AnimatedValue::new(distance),
            yaw: 0.0,
            pitch: 0.8,
            follow_smoothness: 0.3,
            min_distance: 5.0,
            max_distance: 80.0,
        }
    }

    pub fn set_follow_smoothness(&mut self, smoothness: f32) {
        self.follow_smoothness = smoothness.max(0.001);
    }

    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
    }

    /// Move the focus toward `target`, frame-rate independent.
    pub fn follow_target(&mut self, target: Vec3, dt: f32) {
        let t = 1.0 - (-dt / self.follow_smoothness).exp();
        self.focus = self.focus.lerp(target, t);
    }

    pub fn set_focus_immediate(&mut self, focus: Vec3) {
        self.focus = focus;
    }

    /// Rotate around the focus. Pitch is kept between just above the floor
    /// and just short of straight down.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn zoom_to(&mut self, distance: f32, duration: f32) {
        let distance = distance.clamp(self.min_distance, self.max_distance);
        self.distance.animate_to(distance, duration, EaseType::QuadOut);
    }

    /// Multiply the target distance by `factor` (below 1 zooms in).
    pub fn zoom_by(&mut self, factor: f32, duration: f32) {
        self.zoom_to(self.distance.target() * factor, duration);
    }

    pub fn update(&mut self, dt: f32) {
        self.distance.update(dt);
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn distance(&self) -> f32 {
        self.distance.value()
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World position of the eye
    pub fn eye(&self) -> Vec3 {
        let d = self.distance();
        let horizontal = d * self.pitch.cos();
        self.focus
            + Vec3::new(
                -horizontal * self.yaw.sin(),
                d * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    pub fn is_zoom_animating(&self) -> bool {
        self.distance.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follow() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 20.0);
        camera.set_follow_smoothness(0.1);
        camera.follow_target(Vec3::new(10.0, 0.0, 0.0), 0.1);

        let focus = camera.focus();
        assert!(focus.x > 0.0 && focus.x < 10.0);
        // One time constant covers ~63%
        assert!((focus.x - 6.32).abs() < 0.05);
    }

    #[test]
    fn test_camera_zoom_is_clamped_and_eased() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 20.0);
        camera.set_distance_limits(10.0, 30.0);
        camera.zoom_to(100.0, 0.5);

        camera.update(0.25);
        assert!(camera.distance() > 20.0 && camera.distance() < 30.0);
        camera.update(0.25);
        assert!((camera.distance() - 30.0).abs() < 0.01);

        camera.zoom_by(0.1, 0.0);
        camera.update(0.0);
        assert!((camera.distance() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_pitch_clamp_and_eye_distance() {
        let mut camera = OrbitCamera::new(Vec3::new(1.0, 0.0, 2.0), 20.0);
        camera.orbit(0.5, 10.0);
        assert_eq!(camera.pitch(), MAX_PITCH);
        camera.orbit(0.0, -10.0);
        assert_eq!(camera.pitch(), MIN_PITCH);

        let eye = camera.eye();
        assert!((eye.distance(camera.focus()) - 20.0).abs() < 1e-3);
        assert!(eye.y > 0.0);
    }
}
