//! Camera shake
//!
//! Shake is a random offset applied to everything drawn in world space.
//! Intensity is a fraction of the screen size, so `start(0.3, 0.01)` on an
//! 800x600 view jitters by up to 8x6 pixels for 0.3 seconds, fading out.

use macroquad::prelude::Vec2;

use super::rng::Lcg;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShake {
    duration: f32,
    elapsed: f32,
    intensity: f32,
    active: bool,
}

impl CameraShake {
    pub fn new() -> Self {
        Self {
            duration: 0.0,
            elapsed: 0.0,
            intensity: 0.0,
            active: false,
        }
    }

    /// Start shaking. A shake already in progress is left alone unless
    /// `force` is set. Returns true if a new shake started.
    pub fn start(&mut self, duration: f32, intensity: f32, force: bool) -> bool {
        if self.active && !force {
            return false;
        }
        self.duration = duration.max(0.0);
        self.intensity = intensity.max(0.0);
        self.elapsed = 0.0;
        self.active = self.duration > 0.0;
        self.active
    }

    pub fn tick(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }
        self.elapsed += delta_time;
        if self.elapsed >= self.duration {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current intensity after linear fade-out
    pub fn current_intensity(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 0.0;
        }
        self.intensity * (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Offset to add to world-space drawing this frame
    pub fn offset(&self, screen: Vec2, rng: &mut Lcg) -> Vec2 {
        let strength = self.current_intensity();
        if strength <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            rng.range_f32(-1.0, 1.0) * strength * screen.x,
            rng.range_f32(-1.0, 1.0) * strength * screen.y,
        )
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }
}

impl Default for CameraShake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_shake_ends_after_duration() {
        let mut shake = CameraShake::new();
        assert!(shake.start(0.3, 0.01, false));
        shake.tick(0.2);
        assert!(shake.is_active());
        shake.tick(0.2);
        assert!(!shake.is_active());
        assert_eq!(shake.offset(SCREEN, &mut Lcg::new(1)), Vec2::ZERO);
    }

    #[test]
    fn test_offset_bounded_by_intensity() {
        let mut shake = CameraShake::new();
        shake.start(1.0, 0.01, false);
        let mut rng = Lcg::new(3);
        for _ in 0..100 {
            let o = shake.offset(SCREEN, &mut rng);
            assert!(o.x.abs() <= 8.0 && o.y.abs() <= 6.0);
        }
    }

    #[test]
    fn test_intensity_fades() {
        let mut shake = CameraShake::new();
        shake.start(1.0, 0.04, false);
        let first = shake.current_intensity();
        shake.tick(0.5);
        let mid = shake.current_intensity();
        assert!(mid < first);
        assert!((mid - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_running_shake_not_replaced_unless_forced() {
        let mut shake = CameraShake::new();
        shake.start(1.0, 0.01, false);
        assert!(!shake.start(0.5, 0.05, false));
        assert!((shake.current_intensity() - 0.01).abs() < 1e-6);
        assert!(shake.start(0.5, 0.05, true));
        assert!((shake.current_intensity() - 0.05).abs() < 1e-6);
    }
}
