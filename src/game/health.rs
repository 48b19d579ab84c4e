//! Health component
//!
//! Hit points clamped to `[0, max]` plus an optional invulnerability window
//! that starts on every successful hit.

use super::timer::Cooldown;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: i32,
    max: i32,
    /// Damage immunity after a hit (i-frames, measured in seconds)
    invulnerability: Cooldown,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            invulnerability: Cooldown::new(0.0),
        }
    }

    /// Grant `seconds` of damage immunity after each hit
    pub fn with_invulnerability(mut self, seconds: f32) -> Self {
        self.invulnerability = Cooldown::new(seconds);
        self
    }

    /// Apply damage. Returns true if the hit landed (not blocked by
    /// invulnerability and the entity was still alive).
    pub fn damage(&mut self, amount: i32) -> bool {
        if self.is_dead() || self.is_invulnerable() {
            return false;
        }
        self.current = (self.current - amount.max(0)).max(0);
        self.invulnerability.force();
        true
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_dead() {
            return;
        }
        self.current = (self.current + amount.max(0)).min(self.max);
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.invulnerability.tick(delta_time);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability.is_ready()
    }

    pub fn invulnerable_remaining(&self) -> f32 {
        self.invulnerability.remaining()
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Current health as a fraction of max
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    /// Full health, no immunity
    pub fn restore(&mut self) {
        self.current = self.max;
        self.invulnerability.reset();
    }
}
