//! Particle System
//!
//! Fixed-size 2D particle pool. Emitters are plain definitions; the pool
//! owns every live particle so switching emitter presets never leaks
//! particles and the cost per frame is bounded.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use super::rng::Lcg;

/// Maximum number of live particles
pub const MAX_PARTICLES: usize = 256;

/// A single particle in the pool
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Screen position
    pub position: Vec2,
    /// Velocity (pixels per second)
    pub velocity: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    /// Total lifetime (for interpolation)
    pub max_life: f32,
    pub color_start: [u8; 3],
    pub color_end: [u8; 3],
    pub size_start: f32,
    pub size_end: f32,
    /// Downward acceleration for this particle (pixels/s², negative rises)
    pub gravity: f32,
    pub alive: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            life: 0.0,
            max_life: 1.0,
            color_start: [255, 255, 255],
            color_end: [128, 128, 128],
            size_start: 4.0,
            size_end: 0.0,
            gravity: 0.0,
            alive: false,
        }
    }
}

/// Definition for a particle emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterDef {
    pub name: String,
    /// Particles to emit per second (0 = burst only)
    pub spawn_rate: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Centre of the emission cone in radians (0 = right, -PI/2 = up)
    pub angle: f32,
    /// Half-angle of the emission cone in radians (PI = every direction)
    pub spread: f32,
    pub gravity: f32,
    pub life_min: f32,
    pub life_max: f32,
    pub color_start: [u8; 3],
    pub color_end: [u8; 3],
    pub size_start: f32,
    pub size_end: f32,
}

impl Default for EmitterDef {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            spawn_rate: 10.0,
            speed_min: 100.0,
            speed_max: 300.0,
            angle: -std::f32::consts::FRAC_PI_2,
            spread: 0.5,
            gravity: 200.0,
            life_min: 0.3,
            life_max: 1.0,
            color_start: [255, 200, 50],
            color_end: [200, 50, 0],
            size_start: 4.0,
            size_end: 0.0,
        }
    }
}

/// Common particle effect presets
impl EmitterDef {
    /// Hit sparks (yellow-white, very fast, burst only)
    pub fn sparks() -> Self {
        Self {
            name: "sparks".to_string(),
            spawn_rate: 0.0,
            speed_min: 200.0,
            speed_max: 400.0,
            angle: 0.0,
            spread: std::f32::consts::PI,
            gravity: 300.0,
            life_min: 0.2,
            life_max: 0.5,
            color_start: [255, 255, 200],
            color_end: [255, 150, 0],
            size_start: 3.0,
            size_end: 1.0,
        }
    }

    /// Fire (orange-yellow, rises)
    pub fn fire() -> Self {
        Self {
            name: "fire".to_string(),
            spawn_rate: 60.0,
            speed_min: 40.0,
            speed_max: 120.0,
            angle: -std::f32::consts::FRAC_PI_2,
            spread: 0.35,
            gravity: -60.0,
            life_min: 0.4,
            life_max: 0.9,
            color_start: [255, 220, 80],
            color_end: [200, 40, 0],
            size_start: 8.0,
            size_end: 1.0,
        }
    }

    /// Smoke (grey, slow, long-lived)
    pub fn smoke() -> Self {
        Self {
            name: "smoke".to_string(),
            spawn_rate: 15.0,
            speed_min: 20.0,
            speed_max: 60.0,
            angle: -std::f32::consts::FRAC_PI_2,
            spread: 0.6,
            gravity: -20.0,
            life_min: 1.2,
            life_max: 2.5,
            color_start: [150, 140, 130],
            color_end: [60, 60, 60],
            size_start: 6.0,
            size_end: 16.0,
        }
    }

    /// Snow (white, drifts down)
    pub fn snow() -> Self {
        Self {
            name: "snow".to_string(),
            spawn_rate: 25.0,
            speed_min: 20.0,
            speed_max: 50.0,
            angle: std::f32::consts::FRAC_PI_2,
            spread: 0.8,
            gravity: 10.0,
            life_min: 2.0,
            life_max: 4.0,
            color_start: [255, 255, 255],
            color_end: [200, 220, 255],
            size_start: 3.0,
            size_end: 2.0,
        }
    }

    /// Fountain (blue, arcs under gravity)
    pub fn fountain() -> Self {
        Self {
            name: "fountain".to_string(),
            spawn_rate: 80.0,
            speed_min: 250.0,
            speed_max: 350.0,
            angle: -std::f32::consts::FRAC_PI_2,
            spread: 0.2,
            gravity: 500.0,
            life_min: 1.0,
            life_max: 1.4,
            color_start: [80, 160, 255],
            color_end: [20, 40, 160],
            size_start: 3.0,
            size_end: 2.0,
        }
    }

    /// Confetti (multicolour handled by caller, short pop)
    pub fn confetti() -> Self {
        Self {
            name: "confetti".to_string(),
            spawn_rate: 0.0,
            speed_min: 150.0,
            speed_max: 350.0,
            angle: -std::f32::consts::FRAC_PI_2,
            spread: 1.2,
            gravity: 400.0,
            life_min: 0.8,
            life_max: 1.5,
            color_start: [155, 89, 182],
            color_end: [241, 196, 15],
            size_start: 5.0,
            size_end: 3.0,
        }
    }

    /// Every built-in preset, in showcase order
    pub fn presets() -> Vec<EmitterDef> {
        vec![
            Self::fire(),
            Self::smoke(),
            Self::snow(),
            Self::fountain(),
            Self::sparks(),
            Self::confetti(),
        ]
    }
}

/// Runtime emitter: a definition plus where and whether it is emitting
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    pub def: EmitterDef,
    pub origin: Vec2,
    /// Accumulated time for spawn rate (fractional particle)
    pub spawn_accumulator: f32,
    pub active: bool,
}

impl ParticleEmitter {
    pub fn new(def: EmitterDef, origin: Vec2) -> Self {
        Self {
            def,
            origin,
            spawn_accumulator: 0.0,
            active: true,
        }
    }

    /// Swap the definition, keeping position and activity
    pub fn set_def(&mut self, def: EmitterDef) {
        self.def = def;
        self.spawn_accumulator = 0.0;
    }
}

/// The particle pool - manages all live particles
pub struct ParticlePool {
    pub particles: Vec<Particle>,
    /// Seeded so the same bursts come out the same every run
    rng: Lcg,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::with_seed(12345)
    }

    pub fn with_seed(seed: u32) -> Self {
        Self {
            particles: vec![Particle::default(); MAX_PARTICLES],
            rng: Lcg::new(seed),
        }
    }

    /// Random float in range [min, max)
    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.range_f32(min, max)
    }

    fn find_free_slot(&self) -> Option<usize> {
        self.particles.iter().position(|p| !p.alive)
    }

    /// Spawn a single particle. Returns false when the pool is full.
    pub fn spawn_one(&mut self, def: &EmitterDef, origin: Vec2) -> bool {
        let Some(idx) = self.find_free_slot() else {
            return false;
        };
        let speed = self.random_range(def.speed_min, def.speed_max);
        let life = self.random_range(def.life_min, def.life_max).max(0.01);
        let angle = def.angle + self.random_range(-def.spread, def.spread);

        self.particles[idx] = Particle {
            position: origin,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            life,
            max_life: life,
            color_start: def.color_start,
            color_end: def.color_end,
            size_start: def.size_start,
            size_end: def.size_end,
            gravity: def.gravity,
            alive: true,
        };
        true
    }

    /// Spawn a burst of particles (for one-shot effects like hits).
    /// Returns how many actually spawned.
    pub fn spawn_burst(&mut self, def: &EmitterDef, origin: Vec2, count: usize) -> usize {
        (0..count).take_while(|_| self.spawn_one(def, origin)).count()
    }

    /// Feed a continuous emitter for one frame
    pub fn emit(&mut self, emitter: &mut ParticleEmitter, delta_time: f32) {
        if !emitter.active || emitter.def.spawn_rate <= 0.0 {
            return;
        }
        emitter.spawn_accumulator += emitter.def.spawn_rate * delta_time;
        while emitter.spawn_accumulator >= 1.0 {
            emitter.spawn_accumulator -= 1.0;
            if !self.spawn_one(&emitter.def, emitter.origin) {
                emitter.spawn_accumulator = 0.0;
                break;
            }
        }
    }

    /// Update all live particles
    pub fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            if !particle.alive {
                continue;
            }

            particle.life -= delta_time;
            if particle.life <= 0.0 {
                particle.alive = false;
                continue;
            }

            particle.velocity.y += particle.gravity * delta_time;
            particle.position += particle.velocity * delta_time;
        }
    }

    /// Draw all live particles as filled circles, shifted by `offset`
    pub fn draw(&self, offset: Vec2) {
        for particle in &self.particles {
            if !particle.alive {
                continue;
            }

            // Interpolation factor (0 = just spawned, 1 = about to die)
            let t = 1.0 - (particle.life / particle.max_life);

            let r = lerp_u8(particle.color_start[0], particle.color_end[0], t);
            let g = lerp_u8(particle.color_start[1], particle.color_end[1], t);
            let b = lerp_u8(particle.color_start[2], particle.color_end[2], t);
            let alpha = ((1.0 - t) * 255.0) as u8;
            let size = particle.size_start + (particle.size_end - particle.size_start) * t;

            let p = particle.position + offset;
            draw_circle(p.x, p.y, size.max(0.5), Color::from_rgba(r, g, b, alpha));
        }
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    /// Kill all particles
    pub fn clear(&mut self) {
        for p in &mut self.particles {
            p.alive = false;
        }
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Lerp between two u8 values
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let result = a as f32 * (1.0 - t) + b as f32 * t;
    result.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_respects_capacity() {
        let mut pool = ParticlePool::new();
        let spawned = pool.spawn_burst(&EmitterDef::sparks(), Vec2::ZERO, MAX_PARTICLES + 50);
        assert_eq!(spawned, MAX_PARTICLES);
        assert_eq!(pool.alive_count(), MAX_PARTICLES);
        assert!(!pool.spawn_one(&EmitterDef::sparks(), Vec2::ZERO));
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = ParticlePool::with_seed(99);
        let mut b = ParticlePool::with_seed(99);
        let mut c = ParticlePool::with_seed(100);
        let def = EmitterDef::sparks();
        a.spawn_burst(&def, Vec2::new(100.0, 100.0), 16);
        b.spawn_burst(&def, Vec2::new(100.0, 100.0), 16);
        c.spawn_burst(&def, Vec2::new(100.0, 100.0), 16);

        let velocities = |pool: &ParticlePool| -> Vec<Vec2> {
            pool.particles.iter().filter(|p| p.alive).map(|p| p.velocity).collect()
        };
        assert_eq!(velocities(&a).len(), 16);
        assert_eq!(velocities(&a), velocities(&b));
        assert_ne!(velocities(&a), velocities(&c));
    }

    #[test]
    fn test_particles_expire() {
        let mut pool = ParticlePool::new();
        pool.spawn_burst(&EmitterDef::sparks(), Vec2::ZERO, 30);
        pool.update(0.1);
        assert_eq!(pool.alive_count(), 30);
        // Sparks live at most 0.5s
        pool.update(0.5);
        assert_eq!(pool.alive_count(), 0);
    }

    #[test]
    fn test_emitter_spawn_rate() {
        let mut pool = ParticlePool::new();
        let mut emitter = ParticleEmitter::new(EmitterDef::fire(), Vec2::new(400.0, 300.0));
        // 60/s for 0.25s = 15 particles
        for _ in 0..5 {
            pool.emit(&mut emitter, 0.05);
        }
        assert!((14..=15).contains(&pool.alive_count()));

        emitter.active = false;
        pool.emit(&mut emitter, 1.0);
        assert!(pool.alive_count() <= 15);
    }

    #[test]
    fn test_burst_only_preset_never_streams() {
        let mut pool = ParticlePool::new();
        let mut emitter = ParticleEmitter::new(EmitterDef::sparks(), Vec2::ZERO);
        pool.emit(&mut emitter, 10.0);
        assert_eq!(pool.alive_count(), 0);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut pool = ParticlePool::new();
        let def = EmitterDef {
            speed_min: 0.0,
            speed_max: 0.0,
            gravity: 100.0,
            life_min: 5.0,
            life_max: 5.0,
            ..EmitterDef::default()
        };
        pool.spawn_one(&def, Vec2::ZERO);
        pool.update(1.0);
        let p = pool.particles.iter().find(|p| p.alive).copied().unwrap_or_default();
        assert!(p.alive);
        assert!(p.position.y > 0.0);
    }

    #[test]
    fn test_presets_have_unique_names() {
        let presets = EmitterDef::presets();
        let mut names: Vec<_> = presets.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), presets.len());
    }

    #[test]
    fn test_lerp_u8_endpoints() {
        assert_eq!(lerp_u8(0, 200, 0.0), 0);
        assert_eq!(lerp_u8(0, 200, 1.0), 200);
    }
}
