//! Particle showcase
//!
//! One continuous emitter in the middle of the screen. Q/E (or Left/Right,
//! or a click) cycle through the presets; Space fires a one-shot burst of
//! the current preset at the emitter, a click also moves the emitter.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::DemoTuning;
use crate::game::{EmitterDef, ParticleEmitter, ParticlePool, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::hud;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    /// Particles per Space burst
    pub burst_count: usize,
    /// Extra emitter definitions appended after the built-in presets
    pub custom: Vec<EmitterDef>,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            burst_count: 40,
            custom: Vec::new(),
        }
    }
}

impl ParticlesConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.burst_count == 0 || self.burst_count > crate::game::particles::MAX_PARTICLES {
            return Err(format!("burst_count must be 1..={}", crate::game::particles::MAX_PARTICLES));
        }
        for def in &self.custom {
            if def.life_min <= 0.0 || def.life_max < def.life_min {
                return Err(format!("emitter '{}' has an invalid lifetime range", def.name));
            }
        }
        Ok(())
    }
}

pub struct ParticleShowcase {
    config: ParticlesConfig,
    presets: Vec<EmitterDef>,
    current: usize,
    emitter: ParticleEmitter,
    pool: ParticlePool,
    switches: u32,
    bursts: u32,
}

impl ParticleShowcase {
    pub fn new(config: ParticlesConfig) -> Self {
        let mut presets = EmitterDef::presets();
        presets.extend(config.custom.iter().cloned());
        let emitter = ParticleEmitter::new(presets[0].clone(), Vec2::ZERO);
        Self {
            config,
            presets,
            current: 0,
            emitter,
            pool: ParticlePool::new(),
            switches: 0,
            bursts: 0,
        }
    }

    pub fn current_name(&self) -> &str {
        &self.presets[self.current].name
    }

    fn switch_to(&mut self, ctx: &mut SceneContext, index: usize) {
        let from = self.current_name().to_string();
        self.current = index % self.presets.len();
        self.emitter.set_def(self.presets[self.current].clone());
        self.switches += 1;
        ctx.signals.emit(
            "preset_switched",
            json!({ "from": from, "to": self.current_name(), "switches": self.switches }),
        );
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("preset", self.current_name());
        s.set("presetIndex", self.current);
        s.set("aliveParticles", self.pool.alive_count());
        s.set("switches", self.switches);
        s.set("bursts", self.bursts);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(ParticleShowcase::new(tuning.particles.clone()))
}

impl Scene for ParticleShowcase {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.emitter.origin = vec2(ctx.screen.x * 0.5, ctx.screen.y * 0.6);
        ctx.signals.emit(
            "scene_created",
            json!({ "presets": self.presets.iter().map(|p| p.name.as_str()).collect::<Vec<_>>() }),
        );
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        let count = self.presets.len();
        if ctx.input.is_pressed(Action::Next) || ctx.input.is_pressed(Action::Right) {
            self.switch_to(ctx, self.current + 1);
        } else if ctx.input.is_pressed(Action::Prev) || ctx.input.is_pressed(Action::Left) {
            self.switch_to(ctx, self.current + count - 1);
        }

        if ctx.input.clicked {
            self.emitter.origin = ctx.input.mouse;
            self.switch_to(ctx, self.current + 1);
        }

        if ctx.input.is_pressed(Action::Primary) {
            let spawned = self
                .pool
                .spawn_burst(&self.presets[self.current], self.emitter.origin, self.config.burst_count);
            self.bursts += 1;
            ctx.signals.emit("burst", json!({ "preset": self.current_name(), "spawned": spawned }));
        }

        self.pool.emit(&mut self.emitter, delta_time);
        self.pool.update(delta_time);
        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, _textures: &TextureCache) {
        self.pool.draw(Vec2::ZERO);
        draw_circle_lines(self.emitter.origin.x, self.emitter.origin.y, 6.0, 1.0, GRAY);

        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Preset: {} ({}/{})", self.current_name(), self.current + 1, self.presets.len()),
                format!("Particles: {}", self.pool.alive_count()),
            ],
        );
        hud::draw_hint(ctx.screen, "Switch: Q/E or Left/Right or click   Burst: Space   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::particles::MAX_PARTICLES;
    use crate::input::FrameInput;

    fn scene() -> (ParticleShowcase, SceneContext) {
        let mut scene = ParticleShowcase::new(ParticlesConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut ParticleShowcase, ctx: &mut SceneContext, input: FrameInput, dt: f32) {
        ctx.begin_frame(input, dt);
        scene.update(ctx, dt);
    }

    #[test]
    fn test_switch_wraps_both_ways() {
        let (mut scene, mut ctx) = scene();
        assert_eq!(scene.current_name(), "fire");
        step(&mut scene, &mut ctx, FrameInput::new().press(Action::Prev), 0.016);
        assert_eq!(scene.current_name(), "confetti");
        step(&mut scene, &mut ctx, FrameInput::new().press(Action::Next), 0.016);
        assert_eq!(scene.current_name(), "fire");
        assert_eq!(ctx.signals.count("preset_switched"), 2);
    }

    #[test]
    fn test_continuous_emitter_produces_particles() {
        let (mut scene, mut ctx) = scene();
        for _ in 0..30 {
            step(&mut scene, &mut ctx, FrameInput::new(), 1.0 / 60.0);
        }
        assert!(scene.pool.alive_count() > 0);
        assert!(scene.pool.alive_count() <= MAX_PARTICLES);
    }

    #[test]
    fn test_burst_never_exceeds_pool() {
        let (mut scene, mut ctx) = scene();
        for _ in 0..20 {
            step(&mut scene, &mut ctx, FrameInput::new().press(Action::Primary), 0.001);
        }
        assert_eq!(scene.bursts, 20);
        assert!(scene.pool.alive_count() <= MAX_PARTICLES);
    }

    #[test]
    fn test_click_moves_emitter() {
        let (mut scene, mut ctx) = scene();
        step(&mut scene, &mut ctx, FrameInput::new().click(100.0, 120.0), 0.016);
        assert_eq!(scene.emitter.origin, vec2(100.0, 120.0));
        assert_eq!(scene.current_name(), "smoke");
    }

    #[test]
    fn test_custom_presets_appended() {
        let mut def = EmitterDef::sparks();
        def.name = "mine".to_string();
        let config = ParticlesConfig { custom: vec![def], ..Default::default() };
        assert!(config.validate().is_ok());
        let scene = ParticleShowcase::new(config);
        assert_eq!(scene.presets.last().map(|p| p.name.as_str()), Some("mine"));
    }
}
