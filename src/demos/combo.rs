//! Combo demo
//!
//! Every click (or Space) extends the combo and restarts a short timeout.
//! Letting the timeout run out drops the combo back to zero. Reaching the
//! threshold fires a special burst once per chain.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::{require_positive, DemoTuning};
use crate::game::{
    EmitterDef, ParticlePool, Scene, SceneCommand, SceneContext, TextureCache, ThresholdCounter, TimerHandle, Timers,
};
use crate::input::Action;
use crate::ui::{self, hud};

const TARGET_RADIUS: u16 = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds without input before the combo drops
    pub timeout: f32,
    /// Combo length that triggers the special
    pub threshold: u32,
    pub burst_count: usize,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            timeout: 1.0,
            threshold: 3,
            burst_count: 60,
        }
    }
}

impl ComboConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("timeout", self.timeout)?;
        if self.threshold == 0 {
            return Err("threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComboEvent {
    Timeout,
}

pub struct ComboScene {
    config: ComboConfig,
    counter: ThresholdCounter,
    timers: Timers<ComboEvent>,
    timeout: Option<TimerHandle>,
    max_combo: u32,
    specials: u32,
    particles: ParticlePool,
    target: Vec2,
    /// Seconds left on the "+1" pop animation
    pop: f32,
}

impl ComboScene {
    pub fn new(config: ComboConfig) -> Self {
        let counter = ThresholdCounter::new(config.threshold);
        Self {
            config,
            counter,
            timers: Timers::new(),
            timeout: None,
            max_combo: 0,
            specials: 0,
            particles: ParticlePool::new(),
            target: Vec2::ZERO,
            pop: 0.0,
        }
    }

    pub fn combo(&self) -> u32 {
        self.counter.count()
    }

    fn hit(&mut self, ctx: &mut SceneContext) {
        let reached = self.counter.increment();
        self.max_combo = self.max_combo.max(self.counter.count());
        self.pop = 0.15;

        let restarted = self
            .timeout
            .is_some_and(|h| self.timers.reset(h, self.config.timeout));
        if !restarted {
            self.timeout = Some(self.timers.after(self.config.timeout, ComboEvent::Timeout));
        }

        ctx.signals.emit("combo_hit", json!({ "combo": self.counter.count() }));

        if reached {
            self.specials += 1;
            self.particles
                .spawn_burst(&EmitterDef::confetti(), self.target, self.config.burst_count);
            ctx.signals.emit(
                "combo_special",
                json!({ "combo": self.counter.count(), "specials": self.specials }),
            );
        }
    }

    fn handle(&mut self, ctx: &mut SceneContext, event: ComboEvent) {
        match event {
            ComboEvent::Timeout => {
                ctx.signals.emit("combo_reset", json!({ "combo": self.counter.count() }));
                self.counter.reset();
                self.timeout = None;
            }
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("combo", self.counter.count());
        s.set("maxCombo", self.max_combo);
        s.set("specials", self.specials);
        s.set("specialArmed", !self.counter.has_fired());
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(ComboScene::new(tuning.combo.clone()))
}

impl Scene for ComboScene {
    fn name(&self) -> &'static str {
        "combo"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.circle("target", TARGET_RADIUS, ui::ENEMY_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.target = ctx.screen * 0.5;
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        for event in self.timers.tick(delta_time) {
            self.handle(ctx, event);
        }

        if ctx.input.clicked || ctx.input.is_pressed(Action::Primary) {
            self.hit(ctx);
        }

        self.pop = (self.pop - delta_time).max(0.0);
        self.particles.update(delta_time);
        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        let scale = 1.0 + self.pop * 1.5;
        let size = Vec2::splat(TARGET_RADIUS as f32 * 2.0 * scale);
        textures.draw_centered("target", self.target, size, WHITE);
        self.particles.draw(Vec2::ZERO);

        if self.counter.count() > 0 {
            let text = format!("{} HIT COMBO", self.counter.count());
            let dims = measure_text(&text, None, ui::FONT_SIZE_TITLE as u16, 1.0);
            let color = if self.counter.has_fired() { ui::COIN_COLOR } else { ui::TEXT_COLOR };
            draw_text(&text, self.target.x - dims.width * 0.5, self.target.y - 70.0, ui::FONT_SIZE_TITLE, color);
        }

        let remaining = self
            .timeout
            .and_then(|h| self.timers.remaining(h))
            .unwrap_or(0.0);
        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Combo: {}", self.counter.count()),
                format!("Max combo: {}", self.max_combo),
                format!("Specials: {}", self.specials),
            ],
        );
        hud::draw_cooldown_bar(16.0, 96.0, 200.0, 10.0, 1.0 - remaining / self.config.timeout);
        hud::draw_hint(ctx.screen, "Click or Space to hit   Restart: R   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    fn scene() -> (ComboScene, SceneContext) {
        let mut scene = ComboScene::new(ComboConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut ComboScene, ctx: &mut SceneContext, input: FrameInput, dt: f32) {
        ctx.begin_frame(input, dt);
        scene.update(ctx, dt);
    }

    fn hit() -> FrameInput {
        FrameInput::new().press(Action::Primary)
    }

    #[test]
    fn test_special_fires_exactly_once_per_chain() {
        let (mut scene, mut ctx) = scene();
        for _ in 0..3 {
            step(&mut scene, &mut ctx, hit(), 0.25);
        }
        assert_eq!(scene.specials, 1);
        assert!(scene.particles.alive_count() > 0);

        for _ in 0..3 {
            step(&mut scene, &mut ctx, hit(), 0.25);
        }
        assert_eq!(scene.combo(), 6);
        assert_eq!(scene.specials, 1);
        assert_eq!(ctx.signals.count("combo_special"), 1);
    }

    #[test]
    fn test_timeout_resets_combo_and_rearms() {
        let (mut scene, mut ctx) = scene();
        step(&mut scene, &mut ctx, hit(), 0.1);
        step(&mut scene, &mut ctx, hit(), 0.5);
        step(&mut scene, &mut ctx, FrameInput::new(), 0.75);
        assert_eq!(scene.combo(), 2, "each hit restarts the timeout");

        step(&mut scene, &mut ctx, FrameInput::new(), 0.5);
        assert_eq!(scene.combo(), 0);
        assert_eq!(scene.max_combo, 2);
        assert_eq!(ctx.signals.last_event(), Some("combo_reset"));

        for _ in 0..3 {
            step(&mut scene, &mut ctx, hit(), 0.1);
        }
        for _ in 0..3 {
            step(&mut scene, &mut ctx, hit(), 0.1);
        }
        assert_eq!(scene.specials, 1);
        step(&mut scene, &mut ctx, FrameInput::new(), 1.5);
        for _ in 0..3 {
            step(&mut scene, &mut ctx, hit(), 0.1);
        }
        assert_eq!(scene.specials, 2);
        assert_eq!(scene.max_combo, 6);
    }

    #[test]
    fn test_click_counts_as_hit() {
        let (mut scene, mut ctx) = scene();
        step(&mut scene, &mut ctx, FrameInput::new().click(1.0, 1.0), 0.1);
        assert_eq!(ctx.signals.get_i64("combo"), Some(1));
    }
}
