//! Camera shake demo
//!
//! Space: light shake. Shift: heavy shake (interrupts a running one).
//! Click: impact at the cursor with sparks and a light shake.
//! Everything in world space is drawn with the shake offset; the HUD isn't.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::{require_positive, DemoTuning};
use crate::game::{CameraShake, EmitterDef, Lcg, ParticlePool, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

const CRATE_SIZE: f32 = 48.0;

/// One shake preset: seconds and fraction of the screen size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakePreset {
    pub duration: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraShakeConfig {
    pub light: ShakePreset,
    pub heavy: ShakePreset,
    pub impact_sparks: usize,
}

impl Default for CameraShakeConfig {
    fn default() -> Self {
        Self {
            light: ShakePreset { duration: 0.3, intensity: 0.01 },
            heavy: ShakePreset { duration: 0.6, intensity: 0.03 },
            impact_sparks: 24,
        }
    }
}

impl CameraShakeConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, p) in [("light", self.light), ("heavy", self.heavy)] {
            require_positive(&format!("{}.duration", name), p.duration)?;
            if !(0.0..=0.5).contains(&p.intensity) {
                return Err(format!("{}.intensity must be within 0..=0.5", name));
            }
        }
        Ok(())
    }
}

pub struct CameraShakeScene {
    config: CameraShakeConfig,
    shake: CameraShake,
    jitter: Lcg,
    /// Offset applied to world drawing this frame
    offset: Vec2,
    crates: Vec<Vec2>,
    particles: ParticlePool,
    shakes: u32,
    ignored: u32,
}

impl CameraShakeScene {
    pub fn new(config: CameraShakeConfig) -> Self {
        Self {
            config,
            shake: CameraShake::new(),
            jitter: Lcg::new(1),
            offset: Vec2::ZERO,
            crates: Vec::new(),
            particles: ParticlePool::new(),
            shakes: 0,
            ignored: 0,
        }
    }

    fn start_shake(&mut self, ctx: &mut SceneContext, kind: &str, preset: ShakePreset, force: bool) {
        if self.shake.start(preset.duration, preset.intensity, force) {
            self.shakes += 1;
            ctx.signals.emit(
                "shake_started",
                json!({
                    "kind": kind,
                    "duration": preset.duration,
                    "intensity": preset.intensity,
                    "shakeCount": self.shakes,
                }),
            );
        } else {
            self.ignored += 1;
            ctx.signals.emit("shake_ignored", json!({ "kind": kind }));
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("shakeCount", self.shakes);
        s.set("ignoredShakes", self.ignored);
        s.set("isShaking", self.shake.is_active());
        s.set("intensity", self.shake.current_intensity());
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(CameraShakeScene::new(tuning.camera_shake.clone()))
}

impl Scene for CameraShakeScene {
    fn name(&self) -> &'static str {
        "camera_shake"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.outlined_rect("crate", CRATE_SIZE as u16, CRATE_SIZE as u16, ui::PLATFORM_COLOR, BLACK);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        let screen = ctx.screen;
        self.crates = (0..5)
            .flat_map(|col| (0..3).map(move |row| (col, row)))
            .map(|(col, row)| {
                vec2(
                    screen.x * (col as f32 + 1.0) / 6.0,
                    screen.y * (row as f32 + 1.0) / 4.0,
                )
            })
            .collect();
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        self.shake.tick(delta_time);

        if ctx.input.is_pressed(Action::Primary) {
            self.start_shake(ctx, "light", self.config.light, false);
        }
        if ctx.input.is_pressed(Action::Secondary) {
            self.start_shake(ctx, "heavy", self.config.heavy, true);
        }
        if ctx.input.clicked {
            let at = ctx.input.mouse;
            self.particles.spawn_burst(&EmitterDef::sparks(), at, self.config.impact_sparks);
            ctx.signals.emit("impact", json!({ "x": at.x, "y": at.y }));
            self.start_shake(ctx, "impact", self.config.light, false);
        }

        self.offset = self.shake.offset(ctx.screen, &mut self.jitter);
        self.particles.update(delta_time);
        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        for pos in &self.crates {
            textures.draw_centered("crate", *pos + self.offset, Vec2::splat(CRATE_SIZE), WHITE);
        }
        self.particles.draw(self.offset);

        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Shakes: {}", self.shakes),
                format!("Ignored (already shaking): {}", self.ignored),
                format!("Intensity: {:.3}", self.shake.current_intensity()),
            ],
        );
        hud::draw_hint(ctx.screen, "Light: Space   Heavy: Shift   Impact: click   Menu: Esc");
    }
}
