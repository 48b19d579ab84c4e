//! Dash demo
//!
//! Normal movement at walking speed. Space (or tapping a direction while
//! holding Shift) dashes: a short burst at several times the walking speed,
//! followed by a cooldown that starts when the dash ends.
//!
//! ```text
//! Ready --dash--> Dashing --duration--> Cooling --cooldown--> Ready
//! ```

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{direction_label, move_direction, standard_command};
use crate::config::{require_positive, DemoTuning};
use crate::game::{Body, Bounds, Scene, SceneCommand, SceneContext, TextureCache, TimerHandle, Timers};
use crate::input::Action;
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 32.0;
/// Trail dots kept while dashing
const TRAIL_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub move_speed: f32,
    pub dash_speed: f32,
    /// Seconds the dash lasts
    pub dash_duration: f32,
    /// Seconds after a dash ends before the next one is allowed
    pub cooldown: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            move_speed: 200.0,
            dash_speed: 1080.0,
            dash_duration: 0.2,
            cooldown: 0.5,
        }
    }
}

impl DashConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("move_speed", self.move_speed)?;
        require_positive("dash_speed", self.dash_speed)?;
        require_positive("dash_duration", self.dash_duration)?;
        require_positive("cooldown", self.cooldown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPhase {
    Ready,
    Dashing,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashEvent {
    DashEnded,
    CooldownDone,
}

pub struct DashScene {
    config: DashConfig,
    bounds: Bounds,
    player: Body,
    /// Last non-zero movement direction; dashes go this way with no input
    facing: Vec2,
    dash_dir: Vec2,
    phase: DashPhase,
    timers: Timers<DashEvent>,
    cooldown_timer: Option<TimerHandle>,
    dash_count: u32,
    rejected: u32,
    trail: Vec<Vec2>,
}

impl DashScene {
    pub fn new(config: DashConfig) -> Self {
        Self {
            config,
            bounds: Bounds::new(800.0, 600.0),
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            facing: Vec2::X,
            dash_dir: Vec2::ZERO,
            phase: DashPhase::Ready,
            timers: Timers::new(),
            cooldown_timer: None,
            dash_count: 0,
            rejected: 0,
            trail: Vec::new(),
        }
    }

    pub fn phase(&self) -> DashPhase {
        self.phase
    }

    fn cooldown_remaining(&self) -> f32 {
        self.cooldown_timer
            .and_then(|h| self.timers.remaining(h))
            .unwrap_or(0.0)
            .max(0.0)
    }

    fn try_dash(&mut self, ctx: &mut SceneContext, dir: Vec2) {
        if self.phase != DashPhase::Ready {
            self.rejected += 1;
            ctx.signals.emit(
                "dash_rejected",
                json!({ "reason": if self.phase == DashPhase::Dashing { "dashing" } else { "cooldown" } }),
            );
            return;
        }

        self.phase = DashPhase::Dashing;
        self.dash_count += 1;
        self.dash_dir = dir;
        self.trail.clear();
        self.timers.after(self.config.dash_duration, DashEvent::DashEnded);
        ctx.signals.emit(
            "dash_started",
            json!({
                "direction": direction_label(dir),
                "dashCount": self.dash_count,
            }),
        );
    }

    fn handle(&mut self, ctx: &mut SceneContext, event: DashEvent) {
        match event {
            DashEvent::DashEnded => {
                self.phase = DashPhase::Cooling;
                self.player.vel = Vec2::ZERO;
                self.cooldown_timer = Some(self.timers.after(self.config.cooldown, DashEvent::CooldownDone));
                ctx.signals.emit("dash_ended", json!({ "x": self.player.pos.x, "y": self.player.pos.y }));
            }
            DashEvent::CooldownDone => {
                self.phase = DashPhase::Ready;
                self.cooldown_timer = None;
                ctx.signals.emit("cooldown_complete", json!({ "totalDashes": self.dash_count }));
            }
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("dashCount", self.dash_count);
        s.set("isDashing", self.phase == DashPhase::Dashing);
        s.set("canDash", self.phase == DashPhase::Ready);
        s.set("cooldownRemaining", (self.cooldown_remaining() * 1000.0).round() as i64);
        s.set("rejectedDashes", self.rejected);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(DashScene::new(tuning.dash.clone()))
}

impl Scene for DashScene {
    fn name(&self) -> &'static str {
        "dash"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::PLAYER_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.bounds = Bounds::new(ctx.screen.x, ctx.screen.y);
        self.player = Body::new(self.bounds.center(), Vec2::splat(PLAYER_SIZE));
        ctx.signals.emit(
            "scene_created",
            json!({ "dashSpeed": self.config.dash_speed, "cooldown": self.config.cooldown }),
        );
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

        let dir = move_direction(&ctx.input);
        if dir != Vec2::ZERO {
            self.facing = dir.normalize_or_zero();
        }

        let shift_tap = ctx.input.is_down(Action::Secondary) && ctx.input.move_pressed();
        if ctx.input.is_pressed(Action::Primary) || shift_tap {
            self.try_dash(ctx, self.facing);
        }

        self.player.vel = match self.phase {
            DashPhase::Dashing => self.dash_dir * self.config.dash_speed,
            _ => dir * self.config.move_speed,
        };
        self.player.integrate(delta_time, &self.bounds);

        if self.phase == DashPhase::Dashing {
            if self.trail.len() == TRAIL_LEN {
                self.trail.remove(0);
            }
            self.trail.push(self.player.pos);
        } else if !self.trail.is_empty() {
            self.trail.remove(0);
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        for (i, p) in self.trail.iter().enumerate() {
            let a = (i + 1) as f32 / TRAIL_LEN as f32 * 0.5;
            let c = ui::PLAYER_COLOR;
            draw_rectangle(
                p.x - PLAYER_SIZE * 0.5,
                p.y - PLAYER_SIZE * 0.5,
                PLAYER_SIZE,
                PLAYER_SIZE,
                Color::new(c.r, c.g, c.b, a),
            );
        }

        let tint = if self.phase == DashPhase::Dashing { YELLOW } else { WHITE };
        textures.draw_centered("player", self.player.pos, self.player.size, tint);

        let status = match self.phase {
            DashPhase::Ready => "Ready",
            DashPhase::Dashing => "DASHING!",
            DashPhase::Cooling => "Cooling down...",
        };
        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Dash count: {}", self.dash_count),
                format!("Status: {}", status),
                format!("Cooldown: {:.0} ms", self.cooldown_remaining() * 1000.0),
            ],
        );
        let fraction = match self.phase {
            DashPhase::Ready => 0.0,
            DashPhase::Dashing => 1.0,
            DashPhase::Cooling => self.cooldown_remaining() / self.config.cooldown,
        };
        hud::draw_cooldown_bar(16.0, 96.0, 200.0, 14.0, fraction);
        hud::draw_hint(ctx.screen, "Move: WASD/Arrows   Dash: Space or Shift+direction   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    fn scene() -> (DashScene, SceneContext) {
        let mut scene = DashScene::new(DashConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut DashScene, ctx: &mut SceneContext, input: FrameInput, dt: f32) {
        ctx.begin_frame(input, dt);
        scene.update(ctx, dt);
    }

    #[test]
    fn test_walk_speed() {
        let (mut scene, mut ctx) = scene();
        let start = scene.player.pos;
        step(&mut scene, &mut ctx, FrameInput::new().hold(Action::Right), 0.1);
        assert!((scene.player.pos.x - start.x - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_dash_sequence() {
        let (mut scene, mut ctx) = scene();
        step(&mut scene, &mut ctx, FrameInput::new().hold(Action::Right).press(Action::Primary), 0.016);
        assert_eq!(scene.phase(), DashPhase::Dashing);
        assert_eq!(scene.player.vel, vec2(1080.0, 0.0));
        assert_eq!(ctx.signals.get_i64("dashCount"), Some(1));

        step(&mut scene, &mut ctx, FrameInput::new(), 0.1);
        assert_eq!(scene.phase(), DashPhase::Dashing);

        step(&mut scene, &mut ctx, FrameInput::new(), 0.15);
        assert_eq!(scene.phase(), DashPhase::Cooling);
        assert_eq!(ctx.signals.get_bool("canDash"), Some(false));
        assert!(ctx.signals.get_i64("cooldownRemaining").unwrap_or(0) > 0);

        step(&mut scene, &mut ctx, FrameInput::new(), 0.5);
        assert_eq!(scene.phase(), DashPhase::Ready);
        assert_eq!(ctx.signals.count("cooldown_complete"), 1);
    }

    #[test]
    fn test_cannot_retrigger_during_cooldown() {
        let (mut scene, mut ctx) = scene();
        let dash = FrameInput::new().press(Action::Primary);
        step(&mut scene, &mut ctx, dash.clone(), 0.016);
        step(&mut scene, &mut ctx, dash.clone(), 0.05);
        step(&mut scene, &mut ctx, FrameInput::new(), 0.25);
        step(&mut scene, &mut ctx, dash.clone(), 0.1);
        assert_eq!(scene.dash_count, 1);
        assert_eq!(scene.rejected, 2);

        step(&mut scene, &mut ctx, FrameInput::new(), 0.5);
        step(&mut scene, &mut ctx, dash, 0.016);
        assert_eq!(scene.dash_count, 2);
    }

    #[test]
    fn test_shift_tap_dashes_in_pressed_direction() {
        let (mut scene, mut ctx) = scene();
        let input = FrameInput::new().hold(Action::Secondary).press(Action::Up);
        step(&mut scene, &mut ctx, input, 0.016);
        assert_eq!(scene.phase(), DashPhase::Dashing);
        assert_eq!(scene.dash_dir, vec2(0.0, -1.0));
        assert_eq!(ctx.signals.last_event(), Some("dash_started"));
    }
}
