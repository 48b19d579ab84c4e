//! Patrol / chase demo
//!
//! Guards walk their waypoint loops until the player comes within the
//! detect radius, then chase. They give up once the player is beyond the
//! lose radius. Touching a guard costs health.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{move_direction, standard_command};
use crate::config::{require_positive, DemoTuning};
use crate::game::{
    AiState, Body, Bounds, Health, PatrolChase, PatrolChaseConfig, Scene, SceneCommand, SceneContext, TextureCache,
};
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 28.0;
const GUARD_SIZE: f32 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolDemoConfig {
    pub ai: PatrolChaseConfig,
    pub player_speed: f32,
    pub max_health: i32,
    pub invulnerability: f32,
}

impl Default for PatrolDemoConfig {
    fn default() -> Self {
        Self {
            ai: PatrolChaseConfig::default(),
            player_speed: 220.0,
            max_health: 5,
            invulnerability: 1.0,
        }
    }
}

impl PatrolDemoConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("ai.patrol_speed", self.ai.patrol_speed)?;
        require_positive("ai.chase_speed", self.ai.chase_speed)?;
        require_positive("ai.detect_radius", self.ai.detect_radius)?;
        if self.ai.lose_radius < self.ai.detect_radius {
            return Err("ai.lose_radius must be >= ai.detect_radius".to_string());
        }
        require_positive("player_speed", self.player_speed)?;
        if self.max_health < 1 {
            return Err("max_health must be at least 1".to_string());
        }
        Ok(())
    }
}

struct Guard {
    body: Body,
    brain: PatrolChase,
}

pub struct PatrolChaseScene {
    config: PatrolDemoConfig,
    bounds: Bounds,
    player: Body,
    health: Health,
    guards: Vec<Guard>,
    detections: u32,
    game_over: bool,
}

/// Rectangular waypoint loop centred on `center`
fn loop_around(center: Vec2, half: Vec2) -> Vec<Vec2> {
    vec![
        center + vec2(-half.x, -half.y),
        center + vec2(half.x, -half.y),
        center + vec2(half.x, half.y),
        center + vec2(-half.x, half.y),
    ]
}

impl PatrolChaseScene {
    pub fn new(config: PatrolDemoConfig) -> Self {
        let health = Health::new(config.max_health).with_invulnerability(config.invulnerability);
        Self {
            config,
            bounds: Bounds::new(800.0, 600.0),
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            health,
            guards: Vec::new(),
            detections: 0,
            game_over: false,
        }
    }

    fn chasing(&self) -> usize {
        self.guards
            .iter()
            .filter(|g| g.brain.state() == AiState::Chase)
            .count()
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let states: Vec<&str> = self.guards.iter().map(|g| g.brain.state().label()).collect();
        let s = &mut ctx.signals;
        s.set("guardStates", states);
        s.set("chasing", self.chasing());
        s.set("detections", self.detections);
        s.set("health", self.health.current());
        s.set("gameOver", self.game_over);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(PatrolChaseScene::new(tuning.patrol_chase.clone()))
}

impl Scene for PatrolChaseScene {
    fn name(&self) -> &'static str {
        "patrol_chase"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::PLAYER_COLOR);
        textures.rect("guard", GUARD_SIZE as u16, GUARD_SIZE as u16, WHITE);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        let screen = ctx.screen;
        self.bounds = Bounds::new(screen.x, screen.y);
        self.player = Body::new(vec2(screen.x * 0.5, screen.y - 60.0), Vec2::splat(PLAYER_SIZE));

        let loops = [
            (vec2(screen.x * 0.25, screen.y * 0.3), vec2(90.0, 60.0)),
            (vec2(screen.x * 0.75, screen.y * 0.3), vec2(70.0, 90.0)),
            (vec2(screen.x * 0.5, screen.y * 0.55), vec2(160.0, 40.0)),
        ];
        self.guards = loops
            .iter()
            .map(|&(center, half)| {
                let waypoints = loop_around(center, half);
                Guard {
                    body: Body::new(waypoints[0], Vec2::splat(GUARD_SIZE)),
                    brain: PatrolChase::new(waypoints, self.config.ai),
                }
            })
            .collect();

        ctx.signals.emit("scene_created", json!({ "guards": self.guards.len() }));
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }
        if self.game_over {
            return if ctx.input.clicked { SceneCommand::Restart } else { SceneCommand::Continue };
        }

        self.health.tick(delta_time);
        self.player.vel = move_direction(&ctx.input) * self.config.player_speed;
        self.player.integrate(delta_time, &self.bounds);

        let target = self.player.pos;
        let mut touched = false;
        for (i, guard) in self.guards.iter_mut().enumerate() {
            let steer = guard.brain.think(guard.body.pos, target);
            guard.body.vel = steer.velocity;
            guard.body.integrate(delta_time, &self.bounds);

            if let Some(state) = steer.transition {
                if state == AiState::Chase {
                    self.detections += 1;
                }
                ctx.signals.emit(
                    "ai_state_changed",
                    json!({
                        "guard": i,
                        "state": state.label(),
                        "distance": guard.body.pos.distance(target).round(),
                    }),
                );
            }
            touched |= guard.body.overlaps(&self.player);
        }

        if touched && self.health.damage(1) {
            ctx.signals.emit("player_hit", json!({ "health": self.health.current() }));
            if self.health.is_dead() {
                self.game_over = true;
                ctx.signals.mark("game_over");
            }
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        let r = self.config.ai.detect_radius;
        for guard in &self.guards {
            let points = guard.brain.waypoints();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                draw_line(a.x, a.y, b.x, b.y, 1.0, Color::new(1.0, 1.0, 1.0, 0.15));
            }

            let (tint, ring) = match guard.brain.state() {
                AiState::Patrol => (ui::HEALTH_MID, Color::new(1.0, 1.0, 0.3, 0.25)),
                AiState::Chase => (ui::ENEMY_COLOR, Color::new(1.0, 0.2, 0.2, 0.4)),
            };
            draw_circle_lines(guard.body.pos.x, guard.body.pos.y, r, 1.0, ring);
            textures.draw_centered("guard", guard.body.pos, guard.body.size, tint);
        }

        let tint = if self.health.is_invulnerable() { Color::new(1.0, 1.0, 1.0, 0.4) } else { WHITE };
        textures.draw_centered("player", self.player.pos, self.player.size, tint);

        hud::draw_health_bar(16.0, 16.0, 150.0, 14.0, self.health.current(), self.health.max());
        hud::draw_lines(
            16.0,
            42.0,
            &[
                format!("Chasing: {}/{}", self.chasing(), self.guards.len()),
                format!("Detections: {}", self.detections),
            ],
        );
        hud::draw_hint(ctx.screen, "Move: WASD/Arrows   Restart: R   Menu: Esc");
        if self.game_over {
            hud::draw_banner(ctx.screen, "CAUGHT", Some("Click or press R to restart"), ui::HEALTH_CRITICAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    fn scene() -> (PatrolChaseScene, SceneContext) {
        let mut scene = PatrolChaseScene::new(PatrolDemoConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut PatrolChaseScene, ctx: &mut SceneContext, dt: f32) {
        ctx.begin_frame(FrameInput::new(), dt);
        scene.update(ctx, dt);
    }

    #[test]
    fn test_guards_patrol_when_player_far() {
        let (mut scene, mut ctx) = scene();
        scene.player.pos = vec2(790.0, 590.0);
        let start = scene.guards[0].body.pos;
        for _ in 0..10 {
            step(&mut scene, &mut ctx, 0.1);
        }
        assert_eq!(scene.chasing(), 0);
        // Guard 0 walks towards its second waypoint at patrol speed
        let moved = scene.guards[0].body.pos.distance(start);
        assert!((moved - 80.0).abs() < 1.0, "moved {}", moved);
    }

    #[test]
    fn test_guard_detects_and_loses_player() {
        let (mut scene, mut ctx) = scene();
        scene.guards.truncate(1);
        let guard_pos = scene.guards[0].body.pos;

        scene.player.pos = guard_pos + vec2(0.0, 120.0);
        step(&mut scene, &mut ctx, 0.0);
        assert_eq!(scene.guards[0].brain.state(), AiState::Chase);
        assert_eq!(scene.detections, 1);
        assert_eq!(ctx.signals.last_event(), Some("ai_state_changed"));

        scene.player.pos = scene.guards[0].body.pos + vec2(0.0, 200.0);
        step(&mut scene, &mut ctx, 0.0);
        assert_eq!(scene.guards[0].brain.state(), AiState::Chase);

        scene.player.pos = scene.guards[0].body.pos + vec2(0.0, 300.0);
        step(&mut scene, &mut ctx, 0.0);
        assert_eq!(scene.guards[0].brain.state(), AiState::Patrol);
        assert_eq!(ctx.signals.count("ai_state_changed"), 2);
    }

    #[test]
    fn test_contact_damages_with_invulnerability() {
        let (mut scene, mut ctx) = scene();
        scene.guards.truncate(1);
        scene.player.pos = scene.guards[0].body.pos;
        step(&mut scene, &mut ctx, 0.016);
        step(&mut scene, &mut ctx, 0.016);
        assert_eq!(scene.health.current(), 4);
        assert_eq!(ctx.signals.count("player_hit"), 1);
    }

    #[test]
    fn test_config_rejects_inverted_radii() {
        let mut config = PatrolDemoConfig::default();
        config.ai.lose_radius = 100.0;
        assert!(config.validate().is_err());
    }
}
