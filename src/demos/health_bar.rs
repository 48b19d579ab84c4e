//! Health bar demo
//!
//! Move among bouncing enemies. Every touch costs one point of health,
//! knocks the player back and starts a short invulnerability window (the
//! player blinks). H heals one point. At zero health the enemies freeze
//! until a click or R restarts.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{move_direction, standard_command};
use crate::config::{require_positive, DemoTuning};
use crate::game::{Body, Bounds, Health, Lcg, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 32.0;
const ENEMY_RADIUS: u16 = 14;
/// Knockback velocity lost per second (fraction)
const KNOCKBACK_DAMPING: f32 = 6.0;
/// Blink toggles per second while invulnerable
const BLINK_RATE: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthBarConfig {
    pub max_health: i32,
    /// Seconds of immunity after a hit
    pub invulnerability: f32,
    pub player_speed: f32,
    pub knockback: f32,
    pub enemy_count: usize,
    /// Enemy velocity components are drawn from `-max..max`
    pub enemy_speed_max: f32,
    /// Fixed seed for enemy placement; random each run when None
    pub seed: Option<u32>,
}

impl Default for HealthBarConfig {
    fn default() -> Self {
        Self {
            max_health: 12,
            invulnerability: 0.5,
            player_speed: 200.0,
            knockback: 300.0,
            enemy_count: 3,
            enemy_speed_max: 150.0,
            seed: None,
        }
    }
}

impl HealthBarConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=100).contains(&self.max_health) {
            return Err(format!("max_health must be 1..=100, got {}", self.max_health));
        }
        if !self.invulnerability.is_finite() || self.invulnerability < 0.0 {
            return Err("invulnerability must be >= 0".to_string());
        }
        if self.enemy_count > 32 {
            return Err(format!("enemy_count must be <= 32, got {}", self.enemy_count));
        }
        require_positive("player_speed", self.player_speed)?;
        require_positive("knockback", self.knockback)?;
        require_positive("enemy_speed_max", self.enemy_speed_max)
    }
}

pub struct HealthBarScene {
    config: HealthBarConfig,
    bounds: Bounds,
    player: Body,
    knockback: Vec2,
    enemies: Vec<Body>,
    health: Health,
    game_over: bool,
    hits: u32,
}

impl HealthBarScene {
    pub fn new(config: HealthBarConfig) -> Self {
        let health = Health::new(config.max_health).with_invulnerability(config.invulnerability);
        Self {
            config,
            bounds: Bounds::new(800.0, 600.0),
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            knockback: Vec2::ZERO,
            enemies: Vec::new(),
            health,
            game_over: false,
            hits: 0,
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("health", self.health.current());
        s.set("maxHealth", self.health.max());
        s.set("isInvincible", self.health.is_invulnerable());
        s.set("gameOver", self.game_over);
        s.set("hits", self.hits);
    }

    fn take_hit(&mut self, ctx: &mut SceneContext, from: Vec2) {
        if !self.health.damage(1) {
            return;
        }
        self.hits += 1;
        let away = (self.player.pos - from).try_normalize().unwrap_or(Vec2::NEG_Y);
        self.knockback = away * self.config.knockback;
        ctx.signals.emit(
            "player_hit",
            json!({ "health": self.health.current(), "maxHealth": self.health.max() }),
        );

        if self.health.is_dead() {
            self.game_over = true;
            for enemy in &mut self.enemies {
                enemy.vel = Vec2::ZERO;
            }
            ctx.signals.emit("game_over", json!({ "hits": self.hits }));
        }
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(HealthBarScene::new(tuning.health_bar.clone()))
}

impl Scene for HealthBarScene {
    fn name(&self) -> &'static str {
        "health_bar"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::PLAYER_COLOR);
        textures.circle("enemy", ENEMY_RADIUS, ui::ENEMY_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.bounds = Bounds::new(ctx.screen.x, ctx.screen.y);
        self.player = Body::new(self.bounds.center(), Vec2::splat(PLAYER_SIZE));

        let seed = self.config.seed.unwrap_or_else(macroquad::rand::rand);
        let mut rng = Lcg::new(seed);
        let speed = self.config.enemy_speed_max;
        let enemy_size = Vec2::splat(ENEMY_RADIUS as f32 * 2.0);
        // Spawn in the top band so nothing overlaps the player on frame one
        self.enemies = (0..self.config.enemy_count)
            .map(|_| {
                let pos = vec2(
                    rng.range_f32(40.0, ctx.screen.x - 40.0),
                    rng.range_f32(40.0, ctx.screen.y * 0.3),
                );
                let vel = vec2(rng.range_f32(-speed, speed), rng.range_f32(-speed, speed));
                Body::new(pos, enemy_size).with_velocity(vel).with_bounce(1.0)
            })
            .collect();

        ctx.signals.emit("scene_created", json!({ "seed": seed, "enemies": self.enemies.len() }));
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        if self.game_over {
            if ctx.input.clicked {
                return SceneCommand::Restart;
            }
            return SceneCommand::Continue;
        }

        self.health.tick(delta_time);

        if ctx.input.is_pressed(Action::Special) && self.health.current() < self.health.max() {
            self.health.heal(1);
            ctx.signals.emit("player_healed", json!({ "health": self.health.current() }));
        }

        self.player.vel = move_direction(&ctx.input) * self.config.player_speed + self.knockback;
        self.knockback *= (1.0 - KNOCKBACK_DAMPING * delta_time).max(0.0);
        self.player.integrate(delta_time, &self.bounds);

        for enemy in &mut self.enemies {
            enemy.integrate(delta_time, &self.bounds);
        }

        let contact = self
            .enemies
            .iter()
            .find(|e| e.overlaps(&self.player))
            .map(|e| e.pos);
        if let Some(from) = contact {
            self.take_hit(ctx, from);
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        for enemy in &self.enemies {
            textures.draw_centered("enemy", enemy.pos, enemy.size, WHITE);
        }

        let blink_off = self.health.is_invulnerable() && (ctx.time * BLINK_RATE) as i64 % 2 == 0;
        let tint = if blink_off { Color::new(1.0, 1.0, 1.0, 0.25) } else { WHITE };
        textures.draw_centered("player", self.player.pos, self.player.size, tint);

        hud::draw_health_bar(16.0, 16.0, 240.0, 18.0, self.health.current(), self.health.max());
        hud::draw_lines(
            16.0,
            44.0,
            &[
                format!("HP: {}/{}", self.health.current(), self.health.max()),
                format!("Hits taken: {}", self.hits),
            ],
        );
        hud::draw_hint(ctx.screen, "Move: WASD/Arrows   Heal: H   Restart: R   Menu: Esc");

        if self.game_over {
            hud::draw_banner(ctx.screen, "GAME OVER", Some("Click or press R to restart"), ui::HEALTH_CRITICAL);
        }
    }
}
