//! Endless wave demo
//!
//! Enemies walk in from the screen edges towards the player in the middle.
//! Click an enemy to destroy it. Wave `n` has `base + n` enemies moving
//! `growth` faster per wave; once every enemy of a wave has been dealt with
//! (killed or reached the player) the next wave starts after a short pause.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::{require_positive, DemoTuning};
use crate::game::ai::towards;
use crate::game::{
    Body, Bounds, EmitterDef, Health, Lcg, ParticlePool, Scene, SceneCommand, SceneContext, TextureCache,
    ThresholdCounter, Timers,
};
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 36.0;
const ENEMY_SIZE: f32 = 28.0;
/// Clicks this close to an enemy still count as a hit
const CLICK_SLOP: f32 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Wave n has base_enemies + n enemies
    pub base_enemies: u32,
    /// Enemy speed in wave 1
    pub base_speed: f32,
    /// Speed multiplier added per wave after the first
    pub speed_growth: f32,
    /// Pause between waves
    pub wave_delay: f32,
    /// Seconds between enemy spawns within a wave
    pub spawn_interval: f32,
    pub player_health: i32,
    pub seed: Option<u32>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemies: 2,
            base_speed: 60.0,
            speed_growth: 0.15,
            wave_delay: 2.0,
            spawn_interval: 0.5,
            player_health: 5,
            seed: None,
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("base_speed", self.base_speed)?;
        require_positive("spawn_interval", self.spawn_interval)?;
        if !self.speed_growth.is_finite() || self.speed_growth < 0.0 {
            return Err("speed_growth must be >= 0".to_string());
        }
        if !self.wave_delay.is_finite() || self.wave_delay < 0.0 {
            return Err("wave_delay must be >= 0".to_string());
        }
        if self.player_health < 1 {
            return Err("player_health must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn wave_size(&self, wave: u32) -> u32 {
        self.base_enemies + wave
    }

    pub fn wave_speed(&self, wave: u32) -> f32 {
        self.base_speed * (1.0 + wave.saturating_sub(1) as f32 * self.speed_growth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaveEvent {
    Spawn,
    StartWave,
}

pub struct EndlessWaveScene {
    config: WaveConfig,
    screen: Vec2,
    rng: Lcg,
    player: Body,
    health: Health,
    enemies: Vec<Body>,
    timers: Timers<WaveEvent>,
    wave: u32,
    spawned: u32,
    /// Enemies of the current wave that were killed or got through
    resolved: ThresholdCounter,
    kills: u32,
    game_over: bool,
    between_waves: bool,
    particles: ParticlePool,
}

impl EndlessWaveScene {
    pub fn new(config: WaveConfig) -> Self {
        let health = Health::new(config.player_health);
        Self {
            config,
            screen: vec2(800.0, 600.0),
            rng: Lcg::new(0),
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            health,
            enemies: Vec::new(),
            timers: Timers::new(),
            wave: 0,
            spawned: 0,
            resolved: ThresholdCounter::new(1),
            kills: 0,
            game_over: false,
            between_waves: true,
            particles: ParticlePool::new(),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    fn start_wave(&mut self, ctx: &mut SceneContext) {
        self.wave += 1;
        self.spawned = 0;
        self.between_waves = false;
        let size = self.config.wave_size(self.wave);
        self.resolved.rearm(size);
        self.timers.after(0.0, WaveEvent::Spawn);
        ctx.signals.emit(
            "wave_started",
            json!({
                "wave": self.wave,
                "enemies": size,
                "speed": self.config.wave_speed(self.wave),
            }),
        );
    }

    /// A point just outside a random screen edge
    fn edge_point(&mut self) -> Vec2 {
        let t = self.rng.next_f32();
        let m = ENEMY_SIZE;
        match self.rng.index(4) {
            0 => vec2(t * self.screen.x, m * 0.5),
            1 => vec2(self.screen.x - m * 0.5, t * self.screen.y),
            2 => vec2(t * self.screen.x, self.screen.y - m * 0.5),
            _ => vec2(m * 0.5, t * self.screen.y),
        }
    }

    fn spawn_enemy(&mut self) {
        let pos = self.edge_point();
        self.enemies.push(Body::new(pos, Vec2::splat(ENEMY_SIZE)));
        self.spawned += 1;
        if self.spawned < self.config.wave_size(self.wave) {
            self.timers.after(self.config.spawn_interval, WaveEvent::Spawn);
        }
    }

    /// Count one enemy of the wave as dealt with
    fn resolve_enemy(&mut self, ctx: &mut SceneContext) {
        if self.resolved.increment() {
            self.between_waves = true;
            self.timers.after(self.config.wave_delay, WaveEvent::StartWave);
            ctx.signals.emit("wave_cleared", json!({ "wave": self.wave, "kills": self.kills }));
        }
    }

    fn handle(&mut self, ctx: &mut SceneContext, event: WaveEvent) {
        match event {
            WaveEvent::Spawn => self.spawn_enemy(),
            WaveEvent::StartWave => self.start_wave(ctx),
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("wave", self.wave);
        s.set("enemiesAlive", self.enemies.len());
        s.set("kills", self.kills);
        s.set("health", self.health.current());
        s.set("gameOver", self.game_over);
        s.set("betweenWaves", self.between_waves);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(EndlessWaveScene::new(tuning.endless_wave.clone()))
}

impl Scene for EndlessWaveScene {
    fn name(&self) -> &'static str {
        "endless_wave"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.circle("player", (PLAYER_SIZE * 0.5) as u16, ui::PLAYER_COLOR);
        textures.outlined_rect("enemy", ENEMY_SIZE as u16, ENEMY_SIZE as u16, ui::ENEMY_COLOR, BLACK);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.screen = ctx.screen;
        self.rng = Lcg::new(self.config.seed.unwrap_or_else(macroquad::rand::rand));
        self.player = Body::new(ctx.screen * 0.5, Vec2::splat(PLAYER_SIZE));
        self.start_wave(ctx);
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

        for event in self.timers.tick(delta_time) {
            self.handle(ctx, event);
        }

        if ctx.input.clicked {
            let mouse = ctx.input.mouse;
            let hit = self.enemies.iter().position(|e| {
                let r = e.rect();
                Rect::new(r.x - CLICK_SLOP, r.y - CLICK_SLOP, r.w + CLICK_SLOP * 2.0, r.h + CLICK_SLOP * 2.0)
                    .contains(mouse)
            });
            if let Some(i) = hit {
                let enemy = self.enemies.swap_remove(i);
                self.kills += 1;
                self.particles.spawn_burst(&EmitterDef::sparks(), enemy.pos, 16);
                ctx.signals.emit("enemy_killed", json!({ "wave": self.wave, "kills": self.kills }));
                self.resolve_enemy(ctx);
            }
        }

        let speed = self.config.wave_speed(self.wave);
        let bounds = Bounds::new(self.screen.x, self.screen.y);
        let target = self.player.pos;
        for enemy in &mut self.enemies {
            enemy.vel = towards(enemy.pos, target, speed);
            enemy.integrate(delta_time, &bounds);
        }

        let player = self.player;
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.overlaps(&player));
        for _ in self.enemies.len()..before {
            self.health.damage(1);
            ctx.signals.emit("player_hit", json!({ "health": self.health.current() }));
            self.resolve_enemy(ctx);
        }

        if self.health.is_dead() {
            self.game_over = true;
            self.timers.clear();
            ctx.signals.emit("game_over", json!({ "wave": self.wave, "kills": self.kills }));
        }

        self.particles.update(delta_time);
        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        textures.draw_centered("player", self.player.pos, self.player.size, WHITE);
        for enemy in &self.enemies {
            textures.draw_centered("enemy", enemy.pos, enemy.size, WHITE);
        }
        self.particles.draw(Vec2::ZERO);

        hud::draw_health_bar(16.0, 16.0, 150.0, 14.0, self.health.current(), self.health.max());
        hud::draw_lines(
            16.0,
            42.0,
            &[
                format!("Wave: {}", self.wave),
                format!("Kills: {}", self.kills),
                format!("Enemies: {}", self.enemies.len()),
            ],
        );
        if self.game_over {
            let sub = format!("Reached wave {} - click or R to restart", self.wave);
            hud::draw_banner(ctx.screen, "GAME OVER", Some(&sub), ui::HEALTH_CRITICAL);
        } else if self.between_waves {
            let next = format!("WAVE {} CLEARED", self.wave);
            hud::draw_banner(ctx.screen, &next, Some("Next wave incoming..."), ui::GOAL_COLOR);
        }
        hud::draw_hint(ctx.screen, "Click enemies to destroy them   Restart: R   Menu: Esc");
    }
}
