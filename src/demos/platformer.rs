//! Platformer demo
//!
//! Run and jump across one-way platforms (solid from above, passable from
//! below and the sides). One platform slides back and forth and carries
//! whoever stands on it. Coins add score; dropping through the gap in the
//! ground respawns the player and counts a fall.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::{require_positive, DemoTuning};
use crate::game::{Body, Bounds, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 36.0);
const COIN_RADIUS: f32 = 10.0;
const COIN_SCORE: u32 = 10;
/// Layout below is authored for this size and scaled to the real screen
const DESIGN_SIZE: Vec2 = Vec2::new(800.0, 600.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    /// Downward acceleration in px/s²
    pub gravity: f32,
    /// Upward speed given by a jump
    pub jump_speed: f32,
    pub run_speed: f32,
    pub platform_speed: f32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            jump_speed: 450.0,
            run_speed: 180.0,
            platform_speed: 100.0,
        }
    }
}

impl PlatformerConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("gravity", self.gravity)?;
        require_positive("jump_speed", self.jump_speed)?;
        require_positive("run_speed", self.run_speed)?;
        if !self.platform_speed.is_finite() || self.platform_speed < 0.0 {
            return Err("platform_speed must be >= 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Platform {
    rect: Rect,
    /// Horizontal speed; 0 for static platforms
    speed: f32,
    min_x: f32,
    max_x: f32,
}

impl Platform {
    fn fixed(rect: Rect) -> Self {
        Self { rect, speed: 0.0, min_x: rect.x, max_x: rect.x }
    }

    /// Advance a moving platform, returning how far it moved
    fn advance(&mut self, delta_time: f32) -> f32 {
        if self.speed == 0.0 {
            return 0.0;
        }
        let before = self.rect.x;
        self.rect.x += self.speed * delta_time;
        if self.rect.x <= self.min_x {
            self.rect.x = self.min_x;
            self.speed = self.speed.abs();
        } else if self.rect.x >= self.max_x {
            self.rect.x = self.max_x;
            self.speed = -self.speed.abs();
        }
        self.rect.x - before
    }
}

fn scaled(screen: Vec2, x: f32, y: f32, w: f32, h: f32) -> Rect {
    let s = screen / DESIGN_SIZE;
    Rect::new(x * s.x, y * s.y, w * s.x, h * s.y)
}

pub struct PlatformerScene {
    config: PlatformerConfig,
    screen: Vec2,
    player: Body,
    spawn: Vec2,
    platforms: Vec<Platform>,
    coins: Vec<Vec2>,
    on_ground: bool,
    standing_on: Option<usize>,
    score: u32,
    falls: u32,
    jumps: u32,
}

impl PlatformerScene {
    pub fn new(config: PlatformerConfig) -> Self {
        Self {
            config,
            screen: DESIGN_SIZE,
            player: Body::new(Vec2::ZERO, PLAYER_SIZE).with_world_collision(false),
            spawn: Vec2::ZERO,
            platforms: Vec::new(),
            coins: Vec::new(),
            on_ground: false,
            standing_on: None,
            score: 0,
            falls: 0,
            jumps: 0,
        }
    }

    fn build_level(&mut self) {
        let screen = self.screen;
        let s = screen / DESIGN_SIZE;
        self.platforms = vec![
            Platform::fixed(scaled(screen, 0.0, 560.0, 320.0, 40.0)),
            Platform::fixed(scaled(screen, 460.0, 560.0, 340.0, 40.0)),
            Platform::fixed(scaled(screen, 120.0, 440.0, 140.0, 16.0)),
            Platform::fixed(scaled(screen, 540.0, 420.0, 140.0, 16.0)),
            Platform::fixed(scaled(screen, 320.0, 320.0, 160.0, 16.0)),
            Platform {
                rect: scaled(screen, 100.0, 200.0, 120.0, 16.0),
                speed: self.config.platform_speed,
                min_x: 100.0 * s.x,
                max_x: 560.0 * s.x,
            },
        ];
        // One coin hovering over each raised platform, one over the gap
        self.coins = self.platforms[2..]
            .iter()
            .map(|p| vec2(p.rect.x + p.rect.w * 0.5, p.rect.y - 30.0))
            .chain(std::iter::once(vec2(390.0 * s.x, 480.0 * s.y)))
            .collect();
        self.spawn = vec2(60.0 * s.x, 500.0 * s.y);
    }

    fn respawn(&mut self) {
        self.player.pos = self.spawn;
        self.player.vel = Vec2::ZERO;
        self.on_ground = false;
        self.standing_on = None;
    }

    /// Land on the first platform crossed from above this frame
    fn resolve_landing(&mut self, previous_bottom: f32) {
        self.on_ground = false;
        self.standing_on = None;
        if self.player.vel.y < 0.0 {
            return;
        }
        let half_w = self.player.size.x * 0.5;
        let bottom = self.player.bottom();
        for (i, platform) in self.platforms.iter().enumerate() {
            let r = platform.rect;
            let overlaps_x = self.player.pos.x + half_w > r.x && self.player.pos.x - half_w < r.right();
            if overlaps_x && previous_bottom <= r.y + 0.5 && bottom >= r.y {
                self.player.pos.y = r.y - self.player.size.y * 0.5;
                self.player.vel.y = 0.0;
                self.on_ground = true;
                self.standing_on = Some(i);
                return;
            }
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("score", self.score);
        s.set("coinsLeft", self.coins.len());
        s.set("falls", self.falls);
        s.set("jumps", self.jumps);
        s.set("onGround", self.on_ground);
        s.set("x", self.player.pos.x.round());
        s.set("y", self.player.pos.y.round());
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(PlatformerScene::new(tuning.platformer.clone()))
}

impl Scene for PlatformerScene {
    fn name(&self) -> &'static str {
        "platformer"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE.x as u16, PLAYER_SIZE.y as u16, ui::PLAYER_COLOR);
        textures.circle("coin", COIN_RADIUS as u16, ui::COIN_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.screen = ctx.screen;
        self.build_level();
        self.respawn();
        ctx.signals.emit(
            "scene_created",
            json!({ "platforms": self.platforms.len(), "coins": self.coins.len() }),
        );
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        let moved: Vec<f32> = self.platforms.iter_mut().map(|p| p.advance(delta_time)).collect();
        if let Some(i) = self.standing_on {
            self.player.pos.x += moved[i];
        }

        self.player.vel.x = ctx.input.move_axis().x.clamp(-1.0, 1.0) * self.config.run_speed;
        let jump = ctx.input.is_pressed(Action::Primary) || ctx.input.is_pressed(Action::Up);
        if jump && self.on_ground {
            self.player.vel.y = -self.config.jump_speed;
            self.jumps += 1;
            ctx.signals.emit("jump", json!({ "x": self.player.pos.x.round(), "jumps": self.jumps }));
        }

        self.player.vel.y += self.config.gravity * delta_time;
        let previous_bottom = self.player.bottom();
        self.player.integrate(delta_time, &Bounds::new(self.screen.x, self.screen.y));
        let half_w = self.player.size.x * 0.5;
        self.player.pos.x = self.player.pos.x.clamp(half_w, self.screen.x - half_w);

        let was_grounded = self.on_ground;
        self.resolve_landing(previous_bottom);
        if self.on_ground && !was_grounded {
            ctx.signals.emit("landed", json!({ "platform": self.standing_on }));
        }

        let player_rect = self.player.rect();
        let before = self.coins.len();
        self.coins.retain(|c| {
            !player_rect.overlaps(&Rect::new(c.x - COIN_RADIUS, c.y - COIN_RADIUS, COIN_RADIUS * 2.0, COIN_RADIUS * 2.0))
        });
        let collected = (before - self.coins.len()) as u32;
        if collected > 0 {
            self.score += collected * COIN_SCORE;
            ctx.signals.emit("coin_collected", json!({ "score": self.score, "left": self.coins.len() }));
            if self.coins.is_empty() {
                ctx.signals.mark("all_coins_collected");
            }
        }

        if self.player.top() > self.screen.y {
            self.falls += 1;
            ctx.signals.emit("player_fell", json!({ "falls": self.falls }));
            self.respawn();
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        for p in &self.platforms {
            let color = if p.speed != 0.0 { ui::ACCENT_COLOR } else { ui::PLATFORM_COLOR };
            draw_rectangle(p.rect.x, p.rect.y, p.rect.w, p.rect.h, color);
        }
        for coin in &self.coins {
            textures.draw_centered("coin", *coin, Vec2::splat(COIN_RADIUS * 2.0), WHITE);
        }
        textures.draw_centered("player", self.player.pos, self.player.size, WHITE);

        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Score: {}", self.score),
                format!("Coins left: {}", self.coins.len()),
                format!("Falls: {}", self.falls),
            ],
        );
        if self.coins.is_empty() {
            hud::draw_banner(ctx.screen, "ALL COINS!", Some("Press R to play again"), ui::COIN_COLOR);
        }
        hud::draw_hint(ctx.screen, "Run: A/D or Left/Right   Jump: Space/Up   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    fn scene() -> (PlatformerScene, SceneContext) {
        let mut scene = PlatformerScene::new(PlatformerConfig::default());
        let mut ctx = SceneContext::new(DESIGN_SIZE, false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut PlatformerScene, ctx: &mut SceneContext, input: FrameInput, dt: f32) {
        ctx.begin_frame(input, dt);
        scene.update(ctx, dt);
    }

    fn settle(scene: &mut PlatformerScene, ctx: &mut SceneContext) {
        for _ in 0..120 {
            step(scene, ctx, FrameInput::new(), 1.0 / 60.0);
        }
    }

    #[test]
    fn test_player_lands_on_ground() {
        let (mut scene, mut ctx) = scene();
        settle(&mut scene, &mut ctx);
        assert!(scene.on_ground);
        assert_eq!(scene.standing_on, Some(0));
        assert!((scene.player.bottom() - 560.0).abs() < 1e-3);
        assert_eq!(ctx.signals.count("landed"), 1);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut scene, mut ctx) = scene();
        settle(&mut scene, &mut ctx);
        let jump = FrameInput::new().press(Action::Primary);
        step(&mut scene, &mut ctx, jump.clone(), 1.0 / 60.0);
        assert!(!scene.on_ground);
        assert!(scene.player.vel.y < 0.0);

        step(&mut scene, &mut ctx, jump, 1.0 / 60.0);
        assert_eq!(scene.jumps, 1, "no double jump");

        settle(&mut scene, &mut ctx);
        assert!(scene.on_ground);
    }

    #[test]
    fn test_moving_platform_carries_player() {
        let (mut scene, mut ctx) = scene();
        let mover = scene.platforms.len() - 1;
        let r = scene.platforms[mover].rect;
        scene.player.pos = vec2(r.x + r.w * 0.5, r.y - PLAYER_SIZE.y * 0.5);
        scene.player.vel = Vec2::ZERO;
        step(&mut scene, &mut ctx, FrameInput::new(), 1.0 / 60.0);
        assert_eq!(scene.standing_on, Some(mover));

        let offset = scene.player.pos.x - scene.platforms[mover].rect.x;
        for _ in 0..30 {
            step(&mut scene, &mut ctx, FrameInput::new(), 1.0 / 60.0);
        }
        assert_eq!(scene.standing_on, Some(mover));
        let new_offset = scene.player.pos.x - scene.platforms[mover].rect.x;
        assert!((new_offset - offset).abs() < 1e-2);
    }

    #[test]
    fn test_falling_through_gap_respawns() {
        let (mut scene, mut ctx) = scene();
        scene.player.pos = vec2(390.0, 520.0);
        scene.coins.clear();
        for _ in 0..60 {
            step(&mut scene, &mut ctx, FrameInput::new(), 1.0 / 60.0);
        }
        assert_eq!(scene.falls, 1);
        assert_eq!(ctx.signals.count("player_fell"), 1);
    }

    #[test]
    fn test_coin_collection_scores() {
        let (mut scene, mut ctx) = scene();
        let total = scene.coins.len();
        scene.player.pos = scene.coins[0];
        step(&mut scene, &mut ctx, FrameInput::new(), 1.0 / 60.0);
        assert_eq!(scene.score, COIN_SCORE);
        assert_eq!(scene.coins.len(), total - 1);
    }
}
