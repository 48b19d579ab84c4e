//! Seeded obstacle layout demo
//!
//! The obstacle field comes entirely from an `Lcg` seed, so a seed always
//! produces the same layout. R rebuilds the field from the current seed
//! (identical result), N moves on to the next seed. The layout checksum is
//! published so two runs can be compared.
//!
//! Layouts live in a fixed 800x600 world and are only scaled when drawn,
//! so the window size never changes what a seed produces.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{move_direction, standard_command};
use crate::config::{require_positive, DemoTuning};
use crate::game::{Body, Bounds, Lcg, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 24.0;
/// Logical world every layout is generated in
pub const WORLD_SIZE: Vec2 = Vec2::new(800.0, 600.0);
/// Obstacles snap to this grid so layouts are integer exact
const GRID: i32 = 20;
/// Free space kept around the spawn point
const SPAWN_CLEARANCE: f32 = 80.0;
/// Placement attempts per obstacle before giving up on it
const MAX_ATTEMPTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeededObstaclesConfig {
    pub seed: u32,
    pub count: usize,
    pub player_speed: f32,
}

impl Default for SeededObstaclesConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            count: 12,
            player_speed: 200.0,
        }
    }
}

impl SeededObstaclesConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.count > 64 {
            return Err(format!("count must be <= 64, got {}", self.count));
        }
        require_positive("player_speed", self.player_speed)
    }
}

/// Where the player starts, in world space
pub fn spawn_point() -> Vec2 {
    vec2(60.0, WORLD_SIZE.y - 60.0)
}

/// Lay out up to `count` grid-aligned obstacles for `seed`, in world space.
/// Obstacles never cover the spawn area.
pub fn generate_layout(seed: u32, count: usize) -> Vec<Rect> {
    let mut rng = Lcg::new(seed);
    let spawn = spawn_point();
    let keep_clear = Rect::new(
        spawn.x - SPAWN_CLEARANCE,
        spawn.y - SPAWN_CLEARANCE,
        SPAWN_CLEARANCE * 2.0,
        SPAWN_CLEARANCE * 2.0,
    );
    let cols = WORLD_SIZE.x as i32 / GRID;
    let rows = WORLD_SIZE.y as i32 / GRID;

    let mut obstacles = Vec::with_capacity(count);
    for _ in 0..count {
        for _ in 0..MAX_ATTEMPTS {
            let w = rng.range_i32(2, 5) * GRID;
            let h = rng.range_i32(2, 5) * GRID;
            let x = rng.range_i32(1, cols - 6) * GRID;
            let y = rng.range_i32(3, rows - 6) * GRID;
            let rect = Rect::new(x as f32, y as f32, w as f32, h as f32);
            if !rect.overlaps(&keep_clear) {
                obstacles.push(rect);
                break;
            }
        }
    }
    obstacles
}

/// Order-sensitive hash of a layout
pub fn layout_checksum(obstacles: &[Rect]) -> u32 {
    obstacles.iter().fold(17u32, |acc, r| {
        [r.x, r.y, r.w, r.h]
            .iter()
            .fold(acc, |a, v| a.wrapping_mul(31).wrapping_add(*v as u32))
    })
}

pub struct SeededObstaclesScene {
    config: SeededObstaclesConfig,
    seed: u32,
    /// World to screen scale, set in `create`
    scale: Vec2,
    player: Body,
    obstacles: Vec<Rect>,
    checksum: u32,
    generations: u32,
    bumps: u32,
    touching: bool,
}

impl SeededObstaclesScene {
    pub fn new(config: SeededObstaclesConfig) -> Self {
        Self {
            seed: config.seed,
            config,
            scale: Vec2::ONE,
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            obstacles: Vec::new(),
            checksum: 0,
            generations: 0,
            bumps: 0,
            touching: false,
        }
    }

    fn regenerate(&mut self, ctx: &mut SceneContext) {
        self.obstacles = generate_layout(self.seed, self.config.count);
        self.checksum = layout_checksum(&self.obstacles);
        self.generations += 1;
        self.player = Body::new(spawn_point(), Vec2::splat(PLAYER_SIZE));
        ctx.signals.emit(
            "layout_generated",
            json!({
                "seed": self.seed,
                "obstacles": self.obstacles.len(),
                "checksum": self.checksum,
            }),
        );
        log::debug!("seed {} -> {} obstacles, checksum {:08x}", self.seed, self.obstacles.len(), self.checksum);
    }

    fn blocked(&self) -> bool {
        let rect = self.player.rect();
        self.obstacles.iter().any(|o| o.overlaps(&rect))
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("seed", self.seed);
        s.set("obstacleCount", self.obstacles.len());
        s.set("checksum", self.checksum);
        s.set("generations", self.generations);
        s.set("bumps", self.bumps);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(SeededObstaclesScene::new(tuning.seeded_obstacles.clone()))
}

impl Scene for SeededObstaclesScene {
    fn name(&self) -> &'static str {
        "seeded_obstacles"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::PLAYER_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.scale = ctx.screen / WORLD_SIZE;
        self.regenerate(ctx);
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        // R keeps the current seed instead of restarting from the configured one
        if ctx.input.is_pressed(Action::Restart) {
            self.regenerate(ctx);
        } else {
            let command = standard_command(&ctx.input);
            if command != SceneCommand::Continue {
                return command;
            }
        }

        if ctx.input.is_pressed(Action::Special) {
            self.seed = self.seed.wrapping_add(1);
            self.regenerate(ctx);
        }

        // Move one axis at a time so the player slides along obstacle edges
        let bounds = Bounds::new(WORLD_SIZE.x, WORLD_SIZE.y);
        let velocity = move_direction(&ctx.input) * self.config.player_speed;
        let mut hit = false;
        for axis in [Vec2::X, Vec2::Y] {
            let previous = self.player.pos;
            self.player.vel = velocity * axis;
            self.player.integrate(delta_time, &bounds);
            if self.blocked() {
                self.player.pos = previous;
                hit = true;
            }
        }
        if hit && !self.touching {
            self.bumps += 1;
        }
        self.touching = hit;

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        let s = self.scale;
        for o in &self.obstacles {
            let (x, y, w, h) = (o.x * s.x, o.y * s.y, o.w * s.x, o.h * s.y);
            draw_rectangle(x, y, w, h, ui::WALL_COLOR);
            draw_rectangle_lines(x, y, w, h, 2.0, ui::HEADER_COLOR);
        }
        textures.draw_centered("player", self.player.pos * s, self.player.size * s, WHITE);

        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Seed: {}", self.seed),
                format!("Obstacles: {}   Checksum: {:08x}", self.obstacles.len(), self.checksum),
                format!("Bumps: {}", self.bumps),
            ],
        );
        hud::draw_hint(ctx.screen, "Move: WASD/Arrows   Same seed: R   Next seed: N   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn created(screen: Vec2) -> (SeededObstaclesScene, SceneContext) {
        let mut scene = SeededObstaclesScene::new(SeededObstaclesConfig::default());
        let mut ctx = SceneContext::new(screen, false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate_layout(12345, 12);
        let b = generate_layout(12345, 12);
        assert_eq!(a, b);
        assert_eq!(layout_checksum(&a), layout_checksum(&b));
        assert!(!a.is_empty());
    }

    #[test]
    fn test_different_seed_different_layout() {
        let a = generate_layout(12345, 12);
        let b = generate_layout(12346, 12);
        assert_ne!(layout_checksum(&a), layout_checksum(&b));
    }

    #[test]
    fn test_layout_keeps_spawn_clear_and_in_world() {
        let spawn = spawn_point();
        for seed in [1, 2, 3, 12345, 99999] {
            for r in generate_layout(seed, 12) {
                assert!(!r.contains(spawn));
                assert!(r.x >= 0.0 && r.right() <= WORLD_SIZE.x);
                assert!(r.y >= 0.0 && r.bottom() <= WORLD_SIZE.y);
                assert_eq!(r.x as i32 % GRID, 0);
            }
        }
    }

    #[test]
    fn test_window_size_does_not_change_layout() {
        let (small, small_ctx) = created(SCREEN);
        let (large, large_ctx) = created(vec2(1024.0, 768.0));
        let (wide, _) = created(vec2(1920.0, 600.0));
        assert_eq!(small.obstacles, large.obstacles);
        assert_eq!(small.checksum, large.checksum);
        assert_eq!(small.checksum, wide.checksum);
        assert_eq!(small.player.pos, large.player.pos);
        assert_eq!(small_ctx.signals.get_i64("checksum"), large_ctx.signals.get_i64("checksum"));
    }

    #[test]
    fn test_restart_key_regenerates_identically() {
        let (mut scene, mut ctx) = created(SCREEN);
        let first = scene.checksum;

        ctx.begin_frame(FrameInput::new().press(Action::Restart), 0.016);
        let cmd = scene.update(&mut ctx, 0.016);
        assert_eq!(cmd, SceneCommand::Continue);
        assert_eq!(scene.checksum, first);
        assert_eq!(scene.generations, 2);

        ctx.begin_frame(FrameInput::new().press(Action::Special), 0.016);
        scene.update(&mut ctx, 0.016);
        assert_eq!(scene.seed, 12346);
        assert_ne!(scene.checksum, first);

        // R now keeps the new seed
        let second = scene.checksum;
        ctx.begin_frame(FrameInput::new().press(Action::Restart), 0.016);
        scene.update(&mut ctx, 0.016);
        assert_eq!(scene.checksum, second);
        assert_eq!(ctx.signals.count("layout_generated"), 4);
    }

    #[test]
    fn test_player_cannot_enter_obstacle() {
        let (mut scene, mut ctx) = created(SCREEN);
        scene.obstacles = vec![Rect::new(100.0, 500.0, 40.0, 80.0)];
        for _ in 0..60 {
            ctx.begin_frame(FrameInput::new().hold(Action::Right), 1.0 / 60.0);
            scene.update(&mut ctx, 1.0 / 60.0);
        }
        assert!(scene.player.rect().right() <= 100.0);
        assert_eq!(scene.bumps, 1);
    }
}
