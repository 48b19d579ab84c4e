//! Seeded maze demo
//!
//! A recursive backtracker carves a perfect maze out of a grid, driven by an
//! `Lcg` so the same seed always gives the same maze. The player steps one
//! cell per key press and wins on reaching the bottom-right exit.

use std::collections::VecDeque;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::DemoTuning;
use crate::game::{Lcg, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

/// Wall bits per cell
pub const WALL_N: u8 = 1;
pub const WALL_E: u8 = 2;
pub const WALL_S: u8 = 4;
pub const WALL_W: u8 = 8;
const ALL_WALLS: u8 = WALL_N | WALL_E | WALL_S | WALL_W;

/// Space kept around the maze for the HUD
const MARGIN: f32 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub seed: u32,
    pub cols: usize,
    pub rows: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            cols: 15,
            rows: 11,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(2..=60).contains(&self.cols) || !(2..=60).contains(&self.rows) {
            return Err(format!("cols and rows must be within 2..=60, got {}x{}", self.cols, self.rows));
        }
        Ok(())
    }
}

/// Grid step with the wall bit it crosses and the opposite bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    North,
    East,
    South,
    West,
}

impl Step {
    const ALL: [Step; 4] = [Step::North, Step::East, Step::South, Step::West];

    fn wall(self) -> u8 {
        match self {
            Step::North => WALL_N,
            Step::East => WALL_E,
            Step::South => WALL_S,
            Step::West => WALL_W,
        }
    }

    fn opposite(self) -> u8 {
        match self {
            Step::North => WALL_S,
            Step::East => WALL_W,
            Step::South => WALL_N,
            Step::West => WALL_E,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Step::North => (0, -1),
            Step::East => (1, 0),
            Step::South => (0, 1),
            Step::West => (-1, 0),
        }
    }

    fn from_input(input: &crate::input::FrameInput) -> Option<Step> {
        if input.is_pressed(Action::Up) {
            Some(Step::North)
        } else if input.is_pressed(Action::Right) {
            Some(Step::East)
        } else if input.is_pressed(Action::Down) {
            Some(Step::South)
        } else if input.is_pressed(Action::Left) {
            Some(Step::West)
        } else {
            None
        }
    }
}

/// Grid of cells, each holding the walls still standing around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cols: usize,
    rows: usize,
    walls: Vec<u8>,
}

impl Maze {
    /// Carve a maze with an explicit-stack depth first search from (0, 0)
    pub fn generate(seed: u32, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut maze = Self {
            cols,
            rows,
            walls: vec![ALL_WALLS; cols * rows],
        };
        let mut rng = Lcg::new(seed);
        let mut visited = vec![false; cols * rows];
        let mut stack = vec![(0usize, 0usize)];
        visited[0] = true;

        while let Some(&(col, row)) = stack.last() {
            let options: Vec<(Step, usize, usize)> = Step::ALL
                .iter()
                .filter_map(|&step| {
                    let (c, r) = maze.neighbour(col, row, step)?;
                    (!visited[maze.index(c, r)]).then_some((step, c, r))
                })
                .collect();

            match rng.pick(&options) {
                Some(&(step, c, r)) => {
                    let here = maze.index(col, row);
                    let there = maze.index(c, r);
                    maze.walls[here] &= !step.wall();
                    maze.walls[there] &= !step.opposite();
                    visited[there] = true;
                    stack.push((c, r));
                }
                None => {
                    stack.pop();
                }
            }
        }
        maze
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn exit(&self) -> (usize, usize) {
        (self.cols - 1, self.rows - 1)
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn walls_at(&self, col: usize, row: usize) -> u8 {
        self.walls.get(self.index(col, row)).copied().unwrap_or(ALL_WALLS)
    }

    fn neighbour(&self, col: usize, row: usize, step: Step) -> Option<(usize, usize)> {
        let (dx, dy) = step.delta();
        let c = col as i32 + dx;
        let r = row as i32 + dy;
        if c < 0 || r < 0 || c >= self.cols as i32 || r >= self.rows as i32 {
            return None;
        }
        Some((c as usize, r as usize))
    }

    /// Cell reached by stepping from (col, row), if no wall is in the way
    pub fn step(&self, col: usize, row: usize, step: Step) -> Option<(usize, usize)> {
        if self.walls_at(col, row) & step.wall() != 0 {
            return None;
        }
        self.neighbour(col, row, step)
    }

    /// Number of cells reachable from the start
    pub fn reachable_cells(&self) -> usize {
        let mut seen = vec![false; self.cols * self.rows];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        seen[0] = true;
        let mut count = 0;
        while let Some((col, row)) = queue.pop_front() {
            count += 1;
            for step in Step::ALL {
                if let Some((c, r)) = self.step(col, row, step) {
                    let i = self.index(c, r);
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back((c, r));
                    }
                }
            }
        }
        count
    }

    /// Order-sensitive hash of the wall layout
    pub fn checksum(&self) -> u32 {
        self.walls
            .iter()
            .fold(17u32, |acc, w| acc.wrapping_mul(31).wrapping_add(*w as u32))
    }
}

pub struct MazeScene {
    config: MazeConfig,
    seed: u32,
    maze: Maze,
    player: (usize, usize),
    moves: u32,
    blocked_moves: u32,
    solved: bool,
    /// Cell size and top-left corner of the maze on screen
    cell: f32,
    origin: Vec2,
}

impl MazeScene {
    pub fn new(config: MazeConfig) -> Self {
        let maze = Maze::generate(config.seed, config.cols, config.rows);
        Self {
            seed: config.seed,
            config,
            maze,
            player: (0, 0),
            moves: 0,
            blocked_moves: 0,
            solved: false,
            cell: 32.0,
            origin: Vec2::ZERO,
        }
    }

    fn regenerate(&mut self, ctx: &mut SceneContext) {
        self.maze = Maze::generate(self.seed, self.config.cols, self.config.rows);
        self.player = (0, 0);
        self.moves = 0;
        self.blocked_moves = 0;
        self.solved = false;
        ctx.signals.emit(
            "maze_generated",
            json!({
                "seed": self.seed,
                "cols": self.maze.cols(),
                "rows": self.maze.rows(),
                "checksum": self.maze.checksum(),
            }),
        );
    }

    fn try_move(&mut self, ctx: &mut SceneContext, step: Step) {
        let (col, row) = self.player;
        match self.maze.step(col, row, step) {
            Some(next) => {
                self.player = next;
                self.moves += 1;
                if next == self.maze.exit() {
                    self.solved = true;
                    ctx.signals.emit("maze_solved", json!({ "seed": self.seed, "moves": self.moves }));
                    log::info!("maze {} solved in {} moves", self.seed, self.moves);
                }
            }
            None => self.blocked_moves += 1,
        }
    }

    fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        self.origin + vec2((col as f32 + 0.5) * self.cell, (row as f32 + 0.5) * self.cell)
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("seed", self.seed);
        s.set("moves", self.moves);
        s.set("blockedMoves", self.blocked_moves);
        s.set("playerCell", json!({ "col": self.player.0, "row": self.player.1 }));
        s.set("solved", self.solved);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(MazeScene::new(tuning.maze.clone()))
}

impl Scene for MazeScene {
    fn name(&self) -> &'static str {
        "maze"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.circle("player", 12, ui::PLAYER_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        let avail = ctx.screen - Vec2::splat(MARGIN * 2.0);
        self.cell = (avail.x / self.config.cols as f32)
            .min(avail.y / self.config.rows as f32)
            .max(4.0);
        let size = vec2(self.config.cols as f32, self.config.rows as f32) * self.cell;
        self.origin = (ctx.screen - size) * 0.5;
        self.regenerate(ctx);
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, _delta_time: f32) -> SceneCommand {
        // R rebuilds the current seed rather than the configured one
        if ctx.input.is_pressed(Action::Restart) {
            self.regenerate(ctx);
        } else {
            let command = standard_command(&ctx.input);
            if command != SceneCommand::Continue {
                return command;
            }
        }

        if ctx.input.is_pressed(Action::Special) || (self.solved && ctx.input.is_pressed(Action::Confirm)) {
            self.seed = self.seed.wrapping_add(1);
            self.regenerate(ctx);
        }

        if !self.solved {
            if let Some(step) = Step::from_input(&ctx.input) {
                self.try_move(ctx, step);
            }
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        let (exit_col, exit_row) = self.maze.exit();
        let exit = self.cell_center(exit_col, exit_row) - Vec2::splat(self.cell * 0.5);
        draw_rectangle(exit.x, exit.y, self.cell, self.cell, ui::GOAL_COLOR);

        let thickness = (self.cell * 0.1).clamp(1.0, 4.0);
        for row in 0..self.maze.rows() {
            for col in 0..self.maze.cols() {
                let walls = self.maze.walls_at(col, row);
                let x = self.origin.x + col as f32 * self.cell;
                let y = self.origin.y + row as f32 * self.cell;
                let c = self.cell;
                if walls & WALL_N != 0 {
                    draw_line(x, y, x + c, y, thickness, ui::WALL_COLOR);
                }
                if walls & WALL_E != 0 {
                    draw_line(x + c, y, x + c, y + c, thickness, ui::WALL_COLOR);
                }
                if walls & WALL_S != 0 {
                    draw_line(x, y + c, x + c, y + c, thickness, ui::WALL_COLOR);
                }
                if walls & WALL_W != 0 {
                    draw_line(x, y, x, y + c, thickness, ui::WALL_COLOR);
                }
            }
        }

        let (col, row) = self.player;
        textures.draw_centered("player", self.cell_center(col, row), Vec2::splat(self.cell * 0.6), WHITE);

        hud::draw_lines(
            16.0,
            16.0,
            &[format!(
                "Seed: {}   Moves: {}   Bumps: {}",
                self.seed, self.moves, self.blocked_moves
            )],
        );
        if self.solved {
            hud::draw_banner(
                ctx.screen,
                "SOLVED!",
                Some(&format!("{} moves - Enter for a new maze", self.moves)),
                ui::GOAL_COLOR,
            );
        }
        hud::draw_hint(ctx.screen, "Move: WASD/Arrows   Same maze: R   New maze: N   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    #[test]
    fn test_same_seed_same_maze() {
        let a = Maze::generate(42, 15, 11);
        let b = Maze::generate(42, 15, 11);
        assert_eq!(a, b);
        assert_ne!(a.checksum(), Maze::generate(43, 15, 11).checksum());
    }

    #[test]
    fn test_every_cell_reachable() {
        for seed in [1, 42, 777, 12345] {
            let maze = Maze::generate(seed, 15, 11);
            assert_eq!(maze.reachable_cells(), 15 * 11, "seed {}", seed);
        }
    }

    #[test]
    fn test_perfect_maze_has_no_loops() {
        // A spanning tree over n cells has exactly n - 1 open passages
        let maze = Maze::generate(42, 15, 11);
        let open: usize = (0..11)
            .flat_map(|row| (0..15).map(move |col| (col, row)))
            .map(|(col, row)| {
                let w = maze.walls_at(col, row);
                (w & WALL_E == 0) as usize + (w & WALL_S == 0) as usize
            })
            .sum();
        assert_eq!(open, 15 * 11 - 1);
    }

    #[test]
    fn test_outer_walls_stay_closed() {
        let maze = Maze::generate(7, 6, 4);
        for col in 0..6 {
            assert!(maze.step(col, 0, Step::North).is_none());
            assert!(maze.step(col, 3, Step::South).is_none());
        }
        for row in 0..4 {
            assert!(maze.step(0, row, Step::West).is_none());
            assert!(maze.step(5, row, Step::East).is_none());
        }
    }

    #[test]
    fn test_walls_block_player() {
        let mut scene = MazeScene::new(MazeConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);

        // West of the start is always the outer wall
        ctx.begin_frame(FrameInput::new().press(Action::Left), 0.016);
        scene.update(&mut ctx, 0.016);
        assert_eq!(scene.player, (0, 0));
        assert_eq!(scene.blocked_moves, 1);
        assert_eq!(scene.moves, 0);
    }

    /// Shortest path from start to exit as steps
    fn solve(maze: &Maze) -> Vec<Step> {
        let cells = maze.cols() * maze.rows();
        let mut prev: Vec<Option<((usize, usize), Step)>> = vec![None; cells];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        let mut seen = vec![false; cells];
        seen[0] = true;
        while let Some((col, row)) = queue.pop_front() {
            for step in Step::ALL {
                if let Some((c, r)) = maze.step(col, row, step) {
                    let i = r * maze.cols() + c;
                    if !seen[i] {
                        seen[i] = true;
                        prev[i] = Some(((col, row), step));
                        queue.push_back((c, r));
                    }
                }
            }
        }
        let mut path = Vec::new();
        let mut at = maze.exit();
        while let Some((from, step)) = prev[at.1 * maze.cols() + at.0] {
            path.push(step);
            at = from;
        }
        path.reverse();
        path
    }

    fn key(step: Step) -> Action {
        match step {
            Step::North => Action::Up,
            Step::East => Action::Right,
            Step::South => Action::Down,
            Step::West => Action::Left,
        }
    }

    #[test]
    fn test_walking_to_exit_solves() {
        let mut scene = MazeScene::new(MazeConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);

        let path = solve(&scene.maze);
        assert!(!path.is_empty());
        for step in &path {
            ctx.begin_frame(FrameInput::new().press(key(*step)), 0.016);
            scene.update(&mut ctx, 0.016);
        }
        assert!(scene.solved);
        assert_eq!(scene.moves as usize, path.len());
        assert_eq!(ctx.signals.get_bool("solved"), Some(true));
        assert_eq!(ctx.signals.count("maze_solved"), 1);

        // Confirm after solving moves on to the next seed
        ctx.begin_frame(FrameInput::new().press(Action::Confirm), 0.016);
        scene.update(&mut ctx, 0.016);
        assert_eq!(scene.seed, 43);
        assert!(!scene.solved);
        assert_eq!(scene.player, (0, 0));
    }

    #[test]
    fn test_restart_key_keeps_seed() {
        let mut scene = MazeScene::new(MazeConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        ctx.begin_frame(FrameInput::new().press(Action::Special), 0.016);
        scene.update(&mut ctx, 0.016);
        let checksum = scene.maze.checksum();

        ctx.begin_frame(FrameInput::new().press(Action::Restart), 0.016);
        let cmd = scene.update(&mut ctx, 0.016);
        assert_eq!(cmd, SceneCommand::Continue);
        assert_eq!(scene.seed, 43);
        assert_eq!(scene.maze.checksum(), checksum);
    }
}
