//! Record / replay demo
//!
//! The scene records movement input for a fixed window, then a ghost
//! replays the recorded stream from the same start point. Replay speed
//! (1x, 2x, 0.5x) changes how fast the recording is consumed, not the
//! result: each sample is applied with its recorded frame time, so the
//! ghost always ends exactly where the player did.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{move_direction, standard_command};
use crate::config::{require_positive, DemoTuning};
use crate::game::{Body, Bounds, Scene, SceneCommand, SceneContext, TextureCache, Timers};
use crate::input::Action;
use crate::ui::{self, hud};

const PLAYER_SIZE: f32 = 30.0;
const REPLAY_SPEEDS: [f32; 3] = [1.0, 2.0, 0.5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordReplayConfig {
    /// Seconds of input captured per recording
    pub duration: f32,
    pub player_speed: f32,
}

impl Default for RecordReplayConfig {
    fn default() -> Self {
        Self {
            duration: 3.0,
            player_speed: 200.0,
        }
    }
}

impl RecordReplayConfig {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("duration", self.duration)?;
        require_positive("player_speed", self.player_speed)
    }
}

/// One frame of recorded input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    pub delta_time: f32,
    pub direction: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPhase {
    Recording,
    /// Recording finished, waiting for the replay to be started
    Recorded,
    Replaying,
    Finished,
}

impl ReplayPhase {
    fn label(&self) -> &'static str {
        match self {
            ReplayPhase::Recording => "recording",
            ReplayPhase::Recorded => "recorded",
            ReplayPhase::Replaying => "replaying",
            ReplayPhase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayEvent {
    StopRecording,
}

pub struct RecordReplayScene {
    config: RecordReplayConfig,
    bounds: Bounds,
    start: Vec2,
    player: Body,
    ghost: Body,
    samples: Vec<InputSample>,
    phase: ReplayPhase,
    timers: Timers<ReplayEvent>,
    speed_index: usize,
    cursor: usize,
    /// Scaled time not yet spent on the next sample
    replay_clock: f32,
    /// Samples that carried any movement
    recorded_actions: usize,
    replayed_actions: usize,
}

impl RecordReplayScene {
    pub fn new(config: RecordReplayConfig) -> Self {
        Self {
            config,
            bounds: Bounds::new(800.0, 600.0),
            start: Vec2::ZERO,
            player: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            ghost: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            samples: Vec::new(),
            phase: ReplayPhase::Recording,
            timers: Timers::new(),
            speed_index: 0,
            cursor: 0,
            replay_clock: 0.0,
            recorded_actions: 0,
            replayed_actions: 0,
        }
    }

    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    pub fn replay_speed(&self) -> f32 {
        REPLAY_SPEEDS[self.speed_index]
    }

    fn start_recording(&mut self, ctx: &mut SceneContext) {
        self.phase = ReplayPhase::Recording;
        self.samples.clear();
        self.recorded_actions = 0;
        self.player.pos = self.start;
        self.timers.clear();
        self.timers.after(self.config.duration, ReplayEvent::StopRecording);
        ctx.signals.emit("recording_started", json!({ "duration": self.config.duration }));
    }

    fn start_replay(&mut self, ctx: &mut SceneContext) {
        self.phase = ReplayPhase::Replaying;
        self.ghost.pos = self.start;
        self.cursor = 0;
        self.replay_clock = 0.0;
        self.replayed_actions = 0;
        ctx.signals.emit(
            "replay_started",
            json!({ "samples": self.samples.len(), "speed": self.replay_speed() }),
        );
    }

    /// Apply one recorded frame to a body
    fn apply(body: &mut Body, sample: InputSample, speed: f32, bounds: &Bounds) {
        body.vel = sample.direction * speed;
        body.integrate(sample.delta_time, bounds);
    }

    fn advance_replay(&mut self, ctx: &mut SceneContext, delta_time: f32) {
        self.replay_clock += delta_time * self.replay_speed();
        while let Some(&sample) = self.samples.get(self.cursor) {
            if self.replay_clock < sample.delta_time {
                break;
            }
            self.replay_clock -= sample.delta_time;
            Self::apply(&mut self.ghost, sample, self.config.player_speed, &self.bounds);
            if sample.direction != Vec2::ZERO {
                self.replayed_actions += 1;
            }
            self.cursor += 1;
        }

        if self.cursor >= self.samples.len() {
            self.phase = ReplayPhase::Finished;
            ctx.signals.emit(
                "replay_complete",
                json!({
                    "replayedActions": self.replayed_actions,
                    "x": self.ghost.pos.x,
                    "y": self.ghost.pos.y,
                    "matches": self.ghost.pos.distance(self.player.pos) < 1e-3,
                }),
            );
        }
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let s = &mut ctx.signals;
        s.set("phase", self.phase.label());
        s.set("recordedActions", self.recorded_actions);
        s.set("replayedActions", self.replayed_actions);
        s.set("currentSpeed", self.replay_speed());
        s.set("playerPosition", json!({ "x": self.player.pos.x, "y": self.player.pos.y }));
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(RecordReplayScene::new(tuning.record_replay.clone()))
}

impl Scene for RecordReplayScene {
    fn name(&self) -> &'static str {
        "record_replay"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        textures.rect("player", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::GOAL_COLOR);
        textures.rect("ghost", PLAYER_SIZE as u16, PLAYER_SIZE as u16, ui::PLAYER_COLOR);
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.bounds = Bounds::new(ctx.screen.x, ctx.screen.y);
        self.start = self.bounds.center();
        self.ghost.pos = self.start;
        self.start_recording(ctx);
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        for event in self.timers.tick(delta_time) {
            match event {
                ReplayEvent::StopRecording => {
                    self.phase = ReplayPhase::Recorded;
                    ctx.signals.emit(
                        "recording_complete",
                        json!({ "samples": self.samples.len(), "recordedActions": self.recorded_actions }),
                    );
                }
            }
        }

        match self.phase {
            ReplayPhase::Recording => {
                let sample = InputSample {
                    delta_time,
                    direction: move_direction(&ctx.input),
                };
                if sample.direction != Vec2::ZERO {
                    self.recorded_actions += 1;
                }
                self.samples.push(sample);
                Self::apply(&mut self.player, sample, self.config.player_speed, &self.bounds);
            }
            ReplayPhase::Recorded | ReplayPhase::Finished => {
                if ctx.input.is_pressed(Action::Primary) {
                    self.speed_index = (self.speed_index + 1) % REPLAY_SPEEDS.len();
                    ctx.signals.emit("speed_changed", json!({ "speed": self.replay_speed() }));
                }
                if ctx.input.is_pressed(Action::Confirm) {
                    if self.phase == ReplayPhase::Recorded {
                        self.start_replay(ctx);
                    } else {
                        self.start_recording(ctx);
                    }
                }
            }
            ReplayPhase::Replaying => self.advance_replay(ctx, delta_time),
        }

        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        draw_rectangle_lines(
            self.bounds.min.x + 1.0,
            self.bounds.min.y + 1.0,
            self.bounds.width() - 2.0,
            self.bounds.height() - 2.0,
            2.0,
            ui::TEXT_DIM,
        );

        if matches!(self.phase, ReplayPhase::Replaying | ReplayPhase::Finished) {
            textures.draw_centered("ghost", self.ghost.pos, self.ghost.size, ui::GHOST_COLOR);
        }
        textures.draw_centered("player", self.player.pos, self.player.size, WHITE);

        let status = match self.phase {
            ReplayPhase::Recording => format!("RECORDING... {} frames", self.samples.len()),
            ReplayPhase::Recorded => "Recorded - Enter to replay".to_string(),
            ReplayPhase::Replaying => format!("REPLAYING {}/{}", self.cursor, self.samples.len()),
            ReplayPhase::Finished => "Replay done - Enter to record again".to_string(),
        };
        hud::draw_lines(
            16.0,
            16.0,
            &[
                status,
                format!("Replay speed: {}x", self.replay_speed()),
                format!("Actions: {} recorded, {} replayed", self.recorded_actions, self.replayed_actions),
            ],
        );
        if self.phase == ReplayPhase::Recording {
            draw_circle(ctx.screen.x - 24.0, 24.0, 8.0, ui::HEALTH_CRITICAL);
        }
        hud::draw_hint(ctx.screen, "Move while recording   Speed: Space   Replay: Enter   Menu: Esc");
    }
}
