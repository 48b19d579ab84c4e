//! Scene lifecycle
//!
//! A scene is one demo screen. The runner drives it through:
//!
//! ```text
//! preload (textures) → create (state) → update/draw every frame
//!                          ↑                    │
//!                          └──── Restart ───────┘
//! ```
//!
//! Scenes never call into the launcher; they return a `SceneCommand` from
//! `update` and the runner applies it between frames.

use macroquad::prelude::Vec2;

use super::signals::Signals;
use super::texture::TextureCache;
use crate::config::DemoTuning;
use crate::input::FrameInput;

/// What the runner should do after this frame's update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneCommand {
    #[default]
    Continue,
    /// Throw the scene away and build a fresh one
    Restart,
    /// Leave the demo (back to the menu)
    Exit,
}

/// Everything a scene may read or write besides its own fields
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub input: FrameInput,
    pub signals: Signals,
    /// Seconds since `create`
    pub time: f64,
    /// Logical screen size in pixels
    pub screen: Vec2,
}

impl SceneContext {
    pub fn new(screen: Vec2, log_signals: bool) -> Self {
        Self {
            input: FrameInput::default(),
            signals: Signals::new(log_signals),
            time: 0.0,
            screen,
        }
    }

    /// Advance the clock and install this frame's input
    pub fn begin_frame(&mut self, input: FrameInput, delta_time: f32) {
        self.input = input;
        self.time += delta_time as f64;
        self.signals.set_time(self.time);
    }
}

/// Defines a demo scene with lifecycle hooks.
///
/// Only `create`, `update` and `draw` are required.
pub trait Scene {
    /// Stable identifier, used in logs and on the command line
    fn name(&self) -> &'static str;

    /// Generate textures. Called once before `create`; skipped in tests.
    fn preload(&mut self, _textures: &mut TextureCache) {}

    /// Set up initial state
    fn create(&mut self, ctx: &mut SceneContext);

    /// Per-frame logic
    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand;

    /// Render the current state
    fn draw(&self, ctx: &SceneContext, textures: &TextureCache);
}

/// Builds a fresh scene, used on start and on every restart
pub type SceneFactory = fn(&DemoTuning) -> Box<dyn Scene>;

/// Owns the running scene and applies its lifecycle
pub struct SceneRunner {
    factory: SceneFactory,
    tuning: DemoTuning,
    scene: Box<dyn Scene>,
    textures: TextureCache,
    pub ctx: SceneContext,
    restarts: u32,
}

impl SceneRunner {
    /// Build the scene without touching the GPU (no preload)
    pub fn new_headless(
        factory: SceneFactory,
        tuning: DemoTuning,
        screen: Vec2,
        log_signals: bool,
    ) -> Self {
        let scene = factory(&tuning);
        Self {
            factory,
            tuning,
            scene,
            textures: TextureCache::new(),
            ctx: SceneContext::new(screen, log_signals),
            restarts: 0,
        }
    }

    /// Build, preload and create the scene
    pub fn start(
        factory: SceneFactory,
        tuning: DemoTuning,
        screen: Vec2,
        log_signals: bool,
    ) -> Self {
        let mut runner = Self::new_headless(factory, tuning, screen, log_signals);
        runner.scene.preload(&mut runner.textures);
        runner.create();
        runner
    }

    /// Run `create` with a clean context
    pub fn create(&mut self) {
        self.ctx.time = 0.0;
        self.ctx.signals.clear();
        self.scene.create(&mut self.ctx);
        log::info!("scene '{}' created", self.scene.name());
    }

    pub fn name(&self) -> &'static str {
        self.scene.name()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// One frame of logic. Returns `Exit` when the scene asked to leave;
    /// restarts are handled here.
    pub fn frame(&mut self, input: FrameInput, delta_time: f32) -> SceneCommand {
        self.ctx.begin_frame(input, delta_time);
        let command = self.scene.update(&mut self.ctx, delta_time);
        match command {
            SceneCommand::Restart => {
                self.restart();
                SceneCommand::Restart
            }
            other => other,
        }
    }

    /// Replace the scene with a fresh instance. Textures are kept: the
    /// factory produces the same scene type, so the same keys are valid.
    pub fn restart(&mut self) {
        self.restarts += 1;
        log::info!("scene '{}' restarting (#{})", self.scene.name(), self.restarts);
        self.scene = (self.factory)(&self.tuning);
        self.create();
    }

    pub fn draw(&self) {
        self.scene.draw(&self.ctx, &self.textures);
    }

    pub fn signals(&self) -> &Signals {
        &self.ctx.signals
    }
}
