//! Application state and demo management
//!
//! Fixed set of demos, one menu row each. The menu is the home screen;
//! picking a demo builds a fresh `SceneRunner` and leaving it drops the
//! runner and returns to the menu.

use macroquad::prelude::Vec2;

use crate::config::{AppConfig, ConfigSource};
use crate::demos;
use crate::game::{SceneCommand, SceneFactory, SceneRunner};
use crate::input::{FrameInput, InputState};
use crate::landing::LandingState;

/// The available demos (fixed set, one menu row each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoKind {
    HealthBar = 0,
    Dash = 1,
    SkillCooldown = 2,
    Combo = 3,
    Particles = 4,
    PatrolChase = 5,
    CameraShake = 6,
    Platformer = 7,
    SeededObstacles = 8,
    EndlessWave = 9,
    RecordReplay = 10,
    Maze = 11,
}

impl DemoKind {
    pub const ALL: [DemoKind; 12] = [
        DemoKind::HealthBar,
        DemoKind::Dash,
        DemoKind::SkillCooldown,
        DemoKind::Combo,
        DemoKind::Particles,
        DemoKind::PatrolChase,
        DemoKind::CameraShake,
        DemoKind::Platformer,
        DemoKind::SeededObstacles,
        DemoKind::EndlessWave,
        DemoKind::RecordReplay,
        DemoKind::Maze,
    ];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            DemoKind::HealthBar => "Health Bar",
            DemoKind::Dash => "Dash",
            DemoKind::SkillCooldown => "Skill Cooldowns",
            DemoKind::Combo => "Combo Counter",
            DemoKind::Particles => "Particle Effects",
            DemoKind::PatrolChase => "Patrol & Chase",
            DemoKind::CameraShake => "Camera Shake",
            DemoKind::Platformer => "Platformer",
            DemoKind::SeededObstacles => "Seeded Obstacles",
            DemoKind::EndlessWave => "Endless Waves",
            DemoKind::RecordReplay => "Record & Replay",
            DemoKind::Maze => "Maze",
        }
    }

    /// Stable name, same as the scene's `name()`. Used by `--demo` and
    /// `start_demo` in the config file.
    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::HealthBar => "health_bar",
            DemoKind::Dash => "dash",
            DemoKind::SkillCooldown => "skill_cooldown",
            DemoKind::Combo => "combo",
            DemoKind::Particles => "particles",
            DemoKind::PatrolChase => "patrol_chase",
            DemoKind::CameraShake => "camera_shake",
            DemoKind::Platformer => "platformer",
            DemoKind::SeededObstacles => "seeded_obstacles",
            DemoKind::EndlessWave => "endless_wave",
            DemoKind::RecordReplay => "record_replay",
            DemoKind::Maze => "maze",
        }
    }

    /// One line shown under the selected menu row
    pub fn description(&self) -> &'static str {
        match self {
            DemoKind::HealthBar => "Take hits from roaming enemies; invulnerability frames and knockback.",
            DemoKind::Dash => "Short burst of speed gated by a cooldown.",
            DemoKind::SkillCooldown => "Three skills with independent cooldown overlays.",
            DemoKind::Combo => "Chain hits before the timer runs out to trigger a special.",
            DemoKind::Particles => "Cycle through emitter presets and fire bursts.",
            DemoKind::PatrolChase => "Guards patrol a loop and chase you when you get close.",
            DemoKind::CameraShake => "Light, heavy and impact screen shakes.",
            DemoKind::Platformer => "Gravity, one-way platforms, a moving lift and coins.",
            DemoKind::SeededObstacles => "The same seed always builds the same obstacle field.",
            DemoKind::EndlessWave => "Waves grow bigger and faster; click enemies before they leak.",
            DemoKind::RecordReplay => "Record a few seconds of movement and watch a ghost replay it.",
            DemoKind::Maze => "Find the exit of a seeded maze.",
        }
    }

    pub fn from_index(i: usize) -> Option<DemoKind> {
        DemoKind::ALL.get(i).copied()
    }

    pub fn from_name(name: &str) -> Option<DemoKind> {
        DemoKind::ALL.iter().copied().find(|d| d.name() == name)
    }

    pub fn factory(&self) -> SceneFactory {
        match self {
            DemoKind::HealthBar => demos::health_bar::build,
            DemoKind::Dash => demos::dash::build,
            DemoKind::SkillCooldown => demos::skill_cooldown::build,
            DemoKind::Combo => demos::combo::build,
            DemoKind::Particles => demos::particles::build,
            DemoKind::PatrolChase => demos::patrol_chase::build,
            DemoKind::CameraShake => demos::camera_shake::build,
            DemoKind::Platformer => demos::platformer::build,
            DemoKind::SeededObstacles => demos::seeded_obstacles::build,
            DemoKind::EndlessWave => demos::endless_wave::build,
            DemoKind::RecordReplay => demos::record_replay::build,
            DemoKind::Maze => demos::maze::build,
        }
    }
}

/// What is on screen
pub enum Screen {
    Menu,
    Running { demo: DemoKind, runner: SceneRunner },
}

/// Main application state
pub struct AppState {
    pub config: AppConfig,
    /// Where `config` was loaded from; decides where menu changes are saved
    pub config_source: ConfigSource,
    pub screen: Screen,
    /// Menu selection and layout
    pub landing: LandingState,
    /// Unified input state (keyboard + gamepad)
    pub input: InputState,
}

impl AppState {
    pub fn new(config: AppConfig, config_source: ConfigSource) -> Self {
        Self {
            config,
            config_source,
            screen: Screen::Menu,
            landing: LandingState::new(),
            input: InputState::new(),
        }
    }

    /// Step the FPS limit and save it, unless the config file on disk was
    /// rejected at startup (saving would replace it with defaults)
    pub fn cycle_fps_limit(&mut self) {
        self.config.fps_limit = self.config.fps_limit.next();
        log::info!("FPS limit: {}", self.config.fps_limit.label());
        match self.config.save_to_source(&self.config_source) {
            Ok(Some(path)) => log::info!("Saved settings to {}", path.display()),
            Ok(None) => log::warn!("Not saving settings: the config file failed to load, fix it first"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }

    /// Build, preload and create a demo (needs a GPU context)
    pub fn launch(&mut self, demo: DemoKind, screen: Vec2) {
        log::info!("starting demo '{}'", demo.name());
        self.landing.selected = demo as usize;
        let runner = SceneRunner::start(
            demo.factory(),
            self.config.demos.clone(),
            screen,
            self.config.log_signals,
        );
        self.screen = Screen::Running { demo, runner };
    }

    pub fn running_demo(&self) -> Option<DemoKind> {
        match &self.screen {
            Screen::Menu => None,
            Screen::Running { demo, .. } => Some(*demo),
        }
    }

    /// Advance the running demo one frame; `Exit` drops back to the menu.
    /// Returns false when no demo is running.
    pub fn update_demo(&mut self, input: FrameInput, delta_time: f32) -> bool {
        let Screen::Running { demo, runner } = &mut self.screen else {
            return false;
        };
        if runner.frame(input, delta_time) == SceneCommand::Exit {
            log::info!("leaving demo '{}' after {} restart(s)", demo.name(), runner.restarts());
            self.screen = Screen::Menu;
        }
        true
    }

    pub fn draw_demo(&self) {
        if let Screen::Running { runner, .. } = &self.screen {
            runner.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoTuning;
    use crate::input::Action;
    use macroquad::prelude::vec2;

    #[test]
    fn test_names_round_trip() {
        for (i, demo) in DemoKind::ALL.iter().enumerate() {
            assert_eq!(DemoKind::from_index(i), Some(*demo));
            assert_eq!(*demo as usize, i);
            assert_eq!(DemoKind::from_name(demo.name()), Some(*demo));
        }
        assert_eq!(DemoKind::from_name("nope"), None);
        assert_eq!(DemoKind::from_index(DemoKind::ALL.len()), None);
    }

    #[test]
    fn test_factory_matches_scene_name() {
        let tuning = DemoTuning::default();
        for demo in DemoKind::ALL {
            let scene = (demo.factory())(&tuning);
            assert_eq!(scene.name(), demo.name());
        }
    }

    #[test]
    fn test_every_demo_survives_a_few_frames() {
        for demo in DemoKind::ALL {
            let mut runner = SceneRunner::new_headless(demo.factory(), DemoTuning::default(), vec2(800.0, 600.0), false);
            runner.create();
            for _ in 0..30 {
                runner.frame(FrameInput::new().hold(Action::Right), 1.0 / 60.0);
            }
            assert_eq!(runner.frame(FrameInput::new().press(Action::Back), 1.0 / 60.0), SceneCommand::Exit);
        }
    }

    #[test]
    fn test_fps_cycle_leaves_rejected_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcade-demos.ron");
        std::fs::write(&path, "(window: (width: 0))").unwrap();

        let (config, source) = AppConfig::load_first(&[path.clone()]);
        let mut app = AppState::new(config, source);
        app.cycle_fps_limit();
        assert_eq!(app.config.fps_limit, crate::config::FpsLimit::Unlocked);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "(window: (width: 0))");
    }

    #[test]
    fn test_exit_returns_to_menu() {
        let mut app = AppState::new(AppConfig::default(), ConfigSource::Rejected("unused.ron".into()));
        let mut runner = SceneRunner::new_headless(DemoKind::Maze.factory(), DemoTuning::default(), vec2(800.0, 600.0), false);
        runner.create();
        app.screen = Screen::Running { demo: DemoKind::Maze, runner };
        assert_eq!(app.running_demo(), Some(DemoKind::Maze));

        assert!(app.update_demo(FrameInput::new(), 0.016));
        assert_eq!(app.running_demo(), Some(DemoKind::Maze));

        assert!(app.update_demo(FrameInput::new().press(Action::Back), 0.016));
        assert_eq!(app.running_demo(), None);
        assert!(!app.update_demo(FrameInput::new(), 0.016));
    }
}
