//! Arcade Demos: small 2D gameplay mechanics, one scene each
//!
//! Health and invulnerability, dashing, skill cooldowns, combos, particle
//! effects, patrol/chase AI, camera shake, platforming, seeded layouts,
//! endless waves, input record/replay and mazes. Runs natively and in the
//! browser from the same code.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod demos;
mod game;
mod input;
mod landing;
mod logging;
mod ui;

use std::sync::OnceLock;

use macroquad::prelude::*;

use app::{AppState, DemoKind};
use config::{AppConfig, ConfigSource};
use landing::{draw_landing, MenuAction, MenuStatus};

/// Longest step a scene is given; a stalled window shouldn't teleport bodies
const MAX_DELTA_TIME: f32 = 0.1;

/// Config loaded once in `window_conf`, before the window exists
static STARTUP_CONFIG: OnceLock<(AppConfig, ConfigSource)> = OnceLock::new();

fn startup_config() -> &'static (AppConfig, ConfigSource) {
    STARTUP_CONFIG.get_or_init(|| {
        logging::init();
        AppConfig::load_or_default()
    })
}

fn window_conf() -> Conf {
    let window = &startup_config().0.window;
    Conf {
        window_title: format!("{} v{}", window.title, VERSION),
        window_width: window.width as i32,
        window_height: window.height as i32,
        window_resizable: true,
        high_dpi: window.high_dpi,
        ..Default::default()
    }
}

/// `--demo <name>` or `--demo=<name>` from the command line
fn demo_arg<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if let Some(name) = arg.strip_prefix("--demo=") {
            return Some(name.to_string());
        }
        if arg == "--demo" {
            return args.next();
        }
    }
    None
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging first (only logging and config loading ran before it)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    log::info!("=== Arcade Demos v{} ===", VERSION);

    macroquad::rand::srand((macroquad::miniquad::date::now() * 1000.0) as u64);

    let (config, source) = startup_config().clone();
    let start_demo = demo_arg(std::env::args().skip(1)).or_else(|| config.start_demo.clone());
    let mut app = AppState::new(config, source);

    if let Some(name) = start_demo {
        match DemoKind::from_name(&name) {
            Some(demo) => app.launch(demo, vec2(screen_width(), screen_height())),
            None => log::warn!("unknown demo '{}', showing the menu", name),
        }
    }

    loop {
        // Track frame start time for FPS limiting
        let frame_start = get_time();
        let screen = vec2(screen_width(), screen_height());
        let delta_time = get_frame_time().min(MAX_DELTA_TIME);
        let input = app.input.poll();

        if app.running_demo().is_some() {
            clear_background(ui::BG_COLOR);
            app.update_demo(input, delta_time);
            app.draw_demo();
        } else {
            match app.landing.update(&input) {
                MenuAction::Launch(demo) => app.launch(demo, screen),
                MenuAction::CycleFpsLimit => app.cycle_fps_limit(),
                MenuAction::None => {}
            }
            if app.running_demo().is_none() {
                let status = MenuStatus {
                    fps: get_fps(),
                    fps_limit: app.config.fps_limit.label(),
                    gamepad: app.input.has_gamepad(),
                };
                draw_landing(screen, &app.landing, &status);
            }
        }

        // FPS limiting
        if let Some(target_frame_time) = app.config.fps_limit.frame_time() {
            let elapsed = get_time() - frame_start;
            let remaining = target_frame_time - elapsed;

            if remaining > 0.0 {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: just spin-wait (no thread::sleep available)
                #[cfg(target_arch = "wasm32")]
                {
                    while get_time() - frame_start < target_frame_time {
                        // Busy wait - browser will handle frame pacing
                    }
                }
            }
        }

        next_frame().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_demo_arg_forms() {
        assert_eq!(demo_arg(args(&["--demo", "maze"])), Some("maze".to_string()));
        assert_eq!(demo_arg(args(&["-v", "--demo=dash"])), Some("dash".to_string()));
        assert_eq!(demo_arg(args(&["--demo"])), None);
        assert_eq!(demo_arg(args(&[])), None);
    }
}
