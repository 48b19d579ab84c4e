//! Demo scenes
//!
//! Each demo is a self-contained `Scene` with its own tuning struct. They
//! share the primitives in `game` but no gameplay code with each other.
//!
//! Every module exposes:
//! - a `*Config` section (part of `DemoTuning`) with `validate()`
//! - `build(&DemoTuning) -> Box<dyn Scene>`, the scene factory

pub mod camera_shake;
pub mod combo;
pub mod dash;
pub mod endless_wave;
pub mod health_bar;
pub mod maze;
pub mod particles;
pub mod patrol_chase;
pub mod platformer;
pub mod record_replay;
pub mod seeded_obstacles;
pub mod skill_cooldown;

use macroquad::prelude::Vec2;

use crate::game::SceneCommand;
use crate::input::{Action, FrameInput};

/// Esc leaves the demo, R restarts it
pub fn standard_command(input: &FrameInput) -> SceneCommand {
    if input.is_pressed(Action::Back) {
        SceneCommand::Exit
    } else if input.is_pressed(Action::Restart) {
        SceneCommand::Restart
    } else {
        SceneCommand::Continue
    }
}

/// Movement input clamped to unit length, so diagonals aren't faster
pub fn move_direction(input: &FrameInput) -> Vec2 {
    let axis = input.move_axis();
    if axis.length_squared() > 1.0 {
        axis.normalize()
    } else {
        axis
    }
}

/// Coarse direction name for signal payloads
pub fn direction_label(dir: Vec2) -> &'static str {
    let horizontal = if dir.x > 0.3 {
        1
    } else if dir.x < -0.3 {
        -1
    } else {
        0
    };
    let vertical = if dir.y > 0.3 {
        1
    } else if dir.y < -0.3 {
        -1
    } else {
        0
    };
    match (horizontal, vertical) {
        (1, 0) => "right",
        (-1, 0) => "left",
        (0, -1) => "up",
        (0, 1) => "down",
        (1, -1) => "up-right",
        (-1, -1) => "up-left",
        (1, 1) => "down-right",
        (-1, 1) => "down-left",
        _ => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_command_back_wins() {
        let input = FrameInput::new().press(Action::Back).press(Action::Restart);
        assert_eq!(standard_command(&input), SceneCommand::Exit);
        assert_eq!(standard_command(&FrameInput::new().press(Action::Restart)), SceneCommand::Restart);
        assert_eq!(standard_command(&FrameInput::new().hold(Action::Restart)), SceneCommand::Continue);
    }

    #[test]
    fn test_move_direction_diagonal_normalized() {
        let input = FrameInput::new().hold(Action::Up).hold(Action::Right);
        let dir = move_direction(&input);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(direction_label(dir), "up-right");
    }
}
