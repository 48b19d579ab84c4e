//! Input state management
//!
//! Polls keyboard, mouse (macroquad) and gamepad once per frame and flattens
//! them into a `FrameInput` snapshot. Scenes only ever see the snapshot, so
//! tests can drive a scene by building `FrameInput` values by hand.

use std::collections::HashSet;

use macroquad::prelude::*;

use super::gamepad::{button, Gamepad};
use super::Action;

/// One frame's worth of input, as plain data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Actions held this frame
    pub down: HashSet<Action>,
    /// Actions that went down this frame
    pub pressed: HashSet<Action>,
    /// Pointer position in screen pixels
    pub mouse: Vec2,
    /// Left button went down this frame
    pub clicked: bool,
    /// Analog movement (gamepad stick), zero when unused
    pub stick: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: hold an action
    pub fn hold(mut self, action: Action) -> Self {
        self.down.insert(action);
        self
    }

    /// Builder: press (and hold) an action this frame
    pub fn press(mut self, action: Action) -> Self {
        self.down.insert(action);
        self.pressed.insert(action);
        self
    }

    /// Builder: click at a position
    pub fn click(mut self, x: f32, y: f32) -> Self {
        self.mouse = Vec2::new(x, y);
        self.clicked = true;
        self
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.down.contains(&action)
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Digital movement axis in screen space (+x right, +y down), or the
    /// stick when it is pushed further
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_down(Action::Left) { axis.x -= 1.0; }
        if self.is_down(Action::Right) { axis.x += 1.0; }
        if self.is_down(Action::Up) { axis.y -= 1.0; }
        if self.is_down(Action::Down) { axis.y += 1.0; }

        if self.stick.length() > axis.length() {
            axis = self.stick;
        }
        axis
    }

    /// True if any movement direction went down this frame
    pub fn move_pressed(&self) -> bool {
        [Action::Up, Action::Down, Action::Left, Action::Right]
            .iter()
            .any(|a| self.is_pressed(*a))
    }
}

/// Unified input state that handles keyboard/mouse and gamepad
pub struct InputState {
    gamepad: Gamepad,
    last_buttons: u32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            last_buttons: 0,
        }
    }

    /// Call once per frame; returns this frame's snapshot
    pub fn poll(&mut self) -> FrameInput {
        self.gamepad.poll();
        let buttons = self.gamepad.button_mask();
        let just = buttons & !self.last_buttons;
        self.last_buttons = buttons;

        let mut frame = FrameInput::new();
        for action in Action::ALL {
            if keyboard_down(action) || mask_has(buttons, action) {
                frame.down.insert(action);
            }
            if keyboard_pressed(action) || mask_has(just, action) {
                frame.pressed.insert(action);
            }
        }

        let (mx, my) = mouse_position();
        frame.mouse = Vec2::new(mx, my);
        frame.clicked = is_mouse_button_pressed(MouseButton::Left);
        frame.stick = self.gamepad.left_stick();
        frame
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys bound to an action; any of them counts
fn keys_for(action: Action) -> &'static [KeyCode] {
    match action {
        Action::Up => &[KeyCode::W, KeyCode::Up],
        Action::Down => &[KeyCode::S, KeyCode::Down],
        Action::Left => &[KeyCode::A, KeyCode::Left],
        Action::Right => &[KeyCode::D, KeyCode::Right],
        Action::Primary => &[KeyCode::Space],
        Action::Secondary => &[KeyCode::LeftShift, KeyCode::RightShift],
        Action::Skill1 => &[KeyCode::Key1],
        Action::Skill2 => &[KeyCode::Key2],
        Action::Skill3 => &[KeyCode::Key3],
        Action::Prev => &[KeyCode::Q],
        Action::Next => &[KeyCode::E],
        Action::Confirm => &[KeyCode::Enter, KeyCode::KpEnter],
        Action::Restart => &[KeyCode::R],
        Action::Back => &[KeyCode::Escape],
        Action::Special => &[KeyCode::H, KeyCode::N],
    }
}

fn keyboard_down(action: Action) -> bool {
    keys_for(action).iter().any(|k| is_key_down(*k))
}

fn keyboard_pressed(action: Action) -> bool {
    keys_for(action).iter().any(|k| is_key_pressed(*k))
}

/// Gamepad buttons bound to an action
fn buttons_for(action: Action) -> &'static [u32] {
    match action {
        Action::Up => &[button::DPAD_UP],
        Action::Down => &[button::DPAD_DOWN],
        Action::Left => &[button::DPAD_LEFT],
        Action::Right => &[button::DPAD_RIGHT],
        Action::Primary => &[button::A],
        Action::Secondary => &[button::B],
        Action::Skill1 => &[button::X],
        Action::Skill2 => &[button::Y],
        Action::Skill3 => &[button::RB],
        Action::Prev => &[button::LB],
        Action::Next => &[button::RT],
        Action::Confirm => &[button::START],
        Action::Restart => &[button::SELECT],
        Action::Back => &[button::LT],
        Action::Special => &[],
    }
}

fn mask_has(mask: u32, action: Action) -> bool {
    buttons_for(action).iter().any(|&b| mask & (1 << b) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_press_implies_down() {
        let input = FrameInput::new().press(Action::Primary);
        assert!(input.is_down(Action::Primary));
        assert!(input.is_pressed(Action::Primary));
        assert!(!input.is_pressed(Action::Secondary));
    }

    #[test]
    fn test_move_axis_opposites_cancel() {
        let input = FrameInput::new().hold(Action::Left).hold(Action::Right).hold(Action::Up);
        assert_eq!(input.move_axis(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_stick_overrides_when_stronger() {
        let mut input = FrameInput::new();
        input.stick = Vec2::new(0.5, 0.0);
        assert_eq!(input.move_axis(), Vec2::new(0.5, 0.0));
        let input = input.hold(Action::Down);
        assert_eq!(input.move_axis(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_mask_mapping() {
        assert!(mask_has(1 << button::A, Action::Primary));
        assert!(!mask_has(1 << button::A, Action::Secondary));
        assert!(!mask_has(u32::MAX, Action::Special));
    }
}
