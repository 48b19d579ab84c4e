//! Landing page / demo menu
//!
//! Lists every demo with its description. Up/Down (or the D-pad) move the
//! selection, Enter/Space/Start or a click launches it, E cycles the FPS
//! limit.

use macroquad::prelude::*;

use crate::app::DemoKind;
use crate::input::{Action, FrameInput};
use crate::ui::{self, hud};
use crate::VERSION;

const ROW_HEIGHT: f32 = 30.0;
const LIST_TOP: f32 = 110.0;
const LIST_WIDTH: f32 = 320.0;
const PADDING: f32 = 40.0;

/// Wrap text to fit within a given pixel width
/// Returns a vector of lines that fit within max_width
fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            let test_line = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };

            // Approximate width, measure_text is too slow to call per word
            let char_width = font_size * 0.55;
            let test_width = test_line.len() as f32 * char_width;

            if test_width <= max_width || current_line.is_empty() {
                current_line = test_line;
            } else {
                lines.push(current_line);
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}

/// What the menu wants the app to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Launch(DemoKind),
    CycleFpsLimit,
}

/// Status line values drawn at the bottom of the menu
pub struct MenuStatus<'a> {
    pub fps: i32,
    pub fps_limit: &'a str,
    pub gamepad: bool,
}

/// Menu selection state
pub struct LandingState {
    pub selected: usize,
}

impl LandingState {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn selected_demo(&self) -> DemoKind {
        DemoKind::from_index(self.selected).unwrap_or(DemoKind::HealthBar)
    }

    /// Move the selection, wrapping at both ends
    pub fn move_selection(&mut self, delta: i32) {
        let count = DemoKind::ALL.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(count) as usize;
    }

    pub fn update(&mut self, input: &FrameInput) -> MenuAction {
        if input.is_pressed(Action::Up) {
            self.move_selection(-1);
        }
        if input.is_pressed(Action::Down) {
            self.move_selection(1);
        }

        if input.clicked {
            if let Some(row) = row_at(input.mouse) {
                self.selected = row;
                return MenuAction::Launch(self.selected_demo());
            }
        }
        if input.is_pressed(Action::Confirm) || input.is_pressed(Action::Primary) {
            return MenuAction::Launch(self.selected_demo());
        }
        if input.is_pressed(Action::Next) {
            return MenuAction::CycleFpsLimit;
        }
        MenuAction::None
    }
}

impl Default for LandingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen rectangle of a menu row
pub fn row_rect(index: usize) -> Rect {
    Rect::new(PADDING, LIST_TOP + index as f32 * ROW_HEIGHT, LIST_WIDTH, ROW_HEIGHT)
}

/// Menu row under a point, if any
pub fn row_at(point: Vec2) -> Option<usize> {
    (0..DemoKind::ALL.len()).find(|&i| row_rect(i).contains(point))
}

/// Draw the menu
pub fn draw_landing(screen: Vec2, state: &LandingState, status: &MenuStatus) {
    clear_background(ui::BG_COLOR);

    let title = format!("Arcade Demos v{}", VERSION);
    draw_text(&title, PADDING, 56.0, ui::FONT_SIZE_TITLE, ui::ACCENT_COLOR);
    draw_text(
        "Small gameplay mechanics, one scene each",
        PADDING,
        82.0,
        ui::FONT_SIZE_HEADER - 2.0,
        ui::TEXT_DIM,
    );

    let (mx, my) = mouse_position();
    let hovered = row_at(vec2(mx, my));
    for (i, demo) in DemoKind::ALL.iter().enumerate() {
        let r = row_rect(i);
        if i == state.selected {
            draw_rectangle(r.x, r.y, r.w, r.h, ui::ROW_HIGHLIGHT);
            draw_rectangle(r.x, r.y, 3.0, r.h, ui::ACCENT_COLOR);
        } else if hovered == Some(i) {
            draw_rectangle(r.x, r.y, r.w, r.h, ui::PANEL_BG);
        }
        let color = if i == state.selected { ui::TEXT_COLOR } else { ui::TEXT_DIM };
        draw_text(
            &format!("{:>2}. {}", i + 1, demo.label()),
            r.x + 12.0,
            r.y + r.h * 0.5 + 6.0,
            ui::FONT_SIZE_CONTENT + 2.0,
            color,
        );
    }

    // Description panel to the right of the list
    let demo = state.selected_demo();
    let panel_x = PADDING + LIST_WIDTH + 24.0;
    let panel_w = (screen.x - panel_x - PADDING).max(120.0);
    let lines = wrap_text(demo.description(), ui::FONT_SIZE_CONTENT, panel_w - 32.0);
    let panel_h = 70.0 + lines.len() as f32 * 22.0;
    draw_rectangle(panel_x, LIST_TOP, panel_w, panel_h, ui::PANEL_BG);
    draw_text(demo.label(), panel_x + 16.0, LIST_TOP + 32.0, ui::FONT_SIZE_HEADER, ui::ACCENT_COLOR);
    let mut y = LIST_TOP + 58.0;
    for line in &lines {
        draw_text(line, panel_x + 16.0, y, ui::FONT_SIZE_CONTENT, ui::TEXT_COLOR);
        y += 22.0;
    }
    draw_text(
        &format!("--demo {}", demo.name()),
        panel_x + 16.0,
        LIST_TOP + panel_h + 20.0,
        ui::FONT_SIZE_SMALL,
        ui::TEXT_DIM,
    );

    let gamepad = if status.gamepad { "gamepad connected" } else { "no gamepad" };
    draw_text(
        &format!("{} FPS  |  limit {}  |  {}", status.fps, status.fps_limit, gamepad),
        PADDING,
        screen.y - 44.0,
        ui::FONT_SIZE_SMALL,
        ui::TEXT_DIM,
    );
    hud::draw_hint(screen, "Select: Up/Down   Start: Enter/click   FPS limit: E   In a demo, Esc returns here");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six seven", 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            // 60 px at 5.5 px per char
            assert!(line.len() <= 10 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs() {
        let lines = wrap_text("a\n\nb", 16.0, 500.0);
        assert_eq!(lines, vec!["a".to_string(), String::new(), "b".to_string()]);
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = LandingState::new();
        state.move_selection(-1);
        assert_eq!(state.selected, DemoKind::ALL.len() - 1);
        state.move_selection(1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_demo(), DemoKind::HealthBar);
    }

    #[test]
    fn test_keyboard_navigation_and_launch() {
        let mut state = LandingState::new();
        assert_eq!(state.update(&FrameInput::new().press(Action::Down)), MenuAction::None);
        assert_eq!(state.update(&FrameInput::new().press(Action::Down)), MenuAction::None);
        assert_eq!(
            state.update(&FrameInput::new().press(Action::Confirm)),
            MenuAction::Launch(DemoKind::SkillCooldown)
        );
        assert_eq!(state.update(&FrameInput::new().press(Action::Next)), MenuAction::CycleFpsLimit);
    }

    #[test]
    fn test_click_on_row_launches_it() {
        let mut state = LandingState::new();
        let r = row_rect(7);
        let click = FrameInput::new().click(r.x + 10.0, r.y + 10.0);
        assert_eq!(state.update(&click), MenuAction::Launch(DemoKind::Platformer));
        assert_eq!(state.selected, 7);

        // Clicks outside the list do nothing
        assert_eq!(state.update(&FrameInput::new().click(5.0, 5.0)), MenuAction::None);
        assert_eq!(row_at(vec2(5.0, 5.0)), None);
    }
}
