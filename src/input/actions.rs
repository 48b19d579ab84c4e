//! Demo action definitions
//!
//! Every demo reads the same small action set, so a control scheme learned
//! in one demo carries over to the next.

/// All possible demo actions that can be triggered by input
///
/// Keyboard / gamepad (Xbox labels):
/// - Arrows or WASD / left stick, D-pad = Move
/// - Space / A = Primary (jump, dash, fire)
/// - Shift / B = Secondary (heavy variant)
/// - 1, 2, 3 / X, Y, RB = Skills
/// - Q, E / LB, RT = Previous / Next
/// - Enter / Start = Confirm
/// - R / Select = Restart
/// - Escape / B+Start = Back to menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (digital, 8-way)
    Up,
    Down,
    Left,
    Right,

    Primary,
    Secondary,

    Skill1,
    Skill2,
    Skill3,

    // Cycling (particle presets, seeds)
    Prev,
    Next,

    // Menu / lifecycle
    Confirm,
    Restart,
    Back,

    /// Demo specific extra key (heal, new seed, ...)
    Special,
}

impl Action {
    pub const ALL: [Action; 15] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Primary,
        Action::Secondary,
        Action::Skill1,
        Action::Skill2,
        Action::Skill3,
        Action::Prev,
        Action::Next,
        Action::Confirm,
        Action::Restart,
        Action::Back,
        Action::Special,
    ];

    /// Short key hint shown in demo HUDs
    pub fn key_hint(&self) -> &'static str {
        match self {
            Action::Up => "W/Up",
            Action::Down => "S/Down",
            Action::Left => "A/Left",
            Action::Right => "D/Right",
            Action::Primary => "Space",
            Action::Secondary => "Shift",
            Action::Skill1 => "1",
            Action::Skill2 => "2",
            Action::Skill3 => "3",
            Action::Prev => "Q",
            Action::Next => "E",
            Action::Confirm => "Enter",
            Action::Restart => "R",
            Action::Back => "Esc",
            Action::Special => "H/N",
        }
    }
}
