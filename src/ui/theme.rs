//! UI Theme - Shared colors and styling constants
//!
//! Centralized color definitions so the menu and every demo HUD look alike.

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Dark background color
pub const BG_COLOR: Color = Color::new(0.10, 0.10, 0.12, 1.0);

/// Header/toolbar background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.6, 0.6, 0.65, 1.0);

/// Titles and selection
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Panel behind HUD text and menu rows
pub const PANEL_BG: Color = Color::new(0.0, 0.0, 0.0, 0.55);

/// Highlighted/selected row
pub const ROW_HIGHLIGHT: Color = Color::new(0.2, 0.25, 0.3, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_TITLE: f32 = 32.0;

pub const FONT_SIZE_HEADER: f32 = 20.0;

pub const FONT_SIZE_CONTENT: f32 = 16.0;

pub const FONT_SIZE_SMALL: f32 = 13.0;

// =============================================================================
// Health bar segments
// =============================================================================

pub const HEALTH_HIGH: Color = Color::new(0.2, 0.85, 0.3, 1.0);
pub const HEALTH_MID: Color = Color::new(0.95, 0.85, 0.2, 1.0);
pub const HEALTH_LOW: Color = Color::new(1.0, 0.55, 0.1, 1.0);
pub const HEALTH_CRITICAL: Color = Color::new(0.9, 0.15, 0.15, 1.0);

/// Empty health segment
pub const HEALTH_EMPTY: Color = Color::new(0.25, 0.25, 0.28, 1.0);

// =============================================================================
// Gameplay colors
// =============================================================================

pub const PLAYER_COLOR: Color = Color::new(0.3, 0.6, 1.0, 1.0);
pub const ENEMY_COLOR: Color = Color::new(0.9, 0.25, 0.25, 1.0);
pub const GHOST_COLOR: Color = Color::new(0.7, 0.7, 1.0, 0.5);
pub const PLATFORM_COLOR: Color = Color::new(0.45, 0.35, 0.25, 1.0);
pub const COIN_COLOR: Color = Color::new(1.0, 0.85, 0.1, 1.0);
pub const WALL_COLOR: Color = Color::new(0.5, 0.5, 0.55, 1.0);
pub const GOAL_COLOR: Color = Color::new(0.2, 0.9, 0.4, 1.0);

/// Cooldown overlay and "not ready" bar
pub const COOLDOWN_COLOR: Color = Color::new(0.9, 0.2, 0.2, 1.0);

/// "Ready" bar
pub const READY_COLOR: Color = Color::new(0.2, 0.9, 0.3, 1.0);
