//! Immediate-mode UI helpers for the menu and demo HUDs
//!
//! - Theme colors and font sizes
//! - HUD widgets: segmented health bar, cooldown bar/overlay, text panels

pub mod hud;
mod theme;

pub use theme::*;
