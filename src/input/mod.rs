//! Input handling with gamepad support
//!
//! Provides an action-based input system that works with keyboard/mouse
//! and (natively) gamepad controllers.
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: keyboard and pointer only

mod actions;
mod gamepad;
mod state;

pub use actions::*;
pub use state::*;
