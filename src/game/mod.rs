//! Game Foundation Module
//!
//! The small set of primitives every demo is built from. Each demo is a
//! self-contained `Scene`; nothing here knows about any particular demo.
//!
//! Key concepts:
//! - Scene: lifecycle hooks (preload, create, update, draw)
//! - Timers/Cooldown: one-shot delayed events and elapsed-time gates
//! - ThresholdCounter: count events, fire once at a limit
//! - Lcg: seeded, reproducible pseudo-random numbers
//! - Body: position/velocity box with world-bound clamping
//! - Signals: debug state and structured event lines
//!
//! Design philosophy:
//! - Plain data, no callbacks holding references into the scene
//! - Logic is testable without a window; only `draw`/`preload` touch the GPU

pub mod ai;
pub mod body;
pub mod camera;
pub mod counter;
pub mod health;
pub mod particles;
pub mod rng;
pub mod scene;
pub mod signals;
pub mod texture;
pub mod timer;

// Re-export main types
pub use ai::{AiState, PatrolChase, PatrolChaseConfig};
pub use body::{Body, Bounds};
pub use camera::CameraShake;
pub use counter::ThresholdCounter;
pub use health::Health;
pub use particles::{EmitterDef, ParticleEmitter, ParticlePool};
pub use rng::Lcg;
pub use scene::{Scene, SceneCommand, SceneContext, SceneFactory, SceneRunner};
pub use signals::Signals;
pub use texture::TextureCache;
pub use timer::{Cooldown, TimerHandle, Timers};
