//! Confetti particle engine.
//!
//! Two streams of confetti are launched from the left and right edges of the viewport and
//! converge towards the centre before falling off the bottom of the screen. The engine owns
//! no window: hosts hand it a [`DrawSurface`] and pump a [`FrameScheduler`] once per repaint.

pub mod config;
pub mod controller;
pub mod field;
pub mod icon;
pub mod particle;
pub mod random;
pub mod scheduler;
pub mod surface;
pub mod viewport;

pub use config::ConfettiConfig;
pub use controller::{ConfettiController, SharedSurface};
pub use field::{FrameOutcome, ParticleField};
pub use icon::{IconHandle, IconLoader, IconState};
pub use particle::{Direction, Kinematics, Launch, Particle, Payload, RadiusTrend, SpawnParams};
pub use scheduler::{FrameHandle, FrameScheduler};
pub use surface::{DrawCommand, DrawList, DrawSurface};
pub use viewport::Viewport;
