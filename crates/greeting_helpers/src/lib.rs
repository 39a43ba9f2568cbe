mod app;
pub use app::*;

pub mod canvas;
pub mod confetti;
pub mod icons;

mod window_resizing;
