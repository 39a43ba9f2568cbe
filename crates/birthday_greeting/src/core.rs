use bevy::prelude::*;

/// Lifecycle of the birthday overlay shown when the page opens
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum OverlayPhase {
    #[default]
    Showing,
    Leaving,
    Dismissed,
}

/// Counts down the current overlay phase
#[derive(Resource)]
pub struct OverlayTimer(pub Timer);

impl Default for OverlayTimer {
    fn default() -> Self {
        Self(Timer::new(config::DISPLAY_DURATION, TimerMode::Once))
    }
}

/// Overlay configuration constants
pub mod config {
    use core::time::Duration;

    use bevy::color::Color;

    pub const MESSAGE: &str = "Happy Birthday Fatini ";
    // The font has no grey heart emoji, so a plain heart is tinted instead
    pub const HEART: &str = "\u{2764}";
    pub const HEART_COLOR: Color = Color::srgb(0.75, 0.75, 0.78);
    pub const MESSAGE_FONT_SIZE: f32 = 60.0;

    // How long the overlay stays before sliding away
    pub const DISPLAY_DURATION: Duration = Duration::from_millis(5000);
    pub const SLIDE_DURATION: Duration = Duration::from_millis(1000);
    pub const MESSAGE_FADE_IN: Duration = Duration::from_millis(500);
}
