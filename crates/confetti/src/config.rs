use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Engine constants
pub mod constants {
    pub const DEFAULT_COUNT: usize = 250;
    pub const DEFAULT_RADIUS: f32 = 6.0;
    pub const DEFAULT_COLORS: [&str; 8] = [
        "#fcf403", "#62fc03", "#f4fc03", "#03e7fc", "#03fca5", "#a503fc", "#fc03ad", "#fc03c2",
    ];

    // Launch origins sit at 5/7 of the viewport height
    pub const ORIGIN_HEIGHT_RATIO: f32 = 5.0 / 7.0;

    // Particles are culled once they fall this far below the viewport
    pub const CULL_MARGIN: f32 = 100.0;

    // Half of the 0.00125 px/ms² gravity term
    pub const HALF_GRAVITY: f32 = 0.000625;

    pub const ROTATION_DECAY: f32 = 1e-5;
    pub const SPINNING_ROTATION_SPEED: f32 = 0.01;
}

/// Configuration handed to the confetti controller by its host.
///
/// Every field is optional on the wire; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfettiConfig {
    /// Total number of particles, split between the two launch origins.
    pub count: usize,
    pub radius: f32,
    pub colors: Vec<String>,
    /// When non-empty, particles draw a random glyph instead of a colour.
    pub emojis: Vec<String>,
    /// When set, every particle draws this image. Takes precedence over emojis.
    pub icon_source: Option<String>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            count: constants::DEFAULT_COUNT,
            radius: constants::DEFAULT_RADIUS,
            colors: default_colors(),
            emojis: Vec::new(),
            icon_source: None,
        }
    }
}

impl ConfettiConfig {
    /// Particles launched from each of the two origins.
    pub const fn per_origin(&self) -> usize {
        self.count.div_ceil(2)
    }

    pub fn resolved_radius(&self) -> f32 {
        if self.radius.is_finite() && self.radius > 0.0 {
            self.radius
        } else {
            constants::DEFAULT_RADIUS
        }
    }

    pub fn resolved_colors(&self) -> Vec<String> {
        if self.colors.is_empty() {
            default_colors()
        } else {
            self.colors.clone()
        }
    }

    pub fn resolved_icon_source(&self) -> Option<&str> {
        self.icon_source.as_deref().filter(|source| !source.is_empty())
    }
}

fn default_colors() -> Vec<String> {
    constants::DEFAULT_COLORS
        .iter()
        .map(ToString::to_string)
        .collect()
}
