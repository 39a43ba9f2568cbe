use bevy::math::UVec2;

use crate::config::constants::ORIGIN_HEIGHT_RATIO;

const REFERENCE_WIDTH: f32 = 1920.0;

/// Visible area in logical pixels, plus the display's pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Keeps speeds proportionate across screen sizes, 1.0 on a 1920px wide viewport.
    pub fn scale_factor(&self) -> f32 {
        self.width.max(1.0).ln() / REFERENCE_WIDTH.ln()
    }

    /// Resolution of the drawable surface backing this viewport.
    pub fn backing_size(&self) -> UVec2 {
        UVec2::new(
            (self.width * self.device_pixel_ratio).round().max(0.0) as u32,
            (self.height * self.device_pixel_ratio).round().max(0.0) as u32,
        )
    }

    pub fn origin_height(&self) -> f32 {
        ORIGIN_HEIGHT_RATIO * self.height
    }
}
