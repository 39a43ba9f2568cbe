//! The 2D drawing contract the engine renders through.
//!
//! Coordinates handed to a surface are in backing pixels: origin top-left, y pointing down,
//! rotations in radians clockwise.

use bevy::math::{UVec2, Vec2};

pub trait DrawSurface {
    type Image;

    /// Backing resolution in pixels.
    fn size(&self) -> UVec2;

    fn resize(&mut self, size: UVec2);

    fn clear_rect(&mut self, origin: Vec2, size: Vec2);

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: &str);

    fn draw_image(&mut self, image: &Self::Image, center: Vec2, size: Vec2, rotation: f32);

    /// Draws `text` horizontally centred on `center`, its baseline `baseline_offset` below it.
    fn fill_text(
        &mut self,
        text: &str,
        center: Vec2,
        font_px: f32,
        rotation: f32,
        baseline_offset: f32,
    );

    fn clear(&mut self) {
        self.clear_rect(Vec2::ZERO, self.size().as_vec2());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<I> {
    Clear {
        origin: Vec2,
        size: Vec2,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: String,
    },
    Image {
        image: I,
        center: Vec2,
        size: Vec2,
        rotation: f32,
    },
    Text {
        text: String,
        center: Vec2,
        font_px: f32,
        rotation: f32,
        baseline_offset: f32,
    },
}

/// Surface that records draw calls so they can be replayed by a retained-mode renderer.
#[derive(Debug, Clone)]
pub struct DrawList<I> {
    size: UVec2,
    commands: Vec<DrawCommand<I>>,
}

impl<I> Default for DrawList<I> {
    fn default() -> Self {
        Self {
            size: UVec2::ZERO,
            commands: Vec::new(),
        }
    }
}

impl<I> DrawList<I> {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand<I>] {
        &self.commands
    }

    /// Hands over everything recorded since the last call.
    pub fn take_commands(&mut self) -> Vec<DrawCommand<I>> {
        core::mem::take(&mut self.commands)
    }
}

impl<I: Clone> DrawSurface for DrawList<I> {
    type Image = I;

    fn size(&self) -> UVec2 {
        self.size
    }

    fn resize(&mut self, size: UVec2) {
        self.size = size;
    }

    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        // A full clear makes everything recorded before it invisible
        if origin == Vec2::ZERO && size.cmpge(self.size.as_vec2()).all() {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear { origin, size });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: &str) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            rotation,
            color: color.to_owned(),
        });
    }

    fn draw_image(&mut self, image: &I, center: Vec2, size: Vec2, rotation: f32) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            center,
            size,
            rotation,
        });
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Vec2,
        font_px: f32,
        rotation: f32,
        baseline_offset: f32,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            center,
            font_px,
            rotation,
            baseline_offset,
        });
    }
}
