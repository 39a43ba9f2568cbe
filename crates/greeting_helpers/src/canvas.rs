//! Replays the confetti draw list as Bevy entities.
//!
//! The engine draws in canvas space: backing pixels, origin top-left, y down, clockwise
//! rotations. Bevy's 2D camera looks at logical pixels centred on the origin with y up, so
//! every command goes through [`CanvasTransform`] before it becomes a sprite.

use std::sync::Arc;

use bevy::color::HexColorError;
use bevy::prelude::*;
use bevy::sprite::Anchor;
use bevy::utils::{HashMap, HashSet};
use bevy::window::PrimaryWindow;
use confetti::{DrawCommand, DrawList, SharedSurface};
use parking_lot::Mutex;
use thiserror::Error;

use crate::{GreetingFont, primary_viewport};

/// Confetti renders above everything the page spawns below this depth.
pub const CONFETTI_Z: f32 = 10.0;
const Z_STEP: f32 = 1e-4;

pub type CanvasList = DrawList<Handle<Image>>;

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Invalid confetti colour {color:?}: {source}")]
    InvalidColor {
        color: String,
        source: HexColorError,
    },
}

/// Surface the confetti frame loop draws into.
#[derive(Resource, Clone)]
pub struct ConfettiCanvas(pub SharedSurface<CanvasList>);

impl Default for ConfettiCanvas {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Some(CanvasList::default()))))
    }
}

impl ConfettiCanvas {
    /// Commands recorded since the last call. Empty when no frame ran or no list is attached.
    pub fn take_frame(&self) -> Vec<DrawCommand<Handle<Image>>> {
        self.0
            .lock()
            .as_mut()
            .map(CanvasList::take_commands)
            .unwrap_or_default()
    }
}

#[derive(Component)]
pub struct ConfettiSprite;

/// Shared ellipse mesh plus one material per confetti colour.
#[derive(Resource)]
pub struct CanvasPalette {
    unit_circle: Handle<Mesh>,
    materials: HashMap<String, Handle<ColorMaterial>>,
    rejected: HashSet<String>,
}

impl FromWorld for CanvasPalette {
    fn from_world(world: &mut World) -> Self {
        let unit_circle = world.resource_mut::<Assets<Mesh>>().add(Circle::new(1.0));
        Self {
            unit_circle,
            materials: HashMap::default(),
            rejected: HashSet::default(),
        }
    }
}

impl CanvasPalette {
    fn material(
        &mut self,
        color: &str,
        materials: &mut Assets<ColorMaterial>,
    ) -> Result<Handle<ColorMaterial>, PaintError> {
        if let Some(material) = self.materials.get(color) {
            return Ok(material.clone());
        }

        let srgba = Srgba::hex(color).map_err(|source| PaintError::InvalidColor {
            color: color.to_owned(),
            source,
        })?;
        let material = materials.add(ColorMaterial::from(Color::Srgba(srgba)));
        self.materials.insert(color.to_owned(), material.clone());
        Ok(material)
    }

    /// Logs each bad colour once rather than every frame.
    fn reject(&mut self, color: &str, error: &PaintError) {
        if self.rejected.insert(color.to_owned()) {
            warn!("{error}");
        }
    }
}

/// Maps canvas coordinates onto the 2D camera's world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub device_pixel_ratio: f32,
    /// Logical size of the visible area.
    pub size: Vec2,
}

impl CanvasTransform {
    pub fn point(&self, canvas: Vec2) -> Vec2 {
        let logical = canvas / self.device_pixel_ratio;
        Vec2::new(logical.x - self.size.x / 2.0, self.size.y / 2.0 - logical.y)
    }

    pub fn length(&self, canvas: f32) -> f32 {
        canvas / self.device_pixel_ratio
    }

    pub fn rotation(&self, canvas_radians: f32) -> Quat {
        Quat::from_rotation_z(-canvas_radians)
    }

    fn transform(&self, center: Vec2, rotation: f32, z: f32) -> Transform {
        Transform::from_translation(self.point(center).extend(z))
            .with_rotation(self.rotation(rotation))
    }
}

pub fn present_confetti_canvas(
    mut commands: Commands,
    canvas: Res<ConfettiCanvas>,
    sprites: Query<Entity, With<ConfettiSprite>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    font: Res<GreetingFont>,
    mut palette: ResMut<CanvasPalette>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let frame = canvas.take_frame();
    if frame.is_empty() {
        return;
    }

    let viewport = primary_viewport(&windows);
    let to_world = CanvasTransform {
        device_pixel_ratio: viewport.device_pixel_ratio,
        size: Vec2::new(viewport.width, viewport.height),
    };

    for (index, command) in frame.into_iter().enumerate() {
        let z = (index as f32).mul_add(Z_STEP, CONFETTI_Z);

        match command {
            DrawCommand::Clear { .. } => {
                for entity in &sprites {
                    commands.entity(entity).despawn();
                }
            }
            DrawCommand::Ellipse {
                center,
                radii,
                rotation,
                color,
            } => {
                let material = match palette.material(&color, &mut materials) {
                    Ok(material) => material,
                    Err(error) => {
                        palette.reject(&color, &error);
                        continue;
                    }
                };

                let radii = radii / to_world.device_pixel_ratio;
                commands.spawn((
                    Mesh2d(palette.unit_circle.clone()),
                    MeshMaterial2d(material),
                    to_world
                        .transform(center, rotation, z)
                        .with_scale(radii.extend(1.0)),
                    ConfettiSprite,
                ));
            }
            DrawCommand::Image {
                image,
                center,
                size,
                rotation,
            } => {
                commands.spawn((
                    Sprite {
                        image,
                        custom_size: Some(size / to_world.device_pixel_ratio),
                        ..default()
                    },
                    to_world.transform(center, rotation, z),
                    ConfettiSprite,
                ));
            }
            DrawCommand::Text {
                text,
                center,
                font_px,
                rotation,
                baseline_offset,
            } => {
                // Text sits on a baseline below the particle centre, in the rotated frame
                let baseline =
                    center + Vec2::from_angle(rotation).rotate(Vec2::new(0.0, baseline_offset));
                commands.spawn((
                    Text2d::new(text),
                    TextFont {
                        font: font.0.clone(),
                        font_size: to_world.length(font_px),
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Anchor::BottomCenter,
                    to_world.transform(baseline, rotation, z),
                    ConfettiSprite,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use confetti::DrawSurface;

    use super::*;

    fn hidpi() -> CanvasTransform {
        CanvasTransform {
            device_pixel_ratio: 2.0,
            size: Vec2::new(800.0, 600.0),
        }
    }

    #[test]
    fn canvas_corners_map_to_world_corners() {
        let to_world = hidpi();
        assert_eq!(to_world.point(Vec2::ZERO), Vec2::new(-400.0, 300.0), "top left");
        assert_eq!(
            to_world.point(Vec2::new(1600.0, 1200.0)),
            Vec2::new(400.0, -300.0),
            "bottom right"
        );
        assert_eq!(to_world.point(Vec2::new(800.0, 600.0)), Vec2::ZERO, "centre");
    }

    #[test]
    fn lengths_are_converted_to_logical_pixels() {
        assert!((hidpi().length(12.0) - 6.0).abs() < f32::EPSILON, "halved");
    }

    #[test]
    fn clockwise_canvas_rotation_is_counter_clockwise_in_world() {
        let rotated = hidpi().rotation(FRAC_PI_2) * Vec3::X;
        // A quarter turn clockwise on screen points the x axis down
        assert!((rotated - Vec3::NEG_Y).length() < 1e-6, "got {rotated}");
    }

    #[test]
    fn frames_are_drained_once() {
        let canvas = ConfettiCanvas::default();
        if let Some(list) = canvas.0.lock().as_mut() {
            list.fill_ellipse(Vec2::ONE, Vec2::ONE, 0.0, "#fff");
        }
        assert_eq!(canvas.take_frame().len(), 1, "recorded command");
        assert!(canvas.take_frame().is_empty(), "drained");

        *canvas.0.lock() = None;
        assert!(canvas.take_frame().is_empty(), "detached");
    }

    #[test]
    fn glyphs_are_set_in_the_greeting_font() {
        let font = Handle::<Font>::weak_from_u128(0x5eed);
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ColorMaterial>>()
            .init_resource::<ConfettiCanvas>()
            .init_resource::<CanvasPalette>()
            .insert_resource(GreetingFont(font.clone()))
            .add_systems(Update, present_confetti_canvas);

        if let Some(list) = app.world().resource::<ConfettiCanvas>().0.lock().as_mut() {
            list.fill_text("\u{2764}", Vec2::new(100.0, 100.0), 24.0, 0.0, 3.0);
        }
        app.update();

        let glyphs: Vec<(String, Handle<Font>, f32)> = app
            .world_mut()
            .query_filtered::<(&Text2d, &TextFont), With<ConfettiSprite>>()
            .iter(app.world())
            .map(|(text, text_font)| (text.0.clone(), text_font.font.clone(), text_font.font_size))
            .collect();
        match glyphs.as_slice() {
            [(text, glyph_font, font_size)] => {
                assert_eq!(text, "\u{2764}", "glyph text");
                assert_eq!(*glyph_font, font, "greeting font");
                assert!((font_size - 24.0).abs() < f32::EPSILON, "logical font size");
            }
            other => panic!("expected one glyph, got {other:?}"),
        }
    }

    #[test]
    fn invalid_colours_are_reported() {
        let mut materials = Assets::<ColorMaterial>::default();
        let mut palette = CanvasPalette {
            unit_circle: Handle::default(),
            materials: HashMap::default(),
            rejected: HashSet::default(),
        };

        assert!(palette.material("#fcf403", &mut materials).is_ok(), "hex colour");
        assert!(palette.material("#fff", &mut materials).is_ok(), "short hex colour");
        assert!(
            matches!(
                palette.material("tomato", &mut materials),
                Err(PaintError::InvalidColor { .. })
            ),
            "named colours are not supported"
        );
        assert_eq!(palette.materials.len(), 2, "valid colours cached");
    }
}
