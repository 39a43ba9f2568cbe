use bevy::log::{debug, trace};
use bevy::math::Vec2;
use fastrand::Rng;
use strum::IntoEnumIterator;

use crate::config::ConfettiConfig;
use crate::icon::IconHandle;
use crate::particle::{Direction, Launch, Particle};
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No surface was attached; nothing moved.
    Skipped,
    Rendered { live: usize, culled: usize },
}

/// The live confetti and the clock driving it.
#[derive(Debug, Clone)]
pub struct ParticleField<I> {
    particles: Vec<Particle<I>>,
    viewport: Viewport,
    last_update_ms: f64,
}

impl<I> ParticleField<I> {
    pub const fn new(viewport: Viewport, now_ms: f64) -> Self {
        Self {
            particles: Vec::new(),
            viewport,
            last_update_ms: now_ms,
        }
    }

    /// Launches one batch: half the particles from the left edge heading right, half from
    /// the right edge heading left, both at 5/7 of the viewport height.
    pub fn spawn_batch(
        &mut self,
        rng: &mut Rng,
        config: &ConfettiConfig,
        icon: Option<&IconHandle<I>>,
        now_ms: f64,
    ) -> usize {
        let colors = config.resolved_colors();
        let per_origin = config.per_origin();
        let before = self.particles.len();

        for direction in Direction::iter() {
            let launch = Launch {
                origin: self.origin(direction),
                direction,
                radius: config.resolved_radius(),
                colors: &colors,
                emojis: &config.emojis,
                icon,
                scale: self.viewport.scale_factor(),
            };

            self.particles.reserve(per_origin);
            for _ in 0..per_origin {
                self.particles.push(Particle::launch(rng, &launch, now_ms));
            }
            debug!("Launched {per_origin} confetti particles heading {direction}");
        }

        self.particles.len() - before
    }

    /// Streams heading right start on the left edge and vice versa.
    pub fn origin(&self, direction: Direction) -> Vec2 {
        let origin_y = self.viewport.origin_height();
        match direction {
            Direction::Right => Vec2::new(0.0, origin_y),
            Direction::Left => Vec2::new(self.viewport.width, origin_y),
        }
    }

    /// Runs one frame: update, draw and cull every particle.
    ///
    /// The clock advances even when `surface` is missing so that reattaching a surface
    /// does not produce one huge step.
    pub fn frame<S>(&mut self, surface: Option<&mut S>, now_ms: f64) -> FrameOutcome
    where
        S: DrawSurface<Image = I> + ?Sized,
    {
        let delta_ms = (now_ms - self.last_update_ms) as f32;
        self.last_update_ms = now_ms;

        let Some(surface) = surface else {
            trace!("No confetti surface attached, skipping frame");
            return FrameOutcome::Skipped;
        };

        surface.clear();

        let device_pixel_ratio = self.viewport.device_pixel_ratio;
        let height = self.viewport.height;
        let before = self.particles.len();

        self.particles.retain_mut(|particle| {
            particle.update(delta_ms, now_ms);
            particle.draw(&mut *surface, device_pixel_ratio);
            particle.is_visible(height)
        });

        let live = self.particles.len();
        FrameOutcome::Rendered {
            live,
            culled: before - live,
        }
    }

    /// Particles keep their logical positions; only the draw scale changes.
    pub const fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle<I>] {
        &self.particles
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn last_update_ms(&self) -> f64 {
        self.last_update_ms
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::UVec2;

    use super::*;
    use crate::surface::{DrawCommand, DrawList};

    const NOW: f64 = 5_000.0;

    fn field_with(count: usize) -> ParticleField<u32> {
        let mut field = ParticleField::new(Viewport::new(800.0, 700.0, 2.0), NOW);
        let config = ConfettiConfig {
            count,
            ..Default::default()
        };
        field.spawn_batch(&mut Rng::with_seed(21), &config, None, NOW);
        field
    }

    #[test]
    fn batch_splits_evenly_between_origins() {
        let field = field_with(10);
        assert_eq!(field.len(), 10, "whole batch spawned");

        let heading_right: Vec<_> = field
            .particles()
            .iter()
            .filter(|particle| particle.direction() == Direction::Right)
            .collect();
        let heading_left: Vec<_> = field
            .particles()
            .iter()
            .filter(|particle| particle.direction() == Direction::Left)
            .collect();

        assert_eq!(heading_right.len(), 5, "left origin stream");
        assert_eq!(heading_left.len(), 5, "right origin stream");
        assert!(
            heading_right.iter().all(|particle| particle.position().x <= 0.0),
            "launched from the left edge"
        );
        assert!(
            heading_left.iter().all(|particle| particle.position().x >= 800.0),
            "launched from the right edge"
        );
        assert!(
            field
                .particles()
                .iter()
                .all(|particle| particle.position().y >= 500.0),
            "launched at or below 5/7 of the height"
        );
    }

    #[test]
    fn every_direction_launches_from_its_own_edge() {
        let field = field_with(4);
        for direction in Direction::iter() {
            let origin = field.origin(direction);
            assert!((origin.y - 500.0).abs() < f32::EPSILON, "5/7 of the height");

            let stream = field
                .particles()
                .iter()
                .filter(|particle| particle.direction() == direction)
                .count();
            assert_eq!(stream, 2, "{direction} stream");
        }
        assert!(field.origin(Direction::Right).x.abs() < f32::EPSILON, "left edge");
        assert!((field.origin(Direction::Left).x - 800.0).abs() < f32::EPSILON, "right edge");
    }

    #[test]
    fn zero_count_spawns_nothing() {
        assert!(field_with(0).is_empty(), "empty batch");
    }

    #[test]
    fn missing_surface_skips_the_frame() {
        let mut field = field_with(10);
        let before: Vec<_> = field.particles().iter().map(Particle::position).collect();

        let outcome = field.frame::<DrawList<u32>>(None, NOW + 16.0);
        assert_eq!(outcome, FrameOutcome::Skipped, "skipped");
        assert!((field.last_update_ms() - (NOW + 16.0)).abs() < f64::EPSILON, "clock moved");

        let after: Vec<_> = field.particles().iter().map(Particle::position).collect();
        assert_eq!(before, after, "nothing moved");
    }

    #[test]
    fn frames_clear_then_draw_every_particle() {
        let mut field = field_with(10);
        let mut surface = DrawList::new(UVec2::new(1600, 1400));

        let outcome = field.frame(Some(&mut surface), NOW + 16.0);
        assert_eq!(outcome, FrameOutcome::Rendered { live: 10, culled: 0 }, "all live");

        let commands = surface.take_commands();
        assert_eq!(commands.len(), 11, "clear plus one ellipse each");
        assert!(
            matches!(commands.first(), Some(DrawCommand::Clear { .. })),
            "cleared first"
        );
    }

    #[test]
    fn particles_are_culled_once_below_the_viewport() {
        let mut field = field_with(20);
        let mut surface = DrawList::new(UVec2::new(1600, 1400));
        let mut now = NOW;
        let mut culled = 0;

        for _ in 0..2_000 {
            now += 16.0;
            if let FrameOutcome::Rendered { culled: this_frame, .. } =
                field.frame(Some(&mut surface), now)
            {
                culled += this_frame;
            }
            if field.is_empty() {
                break;
            }
        }

        assert!(field.is_empty(), "every particle fell out of view");
        assert_eq!(culled, 20, "each culled exactly once");
    }

    #[test]
    fn resizing_keeps_logical_positions() {
        let mut field = field_with(10);
        let before: Vec<_> = field.particles().iter().map(Particle::position).collect();

        field.resize(Viewport::new(1200.0, 900.0, 1.0));

        let after: Vec<_> = field.particles().iter().map(Particle::position).collect();
        assert_eq!(before, after, "positions unchanged");
        assert!((field.viewport().width - 1200.0).abs() < f32::EPSILON, "viewport updated");
    }
}
