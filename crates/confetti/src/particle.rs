//! A single piece of confetti.
//!
//! Everything random about a particle is drawn once, at launch, into [`SpawnParams`]. The
//! per-frame state lives in [`Kinematics`] and is stepped by [`Kinematics::advance`], which is
//! a pure function of the previous state, the launch parameters and the frame timing.

use core::f32::consts::TAU;

use bevy::math::Vec2;
use fastrand::Rng;
use strum::{Display, EnumIter};

use crate::config::constants::{
    CULL_MARGIN, DEFAULT_COLORS, HALF_GRAVITY, ROTATION_DECAY, SPINNING_ROTATION_SPEED,
};
use crate::icon::IconHandle;
use crate::random::{pick, random_in_range, random_rounded};
use crate::surface::DrawSurface;

/// Horizontal heading of a particle. Particles launched from the left edge head `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Launch angle range in degrees.
    const fn launch_degrees(self) -> (f32, f32) {
        match self {
            Self::Left => (82.0, 15.0),
            Self::Right => (-15.0, -82.0),
        }
    }

    const fn tilt_range(self) -> (f32, f32) {
        match self {
            Self::Left => (0.0, 0.2),
            Self::Right => (-0.2, 0.0),
        }
    }
}

/// What a particle looks like. Chosen at launch and never changed.
#[derive(Debug)]
pub enum Payload<I> {
    Color(String),
    Glyph(String),
    Icon(IconHandle<I>),
}

impl<I> Clone for Payload<I> {
    fn clone(&self) -> Self {
        match self {
            Self::Color(color) => Self::Color(color.clone()),
            Self::Glyph(glyph) => Self::Glyph(glyph.clone()),
            Self::Icon(icon) => Self::Icon(icon.clone()),
        }
    }
}

impl<I> Payload<I> {
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Color(color) => Some(color),
            Self::Glyph(_) | Self::Icon(_) => None,
        }
    }

    pub fn glyph(&self) -> Option<&str> {
        match self {
            Self::Glyph(glyph) => Some(glyph),
            Self::Color(_) | Self::Icon(_) => None,
        }
    }

    pub const fn icon(&self) -> Option<&IconHandle<I>> {
        match self {
            Self::Icon(icon) => Some(icon),
            Self::Color(_) | Self::Glyph(_) => None,
        }
    }

    /// Flat coloured pieces flip over while they fall; glyphs and icons only hold a spin.
    pub const fn tumbles(&self) -> bool {
        matches!(self, Self::Color(_))
    }
}

/// Inputs for launching one particle.
#[derive(Debug)]
pub struct Launch<'a, I> {
    pub origin: Vec2,
    pub direction: Direction,
    pub radius: f32,
    pub colors: &'a [String],
    pub emojis: &'a [String],
    pub icon: Option<&'a IconHandle<I>>,
    /// Viewport scale factor applied to speeds.
    pub scale: f32,
}

/// Parameters fixed for the lifetime of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub direction: Direction,
    /// Start position, the reference for the vertical arc.
    pub start: Vec2,
    pub base_speed: f32,
    /// Drag never slows the horizontal speed below this.
    pub final_speed_x: f32,
    pub drag: f32,
    pub rotation_speed: f32,
    pub abs_cos: f32,
    pub abs_sin: f32,
    pub initial_radius: f32,
    /// Ellipse rotation of coloured pieces.
    pub tilt: f32,
    /// Rotation of glyphs and icons.
    pub spin: f32,
    /// Launch timestamp in milliseconds.
    pub created_at: f64,
}

impl SpawnParams {
    pub fn draw(rng: &mut Rng, launch: &Launch<'_, impl Sized>, spins: bool, now_ms: f64) -> Self {
        let direction = launch.direction;

        let base_speed = random_rounded(rng, 0.9, 1.7, 3) * launch.scale;
        let final_speed_x = random_rounded(rng, 0.2, 0.6, 3);
        let rotation_speed = if spins {
            SPINNING_ROTATION_SPEED
        } else {
            random_rounded(rng, 0.03, 0.07, 3) * launch.scale
        };
        let drag = random_rounded(rng, 0.0005, 0.0009, 6);

        let (tilt_from, tilt_to) = direction.tilt_range();
        let tilt = random_rounded(rng, tilt_from, tilt_to, 3);
        let spin = random_in_range(rng, 0.0, TAU);

        let (angle_from, angle_to) = direction.launch_degrees();
        let angle = random_rounded(rng, angle_from, angle_to, 0).to_radians();
        let abs_cos = angle.cos().abs();
        let abs_sin = angle.sin().abs();

        // Spread the stream along its launch diagonal instead of a single point
        let offset = random_rounded(rng, -150.0, 0.0, 0);
        let start = Vec2::new(
            (direction.sign() * offset).mul_add(abs_cos, launch.origin.x),
            (-offset).mul_add(abs_sin, launch.origin.y),
        );

        Self {
            direction,
            start,
            base_speed,
            final_speed_x,
            drag,
            rotation_speed,
            abs_cos,
            abs_sin,
            initial_radius: launch.radius,
            tilt,
            spin,
            created_at: now_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusTrend {
    Shrinking,
    Growing,
}

/// State that changes every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub speed: Vec2,
    /// Ellipse radii; `y` oscillates between 0 and the initial radius.
    pub radius: Vec2,
    pub rotation_speed: f32,
    pub trend: RadiusTrend,
}

impl Kinematics {
    pub fn initial(params: &SpawnParams) -> Self {
        Self {
            position: params.start,
            speed: Vec2::splat(params.base_speed),
            radius: Vec2::splat(params.initial_radius),
            rotation_speed: params.rotation_speed,
            trend: RadiusTrend::Shrinking,
        }
    }

    /// Steps the state by `delta_ms`.
    ///
    /// Horizontal motion is integrated frame by frame. The vertical position is recomputed
    /// from the launch point and the time since launch, so the arc does not depend on how
    /// the elapsed time was split into frames. A non-positive or non-finite delta is a no-op.
    #[must_use]
    pub fn advance(self, params: &SpawnParams, tumbles: bool, delta_ms: f32, now_ms: f64) -> Self {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return self;
        }

        let mut next = self;
        let elapsed = (now_ms - params.created_at) as f32;

        if next.speed.x > params.final_speed_x {
            next.speed.x = params
                .drag
                .mul_add(-delta_ms, next.speed.x)
                .max(params.final_speed_x);
        }

        next.position.x += next.speed.x * params.direction.sign() * params.abs_cos * delta_ms;
        next.position.y = HALF_GRAVITY.mul_add(
            elapsed * elapsed,
            (-next.speed.y * params.abs_sin).mul_add(elapsed, params.start.y),
        );

        if tumbles {
            next.tumble(params.initial_radius, delta_ms);
        }

        next
    }

    fn tumble(&mut self, initial_radius: f32, delta_ms: f32) {
        self.rotation_speed = ROTATION_DECAY
            .mul_add(-delta_ms, self.rotation_speed)
            .max(0.0);
        let step = delta_ms * self.rotation_speed;

        match self.trend {
            RadiusTrend::Shrinking => {
                self.radius.y -= step;
                if self.radius.y <= 0.0 {
                    self.radius.y = 0.0;
                    self.trend = RadiusTrend::Growing;
                }
            }
            RadiusTrend::Growing => {
                self.radius.y += step;
                if self.radius.y >= initial_radius {
                    self.radius.y = initial_radius;
                    self.trend = RadiusTrend::Shrinking;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle<I> {
    params: SpawnParams,
    state: Kinematics,
    payload: Payload<I>,
}

impl<I> Particle<I> {
    pub fn new(params: SpawnParams, payload: Payload<I>) -> Self {
        Self {
            state: Kinematics::initial(&params),
            params,
            payload,
        }
    }

    /// Launches a particle with freshly drawn parameters.
    ///
    /// An icon wins over glyphs, and glyphs win over colours.
    pub fn launch(rng: &mut Rng, launch: &Launch<'_, I>, now_ms: f64) -> Self {
        let payload = if let Some(icon) = launch.icon {
            Payload::Icon(icon.clone())
        } else if let Some(glyph) = pick(rng, launch.emojis) {
            Payload::Glyph(glyph.clone())
        } else {
            let [fallback, ..] = DEFAULT_COLORS;
            let color = pick(rng, launch.colors).map_or(fallback, String::as_str);
            Payload::Color(color.to_owned())
        };

        let params = SpawnParams::draw(rng, launch, !payload.tumbles(), now_ms);
        Self::new(params, payload)
    }

    pub fn update(&mut self, delta_ms: f32, now_ms: f64) {
        self.state = self
            .state
            .advance(&self.params, self.payload.tumbles(), delta_ms, now_ms);
    }

    /// Draws the particle at its current position. Never changes the particle.
    pub fn draw<S>(&self, surface: &mut S, device_pixel_ratio: f32)
    where
        S: DrawSurface<Image = I> + ?Sized,
    {
        let Kinematics {
            position, radius, ..
        } = self.state;
        let center = position * device_pixel_ratio;

        match &self.payload {
            Payload::Icon(icon) => {
                icon.with_ready(|image| {
                    surface.draw_image(image, center, radius * 2.0, self.params.spin);
                });
            }
            Payload::Color(color) => {
                surface.fill_ellipse(center, radius * device_pixel_ratio, self.params.tilt, color);
            }
            Payload::Glyph(glyph) => {
                surface.fill_text(
                    glyph,
                    center,
                    radius.x * device_pixel_ratio,
                    self.params.spin,
                    radius.y / 2.0,
                );
            }
        }
    }

    /// False once the particle has fallen below the surface and the cull margin.
    pub fn is_visible(&self, surface_height: f32) -> bool {
        self.state.position.y < surface_height + CULL_MARGIN
    }

    pub const fn params(&self) -> &SpawnParams {
        &self.params
    }

    pub const fn state(&self) -> &Kinematics {
        &self.state
    }

    pub const fn payload(&self) -> &Payload<I> {
        &self.payload
    }

    pub const fn position(&self) -> Vec2 {
        self.state.position
    }

    pub const fn radius(&self) -> Vec2 {
        self.state.radius
    }

    pub const fn direction(&self) -> Direction {
        self.params.direction
    }
}
