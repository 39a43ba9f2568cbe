use core::ops::ControlFlow;
use std::sync::Arc;

use bevy::log::info;
use fastrand::Rng;
use parking_lot::Mutex;

use crate::config::ConfettiConfig;
use crate::field::ParticleField;
use crate::icon::IconLoader;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

/// Drawable surface shared between a host and the frame loop. `None` while detached.
pub type SharedSurface<S> = Arc<Mutex<Option<S>>>;

/// A mounted confetti animation.
///
/// Mounting launches a single batch and starts a frame loop on the scheduler. The loop runs
/// until [`ConfettiController::unmount`], even after every particle has been culled.
pub struct ConfettiController<S: DrawSurface> {
    field: Arc<Mutex<ParticleField<S::Image>>>,
    surface: SharedSurface<S>,
    handle: FrameHandle,
}

impl<S> ConfettiController<S>
where
    S: DrawSurface + Send + 'static,
    S::Image: Send + Sync + 'static,
{
    pub fn mount<L>(
        config: &ConfettiConfig,
        viewport: Viewport,
        surface: SharedSurface<S>,
        scheduler: &mut FrameScheduler,
        icons: &mut L,
        now_ms: f64,
    ) -> Self
    where
        L: IconLoader<Image = S::Image> + ?Sized,
    {
        Self::mount_with_rng(
            &mut Rng::new(),
            config,
            viewport,
            surface,
            scheduler,
            icons,
            now_ms,
        )
    }

    pub fn mount_with_rng<L>(
        rng: &mut Rng,
        config: &ConfettiConfig,
        viewport: Viewport,
        surface: SharedSurface<S>,
        scheduler: &mut FrameScheduler,
        icons: &mut L,
        now_ms: f64,
    ) -> Self
    where
        L: IconLoader<Image = S::Image> + ?Sized,
    {
        if let Some(surface) = surface.lock().as_mut() {
            surface.resize(viewport.backing_size());
        }

        let icon = config.resolved_icon_source().map(|source| icons.load(source));

        let mut field = ParticleField::new(viewport, now_ms);
        let spawned = field.spawn_batch(rng, config, icon.as_ref(), now_ms);
        let field = Arc::new(Mutex::new(field));

        let handle = scheduler.start({
            let field = Arc::clone(&field);
            let surface = Arc::clone(&surface);
            move |now_ms| {
                let mut surface = surface.lock();
                field.lock().frame(surface.as_mut(), now_ms);
                ControlFlow::Continue(())
            }
        });

        info!(
            "Confetti mounted with {spawned} particles on a {}x{} viewport",
            viewport.width, viewport.height
        );

        Self {
            field,
            surface,
            handle,
        }
    }

    /// Updates the surface backing resolution. Particle positions are left alone.
    pub fn resize(&self, viewport: Viewport) {
        if let Some(surface) = self.surface.lock().as_mut() {
            surface.resize(viewport.backing_size());
        }
        self.field.lock().resize(viewport);
    }

    /// Stops the frame loop and drops every particle.
    pub fn unmount(self, scheduler: &mut FrameScheduler) -> bool {
        let stopped = scheduler.stop(self.handle);
        self.field.lock().clear();
        if let Some(surface) = self.surface.lock().as_mut() {
            surface.clear();
        }
        info!("Confetti unmounted");
        stopped
    }

    pub fn live_particles(&self) -> usize {
        self.field.lock().len()
    }

    pub const fn handle(&self) -> FrameHandle {
        self.handle
    }

    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField<S::Image>) -> R) -> R {
        f(&self.field.lock())
    }
}
