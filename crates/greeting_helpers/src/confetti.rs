use std::sync::Arc;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use confetti::{ConfettiConfig, ConfettiController, FrameHandle, FrameScheduler, Viewport};

use crate::canvas::{CanvasList, CanvasPalette, ConfettiCanvas, present_confetti_canvas};
use crate::icons::{AssetIconLoader, PendingIcons, resolve_pending_icons};
use crate::{GreetingFont, primary_viewport};

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum ConfettiSystemSet {
    Prepare,
    Run,
    Present,
}

/// Drives mounted confetti from Bevy's frame loop and renders it with 2D entities.
///
/// Mounting and unmounting is left to the page, see [`mount_confetti`] and [`unmount_confetti`].
/// Pages should mount from `Update` so the window already has the browser's size.
pub struct ConfettiPlugin;

impl Plugin for ConfettiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfettiConfig>()
            .init_resource::<FrameScheduler>()
            .init_resource::<ConfettiCanvas>()
            .init_resource::<ActiveConfetti>()
            .init_resource::<PendingIcons>()
            .init_resource::<CanvasPalette>()
            .init_resource::<GreetingFont>()
            .configure_sets(
                Update,
                (
                    ConfettiSystemSet::Prepare,
                    ConfettiSystemSet::Run.after(ConfettiSystemSet::Prepare),
                    ConfettiSystemSet::Present.after(ConfettiSystemSet::Run),
                ),
            )
            .add_systems(
                Update,
                (resolve_pending_icons, track_viewport).in_set(ConfettiSystemSet::Prepare),
            )
            .add_systems(Update, run_frame_loops.in_set(ConfettiSystemSet::Run))
            .add_systems(
                Update,
                present_confetti_canvas.in_set(ConfettiSystemSet::Present),
            );
    }
}

/// The currently mounted confetti animation, if any.
#[derive(Resource, Default)]
pub struct ActiveConfetti(Option<ConfettiController<CanvasList>>);

impl ActiveConfetti {
    pub const fn is_mounted(&self) -> bool {
        self.0.is_some()
    }

    pub fn live_particles(&self) -> usize {
        self.0
            .as_ref()
            .map_or(0, ConfettiController::live_particles)
    }

    /// Frame loop of the mounted confetti.
    pub fn handle(&self) -> Option<FrameHandle> {
        self.0.as_ref().map(ConfettiController::handle)
    }

    /// Viewport the mounted confetti was launched into or last resized to.
    pub fn viewport(&self) -> Option<Viewport> {
        self.0
            .as_ref()
            .map(|controller| controller.with_field(|field| field.viewport()))
    }
}

/// Condition system that checks no confetti is mounted yet
pub fn confetti_unmounted(active: Res<ActiveConfetti>) -> bool {
    !active.is_mounted()
}

fn now_ms(time: &Time<Real>) -> f64 {
    time.elapsed().as_secs_f64() * 1000.0
}

fn run_frame_loops(mut scheduler: ResMut<FrameScheduler>, time: Res<Time<Real>>) {
    scheduler.run_frame(now_ms(&time));
}

fn track_viewport(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    active: Res<ActiveConfetti>,
) {
    if resized.is_empty() {
        return;
    }
    resized.clear();

    if let Some(controller) = &active.0 {
        controller.resize(primary_viewport(&windows));
    }
}

/// Launches a confetti batch sized to the primary window.
pub fn mount_confetti(
    config: Res<ConfettiConfig>,
    canvas: Res<ConfettiCanvas>,
    asset_server: Res<AssetServer>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time<Real>>,
    mut scheduler: ResMut<FrameScheduler>,
    mut pending: ResMut<PendingIcons>,
    mut active: ResMut<ActiveConfetti>,
) {
    if let Some(previous) = active.0.take() {
        warn!("Confetti was already mounted, replacing it");
        previous.unmount(&mut scheduler);
    }

    let mut icons = AssetIconLoader {
        asset_server: &asset_server,
        pending: &mut pending,
    };

    active.0 = Some(ConfettiController::mount(
        &config,
        primary_viewport(&windows),
        Arc::clone(&canvas.0),
        &mut scheduler,
        &mut icons,
        now_ms(&time),
    ));
}

/// Stops the confetti loop. Sprites from the last frame are removed on the next present.
pub fn unmount_confetti(
    mut scheduler: ResMut<FrameScheduler>,
    mut active: ResMut<ActiveConfetti>,
) {
    if let Some(controller) = active.0.take() {
        controller.unmount(&mut scheduler);
    }
}

#[cfg(test)]
mod tests {
    use core::ops::ControlFlow;

    use super::*;

    #[test]
    fn frame_loops_receive_real_time_in_milliseconds() {
        let mut app = App::new();
        app.init_resource::<Time<Real>>()
            .init_resource::<FrameScheduler>()
            .add_systems(Update, run_frame_loops);

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.world_mut()
            .resource_mut::<FrameScheduler>()
            .start(move |now| {
                sink.lock().push(now);
                ControlFlow::Continue(())
            });

        app.update();
        app.update();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2, "called once per update");
        assert!(seen.iter().all(|now| *now >= 0.0), "non-negative timestamps");
    }

    #[test]
    fn inactive_confetti_reports_nothing() {
        let active = ActiveConfetti::default();
        assert!(!active.is_mounted(), "nothing mounted");
        assert!(active.viewport().is_none(), "no viewport");
        assert!(active.handle().is_none(), "no frame loop");
        assert_eq!(active.live_particles(), 0, "no particles");
    }
}
