use bevy::prelude::*;
use confetti::ConfettiConfig;
use greeting_helpers::confetti::{
    ActiveConfetti, ConfettiPlugin, ConfettiSystemSet, confetti_unmounted, mount_confetti,
    unmount_confetti,
};

mod core;
mod overlay;

pub use crate::core::OverlayPhase;
use crate::overlay::OverlayPlugin;

/// Entry point for the greeting page with the default confetti
pub fn run() {
    run_with(ConfettiConfig::default());
}

/// Entry point for the greeting page with confetti configured by the embedding page
pub fn run_with(config: ConfettiConfig) {
    let mut app = greeting_helpers::get_default_app(env!("CARGO_PKG_NAME"));

    app.insert_resource(config)
        .add_plugins(BirthdayGreetingPlugin)
        .add_systems(Startup, setup_camera);

    app.run();
}

/// The birthday overlay with confetti living exactly as long as it does.
pub struct BirthdayGreetingPlugin;

impl Plugin for BirthdayGreetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ConfettiPlugin, OverlayPlugin))
            // The initial OnEnter runs before the browser size reaches the window
            .add_systems(
                Update,
                mount_confetti
                    .run_if(in_state(OverlayPhase::Showing))
                    .run_if(confetti_unmounted)
                    .before(ConfettiSystemSet::Run),
            )
            .add_systems(
                OnEnter(OverlayPhase::Dismissed),
                (report_leftover_confetti, unmount_confetti).chain(),
            );
    }
}

/// Sets up the main 2D camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn report_leftover_confetti(active: Res<ActiveConfetti>) {
    debug!(
        "Dismissing overlay with {} confetti particles still in flight on {:?}",
        active.live_particles(),
        active.handle()
    );
}
