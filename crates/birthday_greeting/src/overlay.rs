use core::time::Duration;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use greeting_helpers::{GreetingFont, primary_viewport};

use crate::core::{OverlayPhase, OverlayTimer, config};

#[derive(Component)]
pub struct OverlayElement;

#[derive(Component)]
pub struct OverlayBackdrop;

#[derive(Component)]
pub struct OverlayMessage;

/// Full-screen birthday message that slides away on its own after a few seconds.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<OverlayPhase>()
            .init_resource::<OverlayTimer>()
            .init_resource::<GreetingFont>()
            .add_systems(OnEnter(OverlayPhase::Showing), spawn_overlay)
            .add_systems(
                Update,
                (count_down_overlay, fade_in_message)
                    .chain()
                    .run_if(in_state(OverlayPhase::Showing)),
            )
            .add_systems(OnEnter(OverlayPhase::Leaving), start_slide)
            .add_systems(
                Update,
                slide_overlay.run_if(in_state(OverlayPhase::Leaving)),
            )
            .add_systems(
                Update,
                fit_backdrop_to_window.run_if(not(in_state(OverlayPhase::Dismissed))),
            )
            .add_systems(OnEnter(OverlayPhase::Dismissed), despawn_overlay);
    }
}

/// Quadratic ease-out over `progress` in [0, 1].
pub fn ease_out(progress: f32) -> f32 {
    let remaining = 1.0 - progress.clamp(0.0, 1.0);
    remaining.mul_add(-remaining, 1.0)
}

pub fn message_alpha(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / config::MESSAGE_FADE_IN.as_secs_f32()).min(1.0)
}

/// How far the overlay has moved up after `progress` of its slide.
pub fn slide_offset(progress: f32, height: f32) -> f32 {
    ease_out(progress) * height
}

fn spawn_overlay(
    mut commands: Commands,
    mut timer: ResMut<OverlayTimer>,
    font: Res<GreetingFont>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = primary_viewport(&windows);
    let text_font = TextFont {
        font: font.0.clone(),
        font_size: config::MESSAGE_FONT_SIZE,
        ..default()
    };
    *timer = OverlayTimer::default();

    // Backdrop
    commands.spawn((
        Sprite::from_color(Color::BLACK, Vec2::new(viewport.width, viewport.height)),
        Transform::from_xyz(0.0, 0.0, 0.0),
        OverlayElement,
        OverlayBackdrop,
    ));

    // Message, faded in by `fade_in_message`
    commands
        .spawn((
            Text2d::new(config::MESSAGE),
            text_font.clone(),
            TextColor(Color::WHITE.with_alpha(0.0)),
            TextLayout::new_with_justify(JustifyText::Center),
            Transform::from_xyz(0.0, 0.0, 1.0),
            OverlayElement,
            OverlayMessage,
        ))
        .with_children(|parent| {
            parent.spawn((
                TextSpan::new(config::HEART),
                text_font,
                TextColor(config::HEART_COLOR.with_alpha(0.0)),
                OverlayMessage,
            ));
        });
}

fn count_down_overlay(
    time: Res<Time>,
    mut timer: ResMut<OverlayTimer>,
    mut next_phase: ResMut<NextState<OverlayPhase>>,
) {
    timer.0.tick(time.delta());

    if timer.0.just_finished() {
        info!("Birthday overlay timed out, sliding away");
        next_phase.set(OverlayPhase::Leaving);
    }
}

fn fade_in_message(
    timer: Res<OverlayTimer>,
    mut messages: Query<&mut TextColor, With<OverlayMessage>>,
) {
    let alpha = message_alpha(timer.0.elapsed());
    for mut color in &mut messages {
        color.0.set_alpha(alpha);
    }
}

fn start_slide(mut timer: ResMut<OverlayTimer>) {
    *timer = OverlayTimer(Timer::new(config::SLIDE_DURATION, TimerMode::Once));
}

fn slide_overlay(
    time: Res<Time>,
    mut timer: ResMut<OverlayTimer>,
    mut next_phase: ResMut<NextState<OverlayPhase>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut elements: Query<&mut Transform, With<OverlayElement>>,
) {
    timer.0.tick(time.delta());

    let offset = slide_offset(timer.0.fraction(), primary_viewport(&windows).height);
    for mut transform in &mut elements {
        transform.translation.y = offset;
    }

    if timer.0.finished() {
        next_phase.set(OverlayPhase::Dismissed);
    }
}

fn fit_backdrop_to_window(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut backdrops: Query<&mut Sprite, With<OverlayBackdrop>>,
) {
    if resized.is_empty() {
        return;
    }
    resized.clear();

    let viewport = primary_viewport(&windows);
    for mut sprite in &mut backdrops {
        sprite.custom_size = Some(Vec2::new(viewport.width, viewport.height));
    }
}

fn despawn_overlay(mut commands: Commands, elements: Query<Entity, With<OverlayElement>>) {
    for entity in &elements {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use greeting_helpers::WINDOW_HEIGHT;

    use super::*;

    fn overlay_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<Time>()
            .insert_resource(GreetingFont(Handle::default()))
            .add_event::<WindowResized>()
            .add_plugins(OverlayPlugin);
        app
    }

    fn advance(app: &mut App, by: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(by);
        app.update();
    }

    fn phase(app: &App) -> OverlayPhase {
        app.world().resource::<State<OverlayPhase>>().get().clone()
    }

    fn overlay_elements(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<OverlayElement>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn ease_out_starts_fast_and_settles() {
        assert!(ease_out(0.0).abs() < f32::EPSILON, "starts at rest");
        assert!((ease_out(1.0) - 1.0).abs() < f32::EPSILON, "ends in place");
        assert!(ease_out(0.5) > 0.5, "front-loaded");
        assert!((ease_out(2.0) - 1.0).abs() < f32::EPSILON, "clamped");
    }

    #[test]
    fn message_fades_in_over_half_a_second() {
        assert!(message_alpha(Duration::ZERO).abs() < f32::EPSILON, "invisible");
        assert!(
            (message_alpha(Duration::from_millis(250)) - 0.5).abs() < 1e-6,
            "half way"
        );
        assert!(
            (message_alpha(Duration::from_secs(3)) - 1.0).abs() < f32::EPSILON,
            "opaque"
        );
    }

    #[test]
    fn message_and_heart_fade_in_together() {
        let mut app = overlay_app();
        app.update();
        advance(&mut app, Duration::from_millis(250));

        let alphas: Vec<f32> = app
            .world_mut()
            .query_filtered::<&TextColor, With<OverlayMessage>>()
            .iter(app.world())
            .map(|color| color.0.alpha())
            .collect();
        assert_eq!(alphas.len(), 2, "message and heart");
        assert!(
            alphas.iter().all(|alpha| (alpha - 0.5).abs() < 1e-3),
            "half faded: {alphas:?}"
        );
    }

    #[test]
    fn overlay_dismisses_itself_after_five_seconds() {
        let mut app = overlay_app();
        app.update();
        assert_eq!(phase(&app), OverlayPhase::Showing, "shown on start");
        assert_eq!(overlay_elements(&mut app), 2, "backdrop and message");

        advance(&mut app, Duration::from_millis(4900));
        advance(&mut app, Duration::ZERO);
        assert_eq!(phase(&app), OverlayPhase::Showing, "still showing");

        advance(&mut app, Duration::from_millis(100));
        advance(&mut app, Duration::ZERO);
        assert_eq!(phase(&app), OverlayPhase::Leaving, "timed out");

        advance(&mut app, config::SLIDE_DURATION);
        let offsets: Vec<f32> = app
            .world_mut()
            .query_filtered::<&Transform, With<OverlayElement>>()
            .iter(app.world())
            .map(|transform| transform.translation.y)
            .collect();
        assert!(
            offsets
                .iter()
                .all(|offset| (offset - WINDOW_HEIGHT).abs() < 1e-3),
            "slid out of view: {offsets:?}"
        );

        advance(&mut app, Duration::ZERO);
        assert_eq!(phase(&app), OverlayPhase::Dismissed, "dismissed");
        assert_eq!(overlay_elements(&mut app), 0, "despawned");
    }
}
