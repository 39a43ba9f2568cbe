use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{PrimaryWindow, WindowMode, WindowResolution};
use confetti::Viewport;

#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// Used until the browser reports the real page size
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

#[cfg(not(target_arch = "wasm32"))]
pub const FONT: &str = "../../greeting_helpers/assets/fonts/DejaVuSans-Bold.ttf";
#[cfg(target_arch = "wasm32")]
pub const FONT: &str = "fonts/DejaVuSans-Bold.ttf";

// Page background behind the overlay
pub const PAGE_BACKGROUND: Color = Color::srgb(25.0 / 255.0, 25.0 / 255.0, 25.0 / 255.0);

/// Creates a Bevy app filling the `#greeting` canvas of the hosting page.
pub fn get_default_app(title: &str) -> App {
    let mut app = App::new();

    let asset_plugin = AssetPlugin {
        mode: bevy::asset::AssetMode::Unprocessed,
        file_path: "assets".to_string(),
        processed_file_path: "imported_assets/Default".to_string(),
        watch_for_changes_override: None,
        meta_check: AssetMetaCheck::Never,
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#greeting".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Keep browser shortcuts like F5 and Ctrl+R working
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin)
            .set(window_plugin)
            .set(render_plugin),
    );

    // Caps the frame rate to the display to spare mobile batteries
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(PAGE_BACKGROUND));

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    app
}

/// Logical size and pixel density of the primary window, or the default size without one.
pub fn primary_viewport(windows: &Query<&Window, With<PrimaryWindow>>) -> Viewport {
    windows.get_single().map_or(
        Viewport::new(WINDOW_WIDTH, WINDOW_HEIGHT, 1.0),
        |window| Viewport::new(window.width(), window.height(), window.scale_factor()),
    )
}

/// Font for the greeting and for confetti glyphs.
///
/// Besides Latin text it covers the symbol and dingbat blocks (hearts, stars, flowers,
/// snowflakes, notes), which Bevy's built-in font does not.
#[derive(Resource, Clone, Debug)]
pub struct GreetingFont(pub Handle<Font>);

impl FromWorld for GreetingFont {
    fn from_world(world: &mut World) -> Self {
        Self(world.resource::<AssetServer>().load(FONT))
    }
}
