#[cfg(target_arch = "wasm32")]
use bevy::{
    ecs::{query::With, system::Query},
    log::debug,
    window::{PrimaryWindow, Window},
};

// wgpu refuses surfaces larger than the maximum texture size, 2048 on many mobile GPUs
#[cfg(any(target_arch = "wasm32", test))]
const MAX_SURFACE_SIDE: f32 = 2048.0;

/// Keeps the primary window matching the browser's inner size.
#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(mut primary_query: Query<&mut Window, With<PrimaryWindow>>) {
    let Some((width, height)) = browser_inner_size() else {
        return;
    };

    for mut window in &mut primary_query {
        let unchanged = (window.resolution.width() - width).abs() <= f32::EPSILON
            && (window.resolution.height() - height).abs() <= f32::EPSILON;
        if unchanged {
            continue;
        }

        let (width, height) = capped_surface_size(width, height);
        debug!("Browser resized to {width}x{height}");
        window.resolution.set(width, height);
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_inner_size() -> Option<(f32, f32)> {
    let browser_window = web_sys::window()?;
    let width = browser_window.inner_width().ok()?.as_f64()?;
    let height = browser_window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

#[cfg(any(target_arch = "wasm32", test))]
fn capped_surface_size(width: f32, height: f32) -> (f32, f32) {
    (width.min(MAX_SURFACE_SIDE), height.min(MAX_SURFACE_SIDE))
}
