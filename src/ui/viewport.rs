use super::camera::OrbitCamera;
use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};

pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (cap_pixel_ratio_system, viewport_resize_system));
    }
}

/// Scale factor override that keeps the window at most [`MAX_PIXEL_RATIO`].
pub fn pixel_ratio_override(native: f32) -> Option<f32> {
    (native > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}

pub fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height > 0.0 {
        width / height
    } else {
        1.0
    }
}

fn cap_pixel_ratio_system(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    let native = window.resolution.base_scale_factor();
    let wanted = pixel_ratio_override(native);
    if window.resolution.scale_factor_override() != wanted {
        debug!("Capping pixel ratio {native} to {wanted:?}");
        window.resolution.set_scale_factor_override(wanted);
    }
}

fn viewport_resize_system(
    mut resize_evr: EventReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<OrbitCamera>>,
) {
    let Some(resized) = resize_evr.read().last() else {
        return;
    };
    let aspect = aspect_ratio(resized.width, resized.height);
    debug!(
        "Viewport resized to {}x{}, aspect {aspect:.3}",
        resized.width, resized.height
    );

    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect;
        }
    }
}
