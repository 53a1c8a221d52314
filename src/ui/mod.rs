use bevy::prelude::*;

mod camera;
mod config_egui;
mod fps_widget;
mod viewport;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            camera::CameraPlugin,
            config_egui::ConfigEguiPlugin,
            fps_widget::FpsWidgetPlugin,
            viewport::ViewportPlugin,
        ));
    }
}
