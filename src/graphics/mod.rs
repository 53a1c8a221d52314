use bevy::prelude::*;

mod points_material;
mod points_mesh;
mod shader_types;

pub use points_material::GalaxyPointsMaterial;
pub use points_mesh::build_points_mesh;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(points_material::PointsMaterialPlugin);
    }
}
