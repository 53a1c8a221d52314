use super::{apply_committed_parameters, generator, GalaxyGeneration, GalaxyParameters, ParticleCount};
use crate::graphics::{build_points_mesh, GalaxyPointsMaterial};
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use std::time::Instant;

/// Radians per second the whole galaxy turns around the vertical axis.
pub const ROTATION_SPEED: f32 = 0.05;

pub struct SpawnGalaxyPlugin;

impl Plugin for SpawnGalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxySpawningControl::default())
            .insert_resource(ParticleCount::default())
            .add_systems(
                Update,
                (regenerate_galaxy, rotate_galaxy)
                    .chain()
                    .after(apply_committed_parameters),
            );
    }
}

/// Tracks which generation the live renderable was built from.
#[derive(Resource, Default)]
pub struct GalaxySpawningControl {
    built_generation: Option<u64>,
}

/// Marks the single renderable point cloud.
#[derive(Component)]
pub struct Galaxy;

/// Rebuilds the point cloud whenever the applied generation moves on.
/// The previous mesh and material are released before the replacement is spawned.
pub fn regenerate_galaxy(
    mut commands: Commands,
    parameters: Res<GalaxyParameters>,
    generation: Res<GalaxyGeneration>,
    mut control: ResMut<GalaxySpawningControl>,
    mut particle_count: ResMut<ParticleCount>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
    existing: Query<(Entity, &Mesh3d, &MeshMaterial3d<GalaxyPointsMaterial>), With<Galaxy>>,
) {
    if control.built_generation == Some(generation.0) {
        return;
    }

    // cleanup existing galaxy
    for (entity, mesh, material) in &existing {
        meshes.remove(&mesh.0);
        materials.remove(&material.0);
        commands.entity(entity).despawn();
    }

    let started = Instant::now();
    let buffers = generator::generate(&parameters);
    debug!(
        "Generated {} particles in {:.1} ms",
        buffers.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let mesh = meshes.add(build_points_mesh(&buffers));
    let material = materials.add(GalaxyPointsMaterial::new(parameters.size));

    commands.spawn((
        Galaxy,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Visibility::Inherited,
        NoFrustumCulling,
        NotShadowCaster,
    ));

    particle_count.0 = buffers.len();
    control.built_generation = Some(generation.0);
    info!(
        "Galaxy generation {} spawned: {} particles, {} branches",
        generation.0, particle_count.0, parameters.branches
    );
}

pub fn galaxy_rotation(elapsed_secs: f32) -> Quat {
    Quat::from_rotation_y(elapsed_secs * ROTATION_SPEED)
}

fn rotate_galaxy(time: Res<Time>, mut galaxies: Query<&mut Transform, With<Galaxy>>) {
    for mut transform in &mut galaxies {
        transform.rotation = galaxy_rotation(time.elapsed_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{GalaxyParametersPlugin, ParametersCommitted, RegenerateGalaxy};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<GalaxyPointsMaterial>()
            .add_plugins((GalaxyParametersPlugin, SpawnGalaxyPlugin));
        app.world_mut().insert_resource(GalaxyParameters {
            count: 1000,
            ..default()
        });
        app
    }

    fn galaxy_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Galaxy>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn first_update_spawns_one_galaxy() {
        let mut app = test_app();
        app.update();

        assert_eq!(galaxy_count(&mut app), 1);
        assert_eq!(app.world().resource::<ParticleCount>().0, 1000);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
    }

    #[test]
    fn repeated_regeneration_keeps_exactly_one_galaxy() {
        let mut app = test_app();
        app.update();

        for branches in 2..12 {
            app.world_mut().send_event(ParametersCommitted(GalaxyParameters {
                count: 1000,
                branches,
                ..default()
            }));
            app.update();
            app.world_mut().send_event(RegenerateGalaxy);
            app.update();
        }

        assert_eq!(galaxy_count(&mut app), 1);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(app.world().resource::<Assets<GalaxyPointsMaterial>>().len(), 1);
        assert_eq!(app.world().resource::<GalaxyGeneration>().0, 20);
    }

    #[test]
    fn unchanged_generation_does_not_rebuild() {
        let mut app = test_app();
        app.update();
        let first = app
            .world_mut()
            .query_filtered::<Entity, With<Galaxy>>()
            .single(app.world())
            .ok();

        app.update();
        app.update();
        let later = app
            .world_mut()
            .query_filtered::<Entity, With<Galaxy>>()
            .single(app.world())
            .ok();

        assert!(first.is_some());
        assert_eq!(first, later);
    }

    #[test]
    fn material_uses_committed_point_size() {
        let mut app = test_app();
        app.world_mut().send_event(ParametersCommitted(GalaxyParameters {
            count: 1000,
            size: 0.05,
            ..default()
        }));
        app.update();

        let materials = app.world().resource::<Assets<GalaxyPointsMaterial>>();
        let (_, material) = materials.iter().next().expect("material spawned");
        assert_eq!(material.size(), 0.05);
    }

    #[test]
    fn rotation_turns_slowly_around_y() {
        let rotation = galaxy_rotation(20.0);
        let (axis, angle) = rotation.to_axis_angle();
        assert!((angle - 1.0).abs() < 1e-5);
        assert!((axis - Vec3::Y).length() < 1e-5);
        assert_eq!(galaxy_rotation(0.0), Quat::IDENTITY);
    }
}
