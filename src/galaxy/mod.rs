use bevy::prelude::*;

mod galaxy_parameters;
mod generator;
mod spawn_galaxy;

pub use galaxy_parameters::{
    apply_committed_parameters, GalaxyGeneration, GalaxyParameters, GalaxyParametersPlugin,
    ParametersCommitted, RegenerateGalaxy,
};
pub use generator::ParticleBuffers;
pub use spawn_galaxy::{Galaxy, SpawnGalaxyPlugin};

/// Particles in the live galaxy.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct ParticleCount(pub usize);
