pub use crate::galaxy::{
    Galaxy, GalaxyGeneration, GalaxyParameters, ParametersCommitted, ParticleBuffers,
    ParticleCount,
};
