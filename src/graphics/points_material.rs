use super::shader_types::PointParams;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
    },
};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

pub struct PointsMaterialPlugin;

impl Plugin for PointsMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default());
    }
}

/// Camera facing sprites with per vertex color, blended additively
/// and never written to the depth buffer.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GalaxyPointsMaterial {
    #[uniform(0)]
    params: PointParams,
    alpha_mode: AlphaMode,
}

impl GalaxyPointsMaterial {
    pub fn new(size: f32) -> Self {
        Self {
            params: PointParams::new(size, true),
            alpha_mode: AlphaMode::Add,
        }
    }

    pub fn size(&self) -> f32 {
        self.params.size
    }

    pub fn size_attenuation(&self) -> bool {
        self.params.size_attenuation != 0
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // sprites face the camera, winding depends on the corner order only
        descriptor.primitive.cull_mode = None;
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}
