use crate::prelude::*;
use bevy::prelude::*;
use bevy::render::{
    mesh::{Indices, PrimitiveTopology},
    render_asset::RenderAssetUsages,
};

/// Corner offsets of a sprite, expanded around the particle center in the vertex shader.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Builds one sprite quad per particle. Each corner repeats the particle center,
/// the offset is applied on the GPU so sprites keep facing the camera.
pub fn build_points_mesh(buffers: &ParticleBuffers) -> Mesh {
    let centers: &[[f32; 3]] = bytemuck::cast_slice(&buffers.positions);
    let colors: &[[f32; 3]] = bytemuck::cast_slice(&buffers.colors);

    let vertex_count = centers.len() * CORNERS.len();
    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut vertex_colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(centers.len() * 6);

    for (center, color) in centers.iter().zip(colors) {
        let base = positions.len() as u32;
        for corner in CORNERS {
            positions.push(*center);
            corners.push(corner);
            vertex_colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors)
        .with_inserted_indices(Indices::U32(indices))
}
