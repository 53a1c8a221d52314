use bevy::math::Vec2;
use bevy::render::render_resource::ShaderType;
use bytemuck::{Pod, Zeroable};

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct PointParams {
    pub size: f32,
    /// 1 scales sprites with camera distance, 0 keeps `size` in logical pixels
    pub size_attenuation: u32,
    _padding: Vec2,
}

impl PointParams {
    pub fn new(size: f32, size_attenuation: bool) -> Self {
        Self {
            size,
            size_attenuation: size_attenuation as u32,
            _padding: Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_one_uniform_row() {
        let params = PointParams::new(0.02, true);
        let bytes = bytemuck::bytes_of(&params);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &0.02f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_ne_bytes());
    }
}
