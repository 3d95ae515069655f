//! Scene uniforms and the demo animation.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Transforms uploaded to the vertex shader each frame, binding 0.
///
/// `#[repr(C)]` with three column-major mat4s matches the std140 layout
/// of the corresponding uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

impl SceneUniform {
    /// Builds the frame's transforms.
    ///
    /// The model spins around Z at a quarter turn per second and is
    /// scaled uniformly by `scale`. The camera looks at the origin from
    /// (2,2,2) with Z up. The projection is a 45 degree perspective with
    /// the Y axis flipped for Vulkan clip space.
    pub fn animated(elapsed_secs: f32, aspect: f32, scale: f32) -> Self {
        let model = Mat4::from_rotation_z(elapsed_secs * 90f32.to_radians())
            * Mat4::from_scale(Vec3::splat(scale));

        let view = Mat4::look_at_rh(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, Vec3::Z);

        let mut proj = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 10.0);
        proj.y_axis.y *= -1.0;

        Self { model, view, proj }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn uniform_is_three_matrices() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 192);
    }

    #[test]
    fn model_starts_as_pure_scale() {
        let ubo = SceneUniform::animated(0.0, 1.0, 2.0);
        let expected = Mat4::from_scale(Vec3::splat(2.0));
        assert!(ubo.model.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn model_makes_a_quarter_turn_per_second() {
        let ubo = SceneUniform::animated(1.0, 1.0, 1.0);
        let rotated = ubo.model.transform_vector3(Vec3::X);
        assert!(rotated.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn view_maps_the_eye_to_the_origin() {
        let ubo = SceneUniform::animated(0.0, 1.0, 1.0);
        let eye = ubo.view * Vec4::new(2.0, 2.0, 2.0, 1.0);
        assert!(eye.truncate().abs_diff_eq(glam::Vec3::ZERO, 1e-5));
    }

    #[test]
    fn projection_flips_y_for_vulkan() {
        let ubo = SceneUniform::animated(0.0, 16.0 / 9.0, 1.0);
        assert!(ubo.proj.y_axis.y < 0.0);
    }

    #[test]
    fn uniform_casts_to_bytes() {
        let ubo = SceneUniform::animated(0.5, 1.5, 1.0);
        let bytes = bytemuck::bytes_of(&ubo);
        assert_eq!(bytes.len(), 192);
    }
}
