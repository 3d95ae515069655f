//! Vertex and instance input layouts.
//!
//! Binding 0 carries per-vertex attributes, binding 1 carries one model
//! matrix per instance, split across four vec4 attribute locations
//! because a vertex attribute is at most 16 bytes wide.

use ash::vk;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Per-vertex data: position, color, texture coordinates.
///
/// Layout (`#[repr(C)]`, 32 bytes):
/// - offset 0: position (12 bytes), location 0
/// - offset 12: color (12 bytes), location 1
/// - offset 24: tex_coord (8 bytes), location 2
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec3, color: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            color,
            tex_coord,
        }
    }

    /// Binding 0, per-vertex rate.
    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<Self>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }
    }

    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 3] {
        [
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: 0,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 1,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: 12,
            },
            vk::VertexInputAttributeDescription {
                binding: 0,
                location: 2,
                format: vk::Format::R32G32_SFLOAT,
                offset: 24,
            },
        ]
    }
}

/// Per-instance data: one model matrix.
///
/// Occupies locations 3 through 6, one vec4 column each.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct InstanceData {
    pub model: Mat4,
}

impl InstanceData {
    #[inline]
    pub const fn new(model: Mat4) -> Self {
        Self { model }
    }

    /// Binding 1, per-instance rate.
    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription {
            binding: 1,
            stride: std::mem::size_of::<Self>() as u32,
            input_rate: vk::VertexInputRate::INSTANCE,
        }
    }

    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 4] {
        let mut attrs = [vk::VertexInputAttributeDescription {
            binding: 1,
            location: 0,
            format: vk::Format::R32G32B32A32_SFLOAT,
            offset: 0,
        }; 4];
        for (column, attr) in attrs.iter_mut().enumerate() {
            attr.location = 3 + column as u32;
            attr.offset = (column * 16) as u32;
        }
        attrs
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
        }
    }
}

/// The full vertex input state: both bindings and all seven attributes.
pub fn input_descriptions() -> (
    [vk::VertexInputBindingDescription; 2],
    Vec<vk::VertexInputAttributeDescription>,
) {
    let bindings = [
        Vertex::binding_description(),
        InstanceData::binding_description(),
    ];
    let mut attributes = Vertex::attribute_descriptions().to_vec();
    attributes.extend(InstanceData::attribute_descriptions());
    (bindings, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn vertex_offsets_match_attributes() {
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, tex_coord), 24);

        let attrs = Vertex::attribute_descriptions();
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].offset, 24);
    }

    #[test]
    fn vertex_binding_is_per_vertex() {
        let binding = Vertex::binding_description();
        assert_eq!(binding.binding, 0);
        assert_eq!(binding.stride, 32);
        assert_eq!(binding.input_rate, vk::VertexInputRate::VERTEX);
    }

    #[test]
    fn instance_matrix_spans_four_locations() {
        let attrs = InstanceData::attribute_descriptions();
        for (column, attr) in attrs.iter().enumerate() {
            assert_eq!(attr.binding, 1);
            assert_eq!(attr.location, 3 + column as u32);
            assert_eq!(attr.offset, (column * 16) as u32);
            assert_eq!(attr.format, vk::Format::R32G32B32A32_SFLOAT);
        }
    }

    #[test]
    fn instance_binding_is_per_instance() {
        let binding = InstanceData::binding_description();
        assert_eq!(binding.binding, 1);
        assert_eq!(binding.stride, 64);
        assert_eq!(binding.input_rate, vk::VertexInputRate::INSTANCE);
    }

    #[test]
    fn combined_input_has_no_location_overlap() {
        let (bindings, attributes) = input_descriptions();
        assert_eq!(bindings.len(), 2);
        assert_eq!(attributes.len(), 7);

        let mut locations: Vec<u32> = attributes.iter().map(|a| a.location).collect();
        locations.sort_unstable();
        locations.dedup();
        assert_eq!(locations.len(), 7);
    }

    #[test]
    fn vertex_round_trips_through_bytes() {
        let vertex = Vertex::new(
            Vec3::new(1.0, -1.0, 0.5),
            Vec3::new(0.2, 0.4, 0.6),
            Vec2::new(0.0, 1.0),
        );
        let bytes = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 32);
        let back: &Vertex = bytemuck::from_bytes(bytes);
        assert_eq!(back.position, vertex.position);
        assert_eq!(back.tex_coord, vertex.tex_coord);
    }
}
