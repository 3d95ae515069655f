//! Mesh data and loading.

use std::path::PathBuf;

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::error::{ResourceError, ResourceResult};

/// CPU-side mesh: parallel per-vertex arrays plus u32 indices.
///
/// All per-vertex arrays have the same length. Colors default to white
/// and texture coordinates to zero when the source provides none.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// A unit cube centered on the origin with a distinct color per
    /// corner: 8 vertices, 12 triangles.
    pub fn cube() -> Self {
        let positions = vec![
            // front face (z = 0.5)
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            // back face (z = -0.5)
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ];

        let colors = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.5, 0.5, 0.5),
        ];

        let tex_coords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0, // front
            1, 5, 6, 6, 2, 1, // right
            5, 4, 7, 7, 6, 5, // back
            4, 0, 3, 3, 7, 4, // left
            3, 2, 6, 6, 7, 3, // top
            4, 5, 1, 1, 0, 4, // bottom
        ];

        Self {
            positions,
            colors,
            tex_coords,
            indices,
        }
    }
}

/// Where a mesh comes from.
///
/// Embedded bytes and external files go through the same import path;
/// only the initial read differs.
#[derive(Clone, Debug)]
pub enum MeshSource {
    /// A glTF asset compiled into the binary.
    Embedded(&'static [u8]),
    /// A glTF file on disk (`.gltf` or `.glb`).
    External(PathBuf),
}

impl MeshSource {
    /// Imports the first mesh primitive from the source.
    pub fn load(&self) -> ResourceResult<MeshData> {
        let (document, buffers, label) = match self {
            MeshSource::Embedded(bytes) => {
                let (document, buffers, _) =
                    gltf::import_slice(bytes).map_err(|e| ResourceError::GltfLoad {
                        path: "<embedded>".to_string(),
                        message: e.to_string(),
                    })?;
                (document, buffers, "<embedded>".to_string())
            }
            MeshSource::External(path) => {
                let label = path.display().to_string();
                let (document, buffers, _) =
                    gltf::import(path).map_err(|e| ResourceError::GltfLoad {
                        path: label.clone(),
                        message: e.to_string(),
                    })?;
                (document, buffers, label)
            }
        };

        let mesh = document
            .meshes()
            .next()
            .ok_or_else(|| ResourceError::NoMeshes(label.clone()))?;

        let mut data = MeshData::default();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or(ResourceError::MissingPositions)?
                .map(Vec3::from)
                .collect();
            let base = data.positions.len() as u32;
            let count = positions.len();

            let colors: Vec<Vec3> = match reader.read_colors(0) {
                Some(colors) => colors.into_rgb_f32().map(Vec3::from).collect(),
                None => vec![Vec3::ONE; count],
            };

            let tex_coords: Vec<Vec2> = match reader.read_tex_coords(0) {
                Some(coords) => coords.into_f32().map(Vec2::from).collect(),
                None => vec![Vec2::ZERO; count],
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| base + i).collect(),
                // Unindexed primitive: synthesize a sequential index list.
                None => (base..base + count as u32).collect(),
            };

            data.positions.extend(positions);
            data.colors.extend(colors);
            data.tex_coords.extend(tex_coords);
            data.indices.extend(indices);

            debug!("imported primitive: {count} vertices");
        }

        if data.positions.is_empty() {
            return Err(ResourceError::NoMeshes(label));
        }

        info!(
            "mesh loaded from {label}: {} vertices, {} indices",
            data.vertex_count(),
            data.index_count()
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_eight_vertices_and_twelve_triangles() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.colors.len(), cube.vertex_count());
        assert_eq!(cube.tex_coords.len(), cube.vertex_count());
    }

    #[test]
    fn cube_indices_stay_in_bounds() {
        let cube = MeshData::cube();
        let max = cube.vertex_count() as u32;
        assert!(cube.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn cube_uses_every_vertex() {
        let cube = MeshData::cube();
        for vertex in 0..cube.vertex_count() as u32 {
            assert!(
                cube.indices.contains(&vertex),
                "vertex {vertex} is never referenced"
            );
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let source = MeshSource::External(PathBuf::from("does/not/exist.glb"));
        match source.load() {
            Err(ResourceError::GltfLoad { path, .. }) => {
                assert!(path.contains("exist.glb"));
            }
            other => panic!("expected GltfLoad error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let source = MeshSource::Embedded(b"definitely not gltf");
        assert!(matches!(
            source.load(),
            Err(ResourceError::GltfLoad { .. })
        ));
    }
}
