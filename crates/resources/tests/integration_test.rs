//! Integration tests for mesh loading.

use std::path::Path;

use glint_resources::MeshSource;

#[test]
fn load_gltf_from_disk() {
    // Skip when the sample asset is absent (CI has no assets checked in).
    let path = Path::new("../../assets/models/cube.glb");
    if !path.exists() {
        println!("skipping: {path:?} not found");
        return;
    }

    let mesh = MeshSource::External(path.to_path_buf())
        .load()
        .expect("failed to load glTF mesh");

    assert!(mesh.vertex_count() > 0, "mesh should have vertices");
    assert!(mesh.index_count() > 0, "mesh should have indices");
    assert_eq!(
        mesh.colors.len(),
        mesh.vertex_count(),
        "colors must cover every vertex"
    );
    assert_eq!(
        mesh.tex_coords.len(),
        mesh.vertex_count(),
        "tex coords must cover every vertex"
    );

    let max = mesh.vertex_count() as u32;
    assert!(
        mesh.indices.iter().all(|&i| i < max),
        "indices must stay in bounds"
    );

    println!(
        "loaded {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.index_count() / 3
    );
}
