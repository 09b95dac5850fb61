//! End-to-end: write all four artifact files, load them, generate a shape,
//! and save it back out.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use ssm_core::{generate, GenerateParams};
use ssm_io::{
    load_mode_matrix, load_range_table, load_regressor, load_stl, next_random_path, save_stl,
};
use ssm_types::LimbMesh;

/// Two-facet mean shape; 6 soup vertices, 18 flat coordinates.
fn write_mean_stl(path: &Path) -> LimbMesh {
    let mesh = LimbMesh::from_raw(
        &[
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0, //
            0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.5, 1.0, 1.0,
        ],
        &[0, 1, 2, 3, 4, 5],
    );
    save_stl(&mesh, path).unwrap();
    mesh
}

/// A v1.0 NPY file holding a C-order `(2, 18)` float64 matrix.
fn write_modes_npy(path: &Path) {
    let mut header =
        String::from("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 18), }");
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x93NUMPY");
    bytes.extend_from_slice(&[1, 0]);
    bytes.extend_from_slice(&u16::try_from(header.len()).unwrap().to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());

    // Mode 0 displaces everything along +x, mode 1 along +z.
    let mut data = Vec::with_capacity(36);
    for _ in 0..6 {
        data.extend_from_slice(&[1.0, 0.0, 0.0]);
    }
    for _ in 0..6 {
        data.extend_from_slice(&[0.0, 0.0, 1.0]);
    }
    for value in data {
        bytes.extend_from_slice(&f64::to_le_bytes(value));
    }
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn generate_from_artifact_files() {
    let dir = tempfile::tempdir().unwrap();

    let mean_path = dir.path().join("Mean_Limb_Shape.stl");
    let modes_path = dir.path().join("modes.npy");
    let regressor_path = dir.path().join("regressor.json");
    let ranges_path = dir.path().join("ranges.json");

    let mean_written = write_mean_stl(&mean_path);
    write_modes_npy(&modes_path);
    std::fs::write(
        &regressor_path,
        r#"{"weights": [[1.0, 0.0], [0.0, 1.0]], "intercept": [0.0, 0.0]}"#,
    )
    .unwrap();
    std::fs::write(&ranges_path, "[[-1.0, 1.0], [0.25, 0.25]]").unwrap();

    let mean = load_stl(&mean_path).unwrap();
    assert_eq!(mean.vertex_count(), mean_written.vertex_count());

    let model = load_mode_matrix(mean, &modes_path).unwrap();
    assert_eq!(model.mode_count(), 2);

    let regressor = load_regressor(&regressor_path).unwrap();
    let table = load_range_table(&ranges_path).unwrap();

    let params = GenerateParams::new().with_seed(99);
    let synthesis = generate(&model, &table, &regressor, &params).unwrap();
    assert_eq!(synthesis.mesh.vertex_count(), 6);

    // Component 1 is pinned at 0.25, and mode 1 displaces +z only, so every
    // vertex sits exactly 0.25 above its mean z.
    for (out, mean_v) in synthesis
        .mesh
        .vertices
        .iter()
        .zip(&model.mean().vertices)
    {
        let dz = out.position.z - mean_v.position.z;
        assert!((dz - 0.25).abs() < 1e-9, "dz = {dz}");
    }

    let out_path = next_random_path(dir.path(), "stl").unwrap();
    assert!(out_path.ends_with("Random1.stl"));
    save_stl(&synthesis.mesh, &out_path).unwrap();

    let reloaded = load_stl(&out_path).unwrap();
    assert_eq!(reloaded.vertex_count(), 6);

    // A second save takes the next index.
    let second = next_random_path(dir.path(), "stl").unwrap();
    assert!(second.ends_with("Random2.stl"));
}
