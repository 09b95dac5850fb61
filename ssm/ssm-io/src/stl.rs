//! STL (Stereolithography) mean-shape loading and synthetic-shape saving.
//!
//! The mean-shape artifact is an STL file. Vertices are deliberately **not**
//! welded on load: the statistical shape model's mode vectors are defined
//! over the file's raw vertex sequence (three vertices per facet, in facet
//! order), so deduplicating vertices would break the correspondence between
//! mesh coordinates and mode entries. `N` therefore equals three times the
//! facet count.
//!
//! Both binary and ASCII STL are accepted on load; saving always writes
//! binary.
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    - Header (ignored)
//! UINT32       - Number of triangles
//! foreach triangle
//!     REAL32[3] - Normal vector
//!     REAL32[3] - Vertex 1
//!     REAL32[3] - Vertex 2
//!     REAL32[3] - Vertex 3
//!     UINT16    - Attribute byte count
//! end
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use ssm_types::{LimbMesh, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file, auto-detecting ASCII vs binary.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
///
/// # Example
///
/// ```no_run
/// use ssm_io::load_stl;
///
/// let mean = load_stl("Mean_Limb_Shape.stl").unwrap();
/// println!("N = {}", mean.vertex_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<LimbMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mut reader = BufReader::new(file);

    let mut head = [0u8; HEADER_SIZE + 4];
    let bytes_read = reader.read(&mut head)?;
    if bytes_read < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let head_str = String::from_utf8_lossy(&head[..bytes_read.min(HEADER_SIZE)]);
    if head_str.trim_start().starts_with("solid") && !plausible_binary(&head[..bytes_read], path) {
        drop(reader);
        let reader = BufReader::new(File::open(path)?);
        load_ascii(reader)
    } else {
        load_binary(&head[..bytes_read], reader)
    }
}

/// Save a mesh as binary STL.
///
/// Facet normals are recomputed from the vertex positions; degenerate
/// facets get a zero normal.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &LimbMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let header = [0u8; HEADER_SIZE];
    writer.write_all(&header)?;
    let face_count = u32::try_from(mesh.face_count())
        .map_err(|_| IoError::invalid_content("more faces than a binary STL can hold"))?;
    writer.write_all(&face_count.to_le_bytes())?;

    for face in &mesh.faces {
        let [a, b, c] = [
            mesh.vertices[face[0] as usize].position,
            mesh.vertices[face[1] as usize].position,
            mesh.vertices[face[2] as usize].position,
        ];
        let normal = {
            let n = (b - a).cross(&(c - a));
            let len = n.norm();
            if len > 1e-12 {
                n / len
            } else {
                n * 0.0
            }
        };

        write_vec3(&mut writer, normal.x, normal.y, normal.z)?;
        write_vec3(&mut writer, a.x, a.y, a.z)?;
        write_vec3(&mut writer, b.x, b.y, b.z)?;
        write_vec3(&mut writer, c.x, c.y, c.z)?;
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    debug!(faces = mesh.face_count(), path = %path.display(), "wrote binary STL");
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: STL stores 32-bit floats by definition
fn write_vec3<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())?;
    Ok(())
}

/// Whether a file that starts with "solid" is actually binary.
///
/// Some binary exporters write "solid" into the 80-byte header. The face
/// count at offset 80 settles it against the file size.
fn plausible_binary(head: &[u8], path: &Path) -> bool {
    if head.len() < HEADER_SIZE + 4 {
        return false;
    }
    let declared = u32::from_le_bytes([
        head[HEADER_SIZE],
        head[HEADER_SIZE + 1],
        head[HEADER_SIZE + 2],
        head[HEADER_SIZE + 3],
    ]) as u64;
    let expected = HEADER_SIZE as u64 + 4 + declared * TRIANGLE_SIZE as u64;
    std::fs::metadata(path).is_ok_and(|m| m.len() == expected)
}

fn load_binary<R: Read>(head: &[u8], mut reader: R) -> IoResult<LimbMesh> {
    if head.len() < HEADER_SIZE + 4 {
        return Err(IoError::UnexpectedEof {
            position: head.len() as u64,
        });
    }
    let face_count = u32::from_le_bytes([
        head[HEADER_SIZE],
        head[HEADER_SIZE + 1],
        head[HEADER_SIZE + 2],
        head[HEADER_SIZE + 3],
    ]) as usize;

    let mut mesh = LimbMesh::with_capacity(face_count * 3, face_count);
    let mut buf = [0u8; TRIANGLE_SIZE];

    for face_index in 0..face_count {
        reader.read_exact(&mut buf).map_err(|_| IoError::UnexpectedEof {
            position: (HEADER_SIZE + 4 + face_index * TRIANGLE_SIZE) as u64,
        })?;

        // Skip the 12-byte stored normal; vertices start at offset 12.
        for v in 0..3 {
            let offset = 12 + v * 12;
            mesh.vertices.push(read_vertex(&buf, offset));
        }

        let base = u32::try_from(face_index * 3)
            .map_err(|_| IoError::invalid_content("face count overflows vertex indices"))?;
        mesh.faces.push([base, base + 1, base + 2]);
    }

    debug!(faces = mesh.face_count(), vertices = mesh.vertex_count(), "loaded binary STL");
    Ok(mesh)
}

fn read_vertex(buf: &[u8], offset: usize) -> Vertex {
    let x = f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]]);
    let y = f32::from_le_bytes([
        buf[offset + 4],
        buf[offset + 5],
        buf[offset + 6],
        buf[offset + 7],
    ]);
    let z = f32::from_le_bytes([
        buf[offset + 8],
        buf[offset + 9],
        buf[offset + 10],
        buf[offset + 11],
    ]);
    Vertex::from_coords(f64::from(x), f64::from(y), f64::from(z))
}

fn load_ascii<R: BufRead>(reader: R) -> IoResult<LimbMesh> {
    let mut mesh = LimbMesh::new();
    let mut pending: Vec<Vertex> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("vertex") {
            let mut coords = rest.split_whitespace().map(str::parse::<f64>);
            let (x, y, z) = match (coords.next(), coords.next(), coords.next()) {
                (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => (x, y, z),
                _ => {
                    return Err(IoError::invalid_content(format!(
                        "malformed vertex line: {trimmed}"
                    )))
                }
            };
            pending.push(Vertex::from_coords(x, y, z));
        } else if trimmed.starts_with("endfacet") {
            if pending.len() != 3 {
                return Err(IoError::invalid_content(format!(
                    "facet with {} vertices",
                    pending.len()
                )));
            }
            let base = u32::try_from(mesh.vertices.len())
                .map_err(|_| IoError::invalid_content("too many vertices for u32 indices"))?;
            mesh.vertices.append(&mut pending);
            mesh.faces.push([base, base + 1, base + 2]);
        }
    }

    if !pending.is_empty() {
        return Err(IoError::invalid_content("unterminated facet at end of file"));
    }
    if mesh.is_empty() {
        return Err(IoError::invalid_content("no facets found in ASCII STL"));
    }

    debug!(faces = mesh.face_count(), vertices = mesh.vertex_count(), "loaded ASCII STL");
    Ok(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetra() -> LimbMesh {
        LimbMesh::from_raw(
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 0.5, 1.0,
            ],
            &[0, 1, 2, 3, 4, 5],
        )
    }

    #[test]
    fn binary_round_trip_preserves_vertex_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.stl");

        let original = tetra();
        save_stl(&original, &path).unwrap();
        let loaded = load_stl(&path).unwrap();

        assert_eq!(loaded.vertex_count(), original.vertex_count());
        assert_eq!(loaded.face_count(), original.face_count());
        for (a, b) in original.vertices.iter().zip(&loaded.vertices) {
            assert_relative_eq!(a.position.x, b.position.x, epsilon = 1e-6);
            assert_relative_eq!(a.position.y, b.position.y, epsilon = 1e-6);
            assert_relative_eq!(a.position.z, b.position.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn ascii_stl_loads_as_soup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ascii.stl");
        std::fs::write(
            &path,
            "solid limb\n\
             facet normal 0 0 1\n\
               outer loop\n\
                 vertex 0.0 0.0 0.0\n\
                 vertex 1.0 0.0 0.0\n\
                 vertex 0.0 1.0 0.0\n\
               endloop\n\
             endfacet\n\
             endsolid limb\n",
        )
        .unwrap();

        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_relative_eq!(mesh.vertices[1].position.x, 1.0);
    }

    #[test]
    fn ascii_stl_with_bad_vertex_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.stl");
        std::fs::write(
            &path,
            "solid limb\n\
             facet normal 0 0 1\n\
               outer loop\n\
                 vertex 0.0 oops 0.0\n\
               endloop\n\
             endfacet\n\
             endsolid limb\n",
        )
        .unwrap();

        assert!(matches!(
            load_stl(&path),
            Err(IoError::InvalidContent { .. })
        ));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        assert!(matches!(
            load_stl("/nonexistent/mean.stl"),
            Err(IoError::FileNotFound { .. })
        ));
    }

    #[test]
    fn truncated_binary_is_unexpected_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trunc.stl");

        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; TRIANGLE_SIZE]); // only 1 of 2 faces
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            load_stl(&path),
            Err(IoError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn vertices_are_not_welded() {
        // Two faces sharing an edge still load six distinct vertices; mode
        // correspondence depends on it.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soup.stl");
        save_stl(&tetra(), &path).unwrap();
        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }
}
