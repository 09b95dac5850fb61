//! Indexed triangle mesh.

use crate::{Aabb, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh of a residual limb.
///
/// Vertices and faces are stored separately, with faces referencing vertices
/// by index. The vertex order is significant: the statistical shape model's
/// deformation modes are defined per coordinate of this ordering, so two
/// meshes from the same model release are in correspondence vertex-by-vertex.
///
/// # Example
///
/// ```
/// use ssm_types::{LimbMesh, Vertex};
///
/// let mut mesh = LimbMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimbMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl LimbMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// Returns an empty mesh if either slice length is not divisible by 3.
    ///
    /// # Arguments
    ///
    /// * `positions` - Flat array `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat array of face indices `[v0a, v1a, v2a, v0b, ...]`
    ///
    /// # Example
    ///
    /// ```
    /// use ssm_types::LimbMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = LimbMesh::from_raw(&positions, &indices);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flatten the vertex positions into a `3N` coordinate vector.
    ///
    /// The layout is `[x0, y0, z0, x1, y1, z1, ...]`, matching the layout of
    /// the deformation mode vectors.
    ///
    /// # Example
    ///
    /// ```
    /// use ssm_types::{LimbMesh, Vertex};
    ///
    /// let mesh = LimbMesh::from_parts(
    ///     vec![Vertex::from_coords(1.0, 2.0, 3.0)],
    ///     vec![],
    /// );
    /// assert_eq!(mesh.flat_coords(), vec![1.0, 2.0, 3.0]);
    /// ```
    #[must_use]
    pub fn flat_coords(&self) -> Vec<f64> {
        let mut coords = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            coords.push(v.position.x);
            coords.push(v.position.y);
            coords.push(v.position.z);
        }
        coords
    }

    /// Overwrite the vertex positions from a flat `3N` coordinate slice.
    ///
    /// Returns `false` (leaving the mesh untouched) if the slice length does
    /// not equal three times the vertex count.
    pub fn set_flat_coords(&mut self, coords: &[f64]) -> bool {
        if coords.len() != self.vertices.len() * 3 {
            return false;
        }
        for (v, c) in self.vertices.iter_mut().zip(coords.chunks_exact(3)) {
            v.position.x = c[0];
            v.position.y = c[1];
            v.position.z = c[2];
        }
        true
    }

    /// Compute the axis-aligned bounding box of the vertices.
    ///
    /// Returns `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_vertices(&self.vertices)
    }
}
