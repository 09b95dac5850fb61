//! Core mesh types for the residual-limb statistical shape model workspace.
//!
//! This crate provides the foundational geometry types shared by the SSM
//! pipeline:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`LimbMesh`] - A triangle mesh with indexed vertices
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Flat Coordinate Convention
//!
//! Statistical shape models operate on a flattened view of the vertex array:
//! a mesh with `N` vertices maps to a vector of length `3N` laid out as
//! `[x0, y0, z0, x1, y1, z1, ...]`. [`LimbMesh::flat_coords`] and
//! [`LimbMesh::set_flat_coords`] are the two sides of that convention; every
//! deformation mode vector in the workspace uses the same layout.
//!
//! # Units
//!
//! Coordinates are `f64`. A freshly reconstructed shape is size-normalised;
//! after rescaling, coordinates are millimetres.
//!
//! # Example
//!
//! ```
//! use ssm_types::{LimbMesh, Vertex};
//!
//! let mut mesh = LimbMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.flat_coords().len(), 9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod vertex;

pub use bounds::Aabb;
pub use mesh::LimbMesh;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
