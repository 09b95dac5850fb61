//! Axis-aligned bounding box.

use crate::Vertex;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// # Example
///
/// ```
/// use ssm_types::{Aabb, Vertex};
///
/// let verts = vec![
///     Vertex::from_coords(-1.0, 0.0, 0.0),
///     Vertex::from_coords(2.0, 3.0, 1.0),
/// ];
/// let aabb = Aabb::from_vertices(&verts).unwrap();
/// assert_eq!(aabb.min.x, -1.0);
/// assert_eq!(aabb.max.y, 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Compute the bounding box of a vertex slice.
    ///
    /// Returns `None` if the slice is empty.
    #[must_use]
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let first = vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for v in &vertices[1..] {
            min.x = min.x.min(v.position.x);
            min.y = min.y.min(v.position.y);
            min.z = min.z.min(v.position.z);
            max.x = max.x.max(v.position.x);
            max.y = max.y.max(v.position.y);
            max.z = max.z.max(v.position.z);
        }

        Some(Self { min, max })
    }

    /// Extent along each axis.
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_vertices_empty() {
        assert!(Aabb::from_vertices(&[]).is_none());
    }

    #[test]
    fn extents_and_center() {
        let verts = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(2.0, 4.0, 6.0),
        ];
        let aabb = Aabb::from_vertices(&verts);
        assert!(aabb.is_some());
        if let Some(aabb) = aabb {
            assert_relative_eq!(aabb.extents().y, 4.0, epsilon = 1e-12);
            assert_relative_eq!(aabb.center().z, 3.0, epsilon = 1e-12);
        }
    }
}
