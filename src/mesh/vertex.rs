//! Mesh vertices.

use nalgebra::Point3;

use super::index::{FaceId, MeshIndex};

/// A vertex of the triangulation.
///
/// 2D triangulations live in the `z = 0` plane; the third coordinate is kept so
/// OFF meshes round-trip unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One triangle incident to this vertex, or none for isolated vertices.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            face: FaceId::invalid(),
        }
    }

    /// Whether no triangle references this vertex.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        !self.face.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(v.is_isolated());
    }
}
