//! Mesh construction utilities.
//!
//! This module builds a [`Mesh`] from an explicit face-vertex list, as found in
//! OFF files, and converts a mesh back to that representation. Neighbor
//! topology is never stored in the list; it is recomputed from shared edges.

use nalgebra::Point3;

use super::arena::Mesh;
use super::index::{FaceId, MeshIndex, VertexId};
use super::linker::NeighborLinker;
use super::triangle::TopoTriangle;
use super::vertex::Vertex;
use crate::error::{MeshError, Result};

/// Build a mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices (counter-clockwise)
///
/// # Returns
/// A mesh with symmetric neighbor links, or an error if the input is invalid.
/// The border is left empty: it only exists for incrementally built meshes.
/// With no faces every vertex is isolated.
///
/// # Example
/// ```
/// use tessel::mesh::{build_from_triangles, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_triangles(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<Mesh<I>> {
    // Validate vertex indices
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        // Check for degenerate faces
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = Mesh::with_capacity(vertices.len(), faces.len());
    mesh.vertices
        .extend(vertices.iter().map(|&pos| Vertex::new(pos)));

    for (fi, face) in faces.iter().enumerate() {
        let [a, b, c] = face.map(VertexId::new);
        mesh.triangles.push(TopoTriangle::new(a, b, c));

        // Back-references: the last face touching a vertex wins
        let f = FaceId::new(fi);
        for v in [a, b, c] {
            mesh.vertices[v.index()].face = f;
        }
    }

    let mut linker = NeighborLinker::with_capacity(faces.len() * 3 / 2 + 3);
    for fi in 0..faces.len() {
        linker.link_face(&mut mesh.triangles, FaceId::new(fi))?;
    }

    Ok(mesh)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &Mesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertices().iter().map(|v| v.position).collect();

    let faces: Vec<[usize; 3]> = mesh
        .triangles()
        .iter()
        .map(|t| t.vertices().map(|v| v.index()))
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Two triangles sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: Mesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_triangles(), 1);
        assert!(mesh.is_valid());
        assert!(mesh.border().is_empty());

        // No neighbors on a lone triangle
        assert!(mesh.triangles()[0]
            .neighbors()
            .iter()
            .all(|n| !n.is_valid()));
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_valid());

        let (f0, f1) = (FaceId::new(0), FaceId::new(1));
        assert_eq!(mesh.triangle(f0).opposite_vertex_of(f1), VertexId::new(2));
        assert_eq!(mesh.triangle(f1).opposite_vertex_of(f0), VertexId::new(3));
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices, out_verts);
        assert_eq!(faces, out_faces);
    }

    #[test]
    fn test_small_index_type() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh<u16> = build_from_triangles(&vertices, &faces).unwrap();
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result: Result<Mesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]]; // Degenerate: v0 == v1

        let result: Result<Mesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_no_faces_keeps_isolated_vertices() {
        let (vertices, _) = single_triangle();
        let mesh: Mesh<u32> = build_from_triangles(&vertices, &[]).unwrap();
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_triangles(), 0);
        assert!(mesh.vertices().iter().all(|v| v.is_isolated()));
        assert!(mesh.is_valid());

        let empty: Mesh<u32> = build_from_triangles(&[], &[]).unwrap();
        assert!(empty.is_empty());
    }
}
