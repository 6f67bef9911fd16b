//! # Tessel
//!
//! Incremental 2D Delaunay triangulation with curve reconstruction and
//! quality refinement.
//!
//! Tessel keeps a triangle mesh with explicit neighbor topology and grows it
//! one point at a time, restoring the Delaunay property with edge flips after
//! every insertion. Two algorithms build on it:
//!
//! - **Crust** reconstructs a polygonal curve from an unorganized point sample
//! - **Ruppert refinement** inserts Steiner points until constraint segments
//!   are honored and skinny triangles are gone
//!
//! ## Features
//!
//! - **Topological triangles**: three corners plus three neighbor slots, with
//!   type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Iterators and circulators**: linear walks over the arenas and rotations
//!   around a vertex
//! - **Plain-text formats**: OFF, PTS and constrained point sets
//!
//! ## Quick Start
//!
//! ```no_run
//! use tessel::prelude::*;
//!
//! // Triangulate a point sample and reconstruct its curve
//! let mut mesh: Mesh = Mesh::new();
//! let edges = mesh.load_curve("samples.pts").unwrap();
//!
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Triangles: {}", mesh.num_triangles());
//! println!("Curve edges: {}", edges);
//!
//! // Save the triangulation
//! tessel::io::save(&mesh, "output.off").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut mesh: Mesh = Mesh::new();
//! for p in [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 2.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//!     Point3::new(1.0, 0.8, 0.0),
//! ] {
//!     mesh.insert_point(p).unwrap();
//! }
//!
//! assert_eq!(mesh.num_triangles(), 4);
//! assert!(mesh.is_delaunay());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! # let mesh: Mesh = Mesh::from_points([
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(2.0, 0.0, 0.0),
//! #     Point3::new(2.0, 2.0, 0.0),
//! #     Point3::new(0.0, 2.0, 0.0),
//! #     Point3::new(1.0, 0.8, 0.0),
//! # ]).unwrap();
//! // Rotate around the interior vertex
//! let v = VertexId::new(4);
//! for neighbor in mesh.vertex_circulator(v) {
//!     println!("Neighbor at {:?}", neighbor.position);
//! }
//!
//! // Triangles around it, by index
//! assert_eq!(mesh.faces_around(v).len(), 4);
//!
//! // Walk every triangle
//! for t in mesh.triangle_cursor(0) {
//!     let [a, b, c] = t.vertices();
//!     println!("{:?} {:?} {:?}", a, b, c);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod predicates;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{crust, refine, Progress, RefineOptions, RefineStats};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, Edge, FaceId, Mesh, MeshIndex, TopoTriangle,
        Triangle, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_convex_points_in_shuffled_order() {
        // Points on an ellipse, visited with a fixed stride.
        let n = 24;
        let samples: Vec<Point3<f64>> = (0..n)
            .map(|i| (i * 7) % n)
            .map(|k| {
                let theta = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                Point3::new(2.0 * theta.cos(), theta.sin(), 0.0)
            })
            .collect();

        let mesh: Mesh = Mesh::from_points(samples).unwrap();
        assert!(mesh.is_valid());
        assert!(mesh.is_delaunay());
        // Convex position: every point stays on the hull.
        assert_eq!(mesh.border().len(), n);
        assert_eq!(mesh.num_triangles(), n - 2);
    }

    #[test]
    fn test_constrained_refinement_end_to_end() {
        let mut mesh: Mesh = Mesh::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        mesh.set_constraints([(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)])
            .unwrap();

        let stats = refine(&mut mesh, &RefineOptions::default()).unwrap();
        assert_eq!(stats.segments_split, 1);
        assert!(mesh.is_valid());
        assert!(mesh.is_delaunay());
        assert!(mesh.min_angle().unwrap() >= 22.0);
    }
}
