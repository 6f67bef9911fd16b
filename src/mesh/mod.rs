//! Core mesh data structures.
//!
//! This module provides the topological triangle mesh and the operations that
//! keep it a Delaunay triangulation while points are added.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], which owns a vertex arena and a triangle
//! arena. Each [`TopoTriangle`] stores its three corners counter-clockwise and
//! one neighbor per edge; each [`Vertex`] stores one incident triangle. That is
//! enough for O(1) walks across edges and around vertices.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are built incrementally from points, or from face-vertex lists:
//!
//! ```
//! use tessel::mesh::Mesh;
//! use nalgebra::Point3;
//!
//! let mesh: Mesh = Mesh::from_points([
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(mesh.num_triangles(), 2);
//! assert!(mesh.is_delaunay());
//! ```

mod arena;
mod builder;
mod index;
mod insert;
mod iter;
mod linker;
mod triangle;
mod vertex;

pub use self::arena::Mesh;
pub use self::builder::{build_from_triangles, to_face_vertex};
pub use self::index::{FaceId, MeshIndex, VertexId};
pub use self::insert::COINCIDENT_TOLERANCE;
pub use self::iter::{
    Circulator, Cursor, MeshElement, TriangleCirculator, TriangleCursor, VertexCirculator,
    VertexCursor,
};
pub use self::linker::NeighborLinker;
pub use self::triangle::{Edge, TopoTriangle, Triangle};
pub use self::vertex::Vertex;
