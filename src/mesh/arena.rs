//! The triangulation arena.
//!
//! [`Mesh`] owns every vertex and triangle and addresses them by stable
//! integer index. Nothing outside this module holds references into the arenas
//! across a mutation: insertion may reallocate them, so persistent handles are
//! always [`VertexId`] and [`FaceId`].
//!
//! Besides the two arenas the mesh tracks:
//!
//! - the **border**, the clockwise hull of an incrementally built triangulation;
//! - the **curve**, the edges reconstructed by [`crust`](crate::algo::crust);
//! - the **constraints**, the segments honored by [`refine`](crate::algo::refine);
//! - `index_before_voronoi`, the first vertex index that is a Voronoi center
//!   rather than an original sample.

use std::collections::HashSet;

use nalgebra::Point3;
use tracing::info;

use super::index::{FaceId, MeshIndex, VertexId};
use super::triangle::{Edge, TopoTriangle};
use super::vertex::Vertex;
use crate::error::{MeshError, Result};
use crate::predicates;

/// A 2D triangulation with explicit neighbor topology.
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    /// All vertices, in insertion order.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All triangles.
    pub(crate) triangles: Vec<TopoTriangle<I>>,

    /// Hull of the incremental triangulation, clockwise.
    pub(crate) border: Vec<VertexId<I>>,

    /// Edges reconstructed by the Crust pass.
    pub(crate) curve: Vec<Edge<I>>,

    /// Segments the refinement must keep.
    pub(crate) constraints: Vec<Edge<I>>,

    /// Number of vertices that existed before Voronoi centers were inserted.
    pub(crate) index_before_voronoi: usize,
}

impl<I: MeshIndex> Default for Mesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            border: Vec::new(),
            curve: Vec::new(),
            constraints: Vec::new(),
            index_before_voronoi: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            triangles: Vec::with_capacity(num_triangles),
            ..Self::new()
        }
    }

    /// Drop every vertex, triangle, border entry, curve edge and constraint.
    pub fn empty(&mut self) {
        if !self.vertices.is_empty() || !self.triangles.is_empty() {
            info!(
                "resetting mesh ({} vertices, {} triangles)",
                self.vertices.len(),
                self.triangles.len()
            );
        }
        self.vertices.clear();
        self.triangles.clear();
        self.border.clear();
        self.curve.clear();
        self.constraints.clear();
        self.index_before_voronoi = 0;
    }

    /// Whether the mesh has neither vertices nor triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a triangle by ID.
    #[inline]
    pub fn triangle(&self, id: FaceId<I>) -> &TopoTriangle<I> {
        &self.triangles[id.index()]
    }

    /// Get a vertex position.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    /// The vertex arena.
    #[inline]
    pub fn vertices(&self) -> &[Vertex<I>] {
        &self.vertices
    }

    /// The triangle arena.
    #[inline]
    pub fn triangles(&self) -> &[TopoTriangle<I>] {
        &self.triangles
    }

    /// The hull vertices of an incrementally built triangulation, clockwise.
    ///
    /// Empty for meshes built from an explicit face list.
    #[inline]
    pub fn border(&self) -> &[VertexId<I>] {
        &self.border
    }

    /// Edges reconstructed by the last Crust pass.
    #[inline]
    pub fn curve(&self) -> &[Edge<I>] {
        &self.curve
    }

    /// Segments the refinement keeps.
    #[inline]
    pub fn constraints(&self) -> &[Edge<I>] {
        &self.constraints
    }

    /// First vertex index that holds an inserted Voronoi center.
    ///
    /// Zero until a Crust pass has run.
    #[inline]
    pub fn index_before_voronoi(&self) -> usize {
        self.index_before_voronoi
    }

    /// Whether `v` is one of the original samples rather than a Voronoi center.
    #[inline]
    pub fn is_sample(&self, v: VertexId<I>) -> bool {
        v.index() < self.index_before_voronoi
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all triangle IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.triangles.len()).map(FaceId::new)
    }

    /// Replace the constraint segments.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidConstraint`] if a segment names a vertex that does not exist.
    pub fn set_constraints(&mut self, segments: impl IntoIterator<Item = (usize, usize)>) -> Result<()> {
        let n = self.vertices.len();
        let mut constraints = Vec::new();
        for (i, (a, b)) in segments.into_iter().enumerate() {
            for v in [a, b] {
                if v >= n {
                    return Err(MeshError::InvalidConstraint {
                        constraint: i,
                        vertex: v,
                    });
                }
            }
            constraints.push(Edge::new(VertexId::new(a), VertexId::new(b)));
        }
        self.constraints = constraints;
        Ok(())
    }

    // ==================== Topology Queries ====================

    /// Whether `v` lies on the tracked border.
    pub fn is_border_vertex(&self, v: VertexId<I>) -> bool {
        self.border.contains(&v)
    }

    /// First triangle having both `a` and `b` as corners.
    pub fn find_face_with(&self, a: VertexId<I>, b: VertexId<I>) -> FaceId<I> {
        self.triangles
            .iter()
            .position(|t| t.contains(a) && t.contains(b))
            .map(FaceId::new)
            .unwrap_or_else(FaceId::invalid)
    }

    /// Whether some triangle has both endpoints of `edge` as corners.
    pub fn contains_edge(&self, edge: &Edge<I>) -> bool {
        self.find_face_with(edge.a, edge.b).is_valid()
    }

    /// First triangle containing `p`, boundary included (linear scan).
    pub fn locate(&self, p: &Point3<f64>) -> FaceId<I> {
        self.face_ids()
            .find(|&f| predicates::point_in_triangle(p, &self.triangle_positions(f)))
            .unwrap_or_else(FaceId::invalid)
    }

    /// Every distinct edge of the triangulation.
    pub fn edges(&self) -> Vec<Edge<I>> {
        let mut seen = HashSet::with_capacity(self.triangles.len() * 3 / 2 + 3);
        let mut edges = Vec::new();
        for t in &self.triangles {
            for e in t.edges() {
                if seen.insert(e) {
                    edges.push(e);
                }
            }
        }
        edges
    }

    // ==================== Geometry ====================

    /// Corner positions of a triangle, in storage order.
    pub fn triangle_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        self.triangles[f.index()]
            .vertices()
            .map(|v| self.vertices[v.index()].position)
    }

    /// Circumcenter of a triangle; non-finite for degenerate triangles.
    pub fn circumcenter(&self, f: FaceId<I>) -> Point3<f64> {
        let [a, b, c] = self.triangle_positions(f);
        predicates::circumcenter(&a, &b, &c)
    }

    /// Interior angles of a triangle in degrees, in corner order.
    pub fn interior_angles(&self, f: FaceId<I>) -> [f64; 3] {
        let [a, b, c] = self.triangle_positions(f);
        predicates::interior_angles(&a, &b, &c)
    }

    /// Whether any interior angle of `f` is below `threshold` degrees.
    pub fn is_poor_quality(&self, f: FaceId<I>, threshold: f64) -> bool {
        let [a, b, c] = self.triangle_positions(f);
        predicates::is_poor_quality(&a, &b, &c, threshold)
    }

    /// Smallest interior angle over all triangles, in degrees.
    pub fn min_angle(&self) -> Option<f64> {
        self.face_ids()
            .flat_map(|f| self.interior_angles(f))
            .filter(|a| !a.is_nan())
            .reduce(f64::min)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;

        let mut min = first.position;
        let mut max = first.position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every topology invariant, reporting the first violation.
    ///
    /// Corners must be in range and distinct, neighbor links symmetric and
    /// stored across the edge both triangles share, and every vertex
    /// back-reference must point at a triangle containing that vertex.
    pub fn validate(&self) -> Result<()> {
        let nv = self.vertices.len();
        let nf = self.triangles.len();

        for (fi, t) in self.triangles.iter().enumerate() {
            let [a, b, c] = t.vertices();
            for v in [a, b, c] {
                if v.index() >= nv {
                    return Err(MeshError::InvalidVertexIndex {
                        face: fi,
                        vertex: v.index(),
                    });
                }
            }
            if a == b || b == c || a == c {
                return Err(MeshError::DegenerateFace { face: fi });
            }

            let face = FaceId::<I>::new(fi);
            for slot in 0..3 {
                let n = t.neighbor(slot);
                if !n.is_valid() {
                    continue;
                }
                if n.index() >= nf || n == face {
                    return Err(MeshError::InvalidState(format!(
                        "face {} has neighbor {:?} in slot {}",
                        fi, n, slot
                    )));
                }
                let other = &self.triangles[n.index()];
                if !other.has_neighbor(face) {
                    return Err(MeshError::AsymmetricNeighbor {
                        face: fi,
                        neighbor: n.index(),
                    });
                }
                let edge = t.shape().edge_opposite(slot);
                if other.neighbor_across(&edge) != face {
                    return Err(MeshError::InvalidState(format!(
                        "faces {} and {} are not linked across {:?}",
                        fi,
                        n.index(),
                        edge
                    )));
                }
            }
        }

        for (vi, v) in self.vertices.iter().enumerate() {
            if v.is_isolated() {
                continue;
            }
            let ok = v.face.index() < nf
                && self.triangles[v.face.index()].contains(VertexId::new(vi));
            if !ok {
                return Err(MeshError::InvalidState(format!(
                    "vertex {} points at {:?}, which does not contain it",
                    vi, v.face
                )));
            }
        }

        Ok(())
    }

    /// Whether no triangle's circumcircle strictly contains the far corner of
    /// any of its neighbors.
    pub fn is_delaunay(&self) -> bool {
        self.face_ids().all(|f| self.conflicting_neighbor(f).is_none())
    }

    /// First neighbor of `f` whose far corner lies inside the circumcircle of `f`.
    pub(crate) fn conflicting_neighbor(&self, f: FaceId<I>) -> Option<FaceId<I>> {
        let t = &self.triangles[f.index()];
        let [p, q, r] = self.triangle_positions(f);
        (0..3).find_map(|slot| {
            let n = t.neighbor(slot);
            if !n.is_valid() {
                return None;
            }
            let edge = t.shape().edge_opposite(slot);
            let s = self.triangles[n.index()].vertex_outside_of(&edge);
            if s.is_valid() && predicates::in_circumcircle(&p, &q, &r, self.position(s)) {
                Some(n)
            } else {
                None
            }
        })
    }

    pub(crate) fn check_face(&self, f: FaceId<I>) -> Result<()> {
        if f.is_valid() && f.index() < self.triangles.len() {
            Ok(())
        } else {
            Err(MeshError::OutOfRange {
                position: f.index(),
                len: self.triangles.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use approx::assert_relative_eq;

    fn square() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh: Mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 0);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.min_angle().is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_empty_resets_everything() {
        let mut mesh = square();
        mesh.set_constraints([(0, 2)]).unwrap();
        mesh.empty();
        assert!(mesh.is_empty());
        assert!(mesh.constraints().is_empty());
        assert_eq!(mesh.index_before_voronoi(), 0);
    }

    #[test]
    fn test_queries() {
        let mesh = square();
        let (v0, v2) = (VertexId::new(0), VertexId::new(2));
        assert!(mesh.contains_edge(&Edge::new(v2, v0)));
        assert!(!mesh.contains_edge(&Edge::new(VertexId::new(1), VertexId::new(3))));

        assert_eq!(mesh.locate(&Point3::new(0.8, 0.2, 0.0)), FaceId::new(0));
        assert_eq!(mesh.locate(&Point3::new(0.2, 0.8, 0.0)), FaceId::new(1));
        assert!(!mesh.locate(&Point3::new(2.0, 2.0, 0.0)).is_valid());

        assert_eq!(mesh.edges().len(), 5);
    }

    #[test]
    fn test_geometry() {
        let mesh = square();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));

        assert_relative_eq!(
            mesh.circumcenter(FaceId::new(0)),
            Point3::new(0.5, 0.5, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(mesh.min_angle().unwrap(), 45.0, epsilon = 1e-9);
        assert!(mesh.is_poor_quality(FaceId::new(0), 50.0));
        assert!(!mesh.is_poor_quality(FaceId::new(0), 40.0));
    }

    #[test]
    fn test_set_constraints_validates_indices() {
        let mut mesh = square();
        let err = mesh.set_constraints([(0, 1), (2, 9)]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidConstraint {
                constraint: 1,
                vertex: 9
            }
        ));
        assert!(mesh.constraints().is_empty());
    }

    #[test]
    fn test_validate_detects_asymmetry() {
        let mut mesh = square();
        assert!(mesh.validate().is_ok());

        mesh.triangles[1].remove_neighbor(FaceId::new(0));
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::AsymmetricNeighbor { face: 0, neighbor: 1 })
        ));
    }

    #[test]
    fn test_validate_detects_stale_back_reference() {
        let mut mesh = square();
        mesh.vertex_mut(VertexId::new(3)).face = FaceId::new(0);
        assert!(matches!(mesh.validate(), Err(MeshError::InvalidState(_))));
    }

    #[test]
    fn test_is_delaunay() {
        // Cocircular square: neither diagonal is strictly illegal.
        assert!(square().is_delaunay());

        // A long thin quad split along its long diagonal is not Delaunay.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, -0.2, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(2.0, 0.2, 0.0),
        ];
        let mesh: Mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert!(!mesh.is_delaunay());
    }
}
