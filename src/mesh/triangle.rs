//! Triangle shapes and their adjacency slots.
//!
//! A [`Triangle`] is nothing more than three vertex indices stored in
//! counter-clockwise (trigonometric) order. A [`TopoTriangle`] adds one neighbor
//! slot per edge: slot `i` holds the triangle across the edge that does *not*
//! contain corner `i`, so "the neighbor opposite vertex `v`" is a direct lookup.
//!
//! Both types are plain values. Cloning copies corners and neighbors;
//! `std::mem::take` moves the state out and leaves the source in the reset state
//! (corners `0, 0, 0`, no neighbors), which is what [`Default`] produces.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::error;

use super::index::{FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// An undirected edge between two vertices.
///
/// Equality and hashing ignore the order of the endpoints, so `Edge::new(a, b)`
/// and `Edge::new(b, a)` are the same map key.
#[derive(Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// First endpoint.
    pub a: VertexId<I>,
    /// Second endpoint.
    pub b: VertexId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create an edge between `a` and `b`.
    #[inline]
    pub fn new(a: VertexId<I>, b: VertexId<I>) -> Self {
        Self { a, b }
    }

    /// The sentinel edge returned when no edge exists.
    #[inline]
    pub fn invalid() -> Self {
        Self::new(VertexId::invalid(), VertexId::invalid())
    }

    /// Whether both endpoints are real vertices.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.a.is_valid() && self.b.is_valid()
    }

    /// Endpoints sorted so that `key().0 <= key().1`.
    #[inline]
    pub fn key(&self) -> (VertexId<I>, VertexId<I>) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    /// Whether `v` is one of the endpoints.
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint that is not `v`.
    pub fn other(&self, v: VertexId<I>) -> Option<VertexId<I>> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }
}

impl<I: MeshIndex> PartialEq for Edge<I> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<I: MeshIndex> Eq for Edge<I> {}

impl<I: MeshIndex> Hash for Edge<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<I: MeshIndex> fmt::Debug for Edge<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({:?}, {:?})", self.a, self.b)
    }
}

/// The shape of a triangle: three distinct vertex indices, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle<I: MeshIndex = u32> {
    vertices: [VertexId<I>; 3],
}

impl<I: MeshIndex> Triangle<I> {
    /// Create a triangle from three corners given counter-clockwise.
    #[inline]
    pub fn new(a: VertexId<I>, b: VertexId<I>, c: VertexId<I>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Build a triangle from a slice of exactly three vertex indices.
    pub fn from_slice(vertices: &[VertexId<I>]) -> Result<Self> {
        match vertices {
            [a, b, c] => Ok(Self::new(*a, *b, *c)),
            _ => Err(MeshError::InvalidState(format!(
                "a triangle needs 3 vertices, got {}",
                vertices.len()
            ))),
        }
    }

    /// The three corners in storage order.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 3] {
        self.vertices
    }

    /// The corner stored in `slot` (0, 1 or 2).
    #[inline]
    pub fn vertex(&self, slot: usize) -> VertexId<I> {
        self.vertices[slot]
    }

    /// Local slot of `v`, if it is a corner of this triangle.
    #[inline]
    pub fn find_vertex_index(&self, v: VertexId<I>) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }

    /// Whether `v` is a corner of this triangle.
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.find_vertex_index(v).is_some()
    }

    /// The corner following `v` counter-clockwise.
    ///
    /// If `v` is not a corner the slot-0 vertex is returned; callers must
    /// guarantee membership.
    pub fn adjacent_trigonometric(&self, v: VertexId<I>) -> VertexId<I> {
        match self.find_vertex_index(v) {
            Some(i) => self.vertices[(i + 1) % 3],
            None => self.vertices[0],
        }
    }

    /// The corner following `v` clockwise.
    ///
    /// Same non-membership behavior as [`adjacent_trigonometric`](Self::adjacent_trigonometric).
    pub fn adjacent_clockwise(&self, v: VertexId<I>) -> VertexId<I> {
        match self.find_vertex_index(v) {
            Some(i) => self.vertices[(i + 2) % 3],
            None => self.vertices[0],
        }
    }

    /// The edge opposite corner `slot`.
    #[inline]
    pub fn edge_opposite(&self, slot: usize) -> Edge<I> {
        Edge::new(self.vertices[(slot + 1) % 3], self.vertices[(slot + 2) % 3])
    }

    /// The three edges, `(v0, v1)`, `(v1, v2)` and `(v2, v0)`.
    pub fn edges(&self) -> [Edge<I>; 3] {
        let [a, b, c] = self.vertices;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    /// Slot of the corner that is not on `edge`, if both endpoints are corners.
    pub fn slot_opposite(&self, edge: &Edge<I>) -> Option<usize> {
        let ea = self.find_vertex_index(edge.a)?;
        let eb = self.find_vertex_index(edge.b)?;
        if ea == eb {
            return None;
        }
        Some(3 - ea - eb)
    }

    /// Reset to the `(0, 0, 0)` placeholder.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    fn raw(&self) -> [usize; 3] {
        self.vertices.map(|v| v.index())
    }
}

impl<I: MeshIndex> Default for Triangle<I> {
    fn default() -> Self {
        let zero = VertexId::new(0);
        Self::new(zero, zero, zero)
    }
}

impl<I: MeshIndex> From<[VertexId<I>; 3]> for Triangle<I> {
    fn from(vertices: [VertexId<I>; 3]) -> Self {
        Self { vertices }
    }
}

/// A triangle together with its three neighbor slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoTriangle<I: MeshIndex = u32> {
    shape: Triangle<I>,
    neighbors: [FaceId<I>; 3],
}

impl<I: MeshIndex> TopoTriangle<I> {
    /// Create a triangle with no neighbors.
    pub fn new(a: VertexId<I>, b: VertexId<I>, c: VertexId<I>) -> Self {
        Self::from_triangle(Triangle::new(a, b, c))
    }

    /// Attach empty neighbor slots to a shape.
    pub fn from_triangle(shape: Triangle<I>) -> Self {
        Self {
            shape,
            neighbors: [FaceId::invalid(); 3],
        }
    }

    /// The underlying shape.
    #[inline]
    pub fn shape(&self) -> &Triangle<I> {
        &self.shape
    }

    /// The three corners in storage order.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 3] {
        self.shape.vertices()
    }

    /// See [`Triangle::find_vertex_index`].
    #[inline]
    pub fn find_vertex_index(&self, v: VertexId<I>) -> Option<usize> {
        self.shape.find_vertex_index(v)
    }

    /// See [`Triangle::contains`].
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.shape.contains(v)
    }

    /// See [`Triangle::adjacent_trigonometric`].
    #[inline]
    pub fn adjacent_trigonometric(&self, v: VertexId<I>) -> VertexId<I> {
        self.shape.adjacent_trigonometric(v)
    }

    /// See [`Triangle::adjacent_clockwise`].
    #[inline]
    pub fn adjacent_clockwise(&self, v: VertexId<I>) -> VertexId<I> {
        self.shape.adjacent_clockwise(v)
    }

    /// See [`Triangle::edges`].
    #[inline]
    pub fn edges(&self) -> [Edge<I>; 3] {
        self.shape.edges()
    }

    /// All three neighbor slots; slot `i` lies opposite corner `i`.
    #[inline]
    pub fn neighbors(&self) -> [FaceId<I>; 3] {
        self.neighbors
    }

    /// Neighbor slot `slot`.
    #[inline]
    pub fn neighbor(&self, slot: usize) -> FaceId<I> {
        self.neighbors[slot]
    }

    /// Whether `face` is recorded in one of the slots.
    #[inline]
    pub fn has_neighbor(&self, face: FaceId<I>) -> bool {
        face.is_valid() && self.neighbors.contains(&face)
    }

    /// Store `neighbor` in the slot opposite `edge`.
    ///
    /// # Errors
    ///
    /// [`MeshError::EdgeNotInTriangle`] if the two endpoints are not both corners.
    pub fn add_neighbor(&mut self, neighbor: FaceId<I>, edge: Edge<I>) -> Result<&mut Self> {
        let slot = self
            .shape
            .slot_opposite(&edge)
            .ok_or_else(|| MeshError::EdgeNotInTriangle {
                neighbor: neighbor.index(),
                a: edge.a.index(),
                b: edge.b.index(),
                vertices: self.shape.raw(),
            })?;
        self.neighbors[slot] = neighbor;
        Ok(self)
    }

    /// Clear every slot that holds `neighbor`.
    pub fn remove_neighbor(&mut self, neighbor: FaceId<I>) -> &mut Self {
        for slot in self.neighbors.iter_mut() {
            if *slot == neighbor {
                *slot = FaceId::invalid();
            }
        }
        self
    }

    /// The next triangle counter-clockwise around corner `v`.
    ///
    /// That is the neighbor across the edge joining `v` to its clockwise
    /// successor. None if `v` is not a corner or the edge is on the hull.
    pub fn adjacent_triangle_trigonometric(&self, v: VertexId<I>) -> FaceId<I> {
        match self.find_vertex_index(v) {
            Some(i) => self.neighbors[(i + 1) % 3],
            None => FaceId::invalid(),
        }
    }

    /// The next triangle clockwise around corner `v`.
    pub fn adjacent_triangle_clockwise(&self, v: VertexId<I>) -> FaceId<I> {
        match self.find_vertex_index(v) {
            Some(i) => self.neighbors[(i + 2) % 3],
            None => FaceId::invalid(),
        }
    }

    /// The corner not shared with `neighbor`, or none if it is not a neighbor.
    pub fn opposite_vertex_of(&self, neighbor: FaceId<I>) -> VertexId<I> {
        if !neighbor.is_valid() {
            return VertexId::invalid();
        }
        match self.neighbors.iter().position(|&n| n == neighbor) {
            Some(slot) => self.shape.vertex(slot),
            None => VertexId::invalid(),
        }
    }

    /// The neighbor across the edge that does not contain `vertex`.
    pub fn opposite_neighbor_of(&self, vertex: VertexId<I>) -> FaceId<I> {
        match self.find_vertex_index(vertex) {
            Some(slot) => self.neighbors[slot],
            None => FaceId::invalid(),
        }
    }

    /// The edge made of the two corners other than `vertex`.
    pub fn edge_without(&self, vertex: VertexId<I>) -> Option<Edge<I>> {
        self.find_vertex_index(vertex)
            .map(|slot| self.shape.edge_opposite(slot))
    }

    /// The corner that is not an endpoint of `edge`.
    pub fn vertex_outside_of(&self, edge: &Edge<I>) -> VertexId<I> {
        self.vertices()
            .into_iter()
            .find(|&v| !edge.contains(v))
            .unwrap_or_else(VertexId::invalid)
    }

    /// The neighbor stored across `edge`.
    pub fn neighbor_across(&self, edge: &Edge<I>) -> FaceId<I> {
        match self.shape.slot_opposite(edge) {
            Some(slot) => self.neighbors[slot],
            None => FaceId::invalid(),
        }
    }

    /// The two corners shared with `neighbor`.
    ///
    /// Returns `None` and logs an error when `neighbor` is not adjacent.
    pub fn common_edge(&self, neighbor: FaceId<I>) -> Option<Edge<I>> {
        let slot = if neighbor.is_valid() {
            self.neighbors.iter().position(|&n| n == neighbor)
        } else {
            None
        };
        match slot {
            Some(slot) => Some(self.shape.edge_opposite(slot)),
            None => {
                error!(
                    "common_edge: {:?} is not a neighbor of {:?}",
                    neighbor,
                    self.vertices()
                );
                None
            }
        }
    }

    /// Reset corners to `(0, 0, 0)` and clear every neighbor.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }
}

impl<I: MeshIndex> Default for TopoTriangle<I> {
    fn default() -> Self {
        Self::from_triangle(Triangle::default())
    }
}

impl<I: MeshIndex> From<Triangle<I>> for TopoTriangle<I> {
    fn from(shape: Triangle<I>) -> Self {
        Self::from_triangle(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn f(i: usize) -> FaceId {
        FaceId::new(i)
    }

    #[test]
    fn test_edge_equality_ignores_order() {
        assert_eq!(Edge::new(v(1), v(4)), Edge::new(v(4), v(1)));
        assert_ne!(Edge::new(v(1), v(4)), Edge::new(v(1), v(5)));

        let mut set = HashSet::new();
        set.insert(Edge::new(v(2), v(3)));
        assert!(set.contains(&Edge::new(v(3), v(2))));
    }

    #[test]
    fn test_edge_other() {
        let e = Edge::new(v(2), v(9));
        assert_eq!(e.other(v(2)), Some(v(9)));
        assert_eq!(e.other(v(9)), Some(v(2)));
        assert_eq!(e.other(v(3)), None);
        assert!(!Edge::<u32>::invalid().is_valid());
    }

    #[test]
    fn test_rotation_queries() {
        let t = Triangle::new(v(4), v(7), v(9));
        assert_eq!(t.find_vertex_index(v(7)), Some(1));
        assert_eq!(t.find_vertex_index(v(5)), None);

        assert_eq!(t.adjacent_trigonometric(v(4)), v(7));
        assert_eq!(t.adjacent_trigonometric(v(9)), v(4));
        assert_eq!(t.adjacent_clockwise(v(4)), v(9));
        assert_eq!(t.adjacent_clockwise(v(7)), v(4));

        // Absent vertex falls back to slot 0.
        assert_eq!(t.adjacent_trigonometric(v(100)), v(4));
        assert_eq!(t.adjacent_clockwise(v(100)), v(4));
    }

    #[test]
    fn test_from_slice() {
        let t = Triangle::from_slice(&[v(0), v(1), v(2)]).unwrap();
        assert_eq!(t.vertices(), [v(0), v(1), v(2)]);
        assert!(Triangle::<u32>::from_slice(&[v(0), v(1)]).is_err());
    }

    #[test]
    fn test_take_leaves_reset_state() {
        let mut t = TopoTriangle::new(v(3), v(4), v(5));
        t.add_neighbor(f(8), Edge::new(v(4), v(5))).unwrap();

        let moved = std::mem::take(&mut t);
        assert_eq!(moved.vertices(), [v(3), v(4), v(5)]);
        assert_eq!(moved.neighbor(0), f(8));

        assert_eq!(t.vertices(), [v(0), v(0), v(0)]);
        assert!(t.neighbors().iter().all(|n| !n.is_valid()));
    }

    #[test]
    fn test_add_neighbor_slot_is_opposite_corner() {
        let mut t = TopoTriangle::new(v(0), v(1), v(2));
        t.add_neighbor(f(10), Edge::new(v(1), v(2))).unwrap();
        t.add_neighbor(f(11), Edge::new(v(0), v(2))).unwrap();
        t.add_neighbor(f(12), Edge::new(v(1), v(0))).unwrap();

        assert_eq!(t.neighbors(), [f(10), f(11), f(12)]);
        assert_eq!(t.opposite_neighbor_of(v(0)), f(10));
        assert_eq!(t.opposite_vertex_of(f(12)), v(2));
        assert_eq!(t.neighbor_across(&Edge::new(v(2), v(0))), f(11));
    }

    #[test]
    fn test_add_neighbor_rejects_foreign_edge() {
        let mut t = TopoTriangle::new(v(0), v(1), v(2));
        let err = t.add_neighbor(f(3), Edge::new(v(0), v(7))).unwrap_err();
        assert!(matches!(err, MeshError::EdgeNotInTriangle { neighbor: 3, .. }));
        assert!(t.neighbors().iter().all(|n| !n.is_valid()));
    }

    #[test]
    fn test_opposite_queries_on_missing_entries() {
        let t = TopoTriangle::new(v(0), v(1), v(2));
        assert!(!t.opposite_vertex_of(f(5)).is_valid());
        assert!(!t.opposite_vertex_of(FaceId::invalid()).is_valid());
        assert!(!t.opposite_neighbor_of(v(9)).is_valid());
    }

    #[test]
    fn test_common_edge() {
        let mut t = TopoTriangle::new(v(0), v(1), v(2));
        t.add_neighbor(f(4), Edge::new(v(2), v(0))).unwrap();

        let e = t.common_edge(f(4)).unwrap();
        assert_eq!(e, Edge::new(v(0), v(2)));
        assert!(t.common_edge(f(5)).is_none());
    }

    #[test]
    fn test_adjacent_triangles_around_corner() {
        // Slot i is opposite corner i.
        let mut t = TopoTriangle::new(v(0), v(1), v(2));
        t.add_neighbor(f(10), Edge::new(v(1), v(2))).unwrap();
        t.add_neighbor(f(11), Edge::new(v(2), v(0))).unwrap();
        t.add_neighbor(f(12), Edge::new(v(0), v(1))).unwrap();

        // Counter-clockwise around v0 crosses the edge (v0, v2).
        assert_eq!(t.adjacent_triangle_trigonometric(v(0)), f(11));
        // Clockwise around v0 crosses the edge (v0, v1).
        assert_eq!(t.adjacent_triangle_clockwise(v(0)), f(12));
        assert!(!t.adjacent_triangle_trigonometric(v(6)).is_valid());
    }

    #[test]
    fn test_remove_neighbor_and_outside_vertex() {
        let mut t = TopoTriangle::new(v(0), v(1), v(2));
        t.add_neighbor(f(4), Edge::new(v(0), v(1))).unwrap();
        t.remove_neighbor(f(4));
        assert!(!t.has_neighbor(f(4)));

        assert_eq!(t.vertex_outside_of(&Edge::new(v(0), v(2))), v(1));
        assert_eq!(t.edge_without(v(1)), Some(Edge::new(v(2), v(0))));
        assert_eq!(t.edge_without(v(7)), None);
    }
}
