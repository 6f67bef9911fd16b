//! Edge-keyed neighbor wiring.
//!
//! [`NeighborLinker`] is the transient map used whenever a batch of triangles is
//! created or reshaped: each `(edge, face)` pair is offered to the linker, and
//! the second face offering the same undirected edge is wired to the first as a
//! mutual neighbor. Matched entries are dropped, so after a full pass the map
//! only holds unmatched (boundary) edges.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::index::{FaceId, MeshIndex};
use super::triangle::{Edge, TopoTriangle};
use crate::error::Result;

/// Transient edge -> face map used while (re)building adjacency.
#[derive(Debug, Clone, Default)]
pub struct NeighborLinker<I: MeshIndex = u32> {
    pending: HashMap<Edge<I>, FaceId<I>>,
}

impl<I: MeshIndex> NeighborLinker<I> {
    /// Create an empty linker.
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Create a linker sized for roughly `edges` distinct edges.
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            pending: HashMap::with_capacity(edges),
        }
    }

    /// Offer `face` as an owner of `edge`.
    ///
    /// The first face seen for an edge is remembered. A different second face
    /// is wired to it in both directions and the entry is discarded. Offering
    /// the same face twice is a no-op. A third owner of one edge is not detected.
    ///
    /// # Errors
    ///
    /// Fails if `edge` is not an edge of one of the two faces.
    pub fn insert(
        &mut self,
        triangles: &mut [TopoTriangle<I>],
        edge: Edge<I>,
        face: FaceId<I>,
    ) -> Result<()> {
        match self.pending.entry(edge) {
            Entry::Vacant(slot) => {
                slot.insert(face);
            }
            Entry::Occupied(slot) => {
                let other = *slot.get();
                if other != face {
                    slot.remove();
                    triangles[face.index()].add_neighbor(other, edge)?;
                    triangles[other.index()].add_neighbor(face, edge)?;
                }
            }
        }
        Ok(())
    }

    /// Offer all three edges of `face`.
    pub fn link_face(&mut self, triangles: &mut [TopoTriangle<I>], face: FaceId<I>) -> Result<()> {
        for edge in triangles[face.index()].edges() {
            self.insert(triangles, edge, face)?;
        }
        Ok(())
    }

    /// Number of edges still waiting for a second face.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether every offered edge found its partner.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
