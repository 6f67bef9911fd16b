//! Cursors and circulators over the mesh arenas.
//!
//! Both kinds of walker are generic over the element they yield through
//! [`MeshElement`], which is implemented for [`Vertex`] and [`TopoTriangle`].
//! They borrow the mesh, so the borrow checker rules out the stale-iterator
//! bugs an index-based walker would otherwise allow across insertions.
//!
//! - [`Cursor`] is a position in one arena. Dereferencing past the end fails
//!   with [`MeshError::OutOfRange`].
//! - [`Circulator`] turns counter-clockwise around an anchor vertex, one
//!   incident triangle at a time. Its raw [`advance`](Circulator::advance)
//!   never stops on its own; the [`Iterator`] implementation visits every
//!   incident triangle exactly once, for interior and hull anchors alike.
//!   Around a hull anchor the vertex ring has one more entry than the fan has
//!   triangles; the vertex circulator yields it first.

use std::fmt;

use super::arena::Mesh;
use super::index::{FaceId, MeshIndex, VertexId};
use super::triangle::TopoTriangle;
use super::vertex::Vertex;
use crate::error::{MeshError, Result};

/// An element kind stored in a mesh arena.
pub trait MeshElement<I: MeshIndex>: Sized {
    /// The arena holding every element of this kind.
    fn arena(mesh: &Mesh<I>) -> &[Self];

    /// The element a circulator around `center` yields while on `face`.
    ///
    /// Triangles yield the face itself; vertices yield the corner clockwise
    /// of `center`, so a full turn lists each ring vertex once.
    fn around<'a>(mesh: &'a Mesh<I>, face: FaceId<I>, center: VertexId<I>) -> &'a Self;

    /// The element yielded before `face` when it opens the fan at the hull.
    fn hull_lead<'a>(_mesh: &'a Mesh<I>, _face: FaceId<I>, _center: VertexId<I>) -> Option<&'a Self> {
        None
    }
}

impl<I: MeshIndex> MeshElement<I> for Vertex<I> {
    fn arena(mesh: &Mesh<I>) -> &[Self] {
        &mesh.vertices
    }

    fn around<'a>(mesh: &'a Mesh<I>, face: FaceId<I>, center: VertexId<I>) -> &'a Self {
        let ring = mesh.triangles[face.index()].adjacent_clockwise(center);
        &mesh.vertices[ring.index()]
    }

    fn hull_lead<'a>(mesh: &'a Mesh<I>, face: FaceId<I>, center: VertexId<I>) -> Option<&'a Self> {
        let ring = mesh.triangles[face.index()].adjacent_trigonometric(center);
        mesh.vertices.get(ring.index())
    }
}

impl<I: MeshIndex> MeshElement<I> for TopoTriangle<I> {
    fn arena(mesh: &Mesh<I>) -> &[Self] {
        &mesh.triangles
    }

    fn around<'a>(mesh: &'a Mesh<I>, face: FaceId<I>, _center: VertexId<I>) -> &'a Self {
        &mesh.triangles[face.index()]
    }
}

/// A position in one of the mesh arenas.
pub struct Cursor<'a, I: MeshIndex, E> {
    mesh: &'a Mesh<I>,
    position: usize,
    _element: std::marker::PhantomData<&'a E>,
}

/// Cursor over the vertex arena.
pub type VertexCursor<'a, I = u32> = Cursor<'a, I, Vertex<I>>;

/// Cursor over the triangle arena.
pub type TriangleCursor<'a, I = u32> = Cursor<'a, I, TopoTriangle<I>>;

impl<'a, I: MeshIndex, E: MeshElement<I>> Cursor<'a, I, E> {
    fn new(mesh: &'a Mesh<I>, position: usize) -> Self {
        Self {
            mesh,
            position,
            _element: std::marker::PhantomData,
        }
    }

    /// The element under the cursor.
    ///
    /// # Errors
    ///
    /// [`MeshError::OutOfRange`] once the cursor has run past the arena.
    pub fn get(&self) -> Result<&'a E> {
        let arena = E::arena(self.mesh);
        arena.get(self.position).ok_or(MeshError::OutOfRange {
            position: self.position,
            len: arena.len(),
        })
    }

    /// Step forward and return the cursor (pre-increment).
    pub fn advance(&mut self) -> &mut Self {
        self.position += 1;
        self
    }

    /// Step forward and return the previous position (post-increment).
    pub fn post_advance(&mut self) -> Self {
        let before = self.clone();
        self.position += 1;
        before
    }

    /// Current index in the arena.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the cursor can be dereferenced.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.position < E::arena(self.mesh).len()
    }
}

impl<I: MeshIndex, E> Clone for Cursor<'_, I, E> {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh,
            position: self.position,
            _element: std::marker::PhantomData,
        }
    }
}

impl<I: MeshIndex, E> PartialEq for Cursor<'_, I, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh) && self.position == other.position
    }
}

impl<I: MeshIndex, E> Eq for Cursor<'_, I, E> {}

impl<I: MeshIndex, E> fmt::Debug for Cursor<'_, I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .finish()
    }
}

impl<'a, I: MeshIndex, E: MeshElement<I> + 'a> Iterator for Cursor<'a, I, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let item = E::arena(self.mesh).get(self.position)?;
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = E::arena(self.mesh).len().saturating_sub(self.position);
        (n, Some(n))
    }
}

/// Walks the triangles incident to an anchor vertex, counter-clockwise.
pub struct Circulator<'a, I: MeshIndex, E> {
    mesh: &'a Mesh<I>,
    center: VertexId<I>,
    start: FaceId<I>,
    current: FaceId<I>,
    remaining: usize,
    open: bool,
    _element: std::marker::PhantomData<&'a E>,
}

/// Circulator yielding the ring vertices of the anchor.
pub type VertexCirculator<'a, I = u32> = Circulator<'a, I, Vertex<I>>;

/// Circulator yielding the triangles incident to the anchor.
pub type TriangleCirculator<'a, I = u32> = Circulator<'a, I, TopoTriangle<I>>;

impl<'a, I: MeshIndex, E: MeshElement<I>> Circulator<'a, I, E> {
    fn new(mesh: &'a Mesh<I>, center: VertexId<I>) -> Self {
        let start = mesh
            .vertices
            .get(center.index())
            .map(|v| first_of_fan(mesh, center, v.face))
            .unwrap_or_else(FaceId::invalid);
        let open = start.is_valid()
            && !mesh.triangles[start.index()]
                .adjacent_triangle_clockwise(center)
                .is_valid();
        Self {
            mesh,
            center,
            start,
            current: start,
            remaining: mesh.triangles.len(),
            open,
            _element: std::marker::PhantomData,
        }
    }

    /// The anchor vertex.
    #[inline]
    pub fn center(&self) -> VertexId<I> {
        self.center
    }

    /// The triangle the circulator is on.
    #[inline]
    pub fn face(&self) -> FaceId<I> {
        self.current
    }

    /// Whether the circulator is on a triangle.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.current.is_valid() && self.current.index() < self.mesh.triangles.len()
    }

    /// The element at the current triangle.
    ///
    /// # Errors
    ///
    /// [`MeshError::OutOfRange`] when the circulator stepped off the hull or the
    /// anchor is isolated.
    pub fn get(&self) -> Result<&'a E> {
        if !self.is_valid() {
            return Err(MeshError::OutOfRange {
                position: self.current.index(),
                len: self.mesh.triangles.len(),
            });
        }
        Ok(E::around(self.mesh, self.current, self.center))
    }

    /// Move to the next triangle counter-clockwise around the anchor.
    ///
    /// Around an interior vertex this cycles forever; the caller compares
    /// against the start. At the hull the circulator becomes invalid.
    pub fn advance(&mut self) -> &mut Self {
        if self.is_valid() {
            self.current = self.mesh.triangles[self.current.index()]
                .adjacent_triangle_trigonometric(self.center);
        }
        self
    }
}

/// Rewind clockwise from `face` to the first triangle of the fan around `center`.
///
/// For an interior vertex the whole ring is closed and `face` is returned.
fn first_of_fan<I: MeshIndex>(mesh: &Mesh<I>, center: VertexId<I>, face: FaceId<I>) -> FaceId<I> {
    if !face.is_valid() || face.index() >= mesh.triangles.len() {
        return FaceId::invalid();
    }
    let mut f = face;
    for _ in 0..mesh.triangles.len() {
        let prev = mesh.triangles[f.index()].adjacent_triangle_clockwise(center);
        if !prev.is_valid() {
            return f;
        }
        if prev == face {
            break;
        }
        f = prev;
    }
    face
}

impl<I: MeshIndex, E> Clone for Circulator<'_, I, E> {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh,
            center: self.center,
            start: self.start,
            current: self.current,
            remaining: self.remaining,
            open: self.open,
            _element: std::marker::PhantomData,
        }
    }
}

impl<I: MeshIndex, E> PartialEq for Circulator<'_, I, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh)
            && self.center == other.center
            && self.current == other.current
    }
}

impl<I: MeshIndex, E> fmt::Debug for Circulator<'_, I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circulator")
            .field("center", &self.center)
            .field("current", &self.current)
            .finish()
    }
}

impl<'a, I: MeshIndex, E: MeshElement<I> + 'a> Iterator for Circulator<'a, I, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        if self.open {
            self.open = false;
            if let Some(item) = E::hull_lead(self.mesh, self.start, self.center) {
                return Some(item);
            }
        }
        if self.remaining == 0 || !self.is_valid() {
            return None;
        }
        let item = E::around(self.mesh, self.current, self.center);
        self.remaining -= 1;
        self.advance();
        if self.current == self.start {
            self.remaining = 0;
        }
        Some(item)
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Cursor over the vertex arena, starting at `position`.
    pub fn vertex_cursor(&self, position: usize) -> VertexCursor<'_, I> {
        Cursor::new(self, position)
    }

    /// Cursor over the triangle arena, starting at `position`.
    pub fn triangle_cursor(&self, position: usize) -> TriangleCursor<'_, I> {
        Cursor::new(self, position)
    }

    /// Circulate over the ring vertices of `center`.
    pub fn vertex_circulator(&self, center: VertexId<I>) -> VertexCirculator<'_, I> {
        Circulator::new(self, center)
    }

    /// Circulate over the triangles incident to `center`.
    pub fn triangle_circulator(&self, center: VertexId<I>) -> TriangleCirculator<'_, I> {
        Circulator::new(self, center)
    }

    /// IDs of the triangles incident to `v`, counter-clockwise.
    pub fn faces_around(&self, v: VertexId<I>) -> Vec<FaceId<I>> {
        let mut circ = self.triangle_circulator(v);
        let mut faces = Vec::new();
        loop {
            let face = circ.face();
            if circ.next().is_none() {
                break;
            }
            faces.push(face);
        }
        faces
    }
}
