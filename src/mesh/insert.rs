//! Incremental Delaunay insertion.
//!
//! Points are added one at a time. Until a point falls off the line through
//! the earlier ones there is nothing to triangulate; that first off-line point
//! is joined to the whole collinear run, one triangle per gap between
//! consecutive run points. Every later point either splits the triangle that
//! contains it into three,
//! splits the edge it lies on (cutting both sides in two), or lies outside the
//! hull and is connected to every border edge it can see.
//! Either way the affected triangles are then handed to
//! [`Mesh::restore_delaunay`], which flips illegal edges until the local
//! empty-circumcircle property holds again.

use std::collections::VecDeque;

use nalgebra::Point3;
use tracing::{debug, warn};

use super::arena::Mesh;
use super::index::{FaceId, MeshIndex, VertexId};
use super::linker::NeighborLinker;
use super::triangle::{Edge, TopoTriangle};
use super::vertex::Vertex;
use crate::error::{MeshError, Result};
use crate::predicates;

/// Distance under which a new point is considered to coincide with a corner.
pub const COINCIDENT_TOLERANCE: f64 = 1e-10;

impl<I: MeshIndex> Mesh<I> {
    /// Triangulate a sequence of points incrementally, in iteration order.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Result<Self> {
        let mut mesh = Self::new();
        for p in points {
            mesh.insert_point(p)?;
        }
        Ok(mesh)
    }

    /// Insert a point and restore the Delaunay property around it.
    ///
    /// The vertex is always appended, so its index equals the number of
    /// vertices before the call. It stays isolated while every point so far
    /// lies on one line, when it coincides with an existing corner, or when it
    /// lies outside a hull whose border it cannot see (for example a mesh
    /// loaded from an explicit face list).
    pub fn insert_point(&mut self, p: Point3<f64>) -> Result<VertexId<I>> {
        let v = VertexId::new(self.vertices.len());

        if self.triangles.is_empty() {
            self.vertices.push(Vertex::new(p));
            self.start_triangulation(v)?;
            return Ok(v);
        }

        let face = self.locate(&p);
        if face.is_valid() {
            let coincident = self
                .triangle_positions(face)
                .iter()
                .any(|corner| (corner - p).norm() <= COINCIDENT_TOLERANCE);
            self.vertices.push(Vertex::new(p));
            if coincident {
                warn!(
                    "point ({}, {}) coincides with a corner of {:?}; left untriangulated",
                    p.x, p.y, face
                );
                return Ok(v);
            }
            match self.edge_slot_under(face, &p) {
                Some(slot) => {
                    debug!("{:?} lies on an edge of {:?}", v, face);
                    self.split_edge(face, slot, v)?;
                }
                None => {
                    debug!("{:?} splits {:?}", v, face);
                    self.split_triangle(face, v)?;
                }
            }
        } else {
            self.vertices.push(Vertex::new(p));
            debug!("{:?} lies outside the hull", v);
            self.insert_outside(v)?;
        }
        Ok(v)
    }

    /// Triangulate the vertices recorded so far once `v` leaves their line.
    ///
    /// While every vertex lies on one line nothing happens. The first vertex
    /// off that line is fanned to the sorted run; run vertices that coincide
    /// stay isolated. Corners are stored counter-clockwise and the border
    /// clockwise.
    fn start_triangulation(&mut self, v: VertexId<I>) -> Result<()> {
        let run: Vec<VertexId<I>> = (0..v.index()).map(VertexId::new).collect();
        let Some(&first) = run.first() else {
            return Ok(());
        };

        let origin = *self.position(first);
        let Some(far) = run
            .iter()
            .map(|&r| *self.position(r))
            .max_by(|a, b| (*a - origin).norm().total_cmp(&(*b - origin).norm()))
        else {
            return Ok(());
        };
        let span = far - origin;
        if span.norm() <= COINCIDENT_TOLERANCE {
            return Ok(());
        }
        let dir = span / span.norm();
        let offset = |q: &Point3<f64>| dir.x * (q.y - origin.y) - dir.y * (q.x - origin.x);

        if run
            .iter()
            .any(|&r| offset(self.position(r)).abs() > COINCIDENT_TOLERANCE)
        {
            warn!(
                "{:?} added to untriangulated vertices that are not collinear; left isolated",
                v
            );
            return Ok(());
        }
        let side = offset(self.position(v));
        if side.abs() <= COINCIDENT_TOLERANCE {
            debug!("{:?} is collinear with the {} points before it", v, run.len());
            return Ok(());
        }

        let along = |r: VertexId<I>| (*self.position(r) - origin).dot(&dir);
        let mut sorted = run;
        sorted.sort_by(|&a, &b| along(a).total_cmp(&along(b)));
        let mut line: Vec<VertexId<I>> = Vec::with_capacity(sorted.len());
        for r in sorted {
            match line.last().copied() {
                Some(last) if along(r) - along(last) <= COINCIDENT_TOLERANCE => {
                    warn!("{:?} coincides with {:?}; left untriangulated", r, last);
                }
                _ => line.push(r),
            }
        }

        let mut fan = Vec::with_capacity(line.len().saturating_sub(1));
        for pair in line.windows(2) {
            let (a, b) = if side > 0.0 {
                (pair[0], pair[1])
            } else {
                (pair[1], pair[0])
            };
            let f = FaceId::new(self.triangles.len());
            self.triangles.push(TopoTriangle::new(a, b, v));
            for corner in [a, b, v] {
                if self.vertices[corner.index()].is_isolated() {
                    self.vertices[corner.index()].face = f;
                }
            }
            fan.push(f);
        }

        let mut linker = NeighborLinker::with_capacity(fan.len() * 3);
        for &face in &fan {
            linker.link_face(&mut self.triangles, face)?;
        }

        // Counter-clockwise the hull runs along the line, then to `v`.
        let mut border = Vec::with_capacity(line.len() + 1);
        border.push(v);
        if side > 0.0 {
            border.extend(line.iter().rev());
        } else {
            border.extend(line.iter());
        }
        self.border = border;
        debug!("{:?} fanned to a run of {} collinear points", v, line.len());

        self.restore_delaunay(fan)?;
        Ok(())
    }

    /// Split `f` into three triangles fanned from `v`.
    fn split_triangle(&mut self, f: FaceId<I>, v: VertexId<I>) -> Result<()> {
        let old = &self.triangles[f.index()];
        let [a, b, c] = old.vertices();
        let outer = old.neighbors();

        let n0 = FaceId::new(self.triangles.len());
        let n1 = FaceId::new(n0.index() + 1);
        self.triangles.push(TopoTriangle::new(v, c, a));
        self.triangles.push(TopoTriangle::new(v, a, b));
        self.triangles[f.index()] = TopoTriangle::new(v, b, c);

        self.vertices[v.index()].face = f;
        if self.vertices[a.index()].face == f {
            self.vertices[a.index()].face = n0;
        }

        let mut concerned = vec![n0, n1, f];
        concerned.extend(outer.into_iter().filter(|n| n.is_valid()));

        let mut linker = NeighborLinker::with_capacity(concerned.len() * 3);
        for &face in &concerned {
            linker.link_face(&mut self.triangles, face)?;
        }

        self.restore_delaunay(concerned)?;
        Ok(())
    }

    /// Slot of the edge of `f` that `p` lies on, if any.
    fn edge_slot_under(&self, f: FaceId<I>, p: &Point3<f64>) -> Option<usize> {
        let corners = self.triangle_positions(f);
        (0..3).find(|&slot| {
            let u = corners[(slot + 1) % 3];
            let w = corners[(slot + 2) % 3];
            let len = (w - u).norm();
            len > 0.0 && (w - u).cross(&(p - u)).z.abs() / len <= COINCIDENT_TOLERANCE
        })
    }

    /// Split the edge opposite `slot` of `f` at `v`.
    ///
    /// `f` and the neighbor across the edge, if any, are each cut in two, so no
    /// zero-area triangle is created. A hull edge also gains `v` on the border.
    fn split_edge(&mut self, f: FaceId<I>, slot: usize, v: VertexId<I>) -> Result<()> {
        let t = &self.triangles[f.index()];
        let w = t.shape().vertex(slot);
        let u = t.shape().vertex((slot + 1) % 3);
        let z = t.shape().vertex((slot + 2) % 3);
        let g = t.neighbor(slot);

        let mut concerned = vec![f];
        concerned.extend(t.neighbors().into_iter().filter(|n| n.is_valid() && *n != g));

        let f2 = FaceId::new(self.triangles.len());
        self.triangles[f.index()] = TopoTriangle::new(w, u, v);
        self.triangles.push(TopoTriangle::new(w, v, z));
        concerned.push(f2);
        self.vertices[v.index()].face = f;
        if self.vertices[z.index()].face == f {
            self.vertices[z.index()].face = f2;
        }

        if g.is_valid() {
            let other = &self.triangles[g.index()];
            let y = other.opposite_vertex_of(f);
            if !y.is_valid() {
                return Err(MeshError::AsymmetricNeighbor {
                    face: f.index(),
                    neighbor: g.index(),
                });
            }
            concerned.extend(other.neighbors().into_iter().filter(|n| n.is_valid() && *n != f));

            let g2 = FaceId::new(self.triangles.len());
            self.triangles[g.index()] = TopoTriangle::new(y, z, v);
            self.triangles.push(TopoTriangle::new(y, v, u));
            concerned.push(g);
            concerned.push(g2);
            if self.vertices[u.index()].face == g {
                self.vertices[u.index()].face = g2;
            }
        } else {
            // Clockwise border runs z -> u along this hull edge.
            let n = self.border.len();
            if let Some(i) = (0..n).find(|&i| self.border[i] == z && self.border[(i + 1) % n] == u) {
                self.border.insert(i + 1, v);
            }
        }

        let mut linker = NeighborLinker::with_capacity(concerned.len() * 3);
        for &face in &concerned {
            linker.link_face(&mut self.triangles, face)?;
        }

        self.restore_delaunay(concerned)?;
        Ok(())
    }

    /// Connect an outside vertex to every border edge it sees.
    fn insert_outside(&mut self, v: VertexId<I>) -> Result<()> {
        let n = self.border.len();
        let p = *self.position(v);

        let mut usages = vec![0u8; n];
        let mut first = None;
        let mut fan = Vec::new();

        for i in 0..n {
            let cur = self.border[i];
            let next = self.border[(i + 1) % n];
            if !predicates::orientation(self.position(cur), self.position(next), &p) {
                continue;
            }
            first.get_or_insert(i);
            usages[i] += 1;
            usages[(i + 1) % n] += 1;

            let hull_face = self.find_face_with(cur, next);
            let nf = FaceId::new(self.triangles.len());
            self.triangles.push(TopoTriangle::new(cur, next, v));
            if hull_face.is_valid() {
                let edge = Edge::new(next, cur);
                self.triangles[nf.index()].add_neighbor(hull_face, edge)?;
                self.triangles[hull_face.index()].add_neighbor(nf, edge)?;
            }
            self.vertices[v.index()].face = nf;
            fan.push(nf);
        }

        let Some(first) = first else {
            warn!("{:?} sees no border edge; left untriangulated", v);
            return Ok(());
        };

        let mut border = Vec::with_capacity(n + 1);
        for i in 0..n {
            if usages[i] < 2 {
                border.push(self.border[i]);
            }
            if i == first {
                border.push(v);
            }
        }
        self.border = border;

        let mut linker = NeighborLinker::with_capacity(fan.len() * 2);
        for &face in &fan {
            let [cur, next, _] = self.triangles[face.index()].vertices();
            linker.insert(&mut self.triangles, Edge::new(v, cur), face)?;
            linker.insert(&mut self.triangles, Edge::new(v, next), face)?;
        }
        debug!("{:?} added {} hull triangles", v, fan.len());

        let mut seeds = Vec::with_capacity(fan.len() * 2);
        for &face in &fan {
            seeds.push(self.triangles[face.index()].opposite_neighbor_of(v));
            seeds.push(face);
        }
        self.restore_delaunay(seeds)?;
        Ok(())
    }

    /// Flip illegal edges until no queued triangle has a conflicting neighbor.
    ///
    /// Invalid entries in `seeds` are skipped. Returns the number of flips.
    pub fn restore_delaunay(&mut self, seeds: impl IntoIterator<Item = FaceId<I>>) -> Result<usize> {
        let mut queue: VecDeque<FaceId<I>> = seeds.into_iter().collect();
        let mut flips = 0;

        while let Some(cur) = queue.pop_front() {
            if !cur.is_valid() || cur.index() >= self.triangles.len() {
                continue;
            }
            let Some(other) = self.conflicting_neighbor(cur) else {
                continue;
            };

            let t = &self.triangles[cur.index()];
            let u = &self.triangles[other.index()];
            let apex_t = t.opposite_vertex_of(other);
            let apex_u = u.opposite_vertex_of(cur);
            queue.extend([
                t.opposite_neighbor_of(t.adjacent_clockwise(apex_t)),
                t.opposite_neighbor_of(t.adjacent_trigonometric(apex_t)),
                u.opposite_neighbor_of(u.adjacent_clockwise(apex_u)),
                u.opposite_neighbor_of(u.adjacent_trigonometric(apex_u)),
            ]);

            self.flip(cur, other)?;
            flips += 1;
        }

        if flips > 0 {
            debug!("restored Delaunay property with {} flips", flips);
        }
        Ok(flips)
    }

    /// Replace the edge shared by `f1` and `f2` with the other diagonal.
    ///
    /// Both triangles keep their arena index. Vertex back-references that
    /// pointed at a triangle losing that vertex are moved to the other one, and
    /// every neighbor of the pair is rewired.
    ///
    /// # Errors
    ///
    /// [`MeshError::NotAdjacent`] if the triangles do not share an edge.
    pub fn flip(&mut self, f1: FaceId<I>, f2: FaceId<I>) -> Result<()> {
        self.check_face(f1)?;
        self.check_face(f2)?;

        let old1 = &self.triangles[f1.index()];
        let old2 = &self.triangles[f2.index()];
        let u1 = old1.opposite_vertex_of(f2);
        let u2 = old2.opposite_vertex_of(f1);
        if f1 == f2 || !u1.is_valid() || !u2.is_valid() {
            return Err(MeshError::NotAdjacent {
                face: f1.index(),
                other: f2.index(),
            });
        }
        let a = old1.adjacent_trigonometric(u1);
        let b = old2.adjacent_trigonometric(u2);

        let mut concerned = vec![f1, f2];
        for n in old1.neighbors().into_iter().chain(old2.neighbors()) {
            if n.is_valid() && !concerned.contains(&n) {
                concerned.push(n);
            }
        }

        if self.vertices[b.index()].face == f1 {
            self.vertices[b.index()].face = f2;
        }
        if self.vertices[a.index()].face == f2 {
            self.vertices[a.index()].face = f1;
        }

        self.triangles[f1.index()] = TopoTriangle::new(u1, a, u2);
        self.triangles[f2.index()] = TopoTriangle::new(u2, b, u1);

        let mut linker = NeighborLinker::with_capacity(concerned.len() * 3);
        for &face in &concerned {
            linker.link_face(&mut self.triangles, face)?;
        }
        Ok(())
    }
}
