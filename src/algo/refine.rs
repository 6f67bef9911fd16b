//! Ruppert refinement.
//!
//! Constrained Delaunay refinement inserts Steiner points until constraint
//! segments are free of encroachment and skinny triangles are gone. Two
//! worklists drive it:
//!
//! - **encroached** segments, starting with the constraints that do not yet
//!   appear in the triangulation (no triangle has both endpoints as corners);
//! - **poor** triangles, with an interior angle below [`RefineOptions::min_angle`].
//!
//! Segments take priority: each encroached segment is split at its center and
//! its halves replace it in the protected set. A poor triangle's circumcenter
//! is inserted unless it would encroach a protected segment, in which case that
//! segment is split first and the triangle is looked at again. A circumcenter
//! outside the hull means some protected segment is encroached by a mesh
//! vertex; that segment is split instead, and when there is none the triangle
//! is skipped. Triangles created by an insertion join the poor worklist, and
//! the run only ends once a full pass over the mesh finds nothing left to do.
//!
//! # Example
//!
//! ```
//! use tessel::algo::refine::{refine, RefineOptions};
//! use tessel::mesh::Mesh;
//! use nalgebra::Point3;
//!
//! let mut mesh: Mesh = Mesh::from_points([
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ])
//! .unwrap();
//! mesh.set_constraints([(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]).unwrap();
//!
//! let stats = refine(&mut mesh, &RefineOptions::default()).unwrap();
//! assert_eq!(stats.segments_split, 1);
//! ```
//!
//! # References
//!
//! - Ruppert, J. (1995). "A Delaunay Refinement Algorithm for Quality
//!   2-Dimensional Mesh Generation." Journal of Algorithms.

use std::collections::VecDeque;

use nalgebra::Point3;
use tracing::{debug, info, warn};

use crate::error::{MeshError, Result};
use crate::mesh::{Edge, FaceId, Mesh, MeshIndex, VertexId, COINCIDENT_TOLERANCE};
use crate::predicates;

use super::Progress;

/// Where a constraint segment is split, and which circle it guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiametralCenter {
    /// The true midpoint `a + (b - a) / 2`, with the segment as diameter.
    #[default]
    Midpoint,

    /// The half-difference `(b - a) / 2` taken as a position, with the
    /// squared-norm radius test of [`predicates::in_diametral_circle_legacy`].
    ///
    /// Only agrees with [`Midpoint`](Self::Midpoint) for segments starting at
    /// the origin; kept to reproduce older refinements.
    HalfDifference,
}

impl DiametralCenter {
    /// The point inserted when the segment `a`-`b` is split.
    pub fn split_point(self, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
        match self {
            DiametralCenter::Midpoint => predicates::midpoint(a, b),
            DiametralCenter::HalfDifference => predicates::half_difference(a, b),
        }
    }

    /// Whether `t` encroaches the segment `a`-`b`.
    pub fn encroaches(self, a: &Point3<f64>, b: &Point3<f64>, t: &Point3<f64>) -> bool {
        match self {
            DiametralCenter::Midpoint => predicates::in_diametral_circle(a, b, t),
            DiametralCenter::HalfDifference => predicates::in_diametral_circle_legacy(a, b, t),
        }
    }
}

/// Options for Ruppert refinement.
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Triangles with an interior angle below this many degrees are refined.
    /// Must lie strictly between 0 and 60.
    pub min_angle: f64,

    /// Segment center convention.
    pub center: DiametralCenter,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            min_angle: 22.0,
            center: DiametralCenter::Midpoint,
        }
    }
}

impl RefineOptions {
    /// Create options with the specified minimum angle, in degrees.
    pub fn with_min_angle(mut self, min_angle: f64) -> Self {
        self.min_angle = min_angle;
        self
    }

    /// Create options with the specified segment center convention.
    pub fn with_center(mut self, center: DiametralCenter) -> Self {
        self.center = center;
        self
    }

    /// Create options using the half-difference segment center.
    pub fn legacy(self) -> Self {
        self.with_center(DiametralCenter::HalfDifference)
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_angle > 0.0 && self.min_angle < 60.0) {
            return Err(MeshError::invalid_param(
                "min_angle",
                self.min_angle,
                "must be between 0 and 60 degrees",
            ));
        }
        Ok(())
    }
}

/// What a refinement pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Constraint segments split at their center.
    pub segments_split: usize,

    /// Circumcenters of poor triangles inserted.
    pub circumcenters_inserted: usize,

    /// Circumcenters rejected in favor of splitting an encroached segment.
    pub deferred: usize,

    /// Poor triangles left alone: degenerate, or with a circumcenter outside
    /// the hull or on an existing vertex. Also counts segment centers that
    /// landed on an existing vertex.
    pub skipped: usize,
}

/// Refine `mesh` against its constraints.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] for a bad `min_angle`,
/// [`MeshError::EmptyMesh`] if there is nothing to refine.
pub fn refine<I: MeshIndex>(mesh: &mut Mesh<I>, options: &RefineOptions) -> Result<RefineStats> {
    refine_with_progress(mesh, options, &Progress::none())
}

/// Ruppert refinement with progress reporting.
///
/// One step is reported per worklist entry consumed; the total grows as
/// insertions queue new work.
pub fn refine_with_progress<I: MeshIndex>(
    mesh: &mut Mesh<I>,
    options: &RefineOptions,
    progress: &Progress,
) -> Result<RefineStats> {
    options.validate()?;
    if mesh.num_triangles() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let mut poor: VecDeque<FaceId<I>> = mesh
        .face_ids()
        .filter(|&f| mesh.is_poor_quality(f, options.min_angle))
        .collect();
    let (encroached, mut segments): (Vec<Edge<I>>, Vec<Edge<I>>) = mesh
        .constraints()
        .iter()
        .copied()
        .partition(|s| !mesh.contains_edge(s));
    let mut encroached: VecDeque<Edge<I>> = encroached.into();

    info!(
        "refine: {} poor triangles, {} encroached segments, {} present segments",
        poor.len(),
        encroached.len(),
        segments.len()
    );

    let mut done = 0;
    let mut stats = RefineStats::default();

    loop {
        if let Some(segment) = encroached.pop_front() {
            let p = options
                .center
                .split_point(mesh.position(segment.a), mesh.position(segment.b));
            let v = mesh.insert_point(p)?;
            if mesh.vertex(v).is_isolated() {
                warn!("refine: center of {:?} is not a new vertex, dropping it", segment);
                stats.skipped += 1;
            } else {
                debug!("refine: split {:?} at {:?}", segment, v);
                stats.segments_split += 1;
                for half in [Edge::new(segment.a, v), Edge::new(v, segment.b)] {
                    if mesh.contains_edge(&half) {
                        segments.push(half);
                    } else {
                        debug!("refine: {:?} is not in the triangulation, dropping it", half);
                    }
                }
                queue_poor_around(mesh, v, options.min_angle, &mut poor);
            }
            done += 1;
        } else if let Some(f) = poor.pop_front() {
            match treatment(mesh, f, &segments, options) {
                Treatment::Fine => {}
                Treatment::Skip(reason) => {
                    if reason == DEGENERATE {
                        warn!("refine: {:?} is degenerate, skipping it", f);
                    } else {
                        debug!("refine: skipping {:?}: {}", f, reason);
                    }
                    stats.skipped += 1;
                }
                Treatment::Defer(i) => {
                    let segment = segments.remove(i);
                    debug!("refine: {:?} needs {:?} split first", f, segment);
                    encroached.push_back(segment);
                    poor.push_front(f);
                    stats.deferred += 1;
                }
                Treatment::Insert(c) => {
                    let v = mesh.insert_point(c)?;
                    debug!("refine: inserted circumcenter of {:?} as {:?}", f, v);
                    stats.circumcenters_inserted += 1;
                    queue_poor_around(mesh, v, options.min_angle, &mut poor);
                }
            }
            done += 1;
        } else {
            let view: &Mesh<I> = mesh;
            let pending: Vec<FaceId<I>> = view
                .face_ids()
                .filter(|&f| {
                    matches!(
                        treatment(view, f, &segments, options),
                        Treatment::Defer(_) | Treatment::Insert(_)
                    )
                })
                .collect();
            if pending.is_empty() {
                break;
            }
            debug!("refine: final pass found {} poor triangles", pending.len());
            poor.extend(pending);
        }
        progress.report_open(done, poor.len() + encroached.len(), "Refining");
    }

    info!(
        "refine: split {} segments, inserted {} circumcenters ({} deferred, {} skipped)",
        stats.segments_split, stats.circumcenters_inserted, stats.deferred, stats.skipped
    );
    Ok(stats)
}

const DEGENERATE: &str = "degenerate triangle";

/// What a triangle taken from the poor worklist calls for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Treatment {
    /// Not (or no longer) below the angle bound.
    Fine,
    /// Nothing can be inserted for it.
    Skip(&'static str),
    /// The protected segment at this index must be split first.
    Defer(usize),
    /// Insert this circumcenter.
    Insert(Point3<f64>),
}

fn treatment<I: MeshIndex>(
    mesh: &Mesh<I>,
    f: FaceId<I>,
    segments: &[Edge<I>],
    options: &RefineOptions,
) -> Treatment {
    if f.index() >= mesh.num_triangles() || !mesh.is_poor_quality(f, options.min_angle) {
        return Treatment::Fine;
    }
    let c = mesh.circumcenter(f);
    if !predicates::is_finite(&c) {
        return Treatment::Skip(DEGENERATE);
    }
    let c = Point3::new(c.x, c.y, 0.0);

    let encroaches =
        |s: &Edge<I>, t: &Point3<f64>| options.center.encroaches(mesh.position(s.a), mesh.position(s.b), t);
    if let Some(i) = segments.iter().position(|s| encroaches(s, &c)) {
        return Treatment::Defer(i);
    }

    let host = mesh.locate(&c);
    if !host.is_valid() {
        // Only an encroached hull segment lets a circumcenter escape.
        let apex_encroaches = |s: &Edge<I>| {
            mesh.triangles()
                .iter()
                .filter(|t| t.contains(s.a) && t.contains(s.b))
                .map(|t| t.vertex_outside_of(s))
                .any(|apex| apex.is_valid() && encroaches(s, mesh.position(apex)))
        };
        return match segments.iter().position(apex_encroaches) {
            Some(i) => Treatment::Defer(i),
            None => Treatment::Skip("circumcenter outside the hull"),
        };
    }
    if mesh
        .triangle_positions(host)
        .iter()
        .any(|q| (q - c).norm() <= COINCIDENT_TOLERANCE)
    {
        return Treatment::Skip("circumcenter on an existing vertex");
    }
    Treatment::Insert(c)
}

/// Queue the poor triangles around `v` that are not queued yet.
fn queue_poor_around<I: MeshIndex>(
    mesh: &Mesh<I>,
    v: VertexId<I>,
    min_angle: f64,
    poor: &mut VecDeque<FaceId<I>>,
) {
    for f in mesh.faces_around(v) {
        if mesh.is_poor_quality(f, min_angle) && !poor.contains(&f) {
            poor.push_back(f);
        }
    }
}
