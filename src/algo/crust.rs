//! Crust curve reconstruction.
//!
//! Given a Delaunay triangulation of an unorganized 2D point sample, the Crust
//! recovers the polygonal curve the samples were drawn from. Every triangle's
//! circumcenter (a vertex of the Voronoi diagram) is inserted into the same
//! triangulation; the edges that still join two original samples afterwards
//! form the curve.
//!
//! # Example
//!
//! ```
//! use tessel::algo::crust::crust;
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
//!
//! crust(&mut mesh).unwrap();
//! assert_eq!(mesh.curve().len(), 4);
//! ```
//!
//! # References
//!
//! - Amenta, N., Bern, M., Eppstein, D. (1998). "The Crust and the β-Skeleton:
//!   Combinatorial Curve Reconstruction." Graphical Models and Image Processing.

use std::collections::HashSet;

use nalgebra::Point3;
use tracing::{info, warn};

use crate::error::{MeshError, Result};
use crate::mesh::{Edge, Mesh, MeshIndex};
use crate::predicates;

use super::Progress;

/// Reconstruct the curve through the samples of `mesh`.
///
/// On return [`Mesh::curve`] holds the reconstructed edges and
/// [`Mesh::index_before_voronoi`] separates samples from inserted centers.
/// Returns the number of curve edges.
///
/// # Errors
///
/// [`MeshError::EmptyMesh`] if the mesh has no triangles yet.
pub fn crust<I: MeshIndex>(mesh: &mut Mesh<I>) -> Result<usize> {
    crust_with_progress(mesh, &Progress::none())
}

/// Crust reconstruction with progress reporting.
///
/// Progress runs through two phases: computing circumcenters, then inserting them.
pub fn crust_with_progress<I: MeshIndex>(mesh: &mut Mesh<I>, progress: &Progress) -> Result<usize> {
    if mesh.num_triangles() == 0 {
        return Err(MeshError::EmptyMesh);
    }
    info!(
        "crust: {} samples, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    let centers_phase = progress.phase(0, 2);
    let insert_phase = progress.phase(1, 2);

    let num_triangles = mesh.num_triangles();
    let mut centers = Vec::with_capacity(num_triangles);
    for (i, f) in mesh.face_ids().enumerate() {
        let c = mesh.circumcenter(f);
        if predicates::is_finite(&c) {
            centers.push(Point3::new(c.x, c.y, 0.0));
        } else {
            warn!("crust: {:?} is degenerate, skipping its circumcenter", f);
        }
        centers_phase.report(i + 1, num_triangles, "Computing Voronoi centers");
    }

    mesh.index_before_voronoi = mesh.num_vertices();
    let num_centers = centers.len();
    for (i, c) in centers.into_iter().enumerate() {
        mesh.insert_point(c)?;
        insert_phase.report(i + 1, num_centers, "Inserting Voronoi centers");
    }

    mesh.curve = sample_edges(mesh);
    info!(
        "crust: inserted {} centers, curve has {} edges",
        num_centers,
        mesh.curve.len()
    );
    Ok(mesh.curve.len())
}

/// Distinct triangle edges whose endpoints are both original samples.
fn sample_edges<I: MeshIndex>(mesh: &Mesh<I>) -> Vec<Edge<I>> {
    let mut seen = HashSet::new();
    let mut curve = Vec::new();
    for t in mesh.triangles() {
        for e in t.edges() {
            if mesh.is_sample(e.a) && mesh.is_sample(e.b) && seen.insert(e) {
                curve.push(e);
            }
        }
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, VertexId};
    use std::f64::consts::PI;
    use std::sync::{Arc, Mutex};

    fn edge(a: usize, b: usize) -> Edge {
        Edge::new(VertexId::new(a), VertexId::new(b))
    }

    #[test]
    fn test_unit_square() {
        let mut mesh: Mesh = Mesh::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();

        let n = crust(&mut mesh).unwrap();

        assert_eq!(n, 4);
        assert_eq!(mesh.index_before_voronoi(), 4);
        let curve: HashSet<_> = mesh.curve().iter().copied().collect();
        for e in [edge(0, 1), edge(1, 2), edge(2, 3), edge(3, 0)] {
            assert!(curve.contains(&e), "missing {:?}", e);
        }
        assert!(!curve.contains(&edge(0, 2)));
        assert!(!curve.contains(&edge(1, 3)));
        mesh.validate().unwrap();
    }

    #[test]
    fn test_jittered_circle() {
        let n = 32;
        let samples: Vec<Point3<f64>> = (0..n)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / n as f64;
                let r = 1.0 + 0.0005 * ((i * 7 % 5) as f64);
                Point3::new(r * theta.cos(), r * theta.sin(), 0.0)
            })
            .collect();
        let mut mesh: Mesh = Mesh::from_points(samples).unwrap();

        crust(&mut mesh).unwrap();

        let curve: HashSet<_> = mesh.curve().iter().copied().collect();
        assert_eq!(curve.len(), n);
        for i in 0..n {
            assert!(curve.contains(&edge(i, (i + 1) % n)));
        }
        for e in mesh.curve() {
            assert!(mesh.is_sample(e.a) && mesh.is_sample(e.b));
        }
    }

    #[test]
    fn test_reports_progress() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        let mut mesh: Mesh = Mesh::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
        ])
        .unwrap();
        crust_with_progress(&mut mesh, &progress).unwrap();

        // One triangle: the first phase ends at half, the second at the end.
        assert_eq!(*seen.lock().unwrap(), vec![(1000, 2000), (2000, 2000)]);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let mut mesh: Mesh = Mesh::new();
        assert!(matches!(crust(&mut mesh), Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_degenerate_triangle_is_skipped() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mut mesh: Mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        crust(&mut mesh).unwrap();
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.curve().len(), 3);
    }
}
