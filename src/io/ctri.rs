//! Constrained point sets (`.ctri`).
//!
//! A PTS block followed by exactly `N` lines of two vertex indices, one
//! constraint segment per line:
//!
//! ```text
//! N
//! x y              (N lines)
//! i j              (N lines)
//! ```
//!
//! The points are triangulated and the segments stored as the mesh
//! constraints; refinement is left to the caller.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::pts::read_points;
use super::reader::LineReader;
use crate::error::Result;
use crate::mesh::{Mesh, MeshIndex};

/// Load a constrained point set.
///
/// # Example
///
/// ```no_run
/// use tessel::io::ctri;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = ctri::load("domain.ctri").unwrap();
/// println!("{} constraints", mesh.constraints().len());
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

/// Read a constrained point set from any buffered reader.
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<Mesh<I>> {
    let mut reader = LineReader::new(reader);
    let points = read_points(&mut reader)?;

    let n = points.len();
    let mut segments = Vec::with_capacity(n);
    for _ in 0..n {
        let s: Vec<usize> = reader.read_numbers(2)?;
        segments.push((s[0], s[1]));
    }

    let mut mesh = Mesh::from_points(points)?;
    mesh.set_constraints(segments)?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::mesh::{Edge, VertexId};
    use std::io::Cursor;

    #[test]
    fn test_read_square_with_sides() {
        let input = "4\n0 0\n1 0\n1 1\n0 1\n0 1\n1 2\n2 3\n3 0\n";
        let mesh: Mesh = read(Cursor::new(input)).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.constraints().len(), 4);
        assert!(mesh
            .constraints()
            .contains(&Edge::new(VertexId::new(0), VertexId::new(3))));
        assert!(mesh.constraints().iter().all(|s| mesh.contains_edge(s)));
    }

    #[test]
    fn test_rejects_unknown_vertex() {
        let input = "3\n0 0\n1 0\n0 1\n0 1\n1 2\n2 9\n";
        let result: Result<Mesh> = read(Cursor::new(input));
        assert!(matches!(
            result,
            Err(MeshError::InvalidConstraint { constraint: 2, vertex: 9 })
        ));
        assert!(result.unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_rejects_missing_segments() {
        let input = "3\n0 0\n1 0\n0 1\n0 1\n";
        let result: Result<Mesh> = read(Cursor::new(input));
        assert!(matches!(result, Err(MeshError::Parse { line: 6, .. })));
    }
}
