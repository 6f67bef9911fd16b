//! PTS point samples.
//!
//! ```text
//! N
//! x y              (N lines, z = 0)
//! ```
//!
//! Points are triangulated incrementally in file order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use super::reader::LineReader;
use crate::error::Result;
use crate::mesh::{Mesh, MeshIndex};

/// Load and triangulate a PTS file.
///
/// # Example
///
/// ```no_run
/// use tessel::io::pts;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = pts::load("samples.pts").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

/// Read and triangulate PTS samples from any buffered reader.
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<Mesh<I>> {
    let mut reader = LineReader::new(reader);
    let points = read_points(&mut reader)?;
    Mesh::from_points(points)
}

/// Read the count line and the point block that follows it.
pub(crate) fn read_points<R: BufRead>(reader: &mut LineReader<R>) -> Result<Vec<Point3<f64>>> {
    let n = reader.read_count()?;
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let c: Vec<f64> = reader.read_numbers(2)?;
        points.push(Point3::new(c[0], c[1], 0.0));
    }
    Ok(points)
}
