//! OFF (Object File Format) support.
//!
//! ```text
//! OFF
//! numVertices numFaces numEdges
//! x y z            (numVertices lines)
//! 3 i0 i1 i2       (numFaces lines, counter-clockwise)
//! ```
//!
//! `numEdges` is read but ignored. Neighbor topology is not stored in the file:
//! it is rebuilt from shared edges on load. A file with no faces loads as a
//! set of isolated vertices.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::reader::LineReader;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, Mesh, MeshIndex};

/// Load a mesh from an OFF file.
///
/// # Example
///
/// ```no_run
/// use tessel::io::off;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = off::load("model.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

/// Read a mesh in OFF layout from any buffered reader.
pub fn read<R: BufRead, I: MeshIndex>(reader: R) -> Result<Mesh<I>> {
    let mut reader = LineReader::new(reader);
    reader.expect_tag("OFF")?;

    let header: Vec<usize> = reader.read_numbers(3)?;
    let (num_vertices, num_faces) = (header[0], header[1]);

    let mut vertices = Vec::with_capacity(num_vertices);
    for _ in 0..num_vertices {
        let c: Vec<f64> = reader.read_numbers(3)?;
        vertices.push(Point3::new(c[0], c[1], c[2]));
    }

    let mut faces = Vec::with_capacity(num_faces);
    for _ in 0..num_faces {
        let f: Vec<usize> = reader.read_numbers(4)?;
        if f[0] != 3 {
            return Err(MeshError::parse(
                reader.line(),
                format!("only triangles are supported, found a face with {} corners", f[0]),
            ));
        }
        faces.push([f[1], f[2], f[3]]);
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to an OFF file.
///
/// # Example
///
/// ```no_run
/// use tessel::io::off;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = Mesh::new();
/// off::save(&mesh, "output.off").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh in OFF layout.
pub fn write<W: Write, I: MeshIndex>(mesh: &Mesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", vertices.len(), faces.len())?;
    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }
    Ok(())
}
