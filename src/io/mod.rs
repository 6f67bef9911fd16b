//! Mesh file I/O.
//!
//! This module provides functions for loading and saving triangulations in
//! the plain-text formats the library works with.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | OFF | `.off` | ✓ | ✓ | Triangles only, topology rebuilt on load |
//! | PTS | `.pts`, `.tri` | ✓ | ✗ | 2D samples, triangulated incrementally |
//! | Constrained | `.ctri` | ✓ | ✗ | PTS block plus constraint segments |
//!
//! # Usage
//!
//! The easiest way to load and save meshes is using the automatic format detection:
//!
//! ```no_run
//! use tessel::io::{load, save};
//! use tessel::mesh::Mesh;
//!
//! // Load with automatic format detection
//! let mesh: Mesh = load("samples.pts").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.off").unwrap();
//! ```
//!
//! A [`Mesh`] can also be reloaded in place. Loads are all-or-nothing: the
//! mesh is reset first and left empty if anything fails.
//!
//! ```no_run
//! use tessel::algo::RefineOptions;
//! use tessel::mesh::Mesh;
//!
//! let mut mesh: Mesh = Mesh::new();
//! mesh.load_curve("samples.pts").unwrap();
//! mesh.load_constraints("domain.ctri", &RefineOptions::default()).unwrap();
//! mesh.dump_to_off("refined.off").unwrap();
//! ```

pub mod ctri;
pub mod off;
pub mod pts;
pub mod reader;

use std::path::Path;

use tracing::info;

use crate::algo::{crust, refine, RefineOptions, RefineStats};
use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

pub use reader::LineReader;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Object File Format.
    Off,
    /// Point samples.
    Pts,
    /// Point samples with constraint segments.
    Ctri,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "off" => Some(Format::Off),
            "pts" | "tri" => Some(Format::Pts),
            "ctri" => Some(Format::Ctri),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension. Constrained files are
/// triangulated with their constraints attached but not refined.
///
/// # Example
///
/// ```no_run
/// use tessel::io::load;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = load("model.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Off => off::load(path),
        Format::Pts => pts::load(path),
        Format::Ctri => ctri::load(path),
    }?;
    info!(
        "Loaded {} vertices, {} triangles from {}",
        mesh.num_vertices(),
        mesh.num_triangles(),
        path.display()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// Only OFF can be written.
///
/// # Example
///
/// ```no_run
/// use tessel::io::save;
/// use tessel::mesh::Mesh;
///
/// let mesh: Mesh = Mesh::new();
/// save(&mesh, "output.off").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &Mesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Off => off::save(mesh, path),
        Format::Pts | Format::Ctri => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "point formats are input only".to_string(),
        }),
    }
}

impl<I: MeshIndex> Mesh<I> {
    /// Replace this mesh with the contents of an OFF file.
    pub fn load_off<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.reload(|| off::load(path))
    }

    /// Write this mesh as OFF.
    pub fn dump_to_off<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        off::save(self, path.as_ref())?;
        info!("Saved {} triangles to {}", self.num_triangles(), path.as_ref().display());
        Ok(())
    }

    /// Replace this mesh with the triangulation of a PTS file.
    pub fn load_triangulation<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.reload(|| pts::load(path))
    }

    /// Triangulate a PTS file and reconstruct its curve.
    ///
    /// Returns the number of curve edges.
    pub fn load_curve<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut edges = 0;
        self.reload(|| {
            let mut mesh = pts::load(path)?;
            edges = crust(&mut mesh)?;
            Ok(mesh)
        })?;
        Ok(edges)
    }

    /// Triangulate a constrained file and refine it.
    pub fn load_constraints<P: AsRef<Path>>(
        &mut self,
        path: P,
        options: &RefineOptions,
    ) -> Result<RefineStats> {
        options.validate()?;
        let mut stats = RefineStats::default();
        self.reload(|| {
            let mut mesh = ctri::load(path)?;
            stats = refine(&mut mesh, options)?;
            Ok(mesh)
        })?;
        Ok(stats)
    }

    fn reload(&mut self, load: impl FnOnce() -> Result<Mesh<I>>) -> Result<()> {
        self.empty();
        match load() {
            Ok(mesh) => {
                info!(
                    "Loaded {} vertices, {} triangles",
                    mesh.num_vertices(),
                    mesh.num_triangles()
                );
                *self = mesh;
                Ok(())
            }
            Err(e) => {
                self.empty();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tessel-io-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_extension("OFF"), Some(Format::Off));
        assert_eq!(Format::from_extension("tri"), Some(Format::Pts));
        assert_eq!(Format::from_path("a/b.ctri"), Some(Format::Ctri));
        assert_eq!(Format::from_path("mesh.obj"), None);
    }

    #[test]
    fn test_unsupported_extensions() {
        let result: Result<Mesh> = load("model.obj");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { ref extension }) if extension == "obj"
        ));

        let mesh: Mesh = Mesh::new();
        assert!(matches!(
            save(&mesh, "out.pts"),
            Err(MeshError::SaveError { .. })
        ));
        assert!(matches!(
            save(&mesh, "noextension"),
            Err(MeshError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_curve_and_dump() {
        let path = scratch("square.pts", "4\n0 0\n1 0\n1 1\n0 1\n");
        let mut mesh: Mesh = Mesh::new();

        let edges = mesh.load_curve(&path).unwrap();
        assert_eq!(edges, 4);
        assert_eq!(mesh.index_before_voronoi(), 4);

        let out = path.with_extension("off");
        mesh.dump_to_off(&out).unwrap();
        let mut reloaded: Mesh = Mesh::new();
        reloaded.load_off(&out).unwrap();
        assert_eq!(reloaded.num_vertices(), mesh.num_vertices());
        assert_eq!(reloaded.num_triangles(), mesh.num_triangles());
    }

    #[test]
    fn test_failed_load_leaves_mesh_empty() {
        let good = scratch("good.pts", "3\n0 0\n1 0\n0 1\n");
        let bad = scratch("bad.pts", "3\n0 0\n1 0\n");

        let mut mesh: Mesh = Mesh::new();
        mesh.load_triangulation(&good).unwrap();
        assert_eq!(mesh.num_triangles(), 1);

        let err = mesh.load_triangulation(&bad).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 0);
    }

    #[test]
    fn test_load_constraints_refines() {
        let path = scratch("square.ctri", "4\n0 0\n1 0\n1 1\n0 1\n0 1\n1 2\n2 3\n1 3\n");
        let mut mesh: Mesh = Mesh::new();

        let stats = mesh
            .load_constraints(&path, &RefineOptions::default())
            .unwrap();
        assert_eq!(stats.segments_split, 1);
        assert_eq!(mesh.num_triangles(), 4);
        assert!(mesh
            .vertices()
            .iter()
            .any(|v| v.position == Point3::new(0.5, 0.5, 0.0)));
        mesh.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut mesh: Mesh = Mesh::new();
        let err = mesh.load_off("/definitely/not/here.off").unwrap_err();
        assert!(matches!(err, MeshError::Io(_)));
    }
}
