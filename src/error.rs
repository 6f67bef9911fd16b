//! Error types for tessel.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A constraint segment references a vertex that does not exist.
    #[error("constraint {constraint} references invalid vertex index {vertex}")]
    InvalidConstraint {
        /// Position of the segment in the constraint list.
        constraint: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A neighbor was attached across an edge the triangle does not own.
    #[error("cannot attach neighbor {neighbor}: edge ({a}, {b}) is not part of triangle {vertices:?}")]
    EdgeNotInTriangle {
        /// The neighbor that was being attached.
        neighbor: usize,
        /// First vertex of the edge.
        a: usize,
        /// Second vertex of the edge.
        b: usize,
        /// The corners of the receiving triangle.
        vertices: [usize; 3],
    },

    /// Two faces were expected to be neighbors but are not.
    #[error("faces {face} and {other} are not adjacent")]
    NotAdjacent {
        /// The first face.
        face: usize,
        /// The second face.
        other: usize,
    },

    /// Neighbor adjacency is not symmetric.
    #[error("face {face} lists {neighbor} as neighbor, but not the other way around")]
    AsymmetricNeighbor {
        /// The face holding the one-sided link.
        face: usize,
        /// The neighbor that does not link back.
        neighbor: usize,
    },

    /// A cursor or circulator was dereferenced outside its arena.
    #[error("position {position} is out of range (len {len})")]
    OutOfRange {
        /// The requested position.
        position: usize,
        /// Length of the arena.
        len: usize,
    },

    /// Malformed or truncated input.
    #[error("invalid input at line {line}: {message}")]
    Parse {
        /// 1-based line number where parsing failed.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for the given 1-based line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Attach a file path to a malformed-input failure.
    ///
    /// Only content errors (bad syntax, indices, faces or constraints) become
    /// [`MeshError::LoadError`]. Everything else, I/O and topology failures
    /// included, passes through untouched so callers can still match on it.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            MeshError::Parse { .. }
            | MeshError::InvalidVertexIndex { .. }
            | MeshError::DegenerateFace { .. }
            | MeshError::InvalidConstraint { .. } => MeshError::LoadError {
                path: path.into(),
                message: self.to_string(),
            },
            other => other,
        }
    }

    /// Whether this error describes malformed input rather than an I/O or topology failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MeshError::Parse { .. }
                | MeshError::LoadError { .. }
                | MeshError::InvalidVertexIndex { .. }
                | MeshError::DegenerateFace { .. }
                | MeshError::InvalidConstraint { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = MeshError::parse(4, "expected 2 values, found 1");
        assert_eq!(
            err.to_string(),
            "invalid input at line 4: expected 2 values, found 1"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_with_path_wraps_parse_errors() {
        let err = MeshError::parse(1, "missing OFF tag").with_path("mesh.off");
        match err {
            MeshError::LoadError { path, message } => {
                assert_eq!(path, PathBuf::from("mesh.off"));
                assert!(message.contains("missing OFF tag"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_path_keeps_topology_errors() {
        let err = MeshError::AsymmetricNeighbor {
            face: 0,
            neighbor: 3,
        }
        .with_path("mesh.off");
        assert!(matches!(
            err,
            MeshError::AsymmetricNeighbor {
                face: 0,
                neighbor: 3
            }
        ));
        assert!(!err.is_invalid_input());

        let err = MeshError::InvalidState("dangling border".into()).with_path("mesh.off");
        assert!(matches!(err, MeshError::InvalidState(_)));
        assert!(!err.is_invalid_input());

        let err = MeshError::DegenerateFace { face: 2 }.with_path("mesh.off");
        assert!(matches!(err, MeshError::LoadError { .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_with_path_keeps_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = MeshError::from(io).with_path("missing.pts");
        assert!(matches!(err, MeshError::Io(_)));
        assert!(!err.is_invalid_input());
    }
}
