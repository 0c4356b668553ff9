//! Error types for texelmap.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`UvError`].
pub type Result<T> = std::result::Result<T, UvError>;

/// Errors that can occur during projection, mesh construction and file I/O.
#[derive(Error, Debug)]
pub enum UvError {
    /// A polygon cannot be given a projection basis.
    ///
    /// Raised for zero-length base edges, normals parallel to the base edge
    /// and polygons with fewer than three vertices. Batch operations skip the
    /// polygon and keep going.
    #[error("degenerate polygon: {reason}")]
    DegeneratePolygon {
        /// What made the polygon unusable.
        reason: &'static str,
    },

    /// A batch operation was given no polygons.
    #[error("batch contains no polygons")]
    EmptyBatch,

    /// A configuration value is out of range.
    #[error("invalid config: {name} = {value} ({reason})")]
    InvalidConfig {
        /// Option name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners.
    #[error("face {face} has {count} vertices (at least 3 required)")]
    TooFewVertices {
        /// The face index.
        face: usize,
        /// Number of corners found.
        count: usize,
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

    /// A file's contents could not be interpreted.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A UV layer does not have one entry per mesh loop.
    #[error("UV layer has {found} entries but the mesh has {expected} loops")]
    LayerMismatch {
        /// Number of loops in the mesh.
        expected: usize,
        /// Number of entries in the layer.
        found: usize,
    },
}

impl UvError {
    /// Create an invalid config error.
    pub fn invalid_config<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        UvError::InvalidConfig {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a degenerate polygon error.
    pub fn degenerate(reason: &'static str) -> Self {
        UvError::DegeneratePolygon { reason }
    }

    /// Whether this error only affects a single polygon of a batch.
    pub fn is_per_polygon(&self) -> bool {
        matches!(self, UvError::DegeneratePolygon { .. })
    }
}
