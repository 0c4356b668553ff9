//! Mesh file I/O.
//!
//! Meshes are loaded together with their UV layer (when the file has one) and
//! saved with the layer produced by [`unwrap_faces`](crate::algo::unwrap::unwrap_faces)
//! or [`reset_faces`](crate::algo::unwrap::reset_faces).
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | UVs |
//! |--------|-----------|------|------|-----|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | `vt` per loop |
//! | PLY | `.ply` | ✓ | ✓ | per-face `texcoord` list |
//!
//! # Usage
//!
//! ```no_run
//! use texelmap::io::{load, save};
//! use texelmap::mesh::PolygonMesh;
//!
//! let mesh: PolygonMesh = load("room.obj").unwrap();
//! save(&mesh, "room.ply").unwrap();
//! ```
//!
//! The `_with_uvs` variants carry the UV layer along:
//!
//! ```no_run
//! use texelmap::io::{load_with_uvs, save_with_uvs};
//! use texelmap::algo::unwrap::LoopUvs;
//! use texelmap::mesh::PolygonMesh;
//!
//! let (mesh, uvs): (PolygonMesh, _) = load_with_uvs("room.obj").unwrap();
//! let uvs = uvs.unwrap_or_else(|| LoopUvs::for_mesh(&mesh));
//! save_with_uvs(&mesh, &uvs, "room.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;

use std::path::Path;

use crate::algo::unwrap::LoopUvs;
use crate::error::{Result, UvError};
use crate::mesh::{MeshIndex, PolygonMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
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

    fn detect(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| UvError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh, picking the format from the extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolygonMesh<I>> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
    }
}

/// Load a mesh and its UV layer, picking the format from the extension.
pub fn load_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    path: P,
) -> Result<(PolygonMesh<I>, Option<LoopUvs<I>>)> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::load_with_uvs(path),
        Format::Ply => ply::load_with_uvs(path),
    }
}

/// Save a mesh, picking the format from the extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolygonMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

/// Save a mesh and its UV layer, picking the format from the extension.
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &LoopUvs<I>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::save_with_uvs(mesh, uvs, path),
        Format::Ply => ply::save_with_uvs(mesh, uvs, path),
    }
}
