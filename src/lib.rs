//! # texelmap
//!
//! Pixel-scaled per-face UV projection for low-poly and pixel-art style
//! meshes.
//!
//! Every face is flattened onto its own plane, oriented by its lowest edge and
//! scaled so that one meter of surface covers a fixed number of texture
//! pixels. Coordinates land on the texture's pixel grid, faces can be packed
//! side by side, and a reset mode snaps faces to a fixed 3x3 pixel cell.
//!
//! ## Features
//!
//! - **Polygon mesh**: n-gon faces with per-loop UV storage and face selection
//! - **Pixel-scaled unwrap**: edge-based basis, pixel-grid rounding, optional
//!   non-uniform scale correction and offset snapping
//! - **Packing**: left-to-right layout of a batch with a pixel buffer
//! - **File formats**: OBJ and PLY, with UVs
//! - **Configuration**: builder-style options or a TOML settings file
//!
//! ## Quick Start
//!
//! ```no_run
//! use texelmap::prelude::*;
//!
//! let (mesh, uvs): (PolygonMesh, _) = texelmap::io::load_with_uvs("room.obj").unwrap();
//! let mut uvs = uvs.unwrap_or_else(|| LoopUvs::for_mesh(&mesh));
//!
//! let config = ProjectionConfig::default()
//!     .with_pixels_per_meter(16.0)
//!     .with_texture_size(256);
//! let projector = FaceUvProjector::new(config);
//! let report = unwrap_faces(&mesh, &mut uvs, &projector, FaceSelection::All).unwrap();
//! println!("{} faces unwrapped", report.updated.len());
//!
//! texelmap::io::save_with_uvs(&mesh, &uvs, "room_uv.obj").unwrap();
//! ```
//!
//! ## Projecting Polygons Directly
//!
//! Host applications that keep their own mesh representation can project
//! polygons one at a time, threading a [`PackingCursor`](algo::unwrap::PackingCursor)
//! through the batch:
//!
//! ```
//! use texelmap::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! let floor = Polygon::from_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//!
//! let projector = FaceUvProjector::default();
//! let basis = projector.basis_for(&floor).unwrap();
//! let mut cursor = PackingCursor::new();
//! let uvs = projector.project_polygon(&floor, &basis, &mut cursor).unwrap();
//!
//! assert_eq!(uvs.get(0), Point2::new(0.375, 0.375));
//! assert_eq!(uvs.get(2), Point2::new(0.625, 0.625));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use texelmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::unwrap::{
        reset_faces, unwrap_faces, FaceSelection, FaceUvProjector, LoopUvs, PackingCursor,
        ProjectionConfig, ProjectionMode, Settings, UvResult, ViewportContext,
    };
    pub use crate::error::{Result, UvError};
    pub use crate::mesh::{
        build_from_polygons, FaceId, LoopId, MeshIndex, Polygon, PolygonMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
