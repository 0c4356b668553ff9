//! Pixel-scaled per-face UV projection.
//!
//! Every face is flattened onto its own plane. The in-plane basis is derived
//! from the face's "bottom" edge, so walls, floors and slopes all come out
//! upright, and the result is scaled so that one meter covers a fixed number
//! of texture pixels. Coordinates are rounded to the texture's pixel grid.
//!
//! # Pipeline
//!
//! 1. [`select_base_edge`] picks the lowest edge (Z first, then Y, then X).
//! 2. [`build_basis`] turns that edge and the face normal into `(axis_u, axis_v)`.
//! 3. [`FaceUvProjector::project_polygon`] maps the loops to texture space, or
//!    [`FaceUvProjector::reset_to_fixed_footprint`] snaps them to a fixed cell.
//!
//! [`FaceUvProjector::project_batch`] runs the pipeline over many polygons and
//! [`unwrap_faces`]/[`reset_faces`] apply it to a [`PolygonMesh`](crate::mesh::PolygonMesh).
//!
//! # Packing
//!
//! With a non-zero `inter_face_buffer_pixels`, consecutive faces of a batch are
//! shifted right by a running [`PackingCursor`]. Packed batches always run
//! sequentially; unpacked batches may run in parallel.
//!
//! # Example
//!
//! ```
//! use texelmap::algo::unwrap::{FaceUvProjector, ProjectionConfig, ProjectionMode};
//! use texelmap::mesh::Polygon;
//! use nalgebra::Point3;
//!
//! let wall = Polygon::from_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ]);
//!
//! let config = ProjectionConfig::default()
//!     .with_pixels_per_meter(16.0)
//!     .with_texture_size(64);
//! let output = FaceUvProjector::new(config)
//!     .project_batch(&[wall], ProjectionMode::PixelScaled)
//!     .unwrap();
//!
//! let uvs = output.faces[0].as_ref().unwrap();
//! let (min, max) = uvs.bounding_box().unwrap();
//! assert_eq!(max.x - min.x, 0.5);
//! assert_eq!(max.y - min.y, 0.25);
//! ```

mod apply;
mod basis;
mod batch;
mod config;
mod project;
mod uv;

pub use apply::{apply_with_progress, reset_faces, unwrap_faces, ApplyReport, FaceSelection};
pub use basis::{build_basis, select_base_edge, BaseEdge, ProjectionBasis};
pub use batch::{BatchOutput, ProjectionMode, SkippedFace};
pub use config::{
    EdgePriority, ProjectionConfig, Settings, ViewportContext, DEFAULT_PIXELS_PER_METER,
    DEFAULT_RESET_PIXEL_SIZE, DEFAULT_TEXTURE_SIZE,
};
pub use project::{FaceUvProjector, PackingCursor};
pub use uv::{LoopUvs, UvResult};
