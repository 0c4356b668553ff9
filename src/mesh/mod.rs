//! Core mesh data structures.
//!
//! This module provides a compact polygon mesh and the standalone polygon type
//! consumed by the UV projector.
//!
//! # Overview
//!
//! [`PolygonMesh`] stores n-gon faces as runs of loops (face corners). UVs are
//! attached to loops, so a vertex shared by several faces can carry a different
//! UV in each of them. [`Polygon`] is a single face detached from any mesh:
//! ordered positions plus a normal.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//! - [`LoopId`] - Identifies a face corner
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use texelmap::mesh::{PolygonMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//!
//! let mesh: PolygonMesh = build_from_polygons(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod polygon;
mod polymesh;

pub use builder::{build_from_polygons, to_face_vertex};
pub use index::{FaceId, LoopId, MeshIndex, VertexId};
pub use polygon::{newell_normal, Polygon, DEGENERATE_RELATIVE_EPS};
pub use polymesh::PolygonMesh;
