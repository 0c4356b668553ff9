//! UV coordinate storage.
//!
//! [`UvResult`] holds the UVs of a single projected polygon. [`LoopUvs`] is a
//! mesh-wide UV layer with one coordinate per loop, which is where projected
//! faces are written back.

use std::marker::PhantomData;

use nalgebra::Point2;

use crate::error::{Result, UvError};
use crate::mesh::{FaceId, LoopId, MeshIndex, PolygonMesh};

/// UVs of one polygon, in the polygon's vertex order.
#[derive(Debug, Clone, PartialEq)]
pub struct UvResult {
    coords: Vec<Point2<f64>>,
}

impl UvResult {
    /// Wrap a list of coordinates.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinate of loop `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Point2<f64> {
        self.coords[i]
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Iterate over the coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &Point2<f64>> + '_ {
        self.coords.iter()
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounding_box(&self.coords)
    }
}

/// Per-loop UV layer of a [`PolygonMesh`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoopUvs<I: MeshIndex = u32> {
    /// UV coordinates indexed by loop ID.
    coords: Vec<Point2<f64>>,
    /// Phantom data for the index type.
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> LoopUvs<I> {
    /// Create a layer from coordinates indexed by loop.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self {
            coords,
            _marker: PhantomData,
        }
    }

    /// Create a layer filled with zeros.
    pub fn zeros(n: usize) -> Self {
        Self::new(vec![Point2::origin(); n])
    }

    /// Create a zeroed layer sized for `mesh`.
    pub fn for_mesh(mesh: &PolygonMesh<I>) -> Self {
        Self::zeros(mesh.num_loops())
    }

    /// Get the UV of a loop.
    #[inline]
    pub fn get(&self, l: LoopId<I>) -> Point2<f64> {
        self.coords[l.index()]
    }

    /// Set the UV of a loop.
    #[inline]
    pub fn set(&mut self, l: LoopId<I>, uv: Point2<f64>) {
        self.coords[l.index()] = uv;
    }

    /// Get the number of UV coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all UV coordinates with their loop IDs.
    pub fn iter(&self) -> impl Iterator<Item = (LoopId<I>, Point2<f64>)> + '_ {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &uv)| (LoopId::new(i), uv))
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Fail unless the layer has one entry per loop of `mesh`.
    pub fn check_mesh(&self, mesh: &PolygonMesh<I>) -> Result<()> {
        if self.coords.len() != mesh.num_loops() {
            return Err(UvError::LayerMismatch {
                expected: mesh.num_loops(),
                found: self.coords.len(),
            });
        }
        Ok(())
    }

    /// UVs of a face in loop order.
    pub fn face_uvs(&self, mesh: &PolygonMesh<I>, f: FaceId<I>) -> Vec<Point2<f64>> {
        self.coords[mesh.loop_range(f)].to_vec()
    }

    /// Write a projected polygon into the loops of face `f`.
    ///
    /// # Panics
    ///
    /// Panics if `uvs` does not have one coordinate per corner of `f`.
    pub fn set_face(&mut self, mesh: &PolygonMesh<I>, f: FaceId<I>, uvs: &UvResult) {
        let range = mesh.loop_range(f);
        assert_eq!(range.len(), uvs.len(), "UV count does not match face {:?}", f);
        self.coords[range].copy_from_slice(uvs.as_slice());
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the layer is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounding_box(&self.coords)
    }

    /// Compute the total area in UV space.
    pub fn total_area(&self, mesh: &PolygonMesh<I>) -> f64 {
        mesh.face_ids()
            .map(|f| shoelace_area(&self.coords[mesh.loop_range(f)]))
            .sum()
    }
}

fn bounding_box(coords: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = coords.first()?;
    let mut min = *first;
    let mut max = *first;

    for uv in coords {
        min.x = min.x.min(uv.x);
        min.y = min.y.min(uv.y);
        max.x = max.x.max(uv.x);
        max.y = max.y.max(uv.y);
    }

    Some((min, max))
}

/// Unsigned area of a 2D polygon.
fn shoelace_area(coords: &[Point2<f64>]) -> f64 {
    let n = coords.len();
    let mut twice = 0.0;
    for i in 0..n {
        let p0 = coords[i];
        let p1 = coords[(i + 1) % n];
        twice += p0.x * p1.y - p1.x * p0.y;
    }
    0.5 * twice.abs()
}
