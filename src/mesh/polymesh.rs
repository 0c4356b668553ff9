//! Polygon mesh with per-face selection.
//!
//! [`PolygonMesh`] stores n-gon faces in a compact corner list: every face owns
//! a contiguous run of loops, and every loop references one vertex. This is the
//! layout UV data needs, since UVs are attached to loops rather than vertices.

use std::ops::Range;

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, LoopId, MeshIndex, VertexId};
use super::polygon::{newell_normal, Polygon};

/// A polygon mesh with face selection state.
///
/// The mesh is generic over the index type `I`, which determines the maximum
/// number of elements. The default is `u32`.
#[derive(Debug, Clone)]
pub struct PolygonMesh<I: MeshIndex = u32> {
    /// Vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,
    /// Vertex referenced by each loop.
    pub(crate) loop_vertices: Vec<VertexId<I>>,
    /// Start of each face's loop run; has `num_faces + 1` entries.
    pub(crate) face_starts: Vec<usize>,
    /// Per-face selection flag.
    pub(crate) selected: Vec<bool>,
    /// The active face, if any.
    pub(crate) active: Option<FaceId<I>>,
}

impl<I: MeshIndex> Default for PolygonMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PolygonMesh<I> {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            loop_vertices: Vec::new(),
            face_starts: vec![0],
            selected: Vec::new(),
            active: None,
        }
    }

    /// Create an empty mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize, num_loops: usize) -> Self {
        let mut face_starts = Vec::with_capacity(num_faces + 1);
        face_starts.push(0);
        Self {
            positions: Vec::with_capacity(num_vertices),
            loop_vertices: Vec::with_capacity(num_loops),
            face_starts,
            selected: Vec::with_capacity(num_faces),
            active: None,
        }
    }

    // ==================== Counts ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_starts.len() - 1
    }

    /// Number of loops (face corners).
    #[inline]
    pub fn num_loops(&self) -> usize {
        self.loop_vertices.len()
    }

    // ==================== Element access ====================

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// All vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Vertex referenced by a loop.
    #[inline]
    pub fn loop_vertex(&self, l: LoopId<I>) -> VertexId<I> {
        self.loop_vertices[l.index()]
    }

    /// Raw loop range of a face.
    #[inline]
    pub(crate) fn loop_range(&self, f: FaceId<I>) -> Range<usize> {
        self.face_starts[f.index()]..self.face_starts[f.index() + 1]
    }

    /// Iterate over the loops of a face in order.
    pub fn face_loops(&self, f: FaceId<I>) -> impl Iterator<Item = LoopId<I>> {
        self.loop_range(f).map(LoopId::new)
    }

    /// Vertices of a face in loop order.
    #[inline]
    pub fn face_vertices(&self, f: FaceId<I>) -> &[VertexId<I>] {
        &self.loop_vertices[self.loop_range(f)]
    }

    /// Number of corners of a face.
    #[inline]
    pub fn face_len(&self, f: FaceId<I>) -> usize {
        self.loop_range(f).len()
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    // ==================== Construction ====================

    /// Add a vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Append a face without validation and return its ID.
    ///
    /// Use [`build_from_polygons`](super::build_from_polygons) for checked
    /// construction.
    pub(crate) fn push_face(
        &mut self,
        vertices: impl IntoIterator<Item = VertexId<I>>,
    ) -> FaceId<I> {
        let id = FaceId::new(self.num_faces());
        self.loop_vertices.extend(vertices);
        self.face_starts.push(self.loop_vertices.len());
        self.selected.push(false);
        id
    }

    // ==================== Selection ====================

    /// Check whether a face is selected.
    #[inline]
    pub fn is_selected(&self, f: FaceId<I>) -> bool {
        self.selected[f.index()]
    }

    /// Select or deselect a face.
    #[inline]
    pub fn set_selected(&mut self, f: FaceId<I>, selected: bool) {
        self.selected[f.index()] = selected;
    }

    /// Select every face.
    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = true);
    }

    /// Deselect every face.
    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    /// Iterate over selected faces in index order.
    pub fn selected_faces(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| if s { Some(FaceId::new(i)) } else { None })
    }

    /// The active face, if any.
    #[inline]
    pub fn active_face(&self) -> Option<FaceId<I>> {
        self.active
    }

    /// Set the active face. The face is also selected.
    pub fn set_active_face(&mut self, f: Option<FaceId<I>>) {
        if let Some(face) = f {
            self.selected[face.index()] = true;
        }
        self.active = f;
    }

    // ==================== Geometry ====================

    /// Positions of a face's corners in loop order.
    pub fn face_positions(&self, f: FaceId<I>) -> Vec<Point3<f64>> {
        self.face_vertices(f)
            .iter()
            .map(|&v| *self.position(v))
            .collect()
    }

    /// Unit normal of a face (Newell's method).
    ///
    /// Returns the zero vector for faces without area.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        newell_normal(&self.face_positions(f))
    }

    /// Median center of a face.
    pub fn face_center(&self, f: FaceId<I>) -> Point3<f64> {
        self.polygon(f).center()
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        self.polygon(f).area()
    }

    /// Extract a face as a standalone [`Polygon`].
    pub fn polygon(&self, f: FaceId<I>) -> Polygon {
        Polygon::from_positions(self.face_positions(f))
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Check internal consistency.
    pub fn is_valid(&self) -> bool {
        if self.face_starts.first() != Some(&0)
            || self.face_starts.last() != Some(&self.loop_vertices.len())
            || self.selected.len() != self.num_faces()
        {
            return false;
        }
        if self.face_starts.windows(2).any(|w| w[1] < w[0]) {
            return false;
        }
        if let Some(active) = self.active {
            if active.index() >= self.num_faces() {
                return false;
            }
        }
        self.loop_vertices
            .iter()
            .all(|v| v.index() < self.positions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;
    use approx::assert_relative_eq;

    fn two_quads() -> PolygonMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_counts() {
        let mesh = two_quads();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_loops(), 8);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_face_loops_are_contiguous() {
        let mesh = two_quads();
        let loops: Vec<usize> = mesh.face_loops(FaceId::new(1)).map(|l| l.index()).collect();
        assert_eq!(loops, vec![4, 5, 6, 7]);
        assert_eq!(mesh.loop_vertex(LoopId::new(5)), VertexId::new(2));
    }

    #[test]
    fn test_selection() {
        let mut mesh = two_quads();
        assert_eq!(mesh.selected_faces().count(), 0);

        mesh.set_active_face(Some(FaceId::new(1)));
        assert!(mesh.is_selected(FaceId::new(1)));
        assert_eq!(mesh.active_face(), Some(FaceId::new(1)));

        mesh.select_all();
        assert_eq!(mesh.selected_faces().count(), 2);
        mesh.deselect_all();
        assert_eq!(mesh.selected_faces().count(), 0);
    }

    #[test]
    fn test_geometry() {
        let mesh = two_quads();
        let f = FaceId::new(0);
        assert_relative_eq!(mesh.face_normal(f), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(mesh.face_center(f), Point3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(mesh.surface_area(), 2.0);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
    }
}
