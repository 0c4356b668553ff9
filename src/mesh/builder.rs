//! Mesh construction utilities.
//!
//! This module provides functions for building polygon meshes from
//! face-vertex lists as commonly found in mesh file formats.

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::polymesh::PolygonMesh;
use crate::error::{Result, UvError};

/// Build a polygon mesh from vertices and n-gon faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each an ordered list of vertex indices
///
/// # Returns
/// A polygon mesh, or an error if a face references a missing vertex or has
/// fewer than three corners. Geometrically degenerate faces (collinear or
/// coincident corners) are accepted; the projector reports them later.
///
/// # Example
/// ```
/// use texelmap::mesh::{build_from_polygons, PolygonMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: PolygonMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_loops(), 4);
/// ```
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<PolygonMesh<I>> {
    let num_loops = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = PolygonMesh::with_capacity(vertices.len(), faces.len(), num_loops);

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(UvError::TooFewVertices {
                face: fi,
                count: face.len(),
            });
        }
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(UvError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }

    for &pos in vertices {
        mesh.add_vertex(pos);
    }
    for face in faces {
        mesh.push_face(face.as_ref().iter().map(|&vi| VertexId::new(vi)));
    }

    debug_assert!(mesh.is_valid());
    Ok(mesh)
}

/// Convert a polygon mesh back to face-vertex representation.
///
/// # Returns
/// A tuple of (vertices, faces) where faces hold vertex indices in loop order.
pub fn to_face_vertex<I: MeshIndex>(mesh: &PolygonMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices = mesh.positions().to_vec();
    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).iter().map(|v| v.index()).collect())
        .collect();
    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_vertices() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_mixed_arity() {
        let mut vertices = square_vertices();
        vertices.push(Point3::new(0.5, 2.0, 0.0));
        let faces = vec![vec![0, 1, 2, 3], vec![3, 2, 4]];

        let mesh: PolygonMesh = build_from_polygons(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_loops(), 7);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_invalid_vertex_index() {
        let faces = vec![vec![0, 1, 9]];
        let result: Result<PolygonMesh> = build_from_polygons(&square_vertices(), &faces);
        assert!(matches!(
            result,
            Err(UvError::InvalidVertexIndex { face: 0, vertex: 9 })
        ));
    }

    #[test]
    fn test_too_few_vertices() {
        let faces = vec![vec![0, 1, 2], vec![2, 3]];
        let result: Result<PolygonMesh> = build_from_polygons(&square_vertices(), &faces);
        assert!(matches!(
            result,
            Err(UvError::TooFewVertices { face: 1, count: 2 })
        ));
    }

    #[test]
    fn test_collinear_face_is_accepted() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        let mesh: PolygonMesh = build_from_polygons(&vertices, &faces).unwrap();
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_round_trip() {
        let faces = vec![vec![0, 1, 2, 3]];
        let mesh: PolygonMesh = build_from_polygons(&square_vertices(), &faces).unwrap();
        let (v, f) = to_face_vertex(&mesh);
        assert_eq!(v, square_vertices());
        assert_eq!(f, faces);
    }
}
