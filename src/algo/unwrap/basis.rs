//! Base-edge selection and in-plane basis construction.

use nalgebra::{Point3, Vector3};

use crate::error::{Result, UvError};
use crate::mesh::{Polygon, DEGENERATE_RELATIVE_EPS};

use super::config::EdgePriority;

/// Sine of the angle between base edge and normal below which the two count
/// as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// The edge that becomes the horizontal UV axis, as loop indices `(a, b)`
/// with `b == (a + 1) % n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseEdge {
    /// Loop index of the edge start.
    pub a: usize,
    /// Loop index of the edge end.
    pub b: usize,
}

/// Orthonormal pair spanning the polygon's plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBasis {
    /// Horizontal axis, along the base edge.
    pub axis_u: Vector3<f64>,
    /// Vertical axis, pointing away from the base edge.
    pub axis_v: Vector3<f64>,
}

impl EdgePriority {
    /// Sort key of the edge `(p1, p2)`.
    #[inline]
    pub fn key(&self, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
        self.x * (p1.x + p2.x) + self.y * (p1.y + p2.y) + self.z * (p1.z + p2.z)
    }
}

/// Pick the polygon's bottom edge.
///
/// Scans the edges in loop order and keeps the first one with the smallest
/// [`EdgePriority::key`]. Coincident vertices produce ties everywhere and
/// simply yield the first edge.
///
/// # Errors
///
/// Returns [`UvError::DegeneratePolygon`] for polygons with fewer than three
/// vertices.
///
/// # Example
///
/// ```
/// use texelmap::algo::unwrap::{select_base_edge, BaseEdge, EdgePriority};
/// use texelmap::mesh::Polygon;
/// use nalgebra::Point3;
///
/// let quad = Polygon::from_positions(vec![
///     Point3::new(0.0, 1.0, 1.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ]);
/// let edge = select_base_edge(&quad, &EdgePriority::default()).unwrap();
/// assert_eq!(edge, BaseEdge { a: 1, b: 2 });
/// ```
pub fn select_base_edge(polygon: &Polygon, priority: &EdgePriority) -> Result<BaseEdge> {
    if polygon.len() < 3 {
        return Err(UvError::degenerate("fewer than 3 vertices"));
    }

    let positions = polygon.positions();
    let mut best = BaseEdge { a: 0, b: 1 };
    let mut best_key = priority.key(&positions[0], &positions[1]);

    for (a, b) in polygon.edges().skip(1) {
        let key = priority.key(&positions[a], &positions[b]);
        if key < best_key {
            best_key = key;
            best = BaseEdge { a, b };
        }
    }

    Ok(best)
}

/// Build the projection basis from a base edge.
///
/// `axis_u` is the normalized base edge; `axis_v` is
/// `-normalize(axis_u × normal)`, so V grows away from the base edge when the
/// polygon is seen from the side its normal points to.
///
/// # Errors
///
/// Returns [`UvError::DegeneratePolygon`] when the edge has zero length, the
/// normal is parallel to the edge (or zero), or the edge indices are out of
/// range.
pub fn build_basis(polygon: &Polygon, edge: BaseEdge) -> Result<ProjectionBasis> {
    if edge.a >= polygon.len() || edge.b >= polygon.len() {
        return Err(UvError::degenerate("base edge out of range"));
    }

    let along = polygon.position(edge.b) - polygon.position(edge.a);
    let length = along.norm();
    if !(length > DEGENERATE_RELATIVE_EPS * polygon.max_edge_length()) {
        return Err(UvError::degenerate("zero-length base edge"));
    }
    let axis_u = along / length;

    let cross = axis_u.cross(polygon.normal());
    let cross_len = cross.norm();
    if !(cross_len > PARALLEL_EPS) {
        return Err(UvError::degenerate("normal parallel to base edge"));
    }
    let axis_v = -(cross / cross_len);

    Ok(ProjectionBasis { axis_u, axis_v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Polygon {
        Polygon::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_square_base_edge() {
        let edge = select_base_edge(&unit_square(), &EdgePriority::default()).unwrap();
        assert_eq!(edge, BaseEdge { a: 0, b: 1 });
    }

    #[test]
    fn test_prefers_low_z_over_low_y() {
        // Wall quad in the XZ plane, starting at the top edge
        let wall = Polygon::from_positions(vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 2.0),
        ]);
        let edge = select_base_edge(&wall, &EdgePriority::default()).unwrap();
        assert_eq!(edge, BaseEdge { a: 1, b: 2 });
    }

    #[test]
    fn test_wrapping_edge_can_win() {
        let tri = Polygon::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 5.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        let edge = select_base_edge(&tri, &EdgePriority::default()).unwrap();
        assert_eq!(edge, BaseEdge { a: 2, b: 0 });
    }

    #[test]
    fn test_ties_keep_first_edge() {
        let point = Point3::new(2.0, 2.0, 2.0);
        let collapsed = Polygon::new(vec![point; 4], Vector3::zeros());
        let edge = select_base_edge(&collapsed, &EdgePriority::default()).unwrap();
        assert_eq!(edge, BaseEdge { a: 0, b: 1 });
    }

    #[test]
    fn test_custom_priority() {
        // Prefer low X above everything
        let priority = EdgePriority::new(1000.0, 1.0, 1.0);
        let quad = Polygon::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let edge = select_base_edge(&quad, &priority).unwrap();
        assert_eq!(edge, BaseEdge { a: 3, b: 0 });
    }

    #[test]
    fn test_too_few_vertices() {
        let line = Polygon::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            Vector3::z(),
        );
        assert!(matches!(
            select_base_edge(&line, &EdgePriority::default()),
            Err(UvError::DegeneratePolygon { .. })
        ));
    }

    #[test]
    fn test_square_basis() {
        let square = unit_square();
        let basis = build_basis(&square, BaseEdge { a: 0, b: 1 }).unwrap();
        assert_relative_eq!(basis.axis_u, Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(basis.axis_v, Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(basis.axis_u.dot(&basis.axis_v), 0.0);
    }

    #[test]
    fn test_basis_is_orthonormal_on_tilted_face() {
        let tilted = Polygon::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 3.0),
            Point3::new(0.0, 0.0, 3.0),
        ]);
        let edge = select_base_edge(&tilted, &EdgePriority::default()).unwrap();
        let basis = build_basis(&tilted, edge).unwrap();

        assert_relative_eq!(basis.axis_u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(basis.axis_v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(basis.axis_u.dot(&basis.axis_v), 0.0, epsilon = 1e-12);
        assert_relative_eq!(basis.axis_v.dot(tilted.normal()), 0.0, epsilon = 1e-12);
        // Up the wall
        assert!(basis.axis_v.z > 0.0);
    }

    #[test]
    fn test_zero_length_edge() {
        let poly = Polygon::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            Vector3::z(),
        );
        assert!(matches!(
            build_basis(&poly, BaseEdge { a: 0, b: 1 }),
            Err(UvError::DegeneratePolygon { reason: "zero-length base edge" })
        ));
    }

    #[test]
    fn test_normal_parallel_to_edge() {
        let square = Polygon::new(unit_square().positions().to_vec(), Vector3::x());
        assert!(matches!(
            build_basis(&square, BaseEdge { a: 0, b: 1 }),
            Err(UvError::DegeneratePolygon { reason: "normal parallel to base edge" })
        ));
    }
}
