//! Standalone polygon geometry.
//!
//! A [`Polygon`] is the unit of work for the projector: an ordered loop of
//! positions plus its outward normal. It carries no connectivity, so callers
//! can build polygons straight from their own mesh storage.

use nalgebra::{Point3, Vector3};

/// Relative flatness below which a polygon counts as having no area.
///
/// Twice the area is compared against this fraction of the squared longest
/// edge, so the test does not depend on where the polygon sits or its size.
pub const DEGENERATE_RELATIVE_EPS: f64 = 1e-10;

/// An ordered, planar (or near-planar) polygon with a precomputed normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    positions: Vec<Point3<f64>>,
    normal: Vector3<f64>,
}

impl Polygon {
    /// Create a polygon from positions and a caller-supplied normal.
    ///
    /// No validation is performed here; degenerate polygons are reported by
    /// the projector when a basis is built.
    pub fn new(positions: Vec<Point3<f64>>, normal: Vector3<f64>) -> Self {
        Self { positions, normal }
    }

    /// Create a polygon and compute its normal with Newell's method.
    pub fn from_positions(positions: Vec<Point3<f64>>) -> Self {
        let normal = newell_normal(&positions);
        Self { positions, normal }
    }

    /// The loop positions in order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Position of loop `i`.
    #[inline]
    pub fn position(&self, i: usize) -> &Point3<f64> {
        &self.positions[i]
    }

    /// The polygon normal.
    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Number of loops (corners).
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Unweighted mean of the vertex positions (median center).
    ///
    /// Returns the origin for an empty polygon.
    pub fn center(&self) -> Point3<f64> {
        if self.positions.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.positions.len() as f64)
    }

    /// Area of the polygon, from the magnitude of its vector area.
    pub fn area(&self) -> f64 {
        0.5 * vector_area(&self.positions).norm()
    }

    /// Length of the longest edge, or zero for an empty polygon.
    pub fn max_edge_length(&self) -> f64 {
        max_edge_length_squared(&self.positions).sqrt()
    }

    /// Whether the polygon has no usable area: fewer than three vertices,
    /// coincident vertices or all vertices on one line.
    pub fn is_degenerate(&self) -> bool {
        self.positions.len() < 3 || is_flat(&self.positions, vector_area(&self.positions).norm())
    }

    /// Iterate over edges as `(i, (i + 1) % n)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.positions.len();
        (0..n).map(move |i| (i, (i + 1) % n))
    }
}

/// Twice the vector area of a closed loop.
///
/// Summed as a fan around the first vertex, so rounding noise scales with
/// the polygon's size rather than its distance from the origin.
fn vector_area(positions: &[Point3<f64>]) -> Vector3<f64> {
    let Some(first) = positions.first() else {
        return Vector3::zeros();
    };
    positions
        .windows(2)
        .skip(1)
        .fold(Vector3::zeros(), |sum, pair| {
            sum + (pair[0] - first).cross(&(pair[1] - first))
        })
}

fn max_edge_length_squared(positions: &[Point3<f64>]) -> f64 {
    let n = positions.len();
    (0..n)
        .map(|i| (positions[(i + 1) % n] - positions[i]).norm_squared())
        .fold(0.0, f64::max)
}

/// `doubled_area` is zero relative to the loop's longest edge.
fn is_flat(positions: &[Point3<f64>], doubled_area: f64) -> bool {
    !(doubled_area > DEGENERATE_RELATIVE_EPS * max_edge_length_squared(positions))
}

/// Unit normal of a polygon loop using Newell's method.
///
/// Returns the zero vector when the loop has no area.
pub fn newell_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    let n = vector_area(positions);
    let len = n.norm();
    if is_flat(positions, len) {
        Vector3::zeros()
    } else {
        n / len
    }
}
