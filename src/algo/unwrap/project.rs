//! Per-face UV projection.
//!
//! [`FaceUvProjector`] flattens a polygon onto its own plane using the basis
//! from [`build_basis`](super::build_basis), scales the result to texture
//! space and rounds every coordinate to the texture's pixel grid.

use nalgebra::{Point2, Vector2, Vector3};

use crate::error::{Result, UvError};
use crate::mesh::Polygon;

use super::basis::{build_basis, select_base_edge, BaseEdge, ProjectionBasis};
use super::config::{ProjectionConfig, Settings, ViewportContext};
use super::uv::UvResult;

/// Texture-space center used when no anchor is given.
const DEFAULT_ANCHOR: [f64; 2] = [0.5, 0.5];

/// Multiplier applied before clamping offsets in the fixed-footprint reset.
const FOOTPRINT_SENSITIVITY: f64 = 100.0;

/// Running horizontal offset shared by the polygons of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackingCursor {
    /// Offset added to U of the next polygon.
    pub horizontal_offset: f64,
}

impl PackingCursor {
    /// A cursor at the start of a batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move back to the start of a batch.
    pub fn reset(&mut self) {
        self.horizontal_offset = 0.0;
    }
}

/// Computes pixel-aligned UVs for individual polygons.
///
/// The projector holds no mutable state; packing state lives in the
/// [`PackingCursor`] the caller passes in.
///
/// # Example
///
/// ```
/// use texelmap::algo::unwrap::{FaceUvProjector, PackingCursor, ProjectionConfig};
/// use texelmap::mesh::Polygon;
/// use nalgebra::{Point2, Point3};
///
/// let square = Polygon::from_positions(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
///
/// let projector = FaceUvProjector::new(ProjectionConfig::default());
/// let basis = projector.basis_for(&square).unwrap();
/// let uvs = projector
///     .project_polygon(&square, &basis, &mut PackingCursor::new())
///     .unwrap();
///
/// assert_eq!(uvs.get(0), Point2::new(0.375, 0.375));
/// assert_eq!(uvs.get(2), Point2::new(0.625, 0.625));
/// ```
#[derive(Debug, Clone)]
pub struct FaceUvProjector {
    config: ProjectionConfig,
    viewport: ViewportContext,
    object_scale: Vector3<f64>,
}

impl Default for FaceUvProjector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

impl FaceUvProjector {
    /// Create a projector without viewport context and with unit object scale.
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config,
            viewport: ViewportContext::default(),
            object_scale: Vector3::repeat(1.0),
        }
    }

    /// Create a projector from a full set of settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let [x, y, z] = settings.object_scale;
        Self::new(settings.projection.clone())
            .with_viewport(settings.viewport)
            .with_object_scale(Vector3::new(x, y, z))
    }

    /// Use texture size and anchor values from the host's texture view.
    pub fn with_viewport(mut self, viewport: ViewportContext) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the object scale used by non-uniform scale correction.
    pub fn with_object_scale(mut self, scale: Vector3<f64>) -> Self {
        self.object_scale = scale;
        self
    }

    /// The projection options.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// The viewport context.
    pub fn viewport(&self) -> &ViewportContext {
        &self.viewport
    }

    /// The object scale.
    pub fn object_scale(&self) -> &Vector3<f64> {
        &self.object_scale
    }

    /// Check the configuration, the viewport context and the object scale.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.viewport.validate()?;
        if !self.object_scale.iter().all(|s| s.is_finite()) {
            return Err(UvError::invalid_config(
                "object_scale",
                format!("{:?}", self.object_scale.as_slice()),
                "must be finite",
            ));
        }
        Ok(())
    }

    /// Texture size in effect: the viewport's if known, else the configured one.
    #[inline]
    pub fn texture_size(&self) -> u32 {
        self.viewport
            .texture_size_pixels
            .unwrap_or(self.config.texture_size_pixels)
    }

    /// Meters-to-UV scale factor.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.config.pixels_per_meter / self.texture_size() as f64
    }

    /// UV offset of the polygon center, snapped when pixel-grid snapping is on.
    pub fn offset(&self) -> Vector2<f64> {
        let [u, v] = self.viewport.anchor.unwrap_or(DEFAULT_ANCHOR);
        let offset = Vector2::new(u, v);
        if self.config.snap_to_pixel_grid {
            let steps = self.config.pixels_per_meter / 2.0;
            offset.map(|c| (c * steps).floor() / steps)
        } else {
            offset
        }
    }

    /// Pick the polygon's base edge using the configured priority.
    pub fn select_base_edge(&self, polygon: &Polygon) -> Result<BaseEdge> {
        select_base_edge(polygon, &self.config.edge_priority)
    }

    /// Build the projection basis for a given base edge.
    pub fn build_basis(&self, polygon: &Polygon, edge: BaseEdge) -> Result<ProjectionBasis> {
        build_basis(polygon, edge)
    }

    /// Select the base edge and build the basis, rejecting polygons without area.
    pub fn basis_for(&self, polygon: &Polygon) -> Result<ProjectionBasis> {
        let edge = self.select_base_edge(polygon)?;
        if polygon.is_degenerate() {
            return Err(UvError::degenerate("zero area"));
        }
        self.build_basis(polygon, edge)
    }

    /// Project a polygon to pixel-scaled UVs.
    ///
    /// With packing enabled the polygon is shifted right by the cursor, and
    /// the cursor then advances by twice the polygon's largest U extent plus
    /// the buffer. With packing disabled the cursor is ignored and left at
    /// zero, so every polygon lands on the same region.
    ///
    /// The cursor is only touched after the full UV set has been computed.
    ///
    /// # Errors
    ///
    /// [`UvError::InvalidConfig`] if the configuration is out of range and
    /// [`UvError::DegeneratePolygon`] if the polygon has fewer than three
    /// vertices.
    pub fn project_polygon(
        &self,
        polygon: &Polygon,
        basis: &ProjectionBasis,
        cursor: &mut PackingCursor,
    ) -> Result<UvResult> {
        self.validate()?;
        if polygon.len() < 3 {
            return Err(UvError::degenerate("fewer than 3 vertices"));
        }

        let texture_size = self.texture_size() as f64;
        let scale = self.scale();
        let offset = self.offset();
        let packing = self.config.packing_enabled();
        let shift = if packing { cursor.horizontal_offset } else { 0.0 };
        let center = polygon.center();

        let mut max_u = f64::NEG_INFINITY;
        let coords = polygon
            .positions()
            .iter()
            .map(|p| {
                let mut d = p - center;
                if self.config.correct_for_non_uniform_scale {
                    d.component_mul_assign(&self.object_scale);
                }
                let du = d.dot(&basis.axis_u) * scale;
                let dv = d.dot(&basis.axis_v) * scale;
                max_u = max_u.max(du);

                Point2::new(
                    snap(du + offset.x + shift, texture_size),
                    snap(dv + offset.y, texture_size),
                )
            })
            .collect();

        if packing {
            cursor.horizontal_offset +=
                2.0 * max_u + self.config.inter_face_buffer_pixels / texture_size;
        } else {
            cursor.reset();
        }

        Ok(UvResult::new(coords))
    }

    /// Reset a polygon to a fixed-size UV footprint.
    ///
    /// Each loop's offset from the center is reduced to `-1`, `0` or `1` along
    /// each axis, then scaled to half a cell of `pixels_per_meter` pixels. Any
    /// polygon therefore maps into a 3x3 grid of cells around the offset,
    /// whatever its real size. Packing and scale correction do not apply.
    pub fn reset_to_fixed_footprint(
        &self,
        polygon: &Polygon,
        basis: &ProjectionBasis,
    ) -> Result<UvResult> {
        self.validate()?;
        if polygon.len() < 3 {
            return Err(UvError::degenerate("fewer than 3 vertices"));
        }

        let texture_size = self.texture_size() as f64;
        let half_cell = self.scale() / 2.0;
        let offset = self.offset();
        let center = polygon.center();

        let coords = polygon
            .positions()
            .iter()
            .map(|p| {
                let d = p - center;
                let su = unit_step(d.dot(&basis.axis_u));
                let sv = unit_step(d.dot(&basis.axis_v));
                Point2::new(
                    snap(su * half_cell + offset.x, texture_size),
                    snap(sv * half_cell + offset.y, texture_size),
                )
            })
            .collect();

        Ok(UvResult::new(coords))
    }
}

/// Round to the nearest multiple of `1 / size`, halves away from zero.
#[inline]
fn snap(value: f64, size: f64) -> f64 {
    (value * size).round() / size
}

/// `round(x * 100)` clamped to `[-1, 1]`.
#[inline]
fn unit_step(x: f64) -> f64 {
    (x * FOOTPRINT_SENSITIVITY).round().clamp(-1.0, 1.0)
}
