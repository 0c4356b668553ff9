//! Batch projection of many polygons.
//!
//! A batch threads one [`PackingCursor`] through its polygons in order. When
//! packing is disabled the polygons are independent, so the batch may run in
//! parallel; the output is identical either way.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{Result, UvError};
use crate::mesh::Polygon;

use super::project::{FaceUvProjector, PackingCursor};
use super::uv::UvResult;

/// Which projection a batch applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Pixel-scaled projection with optional packing.
    #[default]
    PixelScaled,
    /// Fixed-size reset footprint.
    FixedFootprint,
}

/// A polygon that was left out of a batch.
#[derive(Debug)]
pub struct SkippedFace {
    /// Position of the polygon in the batch input.
    pub index: usize,
    /// Why it was skipped.
    pub error: UvError,
}

/// Result of a batch projection.
#[derive(Debug)]
pub struct BatchOutput {
    /// UVs per input polygon; `None` where the polygon was skipped.
    pub faces: Vec<Option<UvResult>>,
    /// Skipped polygons in input order.
    pub skipped: Vec<SkippedFace>,
    /// Cursor after the last polygon.
    pub cursor: PackingCursor,
}

impl BatchOutput {
    /// Number of polygons that received UVs.
    pub fn num_projected(&self) -> usize {
        self.faces.len() - self.skipped.len()
    }

    /// Whether every polygon received UVs.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl FaceUvProjector {
    /// Build the basis and project a single polygon in the given mode.
    pub fn project(
        &self,
        polygon: &Polygon,
        mode: ProjectionMode,
        cursor: &mut PackingCursor,
    ) -> Result<UvResult> {
        let basis = self.basis_for(polygon)?;
        match mode {
            ProjectionMode::PixelScaled => self.project_polygon(polygon, &basis, cursor),
            ProjectionMode::FixedFootprint => self.reset_to_fixed_footprint(polygon, &basis),
        }
    }

    /// Project a batch of polygons.
    ///
    /// Degenerate polygons are skipped and listed in
    /// [`BatchOutput::skipped`]; they do not move the packing cursor.
    ///
    /// # Errors
    ///
    /// [`UvError::InvalidConfig`] for out-of-range options and
    /// [`UvError::EmptyBatch`] for an empty input. No partial results are
    /// produced in either case.
    ///
    /// # Example
    ///
    /// ```
    /// use texelmap::algo::unwrap::{FaceUvProjector, ProjectionConfig, ProjectionMode};
    /// use texelmap::mesh::Polygon;
    /// use nalgebra::Point3;
    ///
    /// let square = Polygon::from_positions(vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ]);
    /// let projector = FaceUvProjector::new(ProjectionConfig::default().with_buffer(2.0));
    /// let output = projector
    ///     .project_batch(&[square.clone(), square], ProjectionMode::PixelScaled)
    ///     .unwrap();
    ///
    /// assert_eq!(output.num_projected(), 2);
    /// assert!(output.cursor.horizontal_offset > 0.0);
    /// ```
    pub fn project_batch(&self, polygons: &[Polygon], mode: ProjectionMode) -> Result<BatchOutput> {
        self.project_batch_with_progress(polygons, mode, &Progress::none())
    }

    /// Project a batch of polygons, reporting progress.
    pub fn project_batch_with_progress(
        &self,
        polygons: &[Polygon],
        mode: ProjectionMode,
        progress: &Progress,
    ) -> Result<BatchOutput> {
        self.validate()?;
        if polygons.is_empty() {
            return Err(UvError::EmptyBatch);
        }

        let total = polygons.len();
        let ordered = mode == ProjectionMode::PixelScaled && self.config().packing_enabled();
        log::debug!(
            "projecting {} polygons ({:?}, texture {} px, {})",
            total,
            mode,
            self.texture_size(),
            if ordered { "packed" } else { "unpacked" }
        );

        let mut cursor = PackingCursor::new();
        let results: Vec<Result<UvResult>> = if !ordered && self.config().parallel {
            let done = AtomicUsize::new(0);
            polygons
                .par_iter()
                .map(|polygon| {
                    let result = self.project(polygon, mode, &mut PackingCursor::new());
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    progress.report(n, total, "Projecting faces");
                    result
                })
                .collect()
        } else {
            polygons
                .iter()
                .enumerate()
                .map(|(i, polygon)| {
                    let result = self.project(polygon, mode, &mut cursor);
                    progress.report(i + 1, total, "Projecting faces");
                    result
                })
                .collect()
        };

        let mut faces = Vec::with_capacity(total);
        let mut skipped = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(uvs) => faces.push(Some(uvs)),
                Err(error) if error.is_per_polygon() => {
                    log::warn!("skipping polygon {}: {}", index, error);
                    faces.push(None);
                    skipped.push(SkippedFace { index, error });
                }
                Err(error) => return Err(error),
            }
        }

        Ok(BatchOutput {
            faces,
            skipped,
            cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::unwrap::ProjectionConfig;
    use nalgebra::{Point3, Vector3};

    fn square_at(x: f64, size: f64) -> Polygon {
        Polygon::new(
            vec![
                Point3::new(x, 0.0, 0.0),
                Point3::new(x + size, 0.0, 0.0),
                Point3::new(x + size, size, 0.0),
                Point3::new(x, size, 0.0),
            ],
            Vector3::z(),
        )
    }

    fn collinear() -> Polygon {
        Polygon::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn test_empty_batch() {
        let result = FaceUvProjector::default().project_batch(&[], ProjectionMode::PixelScaled);
        assert!(matches!(result, Err(UvError::EmptyBatch)));
    }

    #[test]
    fn test_invalid_config_short_circuits() {
        let projector = FaceUvProjector::new(ProjectionConfig::default().with_texture_size(0));
        let result = projector.project_batch(&[square_at(0.0, 1.0)], ProjectionMode::PixelScaled);
        assert!(matches!(result, Err(UvError::InvalidConfig { .. })));
    }

    #[test]
    fn test_degenerate_polygon_is_skipped() {
        let polygons = vec![square_at(0.0, 1.0), collinear(), square_at(5.0, 1.0)];
        let projector = FaceUvProjector::new(ProjectionConfig::default().sequential());
        let output = projector
            .project_batch(&polygons, ProjectionMode::PixelScaled)
            .unwrap();

        assert_eq!(output.faces.len(), 3);
        assert_eq!(output.num_projected(), 2);
        assert!(output.faces[1].is_none());
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].index, 1);
        assert!(matches!(
            output.skipped[0].error,
            UvError::DegeneratePolygon { .. }
        ));

        // Unpacked polygons of the same shape share their UVs
        assert_eq!(output.faces[0], output.faces[2]);
    }

    #[test]
    fn test_skipped_polygon_does_not_advance_cursor() {
        let config = ProjectionConfig::default().with_buffer(2.0);
        let projector = FaceUvProjector::new(config);

        let with_gap = projector
            .project_batch(
                &[square_at(0.0, 1.0), collinear(), square_at(0.0, 1.0)],
                ProjectionMode::PixelScaled,
            )
            .unwrap();
        let without_gap = projector
            .project_batch(
                &[square_at(0.0, 1.0), square_at(0.0, 1.0)],
                ProjectionMode::PixelScaled,
            )
            .unwrap();

        assert_eq!(with_gap.cursor, without_gap.cursor);
        assert_eq!(with_gap.faces[2], without_gap.faces[1]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let polygons: Vec<Polygon> = (0..64)
            .map(|i| square_at(i as f64 * 1.5, 0.25 + i as f64 * 0.01))
            .collect();
        let parallel = FaceUvProjector::new(ProjectionConfig::default().with_parallel(true))
            .project_batch(&polygons, ProjectionMode::PixelScaled)
            .unwrap();
        let sequential = FaceUvProjector::new(ProjectionConfig::default().sequential())
            .project_batch(&polygons, ProjectionMode::PixelScaled)
            .unwrap();

        assert_eq!(parallel.faces, sequential.faces);
        assert_eq!(parallel.cursor, PackingCursor::new());
    }

    #[test]
    fn test_fixed_footprint_batch_keeps_cursor_at_zero() {
        let projector = FaceUvProjector::new(ProjectionConfig::for_reset().with_buffer(3.0));
        let output = projector
            .project_batch(
                &[square_at(0.0, 1.0), square_at(2.0, 3.0)],
                ProjectionMode::FixedFootprint,
            )
            .unwrap();
        assert_eq!(output.cursor, PackingCursor::new());
        assert_eq!(output.faces[0], output.faces[1]);
    }

    #[test]
    fn test_progress_counts_every_polygon() {
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, total, _| {
            assert_eq!(total, 3);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let polygons = vec![square_at(0.0, 1.0), collinear(), square_at(1.0, 1.0)];
        FaceUvProjector::default()
            .project_batch_with_progress(&polygons, ProjectionMode::PixelScaled, &progress)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
