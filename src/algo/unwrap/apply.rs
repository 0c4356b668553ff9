//! Projecting faces of a [`PolygonMesh`] into its UV layer.

use crate::algo::Progress;
use crate::error::{Result, UvError};
use crate::mesh::{FaceId, MeshIndex, PolygonMesh};

use super::batch::ProjectionMode;
use super::project::{FaceUvProjector, PackingCursor};
use super::uv::LoopUvs;

/// Which faces of a mesh an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceSelection {
    /// Only the active face.
    Active,
    /// Every selected face, in index order.
    Selected,
    /// Every face, in index order.
    #[default]
    All,
}

impl FaceSelection {
    /// Resolve the selection against a mesh.
    pub fn faces<I: MeshIndex>(self, mesh: &PolygonMesh<I>) -> Vec<FaceId<I>> {
        match self {
            FaceSelection::Active => mesh.active_face().into_iter().collect(),
            FaceSelection::Selected => mesh.selected_faces().collect(),
            FaceSelection::All => mesh.face_ids().collect(),
        }
    }
}

/// Outcome of a mesh-level projection.
#[derive(Debug)]
pub struct ApplyReport<I: MeshIndex = u32> {
    /// Faces that received new UVs.
    pub updated: Vec<FaceId<I>>,
    /// Faces left untouched, with the reason.
    pub skipped: Vec<(FaceId<I>, UvError)>,
    /// Packing cursor after the last face.
    pub cursor: PackingCursor,
}

/// Unwrap faces to pixel-scaled UVs and store them in `uvs`.
///
/// Faces are processed in selection order; with packing enabled they are laid
/// out left to right in that order. Skipped faces keep their previous UVs.
///
/// # Errors
///
/// [`UvError::EmptyBatch`] when the selection is empty,
/// [`UvError::LayerMismatch`] when `uvs` does not fit the mesh and
/// [`UvError::InvalidConfig`] for out-of-range options.
///
/// # Example
///
/// ```
/// use texelmap::algo::unwrap::{unwrap_faces, FaceSelection, FaceUvProjector, LoopUvs};
/// use texelmap::mesh::{build_from_polygons, PolygonMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: PolygonMesh = build_from_polygons(&vertices, &[vec![0, 1, 2, 3]]).unwrap();
/// let mut uvs = LoopUvs::for_mesh(&mesh);
///
/// let projector = FaceUvProjector::default();
/// let report = unwrap_faces(&mesh, &mut uvs, &projector, FaceSelection::All).unwrap();
/// assert_eq!(report.updated.len(), 1);
/// ```
pub fn unwrap_faces<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &mut LoopUvs<I>,
    projector: &FaceUvProjector,
    selection: FaceSelection,
) -> Result<ApplyReport<I>> {
    apply_with_progress(
        mesh,
        uvs,
        projector,
        selection,
        ProjectionMode::PixelScaled,
        &Progress::none(),
    )
}

/// Reset faces to the fixed UV footprint and store them in `uvs`.
///
/// See [`FaceUvProjector::reset_to_fixed_footprint`].
pub fn reset_faces<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &mut LoopUvs<I>,
    projector: &FaceUvProjector,
    selection: FaceSelection,
) -> Result<ApplyReport<I>> {
    apply_with_progress(
        mesh,
        uvs,
        projector,
        selection,
        ProjectionMode::FixedFootprint,
        &Progress::none(),
    )
}

/// Project the selected faces in `mode`, reporting progress.
pub fn apply_with_progress<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &mut LoopUvs<I>,
    projector: &FaceUvProjector,
    selection: FaceSelection,
    mode: ProjectionMode,
    progress: &Progress,
) -> Result<ApplyReport<I>> {
    uvs.check_mesh(mesh)?;

    let faces = selection.faces(mesh);
    let polygons: Vec<_> = faces.iter().map(|&f| mesh.polygon(f)).collect();
    let output = projector.project_batch_with_progress(&polygons, mode, progress)?;

    let mut updated = Vec::with_capacity(output.num_projected());
    for (&face, result) in faces.iter().zip(&output.faces) {
        if let Some(face_uvs) = result {
            uvs.set_face(mesh, face, face_uvs);
            updated.push(face);
        }
    }
    let skipped = output
        .skipped
        .into_iter()
        .map(|s| (faces[s.index], s.error))
        .collect();

    Ok(ApplyReport {
        updated,
        skipped,
        cursor: output.cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::unwrap::ProjectionConfig;
    use crate::mesh::build_from_polygons;
    use nalgebra::{Point2, Point3};

    /// Two unit quads side by side plus a collinear sliver.
    fn strip() -> PolygonMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4], vec![0, 1, 2]];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_selection_resolution() {
        let mut mesh = strip();
        assert!(FaceSelection::Active.faces(&mesh).is_empty());
        assert_eq!(FaceSelection::All.faces(&mesh).len(), 3);

        mesh.set_selected(FaceId::new(2), true);
        mesh.set_active_face(Some(FaceId::new(1)));
        assert_eq!(FaceSelection::Active.faces(&mesh), vec![FaceId::new(1)]);
        assert_eq!(
            FaceSelection::Selected.faces(&mesh),
            vec![FaceId::new(1), FaceId::new(2)]
        );
    }

    #[test]
    fn test_unwrap_all_skips_sliver() {
        let mesh = strip();
        let mut uvs = LoopUvs::for_mesh(&mesh);
        let sentinel = Point2::new(-1.0, -1.0);
        for l in mesh.face_loops(FaceId::new(2)) {
            uvs.set(l, sentinel);
        }

        let report =
            unwrap_faces(&mesh, &mut uvs, &FaceUvProjector::default(), FaceSelection::All).unwrap();

        assert_eq!(report.updated, vec![FaceId::new(0), FaceId::new(1)]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, FaceId::new(2));
        assert!(uvs
            .face_uvs(&mesh, FaceId::new(2))
            .iter()
            .all(|&p| p == sentinel));
        assert_eq!(
            uvs.face_uvs(&mesh, FaceId::new(0))[0],
            Point2::new(0.375, 0.375)
        );
    }

    #[test]
    fn test_packed_faces_do_not_share_u() {
        let mesh = strip();
        let mut uvs = LoopUvs::for_mesh(&mesh);
        let projector = FaceUvProjector::new(ProjectionConfig::default().with_buffer(2.0));

        unwrap_faces(&mesh, &mut uvs, &projector, FaceSelection::All).unwrap();

        let first = uvs.face_uvs(&mesh, FaceId::new(0));
        let second = uvs.face_uvs(&mesh, FaceId::new(1));
        let first_max = first.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let second_min = second.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert!(second_min > first_max);
    }

    #[test]
    fn test_empty_active_selection() {
        let mesh = strip();
        let mut uvs = LoopUvs::for_mesh(&mesh);
        let result = reset_faces(
            &mesh,
            &mut uvs,
            &FaceUvProjector::default(),
            FaceSelection::Active,
        );
        assert!(matches!(result, Err(UvError::EmptyBatch)));
    }

    #[test]
    fn test_layer_mismatch() {
        let mesh = strip();
        let mut uvs = LoopUvs::zeros(2);
        let result = unwrap_faces(&mesh, &mut uvs, &FaceUvProjector::default(), FaceSelection::All);
        assert!(matches!(result, Err(UvError::LayerMismatch { .. })));
    }
}
