//! PLY (Stanford polygon) format support.
//!
//! Faces are read with their full arity. Per-face `texcoord` lists (two floats
//! per corner, the layout Blender and MeshLab use) become a UV layer.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::algo::unwrap::LoopUvs;
use crate::error::{Result, UvError};
use crate::mesh::{build_from_polygons, MeshIndex, PolygonMesh};

/// Load a mesh from a PLY file, ignoring texture coordinates.
///
/// # Example
///
/// ```no_run
/// use texelmap::io::ply;
/// use texelmap::mesh::PolygonMesh;
///
/// let mesh: PolygonMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolygonMesh<I>> {
    load_with_uvs(path).map(|(mesh, _)| mesh)
}

/// Load a mesh and its UV layer (if every face has texcoords) from a PLY file.
pub fn load_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    path: P,
) -> Result<(PolygonMesh<I>, Option<LoopUvs<I>>)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: String| UvError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(e.to_string()))?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element".to_string()))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(format!("vertex missing {} coordinate", name)))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    // Extract faces
    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element".to_string()))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    let mut texcoords: Vec<Point2<f64>> = Vec::new();
    let mut all_textured = true;
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property".to_string()))?;

        match get_float_list_property(face, "texcoord") {
            Some(uv) if uv.len() == 2 * indices.len() => {
                texcoords.extend(uv.chunks_exact(2).map(|c| Point2::new(c[0], c[1])));
            }
            _ => all_textured = false,
        }
        faces.push(indices);
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces".to_string()));
    }

    let mesh: PolygonMesh<I> =
        build_from_polygons(&vertices, &faces).map_err(|e| load_error(e.to_string()))?;
    let uvs = if all_textured {
        Some(LoopUvs::new(texcoords))
    } else {
        None
    };

    Ok((mesh, uvs))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

fn get_float_list_property(element: &DefaultElement, name: &str) -> Option<Vec<f64>> {
    match element.get(name)? {
        Property::ListFloat(v) => Some(v.iter().map(|&x| x as f64).collect()),
        Property::ListDouble(v) => Some(v.clone()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// # Example
///
/// ```no_run
/// use texelmap::io::ply;
/// use texelmap::mesh::PolygonMesh;
///
/// let mesh: PolygonMesh = PolygonMesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolygonMesh<I>, path: P) -> Result<()> {
    write_file(mesh, None, path.as_ref())
}

/// Save a mesh to a PLY file with its UV layer as a per-face `texcoord` list.
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &LoopUvs<I>,
    path: P,
) -> Result<()> {
    uvs.check_mesh(mesh)?;
    write_file(mesh, Some(uvs), path.as_ref())
}

fn write_file<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: Option<&LoopUvs<I>>,
    path: &Path,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by texelmap")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    if uvs.is_some() {
        // Two values per corner, so the count needs more than a uchar
        writeln!(writer, "property list int double texcoord")?;
    }
    writeln!(writer, "end_header")?;

    // Write vertices
    for p in mesh.positions() {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }

    // Write faces
    for f in mesh.face_ids() {
        let corners = mesh.face_len(f);
        if corners > u8::MAX as usize {
            return Err(UvError::SaveError {
                path: path.to_path_buf(),
                message: format!(
                    "face {} has {} corners (PLY lists hold 255)",
                    f.index(),
                    corners
                ),
            });
        }

        write!(writer, "{}", corners)?;
        for v in mesh.face_vertices(f) {
            write!(writer, " {}", v.index())?;
        }
        if let Some(layer) = uvs {
            write!(writer, " {}", 2 * corners)?;
            for uv in layer.face_uvs(mesh, f) {
                write!(writer, " {} {}", uv.x, uv.y)?;
            }
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;
    use std::f64::consts::TAU;
    use tempfile::TempDir;

    /// A single convex face with `n` corners.
    fn disc(n: usize) -> PolygonMesh {
        let vertices: Vec<_> = (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                Point3::new(t.cos(), t.sin(), 0.0)
            })
            .collect();
        let face: Vec<usize> = (0..n).collect();
        build_from_polygons(&vertices, &[face]).unwrap()
    }

    #[test]
    fn test_texcoord_count_beyond_uchar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disc.ply");
        let mesh = disc(130);
        let uvs = LoopUvs::new(
            (0..130)
                .map(|i| Point2::new(i as f64 / 256.0, 0.5))
                .collect(),
        );

        save_with_uvs(&mesh, &uvs, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("property list int double texcoord"));
        assert!(text.contains(" 260 "));

        let (loaded, loaded_uvs): (PolygonMesh, _) = load_with_uvs(&path).unwrap();
        assert_eq!(loaded.face_len(FaceId::new(0)), 130);
        assert_eq!(loaded_uvs.unwrap(), uvs);
    }

    #[test]
    fn test_face_too_large_for_uchar() {
        let dir = TempDir::new().unwrap();
        let result = save(&disc(256), dir.path().join("big.ply"));
        assert!(matches!(result, Err(UvError::SaveError { .. })));
    }
}
