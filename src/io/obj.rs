//! Wavefront OBJ format support.
//!
//! Faces keep their full arity (no triangulation). Texture coordinates are
//! read from `f v/vt` references and written as one `vt` line per loop, so
//! faces sharing a vertex can carry different UVs.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};

use crate::algo::unwrap::LoopUvs;
use crate::error::{Result, UvError};
use crate::mesh::{build_from_polygons, MeshIndex, PolygonMesh};

/// Load a mesh from an OBJ file, ignoring texture coordinates.
///
/// # Example
///
/// ```no_run
/// use texelmap::io::obj;
/// use texelmap::mesh::PolygonMesh;
///
/// let mesh: PolygonMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolygonMesh<I>> {
    load_with_uvs(path).map(|(mesh, _)| mesh)
}

/// Load a mesh and its UV layer (if every face corner has one) from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use texelmap::io::obj;
/// use texelmap::mesh::PolygonMesh;
///
/// let (mesh, uvs): (PolygonMesh, _) = obj::load_with_uvs("model.obj").unwrap();
/// ```
pub fn load_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    path: P,
) -> Result<(PolygonMesh<I>, Option<LoopUvs<I>>)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        UvError::Io(io) => UvError::Io(io),
        other => UvError::LoadError {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Parse OBJ text from a reader.
pub fn read<R: BufRead, I: MeshIndex>(
    reader: R,
) -> Result<(PolygonMesh<I>, Option<LoopUvs<I>>)> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut texcoords: Vec<Point2<f64>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    let mut corner_uvs: Vec<Option<usize>> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let line_no = line_no + 1;

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                vertices.push(Point3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut tokens, line_no)?;
                texcoords.push(Point2::new(u, v));
            }
            "f" => {
                let mut face = Vec::new();
                for token in tokens {
                    let mut parts = token.split('/');
                    let vi = parts
                        .next()
                        .ok_or_else(|| malformed(line_no, "empty face corner"))?;
                    face.push(resolve_index(vi, vertices.len(), line_no)?);

                    let ti = match parts.next() {
                        Some(t) if !t.is_empty() => {
                            Some(resolve_index(t, texcoords.len(), line_no)?)
                        }
                        _ => None,
                    };
                    corner_uvs.push(ti);
                }
                faces.push(face);
            }
            // Normals, groups, materials and smoothing are not needed
            _ => {}
        }
    }

    let mesh: PolygonMesh<I> = build_from_polygons(&vertices, &faces)?;

    let with_uv = corner_uvs.iter().filter(|t| t.is_some()).count();
    let uvs = if with_uv == corner_uvs.len() && with_uv > 0 {
        let coords = corner_uvs
            .iter()
            .map(|t| t.map_or(Point2::origin(), |ti| texcoords[ti]))
            .collect();
        Some(LoopUvs::new(coords))
    } else {
        if with_uv > 0 {
            log::warn!(
                "ignoring texture coordinates: only {} of {} face corners have one",
                with_uv,
                corner_uvs.len()
            );
        }
        None
    };

    Ok((mesh, uvs))
}

fn malformed(line: usize, message: &str) -> UvError {
    UvError::Malformed(format!("line {}: {}", line, message))
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(line, "missing coordinate"))?;
        *value = token
            .parse()
            .map_err(|_| malformed(line, &format!("invalid number '{}'", token)))?;
    }
    Ok(values)
}

/// Convert a 1-based (or negative, relative) OBJ index to 0-based.
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| malformed(line, &format!("invalid index '{}'", token)))?;
    let resolved = if raw > 0 {
        raw - 1
    } else {
        count as i64 + raw
    };
    if raw == 0 || resolved < 0 || resolved as usize >= count {
        return Err(malformed(line, &format!("index {} out of range", raw)));
    }
    Ok(resolved as usize)
}

/// Save a mesh to an OBJ file without texture coordinates.
///
/// # Example
///
/// ```no_run
/// use texelmap::io::obj;
/// use texelmap::mesh::PolygonMesh;
///
/// let mesh: PolygonMesh = PolygonMesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolygonMesh<I>, path: P) -> Result<()> {
    write_file(mesh, None, path.as_ref())
}

/// Save a mesh and its UV layer to an OBJ file.
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: &LoopUvs<I>,
    path: P,
) -> Result<()> {
    write_file(mesh, Some(uvs), path.as_ref())
}

fn write_file<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    uvs: Option<&LoopUvs<I>>,
    path: &Path,
) -> Result<()> {
    if let Some(layer) = uvs {
        layer.check_mesh(mesh)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, mesh, uvs)?;
    writer.flush()?;
    Ok(())
}

/// Write OBJ text to a writer.
pub fn write<W: Write, I: MeshIndex>(
    writer: &mut W,
    mesh: &PolygonMesh<I>,
    uvs: Option<&LoopUvs<I>>,
) -> Result<()> {
    if let Some(layer) = uvs {
        layer.check_mesh(mesh)?;
    }

    writeln!(writer, "# Generated by texelmap")?;
    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    if let Some(layer) = uvs {
        for uv in layer.as_slice() {
            writeln!(writer, "vt {} {}", uv.x, uv.y)?;
        }
    }

    for f in mesh.face_ids() {
        write!(writer, "f")?;
        for l in mesh.face_loops(f) {
            let v = mesh.loop_vertex(l).index() + 1;
            if uvs.is_some() {
                write!(writer, " {}/{}", v, l.index() + 1)?;
            } else {
                write!(writer, " {}", v)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
