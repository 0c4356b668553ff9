//! Benchmarks for UV projection.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use texelmap::prelude::*;

/// An `n x n` grid of quads on a gentle slope, as a list of polygons.
fn create_grid_polygons(n: usize) -> Vec<Polygon> {
    let height = |i: usize, j: usize| 0.1 * (i as f64).sin() + 0.05 * j as f64;
    let mut polygons = Vec::with_capacity(n * n);

    for j in 0..n {
        for i in 0..n {
            let corner = |di: usize, dj: usize| {
                Point3::new((i + di) as f64, (j + dj) as f64, height(i + di, j + dj))
            };
            polygons.push(Polygon::from_positions(vec![
                corner(0, 0),
                corner(1, 0),
                corner(1, 1),
                corner(0, 1),
            ]));
        }
    }

    polygons
}

fn create_grid_mesh(n: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11, v01]);
        }
    }

    build_from_polygons(&vertices, &faces).unwrap()
}

fn bench_project_batch(c: &mut Criterion) {
    let polygons = create_grid_polygons(100);

    let parallel = FaceUvProjector::default();
    c.bench_function("project_batch_10k_parallel", |b| {
        b.iter(|| parallel.project_batch(&polygons, ProjectionMode::PixelScaled).unwrap())
    });

    let sequential = FaceUvProjector::new(ProjectionConfig::default().sequential());
    c.bench_function("project_batch_10k_sequential", |b| {
        b.iter(|| sequential.project_batch(&polygons, ProjectionMode::PixelScaled).unwrap())
    });

    let packed = FaceUvProjector::new(ProjectionConfig::default().with_buffer(2.0));
    c.bench_function("project_batch_10k_packed", |b| {
        b.iter(|| packed.project_batch(&polygons, ProjectionMode::PixelScaled).unwrap())
    });

    let reset = FaceUvProjector::new(ProjectionConfig::for_reset());
    c.bench_function("reset_batch_10k", |b| {
        b.iter(|| reset.project_batch(&polygons, ProjectionMode::FixedFootprint).unwrap())
    });
}

fn bench_unwrap_mesh(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let projector = FaceUvProjector::default();

    c.bench_function("unwrap_faces_grid_100x100", |b| {
        let mut uvs = LoopUvs::for_mesh(&mesh);
        b.iter(|| unwrap_faces(&mesh, &mut uvs, &projector, FaceSelection::All).unwrap())
    });
}

criterion_group!(benches, bench_project_batch, bench_unwrap_mesh);
criterion_main!(benches);
