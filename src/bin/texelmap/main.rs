//! texelmap CLI - pixel-scaled UV projection for polygon meshes.
//!
//! Usage: texelmap <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `texelmap --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use texelmap::algo::unwrap::{
    apply_with_progress, FaceSelection, FaceUvProjector, LoopUvs, ProjectionMode, Settings,
};
use texelmap::algo::Progress;
use texelmap::io;
use texelmap::mesh::{FaceId, PolygonMesh};

#[derive(Parser)]
#[command(name = "texelmap")]
#[command(author, version, about = "Pixel-scaled UV projection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Project faces to pixel-scaled UVs
    Unwrap {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Texture pixels per meter
        #[arg(short, long)]
        pixels_per_meter: Option<f64>,

        /// Compensate for a non-uniform object scale
        #[arg(long)]
        scale_correct: bool,

        /// Object scale as X,Y,Z
        #[arg(long, value_parser = parse_vec3)]
        object_scale: Option<[f64; 3]>,

        /// Snap the UV offset to the pixel grid
        #[arg(long)]
        snap: bool,

        /// Pixels between packed faces (0 disables packing)
        #[arg(short, long)]
        buffer: Option<f64>,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Reset faces to a fixed 3x3 pixel footprint
    Reset {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Pixel length of the reset cell
        #[arg(long)]
        pixel_size: Option<f64>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Texture size in pixels
    #[arg(short, long)]
    texture_size: Option<u32>,

    /// UV anchor of the face center as U,V
    #[arg(long, value_parser = parse_vec2)]
    anchor: Option<[f64; 2]>,

    /// Which faces to project
    #[arg(short, long, value_enum, default_value = "all")]
    faces: FacesArg,

    /// Face index used as the active face
    #[arg(long)]
    face: Option<usize>,

    /// TOML settings file (command-line flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FacesArg {
    /// Only the active face (see --face)
    Active,
    /// Faces marked as selected
    Selected,
    /// Every face
    All,
}

impl From<FacesArg> for FaceSelection {
    fn from(arg: FacesArg) -> Self {
        match arg {
            FacesArg::Active => FaceSelection::Active,
            FacesArg::Selected => FaceSelection::Selected,
            FacesArg::All => FaceSelection::All,
        }
    }
}

fn parse_floats<const N: usize>(text: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated numbers", N));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|_| format!("invalid number '{}'", part))?;
    }
    Ok(values)
}

fn parse_vec2(text: &str) -> Result<[f64; 2], String> {
    parse_floats::<2>(text)
}

fn parse_vec3(text: &str) -> Result<[f64; 3], String> {
    parse_floats::<3>(text)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Unwrap {
            input,
            output,
            pixels_per_meter,
            scale_correct,
            object_scale,
            snap,
            buffer,
            sequential,
            common,
        } => {
            let mut settings = common.base_settings(Settings::default())?;
            let projection = &mut settings.projection;
            if let Some(ppm) = pixels_per_meter {
                projection.pixels_per_meter = ppm;
            }
            if let Some(buffer) = buffer {
                projection.inter_face_buffer_pixels = buffer;
            }
            projection.correct_for_non_uniform_scale |= scale_correct;
            projection.snap_to_pixel_grid |= snap;
            if sequential {
                projection.parallel = false;
            }
            if let Some(scale) = object_scale {
                settings.object_scale = scale;
            }
            cmd_project(&input, &output, &settings, &common, ProjectionMode::PixelScaled)?;
        }
        Commands::Reset {
            input,
            output,
            pixel_size,
            common,
        } => {
            let mut settings = common.base_settings(Settings::for_reset())?;
            if let Some(size) = pixel_size {
                settings.projection.pixels_per_meter = size;
            }
            cmd_project(&input, &output, &settings, &common, ProjectionMode::FixedFootprint)?;
        }
    }

    Ok(())
}

impl CommonArgs {
    /// Settings from the config file (or `defaults`) with the shared flags applied.
    fn base_settings(&self, defaults: Settings) -> Result<Settings, Box<dyn std::error::Error>> {
        let mut settings = match &self.config {
            Some(path) => {
                log::info!("reading settings from {}", path.display());
                Settings::load(path)?
            }
            None => defaults,
        };
        if let Some(size) = self.texture_size {
            settings.viewport.texture_size_pixels = Some(size);
        }
        if let Some(anchor) = self.anchor {
            settings.viewport.anchor = Some(anchor);
        }
        Ok(settings)
    }

    /// Apply `--face` to the mesh as its active face.
    fn mark_active(&self, mesh: &mut PolygonMesh) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(index) = self.face {
            if index >= mesh.num_faces() {
                return Err(format!(
                    "face {} out of range (mesh has {} faces)",
                    index,
                    mesh.num_faces()
                )
                .into());
            }
            mesh.set_active_face(Some(FaceId::new(index)));
        }
        Ok(())
    }
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Parallel batches report out of order; only ever move forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (mesh, uvs): (PolygonMesh, _) = io::load_with_uvs(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Loops: {}", mesh.num_loops());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let (min_len, max_len) = mesh
        .face_ids()
        .map(|f| mesh.face_len(f))
        .fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));
    if mesh.num_faces() > 0 {
        if min_len == max_len {
            println!("Face arity: {}", min_len);
        } else {
            println!("Face arity: {} to {}", min_len, max_len);
        }
    }

    let projector = FaceUvProjector::default();
    let degenerate = mesh
        .face_ids()
        .filter(|&f| projector.basis_for(&mesh.polygon(f)).is_err())
        .count();
    println!("Degenerate faces: {}", degenerate);

    match uvs {
        Some(layer) => {
            println!("UV layer: yes (area {:.6})", layer.total_area(&mesh));
            if let Some((min, max)) = layer.bounding_box() {
                println!(
                    "UV bounds: ({:.4}, {:.4}) to ({:.4}, {:.4})",
                    min.x, min.y, max.x, max.y
                );
            }
        }
        None => println!("UV layer: no"),
    }

    Ok(())
}

fn cmd_project(
    input: &Path,
    output: &Path,
    settings: &Settings,
    common: &CommonArgs,
    mode: ProjectionMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut mesh, uvs): (PolygonMesh, _) = io::load_with_uvs(input)?;
    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );
    common.mark_active(&mut mesh)?;

    let mut uvs = uvs.unwrap_or_else(|| LoopUvs::for_mesh(&mesh));
    let projector = FaceUvProjector::from_settings(settings);

    let label = match mode {
        ProjectionMode::PixelScaled => "Unwrapping",
        ProjectionMode::FixedFootprint => "Resetting",
    };
    println!(
        "{} faces ({} px/m, {} px texture, {})...",
        label,
        projector.config().pixels_per_meter,
        projector.texture_size(),
        if projector.config().packing_enabled() {
            "packed"
        } else if projector.config().parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let progress = create_progress();
    let start = Instant::now();
    let report = apply_with_progress(
        &mesh,
        &mut uvs,
        &projector,
        common.faces.into(),
        mode,
        &progress,
    )?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} faces updated, {} skipped",
        report.updated.len(),
        report.skipped.len()
    );
    for (face, error) in &report.skipped {
        log::info!("skipped face {}: {}", face.index(), error);
    }

    io::save_with_uvs(&mesh, &uvs, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
