//! Tessel CLI - triangulation command-line tool.
//!
//! Usage: tessel <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `tessel --help` for available commands.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tessel::algo::{crust_with_progress, refine_with_progress, Progress, RefineOptions};
use tessel::io;
use tessel::mesh::Mesh;

#[derive(Parser)]
#[command(name = "tessel")]
#[command(author, version, about = "Delaunay triangulation CLI", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display triangulation information
    Info {
        /// Input file (.off, .pts, .tri, .ctri)
        input: PathBuf,
    },

    /// Triangulate a point sample
    Triangulate {
        /// Input point file (.pts)
        input: PathBuf,

        /// Output mesh file (.off)
        output: PathBuf,
    },

    /// Reconstruct the curve through a point sample
    Crust {
        /// Input point file (.pts)
        input: PathBuf,

        /// Write the curve edges as vertex index pairs
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Refine a constrained point set
    Refine {
        /// Input constrained file (.ctri)
        input: PathBuf,

        /// Output mesh file (.off)
        output: PathBuf,

        /// Minimum interior angle in degrees
        #[arg(short, long, default_value = "22.0")]
        min_angle: f64,

        /// Use the half-difference segment center
        #[arg(long)]
        legacy_center: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Triangulate { input, output } => {
            cmd_triangulate(&input, &output)?;
        }

        Commands::Crust { input, output } => {
            cmd_crust(&input, output.as_ref())?;
        }

        Commands::Refine {
            input,
            output,
            min_angle,
            legacy_center,
        } => {
            cmd_refine(&input, &output, min_angle, legacy_center)?;
        }
    }

    Ok(())
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

        // Monotonic across phases
        let old_max = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = old_max.max(raw_percent);
        if percent == old_max && percent != 100 {
            return;
        }

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

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Edges: {}", mesh.edges().len());

    let isolated = mesh.vertices().iter().filter(|v| v.is_isolated()).count();
    if isolated > 0 {
        println!("Isolated vertices: {}", isolated);
    }
    if !mesh.border().is_empty() {
        println!("Border: {} vertices", mesh.border().len());
    }
    if !mesh.curve().is_empty() {
        println!("Curve: {} edges", mesh.curve().len());
    }
    if !mesh.constraints().is_empty() {
        let present = mesh
            .constraints()
            .iter()
            .filter(|s| mesh.contains_edge(s))
            .count();
        println!(
            "Constraints: {} ({} present in the triangulation)",
            mesh.constraints().len(),
            present
        );
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}) to ({:.3}, {:.3})",
            min.x, min.y, max.x, max.y
        );
    }
    if let Some(angle) = mesh.min_angle() {
        println!("Smallest angle: {:.3} degrees", angle);
    }

    match mesh.validate() {
        Ok(()) => println!("Topology: valid"),
        Err(e) => println!("Topology: invalid ({})", e),
    }
    println!(
        "Delaunay: {}",
        if mesh.is_delaunay() { "yes" } else { "no" }
    );

    Ok(())
}

fn cmd_triangulate(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut mesh: Mesh = Mesh::new();
    mesh.load_triangulation(input)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} triangles, {} on the border",
        mesh.num_vertices(),
        mesh.num_triangles(),
        mesh.border().len()
    );
    mesh.dump_to_off(output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_crust(input: &PathBuf, output: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: Mesh = Mesh::new();
    mesh.load_triangulation(input)?;

    println!("Loaded: {} samples, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let progress = create_progress();
    let start = Instant::now();
    let edges = crust_with_progress(&mut mesh, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} curve edges, {} Voronoi centers ({:.2?})",
        edges,
        mesh.num_vertices() - mesh.index_before_voronoi(),
        elapsed
    );

    if let Some(path) = output {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", mesh.curve().len())?;
        for e in mesh.curve() {
            writeln!(writer, "{} {}", e.a.index(), e.b.index())?;
        }
        writer.flush()?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}

fn cmd_refine(
    input: &PathBuf,
    output: &PathBuf,
    min_angle: f64,
    legacy_center: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RefineOptions::default().with_min_angle(min_angle);
    if legacy_center {
        options = options.legacy();
    }
    options.validate()?;

    let mut mesh: Mesh = io::ctri::load(input)?;
    println!(
        "Loaded: {} vertices, {} triangles, {} constraints",
        mesh.num_vertices(),
        mesh.num_triangles(),
        mesh.constraints().len()
    );

    println!("Refining to a minimum angle of {} degrees...", min_angle);
    let progress = create_progress();
    let start = Instant::now();
    let stats = refine_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} triangles ({} segments split, {} circumcenters, {} deferred, {} skipped)",
        mesh.num_vertices(),
        mesh.num_triangles(),
        stats.segments_split,
        stats.circumcenters_inserted,
        stats.deferred,
        stats.skipped
    );
    mesh.dump_to_off(output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
