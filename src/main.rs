use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use starwhack::catalog::{load_constellations, load_stars};
use starwhack::config::FileConfig;
use starwhack::render::{BoardConfig, write_board};
use starwhack::sky::{GridStyle, SkyStats, build_grid};
use starwhack::{Sky, StereographicProjector};

/// Project a star catalogue onto a KiCad PCB star map
///
/// Regions are defined in the config file (starwhack.toml):
///
///   [regions.orion]
///   boundary = [[70, -15], [70, 25], [100, 25], [100, -15], [70, -15]]
///   magnitudes = [-2, 5]
///
/// Examples:
///   # Orion with the default grid
///   starwhack -r orion --stars data/stars.6.json
///
///   # Add constellation lines and highlight one
///   starwhack -r orion --stars data/stars.6.json --constellations data/lines.json --target Ori
#[derive(Parser, Debug)]
#[command(name = "starwhack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches starwhack.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the region to render, as configured under [regions.<name>]
    #[arg(short = 'r', long)]
    region: String,

    /// Star catalogue JSON
    #[arg(long)]
    stars: Option<PathBuf>,

    /// Constellation lines JSON
    #[arg(long)]
    constellations: Option<PathBuf>,

    /// Line vertices per degree when densifying
    #[arg(short = 'd', long)]
    density: Option<f64>,

    /// Degrees between grid lines
    #[arg(long)]
    grid_spacing: Option<f64>,

    /// Grid style
    #[arg(long, value_enum)]
    grid_style: Option<GridStyle>,

    /// Leave out the grid
    #[arg(long)]
    no_grid: bool,

    /// Stereographic reference radius
    #[arg(long)]
    radius: Option<f64>,

    /// Board side in mm
    #[arg(short = 's', long)]
    size: Option<f64>,

    /// Constellation to draw with wider lines
    #[arg(long)]
    target: Option<String>,

    /// Output .kicad_pcb path (defaults to {region}.kicad_pcb)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => Some(FileConfig::from_path(path)?),
        None => FileConfig::load(),
    };
    let Some(file_config) = file_config else {
        bail!("No config file found; regions are defined in starwhack.toml");
    };

    let verbose = args.verbose || file_config.verbose;
    let _logger = flexi_logger::Logger::try_with_str(if verbose { "debug" } else { "info" })
        .context("Failed to configure logging")?
        .start()
        .context("Failed to start logging")?;

    let region = file_config.region(&args.region)?;
    let stars_path = args
        .stars
        .clone()
        .or_else(|| file_config.stars.clone())
        .context("No star catalogue given; use --stars or set `stars` in the config")?;
    let constellations_path = args
        .constellations
        .clone()
        .or_else(|| file_config.constellations.clone());
    let density = args.density.unwrap_or(file_config.density);
    let grid_spacing = args.grid_spacing.unwrap_or(file_config.grid_spacing);
    let grid_style = args.grid_style.unwrap_or(file_config.grid_style);
    let radius = args.radius.unwrap_or(file_config.projection_radius);
    let size = args.size.unwrap_or(file_config.board_size);
    let target = args
        .target
        .clone()
        .or_else(|| region.target_constellation.clone());
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from(format!("{}.kicad_pcb", args.region)));
    let center = region
        .center()
        .context("Region boundary is empty; cannot pick a projection centre")?;

    println!("starwhack - Star Map Generator");
    println!("==============================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Region: {}", args.region);
        println!("  Stars: {}", stars_path.display());
        if let Some(ref c) = constellations_path {
            println!("  Constellations: {}", c.display());
        }
        println!("  Density: {} nodes/degree", density);
        if args.no_grid {
            println!("  Grid: disabled");
        } else {
            println!("  Grid: {:?} every {} degrees", grid_style, grid_spacing);
        }
        println!("  Projection centre: ({:.4}, {:.4})", center.lon(), center.lat());
        println!("  Board size: {}mm", size);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Loading catalogues...")?;
    let start = Instant::now();
    let mut sky = Sky::new()
        .with_name(args.region.clone())
        .with_stars(load_stars(&stars_path)?);
    if let Some(ref path) = constellations_path {
        sky = sky.with_constellations(load_constellations(path)?);
    }
    if !args.no_grid {
        sky = sky.with_grid(build_grid(grid_spacing, grid_style).context("Invalid grid spacing")?);
    }
    let stats = SkyStats::from_sky(&sky);
    spinner.finish_with_message(format!(
        "Loaded {} stars, {} constellations [{:.1}s]",
        stats.stars,
        stats.constellations,
        start.elapsed().as_secs_f32()
    ));
    print_stats(verbose, &stats);

    let spinner = create_spinner("Filtering to region...")?;
    let start = Instant::now();
    let sky = sky.filter(region.to_filter());
    let stats = SkyStats::from_sky(&sky);
    if stats.stars == 0 {
        spinner.abandon_with_message("No stars left after filtering".to_string());
        bail!(
            "No stars left inside region '{}'. Check that its boundary is closed (first point == last point)",
            args.region
        );
    }
    spinner.finish_with_message(format!(
        "Kept {} stars, {} constellations [{:.1}s]",
        stats.stars,
        stats.constellations,
        start.elapsed().as_secs_f32()
    ));
    print_stats(verbose, &stats);

    let spinner = create_spinner("Densifying lines...")?;
    let start = Instant::now();
    let sky = sky
        .densify(density)
        .inspect_err(|_| spinner.abandon())
        .context("Failed to densify lines; lower the density")?;
    let stats = SkyStats::from_sky(&sky);
    spinner.finish_with_message(format!(
        "Densified to {} line vertices [{:.1}s]",
        stats.constellation_vertices + stats.grid_vertices + stats.boundary_vertices,
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Projecting and normalizing...")?;
    let start = Instant::now();
    let projector = StereographicProjector::new(center, radius);
    let sky = sky
        .project(&projector)
        .and_then(Sky::normalize)
        .inspect_err(|_| spinner.abandon())
        .context("Failed to project and normalize; check the projection centre")?;
    spinner.finish_with_message(format!(
        "Projected and normalized [{:.1}s]",
        start.elapsed().as_secs_f32()
    ));
    print_stats(verbose, &SkyStats::from_sky(&sky));

    let spinner = create_spinner("Writing board...")?;
    let start = Instant::now();
    let board = BoardConfig {
        size_mm: size,
        title: args.region.clone(),
        target_constellation: target,
        ..BoardConfig::default()
    };
    write_board(&output_path, &sky, &board).context("Failed to write board file")?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        output_path.display(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn print_stats(verbose: bool, stats: &SkyStats) {
    if verbose {
        for line in stats.to_string().lines() {
            println!("  {}", line);
        }
    }
}

fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(pb)
}
