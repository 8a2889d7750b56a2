//! Command implementations for the mesh statistics CLI
//!
//! Dispatches subcommands, sets up logging and prints results.

use crate::cli::args::{Commands, InspectArgs, StatsArgs};
use crate::error::Result;
use crate::inspect::{MeshInspection, inspect_mesh};
use crate::processor::MeshProcessor;
use crate::store::FsMeshStore;

use colored::*;
use tracing::debug;

/// Main command runner
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Stats(args) => run_stats(args).await,
        Commands::Inspect(args) => run_inspect(args).await,
    }
}

async fn run_stats(args: StatsArgs) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);

    let config = args.to_config();
    config.validate()?;

    let processor = MeshProcessor::new(args.base_dir, args.output_dir)?.with_config(config);
    let stats = processor.process().await?;

    if !args.quiet {
        println!(
            "\n{} {} ({} geology columns)",
            "Wrote".bright_green().bold(),
            stats.output_path.display(),
            stats.geology_columns
        );
    }

    Ok(())
}

async fn run_inspect(args: InspectArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false);

    let store = FsMeshStore::new(args.base_dir.clone())?;
    let mesh_code = args.mesh_code.clone();
    let cell = args.cell();
    let inspection =
        tokio::task::spawn_blocking(move || inspect_mesh(&store, &mesh_code, cell)).await??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print_inspection(&inspection);
    }

    Ok(())
}

fn print_inspection(inspection: &MeshInspection) {
    println!(
        "{} {}",
        "Mesh".bright_green().bold(),
        inspection.mesh_code.bright_white().bold()
    );

    let extent = &inspection.extent;
    println!(
        "  {} ({}, {}) - ({}, {})",
        "Extent:".bright_cyan(),
        extent.minx,
        extent.miny,
        extent.maxx,
        extent.maxy
    );

    println!("  {}", "Land use:".bright_cyan());
    for (name, area) in inspection.landuse.named_areas() {
        println!("    {:<20} {}", name, area);
    }

    println!("  {}", "Series:".bright_cyan());
    for (name, days) in &inspection.series_lengths {
        println!("    {:<20} {} days", name, days);
    }

    if let Some((first, last)) = inspection.series_span {
        println!("    {:<20} {} to {}", "span", first, last);
    }

    println!("  {}", "Rasters:".bright_cyan());
    for layer in &inspection.layers {
        println!(
            "    {:<20} {}x{} ({} missing)",
            layer.layer, layer.width, layer.height, layer.missing
        );
    }

    if let Some(cell) = &inspection.cell {
        let show = |value: Option<f64>| value.map_or_else(|| "missing".to_string(), |v| v.to_string());
        println!("  {} ({}, {})", "Cell".bright_cyan(), cell.row, cell.col);
        println!("    {:<20} {}", "elevation", show(cell.elevation));
        println!("    {:<20} {}", "slope", show(cell.slope));
        println!("    {:<20} {}", "direction", show(cell.direction));
        println!(
            "    {:<20} {}",
            "geology",
            cell.geology.as_deref().unwrap_or("missing")
        );
    }
}

/// Set up structured logging
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("meshstats={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
