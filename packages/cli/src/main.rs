#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the migration flow map planner.
//!
//! Runs one load, join, plan and render pass: both inputs are loaded
//! concurrently, joined by region name, turned into arrows by the
//! selected planner variant and written out as SVG or JSON.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use migration_map_flow::{ArrowFlowPlanner, config, registry};
use migration_map_geography::join::{join_regions, region_outlines};
use migration_map_geography::load::load_inputs;
use migration_map_geography::projection::Equirectangular;
use migration_map_render::RenderStyle;
use migration_map_render::svg::{render_arrows, render_regions};

#[derive(Parser)]
#[command(name = "migration_map", about = "Migration flow arrow planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and render the flow arrows for a boundary file and metrics file
    Plan {
        /// `GeoJSON` `FeatureCollection` of region boundaries (path or URL)
        #[arg(long)]
        geojson: String,
        /// Name-keyed migration metrics JSON (path or URL)
        #[arg(long)]
        metrics: String,
        /// Built-in planner variant (see `presets`)
        #[arg(long, default_value = "net_flow")]
        preset: String,
        /// Planner config TOML file, used instead of `--preset`
        #[arg(long, conflicts_with = "preset")]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the built-in planner variants
    Presets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// SVG region shapes, marker definitions and arrow elements
    Svg,
    /// JSON array of planned arrows
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => {
            println!("{:<16} NAME", "ID");
            println!("{}", "-".repeat(50));
            for preset in registry::all_presets() {
                println!("{:<16} {}", preset.id, preset.name);
            }
        }
        Commands::Plan {
            geojson,
            metrics,
            preset,
            config: config_path,
            format,
            output,
        } => {
            let start = Instant::now();

            let planner_config = if let Some(path) = config_path {
                log::info!("Loading planner config from {}", path.display());
                config::from_toml_str(&tokio::fs::read_to_string(&path).await?)?
            } else {
                registry::preset(&preset)?
            };
            let planner = ArrowFlowPlanner::new(planner_config)?;
            let fields = &planner.config().fields;

            let client = reqwest::Client::new();
            let inputs = load_inputs(&client, &geojson, &metrics, fields).await?;

            let projection = Equirectangular::from_config(&planner.config().projection);
            let regions = join_regions(&inputs.boundaries, &inputs.metrics, fields, &projection);
            let arrows = planner.plan(&regions)?;

            let rendered = match format {
                OutputFormat::Svg => {
                    let style = RenderStyle::default();
                    let outlines = region_outlines(&inputs.boundaries, fields, &projection);
                    render_regions(&outlines, &regions, &planner.config().hub, &style)
                        + &render_arrows(&arrows, &style)
                }
                OutputFormat::Json => serde_json::to_string_pretty(&arrows)? + "\n",
            };

            if let Some(path) = output {
                tokio::fs::write(&path, rendered).await?;
                log::info!("Wrote {} arrows to {}", arrows.len(), path.display());
            } else {
                print!("{rendered}");
            }

            log::info!(
                "Planning complete in {:.2}s",
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
