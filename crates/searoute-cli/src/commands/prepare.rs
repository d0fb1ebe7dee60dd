//! Prepare command handler for building the prepared graph cache.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use searoute_lib::cache::{dataset_checksum, load_prepared_edges};
use searoute_lib::dataset::parse_navigable_lines;
use searoute_lib::{prepare_edges, resolve_dataset, save_prepared_edges, RoutingGraph};

/// Arguments for the prepare command.
#[derive(Debug, Clone, Args)]
pub struct PrepareArgs {
    /// Rebuild the cache even if it is up to date.
    #[arg(long)]
    pub force: bool,
}

/// Handle the prepare subcommand.
///
/// Decomposes the dataset into two-point edges and writes the prepared graph
/// cache next to it.
pub fn handle_prepare_command(dataset: Option<&Path>, args: &PrepareArgs) -> Result<()> {
    let paths = resolve_dataset(dataset).context("failed to locate the sea route dataset")?;

    let bytes = fs::read(&paths.dataset)
        .with_context(|| format!("failed to read dataset {}", paths.dataset.display()))?;
    let checksum = dataset_checksum(&bytes);

    if !args.force {
        if let Ok(prepared) = load_prepared_edges(&paths.cache) {
            if prepared.source_checksum == checksum {
                println!(
                    "Prepared graph cache is up to date at {}\nUse --force to rebuild.",
                    paths.cache.display()
                );
                return Ok(());
            }
        }
    }

    println!("Decomposing {}...", paths.dataset.display());
    let lines = parse_navigable_lines(&bytes, &paths.dataset)
        .with_context(|| format!("failed to parse dataset {}", paths.dataset.display()))?;
    let edges = prepare_edges(&lines);
    let graph = RoutingGraph::from_edges(&edges);

    save_prepared_edges(&paths.cache, &checksum, &edges)
        .context("failed to save prepared graph cache")?;

    let file_size = fs::metadata(&paths.cache).map(|m| m.len()).unwrap_or(0);

    println!("Prepared graph cache built successfully:");
    println!("  Path: {}", paths.cache.display());
    println!("  Lines: {}", lines.len());
    println!("  Edges: {}", edges.len());
    println!("  Vertices: {}", graph.vertex_count());
    println!("  Dataset checksum: {}...", hex::encode(&checksum[..8]));
    println!("  File size: {} bytes", file_size);

    Ok(())
}
