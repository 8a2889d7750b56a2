//! Main processing engine with modular architecture.
//!
//! Orchestrates a bundle run: mesh discovery, per-mesh statistics on a
//! bounded pool of blocking workers, and the final TSV export.

pub mod discovery;
pub mod record;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::MeshDiscovery,
    record::build_record,
    writer::{ExportSchema, TsvWriter},
};

use crate::config::StatsConfig;
use crate::constants::OUTPUT_FILE_NAME;
use crate::error::{MeshStatsError, Result};
use crate::geology::GeologyLookup;
use crate::models::{MeshRecord, ProcessingStats};
use crate::stats::MonthlyAggregator;
use crate::store::{FsMeshStore, MeshSource};

use colored::*;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info};

/// Main processor for mesh bundles
pub struct MeshProcessor {
    root: PathBuf,
    output_path: PathBuf,
    config: StatsConfig,
    source: Arc<dyn MeshSource>,
    discovery: MeshDiscovery,
}

impl std::fmt::Debug for MeshProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshProcessor")
            .field("root", &self.root)
            .field("output_path", &self.output_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MeshProcessor {
    /// Create a processor reading `root` and writing `<output_dir>/mesh_stats.tsv`
    pub fn new(root: PathBuf, output_dir: PathBuf) -> Result<Self> {
        let store = FsMeshStore::new(root.clone())?;

        Ok(Self {
            discovery: MeshDiscovery::new(root.clone()),
            root,
            output_path: output_dir.join(OUTPUT_FILE_NAME),
            config: StatsConfig::default(),
            source: Arc::new(store),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: StatsConfig) -> Self {
        self.config = config;
        self
    }

    /// Read meshes through another source; discovery still lists the root
    pub fn with_source(mut self, source: Arc<dyn MeshSource>) -> Self {
        self.source = source;
        self
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        if self.config.show_progress {
            println!("{}", "Starting mesh statistics".bright_green().bold());
            println!("  {} {}", "Bundle:".bright_cyan(), self.root.display());
            println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());
            println!(
                "  {} {}-{} ({:?} calendar)",
                "Years:".bright_cyan(),
                self.config.start_year,
                self.config.end_year,
                self.config.calendar
            );
        }

        // Step 1: Discover meshes
        let mesh_codes = self.discovery.discover_mesh_codes().await?;
        if self.config.show_progress {
            println!(
                "\n{} {} meshes",
                "Found".bright_green(),
                mesh_codes.len().to_string().bright_white().bold()
            );
        }

        // Step 2: Fix the geology columns before any mesh is processed
        let source = Arc::clone(&self.source);
        let lookup = task::spawn_blocking(move || source.geology_lookup()).await??;
        let schema = ExportSchema::new(lookup.category_codes())
            .with_extent(self.config.include_extent)
            .with_landuse(self.config.include_landuse);
        if self.config.show_progress {
            println!(
                "  {} {} geology categories",
                "Schema:".bright_cyan(),
                schema.geology_codes.len()
            );
        }

        // Step 3: Per-mesh statistics
        let records = self.process_meshes(&mesh_codes, Arc::new(lookup)).await?;

        // Step 4: Export
        let writer = TsvWriter::new(self.output_path.clone(), schema);
        let geology_columns = writer.schema().geology_codes.len();
        let rows = task::spawn_blocking(move || writer.write_records(&records)).await??;

        let total_time = start_time.elapsed().as_millis();
        if self.config.show_progress {
            println!("\n{}", "Processing Summary".bright_green().bold());
            println!(
                "  {} {}ms",
                "Time elapsed:".bright_cyan(),
                total_time.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "Meshes processed:".bright_cyan(),
                rows.to_string().bright_white().bold()
            );
        }
        info!("Wrote {} mesh rows to {}", rows, self.output_path.display());

        Ok(ProcessingStats {
            meshes_processed: rows,
            geology_columns,
            output_path: self.output_path.clone(),
            processing_time_ms: total_time,
        })
    }

    /// Build records for `mesh_codes` concurrently, returned sorted by mesh code.
    ///
    /// The first failing mesh aborts the whole batch.
    pub async fn process_meshes(
        &self,
        mesh_codes: &[String],
        lookup: Arc<GeologyLookup>,
    ) -> Result<Vec<MeshRecord>> {
        let aggregator = MonthlyAggregator::from_config(&self.config)?;
        let concurrent_limit = self.config.workers.clamp(1, mesh_codes.len().max(1));
        debug!(
            "Processing {} meshes with {} workers",
            mesh_codes.len(),
            concurrent_limit
        );

        let pb = self.progress_bar(mesh_codes.len() as u64);

        let result = stream::iter(mesh_codes.iter().cloned())
            .map(|mesh_code| {
                let source = Arc::clone(&self.source);
                let lookup = Arc::clone(&lookup);
                let pb = pb.clone();
                async move {
                    let record = task::spawn_blocking(move || {
                        build_record(source.as_ref(), &mesh_code, &lookup, &aggregator)
                    })
                    .await??;
                    pb.inc(1);
                    Ok::<_, MeshStatsError>(record)
                }
            })
            .buffer_unordered(concurrent_limit)
            .try_collect::<Vec<_>>()
            .await;

        let mut records = match result {
            Ok(records) => {
                pb.finish_with_message("Processing complete");
                records
            }
            Err(e) => {
                pb.abandon_with_message("Processing failed");
                return Err(e);
            }
        };

        records.sort_by(|a, b| a.mesh_code.cmp(&b.mesh_code));
        Ok(records)
    }

    /// Mesh progress bar, hidden when progress output is off
    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Processing meshes");
        pb
    }
}
