//! # Task Pipeline Module
//!
//! Pipeline per un singolo file: gltf-transform, poi gzip e rimozione
//! del file intermedio. Separata dallo scheduler per maggiore modularità.

use crate::{
    compressor,
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    gltf_transform::GltfTransform,
    optimizer::{path_resolver::DerivedPaths, scheduler::WorkItem},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Sizes recorded for a fully processed asset
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedAsset {
    pub input: PathBuf,
    pub gzipped_file: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction_percent: f64,
}

impl ProcessedAsset {
    pub fn new(input: PathBuf, gzipped_file: PathBuf, original_size: u64, compressed_size: u64) -> Self {
        Self {
            input,
            gzipped_file,
            original_size,
            compressed_size,
            reduction_percent: FileManager::calculate_reduction(original_size, compressed_size),
        }
    }
}

/// How a successful pipeline ended
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Compressed(ProcessedAsset),
    /// Output already present and `skip_existing` is set
    Skipped { gzipped_file: PathBuf },
}

/// Optimize-then-compress worker for single files
#[derive(Debug, Clone)]
pub struct TaskPipeline {
    optimizer: GltfTransform,
    output_dir: PathBuf,
    skip_existing: bool,
    timeout: Option<Duration>,
}

impl TaskPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            optimizer: GltfTransform::new(config.tool.clone(), config.texture_compression),
            output_dir: config.output_dir.clone(),
            skip_existing: config.skip_existing,
            timeout: config.timeout(),
        }
    }

    pub fn optimizer(&self) -> &GltfTransform {
        &self.optimizer
    }

    /// Process one item; the configured timeout bounds the optimize stage
    pub async fn run(&self, item: &WorkItem) -> Result<PipelineOutcome, OptimizeError> {
        let input = item.path();
        let paths = DerivedPaths::resolve(input, &self.output_dir)?;

        if self.skip_existing && tokio::fs::try_exists(&paths.gzipped).await.unwrap_or(false) {
            debug!(
                "[SKIP] Output already exists: {} -> {}",
                input.display(),
                paths.gzipped.display()
            );
            return Ok(PipelineOutcome::Skipped {
                gzipped_file: paths.gzipped,
            });
        }

        let original_size = FileManager::file_size(input).await.unwrap_or(0);

        // A failed optimization never reaches the compressor
        self.optimize_within_limit(input, &paths.optimized).await?;
        let compressed_size = compressor::gzip_and_remove(&paths.optimized, &paths.gzipped).await?;

        Ok(PipelineOutcome::Compressed(ProcessedAsset::new(
            input.to_path_buf(),
            paths.gzipped,
            original_size,
            compressed_size,
        )))
    }

    /// Compression is never interrupted: once it starts the intermediate
    /// either becomes a complete gzip or stays on disk.
    async fn optimize_within_limit(&self, input: &Path, output: &Path) -> Result<(), OptimizeError> {
        let Some(limit) = self.timeout else {
            return self.optimizer.optimize(input, output).await;
        };

        match tokio::time::timeout(limit, self.optimizer.optimize(input, output)).await {
            Ok(result) => result,
            Err(_) => {
                // The tool was killed when its future was dropped
                GltfTransform::remove_partial_output(output).await;
                Err(OptimizeError::TimedOut {
                    path: input.to_path_buf(),
                    after: limit,
                })
            }
        }
    }
}
