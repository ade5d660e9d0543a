//! # Progress Tracking Module
//!
//! Tracker thread-safe condiviso tra tutte le pipeline in esecuzione.
//! Gestisce sia la progress bar tradizionale che gli eventi JSON e
//! produce le statistiche finali del batch.

use crate::{
    error::OptimizeError,
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::task_pipeline::PipelineOutcome,
    progress::{BatchStats, ProgressManager},
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

/// Progress tracker shared by every pipeline of a batch
#[derive(Clone)]
pub struct ProgressTracker {
    pub total_files: usize,
    json_output: bool,
    started: Arc<Mutex<usize>>,
    stats: Arc<Mutex<BatchStats>>,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    pub fn new(total_files: usize, json_output: bool) -> Self {
        // The bar would interleave with JSON lines
        let progress_manager = if json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            json_output,
            started: Arc::new(Mutex::new(0)),
            stats: Arc::new(Mutex::new(BatchStats::new())),
            progress_manager,
        }
    }

    /// Register the start of a pipeline; returns its start index
    pub async fn handle_file_start(&self, file_path: &Path) -> usize {
        let index = {
            let mut started = self.started.lock().await;
            let index = *started;
            *started += 1;
            index
        };

        if self.json_output {
            JsonMessage::file_start(file_path.to_path_buf(), index, self.total_files).emit();
        }
        index
    }

    /// Record a finished pipeline and emit its events
    pub async fn handle_file_completion(
        &self,
        file_path: &Path,
        result: &Result<PipelineOutcome, OptimizeError>,
    ) {
        let file_name = file_path.file_name().unwrap_or_default().to_string_lossy();

        match result {
            Ok(outcome) => {
                let message = match outcome {
                    PipelineOutcome::Compressed(asset) => {
                        self.stats
                            .lock()
                            .await
                            .add_compressed(asset.original_size, asset.compressed_size);
                        format!(
                            "[OK] {}: {} -> {}",
                            file_name,
                            FileManager::format_size(asset.original_size),
                            FileManager::format_size(asset.compressed_size)
                        )
                    }
                    PipelineOutcome::Skipped { .. } => {
                        self.stats.lock().await.add_skipped();
                        format!("[SKIP] {}: output exists", file_name)
                    }
                };

                if self.json_output {
                    JsonMessage::file_complete(file_path.to_path_buf(), outcome).emit();
                }
                self.progress_manager.update(&message);
            }
            Err(e) => self.record_failure(file_path, e).await,
        }
    }

    /// Record a failed pipeline and log it right away
    pub async fn record_failure(&self, file_path: &Path, error: &OptimizeError) {
        error!(
            path = %file_path.display(),
            kind = error.kind(),
            "Failed to process {}: {}",
            file_path.display(),
            error
        );
        self.stats.lock().await.add_error();

        if self.json_output {
            JsonMessage::file_failed(file_path.to_path_buf(), error.kind(), error.to_string()).emit();
        }
        let file_name = file_path.file_name().unwrap_or_default().to_string_lossy();
        self.progress_manager
            .update(&format!("[ERROR] {}: {}", file_name, error.kind()));
    }

    /// Finalize the progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }

    pub async fn started(&self) -> usize {
        *self.started.lock().await
    }

    /// Snapshot of the statistics
    pub async fn get_stats(&self) -> BatchStats {
        self.stats.lock().await.clone()
    }
}
