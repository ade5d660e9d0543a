//! # Batch Optimizer Main Orchestrator
//!
//! Orchestratore principale: scopre i file, verifica il tool esterno,
//! affida le pipeline allo scheduler e riporta il riepilogo finale.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    json_output::JsonMessage,
    optimizer::{
        progress_tracker::ProgressTracker,
        scheduler::{ConcurrencyScheduler, ItemFailure, WorkItem},
        task_pipeline::TaskPipeline,
    },
    progress::BatchStats,
};
use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of a whole batch
#[derive(Debug)]
pub struct BatchSummary {
    pub stats: BatchStats,
    pub failures: Vec<ItemFailure>,
    pub duration: Duration,
}

impl BatchSummary {
    /// True only if every item succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestratore del batch
pub struct BatchOptimizer {
    config: Config,
    scheduler: ConcurrencyScheduler,
    pipeline: Arc<TaskPipeline>,
}

impl BatchOptimizer {
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        config.validate()?;
        let scheduler = ConcurrencyScheduler::new(config.concurrency)?;
        let pipeline = Arc::new(TaskPipeline::new(&config));

        Ok(Self {
            config,
            scheduler,
            pipeline,
        })
    }

    /// Esegue il batch
    pub async fn run(&self) -> Result<BatchSummary> {
        let start_time = Instant::now();

        FileManager::ensure_dir(&self.config.output_dir).await?;
        let files = FileManager::find_asset_files(&self.config.input_dir)?;

        self.emit_start_message(files.len());

        if files.is_empty() {
            return Ok(self.handle_empty_directory(start_time));
        }

        self.pipeline.optimizer().check_dependencies().await?;

        let tracker = ProgressTracker::new(files.len(), self.config.json_output);
        let items: Vec<WorkItem> = files.into_iter().map(WorkItem::from).collect();

        let report = self
            .scheduler
            .run(items, |item| {
                let pipeline = Arc::clone(&self.pipeline);
                let tracker = tracker.clone();
                async move {
                    tracker.handle_file_start(item.path()).await;
                    let result = pipeline.run(&item).await;
                    tracker.handle_file_completion(item.path(), &result).await;
                    result
                }
            })
            .await;

        for failure in &report.failures {
            // Only tasks that died before reaching the tracker are left to record
            if matches!(
                failure.error,
                OptimizeError::Panicked(_) | OptimizeError::Aborted(_)
            ) {
                tracker
                    .record_failure(failure.item.path(), &failure.error)
                    .await;
            }
        }

        let stats = tracker.get_stats().await;
        let duration = start_time.elapsed();
        tracker.finish(&stats.format_summary());
        self.print_final_stats(&stats, duration);

        Ok(BatchSummary {
            stats,
            failures: report.failures,
            duration,
        })
    }

    fn emit_start_message(&self, total_files: usize) {
        if self.config.json_output {
            JsonMessage::start(&self.config, total_files).emit();
            return;
        }

        info!("Starting glTF optimization in: {}", self.config.input_dir.display());
        info!("Output directory: {}", self.config.output_dir.display());
        info!(
            "Optimizer: {} (texture compression: {})",
            self.config.tool, self.config.texture_compression
        );
        info!("Concurrency: {} pipelines", self.scheduler.concurrency());
        if let Some(timeout) = self.config.timeout() {
            info!("Pipeline timeout: {:?}", timeout);
        }
        if self.config.skip_existing {
            info!("Skip mode: Will skip files where output already exists");
        }
        info!("Found {} GLB files to process", total_files);
    }

    fn handle_empty_directory(&self, start_time: Instant) -> BatchSummary {
        let stats = BatchStats::new();
        let duration = start_time.elapsed();

        if self.config.json_output {
            JsonMessage::complete(&stats, duration.as_secs_f64()).emit();
        } else {
            warn!("No GLB files found in {}", self.config.input_dir.display());
        }

        BatchSummary {
            stats,
            failures: Vec::new(),
            duration,
        }
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, stats: &BatchStats, duration: Duration) {
        if self.config.json_output {
            JsonMessage::complete(stats, duration.as_secs_f64()).emit();
            return;
        }

        info!("=== Optimization Complete ===");
        info!("Files processed: {}", stats.files_processed);
        info!("Files compressed: {}", stats.files_compressed);
        info!("Files skipped: {}", stats.files_skipped);
        info!("Errors: {}", stats.errors);
        info!(
            "Size: {} -> {} ({:.2}% smaller)",
            FileManager::format_size(stats.total_original_size),
            FileManager::format_size(stats.total_compressed_size),
            stats.overall_reduction_percent()
        );
        info!("Duration: {:.1}s", duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolCommand;
    use tempfile::TempDir;

    fn batch_config(temp_dir: &TempDir, script: &str, concurrency: usize) -> Config {
        let input_dir = temp_dir.path().join("in");
        std::fs::create_dir_all(&input_dir).unwrap();
        Config {
            input_dir,
            output_dir: temp_dir.path().join("out").join("nested"),
            concurrency,
            tool: ToolCommand {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            },
            json_output: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_concurrency_fails_fast() {
        let temp_dir = TempDir::new().unwrap();
        let config = batch_config(&temp_dir, "exit 0", 0);
        let err = BatchOptimizer::new(config).err().unwrap();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[tokio::test]
    async fn test_empty_directory_completes() {
        let temp_dir = TempDir::new().unwrap();
        // Tool is never consulted for an empty batch
        let mut config = batch_config(&temp_dir, "exit 1", 2);
        config.tool = ToolCommand::direct("definitely-not-a-real-tool-9f2c");
        let output_dir = config.output_dir.clone();

        let summary = BatchOptimizer::new(config).unwrap().run().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.stats.files_processed, 0);
        assert!(output_dir.is_dir());
    }

    #[tokio::test]
    async fn test_missing_tool_aborts_batch() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = batch_config(&temp_dir, "exit 1", 2);
        config.tool = ToolCommand::direct("definitely-not-a-real-tool-9f2c");
        std::fs::write(config.input_dir.join("a.glb"), b"glTF").unwrap();

        let result = BatchOptimizer::new(config).unwrap().run().await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_one_failure_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let script = "case \"$2\" in */bad.glb) echo 'corrupt buffer view' >&2; exit 1;; esac; cp \"$2\" \"$3\"";
        let config = batch_config(&temp_dir, script, 2);
        for name in ["a.glb", "bad.glb", "c.glb", "d.glb"] {
            std::fs::write(config.input_dir.join(name), b"glTF-binary").unwrap();
        }
        std::fs::write(config.input_dir.join("readme.txt"), b"not an asset").unwrap();
        let output_dir = config.output_dir.clone();

        let summary = BatchOptimizer::new(config).unwrap().run().await.unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.stats.files_processed, 4);
        assert_eq!(summary.stats.files_compressed, 3);
        assert_eq!(summary.stats.errors, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].item.path().ends_with("bad.glb"));
        assert_eq!(summary.failures[0].error.kind(), "OptimizeFailed");

        for name in ["a", "c", "d"] {
            assert!(output_dir.join(format!("{}_optimized.glb.gz", name)).exists());
            assert!(!output_dir.join(format!("{}_optimized.glb", name)).exists());
        }
        assert!(!output_dir.join("bad_optimized.glb.gz").exists());
        assert!(!output_dir.join("readme_optimized.glb.gz").exists());
    }
}
