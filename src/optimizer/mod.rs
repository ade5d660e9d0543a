//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `batch_optimizer`: Orchestratore principale
//! - `scheduler`: Coda FIFO e pipeline in esecuzione a concorrenza limitata
//! - `task_pipeline`: Worker per singoli file (gltf-transform + gzip)
//! - `progress_tracker`: Gestione progress unificata
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod batch_optimizer;
pub mod path_resolver;
pub mod progress_tracker;
pub mod scheduler;
pub mod task_pipeline;

pub use batch_optimizer::{BatchOptimizer, BatchSummary};
pub use path_resolver::DerivedPaths;
pub use progress_tracker::ProgressTracker;
pub use scheduler::{BatchReport, ConcurrencyScheduler, ItemFailure, WorkItem};
pub use task_pipeline::{PipelineOutcome, ProcessedAsset, TaskPipeline};
