//! # GLB Batch Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore per ogni fase della pipeline
//! - `file_manager`: Discovery dei file `.glb` e utilità sui file
//! - `platform`: Nomi dei comandi e verifica dei tool esterni
//! - `gltf_transform`: Invocazione di `gltf-transform optimize`
//! - `compressor`: Compressione gzip e rimozione del file intermedio
//! - `optimizer`: Scheduler a concorrenza limitata e orchestratore
//! - `progress` / `json_output`: Progress bar, statistiche ed eventi JSON
//!
//! ## Utilizzo:
//! ```ignore
//! use glb_batch_optimizer::{BatchOptimizer, Config};
//!
//! let config = Config { input_dir: "models".into(), output_dir: "dist".into(), ..Default::default() };
//! let summary = BatchOptimizer::new(config)?.run().await?;
//! ```

pub mod compressor;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod gltf_transform;
pub mod json_output;
pub mod optimizer;
pub mod platform;
pub mod progress;

pub use config::{Config, TextureCompression, ToolCommand};
pub use error::OptimizeError;
pub use optimizer::{BatchOptimizer, BatchSummary, ConcurrencyScheduler, TaskPipeline, WorkItem};
