//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` per categorizzare ogni errore di una pipeline
//! - Distingue l'errore di compressione da quello di pulizia del file intermedio
//! - Fornisce un tag stabile (`kind()`) per log e output JSON
//!
//! ## Categorie di errori:
//! - `Config`: argomenti o configurazione non validi
//! - `OptimizeFailed`: il tool esterno (gltf-transform) è fallito
//! - `CompressFailed`: la compressione gzip è fallita
//! - `CleanupFailed`: gzip riuscito, ma il file intermedio non è stato rimosso
//! - `TimedOut`: la pipeline ha superato il timeout configurato
//! - `MissingDependency`: tool esterno non installato
//! - `Panicked`: il task della pipeline è andato in panic
//! - `Aborted`: il task è stato cancellato dal runtime prima di produrre un risultato
//!
//! ## Esempio:
//! ```ignore
//! if concurrency == 0 {
//!     return Err(OptimizeError::Config("concurrency must be at least 1".to_string()));
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Custom error types for asset optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Optimization failed for {}: {diagnostics}", .path.display())]
    OptimizeFailed { path: PathBuf, diagnostics: String },

    #[error("Compression failed for {}: {source}", .path.display())]
    CompressFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete intermediate {}: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Processing of {} timed out after {after:?}", .path.display())]
    TimedOut { path: PathBuf, after: Duration },

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Pipeline task panicked: {0}")]
    Panicked(String),

    #[error("Pipeline task ended without a result: {0}")]
    Aborted(String),
}

impl OptimizeError {
    /// Short tag identifying the error category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::OptimizeFailed { .. } => "OptimizeFailed",
            Self::CompressFailed { .. } => "CompressFailed",
            Self::CleanupFailed { .. } => "CleanupFailed",
            Self::TimedOut { .. } => "TimedOut",
            Self::MissingDependency(_) => "MissingDependency",
            Self::Panicked(_) => "Panicked",
            Self::Aborted(_) => "Aborted",
        }
    }
}
