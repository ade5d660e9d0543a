//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per evento su
//! stdout) per chi integra l'ottimizzatore in altri processi.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch
//! - `file_start`: Inizio della pipeline di un file
//! - `file_complete`: Fine della pipeline di un file (successo, skip o errore)
//! - `complete`: Fine del batch con statistiche finali

use crate::optimizer::task_pipeline::PipelineOutcome;
use crate::progress::BatchStats;
use crate::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    #[serde(rename = "file_start")]
    FileStart {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        gzipped_file: Option<PathBuf>,
        original_size: u64,
        compressed_size: u64,
        reduction_percent: f64,
        skipped: bool,
        error_kind: Option<String>,
        error: Option<String>,
    },

    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_compressed: usize,
        files_skipped: usize,
        errors: usize,
        total_bytes_saved: u64,
        average_reduction: f64,
        duration_seconds: f64,
    },
}

/// Configurazione riportata nel messaggio `start`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonConfig {
    pub concurrency: usize,
    pub texture_compression: String,
    pub tool: String,
    pub timeout_secs: Option<u64>,
    pub skip_existing: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(config: &Config, total_files: usize) -> Self {
        Self::Start {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
            total_files,
            config: JsonConfig::from(config),
        }
    }

    pub fn file_start(path: PathBuf, index: usize, total: usize) -> Self {
        Self::FileStart { path, index, total }
    }

    /// Messaggio di completamento per una pipeline riuscita
    pub fn file_complete(path: PathBuf, outcome: &PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Compressed(asset) => Self::FileComplete {
                path,
                gzipped_file: Some(asset.gzipped_file.clone()),
                original_size: asset.original_size,
                compressed_size: asset.compressed_size,
                reduction_percent: asset.reduction_percent,
                skipped: false,
                error_kind: None,
                error: None,
            },
            PipelineOutcome::Skipped { gzipped_file } => Self::FileComplete {
                path,
                gzipped_file: Some(gzipped_file.clone()),
                original_size: 0,
                compressed_size: 0,
                reduction_percent: 0.0,
                skipped: true,
                error_kind: None,
                error: None,
            },
        }
    }

    /// Messaggio di completamento per una pipeline fallita
    pub fn file_failed(path: PathBuf, error_kind: &str, error: String) -> Self {
        Self::FileComplete {
            path,
            gzipped_file: None,
            original_size: 0,
            compressed_size: 0,
            reduction_percent: 0.0,
            skipped: false,
            error_kind: Some(error_kind.to_string()),
            error: Some(error),
        }
    }

    pub fn complete(stats: &BatchStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_compressed: stats.files_compressed,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            total_bytes_saved: stats.bytes_saved(),
            average_reduction: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency,
            texture_compression: config.texture_compression.to_string(),
            tool: config.tool.to_string(),
            timeout_secs: config.timeout_secs,
            skip_existing: config.skip_existing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::task_pipeline::ProcessedAsset;

    #[test]
    fn test_message_tags() {
        let msg = JsonMessage::file_start(PathBuf::from("a.glb"), 0, 2);
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "file_start");
        assert_eq!(json["total"], 2);

        let msg = JsonMessage::start(&Config::default(), 3);
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "start");
        assert_eq!(json["config"]["texture_compression"], "webp");
        assert_eq!(json["config"]["tool"], "npx gltf-transform");
    }

    #[test]
    fn test_file_complete_variants() {
        let asset = ProcessedAsset::new(
            PathBuf::from("a.glb"),
            PathBuf::from("out/a_optimized.glb.gz"),
            400,
            100,
        );
        let msg = JsonMessage::file_complete(PathBuf::from("a.glb"), &PipelineOutcome::Compressed(asset));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "file_complete");
        assert_eq!(json["reduction_percent"], 75.0);
        assert_eq!(json["error"], serde_json::Value::Null);

        let msg = JsonMessage::file_failed(PathBuf::from("b.glb"), "OptimizeFailed", "exit 1".into());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["error_kind"], "OptimizeFailed");
        assert_eq!(json["skipped"], false);
    }
}
