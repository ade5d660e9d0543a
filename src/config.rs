//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri del batch
//! - Valida i parametri una sola volta, all'avvio
//! - Descrive il tool esterno (`ToolCommand`) e il formato texture
//!
//! ## Parametri di configurazione:
//! - `input_dir`: Directory con i file `.glb` da elaborare
//! - `output_dir`: Directory di output (creata se assente)
//! - `concurrency`: Numero massimo di pipeline in esecuzione (>= 1, default: 4)
//! - `texture_compression`: Formato texture per gltf-transform (default: webp)
//! - `tool`: Comando per invocare gltf-transform (default: `npx gltf-transform`)
//! - `timeout_secs`: Timeout opzionale per singola pipeline
//! - `skip_existing`: Salta i file il cui `.gz` esiste già
//! - `json_output`: Eventi JSON su stdout per uso programmatico
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     input_dir: "models".into(),
//!     output_dir: "dist".into(),
//!     concurrency: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::OptimizeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Texture compression formats understood by `gltf-transform optimize`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextureCompression {
    Webp,
    Avif,
    Ktx2,
}

impl TextureCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Ktx2 => "ktx2",
        }
    }
}

impl fmt::Display for TextureCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External command used to run gltf-transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    /// Program to execute
    pub program: String,
    /// Arguments placed before the `optimize` subcommand
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Run gltf-transform through npx
    pub fn npx() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["gltf-transform".to_string()],
        }
    }

    /// Run a locally installed gltf-transform binary
    pub fn direct(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self::npx()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned (non-recursively) for `.glb` files
    pub input_dir: PathBuf,
    /// Directory receiving `<name>_optimized.glb.gz` files
    pub output_dir: PathBuf,
    /// Maximum number of pipelines in flight
    pub concurrency: usize,
    /// Texture compression passed to gltf-transform
    pub texture_compression: TextureCompression,
    /// External optimizer command
    pub tool: ToolCommand,
    /// Per-pipeline timeout in seconds (None = no timeout)
    pub timeout_secs: Option<u64>,
    /// Skip inputs whose gzip output already exists
    pub skip_existing: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("optimized"),
            concurrency: 4,
            texture_compression: TextureCompression::Webp,
            tool: ToolCommand::default(),
            timeout_secs: None,
            skip_existing: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.concurrency == 0 {
            return Err(OptimizeError::Config(
                "Concurrency must be a positive integer".to_string(),
            ));
        }

        if !self.input_dir.exists() {
            return Err(OptimizeError::Config(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }
        if !self.input_dir.is_dir() {
            return Err(OptimizeError::Config(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(OptimizeError::Config(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(OptimizeError::Config(
                "Timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.tool.program.trim().is_empty() {
            return Err(OptimizeError::Config(
                "Optimizer command must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Per-pipeline timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
