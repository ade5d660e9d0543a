//! # GLB Batch Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Creazione della directory di output e della configurazione
//! - Avvio del batch ed exit code non-zero se un file fallisce
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (input, output, concurrency, opzioni)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, `RUST_LOG` se presente)
//! 3. Crea la directory di output (inclusi i parent)
//! 4. Valida la configurazione e avvia `BatchOptimizer`
//!
//! ## Esempio di utilizzo:
//! ```bash
//! glb-optimizer ./models ./dist 4 --texture-compress webp --timeout 600
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glb_batch_optimizer::{BatchOptimizer, Config, TextureCompression, ToolCommand};

#[derive(Parser)]
#[command(name = "glb-optimizer", version)]
#[command(about = "Optimize GLB files with gltf-transform and gzip the results")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Directory containing .glb files to optimize (not scanned recursively)
    input_directory: PathBuf,

    /// Directory for the optimized .glb.gz files (created if missing)
    output_directory: PathBuf,

    /// Maximum number of files processed at the same time
    concurrency: i64,

    /// Texture compression format passed to gltf-transform
    #[arg(long, value_enum, default_value_t = TextureCompression::Webp)]
    texture_compress: TextureCompression,

    /// Path to a gltf-transform binary (default: run through npx)
    #[arg(long, value_name = "PATH")]
    gltf_transform: Option<String>,

    /// Per-file timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip files whose .glb.gz output already exists
    #[arg(long)]
    skip_existing: bool,

    /// Output progress and status as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            // Usage errors exit with 1, not clap's default 2
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let concurrency = usize::try_from(args.concurrency)
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Configuration error: concurrency must be a positive integer, got {}",
                args.concurrency
            )
        })?;

    if !args.input_directory.is_dir() {
        return Err(anyhow::anyhow!(
            "Input directory does not exist: {}",
            args.input_directory.display()
        ));
    }

    if !args.output_directory.exists() {
        std::fs::create_dir_all(&args.output_directory)?;
        info!("Created output directory: {}", args.output_directory.display());
    }

    let config = Config {
        input_dir: args.input_directory,
        output_dir: args.output_directory,
        concurrency,
        texture_compression: args.texture_compress,
        tool: args
            .gltf_transform
            .map(ToolCommand::direct)
            .unwrap_or_else(ToolCommand::npx),
        timeout_secs: args.timeout,
        skip_existing: args.skip_existing,
        json_output: args.json,
    };

    let optimizer = BatchOptimizer::new(config)?;
    let summary = optimizer.run().await?;

    if !summary.is_success() {
        return Err(anyhow::anyhow!(
            "{} of {} files failed",
            summary.failures.len(),
            summary.stats.files_processed
        ));
    }

    Ok(())
}
