//! # glTF Transform Module
//!
//! Questo modulo invoca il tool esterno `gltf-transform` per ottimizzare un asset.
//!
//! ## Responsabilità:
//! - Costruisce la riga di comando `optimize <input> <output> --texture-compress <fmt>`
//! - Attende l'uscita del processo (unico punto di sospensione)
//! - Converte exit code non-zero o errori di avvio in `OptimizeFailed`
//! - Rimuove l'eventuale output parziale lasciato da un'esecuzione fallita
//!
//! ## Dipendenze richieste:
//! - `npx` + pacchetto `@gltf-transform/cli`, oppure il binario `gltf-transform`
//!
//! ## Esempio:
//! ```ignore
//! let optimizer = GltfTransform::new(ToolCommand::npx(), TextureCompression::Webp);
//! optimizer.optimize(&input, &output).await?;
//! ```

use crate::config::{TextureCompression, ToolCommand};
use crate::error::OptimizeError;
use crate::platform::PlatformCommands;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs assets through gltf-transform
#[derive(Debug, Clone)]
pub struct GltfTransform {
    tool: ToolCommand,
    texture_compression: TextureCompression,
}

impl GltfTransform {
    pub fn new(tool: ToolCommand, texture_compression: TextureCompression) -> Self {
        Self {
            tool,
            texture_compression,
        }
    }

    /// Full argument list passed to the tool program
    pub fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.tool.args.iter().map(OsString::from).collect();
        args.push("optimize".into());
        args.push(input_path.as_os_str().to_owned());
        args.push(output_path.as_os_str().to_owned());
        args.push("--texture-compress".into());
        args.push(self.texture_compression.as_str().into());
        args
    }

    /// Optimize `input_path` into `output_path`
    pub async fn optimize(&self, input_path: &Path, output_path: &Path) -> Result<(), OptimizeError> {
        let program = PlatformCommands::instance().get_command(&self.tool.program);
        let args = self.build_args(input_path, output_path);

        debug!(
            "Running {} {:?} for {}",
            program,
            args,
            input_path.display()
        );
        let start_time = std::time::Instant::now();

        // kill_on_drop: a timed-out pipeline must not leave the tool running
        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| OptimizeError::OptimizeFailed {
                path: input_path.to_path_buf(),
                diagnostics: format!("failed to launch {}: {}", program, e),
            })?;

        if !output.status.success() {
            Self::remove_partial_output(output_path).await;

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostics = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };

            return Err(OptimizeError::OptimizeFailed {
                path: input_path.to_path_buf(),
                diagnostics: format!("{} exited with {}: {}", program, output.status, diagnostics),
            });
        }

        debug!(
            "gltf-transform finished in {:.1}s for {}",
            start_time.elapsed().as_secs_f64(),
            input_path.display()
        );
        info!("Optimized {} -> {}", input_path.display(), output_path.display());

        Ok(())
    }

    /// Best-effort removal of whatever the tool left at `output_path`
    pub async fn remove_partial_output(output_path: &Path) {
        match tokio::fs::remove_file(output_path).await {
            Ok(()) => debug!("Removed partial output {}", output_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove partial output {}: {}",
                output_path.display(),
                e
            ),
        }
    }

    /// Check if the configured tool is available
    pub async fn check_dependencies(&self) -> Result<(), OptimizeError> {
        if !PlatformCommands::instance()
            .is_command_available(&self.tool.program)
            .await
        {
            return Err(OptimizeError::MissingDependency(format!(
                "{} is required to run gltf-transform (install Node.js or pass --gltf-transform)",
                self.tool.program
            )));
        }
        Ok(())
    }
}
