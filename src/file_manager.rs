//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery degli asset 3D.
//!
//! ## Responsabilità:
//! - Discovery non ricorsiva dei file `.glb` in una directory
//! - Determinazione del formato supportato
//! - Creazione directory di output (inclusi i parent)
//! - Utilità per dimensioni e percentuali
//!
//! ## Formati supportati:
//! - **Asset 3D**: GLB (glTF binario)
//!
//! ## Esempio:
//! ```ignore
//! let files = FileManager::find_asset_files(Path::new("/path/to/models"))?;
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.len())
    }

    /// Find all supported assets directly inside a directory, sorted by path
    pub fn find_asset_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                anyhow::anyhow!("Failed to read directory {}: {}", input_dir.display(), e)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if Self::is_supported_format(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            ext.to_string_lossy().eq_ignore_ascii_case("glb")
        } else {
            false
        }
    }

    /// Create a directory and all missing parents
    pub async fn ensure_dir(path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create directory {}: {}", path.display(), e))
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
