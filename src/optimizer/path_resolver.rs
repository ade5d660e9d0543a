//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path derivati per ogni asset:
//! `<output>/<nome>_optimized.glb` e `<output>/<nome>_optimized.glb.gz`.
//! Funzione pura: nessun accesso al filesystem.

use crate::compressor::gzip_path;
use crate::error::OptimizeError;
use std::path::{Path, PathBuf};

const ASSET_EXTENSION: &str = ".glb";
const OPTIMIZED_SUFFIX: &str = "_optimized.glb";

/// Output paths derived from one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPaths {
    /// Intermediate written by gltf-transform
    pub optimized: PathBuf,
    /// Final gzip output
    pub gzipped: PathBuf,
}

impl DerivedPaths {
    pub fn resolve(input_path: &Path, output_dir: &Path) -> Result<Self, OptimizeError> {
        let file_name = input_path
            .file_name()
            .ok_or_else(|| {
                OptimizeError::Config(format!("Invalid file name: {}", input_path.display()))
            })?
            .to_string_lossy();

        let optimized = output_dir.join(format!("{}{}", Self::base_name(&file_name), OPTIMIZED_SUFFIX));
        let gzipped = gzip_path(&optimized);

        Ok(Self { optimized, gzipped })
    }

    /// File name without a trailing `.glb` (any case)
    fn base_name(file_name: &str) -> &str {
        let split = file_name.len().saturating_sub(ASSET_EXTENSION.len());
        match (file_name.get(..split), file_name.get(split..)) {
            (Some(stem), Some(ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case(ASSET_EXTENSION) => stem,
            _ => file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let paths = DerivedPaths::resolve(Path::new("models/chair.glb"), Path::new("dist")).unwrap();
        assert_eq!(paths.optimized, PathBuf::from("dist/chair_optimized.glb"));
        assert_eq!(paths.gzipped, PathBuf::from("dist/chair_optimized.glb.gz"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let input = Path::new("/data/in/table.v2.glb");
        let output = Path::new("/data/out");
        let first = DerivedPaths::resolve(input, output).unwrap();
        let second = DerivedPaths::resolve(input, output).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.optimized, PathBuf::from("/data/out/table.v2_optimized.glb"));
    }

    #[test]
    fn test_extension_case_and_edge_names() {
        let paths = DerivedPaths::resolve(Path::new("LAMP.GLB"), Path::new("out")).unwrap();
        assert_eq!(paths.optimized, PathBuf::from("out/LAMP_optimized.glb"));

        // Only a trailing extension is stripped
        let paths = DerivedPaths::resolve(Path::new("scene.gltf"), Path::new("out")).unwrap();
        assert_eq!(paths.optimized, PathBuf::from("out/scene.gltf_optimized.glb"));

        let paths = DerivedPaths::resolve(Path::new(".glb"), Path::new("out")).unwrap();
        assert_eq!(paths.optimized, PathBuf::from("out/.glb_optimized.glb"));

        assert!(DerivedPaths::resolve(Path::new("/"), Path::new("out")).is_err());
    }
}
