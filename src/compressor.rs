//! # Compressor Module
//!
//! Comprime il file ottimizzato in gzip e rimuove il file intermedio.
//!
//! ## Ordine delle operazioni:
//! 1. Stream del sorgente attraverso `GzEncoder` in un file temporaneo accanto alla destinazione
//! 2. `finish()` dell'encoder, `sync_all()` e rename atomico sulla destinazione
//! 3. Solo allora rimozione del sorgente
//!
//! La destinazione contiene sempre un gzip completo oppure nulla: se la
//! compressione fallisce il file temporaneo viene eliminato e il sorgente
//! resta su disco per ispezione. Se fallisce la sola rimozione del sorgente
//! l'errore è `CleanupFailed` e il gzip prodotto è valido.

use crate::error::OptimizeError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Gzip `source` into `destination`, then delete `source`.
///
/// Returns the size of the compressed file in bytes.
pub async fn gzip_and_remove(source: &Path, destination: &Path) -> Result<u64, OptimizeError> {
    let compressed_size = compress(source, destination).await?;
    remove_source(source).await?;

    info!(
        "Compressed and deleted {} -> {}",
        source.display(),
        destination.display()
    );
    Ok(compressed_size)
}

/// Gzip `source` into `destination`, leaving `source` in place
pub async fn compress(source: &Path, destination: &Path) -> Result<u64, OptimizeError> {
    let src = source.to_path_buf();
    let dst = destination.to_path_buf();

    // Compression is CPU bound, keep it off the async workers
    let compressed = tokio::task::spawn_blocking(move || gzip_file(&src, &dst))
        .await
        .map_err(|e| OptimizeError::CompressFailed {
            path: source.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, e),
        })?;

    compressed.map_err(|e| {
        warn!(
            "Keeping intermediate {} after failed compression",
            source.display()
        );
        OptimizeError::CompressFailed {
            path: source.to_path_buf(),
            source: e,
        }
    })
}

/// Delete the intermediate once its gzip is on disk
pub async fn remove_source(source: &Path) -> Result<(), OptimizeError> {
    tokio::fs::remove_file(source)
        .await
        .map_err(|e| OptimizeError::CleanupFailed {
            path: source.to_path_buf(),
            source: e,
        })
}

/// Blocking gzip of a whole file.
///
/// Data goes to a temporary sibling that is synced and then renamed over
/// `destination`; on error the temporary file is dropped and removed.
fn gzip_file(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut reader = BufReader::new(File::open(source)?);

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = NamedTempFile::new_in(dir)?;

    {
        let writer = BufWriter::new(staging.as_file_mut());
        let mut encoder = GzEncoder::new(writer, Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
    }
    staging.as_file().sync_all()?;
    let size = staging.as_file().metadata()?.len();

    staging.persist(destination).map_err(|e| e.error)?;
    Ok(size)
}

/// Gzip path for a file: `<path>.gz`
pub fn gzip_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn gunzip(path: &Path) -> Vec<u8> {
        let mut decoder = GzDecoder::new(File::open(path).unwrap());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[tokio::test]
    async fn test_gzip_round_trip_and_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a_optimized.glb");
        let destination = gzip_path(&source);

        let content: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
        std::fs::write(&source, &content).unwrap();

        let size = gzip_and_remove(&source, &destination).await.unwrap();

        assert!(!source.exists());
        assert!(destination.exists());
        assert_eq!(size, std::fs::metadata(&destination).unwrap().len());
        assert_eq!(gunzip(&destination), content);
    }

    #[tokio::test]
    async fn test_empty_file_compresses() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("empty_optimized.glb");
        let destination = gzip_path(&source);
        std::fs::write(&source, b"").unwrap();

        gzip_and_remove(&source, &destination).await.unwrap();
        assert!(gunzip(&destination).is_empty());
    }

    #[tokio::test]
    async fn test_compress_failure_keeps_intermediate() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a_optimized.glb");
        std::fs::write(&source, b"glTF-binary").unwrap();

        // A directory in place of the destination makes File::create fail
        let destination = temp_dir.path().join("blocked.gz");
        std::fs::create_dir(&destination).unwrap();

        let err = gzip_and_remove(&source, &destination).await.unwrap_err();
        assert_eq!(err.kind(), "CompressFailed");
        assert!(source.exists());
        assert!(destination.is_dir());
    }

    #[tokio::test]
    async fn test_missing_source_is_compress_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.glb");
        let destination = gzip_path(&source);

        let err = gzip_and_remove(&source, &destination).await.unwrap_err();
        assert_eq!(err.kind(), "CompressFailed");
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_compress_failure_leaves_no_staging_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a_optimized.glb");
        std::fs::write(&source, b"glTF-binary").unwrap();
        let destination = temp_dir.path().join("blocked.gz");
        std::fs::create_dir(&destination).unwrap();

        gzip_and_remove(&source, &destination).await.unwrap_err();

        let mut names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a_optimized.glb", "blocked.gz"]);
    }

    #[tokio::test]
    async fn test_cleanup_failure_keeps_valid_gzip() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a_optimized.glb");
        let destination = gzip_path(&source);
        std::fs::write(&source, b"glTF-binary").unwrap();

        compress(&source, &destination).await.unwrap();
        // Intermediate vanished before the cleanup step
        std::fs::remove_file(&source).unwrap();

        let err = remove_source(&source).await.unwrap_err();
        assert_eq!(err.kind(), "CleanupFailed");
        assert!(err.to_string().contains("a_optimized.glb"));
        assert_eq!(gunzip(&destination), b"glTF-binary");
    }

    #[test]
    fn test_gzip_path() {
        assert_eq!(
            gzip_path(Path::new("out/a_optimized.glb")),
            PathBuf::from("out/a_optimized.glb.gz")
        );
    }
}
