//! Shared file helpers.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Buffer size for reading files during checksum computation.
const BUFFER_SIZE: usize = 65536; // 64 KB

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure an output subdirectory exists and return its path.
pub fn ensure_output_dir(base_dir: &Path, name: &str) -> Result<PathBuf> {
    let dir = base_dir.join(name);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Write a DataFrame as comma-separated text with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Compute the SHA256 hash of a file as lowercase hex.
pub fn compute_file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("read {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"hello").unwrap();
        assert_eq!(
            compute_file_sha256(&path).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha256_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(compute_file_sha256(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_ensure_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layers = ensure_output_dir(dir.path(), "layers").unwrap();
        assert!(layers.is_dir());
    }
}
