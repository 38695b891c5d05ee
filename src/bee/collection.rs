//! Packing a local directory into the tar stream the node expects for a
//! collection upload.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tar::{Builder, HeaderMode};
use walkdir::WalkDir;

use crate::core::Result;

/// A file that goes into the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    /// Location on disk
    pub source: PathBuf,
    /// `/`-separated path inside the collection
    pub path: String,
}

/// List the regular files below `dir`, sorted by name within each directory.
pub fn collect_files(dir: &Path) -> Result<Vec<CollectionEntry>> {
    let metadata = std::fs::metadata(dir)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", dir.display(), e)))?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", dir.display()),
        )
        .into());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        entries.push(CollectionEntry {
            source: entry.path().to_path_buf(),
            path,
        });
    }

    Ok(entries)
}

/// Build an in-memory tar archive of every file below `dir`.
pub fn pack_directory(dir: &Path) -> Result<Bytes> {
    let entries = collect_files(dir)?;
    if entries.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no files found in {}", dir.display()),
        )
        .into());
    }

    let mut builder = Builder::new(Vec::new());
    builder.mode(HeaderMode::Deterministic);

    for entry in &entries {
        tracing::debug!(path = %entry.path, "adding file to collection");
        builder.append_path_with_name(&entry.source, &entry.path)?;
    }

    Ok(Bytes::from(builder.into_inner()?))
}
