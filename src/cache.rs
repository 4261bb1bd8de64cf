//! Content-stable cache for the `path` output kind.
//!
//! When a pipeline instance is configured to hand the application a file
//! path instead of an in-memory value, the transformed raster is persisted
//! here. The cache is **content-addressed**: the filename is derived from a
//! SHA-256 of the encoded bytes, so identical pixel content always maps to
//! the same path and repeated ingestions of the same image never duplicate
//! writes.
//!
//! Concurrent invocations may race on the same content-derived filename.
//! New files land via a temp file in the target directory followed by an
//! atomic rename, so two writers producing the same content cannot corrupt
//! each other — last rename wins with identical bytes.

use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hex digits of the content hash used in filenames. 64 bits of the digest
/// is plenty for a per-instance cache directory.
const HASH_PREFIX_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Persist a raster into `dir`, returning its content-derived path.
///
/// Same pixel content always yields the same path. If the file already
/// exists the write is skipped entirely.
pub fn put(img: &DynamicImage, dir: &Path) -> Result<PathBuf, CacheError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    let digest = format!("{:x}", Sha256::digest(&bytes));
    let path = dir.join(format!("{}.png", &digest[..HASH_PREFIX_LEN]));
    if path.exists() {
        return Ok(path);
    }

    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;
    Ok(path)
}
