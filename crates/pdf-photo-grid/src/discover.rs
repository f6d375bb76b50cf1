//! Source file discovery

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::types::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check whether a path has a supported image extension (case-insensitive)
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Recursively collect supported image files under `root`, sorted by full path.
///
/// Only regular files (or links to them) are candidates. Entries that cannot
/// be read are logged and skipped; the rest of the tree is still scanned.
pub async fn find_images(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref().to_owned();

    if !tokio::fs::metadata(&root)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        return Err(PhotoGridError::DirectoryNotFound(root));
    }

    let images = tokio::task::spawn_blocking(move || walk_images(&root)).await?;
    log::debug!("Discovered {} image file(s)", images.len());

    Ok(images)
}

fn walk_images(root: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_supported_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    // Whole-path string order, not component order
    images.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    images
}
