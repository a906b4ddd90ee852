use crate::error::RemovalError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::naming::has_png_suffix;

/// How far and where to look for input images
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Directory never descended into, typically the output directory
    pub exclude: Option<PathBuf>,
}

/// Absolute form of `path` without resolving symlinks or requiring it to exist
pub fn absolute_lexical(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lazily list `.png` files (any case) under `root`, sorted by file name.
///
/// Unreadable entries are logged and skipped rather than ending the walk.
pub fn discover_pngs(
    root: &Path,
    options: &DiscoveryOptions,
) -> Result<impl Iterator<Item = PathBuf>, RemovalError> {
    if !root.is_dir() {
        return Err(RemovalError::Discovery(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    // Compared lexically: the excluded directory may not exist until the
    // walk is already under way
    let excluded = options.exclude.as_deref().map(absolute_lexical);

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| match &excluded {
            // The root itself is always walked, even when it is the output
            Some(excluded) if entry.depth() > 0 && entry.file_type().is_dir() => {
                absolute_lexical(entry.path()) != *excluded
            }
            _ => true,
        });

    Ok(walker.filter_map(|entry| match entry {
        Ok(entry) => {
            let is_png = entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(has_png_suffix);
            is_png.then(|| entry.into_path())
        }
        Err(e) => {
            tracing::warn!("Skipping unreadable entry: {}", e);
            None
        }
    }))
}
