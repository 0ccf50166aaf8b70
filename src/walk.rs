//! Filesystem traversal feeding the file manifest.
//!
//! Walks a directory tree and hands every regular, readable file to the
//! manifest as a `(relative path, size)` pair. Paths are relative to the
//! walk root with `/` separating components — there is never a leading
//! `./`. Ordering is not this module's concern: the manifest sorts on
//! insertion, so directory enumeration order does not matter.
//!
//! Per-file problems are soft: an unreadable file, an unreadable nested
//! directory, or a file name that is not valid UTF-8 logs a warning and is
//! skipped, and the walk continues. Only a failure to read the root
//! directory itself aborts the walk.

use std::fs::File;
use std::path::Path;

use tracing::{debug, warn};

use crate::metainfo::{FileManifest, MetainfoError};

/// Builds the manifest for a directory target.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use mktor::walk::scan_tree;
///
/// # fn main() -> Result<(), mktor::metainfo::MetainfoError> {
/// let manifest = scan_tree(Path::new("my-release"))?;
/// println!("{} files, {} bytes", manifest.len(), manifest.total_size());
/// # Ok(())
/// # }
/// ```
pub fn scan_tree(root: &Path) -> Result<FileManifest, MetainfoError> {
    let mut manifest = FileManifest::new();
    // an unreadable root is fatal, unlike nested directories
    let entries = std::fs::read_dir(root)?;
    scan_entries(entries, "", &mut manifest);
    Ok(manifest)
}

fn scan_entries(entries: std::fs::ReadDir, prefix: &str, manifest: &mut FileManifest) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("cannot read directory entry under '{}': {}, skipping", prefix, err);
                continue;
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("file name {:?} is not valid UTF-8, skipping", raw);
                continue;
            }
        };
        let rel_path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        // follows symlinks, like the stat the original traversal used
        let meta = match std::fs::metadata(entry.path()) {
            Ok(meta) => meta,
            Err(err) => {
                warn!("cannot stat '{}': {}, skipping", rel_path, err);
                continue;
            }
        };

        if meta.is_dir() {
            match std::fs::read_dir(entry.path()) {
                Ok(nested) => scan_entries(nested, &rel_path, manifest),
                Err(err) => warn!("cannot read '{}': {}, skipping", rel_path, err),
            }
        } else if meta.is_file() {
            // probe readability now so hashing doesn't fail halfway through
            if let Err(err) = File::open(entry.path()) {
                warn!("cannot read '{}': {}, skipping", rel_path, err);
                continue;
            }
            debug!("adding {}", rel_path);
            manifest.add(rel_path, meta.len());
        }
        // anything else (sockets, fifos, ...) is silently irrelevant
    }
}
