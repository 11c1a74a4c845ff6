//! # Upload Orchestration
//!
//! Walks a local filesystem tree, mirrors its directory structure in the
//! remote store, and for every FITS file found uploads the file and
//! attaches its normalized metadata.
//!
//! A single bad file never aborts a tree run: the failure is logged and
//! the walk continues with the next file.

use std::path::Path;

use log::{info, warn};
use walkdir::WalkDir;

use crate::fits::FitsError;
use crate::ops::{fits_metadata, MetadataOptions};
use crate::store::{StoreClient, StoreError};
use crate::utils::is_fits_file;

/// Name of the store collection all uploads land under.
pub const ASTROLABE_ROOT_DIR: &str = "astrolabe";

/// Errors raised while uploading files and metadata
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The FITS file could not be read
    #[error(transparent)]
    Fits(#[from] FitsError),

    /// The store rejected an operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The filesystem walk failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Options for a single upload run.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Upload files without extracting or attaching metadata.
    pub upload_only: bool,
    /// Remote path override for a single-file upload; defaults to the
    /// file's basename.
    pub to_path: Option<String>,
    /// Metadata extraction options applied to each file.
    pub metadata: MetadataOptions,
}

/// Ensure the astrolabe collection exists under the store base and make it
/// the root for all subsequent operations.
pub fn ensure_store_root(store: &mut dyn StoreClient) -> Result<(), StoreError> {
    store.set_root(None)?;
    store.cd_root();
    store.mkdir(ASTROLABE_ROOT_DIR, false)?;
    store.set_root(Some(ASTROLABE_ROOT_DIR))
}

/// Upload one file and, unless `upload_only` is set, extract and attach
/// its metadata under the same remote path.
pub fn process_file(
    store: &mut dyn StoreClient,
    local_file: &Path,
    options: &UploadOptions,
) -> Result<(), UploadError> {
    let to_path = match options.to_path.as_deref() {
        Some(to_path) => to_path.to_string(),
        None => local_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    };

    info!("Uploading {} to {}", local_file.display(), to_path);
    store.put_file(local_file, &to_path)?;

    if !options.upload_only {
        let metadata = fits_metadata(local_file, &options.metadata)?;
        info!("Attaching {} metadata items to {}", metadata.len(), to_path);
        store.put_metadata(&to_path, &metadata)?;
    }
    Ok(())
}

/// Walk the local tree under `root_path`, mirror each directory in the
/// store, and process every FITS file found.
///
/// Returns the number of files successfully processed. Per-file failures
/// are logged and skipped; only store/walk failures at the directory level
/// abort the run.
pub fn process_tree(
    store: &mut dyn StoreClient,
    root_path: &Path,
    options: &UploadOptions,
) -> Result<usize, UploadError> {
    let tree_name = root_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut processed = 0;
    for entry in WalkDir::new(root_path).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root_path)
            .unwrap_or(entry.path());

        if entry.file_type().is_dir() {
            // Mirror the directory under the store root and step into it.
            let remote_dir = Path::new(&tree_name).join(relative);
            let remote_dir = remote_dir.to_string_lossy();
            store.mkdir(&remote_dir, true)?;
            store.cd(&remote_dir, true)?;
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_fits_file(&name) {
            continue;
        }

        // Re-enter the mirrored parent directory: file entries arrive
        // after their parent, but per-file cd keeps the walk order free.
        let parent = Path::new(&tree_name).join(relative.parent().unwrap_or(Path::new("")));
        store.cd(&parent.to_string_lossy(), true)?;

        let file_options = UploadOptions {
            to_path: None,
            ..options.clone()
        };
        match process_file(store, entry.path(), &file_options) {
            Ok(()) => processed += 1,
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }
    Ok(processed)
}
