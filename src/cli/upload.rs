use anyhow::{Context, Result};
use std::path::PathBuf;

use astrolabe::ops::{default_ignore_keys, MetadataOptions};
use astrolabe::store::FilesystemStore;
use astrolabe::uploader::{ensure_store_root, process_file, process_tree, UploadOptions};
use astrolabe::utils::path_has_dots;

use super::metadata::load_subset;

/// Upload FITS files and attach their normalized metadata
pub fn run(
    images_path: PathBuf,
    store_root: PathBuf,
    keyfile: Option<PathBuf>,
    upload_only: bool,
    to_path: Option<String>,
) -> Result<()> {
    if path_has_dots(&images_path) {
        anyhow::bail!("Images path argument may not contain '..' or '.'");
    }
    if !images_path.exists() {
        anyhow::bail!(
            "Specified images path '{}' not found or is not readable",
            images_path.display()
        );
    }

    let mut store = FilesystemStore::new(&store_root)
        .with_context(|| format!("Failed to open store at {}", store_root.display()))?;
    ensure_store_root(&mut store).context("Failed to create the astrolabe root collection")?;

    let options = UploadOptions {
        upload_only,
        to_path,
        metadata: MetadataOptions {
            keys_subset: load_subset(keyfile.as_deref())?,
            ignore_keys: Some(default_ignore_keys()),
        },
    };

    if images_path.is_file() {
        process_file(&mut store, &images_path, &options)
            .with_context(|| format!("Failed to upload {}", images_path.display()))?;
        println!("Uploaded 1 file");
    } else {
        let count = process_tree(&mut store, &images_path, &options)
            .with_context(|| format!("Failed to upload tree {}", images_path.display()))?;
        println!("Uploaded {count} files");
    }
    Ok(())
}
