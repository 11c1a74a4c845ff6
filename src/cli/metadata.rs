use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use astrolabe::ops::{fits_metadata, MetadataOptions};
use astrolabe::utils::{is_fits_file, load_keyfile};

/// Extract and print normalized metadata as JSON, one document per file
pub fn run(images_path: PathBuf, keyfile: Option<PathBuf>, ignore_keys: Vec<String>) -> Result<()> {
    if !images_path.exists() {
        anyhow::bail!(
            "Specified images path '{}' not found or is not readable",
            images_path.display()
        );
    }

    let options = MetadataOptions {
        keys_subset: load_subset(keyfile.as_deref())?,
        ignore_keys: if ignore_keys.is_empty() {
            None
        } else {
            Some(ignore_keys.into_iter().collect::<HashSet<String>>())
        },
    };

    if images_path.is_file() {
        print_metadata(&images_path, &options)?;
    } else {
        for file in fits_files_under(&images_path) {
            print_metadata(&file, &options)?;
        }
    }
    Ok(())
}

/// Load the keys subset from a keyfile, when one was given.
pub(super) fn load_subset(keyfile: Option<&Path>) -> Result<Option<Vec<String>>> {
    match keyfile {
        Some(path) => {
            let keys = load_keyfile(path)
                .with_context(|| format!("Failed to read keyfile {}", path.display()))?;
            Ok(Some(keys))
        }
        None => Ok(None),
    }
}

/// All FITS files under a directory, in deterministic order.
pub(super) fn fits_files_under(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_fits_file(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
        .collect()
}

fn print_metadata(path: &Path, options: &MetadataOptions) -> Result<()> {
    let metadata = fits_metadata(path, options)
        .with_context(|| format!("Failed to extract metadata from {}", path.display()))?;
    println!("{}", metadata.to_json()?);
    Ok(())
}
