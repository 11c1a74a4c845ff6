use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use astrolabe::ops::hdu_info_report;

use super::metadata::fits_files_under;

/// Show HDU summary information for one file or a directory tree
pub fn run(images_path: PathBuf) -> Result<()> {
    if !images_path.exists() {
        anyhow::bail!(
            "Specified images path '{}' not found or is not readable",
            images_path.display()
        );
    }

    if images_path.is_file() {
        print_report(&images_path)?;
    } else {
        for file in fits_files_under(&images_path) {
            print_report(&file)?;
            println!();
        }
    }
    Ok(())
}

fn print_report(path: &Path) -> Result<()> {
    let report = hdu_info_report(path)
        .with_context(|| format!("Failed to read HDU info from {}", path.display()))?;
    for line in report {
        println!("{line}");
    }
    Ok(())
}
