//! # Per-File Operations
//!
//! Combines the FITS reader, the extractor, and the normalizer into the
//! operations the CLI and the uploader run once per file: full metadata
//! extraction and the HDU summary report.

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use crate::extract::HeaderExtractor;
use crate::fits::{FitsError, FitsFile};
use crate::metadata::MetadataSet;
use crate::normalize::normalize;

/// Keywords ignored by default when extracting for upload: commentary
/// cards carry no queryable value.
pub fn default_ignore_keys() -> HashSet<String> {
    ["COMMENT".to_string(), "HISTORY".to_string()]
        .into_iter()
        .collect()
}

/// Options controlling metadata extraction for one file.
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Restrict final output to these keywords (both rule passes still run
    /// first, and derived keywords join the subset).
    pub keys_subset: Option<Vec<String>>,
    /// Keywords to drop entirely at extraction time.
    pub ignore_keys: Option<HashSet<String>>,
}

/// Extract and normalize the metadata for one FITS file.
///
/// The file is opened, read, and closed inside this call; a missing or
/// unreadable file surfaces as a [`FitsError`] before any metadata exists.
pub fn fits_metadata(path: &Path, options: &MetadataOptions) -> Result<MetadataSet, FitsError> {
    let fits = FitsFile::open(path)?;
    debug!(
        "{}: {} primary header cards, {} HDUs",
        path.display(),
        fits.cards().len(),
        fits.hdus().len()
    );

    let mut extractor = HeaderExtractor::new();
    if let Some(ignore) = options.ignore_keys.as_ref() {
        extractor = extractor.with_ignore_keys(ignore);
    }
    let metadata = extractor.extract(fits.cards(), path);

    // The subset is mutated per file as rules derive new keys, so each
    // call works on its own copy.
    Ok(normalize(metadata, options.keys_subset.clone()))
}

/// Return a formatted HDU summary report for one FITS file, one line per
/// HDU plus a two-line heading.
pub fn hdu_info_report(path: &Path) -> Result<Vec<String>, FitsError> {
    let fits = FitsFile::open(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut report = vec![
        format!("Filename: {filename}"),
        "No.  Name        Type        Cards   Dimensions   Format".to_string(),
    ];
    report.extend(fits.hdus().iter().map(|hdu| hdu.to_string()));
    Ok(report)
}
