//! # Astrolabe - FITS Metadata Extraction and Upload
//!
//! `astrolabe` extracts header metadata from FITS astronomical image files,
//! normalizes it against a small controlled vocabulary of alternate and
//! interpreted keywords, and uploads files plus their normalized metadata to
//! a collection-oriented remote store.
//!
//! ## Pipeline
//!
//! 1. [`fits`] opens a FITS file (plain or gzipped) and reads the primary
//!    header as an ordered sequence of keyword/value cards, plus a summary
//!    of every HDU in the file.
//! 2. [`extract`] cleans each card and builds a [`metadata::MetadataSet`],
//!    appending the reserved `filepath` entry.
//! 3. [`normalize`] duplicates items under friendlier alternate keywords
//!    (e.g. `OBJECT` -> `obs_title`) and derives `right_ascension` /
//!    `declination` entries from `CTYPE*`/`CRVAL*` pairs, then applies an
//!    optional caller-supplied keys subset.
//! 4. [`uploader`] walks a local tree, mirrors it in the remote store, and
//!    attaches the final metadata to each uploaded file via a
//!    [`store::StoreClient`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use astrolabe::ops::{fits_metadata, MetadataOptions};
//!
//! let metadata = fits_metadata(Path::new("m13.fits"), &MetadataOptions::default())?;
//! for item in metadata.iter() {
//!     println!("{} = {}", item.keyword, item.value);
//! }
//! # Ok::<(), astrolabe::fits::FitsError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`]: ordered, duplicate-tolerant keyword/value container
//! - [`fits`]: pure-Rust FITS primary-header reader and HDU summaries
//! - [`extract`]: header-to-metadata extraction with field cleaning
//! - [`normalize`]: alternate-key and coordinate-interpretation rules
//! - [`ops`]: per-file operations combining the above
//! - [`store`]: remote store contract and local realizations
//! - [`uploader`]: tree walking and upload orchestration

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod extract;
pub mod fits;
pub mod metadata;
pub mod normalize;
pub mod ops;
pub mod store;
pub mod uploader;
pub mod utils;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::extract::{default_cleaner, HeaderExtractor, FILEPATH_KEY};
    pub use crate::fits::{FitsError, FitsFile, HduInfo, HeaderValue};
    pub use crate::metadata::{MetadataError, MetadataSet, Metadatum};
    pub use crate::normalize::{alternate_key, coordinate_value_key, normalize};
    pub use crate::ops::{default_ignore_keys, fits_metadata, hdu_info_report, MetadataOptions};
    pub use crate::store::{FilesystemStore, MemoryStore, StoreClient, StoreError};
    pub use crate::uploader::{ensure_store_root, process_file, process_tree, UploadOptions};
}
