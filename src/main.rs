//! # Astrolabe CLI
//!
//! A command-line tool for viewing, extracting, and uploading metadata from
//! FITS astronomical image files.
//!
//! ## Usage
//!
//! ```bash
//! # HDU summary for one file or a directory tree
//! astrolabe info images/m13.fits
//!
//! # Extract normalized metadata as JSON
//! astrolabe metadata images/ --keyfile metadata-keys.txt
//!
//! # Upload files and attach metadata to a local store mirror
//! astrolabe upload images/ --store-root /srv/archive
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::init_logging(args.verbosity());
    cli::dispatch(args)
}
