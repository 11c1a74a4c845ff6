use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod info;
mod metadata;
mod upload;

/// Astrolabe - FITS Metadata Extraction and Upload Tool
#[derive(Parser)]
#[command(name = "astrolabe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show HDU summary information for FITS files
    Info {
        /// FITS file or directory of FITS files
        #[arg(value_name = "IMAGES_PATH")]
        images_path: PathBuf,
    },

    /// Extract and print normalized metadata as JSON
    Metadata {
        /// FITS file or directory of FITS files
        #[arg(value_name = "IMAGES_PATH")]
        images_path: PathBuf,

        /// Text file of desired metadata keys, one per line
        #[arg(short = 'k', long, value_name = "FILE")]
        keyfile: Option<PathBuf>,

        /// Keyword to drop entirely (repeatable)
        #[arg(long = "ignore-key", value_name = "KEY")]
        ignore_keys: Vec<String>,
    },

    /// Upload FITS files and attach their normalized metadata
    Upload {
        /// FITS file or directory of FITS files
        #[arg(value_name = "IMAGES_PATH")]
        images_path: PathBuf,

        /// Base directory of the local store mirror
        #[arg(short = 's', long, value_name = "DIR")]
        store_root: PathBuf,

        /// Text file of desired metadata keys, one per line
        #[arg(short = 'k', long, value_name = "FILE")]
        keyfile: Option<PathBuf>,

        /// Upload files without extracting or attaching metadata
        #[arg(long)]
        upload_only: bool,

        /// Remote path override for a single-file upload
        #[arg(long, value_name = "PATH")]
        to_path: Option<String>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { images_path } => info::run(images_path),
        Commands::Metadata {
            images_path,
            keyfile,
            ignore_keys,
        } => metadata::run(images_path, keyfile, ignore_keys),
        Commands::Upload {
            images_path,
            store_root,
            keyfile,
            upload_only,
            to_path,
        } => upload::run(images_path, store_root, keyfile, upload_only, to_path),
    }
}
