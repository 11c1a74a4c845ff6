//! General utility helpers shared across the crate.

use std::fs;
use std::path::{Component, Path};

use crate::metadata::MetadataError;

/// True when the file name looks like a FITS file (`*.fits` or
/// `*.fits.gz`).
pub fn is_fits_file(name: &str) -> bool {
    name.ends_with(".fits") || name.ends_with(".fits.gz")
}

/// True when the path contains a `.` or `..` component (or is itself `.`).
///
/// Such paths are rejected before uploading so the remote mirror of the
/// local tree cannot be steered outside the store root.
pub fn path_has_dots(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
}

/// Load a keys-subset file: one metadata keyword per line.
pub fn load_keyfile(path: &Path) -> Result<Vec<String>, MetadataError> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_is_fits_file() {
        assert!(is_fits_file("m13.fits"));
        assert!(is_fits_file("m13.fits.gz"));
        assert!(!is_fits_file("m13.fit"));
        assert!(!is_fits_file("m13.fits.bak"));
        assert!(!is_fits_file("notes.txt"));
    }

    #[test]
    fn test_path_has_dots() {
        assert!(path_has_dots(Path::new(".")));
        assert!(path_has_dots(Path::new("a/../b")));
        assert!(path_has_dots(Path::new("./a/b")));
        assert!(!path_has_dots(Path::new("a/b/c.fits")));
        assert!(!path_has_dots(Path::new("/abs/a/b")));
    }

    #[test]
    fn test_load_keyfile() {
        let mut file = tempfile::NamedTempFile::new().expect("temp keyfile");
        writeln!(file, "OBJECT").expect("write");
        writeln!(file, "DATE-OBS").expect("write");
        let keys = load_keyfile(file.path()).expect("load");
        assert_eq!(keys, vec!["OBJECT".to_string(), "DATE-OBS".to_string()]);
    }
}
