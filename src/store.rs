//! # Remote Store Contract
//!
//! A collection-oriented data store holding uploaded files and their
//! attached metadata. The store exposes a restricted current-directory
//! abstraction: every path is interpreted inside a configured root, and
//! navigation above that root is rejected.
//!
//! [`FilesystemStore`] realizes the contract on a local directory tree
//! (metadata lands in `<name>.metadata.json` sidecar files); it stands in
//! for a networked collection store. [`MemoryStore`] records operations in
//! memory for tests and dry runs. Authentication and retry policy are out
//! of scope for both.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::metadata::{MetadataError, MetadataSet};

/// Errors raised by store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O failure against the backing store
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A path tried to navigate outside the configured root
    #[error("Path escapes the store root: {0}")]
    OutsideRoot(String),

    /// Metadata could not be serialized for attachment
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Client contract for a collection-oriented remote store.
///
/// Relative paths resolve against the current working directory; `absolute`
/// paths resolve against the configured root. Neither form may contain a
/// `..` component, a leading separator, or a leading `./`; an interior
/// `.` segment normalizes away and is accepted.
pub trait StoreClient {
    /// Upload a local file to the given remote path.
    fn put_file(&mut self, local: &Path, remote: &str) -> Result<(), StoreError>;

    /// Attach metadata to the file at the given remote path, replacing any
    /// pre-existing metadata under the same keywords.
    fn put_metadata(&mut self, remote: &str, metadata: &MetadataSet) -> Result<(), StoreError>;

    /// Create a directory (and any missing parents).
    fn mkdir(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError>;

    /// Change the current working directory.
    fn cd(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError>;

    /// Reset the current working directory to the root.
    fn cd_root(&mut self);

    /// Reset the root to the store base, or to the named directory under
    /// the base. The working directory moves to the new root.
    fn set_root(&mut self, top_dir: Option<&str>) -> Result<(), StoreError>;

    /// The current working directory, for reporting.
    fn cwd(&self) -> String;
}

/// Reject leading separators and dot components; the store root is a hard
/// boundary. Interior `.` segments never reach this check because
/// [`Path::components`] normalizes them away (a leading `./` survives as
/// [`Component::CurDir`] and is still rejected).
fn validate_remote_path(path: &str) -> Result<&Path, StoreError> {
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(StoreError::OutsideRoot(path.to_string()));
    }
    for component in p.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(StoreError::OutsideRoot(path.to_string())),
        }
    }
    Ok(p)
}

/// Store realization over a local directory tree.
///
/// Files are copied under the root; metadata is written next to each file
/// as a `<name>.metadata.json` sidecar in the array-of-pairs JSON form.
#[derive(Debug)]
pub struct FilesystemStore {
    base: PathBuf,
    root: PathBuf,
    cwd: PathBuf,
}

impl FilesystemStore {
    /// Create a store rooted at the given base directory, creating it if
    /// necessary.
    pub fn new(base: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(base)?;
        Ok(Self {
            base: base.to_path_buf(),
            root: base.to_path_buf(),
            cwd: base.to_path_buf(),
        })
    }

    fn resolve(&self, path: &str, absolute: bool) -> Result<PathBuf, StoreError> {
        let validated = validate_remote_path(path)?;
        let start = if absolute { &self.root } else { &self.cwd };
        Ok(start.join(validated))
    }

    fn sidecar_path(target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        name.push_str(".metadata.json");
        target.with_file_name(name)
    }
}

impl StoreClient for FilesystemStore {
    fn put_file(&mut self, local: &Path, remote: &str) -> Result<(), StoreError> {
        let target = self.resolve(remote, false)?;
        debug!("put_file {} -> {}", local.display(), target.display());
        fs::copy(local, &target)?;
        Ok(())
    }

    fn put_metadata(&mut self, remote: &str, metadata: &MetadataSet) -> Result<(), StoreError> {
        let target = Self::sidecar_path(&self.resolve(remote, false)?);

        // Replace any previously attached items under the same keywords.
        let mut merged = if target.exists() {
            let existing = fs::read_to_string(&target)?;
            MetadataSet::from_json(&existing)?
        } else {
            MetadataSet::new()
        };
        merged.remove_by_keys(metadata.key_set());
        for item in metadata.iter() {
            merged.push(item.clone());
        }

        let mut file = fs::File::create(&target)?;
        file.write_all(merged.to_json()?.as_bytes())?;
        Ok(())
    }

    fn mkdir(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError> {
        let target = self.resolve(dir, absolute)?;
        fs::create_dir_all(target)?;
        Ok(())
    }

    fn cd(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError> {
        self.cwd = self.resolve(dir, absolute)?;
        Ok(())
    }

    fn cd_root(&mut self) {
        self.cwd = self.root.clone();
    }

    fn set_root(&mut self, top_dir: Option<&str>) -> Result<(), StoreError> {
        self.root = match top_dir {
            Some(top) => self.base.join(validate_remote_path(top)?),
            None => self.base.clone(),
        };
        self.cwd = self.root.clone();
        Ok(())
    }

    fn cwd(&self) -> String {
        self.cwd.display().to_string()
    }
}

/// In-memory store double: records uploads and attached metadata without
/// touching any backing storage. Useful in tests and for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: PathBuf,
    cwd: PathBuf,
    dirs: HashSet<PathBuf>,
    files: Vec<(PathBuf, PathBuf)>,
    metadata: HashMap<PathBuf, MetadataSet>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, path: &str, absolute: bool) -> Result<PathBuf, StoreError> {
        let validated = validate_remote_path(path)?;
        let start = if absolute { &self.root } else { &self.cwd };
        Ok(start.join(validated))
    }

    /// The (local, remote) pairs uploaded so far, in order.
    pub fn files(&self) -> &[(PathBuf, PathBuf)] {
        &self.files
    }

    /// Directories created so far.
    pub fn dirs(&self) -> &HashSet<PathBuf> {
        &self.dirs
    }

    /// Metadata currently attached to the given remote path.
    pub fn metadata_for(&self, remote: &Path) -> Option<&MetadataSet> {
        self.metadata.get(remote)
    }
}

impl StoreClient for MemoryStore {
    fn put_file(&mut self, local: &Path, remote: &str) -> Result<(), StoreError> {
        let target = self.resolve(remote, false)?;
        self.files.push((local.to_path_buf(), target));
        Ok(())
    }

    fn put_metadata(&mut self, remote: &str, metadata: &MetadataSet) -> Result<(), StoreError> {
        let target = self.resolve(remote, false)?;
        let merged = self.metadata.entry(target).or_insert_with(MetadataSet::new);
        merged.remove_by_keys(metadata.key_set());
        for item in metadata.iter() {
            merged.push(item.clone());
        }
        Ok(())
    }

    fn mkdir(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError> {
        let target = self.resolve(dir, absolute)?;
        self.dirs.insert(target);
        Ok(())
    }

    fn cd(&mut self, dir: &str, absolute: bool) -> Result<(), StoreError> {
        self.cwd = self.resolve(dir, absolute)?;
        Ok(())
    }

    fn cd_root(&mut self) {
        self.cwd = self.root.clone();
    }

    fn set_root(&mut self, top_dir: Option<&str>) -> Result<(), StoreError> {
        self.root = match top_dir {
            Some(top) => PathBuf::from(validate_remote_path(top)?),
            None => PathBuf::new(),
        };
        self.cwd = self.root.clone();
        Ok(())
    }

    fn cwd(&self) -> String {
        self.cwd.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadatum;

    fn sample() -> MetadataSet {
        MetadataSet::from_items(vec![
            Metadatum::new("OBJECT", "M13"),
            Metadatum::new("obs_title", "M13"),
        ])
    }

    #[test]
    fn test_paths_cannot_escape_root() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.mkdir("../outside", false),
            Err(StoreError::OutsideRoot(_))
        ));
        assert!(matches!(
            store.cd("/abs", true),
            Err(StoreError::OutsideRoot(_))
        ));
        assert!(matches!(
            store.cd("./a", false),
            Err(StoreError::OutsideRoot(_))
        ));
    }

    #[test]
    fn test_interior_dot_segment_normalizes() {
        // Path components drop an interior ".", so "a/./b" cannot escape
        // the root and lands at the same place as "a/b".
        let mut store = MemoryStore::new();
        store.mkdir("a/./b", false).expect("mkdir");
        assert!(store.dirs().contains(Path::new("a/b")));
    }

    #[test]
    fn test_memory_store_records_uploads() {
        let mut store = MemoryStore::new();
        store.set_root(Some("astrolabe")).expect("set root");
        store.mkdir("night1", false).expect("mkdir");
        store.cd("night1", false).expect("cd");
        store
            .put_file(Path::new("/local/m13.fits"), "m13.fits")
            .expect("put");

        assert_eq!(
            store.files(),
            &[(
                PathBuf::from("/local/m13.fits"),
                PathBuf::from("astrolabe/night1/m13.fits")
            )]
        );
    }

    #[test]
    fn test_put_metadata_replaces_same_keywords() {
        let mut store = MemoryStore::new();
        let first = MetadataSet::from_items(vec![
            Metadatum::new("OBJECT", "old"),
            Metadatum::new("OBSERVER", "Hicks"),
        ]);
        store.put_metadata("m13.fits", &first).expect("attach");
        store.put_metadata("m13.fits", &sample()).expect("replace");

        let attached = store
            .metadata_for(Path::new("m13.fits"))
            .expect("metadata present");
        assert_eq!(attached.get("OBJECT").map(|i| i.value.as_str()), Some("M13"));
        assert_eq!(
            attached.get("OBSERVER").map(|i| i.value.as_str()),
            Some("Hicks")
        );
        assert!(attached.contains("obs_title"));
    }

    #[test]
    fn test_filesystem_store_round_trip() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("store");
        let mut store = FilesystemStore::new(&base).expect("create store");
        store.mkdir("astrolabe", true).expect("mkdir root dir");
        store.set_root(Some("astrolabe")).expect("set root");

        let local = tmp.path().join("m13.fits");
        fs::write(&local, b"not really fits").expect("write local");
        store.put_file(&local, "m13.fits").expect("upload");
        store.put_metadata("m13.fits", &sample()).expect("attach");

        assert!(base.join("astrolabe/m13.fits").exists());
        let sidecar = base.join("astrolabe/m13.fits.metadata.json");
        let restored =
            MetadataSet::from_json(&fs::read_to_string(sidecar).expect("read sidecar"))
                .expect("parse sidecar");
        assert_eq!(restored, sample());
    }

    #[test]
    fn test_cd_root_returns_to_root() {
        let mut store = MemoryStore::new();
        store.set_root(Some("astrolabe")).expect("set root");
        store.cd("deep/dir", false).expect("cd");
        assert_eq!(store.cwd(), "astrolabe/deep/dir");
        store.cd_root();
        assert_eq!(store.cwd(), "astrolabe");
    }
}
