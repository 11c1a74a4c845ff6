//! # Metadata Container
//!
//! An ordered, duplicate-tolerant container of keyword/value metadata pairs
//! extracted from a single FITS file.
//!
//! Duplicated keywords are a legal, expected state: FITS headers routinely
//! carry repeated `HISTORY` and `COMMENT` cards, and normalization appends
//! derived items without ever removing or editing existing ones. Insertion
//! order is preserved and never implicitly deduplicated.
//!
//! The set of unique keywords is kept as a cache alongside the item list and
//! recomputed on every mutation; the item list is the only source of truth.

mod error;


pub use error::MetadataError;

use std::collections::HashSet;
use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A single immutable (keyword, value) metadata pair.
///
/// Serializes as a two-element JSON array, so a whole [`MetadataSet`] becomes
/// an array of pairs, e.g. `[["OBJECT","M13"],["filepath","/data/m13.fits"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metadatum {
    /// The keyword (name) half of the pair, e.g. "NAXIS" or "obs_title".
    pub keyword: String,
    /// The string form of the associated value.
    pub value: String,
}

impl Metadatum {
    /// Create a new metadatum from any string-like keyword and value.
    pub fn new(keyword: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Metadatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.keyword, self.value)
    }
}

impl Serialize for Metadatum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.keyword, &self.value).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Metadatum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (keyword, value) = <(String, String)>::deserialize(deserializer)
            .map_err(|e| D::Error::custom(format!("metadatum must be a [keyword, value] pair: {e}")))?;
        Ok(Self { keyword, value })
    }
}

/// An ordered sequence of [`Metadatum`] items for one file.
///
/// One `MetadataSet` is created per file-processing call, mutated in place by
/// normalization (append-only) and discarded after hand-off to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataSet {
    items: Vec<Metadatum>,
    #[serde(skip)]
    key_set: HashSet<String>,
}

impl MetadataSet {
    /// Create an empty metadata set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a metadata set from an ordered list of items.
    pub fn from_items(items: Vec<Metadatum>) -> Self {
        let mut set = Self {
            items,
            key_set: HashSet::new(),
        };
        set.update_key_set();
        set
    }

    /// Number of items, counting duplicated keywords once per item.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Metadatum> {
        self.items.iter()
    }

    /// True when at least one item carries the given keyword.
    pub fn contains(&self, keyword: &str) -> bool {
        self.key_set.contains(keyword)
    }

    /// The set of unique keywords currently present.
    ///
    /// This is a cache over the item list; it is recomputed internally after
    /// every mutation and must never be treated as a source of truth.
    pub fn key_set(&self) -> &HashSet<String> {
        &self.key_set
    }

    /// Append an item, updating the keyword cache.
    pub fn push(&mut self, item: Metadatum) {
        self.key_set.insert(item.keyword.clone());
        self.items.push(item);
    }

    /// Return the first item with the given keyword, or `None`.
    ///
    /// A missing keyword is not an error; callers that need a "not found"
    /// sentinel map the `None` themselves.
    pub fn get(&self, keyword: &str) -> Option<&Metadatum> {
        if !self.key_set.contains(keyword) {
            return None;
        }
        self.items.iter().find(|item| item.keyword == keyword)
    }

    /// Copy the first item named by `src_key` back into the set under
    /// `target_key`, keeping the same value.
    ///
    /// With `nodup` set, the copy is suppressed when `target_key` already
    /// exists. Returns true when an item was actually appended.
    pub fn copy_item(&mut self, src_key: &str, target_key: &str, nodup: bool) -> bool {
        let Some(src) = self.get(src_key) else {
            return false;
        };
        if nodup && self.key_set.contains(target_key) {
            return false;
        }
        let copy = Metadatum::new(target_key, src.value.clone());
        self.push(copy);
        true
    }

    /// Return a new set holding only items whose keyword is in `keys`,
    /// preserving the original relative order.
    pub fn filter_by_keys(&self, keys: &[String]) -> MetadataSet {
        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        MetadataSet::from_items(
            self.items
                .iter()
                .filter(|item| wanted.contains(item.keyword.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Remove every item whose keyword is in `keys`, in place.
    pub fn remove_by_keys(&mut self, keys: &HashSet<String>) {
        self.items.retain(|item| !keys.contains(&item.keyword));
        self.update_key_set();
    }

    /// Return the items with the specified keywords, or all items when no
    /// keywords are given.
    pub fn metadata_for_keys(&self, keys: Option<&[String]>) -> MetadataSet {
        match keys {
            Some(keys) => self.filter_by_keys(keys),
            None => self.clone(),
        }
    }

    /// Serialize to the array-of-pairs JSON form.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a set back from the array-of-pairs JSON form.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let mut set: MetadataSet = serde_json::from_str(json)?;
        set.update_key_set();
        Ok(set)
    }

    fn update_key_set(&mut self) {
        self.key_set = self
            .items
            .iter()
            .map(|item| item.keyword.clone())
            .collect();
    }
}

impl FromIterator<Metadatum> for MetadataSet {
    fn from_iter<I: IntoIterator<Item = Metadatum>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MetadataSet {
    type Item = &'a Metadatum;
    type IntoIter = std::slice::Iter<'a, Metadatum>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
