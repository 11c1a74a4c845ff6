//! # Header Extraction
//!
//! Turns the ordered cards of a FITS primary header into a
//! [`MetadataSet`], applying a caller-supplied cleaning strategy and
//! dropping unusable cards.
//!
//! A card survives extraction only when both its cleaned keyword and its
//! cleaned value are non-empty, where "empty" means the empty string for
//! strings, zero for numbers, and false for logicals (see
//! [`HeaderValue::is_empty`]). After all cards are processed, one reserved
//! [`FILEPATH_KEY`] entry holding the source path is appended; it bypasses
//! both the cleaner and the emptiness filter. An optional ignore set then
//! removes named keywords from the full result, reserved entry included.

use std::collections::HashSet;
use std::path::Path;

use crate::fits::{Card, HeaderValue};
use crate::metadata::{MetadataSet, Metadatum};

/// Reserved keyword naming the source file path of a metadata set.
pub const FILEPATH_KEY: &str = "filepath";

/// Default field cleaner: strips double quotes, single quotes, and
/// backslashes. Idempotent (a fixed point after one pass).
pub fn default_cleaner(field: &str) -> String {
    field
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\\'))
        .collect()
}

/// Extracts a [`MetadataSet`] from header cards.
///
/// The cleaner is a pure string transform applied to every keyword and to
/// the content of every string value; non-string values pass through the
/// cleaner untouched and are stringified afterwards.
pub struct HeaderExtractor<'a> {
    cleaner: &'a dyn Fn(&str) -> String,
    ignore_keys: Option<&'a HashSet<String>>,
}

impl Default for HeaderExtractor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> HeaderExtractor<'a> {
    /// Create an extractor with the default cleaner and no ignore set.
    pub fn new() -> Self {
        Self {
            cleaner: &default_cleaner,
            ignore_keys: None,
        }
    }

    /// Replace the cleaning strategy.
    pub fn with_cleaner(mut self, cleaner: &'a dyn Fn(&str) -> String) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Drop the named keywords entirely from the extracted set.
    pub fn with_ignore_keys(mut self, keys: &'a HashSet<String>) -> Self {
        self.ignore_keys = Some(keys);
        self
    }

    /// Extract metadata from the given cards for a file at `filepath`.
    ///
    /// Never fails; unreadable files are rejected upstream when the header
    /// itself is opened.
    pub fn extract(&self, cards: &[Card], filepath: &Path) -> MetadataSet {
        let mut metadata = MetadataSet::new();
        for card in cards {
            let keyword = (self.cleaner)(&card.keyword);
            if keyword.is_empty() {
                continue;
            }
            let cleaned = self.clean_value(&card.value);
            if cleaned.is_empty() {
                continue;
            }
            metadata.push(Metadatum::new(keyword, cleaned.to_string()));
        }

        // The reserved path entry always lands, even when the path string
        // itself would fail the cleaning filter.
        metadata.push(Metadatum::new(
            FILEPATH_KEY,
            filepath.to_string_lossy().to_string(),
        ));

        if let Some(ignore) = self.ignore_keys {
            metadata.remove_by_keys(ignore);
        }
        metadata
    }

    fn clean_value(&self, value: &HeaderValue) -> HeaderValue {
        match value {
            HeaderValue::Str(s) => HeaderValue::Str((self.cleaner)(s)),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn cards() -> Vec<Card> {
        vec![
            Card {
                keyword: "SIMPLE".to_string(),
                value: HeaderValue::Logical(true),
            },
            Card {
                keyword: "NAXIS".to_string(),
                value: HeaderValue::Int(2),
            },
            Card {
                keyword: "OBJECT".to_string(),
                value: HeaderValue::Str("'M13'".to_string()),
            },
            Card {
                keyword: "HISTORY".to_string(),
                value: HeaderValue::Str("reduced".to_string()),
            },
        ]
    }

    #[test]
    fn test_extract_cleans_and_appends_filepath() {
        let metadata = HeaderExtractor::new().extract(&cards(), Path::new("/data/m13.fits"));

        let pairs: Vec<(&str, &str)> = metadata
            .iter()
            .map(|item| (item.keyword.as_str(), item.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("SIMPLE", "T"),
                ("NAXIS", "2"),
                ("OBJECT", "M13"),
                ("HISTORY", "reduced"),
                (FILEPATH_KEY, "/data/m13.fits"),
            ]
        );
    }

    #[test]
    fn test_size_is_surviving_cards_plus_one() {
        let mut all = cards();
        // These four all clean to empty and must be dropped.
        all.push(Card {
            keyword: "ZEROI".to_string(),
            value: HeaderValue::Int(0),
        });
        all.push(Card {
            keyword: "ZEROR".to_string(),
            value: HeaderValue::Real(0.0),
        });
        all.push(Card {
            keyword: "FLAG".to_string(),
            value: HeaderValue::Logical(false),
        });
        all.push(Card {
            keyword: "QUOTES".to_string(),
            value: HeaderValue::Str("''".to_string()),
        });

        let metadata = HeaderExtractor::new().extract(&all, Path::new("x.fits"));
        assert_eq!(metadata.len(), cards().len() + 1);
    }

    #[test]
    fn test_empty_keyword_dropped() {
        let all = vec![Card {
            keyword: "\"\"".to_string(),
            value: HeaderValue::Int(1),
        }];
        let metadata = HeaderExtractor::new().extract(&all, Path::new("x.fits"));
        assert_eq!(metadata.len(), 1); // only the reserved path entry
    }

    #[test]
    fn test_filepath_bypasses_cleaning() {
        let metadata = HeaderExtractor::new().extract(&[], Path::new("/odd/'quoted'/m13.fits"));
        assert_eq!(
            metadata.get(FILEPATH_KEY).map(|i| i.value.as_str()),
            Some("/odd/'quoted'/m13.fits")
        );

        // Even an empty path still yields the reserved entry.
        let metadata = HeaderExtractor::new().extract(&[], Path::new(""));
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get(FILEPATH_KEY).map(|i| i.value.as_str()), Some(""));
    }

    #[test]
    fn test_ignore_keys_removes_all_occurrences() {
        let mut all = cards();
        all.push(Card {
            keyword: "HISTORY".to_string(),
            value: HeaderValue::Str("calibrated".to_string()),
        });

        let ignore: HashSet<String> = ["HISTORY".to_string()].into_iter().collect();
        let metadata = HeaderExtractor::new()
            .with_ignore_keys(&ignore)
            .extract(&all, Path::new("x.fits"));

        assert!(!metadata.contains("HISTORY"));
        assert_eq!(metadata.len(), 4);
    }

    #[test]
    fn test_ignore_keys_can_remove_reserved_entry() {
        let ignore: HashSet<String> = [FILEPATH_KEY.to_string()].into_iter().collect();
        let metadata = HeaderExtractor::new()
            .with_ignore_keys(&ignore)
            .extract(&cards(), Path::new("x.fits"));
        assert!(!metadata.contains(FILEPATH_KEY));
    }

    #[test]
    fn test_custom_cleaner() {
        let upper = |s: &str| s.to_uppercase();
        let metadata = HeaderExtractor::new()
            .with_cleaner(&upper)
            .extract(&cards(), Path::new("x.fits"));
        assert_eq!(metadata.get("OBJECT").map(|i| i.value.as_str()), Some("'M13'"));
    }

    proptest! {
        #[test]
        fn prop_default_cleaner_is_idempotent(s in ".*") {
            let once = default_cleaner(&s);
            prop_assert_eq!(default_cleaner(&once), once.clone());
        }

        #[test]
        fn prop_default_cleaner_strips_all_quotes(s in ".*") {
            let cleaned = default_cleaner(&s);
            prop_assert!(!cleaned.chars().any(|c| matches!(c, '"' | '\'' | '\\')));
        }
    }
}
