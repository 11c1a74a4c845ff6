//! # Keyword Normalization
//!
//! Rewrites an extracted [`MetadataSet`] against two fixed rule tables:
//!
//! 1. **Alternate keys**: items whose keyword has a friendlier alternate
//!    name (e.g. `OBJECT` -> `obs_title`) are duplicated under that name.
//! 2. **Coordinate interpretation**: a `CTYPE*` card names the physical
//!    quantity carried by its paired `CRVAL*` card (see the FITS standard,
//!    <https://fits.gsfc.nasa.gov/fits_standard.html>). When the `CTYPE`
//!    value mentions `RA` or `DEC`, the paired `CRVAL` value is re-issued
//!    under `right_ascension` or `declination`.
//!
//! Both passes iterate a fixed snapshot of the set taken before the pass
//! begins, so appended items are never revisited; derived items land after
//! all base items, in trigger order. Rules only ever append, never remove
//! or edit.
//!
//! An optional keys subset restricts the final output: alternate
//! duplication then only fires for standard keys named in the subset, and
//! every key a rule derives is added to the subset so it survives the
//! final filter. Coordinate interpretation is not gated on the subset at
//! all; its interpreted keys always join the output.

use crate::metadata::{MetadataSet, Metadatum};

/// Keyword issued for a right-ascension coordinate value.
pub const RIGHT_ASCENSION_KEY: &str = "right_ascension";

/// Keyword issued for a declination coordinate value.
pub const DECLINATION_KEY: &str = "declination";

/// Alternate (friendlier) name for a standard FITS keyword, if one exists.
///
/// The table is fixed at compile time and shared read-only by all callers.
pub fn alternate_key(keyword: &str) -> Option<&'static str> {
    match keyword {
        "NAXIS1" => Some("spatial_axis_1_number_bins"),
        "NAXIS2" => Some("spatial_axis_2_number_bins"),
        "DATE-OBS" => Some("start_time"),
        "INSTRUME" => Some("facility_name"),
        "TELESCOP" => Some("instrument_name"),
        "OBSERVER" => Some("obs_creator_name"),
        "OBJECT" => Some("obs_title"),
        _ => None,
    }
}

/// The coordinate-value keyword paired with a coordinate-type keyword,
/// one entry per spatial axis.
pub fn coordinate_value_key(keyword: &str) -> Option<&'static str> {
    match keyword {
        "CTYPE1" => Some("CRVAL1"),
        "CTYPE2" => Some("CRVAL2"),
        _ => None,
    }
}

/// Apply both normalization passes to `metadata`, then filter by the keys
/// subset when one is supplied.
///
/// `keys_subset` distinguishes "no subset" (`None`: keep everything) from
/// an empty subset (`Some(vec![])`: only keys the rules derive into the
/// subset survive the filter).
pub fn normalize(metadata: MetadataSet, keys_subset: Option<Vec<String>>) -> MetadataSet {
    let mut metadata = metadata;
    let mut keys_subset = keys_subset;

    // Snapshot before the pass; appended items must not be revisited.
    let snapshot: Vec<Metadatum> = metadata.iter().cloned().collect();
    for item in &snapshot {
        handle_alternate_key(&mut metadata, item, keys_subset.as_mut());
        handle_coordinate_type(&mut metadata, item, keys_subset.as_mut());
    }

    match keys_subset {
        Some(keys) => metadata.filter_by_keys(&keys),
        None => metadata,
    }
}

/// Duplicate an item listed in the alternate-key table under its alternate
/// keyword. With a subset in play, only standard keys named in the subset
/// are duplicated, and the alternate key joins the subset on success.
fn handle_alternate_key(
    metadata: &mut MetadataSet,
    item: &Metadatum,
    keys_subset: Option<&mut Vec<String>>,
) {
    let Some(alt_key) = alternate_key(&item.keyword) else {
        return;
    };
    match keys_subset {
        Some(subset) => {
            if subset.iter().any(|k| k == &item.keyword)
                && metadata.copy_item(&item.keyword, alt_key, false)
            {
                subset.push(alt_key.to_string());
            }
        }
        None => {
            metadata.copy_item(&item.keyword, alt_key, false);
        }
    }
}

/// For a coordinate-type item, interpret its value and re-issue the paired
/// coordinate value under the interpreted keyword.
///
/// Only `RA` and `DEC` interpretations are handled; anything else derives
/// nothing. The paired value may legally be absent, in which case the copy
/// is silently skipped.
fn handle_coordinate_type(
    metadata: &mut MetadataSet,
    item: &Metadatum,
    keys_subset: Option<&mut Vec<String>>,
) {
    let Some(coord_value_key) = coordinate_value_key(&item.keyword) else {
        return;
    };
    let interp_key = if item.value.contains("RA") {
        RIGHT_ASCENSION_KEY
    } else if item.value.contains("DEC") {
        DECLINATION_KEY
    } else {
        return;
    };

    let copied = metadata.copy_item(coord_value_key, interp_key, false);
    if copied {
        if let Some(subset) = keys_subset {
            subset.push(interp_key.to_string());
        }
    }
}
