//! # FITS Primary-Header Reader
//!
//! Reads FITS files according to the FITS standard (NASA/Science Office of
//! Standards and Technology):
//!
//! - 2880-byte blocks
//! - Header made of 80-character keyword records ("cards")
//! - Data units skipped, never decoded
//!
//! Only the primary header is surfaced card-by-card; extension HDUs are
//! enumerated as [`HduInfo`] summaries. Gzipped input (`*.fits.gz`) is
//! transparently decompressed.

mod error;
mod value;

#[cfg(test)]
mod tests;

pub use error::FitsError;
pub use value::HeaderValue;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::warn;

/// FITS block size in bytes.
pub const BLOCK_SIZE: usize = 2880;

/// FITS card (header record) size in bytes.
pub const CARD_SIZE: usize = 80;

const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// One header card: a keyword paired with its parsed value.
///
/// Commentary cards (`COMMENT`, `HISTORY`) keep their keyword as-is, so a
/// header may legally contain many cards with the same keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Card keyword, e.g. "NAXIS1" or "HISTORY".
    pub keyword: String,
    /// Parsed card value.
    pub value: HeaderValue,
}

/// Summary descriptor for one HDU (header-data unit).
#[derive(Debug, Clone, PartialEq)]
pub struct HduInfo {
    /// Zero-based HDU index within the file.
    pub index: usize,
    /// HDU name from `EXTNAME`, or "PRIMARY" for the first HDU.
    pub name: String,
    /// HDU kind: "PRIMARY", "IMAGE", "BINTABLE", or "TABLE".
    pub hdu_type: String,
    /// Number of cards in the HDU header, excluding `END`.
    pub card_count: usize,
    /// Axis lengths from `NAXISn`, in axis order.
    pub dimensions: Vec<i64>,
    /// Element type derived from `BITPIX`, e.g. "int16" or "float32".
    pub data_format: String,
}

impl fmt::Display for HduInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dimensions.iter().map(|d| d.to_string()).collect();
        write!(
            f,
            "{:3}  {:10}  {:10}  {:5}   ({})   {}",
            self.index,
            self.name,
            self.hdu_type,
            self.card_count,
            dims.join(", "),
            self.data_format
        )
    }
}

/// An opened FITS file: the primary header cards plus per-HDU summaries.
///
/// The underlying file handle is opened, read, and closed entirely within
/// [`FitsFile::open`]; no resource escapes that call.
#[derive(Debug, Clone)]
pub struct FitsFile {
    path: PathBuf,
    cards: Vec<Card>,
    hdus: Vec<HduInfo>,
}

impl FitsFile {
    /// Open and read the given FITS file (plain or gzipped).
    ///
    /// Fails when the path is missing, unreadable, or not a FITS file.
    pub fn open(path: &Path) -> Result<FitsFile, FitsError> {
        let mut reader = open_reader(path)?;
        let primary = read_header_unit(&mut reader)?
            .ok_or_else(|| FitsError::InvalidFormat("file is empty".to_string()))?;
        match primary.cards.first() {
            Some(card) if card.keyword == "SIMPLE" => {}
            _ => {
                return Err(FitsError::InvalidFormat(
                    "primary header does not begin with SIMPLE".to_string(),
                ));
            }
        }

        let hdus = enumerate_hdus(&mut reader, &primary, path)?;
        Ok(FitsFile {
            path: path.to_path_buf(),
            cards: primary.cards,
            hdus,
        })
    }

    /// Path of the file this header was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Primary-header cards in file order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Summary info for every HDU in the file.
    pub fn hdus(&self) -> &[HduInfo] {
        &self.hdus
    }
}

fn open_reader(path: &Path) -> Result<Box<dyn Read>, FitsError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FitsError::NotFound(path.to_path_buf()),
        _ => FitsError::Io(e),
    })?;
    let buffered = BufReader::new(file);
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(buffered)))
    } else {
        Ok(Box::new(buffered))
    }
}

/// One parsed header unit (all cards up to `END`).
struct HeaderUnit {
    cards: Vec<Card>,
}

impl HeaderUnit {
    /// First value for the given keyword, if any.
    fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|card| card.keyword == keyword)
            .map(|card| &card.value)
    }

    fn get_int(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_int)
    }
}

/// Read one header unit from the reader.
///
/// Returns `Ok(None)` on clean end-of-file (no more HDUs); a file ending in
/// the middle of a header unit is an error.
fn read_header_unit<R: Read>(reader: &mut R) -> Result<Option<HeaderUnit>, FitsError> {
    let mut cards = Vec::new();
    let mut block = [0u8; BLOCK_SIZE];
    let mut first_block = true;

    loop {
        match read_block(reader, &mut block)? {
            BlockRead::Full => {}
            BlockRead::Eof if first_block => return Ok(None),
            BlockRead::Eof => {
                return Err(FitsError::InvalidFormat(
                    "file ends inside a header unit (missing END card)".to_string(),
                ));
            }
        }
        first_block = false;

        for i in 0..CARDS_PER_BLOCK {
            let record = &block[i * CARD_SIZE..(i + 1) * CARD_SIZE];
            let keyword = String::from_utf8_lossy(&record[..8]).trim().to_string();

            if keyword == "END" {
                return Ok(Some(HeaderUnit { cards }));
            }
            if keyword.is_empty() {
                continue; // blank card
            }

            let rest = String::from_utf8_lossy(&record[8..]);
            let value = if keyword == "COMMENT" || keyword == "HISTORY" {
                HeaderValue::Str(rest.trim().to_string())
            } else if record[8] == b'=' && record[9] == b' ' {
                value::parse_value(&rest.as_ref()[2..])
            } else {
                // No value indicator: keep the remainder as a bare string.
                HeaderValue::Str(rest.trim().to_string())
            };
            cards.push(Card { keyword, value });
        }
    }
}

enum BlockRead {
    Full,
    Eof,
}

/// Fill a whole 2880-byte block, tolerating a clean EOF at a block boundary.
fn read_block<R: Read>(reader: &mut R, block: &mut [u8; BLOCK_SIZE]) -> Result<BlockRead, FitsError> {
    let mut filled = 0;
    while filled < BLOCK_SIZE {
        let n = reader.read(&mut block[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(BlockRead::Eof);
            }
            return Err(FitsError::InvalidFormat(
                "truncated block (file is not a multiple of 2880 bytes)".to_string(),
            ));
        }
        filled += n;
    }
    Ok(BlockRead::Full)
}

/// Size of the data unit following a header, rounded up to whole blocks.
fn data_unit_size(unit: &HeaderUnit) -> u64 {
    let bitpix = unit.get_int("BITPIX").unwrap_or(0).unsigned_abs();
    let naxis = unit.get_int("NAXIS").unwrap_or(0);
    if bitpix == 0 || naxis <= 0 {
        return 0;
    }

    let mut elements: u64 = 1;
    for axis in 1..=naxis {
        let len = unit.get_int(&format!("NAXIS{axis}")).unwrap_or(0);
        if len <= 0 {
            return 0;
        }
        elements = elements.saturating_mul(len as u64);
    }

    // Random-group / table conventions: size includes PCOUNT and GCOUNT.
    let pcount = unit.get_int("PCOUNT").unwrap_or(0).max(0) as u64;
    let gcount = unit.get_int("GCOUNT").unwrap_or(1).max(1) as u64;

    let bytes = (bitpix / 8)
        .saturating_mul(gcount)
        .saturating_mul(pcount.saturating_add(elements));
    let block = BLOCK_SIZE as u64;
    (bytes + block - 1) / block * block
}

fn summarize_hdu(unit: &HeaderUnit, index: usize) -> HduInfo {
    let hdu_type = if index == 0 {
        "PRIMARY".to_string()
    } else {
        match unit.get("XTENSION").and_then(HeaderValue::as_str) {
            Some(ext) => ext.trim().to_string(),
            None => "UNKNOWN".to_string(),
        }
    };
    let name = match unit.get("EXTNAME").and_then(HeaderValue::as_str) {
        Some(name) => name.trim().to_string(),
        None if index == 0 => "PRIMARY".to_string(),
        None => String::new(),
    };

    let naxis = unit.get_int("NAXIS").unwrap_or(0).max(0);
    let dimensions: Vec<i64> = (1..=naxis)
        .filter_map(|axis| unit.get_int(&format!("NAXIS{axis}")))
        .collect();

    let data_format = match unit.get_int("BITPIX") {
        Some(8) => "uint8",
        Some(16) => "int16",
        Some(32) => "int32",
        Some(64) => "int64",
        Some(-32) => "float32",
        Some(-64) => "float64",
        _ => "unknown",
    }
    .to_string();

    HduInfo {
        index,
        name,
        hdu_type,
        card_count: unit.cards.len(),
        dimensions,
        data_format,
    }
}

/// Skip the primary data unit, then enumerate any extension HDUs.
fn enumerate_hdus<R: Read>(
    reader: &mut R,
    primary: &HeaderUnit,
    path: &Path,
) -> Result<Vec<HduInfo>, FitsError> {
    let mut hdus = vec![summarize_hdu(primary, 0)];

    let mut data_size = data_unit_size(primary);
    loop {
        if !skip_bytes(reader, data_size)? {
            warn!("{}: data unit shorter than header claims", path.display());
            break;
        }
        match read_header_unit(reader) {
            Ok(Some(unit)) => {
                let index = hdus.len();
                hdus.push(summarize_hdu(&unit, index));
                data_size = data_unit_size(&unit);
            }
            Ok(None) => break,
            Err(e) => {
                // A malformed extension does not invalidate the primary HDU.
                warn!("{}: stopping HDU scan: {}", path.display(), e);
                break;
            }
        }
    }
    Ok(hdus)
}

/// Skip exactly `n` bytes; false when the stream ends early.
fn skip_bytes<R: Read>(reader: &mut R, n: u64) -> Result<bool, FitsError> {
    if n == 0 {
        return Ok(true);
    }
    let copied = io::copy(&mut reader.take(n), &mut io::sink())?;
    Ok(copied == n)
}
