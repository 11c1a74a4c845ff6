use super::*;

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Pad one card image out to 80 bytes.
fn card(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    assert!(bytes.len() <= CARD_SIZE, "card too long: {text}");
    bytes.resize(CARD_SIZE, b' ');
    bytes
}

/// Assemble cards plus END into space-padded 2880-byte blocks.
fn header_block(cards: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for c in cards {
        bytes.extend_from_slice(&card(c));
    }
    bytes.extend_from_slice(&card("END"));
    while bytes.len() % BLOCK_SIZE != 0 {
        bytes.push(b' ');
    }
    bytes
}

fn simple_header() -> Vec<u8> {
    header_block(&[
        "SIMPLE  =                    T",
        "BITPIX  =                   16",
        "NAXIS   =                    0",
        "OBJECT  = 'M13     '           / target",
        "CTYPE1  = 'RA--TAN '",
        "CRVAL1  =                250.4",
        "HISTORY first processing pass",
        "HISTORY second processing pass",
        "COMMENT   FITS (Flexible Image Transport System)",
    ])
}

fn write_temp(bytes: &[u8], suffix: &str) -> tempfile::TempPath {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write fixture");
    file.into_temp_path()
}

#[test]
fn test_read_primary_header_cards() {
    let path = write_temp(&simple_header(), ".fits");
    let fits = FitsFile::open(path.as_ref()).expect("open fixture");

    let keywords: Vec<&str> = fits.cards().iter().map(|c| c.keyword.as_str()).collect();
    assert_eq!(
        keywords,
        vec![
            "SIMPLE", "BITPIX", "NAXIS", "OBJECT", "CTYPE1", "CRVAL1", "HISTORY", "HISTORY",
            "COMMENT"
        ]
    );

    assert_eq!(fits.cards()[0].value, HeaderValue::Logical(true));
    assert_eq!(fits.cards()[3].value, HeaderValue::Str("M13".to_string()));
    assert_eq!(fits.cards()[5].value, HeaderValue::Real(250.4));
    assert_eq!(
        fits.cards()[6].value,
        HeaderValue::Str("first processing pass".to_string())
    );
}

#[test]
fn test_hdu_summary_for_primary() {
    let bytes = header_block(&[
        "SIMPLE  =                    T",
        "BITPIX  =                  -32",
        "NAXIS   =                    2",
        "NAXIS1  =                    4",
        "NAXIS2  =                    3",
    ]);
    // 4 * 3 float32 pixels, padded to one full data block.
    let mut with_data = bytes;
    with_data.extend_from_slice(&[0u8; BLOCK_SIZE]);

    let path = write_temp(&with_data, ".fits");
    let fits = FitsFile::open(path.as_ref()).expect("open fixture");

    assert_eq!(fits.hdus().len(), 1);
    let hdu = &fits.hdus()[0];
    assert_eq!(hdu.name, "PRIMARY");
    assert_eq!(hdu.hdu_type, "PRIMARY");
    assert_eq!(hdu.card_count, 5);
    assert_eq!(hdu.dimensions, vec![4, 3]);
    assert_eq!(hdu.data_format, "float32");
}

#[test]
fn test_enumerates_image_extension() {
    let mut bytes = header_block(&[
        "SIMPLE  =                    T",
        "BITPIX  =                    8",
        "NAXIS   =                    0",
    ]);
    bytes.extend_from_slice(&header_block(&[
        "XTENSION= 'IMAGE   '",
        "BITPIX  =                   16",
        "NAXIS   =                    1",
        "NAXIS1  =                    2",
        "PCOUNT  =                    0",
        "GCOUNT  =                    1",
        "EXTNAME = 'SCI     '",
    ]));
    bytes.extend_from_slice(&[0u8; BLOCK_SIZE]); // extension data unit

    let path = write_temp(&bytes, ".fits");
    let fits = FitsFile::open(path.as_ref()).expect("open fixture");

    assert_eq!(fits.hdus().len(), 2);
    let ext = &fits.hdus()[1];
    assert_eq!(ext.index, 1);
    assert_eq!(ext.name, "SCI");
    assert_eq!(ext.hdu_type, "IMAGE");
    assert_eq!(ext.dimensions, vec![2]);
    assert_eq!(ext.data_format, "int16");
}

#[test]
fn test_gzipped_input() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&simple_header()).expect("compress");
    let gz = encoder.finish().expect("finish gzip");

    let path = write_temp(&gz, ".fits.gz");
    let fits = FitsFile::open(path.as_ref()).expect("open gzipped fixture");
    assert_eq!(
        fits.cards()[3].value,
        HeaderValue::Str("M13".to_string())
    );
}

#[test]
fn test_missing_file_is_not_found() {
    let err = FitsFile::open(Path::new("/no/such/file.fits")).expect_err("must fail");
    assert!(matches!(err, FitsError::NotFound(_)));
}

#[test]
fn test_non_fits_file_rejected() {
    let mut junk = vec![b'x'; BLOCK_SIZE];
    junk[..3].copy_from_slice(b"not");
    let path = write_temp(&junk, ".fits");
    let err = FitsFile::open(path.as_ref()).expect_err("must fail");
    assert!(matches!(err, FitsError::InvalidFormat(_)));
}

#[test]
fn test_truncated_header_rejected() {
    let path = write_temp(&[b' '; 100], ".fits");
    let err = FitsFile::open(path.as_ref()).expect_err("must fail");
    assert!(matches!(err, FitsError::InvalidFormat(_)));
}
