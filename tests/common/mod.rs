//! Fixtures shared by the integration tests.

/// Build a minimal JPEG whose EXIF block carries `datetime` (in EXIF's
/// `YYYY:MM:DD HH:MM:SS` form) as the IFD0 `DateTime` tag.
///
/// `body` is stored in a comment segment so callers can make otherwise
/// identical fixtures differ byte-wise.
pub fn jpeg_with_exif_date(datetime: &str, body: &[u8]) -> Vec<u8> {
    assert_eq!(datetime.len(), 19, "EXIF datetimes are 19 characters");

    // Big-endian TIFF header, IFD0 at offset 8 with a single ASCII entry
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0132u16.to_be_bytes()); // DateTime
    tiff.extend_from_slice(&2u16.to_be_bytes()); // ASCII
    tiff.extend_from_slice(&20u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes()); // value follows the IFD
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);

    let mut jpeg = vec![0xFF, 0xD8];

    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);

    jpeg.extend_from_slice(&[0xFF, 0xFE]);
    jpeg.extend_from_slice(&((2 + body.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(body);

    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
