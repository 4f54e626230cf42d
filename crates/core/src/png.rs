//! PNG normalization for cached images.

use std::io::Cursor;

use image::{ImageError, ImageFormat};

/// Return `bytes` as PNG.
///
/// The input is decoded in its detected format so corrupt data is rejected.
/// PNG input is returned unchanged; anything else is re-encoded.
pub fn normalize_png(bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;

    if format == ImageFormat::Png {
        return Ok(bytes.to_vec());
    }

    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
