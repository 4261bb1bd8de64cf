//! Wire codec adapters — base64/reference decode and base64 encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Base64 | `base64` `STANDARD` engine |
//! | Raster decode (JPEG, PNG, TIFF, WebP, BMP, GIF) | `image::load_from_memory` (format sniffed) |
//! | Raster encode | `image` PNG encoder |
//! | Remote references | `ureq` blocking GET |
//!
//! A wire string resolves to raw bytes in this order: `data:` URI →
//! `http(s)` URL → filesystem path → raw base64. Base64 strings contain
//! `/`, so only explicit path prefixes or files that actually exist are
//! treated as paths.
//!
//! The canonical outbound encoding is a PNG `data:` URI. Referenced files
//! egested by path are base64'd as-is, without re-encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("malformed data URI: missing `;base64,` header")]
    MalformedDataUri,
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read image reference: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch `{url}`: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
}

fn is_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

fn looks_like_path(src: &str) -> bool {
    src.starts_with('/')
        || src.starts_with("./")
        || src.starts_with("../")
        || Path::new(src).exists()
}

fn fetch(url: &str) -> Result<Vec<u8>, DecodeError> {
    let wrap = |source: ureq::Error| DecodeError::Fetch {
        url: url.to_string(),
        source: Box::new(source),
    };
    let mut response = ureq::get(url).call().map_err(wrap)?;
    response.body_mut().read_to_vec().map_err(wrap)
}

/// Resolve a wire string (data URI, URL, file path, or raw base64) to the
/// raw encoded-image bytes it denotes.
pub fn read_reference_bytes(src: &str) -> Result<Vec<u8>, DecodeError> {
    if let Some(rest) = src.strip_prefix("data:") {
        let payload = rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or(DecodeError::MalformedDataUri)?;
        return Ok(BASE64.decode(payload)?);
    }
    if is_url(src) {
        return fetch(src);
    }
    if looks_like_path(src) {
        return Ok(std::fs::read(src)?);
    }
    Ok(BASE64.decode(src.trim())?)
}

/// Decode a wire string into an in-memory raster.
pub fn decode(src: &str) -> Result<DynamicImage, DecodeError> {
    let bytes = read_reference_bytes(src)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Encode a raster as the canonical `data:image/png;base64,...` wire string.
///
/// Float-typed rasters are narrowed to 8 bits first — PNG cannot carry them.
pub fn encode_png(img: &DynamicImage) -> Result<String, image::ImageError> {
    let narrowed;
    let img = match img {
        DynamicImage::ImageRgb32F(_) => {
            narrowed = DynamicImage::ImageRgb8(img.to_rgb8());
            &narrowed
        }
        DynamicImage::ImageRgba32F(_) => {
            narrowed = DynamicImage::ImageRgba8(img.to_rgba8());
            &narrowed
        }
        other => other,
    };
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)))
}

/// Encode already-encoded image bytes as a `data:` URI without transcoding,
/// sniffing the MIME type from the magic bytes.
pub fn encode_bytes(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}
