//! Egestion pipeline — application value to canonical wire payload.
//!
//! Dispatch is on the *runtime variant* of the value, never on the
//! configured output kind: the value an application hands back for output
//! may differ in kind from what was configured for input, and all three
//! representations must be accepted. Whatever the input shape, the output
//! is always a single base64 payload with no mask.

use crate::codec;
use crate::config::ImageConfig;
use crate::types::{ApplicationValue, WirePayload};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum EgestError {
    /// The value matches none of the known raster layouts. A caller
    /// programming error — never silently coerced to a default.
    #[error("cannot process this value as an image: {0}")]
    UnsupportedValue(String),
    #[error(transparent)]
    Decode(#[from] codec::DecodeError),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Convert an application value into the canonical wire payload.
///
/// `None` in, `None` out — the explicit no-value passthrough. The returned
/// payload's `mask` is always `None`; egestion never reconstructs a mask.
pub fn egest(
    value: Option<&ApplicationValue>,
    cfg: &ImageConfig,
) -> Result<Option<WirePayload>, EgestError> {
    let Some(value) = value else {
        return Ok(None);
    };
    debug!(kind = value.kind(), output_kind = ?cfg.output_kind, "encoding outbound payload");

    let back = match value {
        ApplicationValue::Array(buf) => {
            let img = buf.to_dynamic().ok_or_else(|| {
                EgestError::UnsupportedValue(format!(
                    "{}x{} buffer with {} channel(s) and {} bytes",
                    buf.width,
                    buf.height,
                    buf.channels,
                    buf.data.len()
                ))
            })?;
            codec::encode_png(&img)?
        }
        ApplicationValue::Image(img) => codec::encode_png(img)?,
        // File paths and URLs pass their bytes through without re-encoding.
        ApplicationValue::Path(reference) => {
            codec::encode_bytes(&codec::read_reference_bytes(reference)?)
        }
    };
    Ok(Some(WirePayload::outbound(back)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImageOptions, OutputKind};
    use crate::types::PixelBuffer;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn cfg() -> ImageConfig {
        ImageConfig::new(ImageOptions::default()).unwrap()
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40 % 256) as u8, (y * 60 % 256) as u8, 33])
        }))
    }

    // =========================================================================
    // Terminal cases
    // =========================================================================

    #[test]
    fn none_in_none_out() {
        assert!(egest(None, &cfg()).unwrap().is_none());
    }

    #[test]
    fn none_in_none_out_for_every_output_kind() {
        for kind in [OutputKind::Array, OutputKind::Image, OutputKind::Path] {
            let c = ImageConfig::new(ImageOptions {
                output_kind: kind,
                ..ImageOptions::default()
            })
            .unwrap();
            assert!(egest(None, &c).unwrap().is_none());
        }
    }

    // =========================================================================
    // Variant dispatch
    // =========================================================================

    #[test]
    fn image_value_encodes_to_png_data_uri_without_mask() {
        let payload = egest(Some(&ApplicationValue::Image(gradient(5, 4))), &cfg())
            .unwrap()
            .unwrap();
        assert!(payload.back.unwrap().starts_with("data:image/png;base64,"));
        assert!(payload.mask.is_none());
    }

    #[test]
    fn array_value_round_trips_shape_and_mode() {
        let img = gradient(6, 3);
        let buf = PixelBuffer::from_dynamic(&img);
        let payload = egest(Some(&ApplicationValue::Array(buf)), &cfg())
            .unwrap()
            .unwrap();

        let back = crate::codec::decode(payload.back.as_deref().unwrap()).unwrap();
        assert_eq!((back.width(), back.height()), (6, 3));
        assert_eq!(back.color(), image::ColorType::Rgb8);
        assert_eq!(back.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn path_value_passes_bytes_through_unmodified() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("source.png");
        let mut bytes = Vec::new();
        gradient(4, 4)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, &bytes).unwrap();

        let value = ApplicationValue::Path(path.to_string_lossy().into_owned());
        let payload = egest(Some(&value), &cfg()).unwrap().unwrap();
        let wire = payload.back.unwrap();

        let b64 = wire.split_once(";base64,").unwrap().1;
        assert_eq!(BASE64.decode(b64).unwrap(), bytes);
        assert!(payload.mask.is_none());
    }

    #[test]
    fn missing_path_reference_errors() {
        let value = ApplicationValue::Path("/nonexistent/out.png".into());
        let err = egest(Some(&value), &cfg()).unwrap_err();
        assert!(matches!(err, EgestError::Decode(_)));
    }

    // =========================================================================
    // Defensive terminal case
    // =========================================================================

    #[test]
    fn unsupported_channel_count_fails_for_every_config() {
        let buf = PixelBuffer {
            data: vec![0; 2 * 2 * 5],
            width: 2,
            height: 2,
            channels: 5,
        };
        for kind in [OutputKind::Array, OutputKind::Image, OutputKind::Path] {
            let c = ImageConfig::new(ImageOptions {
                output_kind: kind,
                ..ImageOptions::default()
            })
            .unwrap();
            let err = egest(Some(&ApplicationValue::Array(buf.clone())), &c).unwrap_err();
            assert!(matches!(err, EgestError::UnsupportedValue(_)));
        }
    }

    #[test]
    fn shape_length_mismatch_is_unsupported() {
        let buf = PixelBuffer {
            data: vec![0; 7],
            width: 2,
            height: 2,
            channels: 3,
        };
        let err = egest(Some(&ApplicationValue::Array(buf)), &cfg()).unwrap_err();
        assert!(matches!(err, EgestError::UnsupportedValue(_)));
    }
}
