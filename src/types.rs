//! Shared types crossing the pipeline boundaries.
//!
//! [`WirePayload`] is the only shape crossing the transport boundary in
//! either direction. [`ApplicationValue`] is the tagged union handed to (and
//! accepted from) application code; [`PixelBuffer`] backs its `Array`
//! variant. No ownership is shared between invocations — every ingest/egest
//! call produces independent values.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// The transport-level payload: a background image plus an optional mask.
///
/// Each string is a base64-encoded raster (raw or `data:` URI) or a
/// filesystem/URL reference. Outbound payloads always carry `mask: None` —
/// egestion never reconstructs a mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WirePayload {
    pub back: Option<String>,
    pub mask: Option<String>,
}

impl WirePayload {
    /// An outbound payload wrapping an already-encoded background.
    pub fn outbound(back: String) -> Self {
        Self {
            back: Some(back),
            mask: None,
        }
    }
}

/// Raw numeric pixel data in `(height, width, channels)` row-major order,
/// values in `[0, 255]`.
///
/// Rasters wider than 8 bits per channel are narrowed to 8 bits on
/// conversion; the buffer representation is byte-valued by contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl PixelBuffer {
    /// Snapshot a raster into a raw buffer.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        use DynamicImage::*;
        let (width, height) = (img.width(), img.height());
        let (data, channels) = match img {
            ImageLuma8(b) => (b.as_raw().clone(), 1),
            ImageLumaA8(b) => (b.as_raw().clone(), 2),
            ImageRgb8(b) => (b.as_raw().clone(), 3),
            ImageRgba8(b) => (b.as_raw().clone(), 4),
            ImageLuma16(_) => (img.to_luma8().into_raw(), 1),
            ImageLumaA16(_) => (img.to_luma_alpha8().into_raw(), 2),
            ImageRgb16(_) | ImageRgb32F(_) => (img.to_rgb8().into_raw(), 3),
            _ => (img.to_rgba8().into_raw(), 4),
        };
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Rebuild a raster from the buffer.
    ///
    /// Returns `None` when the shape matches no raster layout: a channel
    /// count outside 1–4, or a data length that disagrees with
    /// `width * height * channels`.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.data.len() != expected {
            return None;
        }
        let data = self.data.clone();
        match self.channels {
            1 => image::GrayImage::from_raw(self.width, self.height, data)
                .map(DynamicImage::ImageLuma8),
            2 => image::GrayAlphaImage::from_raw(self.width, self.height, data)
                .map(DynamicImage::ImageLumaA8),
            3 => image::RgbImage::from_raw(self.width, self.height, data)
                .map(DynamicImage::ImageRgb8),
            4 => image::RgbaImage::from_raw(self.width, self.height, data)
                .map(DynamicImage::ImageRgba8),
            _ => None,
        }
    }
}

/// An application-level image value, in one of exactly three representation
/// kinds.
///
/// Produced by ingestion (per the configured output kind) and accepted by
/// egestion (dispatching on the runtime variant, whatever was configured).
#[derive(Debug, Clone)]
pub enum ApplicationValue {
    /// Raw numeric pixel buffer.
    Array(PixelBuffer),
    /// In-memory raster handle.
    Image(DynamicImage),
    /// Filesystem path or URL pointing at image bytes.
    Path(String),
}

impl ApplicationValue {
    /// Stable tag naming the representation kind, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Image(_) => "image",
            Self::Path(_) => "path",
        }
    }
}

/// What ingestion hands the application: the transformed background and,
/// for mask-carrying tool/source combinations, the flattened mask.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub back: ApplicationValue,
    pub mask: Option<ApplicationValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn wire_payload_outbound_has_no_mask() {
        let p = WirePayload::outbound("data:image/png;base64,AAAA".into());
        assert!(p.back.is_some());
        assert!(p.mask.is_none());
    }

    #[test]
    fn wire_payload_serializes_mask_as_null() {
        let json = serde_json::to_string(&WirePayload::outbound("x".into())).unwrap();
        assert_eq!(json, r#"{"back":"x","mask":null}"#);
    }

    #[test]
    fn wire_payload_deserializes_missing_fields() {
        let p: WirePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(p, WirePayload::default());
    }

    #[test]
    fn pixel_buffer_round_trips_rgb() {
        let img = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 7]));
        let original = DynamicImage::ImageRgb8(img);

        let buf = PixelBuffer::from_dynamic(&original);
        assert_eq!(buf.width, 3);
        assert_eq!(buf.height, 2);
        assert_eq!(buf.channels, 3);
        assert_eq!(buf.data.len(), 3 * 2 * 3);

        let rebuilt = buf.to_dynamic().unwrap();
        assert_eq!(rebuilt.to_rgb8(), original.to_rgb8());
    }

    #[test]
    fn pixel_buffer_narrows_sixteen_bit_to_bytes() {
        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_pixel(
            2,
            2,
            image::Luma([0xFFFFu16]),
        );
        let buf = PixelBuffer::from_dynamic(&DynamicImage::ImageLuma16(img));
        assert_eq!(buf.channels, 1);
        assert!(buf.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn pixel_buffer_rejects_bad_channel_count() {
        let buf = PixelBuffer {
            data: vec![0; 10],
            width: 1,
            height: 2,
            channels: 5,
        };
        assert!(buf.to_dynamic().is_none());
    }

    #[test]
    fn pixel_buffer_rejects_length_mismatch() {
        let buf = PixelBuffer {
            data: vec![0; 11],
            width: 2,
            height: 2,
            channels: 3,
        };
        assert!(buf.to_dynamic().is_none());
    }

    #[test]
    fn application_value_kind_tags() {
        let buf = PixelBuffer {
            data: vec![0; 3],
            width: 1,
            height: 1,
            channels: 3,
        };
        assert_eq!(ApplicationValue::Array(buf).kind(), "array");
        assert_eq!(
            ApplicationValue::Image(DynamicImage::new_rgb8(1, 1)).kind(),
            "image"
        );
        assert_eq!(ApplicationValue::Path("/tmp/x.png".into()).kind(), "path");
    }
}
