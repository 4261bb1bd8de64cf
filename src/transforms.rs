//! Pure raster transforms applied by the ingestion pipeline.
//!
//! Every function here is a pure `DynamicImage → DynamicImage` step with no
//! I/O, applied by [`ingest`](crate::ingest) in a fixed order: mode coercion
//! → resize/crop → invert → mirror. Invert and mirror are involutions;
//! resize/crop and mode coercion are deliberately lossy.

use crate::config::ColorMode;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// Coerce a raster into the configured channel layout.
///
/// Lossy conversions (alpha dropped, channels collapsed, bit depth reduced)
/// are expected here and reported as debug events, never as errors.
pub fn coerce_mode(img: DynamicImage, mode: ColorMode) -> DynamicImage {
    let current = img.color();
    if current == mode.color_type() {
        return img;
    }

    let target = mode.color_type();
    if (current.has_alpha() && !target.has_alpha())
        || current.channel_count() > target.channel_count()
        || current.bits_per_pixel() / current.channel_count() as u16
            > target.bits_per_pixel() / target.channel_count() as u16
    {
        debug!(from = ?current, to = ?target, "lossy color mode coercion");
    }

    match mode {
        ColorMode::L => DynamicImage::ImageLuma8(img.to_luma8()),
        ColorMode::La => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        ColorMode::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
        ColorMode::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
        ColorMode::L16 => DynamicImage::ImageLuma16(img.to_luma16()),
        ColorMode::Rgb16 => DynamicImage::ImageRgb16(img.to_rgb16()),
        ColorMode::Rgba16 => DynamicImage::ImageRgba16(img.to_rgba16()),
    }
}

/// Resize to exactly `(width, height)`, preserving aspect by center-cropping
/// the overflowing dimension rather than distorting.
pub fn resize_and_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Invert all color channels (`max − value` per channel). Alpha untouched.
pub fn invert(mut img: DynamicImage) -> DynamicImage {
    img.invert();
    img
}

/// Flip horizontally. Corrects the webcam capture mirror.
pub fn mirror(img: &DynamicImage) -> DynamicImage {
    img.fliph()
}

/// Flatten an alpha-carrying mask into an opacity-only stencil.
///
/// The alpha channel encodes the painted regions; its value is replicated
/// across three channels to produce a grayscale-as-RGB mask. Color
/// information is intentionally discarded — masks are binary stencils, not
/// colored overlays. Masks without an alpha channel pass through unchanged.
pub fn flatten_alpha_mask(mask: DynamicImage) -> DynamicImage {
    if !mask.color().has_alpha() {
        return mask;
    }
    let rgba = mask.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let a = rgba.get_pixel(x, y)[3];
        Rgb([a, a, a])
    });
    DynamicImage::ImageRgb8(flat)
}
