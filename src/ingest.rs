//! Ingestion pipeline — wire payload to application values.
//!
//! Decodes the background (and, for mask-carrying configurations, the mask),
//! applies the transform chain in its fixed order, and converts the results
//! into the configured output representation:
//!
//! ```text
//! decode → coerce mode → resize/crop → invert → mirror → represent
//!                                        mask: decode → flatten → represent
//! ```
//!
//! The order is load-bearing: mirroring must happen after mode/shape
//! normalization, and invert/mirror are not guaranteed to commute with
//! resize/crop at non-integer scale boundaries.
//!
//! An absent background is a valid terminal case (`Ok(None)`), not a
//! failure. Only an undecodable background fails the invocation; an
//! undecodable mask degrades to no mask with a warning.

use crate::config::{CaptureSource, ImageConfig, OutputKind, Tool};
use crate::types::{ApplicationValue, IngestResult, PixelBuffer, WirePayload};
use crate::{cache, codec, transforms};
use image::DynamicImage;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] codec::DecodeError),
    #[error("failed to persist image to cache: {0}")]
    Cache(#[from] cache::CacheError),
}

/// Convert a wire payload into application values per the configuration.
///
/// Returns `Ok(None)` when the payload carries no background — the no-image
/// passthrough. The result's `mask` is populated only for mask-carrying
/// configurations (`sketch` tool with an upload or webcam source) and only
/// when a decodable mask payload was supplied.
pub fn ingest(
    payload: &WirePayload,
    cfg: &ImageConfig,
) -> Result<Option<IngestResult>, IngestError> {
    let Some(back_src) = payload.back.as_deref() else {
        return Ok(None);
    };

    let mask_img = if cfg.expects_mask() {
        payload.mask.as_deref().and_then(|src| {
            codec::decode(src)
                .inspect_err(|err| warn!(%err, "undecodable mask payload, continuing without it"))
                .ok()
        })
    } else {
        None
    };

    let mut img = codec::decode(back_src)?;
    img = transforms::coerce_mode(img, cfg.color_mode);
    if let Some((width, height)) = cfg.fixed_shape {
        img = transforms::resize_and_crop(&img, width, height);
    }
    if cfg.invert_colors {
        img = transforms::invert(img);
    }
    if cfg.capture_source == CaptureSource::Webcam
        && cfg.mirror_on_capture
        && cfg.tool != Tool::ColorSketch
    {
        img = transforms::mirror(&img);
    }

    let mask = mask_img
        .map(|m| represent(transforms::flatten_alpha_mask(m), cfg))
        .transpose()?;
    let back = represent(img, cfg)?;
    Ok(Some(IngestResult { back, mask }))
}

/// Convert a finished raster into the configured output representation.
fn represent(img: DynamicImage, cfg: &ImageConfig) -> Result<ApplicationValue, IngestError> {
    Ok(match cfg.output_kind {
        OutputKind::Array => ApplicationValue::Array(PixelBuffer::from_dynamic(&img)),
        OutputKind::Image => ApplicationValue::Image(img),
        OutputKind::Path => {
            let path = cache::put(&img, &cfg.cache_dir)?;
            ApplicationValue::Path(path.to_string_lossy().into_owned())
        }
    })
}
