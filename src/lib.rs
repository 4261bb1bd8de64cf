//! # Imagewire
//!
//! A bidirectional image transcoding pipeline for widget-embedded image
//! inputs: it converts a transport-level payload (a base64-encoded
//! background image plus an optional base64-encoded mask) into an
//! application-facing representation — a raw pixel buffer, an in-memory
//! raster, or a filesystem path — and converts application results back into
//! a single canonical wire payload.
//!
//! # Architecture: Encode/Decode Duals Around One Configuration
//!
//! ```text
//! wire payload ──> ingest ──> { back, mask? }   (application values)
//!                    │
//!              ImageConfig  (validated once, immutable)
//!                    │
//! application value ──> egest ──> wire payload  (mask always None)
//! ```
//!
//! Both pipelines borrow the same [`ImageConfig`], built once per widget
//! instance. Every invocation is a pure, synchronous decode → transform →
//! encode sequence with no shared mutable state, so independent instances
//! (and independent calls) can run concurrently without any locking.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Host options parsing, validation, and the frozen [`ImageConfig`] |
//! | [`types`] | Wire payload, pixel buffer, and the three-way application value |
//! | [`codec`] | Base64/data-URI/path/URL decode and canonical PNG encode |
//! | [`transforms`] | Pure raster steps: mode coercion, resize/crop, invert, mirror, mask flattening |
//! | [`cache`] | Content-addressed persistence for the `path` output kind |
//! | [`ingest`] | Wire payload → application values (the transform chain) |
//! | [`egest`] | Application value → canonical wire payload |
//!
//! # Design Decisions
//!
//! ## PNG as the Canonical Wire Encoding
//!
//! Inbound payloads may arrive in any format the decoders understand (JPEG,
//! PNG, TIFF, WebP, BMP, GIF); outbound payloads are always PNG `data:`
//! URIs. PNG is lossless and carries every channel layout the pipeline can
//! be configured to produce, so the round trip preserves width, height, and
//! color mode exactly. The one exception: a value egested *by path* passes
//! its original bytes through untouched.
//!
//! ## One Immutable Configuration
//!
//! All options are validated in [`ImageConfig::new`] and frozen. There is no
//! post-construction mutation and no hidden shared state — a deliberate
//! departure from hosts that poke widget attributes after the fact.
//!
//! ## Masks Are Stencils, Not Overlays
//!
//! When a mask carries an alpha channel, only the opacity signal survives:
//! the alpha is replicated across three channels and the color information
//! is discarded. This is a deliberate lossy transform — any non-transparent
//! pixel becomes a marker regardless of its painted color.

pub mod cache;
pub mod codec;
pub mod config;
pub mod egest;
pub mod ingest;
pub mod transforms;
pub mod types;

pub use cache::CacheError;
pub use codec::DecodeError;
pub use config::{
    CaptureSource, ColorMode, ConfigError, ImageConfig, ImageOptions, OutputKind, Tool,
};
pub use egest::{EgestError, egest};
pub use ingest::{IngestError, ingest};
pub use types::{ApplicationValue, IngestResult, PixelBuffer, WirePayload};
