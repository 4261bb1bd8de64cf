//! Pipeline configuration module.
//!
//! Handles deserializing, validating, and freezing the per-instance options
//! that describe how every image passing through a pipeline instance must be
//! treated. The host hands us an [`ImageOptions`] (typically as JSON with
//! camelCase keys); [`ImageConfig::new`] validates it once and produces the
//! immutable configuration both pipelines borrow for the lifetime of the
//! widget instance.
//!
//! ## Configuration surface
//!
//! ```json
//! {
//!   "outputKind": "array",        // or "numpy" / "image" / "pil" / "path" / "filepath"
//!   "colorMode": "RGB",           // L, LA, RGB, RGBA, L16 (alias "I"), RGB16, RGBA16
//!   "fixedShape": [640, 480],     // optional exact output (width, height)
//!   "invertColors": false,
//!   "captureSource": "upload",    // upload, webcam, canvas
//!   "tool": "editor",             // editor, select, sketch, color-sketch; omit for default
//!   "mirrorOnCapture": true,
//!   "streamingEnabled": false,    // only valid with captureSource = webcam
//!   "cacheDir": "/tmp/imagewire"  // optional; used by the "path" output kind
//! }
//! ```
//!
//! All keys are optional — defaults shown above. Unknown keys and unknown
//! enumeration values are rejected at the parse boundary to catch typos
//! early; nothing is silently coerced.
//!
//! When `tool` is omitted it resolves from the capture source: `sketch` for
//! `canvas`, `editor` otherwise.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: `{value}` (choose from: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("config validation error: {0}")]
    Validation(String),
    #[error("image streaming is only available when the capture source is `webcam`")]
    StreamingRequiresWebcam,
}

/// Which application-facing representation the ingestion pipeline produces.
///
/// The wire-facing strings accept both the representation names and the
/// calibrated host names (`numpy`/`pil`/`filepath`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// Raw numeric pixel buffer, shape `(height, width, channels)`.
    #[serde(rename = "array", alias = "numpy")]
    Array,
    /// In-memory raster handle, passed through unchanged.
    #[serde(rename = "image", alias = "pil")]
    Image,
    /// Path to a file persisted in the content-stable cache.
    #[serde(rename = "path", alias = "filepath")]
    Path,
}

impl FromStr for OutputKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "array" | "numpy" => Ok(Self::Array),
            "image" | "pil" => Ok(Self::Image),
            "path" | "filepath" => Ok(Self::Path),
            other => Err(ConfigError::InvalidChoice {
                field: "outputKind",
                value: other.to_string(),
                expected: "array, image, path (or numpy, pil, filepath)",
            }),
        }
    }
}

/// Target channel layout every ingested raster is coerced into.
///
/// The enumeration covers the layouts an in-memory raster can hold natively:
/// 8- and 16-bit grayscale (with or without alpha) and 8- and 16-bit color.
/// `L16` also answers to the legacy `"I"` identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorMode {
    #[serde(rename = "L")]
    L,
    #[serde(rename = "LA")]
    La,
    #[default]
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "RGBA")]
    Rgba,
    #[serde(rename = "L16", alias = "I")]
    L16,
    #[serde(rename = "RGB16")]
    Rgb16,
    #[serde(rename = "RGBA16")]
    Rgba16,
}

impl ColorMode {
    /// Number of channels a raster in this mode carries.
    pub fn channels(self) -> u8 {
        match self {
            Self::L | Self::L16 => 1,
            Self::La => 2,
            Self::Rgb | Self::Rgb16 => 3,
            Self::Rgba | Self::Rgba16 => 4,
        }
    }

    /// Whether this mode carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::La | Self::Rgba | Self::Rgba16)
    }

    /// The `image` crate color type this mode maps onto.
    pub fn color_type(self) -> image::ColorType {
        match self {
            Self::L => image::ColorType::L8,
            Self::La => image::ColorType::La8,
            Self::Rgb => image::ColorType::Rgb8,
            Self::Rgba => image::ColorType::Rgba8,
            Self::L16 => image::ColorType::L16,
            Self::Rgb16 => image::ColorType::Rgb16,
            Self::Rgba16 => image::ColorType::Rgba16,
        }
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "L" => Ok(Self::L),
            "LA" => Ok(Self::La),
            "RGB" => Ok(Self::Rgb),
            "RGBA" => Ok(Self::Rgba),
            "L16" | "I" => Ok(Self::L16),
            "RGB16" => Ok(Self::Rgb16),
            "RGBA16" => Ok(Self::Rgba16),
            other => Err(ConfigError::InvalidChoice {
                field: "colorMode",
                value: other.to_string(),
                expected: "L, LA, RGB, RGBA, L16, RGB16, RGBA16",
            }),
        }
    }
}

/// Where the background image was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    #[default]
    Upload,
    Webcam,
    Canvas,
}

impl FromStr for CaptureSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "upload" => Ok(Self::Upload),
            "webcam" => Ok(Self::Webcam),
            "canvas" => Ok(Self::Canvas),
            other => Err(ConfigError::InvalidChoice {
                field: "captureSource",
                value: other.to_string(),
                expected: "upload, webcam, canvas",
            }),
        }
    }
}

/// The editing tool active on the widget.
///
/// `Sketch` (with an upload or webcam source) is the only combination that
/// carries a paired mask through ingestion. `ColorSketch` is exempt from
/// webcam mirroring because its mask semantics depend on unmirrored
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Editor,
    Select,
    Sketch,
    ColorSketch,
}

impl FromStr for Tool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "editor" => Ok(Self::Editor),
            "select" => Ok(Self::Select),
            "sketch" => Ok(Self::Sketch),
            "color-sketch" => Ok(Self::ColorSketch),
            other => Err(ConfigError::InvalidChoice {
                field: "tool",
                value: other.to_string(),
                expected: "editor, select, sketch, color-sketch",
            }),
        }
    }
}

/// Raw host-facing options, before validation.
///
/// Deserialize this from the host's JSON, then call [`ImageConfig::new`] to
/// validate and freeze it. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ImageOptions {
    pub output_kind: OutputKind,
    pub color_mode: ColorMode,
    /// Exact output `(width, height)`; `None` keeps the source shape.
    pub fixed_shape: Option<(u32, u32)>,
    pub invert_colors: bool,
    pub capture_source: CaptureSource,
    /// `None` resolves to `sketch` for a canvas source, `editor` otherwise.
    pub tool: Option<Tool>,
    pub mirror_on_capture: bool,
    pub streaming_enabled: bool,
    /// Cache directory for the `path` output kind. `None` resolves to a
    /// crate-named directory under the system temp dir.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            output_kind: OutputKind::Array,
            color_mode: ColorMode::Rgb,
            fixed_shape: None,
            invert_colors: false,
            capture_source: CaptureSource::Upload,
            tool: None,
            mirror_on_capture: true,
            streaming_enabled: false,
            cache_dir: None,
        }
    }
}

impl ImageOptions {
    /// Parse options from a host JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Validated, immutable pipeline configuration.
///
/// Constructed once per widget instance and borrowed by every ingest/egest
/// invocation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    pub output_kind: OutputKind,
    pub color_mode: ColorMode,
    pub fixed_shape: Option<(u32, u32)>,
    pub invert_colors: bool,
    pub capture_source: CaptureSource,
    pub tool: Tool,
    pub mirror_on_capture: bool,
    pub streaming_enabled: bool,
    pub cache_dir: PathBuf,
}

impl ImageConfig {
    /// Validate options and freeze them into a configuration.
    pub fn new(options: ImageOptions) -> Result<Self, ConfigError> {
        if options.streaming_enabled && options.capture_source != CaptureSource::Webcam {
            return Err(ConfigError::StreamingRequiresWebcam);
        }
        if let Some((w, h)) = options.fixed_shape
            && (w == 0 || h == 0)
        {
            return Err(ConfigError::Validation(format!(
                "fixedShape dimensions must be non-zero (got {w}x{h})"
            )));
        }

        let tool = options.tool.unwrap_or(match options.capture_source {
            CaptureSource::Canvas => Tool::Sketch,
            _ => Tool::Editor,
        });

        Ok(Self {
            output_kind: options.output_kind,
            color_mode: options.color_mode,
            fixed_shape: options.fixed_shape,
            invert_colors: options.invert_colors,
            capture_source: options.capture_source,
            tool,
            mirror_on_capture: options.mirror_on_capture,
            streaming_enabled: options.streaming_enabled,
            cache_dir: options
                .cache_dir
                .unwrap_or_else(|| std::env::temp_dir().join("imagewire")),
        })
    }

    /// Parse and validate a host JSON document in one step.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(ImageOptions::from_json(json)?)
    }

    /// Whether ingestion expects a paired mask for this configuration.
    pub fn expects_mask(&self) -> bool {
        self.tool == Tool::Sketch
            && matches!(
                self.capture_source,
                CaptureSource::Upload | CaptureSource::Webcam
            )
    }
}
