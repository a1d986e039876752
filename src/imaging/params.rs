//! Parameter types for the conversion pipeline.
//!
//! These types describe *what* to produce, not *how*. They are the interface
//! between the caller (which assembles a request from user input) and the
//! [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: The closed set of writable formats.
//! - [`ResizeSpec`]: Either a percentage of the source size or explicit dimensions.
//! - [`OutputRequest`]: Format, quality and fully resolved destination path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Quality setting for lossy image encoding (1-100).
///
/// Out-of-range values are clamped rather than rejected. Only JPEG uses it;
/// the lossless formats ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Writable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Jpeg, Self::Png, Self::Bmp, Self::Gif];

    /// Lowercase format name, used as the output file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
        }
    }

    /// Whether the encoder honours [`Quality`].
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output format {0:?} (expected jpeg, png, bmp or gif)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Which side of the image a dimension error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Width => "width",
            Self::Height => "height",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeSpecError {
    #[error("resize percentage must be 1-100, got {0}")]
    PercentageOutOfRange(u32),
    #[error("{axis} must be a positive integer, got {input:?}")]
    NotPositiveInteger { axis: Axis, input: String },
    #[error("resize target {width}x{height} has a zero dimension")]
    ZeroDimension { width: u32, height: u32 },
    #[error(
        "resize target {width}x{height} exceeds the limit of {limit} pixels",
        limit = MAX_TARGET_PIXELS
    )]
    TooLarge { width: u32, height: u32 },
}

/// Largest output, in pixels (width × height), a resize may produce.
///
/// 16384 × 16384. Resampling allocates the whole target up front, so larger
/// requests are refused before any pixel work.
pub const MAX_TARGET_PIXELS: u64 = 1 << 28;

/// How to size the output.
///
/// `Dimensions` are taken verbatim; the aspect ratio is not preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSpec {
    Percentage(u32),
    Dimensions { width: u32, height: u32 },
}

impl ResizeSpec {
    pub fn percentage(percent: u32) -> Result<Self, ResizeSpecError> {
        if !(1..=100).contains(&percent) {
            return Err(ResizeSpecError::PercentageOutOfRange(percent));
        }
        Ok(Self::Percentage(percent))
    }

    pub fn dimensions(width: u32, height: u32) -> Result<Self, ResizeSpecError> {
        if width == 0 || height == 0 {
            return Err(ResizeSpecError::ZeroDimension { width, height });
        }
        Ok(Self::Dimensions { width, height })
    }

    /// Parse explicit dimensions from free-form text fields.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a positive
    /// integer (empty, negative, fractional, zero) is rejected.
    pub fn from_text(width: &str, height: &str) -> Result<Self, ResizeSpecError> {
        Ok(Self::Dimensions {
            width: parse_extent(Axis::Width, width)?,
            height: parse_extent(Axis::Height, height)?,
        })
    }
}

fn parse_extent(axis: Axis, input: &str) -> Result<u32, ResizeSpecError> {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ResizeSpecError::NotPositiveInteger {
            axis,
            input: input.to_string(),
        }),
    }
}

/// Everything the encoder needs: format, quality and where to write.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRequest {
    pub format: OutputFormat,
    pub quality: Quality,
    pub destination: PathBuf,
}
