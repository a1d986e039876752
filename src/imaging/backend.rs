//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the pixel-touching operations every
//! backend must support: identify, decode, resample, and encode. Everything
//! in between (dimension math, color-mode rules) is pure and lives outside
//! the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{OutputFormat, OutputRequest};
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source could not be turned into a [`RasterImage`].
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a recognized image file", path.display())]
    Unrecognized { path: PathBuf },
    #[error("{} is a {format:?} image, which is not supported", path.display())]
    UnsupportedFormat { path: PathBuf, format: ImageFormat },
    #[error("failed to decode {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} has no pixels", path.display())]
    Empty { path: PathBuf },
}

/// Destination could not be written.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {} as {format}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        format: OutputFormat,
        #[source]
        source: image::ImageError,
    },
}

/// Channel layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Grayscale,
    Rgb,
    Rgba,
    /// The source container stored palette indices. Pixels are held expanded.
    Palette,
}

impl ColorMode {
    /// Mode implied by a decoded pixel layout.
    ///
    /// Anything carrying alpha counts as `Rgba`, including gray + alpha.
    pub fn of(pixels: &DynamicImage) -> Self {
        let color = pixels.color();
        if color.has_alpha() {
            Self::Rgba
        } else if color.has_color() {
            Self::Rgb
        } else {
            Self::Grayscale
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grayscale => "grayscale",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Palette => "palette",
        })
    }
}

/// A decoded image, owned by whichever pipeline stage currently holds it.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: DynamicImage,
    mode: ColorMode,
}

impl RasterImage {
    /// Wrap decoded pixels, inferring the mode from their layout.
    pub fn new(pixels: DynamicImage) -> Self {
        let mode = ColorMode::of(&pixels);
        Self { pixels, mode }
    }

    /// Wrap pixels that came from a palette-indexed container.
    pub fn palette(pixels: DynamicImage) -> Self {
        Self {
            pixels,
            mode: ColorMode::Palette,
        }
    }

    /// Replace the pixels, keeping the current mode tag.
    pub fn with_pixels(self, pixels: DynamicImage) -> Self {
        Self {
            pixels,
            mode: self.mode,
        }
    }

    /// Flatten to 8-bit RGB, dropping alpha and resolving any palette.
    pub fn into_rgb(self) -> Self {
        Self {
            pixels: DynamicImage::ImageRgb8(self.pixels.into_rgb8()),
            mode: ColorMode::Rgb,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub format: ImageFormat,
}

/// Trait for image processing backends.
///
/// Every backend must implement all four operations so the pipeline is
/// backend-agnostic. `Sync` lets independent conversions share one backend.
pub trait ImageBackend: Sync {
    /// Read dimensions, color mode and container format.
    fn identify(&self, path: &Path) -> Result<ImageInfo, DecodeError>;

    /// Decode a file into a raster.
    fn decode(&self, path: &Path) -> Result<RasterImage, DecodeError>;

    /// Resample to exactly `width` x `height`. The mode is preserved.
    fn resample(&self, image: RasterImage, width: u32, height: u32) -> RasterImage;

    /// Serialize to `request.destination`.
    fn encode(&self, image: &RasterImage, request: &OutputRequest) -> Result<(), EncodeError>;
}
