//! High-level image operations.
//!
//! These functions combine calculations with backend execution. Each one is
//! a single pipeline stage: it takes ownership of the raster it transforms
//! and hands back a new one.

use super::backend::{DecodeError, EncodeError, ImageBackend, ImageInfo, RasterImage};
use super::calculations::calculate_target_dimensions;
use super::params::{OutputRequest, ResizeSpec, ResizeSpecError};
use std::path::Path;

/// Get dimensions, mode and container format using the backend.
pub fn identify(backend: &impl ImageBackend, path: &Path) -> Result<ImageInfo, DecodeError> {
    backend.identify(path)
}

/// Decode the source file.
pub fn load(backend: &impl ImageBackend, path: &Path) -> Result<RasterImage, DecodeError> {
    let image = backend.decode(path)?;
    log::debug!(
        "loaded {} ({}x{}, {})",
        path.display(),
        image.width(),
        image.height(),
        image.mode()
    );
    Ok(image)
}

/// Resample to the size `spec` asks for.
///
/// The target is validated before any pixel work, so a resize that collapses
/// an axis to zero fails without resampling.
pub fn resize(
    backend: &impl ImageBackend,
    image: RasterImage,
    spec: &ResizeSpec,
) -> Result<RasterImage, ResizeSpecError> {
    let source = image.dimensions();
    let (width, height) = calculate_target_dimensions(source, spec)?;
    log::debug!(
        "resampling {}x{} -> {width}x{height} (lanczos3)",
        source.0,
        source.1
    );
    Ok(backend.resample(image, width, height))
}

/// Encode to the requested format at the resolved destination.
pub fn encode(
    backend: &impl ImageBackend,
    image: &RasterImage,
    request: &OutputRequest,
) -> Result<(), EncodeError> {
    if !request.format.is_lossy() {
        log::debug!("{} is lossless, quality ignored", request.format);
    }
    backend.encode(image, request)
}
