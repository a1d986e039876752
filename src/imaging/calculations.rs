//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{MAX_TARGET_PIXELS, ResizeSpec, ResizeSpecError};

/// Scale one extent by a whole percentage, rounding down.
fn scale_by_percentage(extent: u32, percent: u32) -> u32 {
    // percent <= 100, so the quotient always fits back into u32
    (u64::from(extent) * u64::from(percent) / 100) as u32
}

/// Calculate the target dimensions for a resize.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `spec` - Percentage of the original, or explicit dimensions
///
/// # Returns
/// * `(width, height)` - Target dimensions, both at least 1
///
/// A percentage that rounds an axis down to zero is an error, never a
/// silent 1px output. Targets above [`MAX_TARGET_PIXELS`] are refused.
pub fn calculate_target_dimensions(
    source: (u32, u32),
    spec: &ResizeSpec,
) -> Result<(u32, u32), ResizeSpecError> {
    let (width, height) = match *spec {
        ResizeSpec::Percentage(p) => {
            if !(1..=100).contains(&p) {
                return Err(ResizeSpecError::PercentageOutOfRange(p));
            }
            (scale_by_percentage(source.0, p), scale_by_percentage(source.1, p))
        }
        ResizeSpec::Dimensions { width, height } => (width, height),
    };

    if width == 0 || height == 0 {
        return Err(ResizeSpecError::ZeroDimension { width, height });
    }
    if u64::from(width) * u64::from(height) > MAX_TARGET_PIXELS {
        return Err(ResizeSpecError::TooLarge { width, height });
    }
    Ok((width, height))
}
