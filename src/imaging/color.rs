//! Color-mode compatibility between rasters and output formats.
//!
//! Encoders accept a limited set of channel layouts. The rules are a static
//! table: a format with no row accepts every mode, and a row lists the modes
//! the format cannot store plus the conversion that fixes them.
//!
//! | Target | Incompatible modes | Conversion |
//! |---|---|---|
//! | JPEG | RGBA, palette | flatten to RGB |
//! | PNG, BMP, GIF | none | none |

use super::backend::{ColorMode, RasterImage};
use super::params::OutputFormat;

struct ColorRule {
    format: OutputFormat,
    incompatible: &'static [ColorMode],
    convert: fn(RasterImage) -> RasterImage,
}

const COLOR_RULES: &[ColorRule] = &[ColorRule {
    format: OutputFormat::Jpeg,
    incompatible: &[ColorMode::Rgba, ColorMode::Palette],
    convert: RasterImage::into_rgb,
}];

fn rule_for(mode: ColorMode, format: OutputFormat) -> Option<&'static ColorRule> {
    COLOR_RULES
        .iter()
        .find(|rule| rule.format == format && rule.incompatible.contains(&mode))
}

/// Whether `format` can store `mode` without conversion.
pub fn is_compatible(mode: ColorMode, format: OutputFormat) -> bool {
    rule_for(mode, format).is_none()
}

/// Return a raster whose mode the `format` encoder accepts.
///
/// A no-op unless a rule matches. Never fails.
pub fn adapt_color_mode(image: RasterImage, format: OutputFormat) -> RasterImage {
    match rule_for(image.mode(), format) {
        Some(rule) => {
            let from = image.mode();
            let adapted = (rule.convert)(image);
            log::debug!("converted {from} to {} for {format}", adapted.mode());
            adapted
        }
        None => image,
    }
}
