//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ```text
//! photo.png → out/photo.jpeg
//!     Source: 1000x500 RGBA
//!     Output: 500x250 RGB (JPEG, quality 80)
//! ```

use crate::imaging::{ImageInfo, OutputFormat, Quality, supported_input_extensions};
use crate::pipeline::{ConvertReport, RasterSummary};
use std::path::Path;

fn summary(raster: &RasterSummary) -> String {
    format!("{}x{} {}", raster.width, raster.height, raster.mode)
}

/// Format the result of a successful conversion.
pub fn format_convert_output(source: &Path, report: &ConvertReport, quality: Quality) -> Vec<String> {
    let encoding = if report.format.is_lossy() {
        format!("{}, quality {}", report.format, quality.value())
    } else {
        report.format.to_string()
    };
    vec![
        format!(
            "{} \u{2192} {}",
            source.display(),
            report.destination.display()
        ),
        format!("    Source: {}", summary(&report.source)),
        format!("    Output: {} ({})", summary(&report.output), encoding),
    ]
}

pub fn print_convert_output(source: &Path, report: &ConvertReport, quality: Quality) {
    for line in format_convert_output(source, report, quality) {
        println!("{}", line);
    }
}

/// Format what `identify` found out about a file.
pub fn format_identify_output(path: &Path, info: &ImageInfo) -> Vec<String> {
    vec![
        path.display().to_string(),
        format!("    Format: {:?}", info.format),
        format!("    Size: {}x{}", info.width, info.height),
        format!("    Color mode: {}", info.mode),
    ]
}

pub fn print_identify_output(path: &Path, info: &ImageInfo) {
    for line in format_identify_output(path, info) {
        println!("{}", line);
    }
}

/// Format the readable extensions and writable formats.
pub fn format_formats() -> Vec<String> {
    let mut lines = vec![
        "Read".to_string(),
        format!("    {}", supported_input_extensions().join(", ")),
        String::new(),
        "Write".to_string(),
    ];
    for format in OutputFormat::ALL {
        let note = if format.is_lossy() { " (quality 1-100)" } else { "" };
        lines.push(format!("    {} \u{2192} .{}{}", format, format.extension(), note));
    }
    lines
}

pub fn print_formats() {
    for line in format_formats() {
        println!("{}", line);
    }
}
