//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify / Decode** | `image::ImageReader` (PNG, JPEG, BMP, GIF) |
//! | **Resize** | `resize_exact` with Lanczos3, up or down |
//! | **Color mode** | static rule table ([`color`]) |
//! | **Encode** | `image` codecs, staged through `tempfile` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing the requested output
//! - **Color**: Format/color-mode compatibility rules
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: One function per pipeline stage, combining calculations + backend

pub mod backend;
mod calculations;
pub mod color;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{
    ColorMode, DecodeError, EncodeError, ImageBackend, ImageInfo, RasterImage,
};
pub use calculations::calculate_target_dimensions;
pub use color::adapt_color_mode;
pub use params::{
    Axis, MAX_TARGET_PIXELS, OutputFormat, OutputRequest, Quality, ResizeSpec, ResizeSpecError,
    UnknownFormat,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
