//! # Image Processor
//!
//! Resize a raster image and convert it between JPEG, PNG, BMP and GIF.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! Every conversion is one synchronous pass through four stages. Each stage
//! takes ownership of the raster, transforms it, and hands it on:
//!
//! ```text
//! 1. Load     source file  →  RasterImage        (decode, detect color mode)
//! 2. Resize   RasterImage  →  RasterImage        (percentage or exact size, Lanczos3)
//! 3. Adapt    RasterImage  →  RasterImage        (color mode the target format accepts)
//! 4. Encode   RasterImage  →  <dir>/<name>.<fmt> (quality for JPEG, atomic write)
//! ```
//!
//! Front ends never reach into the stages. They assemble a
//! [`pipeline::ConvertRequest`] and call [`pipeline::invoke`]; whatever error
//! a stage produces is returned to them unchanged.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Request assembly, stage orchestration, error taxonomy |
//! | [`imaging`] | Pixel work: backend trait, `image` crate backend, dimension math, color rules |
//! | [`config`] | `config.toml` loading, validation and merging for front-end defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Resize Is a Sum Type
//!
//! [`imaging::ResizeSpec`] is either a percentage or explicit dimensions,
//! never both. A percentage that floors an axis to zero is rejected rather
//! than bumped to one pixel.
//!
//! ## Color Rules Are a Table
//!
//! Format/color-mode compatibility lives in one static table in
//! [`imaging::color`]. Supporting a new output format with restrictions is a
//! new row, not a new branch in the encoder.
//!
//! ## Quality Is Clamped
//!
//! [`imaging::Quality`] clamps into 1–100 on construction. Formats without a
//! quality knob (PNG, BMP, GIF) ignore it.

pub mod config;
pub mod imaging;
pub mod output;
pub mod pipeline;
