//! The conversion pipeline: load → resize → adapt color mode → encode.
//!
//! A front end assembles a [`ConvertRequest`] from user input and calls
//! [`invoke`]. Every invocation is one synchronous pass that owns its raster
//! from start to finish:
//!
//! ```text
//! Idle → Loading → Resizing → AdaptingColor → Encoding → Done
//!            ↘          ↘                         ↘
//!                          Failed
//! ```
//!
//! Errors from each stage are passed through unchanged inside
//! [`PipelineError`]; nothing is retried and there is no fallback format or
//! quality.

use crate::imaging::{
    ColorMode, DecodeError, EncodeError, ImageBackend, OutputFormat, OutputRequest, Quality,
    RasterImage, ResizeSpec, ResizeSpecError, RustBackend, adapt_color_mode, operations,
};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A precondition the caller did not meet before invoking the pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInputError {
    #[error("no image loaded")]
    Source,
    #[error("no output folder selected")]
    OutputDir,
    #[error("no output file name given")]
    FileName,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    InvalidResizeSpec(#[from] ResizeSpecError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    MissingInput(#[from] MissingInputError),
}

/// Pipeline stage, used to label progress in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Resizing,
    AdaptingColor,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Resizing => "resizing",
            Self::AdaptingColor => "adapting color",
            Self::Encoding => "encoding",
        })
    }
}

/// Everything one conversion needs, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertRequest {
    pub source: PathBuf,
    pub resize: ResizeSpec,
    pub output: OutputRequest,
}

impl ConvertRequest {
    /// Build a request from the loose values a front end collects.
    ///
    /// The destination is `<output_dir>/<name>.<format extension>`.
    pub fn assemble(
        source: Option<&Path>,
        output_dir: Option<&Path>,
        name: &str,
        resize: ResizeSpec,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Self, MissingInputError> {
        let (source, output_dir) = require_locations(source, output_dir)?;
        let name = require_name(name)?;
        Ok(Self::resolved(source, output_dir, name, resize, format, quality))
    }

    /// Like [`assemble`](Self::assemble), but the resize is still raw user
    /// input.
    ///
    /// Checks run in the order a user fills the form in: source, output
    /// folder, resize, name. The first failure is the one reported.
    pub fn from_user_input(
        source: Option<&Path>,
        output_dir: Option<&Path>,
        name: &str,
        resize: impl FnOnce() -> Result<ResizeSpec, ResizeSpecError>,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Self, PipelineError> {
        let (source, output_dir) = require_locations(source, output_dir)?;
        let resize = resize()?;
        let name = require_name(name)?;
        Ok(Self::resolved(source, output_dir, name, resize, format, quality))
    }

    fn resolved(
        source: &Path,
        output_dir: &Path,
        name: &str,
        resize: ResizeSpec,
        format: OutputFormat,
        quality: Quality,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            resize,
            output: OutputRequest {
                format,
                quality,
                destination: destination_path(output_dir, name, format),
            },
        }
    }
}

fn require_locations<'a>(
    source: Option<&'a Path>,
    output_dir: Option<&'a Path>,
) -> Result<(&'a Path, &'a Path), MissingInputError> {
    let source = source
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(MissingInputError::Source)?;
    let output_dir = output_dir
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(MissingInputError::OutputDir)?;
    Ok((source, output_dir))
}

fn require_name(name: &str) -> Result<&str, MissingInputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MissingInputError::FileName);
    }
    Ok(name)
}

/// `<dir>/<name>.<lowercase format name>`.
pub fn destination_path(dir: &Path, name: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", name, format.extension()))
}

/// Size and mode of a raster at one end of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSummary {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
}

impl From<&RasterImage> for RasterSummary {
    fn from(image: &RasterImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            mode: image.mode(),
        }
    }
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    pub source: RasterSummary,
    pub output: RasterSummary,
    pub format: OutputFormat,
    pub destination: PathBuf,
}

/// Run one conversion with the given backend.
pub fn invoke(
    backend: &impl ImageBackend,
    request: &ConvertRequest,
) -> Result<ConvertReport, PipelineError> {
    log::debug!("{}: {}", Stage::Loading, request.source.display());
    let image = operations::load(backend, &request.source)?;
    let source = RasterSummary::from(&image);

    log::debug!("{}: {:?}", Stage::Resizing, request.resize);
    let image = operations::resize(backend, image, &request.resize)?;

    log::debug!("{}: {} for {}", Stage::AdaptingColor, image.mode(), request.output.format);
    let image = adapt_color_mode(image, request.output.format);

    log::debug!("{}: {}", Stage::Encoding, request.output.destination.display());
    operations::encode(backend, &image, &request.output)?;

    let report = ConvertReport {
        source,
        output: RasterSummary::from(&image),
        format: request.output.format,
        destination: request.output.destination.clone(),
    };
    log::info!(
        "wrote {} ({}x{} {})",
        report.destination.display(),
        report.output.width,
        report.output.height,
        report.format
    );
    Ok(report)
}

/// Run one conversion with [`RustBackend`].
pub fn convert(request: &ConvertRequest) -> Result<ConvertReport, PipelineError> {
    invoke(&RustBackend::new(), request)
}
