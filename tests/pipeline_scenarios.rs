//! End-to-end conversions through the real backend.
//!
//! Each test writes a synthetic source into a temp directory, runs
//! `pipeline::convert`, and decodes the result with the `image` crate.

use image::{ColorType, DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use image_processor::imaging::{ColorMode, OutputFormat, Quality, ResizeSpec, ResizeSpecError};
use image_processor::pipeline::{self, ConvertRequest, PipelineError};
use std::path::Path;
use tempfile::TempDir;

fn rgba_source(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, (x % 128 + 64) as u8])
    }))
}

fn rgb_source(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(y % 256) as u8, 40, (x % 256) as u8])
    }))
}

fn write_source(dir: &Path, name: &str, pixels: &DynamicImage, format: ImageFormat) -> std::path::PathBuf {
    let path = dir.join(name);
    pixels.save_with_format(&path, format).unwrap();
    path
}

fn request(
    source: &Path,
    out_dir: &Path,
    resize: ResizeSpec,
    format: OutputFormat,
    quality: u32,
) -> ConvertRequest {
    ConvertRequest::assemble(
        Some(source),
        Some(out_dir),
        "result",
        resize,
        format,
        Quality::new(quality),
    )
    .unwrap()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn rgba_png_to_half_size_jpeg() {
    let src_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let source = write_source(src_dir.path(), "photo.png", &rgba_source(1000, 500), ImageFormat::Png);

    let report = pipeline::convert(&request(
        &source,
        out_dir.path(),
        ResizeSpec::Percentage(50),
        OutputFormat::Jpeg,
        80,
    ))
    .unwrap();

    let dest = out_dir.path().join("result.jpeg");
    assert_eq!(report.destination, dest);
    assert_eq!(report.source.mode, ColorMode::Rgba);
    assert_eq!(report.output.mode, ColorMode::Rgb);

    let bytes = std::fs::read(&dest).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 250));
    assert_eq!(decoded.color(), ColorType::Rgb8);
}

#[test]
fn explicit_dimensions_ignore_aspect_ratio() {
    let src_dir = TempDir::new().unwrap();
    let source = write_source(src_dir.path(), "square.png", &rgb_source(200, 200), ImageFormat::Png);

    let report = pipeline::convert(&request(
        &source,
        src_dir.path(),
        ResizeSpec::Dimensions {
            width: 300,
            height: 100,
        },
        OutputFormat::Png,
        90,
    ))
    .unwrap();

    let decoded = image::open(&report.destination).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (300, 100));
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!(report.source.mode, report.output.mode);
}

#[test]
fn png_round_trip_keeps_size_and_mode() {
    let gray = DynamicImage::ImageLuma8(GrayImage::from_fn(31, 17, |x, _| Luma([(x * 8) as u8])));
    let cases = [
        ("gray.png", gray, ColorMode::Grayscale),
        ("rgb.png", rgb_source(31, 17), ColorMode::Rgb),
        ("rgba.png", rgba_source(31, 17), ColorMode::Rgba),
    ];

    for (name, pixels, mode) in cases {
        let dir = TempDir::new().unwrap();
        let source = write_source(dir.path(), name, &pixels, ImageFormat::Png);
        let out_dir = TempDir::new().unwrap();

        let report = pipeline::convert(&request(
            &source,
            out_dir.path(),
            ResizeSpec::Percentage(100),
            OutputFormat::Png,
            90,
        ))
        .unwrap();

        assert_eq!(report.source.mode, mode, "{name}");
        assert_eq!(report.output.mode, mode, "{name}");

        // Feed the output back in: it must identify the same way
        let info = image_processor::imaging::operations::identify(
            &image_processor::imaging::RustBackend::new(),
            &report.destination,
        )
        .unwrap();
        assert_eq!((info.width, info.height), (31, 17), "{name}");
        assert_eq!(info.mode, mode, "{name}");
    }
}

#[test]
fn palette_gif_to_jpeg_is_flattened() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "anim.gif", &rgba_source(40, 20), ImageFormat::Gif);

    let report = pipeline::convert(&request(
        &source,
        dir.path(),
        ResizeSpec::Percentage(50),
        OutputFormat::Jpeg,
        70,
    ))
    .unwrap();

    assert_eq!(report.source.mode, ColorMode::Palette);
    assert_eq!(report.output.mode, ColorMode::Rgb);
    let decoded = image::open(&report.destination).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (20, 10));
}

#[test]
fn palette_gif_to_gif_keeps_palette_tag() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "anim.gif", &rgba_source(40, 20), ImageFormat::Gif);

    let report = pipeline::convert(&request(
        &source,
        dir.path(),
        ResizeSpec::Percentage(100),
        OutputFormat::Gif,
        70,
    ))
    .unwrap();

    assert_eq!(report.output.mode, ColorMode::Palette);
    assert_eq!(
        image::ImageFormat::from_path(&report.destination).unwrap(),
        ImageFormat::Gif
    );
}

#[test]
fn jpeg_source_to_bmp() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "photo.jpg", &rgb_source(64, 48), ImageFormat::Jpeg);

    let report = pipeline::convert(&request(
        &source,
        dir.path(),
        ResizeSpec::Percentage(25),
        OutputFormat::Bmp,
        1,
    ))
    .unwrap();

    assert_eq!(report.destination, dir.path().join("result.bmp"));
    let decoded = image::open(&report.destination).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 12));
}

#[test]
fn nonexistent_source_is_decode_error_and_writes_nothing() {
    let out_dir = TempDir::new().unwrap();

    let err = pipeline::convert(&request(
        &out_dir.path().join("missing.png"),
        out_dir.path(),
        ResizeSpec::Percentage(50),
        OutputFormat::Png,
        90,
    ))
    .unwrap_err();

    assert!(matches!(err, PipelineError::Decode(_)), "got {err:?}");
    assert!(files_in(out_dir.path()).is_empty());
}

#[test]
fn collapsing_percentage_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "small.png", &rgb_source(50, 50), ImageFormat::Png);

    let err = pipeline::convert(&request(
        &source,
        dir.path(),
        ResizeSpec::Percentage(1),
        OutputFormat::Png,
        90,
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::InvalidResizeSpec(ResizeSpecError::ZeroDimension {
            width: 0,
            height: 0
        })
    ));
    assert_eq!(files_in(dir.path()), ["small.png"]);
}

#[test]
fn missing_destination_directory_is_encode_error() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "photo.png", &rgb_source(20, 20), ImageFormat::Png);
    let missing = dir.path().join("does-not-exist");

    let err = pipeline::convert(&request(
        &source,
        &missing,
        ResizeSpec::Percentage(100),
        OutputFormat::Jpeg,
        90,
    ))
    .unwrap_err();

    match &err {
        PipelineError::Encode(image_processor::imaging::EncodeError::Io { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected an I/O encode error, got {other:?}"),
    }
    assert!(err.to_string().contains("result.jpeg"));
    assert!(!missing.exists());
}

#[test]
fn oversized_explicit_dimensions_are_refused_before_resampling() {
    let dir = TempDir::new().unwrap();
    let source = write_source(dir.path(), "dot.png", &rgb_source(1, 1), ImageFormat::Png);
    let resize = ResizeSpec::from_text("4294967295", "4294967295").unwrap();

    let err = pipeline::convert(&request(&source, dir.path(), resize, OutputFormat::Png, 90))
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::InvalidResizeSpec(ResizeSpecError::TooLarge { .. })
    ));
    assert_eq!(files_in(dir.path()), ["dot.png"]);
}
