//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, GIF) | `image::ImageReader` with content sniffing |
//! | Palette detection | container header byte (PNG IHDR, BMP bit count); GIF is always indexed |
//! | Resample | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG / PNG / BMP | `image::codecs::{jpeg, png, bmp}` |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` (quantized RGBA frame) |
//! | Atomic write | `tempfile` in the destination directory, renamed on success |

use super::backend::{ColorMode, DecodeError, EncodeError, ImageBackend, ImageInfo, RasterImage};
use super::params::{OutputFormat, OutputRequest, Quality};
use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, Frame, ImageFormat, ImageReader, ImageResult};
use std::borrow::Cow;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Container formats the loader accepts, with their usual extensions.
const READ_FORMATS: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
];

/// Returns the file extensions the loader accepts.
pub fn supported_input_extensions() -> Vec<&'static str> {
    READ_FORMATS.iter().map(|(ext, _)| *ext).collect()
}

fn is_readable(format: ImageFormat) -> bool {
    READ_FORMATS.iter().any(|(_, f)| *f == format)
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the container stores palette indices rather than direct color.
///
/// The decoder expands palettes, so this can only be read off the header.
fn stores_palette_indices(format: ImageFormat, header: &[u8]) -> bool {
    match format {
        ImageFormat::Gif => true,
        // 8-byte signature, IHDR length + tag, width, height, bit depth, then color type
        ImageFormat::Png => header.get(25) == Some(&3),
        ImageFormat::Bmp => {
            // OS/2 core headers (12 bytes) keep the bit count earlier
            let dib_size = header
                .get(14..18)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
            let offset = if dib_size == Some(12) { 24 } else { 28 };
            header
                .get(offset..offset + 2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .is_some_and(|bits| bits <= 8)
        }
        _ => false,
    }
}

/// Read and decode a source file, reporting its container format.
fn read_source(path: &Path) -> Result<(RasterImage, ImageFormat), DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }
    let format = reader.format().ok_or_else(|| DecodeError::Unrecognized {
        path: path.to_path_buf(),
    })?;
    if !is_readable(format) {
        return Err(DecodeError::UnsupportedFormat {
            path: path.to_path_buf(),
            format,
        });
    }

    let pixels = reader.decode().map_err(|source| DecodeError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }

    let image = if stores_palette_indices(format, &bytes) {
        RasterImage::palette(pixels)
    } else {
        RasterImage::new(pixels)
    };
    Ok((image, format))
}

/// Narrow 16-bit and float layouts to 8 bits, keeping the channel layout.
fn to_eight_bit(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    match pixels.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
            Cow::Borrowed(pixels)
        }
        ColorType::L16 => Cow::Owned(DynamicImage::ImageLuma8(pixels.to_luma8())),
        ColorType::La16 => Cow::Owned(DynamicImage::ImageLumaA8(pixels.to_luma_alpha8())),
        color if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(pixels.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(pixels.to_rgb8())),
    }
}

/// Serialize `image` in `format` to `writer`.
///
/// Quality is only consulted for JPEG. Every encoder is dropped before this
/// returns so trailers (GIF) reach the writer.
fn write_encoded<W: Write>(
    image: &RasterImage,
    format: OutputFormat,
    quality: Quality,
    writer: &mut W,
) -> ImageResult<()> {
    let pixels = image.pixels();
    match format {
        OutputFormat::Jpeg => {
            // Quality::new keeps the value within 1..=100
            let encoder = JpegEncoder::new_with_quality(&mut *writer, quality.value() as u8);
            to_eight_bit(pixels).write_with_encoder(encoder)
        }
        OutputFormat::Png => pixels.write_with_encoder(PngEncoder::new(&mut *writer)),
        OutputFormat::Bmp => to_eight_bit(pixels).write_with_encoder(BmpEncoder::new(writer)),
        OutputFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut *writer);
            encoder.encode_frame(Frame::new(pixels.to_rgba8()))
        }
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<ImageInfo, DecodeError> {
        let (image, format) = read_source(path)?;
        Ok(ImageInfo {
            width: image.width(),
            height: image.height(),
            mode: image.mode(),
            format,
        })
    }

    fn decode(&self, path: &Path) -> Result<RasterImage, DecodeError> {
        read_source(path).map(|(image, _)| image)
    }

    fn resample(&self, image: RasterImage, width: u32, height: u32) -> RasterImage {
        let resized = image
            .pixels()
            .resize_exact(width, height, FilterType::Lanczos3);
        image.with_pixels(resized)
    }

    fn encode(&self, image: &RasterImage, request: &OutputRequest) -> Result<(), EncodeError> {
        let destination = &request.destination;
        let io_error = |source| EncodeError::Io {
            path: destination.clone(),
            source,
        };

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = staging_builder().tempfile_in(dir).map_err(io_error)?;

        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            write_encoded(image, request.format, request.quality, &mut writer).map_err(
                |source| EncodeError::Serialize {
                    path: destination.clone(),
                    format: request.format,
                    source,
                },
            )?;
            writer.flush().map_err(io_error)?;
        }

        staged
            .persist(destination)
            .map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

/// Builder for the file an encoder writes into before it is renamed onto
/// the destination.
///
/// `tempfile` creates owner-only files by default. The staged file becomes
/// the output, so on unix it is created like any other new file: 0o666
/// narrowed by the process umask.
fn staging_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".image-processor-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}
