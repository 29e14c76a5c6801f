use std::path::Path;

use derive_more::Display;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};

/// Neither side of a stored headshot may exceed this many pixels.
pub const MAX_HEADSHOT_DIMENSION: u32 = 400;
/// Fixed JPEG quality for every stored headshot.
pub const JPEG_QUALITY: u8 = 70;

const FALLBACK_FILE_STEM: &str = "headshot";

/// A headshot after normalization: opaque, bounded, JPEG-encoded.
#[derive(Debug)]
pub struct NormalizedHeadshot {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Converts an arbitrary uploaded raster image into the stored form:
/// alpha flattened onto white, downscaled so neither dimension exceeds
/// [`MAX_HEADSHOT_DIMENSION`] (never upscaled), re-encoded as JPEG at
/// [`JPEG_QUALITY`]. The raw upload bytes are never stored.
pub fn normalize_headshot(input: &[u8]) -> Result<NormalizedHeadshot, ImageError> {
    let decoded = image::load_from_memory(input)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let flattened = flatten_onto_white(decoded);

    let (width, height) = (flattened.width(), flattened.height());
    let bounded = if width > MAX_HEADSHOT_DIMENSION || height > MAX_HEADSHOT_DIMENSION {
        flattened.thumbnail(MAX_HEADSHOT_DIMENSION, MAX_HEADSHOT_DIMENSION)
    } else {
        flattened
    };

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    bounded
        .write_with_encoder(encoder)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(NormalizedHeadshot {
        bytes,
        width: bounded.width(),
        height: bounded.height(),
    })
}

/// Composites any image with an alpha channel onto an opaque white canvas of
/// the same size, using the alpha channel as the blend mask. Palette images
/// arrive here already promoted to explicit RGB/RGBA by the decoder. Images
/// without alpha pass through, except exotic bit depths which are brought to
/// RGB8 so the JPEG encoder accepts them.
fn flatten_onto_white(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();

        let mut flat = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let alpha = pixel[3] as u32;
            let blend = |channel: u8| -> u8 {
                ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            flat.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
        }
        return DynamicImage::ImageRgb8(flat);
    }

    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// The filename a headshot is stored under: the original stem slugified for
/// filesystem safety, extension always rewritten to `.jpg`.
pub fn normalized_file_name(original: Option<&str>) -> String {
    let stem = original
        .map(Path::new)
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or(FALLBACK_FILE_STEM);

    let slugged = slug::slugify(stem);
    if slugged.is_empty() {
        format!("{FALLBACK_FILE_STEM}.jpg")
    } else {
        format!("{slugged}.jpg")
    }
}

/// Human-readable byte count: `<N> B` under 1 KiB, one decimal of KB under
/// 1 MiB, one decimal of MB above that. 1024 multiplier throughout.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// All errors related to headshot normalization.
#[derive(Debug, Display)]
pub enum ImageError {
    #[display("Could not decode image: {_0}")]
    Decode(String),

    #[display("Could not encode image: {_0}")]
    Encode(String),
}
