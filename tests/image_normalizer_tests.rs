use std::io::Cursor;

use alumni_backend::utils::image::{
    format_file_size, normalize_headshot, normalized_file_name, ImageError,
    MAX_HEADSHOT_DIMENSION,
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    bytes
}

#[test]
fn large_image_is_bounded_preserving_aspect() {
    let input = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        1000,
        500,
        Rgb([30, 60, 90]),
    )));

    let normalized = normalize_headshot(&input).unwrap();

    assert_eq!((normalized.width, normalized.height), (400, 200));
    assert!(normalized.width <= MAX_HEADSHOT_DIMENSION);
    assert!(normalized.height <= MAX_HEADSHOT_DIMENSION);
}

#[test]
fn tall_image_is_bounded_on_its_long_side() {
    let input = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        300,
        1200,
        Rgb([30, 60, 90]),
    )));

    let normalized = normalize_headshot(&input).unwrap();

    assert_eq!((normalized.width, normalized.height), (100, 400));
}

#[test]
fn small_image_is_never_upscaled() {
    let input = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        120,
        90,
        Rgb([200, 200, 200]),
    )));

    let normalized = normalize_headshot(&input).unwrap();

    assert_eq!((normalized.width, normalized.height), (120, 90));
}

#[test]
fn output_is_always_jpeg() {
    let input = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        10,
        10,
        Rgb([1, 2, 3]),
    )));

    let normalized = normalize_headshot(&input).unwrap();

    assert_eq!(
        image::guess_format(&normalized.bytes).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn transparency_is_flattened_onto_white() {
    let input = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        40,
        40,
        Rgba([200, 40, 40, 128]),
    )));

    let normalized = normalize_headshot(&input).unwrap();
    let decoded = image::load_from_memory(&normalized.bytes).unwrap().to_rgb8();
    let pixel = decoded.get_pixel(20, 20).0;

    // (200, 40, 40) at half alpha over white lands near (227, 147, 147).
    assert!((pixel[0] as i32 - 227).abs() <= 12, "red channel was {}", pixel[0]);
    assert!((pixel[1] as i32 - 147).abs() <= 12, "green channel was {}", pixel[1]);
    assert!((pixel[2] as i32 - 147).abs() <= 12, "blue channel was {}", pixel[2]);
}

#[test]
fn fully_transparent_pixels_become_white() {
    let input = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        16,
        16,
        Rgba([13, 13, 13, 0]),
    )));

    let normalized = normalize_headshot(&input).unwrap();
    let decoded = image::load_from_memory(&normalized.bytes).unwrap().to_rgb8();
    let pixel = decoded.get_pixel(8, 8).0;

    assert!(pixel.iter().all(|&c| c >= 243), "expected white, got {:?}", pixel);
}

#[test]
fn grayscale_input_normalizes_cleanly() {
    let input = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        32,
        32,
        Luma([140]),
    )));

    let normalized = normalize_headshot(&input).unwrap();

    assert_eq!((normalized.width, normalized.height), (32, 32));
    assert_eq!(
        image::guess_format(&normalized.bytes).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn garbage_bytes_fail_with_a_decode_error() {
    let result = normalize_headshot(&[0x00, 0x01, 0x02, 0x03]);

    assert!(matches!(result, Err(ImageError::Decode(_))));
}

#[test]
fn file_names_are_slugged_and_rewritten_to_jpg() {
    assert_eq!(
        normalized_file_name(Some("Team Photo.PNG")),
        "team-photo.jpg"
    );
    assert_eq!(normalized_file_name(Some("álbum.jpeg")), "album.jpg");
    assert_eq!(normalized_file_name(Some("plain")), "plain.jpg");
    assert_eq!(normalized_file_name(None), "headshot.jpg");
    assert_eq!(normalized_file_name(Some("???.png")), "headshot.jpg");
}

#[test]
fn file_sizes_format_for_the_admin_list() {
    assert_eq!(format_file_size(0), "0 B");
    assert_eq!(format_file_size(500), "500 B");
    assert_eq!(format_file_size(1023), "1023 B");
    assert_eq!(format_file_size(2048), "2.0 KB");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
}
