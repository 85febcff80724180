use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, ImageReader, Luma};

use crate::error::{NumcountError, Result};

/// Prepare uploaded image bytes for digit recognition.
///
/// 1. Decodes the image (format guessed from its magic bytes)
/// 2. Downscales so the longest side is at most `max_dimension`
/// 3. Converts to 8-bit grayscale, dropping any alpha channel
/// 4. Stretches contrast so the darkest pixel is 0 and the lightest 255
///
/// Returns the result re-encoded as PNG.
pub fn preprocess_image(bytes: &[u8], max_dimension: u32) -> Result<Vec<u8>> {
    let img = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| NumcountError::Ocr(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| NumcountError::Ocr(format!("Failed to decode image: {e}")))?;

    let img = resize_if_needed(img, max_dimension);
    let gray = stretch_contrast(img.to_luma8());

    let mut output = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| NumcountError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Resize image if it exceeds maximum dimension while maintaining aspect ratio
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = max_dim as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Histogram stretch; flat images are returned untouched.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0];
        let normalized = (value - min_val) as f32 / range;
        Luma([(normalized * 255.0).round() as u8])
    })
}
