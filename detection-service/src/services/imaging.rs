//! Upload validation and preprocessing.

use image::ImageFormat;
use std::io::Cursor;

/// Formats accepted for detection uploads.
const ACCEPTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Bmp];

/// Detect the image format from its header bytes.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

pub fn mime_type(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// `true` when `bytes` hold a complete JPEG, PNG or BMP image.
///
/// The header decides the format and the whole image is then decoded, so
/// truncated or corrupt data is rejected. Errors never escape.
pub fn validate_image(bytes: &[u8]) -> bool {
    let Some(format) = detect_format(bytes) else {
        return false;
    };

    if !ACCEPTED_FORMATS.contains(&format) {
        tracing::debug!(format = ?format, "Rejecting unsupported image format");
        return false;
    }

    match image::load_from_memory_with_format(bytes, format) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(format = ?format, error = %e, "Rejecting undecodable image");
            false
        }
    }
}

/// Shrink an image so neither side exceeds `max_dimension`, keeping its
/// format and aspect ratio. Returns the input unchanged when it already fits
/// or cannot be processed.
pub fn resize_image(bytes: &[u8], max_dimension: u32) -> Vec<u8> {
    let Some(format) = detect_format(bytes) else {
        return bytes.to_vec();
    };

    let img = match image::load_from_memory_with_format(bytes, format) {
        Ok(img) => img,
        Err(_) => return bytes.to_vec(),
    };

    if img.width() <= max_dimension && img.height() <= max_dimension {
        return bytes.to_vec();
    }

    let resized = img.thumbnail(max_dimension, max_dimension);
    let mut output = Cursor::new(Vec::new());
    match resized.write_to(&mut output, format) {
        Ok(()) => {
            tracing::debug!(
                from_width = img.width(),
                from_height = img.height(),
                to_width = resized.width(),
                to_height = resized.height(),
                "Resized image before upload"
            );
            output.into_inner()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Resize failed, sending original image");
            bytes.to_vec()
        }
    }
}
