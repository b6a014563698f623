use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::service::error::ScriptError;
use crate::vision::vision_model::ImageFrame;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_IMAGE_SIDE: u32 = 100;

const ACCEPTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// Check a screenshot before sending it for analysis and return its size.
///
/// The format is sniffed from magic bytes, not the file name. Only the header
/// is decoded.
pub fn inspect_screenshot(bytes: &[u8]) -> Result<ImageFrame, ScriptError> {
    if bytes.is_empty() {
        return Err(ScriptError::validation("Screenshot file is empty"));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ScriptError::validation(format!(
            "Image file size too large ({} bytes, max {})",
            bytes.len(),
            MAX_IMAGE_BYTES
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ScriptError::validation("Invalid image file"))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(ScriptError::validation(format!(
            "Invalid image format {:?} (expected PNG, JPEG or WebP)",
            format
        )));
    }

    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| ScriptError::validation(format!("Invalid image file: {}", e)))?;

    if width < MIN_IMAGE_SIDE || height < MIN_IMAGE_SIDE {
        return Err(ScriptError::validation(format!(
            "Image dimensions too small ({}x{}, min {}x{})",
            width, height, MIN_IMAGE_SIDE, MIN_IMAGE_SIDE
        )));
    }

    Ok(ImageFrame { width, height })
}
