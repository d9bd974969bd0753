//! Clipboard acquisition: plain text and images.
//!
//! Clipboard access is synchronous and only happens on explicit user action,
//! so the blocking `arboard` calls run inline.

use anyhow::Result;
use tracing::debug;

use storymap_core::StorymapError;

/// Read plain text from the system clipboard.
pub fn read_text() -> Result<String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| StorymapError::Clipboard(e.to_string()))?;
    match clipboard.get_text() {
        Ok(text) if !text.trim().is_empty() => {
            debug!(chars = text.len(), "Read text from clipboard");
            Ok(text)
        }
        Ok(_) => Err(StorymapError::Clipboard("clipboard contains no text".to_string()).into()),
        Err(arboard::Error::ContentNotAvailable) => {
            Err(StorymapError::Clipboard("clipboard contains no text".to_string()).into())
        }
        Err(e) => Err(StorymapError::Clipboard(e.to_string()).into()),
    }
}

/// Read an image from the system clipboard and return it as PNG bytes,
/// ready to hand to the OCR engine.
pub fn read_image_png() -> Result<Vec<u8>> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| StorymapError::Clipboard(e.to_string()))?;
    let img = match clipboard.get_image() {
        Ok(img) => img,
        Err(arboard::Error::ContentNotAvailable) => {
            return Err(
                StorymapError::Clipboard("clipboard contains no image".to_string()).into(),
            );
        }
        Err(e) => return Err(StorymapError::Clipboard(e.to_string()).into()),
    };

    let rgba = image::RgbaImage::from_raw(
        img.width as u32,
        img.height as u32,
        img.bytes.into_owned(),
    )
    .ok_or_else(|| {
        StorymapError::Clipboard("clipboard image has an unexpected pixel layout".to_string())
    })?;

    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(rgba).write_to(&mut buf, image::ImageFormat::Png)?;
    debug!(bytes = buf.get_ref().len(), "Encoded clipboard image as PNG");
    Ok(buf.into_inner())
}
