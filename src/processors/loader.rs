// webpbatch/src/processors/loader.rs
use crate::core::CodecError;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

/// Largest width or height libwebp can encode.
pub const WEBP_MAX_DIMENSION: u32 = 16_383;

#[derive(Debug, Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((WEBP_MAX_DIMENSION, WEBP_MAX_DIMENSION)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Decodes a payload, guessing its format from the leading bytes.
    pub fn load_from_bytes(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        if data.is_empty() {
            return Err(CodecError::ResourceLimit("payload is empty".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(CodecError::Io)?;

        // check dimensions before allocating the full bitmap
        if let Some((max_w, max_h)) = self.max_dimensions {
            let (width, height) = reader
                .into_dimensions()
                .map_err(|e| CodecError::Decode(e.to_string()))?;
            if width > max_w || height > max_h {
                return Err(CodecError::ResourceLimit(format!(
                    "image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }

        let image = image::load_from_memory(data).map_err(|e| CodecError::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        log::debug!(
            "Decoded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
