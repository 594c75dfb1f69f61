// webpbatch/src/processors/codec.rs
use super::loader::Loader;
use crate::core::CodecError;
use image::DynamicImage;
use std::path::Path;
use webp::PixelLayout;

/// Black-box WebP encoder used by the conversion job.
pub trait WebpCodec: Sync {
    /// Encodes an image payload (JPEG, PNG, TIFF, ...) into WebP bytes.
    fn encode(&self, source: &[u8], quality: u8) -> Result<Vec<u8>, CodecError>;

    /// Encodes and writes the result to `destination`, returning the bytes written.
    fn encode_to_file(
        &self,
        source: &[u8],
        quality: u8,
        destination: &Path,
    ) -> Result<u64, CodecError> {
        let webp = self.encode(source, quality)?;
        std::fs::write(destination, &webp)?;
        Ok(webp.len() as u64)
    }
}

/// Production codec: `image` decodes, libwebp (via the `webp` crate) encodes lossy.
#[derive(Debug, Clone, Default)]
pub struct LibwebpCodec {
    loader: Loader,
}

impl LibwebpCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(loader: Loader) -> Self {
        Self { loader }
    }

    fn encode_image(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError> {
        let quality = quality.clamp(1, 100) as f32;
        let (width, height) = (image.width(), image.height());

        // libwebp only takes 8-bit RGB or RGBA
        let (pixels, layout) = if image.color().has_alpha() {
            (image.to_rgba8().into_raw(), PixelLayout::Rgba)
        } else {
            (image.to_rgb8().into_raw(), PixelLayout::Rgb)
        };

        let encoder = webp::Encoder::new(&pixels, layout, width, height);
        let memory = encoder
            .encode_simple(false, quality)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}

impl WebpCodec for LibwebpCodec {
    fn encode(&self, source: &[u8], quality: u8) -> Result<Vec<u8>, CodecError> {
        log::debug!("Encoding {} byte payload with quality {}", source.len(), quality);

        let image = self.loader.load_from_bytes(source)?;
        self.encode_image(&image, quality)
    }
}
