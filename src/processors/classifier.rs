// webpbatch/src/processors/classifier.rs
use crate::core::{ConvertError, Result};
use crate::utils::get_file_extension;

/// Extensions picked up by the directory scan.
pub const SCAN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff"];

/// Extensions accepted from uploads. Wider than the scan list on purpose.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "webp", "gif", "bmp"];

/// Decides whether a name (and optional declared MIME type) is an eligible image.
#[derive(Debug, Clone, Copy)]
pub struct FileClassifier {
    extensions: &'static [&'static str],
}

impl FileClassifier {
    pub fn new(extensions: &'static [&'static str]) -> Self {
        Self { extensions }
    }

    pub fn scan() -> Self {
        Self::new(SCAN_EXTENSIONS)
    }

    pub fn upload() -> Self {
        Self::new(UPLOAD_EXTENSIONS)
    }

    pub fn is_eligible(&self, name: &str, declared_mime: Option<&str>) -> bool {
        self.classify(name, declared_mime).is_ok()
    }

    pub fn classify(&self, name: &str, declared_mime: Option<&str>) -> Result<()> {
        let extension = get_file_extension(std::path::Path::new(name));
        match extension.as_deref() {
            Some(ext) if self.allows(ext) => {}
            Some(ext) => return Err(reject(name, format!("extension .{} is not allowed", ext))),
            None => return Err(reject(name, "file has no extension")),
        }

        // vendor and legacy subtypes (`pjpeg`, `x-png`) count as their base format
        if let Some(mime) = declared_mime {
            let subtype = mime_subtype(mime);
            if !self.extensions.iter().any(|ext| subtype.contains(ext)) {
                return Err(reject(name, format!("MIME type {} is not allowed", mime)));
            }
        }

        Ok(())
    }

    fn allows(&self, token: &str) -> bool {
        self.extensions.contains(&token)
    }
}

/// Lowercased subtype of a MIME type, with parameters dropped
/// (`image/JPEG; q=1` -> `jpeg`).
fn mime_subtype(mime: &str) -> String {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    let subtype = essence.rsplit('/').next().unwrap_or(essence);
    subtype.to_lowercase()
}

fn reject(name: &str, reason: impl Into<String>) -> ConvertError {
    ConvertError::Rejected {
        name: name.to_string(),
        reason: reason.into(),
    }
}
