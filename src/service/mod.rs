// webpbatch/src/service/mod.rs
//! Upload-batch entry point.
//!
//! Everything an HTTP layer needs: parsing the string-encoded form settings,
//! classifying the uploaded files, running the batch and shaping the JSON
//! response, plus the download lookups. Routing and multipart handling stay
//! with the caller.

use crate::core::candidate::infer_mime_type;
use crate::core::{
    CandidateSource, ConversionJob, ConversionReport, ConversionSettings, ConvertError,
    ImageCandidate, Result, DEFAULT_QUALITY,
};
use crate::processors::{DestinationPlanner, FileClassifier, LibwebpCodec, WebpCodec};
use crate::utils::is_plain_file_name;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Message returned when an upload fails classification.
pub const REJECTED_MESSAGE: &str = "Only image files are allowed!";

/// One uploaded payload as handed over by the upload layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: Option<String>,
    pub source: CandidateSource,
}

impl UploadedFile {
    pub fn in_memory(original_name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.map(str::to_string),
            source: CandidateSource::Memory(bytes),
        }
    }

    /// A payload staged on disk by the upload layer.
    pub fn staged<P: Into<PathBuf>>(
        original_name: impl Into<String>,
        mime_type: Option<&str>,
        path: P,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.map(str::to_string),
            source: CandidateSource::File(path.into()),
        }
    }

    /// A local file, with its MIME type inferred from the extension.
    pub fn from_local<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            mime_type: infer_mime_type(&original_name),
            original_name,
            source: CandidateSource::File(path.to_path_buf()),
        }
    }

    fn into_candidate(self) -> ImageCandidate {
        match self.source {
            CandidateSource::File(path) => {
                ImageCandidate::staged(self.original_name, self.mime_type, path)
            }
            CandidateSource::Memory(bytes) => {
                ImageCandidate::from_memory(self.original_name, self.mime_type, bytes)
            }
        }
    }
}

/// Multipart form of a convert request: files plus string-encoded settings.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub quality: Option<String>,
    pub move_originals: Option<String>,
    pub skip_existing: Option<String>,
}

impl UploadForm {
    pub fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            quality: parse_quality(self.quality.as_deref()),
            move_originals: parse_flag(self.move_originals.as_deref()),
            skip_existing: parse_flag(self.skip_existing.as_deref()),
            ..ConversionSettings::default()
        }
    }
}

/// Lenient quality parsing: the leading integer of the field, falling back to
/// 75 when absent, unparseable, zero or above 100.
pub fn parse_quality(raw: Option<&str>) -> u8 {
    let Some(raw) = raw else {
        return DEFAULT_QUALITY;
    };

    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();

    match digits.parse::<u64>() {
        Ok(value) if (1..=100).contains(&value) => value as u8,
        _ => DEFAULT_QUALITY,
    }
}

/// Only the literal `"true"` enables a flag.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// JSON body of a convert request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Completed {
        success: bool,
        results: ConversionReport,
        #[serde(rename = "spaceSaved")]
        space_saved: i64,
    },
    Failed {
        success: bool,
        message: String,
        #[serde(skip)]
        status: u16,
    },
}

impl BatchResponse {
    pub fn completed(report: ConversionReport) -> Self {
        Self::Completed {
            success: true,
            space_saved: report.space_saved(),
            results: report,
        }
    }

    pub fn from_error(error: &ConvertError) -> Self {
        let message = match error {
            ConvertError::Rejected { .. } => REJECTED_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self::Failed {
            success: false,
            message,
            status: status_for(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Completed { .. } => 200,
            Self::Failed { status, .. } => *status,
        }
    }

    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            Self::Completed { results, .. } => Some(results),
            Self::Failed { .. } => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// HTTP status an HTTP layer should use for a batch-level error.
pub fn status_for(error: &ConvertError) -> u16 {
    match error {
        ConvertError::NoCandidates | ConvertError::Rejected { .. } => 400,
        ConvertError::InvalidName(_) => 400,
        ConvertError::NotFound(_) => 404,
        ConvertError::NotImplemented => 501,
        _ => 500,
    }
}

/// Reads `name` from `output_root`. Only bare file names are looked up.
pub fn read_output(output_root: &Path, name: &str) -> Result<Vec<u8>> {
    if !is_plain_file_name(name) {
        return Err(ConvertError::InvalidName(name.to_string()));
    }

    let path = output_root.join(name);
    if !path.is_file() {
        return Err(ConvertError::NotFound(name.to_string()));
    }

    Ok(std::fs::read(path)?)
}

/// Converts upload batches into a shared output directory.
pub struct UploadService<C: WebpCodec + Clone = LibwebpCodec> {
    output_root: PathBuf,
    holding_root: PathBuf,
    threads: usize,
    classifier: FileClassifier,
    codec: C,
}

impl UploadService<LibwebpCodec> {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(output_root: P, holding_root: Q) -> Self {
        Self::with_codec(output_root, holding_root, LibwebpCodec::new())
    }
}

impl<C: WebpCodec + Clone> UploadService<C> {
    pub fn with_codec<P: Into<PathBuf>, Q: Into<PathBuf>>(
        output_root: P,
        holding_root: Q,
        codec: C,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            holding_root: holding_root.into(),
            threads: 1,
            classifier: FileClassifier::upload(),
            codec,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Handles one convert request; never panics on bad input.
    pub fn convert(&self, form: UploadForm) -> BatchResponse {
        match self.try_convert(form) {
            Ok(report) => BatchResponse::completed(report),
            Err(e) => {
                log::error!("Error processing files: {}", e);
                BatchResponse::from_error(&e)
            }
        }
    }

    pub fn try_convert(&self, form: UploadForm) -> Result<ConversionReport> {
        if form.files.is_empty() {
            return Err(ConvertError::NoCandidates);
        }

        let settings = form.settings().with_threads(self.threads);

        for file in &form.files {
            if let Err(e) = self
                .classifier
                .classify(&file.original_name, file.mime_type.as_deref())
            {
                log::warn!("{}", e);
                return Err(e);
            }
        }

        let candidates: Vec<ImageCandidate> = form
            .files
            .into_iter()
            .map(UploadedFile::into_candidate)
            .collect();

        let planner = DestinationPlanner::shared(&self.output_root, &self.holding_root);
        ConversionJob::with_codec(settings, planner, self.codec.clone()).run(&candidates)
    }

    /// Bytes of a previously produced output.
    pub fn download(&self, name: &str) -> Result<Vec<u8>> {
        read_output(&self.output_root, name)
    }

    /// Bulk archive download of all outputs.
    pub fn download_all(&self) -> Result<Vec<u8>> {
        Err(ConvertError::NotImplemented)
    }
}
