// webpbatch/src/core/mod.rs
pub mod candidate;
pub mod job;
pub mod report;

use thiserror::Error;

pub use candidate::{CandidateSource, ImageCandidate};
pub use job::ConversionJob;
pub use report::{ConversionReport, FileOutcome, OutcomeStatus};

/// Encode quality used when none (or an unusable one) is supplied.
pub const DEFAULT_QUALITY: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    pub quality: u8,
    pub move_originals: bool,
    pub skip_existing: bool,
    /// Worker threads for one batch. 0 or 1 keeps the batch sequential.
    pub threads: usize,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            move_originals: false,
            skip_existing: false,
            threads: 1,
        }
    }
}

impl ConversionSettings {
    /// Fixed settings of the directory-scan entry point.
    pub fn for_scan() -> Self {
        Self {
            move_originals: true,
            skip_existing: true,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.threads > 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ConvertError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        if self.threads > 256 {
            return Err(ConvertError::InvalidParameter(
                "Thread count too large (max 256)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Failure of the codec for a single candidate. Never aborts a batch.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode WebP: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(String),
}

/// Batch-level errors. Anything here means no report was produced.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No files uploaded")]
    NoCandidates,

    #[error("Rejected {name}: {reason}")]
    Rejected { name: String, reason: String },

    #[error("Cannot prepare directory {path}: {source}")]
    Directory {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Not implemented yet")]
    NotImplemented,
}

pub type Result<T> = std::result::Result<T, ConvertError>;
