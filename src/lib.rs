mod cli;
mod core;
mod processors;
mod service;
mod utils;

pub use crate::cli::{Cli, Commands};
pub use crate::core::{
    CandidateSource, CodecError, ConversionJob, ConversionReport, ConversionSettings,
    ConvertError, FileOutcome, ImageCandidate, OutcomeStatus, Result, DEFAULT_QUALITY,
};
pub use crate::processors::{
    ensure_dir, Destination, DestinationPlanner, DirectoryScanner, FileClassifier, Layout,
    LibwebpCodec, Loader, WebpCodec, HOLDING_PREFIX, SCAN_EXTENSIONS, UPLOAD_EXTENSIONS,
    WEBP_MAX_DIMENSION,
};
pub use crate::service::{
    parse_flag, parse_quality, read_output, status_for, BatchResponse, UploadForm, UploadService,
    UploadedFile, REJECTED_MESSAGE,
};
pub use crate::utils::{flat_file_name, format_file_size, format_signed_size, is_plain_file_name};

pub mod prelude {
    pub use crate::{
        ConversionJob, ConversionReport, ConversionSettings, DestinationPlanner,
        DirectoryScanner, FileClassifier, ImageCandidate, UploadService, WebpCodec,
    };
}
