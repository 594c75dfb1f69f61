// webpbatch/src/processors/scanner.rs
use super::classifier::FileClassifier;
use super::codec::{LibwebpCodec, WebpCodec};
use super::planner::{DestinationPlanner, HOLDING_PREFIX};
use crate::core::{
    ConversionJob, ConversionReport, ConversionSettings, ConvertError, ImageCandidate, Result,
};
use indicatif::ProgressBar;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Recursive scan that converts every eligible image in place and moves the
/// originals into `Temp<dir>` folders.
pub struct DirectoryScanner<C: WebpCodec = LibwebpCodec> {
    root: PathBuf,
    settings: ConversionSettings,
    classifier: FileClassifier,
    codec: C,
    progress: ProgressBar,
}

impl DirectoryScanner<LibwebpCodec> {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_codec(root, LibwebpCodec::new())
    }
}

impl<C: WebpCodec> DirectoryScanner<C> {
    pub fn with_codec<P: Into<PathBuf>>(root: P, codec: C) -> Self {
        Self {
            root: root.into(),
            settings: ConversionSettings::for_scan(),
            classifier: FileClassifier::scan(),
            codec,
            progress: ProgressBar::hidden(),
        }
    }

    /// Overrides the encode quality (the scan defaults to 75).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.settings = self.settings.with_quality(quality);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.settings = self.settings.with_threads(threads);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn run(mut self) -> Result<ConversionReport> {
        self.validate_root()?;
        // holding folders are named after the parent directory, so `.` won't do
        self.root = std::fs::canonicalize(&self.root)?;
        DestinationPlanner::holding_dir_for(&self.root)?;
        log::info!("Starting image conversion in: {}", self.root.display());

        let candidates = self.collect_candidates()?;
        if candidates.is_empty() {
            log::warn!("No image files found in {}", self.root.display());
            return Ok(ConversionReport::new());
        }

        let job = ConversionJob::with_codec(self.settings, DestinationPlanner::alongside(), self.codec)
            .with_progress(self.progress);
        let report = job.run(&candidates)?;

        log::info!("Image conversion process completed.");
        Ok(report)
    }

    /// Eligible files under the root, in file-name order. Holding folders are
    /// not descended into.
    pub fn collect_candidates(&self) -> Result<Vec<ImageCandidate>> {
        let mut candidates = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_holding_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::error!("Error scanning directory: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.classifier.is_eligible(&name, None) {
                log::debug!("Ignoring {}", entry.path().display());
                continue;
            }

            candidates.push(ImageCandidate::from_path(entry.path()));
        }

        Ok(candidates)
    }

    fn validate_root(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(ConvertError::InvalidParameter(format!(
                "The folder \"{}\" does not exist",
                self.root.display()
            )));
        }

        if !self.root.is_dir() {
            return Err(ConvertError::InvalidParameter(format!(
                "Input path is not a directory: {}",
                self.root.display()
            )));
        }

        Ok(())
    }
}

/// Subdirectories named `Temp*` hold relocated originals. The root itself is
/// always scanned.
fn is_holding_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(HOLDING_PREFIX))
            .unwrap_or(false)
}
