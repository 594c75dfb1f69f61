// webpbatch/src/core/job.rs
use super::{
    ConversionReport, ConversionSettings, ConvertError, FileOutcome, ImageCandidate, Result,
};
use crate::processors::{ensure_dir, Destination, DestinationPlanner, LibwebpCodec, WebpCodec};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Runs one batch of candidates through skip check, codec and relocation.
pub struct ConversionJob<C: WebpCodec = LibwebpCodec> {
    settings: ConversionSettings,
    planner: DestinationPlanner,
    codec: C,
    progress: ProgressBar,
}

impl ConversionJob<LibwebpCodec> {
    pub fn new(settings: ConversionSettings, planner: DestinationPlanner) -> Self {
        Self::with_codec(settings, planner, LibwebpCodec::new())
    }
}

impl<C: WebpCodec> ConversionJob<C> {
    pub fn with_codec(settings: ConversionSettings, planner: DestinationPlanner, codec: C) -> Self {
        Self {
            settings,
            planner,
            codec,
            progress: ProgressBar::hidden(),
        }
    }

    /// Progress bar advanced once per candidate.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Processes every candidate and returns the report.
    ///
    /// Only setup problems (invalid settings, no candidates, output or holding
    /// roots that cannot be created) fail the batch; per-file problems end up
    /// as failed outcomes.
    pub fn run(&self, candidates: &[ImageCandidate]) -> Result<ConversionReport> {
        self.settings.validate()?;

        if candidates.is_empty() {
            return Err(ConvertError::NoCandidates);
        }

        self.planner.prepare(self.settings.move_originals)?;
        self.progress.set_length(candidates.len() as u64);

        log::info!(
            "Converting {} candidates (quality {}, move originals: {}, skip existing: {})",
            candidates.len(),
            self.settings.quality,
            self.settings.move_originals,
            self.settings.skip_existing
        );

        let report: ConversionReport = if self.settings.is_parallel() {
            self.run_parallel(candidates)?
        } else {
            candidates
                .iter()
                .map(|candidate| self.process_tracked(candidate))
                .collect()
        };

        self.progress.finish_with_message(format!(
            "{} converted, {} skipped, {} failed",
            report.converted(),
            report.skipped(),
            report.failed()
        ));

        Ok(report)
    }

    /// Candidates sharing an output path stay in one sequential group, so the
    /// skip check and the write cannot race. Groups run on the pool and the
    /// index-tagged outcomes are merged back into input order.
    fn run_parallel(&self, candidates: &[ImageCandidate]) -> Result<ConversionReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.threads)
            .build()
            .map_err(|e| {
                ConvertError::ProcessingError(format!("Failed to create thread pool: {}", e))
            })?;

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut by_output: HashMap<PathBuf, usize> = HashMap::new();
        for (index, candidate) in candidates.iter().enumerate() {
            // unplannable candidates fail on their own, in a group of one
            let Ok(destination) = self.planner.plan(candidate) else {
                groups.push(vec![index]);
                continue;
            };
            match by_output.get(&destination.webp_path) {
                Some(&group) => groups[group].push(index),
                None => {
                    by_output.insert(destination.webp_path, groups.len());
                    groups.push(vec![index]);
                }
            }
        }

        let mut tagged: Vec<(usize, FileOutcome)> = pool.install(|| {
            groups
                .par_iter()
                .flat_map_iter(|group| {
                    group
                        .iter()
                        .map(|&index| (index, self.process_tracked(&candidates[index])))
                        .collect::<Vec<_>>()
                })
                .collect()
        });

        tagged.sort_by_key(|(index, _)| *index);
        Ok(tagged.into_iter().map(|(_, outcome)| outcome).collect())
    }

    fn process_tracked(&self, candidate: &ImageCandidate) -> FileOutcome {
        let outcome = self.process_candidate(candidate);
        self.progress.inc(1);
        outcome
    }

    fn process_candidate(&self, candidate: &ImageCandidate) -> FileOutcome {
        let destination = match self.planner.plan(candidate) {
            Ok(destination) => destination,
            Err(e) => {
                log::error!("Cannot plan output for {}: {}", candidate.name, e);
                return FileOutcome::failed(&candidate.name, e.to_string());
            }
        };

        if self.settings.skip_existing && destination.webp_path.exists() {
            log::info!(
                "Skipped: {} - WebP version already exists",
                candidate.name
            );
            return FileOutcome::skipped(&candidate.name);
        }

        let (original_size, webp_size) = match self.convert(candidate, &destination) {
            Ok(sizes) => sizes,
            Err(e) => {
                log::error!("Error processing {}: {}", candidate.name, e);
                return FileOutcome::failed(&candidate.name, e.to_string());
            }
        };

        log::info!(
            "Converted: {} -> {} ({} -> {} bytes)",
            candidate.name,
            destination.webp_path.display(),
            original_size,
            webp_size
        );

        let outcome = FileOutcome::converted(
            &candidate.name,
            destination.webp_name(),
            original_size,
            webp_size,
        );

        if !self.settings.move_originals {
            return outcome;
        }

        // the encoded output stays even when the original cannot be moved
        match self.relocate(candidate, &destination) {
            Ok(()) => {
                log::info!(
                    "Moved original: {} -> {}",
                    candidate.name,
                    destination.holding_path.display()
                );
                outcome
            }
            Err(e) => {
                log::warn!("Converted {} but could not move original: {}", candidate.name, e);
                outcome.with_message(format!(
                    "Converted to WebP, original not moved: {}",
                    e
                ))
            }
        }
    }

    /// Reads and encodes one candidate; returns (original, webp) sizes.
    fn convert(
        &self,
        candidate: &ImageCandidate,
        destination: &Destination,
    ) -> std::result::Result<(u64, u64), super::CodecError> {
        let bytes = candidate.read_bytes()?;
        let webp_size =
            self.codec
                .encode_to_file(&bytes, self.settings.quality, &destination.webp_path)?;
        Ok((bytes.len() as u64, webp_size))
    }

    fn relocate(&self, candidate: &ImageCandidate, destination: &Destination) -> Result<()> {
        if let Some(holding_dir) = destination.holding_path.parent() {
            ensure_dir(holding_dir)?;
        }
        candidate.relocate(&destination.holding_path)?;
        Ok(())
    }
}
