// webpbatch/src/core/report.rs
use serde::Serialize;

pub const SKIPPED_MESSAGE: &str = "WebP version already exists";
pub const CONVERTED_MESSAGE: &str = "Successfully converted to WebP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Converted,
    Skipped,
    Failed,
}

/// Result for a single candidate.
///
/// Fields are private so the size/name invariants hold: only converted
/// outcomes carry sizes and a WebP name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    original_name: String,
    status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    webp_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webp_size: Option<u64>,
    message: String,
}

impl FileOutcome {
    pub fn converted(
        original_name: impl Into<String>,
        webp_name: impl Into<String>,
        original_size: u64,
        webp_size: u64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            status: OutcomeStatus::Converted,
            webp_name: Some(webp_name.into()),
            original_size: Some(original_size),
            webp_size: Some(webp_size),
            message: CONVERTED_MESSAGE.to_string(),
        }
    }

    pub fn skipped(original_name: impl Into<String>) -> Self {
        Self::without_sizes(original_name, OutcomeStatus::Skipped, SKIPPED_MESSAGE)
    }

    pub fn failed(original_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::without_sizes(original_name, OutcomeStatus::Failed, message)
    }

    fn without_sizes(
        original_name: impl Into<String>,
        status: OutcomeStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            status,
            webp_name: None,
            original_size: None,
            webp_size: None,
            message: message.into(),
        }
    }

    /// Replaces the message, e.g. to note that the original could not be moved.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn webp_name(&self) -> Option<&str> {
        self.webp_name.as_deref()
    }

    pub fn original_size(&self) -> Option<u64> {
        self.original_size
    }

    pub fn webp_size(&self) -> Option<u64> {
        self.webp_size
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Aggregate result of one batch, in candidate input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    converted: usize,
    skipped: usize,
    failed: usize,
    files: Vec<FileOutcome>,
    total_original_size: u64,
    total_webp_size: u64,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome, updating counters and, for converted files, totals.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome.status {
            OutcomeStatus::Converted => {
                self.converted += 1;
                self.total_original_size += outcome.original_size.unwrap_or(0);
                self.total_webp_size += outcome.webp_size.unwrap_or(0);
            }
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Failed => self.failed += 1,
        }
        self.files.push(outcome);
    }

    pub fn converted(&self) -> usize {
        self.converted
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn processed(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn files(&self) -> &[FileOutcome] {
        &self.files
    }

    pub fn total_original_size(&self) -> u64 {
        self.total_original_size
    }

    pub fn total_webp_size(&self) -> u64 {
        self.total_webp_size
    }

    /// Bytes saved across converted files. Negative when WebP output grew.
    pub fn space_saved(&self) -> i64 {
        self.total_original_size as i64 - self.total_webp_size as i64
    }

    pub fn savings_percent(&self) -> f64 {
        if self.total_original_size == 0 {
            return 0.0;
        }

        self.space_saved() as f64 / self.total_original_size as f64 * 100.0
    }
}

impl FromIterator<FileOutcome> for ConversionReport {
    fn from_iter<I: IntoIterator<Item = FileOutcome>>(iter: I) -> Self {
        let mut report = Self::new();
        for outcome in iter {
            report.record(outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_totals_follow_outcomes() {
        let report: ConversionReport = vec![
            FileOutcome::converted("a.jpg", "a.webp", 500_000, 120_000),
            FileOutcome::skipped("b.png"),
            FileOutcome::failed("c.tiff", "bad data"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.converted(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.processed(), 3);
        assert_eq!(report.total_original_size(), 500_000);
        assert_eq!(report.total_webp_size(), 120_000);
        assert_eq!(report.space_saved(), 380_000);
    }

    #[test]
    fn space_saved_can_be_negative() {
        let mut report = ConversionReport::new();
        report.record(FileOutcome::converted("tiny.png", "tiny.webp", 100, 250));

        assert_eq!(report.space_saved(), -150);
        assert!(report.savings_percent() < 0.0);
    }

    #[test]
    fn skipped_and_failed_carry_no_sizes() {
        let skipped = FileOutcome::skipped("a.jpg");
        assert_eq!(skipped.message(), SKIPPED_MESSAGE);
        assert!(skipped.original_size().is_none() && skipped.webp_name().is_none());

        let failed = FileOutcome::failed("b.jpg", "boom");
        assert_eq!(failed.status(), OutcomeStatus::Failed);
        assert!(failed.webp_size().is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut report = ConversionReport::new();
        report.record(FileOutcome::converted("a.jpg", "a.webp", 10, 4));
        report.record(FileOutcome::skipped("b.jpg"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalOriginalSize"], 10);
        assert_eq!(json["totalWebpSize"], 4);
        assert_eq!(json["files"][0]["webpName"], "a.webp");
        assert_eq!(json["files"][0]["status"], "converted");
        assert_eq!(json["files"][1]["status"], "skipped");
        assert!(json["files"][1].get("originalSize").is_none());
    }
}
