//! Per-run report and the batch completion signal.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::UploadError;
use crate::pipeline::{Outcome, UploadDecision};

/// One line of the report, describing what happened to one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Path relative to the upload root
    pub path: String,
    /// Final key; equal to `path` when the candidate stopped before the transform
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    /// Size of the body sent, or of the raw file for dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&UploadDecision> for ReportEntry {
    fn from(decision: &UploadDecision) -> Self {
        ReportEntry {
            path: decision.relative_path.clone(),
            key: decision.key.clone(),
            content_type: decision.content_type.clone(),
            content_encoding: decision.content_encoding.clone(),
            bytes: decision.bytes,
            outcome: decision.outcome,
            error: decision.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Summary of one upload run.
///
/// Entries keep enumeration order, whatever order the workers finished in.
///
/// # Example Output
///
/// ```json
/// {
///   "started_at": "2024-05-01T09:30:00Z",
///   "finished_at": "2024-05-01T09:30:02Z",
///   "bucket": "static-site",
///   "dry_run": false,
///   "counts": { "skipped_ignored": 1, "uploaded": 2 },
///   "entries": [...]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub bucket: String,
    pub dry_run: bool,
    pub counts: BTreeMap<Outcome, usize>,
    pub entries: Vec<ReportEntry>,
}

impl BatchReport {
    pub fn new(
        bucket: &str,
        dry_run: bool,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        entries: Vec<ReportEntry>,
    ) -> Self {
        let mut counts = BTreeMap::new();
        for entry in &entries {
            *counts.entry(entry.outcome).or_insert(0) += 1;
        }

        BatchReport {
            started_at,
            finished_at,
            bucket: bucket.to_string(),
            dry_run,
            counts,
            entries,
        }
    }

    /// Number of candidates that ended in `outcome`
    pub fn count(&self, outcome: Outcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Candidates that ended in any skip state
    pub fn skipped(&self) -> usize {
        self.counts
            .iter()
            .filter(|(outcome, _)| outcome.is_skip())
            .map(|(_, count)| count)
            .sum()
    }

    /// Entry for a relative path, if it was enumerated
    pub fn entry(&self, path: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// One-line human summary
    pub fn tally(&self) -> String {
        format!(
            "{} files: {} uploaded, {} dry-run, {} skipped, {} failed ({} ms)",
            self.entries.len(),
            self.count(Outcome::Uploaded),
            self.count(Outcome::DryRun),
            self.skipped(),
            self.count(Outcome::Failed),
            (self.finished_at - self.started_at).num_milliseconds()
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize batch report")
    }
}

/// The finished batch: the report plus the first failure observed, if any
#[derive(Debug)]
pub struct BatchResult {
    pub report: BatchReport,
    pub first_error: Option<UploadError>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.first_error.is_none()
    }

    /// Completion signal: the report on success, otherwise the first error
    pub fn into_result(self) -> Result<BatchReport, UploadError> {
        match self.first_error {
            None => Ok(self.report),
            Some(err) => Err(err),
        }
    }
}
