//! The upload orchestrator.
//!
//! A fixed pool of workers drains one pre-enumerated queue. Each worker takes a
//! candidate through the whole decision chain before dequeuing the next:
//!
//! ```text
//! ignored? -> excluded? -> read -> classify -> transform -> filter -> dry run? -> encode -> put
//! ```
//!
//! Per-candidate failures are recorded and never stop sibling workers. The
//! first failure observed becomes the batch error.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::classifier::classify_path;
use crate::cloud::{ObjectPutter, PutObject, S3Putter};
use crate::config::UploadConfig;
use crate::constants::GZIP_ENCODING;
use crate::encoder::encode;
use crate::error::UploadError;
use crate::filter::{accepts_key, is_excluded, is_ignored_path, transform_key};
use crate::summary::{BatchReport, BatchResult, ReportEntry};
use crate::walker::{list_files, CandidateFile};

/// Terminal state of one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    SkippedIgnored,
    SkippedExcluded,
    SkippedUnresolvableType,
    SkippedFiltered,
    DryRun,
    Uploaded,
    Failed,
}

impl Outcome {
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Outcome::SkippedIgnored
                | Outcome::SkippedExcluded
                | Outcome::SkippedUnresolvableType
                | Outcome::SkippedFiltered
        )
    }
}

/// What was decided for one candidate
#[derive(Debug)]
pub struct UploadDecision {
    pub relative_path: String,
    /// Final key once the transform has run, the relative path before that
    pub key: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub bytes: Option<usize>,
    pub outcome: Outcome,
    /// Set only for `Outcome::Failed`
    pub error: Option<UploadError>,
}

impl UploadDecision {
    fn for_candidate(candidate: &CandidateFile) -> Self {
        UploadDecision {
            relative_path: candidate.relative_path.clone(),
            key: candidate.relative_path.clone(),
            content_type: None,
            content_encoding: None,
            bytes: None,
            outcome: Outcome::Failed,
            error: None,
        }
    }

    fn finish(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    fn fail(mut self, error: UploadError) -> Self {
        self.outcome = Outcome::Failed;
        self.error = Some(error);
        self
    }
}

/// Collects decisions from every worker. The first error recorded wins.
struct BatchAccumulator {
    entries: Mutex<Vec<(usize, ReportEntry)>>,
    first_error: OnceLock<UploadError>,
    logging: bool,
}

impl BatchAccumulator {
    fn new(capacity: usize, logging: bool) -> Self {
        BatchAccumulator {
            entries: Mutex::new(Vec::with_capacity(capacity)),
            first_error: OnceLock::new(),
            logging,
        }
    }

    async fn record(&self, index: usize, mut decision: UploadDecision) {
        let entry = ReportEntry::from(&decision);
        if let Some(err) = decision.error.take() {
            if self.logging {
                warn!("Failed: {}: {}", decision.relative_path, err);
            }
            self.fail(err);
        }
        self.entries.lock().await.push((index, entry));
    }

    fn fail(&self, error: UploadError) {
        if let Err(later) = self.first_error.set(error) {
            debug!("Additional failure after the first: {}", later);
        }
    }

    fn finish(self, bucket: &str, dry_run: bool, started_at: DateTime<Utc>) -> BatchResult {
        let mut entries = self.entries.into_inner();
        entries.sort_by_key(|(index, _)| *index);

        BatchResult {
            report: BatchReport::new(
                bucket,
                dry_run,
                started_at,
                Utc::now(),
                entries.into_iter().map(|(_, entry)| entry).collect(),
            ),
            first_error: self.first_error.into_inner(),
        }
    }
}

/// Runs one batch against an [`ObjectPutter`]
pub struct UploadPipeline {
    config: Arc<UploadConfig>,
    putter: Arc<dyn ObjectPutter>,
}

impl UploadPipeline {
    pub fn new(config: UploadConfig, putter: Arc<dyn ObjectPutter>) -> Self {
        UploadPipeline {
            config: Arc::new(config),
            putter,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Enumerate the root, then process every candidate exactly once.
    ///
    /// Returns `Err` only when enumeration fails, before anything is
    /// scheduled. Per-candidate failures are reported through the
    /// [`BatchResult`].
    pub async fn run(&self) -> Result<BatchResult, UploadError> {
        let started_at = Utc::now();
        let timer = Instant::now();

        if self.config.logging {
            info!("Bucket: {}", self.config.bucket);
        }

        let candidates = list_files(&self.config.root, &self.config.includes)?;
        let total = candidates.len();
        debug!(
            "Queued {} candidates from {} for {} workers",
            total,
            self.config.root.display(),
            self.config.concurrency
        );

        let queue: VecDeque<(usize, CandidateFile)> = candidates.into_iter().enumerate().collect();
        let queue = Arc::new(Mutex::new(queue));
        let accumulator = Arc::new(BatchAccumulator::new(total, self.config.logging));

        let worker_count = worker_count(self.config.concurrency, total);
        let workers = (0..worker_count).map(|worker_id| {
            let queue = Arc::clone(&queue);
            let accumulator = Arc::clone(&accumulator);
            let config = Arc::clone(&self.config);
            let putter = Arc::clone(&self.putter);

            tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some((index, candidate)) = next else {
                        break;
                    };
                    let decision = process_candidate(&config, putter.as_ref(), &candidate).await;
                    debug!(
                        "Worker {} finished {} as {:?}",
                        worker_id, decision.relative_path, decision.outcome
                    );
                    accumulator.record(index, decision).await;
                }
            })
        });

        for joined in join_all(workers).await {
            if let Err(e) = joined {
                warn!("Upload worker stopped abnormally: {}", e);
                accumulator.fail(UploadError::Worker(e.to_string()));
            }
        }

        let accumulator = Arc::try_unwrap(accumulator)
            .map_err(|_| UploadError::Worker("batch accumulator still shared after join".to_string()))?;
        let result = accumulator.finish(&self.config.bucket, self.config.dry_run, started_at);

        debug!("Batch finished in {:?}", timer.elapsed());
        Ok(result)
    }
}

/// Size of the pool: never more workers than the limit or than candidates.
/// Each worker reads and puts one candidate at a time.
fn worker_count(concurrency: usize, candidates: usize) -> usize {
    concurrency.min(candidates).max(1)
}

/// Take one candidate through the decision chain to a terminal state
pub async fn process_candidate(
    config: &UploadConfig,
    putter: &dyn ObjectPutter,
    candidate: &CandidateFile,
) -> UploadDecision {
    let decision = UploadDecision::for_candidate(candidate);
    let relative_path = candidate.relative_path.as_str();

    if is_ignored_path(relative_path) {
        debug!("Ignored: {}", relative_path);
        return decision.finish(Outcome::SkippedIgnored);
    }

    // Excludes only look at the path and run before the read
    if is_excluded(relative_path, &config.excludes) {
        debug!("Excluded: {}", relative_path);
        return decision.finish(Outcome::SkippedExcluded);
    }

    let payload = match tokio::fs::read(&candidate.path).await {
        Ok(payload) => payload,
        Err(e) => {
            return decision.fail(UploadError::Read {
                path: candidate.path.clone(),
                source: e,
            })
        }
    };

    decide_and_put(config, putter, decision, payload).await
}

async fn decide_and_put(
    config: &UploadConfig,
    putter: &dyn ObjectPutter,
    mut decision: UploadDecision,
    payload: Vec<u8>,
) -> UploadDecision {
    let classification = match classify_path(Path::new(&decision.relative_path)) {
        Some(classification) => classification,
        None => {
            debug!("Unresolvable content type: {}", decision.relative_path);
            return decision.finish(Outcome::SkippedUnresolvableType);
        }
    };

    decision.key = transform_key(&decision.relative_path, config.hooks.transform.as_ref());
    decision.content_type = Some(classification.content_type.clone());

    if !accepts_key(&decision.key, config.hooks.filter.as_ref()) {
        debug!("Filtered: {}", decision.key);
        return decision.finish(Outcome::SkippedFiltered);
    }

    let should_compress = config.compress && classification.compressible;
    decision.content_encoding = should_compress.then(|| GZIP_ENCODING.to_string());
    decision.bytes = Some(payload.len());

    if config.dry_run {
        if config.logging {
            info!("Upload (dry-run): {}", decision.key);
        }
        return decision.finish(Outcome::DryRun);
    }

    if config.logging {
        info!("Upload: {}", decision.key);
    }

    let body = match encode(payload, should_compress).await {
        Ok(body) => body,
        Err(e) => {
            let key = decision.key.clone();
            return decision.fail(UploadError::Encoding { key, source: e });
        }
    };
    decision.bytes = Some(body.len());

    let object = PutObject {
        bucket: config.bucket.clone(),
        key: decision.key.clone(),
        body,
        content_type: classification.content_type,
        content_encoding: decision.content_encoding.clone(),
        cache_control: config.cache_control.clone(),
        acl: config.acl.clone(),
    };

    match putter.put(object).await {
        Ok(()) => decision.finish(Outcome::Uploaded),
        Err(e) => decision.fail(e),
    }
}

/// Upload with the S3 client described by `config` and return the completion signal
pub async fn upload(config: UploadConfig) -> Result<BatchReport, UploadError> {
    let putter = S3Putter::from_config(&config)?;
    let pipeline = UploadPipeline::new(config, Arc::new(putter));
    pipeline.run().await?.into_result()
}
