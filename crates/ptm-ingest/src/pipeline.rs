//! Batch ingestion pipeline
//!
//! Walks every page of an organism's proteome, analyzes each protein as it arrives and
//! hands the accumulated annotation rows to a report sink once the source is exhausted.
//!
//! State machine:
//!
//! ```text
//! Idle --run--> Processing --source exhausted, report written--> Completed
//!                   |
//!                   +--fetch failed / malformed page / cancelled--> Idle (rows dropped)
//! ```
//!
//! Pages are fetched one at a time. Cancellation is checked before every page fetch.

use chrono::{DateTime, Utc};
use ptm_analysis::analyze;
use ptm_common::{CalibrationParameters, PtmError, SiteAnnotation};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::report::ReportSink;
use crate::retry::{retry, RetryPolicy};
use crate::source::{PageRequest, ProteinSource};

/// Highest percentage reported before the run has completed
pub const IN_FLIGHT_PERCENT_CAP: f64 = 99.9;

/// Pipeline lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Processing,
    Completed,
}

impl PipelineState {
    pub fn as_str(&self) -> &str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Processing => "processing",
            PipelineState::Completed => "completed",
        }
    }
}

/// Snapshot handed to the progress callback after every page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgress {
    pub state: PipelineState,
    pub pages: usize,
    /// Proteins seen so far, skipped ones included
    pub processed: usize,
    /// Source's total-count hint; 0 while unknown
    pub estimated_total: u64,
    pub rows: usize,
    /// Advisory percentage in [0, 100]; 100 only once completed
    pub percent: f64,
}

/// Counters of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    pub run_id: Uuid,
    pub pages: usize,
    pub proteins_processed: usize,
    pub proteins_skipped: usize,
    pub rows: usize,
    pub estimated_total: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_secs: f64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pages: 0,
            proteins_processed: 0,
            proteins_skipped: 0,
            rows: 0,
            estimated_total: None,
            started_at: Utc::now(),
            completed_at: None,
            duration_secs: 0.0,
        }
    }

    /// Mark stats as completed
    pub fn complete(&mut self) {
        let end = Utc::now();
        self.completed_at = Some(end);
        self.duration_secs = (end - self.started_at).num_milliseconds() as f64 / 1000.0;
    }
}

impl Default for BatchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows and counters of a completed run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub rows: Vec<SiteAnnotation>,
    pub stats: BatchStats,
}

pub type ProgressCallback = Box<dyn FnMut(&BatchProgress) + Send>;

/// Percentage for an in-flight run
pub fn progress_percent(processed: usize, estimated_total: u64) -> f64 {
    if estimated_total == 0 {
        return 0.0;
    }
    (processed as f64 / estimated_total as f64 * 100.0).clamp(0.0, IN_FLIGHT_PERCENT_CAP)
}

/// Paginated organism-wide analysis over a [`ProteinSource`]
pub struct BatchPipeline<S> {
    source: S,
    params: CalibrationParameters,
    page_size: usize,
    retry: RetryPolicy,
    state: PipelineState,
    on_progress: Option<ProgressCallback>,
}

impl<S: ProteinSource> BatchPipeline<S> {
    pub fn new(source: S, params: CalibrationParameters) -> Self {
        Self {
            source,
            params,
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
            state: PipelineState::Idle,
            on_progress: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress(mut self, callback: impl FnMut(&BatchProgress) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn params(&self) -> &CalibrationParameters {
        &self.params
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Analyze every protein of `organism` and write the rows to `sink`.
    ///
    /// Any batch-level failure leaves the pipeline `Idle` with no rows retained.
    pub async fn run<R>(
        &mut self,
        organism: &str,
        cancel: &CancellationToken,
        sink: &mut R,
    ) -> anyhow::Result<BatchOutcome>
    where
        R: ReportSink + ?Sized,
    {
        self.state = PipelineState::Processing;
        let mut stats = BatchStats::new();

        info!(
            run_id = %stats.run_id,
            source = self.source.name(),
            organism,
            page_size = self.page_size,
            "Starting batch run"
        );

        let rows = match self.collect(organism, cancel, &mut stats).await {
            Ok(rows) => rows,
            Err(e) => {
                self.state = PipelineState::Idle;
                error!(
                    run_id = %stats.run_id,
                    pages = stats.pages,
                    processed = stats.proteins_processed,
                    error = %e,
                    "Batch run aborted, discarding rows"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = sink.write_sites(&rows) {
            self.state = PipelineState::Idle;
            error!(run_id = %stats.run_id, error = %e, "Failed to write report");
            return Err(e.context("Failed to write batch report"));
        }

        stats.rows = rows.len();
        stats.complete();
        self.state = PipelineState::Completed;

        self.emit(BatchProgress {
            state: PipelineState::Completed,
            pages: stats.pages,
            processed: stats.proteins_processed,
            estimated_total: stats.estimated_total.unwrap_or(0),
            rows: rows.len(),
            percent: 100.0,
        });

        info!(
            run_id = %stats.run_id,
            pages = stats.pages,
            processed = stats.proteins_processed,
            skipped = stats.proteins_skipped,
            rows = stats.rows,
            duration_secs = stats.duration_secs,
            "Batch run completed"
        );

        Ok(BatchOutcome { rows, stats })
    }

    async fn collect(
        &mut self,
        organism: &str,
        cancel: &CancellationToken,
        stats: &mut BatchStats,
    ) -> ptm_common::Result<Vec<SiteAnnotation>> {
        let mut rows: Vec<SiteAnnotation> = Vec::new();
        let mut percent = 0.0_f64;
        let mut request = Some(PageRequest::first(organism, self.page_size));

        while let Some(current) = request.take() {
            if cancel.is_cancelled() {
                info!(run_id = %stats.run_id, pages = stats.pages, "Batch run cancelled");
                return Err(PtmError::Cancelled { pages: stats.pages });
            }

            let operation = format!("{} page {}", self.source.name(), stats.pages + 1);
            let source = &self.source;
            let page = retry(&self.retry, &operation, || source.fetch_page(&current)).await?;

            stats.pages += 1;
            if let Some(hint) = page.total_hint {
                stats.estimated_total = Some(stats.estimated_total.map_or(hint, |t| t.max(hint)));
            }

            debug!(
                run_id = %stats.run_id,
                page = stats.pages,
                proteins = page.proteins.len(),
                total_hint = ?page.total_hint,
                has_cursor = page.next_cursor.is_some(),
                "Fetched page"
            );

            for protein in &page.proteins {
                stats.proteins_processed += 1;
                match analyze(protein, &self.params) {
                    Ok(mut annotations) => rows.append(&mut annotations),
                    Err(PtmError::InvalidProtein { accession, reason }) => {
                        stats.proteins_skipped += 1;
                        warn!(accession = %accession, reason = %reason, "Skipping invalid protein");
                    }
                    Err(e) => return Err(e),
                }
            }

            // never below the previous report, even when a later hint is larger
            percent = percent.max(progress_percent(
                stats.proteins_processed,
                stats.estimated_total.unwrap_or(0),
            ));
            self.emit(BatchProgress {
                state: PipelineState::Processing,
                pages: stats.pages,
                processed: stats.proteins_processed,
                estimated_total: stats.estimated_total.unwrap_or(0),
                rows: rows.len(),
                percent,
            });

            if page.has_more(self.page_size) {
                request = current.next(&page);
            }
        }

        Ok(rows)
    }

    fn emit(&mut self, progress: BatchProgress) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(&progress);
        }
    }
}
