//! Report processing orchestrator.
//!
//! Drives one upload through the pipeline:
//! acquire text → sanitize → extract markers → build record → store.
//!
//! Text acquisition and persistence are injected (`TextSource`,
//! `MarkerStore`) so the orchestrator is testable without files or a database.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::sanitize::sanitize_report_text;
use super::traits::{MarkerStore, TextSource};
use super::ProcessingError;
use crate::models::{ExtractionResult, MarkerRecord, StoredMarker, DEFAULT_SOURCE};
use crate::pipeline::bloodwork;

/// Caller-supplied metadata for one uploaded report.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub user_id: String,
    /// Defaults to today (UTC).
    pub report_date: Option<NaiveDate>,
    /// Defaults to a fresh v4 UUID.
    pub report_id: Option<String>,
    pub file_name: Option<String>,
    /// Defaults to `blood_report_upload`.
    pub source: Option<String>,
}

impl ReportRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Persisted record plus the full extraction it was built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
    pub record: MarkerRecord,
    pub extraction: ExtractionResult,
}

/// Orchestrates report processing with injected collaborators.
pub struct ReportProcessor {
    source: Box<dyn TextSource + Send + Sync>,
    store: Box<dyn MarkerStore + Send + Sync>,
}

impl ReportProcessor {
    pub fn new(
        source: Box<dyn TextSource + Send + Sync>,
        store: Box<dyn MarkerStore + Send + Sync>,
    ) -> Self {
        Self { source, store }
    }

    /// Process one uploaded report and persist its marker record.
    ///
    /// A report in which no analyte is recognized still produces a record
    /// (with an empty `markers` map). Only text that is empty after
    /// sanitization is rejected.
    pub fn process(
        &self,
        bytes: &[u8],
        request: &ReportRequest,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        let raw = self.source.acquire(bytes, request.file_name.as_deref())?;
        let text = sanitize_report_text(&raw);
        if text.is_empty() {
            tracing::warn!(user_id = %request.user_id, "Report rejected: no readable text");
            return Err(ProcessingError::EmptyText);
        }

        let extraction = bloodwork::extract(&text);
        let record = MarkerRecord {
            user_id: request.user_id.clone(),
            markers: extraction.marker_values(),
            last_updated: Utc::now(),
            source: request
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            report_date: request
                .report_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            report_id: request
                .report_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        self.store.save(&record, &extraction.parameters)?;

        tracing::info!(
            report_id = %record.report_id,
            user_id = %record.user_id,
            markers = record.markers.len(),
            high = extraction.summary.high_confidence,
            medium = extraction.summary.medium_confidence,
            low = extraction.summary.low_confidence,
            "Report processed"
        );

        Ok(ProcessingOutcome { record, extraction })
    }

    /// Stored records for a user, newest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<MarkerRecord>, ProcessingError> {
        Ok(self.store.list_for_user(user_id)?)
    }

    pub fn latest(&self, user_id: &str) -> Result<Option<MarkerRecord>, ProcessingError> {
        Ok(self.store.latest_for_user(user_id)?)
    }

    pub fn report_markers(&self, report_id: &str) -> Result<Vec<StoredMarker>, ProcessingError> {
        Ok(self.store.report_markers(report_id)?)
    }
}

/// Parse a `YYYY-MM-DD` report date.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, ProcessingError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ProcessingError::InvalidReportDate(raw.to_string()))
}
