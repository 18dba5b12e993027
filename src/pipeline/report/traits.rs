//! Collaborator boundaries for report processing.
//!
//! - TextSource: turns an uploaded file into plain text
//! - MarkerStore: persists marker records and their per-marker detail

use std::collections::BTreeMap;

use crate::db::DatabaseError;
use crate::models::{ExtractedParameter, MarkerRecord, StoredMarker};

use super::ProcessingError;

/// Acquires plain text from an uploaded report.
/// PDF and OCR backends live outside this crate and plug in here.
pub trait TextSource: Send + Sync {
    fn acquire(&self, bytes: &[u8], file_name: Option<&str>) -> Result<String, ProcessingError>;
}

/// Durable storage for marker records.
pub trait MarkerStore: Send + Sync {
    /// Persist a record together with the parameters it was built from.
    fn save(
        &self,
        record: &MarkerRecord,
        parameters: &BTreeMap<String, ExtractedParameter>,
    ) -> Result<(), DatabaseError>;

    /// All records for a user, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<MarkerRecord>, DatabaseError>;

    /// Most recently updated record for a user.
    fn latest_for_user(&self, user_id: &str) -> Result<Option<MarkerRecord>, DatabaseError>;

    /// Per-marker detail for one report, ordered by analyte key.
    fn report_markers(&self, report_id: &str) -> Result<Vec<StoredMarker>, DatabaseError>;
}
