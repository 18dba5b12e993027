use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::MarkerStatus;

/// Source tag used when the caller does not supply one.
pub const DEFAULT_SOURCE: &str = "blood_report_upload";

/// Per-report marker values, as persisted for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    pub user_id: String,
    /// Analyte key → numeric value.
    pub markers: BTreeMap<String, f64>,
    pub last_updated: DateTime<Utc>,
    pub source: String,
    pub report_date: NaiveDate,
    pub report_id: String,
}

/// Full detail of one stored marker (value plus how it was read).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMarker {
    pub report_id: String,
    pub analyte_key: String,
    pub value: f64,
    pub unit: String,
    pub confidence: f32,
    pub status: MarkerStatus,
}
