//! Classify a measured value against the analyte's reference range.
//!
//! The bounds here are kept apart from the catalog's display text: this table
//! is the one values are compared against. Analytes without an entry
//! classify as `unknown`.

use serde::Serialize;

use crate::models::MarkerStatus;

/// Inclusive numeric bounds of a normal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
}

const fn range(low: f64, high: f64) -> ReferenceRange {
    ReferenceRange { low, high }
}

static REFERENCE_RANGES: &[(&str, ReferenceRange)] = &[
    ("hemoglobin", range(12.0, 17.5)),
    ("hematocrit", range(36.0, 52.0)),
    ("rbc", range(4.0, 6.0)),
    ("wbc", range(4_000.0, 11_000.0)),
    ("platelets", range(150_000.0, 450_000.0)),
    ("glucose", range(70.0, 140.0)),
    ("hba1c", range(4.0, 5.6)),
    ("cholesterol", range(0.0, 200.0)),
    ("hdl", range(40.0, 100.0)),
    ("ldl", range(0.0, 100.0)),
    ("triglycerides", range(0.0, 150.0)),
    ("creatinine", range(0.6, 1.3)),
    ("bun", range(7.0, 20.0)),
    ("sodium", range(135.0, 145.0)),
    ("potassium", range(3.5, 5.1)),
    ("chloride", range(98.0, 107.0)),
    ("calcium", range(8.5, 10.5)),
    ("vitamin_d", range(30.0, 100.0)),
    ("tsh", range(0.4, 4.0)),
    ("iron", range(60.0, 170.0)),
    ("alt", range(7.0, 56.0)),
    ("ast", range(10.0, 40.0)),
];

/// Registered bounds for an analyte key.
pub fn reference_range(key: &str) -> Option<ReferenceRange> {
    REFERENCE_RANGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, r)| *r)
}

/// `low` below the range, `high` above it, `normal` inside (both ends
/// inclusive), `unknown` when the analyte has no registered range.
pub fn classify(key: &str, value: f64) -> MarkerStatus {
    match reference_range(key) {
        Some(r) if value < r.low => MarkerStatus::Low,
        Some(r) if value > r.high => MarkerStatus::High,
        Some(_) => MarkerStatus::Normal,
        None => MarkerStatus::Unknown,
    }
}
