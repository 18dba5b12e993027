use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::MarkerStatus;

/// One analyte found in a report, with its value classified against the
/// reference range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParameter {
    pub display_name: String,
    pub value: f64,
    pub unit: String,
    pub confidence: f32,
    pub normal_range: String,
    pub status: MarkerStatus,
    /// Source line, trimmed.
    pub raw_text: String,
}

/// Counts by confidence bucket over all extracted parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub total_parameters: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    /// Mean confidence, 0 when nothing was extracted.
    pub average_confidence: f32,
}

/// Output of one extraction over a report's text.
///
/// Keys are catalog keys. Analytes not found in the text are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub parameters: BTreeMap<String, ExtractedParameter>,
    pub summary: ExtractionSummary,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Analyte key → value, the shape persisted in a marker record.
    pub fn marker_values(&self) -> BTreeMap<String, f64> {
        self.parameters
            .iter()
            .map(|(key, p)| (key.clone(), p.value))
            .collect()
    }
}
