use std::collections::BTreeMap;

use crate::models::{ConfidenceBucket, ExtractedParameter, ExtractionSummary};

/// Confidence thresholds used by the summary and the API
pub mod thresholds {
    /// Above this: high confidence.
    pub const HIGH: f32 = 0.80;

    /// At or above this (and at most `HIGH`): medium confidence.
    pub const MEDIUM: f32 = 0.50;
}

/// Clamp to `[0, 1]` and round to two decimals so repeated additions of
/// fixed increments land exactly on the threshold values.
pub fn normalize_confidence(raw: f32) -> f32 {
    if !raw.is_finite() {
        return 0.0;
    }
    (raw.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Bucket a single confidence value.
pub fn bucket(confidence: f32) -> ConfidenceBucket {
    if confidence > thresholds::HIGH {
        ConfidenceBucket::High
    } else if confidence >= thresholds::MEDIUM {
        ConfidenceBucket::Medium
    } else {
        ConfidenceBucket::Low
    }
}

/// Partition extracted parameters by confidence bucket.
pub fn summarize(parameters: &BTreeMap<String, ExtractedParameter>) -> ExtractionSummary {
    let mut summary = ExtractionSummary {
        total_parameters: parameters.len(),
        ..Default::default()
    };

    if parameters.is_empty() {
        return summary;
    }

    let mut total_confidence = 0.0f32;
    for p in parameters.values() {
        total_confidence += p.confidence;
        match bucket(p.confidence) {
            ConfidenceBucket::High => summary.high_confidence += 1,
            ConfidenceBucket::Medium => summary.medium_confidence += 1,
            ConfidenceBucket::Low => summary.low_confidence += 1,
        }
    }
    summary.average_confidence =
        normalize_confidence(total_confidence / parameters.len() as f32);

    summary
}
