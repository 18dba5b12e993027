//! Report text → structured marker results.
//!
//! Analytes are independent: each one is scanned, read and classified on its
//! own, and only the summary looks across them.

use std::collections::BTreeMap;

use super::catalog::{catalog, AnalyteDefinition};
use super::classify::classify;
use super::confidence::summarize;
use super::scanner::scan;
use super::value::extract_value;
use super::ExtractionError;
use crate::models::{ExtractedParameter, ExtractionResult};

/// Extract every catalog analyte found in `text`.
///
/// Never fails on content: empty or unrecognizable text yields an empty map
/// and a zero-filled summary.
pub fn extract(text: &str) -> ExtractionResult {
    let mut parameters = BTreeMap::new();

    for analyte in catalog() {
        if let Some(parameter) = extract_analyte(text, analyte) {
            tracing::debug!(
                analyte = analyte.key,
                confidence = parameter.confidence,
                status = %parameter.status,
                "Marker extracted"
            );
            parameters.insert(analyte.key.to_string(), parameter);
        }
    }

    let summary = summarize(&parameters);
    tracing::info!(
        total = summary.total_parameters,
        high = summary.high_confidence,
        medium = summary.medium_confidence,
        low = summary.low_confidence,
        "Blood report extraction complete"
    );

    ExtractionResult {
        parameters,
        summary,
    }
}

/// Scan, read and classify one analyte. `None` when the analyte is not
/// mentioned or its line carries no usable number.
pub fn extract_analyte(text: &str, analyte: &AnalyteDefinition) -> Option<ExtractedParameter> {
    let line = scan(text, analyte)?;
    let candidate = extract_value(&line)?;

    Some(ExtractedParameter {
        display_name: analyte.display_name.to_string(),
        value: candidate.value,
        unit: candidate.unit.unwrap_or(analyte.default_unit).to_string(),
        confidence: candidate.confidence,
        normal_range: analyte.normal_range_text.to_string(),
        status: classify(analyte.key, candidate.value),
        raw_text: line.line.trim().to_string(),
    })
}

/// Extract from raw bytes; the bytes must be UTF-8 text.
pub fn extract_bytes(bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::InputType {
        found: "non-UTF-8 bytes".into(),
    })?;
    Ok(extract(text))
}

/// Extract from a JSON value; only JSON strings are accepted.
pub fn extract_value_json(value: &serde_json::Value) -> Result<ExtractionResult, ExtractionError> {
    match value {
        serde_json::Value::String(text) => Ok(extract(text)),
        other => Err(ExtractionError::InputType {
            found: json_type_name(other).into(),
        }),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarkerStatus;

    #[test]
    fn hemoglobin_and_glucose_scenario() {
        let result = extract("Hemoglobin: 16.3 g/dL\nGlucose 89 mg/dL");

        let hb = &result.parameters["hemoglobin"];
        assert_eq!(hb.value, 16.3);
        assert_eq!(hb.unit, "g/dL");
        assert_eq!(hb.status, MarkerStatus::Normal);
        assert_eq!(hb.raw_text, "Hemoglobin: 16.3 g/dL");

        let glucose = &result.parameters["glucose"];
        assert_eq!(glucose.value, 89.0);
        assert_eq!(glucose.unit, "mg/dL");
        assert_eq!(glucose.status, MarkerStatus::Normal);

        assert_eq!(result.parameters.len(), 2);
        assert_eq!(result.summary.total_parameters, 2);
    }

    #[test]
    fn sodium_below_range() {
        let result = extract("Sodium 134 mmol/L");
        assert_eq!(result.parameters["sodium"].status, MarkerStatus::Low);
    }

    #[test]
    fn unrecognizable_text_is_empty() {
        let result = extract("lorem ipsum");
        assert!(result.parameters.is_empty());
        assert_eq!(result.summary.total_parameters, 0);
    }

    #[test]
    fn empty_input_yields_zero_summary() {
        let result = extract("");
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn earlier_line_value_wins() {
        let result = extract("WBC 5000 ...\n White blood cell count 7200 cells/mm³");
        let wbc = &result.parameters["wbc"];
        assert_eq!(wbc.value, 5000.0);
        assert_eq!(wbc.unit, "cells/mm³");
        assert_eq!(wbc.raw_text, "WBC 5000 ...");
    }

    #[test]
    fn default_unit_used_when_line_has_none() {
        let result = extract("Potassium 4.2");
        let k = &result.parameters["potassium"];
        assert_eq!(k.unit, "mmol/L");
        assert_eq!(k.status, MarkerStatus::Normal);
    }

    #[test]
    fn analyte_without_number_is_omitted() {
        let result = extract("Ferritin: pending\nCalcium 9.4 mg/dL");
        assert!(!result.parameters.contains_key("ferritin"));
        assert!(result.parameters.contains_key("calcium"));
    }

    #[test]
    fn pending_result_is_not_filled_from_other_numbers() {
        let result = extract("Sample collected at 9 AM, Ferritin pending\nGlucose -5 mg/dL");
        assert!(!result.parameters.contains_key("ferritin"));
        assert!(!result.parameters.contains_key("glucose"));
        assert!(result.is_empty());
    }

    #[test]
    fn unregistered_range_is_unknown() {
        let result = extract("Ferritin 80 ng/mL");
        assert_eq!(result.parameters["ferritin"].status, MarkerStatus::Unknown);
    }

    #[test]
    fn idempotent() {
        let text = "Hemoglobin 10 g/dL\nTSH 5.2 µIU/mL\nLDL 130 mg/dL";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn bytes_must_be_utf8() {
        assert!(extract_bytes(b"Glucose 89 mg/dL").is_ok());
        let err = extract_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractionError::InputType { .. }));
    }

    #[test]
    fn json_input_must_be_string() {
        let ok = extract_value_json(&serde_json::json!("Glucose 89 mg/dL")).unwrap();
        assert!(ok.parameters.contains_key("glucose"));

        let err = extract_value_json(&serde_json::json!(42)).unwrap_err();
        assert_eq!(err.to_string(), "Expected report text as a string, got number");
        assert!(extract_value_json(&serde_json::Value::Null).is_err());
    }
}
