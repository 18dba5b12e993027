use labscan_lib::models::{ExtractionResult, MarkerStatus};
use labscan_lib::pipeline::bloodwork::{catalog, classify, extract, extract_value_json};
use labscan_lib::pipeline::report::{
    InMemoryMarkerStore, PlainTextSource, ProcessingError, ReportProcessor, ReportRequest,
};

const PANEL: &str = "\
CITY DIAGNOSTICS LAB
Patient: A. Sample        Age: 42
Hemoglobin              11.2 g/dL      12.0-17.5
Hematocrit              38 %           36-52
WBC                     7,200 cells/mm³
Platelet count          250,000 /cumm
Fasting Blood Sugar     132 mg/dL      70-99
HbA1c                   6.1 %
Serum Creatinine        0.9 mg/dL
Sodium                  139 mmol/L
Potassium               5.6 mmol/L
TSH                     2.10 µIU/mL
Vitamin B12             410 pg/mL
";

#[test]
fn every_analyte_read_from_synonym_number_unit_line() {
    for analyte in catalog() {
        let synonym = analyte.synonyms[0];
        let text = format!("{synonym} 42.5 {}", analyte.default_unit);
        let result = extract(&text);

        let p = result
            .parameters
            .get(analyte.key)
            .unwrap_or_else(|| panic!("{} not extracted from {text:?}", analyte.key));
        assert_eq!(p.value, 42.5, "{}", analyte.key);
        assert_eq!(p.unit, analyte.default_unit, "{}", analyte.key);
    }
}

#[test]
fn confidence_bounded_and_status_consistent() {
    let result = extract(PANEL);
    assert!(!result.is_empty());
    for (key, p) in &result.parameters {
        assert!((0.0..=1.0).contains(&p.confidence), "{key}: {}", p.confidence);
        assert_eq!(p.status, classify(key, p.value), "{key}");
    }
}

#[test]
fn panel_values_and_statuses() {
    let result = extract(PANEL);
    let params = &result.parameters;

    assert_eq!(params["hemoglobin"].value, 11.2);
    assert_eq!(params["hemoglobin"].status, MarkerStatus::Low);
    assert_eq!(params["wbc"].value, 7200.0);
    assert_eq!(params["wbc"].unit, "cells/mm³");
    assert_eq!(params["platelets"].value, 250_000.0);
    assert_eq!(params["glucose"].value, 132.0);
    assert_eq!(params["glucose"].status, MarkerStatus::Normal);
    assert_eq!(params["hba1c"].status, MarkerStatus::High);
    assert_eq!(params["potassium"].status, MarkerStatus::High);
    assert_eq!(params["tsh"].value, 2.1);
    assert_eq!(params["vitamin_b12"].value, 410.0);
    assert_eq!(params["vitamin_b12"].status, MarkerStatus::Unknown);
    assert!(!params.contains_key("ferritin"));
}

#[test]
fn summary_counts_partition_parameters() {
    for text in [PANEL, "", "lorem ipsum", "Glucose 89 mg/dL\nTSH 2.1"] {
        let result = extract(text);
        let s = &result.summary;
        assert_eq!(s.total_parameters, result.parameters.len());
        assert_eq!(
            s.high_confidence + s.medium_confidence + s.low_confidence,
            s.total_parameters
        );
    }
}

#[test]
fn extraction_is_idempotent() {
    assert_eq!(extract(PANEL), extract(PANEL));
}

#[test]
fn empty_input_serializes_to_zero_summary() {
    let json = serde_json::to_value(extract("")).unwrap();
    assert_eq!(json["parameters"], serde_json::json!({}));
    assert_eq!(json["summary"]["totalParameters"], 0);
    assert_eq!(json["summary"]["highConfidence"], 0);
    assert_eq!(json["summary"]["mediumConfidence"], 0);
    assert_eq!(json["summary"]["lowConfidence"], 0);
}

#[test]
fn first_matching_line_wins() {
    let result = extract("WBC 5000\nWhite blood cell count 7200 cells/mm³");
    assert_eq!(result.parameters["wbc"].value, 5000.0);
}

#[test]
fn result_round_trips_through_json() {
    let result = extract(PANEL);
    let json = serde_json::to_string(&result).unwrap();
    let back: ExtractionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn non_string_json_is_rejected() {
    let err = extract_value_json(&serde_json::json!([1, 2])).unwrap_err();
    assert_eq!(err.to_string(), "Expected report text as a string, got array");
}

#[test]
fn processor_stores_panel() {
    let processor = ReportProcessor::new(
        Box::new(PlainTextSource),
        Box::new(InMemoryMarkerStore::new()),
    );
    let outcome = processor
        .process(PANEL.as_bytes(), &ReportRequest::for_user("patient-1"))
        .unwrap();

    assert_eq!(
        outcome.record.markers.len(),
        outcome.extraction.parameters.len()
    );
    assert_eq!(processor.latest("patient-1").unwrap(), Some(outcome.record));

    let err = processor
        .process(b"   \n\n", &ReportRequest::for_user("patient-1"))
        .unwrap_err();
    assert!(matches!(err, ProcessingError::EmptyText));
}
