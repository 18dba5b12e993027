//! Known blood analytes and the text forms used to recognize them.
//!
//! Synonyms are lowercase and matched against a lowercased line, starting at
//! a word boundary. Short abbreviations must match a whole word.
//! Within one analyte, more specific forms come first so the reported
//! synonym is the most descriptive one present on the line.

use serde::Serialize;

use super::classify::{reference_range, ReferenceRange};

/// A blood analyte the extractor can recognize.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyteDefinition {
    /// Stable identifier, used as the key in results and stored records.
    pub key: &'static str,
    pub synonyms: &'static [&'static str],
    pub display_name: &'static str,
    pub default_unit: &'static str,
    /// Human-readable range, for display only.
    pub normal_range_text: &'static str,
}

impl AnalyteDefinition {
    /// Machine-comparable bounds, when the analyte has any.
    pub fn numeric_range(&self) -> Option<ReferenceRange> {
        reference_range(self.key)
    }
}

const fn analyte(
    key: &'static str,
    synonyms: &'static [&'static str],
    display_name: &'static str,
    default_unit: &'static str,
    normal_range_text: &'static str,
) -> AnalyteDefinition {
    AnalyteDefinition {
        key,
        synonyms,
        display_name,
        default_unit,
        normal_range_text,
    }
}

static CATALOG: &[AnalyteDefinition] = &[
    // Complete blood count
    analyte(
        "hemoglobin",
        &["hemoglobin", "haemoglobin", "hgb"],
        "Hemoglobin",
        "g/dL",
        "12.0-17.5 g/dL",
    ),
    analyte(
        "hematocrit",
        &["hematocrit", "haematocrit", "packed cell volume", "hct", "pcv"],
        "Hematocrit",
        "%",
        "36-52 %",
    ),
    analyte(
        "rbc",
        &["red blood cell", "rbc count", "erythrocyte", "rbc"],
        "Red Blood Cell Count",
        "mill/mm³",
        "4.0-6.0 mill/mm³",
    ),
    analyte(
        "wbc",
        &["wbc", "white blood cell", "total leucocyte count", "leukocyte", "leucocyte", "tlc"],
        "White Blood Cell Count",
        "cells/mm³",
        "4,000-11,000 cells/mm³",
    ),
    analyte(
        "platelets",
        &["platelet count", "platelet", "plt"],
        "Platelet Count",
        "cells/mm³",
        "150,000-450,000 cells/mm³",
    ),
    // Metabolic
    analyte(
        "glucose",
        &["fasting blood sugar", "glucose", "blood sugar", "fbs"],
        "Glucose",
        "mg/dL",
        "70-99 mg/dL (fasting)",
    ),
    analyte(
        "hba1c",
        &["hba1c", "glycated hemoglobin", "glycosylated hemoglobin", "a1c"],
        "HbA1c",
        "%",
        "4.0-5.6 %",
    ),
    // Lipid profile
    analyte(
        "cholesterol",
        &["total cholesterol", "cholesterol"],
        "Total Cholesterol",
        "mg/dL",
        "< 200 mg/dL",
    ),
    analyte("hdl", &["hdl cholesterol", "hdl"], "HDL Cholesterol", "mg/dL", "> 40 mg/dL"),
    analyte("ldl", &["ldl cholesterol", "ldl"], "LDL Cholesterol", "mg/dL", "< 100 mg/dL"),
    analyte(
        "triglycerides",
        &["triglycerides", "triglyceride"],
        "Triglycerides",
        "mg/dL",
        "< 150 mg/dL",
    ),
    // Kidney
    analyte(
        "creatinine",
        &["serum creatinine", "creatinine"],
        "Creatinine",
        "mg/dL",
        "0.6-1.3 mg/dL",
    ),
    analyte(
        "bun",
        &["blood urea nitrogen", "bun", "urea"],
        "Blood Urea Nitrogen",
        "mg/dL",
        "7-20 mg/dL",
    ),
    // Electrolytes
    analyte("sodium", &["sodium", "na+"], "Sodium", "mmol/L", "135-145 mmol/L"),
    analyte("potassium", &["potassium", "k+"], "Potassium", "mmol/L", "3.5-5.1 mmol/L"),
    analyte("chloride", &["chloride", "cl-"], "Chloride", "mmol/L", "98-107 mmol/L"),
    analyte("calcium", &["calcium"], "Calcium", "mg/dL", "8.5-10.5 mg/dL"),
    // Vitamins, thyroid and iron
    analyte(
        "vitamin_d",
        &["vitamin d", "25-hydroxy", "25-oh"],
        "Vitamin D (25-OH)",
        "ng/mL",
        "30-100 ng/mL",
    ),
    analyte(
        "vitamin_b12",
        &["vitamin b12", "cobalamin", "b12"],
        "Vitamin B12",
        "pg/mL",
        "200-900 pg/mL",
    ),
    analyte(
        "tsh",
        &["thyroid stimulating hormone", "tsh"],
        "TSH",
        "µIU/mL",
        "0.4-4.0 µIU/mL",
    ),
    analyte("ferritin", &["ferritin"], "Ferritin", "ng/mL", "20-250 ng/mL"),
    analyte("iron", &["serum iron", "iron"], "Iron", "µg/dL", "60-170 µg/dL"),
    // Liver
    analyte(
        "alt",
        &["alanine aminotransferase", "sgpt", "alt"],
        "ALT (SGPT)",
        "U/L",
        "7-56 U/L",
    ),
    analyte(
        "ast",
        &["aspartate aminotransferase", "sgot", "ast"],
        "AST (SGOT)",
        "U/L",
        "10-40 U/L",
    ),
    analyte(
        "bilirubin",
        &["total bilirubin", "bilirubin"],
        "Total Bilirubin",
        "mg/dL",
        "0.1-1.2 mg/dL",
    ),
];

/// All analytes, in a fixed order.
pub fn catalog() -> &'static [AnalyteDefinition] {
    CATALOG
}

/// Find an analyte by key.
pub fn lookup(key: &str) -> Option<&'static AnalyteDefinition> {
    CATALOG.iter().find(|a| a.key == key)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<&str> = catalog().iter().map(|a| a.key).collect();
        assert_eq!(keys.len(), catalog().len());
    }

    #[test]
    fn synonyms_are_lowercase_and_nonempty() {
        for analyte in catalog() {
            assert!(!analyte.synonyms.is_empty(), "{} has no synonyms", analyte.key);
            for synonym in analyte.synonyms {
                assert!(!synonym.is_empty());
                assert_eq!(*synonym, synonym.to_lowercase(), "{} synonym not lowercase", analyte.key);
            }
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        let hb = lookup("hemoglobin").unwrap();
        assert_eq!(hb.display_name, "Hemoglobin");
        assert_eq!(hb.default_unit, "g/dL");
        assert!(lookup("unobtainium").is_none());
        assert!(lookup("Hemoglobin").is_none());
    }

    #[test]
    fn order_is_stable() {
        let first: Vec<&str> = catalog().iter().map(|a| a.key).collect();
        let second: Vec<&str> = catalog().iter().map(|a| a.key).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "hemoglobin");
    }

    #[test]
    fn numeric_range_is_subset_of_catalog() {
        assert!(lookup("sodium").unwrap().numeric_range().is_some());
        assert!(lookup("ferritin").unwrap().numeric_range().is_none());
    }
}
