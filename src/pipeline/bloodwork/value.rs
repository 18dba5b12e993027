//! Numeric value + unit extraction from a matched report line.
//!
//! Every strategy is tried and the highest-confidence candidate wins, not the
//! first strategy that matches. Matching runs on the lowercased line, after
//! the synonym, so digits inside a name ("b12", "hba1c") are never read as
//! the value. The whole line is searched only when no word or number at all
//! follows the name.

use std::sync::LazyLock;

use regex::Regex;

use super::confidence::normalize_confidence;
use super::scanner::LineMatch;

/// Unit tokens accepted after a number (lowercase forms).
const UNITS: &str = r"mg/dl|gm/dl|g/dl|mmol/l|[µμu]mol/l|pg/ml|ng/ml|[µμu]g/dl|[µμu]iu/ml|miu/l|mill/mm(?:³|3)|million/[µμu]l|mill/cumm|cells/mm(?:³|3)|cells/cumm|/cumm|/mm(?:³|3)|[x×]\s*10(?:³|\^3)/[µμu]l|10(?:³|\^3)/[µμu]l|iu/l|u/l|fl|%";

/// What may precede a number: a minus sign after a separator, or any
/// non-numeric character. A dash glued to the label ("glucose-92") is not a sign.
const PREFIX: &str = r"(?:[\s(:=](?P<sign>-)|^|[^\d.,])";

/// Values at or above this are outside plausible medical magnitudes.
const PLAUSIBLE_MAX: f64 = 10_000.0;

/// A synonym starting before this column counts as a label at the start of the line.
const NEAR_START_CHARS: usize = 15;

const UNIT_BONUS: f32 = 0.2;
const MAGNITUDE_BONUS: f32 = 0.2;
const POSITION_BONUS: f32 = 0.1;

static UNIT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{PREFIX}(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>{UNITS})"
    ))
    .unwrap()
});

static GROUPED_UNIT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{PREFIX}(?P<num>\d{{1,3}}(?:,\d{{3}})+(?:\.\d+)?)\s*(?P<unit>{UNITS})"
    ))
    .unwrap()
});

static BARE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{PREFIX}(?P<num>\d{{1,3}}(?:,\d{{3}})+(?:\.\d+)?|\d+(?:\.\d+)?)"
    ))
    .unwrap()
});

/// A value read from a line, before it is accepted as the analyte's result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCandidate {
    pub value: f64,
    /// Canonical unit spelling, when a unit followed the number.
    pub unit: Option<&'static str>,
    pub confidence: f32,
}

/// Ways of reading a number off a line, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStrategy {
    /// `16.3 g/dL`
    UnitSuffixed,
    /// `4,500 cells/mm³`
    GroupedUnitSuffixed,
    /// `5000`
    Bare,
}

impl ValueStrategy {
    pub const ALL: [ValueStrategy; 3] = [
        ValueStrategy::UnitSuffixed,
        ValueStrategy::GroupedUnitSuffixed,
        ValueStrategy::Bare,
    ];

    pub fn base_confidence(self) -> f32 {
        match self {
            ValueStrategy::UnitSuffixed => 0.5,
            ValueStrategy::GroupedUnitSuffixed => 0.45,
            ValueStrategy::Bare => 0.3,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            ValueStrategy::UnitSuffixed => &UNIT_VALUE,
            ValueStrategy::GroupedUnitSuffixed => &GROUPED_UNIT_VALUE,
            ValueStrategy::Bare => &BARE_VALUE,
        }
    }

    /// First acceptable candidate this strategy finds in `haystack`.
    fn find(self, haystack: &str, synonym_column: usize) -> Option<ExtractionCandidate> {
        self.regex().captures_iter(haystack).find_map(|caps| {
            let num = caps.name("num")?;
            if is_range_upper_bound(haystack, num.start()) {
                tracing::debug!(strategy = ?self, "Skipping upper bound of a reference range");
                return None;
            }

            let literal = match caps.name("sign") {
                Some(_) => format!("-{}", num.as_str()),
                None => num.as_str().to_string(),
            };
            let value = match parse_number(&literal) {
                Some(v) => v,
                None => {
                    tracing::debug!(strategy = ?self, "Discarding non-positive or non-finite value");
                    return None;
                }
            };

            let unit = match caps.name("unit") {
                Some(u) if ends_mid_word(haystack, u.end()) => return None,
                Some(u) => canonical_unit(u.as_str()),
                None => None,
            };
            Some(ExtractionCandidate {
                value,
                unit,
                confidence: score(self, value, unit.is_some(), synonym_column),
            })
        })
    }
}

/// True when the number starting at `start` closes a range such as `13.0-17.0`.
fn is_range_upper_bound(haystack: &str, start: usize) -> bool {
    let before = haystack[..start].trim_end();
    let Some(dash) = before.chars().next_back().filter(|c| matches!(c, '-' | '–')) else {
        return false;
    };
    before[..before.len() - dash.len_utf8()]
        .trim_end()
        .ends_with(|c: char| c.is_ascii_digit())
}

/// A unit token directly followed by a letter or digit is part of a longer word.
fn ends_mid_word(haystack: &str, end: usize) -> bool {
    haystack[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric())
}

/// Extract the most plausible value on a matched line.
///
/// Returns `None` when no strategy yields a positive, finite number.
pub fn extract_value(line: &LineMatch<'_>) -> Option<ExtractionCandidate> {
    let column = line.synonym_column();
    let tail = line.tail();
    if tail.chars().any(char::is_alphanumeric) {
        return best_candidate(tail, column);
    }
    best_candidate(&line.lowered, column)
}

fn best_candidate(haystack: &str, synonym_column: usize) -> Option<ExtractionCandidate> {
    let mut best: Option<ExtractionCandidate> = None;
    for strategy in ValueStrategy::ALL {
        if let Some(candidate) = strategy.find(haystack, synonym_column) {
            let better = best
                .as_ref()
                .map_or(true, |b| candidate.confidence > b.confidence);
            if better {
                best = Some(candidate);
            }
        }
    }
    best
}

fn score(strategy: ValueStrategy, value: f64, has_unit: bool, synonym_column: usize) -> f32 {
    let mut confidence = strategy.base_confidence();
    if has_unit {
        confidence += UNIT_BONUS;
    }
    if value > 0.0 && value < PLAUSIBLE_MAX {
        confidence += MAGNITUDE_BONUS;
    }
    if synonym_column < NEAR_START_CHARS {
        confidence += POSITION_BONUS;
    }
    normalize_confidence(confidence)
}

/// Strip thousands separators and parse. Rejects non-finite and non-positive.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Map a matched (lowercase) unit token to its display spelling.
pub fn canonical_unit(raw: &str) -> Option<&'static str> {
    let folded = raw
        .trim_start_matches(['x', '×'])
        .trim_start()
        .replace('μ', "µ");
    let unit = match folded.as_str() {
        "mg/dl" => "mg/dL",
        "g/dl" | "gm/dl" => "g/dL",
        "mmol/l" => "mmol/L",
        "µmol/l" | "umol/l" => "µmol/L",
        "pg/ml" => "pg/mL",
        "ng/ml" => "ng/mL",
        "µg/dl" | "ug/dl" => "µg/dL",
        "µiu/ml" | "uiu/ml" => "µIU/mL",
        "miu/l" => "mIU/L",
        "mill/mm³" | "mill/mm3" | "mill/cumm" | "million/µl" | "million/ul" => "mill/mm³",
        "cells/mm³" | "cells/mm3" | "cells/cumm" | "/cumm" | "/mm³" | "/mm3" => "cells/mm³",
        "10³/µl" | "10³/ul" | "10^3/µl" | "10^3/ul" => "10³/µL",
        "iu/l" | "u/l" => "U/L",
        "fl" => "fL",
        "%" => "%",
        _ => return None,
    };
    Some(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bloodwork::catalog::lookup;
    use crate::pipeline::bloodwork::scanner::scan;

    fn extract(text: &str, key: &str) -> Option<ExtractionCandidate> {
        let m = scan(text, lookup(key).unwrap())?;
        extract_value(&m)
    }

    #[test]
    fn number_with_unit() {
        let c = extract("Hemoglobin: 16.3 g/dL", "hemoglobin").unwrap();
        assert_eq!(c.value, 16.3);
        assert_eq!(c.unit, Some("g/dL"));
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn unit_beats_bare_number() {
        let with_unit = extract("Glucose 89 mg/dL", "glucose").unwrap();
        let bare = extract("Glucose 89", "glucose").unwrap();
        assert_eq!(bare.value, 89.0);
        assert_eq!(bare.unit, None);
        assert!(with_unit.confidence > bare.confidence);
    }

    #[test]
    fn thousands_separator_is_read_whole() {
        let c = extract("WBC 4,500 cells/mm³", "wbc").unwrap();
        assert_eq!(c.value, 4500.0);
        assert_eq!(c.unit, Some("cells/mm³"));
    }

    #[test]
    fn grouped_bare_number() {
        let c = extract("Platelet count 250,000", "platelets").unwrap();
        assert_eq!(c.value, 250_000.0);
        assert_eq!(c.unit, None);
    }

    #[test]
    fn large_value_gets_no_magnitude_bonus() {
        let small = extract("WBC 9 10³/µL", "wbc").unwrap();
        let large = extract("WBC 12,000 cells/mm³", "wbc").unwrap();
        assert_eq!(small.unit, Some("10³/µL"));
        assert!(small.confidence > large.confidence);
    }

    #[test]
    fn digits_inside_synonym_are_skipped() {
        let c = extract("Vitamin B12 410 pg/mL", "vitamin_b12").unwrap();
        assert_eq!(c.value, 410.0);
        let c = extract("HbA1c 5.6 %", "hba1c").unwrap();
        assert_eq!(c.value, 5.6);
        assert_eq!(c.unit, Some("%"));
    }

    #[test]
    fn value_before_label_found_on_whole_line() {
        let c = extract("134 mmol/L sodium", "sodium").unwrap();
        assert_eq!(c.value, 134.0);
        assert_eq!(c.unit, Some("mmol/L"));
    }

    #[test]
    fn label_far_into_line_scores_lower() {
        let near = extract("Sodium 140 mmol/L", "sodium").unwrap();
        let far = extract("Electrolyte panel results: sodium 140 mmol/L", "sodium").unwrap();
        assert!(near.confidence > far.confidence);
    }

    #[test]
    fn zero_is_rejected_and_next_value_taken() {
        let c = extract("Glucose 0 mg/dL repeat 92 mg/dL", "glucose").unwrap();
        assert_eq!(c.value, 92.0);
    }

    #[test]
    fn zero_with_unit_does_not_hide_following_value() {
        let c = extract("Glucose 0 mg/dL 92 mg/dL", "glucose").unwrap();
        assert_eq!(c.value, 92.0);
        assert_eq!(c.unit, Some("mg/dL"));
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn negative_value_is_rejected() {
        assert!(extract("Glucose -5 mg/dL", "glucose").is_none());
        assert!(extract("Glucose: -5", "glucose").is_none());
        assert!(extract("Sodium (-140) mmol/L", "sodium").is_none());
    }

    #[test]
    fn dash_after_label_is_not_a_sign() {
        let c = extract("HbA1c-5.6 %", "hba1c").unwrap();
        assert_eq!(c.value, 5.6);
    }

    #[test]
    fn range_dash_is_not_a_sign() {
        let c = extract("Hemoglobin 12.0 -17.5", "hemoglobin").unwrap();
        assert_eq!(c.value, 12.0);
    }

    #[test]
    fn result_preferred_over_reference_range_bound() {
        let c = extract("Hemoglobin 14.2 13.0-17.0 g/dL", "hemoglobin").unwrap();
        assert_eq!(c.value, 14.2);
        let c = extract("Glucose 92 (70 - 100 mg/dL)", "glucose").unwrap();
        assert_eq!(c.value, 92.0);
    }

    #[test]
    fn multiplier_prefixed_count_unit() {
        let c = extract("WBC 7.2 x10³/µL", "wbc").unwrap();
        assert_eq!(c.value, 7.2);
        assert_eq!(c.unit, Some("10³/µL"));
        let c = extract("WBC 7.2 × 10^3/uL", "wbc").unwrap();
        assert_eq!(c.unit, Some("10³/µL"));
    }

    #[test]
    fn unit_inside_word_is_not_a_unit() {
        let c = extract("Hemoglobin 14 flagged", "hemoglobin").unwrap();
        assert_eq!(c.value, 14.0);
        assert_eq!(c.unit, None);
    }

    #[test]
    fn text_after_label_without_value_does_not_search_whole_line() {
        let text = "Sample collected at 9 AM, Ferritin pending";
        assert!(extract(text, "ferritin").is_none());
    }

    #[test]
    fn no_number_yields_none() {
        assert!(extract("Glucose: not measured", "glucose").is_none());
        assert!(extract("Glucose 0", "glucose").is_none());
    }

    #[test]
    fn confidence_never_exceeds_one() {
        for line in ["TSH 2.1 µIU/mL", "Ferritin 80 ng/mL", "Iron 90", "PLT 2,50,000"] {
            let key = match line.split_whitespace().next().unwrap() {
                "TSH" => "tsh",
                "Ferritin" => "ferritin",
                "Iron" => "iron",
                _ => "platelets",
            };
            let c = extract(line, key).unwrap();
            assert!((0.0..=1.0).contains(&c.confidence), "{line}: {}", c.confidence);
        }
    }

    #[test]
    fn canonical_units() {
        assert_eq!(canonical_unit("mg/dl"), Some("mg/dL"));
        assert_eq!(canonical_unit("μiu/ml"), Some("µIU/mL"));
        assert_eq!(canonical_unit("uiu/ml"), Some("µIU/mL"));
        assert_eq!(canonical_unit("/cumm"), Some("cells/mm³"));
        assert_eq!(canonical_unit("x10³/µl"), Some("10³/µL"));
        assert_eq!(canonical_unit("furlongs"), None);
    }

    #[test]
    fn parse_number_rules() {
        assert_eq!(parse_number("4,500"), Some(4500.0));
        assert_eq!(parse_number("16.3"), Some(16.3));
        assert_eq!(parse_number("0"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn strategy_base_confidence_is_ordered() {
        assert!(
            ValueStrategy::UnitSuffixed.base_confidence()
                > ValueStrategy::GroupedUnitSuffixed.base_confidence()
        );
        assert!(
            ValueStrategy::GroupedUnitSuffixed.base_confidence()
                > ValueStrategy::Bare.base_confidence()
        );
    }
}
