//! Insurance payor selection across Coverage resources.

use crate::views::{first_text, CoverageView, Reference};

/// Coverage classes treated as health insurance. Membership outranks position.
pub const RECOGNIZED_COVERAGE_CLASSES: [&str; 3] = ["health", "PPO", "HMO"];

fn payor_name<'a>(payor: Reference<'a>) -> Option<&'a str> {
    first_text([payor.display(), payor.identifier_value()])
}

fn coverage_payor<'a>(coverage: &CoverageView<'a>) -> Option<&'a str> {
    coverage.first_payor().and_then(payor_name)
}

fn is_recognized_class(coverage: &CoverageView<'_>) -> bool {
    coverage
        .class_code()
        .is_some_and(|code| RECOGNIZED_COVERAGE_CLASSES.contains(&code))
}

/// First recognized-class coverage that names a payor, else the payor of the
/// first coverage overall.
pub fn parse_insurance<'a, I>(coverages: I) -> Option<String>
where
    I: IntoIterator<Item = CoverageView<'a>>,
{
    let coverages: Vec<CoverageView<'a>> = coverages.into_iter().collect();

    coverages
        .iter()
        .filter(|coverage| is_recognized_class(coverage))
        .find_map(|coverage| coverage_payor(coverage).filter(|name| !name.is_empty()))
        .or_else(|| coverages.first().and_then(coverage_payor))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn parse(coverages: &[Value]) -> Option<String> {
        parse_insurance(coverages.iter().map(CoverageView::new))
    }

    fn coverage(class: &str, payor: Value) -> Value {
        json!({
            "resourceType": "Coverage",
            "type": {"coding": [{"code": class}]},
            "payor": [payor]
        })
    }

    #[test]
    fn recognized_class_outranks_position() {
        let coverages = [
            coverage("other", json!({"display": "Dental Co"})),
            coverage("health", json!({"display": "Awesome Health Inc."})),
        ];
        assert_eq!(parse(&coverages).as_deref(), Some("Awesome Health Inc."));
    }

    #[test]
    fn display_outranks_identifier() {
        let coverages = [coverage(
            "PPO",
            json!({"display": "Shown", "identifier": {"value": "ID-1"}}),
        )];
        assert_eq!(parse(&coverages).as_deref(), Some("Shown"));

        let coverages = [coverage("HMO", json!({"identifier": {"value": "ID-2"}}))];
        assert_eq!(parse(&coverages).as_deref(), Some("ID-2"));
    }

    #[test]
    fn falls_back_to_first_coverage() {
        let coverages = [
            json!({"payor": [{"identifier": {"value": "MINIMAL_INSURANCE_ID"}}]}),
            coverage("dental", json!({"display": "Second"})),
        ];
        assert_eq!(parse(&coverages).as_deref(), Some("MINIMAL_INSURANCE_ID"));
    }

    #[test]
    fn recognized_coverage_without_payor_name_is_skipped() {
        let coverages = [
            coverage("vision", json!({"display": "Eye Plan"})),
            coverage("health", json!({})),
            coverage("HMO", json!({"display": "Real HMO"})),
        ];
        assert_eq!(parse(&coverages).as_deref(), Some("Real HMO"));
    }

    #[test]
    fn absent_without_coverage() {
        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&[json!({"payor": []})]), None);
    }
}
