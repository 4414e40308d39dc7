//! Encounter summaries, one per Encounter in document order.

use chart_core::EncounterSummary;

use crate::views::{first_text, EncounterDiagnosis, EncounterView};

/// Period fields tried for the encounter date.
pub const ENCOUNTER_DATE_SOURCES: [&str; 2] = ["start", "end"];

/// Substring of `individual.reference` marking a practitioner participant.
pub const PRACTITIONER_MARKER: &str = "Practitioner";

/// Diagnosis `use` codes marking the encounter's primary diagnosis.
pub const PRIMARY_DIAGNOSIS_USES: [&str; 5] = ["primary", "chief-complaint", "CC", "admission", "AD"];

pub fn summarize_encounter(encounter: EncounterView<'_>) -> EncounterSummary {
    EncounterSummary {
        date: first_text(
            ENCOUNTER_DATE_SOURCES
                .iter()
                .map(|key| encounter.period_field(key)),
        )
        .map(str::to_string),
        visit_type: encounter
            .first_type()
            .and_then(|concept| concept.label())
            .map(str::to_string),
        facility: encounter
            .service_provider()
            .and_then(|provider| provider.display())
            .map(str::to_string),
        provider: provider(encounter),
        primary_diagnosis_text: primary_diagnosis(encounter),
    }
}

fn provider(encounter: EncounterView<'_>) -> Option<String> {
    encounter
        .participants()
        .filter_map(|participant| participant.individual())
        .filter(|individual| {
            individual
                .reference()
                .is_some_and(|reference| reference.contains(PRACTITIONER_MARKER))
        })
        .find_map(|individual| individual.display().filter(|display| !display.is_empty()))
        .map(str::to_string)
}

fn is_primary(diagnosis: &EncounterDiagnosis<'_>) -> bool {
    diagnosis
        .use_code()
        .is_some_and(|code| PRIMARY_DIAGNOSIS_USES.contains(&code))
}

/// An explicitly primary entry always wins over an earlier unmarked one; the
/// first entry with any display text is only the fallback.
fn primary_diagnosis(encounter: EncounterView<'_>) -> Option<String> {
    let displayed = |diagnosis: EncounterDiagnosis<'_>| {
        diagnosis
            .condition_display()
            .filter(|display| !display.is_empty())
            .map(str::to_string)
    };

    encounter
        .diagnoses()
        .filter(is_primary)
        .find_map(displayed)
        .or_else(|| encounter.diagnoses().find_map(displayed))
}

pub fn summarize_encounters<'a, I>(encounters: I) -> Vec<EncounterSummary>
where
    I: IntoIterator<Item = EncounterView<'a>>,
{
    encounters.into_iter().map(summarize_encounter).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn summarize(value: &Value) -> EncounterSummary {
        summarize_encounter(EncounterView::new(value))
    }

    fn diagnosis(display: &str, use_code: Option<&str>) -> Value {
        match use_code {
            Some(code) => json!({"condition": {"display": display}, "use": {"coding": [{"code": code}]}}),
            None => json!({"condition": {"display": display}}),
        }
    }

    #[test]
    fn full_encounter_summary() {
        let encounter = json!({
            "period": {"start": "2023-01-15T10:00:00Z", "end": "2023-01-15T10:30:00Z"},
            "type": [{"text": "Routine Checkup", "coding": [{"display": "ignored"}]}],
            "serviceProvider": {"display": "General Hospital"},
            "participant": [
                {"individual": {"reference": "RelatedPerson/r1", "display": "Mom"}},
                {"individual": {"reference": "Practitioner/pcp-1", "display": "Dr. Primary Care"}}
            ],
            "diagnosis": [diagnosis("Hypertension", Some("primary"))]
        });

        let summary = summarize(&encounter);
        assert_eq!(summary.date.as_deref(), Some("2023-01-15T10:00:00Z"));
        assert_eq!(summary.visit_type.as_deref(), Some("Routine Checkup"));
        assert_eq!(summary.facility.as_deref(), Some("General Hospital"));
        assert_eq!(summary.provider.as_deref(), Some("Dr. Primary Care"));
        assert_eq!(summary.primary_diagnosis_text.as_deref(), Some("Hypertension"));
    }

    #[test]
    fn date_falls_back_to_period_end() {
        let summary = summarize(&json!({"period": {"end": "2023-02-01"}}));
        assert_eq!(summary.date.as_deref(), Some("2023-02-01"));
        assert_eq!(summarize(&json!({})).date, None);
    }

    #[test]
    fn visit_type_uses_coding_display_without_text() {
        let summary = summarize(&json!({"type": [{"coding": [{"display": "Specialist Visit"}]}]}));
        assert_eq!(summary.visit_type.as_deref(), Some("Specialist Visit"));
    }

    #[test]
    fn explicit_primary_outranks_earlier_fallback() {
        let encounter = json!({"diagnosis": [
            diagnosis("Cough", None),
            diagnosis("Fever", Some("billing")),
            diagnosis("Pneumonia", Some("AD"))
        ]});
        assert_eq!(
            summarize(&encounter).primary_diagnosis_text.as_deref(),
            Some("Pneumonia")
        );
    }

    #[test]
    fn first_displayed_diagnosis_is_fallback() {
        let encounter = json!({"diagnosis": [
            {"condition": {"reference": "Condition/1"}},
            diagnosis("Cough", Some("billing")),
            diagnosis("Fever", None)
        ]});
        assert_eq!(summarize(&encounter).primary_diagnosis_text.as_deref(), Some("Cough"));
    }

    #[test]
    fn primary_match_without_display_does_not_block_fallback() {
        let encounter = json!({"diagnosis": [
            {"condition": {"reference": "Condition/1"}, "use": {"coding": [{"code": "CC"}]}},
            diagnosis("Headache", None)
        ]});
        assert_eq!(
            summarize(&encounter).primary_diagnosis_text.as_deref(),
            Some("Headache")
        );
    }

    #[test]
    fn provider_requires_practitioner_reference() {
        let encounter = json!({"participant": [
            {"individual": {"reference": "Organization/o1", "display": "Clinic"}}
        ]});
        assert_eq!(summarize(&encounter).provider, None);
    }
}
