//! Diagnosis summaries from Condition resources.

use chart_core::DiagnosisSummary;

use crate::views::{first_text, CodeableConcept, Coding, ConditionView};

pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

fn is_snomed(coding: &Coding<'_>) -> bool {
    coding.system().is_some_and(|system| {
        system.starts_with(SNOMED_SYSTEM) || system.to_ascii_lowercase().contains("snomed")
    })
}

/// Returns `(code, description)`.
fn code_and_description(code: CodeableConcept<'_>) -> (Option<String>, Option<String>) {
    let chosen = code
        .codings()
        .find(|coding| is_snomed(coding) && coding.code().is_some_and(|c| !c.is_empty()))
        .or_else(|| code.first_coding());

    match chosen {
        Some(coding) => (
            coding.code().map(str::to_string),
            first_text([coding.display(), code.text()]).map(str::to_string),
        ),
        None => (None, code.text().map(str::to_string)),
    }
}

fn first_code(concept: Option<CodeableConcept<'_>>) -> Option<&str> {
    concept?.first_coding()?.code()
}

pub fn summarize_condition(condition: ConditionView<'_>) -> DiagnosisSummary {
    let (code, description) = condition
        .code()
        .map(code_and_description)
        .unwrap_or_default();

    let status = if condition.clinical_status().is_some_and(|s| s.has_codings()) {
        first_code(condition.clinical_status())
    } else {
        first_code(condition.verification_status())
    };

    let category = condition.first_category().and_then(|category| {
        if category.has_codings() {
            category.first_coding().and_then(|c| c.code())
        } else {
            category.text()
        }
    });

    DiagnosisSummary {
        code,
        description,
        status: status.map(str::to_string),
        category: category.map(str::to_string),
    }
}

pub fn summarize_conditions<'a, I>(conditions: I) -> Vec<DiagnosisSummary>
where
    I: IntoIterator<Item = ConditionView<'a>>,
{
    conditions.into_iter().map(summarize_condition).collect()
}
