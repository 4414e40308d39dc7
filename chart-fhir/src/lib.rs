//! FHIR bundle JSON to `PatientRecord` extraction.

use chart_core::{ChartError, ChartResult, PatientRecord};
use serde_json::Value;
use tracing::{debug, warn};

pub mod bundle;
pub mod conditions;
pub mod demographics;
pub mod encounters;
pub mod insurance;
pub mod loader;
pub mod medications;
pub mod pcp;
pub mod references;
pub mod views;

pub use bundle::{BundleEntry, BundleIndex, ResourceKind};
pub use loader::{load_directory, LoadReport, LoaderConfig, SkippedDocument};
pub use references::{ReferenceKey, ReferenceResolver};

use crate::views::{ConditionView, CoverageView, EncounterView, MedicationRequestView, PatientView};

/// Extract a patient record from a JSON string.
pub fn extract_record_str(bundle_json: &str) -> ChartResult<PatientRecord> {
    let value: Value =
        serde_json::from_str(bundle_json).map_err(|err| ChartError::Parse(err.to_string()))?;
    if !value.is_object() {
        return Err(ChartError::Parse(
            "expected a JSON object at the document root".to_string(),
        ));
    }
    extract_record(&value)
}

/// Extract a patient record from a parsed bundle.
///
/// Fails only when the bundle holds no Patient resource. With several
/// patients, the first one is used.
pub fn extract_record(bundle: &Value) -> ChartResult<PatientRecord> {
    let index = BundleIndex::build(bundle);

    let Some(subject) = index.first(ResourceKind::Subject) else {
        let bundle_id = index.bundle_id().unwrap_or("unknown").to_string();
        warn!(bundle_id = %bundle_id, "no Patient resource in bundle");
        return Err(ChartError::MissingSubject { bundle_id });
    };

    debug!(
        bundle_id = index.bundle_id().unwrap_or("unknown"),
        coverages = index.count(ResourceKind::Coverage),
        encounters = index.count(ResourceKind::Encounter),
        conditions = index.count(ResourceKind::Condition),
        orders = index.count(ResourceKind::MedicationOrder),
        medications = index.count(ResourceKind::Medication),
        "indexed bundle"
    );

    let patient = PatientView::new(subject.resource);
    let encounter_views = || index.resources(ResourceKind::Encounter).map(EncounterView::new);
    let resolver = ReferenceResolver::build(&index);
    let demographics = demographics::parse_demographics(patient);

    Ok(PatientRecord {
        subject_id: subject.id().unwrap_or_default().to_string(),
        full_name: demographics.full_name,
        date_of_birth: demographics.date_of_birth,
        sex: demographics.sex,
        insurance_payor: insurance::parse_insurance(
            index.resources(ResourceKind::Coverage).map(CoverageView::new),
        ),
        pcp_name: pcp::parse_pcp(patient, encounter_views()),
        contact_phone: demographics.contact_phone,
        address_display: demographics.address_display,
        marital_status: demographics.marital_status,
        preferred_language: demographics.preferred_language,
        encounters: encounters::summarize_encounters(encounter_views()),
        diagnoses: conditions::summarize_conditions(
            index.resources(ResourceKind::Condition).map(ConditionView::new),
        ),
        medications: medications::summarize_medications(
            index
                .resources(ResourceKind::MedicationOrder)
                .map(MedicationRequestView::new),
            &resolver,
        ),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_invalid_json_and_non_objects() {
        assert!(matches!(extract_record_str("{not json"), Err(ChartError::Parse(_))));
        assert!(matches!(extract_record_str("[1, 2]"), Err(ChartError::Parse(_))));
    }

    #[test]
    fn missing_patient_reports_bundle_id() {
        let bundle = json!({"resourceType": "Bundle", "id": "b-1", "entry": [
            {"resource": {"resourceType": "Encounter", "id": "e1"}}
        ]});
        match extract_record(&bundle) {
            Err(ChartError::MissingSubject { bundle_id }) => assert_eq!(bundle_id, "b-1"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn patient_without_id_still_produces_record() {
        let bundle = json!({"entry": [{"resource": {"resourceType": "Patient"}}]});
        let record = extract_record(&bundle).unwrap();
        assert_eq!(record.subject_id, "");
        assert!(record.encounters.is_empty());
    }
}
