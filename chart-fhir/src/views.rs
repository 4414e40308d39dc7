//! Narrow, borrowed views over FHIR JSON.
//!
//! Each view exposes only what the field parsers read. A field of the wrong
//! JSON type reads as absent.

use serde_json::Value;

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn object_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| v.is_object())
}

/// First candidate carrying text. Empty text yields to a later candidate but
/// is still preferred over no value at all.
pub(crate) fn first_text<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut blank = None;
    for candidate in candidates.into_iter().flatten() {
        if !candidate.is_empty() {
            return Some(candidate);
        }
        blank.get_or_insert(candidate);
    }
    blank
}

#[derive(Debug, Clone, Copy)]
pub struct Coding<'a>(&'a Value);

impl<'a> Coding<'a> {
    pub fn system(&self) -> Option<&'a str> {
        str_field(self.0, "system")
    }

    pub fn code(&self) -> Option<&'a str> {
        str_field(self.0, "code")
    }

    pub fn display(&self) -> Option<&'a str> {
        str_field(self.0, "display")
    }
}

/// Where a concept's human label may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    FreeText,
    FirstCodingDisplay,
}

/// Label precedence shared by every CodeableConcept reader.
pub const CONCEPT_LABEL_ORDER: [LabelSource; 2] =
    [LabelSource::FreeText, LabelSource::FirstCodingDisplay];

#[derive(Debug, Clone, Copy)]
pub struct CodeableConcept<'a>(&'a Value);

impl<'a> CodeableConcept<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    pub fn text(&self) -> Option<&'a str> {
        str_field(self.0, "text")
    }

    pub fn codings(&self) -> impl Iterator<Item = Coding<'a>> {
        array_field(self.0, "coding").iter().map(Coding)
    }

    pub fn first_coding(&self) -> Option<Coding<'a>> {
        self.codings().next()
    }

    pub fn has_codings(&self) -> bool {
        !array_field(self.0, "coding").is_empty()
    }

    /// An empty `{}` concept counts as not present.
    pub fn is_populated(&self) -> bool {
        self.0.as_object().is_some_and(|obj| !obj.is_empty())
    }

    pub fn label_from(&self, source: LabelSource) -> Option<&'a str> {
        match source {
            LabelSource::FreeText => self.text(),
            LabelSource::FirstCodingDisplay => self.first_coding().and_then(|c| c.display()),
        }
    }

    /// Human label following [`CONCEPT_LABEL_ORDER`].
    pub fn label(&self) -> Option<&'a str> {
        first_text(CONCEPT_LABEL_ORDER.iter().map(|source| self.label_from(*source)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Reference<'a>(&'a Value);

impl<'a> Reference<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    pub fn reference(&self) -> Option<&'a str> {
        str_field(self.0, "reference")
    }

    pub fn display(&self) -> Option<&'a str> {
        str_field(self.0, "display")
    }

    pub fn identifier_value(&self) -> Option<&'a str> {
        object_field(self.0, "identifier").and_then(|id| str_field(id, "value"))
    }
}

fn concept<'a>(value: &'a Value, key: &str) -> Option<CodeableConcept<'a>> {
    value.get(key).and_then(CodeableConcept::new)
}

fn concepts<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = CodeableConcept<'a>> {
    array_field(value, key)
        .iter()
        .filter_map(CodeableConcept::new)
}

fn reference<'a>(value: &'a Value, key: &str) -> Option<Reference<'a>> {
    value.get(key).and_then(Reference::new)
}

fn references<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = Reference<'a>> {
    array_field(value, key).iter().filter_map(Reference::new)
}

#[derive(Debug, Clone, Copy)]
pub struct Telecom<'a>(&'a Value);

impl<'a> Telecom<'a> {
    pub fn system(&self) -> Option<&'a str> {
        str_field(self.0, "system")
    }

    pub fn use_(&self) -> Option<&'a str> {
        str_field(self.0, "use")
    }

    pub fn value(&self) -> Option<&'a str> {
        str_field(self.0, "value")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Address<'a>(&'a Value);

impl<'a> Address<'a> {
    pub fn use_(&self) -> Option<&'a str> {
        str_field(self.0, "use")
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        array_field(self.0, "line").iter().filter_map(Value::as_str)
    }

    pub fn part(&self, key: &str) -> Option<&'a str> {
        str_field(self.0, key)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HumanName<'a>(&'a Value);

impl<'a> HumanName<'a> {
    pub fn given(&self) -> impl Iterator<Item = &'a str> {
        array_field(self.0, "given").iter().filter_map(Value::as_str)
    }

    pub fn family(&self) -> Option<&'a str> {
        str_field(self.0, "family")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Communication<'a>(&'a Value);

impl<'a> Communication<'a> {
    pub fn is_preferred(&self) -> bool {
        self.0.get("preferred").and_then(Value::as_bool) == Some(true)
    }

    pub fn language(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "language")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PatientView<'a>(&'a Value);

impl<'a> PatientView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn names(&self) -> impl Iterator<Item = HumanName<'a>> {
        array_field(self.0, "name").iter().map(HumanName)
    }

    pub fn birth_date(&self) -> Option<&'a str> {
        str_field(self.0, "birthDate")
    }

    pub fn gender(&self) -> Option<&'a str> {
        str_field(self.0, "gender")
    }

    pub fn telecoms(&self) -> impl Iterator<Item = Telecom<'a>> {
        array_field(self.0, "telecom").iter().map(Telecom)
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address<'a>> {
        array_field(self.0, "address").iter().map(Address)
    }

    pub fn marital_status(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "maritalStatus")
    }

    pub fn communications(&self) -> impl Iterator<Item = Communication<'a>> {
        array_field(self.0, "communication").iter().map(Communication)
    }

    pub fn general_practitioners(&self) -> impl Iterator<Item = Reference<'a>> {
        references(self.0, "generalPractitioner")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageView<'a>(&'a Value);

impl<'a> CoverageView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    /// Code of the first coding of `type`, the coverage class.
    pub fn class_code(&self) -> Option<&'a str> {
        concept(self.0, "type")
            .and_then(|c| c.first_coding())
            .and_then(|c| c.code())
    }

    pub fn first_payor(&self) -> Option<Reference<'a>> {
        references(self.0, "payor").next()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Participant<'a>(&'a Value);

impl<'a> Participant<'a> {
    pub fn types(&self) -> impl Iterator<Item = CodeableConcept<'a>> {
        concepts(self.0, "type")
    }

    pub fn individual(&self) -> Option<Reference<'a>> {
        reference(self.0, "individual")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EncounterDiagnosis<'a>(&'a Value);

impl<'a> EncounterDiagnosis<'a> {
    /// Code of the first coding of `use`.
    pub fn use_code(&self) -> Option<&'a str> {
        concept(self.0, "use")
            .and_then(|c| c.first_coding())
            .and_then(|c| c.code())
    }

    pub fn condition_display(&self) -> Option<&'a str> {
        reference(self.0, "condition").and_then(|r| r.display())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EncounterView<'a>(&'a Value);

impl<'a> EncounterView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    pub fn period_field(&self, key: &str) -> Option<&'a str> {
        object_field(self.0, "period").and_then(|period| str_field(period, key))
    }

    pub fn first_type(&self) -> Option<CodeableConcept<'a>> {
        concepts(self.0, "type").next()
    }

    pub fn service_provider(&self) -> Option<Reference<'a>> {
        reference(self.0, "serviceProvider")
    }

    pub fn participants(&self) -> impl Iterator<Item = Participant<'a>> {
        array_field(self.0, "participant").iter().map(Participant)
    }

    pub fn diagnoses(&self) -> impl Iterator<Item = EncounterDiagnosis<'a>> {
        array_field(self.0, "diagnosis").iter().map(EncounterDiagnosis)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConditionView<'a>(&'a Value);

impl<'a> ConditionView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    pub fn code(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "code")
    }

    pub fn clinical_status(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "clinicalStatus")
    }

    pub fn verification_status(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "verificationStatus")
    }

    pub fn first_category(&self) -> Option<CodeableConcept<'a>> {
        concepts(self.0, "category").next()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MedicationRequestView<'a>(&'a Value);

impl<'a> MedicationRequestView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn medication_concept(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "medicationCodeableConcept")
    }

    pub fn medication_reference(&self) -> Option<Reference<'a>> {
        reference(self.0, "medicationReference")
    }

    pub fn authored_on(&self) -> Option<&'a str> {
        str_field(self.0, "authoredOn")
    }

    pub fn requester(&self) -> Option<Reference<'a>> {
        reference(self.0, "requester")
    }

    pub fn first_dosage_text(&self) -> Option<&'a str> {
        array_field(self.0, "dosageInstruction")
            .first()
            .and_then(|dosage| str_field(dosage, "text"))
    }

    pub fn status(&self) -> Option<&'a str> {
        str_field(self.0, "status")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MedicationView<'a>(&'a Value);

impl<'a> MedicationView<'a> {
    pub fn new(resource: &'a Value) -> Self {
        Self(resource)
    }

    pub fn code(&self) -> Option<CodeableConcept<'a>> {
        concept(self.0, "code")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_text_skips_blank_but_keeps_it_over_nothing() {
        assert_eq!(first_text([Some(""), Some("b")]), Some("b"));
        assert_eq!(first_text([None, Some("")]), Some(""));
        assert_eq!(first_text([None, None]), None);
    }

    #[test]
    fn concept_label_prefers_free_text() {
        let value = json!({"text": "Married", "coding": [{"display": "M"}]});
        let concept = CodeableConcept::new(&value).unwrap();
        assert_eq!(concept.label(), Some("Married"));

        let value = json!({"coding": [{"code": "M", "display": "Married"}]});
        assert_eq!(CodeableConcept::new(&value).unwrap().label(), Some("Married"));
    }

    #[test]
    fn wrong_json_types_read_as_absent() {
        let value = json!({"name": "not-a-list", "telecom": {"system": "phone"}});
        let patient = PatientView::new(&value);
        assert_eq!(patient.names().count(), 0);
        assert_eq!(patient.telecoms().count(), 0);
        assert!(patient.marital_status().is_none());
    }
}
