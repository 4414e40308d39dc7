//! In-bundle reference resolution for Medication resources.

use std::collections::HashMap;
use std::fmt;

use crate::bundle::{BundleEntry, BundleIndex, ResourceKind};
use crate::views::MedicationView;

const SYNTHESIZED_PREFIX: &str = "urn:uuid:";

/// Lookup key of a referenceable resource.
///
/// `Declared` is the entry's `fullUrl`; `Synthesized` is derived from the
/// resource id when no `fullUrl` exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    Declared(String),
    Synthesized(String),
}

impl ReferenceKey {
    pub fn for_entry(entry: &BundleEntry<'_>) -> Option<Self> {
        if let Some(full_url) = entry.full_url {
            return Some(ReferenceKey::Declared(full_url.to_string()));
        }
        entry
            .id()
            .map(|id| ReferenceKey::Synthesized(format!("{SYNTHESIZED_PREFIX}{id}")))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReferenceKey::Declared(key) | ReferenceKey::Synthesized(key) => key,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps reference strings to the Medication resources of one bundle.
#[derive(Debug, Default)]
pub struct ReferenceResolver<'a> {
    medications: HashMap<String, (ReferenceKey, MedicationView<'a>)>,
}

impl<'a> ReferenceResolver<'a> {
    /// A later Medication with the same key replaces the earlier one.
    pub fn build(index: &BundleIndex<'a>) -> Self {
        let mut resolver = ReferenceResolver::default();
        for entry in index.entries(ResourceKind::Medication) {
            let Some(key) = ReferenceKey::for_entry(entry) else {
                continue;
            };
            resolver.medications.insert(
                key.as_str().to_string(),
                (key, MedicationView::new(entry.resource)),
            );
        }
        resolver
    }

    pub fn key_for(&self, reference: &str) -> Option<&ReferenceKey> {
        self.medications.get(reference).map(|(key, _)| key)
    }

    /// `None` is an unresolved reference, left for the caller to report.
    pub fn resolve(&self, reference: &str) -> Option<MedicationView<'a>> {
        self.medications.get(reference).map(|(_, medication)| *medication)
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_prefer_full_url_then_synthesize_from_id() {
        let bundle = json!({
            "entry": [
                {"fullUrl": "urn:uuid:med-a", "resource": {"resourceType": "Medication", "id": "ignored", "code": {"text": "A"}}},
                {"resource": {"resourceType": "Medication", "id": "med-b", "code": {"text": "B"}}},
                {"resource": {"resourceType": "Medication", "code": {"text": "no id"}}}
            ]
        });
        let index = BundleIndex::build(&bundle);
        let resolver = ReferenceResolver::build(&index);

        assert_eq!(resolver.len(), 2);
        assert_eq!(
            resolver.key_for("urn:uuid:med-a"),
            Some(&ReferenceKey::Declared("urn:uuid:med-a".into()))
        );
        assert_eq!(
            resolver.key_for("urn:uuid:med-b"),
            Some(&ReferenceKey::Synthesized("urn:uuid:med-b".into()))
        );
        assert!(resolver.resolve("urn:uuid:ignored").is_none());
        assert!(resolver.resolve("Medication/med-b").is_none());
    }

    #[test]
    fn last_medication_wins_on_duplicate_key() {
        let bundle = json!({
            "entry": [
                {"fullUrl": "urn:uuid:dup", "resource": {"resourceType": "Medication", "code": {"text": "first"}}},
                {"fullUrl": "urn:uuid:dup", "resource": {"resourceType": "Medication", "code": {"text": "second"}}}
            ]
        });
        let index = BundleIndex::build(&bundle);
        let resolver = ReferenceResolver::build(&index);
        let med = resolver.resolve("urn:uuid:dup").unwrap();
        assert_eq!(med.code().and_then(|c| c.text()), Some("second"));
    }
}
