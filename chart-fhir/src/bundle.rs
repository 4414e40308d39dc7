//! Groups bundle entries by resource kind.

use std::collections::HashMap;

use serde_json::Value;

/// Resource kinds the extractor consumes. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Subject,
    Coverage,
    Encounter,
    Condition,
    MedicationOrder,
    Medication,
}

impl ResourceKind {
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "Patient" => Some(ResourceKind::Subject),
            "Coverage" => Some(ResourceKind::Coverage),
            "Encounter" => Some(ResourceKind::Encounter),
            "Condition" => Some(ResourceKind::Condition),
            "MedicationRequest" => Some(ResourceKind::MedicationOrder),
            "Medication" => Some(ResourceKind::Medication),
            _ => None,
        }
    }
}

/// A resource together with the `fullUrl` of the entry that carried it.
#[derive(Debug, Clone, Copy)]
pub struct BundleEntry<'a> {
    pub full_url: Option<&'a str>,
    pub resource: &'a Value,
}

impl<'a> BundleEntry<'a> {
    pub fn id(&self) -> Option<&'a str> {
        self.resource.get("id").and_then(Value::as_str)
    }
}

/// Resources of one bundle grouped by kind, each group in document order.
#[derive(Debug, Default)]
pub struct BundleIndex<'a> {
    bundle_id: Option<&'a str>,
    groups: HashMap<ResourceKind, Vec<BundleEntry<'a>>>,
}

impl<'a> BundleIndex<'a> {
    /// Single pass over `entry[]`. A missing or malformed entry list yields
    /// empty groups.
    pub fn build(bundle: &'a Value) -> Self {
        let mut index = BundleIndex {
            bundle_id: bundle.get("id").and_then(Value::as_str),
            groups: HashMap::new(),
        };

        let Some(entries) = bundle.get("entry").and_then(Value::as_array) else {
            return index;
        };

        for entry in entries {
            let Some(resource) = entry.get("resource") else {
                continue;
            };
            let Some(kind) = resource
                .get("resourceType")
                .and_then(Value::as_str)
                .and_then(ResourceKind::from_resource_type)
            else {
                continue;
            };

            index.groups.entry(kind).or_default().push(BundleEntry {
                full_url: entry.get("fullUrl").and_then(Value::as_str),
                resource,
            });
        }

        index
    }

    pub fn bundle_id(&self) -> Option<&'a str> {
        self.bundle_id
    }

    pub fn entries(&self, kind: ResourceKind) -> &[BundleEntry<'a>] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn resources(&self, kind: ResourceKind) -> impl Iterator<Item = &'a Value> + '_ {
        self.entries(kind).iter().map(|entry| entry.resource)
    }

    pub fn first(&self, kind: ResourceKind) -> Option<&BundleEntry<'a>> {
        self.entries(kind).first()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.entries(kind).len()
    }
}
