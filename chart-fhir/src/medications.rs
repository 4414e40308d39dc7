//! Medication summaries from MedicationRequest resources.

use chart_core::MedicationSummary;
use tracing::warn;

use crate::references::ReferenceResolver;
use crate::views::{MedicationRequestView, Reference};

pub const UNKNOWN_MEDICATION: &str = "Unknown medication";
pub const NAME_NOT_IN_REFERENCED: &str = "Unknown (name not found in referenced resource)";

/// Placeholder for a reference that points outside the bundle.
pub fn reference_not_found(reference: &str) -> String {
    format!("Unknown (reference {reference} not found)")
}

fn name_from_reference(
    order_id: &str,
    reference: Reference<'_>,
    resolver: &ReferenceResolver<'_>,
) -> String {
    let target = reference.reference().unwrap_or_default();

    match resolver.resolve(target) {
        Some(medication) => match medication.code().and_then(|code| code.label()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                warn!(
                    order_id,
                    reference = target,
                    "referenced Medication carries no name"
                );
                NAME_NOT_IN_REFERENCED.to_string()
            }
        },
        None => {
            warn!(
                order_id,
                reference = target,
                "medication reference not found in bundle"
            );
            match reference.display() {
                Some(display) if !display.is_empty() => display.to_string(),
                _ => reference_not_found(target),
            }
        }
    }
}

/// Embedded description, then reference, then a placeholder. Never empty.
pub fn medication_name(order: MedicationRequestView<'_>, resolver: &ReferenceResolver<'_>) -> String {
    let order_id = order.id().unwrap_or("N/A");

    let name = if let Some(concept) = order.medication_concept().filter(|c| c.is_populated()) {
        concept.label().map(str::to_string)
    } else {
        order
            .medication_reference()
            .map(|reference| name_from_reference(order_id, reference, resolver))
    };

    match name {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!(order_id, "could not determine medication name");
            UNKNOWN_MEDICATION.to_string()
        }
    }
}

pub fn summarize_medication(
    order: MedicationRequestView<'_>,
    resolver: &ReferenceResolver<'_>,
) -> MedicationSummary {
    MedicationSummary {
        name: medication_name(order, resolver),
        authored_on: order.authored_on().map(str::to_string),
        prescriber: order
            .requester()
            .and_then(|requester| requester.display())
            .map(str::to_string),
        dosage: order.first_dosage_text().map(str::to_string),
        status: order.status().map(str::to_string),
    }
}

pub fn summarize_medications<'a, I>(orders: I, resolver: &ReferenceResolver<'a>) -> Vec<MedicationSummary>
where
    I: IntoIterator<Item = MedicationRequestView<'a>>,
{
    orders
        .into_iter()
        .map(|order| summarize_medication(order, resolver))
        .collect()
}
