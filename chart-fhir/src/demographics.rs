//! Patient demographics: name, contact, address, marital status, language.

use crate::views::{Address, PatientView};

/// Telecom `use` values accepted as the contact phone.
pub const PHONE_USES: [&str; 2] = ["home", "mobile"];

const PHONE_SYSTEM: &str = "phone";

const HOME_ADDRESS_USE: &str = "home";

/// Address parts after the joined street lines, in display order.
pub const ADDRESS_PARTS: [&str; 4] = ["city", "state", "postalCode", "country"];

/// Demographic fields read straight from the subject resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub contact_phone: Option<String>,
    pub address_display: Option<String>,
    pub marital_status: Option<String>,
    pub preferred_language: Option<String>,
}

pub fn parse_demographics(patient: PatientView<'_>) -> Demographics {
    Demographics {
        full_name: full_name(patient),
        date_of_birth: patient.birth_date().map(str::to_string),
        sex: patient.gender().map(str::to_string),
        contact_phone: contact_phone(patient),
        address_display: address_display(patient),
        marital_status: marital_status(patient),
        preferred_language: preferred_language(patient),
    }
}

/// Given names joined by spaces, then the family name, trimmed.
pub fn full_name(patient: PatientView<'_>) -> Option<String> {
    let name = patient.names().next()?;
    let given = name.given().collect::<Vec<_>>().join(" ");
    let family = name.family().unwrap_or_default();
    Some(format!("{given} {family}").trim().to_string())
}

pub fn contact_phone(patient: PatientView<'_>) -> Option<String> {
    patient
        .telecoms()
        .find(|telecom| {
            telecom.system() == Some(PHONE_SYSTEM)
                && telecom.use_().is_some_and(|u| PHONE_USES.contains(&u))
        })
        .and_then(|telecom| telecom.value())
        .map(str::to_string)
}

pub fn address_display(patient: PatientView<'_>) -> Option<String> {
    let address = patient
        .addresses()
        .find(|address| address.use_() == Some(HOME_ADDRESS_USE))
        .or_else(|| patient.addresses().next())?;
    Some(compose_address(address))
}

fn compose_address(address: Address<'_>) -> String {
    let street = address.lines().collect::<Vec<_>>().join(", ");
    std::iter::once(Some(street.as_str()))
        .chain(ADDRESS_PARTS.iter().map(|key| address.part(key)))
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn marital_status(patient: PatientView<'_>) -> Option<String> {
    patient
        .marital_status()
        .and_then(|status| status.label())
        .map(str::to_string)
}

/// The entry flagged `preferred`, else the first entry.
pub fn preferred_language(patient: PatientView<'_>) -> Option<String> {
    let communication = patient
        .communications()
        .find(|c| c.is_preferred())
        .or_else(|| patient.communications().next())?;
    communication
        .language()
        .and_then(|language| language.label())
        .map(str::to_string)
}
