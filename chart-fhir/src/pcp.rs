//! Primary care provider resolution.

use crate::views::{EncounterView, Participant, PatientView};

/// Participant-type codes designating the primary care provider.
pub const PCP_DESIGNATORS: [&str; 2] = ["PCP", "primaryCarePhysician"];

fn is_pcp(participant: &Participant<'_>) -> bool {
    participant
        .types()
        .flat_map(|concept| concept.codings())
        .any(|coding| coding.code().is_some_and(|code| PCP_DESIGNATORS.contains(&code)))
}

/// Two tiers: a PCP-coded participant anywhere in the encounters, then the
/// subject's first general practitioner.
pub fn parse_pcp<'a, I>(patient: PatientView<'a>, encounters: I) -> Option<String>
where
    I: IntoIterator<Item = EncounterView<'a>>,
{
    let from_encounters = encounters.into_iter().find_map(|encounter| {
        encounter
            .participants()
            .filter(is_pcp)
            .find_map(|participant| {
                participant
                    .individual()
                    .and_then(|individual| individual.display())
                    .filter(|display| !display.is_empty())
            })
    });

    from_encounters
        .or_else(|| {
            patient
                .general_practitioners()
                .next()
                .and_then(|gp| gp.display())
                .filter(|display| !display.is_empty())
        })
        .map(str::to_string)
}
