//! Property-Based Test Generators
//!
//! proptest strategies for instants around the Paris business window and
//! for the domain enums.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::Structure;
use domain_action::StatutAction;
use domain_beneficiaire::Preferences;

/// Any instant between 2024 and 2026, minute precision
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    let debut = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0i64..(3 * 365 * 24 * 60)).prop_map(move |minutes| debut + Duration::minutes(minutes))
}

pub fn structure_strategy() -> impl Strategy<Value = Structure> {
    prop::sample::select(Structure::ALL.to_vec())
}

pub fn statut_action_strategy() -> impl Strategy<Value = StatutAction> {
    prop_oneof![
        Just(StatutAction::PasCommencee),
        Just(StatutAction::EnCours),
        Just(StatutAction::Terminee),
        Just(StatutAction::Annulee),
    ]
}

pub fn preferences_strategy() -> impl Strategy<Value = Preferences> {
    any::<[bool; 5]>().prop_map(|p| Preferences {
        partage_favoris: p[0],
        alertes_offres: p[1],
        messages: p[2],
        creation_action_conseiller: p[3],
        rendez_vous_sessions: p[4],
    })
}

/// Audience size of a broadcast
pub fn audience_strategy() -> impl Strategy<Value = u64> {
    0u64..100_000
}
