//! Period filter used when a jeune lists its rendez-vous

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::debut_de_journee;

use crate::rendez_vous::RendezVous;

/// Maximum number of past rendez-vous returned to a jeune
pub const LIMITE_RENDEZ_VOUS_PASSES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodeRendezVous {
    Passes,
    Futurs,
}

/// Filters and orders rendez-vous relative to the start of today (Paris)
///
/// Past ones come newest first and are capped; future ones and the
/// unfiltered list come oldest first.
pub fn filtrer_par_periode(
    mut rendez_vous: Vec<RendezVous>,
    periode: Option<PeriodeRendezVous>,
    now: DateTime<Utc>,
) -> Vec<RendezVous> {
    let aujourd_hui = debut_de_journee(now);
    match periode {
        Some(PeriodeRendezVous::Passes) => {
            rendez_vous.retain(|rdv| rdv.date < aujourd_hui);
            rendez_vous.sort_by(|a, b| b.date.cmp(&a.date));
            rendez_vous.truncate(LIMITE_RENDEZ_VOUS_PASSES);
        }
        Some(PeriodeRendezVous::Futurs) => {
            rendez_vous.retain(|rdv| rdv.date >= aujourd_hui);
            rendez_vous.sort_by(|a, b| a.date.cmp(&b.date));
        }
        None => rendez_vous.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    rendez_vous
}
