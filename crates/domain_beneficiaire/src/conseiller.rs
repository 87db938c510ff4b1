//! Conseillers and the agences they work in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AgenceId, ConseillerId, Structure};

/// Agence reference carried by a conseiller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgenceDuConseiller {
    pub id: AgenceId,
    pub nom: Option<String>,
}

/// A case-worker following a portfolio of jeunes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conseiller {
    pub id: ConseillerId,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub structure: Structure,
    pub agence: Option<AgenceDuConseiller>,
    pub date_derniere_connexion: Option<DateTime<Utc>>,
}

impl Conseiller {
    pub fn id_agence(&self) -> Option<AgenceId> {
        self.agence.as_ref().map(|agence| agence.id)
    }

    /// True when both conseillers are attached to the same agence
    pub fn partage_l_agence_de(&self, autre: Option<AgenceId>) -> bool {
        matches!((self.id_agence(), autre), (Some(a), Some(b)) if a == b)
    }

    pub fn changer_d_agence(&mut self, agence: &Agence) {
        self.agence = Some(AgenceDuConseiller {
            id: agence.id,
            nom: Some(agence.nom.clone()),
        });
    }
}

/// Organisational unit conseillers are attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agence {
    pub id: AgenceId,
    pub nom: String,
    pub code_departement: String,
    pub structure: Structure,
}
