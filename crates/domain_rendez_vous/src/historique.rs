//! Audit trail of rendez-vous changes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{RendezVousId, Utilisateur};
use domain_beneficiaire::Conseiller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationRendezVous {
    Creation,
    Modification,
    Suppression,
}

impl OperationRendezVous {
    pub fn message(&self) -> &'static str {
        match self {
            OperationRendezVous::Creation => "Création du rendez-vous",
            OperationRendezVous::Modification => "Modification du rendez-vous",
            OperationRendezVous::Suppression => "Suppression du rendez-vous",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuteurHistorique {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
}

impl From<&Utilisateur> for AuteurHistorique {
    fn from(utilisateur: &Utilisateur) -> Self {
        Self {
            id: utilisateur.id,
            prenom: utilisateur.prenom.clone(),
            nom: utilisateur.nom.clone(),
        }
    }
}

impl From<&Conseiller> for AuteurHistorique {
    fn from(conseiller: &Conseiller) -> Self {
        Self {
            id: conseiller.id.into_uuid(),
            prenom: conseiller.prenom.clone(),
            nom: conseiller.nom.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoriqueRendezVous {
    pub id: Uuid,
    pub id_rendez_vous: RendezVousId,
    pub date: DateTime<Utc>,
    pub auteur: AuteurHistorique,
    pub operation: OperationRendezVous,
    pub message: String,
}

impl HistoriqueRendezVous {
    pub fn creer(
        id_rendez_vous: RendezVousId,
        operation: OperationRendezVous,
        auteur: AuteurHistorique,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            id_rendez_vous,
            date: now,
            auteur,
            operation,
            message: operation.message().to_string(),
        }
    }
}
