//! Authenticated caller of a command or query

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identifiers::{ConseillerId, JeuneId};
use crate::structure::Structure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeUtilisateur {
    Conseiller,
    Jeune,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Superviseur,
    SuperviseurPeiPassEmploi,
}

/// Identity resolved from the access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utilisateur {
    pub id: Uuid,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub type_utilisateur: TypeUtilisateur,
    pub structure: Structure,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Utilisateur {
    pub fn est_conseiller(&self) -> bool {
        self.type_utilisateur == TypeUtilisateur::Conseiller
    }

    pub fn est_jeune(&self) -> bool {
        self.type_utilisateur == TypeUtilisateur::Jeune
    }

    pub fn est_support(&self) -> bool {
        self.type_utilisateur == TypeUtilisateur::Support
    }

    pub fn est_superviseur(&self) -> bool {
        self.est_conseiller()
            && self
                .roles
                .iter()
                .any(|role| matches!(role, Role::Superviseur | Role::SuperviseurPeiPassEmploi))
    }

    /// The caller's id as a conseiller, when the caller is one
    pub fn id_conseiller(&self) -> Option<ConseillerId> {
        self.est_conseiller().then(|| ConseillerId::from_uuid(self.id))
    }

    /// The caller's id as a jeune, when the caller is one
    pub fn id_jeune(&self) -> Option<JeuneId> {
        self.est_jeune().then(|| JeuneId::from_uuid(self.id))
    }

    pub fn est_le_conseiller(&self, id: ConseillerId) -> bool {
        self.id_conseiller() == Some(id)
    }

    pub fn est_le_jeune(&self, id: JeuneId) -> bool {
        self.id_jeune() == Some(id)
    }
}
