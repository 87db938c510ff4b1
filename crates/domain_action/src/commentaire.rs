//! Comments exchanged on an action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ActionId, CommentaireId, Utilisateur};

use crate::action::{Createur, TypeCreateur};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentaire {
    pub id: CommentaireId,
    pub id_action: ActionId,
    pub date: DateTime<Utc>,
    pub createur: Createur,
    pub message: String,
}

impl Commentaire {
    pub fn creer(
        id_action: ActionId,
        message: impl Into<String>,
        auteur: &Utilisateur,
        now: DateTime<Utc>,
    ) -> Self {
        let type_createur = if auteur.est_jeune() {
            TypeCreateur::Jeune
        } else {
            TypeCreateur::Conseiller
        };

        Self {
            id: CommentaireId::new(),
            id_action,
            date: now,
            createur: Createur {
                id: auteur.id,
                type_createur,
                prenom: auteur.prenom.clone(),
                nom: auteur.nom.clone(),
            },
            message: message.into(),
        }
    }

    pub fn est_du_conseiller(&self) -> bool {
        self.createur.type_createur == TypeCreateur::Conseiller
    }
}
