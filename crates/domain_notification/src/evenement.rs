//! Engagement events recorded after each successful command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Structure, TypeUtilisateur, Utilisateur};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeEvenement {
    ActionCreee,
    ActionModifiee,
    ActionSupprimee,
    ActionCommentee,
    ActionQualifiee,
    RendezVousCree,
    RendezVousModifie,
    RendezVousSupprime,
    AnimationCollectiveCloturee,
    CompteJeuneCree,
    CompteJeuneModifie,
    CompteJeuneSupprime,
    PreferencesModifiees,
    TokenMisAJour,
    JeunesTransferes,
    ListeDeDiffusionCreee,
    ListeDeDiffusionModifiee,
    ListeDeDiffusionSupprimee,
    SuggestionCreee,
    SuggestionRefusee,
    NotificationBeneficiairesPlanifiee,
    MessageEnvoye,
    MessageEnvoyeMultiple,
    MessageEnvoyePj,
    MessageEnvoyeMultiplePj,
}

impl CodeEvenement {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeEvenement::ActionCreee => "ACTION_CREEE",
            CodeEvenement::ActionModifiee => "ACTION_MODIFIEE",
            CodeEvenement::ActionSupprimee => "ACTION_SUPPRIMEE",
            CodeEvenement::ActionCommentee => "ACTION_COMMENTEE",
            CodeEvenement::ActionQualifiee => "ACTION_QUALIFIEE",
            CodeEvenement::RendezVousCree => "RENDEZ_VOUS_CREE",
            CodeEvenement::RendezVousModifie => "RENDEZ_VOUS_MODIFIE",
            CodeEvenement::RendezVousSupprime => "RENDEZ_VOUS_SUPPRIME",
            CodeEvenement::AnimationCollectiveCloturee => "ANIMATION_COLLECTIVE_CLOTUREE",
            CodeEvenement::CompteJeuneCree => "COMPTE_JEUNE_CREE",
            CodeEvenement::CompteJeuneModifie => "COMPTE_JEUNE_MODIFIE",
            CodeEvenement::CompteJeuneSupprime => "COMPTE_JEUNE_SUPPRIME",
            CodeEvenement::PreferencesModifiees => "PREFERENCES_MODIFIEES",
            CodeEvenement::TokenMisAJour => "TOKEN_MIS_A_JOUR",
            CodeEvenement::JeunesTransferes => "JEUNES_TRANSFERES",
            CodeEvenement::ListeDeDiffusionCreee => "LISTE_DE_DIFFUSION_CREEE",
            CodeEvenement::ListeDeDiffusionModifiee => "LISTE_DE_DIFFUSION_MODIFIEE",
            CodeEvenement::ListeDeDiffusionSupprimee => "LISTE_DE_DIFFUSION_SUPPRIMEE",
            CodeEvenement::SuggestionCreee => "SUGGESTION_CREEE",
            CodeEvenement::SuggestionRefusee => "SUGGESTION_REFUSEE",
            CodeEvenement::NotificationBeneficiairesPlanifiee => {
                "NOTIFICATION_BENEFICIAIRES_PLANIFIEE"
            }
            CodeEvenement::MessageEnvoye => "MESSAGE_ENVOYE",
            CodeEvenement::MessageEnvoyeMultiple => "MESSAGE_ENVOYE_MULTIPLE",
            CodeEvenement::MessageEnvoyePj => "MESSAGE_ENVOYE_PJ",
            CodeEvenement::MessageEnvoyeMultiplePj => "MESSAGE_ENVOYE_MULTIPLE_PJ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emetteur {
    pub id: Uuid,
    pub type_utilisateur: TypeUtilisateur,
    pub structure: Structure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evenement {
    pub code: CodeEvenement,
    pub emetteur: Emetteur,
    pub date: DateTime<Utc>,
}

impl Evenement {
    pub fn creer(code: CodeEvenement, utilisateur: &Utilisateur, now: DateTime<Utc>) -> Self {
        Self {
            code,
            emetteur: Emetteur {
                id: utilisateur.id,
                type_utilisateur: utilisateur.type_utilisateur,
                structure: utilisateur.structure,
            },
            date: now,
        }
    }
}
