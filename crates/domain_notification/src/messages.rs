//! Push notification messages
//!
//! Titles and bodies are fixed French strings; only the rendez-vous
//! deletion and reminder bodies depend on dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::temporal::{format_jour_mois, jours_calendaires_entre};
use core_kernel::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeNotification {
    #[serde(rename = "NEW_RENDEZVOUS")]
    NouveauRendezVous,
    #[serde(rename = "UPDATED_RENDEZVOUS")]
    RendezVousModifie,
    #[serde(rename = "DELETED_RENDEZVOUS")]
    RendezVousSupprime,
    #[serde(rename = "NEW_ACTION")]
    NouvelleAction,
    #[serde(rename = "NEW_MESSAGE")]
    NouveauMessage,
    #[serde(rename = "RAPPEL_RENDEZVOUS")]
    RappelRendezVous,
    #[serde(rename = "DETAIL_ACTION")]
    DetailAction,
    #[serde(rename = "OUTILS")]
    Outils,
}

impl TypeNotification {
    pub const ALL: [TypeNotification; 8] = [
        TypeNotification::NouveauRendezVous,
        TypeNotification::RendezVousModifie,
        TypeNotification::RendezVousSupprime,
        TypeNotification::NouvelleAction,
        TypeNotification::NouveauMessage,
        TypeNotification::RappelRendezVous,
        TypeNotification::DetailAction,
        TypeNotification::Outils,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeNotification::NouveauRendezVous => "NEW_RENDEZVOUS",
            TypeNotification::RendezVousModifie => "UPDATED_RENDEZVOUS",
            TypeNotification::RendezVousSupprime => "DELETED_RENDEZVOUS",
            TypeNotification::NouvelleAction => "NEW_ACTION",
            TypeNotification::NouveauMessage => "NEW_MESSAGE",
            TypeNotification::RappelRendezVous => "RAPPEL_RENDEZVOUS",
            TypeNotification::DetailAction => "DETAIL_ACTION",
            TypeNotification::Outils => "OUTILS",
        }
    }
}

impl fmt::Display for TypeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeNotification {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                DomainError::mauvaise_commande(format!("Type de notification '{}' inconnu", s))
            })
    }
}

/// Content of one push notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub type_notification: TypeNotification,
    pub titre: String,
    pub description: String,
    /// Id of the action or rendez-vous the application should open
    pub id_objet: Option<String>,
}

impl NotificationMessage {
    fn new(
        type_notification: TypeNotification,
        titre: &str,
        description: impl Into<String>,
        id_objet: Option<String>,
    ) -> Self {
        Self {
            type_notification,
            titre: titre.to_string(),
            description: description.into(),
            id_objet,
        }
    }

    pub fn nouveau_rendez_vous(id_rendez_vous: impl ToString) -> Self {
        Self::new(
            TypeNotification::NouveauRendezVous,
            "Nouveau rendez-vous",
            "Votre conseiller a programmé un nouveau rendez-vous",
            Some(id_rendez_vous.to_string()),
        )
    }

    pub fn rendez_vous_modifie(id_rendez_vous: impl ToString) -> Self {
        Self::new(
            TypeNotification::RendezVousModifie,
            "Rendez-vous modifié",
            "Votre rendez-vous a été modifié",
            Some(id_rendez_vous.to_string()),
        )
    }

    pub fn rendez_vous_supprime(date: DateTime<Utc>) -> Self {
        Self::new(
            TypeNotification::RendezVousSupprime,
            "Rendez-vous supprimé",
            format!("Votre rendez-vous du {} est supprimé", format_jour_mois(date)),
            None,
        )
    }

    pub fn nouvelle_action(id_action: impl ToString) -> Self {
        Self::new(
            TypeNotification::NouvelleAction,
            "Nouvelle action",
            "Vous avez une nouvelle action",
            Some(id_action.to_string()),
        )
    }

    pub fn nouveau_message() -> Self {
        Self::new(
            TypeNotification::NouveauMessage,
            "Nouveau message",
            "Vous avez un nouveau message",
            None,
        )
    }

    /// Reminder for a rendez-vous, or `None` when no reminder applies
    ///
    /// Nothing is sent for a past rendez-vous, nor between 2 and 6 days
    /// ahead; the body says "demain" up to one day ahead and "dans une
    /// semaine" beyond.
    pub fn rappel_rendez_vous(
        id_rendez_vous: impl ToString,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if date < now {
            return None;
        }
        let jours = jours_calendaires_entre(now, date);
        if (2..7).contains(&jours) {
            return None;
        }

        let description = if jours <= 1 {
            "Vous avez un rendez-vous demain"
        } else {
            "Vous avez un rendez-vous dans une semaine"
        };
        Some(Self::new(
            TypeNotification::RappelRendezVous,
            "Rappel rendez-vous",
            description,
            Some(id_rendez_vous.to_string()),
        ))
    }

    pub fn rappel_action(id_action: impl ToString) -> Self {
        Self::new(
            TypeNotification::DetailAction,
            "Rappel action",
            "Une action arrive à échéance dans 3 jours",
            Some(id_action.to_string()),
        )
    }

    pub fn commentaire_action(id_action: impl ToString) -> Self {
        Self::new(
            TypeNotification::DetailAction,
            "Action mise à jour",
            "Un commentaire a été ajouté par votre conseiller",
            Some(id_action.to_string()),
        )
    }

    /// Free-form broadcast message
    pub fn personnalise(
        type_notification: TypeNotification,
        titre: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            type_notification,
            titre: titre.into(),
            description: description.into(),
            id_objet: None,
        }
    }
}
