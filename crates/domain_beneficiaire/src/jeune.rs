//! Jeune aggregate
//!
//! A jeune is always loaded fully hydrated: its conseiller, its initial
//! conseiller (during a temporary transfer), its application configuration
//! and its notification preferences come back from a single repository call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AgenceId, ConseillerId, JeuneId, Structure};

use crate::conseiller::Conseiller;

/// Conseiller as seen from the jeune's side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConseillerDuJeune {
    pub id: ConseillerId,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub id_agence: Option<AgenceId>,
}

impl From<&Conseiller> for ConseillerDuJeune {
    fn from(conseiller: &Conseiller) -> Self {
        Self {
            id: conseiller.id,
            prenom: conseiller.prenom.clone(),
            nom: conseiller.nom.clone(),
            email: conseiller.email.clone(),
            id_agence: conseiller.id_agence(),
        }
    }
}

/// Mobile application state used to reach the jeune
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationApplication {
    pub push_notification_token: Option<String>,
    pub date_derniere_actualisation_token: Option<DateTime<Utc>>,
    pub app_version: Option<String>,
}

/// Notification and sharing preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub partage_favoris: bool,
    pub alertes_offres: bool,
    pub messages: bool,
    pub creation_action_conseiller: bool,
    pub rendez_vous_sessions: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            partage_favoris: true,
            alertes_offres: true,
            messages: true,
            creation_action_conseiller: true,
            rendez_vous_sessions: true,
        }
    }
}

/// Partial update of the preferences; `None` keeps the current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiseAJourPreferences {
    pub partage_favoris: Option<bool>,
    pub alertes_offres: Option<bool>,
    pub messages: Option<bool>,
    pub creation_action_conseiller: Option<bool>,
    pub rendez_vous_sessions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jeune {
    pub id: JeuneId,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub structure: Structure,
    pub date_creation: DateTime<Utc>,
    pub is_activated: bool,
    pub conseiller: Option<ConseillerDuJeune>,
    pub id_conseiller_initial: Option<ConseillerId>,
    pub id_partenaire: Option<String>,
    pub configuration: ConfigurationApplication,
    pub preferences: Preferences,
}

/// Input of the jeune factory
#[derive(Debug, Clone)]
pub struct NouveauJeune {
    pub id: JeuneId,
    pub prenom: String,
    pub nom: String,
    pub email: Option<String>,
    pub structure: Structure,
    pub id_partenaire: Option<String>,
}

impl Jeune {
    /// Creates a jeune attached to `conseiller`; the account stays inactive
    /// until the first connection from the mobile application.
    pub fn creer(nouveau: NouveauJeune, conseiller: &Conseiller, now: DateTime<Utc>) -> Self {
        Self {
            id: nouveau.id,
            prenom: nouveau.prenom,
            nom: nouveau.nom,
            email: nouveau.email.map(|email| email.trim().to_lowercase()),
            structure: nouveau.structure,
            date_creation: now,
            is_activated: false,
            conseiller: Some(ConseillerDuJeune::from(conseiller)),
            id_conseiller_initial: None,
            id_partenaire: nouveau.id_partenaire,
            configuration: ConfigurationApplication::default(),
            preferences: Preferences::default(),
        }
    }

    pub fn id_conseiller(&self) -> Option<ConseillerId> {
        self.conseiller.as_ref().map(|conseiller| conseiller.id)
    }

    pub fn id_agence_du_conseiller(&self) -> Option<AgenceId> {
        self.conseiller.as_ref().and_then(|conseiller| conseiller.id_agence)
    }

    pub fn est_suivi_par(&self, id_conseiller: ConseillerId) -> bool {
        self.id_conseiller() == Some(id_conseiller)
    }

    /// True for the current conseiller and for the conseiller who lent the
    /// jeune during a temporary transfer
    pub fn est_suivi_ou_prete_par(&self, id_conseiller: ConseillerId) -> bool {
        self.est_suivi_par(id_conseiller) || self.id_conseiller_initial == Some(id_conseiller)
    }

    pub fn push_notification_token(&self) -> Option<&str> {
        self.configuration
            .push_notification_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    pub fn mettre_a_jour_token(&mut self, token: impl Into<String>, now: DateTime<Utc>) {
        self.configuration.push_notification_token = Some(token.into());
        self.configuration.date_derniere_actualisation_token = Some(now);
        self.is_activated = true;
    }

    pub fn mettre_a_jour_preferences(&mut self, maj: MiseAJourPreferences) {
        let prefs = &mut self.preferences;
        prefs.partage_favoris = maj.partage_favoris.unwrap_or(prefs.partage_favoris);
        prefs.alertes_offres = maj.alertes_offres.unwrap_or(prefs.alertes_offres);
        prefs.messages = maj.messages.unwrap_or(prefs.messages);
        prefs.creation_action_conseiller = maj
            .creation_action_conseiller
            .unwrap_or(prefs.creation_action_conseiller);
        prefs.rendez_vous_sessions = maj
            .rendez_vous_sessions
            .unwrap_or(prefs.rendez_vous_sessions);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeTransfert {
    Definitif,
    Temporaire,
}

/// Audit row written for each transferred jeune
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfertConseiller {
    pub id_jeune: JeuneId,
    pub id_conseiller_source: ConseillerId,
    pub id_conseiller_cible: ConseillerId,
    pub id_conseiller_qui_transfert: Option<ConseillerId>,
    pub type_transfert: TypeTransfert,
    pub date_transfert: DateTime<Utc>,
}

/// Moves `jeunes` to `cible`
///
/// On a temporary transfer the jeune remembers the conseiller it was lent
/// from; handing the jeune back to that conseiller clears the loan. A
/// definitive transfer always clears it.
pub fn transferer_les_jeunes(
    jeunes: Vec<Jeune>,
    cible: &Conseiller,
    type_transfert: TypeTransfert,
) -> Vec<Jeune> {
    jeunes
        .into_iter()
        .map(|mut jeune| {
            jeune.id_conseiller_initial = match type_transfert {
                TypeTransfert::Temporaire => jeune
                    .id_conseiller_initial
                    .or_else(|| jeune.id_conseiller())
                    .filter(|initial| *initial != cible.id),
                TypeTransfert::Definitif => None,
            };
            jeune.conseiller = Some(ConseillerDuJeune::from(cible));
            jeune
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn conseiller(prenom: &str) -> Conseiller {
        Conseiller {
            id: ConseillerId::new(),
            prenom: prenom.to_string(),
            nom: "Tavernier".to_string(),
            email: None,
            structure: Structure::Milo,
            agence: None,
            date_derniere_connexion: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_creer_jeune_par_defaut() {
        let conseiller = conseiller("Nils");
        let jeune = Jeune::creer(
            NouveauJeune {
                id: JeuneId::new(),
                prenom: "Kenji".to_string(),
                nom: "Girac".to_string(),
                email: Some(" Kenji.Girac@Mail.fr ".to_string()),
                structure: Structure::Milo,
                id_partenaire: Some("12345".to_string()),
            },
            &conseiller,
            now(),
        );

        assert!(!jeune.is_activated);
        assert!(jeune.preferences.partage_favoris);
        assert_eq!(jeune.email.as_deref(), Some("kenji.girac@mail.fr"));
        assert!(jeune.est_suivi_par(conseiller.id));
        assert!(jeune.push_notification_token().is_none());
    }

    #[test]
    fn test_token_vide_ignore() {
        let conseiller = conseiller("Nils");
        let mut jeune = Jeune::creer(
            NouveauJeune {
                id: JeuneId::new(),
                prenom: "Kenji".to_string(),
                nom: "Girac".to_string(),
                email: None,
                structure: Structure::Milo,
                id_partenaire: None,
            },
            &conseiller,
            now(),
        );
        jeune.mettre_a_jour_token("", now());
        assert!(jeune.push_notification_token().is_none());
        assert!(jeune.is_activated);
    }
}
