//! RendezVous aggregate
//!
//! A rendez-vous links one conseiller (its createur) to one or more jeunes.
//! Ateliers and informations collectives are "animations collectives": they
//! belong to the createur's agence, may gather jeunes of other conseillers of
//! that agence, and are closed once the session is over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AgenceId, ConseillerId, DomainError, DomainResult, JeuneId, RendezVousId};
use domain_beneficiaire::{ConfigurationApplication, Conseiller, ConseillerDuJeune, Jeune, Preferences};

use crate::type_rendez_vous::CodeTypeRendezVous;

pub const TITRE_PAR_DEFAUT: &str = "Rendez-vous conseiller";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceRendezVous {
    PassEmploi,
    Milo,
}

impl SourceRendezVous {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceRendezVous::PassEmploi => "PASS_EMPLOI",
            SourceRendezVous::Milo => "MILO",
        }
    }
}

/// Effect of a conseiller's change of agence on one animation collective
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaffectationAnimationCollective {
    pub agence_transferee: bool,
    pub jeunes_desinscrits: Vec<JeuneDuRendezVous>,
}

/// Jeune as carried by a rendez-vous, with what is needed to notify it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JeuneDuRendezVous {
    pub id: JeuneId,
    pub prenom: String,
    pub nom: String,
    pub conseiller: Option<ConseillerDuJeune>,
    pub configuration: ConfigurationApplication,
    pub preferences: Preferences,
    /// Attendance, only filled on animations collectives
    pub present: Option<bool>,
}

impl JeuneDuRendezVous {
    pub fn id_conseiller(&self) -> Option<ConseillerId> {
        self.conseiller.as_ref().map(|c| c.id)
    }

    pub fn id_agence_du_conseiller(&self) -> Option<AgenceId> {
        self.conseiller.as_ref().and_then(|c| c.id_agence)
    }

    pub fn push_notification_token(&self) -> Option<&str> {
        self.configuration
            .push_notification_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

impl From<&Jeune> for JeuneDuRendezVous {
    fn from(jeune: &Jeune) -> Self {
        Self {
            id: jeune.id,
            prenom: jeune.prenom.clone(),
            nom: jeune.nom.clone(),
            conseiller: jeune.conseiller.clone(),
            configuration: jeune.configuration.clone(),
            preferences: jeune.preferences,
            present: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateurRendezVous {
    pub id: ConseillerId,
    pub prenom: String,
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendezVous {
    pub id: RendezVousId,
    pub titre: String,
    pub sous_titre: String,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    /// Minutes
    pub duree: u32,
    pub type_rendez_vous: CodeTypeRendezVous,
    pub precision: Option<String>,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: bool,
    pub invitation: bool,
    pub jeunes: Vec<JeuneDuRendezVous>,
    pub createur: CreateurRendezVous,
    pub id_agence: Option<AgenceId>,
    pub date_cloture: Option<DateTime<Utc>>,
    pub source: SourceRendezVous,
}

/// Input of the rendez-vous factory
#[derive(Debug, Clone, Default)]
pub struct InfosRendezVousACreer {
    pub titre: Option<String>,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    pub duree: u32,
    pub type_rendez_vous: Option<CodeTypeRendezVous>,
    pub precision: Option<String>,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: Option<bool>,
    pub invitation: Option<bool>,
}

/// New values of an update; `jeunes` replaces the whole participant list
#[derive(Debug, Clone)]
pub struct InfosRendezVousAMettreAJour {
    pub titre: Option<String>,
    pub commentaire: Option<String>,
    pub modalite: Option<String>,
    pub date: DateTime<Utc>,
    pub duree: u32,
    pub adresse: Option<String>,
    pub organisme: Option<String>,
    pub presence_conseiller: bool,
    pub jeunes: Vec<Jeune>,
}

/// Differences produced by an update, used to pick the notifications to send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationsRendezVous {
    pub jeunes_ajoutes: Vec<JeuneDuRendezVous>,
    pub jeunes_retires: Vec<JeuneDuRendezVous>,
    pub jeunes_conserves: Vec<JeuneDuRendezVous>,
    pub date_modifiee: bool,
    /// Date, duree or adresse changed
    pub infos_modifiees: bool,
}

impl RendezVous {
    pub fn creer(
        infos: InfosRendezVousACreer,
        jeunes: &[Jeune],
        conseiller: &Conseiller,
    ) -> DomainResult<Self> {
        let type_rendez_vous = infos
            .type_rendez_vous
            .unwrap_or(CodeTypeRendezVous::EntretienIndividuelConseiller);
        let est_animation_collective = type_rendez_vous.est_animation_collective();

        let id_agence = if est_animation_collective {
            Some(
                conseiller
                    .id_agence()
                    .ok_or_else(|| DomainError::ConseillerSansAgence(conseiller.id.to_string()))?,
            )
        } else {
            None
        };

        if !est_animation_collective {
            if let Some(jeune) = jeunes.iter().find(|j| !j.est_suivi_par(conseiller.id)) {
                return Err(DomainError::jeune_non_lie_au_conseiller(conseiller.id, jeune.id));
            }
        }

        Ok(Self {
            id: RendezVousId::new(),
            titre: infos.titre.unwrap_or_else(|| TITRE_PAR_DEFAUT.to_string()),
            sous_titre: format!("avec {}", conseiller.prenom),
            commentaire: infos.commentaire,
            modalite: infos.modalite,
            date: infos.date,
            duree: infos.duree,
            type_rendez_vous,
            precision: infos.precision,
            adresse: infos.adresse,
            organisme: infos.organisme,
            presence_conseiller: infos.presence_conseiller.unwrap_or(true),
            invitation: infos.invitation.unwrap_or(false),
            jeunes: jeunes.iter().map(JeuneDuRendezVous::from).collect(),
            createur: CreateurRendezVous {
                id: conseiller.id,
                prenom: conseiller.prenom.clone(),
                nom: conseiller.nom.clone(),
            },
            id_agence,
            date_cloture: None,
            source: SourceRendezVous::PassEmploi,
        })
    }

    pub fn est_animation_collective(&self) -> bool {
        self.type_rendez_vous.est_animation_collective()
    }

    pub fn est_cloture(&self) -> bool {
        self.date_cloture.is_some()
    }

    pub fn ids_jeunes(&self) -> Vec<JeuneId> {
        self.jeunes.iter().map(|j| j.id).collect()
    }

    pub fn concerne_le_jeune(&self, id_jeune: JeuneId) -> bool {
        self.jeunes.iter().any(|j| j.id == id_jeune)
    }

    pub fn mettre_a_jour(
        &mut self,
        infos: InfosRendezVousAMettreAJour,
    ) -> DomainResult<ModificationsRendezVous> {
        if self.est_animation_collective() && self.est_cloture() {
            return Err(DomainError::mauvaise_commande(
                "Une Animation Collective cloturée ne peut plus etre modifiée.",
            ));
        }
        if !self.est_animation_collective() && infos.jeunes.is_empty() {
            return Err(DomainError::mauvaise_commande(
                "Un bénéficiaire minimum est requis.",
            ));
        }
        if self.type_rendez_vous == CodeTypeRendezVous::EntretienIndividuelConseiller
            && !infos.presence_conseiller
        {
            return Err(DomainError::mauvaise_commande(
                "Le champ presenceConseiller ne peut être modifié pour un rendez-vous Conseiller.",
            ));
        }

        let nouveaux: Vec<JeuneDuRendezVous> =
            infos.jeunes.iter().map(JeuneDuRendezVous::from).collect();
        let (jeunes_conserves, jeunes_ajoutes): (Vec<_>, Vec<_>) = nouveaux
            .iter()
            .cloned()
            .partition(|j| self.concerne_le_jeune(j.id));
        let jeunes_retires = self
            .jeunes
            .iter()
            .filter(|ancien| !nouveaux.iter().any(|j| j.id == ancien.id))
            .cloned()
            .collect();

        let date_modifiee = self.date != infos.date;
        let infos_modifiees =
            date_modifiee || self.duree != infos.duree || self.adresse != infos.adresse;

        if let Some(titre) = infos.titre {
            self.titre = titre;
        }
        self.commentaire = infos.commentaire;
        self.modalite = infos.modalite;
        self.date = infos.date;
        self.duree = infos.duree;
        self.adresse = infos.adresse;
        self.organisme = infos.organisme;
        self.presence_conseiller = infos.presence_conseiller;
        self.jeunes = nouveaux;

        Ok(ModificationsRendezVous {
            jeunes_ajoutes,
            jeunes_retires,
            jeunes_conserves,
            date_modifiee,
            infos_modifiees,
        })
    }

    /// Re-homes an animation collective when `id_conseiller` moves to
    /// `nouvelle_agence`
    ///
    /// An animation the conseiller created follows it and loses the jeunes of
    /// the other conseillers; any other one stays and loses the conseiller's
    /// own jeunes.
    pub fn suivre_le_changement_d_agence(
        &mut self,
        id_conseiller: ConseillerId,
        nouvelle_agence: AgenceId,
    ) -> ReaffectationAnimationCollective {
        let agence_transferee = self.createur.id == id_conseiller;
        let (desinscrits, gardes): (Vec<_>, Vec<_>) = self
            .jeunes
            .drain(..)
            .partition(|jeune| (jeune.id_conseiller() == Some(id_conseiller)) != agence_transferee);
        self.jeunes = gardes;
        if agence_transferee {
            self.id_agence = Some(nouvelle_agence);
        }

        ReaffectationAnimationCollective {
            agence_transferee,
            jeunes_desinscrits: desinscrits,
        }
    }

    /// Closes a past animation collective, keeping only the attendees
    pub fn cloturer(&mut self, ids_presents: &[JeuneId], now: DateTime<Utc>) -> DomainResult<()> {
        if !self.est_animation_collective() {
            return Err(DomainError::mauvaise_commande(
                "Ce rendez-vous n'est pas une animation collective.",
            ));
        }
        if self.date > now {
            return Err(DomainError::mauvaise_commande(
                "L'animation collective n'est pas encore passée.",
            ));
        }

        self.jeunes.retain(|j| ids_presents.contains(&j.id));
        for jeune in &mut self.jeunes {
            jeune.present = Some(true);
        }
        self.date_cloture = Some(now);
        Ok(())
    }
}
