//! Action aggregate
//!
//! An action is a task tracked for one jeune, created either by the jeune
//! or by its conseiller. Its statut drives `date_fin_reelle`, the reminder
//! rules and whether it can be qualified.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use core_kernel::temporal::{a_l_heure, debut_de_journee, jour_local, jours_calendaires_entre};
use core_kernel::{ActionId, DomainError, DomainResult, JeuneId};
use domain_beneficiaire::Jeune;

use crate::qualification::{CodeQualification, EtatQualification, Qualification};

/// Number of days before the échéance at which the reminder is sent
pub const JOURS_AVANT_RAPPEL: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatutAction {
    #[serde(rename = "not_started")]
    PasCommencee,
    #[serde(rename = "in_progress")]
    EnCours,
    #[serde(rename = "done")]
    Terminee,
    #[serde(rename = "canceled")]
    Annulee,
}

impl StatutAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatutAction::PasCommencee => "not_started",
            StatutAction::EnCours => "in_progress",
            StatutAction::Terminee => "done",
            StatutAction::Annulee => "canceled",
        }
    }

    pub fn est_cloture(&self) -> bool {
        matches!(self, StatutAction::Terminee | StatutAction::Annulee)
    }
}

impl fmt::Display for StatutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatutAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(StatutAction::PasCommencee),
            "in_progress" => Ok(StatutAction::EnCours),
            "done" => Ok(StatutAction::Terminee),
            "canceled" => Ok(StatutAction::Annulee),
            autre => Err(DomainError::mauvaise_commande(format!(
                "Statut '{}' invalide",
                autre
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCreateur {
    Conseiller,
    Jeune,
}

impl TypeCreateur {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCreateur::Conseiller => "conseiller",
            TypeCreateur::Jeune => "jeune",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Createur {
    pub id: Uuid,
    pub type_createur: TypeCreateur,
    pub prenom: String,
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub id_jeune: JeuneId,
    pub contenu: String,
    pub description: String,
    pub statut: StatutAction,
    pub date_creation: DateTime<Utc>,
    pub date_derniere_actualisation: DateTime<Utc>,
    pub date_echeance: DateTime<Utc>,
    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin_reelle: Option<DateTime<Utc>>,
    pub createur: Createur,
    pub rappel: bool,
    pub qualification: Option<Qualification>,
}

/// Input of the action factory
#[derive(Debug, Clone)]
pub struct NouvelleAction {
    pub id: ActionId,
    pub contenu: String,
    pub description: Option<String>,
    pub statut: Option<StatutAction>,
    pub type_createur: TypeCreateur,
    pub date_echeance: DateTime<Utc>,
    pub rappel: Option<bool>,
}

/// Partial update applied by a jeune or a conseiller
#[derive(Debug, Clone, Default)]
pub struct MiseAJourAction {
    pub statut: Option<StatutAction>,
    pub contenu: Option<String>,
    pub description: Option<String>,
    pub date_echeance: Option<DateTime<Utc>>,
}

/// Échéance moved to 09:30 Paris time on its day
fn echeance_a_9h30(date: DateTime<Utc>) -> DateTime<Utc> {
    a_l_heure(jour_local(date), 9, 30)
}

impl Action {
    pub fn creer(nouvelle: NouvelleAction, jeune: &Jeune, now: DateTime<Utc>) -> DomainResult<Self> {
        let createur = match nouvelle.type_createur {
            TypeCreateur::Jeune => Createur {
                id: jeune.id.into_uuid(),
                type_createur: TypeCreateur::Jeune,
                prenom: jeune.prenom.clone(),
                nom: jeune.nom.clone(),
            },
            TypeCreateur::Conseiller => {
                let conseiller = jeune.conseiller.as_ref().ok_or_else(|| {
                    DomainError::mauvaise_commande("Le bénéficiaire n'a pas de conseiller")
                })?;
                Createur {
                    id: conseiller.id.into_uuid(),
                    type_createur: TypeCreateur::Conseiller,
                    prenom: conseiller.prenom.clone(),
                    nom: conseiller.nom.clone(),
                }
            }
        };

        let statut = nouvelle.statut.unwrap_or(StatutAction::PasCommencee);

        Ok(Self {
            id: nouvelle.id,
            id_jeune: jeune.id,
            contenu: nouvelle.contenu,
            description: nouvelle.description.unwrap_or_default(),
            statut,
            date_creation: now,
            date_derniere_actualisation: now,
            date_echeance: echeance_a_9h30(nouvelle.date_echeance),
            date_debut: (statut != StatutAction::PasCommencee).then_some(now),
            date_fin_reelle: (statut == StatutAction::Terminee).then_some(now),
            createur,
            rappel: nouvelle.rappel.unwrap_or(true),
            qualification: None,
        })
    }

    pub fn est_qualifiee(&self) -> bool {
        self.qualification.is_some()
    }

    pub fn etat(&self) -> EtatQualification {
        if self.est_qualifiee() {
            EtatQualification::Qualifiee
        } else if self.statut == StatutAction::Terminee {
            EtatQualification::AQualifier
        } else {
            EtatQualification::NonQualifiable
        }
    }

    /// Entering `Terminee` stamps `date_fin_reelle`, leaving it clears it
    pub fn mettre_a_jour_statut(&mut self, statut: StatutAction, now: DateTime<Utc>) -> DomainResult<()> {
        if self.est_qualifiee() && statut != self.statut {
            return Err(DomainError::mauvaise_commande(
                "Une action qualifiée ne peut plus changer de statut",
            ));
        }

        if statut == StatutAction::Terminee {
            self.date_fin_reelle = Some(now);
        } else if self.statut == StatutAction::Terminee {
            self.date_fin_reelle = None;
        }
        if statut == StatutAction::EnCours && self.date_debut.is_none() {
            self.date_debut = Some(now);
        }

        self.statut = statut;
        self.date_derniere_actualisation = now;
        Ok(())
    }

    /// Applies a partial update; returns true when the échéance moved
    pub fn mettre_a_jour(&mut self, maj: MiseAJourAction, now: DateTime<Utc>) -> DomainResult<bool> {
        if let Some(statut) = maj.statut {
            self.mettre_a_jour_statut(statut, now)?;
        }
        if let Some(contenu) = maj.contenu {
            self.contenu = contenu;
        }
        if let Some(description) = maj.description {
            self.description = description;
        }

        let mut echeance_modifiee = false;
        if let Some(date_echeance) = maj.date_echeance {
            let nouvelle = echeance_a_9h30(date_echeance);
            echeance_modifiee = nouvelle != self.date_echeance;
            self.date_echeance = nouvelle;
        }

        self.date_derniere_actualisation = now;
        Ok(echeance_modifiee)
    }

    /// Refuses the deletion of commented or completed actions
    pub fn verifier_suppression(&self, a_des_commentaires: bool) -> DomainResult<()> {
        if a_des_commentaires {
            return Err(DomainError::mauvaise_commande(
                "Impossible de supprimer une action avec un commentaire.",
            ));
        }
        if self.statut == StatutAction::Terminee {
            return Err(DomainError::mauvaise_commande(
                "Impossible de supprimer une action terminée.",
            ));
        }
        Ok(())
    }

    pub fn qualifier(
        &mut self,
        code: CodeQualification,
        heures: Option<u32>,
        commentaire: Option<String>,
        date_debut: Option<DateTime<Utc>>,
        date_fin_reelle: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.statut != StatutAction::Terminee {
            return Err(DomainError::mauvaise_commande("L'action n'est pas terminée"));
        }
        if self.est_qualifiee() && !code.est_snp() {
            return Err(DomainError::mauvaise_commande(
                "Une action qualifiée en SNP ne peut pas être requalifiée en non qualifiable",
            ));
        }

        let debut = date_debut.or(self.date_debut);
        let fin = date_fin_reelle.or(self.date_fin_reelle);
        if let (Some(debut), Some(fin)) = (debut, fin) {
            if fin < debut {
                return Err(DomainError::mauvaise_commande(
                    "La date de fin doit être postérieure à la date de début",
                ));
            }
        }

        self.date_debut = debut;
        self.date_fin_reelle = fin;
        self.qualification = Some(Qualification {
            code,
            heures: heures.unwrap_or_else(|| code.heures_par_defaut()),
            commentaire,
        });
        self.date_derniere_actualisation = now;
        Ok(())
    }

    /// True when a reminder job should be scheduled at creation or update
    pub fn doit_planifier_une_notification_de_rappel(&self, now: DateTime<Utc>) -> bool {
        let echeance_dans_strictement_plus_de_3_jours = debut_de_journee(
            now + Duration::days(JOURS_AVANT_RAPPEL),
        ) < debut_de_journee(self.date_echeance);

        self.rappel && !self.statut.est_cloture() && echeance_dans_strictement_plus_de_3_jours
    }

    /// Re-checked when the reminder job fires
    pub fn doit_envoyer_une_notification_de_rappel(&self, now: DateTime<Utc>) -> DomainResult<()> {
        let echeance_dans_3_jours =
            jours_calendaires_entre(now, self.date_echeance) == JOURS_AVANT_RAPPEL;

        if echeance_dans_3_jours && self.rappel && !self.statut.est_cloture() {
            return Ok(());
        }

        let raison = if !echeance_dans_3_jours {
            "l'action n'arrive pas à échéance dans 3 jours".to_string()
        } else if !self.rappel {
            "le rappel est désactivé".to_string()
        } else {
            format!("le statut est {}", self.statut)
        };
        Err(DomainError::pas_de_rappel(self.id, raison))
    }

    /// Date the reminder job must run at
    pub fn date_du_rappel(&self) -> DateTime<Utc> {
        self.date_echeance - Duration::days(JOURS_AVANT_RAPPEL)
    }
}
