//! Qualification of completed actions as SNP (situation non professionnelle)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeQualification {
    Sante,
    ProjetProfessionnel,
    Logement,
    Citoyennete,
    Emploi,
    CultureSportLoisirs,
    Formation,
    NonQualifiable,
}

impl CodeQualification {
    pub const ALL: [CodeQualification; 8] = [
        CodeQualification::Sante,
        CodeQualification::ProjetProfessionnel,
        CodeQualification::Logement,
        CodeQualification::Citoyennete,
        CodeQualification::Emploi,
        CodeQualification::CultureSportLoisirs,
        CodeQualification::Formation,
        CodeQualification::NonQualifiable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeQualification::Sante => "SANTE",
            CodeQualification::ProjetProfessionnel => "PROJET_PROFESSIONNEL",
            CodeQualification::Logement => "LOGEMENT",
            CodeQualification::Citoyennete => "CITOYENNETE",
            CodeQualification::Emploi => "EMPLOI",
            CodeQualification::CultureSportLoisirs => "CULTURE_SPORT_LOISIRS",
            CodeQualification::Formation => "FORMATION",
            CodeQualification::NonQualifiable => "NON_QUALIFIABLE",
        }
    }

    pub fn libelle(&self) -> &'static str {
        match self {
            CodeQualification::Sante => "CEJ - Démarches personnelles santé",
            CodeQualification::ProjetProfessionnel => {
                "CEJ - Démarches personnelles projet professionnel"
            }
            CodeQualification::Logement => "CEJ - Démarches personnelles logement",
            CodeQualification::Citoyennete => "CEJ - Démarches personnelles citoyenneté",
            CodeQualification::Emploi => "CEJ - Démarches personnelles emploi",
            CodeQualification::CultureSportLoisirs => {
                "CEJ - Démarches personnelles loisir, sport, culture"
            }
            CodeQualification::Formation => "CEJ - Démarches personnelles formation",
            CodeQualification::NonQualifiable => "Non qualifiable",
        }
    }

    /// Hours credited when the conseiller does not give a figure
    pub fn heures_par_defaut(&self) -> u32 {
        match self {
            CodeQualification::Emploi | CodeQualification::Formation => 3,
            CodeQualification::NonQualifiable => 0,
            _ => 2,
        }
    }

    pub fn est_snp(&self) -> bool {
        !matches!(self, CodeQualification::NonQualifiable)
    }
}

impl FromStr for CodeQualification {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeQualification::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| DomainError::mauvaise_commande(format!("Code qualification '{}' invalide", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub code: CodeQualification,
    pub heures: u32,
    pub commentaire: Option<String>,
}

/// Derived qualification state used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EtatQualification {
    Qualifiee,
    AQualifier,
    NonQualifiable,
}

impl EtatQualification {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtatQualification::Qualifiee => "QUALIFIEE",
            EtatQualification::AQualifier => "A_QUALIFIER",
            EtatQualification::NonQualifiable => "NON_QUALIFIABLE",
        }
    }
}
