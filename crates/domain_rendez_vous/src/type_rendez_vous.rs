//! Rendez-vous types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeTypeRendezVous {
    ActiviteExterieures,
    Atelier,
    EntretienIndividuelConseiller,
    EntretienPartenaire,
    InformationCollective,
    Visite,
    Prestation,
    Autre,
}

impl CodeTypeRendezVous {
    pub const ALL: [CodeTypeRendezVous; 8] = [
        CodeTypeRendezVous::ActiviteExterieures,
        CodeTypeRendezVous::Atelier,
        CodeTypeRendezVous::EntretienIndividuelConseiller,
        CodeTypeRendezVous::EntretienPartenaire,
        CodeTypeRendezVous::InformationCollective,
        CodeTypeRendezVous::Visite,
        CodeTypeRendezVous::Prestation,
        CodeTypeRendezVous::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeTypeRendezVous::ActiviteExterieures => "ACTIVITE_EXTERIEURES",
            CodeTypeRendezVous::Atelier => "ATELIER",
            CodeTypeRendezVous::EntretienIndividuelConseiller => "ENTRETIEN_INDIVIDUEL_CONSEILLER",
            CodeTypeRendezVous::EntretienPartenaire => "ENTRETIEN_PARTENAIRE",
            CodeTypeRendezVous::InformationCollective => "INFORMATION_COLLECTIVE",
            CodeTypeRendezVous::Visite => "VISITE",
            CodeTypeRendezVous::Prestation => "PRESTATION",
            CodeTypeRendezVous::Autre => "AUTRE",
        }
    }

    pub fn libelle(&self) -> &'static str {
        match self {
            CodeTypeRendezVous::ActiviteExterieures => "Activités extérieures",
            CodeTypeRendezVous::Atelier => "Atelier",
            CodeTypeRendezVous::EntretienIndividuelConseiller => "Entretien individuel conseiller",
            CodeTypeRendezVous::EntretienPartenaire => "Entretien par un partenaire",
            CodeTypeRendezVous::InformationCollective => "Information collective",
            CodeTypeRendezVous::Visite => "Visite",
            CodeTypeRendezVous::Prestation => "Prestation",
            CodeTypeRendezVous::Autre => "Autre",
        }
    }

    /// Group sessions owned by an agence rather than by a conseiller
    pub fn est_animation_collective(&self) -> bool {
        matches!(
            self,
            CodeTypeRendezVous::Atelier | CodeTypeRendezVous::InformationCollective
        )
    }
}

impl fmt::Display for CodeTypeRendezVous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeTypeRendezVous {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| DomainError::mauvaise_commande(format!("Type de rendez-vous '{}' inconnu", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animations_collectives() {
        let animations: Vec<_> = CodeTypeRendezVous::ALL
            .into_iter()
            .filter(|code| code.est_animation_collective())
            .collect();
        assert_eq!(
            animations,
            vec![CodeTypeRendezVous::Atelier, CodeTypeRendezVous::InformationCollective]
        );
    }

    #[test]
    fn test_lecture_du_code_textuel() {
        for code in CodeTypeRendezVous::ALL {
            assert_eq!(code.as_str().parse::<CodeTypeRendezVous>().unwrap(), code);
        }
        assert!("RDV".parse::<CodeTypeRendezVous>().is_err());
    }
}
