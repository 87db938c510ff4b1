//! Partner structures a conseiller or a jeune belongs to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Accompaniment structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Structure {
    Milo,
    PoleEmploi,
    PoleEmploiBrsa,
    PoleEmploiAij,
    ConseilDepartemental,
    AvenirPro,
    PassEmploi,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Structure inconnue: {0}")]
pub struct StructureInconnue(pub String);

impl Structure {
    pub const ALL: [Structure; 7] = [
        Structure::Milo,
        Structure::PoleEmploi,
        Structure::PoleEmploiBrsa,
        Structure::PoleEmploiAij,
        Structure::ConseilDepartemental,
        Structure::AvenirPro,
        Structure::PassEmploi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::Milo => "MILO",
            Structure::PoleEmploi => "POLE_EMPLOI",
            Structure::PoleEmploiBrsa => "POLE_EMPLOI_BRSA",
            Structure::PoleEmploiAij => "POLE_EMPLOI_AIJ",
            Structure::ConseilDepartemental => "CONSEIL_DEPARTEMENTAL",
            Structure::AvenirPro => "AVENIR_PRO",
            Structure::PassEmploi => "PASS_EMPLOI",
        }
    }

    pub fn est_milo(&self) -> bool {
        matches!(self, Structure::Milo)
    }

    /// Structures whose beneficiaries are followed by France Travail
    pub fn est_france_travail(&self) -> bool {
        matches!(
            self,
            Structure::PoleEmploi
                | Structure::PoleEmploiBrsa
                | Structure::PoleEmploiAij
                | Structure::ConseilDepartemental
                | Structure::AvenirPro
        )
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Structure {
    type Err = StructureInconnue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Structure::ALL
            .into_iter()
            .find(|structure| structure.as_str() == s)
            .ok_or_else(|| StructureInconnue(s.to_string()))
    }
}
