//! Job-search suggestions pushed to a jeune

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{DomainError, DomainResult, JeuneId, SuggestionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeRecherche {
    OffresEmploi,
    OffresAlternance,
    OffresImmersion,
    OffresServicesCivique,
}

impl TypeRecherche {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeRecherche::OffresEmploi => "OFFRES_EMPLOI",
            TypeRecherche::OffresAlternance => "OFFRES_ALTERNANCE",
            TypeRecherche::OffresImmersion => "OFFRES_IMMERSION",
            TypeRecherche::OffresServicesCivique => "OFFRES_SERVICES_CIVIQUE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceSuggestion {
    Conseiller,
    FranceTravail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationsSuggestion {
    pub titre: String,
    pub metier: Option<String>,
    pub localisation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub id_jeune: JeuneId,
    pub type_recherche: TypeRecherche,
    pub source: SourceSuggestion,
    /// Search criteria, shaped by `type_recherche`
    pub criteres: Value,
    pub informations: InformationsSuggestion,
    pub date_creation: DateTime<Utc>,
    pub date_mise_a_jour: DateTime<Utc>,
    pub date_refus: Option<DateTime<Utc>>,
    pub date_creation_recherche: Option<DateTime<Utc>>,
}

impl Suggestion {
    pub fn creer_par_conseiller(
        id_jeune: JeuneId,
        type_recherche: TypeRecherche,
        criteres: Value,
        informations: InformationsSuggestion,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SuggestionId::new(),
            id_jeune,
            type_recherche,
            source: SourceSuggestion::Conseiller,
            criteres,
            informations,
            date_creation: now,
            date_mise_a_jour: now,
            date_refus: None,
            date_creation_recherche: None,
        }
    }

    /// A suggestion is settled once refused or turned into a saved search
    pub fn est_traitee(&self) -> bool {
        self.date_refus.is_some() || self.date_creation_recherche.is_some()
    }

    pub fn refuser(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.est_traitee() {
            return Err(DomainError::mauvaise_commande(
                "La suggestion a déjà été traitée",
            ));
        }
        self.date_refus = Some(now);
        self.date_mise_a_jour = now;
        Ok(())
    }
}
