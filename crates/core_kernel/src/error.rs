//! Domain error types shared by every bounded context
//!
//! Handlers never throw: each failure is one of the closed set of variants
//! below, carried in a `Result`. Each variant exposes a stable `code()` used
//! in API payloads and a `status_code()` used by the HTTP surface.

use thiserror::Error;

use crate::ports::PortError;

/// Closed set of business failures returned by command and query handlers
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entite} {critere} non trouvé(e)")]
    NonTrouve {
        entite: String,
        critere: String,
    },

    #[error("Vous n'avez pas le droit d'effectuer cette action")]
    DroitsInsuffisants,

    #[error("{0}")]
    MauvaiseCommande(String),

    #[error("Le favori {0} existe déjà")]
    FavoriExisteDeja(String),

    #[error("Un compte avec l'adresse {0} existe déjà")]
    EmailExisteDeja(String),

    #[error("Le dossier {0} est déjà lié à un bénéficiaire")]
    DossierExisteDeja(String),

    #[error("Le bénéficiaire {id_jeune} n'est pas lié au conseiller {id_conseiller}")]
    JeuneNonLieAuConseiller {
        id_conseiller: String,
        id_jeune: String,
    },

    #[error("Le bénéficiaire {id_jeune} n'est pas lié à l'agence {id_agence}")]
    JeuneNonLieALAgence {
        id_jeune: String,
        id_agence: String,
    },

    #[error("Le conseiller {0} n'a pas renseigné son agence")]
    ConseillerSansAgence(String),

    #[error("Le bénéficiaire {0} s'est déjà connecté à l'application")]
    JeunePasInactif(String),

    #[error("Pas de rappel à envoyer pour l'action {id} car {raison}")]
    PasDeRappel {
        id: String,
        raison: String,
    },

    #[error("{0} n'est plus disponible")]
    RessourceIndisponible(String),

    #[error("Erreur technique: {0}")]
    Repository(#[from] PortError),
}

impl DomainError {
    /// `NonTrouve` for an entity identified by `critere`
    pub fn non_trouve(entite: impl Into<String>, critere: impl ToString) -> Self {
        DomainError::NonTrouve {
            entite: entite.into(),
            critere: critere.to_string(),
        }
    }

    pub fn mauvaise_commande(message: impl Into<String>) -> Self {
        DomainError::MauvaiseCommande(message.into())
    }

    pub fn jeune_non_lie_au_conseiller(
        id_conseiller: impl ToString,
        id_jeune: impl ToString,
    ) -> Self {
        DomainError::JeuneNonLieAuConseiller {
            id_conseiller: id_conseiller.to_string(),
            id_jeune: id_jeune.to_string(),
        }
    }

    pub fn pas_de_rappel(id: impl ToString, raison: impl Into<String>) -> Self {
        DomainError::PasDeRappel {
            id: id.to_string(),
            raison: raison.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NonTrouve { .. } => "NON_TROUVE",
            DomainError::DroitsInsuffisants => "DROITS_INSUFFISANTS",
            DomainError::MauvaiseCommande(_) => "MAUVAISE_COMMANDE",
            DomainError::FavoriExisteDeja(_) => "EXISTE_DEJA",
            DomainError::EmailExisteDeja(_) => "EMAIL_EXISTE_DEJA",
            DomainError::DossierExisteDeja(_) => "DOSSIER_EXISTE_DEJA",
            DomainError::JeuneNonLieAuConseiller { .. } => "JEUNE_NON_LIE_AU_CONSEILLER",
            DomainError::JeuneNonLieALAgence { .. } => "JEUNE_NON_LIE_A_L_AGENCE",
            DomainError::ConseillerSansAgence(_) => "CONSEILLER_SANS_AGENCE",
            DomainError::JeunePasInactif(_) => "JEUNE_PAS_INACTIF",
            DomainError::PasDeRappel { .. } => "PAS_DE_RAPPEL",
            DomainError::RessourceIndisponible(_) => "RESSOURCE_INDISPONIBLE",
            DomainError::Repository(_) => "ERREUR_TECHNIQUE",
        }
    }

    /// HTTP status the failure maps to at the API boundary
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::NonTrouve { .. } => 404,
            DomainError::DroitsInsuffisants
            | DomainError::JeuneNonLieAuConseiller { .. }
            | DomainError::JeuneNonLieALAgence { .. } => 403,
            DomainError::MauvaiseCommande(_)
            | DomainError::ConseillerSansAgence(_)
            | DomainError::JeunePasInactif(_)
            | DomainError::PasDeRappel { .. } => 400,
            DomainError::FavoriExisteDeja(_)
            | DomainError::EmailExisteDeja(_)
            | DomainError::DossierExisteDeja(_) => 409,
            DomainError::RessourceIndisponible(_) => 410,
            DomainError::Repository(port) if port.is_not_found() => 404,
            DomainError::Repository(_) => 500,
        }
    }

    pub fn is_non_trouve(&self) -> bool {
        matches!(self, DomainError::NonTrouve { .. })
    }
}

/// Result alias used by handlers and domain services
pub type DomainResult<T> = Result<T, DomainError>;
