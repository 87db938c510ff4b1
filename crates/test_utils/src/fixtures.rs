//! Pre-built Test Fixtures
//!
//! Fixed instants (so business-hour and reminder rules are predictable) and
//! the authenticated callers handlers are executed as.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use core_kernel::temporal::a_l_heure;
use core_kernel::{ConseillerId, JeuneId, Role, Structure, TypeUtilisateur, Utilisateur};

pub struct DatesFixtures;

impl DatesFixtures {
    /// Tuesday 12 March 2024, 10:00 Paris time
    pub fn maintenant() -> DateTime<Utc> {
        Self::le(2024, 3, 12, 10, 0)
    }

    /// A given wall-clock time in Paris
    pub fn le(annee: i32, mois: u32, jour: u32, heure: u32, minute: u32) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(annee, mois, jour).unwrap();
        a_l_heure(date, heure, minute)
    }

    pub fn dans_jours(jours: i64) -> DateTime<Utc> {
        Self::maintenant() + chrono::Duration::days(jours)
    }
}

pub struct UtilisateurFixtures;

impl UtilisateurFixtures {
    pub fn conseiller(id: ConseillerId) -> Utilisateur {
        Self::conseiller_de_structure(id, Structure::Milo)
    }

    pub fn conseiller_de_structure(id: ConseillerId, structure: Structure) -> Utilisateur {
        Utilisateur {
            id: id.as_uuid(),
            prenom: "Nils".to_string(),
            nom: "Tavernier".to_string(),
            email: Some("nils.tavernier@mission-locale.fr".to_string()),
            type_utilisateur: TypeUtilisateur::Conseiller,
            structure,
            roles: vec![],
        }
    }

    pub fn superviseur(id: ConseillerId) -> Utilisateur {
        Utilisateur {
            roles: vec![Role::Superviseur],
            ..Self::conseiller(id)
        }
    }

    pub fn jeune(id: JeuneId) -> Utilisateur {
        Utilisateur {
            id: id.as_uuid(),
            prenom: "Kenji".to_string(),
            nom: "Girac".to_string(),
            email: None,
            type_utilisateur: TypeUtilisateur::Jeune,
            structure: Structure::Milo,
            roles: vec![],
        }
    }

    pub fn support() -> Utilisateur {
        Utilisateur {
            id: Uuid::new_v4(),
            prenom: "Support".to_string(),
            nom: "Pass Emploi".to_string(),
            email: None,
            type_utilisateur: TypeUtilisateur::Support,
            structure: Structure::PassEmploi,
            roles: vec![],
        }
    }
}
