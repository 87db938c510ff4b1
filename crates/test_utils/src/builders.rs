//! Test Data Builders
//!
//! Builders with sensible defaults so a test only sets the fields it cares
//! about. Names default to random French ones.

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::raw::FreeEmail;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::FR_FR;
use fake::Fake;

use core_kernel::{ActionId, AgenceId, ConseillerId, JeuneId, RendezVousId, Structure};
use domain_action::{Action, Createur, Qualification, StatutAction, TypeCreateur};
use domain_beneficiaire::{
    AgenceDuConseiller, ConfigurationApplication, Conseiller, ConseillerDuJeune, Jeune,
    Preferences,
};
use domain_rendez_vous::{
    CodeTypeRendezVous, CreateurRendezVous, JeuneDuRendezVous, RendezVous, SourceRendezVous,
    TITRE_PAR_DEFAUT,
};

use crate::fixtures::DatesFixtures;

pub struct ConseillerBuilder {
    conseiller: Conseiller,
}

impl Default for ConseillerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConseillerBuilder {
    pub fn new() -> Self {
        Self {
            conseiller: Conseiller {
                id: ConseillerId::new(),
                prenom: FirstName(FR_FR).fake(),
                nom: LastName(FR_FR).fake(),
                email: Some(FreeEmail(FR_FR).fake()),
                structure: Structure::Milo,
                agence: None,
                date_derniere_connexion: None,
            },
        }
    }

    pub fn with_id(mut self, id: ConseillerId) -> Self {
        self.conseiller.id = id;
        self
    }

    pub fn with_prenom(mut self, prenom: impl Into<String>) -> Self {
        self.conseiller.prenom = prenom.into();
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.conseiller.structure = structure;
        self
    }

    pub fn with_agence(mut self, id: AgenceId) -> Self {
        self.conseiller.agence = Some(AgenceDuConseiller {
            id,
            nom: Some("Mission Locale Lille".to_string()),
        });
        self
    }

    pub fn build(self) -> Conseiller {
        self.conseiller
    }
}

pub struct JeuneBuilder {
    jeune: Jeune,
}

impl Default for JeuneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JeuneBuilder {
    pub fn new() -> Self {
        Self {
            jeune: Jeune {
                id: JeuneId::new(),
                prenom: FirstName(FR_FR).fake(),
                nom: LastName(FR_FR).fake(),
                email: Some(FreeEmail(FR_FR).fake()),
                structure: Structure::Milo,
                date_creation: DatesFixtures::dans_jours(-30),
                is_activated: true,
                conseiller: None,
                id_conseiller_initial: None,
                id_partenaire: None,
                configuration: ConfigurationApplication {
                    push_notification_token: Some("token-firebase".to_string()),
                    date_derniere_actualisation_token: Some(DatesFixtures::dans_jours(-1)),
                    app_version: Some("3.2.0".to_string()),
                },
                preferences: Preferences::default(),
            },
        }
    }

    pub fn with_id(mut self, id: JeuneId) -> Self {
        self.jeune.id = id;
        self
    }

    pub fn with_nom(mut self, prenom: impl Into<String>, nom: impl Into<String>) -> Self {
        self.jeune.prenom = prenom.into();
        self.jeune.nom = nom.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.jeune.email = Some(email.into());
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.jeune.structure = structure;
        self
    }

    pub fn with_conseiller(mut self, conseiller: &Conseiller) -> Self {
        self.jeune.conseiller = Some(ConseillerDuJeune::from(conseiller));
        self
    }

    pub fn with_conseiller_initial(mut self, id: ConseillerId) -> Self {
        self.jeune.id_conseiller_initial = Some(id);
        self
    }

    pub fn with_id_partenaire(mut self, id_partenaire: impl Into<String>) -> Self {
        self.jeune.id_partenaire = Some(id_partenaire.into());
        self
    }

    /// Never connected: no token, account not activated
    pub fn sans_token(mut self) -> Self {
        self.jeune.configuration = ConfigurationApplication::default();
        self.jeune.is_activated = false;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.jeune.preferences = preferences;
        self
    }

    pub fn build(self) -> Jeune {
        self.jeune
    }
}

pub struct ActionBuilder {
    action: Action,
}

impl ActionBuilder {
    pub fn new(id_jeune: JeuneId) -> Self {
        let maintenant = DatesFixtures::maintenant();
        Self {
            action: Action {
                id: ActionId::new(),
                id_jeune,
                contenu: "Préparer son CV".to_string(),
                description: "Mettre à jour les expériences".to_string(),
                statut: StatutAction::PasCommencee,
                date_creation: maintenant - Duration::days(2),
                date_derniere_actualisation: maintenant - Duration::days(2),
                date_echeance: maintenant + Duration::days(10),
                date_debut: None,
                date_fin_reelle: None,
                createur: Createur {
                    id: id_jeune.as_uuid(),
                    type_createur: TypeCreateur::Jeune,
                    prenom: "Kenji".to_string(),
                    nom: "Girac".to_string(),
                },
                rappel: true,
                qualification: None,
            },
        }
    }

    pub fn with_id(mut self, id: ActionId) -> Self {
        self.action.id = id;
        self
    }

    pub fn with_statut(mut self, statut: StatutAction) -> Self {
        self.action.statut = statut;
        if statut == StatutAction::Terminee && self.action.date_fin_reelle.is_none() {
            self.action.date_fin_reelle = Some(self.action.date_derniere_actualisation);
        }
        self
    }

    pub fn with_date_echeance(mut self, date: DateTime<Utc>) -> Self {
        self.action.date_echeance = date;
        self
    }

    pub fn with_date_derniere_actualisation(mut self, date: DateTime<Utc>) -> Self {
        self.action.date_derniere_actualisation = date;
        self
    }

    pub fn with_rappel(mut self, rappel: bool) -> Self {
        self.action.rappel = rappel;
        self
    }

    pub fn with_qualification(mut self, qualification: Qualification) -> Self {
        self.action.qualification = Some(qualification);
        self
    }

    pub fn creee_par_conseiller(mut self, conseiller: &Conseiller) -> Self {
        self.action.createur = Createur {
            id: conseiller.id.as_uuid(),
            type_createur: TypeCreateur::Conseiller,
            prenom: conseiller.prenom.clone(),
            nom: conseiller.nom.clone(),
        };
        self
    }

    pub fn build(self) -> Action {
        self.action
    }
}

pub struct RendezVousBuilder {
    rendez_vous: RendezVous,
}

impl RendezVousBuilder {
    pub fn new(createur: &Conseiller) -> Self {
        Self {
            rendez_vous: RendezVous {
                id: RendezVousId::new(),
                titre: TITRE_PAR_DEFAUT.to_string(),
                sous_titre: format!("avec {}", createur.prenom),
                commentaire: None,
                modalite: Some("En agence".to_string()),
                date: DatesFixtures::dans_jours(10),
                duree: 30,
                type_rendez_vous: CodeTypeRendezVous::EntretienIndividuelConseiller,
                precision: None,
                adresse: None,
                organisme: None,
                presence_conseiller: true,
                invitation: false,
                jeunes: vec![],
                createur: CreateurRendezVous {
                    id: createur.id,
                    prenom: createur.prenom.clone(),
                    nom: createur.nom.clone(),
                },
                id_agence: None,
                date_cloture: None,
                source: SourceRendezVous::PassEmploi,
            },
        }
    }

    pub fn with_id(mut self, id: RendezVousId) -> Self {
        self.rendez_vous.id = id;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.rendez_vous.date = date;
        self
    }

    pub fn with_jeunes(mut self, jeunes: &[Jeune]) -> Self {
        self.rendez_vous.jeunes = jeunes.iter().map(JeuneDuRendezVous::from).collect();
        self
    }

    /// Atelier owned by `id_agence`
    pub fn animation_collective(mut self, id_agence: AgenceId) -> Self {
        self.rendez_vous.type_rendez_vous = CodeTypeRendezVous::Atelier;
        self.rendez_vous.id_agence = Some(id_agence);
        self.rendez_vous.source = SourceRendezVous::PassEmploi;
        self
    }

    pub fn with_presence_conseiller(mut self, presence: bool) -> Self {
        self.rendez_vous.presence_conseiller = presence;
        self
    }

    pub fn build(self) -> RendezVous {
        self.rendez_vous
    }
}
